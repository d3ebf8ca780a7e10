//! Config assembly and bundler drivers for devpack.
//!
//! This crate turns a project root into a finished bundler config and drives
//! the compiler in production (one-shot) and development (mount, first
//! build, rebuilds) modes through narrow collaborator traits.

pub mod assembler;
pub mod compiler;
pub mod development;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod production;

pub use assembler::{ConfigAssembler, DEFAULT_CONFIG_SUBDIR, Mode};
pub use compiler::{BuildStats, Compiler, CompilerFactory};
pub use development::{BuildWatcher, DevelopmentDriver};
pub use error::DevpackError;
pub use host::{DevLocals, MiddlewareHost, Middleware, MountEvent, SharedLocals};
pub use lifecycle::{Lifecycle, LifecycleState};
pub use production::ProductionDriver;

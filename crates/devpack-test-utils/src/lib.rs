//! Test helpers shared across devpack crates.

pub mod compiler;
pub mod host;
pub mod project;

pub use compiler::{FailingCompilerFactory, FakeCompiler, FakeCompilerFactory, stats};
pub use host::RecordingHost;
pub use project::ProjectFixture;

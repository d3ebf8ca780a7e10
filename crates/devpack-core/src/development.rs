//! Development driver: waits for the host mount, wires the compiler into the
//! host's middleware, and goes online after the first completed build.

use crate::assembler::{ConfigAssembler, Mode};
use crate::compiler::{BuildStats, Compiler, CompilerFactory};
use crate::error::DevpackError;
use crate::host::{DevLocals, Middleware, MiddlewareHost, MountEvent, SharedLocals};
use crate::lifecycle::{Lifecycle, LifecycleState};
use devpack_config::{BundlerConfig, HostOptions, enhance};
use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

/// Handle to the task consuming build notifications. Aborts on drop.
#[derive(Debug)]
pub struct BuildWatcher {
    handle: JoinHandle<()>,
}

impl BuildWatcher {
    fn spawn(
        mut events: broadcast::Receiver<BuildStats>,
        lifecycle: Lifecycle,
        locals: SharedLocals,
        url: String,
    ) -> Self {
        let handle = tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(stats) => {
                        if stats.has_errors() {
                            warn!(
                                "build {} finished with {} error(s)",
                                stats.hash,
                                stats.errors.len()
                            );
                        }
                        {
                            let mut locals = locals.write();
                            locals.stats = Some(stats);
                            locals.builds += 1;
                        }
                        if lifecycle.state() == LifecycleState::Initialized
                            && lifecycle.advance(LifecycleState::Online).is_ok()
                        {
                            info!("development bundle online at {url}");
                        }
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!("build watcher lagged; skipped {skipped} notification(s)");
                    }
                    Err(RecvError::Closed) => {
                        debug!("compiler closed its build notifications");
                        fail_unless_online(&lifecycle, "compiler closed before the first build");
                        break;
                    }
                }
            }
        });
        Self { handle }
    }

    /// Stop consuming build notifications.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Release `online` waiters when no first build can arrive any more.
fn fail_unless_online(lifecycle: &Lifecycle, reason: &str) {
    if lifecycle.state() < LifecycleState::Online {
        warn!("{reason}");
        lifecycle.fail(reason);
    }
}

impl Drop for BuildWatcher {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Drives the compiler for development through `Pending -> Initialized -> Online`.
pub struct DevelopmentDriver {
    root_dir: PathBuf,
    url: String,
    pending_config: Mutex<Option<BundlerConfig>>,
    factory: Arc<dyn CompilerFactory>,
    host: Arc<dyn MiddlewareHost>,
    lifecycle: Lifecycle,
    compiler: RwLock<Option<Arc<dyn Compiler>>>,
    locals: SharedLocals,
    watcher: Mutex<Option<BuildWatcher>>,
}

impl DevelopmentDriver {
    /// Assemble the development config for `root_dir` and wait in `Pending`.
    ///
    /// Fails immediately when `options.server` is missing or the config
    /// cannot be assembled.
    pub fn new(
        root_dir: impl AsRef<Path>,
        options: &HostOptions,
        explicit: Option<BundlerConfig>,
        factory: Arc<dyn CompilerFactory>,
        host: Arc<dyn MiddlewareHost>,
    ) -> Result<Self, DevpackError> {
        Self::with_assembler(
            ConfigAssembler::new(root_dir),
            options,
            explicit,
            factory,
            host,
        )
    }

    /// Same as `new` with a preconfigured assembler.
    pub fn with_assembler(
        assembler: ConfigAssembler,
        options: &HostOptions,
        explicit: Option<BundlerConfig>,
        factory: Arc<dyn CompilerFactory>,
        host: Arc<dyn MiddlewareHost>,
    ) -> Result<Self, DevpackError> {
        let server = options
            .server
            .as_ref()
            .ok_or(DevpackError::MissingServerConfig)?;
        let config = assembler.assemble(options, Mode::Development, explicit)?;
        let url = server.url();
        debug!("development driver pending (url={url})");
        Ok(Self {
            root_dir: assembler.root_dir().to_path_buf(),
            url,
            pending_config: Mutex::new(Some(config)),
            factory,
            host,
            lifecycle: Lifecycle::new(),
            compiler: RwLock::new(None),
            locals: Arc::new(RwLock::new(DevLocals::default())),
            watcher: Mutex::new(None),
        })
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Reachable base URL of the host server.
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn locals(&self) -> SharedLocals {
        self.locals.clone()
    }

    /// The base-enhanced config while still pending; `None` once mounted.
    pub fn pending_config(&self) -> Option<BundlerConfig> {
        self.pending_config.lock().clone()
    }

    /// Handle the host's mount notification: `Pending -> Initialized`.
    ///
    /// Any failure is returned here and recorded on the lifecycle, so
    /// callers waiting on `initialized`, `online` or `compiler` see it too.
    /// A second mount is rejected without affecting the first.
    ///
    /// Middleware is attached one at a time and there is no detach: when the
    /// host rejects `HotUpdates`, `BundleServing` stays attached and the host
    /// owns cleanup.
    pub async fn mounted(&self, event: MountEvent) -> Result<Arc<dyn Compiler>, DevpackError> {
        if let Some(failure) = self.lifecycle.failure() {
            return Err(DevpackError::LifecycleFailed(failure));
        }
        let pending = self.pending_config.lock().take();
        let Some(config) = pending else {
            return Err(DevpackError::InvalidTransition {
                from: self.lifecycle.state(),
                to: LifecycleState::Initialized,
            });
        };

        match self.initialize(config, &event).await {
            Ok(compiler) => Ok(compiler),
            Err(err) => {
                warn!(
                    "development driver failed to initialize (mount={}): {err}",
                    event.mount_path
                );
                self.lifecycle.fail(err.to_string());
                Err(err)
            }
        }
    }

    async fn initialize(
        &self,
        mut config: BundlerConfig,
        event: &MountEvent,
    ) -> Result<Arc<dyn Compiler>, DevpackError> {
        info!("middleware mounted at {}", event.mount_path);
        self.host.expose_locals(self.locals.clone());

        enhance::add_dev_presets(&mut config, &event.mount_path);
        enhance::add_public_path(&mut config, &self.url, &event.mount_path);

        let compiler = self.factory.create(config).await?;
        // Subscribe before attaching so the first build cannot be missed.
        let events = compiler.subscribe();
        self.host.attach(Middleware::BundleServing {
            compiler: compiler.clone(),
            quiet: true,
        })?;
        self.host.attach(Middleware::HotUpdates {
            compiler: compiler.clone(),
        })?;
        *self.compiler.write() = Some(compiler.clone());

        self.lifecycle.advance(LifecycleState::Initialized)?;
        let watcher = BuildWatcher::spawn(
            events,
            self.lifecycle.clone(),
            self.locals.clone(),
            self.url.clone(),
        );
        *self.watcher.lock() = Some(watcher);
        Ok(compiler)
    }

    /// Wait for `Initialized`.
    pub async fn initialized(&self) -> Result<(), DevpackError> {
        self.lifecycle.wait_for(LifecycleState::Initialized).await
    }

    /// Wait for `Online`, i.e. the first completed build.
    pub async fn online(&self) -> Result<(), DevpackError> {
        self.lifecycle.wait_for(LifecycleState::Online).await
    }

    /// The compiler, as soon as it exists.
    pub async fn compiler(&self) -> Result<Arc<dyn Compiler>, DevpackError> {
        self.initialized().await?;
        self.compiler
            .read()
            .clone()
            .ok_or_else(|| DevpackError::Compiler("compiler missing after initialization".into()))
    }

    /// Stop watching build notifications. The lifecycle state is kept; if
    /// no build finished yet, `online` waiters receive `LifecycleFailed`.
    pub fn shutdown(&self) {
        if let Some(watcher) = self.watcher.lock().take() {
            debug!("cancelling build watcher");
            watcher.cancel();
            fail_unless_online(&self.lifecycle, "build watcher stopped before the first build");
        }
    }
}

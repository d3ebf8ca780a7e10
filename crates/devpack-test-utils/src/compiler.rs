use async_trait::async_trait;
use devpack_config::BundlerConfig;
use devpack_core::{BuildStats, Compiler, CompilerFactory, DevpackError};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Build stats with the given hash and no diagnostics.
pub fn stats(hash: impl Into<String>) -> BuildStats {
    BuildStats {
        hash: hash.into(),
        duration_ms: 5,
        errors: Vec::new(),
        warnings: Vec::new(),
    }
}

/// Compiler that records its config and emits builds on demand.
#[derive(Debug)]
pub struct FakeCompiler {
    config: BundlerConfig,
    sender: Mutex<Option<broadcast::Sender<BuildStats>>>,
    runs: Mutex<u64>,
}

impl FakeCompiler {
    pub fn new(config: BundlerConfig) -> Self {
        let (sender, _) = broadcast::channel(16);
        Self {
            config,
            sender: Mutex::new(Some(sender)),
            runs: Mutex::new(0),
        }
    }

    pub fn config(&self) -> &BundlerConfig {
        &self.config
    }

    /// Notify subscribers that a build finished.
    pub fn complete_build(&self, stats: BuildStats) {
        if let Some(sender) = self.sender.lock().as_ref() {
            let _ = sender.send(stats);
        }
    }

    /// Drop the sender so subscribers observe a closed channel.
    pub fn close_builds(&self) {
        self.sender.lock().take();
    }

    pub fn runs(&self) -> u64 {
        *self.runs.lock()
    }
}

impl Compiler for FakeCompiler {
    fn subscribe(&self) -> broadcast::Receiver<BuildStats> {
        match self.sender.lock().as_ref() {
            Some(sender) => sender.subscribe(),
            None => broadcast::channel(1).1,
        }
    }

    fn run(&self) -> Result<BuildStats, DevpackError> {
        let run = {
            let mut runs = self.runs.lock();
            *runs += 1;
            *runs
        };
        let stats = stats(format!("run-{run}"));
        self.complete_build(stats.clone());
        Ok(stats)
    }
}

/// Factory handing out `FakeCompiler`s and keeping them for inspection.
#[derive(Debug, Default)]
pub struct FakeCompilerFactory {
    created: Mutex<Vec<Arc<FakeCompiler>>>,
}

impl FakeCompilerFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recently created compiler.
    pub fn last(&self) -> Option<Arc<FakeCompiler>> {
        self.created.lock().last().cloned()
    }

    pub fn created_count(&self) -> usize {
        self.created.lock().len()
    }
}

#[async_trait]
impl CompilerFactory for FakeCompilerFactory {
    async fn create(&self, config: BundlerConfig) -> Result<Arc<dyn Compiler>, DevpackError> {
        let compiler = Arc::new(FakeCompiler::new(config));
        self.created.lock().push(compiler.clone());
        Ok(compiler)
    }
}

/// Factory that always fails with the given message.
#[derive(Debug, Clone)]
pub struct FailingCompilerFactory {
    message: String,
}

impl FailingCompilerFactory {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl CompilerFactory for FailingCompilerFactory {
    async fn create(&self, _config: BundlerConfig) -> Result<Arc<dyn Compiler>, DevpackError> {
        Err(DevpackError::Compiler(self.message.clone()))
    }
}

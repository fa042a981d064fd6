//! Scoped log redirection.
//!
//! Delegate output during compilation and inference goes to a per-step log
//! file. [`LogScope`] installs the redirection and restores the previous
//! destination when dropped, on every exit path including panics.

use crate::core::errors::OffloadResult;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::layer::SubscriberExt;

/// Redirects tracing output of the current thread to a log file until
/// dropped.
pub struct LogScope {
    path: PathBuf,
    _default: DefaultGuard,
}

impl LogScope {
    /// Creates `dir` if needed, opens `<dir>/<name>.log` and installs a
    /// file-writing subscriber as the thread default.
    pub fn begin(dir: &Path, name: &str) -> OffloadResult<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{name}.log"));
        let file = File::create(&path)?;

        let subscriber = tracing_subscriber::registry()
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .with(
                tracing_subscriber::fmt::layer()
                    .with_ansi(false)
                    .with_writer(Arc::new(file)),
            );
        let guard = tracing::subscriber::set_default(subscriber);

        Ok(Self {
            path,
            _default: guard,
        })
    }

    /// The log file this scope writes to.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl std::fmt::Debug for LogScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogScope").field("path", &self.path).finish()
    }
}

//! Worker pools that stage work is scheduled onto.
//!
//! A run uses two pools: one sized for many concurrent blocking network
//! waits, one bounded to the machine's parallelism for compute-bound work.
//! They are separate runtimes: fetch work never lands on a CPU thread and
//! conversion work never lands on an I/O thread.

use std::future::Future;
use std::num::NonZeroUsize;

use thiserror::Error;
use tokio::runtime::{Builder, Handle, Runtime};
use tokio::task::JoinHandle;
use tracing::debug;

/// Default number of I/O worker threads.
pub const DEFAULT_IO_THREADS: usize = 8;

/// Maximum I/O worker threads accepted from configuration.
pub const MAX_IO_THREADS: usize = 64;

/// Errors that can occur while building worker pools.
#[derive(Debug, Error)]
pub enum ScopeError {
    /// A worker thread count of zero was requested.
    #[error("{pool} pool needs at least one worker thread")]
    ZeroThreads {
        /// Which pool was misconfigured.
        pool: &'static str,
    },

    /// The runtime could not be started.
    #[error("failed to start {pool} worker pool: {source}")]
    Build {
        /// Which pool failed.
        pool: &'static str,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Handle to one worker pool.
///
/// Cheap to clone; work submitted through it runs on the pool's threads
/// regardless of which runtime the caller is on.
#[derive(Debug, Clone)]
pub struct Scope {
    name: &'static str,
    handle: Handle,
}

impl Scope {
    /// Wraps an existing runtime handle.
    #[must_use]
    pub fn from_handle(name: &'static str, handle: Handle) -> Self {
        Self { name, handle }
    }

    /// Scope backed by the runtime the caller is currently on.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use]
    pub fn current(name: &'static str) -> Self {
        Self::from_handle(name, Handle::current())
    }

    /// The pool's name, used in logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Submits a task to this pool.
    pub fn spawn<F>(&self, task: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.handle.spawn(task)
    }
}

/// Thread counts for [`WorkerPools::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSizes {
    /// Worker threads for network-bound work.
    pub io_threads: usize,
    /// Worker threads for compute-bound work.
    pub cpu_threads: usize,
}

impl Default for PoolSizes {
    fn default() -> Self {
        Self {
            io_threads: DEFAULT_IO_THREADS,
            cpu_threads: available_cpus(),
        }
    }
}

/// Number of threads the CPU pool is bounded to.
#[must_use]
pub fn available_cpus() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// The two process-wide worker pools.
///
/// Construct once at startup and hand [`WorkerPools::io`] and
/// [`WorkerPools::cpu`] to whatever needs them. Dropping shuts both runtimes
/// down in the background, which is safe from inside another runtime.
pub struct WorkerPools {
    io: Option<Runtime>,
    cpu: Option<Runtime>,
    io_scope: Scope,
    cpu_scope: Scope,
}

impl std::fmt::Debug for WorkerPools {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPools")
            .field("io", &self.io_scope.name)
            .field("cpu", &self.cpu_scope.name)
            .finish()
    }
}

impl WorkerPools {
    /// Starts both pools.
    ///
    /// The CPU pool never gets more threads than [`available_cpus`].
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] if a size is zero or a runtime fails to start.
    pub fn new(sizes: PoolSizes) -> Result<Self, ScopeError> {
        let cpu_threads = sizes.cpu_threads.min(available_cpus());
        let io = build_runtime("io", sizes.io_threads)?;
        let cpu = build_runtime("cpu", cpu_threads)?;
        debug!(
            io_threads = sizes.io_threads,
            cpu_threads, "worker pools started"
        );

        Ok(Self {
            io_scope: Scope::from_handle("io", io.handle().clone()),
            cpu_scope: Scope::from_handle("cpu", cpu.handle().clone()),
            io: Some(io),
            cpu: Some(cpu),
        })
    }

    /// Scope for network-bound work.
    #[must_use]
    pub fn io(&self) -> Scope {
        self.io_scope.clone()
    }

    /// Scope for compute-bound work.
    #[must_use]
    pub fn cpu(&self) -> Scope {
        self.cpu_scope.clone()
    }
}

impl Drop for WorkerPools {
    fn drop(&mut self) {
        if let Some(runtime) = self.io.take() {
            runtime.shutdown_background();
        }
        if let Some(runtime) = self.cpu.take() {
            runtime.shutdown_background();
        }
    }
}

fn build_runtime(pool: &'static str, threads: usize) -> Result<Runtime, ScopeError> {
    if threads == 0 {
        return Err(ScopeError::ZeroThreads { pool });
    }
    Builder::new_multi_thread()
        .worker_threads(threads)
        .thread_name(format!("noir-{pool}"))
        .enable_all()
        .build()
        .map_err(|source| ScopeError::Build { pool, source })
}

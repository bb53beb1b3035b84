//! Shared-memory parallel execution.
//!
//! An [`Executor`] is an explicit handle onto either the calling thread or a
//! dedicated rayon pool. Kernels receive the handle and split their output
//! into disjoint chunks, so serial and parallel execution produce the same
//! bits.
//!
//! One process-wide default is kept behind [`initialize`] / [`global`] /
//! [`finalize`]. Its worker count comes from [`SmpConfig`], which can be read
//! from the `CELL2POINT_MAX_THREADS` environment variable and is always
//! clamped to the hardware concurrency.

use std::num::NonZeroUsize;
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::mesh_error::MeshError;

/// Environment variable overriding the default worker count.
pub const MAX_THREADS_ENV: &str = "CELL2POINT_MAX_THREADS";

/// Worker-count configuration.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmpConfig {
    /// Upper bound on workers; `0` means one per hardware thread.
    pub max_threads: usize,
}

impl SmpConfig {
    pub fn new(max_threads: usize) -> Self {
        Self { max_threads }
    }

    /// Read [`MAX_THREADS_ENV`]. Unset means auto; an unparsable value is
    /// logged and treated as auto.
    pub fn from_env() -> Self {
        match std::env::var(MAX_THREADS_ENV) {
            Ok(raw) => match raw.trim().parse::<usize>() {
                Ok(n) => Self::new(n),
                Err(_) => {
                    log::warn!("ignoring {MAX_THREADS_ENV}={raw:?}: not a thread count");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Worker count after applying the hardware cap.
    pub fn resolved_threads(&self) -> usize {
        let hw = hardware_concurrency();
        match self.max_threads {
            0 => hw,
            n => n.min(hw),
        }
    }
}

/// Number of hardware threads, at least 1.
pub fn hardware_concurrency() -> usize {
    std::thread::available_parallelism().map_or(1, NonZeroUsize::get)
}

/// Handle onto the threads a kernel may use.
#[derive(Debug)]
pub struct Executor {
    threads: usize,
    #[cfg(feature = "rayon")]
    pool: Option<rayon::ThreadPool>,
}

static_assertions::assert_impl_all!(Executor: Send, Sync);

impl Executor {
    /// Run everything on the calling thread.
    pub fn serial() -> Self {
        Self {
            threads: 1,
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Build an executor with `config.resolved_threads()` workers.
    ///
    /// One worker (or a build without the `rayon` feature) yields a serial
    /// executor.
    ///
    /// # Errors
    /// `ThreadPool` if the worker pool cannot be spawned.
    pub fn new(config: &SmpConfig) -> Result<Self, MeshError> {
        let threads = config.resolved_threads();
        #[cfg(feature = "rayon")]
        if threads > 1 {
            log::trace!("starting executor with {threads} workers");
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .thread_name(|i| format!("cell2point-{i}"))
                .build()
                .map_err(|e| MeshError::ThreadPool(e.to_string()))?;
            return Ok(Self {
                threads,
                pool: Some(pool),
            });
        }
        log::trace!("starting serial executor (requested {threads} workers)");
        Ok(Self::serial())
    }

    /// Number of workers.
    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn is_parallel(&self) -> bool {
        self.threads > 1
    }

    /// Chunk length for `n_items` items: about four chunks per worker.
    pub fn grain(&self, n_items: usize) -> usize {
        (n_items / (self.threads * 4)).max(1)
    }

    /// Call `f(chunk_index, chunk)` for every `chunk_len`-sized chunk of `data`.
    ///
    /// Chunks are disjoint, so `f` never sees another worker's elements.
    pub fn for_each_chunk_mut<T, F>(&self, data: &mut [T], chunk_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Send + Sync,
    {
        let chunk_len = chunk_len.max(1);
        #[cfg(feature = "rayon")]
        if let Some(pool) = &self.pool {
            use rayon::prelude::*;
            pool.install(|| {
                data.par_chunks_mut(chunk_len)
                    .enumerate()
                    .for_each(|(i, chunk)| f(i, chunk))
            });
            return;
        }
        data.chunks_mut(chunk_len)
            .enumerate()
            .for_each(|(i, chunk)| f(i, chunk));
    }
}

static GLOBAL: Lazy<Mutex<Option<Arc<Executor>>>> = Lazy::new(|| Mutex::new(None));

/// Install the process-wide executor, replacing any earlier one.
///
/// # Errors
/// `ThreadPool` if the worker pool cannot be spawned; the previous executor
/// is kept in that case.
pub fn initialize(config: &SmpConfig) -> Result<Arc<Executor>, MeshError> {
    let executor = Arc::new(Executor::new(config)?);
    *GLOBAL.lock() = Some(Arc::clone(&executor));
    Ok(executor)
}

/// The process-wide executor, created from [`SmpConfig::from_env`] on first use.
pub fn global() -> Arc<Executor> {
    let mut slot = GLOBAL.lock();
    if let Some(executor) = slot.as_ref() {
        return Arc::clone(executor);
    }
    let executor = Executor::new(&SmpConfig::from_env()).unwrap_or_else(|err| {
        log::warn!("falling back to serial execution: {err}");
        Executor::serial()
    });
    let executor = Arc::new(executor);
    *slot = Some(Arc::clone(&executor));
    executor
}

/// Drop the process-wide executor. Handles already given out stay valid.
pub fn finalize() {
    GLOBAL.lock().take();
}

/// True between [`initialize`] (or the first [`global`]) and [`finalize`].
pub fn is_initialized() -> bool {
    GLOBAL.lock().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolved_threads_are_capped_by_hardware() {
        let hw = hardware_concurrency();
        assert_eq!(SmpConfig::new(0).resolved_threads(), hw);
        assert_eq!(SmpConfig::new(1).resolved_threads(), 1);
        assert_eq!(SmpConfig::new(hw + 64).resolved_threads(), hw);
    }

    #[test]
    fn grain_is_never_zero() {
        let serial = Executor::serial();
        assert_eq!(serial.grain(0), 1);
        assert_eq!(serial.grain(40), 10);
    }

    #[test]
    fn chunks_cover_the_slice_once() {
        let executor = Executor::new(&SmpConfig::new(2)).unwrap();
        let mut data = vec![0usize; 103];
        executor.for_each_chunk_mut(&mut data, 10, |i, chunk| {
            for (j, v) in chunk.iter_mut().enumerate() {
                *v = i * 10 + j;
            }
        });
        assert!(data.iter().enumerate().all(|(i, &v)| i == v));
    }
}

//! # Mesh Worker Pool
//!
//! Extraction passes are pure functions of their field, so chunks can be
//! meshed on any thread. Each job carries its own copy of the field; workers
//! share nothing but the two channels.
//!
//! ```text
//! ┌──────────┐  jobs (bounded)  ┌──────────┐  results  ┌──────────┐
//! │  submit  │ ───────────────▶ │ worker N │ ────────▶ │   recv   │
//! └──────────┘                  └──────────┘           └──────────┘
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{bounded, unbounded, Receiver, RecvTimeoutError, Sender};
use isovox_core::{DensityField, MeshBuffer};

use crate::config::MeshingConfig;
use crate::error::{MeshingError, MeshingResult};
use crate::mesher::Mesher;

/// Queued jobs per worker before `submit` blocks.
const QUEUE_DEPTH_PER_WORKER: usize = 4;

/// One chunk to mesh.
#[derive(Clone, Debug)]
pub struct MeshJob {
    /// Caller-chosen identifier, echoed in the result.
    pub id: u64,
    /// Private copy of the chunk's field.
    pub field: DensityField,
    /// Mesher to run.
    pub mesher: Mesher,
    /// Isolevel to extract at.
    pub isolevel: f32,
}

/// A finished job.
#[derive(Clone, Debug)]
pub struct MeshResult {
    /// Identifier from the job.
    pub id: u64,
    /// Mesher that ran.
    pub mesher: Mesher,
    /// The extracted mesh.
    pub mesh: MeshBuffer,
    /// Time spent extracting.
    pub elapsed: Duration,
}

/// Pool counters.
#[derive(Debug, Default)]
pub struct PoolStats {
    /// Jobs accepted by `submit`.
    pub jobs_submitted: AtomicU64,
    /// Jobs finished by a worker.
    pub jobs_completed: AtomicU64,
    /// Triangles produced across all jobs.
    pub triangles: AtomicU64,
}

/// Fixed pool of mesh worker threads.
pub struct MeshWorkerPool {
    jobs: Option<Sender<MeshJob>>,
    results: Receiver<MeshResult>,
    workers: Vec<JoinHandle<()>>,
    running: Arc<AtomicBool>,
    stats: Arc<PoolStats>,
}

impl MeshWorkerPool {
    /// Starts `config.worker_threads` workers.
    ///
    /// Per-mesher options come from `config`; each job picks its own mesher.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: &MeshingConfig) -> MeshingResult<Self> {
        config.validate()?;
        let threads = config.worker_threads;
        let (job_tx, job_rx) = bounded::<MeshJob>(threads * QUEUE_DEPTH_PER_WORKER);
        let (result_tx, result_rx) = unbounded();
        let running = Arc::new(AtomicBool::new(true));
        let stats = Arc::new(PoolStats::default());

        let workers = (0..threads)
            .map(|index| {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                let stats = Arc::clone(&stats);
                let config = config.clone();
                thread::spawn(move || worker_loop(index, &jobs, &results, &stats, &config))
            })
            .collect();

        tracing::info!(threads, "mesh worker pool started");
        Ok(Self {
            jobs: Some(job_tx),
            results: result_rx,
            workers,
            running,
            stats,
        })
    }

    /// Queues a job, blocking while the queue is full.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::PoolClosed`] after [`shutdown`](Self::shutdown)
    /// and [`MeshingError::UnsupportedField`] if the job's mesher cannot run
    /// on its field.
    pub fn submit(&self, job: MeshJob) -> MeshingResult<()> {
        let jobs = self.jobs.as_ref().ok_or(MeshingError::PoolClosed)?;
        job.mesher.check_field(&job.field)?;
        jobs.send(job).map_err(|_| MeshingError::PoolClosed)?;
        self.stats.jobs_submitted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    /// Waits for the next finished job.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::PoolClosed`] once every worker has exited and
    /// all results have been drained.
    pub fn recv(&self) -> MeshingResult<MeshResult> {
        self.results.recv().map_err(|_| MeshingError::PoolClosed)
    }

    /// Waits up to `timeout` for the next finished job.
    ///
    /// # Errors
    ///
    /// Returns [`MeshingError::PoolClosed`] once the pool is drained.
    pub fn recv_timeout(&self, timeout: Duration) -> MeshingResult<Option<MeshResult>> {
        match self.results.recv_timeout(timeout) {
            Ok(result) => Ok(Some(result)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(MeshingError::PoolClosed),
        }
    }

    /// Returns a finished job if one is ready.
    #[must_use]
    pub fn try_recv(&self) -> Option<MeshResult> {
        self.results.try_recv().ok()
    }

    /// Number of worker threads.
    #[must_use]
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// True until [`shutdown`](Self::shutdown) runs.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Shared counters.
    #[must_use]
    pub fn stats(&self) -> Arc<PoolStats> {
        Arc::clone(&self.stats)
    }

    /// Stops accepting jobs and joins the workers.
    ///
    /// Jobs already queued are finished first; their results stay available
    /// through [`recv`](Self::recv).
    pub fn shutdown(&mut self) {
        if !self.running.swap(false, Ordering::SeqCst) {
            return;
        }
        // Dropping the sender ends each worker's receive loop.
        self.jobs = None;
        for handle in self.workers.drain(..) {
            if let Err(payload) = handle.join() {
                let message = payload
                    .downcast_ref::<&str>()
                    .copied()
                    .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
                    .unwrap_or("non-string panic payload");
                tracing::error!(message, "mesh worker panicked");
            }
        }
        tracing::info!(
            completed = self.stats.jobs_completed.load(Ordering::Relaxed),
            "mesh worker pool stopped"
        );
    }
}

impl Drop for MeshWorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for MeshWorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshWorkerPool")
            .field("workers", &self.workers.len())
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

fn worker_loop(
    index: usize,
    jobs: &Receiver<MeshJob>,
    results: &Sender<MeshResult>,
    stats: &PoolStats,
    config: &MeshingConfig,
) {
    for job in jobs {
        let start = Instant::now();
        let mesh = job.mesher.extractor(config).extract(&job.field, job.isolevel);
        let elapsed = start.elapsed();

        stats.jobs_completed.fetch_add(1, Ordering::Relaxed);
        stats
            .triangles
            .fetch_add(mesh.triangle_count() as u64, Ordering::Relaxed);
        tracing::debug!(
            worker = index,
            job = job.id,
            mesher = job.mesher.name(),
            triangles = mesh.triangle_count(),
            elapsed_us = elapsed.as_micros() as u64,
            "mesh job done"
        );

        let result = MeshResult {
            id: job.id,
            mesher: job.mesher,
            mesh,
            elapsed,
        };
        if results.send(result).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob() -> DensityField {
        let mut field = DensityField::cubic(6);
        field.set(2, 2, 2, -50);
        field.set(3, 2, 2, -50);
        field
    }

    #[test]
    fn test_results_match_direct_extraction() {
        let pool = MeshWorkerPool::new(&MeshingConfig {
            worker_threads: 2,
            ..MeshingConfig::default()
        })
        .unwrap();
        assert_eq!(pool.worker_count(), 2);

        for (id, mesher) in Mesher::ALL.into_iter().enumerate() {
            pool.submit(MeshJob {
                id: id as u64,
                field: blob(),
                mesher,
                isolevel: 0.0,
            })
            .unwrap();
        }

        let mut seen = Vec::new();
        for _ in 0..Mesher::ALL.len() {
            let result = pool.recv().unwrap();
            let direct = result.mesher.extract(&blob(), 0.0);
            assert_eq!(result.mesh, direct, "{}", result.mesher);
            seen.push(result.id);
        }
        seen.sort_unstable();
        assert_eq!(seen, (0..Mesher::ALL.len() as u64).collect::<Vec<_>>());
        assert_eq!(
            pool.stats().jobs_completed.load(Ordering::Relaxed),
            Mesher::ALL.len() as u64
        );
    }

    #[test]
    fn test_submit_after_shutdown() {
        let mut pool = MeshWorkerPool::new(&MeshingConfig {
            worker_threads: 1,
            ..MeshingConfig::default()
        })
        .unwrap();
        pool.submit(MeshJob {
            id: 7,
            field: blob(),
            mesher: Mesher::Greedy,
            isolevel: 0.0,
        })
        .unwrap();
        pool.shutdown();
        assert!(!pool.is_running());

        // The queued job still finishes.
        assert_eq!(pool.recv().unwrap().id, 7);
        assert!(matches!(pool.recv(), Err(MeshingError::PoolClosed)));
        assert!(matches!(
            pool.submit(MeshJob {
                id: 8,
                field: blob(),
                mesher: Mesher::Naive,
                isolevel: 0.0,
            }),
            Err(MeshingError::PoolClosed)
        ));
    }

    #[test]
    fn test_unsupported_job_is_rejected_up_front() {
        let pool = MeshWorkerPool::new(&MeshingConfig {
            worker_threads: 2,
            ..MeshingConfig::default()
        })
        .unwrap();
        let rejected = pool.submit(MeshJob {
            id: 1,
            field: DensityField::new([4, 4, 2]),
            mesher: Mesher::Greedy,
            isolevel: 0.0,
        });
        assert!(matches!(
            rejected,
            Err(MeshingError::UnsupportedField { mesher: "greedy", .. })
        ));
        assert_eq!(pool.stats().jobs_submitted.load(Ordering::Relaxed), 0);

        pool.submit(MeshJob {
            id: 2,
            field: DensityField::cubic(4),
            mesher: Mesher::Naive,
            isolevel: 0.0,
        })
        .unwrap();
        assert_eq!(pool.recv().unwrap().id, 2);
        assert!(pool.is_running());
        assert_eq!(pool.stats().jobs_completed.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = MeshingConfig {
            worker_threads: 0,
            ..MeshingConfig::default()
        };
        assert!(matches!(
            MeshWorkerPool::new(&config),
            Err(MeshingError::InvalidConfig(_))
        ));
    }
}

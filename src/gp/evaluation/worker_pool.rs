//! Long-lived worker threads fed through channels.
//!
//! ```text
//!              ┌──────────┐
//!   tasks ───► │ worker 0 │ ───┐
//!   (bounded)  ├──────────┤    │
//!         ───► │ worker 1 │ ───┼──► results (unbounded)
//!              ├──────────┤    │
//!         ───► │ worker n │ ───┘
//!              └──────────┘
//! ```
//!
//! Workers share one task receiver. Each task carries its chromosome by
//! value, so a chromosome is owned by exactly one worker at a time. One
//! stop sentinel per worker shuts the pool down.

use super::{Evaluator, failed, keep_best};
use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::fitness::Fitness;
use crate::gp::population::Population;
use log::{debug, trace, warn};
use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Message on the task queue.
enum Task<C> {
    /// Score `chromosome`, found at `index` in the submitted population.
    Evaluate {
        index: usize,
        chromosome: C,
        force: bool,
    },
    /// Sentinel: the receiving worker exits.
    Stop,
}

/// Message on the result queue.
struct Outcome<C> {
    index: usize,
    chromosome: C,
    error: Option<GpError>,
}

/// Fixed set of worker threads evaluating through a task queue.
///
/// Chromosomes that already carry a finite fitness are passed through
/// without recomputation unless forcing is enabled.
pub struct WorkerPoolEvaluator<C: Chromosome + 'static> {
    tasks: Option<SyncSender<Task<C>>>,
    results: Receiver<Outcome<C>>,
    workers: Vec<JoinHandle<()>>,
    force: bool,
}

impl<C: Chromosome + 'static> WorkerPoolEvaluator<C> {
    /// Pool of `workers` threads with a task queue of the same capacity.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] if `workers` is zero and
    /// [`GpError::Io`] if a thread cannot be spawned.
    pub fn new(fitness: Arc<dyn Fitness<C>>, workers: usize) -> GpResult<Self> {
        Self::with_capacity(fitness, workers, workers)
    }

    /// Pool of `workers` threads with a task queue holding at most
    /// `capacity` pending tasks.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] if `workers` is zero and
    /// [`GpError::Io`] if a thread cannot be spawned.
    pub fn with_capacity(
        fitness: Arc<dyn Fitness<C>>,
        workers: usize,
        capacity: usize,
    ) -> GpResult<Self> {
        if workers == 0 {
            return Err(GpError::Configuration(
                "worker pool needs at least one worker".to_string(),
            ));
        }

        let (task_tx, task_rx) = mpsc::sync_channel(capacity);
        let (result_tx, result_rx) = mpsc::channel();
        let task_rx = Arc::new(Mutex::new(task_rx));

        let mut pool = Self {
            tasks: Some(task_tx),
            results: result_rx,
            workers: Vec::with_capacity(workers),
            force: false,
        };

        for i in 0..workers {
            let fitness = Arc::clone(&fitness);
            let tasks = Arc::clone(&task_rx);
            let results = result_tx.clone();
            let handle = thread::Builder::new()
                .name(format!("genprog-worker-{i}"))
                .spawn(move || run_worker(i, fitness.as_ref(), &tasks, &results))?;
            pool.workers.push(handle);
        }

        debug!("worker pool started with {workers} workers, queue capacity {capacity}");
        Ok(pool)
    }

    /// Recompute chromosomes that already carry a finite fitness.
    #[must_use]
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Number of worker threads still owned by the pool.
    #[must_use]
    pub fn workers(&self) -> usize {
        self.workers.len()
    }

    /// Whether the pool still accepts work.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.tasks.is_some()
    }

    /// Send one stop sentinel per worker and wait for every worker to exit.
    ///
    /// Calling this again is a no-op.
    pub fn shutdown(&mut self) {
        let Some(tasks) = self.tasks.take() else {
            return;
        };
        for _ in 0..self.workers.len() {
            if tasks.send(Task::Stop).is_err() {
                break;
            }
        }
        drop(tasks);

        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("evaluation worker terminated by a panic");
            }
        }
        debug!("worker pool shut down");
    }
}

impl<C: Chromosome + 'static> fmt::Debug for WorkerPoolEvaluator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkerPoolEvaluator")
            .field("workers", &self.workers.len())
            .field("running", &self.is_running())
            .field("force", &self.force)
            .finish_non_exhaustive()
    }
}

impl<C: Chromosome + 'static> Drop for WorkerPoolEvaluator<C> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<C: Chromosome + 'static> Evaluator<C> for WorkerPoolEvaluator<C> {
    fn evaluate(&mut self, population: &mut Population<C>) -> GpResult<Option<C>> {
        let tasks = self
            .tasks
            .as_ref()
            .ok_or_else(|| GpError::WorkerPool("worker pool has been shut down".to_string()))?;

        let chromosomes = population.take_all();
        let count = chromosomes.len();
        let mut slots: Vec<Option<C>> = (0..count).map(|_| None).collect();
        let mut error: Option<GpError> = None;
        let mut sent = 0;

        let mut pending = chromosomes.into_iter().enumerate();
        for (index, chromosome) in pending.by_ref() {
            let task = Task::Evaluate {
                index,
                chromosome,
                force: self.force,
            };
            match tasks.send(task) {
                Ok(()) => sent += 1,
                Err(mpsc::SendError(task)) => {
                    if let Task::Evaluate {
                        index, chromosome, ..
                    } = task
                    {
                        slots[index] = Some(chromosome);
                    }
                    error = Some(GpError::WorkerPool("all workers have exited".to_string()));
                    break;
                }
            }
        }
        for (index, chromosome) in pending {
            slots[index] = Some(chromosome);
        }
        trace!("submitted {sent} of {count} evaluation tasks");

        for _ in 0..sent {
            let Ok(outcome) = self.results.recv() else {
                error = Some(GpError::WorkerPool(
                    "workers exited before returning every result".to_string(),
                ));
                break;
            };
            slots[outcome.index] = Some(outcome.chromosome);
            if let Some(failure) = outcome.error {
                let keep_current = match &error {
                    Some(GpError::Evaluation { index, .. }) => *index < outcome.index,
                    Some(_) => true,
                    None => false,
                };
                if !keep_current {
                    error = Some(failure);
                }
            }
        }

        *population = slots.into_iter().flatten().collect();
        if let Some(error) = error {
            return Err(error);
        }
        Ok(population.iter().fold(None, keep_best).cloned())
    }
}

fn run_worker<C: Chromosome>(
    id: usize,
    fitness: &dyn Fitness<C>,
    tasks: &Mutex<Receiver<Task<C>>>,
    results: &Sender<Outcome<C>>,
) {
    loop {
        let task = tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .recv();

        let Ok(Task::Evaluate {
            index,
            mut chromosome,
            force,
        }) = task
        else {
            trace!("worker {id} stopping");
            return;
        };

        let error = if !force && chromosome.fitness().is_some_and(f64::is_finite) {
            trace!("worker {id} skipped chromosome {index}");
            None
        } else {
            match panic::catch_unwind(AssertUnwindSafe(|| fitness.calc(&chromosome))) {
                Ok(Ok(value)) => {
                    chromosome.set_fitness(value);
                    None
                }
                Ok(Err(e)) => Some(failed(index, &e)),
                Err(payload) => Some(GpError::Evaluation {
                    index,
                    message: format!("fitness function panicked: {}", panic_message(&*payload)),
                }),
            }
        };

        let outcome = Outcome {
            index,
            chromosome,
            error,
        };
        if results.send(outcome).is_err() {
            return;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

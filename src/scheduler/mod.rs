//! Chunked work scheduler
//!
//! A single-threaded cooperative task loop with a virtual clock, and on top
//! of it the chunked-work state machine: chunks are processed one at a time,
//! yielding between chunks via a deferred task so a periodic ticker can
//! interleave, with completion signaled exactly once.
//!
//! Time is virtual throughout. Synchronous "expensive" work is modeled by
//! advancing the clock rather than busy-waiting, so the interleaving between
//! chunk processing and ticks is a pure function of the schedule and every
//! run is exactly reproducible — the wall-clock flakiness of the
//! defer-plus-interval pattern this models does not exist here.

use crate::error::{Error, Result};
use crate::seq;
use crate::value::Value;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, trace};

/// Unique task identifier, usable to cancel the task
pub type TaskId = u64;

type TaskFn = Box<dyn FnMut(&mut TaskLoop)>;

/// Delay used by [`TaskLoop::defer`]: the minimal non-zero delay, so a
/// deferred task runs after anything already due at the current time.
pub const DEFER_DELAY_MS: u64 = 1;

/// A scheduled unit of work
struct Task {
    /// Unique task ID
    id: TaskId,
    /// The callback to execute; taken out while the task is running
    callback: Option<TaskFn>,
    /// When the task should fire (virtual time in ms)
    fire_at: u64,
    /// Delay in milliseconds (rescheduling period for repeating tasks)
    delay: u64,
    /// Is this a repeating task?
    repeating: bool,
    /// Is this task cancelled?
    cancelled: bool,
}

/// Runtime statistics for the task loop
#[derive(Clone, Debug, Default, Serialize)]
pub struct TaskLoopStats {
    /// Total tasks executed
    pub total_tasks: u64,
    /// Deepest the queue has been
    pub max_queue_depth: usize,
}

/// Result of running the task loop to completion
#[derive(Clone, Debug, Default, Serialize)]
pub struct RunResult {
    /// Number of tasks that were dequeued and executed
    pub tasks_processed: usize,
    /// Number of loop iterations (task executions plus clock advances)
    pub iterations: usize,
    /// The virtual time when the loop went idle
    pub final_time: u64,
}

/// Single-threaded cooperative task queue driven by a virtual clock.
///
/// Tasks fire in `(fire_at, id)` order: earliest deadline first, scheduling
/// order as the tie-break. Exactly one task runs at a time; a running task
/// may schedule or cancel others, and models blocking work by calling
/// [`advance_time`](TaskLoop::advance_time).
pub struct TaskLoop {
    /// Scheduled tasks (timers and deferred work)
    queue: Vec<Task>,
    /// Current virtual time in milliseconds
    virtual_time: u64,
    /// Next task ID
    next_task_id: TaskId,
    /// Iteration budget for `run_to_completion` (runaway-interval protection)
    max_iterations: usize,
    /// Runtime statistics
    stats: TaskLoopStats,
}

impl Default for TaskLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskLoop {
    /// Create a new task loop at virtual time zero
    pub fn new() -> Self {
        Self {
            queue: Vec::new(),
            virtual_time: 0,
            next_task_id: 1,
            max_iterations: 1_000_000,
            stats: TaskLoopStats::default(),
        }
    }

    /// Get current virtual time
    pub fn current_time(&self) -> u64 {
        self.virtual_time
    }

    /// Advance virtual time. Called by tasks to model synchronous work that
    /// blocks the loop for its duration.
    pub fn advance_time(&mut self, ms: u64) {
        self.virtual_time += ms;
    }

    /// Schedule a one-shot task after `delay` ms of virtual time
    pub fn schedule<F>(&mut self, delay: u64, callback: F) -> TaskId
    where
        F: FnMut(&mut TaskLoop) + 'static,
    {
        self.push_task(delay, false, Box::new(callback))
    }

    /// Schedule a repeating task every `period` ms. After each firing the
    /// task is rescheduled from the current virtual time, so ticks coalesce
    /// behind long blocking work instead of piling up.
    pub fn set_interval<F>(&mut self, period: u64, callback: F) -> TaskId
    where
        F: FnMut(&mut TaskLoop) + 'static,
    {
        self.push_task(period.max(1), true, Box::new(callback))
    }

    /// Defer a task: run it on the next loop turn, after anything already
    /// due at the current time. This is the cooperative yield point between
    /// chunks of work.
    pub fn defer<F>(&mut self, callback: F) -> TaskId
    where
        F: FnMut(&mut TaskLoop) + 'static,
    {
        self.schedule(DEFER_DELAY_MS, callback)
    }

    fn push_task(&mut self, delay: u64, repeating: bool, callback: TaskFn) -> TaskId {
        let id = self.next_task_id;
        self.next_task_id += 1;
        let fire_at = self.virtual_time + delay;
        trace!(id, fire_at, delay, repeating, "task scheduled");
        self.queue.push(Task {
            id,
            callback: Some(callback),
            fire_at,
            delay,
            repeating,
            cancelled: false,
        });
        self.stats.max_queue_depth = self.stats.max_queue_depth.max(self.queue.len());
        id
    }

    /// Cancel a task by ID. A repeating task cancelled mid-callback still
    /// finishes the current firing but is never rescheduled.
    pub fn cancel(&mut self, id: TaskId) {
        for task in &mut self.queue {
            if task.id == id {
                trace!(id, "task cancelled");
                task.cancelled = true;
                break;
            }
        }
    }

    /// Check if any non-cancelled task remains
    pub fn has_pending_tasks(&self) -> bool {
        self.queue.iter().any(|t| !t.cancelled)
    }

    /// Fire time of the next scheduled task
    pub fn next_fire_time(&self) -> Option<u64> {
        self.queue
            .iter()
            .filter(|t| !t.cancelled)
            .map(|t| t.fire_at)
            .min()
    }

    fn next_ready_index(&self) -> Option<usize> {
        self.queue
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.cancelled && t.callback.is_some() && t.fire_at <= self.virtual_time)
            .min_by_key(|(_, t)| (t.fire_at, t.id))
            .map(|(i, _)| i)
    }

    /// Run the earliest task that is ready at the current virtual time.
    /// Returns false when nothing is ready.
    pub fn run_ready_task(&mut self) -> bool {
        let Some(idx) = self.next_ready_index() else {
            return false;
        };
        let (id, repeating) = (self.queue[idx].id, self.queue[idx].repeating);
        let Some(mut callback) = self.queue[idx].callback.take() else {
            return false;
        };
        if !repeating {
            self.queue.remove(idx);
        }

        trace!(id, time = self.virtual_time, "task firing");
        callback(self);
        self.stats.total_tasks += 1;

        if repeating {
            // the callback may have reordered the queue or cancelled us;
            // find the slot again before rescheduling
            if let Some(pos) = self.queue.iter().position(|t| t.id == id) {
                if self.queue[pos].cancelled {
                    self.queue.remove(pos);
                } else {
                    let fire_at = self.virtual_time + self.queue[pos].delay;
                    let task = &mut self.queue[pos];
                    task.fire_at = fire_at;
                    task.callback = Some(callback);
                }
            }
        }
        true
    }

    /// Advance the clock to the next scheduled task, if any
    pub fn advance_to_next_task(&mut self) -> bool {
        match self.next_fire_time() {
            Some(fire_at) => {
                if fire_at > self.virtual_time {
                    self.virtual_time = fire_at;
                }
                true
            }
            None => false,
        }
    }

    /// Run the loop until no tasks remain:
    ///   1. run every task ready at the current virtual time, in
    ///      `(fire_at, id)` order;
    ///   2. when nothing is ready, advance the clock to the next fire time;
    ///   3. stop when the queue holds no live task, or the iteration budget
    ///      is exhausted (an interval nobody cancels would otherwise spin
    ///      forever).
    pub fn run_to_completion(&mut self) -> RunResult {
        let mut result = RunResult::default();
        while result.iterations < self.max_iterations {
            if self.run_ready_task() {
                result.tasks_processed += 1;
                result.iterations += 1;
                continue;
            }
            if !self.advance_to_next_task() {
                break;
            }
            result.iterations += 1;
        }
        self.queue.retain(|t| !t.cancelled);
        result.final_time = self.virtual_time;
        result
    }

    /// Set the iteration budget for [`run_to_completion`](TaskLoop::run_to_completion)
    pub fn set_iteration_budget(&mut self, limit: usize) {
        self.max_iterations = limit;
    }

    /// Get a snapshot of the loop statistics
    pub fn stats(&self) -> TaskLoopStats {
        self.stats.clone()
    }
}

/// Chunk-processing state machine state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SchedulerState {
    /// No chunk has been started
    Idle,
    /// Chunk `i` is being processed
    Processing(usize),
    /// All chunks processed; the ticker has been cancelled
    Done,
}

/// Configuration for a chunked work run
#[derive(Clone, Copy, Debug)]
pub struct ScheduleOptions {
    /// Virtual milliseconds of synchronous work per chunk element
    pub cost_per_item_ms: u64,
    /// Period of the background ticker in virtual milliseconds
    pub tick_interval_ms: u64,
}

impl Default for ScheduleOptions {
    fn default() -> Self {
        Self {
            cost_per_item_ms: 10,
            tick_interval_ms: 20,
        }
    }
}

/// Outcome of a chunked work run
#[derive(Clone, Debug, Serialize)]
pub struct WorkReport {
    /// Ordered markers: `"chunk {i} processed"` interleaved with `"tick"`
    pub log: Vec<String>,
    /// Number of chunks processed
    pub chunks_processed: usize,
    /// How many times completion was signaled (always 1)
    pub completions: u32,
    /// Terminal state of the run
    pub final_state: SchedulerState,
    /// Virtual time when the loop went idle
    pub final_time: u64,
}

struct RunState {
    chunks: Vec<Vec<Value>>,
    state: SchedulerState,
    log: Vec<String>,
    processed: usize,
    completions: u32,
    ticker: TaskId,
    worker: Box<dyn FnMut(usize, &[Value])>,
    cost_per_item_ms: u64,
}

/// Processes a sequence of chunks one at a time on a [`TaskLoop`].
///
/// Each chunk's work runs synchronously (blocking the loop for
/// `cost_per_item_ms * len` of virtual time), appends its marker to the work
/// log, then defers the transition to the next chunk. A periodic ticker
/// appends `"tick"` markers while the run is active; it is cancelled exactly
/// once, when the chunk one past the last is requested and found absent.
pub struct ChunkScheduler {
    options: ScheduleOptions,
}

impl ChunkScheduler {
    /// Scheduler with explicit options
    pub fn new(options: ScheduleOptions) -> Self {
        Self { options }
    }

    /// Scheduler with the default cost and tick period
    pub fn with_defaults() -> Self {
        Self::new(ScheduleOptions::default())
    }

    /// Process `chunks` (an array of array chunks, as produced by
    /// [`partition::chunk`](crate::partition::chunk)) to completion,
    /// invoking `worker` once per chunk in order.
    ///
    /// The work log invariant: chunk markers appear strictly in chunk
    /// order, with zero or more ticks between consecutive markers and none
    /// during a chunk's synchronous work. An empty chunk list completes
    /// immediately with an empty log.
    pub fn run<W>(&self, chunks: &Value, worker: W) -> Result<WorkReport>
    where
        W: FnMut(usize, &[Value]) + 'static,
    {
        let chunk_lists: Vec<Vec<Value>> = match chunks {
            Value::Array(items) => items.borrow().iter().map(seq::elements).collect(),
            _ => Vec::new(),
        };
        debug!(
            chunks = chunk_lists.len(),
            cost_per_item_ms = self.options.cost_per_item_ms,
            tick_interval_ms = self.options.tick_interval_ms,
            "starting chunked run"
        );

        let mut task_loop = TaskLoop::new();
        let state = Rc::new(RefCell::new(RunState {
            chunks: chunk_lists,
            state: SchedulerState::Idle,
            log: Vec::new(),
            processed: 0,
            completions: 0,
            ticker: 0,
            worker: Box::new(worker),
            cost_per_item_ms: self.options.cost_per_item_ms,
        }));

        let ticker_state = Rc::clone(&state);
        let ticker = task_loop.set_interval(self.options.tick_interval_ms, move |_| {
            ticker_state.borrow_mut().log.push("tick".to_string());
        });
        state.borrow_mut().ticker = ticker;

        schedule_step(&mut task_loop, Rc::clone(&state), 0);
        let run = task_loop.run_to_completion();

        let state = Rc::try_unwrap(state)
            .map_err(|_| Error::internal("run state still shared after completion"))?
            .into_inner();
        if state.state != SchedulerState::Done {
            return Err(Error::internal(format!(
                "chunked run halted in state {:?}",
                state.state
            )));
        }

        Ok(WorkReport {
            log: state.log,
            chunks_processed: state.processed,
            completions: state.completions,
            final_state: state.state,
            final_time: run.final_time,
        })
    }
}

/// Process chunks with the default options: chunks in, worker applied per
/// chunk in order, completion report out.
pub fn process_chunks<W>(chunks: &Value, worker: W) -> Result<WorkReport>
where
    W: FnMut(usize, &[Value]) + 'static,
{
    ChunkScheduler::with_defaults().run(chunks, worker)
}

/// Defer the processing step for chunk `index`. The deferral is the yield
/// point: any task already due (the ticker in particular) runs before the
/// next chunk starts.
fn schedule_step(task_loop: &mut TaskLoop, state: Rc<RefCell<RunState>>, index: usize) {
    task_loop.defer(move |tl| {
        let mut run = state.borrow_mut();
        if index >= run.chunks.len() {
            // the chunk past the last was requested and found absent
            run.state = SchedulerState::Done;
            run.completions += 1;
            let ticker = run.ticker;
            debug!(
                chunks = run.chunks.len(),
                time = tl.current_time(),
                "chunked run complete"
            );
            drop(run);
            tl.cancel(ticker);
            return;
        }

        run.state = SchedulerState::Processing(index);
        let chunk = run.chunks[index].clone();
        let cost = run.cost_per_item_ms * chunk.len() as u64;
        (run.worker)(index, &chunk);
        tl.advance_time(cost);
        run.log.push(format!("chunk {index} processed"));
        run.processed += 1;
        trace!(index, cost, time = tl.current_time(), "chunk processed");
        drop(run);

        schedule_step(tl, Rc::clone(&state), index + 1);
    });
}

//! Cooperative round-robin task scheduling.
//!
//! Portable task pacing without async/await or platform-specific timers.
//! The caller owns the driver loop and passes the current time to every call,
//! so the scheduler itself never reads a clock.
//!
//! # Usage
//!
//! ```ignore
//! let mut scheduler: Scheduler<Context, TaskFn<Context>, 4> = Scheduler::new();
//! let now = Instant::from_millis(get_current_time_ms());
//! let poll = scheduler.register(poll_requests, Duration::from_millis(100), true, now)?;
//!
//! loop {
//!     let now = Instant::from_millis(get_current_time_ms());
//!     scheduler.tick(now, &mut context);
//! }
//! ```

use core::marker::PhantomData;

use embassy_time::{Duration, Instant};
use heapless::Vec;

#[cfg(feature = "esp32-log")]
use esp_println::println;

/// Error returned when registering a task fails
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// Task table is at capacity
    Full,
}

/// Stable reference to a registered task.
///
/// Tasks are never removed, so a handle stays valid for the life of the scheduler
/// that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(usize);

impl TaskHandle {
    /// Registration order of the task
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A unit of work fired by the [`Scheduler`].
///
/// `ctx` is the state shared by all tasks of one scheduler. `control` gives the
/// body access to the task table, including its own entry, so a task can
/// disarm itself or re-arm another one while it runs.
pub trait Task<C: ?Sized> {
    fn run(&mut self, ctx: &mut C, control: &mut TaskControl<'_>);
}

impl<C: ?Sized, F> Task<C> for F
where
    F: FnMut(&mut C, &mut TaskControl<'_>),
{
    fn run(&mut self, ctx: &mut C, control: &mut TaskControl<'_>) {
        self(ctx, control);
    }
}

/// Plain function task, the usual choice for a fixed set of tasks
pub type TaskFn<C> = fn(&mut C, &mut TaskControl<'_>);

/// Timing state of a single task
#[derive(Debug, Clone, Copy)]
struct TaskTimer {
    interval: Duration,
    deadline: Instant,
    enabled: bool,
}

impl TaskTimer {
    fn is_due(&self, now: Instant) -> bool {
        self.enabled && now >= self.deadline
    }

    /// Move to the next period, anchored to the previous deadline
    fn advance(&mut self) {
        self.deadline = self.deadline.saturating_add(self.interval);
    }

    fn enable(&mut self, now: Instant) {
        if !self.enabled {
            self.enabled = true;
            self.deadline = now;
        }
    }

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn set_interval(&mut self, interval: Duration) {
        if interval >= self.interval {
            self.deadline = self.deadline.saturating_add(interval - self.interval);
        } else {
            self.deadline = self.deadline.saturating_sub(self.interval - interval);
        }
        self.interval = interval;
    }

    fn execute_in(&mut self, delay: Duration, now: Instant) {
        self.deadline = now.saturating_add(delay);
        self.enabled = true;
    }
}

/// Access to the task table from inside a running task
pub struct TaskControl<'a> {
    timers: &'a mut [TaskTimer],
    current: TaskHandle,
    now: Instant,
}

impl TaskControl<'_> {
    /// Time the running task was fired at
    pub const fn now(&self) -> Instant {
        self.now
    }

    /// Handle of the running task
    pub const fn current(&self) -> TaskHandle {
        self.current
    }

    /// See [`Scheduler::enable`]
    pub fn enable(&mut self, task: TaskHandle) {
        let now = self.now;
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.enable(now);
        }
    }

    /// See [`Scheduler::disable`]
    pub fn disable(&mut self, task: TaskHandle) {
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.disable();
        }
    }

    /// See [`Scheduler::set_interval`]
    pub fn set_interval(&mut self, task: TaskHandle, interval: Duration) {
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.set_interval(interval);
        }
    }

    /// See [`Scheduler::execute_in`]
    pub fn execute_in(&mut self, task: TaskHandle, delay: Duration) {
        let now = self.now;
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.execute_in(delay, now);
        }
    }

    pub fn is_enabled(&self, task: TaskHandle) -> bool {
        self.timers.get(task.0).is_some_and(|timer| timer.enabled)
    }
}

/// Round-robin scheduler over a fixed table of at most `N` tasks.
///
/// Each [`tick`](Self::tick) inspects exactly one task, so a tick is O(1) and
/// never blocks by itself. A full sweep over `N` tasks takes `N + 1` ticks:
/// one to rewind the cursor and one per task. Tasks fire in registration
/// order within a sweep.
///
/// Tasks cannot be removed. Use [`disable`](Self::disable) instead.
pub struct Scheduler<C, T, const N: usize> {
    timers: Vec<TaskTimer, N>,
    tasks: Vec<T, N>,
    cursor: Option<usize>,
    _context: PhantomData<fn(&mut C)>,
}

impl<C, T: Task<C>, const N: usize> Scheduler<C, T, N> {
    pub const fn new() -> Self {
        Self {
            timers: Vec::new(),
            tasks: Vec::new(),
            cursor: None,
            _context: PhantomData,
        }
    }

    /// Add a task to the table.
    ///
    /// The first deadline is `now + interval`, saturating at [`Instant::MAX`].
    pub fn register(
        &mut self,
        task: T,
        interval: Duration,
        enabled: bool,
        now: Instant,
    ) -> Result<TaskHandle, SchedulerError> {
        let timer = TaskTimer {
            interval,
            deadline: now.saturating_add(interval),
            enabled,
        };
        if self.timers.push(timer).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("scheduler: task table full ({} tasks)", N);
            return Err(SchedulerError::Full);
        }
        let index = self.tasks.len();
        if self.tasks.push(task).is_err() {
            self.timers.pop();
            return Err(SchedulerError::Full);
        }
        Ok(TaskHandle(index))
    }

    /// Advance the round-robin cursor by one step.
    ///
    /// Fires the task under the cursor if it is enabled and due, then moves on.
    /// The deadline advances by exactly one interval from its previous value
    /// before the task body runs, so polling jitter never accumulates as drift
    /// and a task rescheduling itself is not overridden.
    ///
    /// Returns `true` if a task was fired.
    pub fn tick(&mut self, now: Instant, ctx: &mut C) -> bool {
        let Some(index) = self.cursor else {
            self.cursor = (!self.tasks.is_empty()).then_some(0);
            return false;
        };

        let fired = self.timers[index].is_due(now);
        if fired {
            self.timers[index].advance();
            let mut control = TaskControl {
                timers: &mut self.timers,
                current: TaskHandle(index),
                now,
            };
            self.tasks[index].run(ctx, &mut control);
        }

        let next = index + 1;
        self.cursor = (next < self.tasks.len()).then_some(next);
        fired
    }

    /// Arm a task.
    ///
    /// A disabled task becomes due immediately. Enabling a task that is already
    /// enabled keeps its phase.
    pub fn enable(&mut self, task: TaskHandle, now: Instant) {
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.enable(now);
        }
    }

    /// Disarm a task, keeping its deadline
    pub fn disable(&mut self, task: TaskHandle) {
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.disable();
        }
    }

    /// Change the interval, shifting the pending deadline by the difference
    pub fn set_interval(&mut self, task: TaskHandle, interval: Duration) {
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.set_interval(interval);
        }
    }

    /// Fire once after `delay`, enabling the task if needed
    pub fn execute_in(&mut self, task: TaskHandle, delay: Duration, now: Instant) {
        if let Some(timer) = self.timers.get_mut(task.0) {
            timer.execute_in(delay, now);
        }
    }

    pub fn interval(&self, task: TaskHandle) -> Option<Duration> {
        self.timers.get(task.0).map(|timer| timer.interval)
    }

    /// Next time the task becomes due
    pub fn deadline(&self, task: TaskHandle) -> Option<Instant> {
        self.timers.get(task.0).map(|timer| timer.deadline)
    }

    pub fn is_enabled(&self, task: TaskHandle) -> bool {
        self.timers.get(task.0).is_some_and(|timer| timer.enabled)
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl<C, T: Task<C>, const N: usize> Default for Scheduler<C, T, N> {
    fn default() -> Self {
        Self::new()
    }
}

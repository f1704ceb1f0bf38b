//! Discrete-event rate-monotonic simulation.
//!
//! # Algorithm
//!
//! 1. Convert the task triples to ticks and compute the hyperperiod.
//! 2. Seed the timeline with every release below the hyperperiod and the
//!    deadline of each release.
//! 3. Pop events in `(time, kind, task_num)` order and apply one transition
//!    per event:
//!    - **Completion**: the running instance finishes; the most urgent ready
//!      instance (if any) takes the processor with whatever work it has left.
//!    - **Release**: a new instance either takes an idle processor, waits in
//!      the ready queue, or preempts a less urgent running task.
//!    - **Deadline**: the instance must have completed by now.
//! 4. The run is infeasible as soon as a deadline check fails or an instance
//!    would complete after the hyperperiod; it is feasible if the timeline
//!    drains.
//!
//! Completions invalidated by a preemption stay in the heap. Each task
//! carries a generation counter that is bumped on invalidation, so a popped
//! completion whose stamp no longer matches is skipped in O(1).
//!
//! # Complexity
//! O(E log E) for E events, with E ≈ 2 · Σ(H / period) + completions.
//!
//! # Reference
//! Liu & Layland (1973), "Scheduling Algorithms for Multiprogramming in a
//! Hard-Real-Time Environment"

use log::{debug, trace};

use crate::config::SimulationConfig;
use crate::error::SimError;
use crate::hyperperiod::hyperperiod_ticks;
use crate::models::{
    Event, EventKind, FeasibilityResult, SimulationReport, Task, TaskNum, TaskSpec, Ticks,
    TraceEvent,
};
use crate::ready_queue::ReadyQueue;
use crate::timeline::Timeline;

/// Where a simulation stands after a step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Events remain.
    Running,
    /// The timeline drained with every check passing.
    Feasible,
    /// A deadline was missed or an instance overran the hyperperiod.
    Infeasible,
}

impl RunStatus {
    /// Whether the run has reached a verdict.
    pub fn is_done(&self) -> bool {
        !matches!(self, Self::Running)
    }
}

/// One simulation run and all of its state.
///
/// Nothing is shared between instances; independent task sets can be
/// simulated side by side in separate values.
///
/// # Example
/// ```
/// use rm_sim::engine::{RunStatus, Simulation};
/// use rm_sim::models::TaskSpec;
/// use rm_sim::SimulationConfig;
///
/// let tasks = [TaskSpec::new(1.0, 4.0, 4.0), TaskSpec::new(2.0, 6.0, 6.0)];
/// let mut sim = Simulation::new(&tasks, SimulationConfig::new()).unwrap();
///
/// assert!(sim.step() == RunStatus::Running);
/// let partial = sim.clone().into_report();
/// assert!(partial.is_none());
///
/// while sim.step() == RunStatus::Running {}
/// let report = sim.into_report().unwrap();
/// assert!(report.result.is_feasible());
/// ```
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    tasks: Vec<Task>,
    hyperperiod: Ticks,
    timeline: Timeline,
    ready: ReadyQueue,
    running: Option<TaskNum>,
    now: Ticks,
    status: RunStatus,
    events_processed: u64,
    trace: Vec<TraceEvent>,
}

impl Simulation {
    /// Prepares a run: builds the registry, the hyperperiod and the timeline.
    ///
    /// # Errors
    /// [`SimError::EmptyTaskSet`] for an empty slice, and the conversion
    /// errors of [`Task::from_spec`] and [`hyperperiod_ticks`].
    pub fn new(specs: &[TaskSpec], config: SimulationConfig) -> Result<Self, SimError> {
        config.check()?;
        if specs.is_empty() {
            return Err(SimError::EmptyTaskSet);
        }

        let tasks = specs
            .iter()
            .enumerate()
            .map(|(task_num, spec)| Task::from_spec(task_num, spec, &config))
            .collect::<Result<Vec<_>, _>>()?;

        let periods: Vec<Ticks> = tasks.iter().map(|t| t.period).collect();
        let hyperperiod = hyperperiod_ticks(&periods)?;
        let timeline = Timeline::generate(&tasks, hyperperiod);

        debug!(
            "simulating {} tasks over hyperperiod {} ticks ({} initial events)",
            tasks.len(),
            hyperperiod,
            timeline.len()
        );

        Ok(Self {
            config,
            tasks,
            hyperperiod,
            timeline,
            ready: ReadyQueue::new(),
            running: None,
            now: 0,
            status: RunStatus::Running,
            events_processed: 0,
            trace: Vec::new(),
        })
    }

    /// Applies the next event.
    ///
    /// Once a verdict is reached further calls do nothing and return it.
    pub fn step(&mut self) -> RunStatus {
        if self.status.is_done() {
            return self.status;
        }

        let Some(event) = self.timeline.pop() else {
            debug!("timeline drained at {}: feasible", self.now);
            self.status = RunStatus::Feasible;
            return self.status;
        };

        self.now = event.time;
        self.events_processed += 1;
        trace!("t={} {:?} task {}", event.time, event.kind, event.task_num);

        self.status = match event.kind {
            EventKind::Completion { generation } => self.on_completion(event.task_num, generation),
            EventKind::Release { instance } => self.on_release(event.task_num, instance),
            EventKind::Deadline { instance } => self.on_deadline(event.task_num, instance),
        };

        self.check_invariants();
        self.status
    }

    /// Steps until a verdict and returns the report.
    pub fn run_to_end(mut self) -> SimulationReport {
        while !self.step().is_done() {}
        self.build_report()
    }

    /// Consumes the simulation and returns its report.
    ///
    /// `None` while the run is still [`RunStatus::Running`]: an unfinished
    /// run has no verdict to report.
    pub fn into_report(self) -> Option<SimulationReport> {
        if self.status.is_done() {
            Some(self.build_report())
        } else {
            None
        }
    }

    /// Only called once `status` holds a verdict.
    fn build_report(self) -> SimulationReport {
        let result = match self.status {
            RunStatus::Feasible => FeasibilityResult::Feasible {
                preemptions: self.tasks.iter().map(|t| t.times_preempted).collect(),
            },
            RunStatus::Running | RunStatus::Infeasible => FeasibilityResult::Infeasible,
        };

        SimulationReport {
            result,
            hyperperiod: self.hyperperiod,
            end_time: self.now,
            events_processed: self.events_processed,
            tasks: self.tasks,
            trace: self.trace,
        }
    }

    /// Task registry.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// A single registry entry.
    pub fn task(&self, task_num: TaskNum) -> Option<&Task> {
        self.tasks.get(task_num)
    }

    /// Task holding the processor, `None` when idle.
    pub fn running(&self) -> Option<TaskNum> {
        self.running
    }

    /// Instances waiting for the processor.
    pub fn ready_queue(&self) -> &ReadyQueue {
        &self.ready
    }

    /// Current simulated time (ticks).
    pub fn now(&self) -> Ticks {
        self.now
    }

    /// Hyperperiod (ticks).
    pub fn hyperperiod(&self) -> Ticks {
        self.hyperperiod
    }

    /// Current status.
    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Recorded decisions so far.
    pub fn trace(&self) -> &[TraceEvent] {
        &self.trace
    }

    /// Settings this run was created with.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    fn on_completion(&mut self, task_num: TaskNum, generation: u64) -> RunStatus {
        let now = self.now;
        let task = &self.tasks[task_num];
        if self.running != Some(task_num) || task.generation != generation {
            trace!("t={now} stale completion of task {task_num}");
            self.record(TraceEvent::StaleCompletion {
                time: now,
                task: task_num,
            });
            return RunStatus::Running;
        }

        if now > self.hyperperiod {
            debug!(
                "task {task_num} completes at {now}, past hyperperiod {}: infeasible",
                self.hyperperiod
            );
            self.record(TraceEvent::Overrun {
                time: now,
                task: task_num,
            });
            return RunStatus::Infeasible;
        }

        let task = &mut self.tasks[task_num];
        task.exec_time_left = task.exec_time;
        task.time_last_started = None;
        task.num_times_run += 1;
        self.running = None;
        self.record(TraceEvent::Completed {
            time: now,
            task: task_num,
        });

        match self.ready.pop() {
            Some(next) => self.dispatch(next.task_num),
            None => self.record(TraceEvent::Idle { time: now }),
        }

        RunStatus::Running
    }

    fn on_release(&mut self, task_num: TaskNum, instance: u64) -> RunStatus {
        self.record(TraceEvent::Released {
            time: self.now,
            task: task_num,
            instance,
        });

        match self.running {
            None => {
                let task = &mut self.tasks[task_num];
                task.exec_time_left = task.exec_time;
                self.dispatch(task_num);
            }
            // A previous instance of this task is still on the processor.
            Some(current) if current == task_num => self.enqueue(task_num),
            Some(current) if self.tasks[current].outranks(&self.tasks[task_num]) => {
                self.enqueue(task_num)
            }
            Some(current) => self.preempt(current, task_num),
        }

        RunStatus::Running
    }

    fn on_deadline(&mut self, task_num: TaskNum, instance: u64) -> RunStatus {
        let now = self.now;
        let completed = self.tasks[task_num].num_times_run;
        if completed <= instance {
            debug!(
                "task {task_num} instance {instance} missed its deadline at {now} \
                 ({completed} completed): infeasible"
            );
            self.record(TraceEvent::DeadlineMissed {
                time: now,
                task: task_num,
                instance,
            });
            return RunStatus::Infeasible;
        }

        self.record(TraceEvent::DeadlineMet {
            time: now,
            task: task_num,
            instance,
        });
        RunStatus::Running
    }

    /// Takes the processor away from `victim` and hands it to `by`.
    fn preempt(&mut self, victim: TaskNum, by: TaskNum) {
        let now = self.now;
        let task = &mut self.tasks[victim];
        let elapsed = now.saturating_sub(task.time_last_started.unwrap_or(now));
        task.exec_time_left = task.exec_time_left.saturating_sub(elapsed);
        task.time_last_started = None;

        // A task dispatched at this same instant has not really run yet.
        let counted = elapsed > 0;
        if counted {
            task.times_preempted += 1;
        }

        let remaining = task.exec_time_left;
        if remaining > 0 {
            task.generation += 1;
            let priority = task.priority;
            self.ready.push(priority, victim);
        }

        trace!("t={now} task {by} preempts task {victim} ({remaining} left)");
        self.record(TraceEvent::Preempted {
            time: now,
            task: victim,
            by,
            remaining,
            counted,
        });

        let task = &mut self.tasks[by];
        task.exec_time_left = task.exec_time;
        self.running = None;
        self.dispatch(by);
    }

    /// Gives the processor to `task_num` with its current remaining work.
    fn dispatch(&mut self, task_num: TaskNum) {
        let now = self.now;
        let task = &mut self.tasks[task_num];
        task.time_last_started = Some(now);
        let remaining = task.exec_time_left;
        let finish = now.saturating_add(remaining);
        self.timeline
            .push(Event::completion(finish, task_num, task.generation));
        self.running = Some(task_num);

        self.record(TraceEvent::Dispatched {
            time: now,
            task: task_num,
            remaining,
        });
    }

    fn enqueue(&mut self, task_num: TaskNum) {
        let priority = self.tasks[task_num].priority;
        self.ready.push(priority, task_num);
        self.record(TraceEvent::Queued {
            time: self.now,
            task: task_num,
        });
    }

    fn record(&mut self, event: TraceEvent) {
        if self.config.record_trace {
            self.trace.push(event);
        }
    }

    fn check_invariants(&self) {
        let started = self
            .tasks
            .iter()
            .filter(|t| t.time_last_started.is_some())
            .count();
        debug_assert!(started <= 1, "{started} tasks hold the processor");
        debug_assert_eq!(
            started == 1,
            self.running.is_some(),
            "running marker disagrees with task state"
        );
        for task in &self.tasks {
            debug_assert!(
                task.exec_time_left <= task.exec_time,
                "task {} has {} ticks left of {}",
                task.task_num,
                task.exec_time_left,
                task.exec_time
            );
        }
        debug_assert!(
            self.running.is_some() || self.ready.is_empty(),
            "processor idle with {} instances waiting",
            self.ready.len()
        );
    }
}

/// Checks a task set at the default settings.
///
/// # Example
/// ```
/// use rm_sim::models::TaskSpec;
///
/// let result = rm_sim::run(&[TaskSpec::new(2.0, 5.0, 5.0)]).unwrap();
/// assert_eq!(result.preemptions(), Some(&[0][..]));
/// ```
pub fn run(specs: &[TaskSpec]) -> Result<FeasibilityResult, SimError> {
    Ok(run_with_config(specs, SimulationConfig::new())?.result)
}

/// Checks a task set and returns the full report.
pub fn run_with_config(
    specs: &[TaskSpec],
    config: SimulationConfig,
) -> Result<SimulationReport, SimError> {
    Ok(Simulation::new(specs, config)?.run_to_end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::generate_harmonic;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    fn unit_config() -> SimulationConfig {
        SimulationConfig::new().with_time_scale(1).with_trace(true)
    }

    fn specs(triples: &[(f64, f64, f64)]) -> Vec<TaskSpec> {
        triples
            .iter()
            .map(|&(c, t, d)| TaskSpec::new(c, t, d))
            .collect()
    }

    fn traced(triples: &[(f64, f64, f64)]) -> SimulationReport {
        run_with_config(&specs(triples), unit_config()).unwrap()
    }

    #[test]
    fn test_scenario_a_feasible() {
        let result = run(&specs(&[(1.0, 4.0, 4.0), (2.0, 6.0, 6.0)])).unwrap();
        assert_eq!(
            result,
            FeasibilityResult::Feasible {
                preemptions: vec![0, 0]
            }
        );
    }

    #[test]
    fn test_scenario_b_infeasible_before_hyperperiod() {
        let report = traced(&[(3.0, 4.0, 4.0), (3.0, 6.0, 6.0)]);

        assert_eq!(report.result, FeasibilityResult::Infeasible);
        assert_eq!(report.hyperperiod, 12);
        assert_eq!(report.end_time, 6);
        assert_eq!(
            report.trace.last(),
            Some(&TraceEvent::DeadlineMissed {
                time: 6,
                task: 1,
                instance: 0
            })
        );
    }

    #[test]
    fn test_scenario_c_single_task() {
        let result = run(&specs(&[(2.0, 5.0, 5.0)])).unwrap();
        assert_eq!(result.preemptions(), Some(&[0][..]));
    }

    #[test]
    fn test_preemption_counted_and_progress_kept() {
        let report = traced(&[(1.0, 3.0, 3.0), (3.0, 6.0, 6.0)]);

        assert_eq!(report.result.preemptions(), Some(&[0, 1][..]));
        assert_eq!(report.total_preemptions(), 1);
        assert!(report.trace.contains(&TraceEvent::Preempted {
            time: 3,
            task: 1,
            by: 0,
            remaining: 1,
            counted: true,
        }));
        // Task 1 resumes with one tick left, not its full exec time.
        assert!(report.trace.contains(&TraceEvent::Dispatched {
            time: 4,
            task: 1,
            remaining: 1,
        }));
        assert!(report.trace.contains(&TraceEvent::Completed { time: 5, task: 1 }));
    }

    #[test]
    fn test_stale_completion_skipped_after_resume() {
        // Task 1's first completion at t=4 is still queued when it resumes
        // at t=4; the generation stamp must reject it.
        let report = traced(&[(1.0, 3.0, 3.0), (3.0, 6.0, 6.0)]);

        assert!(report
            .trace
            .contains(&TraceEvent::StaleCompletion { time: 4, task: 1 }));
        assert!(!report.trace.contains(&TraceEvent::Completed { time: 4, task: 1 }));
        assert_eq!(report.tasks[1].num_times_run, 1);
        assert_eq!(report.tasks[1].generation, 1);
    }

    #[test]
    fn test_completion_at_hyperperiod_is_feasible() {
        // Task 1 finishes exactly at t=4 == H.
        let report = traced(&[(1.0, 2.0, 2.0), (2.0, 4.0, 4.0)]);

        assert_eq!(report.hyperperiod, 4);
        assert!(report.trace.contains(&TraceEvent::Completed { time: 4, task: 1 }));
        assert_eq!(report.result.preemptions(), Some(&[0, 1][..]));
    }

    #[test]
    fn test_completion_past_hyperperiod_is_infeasible() {
        // Deadline 4 would be met, but the instance ends at 3 > H = 2.
        let report = traced(&[(3.0, 2.0, 4.0)]);

        assert_eq!(report.result, FeasibilityResult::Infeasible);
        assert_eq!(
            report.trace.last(),
            Some(&TraceEvent::Overrun { time: 3, task: 0 })
        );
    }

    #[test]
    fn test_zero_elapsed_preemption_not_counted() {
        // Both released at t=0; task 0 is dispatched first and immediately
        // preempted by the shorter-period task 1.
        let report = traced(&[(1.0, 6.0, 6.0), (1.0, 3.0, 3.0)]);

        assert_eq!(report.result.preemptions(), Some(&[0, 0][..]));
        assert_eq!(report.total_preemptions(), 0);
        assert!(report.trace.contains(&TraceEvent::Preempted {
            time: 0,
            task: 0,
            by: 1,
            remaining: 1,
            counted: false,
        }));
    }

    #[test]
    fn test_re_release_while_running_is_queued() {
        let report = traced(&[(3.0, 2.0, 4.0), (1.0, 4.0, 4.0)]);

        assert!(report.trace.contains(&TraceEvent::Queued { time: 2, task: 0 }));
        // The queued instance outranks task 1 and runs next.
        assert!(report.trace.contains(&TraceEvent::Dispatched {
            time: 3,
            task: 0,
            remaining: 3,
        }));
        assert_eq!(report.result, FeasibilityResult::Infeasible);
        assert_eq!(
            report.trace.last(),
            Some(&TraceEvent::DeadlineMissed {
                time: 4,
                task: 1,
                instance: 0
            })
        );
    }

    #[test]
    fn test_equal_period_lower_task_num_first() {
        let tasks = specs(&[(1.0, 4.0, 4.0), (1.0, 4.0, 4.0)]);
        let mut sim = Simulation::new(&tasks, unit_config()).unwrap();

        assert_eq!(sim.step(), RunStatus::Running);
        assert_eq!(sim.running(), Some(0));
        assert_eq!(sim.task(0).unwrap().time_last_started, Some(0));

        assert_eq!(sim.step(), RunStatus::Running);
        assert_eq!(sim.running(), Some(0));
        assert_eq!(sim.task(1).unwrap().time_last_started, None);
        assert!(sim.ready_queue().contains(1));

        assert_eq!(sim.step(), RunStatus::Running);
        assert_eq!(sim.now(), 1);
        assert_eq!(sim.running(), Some(1));
        assert_eq!(sim.task(1).unwrap().time_last_started, Some(1));

        let report = sim.run_to_end();
        assert_eq!(report.result.preemptions(), Some(&[0, 0][..]));
    }

    #[test]
    fn test_step_after_verdict_is_noop() {
        let mut sim = Simulation::new(&specs(&[(2.0, 5.0, 5.0)]), unit_config()).unwrap();
        while !sim.step().is_done() {}

        let events = sim.trace().len();
        assert_eq!(sim.step(), RunStatus::Feasible);
        assert_eq!(sim.status(), RunStatus::Feasible);
        assert_eq!(sim.trace().len(), events);
    }

    #[test]
    fn test_unfinished_run_has_no_report() {
        let mut sim = Simulation::new(&specs(&[(2.0, 5.0, 5.0)]), unit_config()).unwrap();
        assert!(sim.clone().into_report().is_none());

        assert_eq!(sim.step(), RunStatus::Running);
        assert!(sim.clone().into_report().is_none());

        while !sim.step().is_done() {}
        let report = sim.into_report().unwrap();
        assert_eq!(report.result.preemptions(), Some(&[0][..]));
    }

    #[test]
    fn test_fractional_parameters() {
        // Periods 1.5 and 2.5: H = 7.5 units = 7500 ticks.
        let report = run_with_config(
            &specs(&[(0.5, 1.5, 1.5), (0.75, 2.5, 2.5)]),
            SimulationConfig::new(),
        )
        .unwrap();

        assert_eq!(report.hyperperiod, 7500);
        assert!(report.result.is_feasible());
    }

    #[test]
    fn test_empty_task_set_rejected() {
        assert_eq!(run(&[]), Err(SimError::EmptyTaskSet));
    }

    #[test]
    fn test_invalid_time_scale_rejected() {
        let err = Simulation::new(
            &specs(&[(1.0, 2.0, 2.0)]),
            SimulationConfig::new().with_time_scale(0),
        )
        .unwrap_err();
        assert_eq!(err, SimError::InvalidTimeScale);
    }

    #[test]
    fn test_trace_off_by_default() {
        let report = run_with_config(&specs(&[(1.0, 2.0, 2.0)]), SimulationConfig::new()).unwrap();
        assert!(report.trace.is_empty());
        assert!(report.events_processed > 0);
    }

    #[test]
    fn test_deterministic() {
        let tasks = specs(&[(1.0, 3.0, 3.0), (1.0, 4.0, 4.0), (2.0, 12.0, 12.0)]);
        let a = run_with_config(&tasks, unit_config()).unwrap();
        let b = run_with_config(&tasks, unit_config()).unwrap();

        assert_eq!(a.result, b.result);
        assert_eq!(a.tasks, b.tasks);
        assert_eq!(a.trace, b.trace);
        assert_eq!(a.events_processed, b.events_processed);
    }

    #[test]
    fn test_trace_is_time_ordered() {
        let report = traced(&[(1.0, 3.0, 3.0), (1.0, 4.0, 4.0), (2.0, 12.0, 12.0)]);
        assert!(report
            .trace
            .windows(2)
            .all(|w| w[0].time() <= w[1].time()));
    }

    #[test]
    fn test_harmonic_under_full_utilization_feasible() {
        let mut rng = SmallRng::seed_from_u64(455);
        for _ in 0..200 {
            let n = rng.random_range(1..=6);
            let target = rng.random_range(0.1..=1.0);
            let tasks = generate_harmonic(&mut rng, n, target);

            let result = run(&tasks).unwrap();
            assert!(result.is_feasible(), "harmonic set not feasible: {tasks:?}");
            assert_eq!(result.preemptions().map(|p| p.len()), Some(n));
        }
    }
}

//! Rate-monotonic priority assignment
//!
//! Priorities are computed from the declared periods instead of being
//! written down by hand, so retuning a period cannot leave a stale priority
//! behind.
//!
//! Rule, most urgent first:
//! 1. `Supervisor` tasks, then `RateMonotonic` tasks, then `Background` tasks
//! 2. within a class, shorter period first
//! 3. equal periods: earlier declaration first

use heapless::Vec;

/// Maximum number of tasks in a task set
pub const MAX_TASKS: usize = 8;

/// Liu & Layland utilization bound `n(2^(1/n) - 1)` in parts per million,
/// indexed by `n - 1`
const RM_BOUND_PPM: [u32; MAX_TASKS] = [
    1_000_000, 828_427, 779_763, 756_828, 743_492, 734_772, 728_627, 724_062,
];

/// Priority band a task is assigned within
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PriorityClass {
    /// Above every other task regardless of period (watchdog monitor)
    Supervisor,
    /// Ordered by period among the deadline-bearing tasks
    RateMonotonic,
    /// Below every other task regardless of period (canary, synthetic load)
    Background,
}

impl PriorityClass {
    fn band(self) -> u8 {
        match self {
            PriorityClass::Supervisor => 0,
            PriorityClass::RateMonotonic => 1,
            PriorityClass::Background => 2,
        }
    }
}

/// Static description of a periodic task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskSpec {
    /// Task name (for logs)
    pub name: &'static str,
    /// Release period in milliseconds
    pub period_ms: u32,
    /// Priority band
    pub class: PriorityClass,
    /// Estimated worst-case execution time in microseconds
    pub wcet_us: u32,
}

impl TaskSpec {
    /// Create a task description
    pub const fn new(name: &'static str, period_ms: u32, class: PriorityClass, wcet_us: u32) -> Self {
        Self {
            name,
            period_ms,
            class,
            wcet_us,
        }
    }

    /// CPU share of this task in parts per million
    pub fn utilization_ppm(&self) -> u32 {
        if self.period_ms == 0 {
            return 0;
        }
        let ppm = u64::from(self.wcet_us) * 1_000 / u64::from(self.period_ms);
        ppm.min(u64::from(u32::MAX)) as u32
    }
}

/// Task priority (larger = more urgent)
///
/// Ranks run from 1 (least urgent) to the number of tasks in the set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Priority(pub u8);

/// Assign a priority to every task, in declaration order
///
/// Only the first [`MAX_TASKS`] entries are considered.
pub fn assign_priorities(tasks: &[TaskSpec]) -> Vec<Priority, MAX_TASKS> {
    let count = tasks.len().min(MAX_TASKS);

    let mut order: Vec<usize, MAX_TASKS> = (0..count).collect();
    order.sort_unstable_by_key(|&i| (tasks[i].class.band(), tasks[i].period_ms, i));

    let mut priorities: Vec<Priority, MAX_TASKS> =
        core::iter::repeat(Priority(0)).take(count).collect();
    for (position, &index) in order.iter().enumerate() {
        priorities[index] = Priority((count - position) as u8);
    }
    priorities
}

/// Collapse a priority rank onto one of `level_count` preemption levels
///
/// Level 0 is the least urgent. With enough levels every rank gets its own.
/// Otherwise the least urgent task keeps level 0 to itself and the most
/// urgent the top level, so background load always preempts the canary and
/// the monitor preempts everything. The ranks in between are spread over the
/// remaining levels rounding up, which pushes any sharing towards the short
/// high-rate tasks.
pub fn executor_level(priority: Priority, task_count: usize, level_count: u8) -> u8 {
    let levels = usize::from(level_count);
    if task_count == 0 || levels <= 1 {
        return 0;
    }
    let rank = usize::from(priority.0).clamp(1, task_count);
    if task_count <= levels {
        return (rank - 1) as u8;
    }
    if rank == 1 {
        return 0;
    }
    if rank == task_count || levels == 2 {
        return (levels - 1) as u8;
    }

    // task_count > levels >= 3, so both spans are at least one wide
    let middle_ranks = task_count - 2;
    let middle_levels = levels - 2;
    let spread = ((rank - 2) * (middle_levels - 1)).div_ceil(middle_ranks - 1);
    (1 + spread) as u8
}

/// Fixed set of periodic tasks
#[derive(Debug, Clone, Default)]
pub struct TaskSet {
    tasks: Vec<TaskSpec, MAX_TASKS>,
}

impl TaskSet {
    /// Create an empty task set
    pub const fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Declare a task; returns its index, or hands it back if the set is full
    pub fn push(&mut self, spec: TaskSpec) -> Result<usize, TaskSpec> {
        self.tasks.push(spec)?;
        Ok(self.tasks.len() - 1)
    }

    /// Declared tasks, in declaration order
    pub fn tasks(&self) -> &[TaskSpec] {
        &self.tasks
    }

    /// Number of declared tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no task has been declared
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Priorities, in declaration order
    pub fn priorities(&self) -> Vec<Priority, MAX_TASKS> {
        assign_priorities(&self.tasks)
    }

    /// Priority of the task declared at `index`
    pub fn priority_of(&self, index: usize) -> Option<Priority> {
        self.priorities().get(index).copied()
    }

    /// Preemption level of the task declared at `index`
    pub fn executor_level_of(&self, index: usize, level_count: u8) -> Option<u8> {
        self.priority_of(index)
            .map(|p| executor_level(p, self.tasks.len(), level_count))
    }

    /// Combined utilization of the rate-monotonic tasks in parts per million
    pub fn rm_utilization_ppm(&self) -> u32 {
        self.rm_tasks()
            .fold(0u32, |total, t| total.saturating_add(t.utilization_ppm()))
    }

    /// Check the rate-monotonic tasks against the Liu & Layland bound
    ///
    /// Passing is sufficient for schedulability, failing is not proof of a
    /// deadline miss.
    pub fn within_rm_bound(&self) -> bool {
        let n = self.rm_tasks().count();
        if n == 0 {
            return true;
        }
        self.rm_utilization_ppm() <= RM_BOUND_PPM[n - 1]
    }

    fn rm_tasks(&self) -> impl Iterator<Item = &TaskSpec> {
        self.tasks
            .iter()
            .filter(|t| t.class == PriorityClass::RateMonotonic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rm(name: &'static str, period_ms: u32) -> TaskSpec {
        TaskSpec::new(name, period_ms, PriorityClass::RateMonotonic, 1_000)
    }

    #[test]
    fn test_shorter_period_gets_higher_priority() {
        let tasks = [rm("slow", 500), rm("fast", 50), rm("mid", 200)];
        let p = assign_priorities(&tasks);
        assert_eq!(p.as_slice(), &[Priority(1), Priority(3), Priority(2)]);
    }

    #[test]
    fn test_ties_broken_by_declaration_order() {
        let tasks = [rm("first", 100), rm("second", 100)];
        let p = assign_priorities(&tasks);
        assert!(p[0] > p[1]);
    }

    #[test]
    fn test_reference_task_set() {
        let tasks = [
            rm("input", 50),
            rm("vehicle", 100),
            rm("control", 200),
            rm("display", 500),
            TaskSpec::new("monitor", 1_000, PriorityClass::Supervisor, 50),
            TaskSpec::new("load", 25, PriorityClass::Background, 25_000),
            TaskSpec::new("canary", 25, PriorityClass::Background, 20),
        ];
        let p = assign_priorities(&tasks);
        assert_eq!(
            p.as_slice(),
            &[
                Priority(6),
                Priority(5),
                Priority(4),
                Priority(3),
                Priority(7),
                Priority(2),
                Priority(1),
            ]
        );
    }

    fn levels(task_count: usize, level_count: u8) -> std::vec::Vec<u8> {
        (1..=task_count as u8)
            .map(|rank| executor_level(Priority(rank), task_count, level_count))
            .collect()
    }

    #[test]
    fn test_executor_level_isolates_ends() {
        // Canary, load, display, control, vehicle, input, monitor
        assert_eq!(levels(7, 5), [0, 1, 2, 2, 3, 3, 4]);
        assert_eq!(levels(7, 4), [0, 1, 2, 2, 2, 2, 3]);
        assert_eq!(levels(7, 3), [0, 1, 1, 1, 1, 1, 2]);
        assert_eq!(levels(7, 2), [0, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_executor_level_one_per_rank_when_levels_suffice() {
        assert_eq!(levels(4, 5), [0, 1, 2, 3]);
        assert_eq!(levels(5, 5), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_executor_level_single_level() {
        assert_eq!(executor_level(Priority(5), 7, 1), 0);
        assert_eq!(executor_level(Priority(1), 0, 4), 0);
    }

    #[test]
    fn test_task_set_push_until_full() {
        let mut set = TaskSet::new();
        for i in 0..MAX_TASKS {
            assert_eq!(set.push(rm("t", 10 + i as u32)), Ok(i));
        }
        assert!(set.push(rm("overflow", 1)).is_err());
        assert_eq!(set.len(), MAX_TASKS);
    }

    #[test]
    fn test_rm_utilization_ignores_other_classes() {
        let mut set = TaskSet::new();
        set.push(TaskSpec::new("a", 100, PriorityClass::RateMonotonic, 10_000))
            .unwrap();
        set.push(TaskSpec::new("b", 25, PriorityClass::Background, 25_000))
            .unwrap();
        assert_eq!(set.rm_utilization_ppm(), 100_000);
        assert!(set.within_rm_bound());
    }

    #[test]
    fn test_rm_bound_exceeded() {
        let mut set = TaskSet::new();
        set.push(TaskSpec::new("a", 10, PriorityClass::RateMonotonic, 5_000))
            .unwrap();
        set.push(TaskSpec::new("b", 10, PriorityClass::RateMonotonic, 4_000))
            .unwrap();
        // 90% > 82.8% for two tasks
        assert!(!set.within_rm_bound());
    }

    #[test]
    fn test_assign_priorities_caps_at_max_tasks() {
        let tasks: std::vec::Vec<TaskSpec> =
            (0..MAX_TASKS as u32 + 2).map(|i| rm("t", 10 + i)).collect();
        let p = assign_priorities(&tasks);
        assert_eq!(p.len(), MAX_TASKS);
        assert_eq!(p[0], Priority(MAX_TASKS as u8));
        assert_eq!(p[MAX_TASKS - 1], Priority(1));
    }

    proptest! {
        #[test]
        fn prop_lowest_rank_alone_on_level_zero(
            task_count in 2usize..=MAX_TASKS,
            level_count in 2u8..=8
        ) {
            let map = levels(task_count, level_count);
            prop_assert_eq!(map[0], 0);
            prop_assert!(map[1..].iter().all(|&l| l >= 1));
            prop_assert!(map.windows(2).all(|w| w[0] <= w[1]));
            prop_assert!(map.iter().all(|&l| l < level_count));
            if level_count >= 3 || task_count <= usize::from(level_count) {
                // Top rank is alone as well
                prop_assert!(map[task_count - 1] > map[task_count - 2]);
            }
        }

        #[test]
        fn prop_priorities_are_a_permutation(periods in proptest::collection::vec(1u32..1_000, 1..=MAX_TASKS)) {
            let tasks: std::vec::Vec<TaskSpec> = periods.iter().map(|&p| rm("t", p)).collect();
            let p = assign_priorities(&tasks);
            let mut ranks: std::vec::Vec<u8> = p.iter().map(|p| p.0).collect();
            ranks.sort_unstable();
            let expected: std::vec::Vec<u8> = (1..=tasks.len() as u8).collect();
            prop_assert_eq!(ranks, expected);
        }

        #[test]
        fn prop_rate_monotonic_order(periods in proptest::collection::vec(1u32..1_000, 2..=MAX_TASKS)) {
            let tasks: std::vec::Vec<TaskSpec> = periods.iter().map(|&p| rm("t", p)).collect();
            let p = assign_priorities(&tasks);
            for i in 0..tasks.len() {
                for j in 0..tasks.len() {
                    if tasks[i].period_ms < tasks[j].period_ms {
                        prop_assert!(p[i] > p[j]);
                    }
                }
            }
        }
    }
}

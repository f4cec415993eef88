//! Configuration type definitions

use crate::display::LeftReadout;
use crate::task::{PriorityClass, TaskSet, TaskSpec, MAX_TASKS};

const _: () = assert!(TaskId::ALL.len() <= MAX_TASKS);

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Unknown or malformed section header (line number)
    InvalidSection(u16),
    /// Key not valid in its section (line number)
    UnknownKey(u16),
    /// Value of the wrong type or out of range (line number)
    InvalidValue(u16),
    /// Line without `=` or with nothing after it (line number)
    MissingValue(u16),
    /// A task was given a zero period
    ZeroPeriod(TaskId),
    /// Watchdog timeout not longer than two canary periods
    WatchdogTooShort,
    /// Filter coefficient above 100%
    AlphaOutOfRange,
    /// Rate-monotonic tasks need more than the whole CPU
    Overutilized,
}

/// Periodic tasks, in declaration order
///
/// Declaration order is the rate-monotonic tie-break: the load generator is
/// declared before the canary so the canary ends up as the least urgent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskId {
    Input,
    Vehicle,
    Control,
    Display,
    Monitor,
    Load,
    Canary,
}

impl TaskId {
    /// All tasks, in declaration order
    pub const ALL: [TaskId; 7] = [
        TaskId::Input,
        TaskId::Vehicle,
        TaskId::Control,
        TaskId::Display,
        TaskId::Monitor,
        TaskId::Load,
        TaskId::Canary,
    ];

    /// Task name for logs
    pub const fn name(self) -> &'static str {
        match self {
            TaskId::Input => "input",
            TaskId::Vehicle => "vehicle",
            TaskId::Control => "control",
            TaskId::Display => "display",
            TaskId::Monitor => "monitor",
            TaskId::Load => "load",
            TaskId::Canary => "canary",
        }
    }

    /// Priority band of the task
    pub const fn class(self) -> PriorityClass {
        match self {
            TaskId::Monitor => PriorityClass::Supervisor,
            TaskId::Load | TaskId::Canary => PriorityClass::Background,
            _ => PriorityClass::RateMonotonic,
        }
    }

    /// Estimated worst-case execution time (µs)
    ///
    /// The load generator's figure is its busy-wait ceiling.
    pub const fn wcet_us(self) -> u32 {
        match self {
            TaskId::Input => 200,
            TaskId::Vehicle => 300,
            TaskId::Control => 100,
            TaskId::Display => 2_000,
            TaskId::Monitor => 50,
            TaskId::Load => 25_000,
            TaskId::Canary => 20,
        }
    }
}

/// Task periods in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskPeriods {
    /// Pedal/switch sampling
    pub input_ms: u16,
    /// Vehicle dynamics
    pub vehicle_ms: u16,
    /// Cruise/throttle controller
    pub control_ms: u16,
    /// Dashboard refresh
    pub display_ms: u16,
    /// Overload canary
    pub canary_ms: u16,
    /// Synthetic load generator
    pub load_ms: u16,
}

impl Default for TaskPeriods {
    fn default() -> Self {
        Self {
            input_ms: 50,
            vehicle_ms: 100,
            control_ms: 200,
            display_ms: 500,
            canary_ms: 25,
            load_ms: 25,
        }
    }
}

/// Watchdog monitor configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct WatchdogConfig {
    /// Heartbeat wait timeout (ms)
    pub timeout_ms: u32,
}

impl Default for WatchdogConfig {
    fn default() -> Self {
        Self { timeout_ms: 1_000 }
    }
}

/// Where the terrain gradient comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TerrainKind {
    /// Static six-segment track profile
    #[default]
    Profile,
    /// Slope measured by the on-board accelerometer
    Accelerometer,
}

/// Terrain configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TerrainConfig {
    /// Terrain source
    pub source: TerrainKind,
    /// Accelerometer low-pass coefficient (percent, 0..=100)
    pub filter_alpha_pct: u8,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            source: TerrainKind::Profile,
            filter_alpha_pct: 20,
        }
    }
}

impl TerrainConfig {
    /// Filter coefficient as a fraction
    pub fn filter_alpha(&self) -> f32 {
        f32::from(self.filter_alpha_pct) / 100.0
    }
}

/// Complete firmware configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CruiseConfig {
    /// Task periods
    pub tasks: TaskPeriods,
    /// Watchdog settings
    pub watchdog: WatchdogConfig,
    /// Terrain source selection
    pub terrain: TerrainConfig,
}

impl CruiseConfig {
    /// Create the default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Period of a task in milliseconds
    pub fn period_ms(&self, task: TaskId) -> u32 {
        let t = &self.tasks;
        match task {
            TaskId::Input => u32::from(t.input_ms),
            TaskId::Vehicle => u32::from(t.vehicle_ms),
            TaskId::Control => u32::from(t.control_ms),
            TaskId::Display => u32::from(t.display_ms),
            TaskId::Monitor => self.watchdog.timeout_ms,
            TaskId::Load => u32::from(t.load_ms),
            TaskId::Canary => u32::from(t.canary_ms),
        }
    }

    /// Task set in [`TaskId`] declaration order
    pub fn task_set(&self) -> TaskSet {
        let mut set = TaskSet::new();
        for task in TaskId::ALL {
            let spec = TaskSpec::new(
                task.name(),
                self.period_ms(task),
                task.class(),
                task.wcet_us(),
            );
            set.push(spec)
                .unwrap_or_else(|_| unreachable!("every task fits in MAX_TASKS"));
        }
        set
    }

    /// Preemption level of `task` when `level_count` levels are available
    pub fn executor_level(&self, task: TaskId, level_count: u8) -> u8 {
        self.task_set()
            .executor_level_of(task as usize, level_count)
            .unwrap_or(0)
    }

    /// What the left digit pair of the dashboard shows
    pub fn left_readout(&self) -> LeftReadout {
        match self.terrain.source {
            TerrainKind::Profile => LeftReadout::Throttle,
            TerrainKind::Accelerometer => LeftReadout::Slope,
        }
    }

    /// Check the configuration for values the firmware cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        for task in TaskId::ALL {
            if self.period_ms(task) == 0 {
                return Err(ConfigError::ZeroPeriod(task));
            }
        }

        if self.watchdog.timeout_ms <= 2 * u32::from(self.tasks.canary_ms) {
            return Err(ConfigError::WatchdogTooShort);
        }

        if self.terrain.filter_alpha_pct > 100 {
            return Err(ConfigError::AlphaOutOfRange);
        }

        if self.task_set().rm_utilization_ppm() > 1_000_000 {
            return Err(ConfigError::Overutilized);
        }

        Ok(())
    }
}

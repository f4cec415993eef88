//! Tempomat - Cruise Control Firmware
//!
//! Main firmware binary for the RP2040 lab board. A rate-monotonic set of
//! periodic tasks simulates a car on a looping track, holds a set speed
//! when cruise is engaged, and watches its own CPU headroom with a
//! canary/watchdog pair.
//!
//! Task priorities are computed from the configured periods and mapped onto
//! five embassy executors: thread mode plus one interrupt executor on a
//! software IRQ for each of the four NVIC priorities.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::{Executor, InterruptExecutor, SendSpawner, SpawnToken, Spawner};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::interrupt;
use embassy_rp::interrupt::{InterruptExt, Priority};
use embassy_rp::peripherals::I2C0;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use tempomat_core::config::{parse_config, CruiseConfig, TaskId, TerrainKind};
use tempomat_core::display::LeftReadout;
use tempomat_core::vehicle::{AccelerometerTerrain, TerrainProfile};
use tempomat_drivers::accelerometer::{DataRate, FullScale, Mma8452q};
use tempomat_drivers::indicator::{DashboardLeds, LedIndicator};
use tempomat_drivers::input::{LoadSwitches, PedalSwitches};

mod channels;
mod clock;
mod leds;
mod tasks;

/// Embedded configuration (compiled into firmware)
/// Edit cruise.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../cruise.toml");

/// Thread mode plus one interrupt executor per NVIC priority
const EXECUTOR_LEVELS: u8 = 5;

type SensorTerrain = AccelerometerTerrain<Mma8452q<I2c<'static, I2C0, i2c::Blocking>>>;

// Executor per level; a higher level preempts all lower ones
static EXECUTOR_THREAD: StaticCell<Executor> = StaticCell::new();
static EXECUTOR_P3: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_P2: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_P1: InterruptExecutor = InterruptExecutor::new();
static EXECUTOR_P0: InterruptExecutor = InterruptExecutor::new();

// Terrain strategies (must live forever for the vehicle task)
static PROFILE_TERRAIN: StaticCell<TerrainProfile> = StaticCell::new();
static SENSOR_TERRAIN: StaticCell<SensorTerrain> = StaticCell::new();

#[interrupt]
unsafe fn SWI_IRQ_0() {
    EXECUTOR_P3.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_1() {
    EXECUTOR_P2.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_2() {
    EXECUTOR_P1.on_interrupt()
}

#[interrupt]
unsafe fn SWI_IRQ_3() {
    EXECUTOR_P0.on_interrupt()
}

/// Spawners for every executor level
struct Spawners {
    thread: Spawner,
    interrupt: [SendSpawner; EXECUTOR_LEVELS as usize - 1],
}

impl Spawners {
    fn spawn<S: Send>(&self, level: u8, token: SpawnToken<S>) {
        let result = match level {
            0 => self.thread.spawn(token),
            n => {
                let top = self.interrupt.len() - 1;
                self.interrupt[usize::from(n - 1).min(top)].spawn(token)
            }
        };
        unwrap!(result);
    }
}

#[cortex_m_rt::entry]
fn main() -> ! {
    info!("Tempomat firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = load_config();
    let task_set = config.task_set();
    let priorities = task_set.priorities();
    let levels = TaskId::ALL.map(|task| config.executor_level(task, EXECUTOR_LEVELS));
    let level_of = |task: TaskId| levels[task as usize];

    for task in TaskId::ALL {
        info!(
            "{=str}: period {=u32} ms, priority {=u8}, executor level {=u8}",
            task.name(),
            config.period_ms(task),
            priorities[task as usize].0,
            level_of(task)
        );
    }
    if !task_set.within_rm_bound() {
        warn!(
            "Task utilization {=u32} ppm is above the rate-monotonic bound",
            task_set.rm_utilization_ppm()
        );
    }

    // Start the interrupt executors, most urgent gets the highest NVIC priority
    interrupt::SWI_IRQ_3.set_priority(Priority::P0);
    let p0 = EXECUTOR_P0.start(interrupt::SWI_IRQ_3);
    interrupt::SWI_IRQ_2.set_priority(Priority::P1);
    let p1 = EXECUTOR_P1.start(interrupt::SWI_IRQ_2);
    interrupt::SWI_IRQ_1.set_priority(Priority::P2);
    let p2 = EXECUTOR_P2.start(interrupt::SWI_IRQ_1);
    interrupt::SWI_IRQ_0.set_priority(Priority::P3);
    let p3 = EXECUTOR_P3.start(interrupt::SWI_IRQ_0);

    // Pedals and cruise button, active low (SW_7 gas, SW_5 brake, SW_6 cruise)
    let pedals = PedalSwitches::new(
        Input::new(p.PIN_16, Pull::Up),
        Input::new(p.PIN_22, Pull::Up),
        Input::new(p.PIN_15, Pull::Up),
    );

    // Load selector SW_17..SW_10, bit 0 first
    let load_switches = LoadSwitches::new([
        Input::new(p.PIN_14, Pull::None),
        Input::new(p.PIN_13, Pull::None),
        Input::new(p.PIN_3, Pull::None),
        Input::new(p.PIN_2, Pull::None),
        Input::new(p.PIN_29, Pull::None),
        Input::new(p.PIN_28, Pull::None),
        Input::new(p.PIN_27, Pull::None),
        Input::new(p.PIN_26, Pull::None),
    ]);
    info!("Switches initialized");

    leds::install(DashboardLeds::new(
        LedIndicator::new_active_high(Output::new(p.PIN_25, Level::Low)),
        LedIndicator::new_active_high(Output::new(p.PIN_24, Level::Low)),
        LedIndicator::new_active_high(Output::new(p.PIN_23, Level::Low)),
    ));
    info!("LEDs initialized");

    // Terrain strategy; the accelerometer falls back to the profile if absent
    let (terrain, readout): (tasks::Terrain, LeftReadout) = match config.terrain.source {
        TerrainKind::Profile => {
            info!("Terrain: fixed track profile");
            (PROFILE_TERRAIN.init(TerrainProfile), config.left_readout())
        }
        TerrainKind::Accelerometer => {
            let bus = I2c::new_blocking(p.I2C0, p.PIN_21, p.PIN_20, i2c::Config::default());
            let mut sensor = Mma8452q::new(bus);
            match sensor.init(FullScale::G2, DataRate::Hz50) {
                Ok(()) => {
                    info!("Terrain: MMA8452Q accelerometer");
                    let terrain =
                        AccelerometerTerrain::with_alpha(sensor, config.terrain.filter_alpha());
                    (SENSOR_TERRAIN.init(terrain), config.left_readout())
                }
                Err(e) => {
                    error!("Accelerometer init failed: {}", e);
                    warn!("Falling back to the fixed track profile");
                    (PROFILE_TERRAIN.init(TerrainProfile), LeftReadout::Throttle)
                }
            }
        }
    };

    let executor = EXECUTOR_THREAD.init(Executor::new());
    executor.run(move |thread| {
        let spawners = Spawners {
            thread,
            interrupt: [p3, p2, p1, p0],
        };

        spawners.spawn(
            level_of(TaskId::Monitor),
            tasks::monitor_task(config.watchdog.timeout_ms),
        );
        spawners.spawn(
            level_of(TaskId::Input),
            tasks::input_task(pedals, load_switches, config.period_ms(TaskId::Input)),
        );
        spawners.spawn(
            level_of(TaskId::Vehicle),
            tasks::vehicle_task(terrain, config.tasks.vehicle_ms),
        );
        spawners.spawn(
            level_of(TaskId::Control),
            tasks::control_task(config.period_ms(TaskId::Control)),
        );
        spawners.spawn(
            level_of(TaskId::Display),
            tasks::display_task(readout, config.period_ms(TaskId::Display)),
        );
        spawners.spawn(
            level_of(TaskId::Load),
            tasks::load_task(config.period_ms(TaskId::Load)),
        );
        spawners.spawn(
            level_of(TaskId::Canary),
            tasks::canary_task(config.period_ms(TaskId::Canary)),
        );

        info!("All tasks spawned, firmware running");
    })
}

/// Parse and validate the embedded configuration
///
/// build.rs already rejects a bad cruise.toml, so the fallback only guards
/// against the two parsers disagreeing.
fn load_config() -> CruiseConfig {
    match parse_config(EMBEDDED_CONFIG).and_then(|config| config.validate().map(|()| config)) {
        Ok(config) => {
            info!("Parsed embedded configuration successfully");
            config
        }
        Err(e) => {
            error!("Invalid embedded config: {}", e);
            error!("Using default configuration");
            CruiseConfig::default()
        }
    }
}

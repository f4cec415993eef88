//! Build script for tempomat-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates cruise.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CruiseToml {
    #[serde(default)]
    tasks: TasksToml,
    #[serde(default)]
    watchdog: WatchdogToml,
    #[serde(default)]
    terrain: TerrainToml,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TasksToml {
    input_ms: Option<u16>,
    vehicle_ms: Option<u16>,
    control_ms: Option<u16>,
    display_ms: Option<u16>,
    canary_ms: Option<u16>,
    load_ms: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct WatchdogToml {
    timeout_ms: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TerrainToml {
    source: Option<String>,
    filter_alpha_pct: Option<u8>,
}

/// Validate cruise.toml configuration at compile time
fn validate_config() {
    // Re-run if cruise.toml changes
    println!("cargo:rerun-if-changed=cruise.toml");

    let config_path = Path::new("cruise.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: cruise.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds cruise.toml at build time.                  ║\n\
            ║  Please create one in the tempomat-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read cruise.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Syntax, key names and value types
    let config: CruiseToml = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid cruise.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = check_values(&config);
    if !errors.is_empty() {
        report("Invalid values in cruise.toml", &errors);
    }

    // The firmware reads the file with its own minimal parser; make sure it
    // agrees with the full TOML parser above
    match tempomat_core::config::parse_config(&config_content) {
        Ok(parsed) => {
            if let Err(e) = parsed.validate() {
                report(
                    "cruise.toml rejected by firmware validation",
                    &[format!("{:?}", e)],
                );
            }
        }
        Err(e) => report(
            "cruise.toml rejected by firmware parser",
            &[format!("{:?}", e)],
        ),
    }

    println!("cargo:warning=cruise.toml validated successfully");
}

/// Range checks the TOML types cannot express
fn check_values(config: &CruiseToml) -> Vec<String> {
    let mut errors = Vec::new();
    let tasks = &config.tasks;

    let periods = [
        ("input_ms", tasks.input_ms),
        ("vehicle_ms", tasks.vehicle_ms),
        ("control_ms", tasks.control_ms),
        ("display_ms", tasks.display_ms),
        ("canary_ms", tasks.canary_ms),
        ("load_ms", tasks.load_ms),
    ];
    for (name, period) in periods {
        if period == Some(0) {
            errors.push(format!("[tasks] {} must be greater than 0", name));
        }
    }

    let canary_ms = u32::from(tasks.canary_ms.unwrap_or(25));
    let timeout_ms = config.watchdog.timeout_ms.unwrap_or(1_000);
    if timeout_ms <= 2 * canary_ms {
        errors.push(format!(
            "[watchdog] timeout_ms ({}) must exceed 2 x canary_ms ({})",
            timeout_ms,
            2 * canary_ms
        ));
    }

    if let Some(source) = &config.terrain.source {
        if !["profile", "accelerometer"].contains(&source.as_str()) {
            errors.push(format!(
                "[terrain] source must be 'profile' or 'accelerometer', got '{}'",
                source
            ));
        }
    }

    if let Some(alpha) = config.terrain.filter_alpha_pct {
        if alpha > 100 {
            errors.push(format!("[terrain] filter_alpha_pct must be 0-100, got {}", alpha));
        }
    }

    errors
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = match line.char_indices().nth(61) {
                Some((cut, _)) if line.chars().count() > 64 => format!("{}...", &line[..cut]),
                _ => line.to_string(),
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

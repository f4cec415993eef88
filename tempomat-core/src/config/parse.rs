//! Minimal TOML reader for the firmware configuration
//!
//! Handles only the subset the configuration uses, without allocating:
//! - `[section]` headers
//! - `key = value` with unsigned integer or double-quoted string values
//! - `#` comments, whole-line or trailing
//!
//! Keys that are not set keep their default value.

use super::types::{ConfigError, CruiseConfig, TerrainKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Tasks,
    Watchdog,
    Terrain,
}

/// Parse a configuration file
///
/// The result is not validated; call [`CruiseConfig::validate`] on it.
pub fn parse_config(input: &str) -> Result<CruiseConfig, ConfigError> {
    let mut config = CruiseConfig::default();
    let mut section = Section::Root;

    for (index, raw) in input.lines().enumerate() {
        let line_no = u16::try_from(index + 1).unwrap_or(u16::MAX);
        let line = strip_comment(raw).trim();

        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(ConfigError::InvalidSection(line_no))?;
            section = match name.trim() {
                "tasks" => Section::Tasks,
                "watchdog" => Section::Watchdog,
                "terrain" => Section::Terrain,
                _ => return Err(ConfigError::InvalidSection(line_no)),
            };
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(ConfigError::MissingValue(line_no))?;
        let key = key.trim();
        let value = value.trim();
        if value.is_empty() {
            return Err(ConfigError::MissingValue(line_no));
        }

        apply(&mut config, section, key, value, line_no)?;
    }

    Ok(config)
}

fn apply(
    config: &mut CruiseConfig,
    section: Section,
    key: &str,
    value: &str,
    line_no: u16,
) -> Result<(), ConfigError> {
    let tasks = &mut config.tasks;
    match (section, key) {
        (Section::Tasks, "input_ms") => tasks.input_ms = parse_int(value, line_no)?,
        (Section::Tasks, "vehicle_ms") => tasks.vehicle_ms = parse_int(value, line_no)?,
        (Section::Tasks, "control_ms") => tasks.control_ms = parse_int(value, line_no)?,
        (Section::Tasks, "display_ms") => tasks.display_ms = parse_int(value, line_no)?,
        (Section::Tasks, "canary_ms") => tasks.canary_ms = parse_int(value, line_no)?,
        (Section::Tasks, "load_ms") => tasks.load_ms = parse_int(value, line_no)?,

        (Section::Watchdog, "timeout_ms") => {
            config.watchdog.timeout_ms = parse_int(value, line_no)?
        }

        (Section::Terrain, "source") => {
            config.terrain.source = match parse_str(value, line_no)? {
                "profile" => TerrainKind::Profile,
                "accelerometer" => TerrainKind::Accelerometer,
                _ => return Err(ConfigError::InvalidValue(line_no)),
            }
        }
        (Section::Terrain, "filter_alpha_pct") => {
            config.terrain.filter_alpha_pct = parse_int(value, line_no)?
        }

        _ => return Err(ConfigError::UnknownKey(line_no)),
    }
    Ok(())
}

/// Drop a trailing `#` comment that is not inside a string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_int<T: TryFrom<u64>>(value: &str, line_no: u16) -> Result<T, ConfigError> {
    // TOML allows `_` as a digit separator
    let mut n: u64 = 0;
    let mut digits = 0;
    for c in value.chars() {
        match c {
            '0'..='9' => {
                n = n
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(u64::from(c as u8 - b'0')))
                    .ok_or(ConfigError::InvalidValue(line_no))?;
                digits += 1;
            }
            '_' if digits > 0 => {}
            _ => return Err(ConfigError::InvalidValue(line_no)),
        }
    }
    if digits == 0 {
        return Err(ConfigError::InvalidValue(line_no));
    }
    T::try_from(n).map_err(|_| ConfigError::InvalidValue(line_no))
}

fn parse_str(value: &str, line_no: u16) -> Result<&str, ConfigError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ConfigError::InvalidValue(line_no))
}

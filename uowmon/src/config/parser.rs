//! INI parsing logic for converting `Ini` -> `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields. Parsing starts from `ConfigFile::default()` and overlays any
//! values found in the INI.

use ini::Ini;
use std::path::PathBuf;

use super::file::ConfigFileError;
use super::settings::ConfigFile;

pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [monitor] section
    if let Some(section) = ini.section(Some("monitor")) {
        if let Some(v) = section.get("heartbeat_seconds") {
            config.monitor.heartbeat_seconds =
                v.parse().map_err(|_| invalid("monitor", "heartbeat_seconds", v, "expected a whole number of seconds"))?;
        }
        if let Some(v) = nonblank(section.get("max_load_average")) {
            let parsed: f64 = v
                .parse()
                .map_err(|_| invalid("monitor", "max_load_average", v, "expected a number"))?;
            if parsed <= 0.0 {
                return Err(invalid("monitor", "max_load_average", v, "must be positive"));
            }
            config.monitor.max_load_average = Some(parsed);
        }
    }

    // [queues] section
    if let Some(section) = ini.section(Some("queues")) {
        if let Some(v) = nonblank(section.get("root")) {
            config.queues.root = PathBuf::from(v);
        }
        for (key, field) in [
            ("wait", &mut config.queues.wait),
            ("priority", &mut config.queues.priority),
            ("executing", &mut config.queues.executing),
            ("done", &mut config.queues.done),
            ("error", &mut config.queues.error),
            ("fail", &mut config.queues.fail),
            ("trash", &mut config.queues.trash),
        ] {
            if let Some(v) = nonblank(section.get(key)) {
                if v.contains('/') {
                    return Err(invalid("queues", key, v, "must be a single path component"));
                }
                *field = v.to_string();
            }
        }
    }

    // [control] section
    if let Some(section) = ini.section(Some("control")) {
        if let Some(v) = nonblank(section.get("incoming")) {
            config.control.incoming = PathBuf::from(v);
        }
        if let Some(v) = nonblank(section.get("outgoing")) {
            config.control.outgoing = PathBuf::from(v);
        }
    }

    // [timeouts] section: `default` plus one key per program basename.
    if let Some(section) = ini.section(Some("timeouts")) {
        for (key, value) in section.iter() {
            let secs: u64 = value
                .parse()
                .map_err(|_| invalid("timeouts", key, value, "expected a whole number of seconds"))?;
            if key == "default" {
                config.timeouts.default_secs = secs;
            } else {
                config.timeouts.per_program.push((key.to_string(), secs));
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = nonblank(section.get("file")) {
            config.logging.file = PathBuf::from(v);
        }
        if let Some(v) = section.get("stdout") {
            config.logging.stdout = match v {
                "true" => true,
                "false" => false,
                _ => return Err(invalid("logging", "stdout", v, "expected true or false")),
            };
        }
    }

    Ok(config)
}

fn nonblank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

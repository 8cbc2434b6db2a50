//! INI serialization logic for converting `ConfigFile` -> INI string.
//!
//! Produces the commented INI representation written by `save_to` and
//! emitted verbatim in response to the `CONFIG` control command.

use super::settings::ConfigFile;

pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let max_load = config
        .monitor
        .max_load_average
        .map(|v| v.to_string())
        .unwrap_or_default();

    let mut timeouts = String::new();
    for (program, secs) in &config.timeouts.per_program {
        timeouts.push_str(&format!("{} = {}\n", program, secs));
    }

    format!(
        r#"[monitor]
; Seconds the monitor sleeps between heartbeats.
heartbeat_seconds = {heartbeat}
; Admit new jobs only while the one-minute load average stays below
; this value. Leave blank to always admit.
max_load_average = {max_load}

[queues]
; Root directory containing all queue directories. Relative control and
; log paths below resolve against it.
root = {root}
; Principal job queue.
wait = {wait}
; Dedicated queue for high-priority jobs. Drained before the wait queue.
priority = {priority}
; Location of the currently executing UOW.
executing = {executing}
; Queue for successfully completed UOWs.
done = {done}
; Queue for UOWs that completed with an error condition.
error = {error}
; Queue for UOWs that did not complete.
fail = {fail}
; Nonqueue container for invalid files.
trash = {trash}

[control]
; THESE ARE MESSAGE PASSING FILES, NOT LOGS.
; Non-comment lines in the incoming file are deleted as the monitor
; reads them; the outgoing file is append-only.
incoming = {incoming}
outgoing = {outgoing}

[timeouts]
; Seconds a job may run before the monitor terminates it. The `default`
; entry applies to any program without its own entry; add one line per
; program basename to override, e.g. `ansible = 1800`.
default = {default_timeout}
{timeouts}
[logging]
; Log file path and whether to mirror log output to stdout.
file = {log_file}
stdout = {stdout}
"#,
        heartbeat = config.monitor.heartbeat_seconds,
        max_load = max_load,
        root = config.queues.root.display(),
        wait = config.queues.wait,
        priority = config.queues.priority,
        executing = config.queues.executing,
        done = config.queues.done,
        error = config.queues.error,
        fail = config.queues.fail,
        trash = config.queues.trash,
        incoming = config.control.incoming.display(),
        outgoing = config.control.outgoing.display(),
        default_timeout = config.timeouts.default_secs,
        timeouts = timeouts,
        log_file = config.logging.file.display(),
        stdout = config.logging.stdout,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rendered_config_parses_back() {
        let mut config = ConfigFile::default();
        config.monitor.heartbeat_seconds = 3;
        config.monitor.max_load_average = Some(4.5);
        config.timeouts.per_program.push(("ansible".to_string(), 1800));

        let text = to_config_string(&config);
        let ini = ini::Ini::load_from_str(&text).unwrap();
        let parsed = super::super::parser::parse_ini(&ini).unwrap();

        assert_eq!(parsed.monitor.heartbeat_seconds, 3);
        assert_eq!(parsed.monitor.max_load_average, Some(4.5));
        assert_eq!(
            parsed.timeouts.per_program,
            vec![("ansible".to_string(), 1800)]
        );
    }

    #[test]
    fn rendering_is_deterministic() {
        let config = ConfigFile::default();
        assert_eq!(to_config_string(&config), to_config_string(&config));
    }
}

//! Monitor configuration.
//!
//! Configuration is loaded once at startup from an INI file and passed
//! explicitly into each component as an immutable value; nothing reads
//! ambient global state. The module is split the same way throughout:
//! [`settings`] holds pure data types, [`defaults`] the constants and
//! `Default` impls, [`parser`] the `Ini` -> `ConfigFile` mapping,
//! [`writer`] the commented INI rendering (also what the `CONFIG`
//! control command emits), and [`file`] the load/save plumbing.

mod defaults;
mod file;
mod parser;
mod settings;
mod writer;

pub use defaults::*;
pub use file::{config_directory, default_config_path, ConfigFileError};
pub use settings::{
    ConfigFile, ControlSettings, LoggingSettings, MonitorSettings, QueueSettings, TimeoutSettings,
};

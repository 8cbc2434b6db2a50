//! `uowmon run` - start the monitor heartbeat loop.

use crate::error::CliError;
use crate::runner::CliRunner;
use std::path::Path;

pub fn execute(config_path: &Path, debug: bool) -> Result<(), CliError> {
    CliRunner::new(config_path, debug)?.run_monitor()
}

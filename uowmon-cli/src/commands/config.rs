//! `uowmon config` - print the active configuration.

use crate::error::CliError;
use std::path::Path;
use uowmon::config::ConfigFile;

pub fn execute(config_path: &Path) -> Result<(), CliError> {
    let config = ConfigFile::load_from(config_path)?;
    print!("{}", config.render());
    Ok(())
}

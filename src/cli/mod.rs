//! CLI module

mod commands;
mod logging;

pub use commands::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;

//! Config subcommand handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let cfg = config::load(global)?;
            let rendered = output::render_single(global.output, &cfg.redacted(), |c| {
                tikgate_config::to_toml(c).unwrap_or_else(|e| format!("# {e}"))
            })?;
            output::print_output(rendered.trim_end());
            Ok(())
        }
        ConfigCommand::Path => {
            output::print_output(&config::config_path(global).display().to_string());
            Ok(())
        }
        ConfigCommand::Init { force } => {
            let path = config::config_path(global);
            tikgate_config::init_config(&path, force)?;
            eprintln!("Wrote {}", path.display());
            eprintln!("Set router.host and the admin settings, then run: tikgate check");
            Ok(())
        }
    }
}

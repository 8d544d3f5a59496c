//! Command dispatch: bridges CLI args -> gateway -> output formatting.

pub mod check;
pub mod config_cmd;
pub mod console;
pub mod exec;

use clap::CommandFactory;
use tikgate_core::{Gateway, RouterOsConnector};

use crate::cli::{Cli, Command, CompletionsArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;

pub(crate) type RouterGateway = Gateway<RouterOsConnector>;

/// Dispatch a parsed command to its handler.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        // Neither needs a router.
        Command::Config(args) => config_cmd::handle(&args, global),
        Command::Completions(args) => {
            completions(&args);
            Ok(())
        }

        Command::Exec(args) => {
            let gateway = gateway(global)?;
            let result = exec::handle(&gateway, &args, global).await;
            finish(&gateway, result).await
        }
        Command::Console(args) => {
            let gateway = gateway(global)?;
            let result = console::handle(&gateway, &args, global).await;
            finish(&gateway, result).await
        }
        Command::Check => {
            let gateway = gateway(global)?;
            let result = check::handle(&gateway, global).await;
            finish(&gateway, result).await
        }
    }
}

/// The gateway connects lazily, so building it never touches the network.
fn gateway(global: &GlobalOpts) -> Result<RouterGateway, CliError> {
    Ok(Gateway::for_router(&config::gateway_config(global)?))
}

async fn finish(gateway: &RouterGateway, result: Result<(), CliError>) -> Result<(), CliError> {
    gateway.sessions().disconnect().await;
    result
}

fn completions(args: &CompletionsArgs) {
    let mut cmd = Cli::command();
    clap_complete::generate(args.shell, &mut cmd, "tikgate", &mut std::io::stdout());
}

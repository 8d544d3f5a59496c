//! `tikgate check`: verify reachability and credentials.

use tikgate_core::Connector;
use tikgate_core::report::render_status;

use crate::cli::GlobalOpts;
use crate::commands::RouterGateway;
use crate::error::CliError;
use crate::output;

pub async fn handle(gateway: &RouterGateway, global: &GlobalOpts) -> Result<(), CliError> {
    let resource = gateway.system_resource().await?;
    let target = gateway.sessions().connector().describe();

    let rendered = output::render_single(global.output, &resource, |r| {
        format!("✅ Connected to {target}\n\n{}", render_status(r).trim_end())
    })?;
    output::print_output(&rendered);
    Ok(())
}

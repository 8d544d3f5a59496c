//! `tikgate exec`: one command, one reply.

use tracing::debug;

use crate::cli::{ExecArgs, GlobalOpts};
use crate::commands::RouterGateway;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    gateway: &RouterGateway,
    args: &ExecArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let text = args.text.join(" ");
    debug!(caller_id = args.caller, %text, "exec");

    let reply = gateway.handle(args.caller, &text).await;
    output::print_output(&output::render_reply(&reply, global.output)?);
    Ok(())
}

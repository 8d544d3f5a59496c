//! `tikgate console`: a line-oriented transport over stdin/stdout.
//!
//! Each non-blank input line is one inbound command from `--caller`;
//! replies are printed in order. In text mode replies are separated by a
//! blank line; `json-compact` gives one JSON document per line.

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use crate::cli::{ConsoleArgs, GlobalOpts, OutputFormat};
use crate::commands::RouterGateway;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    gateway: &RouterGateway,
    args: &ConsoleArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut handled = 0_usize;

    while let Some(line) = lines.next_line().await? {
        let text = line.trim();
        if text.is_empty() {
            continue;
        }

        let reply = gateway.handle(args.caller, text).await;
        output::print_output(&output::render_reply(&reply, global.output)?);
        if matches!(global.output, OutputFormat::Text) {
            println!();
        }
        handled += 1;
    }

    info!(handled, "console input closed");
    Ok(())
}

//! Output formatting: reply text, JSON, compact JSON, YAML.

use std::io::{self, Write};

use serde::Serialize;

use tikgate_core::{KeyboardLayout, Reply};

use crate::cli::OutputFormat;
use crate::error::CliError;

/// Serialized shape of a reply, including the keyboard's button rows so a
/// transport reading our output can render them.
#[derive(Debug, Serialize)]
struct ReplyView<'a> {
    caller_id: i64,
    text: &'a str,
    keyboard: KeyboardLayout,
    buttons: Vec<Vec<&'static str>>,
}

impl<'a> From<&'a Reply> for ReplyView<'a> {
    fn from(reply: &'a Reply) -> Self {
        Self {
            caller_id: reply.caller_id,
            text: reply.text.trim_end(),
            keyboard: reply.keyboard,
            buttons: reply
                .keyboard
                .rows()
                .iter()
                .map(|row| row.to_vec())
                .collect(),
        }
    }
}

pub fn render_reply(reply: &Reply, format: OutputFormat) -> Result<String, CliError> {
    render_single(format, &ReplyView::from(reply), |view| view.text.to_owned())
}

/// Render one value: `text_fn` for text output, serde otherwise.
pub fn render_single<T, F>(format: OutputFormat, data: &T, text_fn: F) -> Result<String, CliError>
where
    T: Serialize + ?Sized,
    F: Fn(&T) -> String,
{
    Ok(match format {
        OutputFormat::Text => text_fn(data),
        OutputFormat::Json => serde_json::to_string_pretty(data)?,
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Yaml => serde_yaml::to_string(data)?.trim_end().to_owned(),
    })
}

/// Print to stdout, ignoring broken pipes.
pub fn print_output(output: &str) {
    if output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

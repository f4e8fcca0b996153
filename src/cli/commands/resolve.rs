//! Implementation of the `defect-rca resolve` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::io::Read;

use crate::adapters::notification::notify_best_effort;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{Config, ResponseFormat};
use crate::infrastructure::setup::{build_controller, build_notification_sink};
use crate::services::response_format::escape_html;
use crate::services::self_evaluate;

#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Error description; read from stdin when omitted
    pub error: Vec<String>,

    /// Response format (overrides pipeline.response_format)
    #[arg(long, value_parser = ["markdown", "html"])]
    pub format: Option<String>,

    /// Skip report delivery even when notification is enabled
    #[arg(long)]
    pub no_notify: bool,
}

#[derive(Debug, Serialize)]
pub struct ResolveOutput {
    pub error: String,
    pub response: String,
    pub rating: u8,
    pub notified: bool,
}

impl CommandOutput for ResolveOutput {
    fn to_human(&self) -> String {
        self.response.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: ResolveArgs, mut config: Config, json_mode: bool) -> Result<()> {
    let error = if args.error.is_empty() {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read error description from stdin")?;
        buffer
    } else {
        args.error.join(" ")
    };
    let error = error.trim().to_string();
    if error.is_empty() {
        anyhow::bail!("No error description given");
    }

    if let Some(format) = args.format.as_deref() {
        config.pipeline.response_format = parse_format(format);
    }

    let mut controller = build_controller(&config).await?;
    let response = controller.resolve(&error).await;

    let mut notified = false;
    if !args.no_notify {
        if let Some(sink) = build_notification_sink(&config.notification) {
            let body = html_body(&response, config.pipeline.response_format);
            notified = notify_best_effort(sink.as_ref(), &config.notification.subject, &body).await;
        }
    }

    output(
        &ResolveOutput {
            rating: self_evaluate(&response),
            error,
            response,
            notified,
        },
        json_mode,
    );
    Ok(())
}

fn parse_format(format: &str) -> ResponseFormat {
    if format.eq_ignore_ascii_case("html") {
        ResponseFormat::Html
    } else {
        ResponseFormat::Markdown
    }
}

/// HTML for delivery: html responses pass through, anything else is
/// escaped into a preformatted block.
fn html_body(response: &str, format: ResponseFormat) -> String {
    match format {
        ResponseFormat::Html => response.to_string(),
        ResponseFormat::Markdown => format!("<pre>{}</pre>", escape_html(response)),
    }
}

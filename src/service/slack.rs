//! Report delivery to a Slack incoming webhook using Block Kit.

use async_trait::async_trait;
use serde::Serialize;

use crate::classify::{ClassifiedMessage, Detail, Marker, SEPARATOR};
use crate::monitor::{MonitorError, Notifier};
use crate::report::Report;

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Webhook responded with {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Debug, Serialize, PartialEq)]
pub struct Payload {
    blocks: Vec<Block>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Block {
    Header { text: Text },
    Section { text: Text },
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Text {
    PlainText { text: String, emoji: bool },
    Mrkdwn { text: String },
}

fn emoji(marker: Marker) -> &'static str {
    match marker {
        Marker::Transition => ":large_blue_circle:",
        Marker::Healthy => ":large_green_circle:",
        Marker::Paused => ":white_circle:",
        Marker::Removing => ":black_circle:",
        Marker::Stopped => ":large_yellow_circle:",
        Marker::Failure => ":red_circle:",
        Marker::Fatal => ":skull_and_crossbones:",
    }
}

fn mrkdwn_detail(detail: &Detail) -> String {
    match detail {
        Detail::State(state) => format!("`{state}`"),
        Detail::OomKilled => "`OOMKilled`".to_string(),
        Detail::ExitCode(code) => format!("exit code `{code}`"),
        Detail::RestartCount(count) => format!("restart count `{count}`"),
    }
}

fn mrkdwn_line(message: &ClassifiedMessage) -> String {
    let mut line = format!("{} *{}*", emoji(message.marker), message.container_name);
    for detail in &message.details {
        line.push_str(SEPARATOR);
        line.push_str(&mrkdwn_detail(detail));
    }
    line
}

pub fn build_payload(report: &Report) -> Payload {
    let header = if report.has_errors() {
        format!(":warning: {}", report.header)
    } else {
        report.header.clone()
    };

    let blocks = std::iter::once(Block::Header {
        text: Text::PlainText {
            text: header,
            emoji: true,
        },
    })
    .chain(report.lines.iter().map(|message| Block::Section {
        text: Text::Mrkdwn {
            text: mrkdwn_line(message),
        },
    }))
    .collect();

    Payload { blocks }
}

pub struct SlackNotifier {
    client: reqwest::Client,
    url: String,
}

impl SlackNotifier {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }

    async fn post(&self, payload: &Payload) -> Result<(), WebhookError> {
        log::debug!("Posting {} blocks to Slack", payload.blocks.len());

        let response = self.client.post(&self.url).json(payload).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        log::error!("Response code {status} and body {body}");
        Err(WebhookError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, report: &Report) -> Result<(), MonitorError> {
        self.post(&build_payload(report)).await?;
        Ok(())
    }
}

//! Writes final responses as standalone HTML reports.

use async_trait::async_trait;
use chrono::Utc;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::ports::NotificationSink;
use crate::services::response_format::{escape_html, html_document};

/// Sink that drops one HTML file per delivery into a directory.
#[derive(Debug, Clone)]
pub struct HtmlReportSink {
    output_dir: PathBuf,
}

impl HtmlReportSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    fn report_path(&self) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S");
        let id = Uuid::new_v4().simple().to_string();
        self.output_dir.join(format!("{stamp}-{}.html", &id[..8]))
    }
}

#[async_trait]
impl NotificationSink for HtmlReportSink {
    fn name(&self) -> &'static str {
        "html_report"
    }

    async fn deliver(&self, subject: &str, html_body: &str) -> DomainResult<()> {
        let body = format!("<h1>{}</h1>\n{html_body}", escape_html(subject));
        let path = self.report_path();

        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DomainError::NotificationFailed(format!("{}: {e}", self.output_dir.display())))?;
        tokio::fs::write(&path, html_document(&body))
            .await
            .map_err(|e| DomainError::NotificationFailed(format!("{}: {e}", path.display())))?;

        tracing::info!(path = %path.display(), "report written");
        Ok(())
    }
}

/// Deliver through `sink`, logging instead of propagating failures.
pub async fn notify_best_effort(sink: &dyn NotificationSink, subject: &str, html_body: &str) -> bool {
    match sink.deliver(subject, html_body).await {
        Ok(()) => true,
        Err(err) => {
            tracing::warn!(sink = sink.name(), error = %err, "notification failed");
            false
        }
    }
}

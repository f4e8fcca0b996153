//! Notification sink port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Out-of-band delivery of a final response.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    fn name(&self) -> &'static str;

    /// Deliver an HTML-formatted body.
    async fn deliver(&self, subject: &str, html_body: &str) -> DomainResult<()>;
}

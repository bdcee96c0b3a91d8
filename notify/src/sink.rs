use async_trait::async_trait;
use metrics::counter;

use crate::api::NotifyError;
use crate::event::BucketNotification;

#[async_trait]
pub trait NotificationSink {
    async fn emit(&self, notification: BucketNotification) -> Result<(), NotifyError>;
}

/// Writes each notification to the operational log. The only sink in
/// production: records are logged, then dropped.
pub struct PrintSink {}

#[async_trait]
impl NotificationSink for PrintSink {
    async fn emit(&self, notification: BucketNotification) -> Result<(), NotifyError> {
        tracing::info!("notification: {:?}", notification);
        counter!("notify_events_logged_total").increment(1);

        Ok(())
    }
}

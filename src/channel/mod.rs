//! Chat delivery for notifications (Telegram today).

pub mod telegram;

use async_trait::async_trait;

use crate::error::DeliveryError;
use crate::verdict::Notification;

/// A destination notifications can be delivered to.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Deliver one notification. The caller decides what a failure means;
    /// implementations do not retry.
    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

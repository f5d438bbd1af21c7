pub mod telegram;

use async_trait::async_trait;

/// Best-effort outbound notifications.
///
/// Delivery failures are the implementation's problem: they are logged
/// at debug and discarded, and must never reach the engine's control
/// flow.
#[async_trait]
pub trait Notifier: Send + Sync + 'static {
    async fn send(&self, message: &str);
}

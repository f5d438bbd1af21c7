use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::notify::Notifier;

/// First line of every outbound message.
const BANNER: &str = "Silver Bullet";

pub struct TelegramNotifier {
    http: Client,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> anyhow::Result<Self> {
        let http = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            http,
            token,
            chat_id,
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.token);
        let text = format!("{BANNER}\n{message}");

        let result = self
            .http
            .post(&url)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text.as_str())])
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => {}
            Ok(resp) => {
                debug!(status = %resp.status(), "telegram rejected notification");
            }
            Err(e) => {
                debug!(error = %e, "telegram notification failed");
            }
        }
    }
}

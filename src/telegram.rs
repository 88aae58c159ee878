// 📨 Telegram transport - Bot API long polling over HTTP
// Updates are handled strictly one at a time, in arrival order.

use crate::bot::BotHandler;
use anyhow::{anyhow, Context, Result};
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::time::Duration;

/// Server-side long-poll wait
const POLL_TIMEOUT_SECS: u64 = 30;
/// Pause after a failed poll before trying again
const RETRY_DELAY: Duration = Duration::from_secs(3);

// ============================================================================
// WIRE TYPES
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Serialize)]
struct GetUpdates<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessage<'a> {
    chat_id: i64,
    text: &'a str,
}

#[derive(Serialize)]
struct DeleteWebhook {
    drop_pending_updates: bool,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct TelegramClient {
    http: Client,
    base_url: String,
    retry_delay: Duration,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        // Must outlive the long-poll wait. Errors are stripped of their URL
        // before logging since it embeds the token.
        let http = Client::builder()
            .timeout(Duration::from_secs(POLL_TIMEOUT_SECS + 10))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            retry_delay: RETRY_DELAY,
        })
    }

    /// Pause between a failed `getUpdates` and the next attempt
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    async fn call<B: Serialize, T: DeserializeOwned>(&self, method: &str, body: &B) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);

        let response: ApiResponse<T> = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| anyhow!("{} request failed: {}", method, e.without_url()))?
            .json()
            .await
            .map_err(|e| anyhow!("Failed to parse {} response: {}", method, e.without_url()))?;

        if !response.ok {
            return Err(anyhow!(
                "{} rejected: {}",
                method,
                response.description.unwrap_or_default()
            ));
        }

        response
            .result
            .ok_or_else(|| anyhow!("{} returned no result", method))
    }

    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Drop any webhook and queued updates so polling starts clean
    pub async fn reset_webhook(&self) -> Result<()> {
        let _: bool = self
            .call("deleteWebhook", &DeleteWebhook { drop_pending_updates: true })
            .await?;
        Ok(())
    }

    pub async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        self.call(
            "getUpdates",
            &GetUpdates {
                offset,
                timeout: POLL_TIMEOUT_SECS,
                allowed_updates: &["message"],
            },
        )
        .await
    }

    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call("sendMessage", &SendMessage { chat_id, text })
            .await?;
        Ok(())
    }
}

// ============================================================================
// POLLING LOOP
// ============================================================================

/// Poll forever. Transport errors are logged and retried; a failed reply
/// only affects its own message.
pub async fn run_polling(client: &TelegramClient, handler: &BotHandler) -> Result<()> {
    let mut offset = 0i64;
    tracing::info!("bot polling started");

    loop {
        match poll_once(client, handler, offset).await {
            Ok(next) => offset = next,
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed, retrying");
                tokio::time::sleep(client.retry_delay).await;
            }
        }
    }
}

/// One `getUpdates` round: handle every update in order and return the
/// offset for the next round (last `update_id + 1`, never moving back).
pub async fn poll_once(client: &TelegramClient, handler: &BotHandler, offset: i64) -> Result<i64> {
    let updates = client.get_updates(offset).await?;

    let mut next = offset;
    for update in updates {
        next = next.max(update.update_id + 1);
        handle_update(client, handler, update).await;
    }

    Ok(next)
}

async fn handle_update(client: &TelegramClient, handler: &BotHandler, update: Update) {
    let Some(message) = update.message else {
        return;
    };
    let Some(text) = message.text else {
        return;
    };

    if let Some(reply) = handler.handle(&text).await {
        if let Err(e) = client.send_message(message.chat.id, &reply).await {
            tracing::warn!(chat_id = message.chat.id, error = %e, "failed to send reply");
        }
    }
}

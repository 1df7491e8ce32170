use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{policies::ExponentialBackoff, RetryTransientMiddleware};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, TelegramError};
use crate::types::{
    AnswerCallbackQueryRequest, ApiResponse, EditMessageTextRequest, InlineKeyboardMarkup,
    Message, SendMessageRequest, SetWebhookRequest,
};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// Bot API client bound to one bot token.
///
/// Transient failures are retried except on `sendMessage`: a retry after
/// Telegram already accepted the message would post it twice.
#[derive(Clone)]
pub struct TelegramClient {
    http: Arc<ClientWithMiddleware>,
    http_once: Arc<ClientWithMiddleware>,
    api_base: String,
    token: String,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_base(token, DEFAULT_API_BASE)
    }

    /// Point the client at another server, e.g. a local Bot API or a mock.
    pub fn with_api_base(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        let client = Client::new();
        Self {
            http: Arc::new(Self::build_retry_client(client.clone())),
            http_once: Arc::new(ClientBuilder::new(client).build()),
            api_base: api_base.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    fn build_retry_client(client: Client) -> ClientWithMiddleware {
        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_millis(200), Duration::from_secs(2))
            .build_with_max_retries(2);

        ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build()
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message> {
        self.call_once(
            "sendMessage",
            &SendMessageRequest {
                chat_id,
                text,
                reply_markup,
            },
        )
        .await
    }

    pub async fn edit_message_text(&self, chat_id: i64, message_id: i64, text: &str) -> Result<()> {
        // Answers with the edited Message, or `true` for inline messages.
        self.call::<_, serde_json::Value>(
            "editMessageText",
            &EditMessageTextRequest {
                chat_id,
                message_id,
                text,
            },
        )
        .await
        .map(|_| ())
    }

    /// Stop the client-side spinner on a pressed button, optionally with a toast.
    pub async fn answer_callback_query(&self, callback_query_id: &str, text: Option<&str>) -> Result<()> {
        self.call::<_, bool>(
            "answerCallbackQuery",
            &AnswerCallbackQueryRequest {
                callback_query_id,
                text: text.filter(|t| !t.is_empty()),
            },
        )
        .await
        .map(|_| ())
    }

    pub async fn set_webhook(&self, url: &str) -> Result<()> {
        self.call::<_, bool>("setWebhook", &SetWebhookRequest { url })
            .await?;
        info!("Webhook registered");
        Ok(())
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(&self.http, method, body).await
    }

    /// Single attempt, for methods that are not safe to repeat.
    async fn call_once<B, T>(&self, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.post(&self.http_once, method, body).await
    }

    async fn post<B, T>(&self, http: &ClientWithMiddleware, method: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/bot{}/{}", self.api_base, self.token, method);
        debug!("Calling Telegram method {}", method);

        // Error envelopes come with 4xx statuses, so read the body either way.
        let response = http.post(&url).json(body).send().await?;
        let bytes = response.bytes().await?;
        let envelope: ApiResponse<T> = serde_json::from_slice(&bytes)?;

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or_default(),
                description: envelope.description.unwrap_or_default(),
            });
        }
        envelope.result.ok_or(TelegramError::MissingResult)
    }
}

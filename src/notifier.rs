use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Recipient};
use teloxide::RequestError;
use tracing::{debug, error, info, instrument};

/// Something that can deliver a text message to a chat.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    async fn send(&self, destination: &str, text: &str) -> Result<(), RequestError>;
}

#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(token: String) -> Self {
        Self {
            bot: Bot::new(token),
        }
    }
}

/// Numeric ids go to a chat, anything else is treated as a channel username.
pub fn recipient(destination: &str) -> Recipient {
    match destination.parse::<i64>() {
        Ok(id) => Recipient::Id(ChatId(id)),
        Err(_) => Recipient::ChannelUsername(destination.to_string()),
    }
}

#[async_trait]
impl MessageTransport for TelegramTransport {
    async fn send(&self, destination: &str, text: &str) -> Result<(), RequestError> {
        self.bot
            .send_message(recipient(destination), text.to_string())
            .await?;
        Ok(())
    }
}

/// Sends status messages to the configured chat. Delivery failures are logged
/// and reported back as `false`, never retried here.
pub struct Notifier<T> {
    transport: T,
    destination: String,
}

impl<T: MessageTransport> Notifier<T> {
    pub fn new(transport: T, destination: String) -> Self {
        Self {
            transport,
            destination,
        }
    }

    #[instrument(skip_all)]
    pub async fn send_message(&self, message: &str) -> bool {
        info!("sending message to chat");
        match self.transport.send(&self.destination, message).await {
            Ok(()) => {
                debug!(%message, "message sent");
                true
            }
            Err(err) => {
                error!(?err, "failed to send message");
                false
            }
        }
    }
}

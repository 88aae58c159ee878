// 🤖 Message dispatcher - chat text in, reply text out
// Transport-agnostic: the Telegram adapter feeds it one message at a time.

use crate::reply::{format_result, START_MESSAGE};
use crate::resolver::Resolver;
use crate::validator::extract_bin;

/// What to do with one inbound text message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound<'a> {
    /// `/start` or `/help`
    Help,
    /// Any other slash-command, ignored
    OtherCommand(&'a str),
    /// Free text, treated as card input
    Text(&'a str),
}

impl<'a> Inbound<'a> {
    /// `bot_username` is this bot's own name, without `@`. When known,
    /// `/cmd@name` is only honoured if `name` matches it.
    pub fn parse(text: &'a str, bot_username: Option<&str>) -> Self {
        let trimmed = text.trim_start();

        // A command is `/` followed by at least one [A-Za-z0-9_]
        let Some(command) = trimmed.strip_prefix('/') else {
            return Inbound::Text(text);
        };
        let name_len = command
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(command.len());
        if name_len == 0 {
            return Inbound::Text(text);
        }

        let (name, rest) = command.split_at(name_len);

        // "/start@my_bot args" → addressee "my_bot"
        if let Some(suffix) = rest.strip_prefix('@') {
            let addressee = suffix.split_whitespace().next().unwrap_or("");
            let for_us = match bot_username {
                Some(own) => addressee.eq_ignore_ascii_case(own),
                None => true,
            };
            if !for_us {
                return Inbound::OtherCommand(name);
            }
        }

        match name {
            "start" | "help" => Inbound::Help,
            other => Inbound::OtherCommand(other),
        }
    }
}

pub struct BotHandler {
    resolver: Resolver,
    username: Option<String>,
}

impl BotHandler {
    pub fn new(resolver: Resolver) -> Self {
        BotHandler {
            resolver,
            username: None,
        }
    }

    /// Ignore commands addressed to other bots in group chats
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Reply for one message; None means stay silent
    pub async fn handle(&self, text: &str) -> Option<String> {
        match Inbound::parse(text, self.username.as_deref()) {
            Inbound::Help => Some(START_MESSAGE.to_string()),
            Inbound::OtherCommand(name) => {
                tracing::debug!(command = name, "ignoring unknown command");
                None
            }
            Inbound::Text(raw) => Some(self.check_card(raw).await),
        }
    }

    async fn check_card(&self, raw: &str) -> String {
        match extract_bin(raw) {
            Ok(bin) => {
                let result = self.resolver.resolve(&bin).await;
                tracing::info!(%bin, brand = %result.brand, source = ?result.source, "BIN lookup");
                format_result(&result)
            }
            Err(e) => {
                tracing::debug!(error = %e, "rejected card input");
                e.user_message().to_string()
            }
        }
    }
}

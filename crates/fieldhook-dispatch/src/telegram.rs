//! Telegram Bot API payloads.
//!
//! Telegram targets are written `tg://send?to=<chat id>`; the message goes
//! to the bot's `sendMessage` method.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

lazy_static! {
    static ref CHAT_TARGET: Regex = Regex::new(r"^tg://send\?to=(-?\d+)$").unwrap();
}

/// Chat id from a `tg://send?to=<id>` target
pub fn chat_id(target: &str) -> Option<&str> {
    CHAT_TARGET
        .captures(target)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `sendMessage` URL for a bot
pub fn send_message_url(api_base: &str, bot_token: &str) -> String {
    format!("{}/bot{}/sendMessage", api_base.trim_end_matches('/'), bot_token)
}

/// Body of a `sendMessage` call
#[derive(Debug, Clone, Serialize)]
pub struct SendMessage {
    pub chat_id: String,
    pub text: String,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

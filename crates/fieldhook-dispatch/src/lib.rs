//! Notification dispatch.
//!
//! Selects the eligible targets for a research update, renders each target's
//! body with its own language and icon sets, and posts the result either to a
//! generic JSON webhook or to the Telegram Bot API.

pub mod dispatcher;
pub mod error;
pub mod report;
pub mod telegram;

pub use dispatcher::{DispatchConfig, Dispatcher, PreparedRequest};
pub use error::DispatchError;
pub use report::DispatchReport;
pub use telegram::{chat_id, send_message_url, SendMessage};

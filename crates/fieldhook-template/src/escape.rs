//! Output escaping per target format.
//!
//! Escaping is applied once, to resolved token values only. Literal template
//! text is left as the author wrote it.

use fieldhook_core::{ParseMode, TargetKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Escaper {
    /// Contents of a JSON string literal
    Json,
    /// Legacy Telegram Markdown
    Markdown,
    /// HTML entities, quotes included
    Html,
    Plain,
}

impl Escaper {
    /// Escaper for a target's body format
    pub fn for_target(kind: TargetKind, parse_mode: ParseMode) -> Self {
        match (kind, parse_mode) {
            (TargetKind::Generic, _) => Escaper::Json,
            (TargetKind::Telegram, ParseMode::Markdown) => Escaper::Markdown,
            (TargetKind::Telegram, ParseMode::Html) => Escaper::Html,
            (TargetKind::Telegram, ParseMode::Plain) => Escaper::Plain,
        }
    }

    pub fn escape(&self, raw: &str) -> String {
        match self {
            Escaper::Json => escape_json(raw),
            Escaper::Markdown => escape_markdown(raw),
            Escaper::Html => escape_html(raw),
            Escaper::Plain => raw.to_string(),
        }
    }
}

fn escape_json(raw: &str) -> String {
    match serde_json::to_string(raw) {
        Ok(quoted) => quoted[1..quoted.len() - 1].to_string(),
        Err(_) => String::new(),
    }
}

fn escape_markdown(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '\\' | '[' | '*' | '_' | '`') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            other => out.push(other),
        }
    }
    out
}

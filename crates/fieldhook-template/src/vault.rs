//! Multi-pass, injection-safe substitution.
//!
//! Every resolved token is swapped for a random placeholder id and its raw
//! value is kept here. Later passes see only ids, so a value containing
//! `<%` or `%>` is never parsed as a token. Enclosing tokens get the raw
//! values back when their arguments are resolved. Escaping happens once, in
//! the final substitution of ids by values.

use crate::context::ResolutionContext;
use crate::escape::Escaper;
use crate::parser::{self, TokenOccurrence};
use crate::resolver::TokenRegistry;
use uuid::Uuid;

/// Placeholder id -> raw value store for one render
#[derive(Debug, Default)]
pub struct ReplacementVault {
    entries: Vec<(String, String)>,
}

impl ReplacementVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep a raw value and return its fresh placeholder id
    pub fn store(&mut self, value: String) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.entries.push((id.clone(), value));
        id
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Replace any placeholder ids in `text` with their raw values
    pub fn reveal(&self, text: &str) -> String {
        let mut text = text.to_string();
        for (id, value) in &self.entries {
            if text.contains(id.as_str()) {
                text = text.replace(id.as_str(), value);
            }
        }
        text
    }

    /// Replace every placeholder id in `body` with its escaped value
    pub fn finish(&self, body: &str, escaper: Escaper) -> String {
        let mut body = body.to_string();
        for (id, value) in &self.entries {
            if body.contains(id.as_str()) {
                body = body.replace(id.as_str(), &escaper.escape(value));
            }
        }
        body
    }

    /// Resolve all tokens in `template` and return the escaped result.
    ///
    /// Each pass resolves every token visible in the current body; tokens
    /// nested in arguments become visible once their inner tokens have been
    /// replaced. Passes stop when a scan finds nothing.
    pub fn render(
        &mut self,
        template: &str,
        registry: &TokenRegistry,
        ctx: &ResolutionContext<'_>,
        escaper: Escaper,
    ) -> String {
        let mut body = template.to_string();
        let mut pass = 0;

        loop {
            let tokens = parser::parse(&body);
            if tokens.is_empty() {
                break;
            }
            pass += 1;
            tracing::debug!(pass, tokens = tokens.len(), "resolving token pass");
            body = self.substitute(&body, &tokens, registry, ctx);
        }

        self.finish(&body, escaper)
    }

    /// Resolve one pass of tokens and rebuild the body around their spans
    fn substitute(
        &mut self,
        body: &str,
        tokens: &[TokenOccurrence],
        registry: &TokenRegistry,
        ctx: &ResolutionContext<'_>,
    ) -> String {
        let mut out = String::with_capacity(body.len());
        let mut last = 0;

        for token in tokens {
            let args: Vec<String> = token.split_args().iter().map(|a| self.reveal(a)).collect();
            let value = registry.resolve(&token.name, &args, ctx);
            let id = self.store(value);

            out.push_str(&body[last..token.span.start]);
            out.push_str(&id);
            last = token.span.end;
        }

        out.push_str(&body[last..]);
        out
    }
}

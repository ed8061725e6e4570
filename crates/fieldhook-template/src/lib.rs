//! Substitution token language for webhook bodies.
//!
//! Webhook bodies are written by operators with embedded tokens such as
//! `<%POI%>`, `<%COORDS(3)%>` or `<%IF_EQUAL(<%REWARD_PARAMETER(quantity)%>,1,one,many)%>`.
//! Rendering resolves tokens innermost first and escapes each resolved value
//! for the target's format.
//!
//! # Example
//!
//! ```ignore
//! use fieldhook_template::{Escaper, ResolutionContext, TemplateEngine};
//!
//! let engine = TemplateEngine::new();
//! let ctx = ResolutionContext::new(&env, &event).with_language("en");
//! let body = engine.render(r#"{"content": "<%REPORTER%> found <%REWARD%> at <%POI%>"}"#, &ctx, Escaper::Json);
//! ```

pub mod coerce;
pub mod context;
pub mod escape;
pub mod navigation;
pub mod parser;
pub mod resolver;
pub mod timefmt;
pub mod vault;

pub use context::{RenderEnv, ResolutionContext};
pub use escape::Escaper;
pub use navigation::NavigationProviders;
pub use parser::{parse, split_args, TokenOccurrence};
pub use resolver::{TokenHandler, TokenRegistry};
pub use vault::ReplacementVault;

/// Renders templates with a fixed token table
pub struct TemplateEngine {
    registry: TokenRegistry,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Engine with the built-in tokens
    pub fn new() -> Self {
        Self::with_registry(TokenRegistry::with_builtins())
    }

    pub fn with_registry(registry: TokenRegistry) -> Self {
        Self { registry }
    }

    /// Add or replace a token
    pub fn register(&mut self, name: &str, handler: Box<dyn TokenHandler>) {
        self.registry.register(name, handler);
    }

    /// Render a template for one context
    pub fn render(&self, template: &str, ctx: &ResolutionContext<'_>, escaper: Escaper) -> String {
        ReplacementVault::new().render(template, &self.registry, ctx, escaper)
    }
}

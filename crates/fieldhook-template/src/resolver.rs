//! Token resolution.
//!
//! Each token name maps to a handler. Handlers receive already-resolved
//! argument strings and return the replacement text. Missing or unusable
//! arguments give an empty string; a handler never fails the render.

use crate::coerce::{float_prefix, int_prefix};
use crate::context::ResolutionContext;
use crate::timefmt::format_date;
use fieldhook_core::{IconFormat, IconVariant, ParamValue, ResearchKind};
use std::collections::HashMap;

/// Resolves one token
pub trait TokenHandler: Send + Sync {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String;
}

/// Token name -> handler table
pub struct TokenRegistry {
    handlers: HashMap<String, Box<dyn TokenHandler>>,
}

impl Default for TokenRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl TokenRegistry {
    /// A registry with no tokens
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    /// A registry with every built-in token
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();

        registry.register("COORDS", Box::new(Coords));
        registry.register("LAT", Box::new(Lat));
        registry.register("LNG", Box::new(Lng));
        registry.register("NAVURL", Box::new(NavUrl));
        registry.register("POI", Box::new(PoiName));
        registry.register("REPORTER", Box::new(ReporterName));
        registry.register("SITEURL", Box::new(SiteUrl));
        registry.register("TIME", Box::new(Time));
        registry.register("I18N", Box::new(I18n));

        registry.register("FALLBACK", Box::new(Fallback));
        registry.register("IF_EMPTY", Box::new(IfEmpty { negate: false }));
        registry.register("IF_NOT_EMPTY", Box::new(IfEmpty { negate: true }));
        registry.register("IF_EQUAL", Box::new(IfCompare(Comparison::Equal)));
        registry.register("IF_NOT_EQUAL", Box::new(IfCompare(Comparison::NotEqual)));
        registry.register("IF_LESS_THAN", Box::new(IfCompare(Comparison::Less)));
        registry.register("IF_LESS_OR_EQUAL", Box::new(IfCompare(Comparison::LessOrEqual)));
        registry.register("IF_GREATER_THAN", Box::new(IfCompare(Comparison::Greater)));
        registry.register("IF_GREATER_OR_EQUAL", Box::new(IfCompare(Comparison::GreaterOrEqual)));

        registry.register("LENGTH", Box::new(Length));
        registry.register("LOWERCASE", Box::new(Lowercase));
        registry.register("UPPERCASE", Box::new(Uppercase));
        registry.register("PAD_LEFT", Box::new(Pad { left: true }));
        registry.register("PAD_RIGHT", Box::new(Pad { left: false }));
        registry.register("SUBSTRING", Box::new(Substring));

        for kind in [ResearchKind::Objective, ResearchKind::Reward] {
            let prefix = kind.as_str().to_uppercase();
            registry.register(&prefix, Box::new(Describe(kind)));
            registry.register(&format!("{}_ICON", prefix), Box::new(Icon(kind)));
            registry.register(&format!("{}_PARAMETER", prefix), Box::new(Parameter(kind)));
            registry.register(&format!("{}_PARAMETER_COUNT", prefix), Box::new(ParameterCount(kind)));
        }

        registry
    }

    /// Add or replace a token; names are case-insensitive
    pub fn register(&mut self, name: &str, handler: Box<dyn TokenHandler>) {
        self.handlers.insert(name.to_uppercase(), handler);
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(&name.to_uppercase())
    }

    /// Resolve a token; unknown names give an empty string
    pub fn resolve(&self, name: &str, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        match self.handlers.get(&name.to_uppercase()) {
            Some(handler) => handler.resolve(args, ctx),
            None => {
                tracing::debug!(token = name, "unknown token");
                String::new()
            }
        }
    }
}

fn arg(args: &[String], index: usize) -> Option<&str> {
    args.get(index).map(String::as_str)
}

// ============================================================================
// Location and event
// ============================================================================

const DEFAULT_COORDS_PRECISION: usize = 5;

/// `<%COORDS([precision])%>`
struct Coords;

impl TokenHandler for Coords {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        let precision = match arg(args, 0) {
            Some(p) => int_prefix(p).clamp(0, 15) as usize,
            None => DEFAULT_COORDS_PRECISION,
        };
        let location = &ctx.event.poi.location;
        format!(
            "{:.*},{:.*}",
            precision, location.latitude, precision, location.longitude
        )
    }
}

struct Lat;

impl TokenHandler for Lat {
    fn resolve(&self, _args: &[String], ctx: &ResolutionContext<'_>) -> String {
        ctx.event.poi.location.latitude.to_string()
    }
}

struct Lng;

impl TokenHandler for Lng {
    fn resolve(&self, _args: &[String], ctx: &ResolutionContext<'_>) -> String {
        ctx.event.poi.location.longitude.to_string()
    }
}

/// `<%NAVURL([provider])%>`
struct NavUrl;

impl TokenHandler for NavUrl {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        let poi = &ctx.event.poi;
        ctx.env
            .navigation
            .url(arg(args, 0), &poi.location, &poi.name)
            .unwrap_or_default()
    }
}

struct PoiName;

impl TokenHandler for PoiName {
    fn resolve(&self, _args: &[String], ctx: &ResolutionContext<'_>) -> String {
        ctx.event.poi.name.clone()
    }
}

struct ReporterName;

impl TokenHandler for ReporterName {
    fn resolve(&self, _args: &[String], ctx: &ResolutionContext<'_>) -> String {
        ctx.event.reporter.nickname.clone()
    }
}

struct SiteUrl;

impl TokenHandler for SiteUrl {
    fn resolve(&self, _args: &[String], ctx: &ResolutionContext<'_>) -> String {
        ctx.env.site_url.clone()
    }
}

/// `<%TIME(format)%>`
struct Time;

impl TokenHandler for Time {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        match arg(args, 0) {
            Some(format) => format_date(format, &ctx.local_time()),
            None => String::new(),
        }
    }
}

/// `<%I18N(key[,arg1[,arg2...]])%>`
struct I18n;

impl TokenHandler for I18n {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        let Some((key, rest)) = args.split_first() else {
            return String::new();
        };
        let localizer = ctx.env.localizer.as_ref();
        if rest.is_empty() {
            localizer.resolve(&ctx.language, key)
        } else {
            localizer.resolve_args(&ctx.language, key, rest)
        }
    }
}

// ============================================================================
// Conditionals
// ============================================================================

/// `<%FALLBACK(expr,fallback)%>`
struct Fallback;

impl TokenHandler for Fallback {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        match args {
            [expr, fallback, ..] => {
                if expr.is_empty() {
                    fallback.clone()
                } else {
                    expr.clone()
                }
            }
            _ => String::new(),
        }
    }
}

/// `<%IF_EMPTY(expr,ifTrue[,ifFalse])%>` and its negation
struct IfEmpty {
    negate: bool,
}

impl TokenHandler for IfEmpty {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        let [expr, if_true, rest @ ..] = args else {
            return String::new();
        };
        if expr.is_empty() != self.negate {
            if_true.clone()
        } else {
            rest.first().cloned().unwrap_or_default()
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Comparison {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl Comparison {
    /// Equality compares text; ordering compares numbers
    fn holds(&self, expr: &str, value: &str) -> bool {
        match self {
            Comparison::Equal => expr == value,
            Comparison::NotEqual => expr != value,
            Comparison::Less => float_prefix(expr) < float_prefix(value),
            Comparison::LessOrEqual => float_prefix(expr) <= float_prefix(value),
            Comparison::Greater => float_prefix(expr) > float_prefix(value),
            Comparison::GreaterOrEqual => float_prefix(expr) >= float_prefix(value),
        }
    }
}

/// `<%IF_<COMPARISON>(expr,value,ifTrue[,ifFalse])%>`
struct IfCompare(Comparison);

impl TokenHandler for IfCompare {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        let [expr, value, if_true, rest @ ..] = args else {
            return String::new();
        };
        if self.0.holds(expr, value) {
            if_true.clone()
        } else {
            rest.first().cloned().unwrap_or_default()
        }
    }
}

// ============================================================================
// Text
// ============================================================================

struct Length;

impl TokenHandler for Length {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        arg(args, 0)
            .map(|s| s.chars().count().to_string())
            .unwrap_or_default()
    }
}

struct Lowercase;

impl TokenHandler for Lowercase {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        arg(args, 0).map(str::to_lowercase).unwrap_or_default()
    }
}

struct Uppercase;

impl TokenHandler for Uppercase {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        arg(args, 0).map(str::to_uppercase).unwrap_or_default()
    }
}

/// `<%PAD_LEFT(string,length[,pad])%>` / `<%PAD_RIGHT(...)%>`
struct Pad {
    left: bool,
}

impl TokenHandler for Pad {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        let [input, length, rest @ ..] = args else {
            return String::new();
        };
        let pad = rest.first().map(String::as_str).unwrap_or(" ");
        pad_to(input, int_prefix(length), pad, self.left)
    }
}

/// Longest result PAD_LEFT and PAD_RIGHT will build
pub const MAX_PAD_LENGTH: i64 = 4096;

/// Repeat `pad` (truncated) until `input` is `length` characters long.
///
/// Lengths above `MAX_PAD_LENGTH` leave the input unpadded.
pub fn pad_to(input: &str, length: i64, pad: &str, left: bool) -> String {
    let current = input.chars().count();
    if pad.is_empty() || length <= current as i64 || length > MAX_PAD_LENGTH {
        return input.to_string();
    }

    let fill: String = pad.chars().cycle().take(length as usize - current).collect();
    if left {
        fill + input
    } else {
        format!("{}{}", input, fill)
    }
}

/// `<%SUBSTRING(string,start[,length])%>`
struct Substring;

impl TokenHandler for Substring {
    fn resolve(&self, args: &[String], _ctx: &ResolutionContext<'_>) -> String {
        let [input, start, rest @ ..] = args else {
            return String::new();
        };
        let length = rest.first().map(|l| int_prefix(l));
        substring(input, int_prefix(start), length)
    }
}

/// Character-based substring. Negative `start` counts from the end;
/// negative `length` leaves that many characters off the end.
pub fn substring(input: &str, start: i64, length: Option<i64>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let total = chars.len() as i64;

    let start = if start < 0 { (total + start).max(0) } else { start };
    if start > total {
        return String::new();
    }

    let end = match length {
        None => total,
        Some(len) if len < 0 => total + len,
        Some(len) => start.saturating_add(len).min(total),
    };
    if end <= start {
        return String::new();
    }

    chars[start as usize..end as usize].iter().collect()
}

// ============================================================================
// Research
// ============================================================================

/// `<%OBJECTIVE%>` / `<%REWARD%>`
struct Describe(ResearchKind);

impl TokenHandler for Describe {
    fn resolve(&self, _args: &[String], ctx: &ResolutionContext<'_>) -> String {
        ctx.describe(self.0)
    }
}

/// `<%OBJECTIVE_ICON(format,variant)%>` / `<%REWARD_ICON(...)%>`
struct Icon(ResearchKind);

impl TokenHandler for Icon {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        let args: Vec<&str> = args.iter().map(|a| a.trim()).collect();
        let [format, variant, ..] = args.as_slice() else {
            return String::new();
        };
        let (Some(format), Some(variant)) = (IconFormat::parse(format), IconVariant::parse(variant)) else {
            return String::new();
        };

        let descriptor = ctx.descriptor(self.0);
        if self.0 == ResearchKind::Reward && ctx.show_species && descriptor.r#type == "encounter" {
            if let Some(species) = descriptor.param("species") {
                if let [only] = species.values() {
                    return ctx
                        .env
                        .icons
                        .species_url(&ctx.species_set, &only.to_string(), variant, format);
                }
            }
        }

        ctx.env
            .icons
            .icon_url(&ctx.icon_set, &descriptor.r#type, variant, format)
    }
}

/// `<%OBJECTIVE_PARAMETER(param[,index])%>` / `<%REWARD_PARAMETER(...)%>`
struct Parameter(ResearchKind);

impl TokenHandler for Parameter {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        let Some(name) = arg(args, 0) else {
            return String::new();
        };
        let Some(value) = ctx.descriptor(self.0).param(name) else {
            return String::new();
        };

        match (value, arg(args, 1)) {
            (ParamValue::List(values), Some(index)) => {
                let index = int_prefix(index) - 1;
                usize::try_from(index)
                    .ok()
                    .and_then(|i| values.get(i))
                    .map(|v| v.to_string())
                    .unwrap_or_default()
            }
            (value, _) => value.to_string(),
        }
    }
}

/// `<%OBJECTIVE_PARAMETER_COUNT(param)%>` / `<%REWARD_PARAMETER_COUNT(...)%>`
struct ParameterCount(ResearchKind);

impl TokenHandler for ParameterCount {
    fn resolve(&self, args: &[String], ctx: &ResolutionContext<'_>) -> String {
        let Some(name) = arg(args, 0) else {
            return String::new();
        };
        ctx.descriptor(self.0)
            .param(name)
            .map(ParamValue::count)
            .unwrap_or(0)
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pad() {
        assert_eq!(pad_to("7", 3, "0", true), "007");
        assert_eq!(pad_to("7", 3, "0", false), "700");
        assert_eq!(pad_to("ab", 7, "xyz", true), "xyzxyab");
        assert_eq!(pad_to("abc", 2, "0", true), "abc");
        assert_eq!(pad_to("abc", 10, "", true), "abc");
        assert_eq!(pad_to("é", 3, "·", false), "é··");
    }

    #[test]
    fn test_pad_length_is_capped() {
        assert_eq!(pad_to("7", MAX_PAD_LENGTH, "0", true).chars().count(), 4096);
        assert_eq!(pad_to("7", MAX_PAD_LENGTH + 1, "0", true), "7");
        assert_eq!(pad_to("7", i64::MAX, "0", false), "7");
    }

    #[test]
    fn test_substring() {
        assert_eq!(substring("abcdef", 1, Some(3)), "bcd");
        assert_eq!(substring("abcdef", 2, None), "cdef");
        assert_eq!(substring("abcdef", -2, None), "ef");
        assert_eq!(substring("abcdef", 0, Some(-1)), "abcde");
        assert_eq!(substring("abcdef", -10, Some(2)), "ab");
        assert_eq!(substring("abcdef", 6, None), "");
        assert_eq!(substring("abcdef", 9, None), "");
        assert_eq!(substring("abcdef", 4, Some(-3)), "");
        assert_eq!(substring("abcdef", 1, Some(0)), "");
        assert_eq!(substring("Pokémon", 3, Some(2)), "ém");
    }

    #[test]
    fn test_comparisons() {
        assert!(Comparison::Equal.holds("5", "5"));
        assert!(!Comparison::Equal.holds("5", "5.0"));
        assert!(Comparison::NotEqual.holds("a", "b"));
        assert!(!Comparison::Greater.holds("3", "5"));
        assert!(Comparison::Greater.holds("10", "9"));
        assert!(Comparison::LessOrEqual.holds("5.0", "5"));
        assert!(Comparison::Less.holds("abc", "1"));
        assert!(Comparison::GreaterOrEqual.holds("abc", "0"));
    }

    #[test]
    fn test_registry_names_are_case_insensitive() {
        let registry = TokenRegistry::with_builtins();
        assert!(registry.contains("poi"));
        assert!(registry.contains("Reward_Parameter_Count"));
        assert!(!registry.contains("NOPE"));
    }
}

//! Token scanning.
//!
//! A token is `<%NAME%>` or `<%NAME(args)%>`. The name runs up to the first
//! `(` or `%>`. Arguments run up to the first `)%>`; an argument list that
//! reaches another `<%` first does not close here, so the inner token is
//! matched on its own and the outer one is picked up on a later pass once
//! the inner one has been replaced.

use std::ops::Range;

const OPEN: &str = "<%";
const CLOSE: &str = "%>";
const ARGS_CLOSE: &str = ")%>";

/// One token found in a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOccurrence {
    /// Name as written; dispatch uppercases it
    pub name: String,
    /// Raw text between the parentheses, `None` without parentheses
    pub args: Option<String>,
    /// Byte range of the whole token in the scanned text
    pub span: Range<usize>,
}

impl TokenOccurrence {
    /// Comma-split arguments; empty or absent parentheses give no arguments
    pub fn split_args(&self) -> Vec<String> {
        split_args(self.args.as_deref())
    }
}

/// Literal comma split. There is no way to escape a comma inside a value.
pub fn split_args(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) if !raw.is_empty() => raw.split(',').map(str::to_string).collect(),
        _ => Vec::new(),
    }
}

/// Find all non-overlapping tokens, left to right
pub fn parse(body: &str) -> Vec<TokenOccurrence> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while let Some(offset) = body[pos..].find(OPEN) {
        let start = pos + offset;
        match scan_token(body, start) {
            Some(token) => {
                pos = token.span.end;
                tokens.push(token);
            }
            // `<` is one byte, so the next char boundary is right after it
            None => pos = start + 1,
        }
    }

    tokens
}

/// Try to read a token starting at `start`, which points at `<%`
fn scan_token(body: &str, start: usize) -> Option<TokenOccurrence> {
    let bytes = body.as_bytes();
    let name_start = start + OPEN.len();

    // A `%` not followed by `>` belongs to the name
    let mut name_end = name_start;
    loop {
        match bytes.get(name_end) {
            None => return None,
            Some(b'(') => break,
            Some(b'%') if bytes.get(name_end + 1) == Some(&b'>') => break,
            Some(_) => name_end += 1,
        }
    }

    let name = body[name_start..name_end].to_string();
    let after_name = name_end;

    if body[after_name..].starts_with(CLOSE) {
        return Some(TokenOccurrence {
            name,
            args: None,
            span: start..after_name + CLOSE.len(),
        });
    }

    // Otherwise the name stopped at `(`
    let args_start = after_name + 1;
    let tail = &body[args_start..];
    let close = tail.find(ARGS_CLOSE)?;
    if tail[..close].contains(OPEN) {
        return None;
    }

    Some(TokenOccurrence {
        name,
        args: Some(tail[..close].to_string()),
        span: start..args_start + close + ARGS_CLOSE.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(body: &str) -> Vec<String> {
        parse(body).into_iter().map(|t| t.name).collect()
    }

    #[test]
    fn test_plain_text_has_no_tokens() {
        assert!(parse("nothing to see here").is_empty());
        assert!(parse("50% off <3").is_empty());
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = parse("At <%POI%> (<%COORDS(3)%>)");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].name, "POI");
        assert_eq!(tokens[0].args, None);
        assert_eq!(tokens[0].span, 3..10);
        assert_eq!(tokens[1].name, "COORDS");
        assert_eq!(tokens[1].args.as_deref(), Some("3"));
        assert_eq!(tokens[1].split_args(), vec!["3"]);
    }

    #[test]
    fn test_empty_parens_give_no_args() {
        let tokens = parse("<%COORDS()%>");
        assert_eq!(tokens[0].args.as_deref(), Some(""));
        assert!(tokens[0].split_args().is_empty());
    }

    #[test]
    fn test_args_split_literally() {
        let tokens = parse("<%IF_EQUAL(a,b,,d)%>");
        assert_eq!(tokens[0].split_args(), vec!["a", "b", "", "d"]);
    }

    #[test]
    fn test_nested_inner_first() {
        let tokens = parse("<%UPPERCASE(<%POI%>)%>");
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "POI");
        assert_eq!(tokens[0].span, 12..19);
    }

    #[test]
    fn test_deeply_nested_innermost_only() {
        let body = "<%A(<%B(<%C(x)%>)%>)%>";
        let tokens = parse(body);
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].name, "C");
        assert_eq!(tokens[0].args.as_deref(), Some("x"));
    }

    #[test]
    fn test_parens_inside_args() {
        let tokens = parse("<%FALLBACK((none),x)%>");
        assert_eq!(tokens[0].args.as_deref(), Some("(none),x"));
    }

    #[test]
    fn test_lone_angle_inside_args() {
        let tokens = parse("<%IF_LESS_THAN(1,2,a<b)%>");
        assert_eq!(tokens[0].split_args(), vec!["1", "2", "a<b"]);
    }

    #[test]
    fn test_percent_in_name() {
        assert_eq!(names("<%A%B%>"), vec!["A%B"]);
    }

    #[test]
    fn test_unterminated_tokens() {
        assert!(parse("<%POI").is_empty());
        assert!(parse("<%UPPERCASE(abc%>").is_empty());
        assert!(parse("<%UPPERCASE(abc)").is_empty());
    }

    #[test]
    fn test_recovers_after_broken_token() {
        assert_eq!(names("<%BROKEN( <%POI%>"), vec!["POI"]);
    }

    #[test]
    fn test_siblings_in_args() {
        let tokens = parse("<%PAD_LEFT(<%LAT%>,<%LNG%>)%>");
        assert_eq!(tokens.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(), vec!["LAT", "LNG"]);
    }

    #[test]
    fn test_multibyte_text_around_tokens() {
        let body = "Pokémon → <%POI%> ✓";
        let tokens = parse(body);
        assert_eq!(&body[tokens[0].span.clone()], "<%POI%>");
    }
}

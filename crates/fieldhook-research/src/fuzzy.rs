//! Text similarity for free-text research matching.
//!
//! Similarity follows the classic "similar text" measure: find the longest
//! common run, then count recursively in the pieces left and right of it.
//! Scores are symmetric sums of both directions' percentages, since the
//! percentage depends on which run is found first.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// First whole number in a text
    static ref NUMBER: Regex = Regex::new(r"\d+").unwrap();
}

/// Normalize text before comparison
pub fn normalize(text: &str) -> String {
    text.to_lowercase()
}

/// Number of characters shared by `a` and `b`
pub fn similar_chars(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    common(&a, &b)
}

fn common(a: &[char], b: &[char]) -> usize {
    let (mut max, mut pos_a, mut pos_b) = (0, 0, 0);
    for i in 0..a.len() {
        for j in 0..b.len() {
            let mut len = 0;
            while i + len < a.len() && j + len < b.len() && a[i + len] == b[j + len] {
                len += 1;
            }
            if len > max {
                max = len;
                pos_a = i;
                pos_b = j;
            }
        }
    }

    if max == 0 {
        return 0;
    }

    let mut sum = max;
    if pos_a > 0 && pos_b > 0 {
        sum += common(&a[..pos_a], &b[..pos_b]);
    }
    if pos_a + max < a.len() && pos_b + max < b.len() {
        sum += common(&a[pos_a + max..], &b[pos_b + max..]);
    }
    sum
}

/// Similarity of `a` to `b` as a percentage
pub fn similarity_percent(a: &str, b: &str) -> f64 {
    let total = a.chars().count() + b.chars().count();
    if total == 0 {
        return 0.0;
    }
    similar_chars(a, b) as f64 * 2.0 * 100.0 / total as f64
}

/// Symmetric similarity score, in `0.0..=200.0`
pub fn score(input: &str, candidate: &str) -> f64 {
    similarity_percent(input, candidate) + similarity_percent(candidate, input)
}

/// Pick the candidate whose texts score highest against `input`.
///
/// Each candidate may offer several texts (e.g. singular and plural forms);
/// every text is scored. Ties keep the earliest candidate.
pub fn best_match<T>(input: &str, candidates: impl IntoIterator<Item = (Vec<String>, T)>) -> Option<T> {
    let input = normalize(input);
    let mut best: Option<(f64, T)> = None;

    for (texts, candidate) in candidates {
        let top = texts
            .iter()
            .map(|text| score(&input, &normalize(text)))
            .fold(f64::MIN, f64::max);

        if best.as_ref().map_or(true, |(score, _)| top > *score) {
            best = Some((top, candidate));
        }
    }

    best.map(|(_, candidate)| candidate)
}

/// First whole number in a text
pub fn first_number(text: &str) -> Option<i64> {
    NUMBER.find(text).and_then(|m| m.as_str().parse().ok())
}

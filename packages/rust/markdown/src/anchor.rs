//! Heading anchor derivation.

/// Derive a URL fragment from a heading title.
///
/// Lowercases, drops everything but letters, digits, whitespace and `-`, then
/// joins the remaining words with single hyphens. The table of contents and
/// every heading in the knowledge export go through this one function.
pub fn to_anchor(text: &str) -> String {
    let kept: String = text
        .to_lowercase()
        .chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || *c == '-')
        .collect();

    kept.split(|c: char| c.is_whitespace() || c == '-')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

//! Content sanitizer for documents leaving the rendering host.
//!
//! Each pass is a function `&str -> String`. Prose passes run only outside
//! fenced code blocks; the final whitespace pass runs over the whole text.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::map_prose;

/// Strip host-only markup from a document body.
///
/// Run this after link resolution: it never touches link syntax.
pub fn sanitize(body: &str) -> String {
    let result = map_prose(body, |prose| {
        let mut text = remove_imports(prose);
        text = convert_admonitions(&text);
        text = strip_components(&text);
        text
    });
    collapse_blank_lines(&result)
}

// ---------------------------------------------------------------------------
// Pass 1: Module imports
// ---------------------------------------------------------------------------

/// Drop whole-line `import ...` statements.
fn remove_imports(md: &str) -> String {
    static IMPORT_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^import[ \t].*(?:\r?\n)?").expect("valid regex"));

    IMPORT_RE.replace_all(md, "").into_owned()
}

// ---------------------------------------------------------------------------
// Pass 2: Admonitions
// ---------------------------------------------------------------------------

/// Turn `:::label text` blocks into a bold inline label.
///
/// Without same-line text the label prefixes the next non-blank line. Closing
/// `:::` lines are removed.
fn convert_admonitions(md: &str) -> String {
    static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"^:::(tip|info|warning|danger|note)\b[ \t]*(.*)$").expect("valid regex")
    });
    static CLOSE_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^:::[ \t]*$").expect("valid regex"));

    let mut out = String::with_capacity(md.len());
    let mut pending: Option<String> = None;

    for line in md.split_inclusive('\n') {
        let body = line.trim_end_matches(['\r', '\n']);
        let eol = &line[body.len()..];

        if let Some(caps) = OPEN_RE.captures(body) {
            if let Some(label) = pending.take() {
                out.push_str(&format!("**{label}:**\n"));
            }
            let text = caps[2].trim();
            if text.is_empty() {
                pending = Some(caps[1].to_string());
            } else {
                out.push_str(&format!("**{}:** {text}{eol}", &caps[1]));
            }
            continue;
        }

        if CLOSE_RE.is_match(body) {
            if let Some(label) = pending.take() {
                out.push_str(&format!("**{label}:**{eol}"));
            }
            continue;
        }

        match pending.take() {
            Some(label) if !body.trim().is_empty() => {
                out.push_str(&format!("**{label}:** {}{eol}", body.trim_start()));
            }
            Some(label) => {
                // blank lines between the delimiter and the first content line
                pending = Some(label);
            }
            None => out.push_str(line),
        }
    }

    if let Some(label) = pending {
        out.push_str(&format!("**{label}:**\n"));
    }

    out
}

// ---------------------------------------------------------------------------
// Pass 3: Capitalized components
// ---------------------------------------------------------------------------

/// Drop self-closing components and unwrap paired ones to their inner text.
///
/// Tags inside inline code spans are left alone.
fn strip_components(md: &str) -> String {
    static SELF_CLOSING_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"<[A-Z][A-Za-z0-9.]*(?:\s[^<>]*)?/>").expect("valid regex")
    });
    static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"</?[A-Z][A-Za-z0-9.]*(?:\s[^<>]*)?>").expect("valid regex")
    });

    let without_void = remove_matches(&SELF_CLOSING_RE, md);
    remove_matches(&TAG_RE, &without_void)
}

fn remove_matches(re: &Regex, text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for m in re.find_iter(text) {
        if in_inline_code(text, m.start()) {
            continue;
        }
        out.push_str(&text[last..m.start()]);
        last = m.end();
    }

    out.push_str(&text[last..]);
    out
}

/// Whether byte offset `at` sits inside a backtick span on its line.
fn in_inline_code(text: &str, at: usize) -> bool {
    let line_start = text[..at].rfind('\n').map_or(0, |i| i + 1);
    text[line_start..at].matches('`').count() % 2 == 1
}

// ---------------------------------------------------------------------------
// Pass 4: Whitespace
// ---------------------------------------------------------------------------

/// Normalize line endings to `\n`, collapse 3+ newlines to exactly 2 and
/// trim the ends.
fn collapse_blank_lines(md: &str) -> String {
    static MULTI_BLANK_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

    let md = md.replace("\r\n", "\n");
    MULTI_BLANK_RE.replace_all(&md, "\n\n").trim().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admonition_label_prefixes_next_line() {
        assert_eq!(sanitize(":::tip\nDo X\n:::"), "**tip:** Do X");
    }

    #[test]
    fn admonition_same_line_text_is_kept() {
        let out = sanitize(":::warning Careful now\nMore detail.\n:::\nAfter");
        assert_eq!(out, "**warning:** Careful now\nMore detail.\nAfter");
    }

    #[test]
    fn admonition_skips_blank_lines_before_content() {
        assert_eq!(sanitize(":::note\n\nBody\n:::"), "**note:** Body");
    }

    #[test]
    fn empty_admonition_keeps_label() {
        assert_eq!(sanitize(":::danger\n:::"), "**danger:**");
    }

    #[test]
    fn unknown_admonition_label_is_left_alone() {
        assert_eq!(sanitize(":::caution\nx"), ":::caution\nx");
        assert_eq!(sanitize(":::notebook"), ":::notebook");
    }

    #[test]
    fn imports_are_removed() {
        let input = "import Tabs from '@theme/Tabs';\nimport TabItem from '@theme/TabItem';\n\n# Title\nimportant text";
        assert_eq!(sanitize(input), "# Title\nimportant text");
    }

    #[test]
    fn components_unwrap_and_self_closing_drop() {
        let input = "<Tabs groupId=\"os\">\n<TabItem value=\"mac\" label=\"macOS\">\nbrew install strata\n</TabItem>\n</Tabs>\n<DocCardList />\nEnd";
        assert_eq!(sanitize(input), "brew install strata\n\nEnd");
    }

    #[test]
    fn inline_components_keep_inner_text() {
        assert_eq!(
            sanitize("Press <Kbd>Ctrl</Kbd> then <Icon name=\"x\"/> go"),
            "Press Ctrl then  go"
        );
    }

    #[test]
    fn lowercase_html_and_inline_code_survive() {
        let input = "<details>keep</details> and `Vec<String>`";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn fenced_code_is_untouched() {
        let input = "```jsx\nimport X from 'y';\n<Tabs>\n:::tip\n```";
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn blank_lines_collapse_and_trim() {
        assert_eq!(sanitize("\n\n\na\n\n\n\nb\n\n"), "a\n\nb");
    }

    #[test]
    fn crlf_blank_lines_collapse() {
        assert_eq!(sanitize("a\r\n\r\n\r\n\r\nb\r\n"), "a\n\nb");
    }

    #[test]
    fn links_survive_sanitizing() {
        let input = "<Note>See [Beta](#beta)</Note>";
        assert_eq!(sanitize(input), "See [Beta](#beta)");
    }
}

//! Fenced code block awareness.
//!
//! Rewrites that target prose (links, admonitions, component tags) must not
//! touch code samples, so callers route text through [`map_prose`].

/// An opening fence: marker character and run length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Fence {
    marker: char,
    len: usize,
}

impl Fence {
    /// A fence opens on a run of three or more backticks or tildes.
    fn open(line: &str) -> Option<Self> {
        let trimmed = line.trim_start();
        let marker = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))?;
        let len = trimmed.chars().take_while(|c| *c == marker).count();
        (len >= 3).then_some(Self { marker, len })
    }

    /// Closed only by a bare run of the same marker at least as long.
    fn is_closed_by(self, line: &str) -> bool {
        let trimmed = line.trim();
        Self::open(trimmed).is_some_and(|run| {
            run.marker == self.marker && run.len >= self.len && trimmed.len() == run.len
        })
    }
}

/// Apply `f` to every run of text outside fenced code blocks.
///
/// Fence lines and fenced content are copied through verbatim. An unclosed
/// fence protects everything after it.
pub(crate) fn map_prose(md: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(md.len());
    let mut prose = String::new();
    let mut open: Option<Fence> = None;

    for line in md.split_inclusive('\n') {
        match open {
            Some(fence) => {
                out.push_str(line);
                if fence.is_closed_by(line) {
                    open = None;
                }
            }
            None => {
                if let Some(fence) = Fence::open(line) {
                    if !prose.is_empty() {
                        out.push_str(&f(&prose));
                        prose.clear();
                    }
                    out.push_str(line);
                    open = Some(fence);
                } else {
                    prose.push_str(line);
                }
            }
        }
    }

    if !prose.is_empty() {
        out.push_str(&f(&prose));
    }

    out
}

/// Iterate over the lines of `md` that sit outside fenced code blocks.
pub(crate) fn prose_lines(md: &str) -> impl Iterator<Item = &str> {
    let mut open: Option<Fence> = None;
    md.lines().filter(move |line| match open {
        Some(fence) => {
            if fence.is_closed_by(line) {
                open = None;
            }
            false
        }
        None => {
            open = Fence::open(line);
            open.is_none()
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn map_prose_skips_code_blocks() {
        let input = "a\n```rust\na\n```\na\n";
        let result = map_prose(input, |s| s.replace('a', "b"));
        assert_eq!(result, "b\n```rust\na\n```\nb\n");
    }

    #[test]
    fn unclosed_fence_protects_tail() {
        let input = "a\n~~~\na\n";
        let result = map_prose(input, |s| s.replace('a', "b"));
        assert_eq!(result, "b\n~~~\na\n");
    }

    #[test]
    fn mixed_markers_do_not_close_each_other() {
        let input = "```\n~~~\nx\n```\nx";
        let result = map_prose(input, |s| s.to_uppercase());
        assert_eq!(result, "```\n~~~\nx\n```\nX");
    }

    #[test]
    fn longer_fence_is_not_closed_by_shorter_run() {
        let input = "````md\n```\n<Tabs>x</Tabs>\n```\n````\n<Tabs>y</Tabs>\n";
        let result = map_prose(input, |s| s.replace("<Tabs>", ""));
        assert_eq!(result, "````md\n```\n<Tabs>x</Tabs>\n```\n````\ny</Tabs>\n");

        let lines: Vec<_> = prose_lines(input).collect();
        assert_eq!(lines, vec!["<Tabs>y</Tabs>"]);
    }

    #[test]
    fn fence_with_info_string_does_not_close() {
        let input = "```\n```rust\nx\n```\nx";
        let result = map_prose(input, |s| s.to_uppercase());
        assert_eq!(result, "```\n```rust\nx\n```\nX");
    }

    #[test]
    fn prose_lines_filters_fenced_content() {
        let input = "# Title\n```bash\n# not a heading\n```\nbody";
        let lines: Vec<_> = prose_lines(input).collect();
        assert_eq!(lines, vec!["# Title", "body"]);
    }
}

use similar::{ChangeTag, TextDiff};

/// Unified diff of `existing` against `new`, three lines of context.
pub(crate) fn render_diff(label: &str, existing: &str, new: &str, colored: bool) -> String {
    let diff = TextDiff::from_lines(existing, new);
    let mut output = String::new();

    let (bold, reset) = if colored { ("\x1b[1m", "\x1b[0m") } else { ("", "") };
    output.push_str(&format!("{bold}--- {label} (current){reset}\n"));
    output.push_str(&format!("{bold}+++ {label} (generated){reset}\n"));

    for (idx, group) in diff.grouped_ops(3).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                let (sign, color) = match change.tag() {
                    ChangeTag::Delete => ("-", "\x1b[31m"),
                    ChangeTag::Insert => ("+", "\x1b[32m"),
                    ChangeTag::Equal => (" ", ""),
                };
                let color = if colored { color } else { "" };
                output.push_str(color);
                output.push_str(sign);
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
                if !color.is_empty() {
                    output.push_str(reset);
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_diff() {
        let diff = render_diff("bridge.rs", "a\nb\nc\n", "a\nB\nc\n", false);
        assert_eq!(
            diff,
            "--- bridge.rs (current)\n+++ bridge.rs (generated)\n a\n-b\n+B\n c\n"
        );
    }

    #[test]
    fn test_render_diff_missing_newline() {
        let diff = render_diff("x", "old", "new\n", false);
        assert!(diff.ends_with("-old\n+new\n"));
    }
}

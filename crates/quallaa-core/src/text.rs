const MAX_SNIPPET_CHARS: usize = 160;

/// The line containing `offset`, trimmed, clipped to a window around the
/// occurrence when the line is long. Used for backlink context display.
#[must_use]
pub(crate) fn context_snippet(text: &str, offset: usize) -> String {
    let offset = offset.min(text.len());
    let line_start = text[..offset].rfind('\n').map_or(0, |pos| pos + 1);
    let line_end = text[offset..]
        .find('\n')
        .map_or(text.len(), |pos| offset + pos);
    let line = text[line_start..line_end].trim();

    if line.chars().count() <= MAX_SNIPPET_CHARS {
        return line.to_string();
    }

    // Center the window on the occurrence column so the link stays visible.
    let column = text[line_start..offset].chars().count();
    let chars: Vec<char> = line.chars().collect();
    let half = MAX_SNIPPET_CHARS / 2;
    let start = column.saturating_sub(half).min(chars.len().saturating_sub(MAX_SNIPPET_CHARS));
    let end = (start + MAX_SNIPPET_CHARS).min(chars.len());
    chars[start..end].iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_is_the_trimmed_line() {
        let text = "first\n  second with [[Link]] here  \nthird";
        let offset = text.find("[[").expect("offset");
        assert_eq!(context_snippet(text, offset), "second with [[Link]] here");
    }

    #[test]
    fn long_lines_are_clipped_around_the_occurrence() {
        let text = format!("{}[[Link]]{}", "a".repeat(300), "b".repeat(300));
        let offset = text.find("[[").expect("offset");
        let snippet = context_snippet(&text, offset);
        assert_eq!(snippet.chars().count(), MAX_SNIPPET_CHARS);
        assert!(snippet.contains("[[Link]]"));
    }

    #[test]
    fn offset_past_end_is_tolerated() {
        assert_eq!(context_snippet("short", 999), "short");
    }
}

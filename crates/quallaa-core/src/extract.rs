use std::collections::BTreeSet;

use crate::frontmatter;
use crate::models::{Extraction, Frontmatter, LinkOccurrence};

/// Parses one note into its frontmatter and extracted links/tags. Never fails:
/// malformed input degrades to plain text (unterminated `[[`, bad YAML) and is
/// simply not a link.
#[must_use]
pub fn extract(text: &str) -> (Frontmatter, Extraction) {
    let (fm, body_start) = frontmatter::parse(text);
    let links = extract_links(text, body_start);
    let tags = merge_tags(&fm.tags, &inline_tags(&text[body_start..]));
    (fm, Extraction { links, tags })
}

/// Scans the body for `[[Target]]` / `[[Target|Alias]]` occurrences in
/// document order. Offsets are byte positions of the opening `[[` within the
/// full note text; lines are 1-based.
#[must_use]
pub fn extract_links(text: &str, body_start: usize) -> Vec<LinkOccurrence> {
    let body = &text[body_start..];
    let mut links = Vec::new();
    let mut cursor = 0usize;

    while cursor < body.len() {
        let Some(open_rel) = body[cursor..].find("[[") else {
            break;
        };
        let mut open = cursor + open_rel;
        let Some(close_rel) = body[open + 2..].find("]]") else {
            // Unterminated bracket pair: the remainder is plain text.
            break;
        };
        let close = open + 2 + close_rel;

        // Nested `[[A [[B]]` pairs to the nearest close: the innermost open
        // wins, the outer `[[` is plain text.
        while let Some(inner_rel) = body[open + 2..close].find("[[") {
            open = open + 2 + inner_rel;
        }
        cursor = close + 2;

        // `![[...]]` image embeds share the bracket grammar but are not graph
        // links.
        if open > 0 && body.as_bytes()[open - 1] == b'!' {
            continue;
        }

        let inner = &body[open + 2..close];
        let (raw_target, alias) = split_alias(inner);
        let raw_target = raw_target.trim();
        if raw_target.is_empty() {
            continue;
        }

        let offset = body_start + open;
        links.push(LinkOccurrence {
            raw_target: unescape_pipes(raw_target),
            alias,
            offset,
            line: line_of(text, offset),
        });
    }

    links
}

/// Splits the bracket contents on the first unescaped `|`.
fn split_alias(inner: &str) -> (&str, Option<String>) {
    let bytes = inner.as_bytes();
    let mut i = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'|' => {
                let alias = inner[i + 1..].trim();
                let alias = (!alias.is_empty()).then(|| unescape_pipes(alias));
                return (&inner[..i], alias);
            }
            _ => i += 1,
        }
    }
    (inner, None)
}

fn unescape_pipes(value: &str) -> String {
    value.replace("\\|", "|")
}

fn line_of(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset].iter().filter(|b| **b == b'\n').count() + 1
}

/// Collects inline `#tag` tokens from body text. A tag starts at a word
/// boundary, its first character is alphanumeric (so `# Heading` is never a
/// tag), and it may be hierarchical (`#project/backend`).
#[must_use]
pub fn inline_tags(body: &str) -> Vec<String> {
    let mut tags = Vec::new();
    let mut prev: Option<char> = None;
    let mut chars = body.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        if ch != '#' || !is_tag_boundary(prev) {
            prev = Some(ch);
            continue;
        }
        let start = i + 1;
        let mut end = start;
        for (j, c) in body[start..].char_indices() {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '/') {
                end = start + j + c.len_utf8();
            } else {
                break;
            }
        }
        let token = body[start..end].trim_end_matches('/');
        if token.chars().next().is_some_and(char::is_alphanumeric) {
            tags.push(token.to_lowercase());
        }
        prev = Some(ch);
        while let Some(&(j, _)) = chars.peek() {
            if j < end {
                chars.next();
            } else {
                break;
            }
        }
    }

    tags
}

fn is_tag_boundary(prev: Option<char>) -> bool {
    !prev.is_some_and(|ch| ch.is_alphanumeric() || matches!(ch, '#' | '&' | '_'))
}

fn merge_tags(frontmatter_tags: &[String], inline: &[String]) -> Vec<String> {
    let mut set = BTreeSet::new();
    for tag in frontmatter_tags.iter().chain(inline) {
        let normalized = tag.trim().trim_start_matches('#').to_lowercase();
        if !normalized.is_empty() {
            set.insert(normalized);
        }
    }
    set.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn links_of(text: &str) -> Vec<LinkOccurrence> {
        let (_, extraction) = extract(text);
        extraction.links
    }

    #[test]
    fn extracts_simple_and_aliased_links_in_document_order() {
        let links = links_of("See [[Wiki Links]] then [[Target|Display Text]].");
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].raw_target, "Wiki Links");
        assert_eq!(links[0].alias, None);
        assert_eq!(links[1].raw_target, "Target");
        assert_eq!(links[1].alias.as_deref(), Some("Display Text"));
    }

    #[test]
    fn records_offsets_and_lines() {
        let text = "first line\nsecond [[Target]] here";
        let links = links_of(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].line, 2);
        assert_eq!(&text[links[0].offset..links[0].offset + 2], "[[");
    }

    #[test]
    fn path_qualified_targets_are_preserved() {
        let links = links_of("go to [[notes/Nested Note]]");
        assert_eq!(links[0].raw_target, "notes/Nested Note");
    }

    #[test]
    fn nested_open_pairs_to_nearest_close() {
        let links = links_of("[[A [[B]] trailing");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].raw_target, "B");
    }

    #[test]
    fn unterminated_and_empty_brackets_are_dropped() {
        assert!(links_of("text with [[unclosed").is_empty());
        assert!(links_of("empty [[]] and blank [[   ]]").is_empty());
    }

    #[test]
    fn image_embeds_are_not_graph_links() {
        let links = links_of("![[image.png]] and ![[image.png|Alt Text]] but [[Note]]");
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].raw_target, "Note");
    }

    #[test]
    fn escaped_pipe_stays_in_target() {
        let links = links_of(r"[[A\|B]] and [[C\|D|shown]]");
        assert_eq!(links[0].raw_target, "A|B");
        assert_eq!(links[0].alias, None);
        assert_eq!(links[1].raw_target, "C|D");
        assert_eq!(links[1].alias.as_deref(), Some("shown"));
    }

    #[test]
    fn frontmatter_never_contributes_links() {
        let text = "---\ntitle: \"[[Not A Link]]\"\n---\n[[Real]]";
        let links = links_of(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].raw_target, "Real");
    }

    #[test]
    fn inline_tags_respect_boundaries_and_skip_headings() {
        let tags = inline_tags("# Heading\nwork on #Project/Backend and &#38; x#not #123ok ##nope");
        assert_eq!(tags, vec!["project/backend", "123ok"]);
    }

    #[test]
    fn frontmatter_and_inline_tags_merge_into_one_set() {
        let text = "---\ntags: [Rust, project/backend]\n---\nbody #rust #extra";
        let (_, extraction) = extract(text);
        assert_eq!(extraction.tags, vec!["extra", "project/backend", "rust"]);
    }
}

use crate::models::Frontmatter;

/// Splits a note into its recognized frontmatter and the byte offset where the
/// body begins. The `---` delimiters must open at byte 0 and be closed;
/// anything else (including YAML that fails to parse) degrades to an absent
/// frontmatter rather than an error.
#[must_use]
pub fn parse(text: &str) -> (Frontmatter, usize) {
    let Some(block) = locate_block(text) else {
        return (Frontmatter::default(), 0);
    };

    let frontmatter = serde_norway::from_str::<serde_norway::Value>(&text[block.inner_start..block.inner_end])
        .ok()
        .map(|value| frontmatter_from_value(&value))
        .unwrap_or_default();

    // A closed block is skipped for body scanning even when its YAML is
    // malformed; the delimiters are unambiguous.
    (frontmatter, block.body_start)
}

struct BlockSpan {
    inner_start: usize,
    inner_end: usize,
    body_start: usize,
}

fn locate_block(text: &str) -> Option<BlockSpan> {
    let inner_start = if let Some(rest) = text.strip_prefix("---\r\n") {
        text.len() - rest.len()
    } else if let Some(rest) = text.strip_prefix("---\n") {
        text.len() - rest.len()
    } else {
        return None;
    };

    let mut cursor = inner_start;
    for line in text[inner_start..].split_inclusive('\n') {
        let trimmed = line.trim_end_matches(['\n', '\r']);
        if trimmed == "---" {
            return Some(BlockSpan {
                inner_start,
                inner_end: cursor,
                body_start: cursor + line.len(),
            });
        }
        cursor += line.len();
    }
    // Unterminated block: the whole file is body text.
    None
}

fn frontmatter_from_value(value: &serde_norway::Value) -> Frontmatter {
    let serde_norway::Value::Mapping(map) = value else {
        return Frontmatter::default();
    };

    Frontmatter {
        title: map.get("title").and_then(scalar_to_string),
        tags: string_list(map.get("tags")),
        aliases: string_list(map.get("aliases")),
        date: map.get("date").and_then(scalar_to_string),
    }
}

fn scalar_to_string(value: &serde_norway::Value) -> Option<String> {
    match value {
        serde_norway::Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        serde_norway::Value::Number(n) => Some(n.to_string()),
        serde_norway::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list(value: Option<&serde_norway::Value>) -> Vec<String> {
    match value {
        Some(serde_norway::Value::Sequence(items)) => {
            items.iter().filter_map(scalar_to_string).collect()
        }
        // Scalar form `tags: rust` is accepted as a one-element list.
        Some(other) => scalar_to_string(other).into_iter().collect(),
        None => Vec::new(),
    }
}

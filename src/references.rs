/// Link and image reference definitions
///
/// Definitions (`[id]: url "title"`) are pulled out of the line stream before
/// block parsing so that a reference can be used above the place it is
/// defined.
use crate::preprocess::Line;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use unicode_casefold::UnicodeCaseFold;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    pub url: String,
    pub title: Option<String>,
}

/// Normalized id -> reference. Later definitions replace earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceMap {
    entries: HashMap<String, Reference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: &str, reference: Reference) {
        let key = normalize_id(id);
        if let Some(previous) = self.entries.insert(key, reference) {
            log::debug!("reference [{}] redefined, replacing {}", id, previous.url);
        }
    }

    pub fn get(&self, id: &str) -> Option<&Reference> {
        self.entries.get(&normalize_id(id))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Case-fold and collapse runs of whitespace to a single space
pub fn normalize_id(id: &str) -> String {
    let folded: String = id.chars().case_fold().collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every definition from `lines` and collect them into a map
pub fn extract(lines: Vec<Line>) -> (Vec<Line>, ReferenceMap) {
    let mut references = ReferenceMap::new();
    let mut remaining = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let Some(line) = lines[i].as_text() else {
            remaining.push(lines[i].clone());
            i += 1;
            continue;
        };

        let next = lines.get(i + 1).and_then(Line::as_text).map(|l| l.text.as_str());
        match parse_definition(&line.text, next) {
            Some((id, reference, consumed)) => {
                log::trace!("reference [{}] -> {}", id, reference.url);
                references.insert(&id, reference);
                i += consumed;
            }
            None => {
                remaining.push(lines[i].clone());
                i += 1;
            }
        }
    }

    log::debug!("extracted {} link references", references.len());
    (remaining, references)
}

/// Parse a definition starting on `line`; the title may sit alone on `next`.
/// Returns the raw id, the reference and the number of lines consumed.
fn parse_definition(line: &str, next: Option<&str>) -> Option<(String, Reference, usize)> {
    let trimmed = line.trim_start();
    if line.len() - trimmed.len() > 3 {
        return None;
    }

    let rest = trimmed.strip_prefix('[')?;
    let close = rest.find(']')?;
    let id = &rest[..close];
    if id.trim().is_empty() {
        return None;
    }
    let rest = rest[close + 1..].strip_prefix(':')?.trim_start();

    let (url, rest) = if let Some(inner) = rest.strip_prefix('<') {
        let end = inner.find('>')?;
        (&inner[..end], &inner[end + 1..])
    } else {
        let end = rest.find(char::is_whitespace).unwrap_or(rest.len());
        (&rest[..end], &rest[end..])
    };
    if url.is_empty() {
        return None;
    }

    let reference = |title: Option<String>| Reference {
        url: url.to_string(),
        title,
    };

    let rest = rest.trim();
    if !rest.is_empty() {
        // Anything after the url must be a title
        let title = parse_title(rest)?;
        return Some((id.to_string(), reference(Some(title)), 1));
    }

    if let Some(title) = next.and_then(|next| parse_title(next.trim())) {
        return Some((id.to_string(), reference(Some(title)), 2));
    }

    Some((id.to_string(), reference(None), 1))
}

/// A title wrapped in `"`, `'` or parentheses. Mismatched delimiters such as
/// `"title)` are accepted.
fn parse_title(text: &str) -> Option<String> {
    let mut chars = text.chars();
    let open = chars.next()?;
    let close = chars.next_back()?;
    if matches!(open, '"' | '\'' | '(') && matches!(close, '"' | '\'' | ')') {
        Some(text[1..text.len() - 1].to_string())
    } else {
        None
    }
}

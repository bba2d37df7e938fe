/// HTML escaping helpers shared by the block parser, inline transformer and renderer
use std::borrow::Cow;

/// Length in bytes of a well-formed entity (`&name;`, `&#123;`, `&#x1f;`)
/// starting at `start`, if there is one.
pub fn entity_len(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    if bytes.get(start) != Some(&b'&') {
        return None;
    }

    let mut i = start + 1;
    match bytes.get(i) {
        Some(b'#') => {
            i += 1;
            let hex = matches!(bytes.get(i), Some(b'x' | b'X'));
            if hex {
                i += 1;
            }
            let digits_start = i;
            while i < bytes.len()
                && (if hex {
                    bytes[i].is_ascii_hexdigit()
                } else {
                    bytes[i].is_ascii_digit()
                })
            {
                i += 1;
            }
            if i == digits_start {
                return None;
            }
        }
        Some(c) if c.is_ascii_alphabetic() => {
            while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
                i += 1;
            }
        }
        _ => return None,
    }

    (bytes.get(i) == Some(&b';')).then(|| i + 1 - start)
}

/// Escape prose: bare `&` and every `<`. Existing entities pass through.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    escape_with(text, false)
}

/// Escape an attribute value (href, src, alt, title).
pub fn escape_attr(text: &str) -> Cow<'_, str> {
    escape_with(text, true)
}

fn escape_with(text: &str, attribute: bool) -> Cow<'_, str> {
    let needs_escape = |i: usize, ch: char| match ch {
        '&' => entity_len(text, i).is_none(),
        '<' => true,
        '>' | '"' => attribute,
        _ => false,
    };
    let Some(first) = text.char_indices().position(|(i, ch)| needs_escape(i, ch)) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 8);
    for (k, (i, ch)) in text.char_indices().enumerate() {
        if k < first || !needs_escape(i, ch) {
            out.push(ch);
            continue;
        }
        out.push_str(match ch {
            '&' => "&amp;",
            '<' => "&lt;",
            '>' => "&gt;",
            _ => "&quot;",
        });
    }
    Cow::Owned(out)
}

/// Escape code content. Entities are shown literally, so every `&` is escaped.
pub fn escape_code(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}

/// Inline span transformation
///
/// A leaf text run goes through a fixed sequence of passes. Each pass
/// recognizes one construct and swaps it for a placeholder (a protected slot)
/// so later passes never look inside it:
///
/// 1. backslash escapes
/// 2. code spans
/// 3. raw inline HTML
/// 4. images
/// 5. links (link text recurses through the remaining passes)
/// 6. autolinks
/// 7. emphasis and strong, matched with a delimiter stack
/// 8. `&` and `<` escaping of whatever text is left
/// 9. slots and hard-break markers turned back into spans
use crate::ast::Inline;
use crate::error::{ConvertError, Result};
use crate::escape::{escape_attr, escape_code, escape_text};
use crate::options::Options;
use crate::references::ReferenceMap;
use std::collections::{HashMap, HashSet};

/// End-of-line hard break marker, inserted by the block parser
pub const HARD_BREAK: char = '\u{E002}';

const SLOT_OPEN: char = '\u{E000}';
const SLOT_CLOSE: char = '\u{E001}';

/// Characters a backslash makes literal
const ESCAPABLE: &[char] = &[
    '\\', '`', '*', '_', '{', '}', '[', ']', '(', ')', '#', '+', '-', '.', '!', '>',
];

static AUTOLINK_SCHEMES: &[&str] = &["http://", "https://", "ftp://", "mailto:"];

pub struct InlineParser<'a> {
    references: &'a ReferenceMap,
    options: &'a Options,
}

impl<'a> InlineParser<'a> {
    pub fn new(references: &'a ReferenceMap, options: &'a Options) -> Self {
        InlineParser {
            references,
            options,
        }
    }

    /// Transform one leaf text run into spans
    pub fn parse(&self, text: &str) -> Result<Vec<Inline>> {
        let mut run = Run {
            references: self.references,
            options: self.options,
            slots: Vec::new(),
        };

        let text = run.protect_escapes(text);
        let text = run.protect_code_spans(&text);
        let text = if self.options.raw_html {
            run.protect_html(&text)
        } else {
            text
        };
        let text = run.protect_images(&text);
        let text = run.protect_links(&text)?;
        run.finish(&text, 0)
    }
}

/// A protected construct waiting to be substituted back
struct Slot {
    span: Option<Inline>,
    /// Markdown source, for contexts that take text verbatim (code spans)
    source: String,
    /// Plain text, for contexts that want words only (alt text, ids)
    literal: String,
}

/// Resolved destination of a link or image, unescaped
struct Target {
    url: String,
    title: Option<String>,
}

/// Run of `*` or `_` awaiting a partner
#[derive(Debug, Clone, Copy)]
struct Delim {
    ch: char,
    count: usize,
    can_open: bool,
    can_close: bool,
}

enum Piece {
    Text(String), // not yet escaped
    Span(Inline, usize),
    Delim(Delim),
}

/// State for transforming one text run
struct Run<'a> {
    references: &'a ReferenceMap,
    options: &'a Options,
    slots: Vec<Slot>,
}

impl Run<'_> {
    fn protect(&mut self, span: Inline, source: String, literal: String) -> String {
        let index = self.slots.len();
        self.slots.push(Slot {
            span: Some(span),
            source,
            literal,
        });
        format!("{SLOT_OPEN}{index}{SLOT_CLOSE}")
    }

    /// Replace slots by their source (or literal) text and drop break markers
    fn restore(&self, text: &str, source: bool) -> String {
        let mut out = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find([SLOT_OPEN, HARD_BREAK]) {
            out.push_str(&rest[..start]);
            if rest[start..].starts_with(HARD_BREAK) {
                rest = &rest[start + HARD_BREAK.len_utf8()..];
                continue;
            }

            let after = &rest[start + SLOT_OPEN.len_utf8()..];
            match slot_index(after).and_then(|(index, len)| Some((self.slots.get(index)?, len))) {
                Some((slot, len)) => {
                    out.push_str(if source { &slot.source } else { &slot.literal });
                    rest = &after[len..];
                }
                None => {
                    out.push(SLOT_OPEN);
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        out
    }

    fn protect_escapes(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(ch) = chars.next() {
            if ch == '\\' {
                if let Some(&next) = chars.peek().filter(|c| ESCAPABLE.contains(*c)) {
                    chars.next();
                    let literal = next.to_string();
                    let token = self.protect(
                        Inline::Text(escape_text(&literal).into_owned()),
                        format!("\\{next}"),
                        literal,
                    );
                    out.push_str(&token);
                    continue;
                }
            }
            out.push(ch);
        }

        out
    }

    /// A run of N backticks opens a span that the next run of exactly N closes
    fn protect_code_spans(&mut self, text: &str) -> String {
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;
        // Run lengths with no closer further on; later runs can't close either
        let mut unclosed = HashSet::new();

        while i < bytes.len() {
            if bytes[i] != b'`' {
                i += 1;
                continue;
            }

            let ticks = backtick_run(bytes, i);
            let close = if unclosed.contains(&ticks) {
                None
            } else {
                closing_backticks(bytes, i + ticks, ticks)
            };
            let Some(close) = close else {
                unclosed.insert(ticks);
                i += ticks;
                continue;
            };

            out.push_str(&text[copied..i]);
            let interior = self.restore(&text[i + ticks..close], true);
            let content = strip_one_space(&interior).to_string();
            let fence = "`".repeat(ticks);
            let token = self.protect(
                Inline::Code(escape_code(&content).into_owned()),
                format!("{fence}{interior}{fence}"),
                content,
            );
            out.push_str(&token);

            i = close + ticks;
            copied = i;
        }

        out.push_str(&text[copied..]);
        out
    }

    fn protect_html(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;
        let mut unclosed_comment = false;

        while let Some(offset) = text[i..].find('<') {
            let start = i + offset;
            let comment = text[start..].starts_with("<!--");
            if comment && unclosed_comment {
                i = start + 1;
                continue;
            }
            let tag_len = html_tag_len(&text[start..]);
            unclosed_comment |= comment && tag_len.is_none();

            match tag_len {
                Some(len) => {
                    out.push_str(&text[copied..start]);
                    let tag = self.restore(&text[start..start + len], true);
                    let token = self.protect(Inline::RawHtml(tag.clone()), tag, String::new());
                    out.push_str(&token);
                    i = start + len;
                    copied = i;
                }
                None => i = start + 1,
            }
        }

        out.push_str(&text[copied..]);
        out
    }

    fn protect_images(&mut self, text: &str) -> String {
        let brackets = match_brackets(text);
        let destinations = Destinations::new(text);
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'!' || bytes.get(i + 1) != Some(&b'[') {
                i += 1;
                continue;
            }
            let Some(&close) = brackets.get(&(i + 1)) else {
                i += 1;
                continue;
            };

            let alt = &text[i + 2..close];
            let Some((target, end)) = self.link_target(text, close, alt, &destinations) else {
                log::trace!("unresolved image at byte {}", i);
                i += 1;
                continue;
            };

            out.push_str(&text[copied..i]);
            let alt = self.restore(alt, false);
            let source = self.restore(&text[i..end], true);
            let image = Inline::Image {
                src: escape_attr(&target.url).into_owned(),
                alt: escape_attr(&alt).into_owned(),
                title: target.title.as_deref().map(|title| escape_attr(title).into_owned()),
            };
            let token = self.protect(image, source, alt);
            out.push_str(&token);

            i = end;
            copied = i;
        }

        out.push_str(&text[copied..]);
        out
    }

    fn protect_links(&mut self, text: &str) -> Result<String> {
        let brackets = match_brackets(text);
        let destinations = Destinations::new(text);
        let bytes = text.as_bytes();
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;

        while i < bytes.len() {
            if bytes[i] != b'[' {
                i += 1;
                continue;
            }
            let Some(&close) = brackets.get(&i) else {
                i += 1;
                continue;
            };

            let label = &text[i + 1..close];
            let Some((target, end)) = self.link_target(text, close, label, &destinations) else {
                i += 1;
                continue;
            };

            out.push_str(&text[copied..i]);
            let children = self.finish(label, 1)?;
            let literal = self.restore(label, false);
            let source = self.restore(&text[i..end], true);
            let link = Inline::Link {
                href: escape_attr(&target.url).into_owned(),
                title: target.title.as_deref().map(|title| escape_attr(title).into_owned()),
                children,
            };
            let token = self.protect(link, source, literal);
            out.push_str(&token);

            i = end;
            copied = i;
        }

        out.push_str(&text[copied..]);
        Ok(out)
    }

    /// Destination following the `]` at `close`: inline `(url "title")` or a
    /// reference id resolved through the table. `label` is the bracketed text,
    /// used as the id for `[label][]`.
    fn link_target(
        &self,
        text: &str,
        close: usize,
        label: &str,
        destinations: &Destinations,
    ) -> Option<(Target, usize)> {
        let after = close + 1;

        if text[after..].starts_with('(') {
            let (url, title, end) = inline_destination(text, after, destinations)?;
            let target = Target {
                url: self.restore(url, false),
                title: title.map(|title| self.restore(title, false)),
            };
            return Some((target, end));
        }

        let (id, end) = reference_id(text, after)?;
        let id = if id.trim().is_empty() { label } else { id };
        let reference = self.references.get(&self.restore(id, false))?;
        let target = Target {
            url: reference.url.clone(),
            title: reference.title.clone(),
        };
        Some((target, end))
    }

    /// Passes 6 to 9 over `text`; `depth` counts enclosing links
    fn finish(&mut self, text: &str, depth: usize) -> Result<Vec<Inline>> {
        if depth > self.options.max_nesting {
            return Err(self.too_deep());
        }
        let text = self.protect_autolinks(text);
        let pieces = self.tokenize(&text);
        self.match_emphasis(pieces, depth)
    }

    fn too_deep(&self) -> ConvertError {
        log::warn!("inline nesting exceeded {} levels", self.options.max_nesting);
        ConvertError::NestingTooDeep {
            limit: self.options.max_nesting,
        }
    }

    fn protect_autolinks(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut copied = 0;
        let mut i = 0;

        while let Some(offset) = text[i..].find('<') {
            let start = i + offset;
            // An autolink holds no whitespace and no `<`, so the scan stops there
            let target = text[start + 1..]
                .find(|c: char| c == '>' || c == '<' || c.is_whitespace())
                .filter(|&len| text[start + 1 + len..].starts_with('>'))
                .map(|len| &text[start + 1..start + 1 + len])
                .and_then(|inner| Some((inner.len(), autolink_target(&self.restore(inner, false))?)));

            match target {
                Some((len, (href, label))) => {
                    out.push_str(&text[copied..start]);
                    let source = format!("<{}>", &text[start + 1..start + 1 + len]);
                    let link = Inline::AutoLink {
                        href: escape_attr(&href).into_owned(),
                        text: escape_text(&label).into_owned(),
                    };
                    let token = self.protect(link, source, label);
                    out.push_str(&token);
                    i = start + len + 2;
                    copied = i;
                }
                None => i = start + 1,
            }
        }

        out.push_str(&text[copied..]);
        out
    }

    /// Split into text, protected spans and emphasis delimiter runs
    fn tokenize(&mut self, text: &str) -> Vec<Piece> {
        let chars: Vec<char> = text.chars().collect();
        let mut pieces = Vec::new();
        let mut buffer = String::new();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            match ch {
                SLOT_OPEN => {
                    let digits: String = chars[i + 1..]
                        .iter()
                        .take_while(|c| c.is_ascii_digit())
                        .collect();
                    let close = i + 1 + digits.len();
                    let span = (chars.get(close) == Some(&SLOT_CLOSE))
                        .then(|| digits.parse::<usize>().ok())
                        .flatten()
                        .and_then(|index| self.slots.get_mut(index))
                        .and_then(|slot| slot.span.take());

                    match span {
                        Some(span) => {
                            flush_text(&mut buffer, &mut pieces);
                            let depth = span.depth();
                            pieces.push(Piece::Span(span, depth));
                            i = close + 1;
                        }
                        None => {
                            buffer.push(ch);
                            i += 1;
                        }
                    }
                }
                HARD_BREAK => {
                    flush_text(&mut buffer, &mut pieces);
                    pieces.push(Piece::Span(Inline::LineBreak, 1));
                    i += 1;
                }
                '*' | '_' => {
                    let end = i + chars[i..].iter().take_while(|&&c| c == ch).count();
                    let before = i.checked_sub(1).map(|k| chars[k]);
                    let after = chars.get(end).copied();
                    let (can_open, can_close) = flanking(ch, before, after);

                    flush_text(&mut buffer, &mut pieces);
                    pieces.push(Piece::Delim(Delim {
                        ch,
                        count: end - i,
                        can_open,
                        can_close,
                    }));
                    i = end;
                }
                _ => {
                    buffer.push(ch);
                    i += 1;
                }
            }
        }

        flush_text(&mut buffer, &mut pieces);
        pieces
    }

    /// Pair delimiter runs nearest-first. Doubled delimiters on both sides
    /// make strong, otherwise emphasis; leftovers become literal text.
    fn match_emphasis(&self, pieces: Vec<Piece>, depth: usize) -> Result<Vec<Inline>> {
        let mut out: Vec<Piece> = Vec::with_capacity(pieces.len());
        // Indices into `out` of delimiter runs that can still open, one stack
        // for `*` and one for `_`
        let mut openers: [Vec<usize>; 2] = [Vec::new(), Vec::new()];

        for piece in pieces {
            let Piece::Delim(mut closer) = piece else {
                out.push(piece);
                continue;
            };

            let stack = opener_stack(closer.ch);
            if closer.can_close {
                while closer.count > 0 {
                    let Some(&opener_index) = openers[stack].last() else {
                        break;
                    };
                    // Openers after this one end up inside the new span
                    for other in openers.iter_mut() {
                        while other.last().is_some_and(|&index| index > opener_index) {
                            other.pop();
                        }
                    }

                    let Piece::Delim(opener) = &mut out[opener_index] else {
                        break;
                    };
                    let used = if opener.count >= 2 && closer.count >= 2 {
                        2
                    } else {
                        1
                    };
                    opener.count -= used;
                    let opener_left = opener.count;

                    let inner: Vec<Piece> = out.drain(opener_index + 1..).collect();
                    let (children, inner_depth) = collapse(inner);
                    let node_depth = inner_depth + 1;
                    if depth + node_depth > self.options.max_nesting {
                        return Err(self.too_deep());
                    }

                    if opener_left == 0 {
                        out.pop();
                        openers[stack].pop();
                    }
                    let node = if used == 2 {
                        Inline::Strong(children)
                    } else {
                        Inline::Emphasis(children)
                    };
                    out.push(Piece::Span(node, node_depth));
                    closer.count -= used;
                }
            }

            if closer.count > 0 {
                if closer.can_open {
                    openers[stack].push(out.len());
                }
                out.push(Piece::Delim(closer));
            }
        }

        Ok(collapse(out).0)
    }
}

fn opener_stack(ch: char) -> usize {
    if ch == '*' { 0 } else { 1 }
}

fn flush_text(buffer: &mut String, pieces: &mut Vec<Piece>) {
    if !buffer.is_empty() {
        pieces.push(Piece::Text(std::mem::take(buffer)));
    }
}

/// Turn pieces into spans, merging and escaping adjacent text. Also returns
/// the deepest span nesting among them.
fn collapse(pieces: Vec<Piece>) -> (Vec<Inline>, usize) {
    let mut spans = Vec::new();
    let mut text = String::new();
    let mut depth = 0;

    for piece in pieces {
        match piece {
            Piece::Text(raw) => text.push_str(&raw),
            Piece::Delim(delim) => text.extend(std::iter::repeat_n(delim.ch, delim.count)),
            Piece::Span(span, span_depth) => {
                if !text.is_empty() {
                    spans.push(Inline::Text(escape_text(&text).into_owned()));
                    text.clear();
                }
                depth = depth.max(span_depth);
                spans.push(span);
            }
        }
    }
    if !text.is_empty() {
        spans.push(Inline::Text(escape_text(&text).into_owned()));
    }

    (spans, depth)
}

/// Whether a delimiter run can open and/or close. Underscores inside a word
/// do neither.
fn flanking(ch: char, before: Option<char>, after: Option<char>) -> (bool, bool) {
    if ch == '_'
        && before.is_some_and(char::is_alphanumeric)
        && after.is_some_and(char::is_alphanumeric)
    {
        return (false, false);
    }
    let can_open = after.is_some_and(|c| !c.is_whitespace());
    let can_close = before.is_some_and(|c| !c.is_whitespace());
    (can_open, can_close)
}

/// Parse the digits and closing mark of a slot; `text` starts after SLOT_OPEN
fn slot_index(text: &str) -> Option<(usize, usize)> {
    let end = text.find(SLOT_CLOSE)?;
    let index = text[..end].parse().ok()?;
    Some((index, end + SLOT_CLOSE.len_utf8()))
}

fn backtick_run(bytes: &[u8], start: usize) -> usize {
    bytes[start..].iter().take_while(|&&b| b == b'`').count()
}

fn closing_backticks(bytes: &[u8], from: usize, ticks: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let run = backtick_run(bytes, i);
            if run == ticks {
                return Some(i);
            }
            i += run;
        } else {
            i += 1;
        }
    }
    None
}

/// Drop one leading and one trailing space, only when both are present
fn strip_one_space(text: &str) -> &str {
    if text.len() >= 2 && text.starts_with(' ') && text.ends_with(' ') {
        &text[1..text.len() - 1]
    } else {
        text
    }
}

/// Byte length of an HTML tag or comment at the start of `text`
fn html_tag_len(text: &str) -> Option<usize> {
    if let Some(body) = text.strip_prefix("<!--") {
        return body.find("-->").map(|end| 4 + end + 3);
    }

    let bytes = text.as_bytes();
    let mut i = 1;
    if bytes.get(i) == Some(&b'/') {
        i += 1;
    }
    if !bytes.get(i).is_some_and(u8::is_ascii_alphabetic) {
        return None;
    }
    while bytes
        .get(i)
        .is_some_and(|b| b.is_ascii_alphanumeric() || *b == b'-')
    {
        i += 1;
    }

    match bytes.get(i) {
        Some(b'>') => return Some(i + 1),
        Some(b) if b.is_ascii_whitespace() || *b == b'/' => {}
        _ => return None,
    }

    while i < bytes.len() {
        match bytes[i] {
            b'>' => return Some(i + 1),
            b'<' => return None,
            quote @ (b'"' | b'\'') => {
                let len = text[i + 1..].find([quote as char, '<'])?;
                if text.as_bytes()[i + 1 + len] == b'<' {
                    return None;
                }
                i += len + 2;
            }
            _ => i += 1,
        }
    }
    None
}

/// Map each `[` to its balanced `]`, in one pass
fn match_brackets(text: &str) -> HashMap<usize, usize> {
    let mut pairs = HashMap::new();
    let mut stack = Vec::new();
    for (i, b) in text.bytes().enumerate() {
        match b {
            b'[' => stack.push(i),
            b']' => {
                if let Some(open) = stack.pop() {
                    pairs.insert(open, i);
                }
            }
            _ => {}
        }
    }
    pairs
}

fn skip_whitespace(bytes: &[u8], mut i: usize) -> usize {
    while bytes.get(i).is_some_and(u8::is_ascii_whitespace) {
        i += 1;
    }
    i
}

/// Where inline destinations end, computed once per text run so that every
/// `](` candidate is resolved without rescanning the rest of the text
struct Destinations {
    len: usize,
    /// End of a bare url starting at each index: the first whitespace or
    /// unbalanced `)`
    url_end: Vec<usize>,
    /// For `"`, `'` and `)`: the next index holding that character followed
    /// by optional whitespace and `)`
    title_close: [Vec<usize>; 3],
}

impl Destinations {
    fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let len = bytes.len();

        let mut url_end = vec![len; len + 1];
        for s in (0..len).rev() {
            url_end[s] = match bytes[s] {
                b')' => s,
                b if b.is_ascii_whitespace() => s,
                b'(' => {
                    // Skip the balanced group, or stop where it breaks off
                    let inner = url_end[s + 1];
                    if bytes.get(inner) == Some(&b')') {
                        url_end[inner + 1]
                    } else {
                        inner
                    }
                }
                _ => url_end[s + 1],
            };
        }

        let mut non_space = vec![len; len + 1];
        for s in (0..len).rev() {
            non_space[s] = if bytes[s].is_ascii_whitespace() {
                non_space[s + 1]
            } else {
                s
            };
        }

        let title_close = [b'"', b'\'', b')'].map(|quote| {
            let mut next = vec![len; len + 1];
            for s in (0..len).rev() {
                let closes = bytes[s] == quote && bytes.get(non_space[s + 1]) == Some(&b')');
                next[s] = if closes { s } else { next[s + 1] };
            }
            next
        });

        Destinations {
            len,
            url_end,
            title_close,
        }
    }

    /// Closing quote of a title opened by `open_quote`, searching from `from`
    fn title_close(&self, open_quote: u8, from: usize) -> Option<usize> {
        let table = match open_quote {
            b'"' => &self.title_close[0],
            b'\'' => &self.title_close[1],
            _ => &self.title_close[2],
        };
        table.get(from).copied().filter(|&close| close < self.len)
    }
}

/// `(url "title")` starting at the `(` at `open`. Returns url, title and the
/// index just past the closing paren.
fn inline_destination<'t>(
    text: &'t str,
    open: usize,
    destinations: &Destinations,
) -> Option<(&'t str, Option<&'t str>, usize)> {
    let bytes = text.as_bytes();
    let mut i = skip_whitespace(bytes, open + 1);

    let url = if bytes.get(i) == Some(&b'<') {
        let len = text[i + 1..].find(['>', '<', '\n'])?;
        let end = i + 1 + len;
        if bytes[end] != b'>' {
            return None;
        }
        let url = &text[i + 1..end];
        i = end + 1;
        url
    } else {
        let start = i;
        i = destinations.url_end[start];
        &text[start..i]
    };

    i = skip_whitespace(bytes, i);
    let mut title = None;
    if let Some(&open_quote @ (b'"' | b'\'' | b'(')) = bytes.get(i) {
        // The title ends at the first quote that is followed by the closing paren
        let close = destinations.title_close(open_quote, i + 1)?;
        title = Some(&text[i + 1..close]);
        i = skip_whitespace(bytes, close + 1);
    }

    (bytes.get(i) == Some(&b')')).then_some((url, title, i + 1))
}

/// `[id]` after a link's text: directly adjacent, after one space, or on the
/// next line after optional indentation. Returns the raw id and the index
/// just past its `]`.
fn reference_id(text: &str, after: usize) -> Option<(&str, usize)> {
    let rest = &text[after..];
    let skip = if rest.starts_with('[') {
        0
    } else if rest.starts_with(" [") {
        1
    } else if let Some(next_line) = rest.strip_prefix('\n') {
        let indent = next_line.len() - next_line.trim_start_matches(' ').len();
        if !next_line[indent..].starts_with('[') {
            return None;
        }
        1 + indent
    } else {
        return None;
    };

    let start = after + skip + 1;
    let end = start + text[start..].find([']', '['])?;
    if text.as_bytes()[end] != b']' {
        return None;
    }
    Some((&text[start..end], end + 1))
}

/// Href and visible text for the inside of `<...>`, if it is an autolink
fn autolink_target(inner: &str) -> Option<(String, String)> {
    if inner.is_empty() || inner.contains(|c: char| c.is_whitespace() || c == '<') {
        return None;
    }

    let lower = inner.to_ascii_lowercase();
    if AUTOLINK_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
    {
        return Some((inner.to_string(), inner.to_string()));
    }

    is_email(inner).then(|| (format!("mailto:{inner}"), inner.to_string()))
}

fn is_email(text: &str) -> bool {
    let Some((local, domain)) = text.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && domain
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-'))
}

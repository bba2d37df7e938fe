/// Source normalization ahead of block parsing
///
/// Turns the raw input into a sequence of [`Line`]s: line endings unified,
/// tabs expanded, hard-break trailing spaces split off, and block-level HTML
/// regions collapsed into single verbatim entries.
use crate::options::Options;
use std::borrow::Cow;

pub const TAB_WIDTH: usize = 4;

/// Private-use characters the inline transformer uses as placeholders.
/// They are replaced in the source so input can never forge one.
pub const RESERVED_CHARS: [char; 3] = ['\u{E000}', '\u{E001}', '\u{E002}'];

/// Tags that open a literal HTML block when they start a line
static BLOCK_TAGS: &[&str] = &[
    "p",
    "div",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "blockquote",
    "pre",
    "table",
    "dl",
    "ol",
    "ul",
    "script",
    "noscript",
    "form",
    "fieldset",
    "iframe",
    "math",
    "ins",
    "del",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(TextLine),
    /// A literal HTML block, verbatim, possibly spanning several source lines
    Html(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    /// Trailing spaces split off the source line; only set when two or more
    pub trailing: usize,
}

impl TextLine {
    pub fn new(raw: &str) -> Self {
        let content = raw.trim_end_matches(' ');
        let trailing = raw.len() - content.len();
        if trailing >= 2 {
            TextLine {
                text: content.to_string(),
                trailing,
            }
        } else {
            TextLine {
                text: raw.to_string(),
                trailing: 0,
            }
        }
    }

    /// Same break marker, different text (after dequoting or de-denting)
    pub fn with_text(&self, text: String) -> Self {
        TextLine {
            text,
            trailing: self.trailing,
        }
    }

    pub fn hard_break(&self) -> bool {
        self.trailing >= 2
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// The line as it appeared after tab expansion
    pub fn raw(&self) -> String {
        format!("{}{}", self.text, " ".repeat(self.trailing))
    }
}

impl Line {
    pub fn is_blank(&self) -> bool {
        match self {
            Line::Text(line) => line.is_blank(),
            Line::Html(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&TextLine> {
        match self {
            Line::Text(line) => Some(line),
            Line::Html(_) => None,
        }
    }
}

/// Run the whole preprocessing stage over a source document
pub fn preprocess(source: &str, options: &Options) -> Vec<Line> {
    let source = replace_reserved(source);
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<Line> = normalized
        .split('\n')
        .map(|raw| Line::Text(TextLine::new(&expand_tabs(raw))))
        .collect();
    if normalized.ends_with('\n') {
        lines.pop();
    }

    if options.raw_html {
        lines = extract_html_blocks(lines);
    }

    log::debug!("preprocessed {} lines", lines.len());
    lines
}

fn replace_reserved(source: &str) -> Cow<'_, str> {
    if !source.contains(RESERVED_CHARS) {
        return Cow::Borrowed(source);
    }
    log::warn!("replacing reserved private-use characters in input");
    Cow::Owned(
        source
            .chars()
            .map(|c| {
                if RESERVED_CHARS.contains(&c) {
                    char::REPLACEMENT_CHARACTER
                } else {
                    c
                }
            })
            .collect(),
    )
}

/// Expand tabs to spaces, advancing to the next multiple of [`TAB_WIDTH`]
pub fn expand_tabs(line: &str) -> String {
    if !line.contains('\t') {
        return line.to_string();
    }

    let mut result = String::with_capacity(line.len() + TAB_WIDTH);
    let mut col = 0;
    for ch in line.chars() {
        if ch == '\t' {
            let spaces = TAB_WIDTH - col % TAB_WIDTH;
            result.push_str(&" ".repeat(spaces));
            col += spaces;
        } else {
            result.push(ch);
            col += 1;
        }
    }
    result
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HtmlStart {
    Comment,
    Rule,
    Tag(String),
}

/// Collapse block-level HTML regions into [`Line::Html`] entries.
///
/// A region must start at a block boundary (first line or after a blank line)
/// with at most three columns of indent. Called on the top-level document and
/// again on every blockquote and list item body.
pub fn extract_html_blocks(lines: Vec<Line>) -> Vec<Line> {
    let mut result = Vec::with_capacity(lines.len());
    let mut i = 0;

    while i < lines.len() {
        let at_boundary = i == 0 || lines[i - 1].is_blank();
        let start = match &lines[i] {
            Line::Text(line) if at_boundary => html_block_start(&line.text),
            _ => None,
        };

        match start {
            Some(start) => {
                let end = html_block_end(&lines, i, &start);
                let verbatim: Vec<String> = lines[i..=end]
                    .iter()
                    .map(|line| match line {
                        Line::Text(line) => line.raw(),
                        Line::Html(html) => html.clone(),
                    })
                    .collect();
                log::trace!("html block {:?} over lines {}..={}", start, i, end);
                result.push(Line::Html(verbatim.join("\n")));
                i = end + 1;
            }
            None => {
                result.push(lines[i].clone());
                i += 1;
            }
        }
    }

    result
}

fn html_block_start(text: &str) -> Option<HtmlStart> {
    let trimmed = text.trim_start();
    if text.len() - trimmed.len() > 3 {
        return None;
    }
    if trimmed.starts_with("<!--") {
        return Some(HtmlStart::Comment);
    }

    let after = trimmed.strip_prefix('<')?;
    let name_len = after
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(after.len());
    let name = after[..name_len].to_ascii_lowercase();
    let boundary = after[name_len..]
        .chars()
        .next()
        .is_none_or(|c| c.is_whitespace() || c == '>' || c == '/');
    if !boundary {
        return None;
    }

    if name == "hr" {
        Some(HtmlStart::Rule)
    } else if BLOCK_TAGS.contains(&name.as_str()) {
        Some(HtmlStart::Tag(name))
    } else {
        None
    }
}

/// Index of the last line of the HTML block that starts at `start`
fn html_block_end(lines: &[Line], start: usize, kind: &HtmlStart) -> usize {
    let closed = match kind {
        HtmlStart::Rule => Some(start),
        HtmlStart::Comment => {
            let mut found = None;
            for (offset, line) in lines[start..].iter().enumerate() {
                let Line::Text(line) = line else { continue };
                // Skip the opener itself so `<!-->` doesn't count as closed
                let haystack = if offset == 0 {
                    line.text.trim_start().get(4..).unwrap_or("")
                } else {
                    line.text.as_str()
                };
                if haystack.contains("-->") {
                    found = Some(start + offset);
                    break;
                }
            }
            found
        }
        HtmlStart::Tag(name) => {
            let mut depth: isize = 0;
            let mut found = None;
            for (offset, line) in lines[start..].iter().enumerate() {
                let Line::Text(line) = line else { continue };
                let (opens, closes) = count_tags(&line.text, name);
                depth += opens as isize - closes as isize;
                if depth <= 0 {
                    found = Some(start + offset);
                    break;
                }
            }
            found
        }
    };

    closed.unwrap_or_else(|| {
        // Unclosed: the block runs to the next blank line
        lines[start + 1..]
            .iter()
            .position(Line::is_blank)
            .map_or(lines.len() - 1, |pos| start + pos)
    })
}

/// Count `<name ...>` openers and `</name>` closers on one line
fn count_tags(text: &str, name: &str) -> (usize, usize) {
    let lower = text.to_ascii_lowercase();
    let open_pat = format!("<{}", name);
    let close_pat = format!("</{}", name);

    let opens = lower
        .match_indices(&open_pat)
        .filter(|(pos, _)| {
            lower[pos + open_pat.len()..]
                .chars()
                .next()
                .is_none_or(|c| c.is_whitespace() || c == '>' || c == '/')
        })
        .count();
    let closes = lower
        .match_indices(&close_pat)
        .filter(|(pos, _)| {
            lower[pos + close_pat.len()..]
                .trim_start()
                .starts_with('>')
        })
        .count();

    (opens, closes)
}

/// Block structure parser
use crate::ast::{Block, ListItem};
use crate::error::{ConvertError, Result};
use crate::escape::escape_code;
use crate::inline::{HARD_BREAK, InlineParser};
use crate::options::Options;
use crate::preprocess::{Line, TAB_WIDTH, TextLine, extract_html_blocks};
use crate::references::ReferenceMap;

/// A bullet or `digits.` marker at the start of a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ListMarker {
    ordered: bool,
    /// Columns from the start of the line to the item content
    width: usize,
}

pub struct Parser<'a> {
    inline: InlineParser<'a>,
    max_nesting: usize,
    raw_html: bool,
}

impl<'a> Parser<'a> {
    pub fn new(references: &'a ReferenceMap, options: &'a Options) -> Self {
        Parser {
            inline: InlineParser::new(references, options),
            max_nesting: options.max_nesting,
            raw_html: options.raw_html,
        }
    }

    /// Parse preprocessed lines (with reference definitions already removed)
    pub fn parse(&self, lines: &[Line]) -> Result<Vec<Block>> {
        let blocks = self.parse_blocks(lines, 0, false)?;
        log::debug!("parsed {} top-level blocks", blocks.len());
        Ok(blocks)
    }

    /// `in_list` is set for list item bodies, where a list marker line
    /// interrupts a paragraph so nested lists need no blank line.
    fn parse_blocks(&self, lines: &[Line], depth: usize, in_list: bool) -> Result<Vec<Block>> {
        if depth > self.max_nesting {
            log::warn!("block nesting exceeded {} levels", self.max_nesting);
            return Err(ConvertError::NestingTooDeep {
                limit: self.max_nesting,
            });
        }

        let mut blocks = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let line = match &lines[i] {
                Line::Html(html) => {
                    blocks.push(Block::RawHtml(html.clone()));
                    i += 1;
                    continue;
                }
                Line::Text(line) => line,
            };
            let text = line.text.as_str();

            if line.is_blank() {
                i += 1;
            } else if let Some((level, content)) = atx_header(text) {
                let children = self.inline.parse(content)?;
                blocks.push(Block::Header { level, children });
                i += 1;
            } else if is_horizontal_rule(text) {
                blocks.push(Block::HorizontalRule);
                i += 1;
            } else if let Some(level) =
                setext_level(lines.get(i + 1)).filter(|_| count_indent(text) < TAB_WIDTH)
            {
                let children = self.inline.parse(text.trim())?;
                blocks.push(Block::Header { level, children });
                i += 2;
            } else if is_blockquote_start(text) {
                let (blockquote, consumed) = self.parse_blockquote(&lines[i..], depth)?;
                blocks.push(blockquote);
                i += consumed;
            } else if let Some(marker) = list_marker(text) {
                let (list, consumed) = self.parse_list(&lines[i..], marker, depth)?;
                blocks.push(list);
                i += consumed;
            } else if count_indent(text) >= TAB_WIDTH {
                let (code_block, consumed) = parse_code_block(&lines[i..]);
                blocks.push(code_block);
                i += consumed;
            } else {
                let (paragraph, consumed) = self.parse_paragraph(&lines[i..], in_list)?;
                blocks.extend(paragraph);
                i += consumed;
            }
        }

        Ok(blocks)
    }

    /// `>` lines, their lazy continuations, and further `>` groups separated
    /// only by blank lines
    fn parse_blockquote(&self, lines: &[Line], depth: usize) -> Result<(Block, usize)> {
        let mut quoted = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Line::Text(line) = &lines[i] else {
                break;
            };

            if is_blockquote_start(&line.text) {
                quoted.push(Line::Text(line.with_text(strip_quote_marker(&line.text))));
                i += 1;
            } else if !line.is_blank() {
                // Lazy continuation
                quoted.push(lines[i].clone());
                i += 1;
            } else {
                let next = next_non_blank(lines, i);
                match next {
                    Some(k)
                        if lines[k]
                            .as_text()
                            .is_some_and(|next| is_blockquote_start(&next.text)) =>
                    {
                        quoted.extend(lines[i..k].iter().cloned());
                        i = k;
                    }
                    _ => break,
                }
            }
        }

        let body = self.nested_body(quoted);
        let children = self.parse_blocks(&body, depth + 1, false)?;
        Ok((Block::BlockQuote(children), i))
    }

    fn parse_list(&self, lines: &[Line], first: ListMarker, depth: usize) -> Result<(Block, usize)> {
        let mut bodies = Vec::new();
        let mut loose = false;
        let mut i = 0;

        // `i` points at a marker line at the top of each iteration
        loop {
            let (body, consumed, gap) = collect_list_item(&lines[i..]);
            bodies.push(body);
            loose |= gap;
            i += consumed;

            let Some(k) = next_non_blank(lines, i) else {
                break;
            };
            let starts_item = lines[k]
                .as_text()
                .is_some_and(|next| list_marker(&next.text).is_some() && !is_horizontal_rule(&next.text));
            if !starts_item {
                break;
            }
            if k > i {
                loose = true;
            }
            i = k;
        }

        let items = bodies
            .into_iter()
            .map(|body| {
                let body = self.nested_body(body);
                let blocks = self.parse_blocks(&body, depth + 1, true)?;
                Ok(ListItem { blocks })
            })
            .collect::<Result<Vec<_>>>()?;

        log::trace!(
            "list of {} items (ordered: {}, loose: {})",
            items.len(),
            first.ordered,
            loose
        );
        let list = Block::List {
            ordered: first.ordered,
            tight: !loose,
            items,
        };
        Ok((list, i))
    }

    /// HTML blocks are recognized again inside blockquote and list item bodies
    fn nested_body(&self, lines: Vec<Line>) -> Vec<Line> {
        if self.raw_html {
            extract_html_blocks(lines)
        } else {
            lines
        }
    }

    fn parse_paragraph(&self, lines: &[Line], in_list: bool) -> Result<(Option<Block>, usize)> {
        let mut paragraph_lines = Vec::new();
        let mut i = 0;

        while i < lines.len() {
            let Line::Text(line) = &lines[i] else {
                break;
            };
            if line.is_blank() {
                break;
            }
            if i > 0
                && (interrupts_paragraph(&line.text, in_list)
                    || setext_level(lines.get(i + 1)).is_some())
            {
                break;
            }
            paragraph_lines.push(line);
            i += 1;
        }

        let mut text = join_paragraph(&paragraph_lines);
        if followed_by_code(&lines[i..]) {
            match strip_code_colon(&text) {
                Some(stripped) => text = stripped,
                None => return Ok((None, i)),
            }
        }

        let children = self.inline.parse(&text)?;
        Ok((Some(Block::Paragraph(children)), i))
    }
}

/// Lines belonging to the list item whose marker is on `lines[0]`, de-dented.
/// Also returns how many lines were consumed and whether a blank line
/// separates content inside the item.
fn collect_list_item(lines: &[Line]) -> (Vec<Line>, usize, bool) {
    let Some(first) = lines.first().and_then(Line::as_text) else {
        return (Vec::new(), lines.len().min(1), false);
    };
    let Some(marker) = list_marker(&first.text) else {
        return (vec![lines[0].clone()], 1, false);
    };
    let dedent = marker.width.min(TAB_WIDTH);

    let mut body = vec![Line::Text(first.with_text(first.text[marker.width..].to_string()))];
    let mut gap = false;
    let mut i = 1;

    while i < lines.len() {
        let Line::Text(line) = &lines[i] else {
            break;
        };

        if line.is_blank() {
            // Blank lines stay in the item only when indented content follows
            let next = next_non_blank(lines, i)
                .filter(|&k| lines[k].as_text().is_some_and(|l| count_indent(&l.text) >= dedent));
            match next {
                Some(k) => {
                    body.extend((i..k).map(|_| Line::Text(TextLine::default())));
                    gap = true;
                    i = k;
                    continue;
                }
                None => break,
            }
        }

        let indent = count_indent(&line.text);
        if indent < dedent && (list_marker(&line.text).is_some() || is_horizontal_rule(&line.text))
        {
            break;
        }

        body.push(Line::Text(line.with_text(remove_indent(&line.text, dedent))));
        i += 1;
    }

    (body, i, gap)
}

/// Indented lines, including blank lines between them. Trailing blank lines
/// are left for the caller.
fn parse_code_block(lines: &[Line]) -> (Block, usize) {
    let mut end = 0;
    let mut i = 0;

    while i < lines.len() {
        let Line::Text(line) = &lines[i] else {
            break;
        };
        if !line.is_blank() {
            if count_indent(&line.text) < TAB_WIDTH {
                break;
            }
            end = i + 1;
        }
        i += 1;
    }

    let code: Vec<String> = lines[..end]
        .iter()
        .filter_map(Line::as_text)
        .map(|line| remove_indent(&line.raw(), TAB_WIDTH))
        .collect();
    log::trace!("code block of {} lines", code.len());

    (Block::CodeBlock(escape_code(&code.join("\n")).into_owned()), end)
}

/// Join paragraph lines, marking hard breaks. The first line loses its
/// leading whitespace and the last line its trailing whitespace.
fn join_paragraph(lines: &[&TextLine]) -> String {
    let mut text = String::new();
    let last = lines.len().saturating_sub(1);

    for (k, line) in lines.iter().enumerate() {
        if k == 0 {
            text.push_str(line.text.trim_start());
        } else {
            text.push('\n');
            text.push_str(&line.text);
        }
        if k < last && line.hard_break() {
            text.push(HARD_BREAK);
        }
    }

    text.truncate(text.trim_end().len());
    text
}

fn followed_by_code(rest: &[Line]) -> bool {
    let blanks = rest.iter().take_while(|line| line.is_blank()).count();
    blanks > 0
        && rest
            .get(blanks)
            .and_then(Line::as_text)
            .is_some_and(|line| count_indent(&line.text) >= TAB_WIDTH)
}

/// A paragraph introducing a code block drops a detached trailing colon
/// (`text :`). Returns `None` when nothing but the colon is left.
fn strip_code_colon(text: &str) -> Option<String> {
    let trimmed = text.trim_end();
    if trimmed == ":" {
        return None;
    }
    match trimmed.strip_suffix(':') {
        Some(before) if before.ends_with(char::is_whitespace) => {
            Some(before.trim_end().to_string())
        }
        _ => Some(text.to_string()),
    }
}

fn interrupts_paragraph(text: &str, in_list: bool) -> bool {
    atx_header(text).is_some()
        || is_horizontal_rule(text)
        || is_blockquote_start(text)
        || (in_list && list_marker(text).is_some())
}

fn next_non_blank(lines: &[Line], from: usize) -> Option<usize> {
    lines
        .get(from..)?
        .iter()
        .position(|line| !line.is_blank())
        .map(|offset| from + offset)
}

/// Level and content of an ATX header; closing `#`s are dropped
fn atx_header(text: &str) -> Option<(u8, &str)> {
    let trimmed = text.trim_start();
    if text.len() - trimmed.len() > 3 {
        return None;
    }

    let level = trimmed.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &trimmed[level..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let content = rest.trim().trim_end_matches('#').trim_end();
    Some((level as u8, content))
}

/// Level of a setext underline: `=` for 1, `-` for 2
fn setext_level(line: Option<&Line>) -> Option<u8> {
    let text = line?.as_text()?.text.trim_end();
    let trimmed = text.trim_start();
    if trimmed.is_empty() || text.len() - trimmed.len() > 3 {
        return None;
    }

    if trimmed.chars().all(|c| c == '=') {
        Some(1)
    } else if trimmed.chars().all(|c| c == '-') {
        Some(2)
    } else {
        None
    }
}

fn is_horizontal_rule(text: &str) -> bool {
    // Three or more of the same `*`, `-` or `_`, spaces allowed in between
    if count_indent(text) > 3 {
        return false;
    }

    let chars_only: Vec<char> = text.chars().filter(|c| !c.is_whitespace()).collect();
    if chars_only.len() < 3 {
        return false;
    }

    match chars_only[0] {
        first @ ('-' | '_' | '*') => chars_only.iter().all(|&c| c == first),
        _ => false,
    }
}

fn is_blockquote_start(text: &str) -> bool {
    count_indent(text) <= 3 && text.trim_start().starts_with('>')
}

/// Drop the `>` and one following space
fn strip_quote_marker(text: &str) -> String {
    let trimmed = text.trim_start();
    let after = trimmed.strip_prefix('>').unwrap_or(trimmed);
    after.strip_prefix(' ').unwrap_or(after).to_string()
}

fn list_marker(text: &str) -> Option<ListMarker> {
    let indent = count_indent(text);
    if indent > 3 {
        return None;
    }

    let rest = &text[indent..];
    let (ordered, marker_len) = match rest.as_bytes().first()? {
        b'*' | b'+' | b'-' => (false, 1),
        b'0'..=b'9' => {
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if rest.as_bytes().get(digits) != Some(&b'.') {
                return None;
            }
            (true, digits + 1)
        }
        _ => return None,
    };

    let after = &rest[marker_len..];
    let spaces = after.len() - after.trim_start_matches(' ').len();
    if spaces == 0 {
        return None;
    }

    Some(ListMarker {
        ordered,
        width: indent + marker_len + spaces,
    })
}

/// Leading spaces (tabs are already expanded)
fn count_indent(text: &str) -> usize {
    text.len() - text.trim_start_matches(' ').len()
}

/// Remove up to `columns` leading spaces
fn remove_indent(text: &str, columns: usize) -> String {
    text[count_indent(text).min(columns)..].to_string()
}

/// HTML renderer for the document tree
use crate::ast::{Block, Document, Inline, ListItem};

/// Indent applied to every line inside a blockquote
const BLOCKQUOTE_INDENT: &str = "    ";

pub struct HtmlRenderer;

impl HtmlRenderer {
    pub fn new() -> Self {
        HtmlRenderer
    }

    /// Render a document as an HTML fragment. Top-level blocks are separated
    /// by a blank line and there is no trailing newline.
    pub fn render(&self, document: &Document) -> String {
        render_blocks(&document.blocks, "\n\n")
    }
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn render_blocks(blocks: &[Block], separator: &str) -> String {
    blocks
        .iter()
        .map(render_block)
        .collect::<Vec<_>>()
        .join(separator)
}

fn render_block(block: &Block) -> String {
    match block {
        Block::Paragraph(children) => format!("<p>{}</p>", render_inlines(children)),
        Block::Header { level, children } => {
            format!("<h{}>{}</h{}>", level, render_inlines(children), level)
        }
        Block::HorizontalRule => "<hr/>".to_string(),
        Block::CodeBlock(code) => format!("<pre><code>{}\n</code></pre>", code),
        Block::BlockQuote(children) => {
            let content = render_blocks(children, "\n\n");
            let indented: Vec<String> = content
                .split('\n')
                .map(|line| format!("{}{}", BLOCKQUOTE_INDENT, line))
                .collect();
            format!("<blockquote>\n{}\n</blockquote>", indented.join("\n"))
        }
        Block::List {
            ordered,
            tight,
            items,
        } => {
            let tag = if *ordered { "ol" } else { "ul" };
            let content: Vec<String> = items
                .iter()
                .map(|item| render_list_item(item, *tight))
                .collect();
            format!("<{}>\n{}\n</{}>", tag, content.join("\n"), tag)
        }
        Block::RawHtml(html) => html.clone(),
    }
}

fn render_list_item(item: &ListItem, tight: bool) -> String {
    let content = if tight {
        // Paragraphs in tight items are rendered without <p>
        item.blocks
            .iter()
            .map(|block| match block {
                Block::Paragraph(children) => render_inlines(children),
                other => render_block(other),
            })
            .collect::<Vec<_>>()
            .join("\n")
    } else {
        render_blocks(&item.blocks, "\n\n")
    };
    format!("<li>{}</li>", content)
}

fn render_inlines(spans: &[Inline]) -> String {
    spans.iter().map(render_inline).collect()
}

fn render_inline(span: &Inline) -> String {
    match span {
        Inline::Text(text) => text.clone(),
        Inline::LineBreak => "<br/>".to_string(),
        Inline::Emphasis(children) => format!("<em>{}</em>", render_inlines(children)),
        Inline::Strong(children) => format!("<strong>{}</strong>", render_inlines(children)),
        Inline::Code(code) => format!("<code>{}</code>", code),
        Inline::Link {
            href,
            title,
            children,
        } => format!(
            "<a href=\"{}\"{}>{}</a>",
            href,
            title_attr(title.as_deref()),
            render_inlines(children)
        ),
        Inline::Image { src, alt, title } => format!(
            "<img src=\"{}\" alt=\"{}\"{}/>",
            src,
            alt,
            title_attr(title.as_deref())
        ),
        Inline::AutoLink { href, text } => format!("<a href=\"{}\">{}</a>", href, text),
        Inline::RawHtml(html) => html.clone(),
    }
}

fn title_attr(title: Option<&str>) -> String {
    title
        .map(|title| format!(" title=\"{}\"", title))
        .unwrap_or_default()
}

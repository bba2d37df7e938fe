/// AST node types for converted documents
use serde::{Deserialize, Serialize};

/// The block tree produced by one conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Block {
    Paragraph(Vec<Inline>),
    Header {
        level: u8,
        children: Vec<Inline>,
    },
    HorizontalRule,
    /// Code block content, already HTML-escaped, without the final newline
    CodeBlock(String),
    BlockQuote(Vec<Block>),
    List {
        ordered: bool,
        tight: bool, // Tight lists don't wrap item paragraphs in <p>
        items: Vec<ListItem>,
    },
    RawHtml(String), // Passed through unchanged
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListItem {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Inline {
    Text(String), // HTML-safe already
    LineBreak,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Code(String), // Escaped code span content
    Link {
        href: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
    AutoLink {
        href: String,
        text: String,
    },
    RawHtml(String),
}

impl Inline {
    /// Nesting depth of this span, counting itself
    pub fn depth(&self) -> usize {
        match self {
            Inline::Emphasis(children)
            | Inline::Strong(children)
            | Inline::Link { children, .. } => {
                1 + children.iter().map(Inline::depth).max().unwrap_or(0)
            }
            _ => 1,
        }
    }
}

/// A Markdown to HTML converter for the BlueCloth dialect
pub mod ast;
pub mod error;
pub mod escape;
pub mod inline;
pub mod options;
pub mod parser;
pub mod preprocess;
pub mod references;
pub mod renderer;

pub use ast::Document;
pub use error::{ConvertError, Result};
pub use options::Options;
pub use renderer::HtmlRenderer;

use parser::Parser;

/// Convert markdown text to an HTML fragment with default options
pub fn convert(source: &str) -> Result<String> {
    convert_with_options(source, &Options::default())
}

pub fn convert_with_options(source: &str, options: &Options) -> Result<String> {
    let document = parse(source, options)?;
    Ok(HtmlRenderer::new().render(&document))
}

/// Convert raw bytes, which must be valid UTF-8
pub fn convert_bytes(source: &[u8], options: &Options) -> Result<String> {
    let source = std::str::from_utf8(source)?;
    convert_with_options(source, options)
}

/// Parse markdown text into a document tree without rendering it
pub fn parse(source: &str, options: &Options) -> Result<Document> {
    let lines = preprocess::preprocess(source, options);
    let (lines, references) = references::extract(lines);
    let blocks = Parser::new(&references, options).parse(&lines)?;
    Ok(Document { blocks })
}

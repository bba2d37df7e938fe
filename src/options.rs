/// Conversion options
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_NESTING: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Pass literal HTML blocks and inline tags through. When off, every `<`
    /// in the source is escaped.
    pub raw_html: bool,
    /// Deepest allowed nesting of blockquotes, list items, link text and
    /// emphasis before the conversion is abandoned.
    pub max_nesting: usize,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw_html(mut self, enabled: bool) -> Self {
        self.raw_html = enabled;
        self
    }

    pub fn max_nesting(mut self, limit: usize) -> Self {
        self.max_nesting = limit;
        self
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            raw_html: true,
            max_nesting: DEFAULT_MAX_NESTING,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::new();
        assert!(options.raw_html);
        assert_eq!(options.max_nesting, DEFAULT_MAX_NESTING);
    }

    #[test]
    fn test_builder_setters() {
        let options = Options::new().raw_html(false).max_nesting(3);
        assert!(!options.raw_html);
        assert_eq!(options.max_nesting, 3);
    }
}

//! Configuration of a Reader and of the grammar its lexer recognizes

/// The lexical conventions of a descriptor file. These are fixed by the
/// file format rather than chosen per file, but are held in one place so
/// the lexer doesn't hard code them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grammar {
    pub quote: char,
    pub escape: char,
    pub block_open: char,
    pub block_close: char,
    pub concatenate: char,
    pub line_comment: Option<&'static str>,
    /// Words which, along with any block immediately following them, are
    /// discarded. Matched ignoring case.
    pub comment_keywords: &'static [&'static str],
    /// A word beginning with one of these characters is commented out,
    /// along with any block immediately following it.
    pub comment_prefixes: &'static [char],
    /// Signature line some files carry ahead of their content.
    pub signature: Option<&'static str>,
    pub include_keyword: &'static str,
}

impl Grammar {
    pub const STF: Grammar = Grammar {
        quote: '"',
        escape: '\\',
        block_open: '(',
        block_close: ')',
        concatenate: '+',
        line_comment: Some("//"),
        comment_keywords: &["comment", "skip"],
        comment_prefixes: &['#', '_'],
        signature: Some("SIMISA@"),
        include_keyword: "include",
    };
}

impl Default for Grammar {
    fn default() -> Self {
        Grammar::STF
    }
}

/// Settings fixed when a Reader is constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    pub case_sensitive: bool,
    pub includes: bool,
    pub grammar: Grammar,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            case_sensitive: false,
            includes: true,
            grammar: Grammar::STF,
        }
    }
}

impl Options {
    pub fn case_sensitive(mut self, value: bool) -> Self {
        self.case_sensitive = value;
        self
    }

    pub fn includes(mut self, value: bool) -> Self {
        self.includes = value;
        self
    }

    pub fn grammar(mut self, grammar: Grammar) -> Self {
        self.grammar = grammar;
        self
    }

    /// Compare a token against a keyword according to the case sensitivity
    /// setting.
    pub fn matches(&self, text: &str, keyword: &str) -> bool {
        if self.case_sensitive {
            text == keyword
        } else {
            text.eq_ignore_ascii_case(keyword)
        }
    }
}

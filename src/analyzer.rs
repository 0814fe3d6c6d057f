use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::LocalName;
use markup5ever_rcdom::{Handle, NodeData, RcDom};

pub const WORDS_PER_MINUTE: usize = 200;

/// A character filter receives the original text and can transform it by adding,
/// removing, or changing characters, e.g. stripping HTML elements like <b>.
pub trait CharacterFilter: Send + Sync {
    fn filter(&self, text: String) -> String;
}

/// Reduces an HTML fragment to its visible text.
#[derive(Debug, Default)]
pub struct HTMLTagFilter;

impl HTMLTagFilter {
    pub fn get_dom(html: &str) -> RcDom {
        parse_document(RcDom::default(), Default::default())
            .from_utf8()
            .read_from(&mut std::io::Cursor::new(html))
            .unwrap_or_default()
    }

    pub fn is_block_like(local: &LocalName) -> bool {
        matches!(
            &**local,
            "p" | "div"
                | "section"
                | "article"
                | "li"
                | "ul"
                | "ol"
                | "h1"
                | "h2"
                | "h3"
                | "h4"
                | "h5"
                | "h6"
                | "blockquote"
                | "br"
        )
    }

    pub fn walk_html(handle: &Handle, out: &mut String) {
        match &handle.data {
            NodeData::Text { contents } => {
                let s = contents.borrow();
                let s = s.trim();
                if s.is_empty() {
                    return;
                }
                if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
                    out.push(' ');
                }
                out.push_str(s);
            }
            NodeData::Element { name, .. } => {
                let local = &name.local;
                if matches!(&**local, "script" | "style" | "noscript" | "title") {
                    return;
                }

                let block = Self::is_block_like(local);
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                for child in handle.children.borrow().iter() {
                    Self::walk_html(child, out);
                }
                if block && !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {
                for child in handle.children.borrow().iter() {
                    Self::walk_html(child, out);
                }
            }
        }
    }
}

impl CharacterFilter for HTMLTagFilter {
    fn filter(&self, html: String) -> String {
        let dom = Self::get_dom(&html);
        let mut out = String::new();
        Self::walk_html(&dom.document, &mut out);
        out.trim().to_string()
    }
}

/// A tokenizer breaks a stream of characters into individual words.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

pub struct WhiteSpaceTokenizer;

impl Tokenizer for WhiteSpaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(|w| w.to_string()).collect()
    }
}

/// Derives display text (excerpts, reading time) from post bodies.
pub struct TextAnalyzer {
    char_filters: Vec<Box<dyn CharacterFilter>>,
    tokenizer: Box<dyn Tokenizer>,
}

impl Default for TextAnalyzer {
    fn default() -> Self {
        Self::new(vec![Box::new(HTMLTagFilter)], Box::new(WhiteSpaceTokenizer))
    }
}

impl TextAnalyzer {
    pub fn new(char_filters: Vec<Box<dyn CharacterFilter>>, tokenizer: Box<dyn Tokenizer>) -> Self {
        Self {
            char_filters,
            tokenizer,
        }
    }

    pub fn plain_text(&self, mut content: String) -> String {
        for filter in self.char_filters.iter() {
            content = filter.filter(content);
        }
        content
    }

    pub fn word_count(&self, content: &str) -> usize {
        let text = self.plain_text(content.to_string());
        self.tokenizer.tokenize(&text).len()
    }

    /// Minutes to read at [`WORDS_PER_MINUTE`], never less than one.
    pub fn reading_time_minutes(&self, content: &str) -> usize {
        self.word_count(content).div_ceil(WORDS_PER_MINUTE).max(1)
    }

    /// First words of the plain text, cut at a word boundary so the result
    /// stays within `max_chars` characters plus a trailing `...`. A first word
    /// longer than `max_chars` is cut mid-word.
    pub fn excerpt(&self, content: &str, max_chars: usize) -> String {
        let text = self.plain_text(content.to_string());
        let words = self.tokenizer.tokenize(&text);

        let mut out = String::new();
        for word in words.iter() {
            let extra = if out.is_empty() { 0 } else { 1 };
            if out.chars().count() + extra + word.chars().count() > max_chars {
                if out.is_empty() {
                    out.extend(word.chars().take(max_chars));
                }
                out.push_str("...");
                return out;
            }
            if extra == 1 {
                out.push(' ');
            }
            out.push_str(word);
        }
        out
    }
}

use std::collections::BTreeSet;

/// Deduplicated set of class names; iteration order is the canonical
/// lexicographic artifact order.
pub type ClassSet = BTreeSet<String>;

/// Base tokens recognized in front of a dot-notation chain. These are the
/// element constructors exposed by htpy-style template libraries.
const DEFAULT_BASE_TOKENS: &[&str] = &[
    "a", "abbr", "article", "aside", "b", "blockquote", "body", "button", "caption", "code", "dd",
    "details", "div", "dl", "dt", "em", "fieldset", "figcaption", "figure", "footer", "form", "h1",
    "h2", "h3", "h4", "h5", "h6", "head", "header", "hr", "html", "i", "iframe", "img", "input",
    "label", "legend", "li", "main", "nav", "ol", "optgroup", "option", "p", "pre", "section",
    "select", "small", "span", "strong", "summary", "table", "tbody", "td", "textarea", "tfoot",
    "th", "thead", "tr", "ul", "video",
];

/// Attribute keywords whose quoted value is a whitespace-separated class list.
const DEFAULT_KEYWORDS: &[&str] = &["class_"];

/// Extracts Tailwind class names from raw template source text.
///
/// Two independent matching passes run over the same text and their results
/// are unioned:
///
/// 1. *Keyword-literal form*: `class_='flex items-center'` (single or double
///    quotes). Only plain string literals count; f-strings, variables, calls
///    and concatenations cannot be resolved statically and are skipped.
/// 2. *Dot-notation form*: a recognized element token followed by a chain of
///    `.segment` accessors (`div.flex.items-center`), where `\:` and `\/`
///    inside a segment map back to `:` and `/`. The same token followed by a
///    quoted leading-dot selector string (`div('.flex .items-center')`) is
///    resolved the same way.
///
/// Extraction is a pure function over the text; malformed or unterminated
/// constructs are skipped and the rest of the text still contributes.
#[derive(Debug, Clone)]
pub struct ClassExtractor {
    keywords: Vec<String>,
    base_tokens: BTreeSet<String>,
}

impl Default for ClassExtractor {
    fn default() -> Self {
        Self::new(&[], &[])
    }
}

impl ClassExtractor {
    /// Build an extractor with the default keyword and base-token sets plus
    /// any configured additions.
    pub fn new(extra_keywords: &[String], extra_base_tokens: &[String]) -> Self {
        let mut keywords: Vec<String> = DEFAULT_KEYWORDS.iter().map(|k| k.to_string()).collect();
        keywords.extend(extra_keywords.iter().cloned());
        keywords.dedup();

        let mut base_tokens: BTreeSet<String> =
            DEFAULT_BASE_TOKENS.iter().map(|t| t.to_string()).collect();
        base_tokens.extend(extra_base_tokens.iter().cloned());

        Self {
            keywords,
            base_tokens,
        }
    }

    /// Extract every class name referenced in `text`.
    pub fn extract(&self, text: &str) -> ClassSet {
        let mut classes = ClassSet::new();
        self.keyword_literal_pass(text, &mut classes);
        self.dot_notation_pass(text, &mut classes);
        classes
    }

    /// Pass 1: `class_=` followed by a plain quoted string literal.
    fn keyword_literal_pass(&self, text: &str, classes: &mut ClassSet) {
        let bytes = text.as_bytes();
        for keyword in &self.keywords {
            let mut from = 0;
            while let Some(rel) = text[from..].find(keyword.as_str()) {
                let at = from + rel;
                from = at + keyword.len();

                // Must be a standalone identifier, not a suffix of a longer one.
                if at > 0 && is_ident_byte(bytes[at - 1]) {
                    continue;
                }

                let mut i = skip_inline_ws(bytes, at + keyword.len());
                if bytes.get(i) != Some(&b'=') {
                    continue;
                }
                i += 1;
                // `==` is a comparison, not an attribute assignment.
                if bytes.get(i) == Some(&b'=') {
                    continue;
                }
                i = skip_inline_ws(bytes, i);

                let quote = match bytes.get(i) {
                    Some(&q @ (b'\'' | b'"')) => q as char,
                    // Anything else is a dynamic expression we cannot resolve.
                    _ => continue,
                };

                if let Some((content, _end)) = read_quoted(text, i + 1, quote) {
                    for token in content.split_whitespace() {
                        classes.insert(token.to_string());
                    }
                }
            }
        }
    }

    /// Pass 2: recognized base token followed by a `.segment` chain or a
    /// quoted leading-dot selector string.
    fn dot_notation_pass(&self, text: &str, classes: &mut ClassSet) {
        let bytes = text.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if !is_ident_start(bytes[i]) {
                i += 1;
                continue;
            }
            // An identifier preceded by an identifier byte is mid-word; one
            // preceded by `.` is itself a chain member, not a base token.
            if i > 0 && (is_ident_byte(bytes[i - 1]) || bytes[i - 1] == b'.') {
                i += 1;
                while i < bytes.len() && is_ident_byte(bytes[i]) {
                    i += 1;
                }
                continue;
            }

            let word_start = i;
            while i < bytes.len() && is_ident_byte(bytes[i]) {
                i += 1;
            }
            if !self.base_tokens.contains(&text[word_start..i]) {
                continue;
            }

            match bytes.get(i) {
                Some(b'.') => i = consume_chain(text, i, classes),
                Some(b'(') => i = consume_selector_call(text, i, classes),
                _ => {}
            }
        }
    }
}

/// Consume a `.segment.segment` chain starting at the first `.` and record
/// each valid segment as a class name. Returns the index past the chain.
fn consume_chain(text: &str, mut i: usize, classes: &mut ClassSet) -> usize {
    let bytes = text.as_bytes();
    while bytes.get(i) == Some(&b'.') {
        let (segment, end, valid) = parse_segment(text, i + 1);
        if end == i + 1 {
            // `.` followed by nothing segment-like, e.g. `div.(`.
            return end;
        }
        if valid && !segment.is_empty() {
            classes.insert(segment);
        }
        i = end;
    }
    i
}

/// Parse one chain segment. `\:` and `\/` map back to the separator that is
/// illegal in a bare identifier; any other escape invalidates the segment
/// (it is consumed but yields no class name).
fn parse_segment(text: &str, start: usize) -> (String, usize, bool) {
    let bytes = text.as_bytes();
    let mut out = String::new();
    let mut valid = true;
    let mut i = start;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => match bytes.get(i + 1) {
                Some(b':') => {
                    out.push(':');
                    i += 2;
                }
                Some(b'/') => {
                    out.push('/');
                    i += 2;
                }
                Some(&c) if is_segment_byte(c) => {
                    valid = false;
                    i += 2;
                }
                _ => {
                    valid = false;
                    i += 1;
                    break;
                }
            },
            c if is_segment_byte(c) => {
                out.push(c as char);
                i += 1;
            }
            _ => break,
        }
    }
    (out, i, valid)
}

/// Consume `('.flex .items-center')` after a base token. The opening paren is
/// at `i`; returns the index to resume scanning from.
fn consume_selector_call(text: &str, i: usize, classes: &mut ClassSet) -> usize {
    let bytes = text.as_bytes();
    let j = skip_inline_ws(bytes, i + 1);
    let quote = match bytes.get(j) {
        Some(&q @ (b'\'' | b'"')) => q as char,
        _ => return i + 1,
    };
    // Only strings that open with `.` are selector shorthand; anything else
    // is ordinary call content.
    if bytes.get(j + 1) != Some(&b'.') {
        return i + 1;
    }
    match read_quoted(text, j + 1, quote) {
        Some((content, end)) => {
            for raw in content.split_whitespace() {
                for piece in raw.split('.') {
                    if !piece.is_empty() {
                        classes.insert(piece.to_string());
                    }
                }
            }
            end
        }
        None => i + 1,
    }
}

/// Read a quoted literal starting just after the opening quote. Returns the
/// unescaped content and the index past the closing quote, or `None` when the
/// literal is unterminated before the end of the line.
fn read_quoted(text: &str, start: usize, quote: char) -> Option<(String, usize)> {
    let mut content = String::new();
    let mut chars = text[start..].char_indices();
    while let Some((off, ch)) = chars.next() {
        if ch == quote {
            return Some((content, start + off + ch.len_utf8()));
        }
        if ch == '\n' {
            return None;
        }
        if ch == '\\' {
            match chars.next() {
                Some((_, '\n')) | None => return None,
                Some((_, esc)) => content.push(esc),
            }
        } else {
            content.push(ch);
        }
    }
    None
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn is_segment_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'-' || b == b'_'
}

fn skip_inline_ws(bytes: &[u8], mut i: usize) -> usize {
    while matches!(bytes.get(i), Some(b' ') | Some(b'\t')) {
        i += 1;
    }
    i
}

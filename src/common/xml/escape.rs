use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Built once; the text automaton leaves quotes alone since they are legal in element content.
static TEXT_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">"])
        .expect("Failed to build XML text escaper")
});

static ATTR_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML attribute escaper")
});

/// Escape a string for use as element content (`<w:t>`, `<w:delText>`).
///
/// # Examples
///
/// ```
/// use docx_redline::common::xml::escape_text;
/// assert_eq!(escape_text("a & <b>"), "a &amp; &lt;b&gt;");
/// assert_eq!(escape_text("\"quoted\""), "\"quoted\"");
/// ```
#[inline]
pub fn escape_text(s: &str) -> String {
    TEXT_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;"])
}

/// Escape a string for use inside a double-quoted attribute value.
///
/// # Examples
///
/// ```
/// use docx_redline::common::xml::escape_attr;
/// assert_eq!(escape_attr("O'Neil & \"Co\""), "O&apos;Neil &amp; &quot;Co&quot;");
/// ```
#[inline]
pub fn escape_attr(s: &str) -> String {
    ATTR_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"])
}

/// Resolve the name of a predefined XML entity (`amp`, `lt`, ...) to its character.
#[inline]
pub fn predefined_entity(name: &str) -> Option<char> {
    match name {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => None,
    }
}

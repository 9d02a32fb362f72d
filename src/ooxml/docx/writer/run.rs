/// Run types and implementation for DOCX documents.
use crate::common::xml::{escape_attr, escape_text};
use crate::ooxml::error::Result;
use smallvec::SmallVec;
use std::fmt::Write as FmtWrite;

// Import shared format types
pub use super::super::format::UnderlineStyle;

/// One content item of a run, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    /// Plain text (`<w:t>`, or `<w:delText>` inside a deletion)
    Text(String),
    /// Tab character (`<w:tab/>`), read back as `\t`
    Tab,
    /// Line break (`<w:br/>`), read back as `\n`
    Break,
    /// Carriage return (`<w:cr/>`), read back as `\r`
    CarriageReturn,
    /// Comment reference mark; contributes no text
    CommentReference(u32),
}

impl RunContent {
    /// Number of characters this item contributes to the run text.
    #[inline]
    pub fn char_len(&self) -> usize {
        match self {
            Self::Text(s) => s.chars().count(),
            Self::Tab | Self::Break | Self::CarriageReturn => 1,
            Self::CommentReference(_) => 0,
        }
    }
}

/// Character formatting of a run.
///
/// This is the snapshot that gets copied verbatim onto runs created by
/// splitting. Every field is tri-state: `None` means "not set on the run,
/// inherit from the style hierarchy".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunProperties {
    /// Character style ID (`w:rStyle`)
    pub style: Option<String>,
    pub bold: Option<bool>,
    pub italic: Option<bool>,
    pub underline: Option<UnderlineStyle>,
    /// Font size in half-points (24 = 12pt)
    pub font_size: Option<u32>,
    pub font_name: Option<String>,
    /// Hex RGB, e.g. `FF0000`
    pub color: Option<String>,
}

impl RunProperties {
    pub(crate) fn has_properties(&self) -> bool {
        self.style.is_some()
            || self.bold.is_some()
            || self.italic.is_some()
            || self.underline.is_some()
            || self.font_size.is_some()
            || self.font_name.is_some()
            || self.color.is_some()
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        if !self.has_properties() {
            return Ok(());
        }
        xml.push_str("<w:rPr>");

        if let Some(ref style) = self.style {
            write!(xml, "<w:rStyle w:val=\"{}\"/>", escape_attr(style))?;
        }
        if let Some(ref font_name) = self.font_name {
            let name = escape_attr(font_name);
            write!(xml, "<w:rFonts w:ascii=\"{}\" w:hAnsi=\"{}\"/>", name, name)?;
        }
        write_toggle(xml, "b", self.bold);
        write_toggle(xml, "i", self.italic);
        if let Some(ref color) = self.color {
            write!(xml, "<w:color w:val=\"{}\"/>", escape_attr(color))?;
        }
        if let Some(size) = self.font_size {
            write!(xml, "<w:sz w:val=\"{}\"/>", size)?;
        }
        if let Some(underline) = self.underline {
            write!(xml, "<w:u w:val=\"{}\"/>", underline.as_str())?;
        }

        xml.push_str("</w:rPr>");
        Ok(())
    }
}

/// `<w:b/>` for on, `<w:b w:val="0"/>` for an explicit off.
fn write_toggle(xml: &mut String, tag: &str, value: Option<bool>) {
    match value {
        Some(true) => {
            xml.push_str("<w:");
            xml.push_str(tag);
            xml.push_str("/>");
        },
        Some(false) => {
            xml.push_str("<w:");
            xml.push_str(tag);
            xml.push_str(" w:val=\"0\"/>");
        },
        None => {},
    }
}

/// A mutable run.
///
/// Runs contain text and character formatting.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MutableRun {
    /// Run content
    pub(crate) content: SmallVec<[RunContent; 2]>,
    /// Run properties
    pub(crate) properties: RunProperties,
}

impl MutableRun {
    /// Create an empty, unformatted run.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a run holding `text` with the given formatting.
    pub fn with_text(text: &str, properties: RunProperties) -> Self {
        let mut run = Self {
            content: SmallVec::new(),
            properties,
        };
        run.set_text(text);
        run
    }

    /// Create a run holding only a comment reference mark.
    pub(crate) fn comment_reference(id: u32) -> Self {
        let mut run = Self::new();
        run.content.push(RunContent::CommentReference(id));
        run
    }

    /// Replace the run content with `text`.
    ///
    /// `\t` becomes a tab, `\n` a line break and `\r` a carriage return, so
    /// that [`get_text`](Self::get_text) returns exactly the same characters.
    /// Formatting is preserved.
    pub fn set_text(&mut self, text: &str) {
        self.content.clear();
        let mut pending = String::new();
        for ch in text.chars() {
            let marker = match ch {
                '\t' => RunContent::Tab,
                '\n' => RunContent::Break,
                '\r' => RunContent::CarriageReturn,
                _ => {
                    pending.push(ch);
                    continue;
                },
            };
            if !pending.is_empty() {
                self.content
                    .push(RunContent::Text(std::mem::take(&mut pending)));
            }
            self.content.push(marker);
        }
        if !pending.is_empty() {
            self.content.push(RunContent::Text(pending));
        }
    }

    /// Replace the run text but keep its comment references, which are
    /// moved after the new text.
    pub(crate) fn replace_text(&mut self, text: &str) {
        let references: SmallVec<[RunContent; 1]> = self
            .content
            .iter()
            .filter(|item| matches!(item, RunContent::CommentReference(_)))
            .cloned()
            .collect();
        self.set_text(text);
        self.content.extend(references);
    }

    /// Whether the run holds anything besides text, such as a comment
    /// reference.
    pub(crate) fn has_marks(&self) -> bool {
        self.content
            .iter()
            .any(|item| matches!(item, RunContent::CommentReference(_)))
    }

    /// Get the text content.
    pub fn get_text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(s) => out.push_str(s),
                RunContent::Tab => out.push('\t'),
                RunContent::Break => out.push('\n'),
                RunContent::CarriageReturn => out.push('\r'),
                RunContent::CommentReference(_) => {},
            }
        }
        out
    }

    /// Length of the run text in characters.
    pub fn char_len(&self) -> usize {
        self.content.iter().map(RunContent::char_len).sum()
    }

    /// Content items of the run.
    #[inline]
    pub fn content(&self) -> &[RunContent] {
        &self.content
    }

    /// Append a content item.
    pub fn push_content(&mut self, item: RunContent) -> &mut Self {
        self.content.push(item);
        self
    }

    /// Comment ids referenced from this run.
    pub fn comment_references(&self) -> impl Iterator<Item = u32> + '_ {
        self.content.iter().filter_map(|item| match item {
            RunContent::CommentReference(id) => Some(*id),
            _ => None,
        })
    }

    /// Snapshot of the run's character formatting.
    #[inline]
    pub fn formatting(&self) -> &RunProperties {
        &self.properties
    }

    /// Replace the run's character formatting.
    #[inline]
    pub fn set_formatting(&mut self, properties: RunProperties) {
        self.properties = properties;
    }

    /// Set the character style.
    pub fn style(&mut self, style_id: &str) -> &mut Self {
        self.properties.style = Some(style_id.to_string());
        self
    }

    /// Make the text bold.
    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.properties.bold = Some(bold);
        self
    }

    /// Make the text italic.
    pub fn italic(&mut self, italic: bool) -> &mut Self {
        self.properties.italic = Some(italic);
        self
    }

    /// Set underline style.
    pub fn underline(&mut self, style: UnderlineStyle) -> &mut Self {
        self.properties.underline = Some(style);
        self
    }

    /// Set font size in half-points (e.g., 24 = 12pt).
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.properties.font_size = Some(size);
        self
    }

    /// Set font name.
    pub fn font_name(&mut self, name: &str) -> &mut Self {
        self.properties.font_name = Some(name.to_string());
        self
    }

    /// Set text color using hex RGB (e.g., "FF0000" for red).
    pub fn color(&mut self, color: &str) -> &mut Self {
        self.properties.color = Some(color.to_string());
        self
    }

    /// Serialize the run. Inside a deletion, text is written as `w:delText`.
    pub(crate) fn to_xml(&self, xml: &mut String, deleted: bool) -> Result<()> {
        xml.push_str("<w:r>");
        self.properties.to_xml(xml)?;

        let text_tag = if deleted { "w:delText" } else { "w:t" };
        for item in &self.content {
            match item {
                RunContent::Text(text) => {
                    write!(
                        xml,
                        "<{tag} xml:space=\"preserve\">{}</{tag}>",
                        escape_text(text),
                        tag = text_tag
                    )?;
                },
                RunContent::Tab => xml.push_str("<w:tab/>"),
                RunContent::Break => xml.push_str("<w:br/>"),
                RunContent::CarriageReturn => xml.push_str("<w:cr/>"),
                RunContent::CommentReference(id) => {
                    write!(xml, "<w:commentReference w:id=\"{}\"/>", id)?;
                },
            }
        }

        xml.push_str("</w:r>");
        Ok(())
    }
}

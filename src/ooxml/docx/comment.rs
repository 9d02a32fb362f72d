/// Reading comments from a `word/comments.xml` part.
///
/// Comments are read into plain values; the editing model converts them into
/// [`MutableComment`](crate::ooxml::docx::writer::MutableComment)s when a
/// document is loaded.
use crate::common::xml::predefined_entity;
use crate::ooxml::error::Result;
use quick_xml::Reader;
use quick_xml::events::Event;

/// A `<w:comment>` element.
///
/// # Examples
///
/// ```rust
/// use docx_redline::ooxml::docx::comment::Comment;
///
/// let xml = br#"<w:comments><w:comment w:id="2" w:author="Ann" w:initials="A">
///     <w:p><w:r><w:t>Looks good</w:t></w:r></w:p></w:comment></w:comments>"#;
///
/// let comments = Comment::parse_all(xml)?;
/// assert_eq!(comments[0].id(), 2);
/// assert_eq!(comments[0].text(), "Looks good");
/// # Ok::<(), docx_redline::ooxml::OoxmlError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub(crate) id: u32,
    pub(crate) author: String,
    pub(crate) initials: Option<String>,
    pub(crate) date: Option<String>,
    /// Body text, one line per paragraph
    pub(crate) text: String,
}

impl Comment {
    pub fn new(
        id: u32,
        author: String,
        initials: Option<String>,
        date: Option<String>,
        text: String,
    ) -> Self {
        Self {
            id,
            author,
            initials,
            date,
            text,
        }
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn author(&self) -> &str {
        &self.author
    }

    #[inline]
    pub fn initials(&self) -> Option<&str> {
        self.initials.as_deref()
    }

    #[inline]
    pub fn date(&self) -> Option<&str> {
        self.date.as_deref()
    }

    /// Comment text; paragraphs are joined with `\n`.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Read every comment in a comments part, in document order.
    ///
    /// Comments without a parsable `w:id` are skipped.
    pub fn parse_all(xml_bytes: &[u8]) -> Result<Vec<Comment>> {
        let mut reader = Reader::from_reader(xml_bytes);
        let mut buf = Vec::with_capacity(1024);

        let mut comments = Vec::new();
        let mut current: Option<(Option<u32>, Comment)> = None;
        let mut in_text = false;
        let mut paragraphs = 0usize;

        loop {
            buf.clear();
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) if e.local_name().as_ref() == b"comment" && current.is_none() => {
                    let mut id = None;
                    let mut comment = Comment::new(0, String::new(), None, None, String::new());
                    for attr in e.attributes().flatten() {
                        let Ok(value) = attr.decode_and_unescape_value(reader.decoder()) else {
                            continue;
                        };
                        match attr.key.local_name().as_ref() {
                            b"id" => id = atoi_simd::parse::<u32, false, false>(value.as_bytes()).ok(),
                            b"author" => comment.author = value.into_owned(),
                            b"initials" => comment.initials = Some(value.into_owned()),
                            b"date" => comment.date = Some(value.into_owned()),
                            _ => {},
                        }
                    }
                    paragraphs = 0;
                    current = Some((id, comment));
                },
                Event::Start(e) => match e.local_name().as_ref() {
                    b"p" => {
                        if let Some((_, comment)) = current.as_mut() {
                            if paragraphs > 0 {
                                comment.text.push('\n');
                            }
                            paragraphs += 1;
                        }
                    },
                    b"t" => in_text = current.is_some(),
                    _ => {},
                },
                Event::Empty(e) => {
                    if let Some((_, comment)) = current.as_mut() {
                        match e.local_name().as_ref() {
                            b"tab" => comment.text.push('\t'),
                            b"br" => comment.text.push('\n'),
                            _ => {},
                        }
                    }
                },
                Event::Text(e) if in_text => {
                    if let Some((_, comment)) = current.as_mut()
                        && let Ok(text) = std::str::from_utf8(e.as_ref())
                    {
                        comment.text.push_str(text);
                    }
                },
                Event::GeneralRef(e) if in_text => {
                    let ch = e.resolve_char_ref().ok().flatten().or_else(|| {
                        std::str::from_utf8(e.as_ref())
                            .ok()
                            .and_then(predefined_entity)
                    });
                    if let (Some((_, comment)), Some(ch)) = (current.as_mut(), ch) {
                        comment.text.push(ch);
                    }
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"t" => in_text = false,
                    b"comment" => {
                        if let Some((Some(id), mut comment)) = current.take() {
                            comment.id = id;
                            comments.push(comment);
                        }
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
        }

        Ok(comments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_creation() {
        let comment = Comment::new(
            1,
            "John Doe".to_string(),
            Some("JD".to_string()),
            Some("2024-01-01T00:00:00".to_string()),
            "Test comment".to_string(),
        );

        assert_eq!(comment.id(), 1);
        assert_eq!(comment.author(), "John Doe");
        assert_eq!(comment.initials(), Some("JD"));
        assert_eq!(comment.date(), Some("2024-01-01T00:00:00"));
        assert_eq!(comment.text(), "Test comment");
    }

    #[test]
    fn test_parse_all() {
        let xml = br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:comments xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:comment w:id="0" w:author="A &amp; B" w:date="2024-02-03T04:05:06" w:initials="AB">
    <w:p><w:r><w:t xml:space="preserve">First </w:t></w:r><w:r><w:t>line</w:t></w:r></w:p>
    <w:p><w:r><w:t>second &lt;line&gt;</w:t></w:r></w:p>
  </w:comment>
  <w:comment w:author="nobody"><w:p><w:r><w:t>no id</w:t></w:r></w:p></w:comment>
  <w:comment w:id="9" w:author="C"><w:p/></w:comment>
</w:comments>"#;

        let comments = Comment::parse_all(xml).unwrap();
        assert_eq!(comments.len(), 2);

        assert_eq!(comments[0].id(), 0);
        assert_eq!(comments[0].author(), "A & B");
        assert_eq!(comments[0].initials(), Some("AB"));
        assert_eq!(comments[0].date(), Some("2024-02-03T04:05:06"));
        assert_eq!(comments[0].text(), "First line\nsecond <line>");

        assert_eq!(comments[1].id(), 9);
        assert_eq!(comments[1].text(), "");
        assert_eq!(comments[1].initials(), None);
    }

    #[test]
    fn test_parse_empty_part() {
        assert!(Comment::parse_all(b"<w:comments/>").unwrap().is_empty());
    }
}

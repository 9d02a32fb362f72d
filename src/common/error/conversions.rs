//! Error conversion implementations.
//!
//! `From` implementations that lift layer-specific errors into the unified
//! [`Error`] type.

use super::types::Error;
use crate::ooxml::error::OoxmlError;

impl From<OoxmlError> for Error {
    fn from(err: OoxmlError) -> Self {
        match err {
            OoxmlError::Xml(s) => Error::XmlError(s),
            OoxmlError::InvalidFormat(s) => Error::InvalidFormat(s),
            OoxmlError::Edit(e) => Error::Edit(e),
            OoxmlError::Other(s) => Error::Other(s),
        }
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::revise::EditError;

    #[test]
    fn test_edit_error_passes_through() {
        let err: Error = OoxmlError::Edit(EditError::TextNotFound {
            query: "missing".to_string(),
        })
        .into();
        assert!(matches!(err, Error::Edit(EditError::TextNotFound { .. })));
        assert_eq!(err.to_string(), "Text not found in paragraph: \"missing\"");
    }

    #[test]
    fn test_xml_error_maps() {
        let err: Error = OoxmlError::Xml("unexpected eof".to_string()).into();
        assert!(matches!(err, Error::XmlError(ref s) if s == "unexpected eof"));
    }
}

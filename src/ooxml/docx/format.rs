//! Shared formatting types for DOCX (used in both reading and writing).

/// Underline styles for text.
///
/// `None` is a directly-applied "no underline" (`w:val="none"`), distinct from
/// an unset underline which is represented by `Option::None` on the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnderlineStyle {
    None,
    Single,
    Words,
    Double,
    Thick,
    Dotted,
    Dashed,
    DotDash,
    DotDotDash,
    Wave,
}

impl UnderlineStyle {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Single => "single",
            Self::Words => "words",
            Self::Double => "double",
            Self::Thick => "thick",
            Self::Dotted => "dotted",
            Self::Dashed => "dash",
            Self::DotDash => "dotDash",
            Self::DotDotDash => "dotDotDash",
            Self::Wave => "wave",
        }
    }

    /// Parse a `w:u/@w:val` value. Unknown values fall back to `Single`,
    /// which is how Word renders an underline it does not recognise.
    pub(crate) fn from_val(val: &str) -> Self {
        match val {
            "none" => Self::None,
            "words" => Self::Words,
            "double" => Self::Double,
            "thick" => Self::Thick,
            "dotted" => Self::Dotted,
            "dash" => Self::Dashed,
            "dotDash" => Self::DotDash,
            "dotDotDash" => Self::DotDotDash,
            "wave" => Self::Wave,
            _ => Self::Single,
        }
    }

    /// Whether this style draws any underline at all.
    #[inline]
    pub fn is_underlined(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl From<bool> for UnderlineStyle {
    fn from(on: bool) -> Self {
        if on { Self::Single } else { Self::None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_underline_round_trip_values() {
        for style in [
            UnderlineStyle::None,
            UnderlineStyle::Single,
            UnderlineStyle::Double,
            UnderlineStyle::DotDotDash,
            UnderlineStyle::Wave,
        ] {
            assert_eq!(UnderlineStyle::from_val(style.as_str()), style);
        }
    }

    #[test]
    fn test_underline_from_bool() {
        assert_eq!(UnderlineStyle::from(true), UnderlineStyle::Single);
        assert!(!UnderlineStyle::from(false).is_underlined());
    }
}

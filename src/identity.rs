use crate::IconFontError;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

/// `<3-4 hex digits>-<display name>.<ext>`
#[allow(clippy::expect_used)] // The pattern is a constant
static CODEPOINT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([0-9a-f]{3,4})-").expect("valid code point pattern"));

/// The code point and display name encoded in an icon's file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphIdentity {
    pub codepoint: u32,
    /// Lowercased hex digits, as they will appear in the character reference.
    pub hex: String,
    /// Everything after the first hyphen, without the file extension.
    pub name: String,
}

impl GlyphIdentity {
    pub fn from_path(path: &Path) -> Result<Self, IconFontError> {
        let missing = || IconFontError::MissingUnicode {
            path: path.to_path_buf(),
        };
        let basename = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(missing)?;
        let captures = CODEPOINT_PREFIX.captures(basename).ok_or_else(missing)?;
        let (Some(whole), Some(digits)) = (captures.get(0), captures.get(1)) else {
            return Err(missing());
        };
        let hex = digits.as_str().to_ascii_lowercase();
        let codepoint = u32::from_str_radix(&hex, 16).map_err(|_| missing())?;

        let remainder = &basename[whole.end()..];
        let name = match remainder.rfind('.') {
            Some(dot) => &remainder[..dot],
            None => remainder,
        };

        Ok(GlyphIdentity {
            codepoint,
            hex,
            name: name.to_string(),
        })
    }

    /// Hyphens become spaces; an empty name falls back to the hex code point.
    pub fn css_class(&self) -> String {
        let class = self.name.replace('-', " ").trim().to_string();
        if class.is_empty() {
            self.hex.clone()
        } else {
            class
        }
    }

    pub fn unicode_entity(&self) -> String {
        format!("&#x{};", self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_identity_extraction() {
        let identity = GlyphIdentity::from_path(Path::new("/icons/f7e0-home.svg")).unwrap();
        assert_eq!(identity.codepoint, 0xf7e0);
        assert_eq!(identity.hex, "f7e0");
        assert_eq!(identity.unicode_entity(), "&#xf7e0;");
        assert_eq!(identity.css_class(), "home");
    }

    #[rstest]
    #[case("f101-arrow-left.svg", "arrow left")]
    #[case("e001-a-b-c.svg", "a b c")]
    #[case("abc-trailing-.svg", "trailing")]
    #[case("e002-.svg", "e002")]
    fn test_css_class(#[case] filename: &str, #[case] expected: &str) {
        let identity = GlyphIdentity::from_path(Path::new(filename)).unwrap();
        assert_eq!(identity.css_class(), expected);
    }

    #[test]
    fn test_uppercase_hex_is_lowercased() {
        let identity = GlyphIdentity::from_path(Path::new("F7E0-Home.SVG")).unwrap();
        assert_eq!(identity.unicode_entity(), "&#xf7e0;");
        assert_eq!(identity.name, "Home");
    }

    #[test]
    fn test_three_digit_codepoint() {
        let identity = GlyphIdentity::from_path(Path::new("0e9-star.svg")).unwrap();
        assert_eq!(identity.codepoint, 0xe9);
        assert_eq!(identity.unicode_entity(), "&#x0e9;");
    }

    #[rstest]
    #[case("home.svg")]
    #[case("xyz1-home.svg")]
    #[case("f7e0home.svg")]
    #[case("12-home.svg")]
    #[case("f7e01-home.svg")]
    fn test_missing_unicode(#[case] filename: &str) {
        let err = GlyphIdentity::from_path(Path::new(filename)).unwrap_err();
        assert!(matches!(err, IconFontError::MissingUnicode { .. }));
    }
}

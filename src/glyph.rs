use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// One normalized glyph, in font coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlyphRecord {
    pub css_class: String,
    pub unicode_entity: String,
    pub codepoint: u32,
    pub width: f64,
    pub path_data: String,
}

impl GlyphRecord {
    /// The css class as a single identifier, e.g. `arrow-left`.
    pub fn css_identifier(&self) -> String {
        self.css_class.split_whitespace().collect::<Vec<_>>().join("-")
    }

    /// The code point as a CSS string escape, e.g. `\f101`.
    pub fn css_escape(&self) -> String {
        format!("\\{:x}", self.codepoint)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlyphSet(pub Vec<GlyphRecord>);

impl GlyphSet {
    /// Sorts by code point, then css class.
    pub fn new(mut glyphs: Vec<GlyphRecord>) -> Self {
        glyphs.sort_by(|a, b| {
            a.codepoint
                .cmp(&b.codepoint)
                .then_with(|| a.css_class.cmp(&b.css_class))
        });
        GlyphSet(glyphs)
    }

    pub fn get(&self, css_class: &str) -> Option<&GlyphRecord> {
        self.0.iter().find(|glyph| glyph.css_class == css_class)
    }

    pub fn get_by_codepoint(&self, codepoint: u32) -> Option<&GlyphRecord> {
        self.0.iter().find(|glyph| glyph.codepoint == codepoint)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GlyphRecord> {
        self.0.iter()
    }

    /// Pairs of glyphs which were assigned the same code point.
    pub fn duplicate_codepoints(&self) -> Vec<(&GlyphRecord, &GlyphRecord)> {
        self.0
            .windows(2)
            .filter_map(|pair| match pair {
                [a, b] if a.codepoint == b.codepoint => Some((a, b)),
                _ => None,
            })
            .collect()
    }
}

impl Deref for GlyphSet {
    type Target = Vec<GlyphRecord>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for GlyphSet {
    type Item = GlyphRecord;
    type IntoIter = std::vec::IntoIter<GlyphRecord>;
    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

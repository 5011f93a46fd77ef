use crate::{
    identity::GlyphIdentity,
    outline::{draw, SvgPathPen},
    svg::ParsedGeometry,
    GlyphRecord, IconFontError,
};
use kurbo::{Affine, BezPath};
use std::path::Path;

/// Scale a parsed icon into font space and attach its identity.
///
/// Coordinates are scaled by `font_height / geometry.height`, with the Y axis
/// flipped since SVG is Y-down and fonts are Y-up. `source` labels errors.
pub fn normalize(
    geometry: &ParsedGeometry,
    identity: &GlyphIdentity,
    font_height: f64,
    source: &Path,
) -> Result<GlyphRecord, IconFontError> {
    if !font_height.is_finite() || font_height <= 0.0 {
        return Err(IconFontError::InvalidFontHeight { font_height });
    }
    let ratio = font_height / geometry.height;
    let outline =
        BezPath::from_svg(&geometry.path_data).map_err(|e| IconFontError::BadOutline {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    let scaled = Affine::scale_non_uniform(ratio, -ratio) * outline;

    let mut pen = SvgPathPen::new();
    draw(&scaled, &mut pen);

    log::debug!(
        "Normalized {} ({}) with ratio {}",
        identity.css_class(),
        identity.hex,
        ratio
    );

    Ok(GlyphRecord {
        css_class: identity.css_class(),
        unicode_entity: identity.unicode_entity(),
        codepoint: identity.codepoint,
        width: geometry.width * ratio,
        path_data: pen.build(),
    })
}

use crate::IconFontError;
use roxmltree::{Document, Node, ParsingOptions};
use std::path::Path;

/// Shape elements we don't turn into outlines.
const IGNORED_SHAPES: [&str; 5] = ["rect", "circle", "ellipse", "line", "polyline"];

/// The bounding box and compound outline of one icon document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedGeometry {
    pub width: f64,
    pub height: f64,
    /// Every `path` outline followed by every `polygon` outline, in document order.
    pub path_data: String,
}

/// Parse an SVG icon into its dimensions and compound outline.
///
/// `source` is only used to label errors and log messages.
pub fn parse(text: &str, source: &Path) -> Result<ParsedGeometry, IconFontError> {
    let doc = Document::parse_with_options(
        text,
        ParsingOptions {
            allow_dtd: true,
            nodes_limit: u32::MAX,
            entity_resolver: None,
        },
    )
    .map_err(|e| IconFontError::XmlParse {
        path: source.to_path_buf(),
        source: e,
    })?;

    let Some(svg) = doc.descendants().find(|n| n.has_tag_name("svg")) else {
        return Err(IconFontError::MissingSvgElement {
            path: source.to_path_buf(),
        });
    };
    let width = dimension(&svg, "width", source)?;
    let height = dimension(&svg, "height", source)?;

    let mut paths = vec![];
    let mut polygons = vec![];
    for node in svg.descendants().filter(|n| n.is_element()) {
        let tag = node.tag_name().name();
        match tag {
            "path" => {
                if let Some(d) = non_blank(node.attribute("d")) {
                    paths.push(d);
                }
            }
            "polygon" => {
                if let Some(points) = non_blank(node.attribute("points")) {
                    polygons.push(points);
                }
            }
            _ if IGNORED_SHAPES.contains(&tag) => {
                log::warn!(
                    "Ignoring <{}> in {}; convert it to a path to include it",
                    tag,
                    source.display()
                );
            }
            _ => {}
        }
    }

    if paths.is_empty() && polygons.is_empty() {
        return Err(IconFontError::NoOutlineData {
            path: source.to_path_buf(),
        });
    }

    let path_data = [
        compound_path_from_paths(&paths),
        compound_path_from_polygons(&polygons),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect::<Vec<_>>()
    .join(" ");

    Ok(ParsedGeometry {
        width,
        height,
        path_data,
    })
}

fn non_blank(attribute: Option<&str>) -> Option<&str> {
    attribute.map(str::trim).filter(|s| !s.is_empty())
}

fn dimension(svg: &Node, name: &'static str, source: &Path) -> Result<f64, IconFontError> {
    let value = svg
        .attribute(name)
        .map(str::trim)
        .map(|v| v.strip_suffix("px").unwrap_or(v).trim_end())
        .and_then(|v| v.parse::<f64>().ok())
        .ok_or_else(|| IconFontError::MissingDimension {
            path: source.to_path_buf(),
            dimension: name,
        })?;
    if !value.is_finite() || value <= 0.0 {
        return Err(IconFontError::InvalidDimension {
            path: source.to_path_buf(),
            dimension: name,
            value,
        });
    }
    Ok(value)
}

pub(crate) fn compound_path_from_paths(paths: &[&str]) -> String {
    paths.join(" ")
}

/// Each polygon becomes its own closed subpath.
pub(crate) fn compound_path_from_polygons(polygons: &[&str]) -> String {
    polygons
        .iter()
        .map(|points| format!("M {}z", points))
        .collect::<Vec<_>>()
        .join(" ")
}

#![deny(clippy::unwrap_used, clippy::expect_used)]
//! Turn a directory of single-colour SVG icons into an icon font bundle.
//!
//! Each `xxxx-icon-name.svg` file becomes one glyph at code point `U+xxxx`,
//! scaled into the font's em box and flipped into font (Y-up) coordinates.
//! [`compile`] produces a [`CompilePayload`]; the [`emit`] module turns that
//! into an SVG font, CSS, SCSS and an HTML preview.

pub mod config;
pub mod emit;
mod error;
mod glyph;
mod glyphset;
mod identity;
mod normalize;
mod outline;
mod pipeline;
pub mod svg;

pub use crate::{
    config::{FontConfig, FontLayer, Manifest, Overrides},
    error::IconFontError,
    glyph::{GlyphRecord, GlyphSet},
    glyphset::{discover, GlyphSetBuilder, ICON_EXTENSION},
    identity::GlyphIdentity,
    normalize::normalize,
    outline::{draw, OutlinePen, SvgPathPen},
    pipeline::{compile, normalize_dir, CompileOptions, CompilePayload, Pipeline, PipelineState},
    svg::ParsedGeometry,
};
pub use tokio_util::sync::CancellationToken;

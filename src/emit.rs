//! Renders a [`CompilePayload`] into the files of an icon font bundle.
//!
//! The SVG font, CSS, SCSS and HTML preview are written directly. Binary
//! formats are produced by external converters (`svg2ttf`, `ttf2woff`,
//! `ttf2eot`), whose failures are reported without interpretation.
use crate::{CompilePayload, IconFontError};
use std::path::{Component, Path, PathBuf};
use tokio::process::Command;
use tokio_util::sync::CancellationToken;

/// Where each file of the bundle goes.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    dir: PathBuf,
    stem: String,
    css_dir: Option<PathBuf>,
    sass_dir: Option<PathBuf>,
    font_url: String,
}

impl OutputLayout {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        OutputLayout {
            dir: dir.into(),
            stem: stem.into(),
            css_dir: None,
            sass_dir: None,
            font_url: String::new(),
        }
    }

    /// Everything in the payload's output directory, named after the font.
    pub fn for_payload(payload: &CompilePayload) -> Self {
        Self::new(&payload.output_dir, &payload.font.name)
    }

    pub fn with_css_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.css_dir = Some(dir.into());
        self
    }

    pub fn with_sass_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.sass_dir = Some(dir.into());
        self
    }

    /// Prefix for font URLs in the stylesheet, e.g. `../fonts/`.
    pub fn with_font_url(mut self, prefix: impl Into<String>) -> Self {
        self.font_url = prefix.into();
        self
    }

    fn font_file(&self, extension: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", self.stem, extension))
    }

    pub fn svg_font(&self) -> PathBuf {
        self.font_file("svg")
    }

    pub fn ttf(&self) -> PathBuf {
        self.font_file("ttf")
    }

    pub fn woff(&self) -> PathBuf {
        self.font_file("woff")
    }

    pub fn eot(&self) -> PathBuf {
        self.font_file("eot")
    }

    pub fn css(&self) -> PathBuf {
        self.css_dir
            .as_ref()
            .unwrap_or(&self.dir)
            .join(format!("{}.css", self.stem))
    }

    pub fn scss(&self) -> PathBuf {
        self.sass_dir
            .as_ref()
            .unwrap_or(&self.dir)
            .join(format!("{}.scss", self.stem))
    }

    pub fn html_spec(&self) -> PathBuf {
        self.dir.join(format!("{}-spec.html", self.stem))
    }

    /// How the preview page refers to the stylesheet: relative to the page.
    fn css_href(&self) -> String {
        relative_url(&self.dir, &self.css())
    }
}

/// A `/`-separated URL reaching `target` from inside `from_dir`.
fn relative_url(from_dir: &Path, target: &Path) -> String {
    let from: Vec<Component> = from_dir
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let to: Vec<Component> = target
        .components()
        .filter(|c| *c != Component::CurDir)
        .collect();
    let common = from.iter().zip(&to).take_while(|(a, b)| a == b).count();
    let mut parts = vec!["..".to_string(); from.len() - common];
    parts.extend(
        to[common..]
            .iter()
            .map(|c| c.as_os_str().to_string_lossy().into_owned()),
    );
    parts.join("/")
}

/// Write the SVG font, stylesheets and preview page. Returns the written paths.
pub async fn write_bundle(
    payload: &CompilePayload,
    layout: &OutputLayout,
) -> Result<Vec<PathBuf>, IconFontError> {
    log::info!("Lazy-creating destination directory {}", layout.dir.display());
    for dir in [Some(&layout.dir), layout.css_dir.as_ref(), layout.sass_dir.as_ref()]
        .into_iter()
        .flatten()
    {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| IconFontError::io(dir, e))?;
    }

    let files = [
        (layout.svg_font(), render_svg_font(payload), "SVG font"),
        (layout.css(), render_css(payload, &layout.font_url), "CSS"),
        (layout.scss(), render_scss(payload), "SASS"),
        (layout.html_spec(), render_html(payload, &layout.css_href()), "HTML spec"),
    ];
    let [svg, css, scss, html] = &files;
    tokio::try_join!(
        write_file(&svg.0, &svg.1, svg.2),
        write_file(&css.0, &css.1, css.2),
        write_file(&scss.0, &scss.1, scss.2),
        write_file(&html.0, &html.1, html.2),
    )?;
    Ok(files.into_iter().map(|(path, _, _)| path).collect())
}

async fn write_file(path: &Path, contents: &str, what: &str) -> Result<(), IconFontError> {
    tokio::fs::write(path, contents)
        .await
        .map_err(|e| IconFontError::External {
            step: format!("Writing {}", what),
            reason: format!("{}: {}", path.display(), e),
        })?;
    log::info!("Generated {} at {}", what, path.display());
    Ok(())
}

/// Write the bundle and, given `converters`, the binary fonts.
///
/// Cancelling `cancel` stops at the current step; a running converter is killed.
pub async fn emit(
    payload: &CompilePayload,
    layout: &OutputLayout,
    converters: Option<&Converters>,
    cancel: &CancellationToken,
) -> Result<Vec<PathBuf>, IconFontError> {
    let mut written = until_cancelled(cancel, write_bundle(payload, layout)).await?;
    if let Some(converters) = converters {
        written.extend(until_cancelled(cancel, convert_fonts(layout, converters)).await?);
    }
    Ok(written)
}

async fn until_cancelled<T>(
    cancel: &CancellationToken,
    step: impl std::future::Future<Output = Result<T, IconFontError>>,
) -> Result<T, IconFontError> {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(IconFontError::Cancelled),
        result = step => result,
    }
}

/// The external font converters, run in sequence.
#[derive(Debug, Clone, PartialEq)]
pub struct Converters {
    pub svg2ttf: String,
    pub ttf2woff: String,
    pub ttf2eot: String,
}

impl Default for Converters {
    fn default() -> Self {
        Converters {
            svg2ttf: "svg2ttf".to_string(),
            ttf2woff: "ttf2woff".to_string(),
            ttf2eot: "ttf2eot".to_string(),
        }
    }
}

/// Produce TTF, WOFF and EOT from the SVG font. Returns the produced paths.
pub async fn convert_fonts(
    layout: &OutputLayout,
    converters: &Converters,
) -> Result<Vec<PathBuf>, IconFontError> {
    let (svg, ttf, woff, eot) = (layout.svg_font(), layout.ttf(), layout.woff(), layout.eot());
    run_converter(&converters.svg2ttf, &svg, &ttf).await?;
    run_converter(&converters.ttf2woff, &ttf, &woff).await?;
    run_converter(&converters.ttf2eot, &ttf, &eot).await?;
    log::info!("Generated TTF, WOFF, and EOT fonts");
    Ok(vec![ttf, woff, eot])
}

async fn run_converter(program: &str, input: &Path, output: &Path) -> Result<(), IconFontError> {
    log::debug!("Running {} {} {}", program, input.display(), output.display());
    let result = Command::new(program)
        .arg(input)
        .arg(output)
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| IconFontError::External {
            step: program.to_string(),
            reason: e.to_string(),
        })?;
    if !result.status.success() {
        return Err(IconFontError::External {
            step: program.to_string(),
            reason: format!(
                "{}: {}",
                result.status,
                String::from_utf8_lossy(&result.stderr).trim()
            ),
        });
    }
    Ok(())
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

pub fn render_svg_font(payload: &CompilePayload) -> String {
    let font = &payload.font;
    let family = escape_xml(&payload.font_family);
    let mut svg = String::new();
    svg.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
    svg.push_str("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n");
    svg.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">\n<defs>\n");
    svg.push_str(&format!(
        "<font id=\"{}\" horiz-adv-x=\"{}\">\n",
        family, font.units_per_em
    ));
    svg.push_str(&format!(
        "<font-face font-family=\"{}\" units-per-em=\"{}\" ascent=\"{}\" descent=\"{}\"/>\n",
        family, font.units_per_em, font.ascent, font.descent
    ));
    svg.push_str("<missing-glyph horiz-adv-x=\"0\"/>\n");
    for glyph in payload.glyphs.iter() {
        svg.push_str(&format!(
            "<glyph glyph-name=\"{}\" unicode=\"{}\" horiz-adv-x=\"{}\" d=\"{}\"/>\n",
            escape_xml(&glyph.css_identifier()),
            glyph.unicode_entity,
            glyph.width,
            glyph.path_data
        ));
    }
    svg.push_str("</font>\n</defs>\n</svg>\n");
    svg
}

pub fn render_css(payload: &CompilePayload, font_url: &str) -> String {
    let name = &payload.font.name;
    let token = &payload.cache_token;
    let url = |ext: &str| format!("{}{}.{}?{}", font_url, name, ext, token);
    let mut css = String::new();
    css.push_str("@font-face {\n");
    css.push_str(&format!("  font-family: \"{}\";\n", payload.font_family));
    css.push_str(&format!("  src: url(\"{}\");\n", url("eot")));
    css.push_str(&format!(
        "  src: url(\"{}#iefix\") format(\"embedded-opentype\"),\n       url(\"{}\") format(\"woff\"),\n       url(\"{}\") format(\"truetype\"),\n       url(\"{}#{}\") format(\"svg\");\n",
        url("eot"),
        url("woff"),
        url("ttf"),
        url("svg"),
        name
    ));
    css.push_str("  font-weight: normal;\n  font-style: normal;\n}\n\n");
    css.push_str(&format!(".{} {{\n", payload.prefix));
    css.push_str(&format!("  font-family: \"{}\";\n", payload.font_family));
    css.push_str("  font-style: normal;\n  font-weight: normal;\n  line-height: 1;\n");
    css.push_str("  -webkit-font-smoothing: antialiased;\n  -moz-osx-font-smoothing: grayscale;\n}\n");
    for glyph in payload.glyphs.iter() {
        css.push_str(&format!(
            "\n.{}-{}:before {{ content: \"{}\"; }}\n",
            payload.prefix,
            glyph.css_identifier(),
            glyph.css_escape()
        ));
    }
    css
}

pub fn render_scss(payload: &CompilePayload) -> String {
    let prefix = &payload.prefix;
    let mut scss = String::new();
    scss.push_str(&format!("$font-family-{}: \"{}\";\n\n", prefix, payload.font_family));
    for glyph in payload.glyphs.iter() {
        scss.push_str(&format!(
            "${}-{}: \"{}\";\n",
            prefix,
            glyph.css_identifier(),
            glyph.css_escape()
        ));
    }
    scss.push_str(&format!("\n${}-glyphs: (\n", prefix));
    for glyph in payload.glyphs.iter() {
        let id = glyph.css_identifier();
        scss.push_str(&format!("  \"{}\": ${}-{},\n", id, prefix, id));
    }
    scss.push_str(");\n");
    scss
}

pub fn render_html(payload: &CompilePayload, css_href: &str) -> String {
    let family = escape_xml(&payload.font_family);
    let prefix = &payload.prefix;
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", family));
    html.push_str(&format!(
        "<link rel=\"stylesheet\" href=\"{}?{}\">\n",
        escape_xml(css_href),
        payload.cache_token
    ));
    html.push_str("<style>body { font-family: sans-serif; } li { display: inline-block; width: 10em; margin: 1em; text-align: center; } i { font-size: 48px; }</style>\n");
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n<ul>\n", family));
    for glyph in payload.glyphs.iter() {
        let id = escape_xml(&glyph.css_identifier());
        html.push_str(&format!(
            "<li><i class=\"{} {}-{}\"></i><br><code>.{}-{}</code><br><code>{}</code></li>\n",
            prefix,
            prefix,
            id,
            prefix,
            id,
            escape_xml(&glyph.unicode_entity)
        ));
    }
    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

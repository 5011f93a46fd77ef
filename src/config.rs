use crate::IconFontError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_NAME: &str = "iconfont";
pub const DEFAULT_ASCENT: f64 = 850.0;
pub const DEFAULT_DESCENT: f64 = -150.0;
pub const DEFAULT_UNITS_PER_EM: f64 = 1000.0;

/// The resolved font settings for one compile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FontConfig {
    pub name: String,
    pub ascent: f64,
    pub descent: f64,
    pub units_per_em: f64,
    pub css_prefix: String,
    /// Any other keys from the manifest's `font` section, passed through to templates.
    pub metadata: IndexMap<String, Value>,
}

impl Default for FontConfig {
    fn default() -> Self {
        FontConfig {
            name: DEFAULT_NAME.to_string(),
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            units_per_em: DEFAULT_UNITS_PER_EM,
            css_prefix: css_prefix_for(DEFAULT_NAME),
            metadata: IndexMap::new(),
        }
    }
}

/// A partial set of font settings. Layers are applied on top of each other.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FontLayer {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub ascent: Option<f64>,
    #[serde(default)]
    pub descent: Option<f64>,
    #[serde(default, alias = "unitsPerEm")]
    pub units_per_em: Option<f64>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub metadata: IndexMap<String, Value>,
}

impl FontLayer {
    pub fn named(name: impl Into<String>) -> Self {
        FontLayer {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

impl FontConfig {
    /// Apply `layers` over the built-in defaults, lowest priority first.
    ///
    /// Later layers win per key. If no layer sets a prefix, it is derived from
    /// the final font name.
    pub fn merge<'a>(
        layers: impl IntoIterator<Item = &'a FontLayer>,
    ) -> Result<Self, IconFontError> {
        let mut config = FontConfig::default();
        let mut prefix = None;
        for layer in layers {
            if let Some(name) = layer.name.as_ref().filter(|n| !n.trim().is_empty()) {
                config.name = name.trim().to_string();
            }
            if let Some(ascent) = layer.ascent {
                config.ascent = ascent;
            }
            if let Some(descent) = layer.descent {
                config.descent = descent;
            }
            if let Some(units_per_em) = layer.units_per_em {
                config.units_per_em = units_per_em;
            }
            if let Some(p) = layer.prefix.as_ref().filter(|p| !p.trim().is_empty()) {
                prefix = Some(p.trim().to_string());
            }
            for (key, value) in &layer.metadata {
                config.metadata.insert(key.clone(), value.clone());
            }
        }
        config.css_prefix = prefix.unwrap_or_else(|| css_prefix_for(&config.name));

        let height = config.font_height();
        if height.is_nan() || height <= 0.0 {
            return Err(IconFontError::InvalidMetrics {
                ascent: config.ascent,
                descent: config.descent,
            });
        }
        Ok(config)
    }

    /// The vertical span glyphs are scaled into.
    pub fn font_height(&self) -> f64 {
        self.ascent - self.descent
    }
}

/// The first letter or digit of every word, lowercased: "My Icons" -> "mi".
pub fn css_prefix_for(name: &str) -> String {
    let prefix: String = name
        .split(|c: char| !c.is_alphanumeric())
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_lowercase)
        .collect();
    if prefix.is_empty() {
        "icon".to_string()
    } else {
        prefix
    }
}

/// The parts of a project manifest (`package.json`) we care about.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub font: Option<FontLayer>,
}

impl Manifest {
    /// Load a manifest. A missing file is not an error; an unreadable or
    /// malformed one is.
    pub async fn load(path: &Path) -> Result<Option<Self>, IconFontError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::warn!("No manifest found at {}", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(IconFontError::ManifestRead {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        };
        let manifest =
            serde_json::from_str(&contents).map_err(|e| IconFontError::ManifestParse {
                path: path.to_path_buf(),
                source: e,
            })?;
        Ok(Some(manifest))
    }

    pub fn default_path() -> Result<PathBuf, IconFontError> {
        let cwd = std::env::current_dir().map_err(|e| IconFontError::io(".", e))?;
        Ok(cwd.join("package.json"))
    }
}

/// Per-call overrides, the highest priority layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub name: Option<String>,
    pub prefix: Option<String>,
}

/// Resolve the font config for a project.
///
/// Priority, lowest first: built-in defaults, the project directory's name,
/// the manifest's package name, the manifest's `font` section, then `overrides`.
pub fn resolve(
    project_dir: Option<&Path>,
    manifest: Option<&Manifest>,
    overrides: &Overrides,
) -> Result<FontConfig, IconFontError> {
    let mut layers = vec![];
    if let Some(dir_name) = project_dir
        .and_then(|dir| dir.file_name())
        .and_then(|name| name.to_str())
    {
        layers.push(FontLayer::named(dir_name));
    }
    if let Some(manifest) = manifest {
        if let Some(name) = &manifest.name {
            layers.push(FontLayer::named(name.clone()));
        }
        if let Some(font) = &manifest.font {
            layers.push(font.clone());
        }
    }
    layers.push(FontLayer {
        name: overrides.name.clone(),
        prefix: overrides.prefix.clone(),
        ..Default::default()
    });
    FontConfig::merge(&layers)
}

use crate::{
    config::{self, FontConfig, Manifest, Overrides},
    GlyphSet, GlyphSetBuilder, IconFontError,
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};
use tokio_util::sync::CancellationToken;

/// What the caller asks for. Only `input_dir` and `output_dir` are required.
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    pub input_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub name: Option<String>,
    pub prefix: Option<String>,
    /// Defaults to `package.json` in the current directory.
    pub manifest: Option<PathBuf>,
}

impl CompileOptions {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        CompileOptions {
            input_dir: Some(input_dir.into()),
            output_dir: Some(output_dir.into()),
            ..Default::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn with_manifest(mut self, manifest: impl Into<PathBuf>) -> Self {
        self.manifest = Some(manifest.into());
        self
    }
}

/// Everything the emission stage needs to render a font bundle.
#[derive(Debug, Clone, Serialize)]
pub struct CompilePayload {
    pub font: FontConfig,
    pub glyphs: GlyphSet,
    pub font_height: f64,
    pub font_family: String,
    pub prefix: String,
    /// Random token appended to asset URLs to defeat caches.
    pub cache_token: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineState {
    Idle,
    ConfigResolved,
    GlyphsExtracted,
    PayloadReady,
    Failed(String),
}

/// Drives one compile through config resolution, glyph extraction and
/// payload assembly, strictly in that order.
#[derive(Debug)]
pub struct Pipeline {
    state: PipelineState,
    cancel: CancellationToken,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline {
            state: PipelineState::Idle,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    fn transition(&mut self, state: PipelineState) {
        log::debug!("Pipeline {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    pub async fn compile(
        &mut self,
        options: CompileOptions,
    ) -> Result<CompilePayload, IconFontError> {
        let result = self.run(options).await;
        if let Err(e) = &result {
            self.transition(PipelineState::Failed(e.to_string()));
        }
        result
    }

    async fn run(&mut self, options: CompileOptions) -> Result<CompilePayload, IconFontError> {
        let input_dir = options.input_dir.as_deref().ok_or_else(|| {
            IconFontError::Configuration("compile expects an \"input_dir\"".to_string())
        })?;
        let output_dir = options.output_dir.as_deref().ok_or_else(|| {
            IconFontError::Configuration("compile expects an \"output_dir\"".to_string())
        })?;
        let input_dir = normalize_dir(input_dir)?;
        let output_dir = normalize_dir(output_dir)?;
        log::info!(
            "Compiling from {} to {}...",
            input_dir.display(),
            output_dir.display()
        );

        let manifest_path = match options.manifest {
            Some(path) => path,
            None => Manifest::default_path()?,
        };
        let manifest = Manifest::load(&manifest_path).await?;
        let font = config::resolve(
            manifest_path.parent(),
            manifest.as_ref(),
            &Overrides {
                name: options.name,
                prefix: options.prefix,
            },
        )?;
        self.transition(PipelineState::ConfigResolved);

        log::info!("Generating font \"{}\"...", font.name);
        let font_height = font.font_height();
        let glyphs = GlyphSetBuilder::new(&input_dir, font_height)
            .with_cancellation(self.cancel.clone())
            .build()
            .await?;
        self.transition(PipelineState::GlyphsExtracted);

        let payload = CompilePayload {
            font_family: font.name.clone(),
            prefix: font.css_prefix.clone(),
            font_height,
            font,
            glyphs,
            cache_token: cache_token(),
            input_dir,
            output_dir,
        };
        self.transition(PipelineState::PayloadReady);
        Ok(payload)
    }
}

/// Compile with a fresh [`Pipeline`].
pub async fn compile(options: CompileOptions) -> Result<CompilePayload, IconFontError> {
    Pipeline::new().compile(options).await
}

fn cache_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()[..6].to_string()
}

/// Absolute, with `.` and `..` resolved lexically, and a trailing slash.
pub fn normalize_dir(path: &Path) -> Result<PathBuf, IconFontError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| IconFontError::io(path, e))?
            .join(path)
    };
    let mut cleaned = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                cleaned.pop();
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    let mut dir = cleaned.into_os_string();
    if !dir.to_string_lossy().ends_with(std::path::MAIN_SEPARATOR) {
        dir.push(std::path::MAIN_SEPARATOR_STR);
    }
    Ok(PathBuf::from(dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/a/b/../c/./d", "/a/c/d/")]
    #[case("/a/b/", "/a/b/")]
    #[case("/", "/")]
    fn test_normalize_dir(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(normalize_dir(Path::new(input)).unwrap(), PathBuf::from(expected));
    }

    #[test]
    fn test_normalize_relative_dir() {
        let normalized = normalize_dir(Path::new("icons")).unwrap();
        assert!(normalized.is_absolute());
        assert!(normalized.to_string_lossy().ends_with("icons/"));
    }

    #[tokio::test]
    async fn test_missing_input_dir() {
        let mut pipeline = Pipeline::new();
        let options = CompileOptions {
            output_dir: Some("out".into()),
            ..Default::default()
        };
        let err = pipeline.compile(options).await.unwrap_err();
        assert!(matches!(err, IconFontError::Configuration(_)));
        assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
    }

    #[tokio::test]
    async fn test_missing_output_dir() {
        let options = CompileOptions {
            input_dir: Some("icons".into()),
            ..Default::default()
        };
        let err = compile(options).await.unwrap_err();
        assert!(matches!(err, IconFontError::Configuration(_)));
    }

    #[test]
    fn test_cache_token() {
        let token = cache_token();
        assert_eq!(token.len(), 6);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }
}

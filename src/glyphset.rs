use crate::{
    identity::GlyphIdentity, normalize::normalize, svg, GlyphRecord, GlyphSet, IconFontError,
};
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// Icon files are matched on this extension, ignoring case.
pub const ICON_EXTENSION: &str = "svg";

/// Turns a directory of icons into a [`GlyphSet`].
///
/// Every file is read, parsed and normalized on its own task. The first
/// failure aborts the rest; there is no partial result.
#[derive(Debug, Clone)]
pub struct GlyphSetBuilder {
    input_dir: PathBuf,
    font_height: f64,
    cancel: CancellationToken,
}

impl GlyphSetBuilder {
    pub fn new(input_dir: impl Into<PathBuf>, font_height: f64) -> Self {
        GlyphSetBuilder {
            input_dir: input_dir.into(),
            font_height,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub async fn build(self) -> Result<GlyphSet, IconFontError> {
        if self.cancel.is_cancelled() {
            return Err(IconFontError::Cancelled);
        }
        let files = discover(&self.input_dir).await?;
        log::info!("Found {} files in {}", files.len(), self.input_dir.display());
        if files.is_empty() {
            log::warn!("No icons found in {}", self.input_dir.display());
            return Ok(GlyphSet::default());
        }

        // Filenames are checked before anything is read
        let identities = files
            .iter()
            .map(|file| GlyphIdentity::from_path(file))
            .collect::<Result<Vec<_>, _>>()?;

        let mut tasks = JoinSet::new();
        for (file, identity) in files.into_iter().zip(identities) {
            tasks.spawn(prepare_glyph(file, identity, self.font_height));
        }

        let mut glyphs = Vec::with_capacity(tasks.len());
        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    tasks.abort_all();
                    return Err(IconFontError::Cancelled);
                }
                next = tasks.join_next() => next,
            };
            // Returning early drops the JoinSet, which aborts whatever is still running
            match next {
                Some(result) => glyphs.push(result??),
                None => break,
            }
        }

        let glyphs = GlyphSet::new(glyphs);
        for (a, b) in glyphs.duplicate_codepoints() {
            log::warn!(
                "Glyphs '{}' and '{}' share code point {}",
                a.css_class,
                b.css_class,
                a.unicode_entity
            );
        }
        Ok(glyphs)
    }
}

/// List the icon files in `input_dir`, sorted by path.
pub async fn discover(input_dir: &Path) -> Result<Vec<PathBuf>, IconFontError> {
    let mut entries = tokio::fs::read_dir(input_dir)
        .await
        .map_err(|e| IconFontError::io(input_dir, e))?;
    let mut files = vec![];
    while let Some(entry) = entries
        .next_entry()
        .await
        .map_err(|e| IconFontError::io(input_dir, e))?
    {
        let path = entry.path();
        let is_icon = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(ICON_EXTENSION));
        if !is_icon {
            continue;
        }
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| IconFontError::io(&path, e))?;
        if metadata.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

async fn prepare_glyph(
    file: PathBuf,
    identity: GlyphIdentity,
    font_height: f64,
) -> Result<GlyphRecord, IconFontError> {
    let contents = tokio::fs::read_to_string(&file)
        .await
        .map_err(|e| IconFontError::io(&file, e))?;
    let geometry = svg::parse(&contents, &file)?;
    normalize(&geometry, &identity, font_height, &file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SQUARE: &str = r#"<svg width="10" height="10"><path d="M0 0H10V10H0Z"/></svg>"#;

    fn write(dir: &Path, name: &str, contents: &str) {
        std::fs::write(dir.join(name), contents).unwrap();
    }

    #[tokio::test]
    async fn test_discover_filters_extension() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "f101-b.svg", SQUARE);
        write(dir.path(), "f100-a.SVG", SQUARE);
        write(dir.path(), "notes.txt", "hello");
        std::fs::create_dir(dir.path().join("f102-dir.svg")).unwrap();

        let files = discover(dir.path()).await.unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| f.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["f100-a.SVG", "f101-b.svg"]);
    }

    #[tokio::test]
    async fn test_empty_directory_is_empty_set() {
        let dir = tempfile::tempdir().unwrap();
        let set = GlyphSetBuilder::new(dir.path(), 1000.0).build().await.unwrap();
        assert!(set.is_empty());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = GlyphSetBuilder::new(dir.path().join("nope"), 1000.0)
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, IconFontError::Io { .. }));
    }

    #[tokio::test]
    async fn test_builds_sorted_set() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "f102-zebra.svg", SQUARE);
        write(dir.path(), "f101-apple.svg", SQUARE);
        let set = GlyphSetBuilder::new(dir.path(), 100.0).build().await.unwrap();
        assert_eq!(set.len(), 2);
        assert_eq!(set[0].css_class, "apple");
        assert_eq!(set[1].css_class, "zebra");
        assert_eq!(set[0].width, 100.0);
        assert_eq!(set[0].path_data, "M0,0 L100,0 L100,-100 L0,-100 Z");
    }

    #[tokio::test]
    async fn test_missing_unicode_fails_build() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "f101-apple.svg", SQUARE);
        write(dir.path(), "banana.svg", SQUARE);
        let err = GlyphSetBuilder::new(dir.path(), 100.0)
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, IconFontError::MissingUnicode { .. }));
    }

    #[tokio::test]
    async fn test_cancelled_before_start() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "f101-apple.svg", SQUARE);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = GlyphSetBuilder::new(dir.path(), 100.0)
            .with_cancellation(cancel)
            .build()
            .await
            .unwrap_err();
        assert!(matches!(err, IconFontError::Cancelled));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_cancelled_while_in_flight() {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..3000u32 {
            write(dir.path(), &format!("{:04x}-icon.svg", 0xe000 + i), SQUARE);
        }
        let cancel = CancellationToken::new();
        let build = tokio::spawn(
            GlyphSetBuilder::new(dir.path(), 100.0)
                .with_cancellation(cancel.clone())
                .build(),
        );
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        cancel.cancel();
        let err = build.await.unwrap().unwrap_err();
        assert!(matches!(err, IconFontError::Cancelled));
    }
}

use iconfont::{
    compile,
    emit::{write_bundle, OutputLayout},
    CancellationToken, CompileOptions, GlyphSetBuilder, IconFontError, Pipeline, PipelineState,
};
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};

const ICONS: &str = "resources/icons";

fn icons_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(ICONS)
}

/// Options which never pick up a stray `package.json` from the working directory.
fn options(output: &Path, manifest_dir: &Path) -> CompileOptions {
    CompileOptions::new(icons_dir(), output).with_manifest(manifest_dir.join("package.json"))
}

fn copy_icons(to: &Path) {
    for entry in std::fs::read_dir(icons_dir()).unwrap() {
        let entry = entry.unwrap();
        std::fs::copy(entry.path(), to.join(entry.file_name())).unwrap();
    }
}

#[tokio::test]
async fn test_compile_icons() -> Result<(), IconFontError> {
    let dir = tempfile::tempdir().unwrap();
    let mut pipeline = Pipeline::new();
    let payload = pipeline
        .compile(options(&dir.path().join("out"), dir.path()))
        .await?;
    assert_eq!(pipeline.state(), &PipelineState::PayloadReady);

    assert_eq!(payload.font_height, 1000.0);
    assert!(payload.output_dir.to_string_lossy().ends_with("out/"));
    assert!(payload.input_dir.to_string_lossy().ends_with("icons/"));

    let classes: Vec<&str> = payload.glyphs.iter().map(|g| g.css_class.as_str()).collect();
    assert_eq!(classes, vec!["circle", "arrow left", "home"]);

    let home = payload.glyphs.get("home").unwrap();
    assert_eq!(home.unicode_entity, "&#xf7e0;");
    assert_eq!(home.width, 1000.0);
    assert!(home.path_data.starts_with("M500,-62.5 L62.5,-500 "));

    let arrow = payload.glyphs.get_by_codepoint(0xf101).unwrap();
    assert_eq!(arrow.width, 1000.0);
    assert!(arrow.path_data.starts_with("M625,-125 L250,-500 "));

    let circle = payload.glyphs.get("circle").unwrap();
    assert_eq!(circle.width, 2000.0);
    Ok(())
}

#[tokio::test]
async fn test_unit_ratio_only_flips_y() -> Result<(), IconFontError> {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"font": {"ascent": 16, "descent": 0}}"#,
    )
    .unwrap();
    let payload = compile(options(&dir.path().join("out"), dir.path())).await?;
    let home = payload.glyphs.get("home").unwrap();
    assert_eq!(home.width, 16.0);
    assert!(home.path_data.starts_with("M8,-1 L1,-8 L3,-8 L3,-15 "));
    Ok(())
}

#[tokio::test]
async fn test_determinism() -> Result<(), IconFontError> {
    let dir = tempfile::tempdir().unwrap();
    let first = compile(options(&dir.path().join("out"), dir.path())).await?;
    let second = compile(options(&dir.path().join("out"), dir.path())).await?;
    assert_eq!(first.glyphs, second.glyphs);
    assert_eq!(first.font, second.font);
    assert_eq!(first.prefix, second.prefix);
    Ok(())
}

#[tokio::test]
async fn test_malformed_icon_fails_whole_build() {
    let dir = tempfile::tempdir().unwrap();
    copy_icons(dir.path());
    let broken = dir.path().join("f200-broken.svg");
    std::fs::write(&broken, r#"<svg width="10"><path d="M0 0L5 5"/></svg>"#).unwrap();

    let err = GlyphSetBuilder::new(dir.path(), 1000.0)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        IconFontError::MissingDimension {
            dimension: "height",
            ..
        }
    ));
    assert_eq!(err.source_path(), Some(broken.as_path()));
}

#[tokio::test]
async fn test_icon_without_outlines_fails_whole_build() {
    let dir = tempfile::tempdir().unwrap();
    copy_icons(dir.path());
    std::fs::write(
        dir.path().join("f201-empty.svg"),
        r#"<svg width="10" height="10"></svg>"#,
    )
    .unwrap();
    let err = GlyphSetBuilder::new(dir.path(), 1000.0)
        .build()
        .await
        .unwrap_err();
    assert!(matches!(err, IconFontError::NoOutlineData { .. }));
}

#[tokio::test]
async fn test_name_precedence() -> Result<(), IconFontError> {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"name": "my-project", "font": {"name": "Manifest Icons"}}"#,
    )
    .unwrap();

    let payload = compile(options(&dir.path().join("out"), dir.path())).await?;
    assert_eq!(payload.font.name, "Manifest Icons");
    assert_eq!(payload.prefix, "mi");

    let payload = compile(
        options(&dir.path().join("out"), dir.path())
            .with_name("override")
            .with_prefix("ov"),
    )
    .await?;
    assert_eq!(payload.font.name, "override");
    assert_eq!(payload.font_family, "override");
    assert_eq!(payload.prefix, "ov");
    Ok(())
}

#[tokio::test]
async fn test_malformed_manifest_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("package.json"), "{ \"font\": ").unwrap();
    let mut pipeline = Pipeline::new();
    let err = pipeline
        .compile(options(&dir.path().join("out"), dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, IconFontError::ManifestParse { .. }));
    assert!(matches!(pipeline.state(), PipelineState::Failed(_)));
}

#[tokio::test]
async fn test_invalid_metrics_fail_before_glyphs() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("package.json"),
        r#"{"font": {"ascent": 0, "descent": 0}}"#,
    )
    .unwrap();
    let err = compile(options(&dir.path().join("out"), dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, IconFontError::InvalidMetrics { .. }));
}

#[tokio::test]
async fn test_cancelled_compile() {
    let dir = tempfile::tempdir().unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    let mut pipeline = Pipeline::new().with_cancellation(cancel);
    let err = pipeline
        .compile(options(&dir.path().join("out"), dir.path()))
        .await
        .unwrap_err();
    assert!(matches!(err, IconFontError::Cancelled));
}

#[tokio::test]
async fn test_compile_and_write_bundle() -> Result<(), IconFontError> {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out");
    let payload = compile(options(&out, dir.path()).with_name("demo")).await?;
    let layout = OutputLayout::for_payload(&payload);
    write_bundle(&payload, &layout).await?;

    let svg = std::fs::read_to_string(out.join("demo.svg")).unwrap();
    assert_eq!(svg.matches("<glyph ").count(), 3);
    assert!(svg.contains("glyph-name=\"arrow-left\" unicode=\"&#xf101;\""));

    let css = std::fs::read_to_string(out.join("demo.css")).unwrap();
    assert!(css.contains(".d-home:before { content: \"\\f7e0\"; }"));
    assert!(css.contains(&format!("demo.woff?{}", payload.cache_token)));

    assert!(out.join("demo.scss").is_file());
    assert!(out.join("demo-spec.html").is_file());
    Ok(())
}

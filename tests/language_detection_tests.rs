//! Tests for language definition loading and detection.

use std::fs;
use std::path::Path;

use findrefs::LanguageRegistry;

#[test]
fn embedded_set_covers_common_languages() {
    let mut registry = LanguageRegistry::new();
    registry.add_embedded_languages();

    for name in ["rust", "python", "go", "shell"] {
        assert!(registry.get(name).is_some(), "missing language: {}", name);
    }

    assert_eq!(
        registry.detect(Path::new("src/main.rs"), "").as_deref(),
        Some("rust")
    );
    assert_eq!(
        registry
            .detect(Path::new("run"), "#!/usr/bin/env bash\nset -e\n")
            .as_deref(),
        Some("shell")
    );
}

#[test]
fn user_directory_definitions_override_embedded_ones() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(
        dir.path().join("custom.toml"),
        r#"
        [[language]]
        name = "rust"
        extensions = ["rs", "rsx"]

        [[language]]
        name = "gcode"
        extensions = ["gcode", "nc"]
        "#,
    )
    .expect("write language file");

    let mut registry = LanguageRegistry::new();
    registry.add_embedded_languages();
    registry.load_from_dirs(&[dir.path().to_path_buf()]);

    assert_eq!(
        registry.detect(Path::new("ui.rsx"), "").as_deref(),
        Some("rust")
    );
    assert_eq!(
        registry.detect(Path::new("part.nc"), "").as_deref(),
        Some("gcode")
    );
    // Untouched embedded definitions survive the merge.
    assert_eq!(
        registry.detect(Path::new("tool.py"), "").as_deref(),
        Some("python")
    );
}

#[test]
fn missing_directories_are_skipped() {
    let mut registry = LanguageRegistry::new();
    registry.add_embedded_languages();
    let before = registry.len();

    registry.load_from_dirs(&["/nonexistent/languages".into()]);

    assert_eq!(registry.len(), before);
}

#[test]
fn malformed_files_are_skipped_and_valid_ones_loaded() {
    let dir = tempfile::tempdir().expect("create temp dir");
    fs::write(dir.path().join("broken.toml"), "[[language]\nname = ???")
        .expect("write broken file");
    fs::write(
        dir.path().join("valid.toml"),
        r#"
        [[language]]
        name = "gcode"
        extensions = ["gcode"]
        "#,
    )
    .expect("write valid file");

    let mut registry = LanguageRegistry::new();
    registry.load_from_dirs(&[dir.path().to_path_buf()]);

    assert!(registry.get("gcode").is_some());
    assert_eq!(registry.len(), 1);
}

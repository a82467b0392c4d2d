use std::{
    fs,
    path::{Path, PathBuf},
};

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use tempfile::tempdir;

use inspekt_cli::{Args, run};

/// Collects all .toml manifests from a directory
fn collect_manifests(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    files.sort();
    files
}

fn args(input: &Path, output: Option<&Path>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.map(|path| path.to_string_lossy().to_string()),
        format: None,
        config: None,
        log_level: "off".to_string(),
        save_notes: false,
        stored_notes: false,
    }
}

#[test]
fn e2e_smoke_test_demo_manifests() {
    let temp_dir = tempdir().expect("Failed to create temp directory");

    // Demos are at workspace root, relative to workspace not the crate
    let demos_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos");
    let manifests = collect_manifests(demos_path);

    assert!(!manifests.is_empty(), "No manifests found in demos/");

    let mut failed = Vec::new();

    for manifest_path in &manifests {
        let output_path = temp_dir.path().join(format!(
            "{}.pdf",
            manifest_path.file_stem().unwrap().to_string_lossy()
        ));

        match run(&args(manifest_path, Some(&output_path))) {
            Ok(()) => {
                let bytes = fs::read(&output_path).unwrap();
                assert!(
                    bytes.starts_with(b"%PDF"),
                    "{} did not produce a PDF",
                    manifest_path.display()
                );
            }
            Err(e) => failed.push((manifest_path.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemo manifests that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo manifest(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_report_with_photos_and_sketch_image() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();

    fs::create_dir(dir.join("photos")).unwrap();
    RgbImage::from_pixel(64, 48, Rgb([30, 90, 160]))
        .save(dir.join("photos/front.jpg"))
        .unwrap();
    RgbaImage::from_pixel(32, 32, Rgba([0, 0, 0, 128]))
        .save(dir.join("photos/overlay.png"))
        .unwrap();
    fs::write(dir.join("photos/broken.jpg"), b"definitely not a jpeg").unwrap();
    RgbaImage::from_pixel(90, 50, Rgba([245, 245, 245, 255]))
        .save(dir.join("plan.png"))
        .unwrap();

    let manifest = dir.join("report.toml");
    fs::write(
        &manifest,
        r#"
        client = "Jana"
        notes = "test"
        brands = ["Samsung"]
        max_price = 500
        photos = ["photos/front.jpg", "photos/broken.jpg", "photos/overlay.png"]
        sketch_images = ["plan.png"]
        "#,
    )
    .unwrap();

    let output = dir.join("out.pdf");
    run(&args(&manifest, Some(&output))).expect("Report with photos should export");
    assert!(fs::read(&output).unwrap().starts_with(b"%PDF"));
}

#[test]
fn e2e_format_override_writes_svg() {
    let temp_dir = tempdir().unwrap();
    let manifest = temp_dir.path().join("report.toml");
    fs::write(
        &manifest,
        "client = \"Jana\"\n[[sketches]]\nstrokes = [{ from = [0, 0], to = [100, 100] }]\n",
    )
    .unwrap();

    let output = temp_dir.path().join("report.svg");
    let mut args = args(&manifest, Some(&output));
    args.format = Some("svg".to_string());
    run(&args).unwrap();

    let svg = fs::read_to_string(&output).unwrap();
    assert!(svg.contains("<svg"));
    assert!(svg.contains("data:image/png;base64,"));
}

#[test]
fn e2e_unknown_format_fails() {
    let temp_dir = tempdir().unwrap();
    let manifest = temp_dir.path().join("report.toml");
    fs::write(&manifest, "").unwrap();

    let mut args = args(&manifest, Some(&temp_dir.path().join("out")));
    args.format = Some("docx".to_string());
    assert!(run(&args).is_err());
}

#[test]
fn e2e_missing_manifest_fails() {
    let temp_dir = tempdir().unwrap();
    let result = run(&args(&temp_dir.path().join("absent.toml"), None));
    assert!(result.is_err());
}

#[test]
fn e2e_abort_policy_fails_on_broken_photo() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    fs::write(dir.join("broken.png"), b"nope").unwrap();
    fs::write(dir.join("report.toml"), "photos = [\"broken.png\"]").unwrap();
    fs::write(dir.join("config.toml"), "[export]\nphoto_errors = \"abort\"\n").unwrap();

    let mut args = args(&dir.join("report.toml"), Some(&dir.join("out.pdf")));
    args.config = Some(dir.join("config.toml").to_string_lossy().to_string());

    let err = run(&args).unwrap_err();
    assert!(err.to_string().contains("broken.png"));
    assert!(!dir.join("out.pdf").exists());
}

#[test]
fn e2e_notes_are_saved_and_reused() {
    let temp_dir = tempdir().unwrap();
    let dir = temp_dir.path();
    let notes_file = dir.join("state/notes.json");
    fs::write(
        dir.join("config.toml"),
        format!(
            "[notes]\npath = {:?}\n",
            notes_file.to_string_lossy().to_string()
        ),
    )
    .unwrap();
    let config = Some(dir.join("config.toml").to_string_lossy().to_string());

    fs::write(dir.join("first.toml"), "notes = \"Remember the ladder\"").unwrap();
    let mut save = args(&dir.join("first.toml"), Some(&dir.join("first.pdf")));
    save.config = config.clone();
    save.save_notes = true;
    run(&save).unwrap();
    assert!(fs::read_to_string(&notes_file).unwrap().contains("Remember the ladder"));

    fs::write(dir.join("second.toml"), "client = \"Peter\"").unwrap();
    let mut reuse = args(&dir.join("second.toml"), Some(&dir.join("second.svg")));
    reuse.config = config;
    reuse.format = Some("svg".to_string());
    reuse.stored_notes = true;
    run(&reuse).unwrap();

    let svg = fs::read_to_string(dir.join("second.svg")).unwrap();
    assert!(svg.contains("Remember the ladder"));
}

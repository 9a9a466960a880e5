//! Record source behavior over real directories and manifests.

#![allow(clippy::unwrap_used)]

use std::fs;
use std::num::NonZeroUsize;

use raster_gate_adapters::{FsRecordSource, ManifestRecordSource, NativeBackend};
use raster_gate_core::{BatchRunner, ImageInspector, RecordSource, RecordStatus, ValidationPolicy};
use raster_gate_test_support::{FixtureBuilder, MockNotificationSink, PHOTOMETRIC_CMYK};
use tempfile::TempDir;

#[test]
fn test_fs_source_skips_thumbnails_and_other_files() {
    let dir = TempDir::new().unwrap();
    FixtureBuilder::rgb_jpeg(dir.path(), "photo.jpg", None).unwrap();
    FixtureBuilder::rgb_jpeg(dir.path(), "photo-150x150.jpg", None).unwrap();
    FixtureBuilder::rgb_png(dir.path(), "logo.png").unwrap();
    fs::write(dir.path().join("notes.txt"), "not an image").unwrap();

    let source = FsRecordSource::scan(dir.path(), false);
    let page = source.fetch_page(10, 0).unwrap();

    assert_eq!(source.count_candidates().unwrap(), 2);
    let names: Vec<_> = page.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["logo.png", "photo.jpg"]);
    assert_eq!(page[0].id, 1);
    assert_eq!(page[1].id, 2);
}

#[test]
fn test_fs_source_recursive() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("2024").join("05");
    fs::create_dir_all(&nested).unwrap();
    FixtureBuilder::rgb_jpeg(dir.path(), "top.jpg", None).unwrap();
    FixtureBuilder::rgb_jpeg(&nested, "deep.jpg", None).unwrap();

    assert_eq!(
        FsRecordSource::scan(dir.path(), false)
            .count_candidates()
            .unwrap(),
        1
    );
    assert_eq!(
        FsRecordSource::scan(dir.path(), true)
            .count_candidates()
            .unwrap(),
        2
    );
}

#[test]
fn test_fs_source_pages() {
    let dir = TempDir::new().unwrap();
    for i in 0..5 {
        FixtureBuilder::rgb_png(dir.path(), &format!("img{i}.png")).unwrap();
    }
    let source = FsRecordSource::scan(dir.path(), false);

    assert_eq!(source.fetch_page(2, 0).unwrap().len(), 2);
    assert_eq!(source.fetch_page(2, 2).unwrap()[0].name, "img2.png");
    assert_eq!(source.fetch_page(2, 4).unwrap().len(), 1);
}

#[test]
fn test_manifest_audit_end_to_end() {
    let dir = TempDir::new().unwrap();
    FixtureBuilder::rgb_jpeg(dir.path(), "web.jpg", Some((72, 72))).unwrap();
    FixtureBuilder::tiff_header(dir.path(), "print.tif", PHOTOMETRIC_CMYK, 300).unwrap();
    let manifest = dir.path().join("attachments.json");
    fs::write(
        &manifest,
        r#"[
            {"id": 1, "name": "Web", "path": "web.jpg"},
            {"id": 2, "name": "Print", "path": "print.tif"},
            {"id": 3, "name": "Print thumb", "path": "print-150x150.jpg", "parent": 2},
            {"id": 4, "name": "Gone", "path": "gone.jpg"}
        ]"#,
    )
    .unwrap();

    let source = ManifestRecordSource::load(&manifest, None).unwrap();
    let backend = NativeBackend::new();
    let policy = ValidationPolicy::default();
    let runner = BatchRunner::new(
        &source,
        ImageInspector::new(&backend),
        &policy,
        NonZeroUsize::new(2).unwrap(),
    );
    let sink = MockNotificationSink::new();

    let report = runner.run(&sink).unwrap();

    assert_eq!(report.total, 3);
    assert_eq!(report.checked, 2);
    assert_eq!(report.errors, 2);
    assert_eq!(report.missing, 1);
    assert!(matches!(
        report.outcomes[2].status,
        RecordStatus::FileMissing
    ));
    assert_eq!(sink.summary(), Some((2, 2, 1)));
}

#[test]
fn test_manifest_invalid_json_is_error() {
    let dir = TempDir::new().unwrap();
    let manifest = dir.path().join("bad.json");
    fs::write(&manifest, "{not json").unwrap();

    assert!(ManifestRecordSource::load(&manifest, None).is_err());
}

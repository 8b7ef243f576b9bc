//! Integration tests for lhdiff
//!
//! These tests drive the core pipeline and the report layer together over
//! real files on disk.

use lhdiff_core::{EntryKind, LineTracker, PipelineConfig, Version};
use lhdiff_report::{Case, FileDocument, Manifest, OutputFormat, run_batch};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_versions(dir: &Path, stem: &str, versions: &[&str]) -> Vec<PathBuf> {
    versions
        .iter()
        .enumerate()
        .map(|(i, text)| {
            let path = dir.join(format!("{}_{}.java", stem, i + 1));
            fs::write(&path, text).unwrap();
            path
        })
        .collect()
}

const DATE_V1: &str = "\
public class Date {
    private int day;
    private int month;
    public int getDay() { return day; }
}
";

const DATE_V2: &str = "\
public class Date {
    private int day;
    private int month;
    private int year;
    public int getDay() {
        return day;
    }
}
";

const DATE_V3: &str = "\
public class Date {
    private int year;
    private int day;
    public int getDay() {
        return this.day;
    }
}
";

/// Test that a three-version file maps end to end and survives XML output
#[test]
fn test_multi_version_file_to_xml() {
    let dir = TempDir::new().unwrap();
    let paths = write_versions(dir.path(), "Date", &[DATE_V1, DATE_V2, DATE_V3]);

    let tracker = LineTracker::default();
    let chain = tracker.map_files(&paths[..]).unwrap();
    assert_eq!(chain.transitions.len(), 2);

    let versions: Vec<Version> = paths.iter().map(|p| Version::load(p).unwrap()).collect();
    for (transition, pair) in chain.transitions.iter().zip(versions.windows(2)) {
        transition.table.validate(pair[0].len(), pair[1].len()).unwrap();
    }

    // The one-line accessor is split over three lines.
    let first = &chain.transitions[0].table;
    let accessor = first.get(4).unwrap();
    assert_eq!(accessor.kind, EntryKind::Matched);
    let mut targets: Vec<_> = accessor.target.as_ref().unwrap().lines().collect();
    targets.sort_unstable();
    assert_eq!(targets, vec![5, 6, 7]);

    let out = dir.path().join("out").join("Date.xml");
    let document = FileDocument::from_chain("Date", &chain);
    document.write_to(&out, OutputFormat::Xml).unwrap();

    let read_back = FileDocument::read_from(&out, OutputFormat::Xml).unwrap();
    assert_eq!(read_back.target_sets(), document.target_sets());
    assert_eq!(
        read_back.versions.iter().map(|v| v.number).collect::<Vec<_>>(),
        vec![2, 3]
    );
}

/// Test that every original line gets exactly one record per version
#[test]
fn test_every_original_line_is_reported() {
    let dir = TempDir::new().unwrap();
    let paths = write_versions(dir.path(), "Date", &[DATE_V1, DATE_V2]);

    let chain = LineTracker::default().map_files(&paths[..]).unwrap();
    let document = FileDocument::from_chain("Date", &chain);
    let sets = document.target_sets();

    let origins: Vec<i64> = sets[&2].keys().copied().collect();
    assert_eq!(origins, (1..=5).collect::<Vec<_>>());
}

/// Test that JSON output carries the same mapping as XML
#[test]
fn test_json_and_xml_agree() {
    let dir = TempDir::new().unwrap();
    let paths = write_versions(dir.path(), "Date", &[DATE_V1, DATE_V2, DATE_V3]);

    let chain = LineTracker::default().map_files(&paths[..]).unwrap();
    let document = FileDocument::from_chain("Date", &chain);

    let xml = FileDocument::from_xml(&document.render(OutputFormat::Xml).unwrap()).unwrap();
    let json = FileDocument::from_json(&document.render(OutputFormat::Json).unwrap()).unwrap();
    assert_eq!(xml.target_sets(), json.target_sets());
}

/// Test that a strict threshold from a config file turns edits into delete plus insert
#[test]
fn test_config_file_changes_matching() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("lhdiff.toml");
    fs::write(&config_path, "match_threshold = 0.99\n").unwrap();
    let config = PipelineConfig::load(&config_path).unwrap();

    let old = Version::from_lines(["a", "int total = a + b;", "z"]);
    let new = Version::from_lines(["a", "long total = a + b;", "z"]);

    let (strict, _) = LineTracker::new(config).map_pair(&old, &new);
    assert_eq!(strict.get(2).unwrap().kind, EntryKind::Deleted);
    assert_eq!(strict.insertions().count(), 1);

    let (relaxed, _) = LineTracker::default().map_pair(&old, &new);
    assert_eq!(relaxed.get(2).unwrap().kind, EntryKind::Matched);
    assert_eq!(relaxed.insertions().count(), 0);
}

/// Test a batch run from a manifest file
#[test]
fn test_batch_from_manifest() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    write_versions(root, "Date", &[DATE_V1, DATE_V2, DATE_V3]);
    write_versions(root, "Empty", &["", "int x;\n"]);

    let manifest_path = root.join("cases.toml");
    fs::write(
        &manifest_path,
        r#"
[[case]]
name = "Date"
versions = ["Date_1.java", "Date_2.java", "Date_3.java"]

[[case]]
name = "Empty"
versions = ["Empty_1.java", "Empty_2.java"]
"#,
    )
    .unwrap();

    let manifest = Manifest::load(&manifest_path).unwrap();
    let out = root.join("out");
    let summary = run_batch(&manifest, &PipelineConfig::default(), &out, OutputFormat::Json).unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.succeeded.len(), 2);

    let empty = FileDocument::read_from(&out.join("Empty.json"), OutputFormat::Json).unwrap();
    let records: Vec<_> = empty.versions[0]
        .locations
        .iter()
        .map(|l| (l.orig, l.new))
        .collect();
    assert_eq!(records, vec![(-1, 1)]);

    let date = FileDocument::read_from(&out.join("Date.json"), OutputFormat::Json).unwrap();
    assert_eq!(date.versions.len(), 2);
}

/// Test that a manifest case with a missing version is reported, not fatal
#[test]
fn test_batch_reports_missing_files() {
    let dir = TempDir::new().unwrap();
    let manifest = Manifest {
        cases: vec![Case {
            name: "Ghost".to_string(),
            versions: vec![dir.path().join("ghost_1.c"), dir.path().join("ghost_2.c")],
        }],
    };

    let summary = run_batch(
        &manifest,
        &PipelineConfig::default(),
        &dir.path().join("out"),
        OutputFormat::Xml,
    )
    .unwrap();
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].error.contains("ghost_1.c"));
}

//! Unit tests for lhdiff-report

use crate::*;
use lhdiff_core::{LineTracker, MappingEntry, PipelineConfig, Target, Version};
use std::fs;
use tempfile::TempDir;

fn sample_document() -> FileDocument {
    FileDocument {
        name: "Sum".to_string(),
        versions: vec![VersionRecord {
            number: 2,
            from: 1,
            to: 2,
            locations: vec![
                LocationRecord { orig: -1, new: 4, alternates: vec![] },
                LocationRecord { orig: 1, new: 1, alternates: vec![2, 3] },
                LocationRecord { orig: 2, new: -1, alternates: vec![] },
            ],
        }],
    }
}

#[test]
fn test_location_records_use_sentinels() {
    let deleted = LocationRecord::from(&MappingEntry::deleted(3));
    assert_eq!((deleted.orig, deleted.new), (3, -1));

    let inserted = LocationRecord::from(&MappingEntry::inserted(5));
    assert_eq!((inserted.orig, inserted.new), (-1, 5));

    let split = LocationRecord::from(&MappingEntry::matched(
        1,
        Target { primary: 1, alternates: vec![2, 3] },
    ));
    assert_eq!(split.alternates, vec![2, 3]);
}

#[test]
fn test_xml_layout() {
    let xml = sample_document().to_xml().unwrap();
    insta::assert_snapshot!(xml, @r###"
    <?xml version="1.0" encoding="UTF-8"?>
    <TEST FILENAME="Sum">
      <VERSION NUMBER="2">
        <LOCATION ORIG="-1" NEW="4"/>
        <LOCATION ORIG="1" NEW="1">
          <ALT NEW="2"/>
          <ALT NEW="3"/>
        </LOCATION>
        <LOCATION ORIG="2" NEW="-1"/>
      </VERSION>
    </TEST>
    "###);
}

#[test]
fn test_xml_reads_back() {
    let doc = sample_document();
    let parsed = FileDocument::from_xml(&doc.to_xml().unwrap()).unwrap();
    assert_eq!(parsed, doc);
}

#[test]
fn test_reads_ground_truth_style_xml() {
    let xml = r#"<?xml version="1.0"?>
<TEST NAME="ArrayReference" FILENAME="ArrayReference">
  <VERSION NUMBER="2" CHECKED="TRUE">
    <LOCATION ORIG="1" NEW="1" />
    <LOCATION ORIG="2" NEW="4">
      <ALT NEW="5" />
    </LOCATION>
    <LOCATION ORIG="3" NEW="-1" />
  </VERSION>
</TEST>
"#;
    let doc = FileDocument::from_xml(xml).unwrap();
    assert_eq!(doc.name, "ArrayReference");

    let sets = doc.target_sets();
    let v2 = &sets[&2];
    assert_eq!(v2[&1].iter().copied().collect::<Vec<_>>(), vec![1]);
    assert_eq!(v2[&2].iter().copied().collect::<Vec<_>>(), vec![4, 5]);
    assert_eq!(v2[&3].iter().copied().collect::<Vec<_>>(), vec![-1]);
}

#[test]
fn test_target_sets_ignore_alternate_order_and_insertions() {
    let mut reordered = sample_document();
    reordered.versions[0].locations[1].alternates = vec![3, 2];
    assert_eq!(reordered.target_sets(), sample_document().target_sets());
    assert!(!sample_document().target_sets()[&2].contains_key(&-1));
}

#[test]
fn test_malformed_xml_attribute() {
    let xml = r#"<TEST FILENAME="x"><VERSION NUMBER="2"><LOCATION ORIG="one" NEW="1"/></VERSION></TEST>"#;
    let err = FileDocument::from_xml(xml).unwrap_err();
    assert!(matches!(err, ReportError::InvalidDocument(_)));

    let orphan = r#"<TEST FILENAME="x"><LOCATION ORIG="1" NEW="1"/></TEST>"#;
    assert!(FileDocument::from_xml(orphan).is_err());

    for number in ["-1", "0"] {
        let xml = format!(
            r#"<TEST FILENAME="x"><VERSION NUMBER="{number}"><LOCATION ORIG="1" NEW="1"/></VERSION></TEST>"#
        );
        let err = FileDocument::from_xml(&xml).unwrap_err();
        assert!(matches!(err, ReportError::InvalidDocument(_)), "NUMBER={number}");
    }
}

#[test]
fn test_json_round_trip() {
    let doc = sample_document();
    let json = doc.to_json().unwrap();
    assert!(json.contains("\"alternates\""));
    assert_eq!(FileDocument::from_json(&json).unwrap(), doc);
}

#[test]
fn test_output_format_parsing() {
    assert_eq!("xml".parse::<OutputFormat>().unwrap(), OutputFormat::Xml);
    assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
    assert!("csv".parse::<OutputFormat>().is_err());
    assert_eq!(OutputFormat::Json.extension(), "json");
}

#[test]
fn test_document_from_chain() {
    let versions = vec![
        Version::from_lines(["foo", "bar"]),
        Version::from_lines(["foo", "qux", "bar"]),
    ];
    let chain = LineTracker::default().map_chain(&versions);
    let doc = FileDocument::from_chain("Scenario", &chain);

    assert_eq!(doc.versions.len(), 1);
    assert_eq!(doc.versions[0].number, 2);
    let pairs: Vec<_> = doc.versions[0]
        .locations
        .iter()
        .map(|l| (l.orig, l.new))
        .collect();
    assert_eq!(pairs, vec![(-1, 2), (1, 1), (2, 3)]);
}

#[test]
fn test_manifest_resolves_relative_paths() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("cases.toml");
    fs::write(
        &path,
        r#"
[[case]]
name = "Sum"
versions = ["sum_1.c", "sum_2.c"]
"#,
    )
    .unwrap();

    let manifest = Manifest::load(&path).unwrap();
    assert_eq!(manifest.cases.len(), 1);
    assert_eq!(manifest.cases[0].versions[0], dir.path().join("sum_1.c"));
}

#[test]
fn test_batch_isolates_failures() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("sum_1.c"), "int sum(a,b){return a+b;}\n").unwrap();
    fs::write(root.join("sum_2.c"), "int sum(a,b){\n  return a+b;\n}\n").unwrap();

    let manifest = Manifest {
        cases: vec![
            Case {
                name: "Sum".to_string(),
                versions: vec![root.join("sum_1.c"), root.join("sum_2.c")],
            },
            Case {
                name: "Missing".to_string(),
                versions: vec![root.join("gone_1.c"), root.join("gone_2.c")],
            },
        ],
    };

    let out = root.join("out");
    let summary = run_batch(&manifest, &PipelineConfig::default(), &out, OutputFormat::Xml).unwrap();

    assert!(!summary.is_clean());
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].name, "Missing");
    assert!(summary.finished_at >= summary.started_at);

    let written = FileDocument::read_from(&out.join("Sum.xml"), OutputFormat::Xml).unwrap();
    let sets = written.target_sets();
    assert_eq!(sets[&2][&1].iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
}

#[test]
fn test_batch_rejects_duplicate_case_names() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("a_1.c"), "x\n").unwrap();
    fs::write(root.join("a_2.c"), "x\ny\n").unwrap();
    fs::write(root.join("b_1.c"), "p\n").unwrap();
    fs::write(root.join("b_2.c"), "q\n").unwrap();

    let manifest = Manifest {
        cases: vec![
            Case {
                name: "Same".to_string(),
                versions: vec![root.join("a_1.c"), root.join("a_2.c")],
            },
            Case {
                name: "Same".to_string(),
                versions: vec![root.join("b_1.c"), root.join("b_2.c")],
            },
        ],
    };

    let out = root.join("out");
    let summary = run_batch(&manifest, &PipelineConfig::default(), &out, OutputFormat::Xml).unwrap();
    assert_eq!(summary.succeeded.len(), 1);
    assert_eq!(summary.failures.len(), 1);
    assert!(summary.failures[0].error.contains("duplicate"));

    // The first case owns the file.
    let written = FileDocument::read_from(&out.join("Same.xml"), OutputFormat::Xml).unwrap();
    let pairs: Vec<_> = written.versions[0]
        .locations
        .iter()
        .map(|l| (l.orig, l.new))
        .collect();
    assert_eq!(pairs, vec![(-1, 2), (1, 1)]);
}

#[test]
fn test_batch_rejects_names_outside_output_dir() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::write(root.join("v_1.c"), "x\n").unwrap();
    fs::write(root.join("v_2.c"), "x\n").unwrap();
    let versions = vec![root.join("v_1.c"), root.join("v_2.c")];

    let manifest = Manifest {
        cases: ["../escape", "nested/name", ".."]
            .into_iter()
            .map(|name| Case {
                name: name.to_string(),
                versions: versions.clone(),
            })
            .collect(),
    };

    let out = root.join("out");
    let summary = run_batch(&manifest, &PipelineConfig::default(), &out, OutputFormat::Xml).unwrap();
    assert!(summary.succeeded.is_empty());
    assert_eq!(summary.failures.len(), 3);
    assert!(!root.join("escape.xml").exists());
    assert_eq!(fs::read_dir(&out).unwrap().count(), 0);
}

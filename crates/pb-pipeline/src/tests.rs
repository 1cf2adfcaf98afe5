use crate::*;
use serde_json::json;
use std::sync::Arc;

fn table(values: serde_json::Value) -> PlaceholderTable {
    let mut t = PlaceholderTable::new();
    t.configure_json(values.as_object().unwrap()).unwrap();
    t
}

fn upper(ext: &'static str) -> Arc<dyn Compactor> {
    Arc::new(FnCompactor::new(
        "upper",
        move |file: &str| file.ends_with(ext),
        |contents: &[u8]| Ok(contents.to_ascii_uppercase()),
    ))
}

// ========== Placeholder table ==========

#[test]
fn test_render_basic() {
    let t = table(json!({"a": "1", "b": true}));
    assert_eq!(t.render_str("@a@-@b@"), "1-1");
}

#[test]
fn test_render_false_is_empty() {
    let t = table(json!({"debug": false}));
    assert_eq!(t.render_str("[@debug@]"), "[]");
}

#[test]
fn test_render_numbers() {
    let t = table(json!({"int": -3, "float": 2.5, "whole": 2.0}));
    assert_eq!(t.render_str("@int@ @float@ @whole@"), "-3 2.5 2");
}

#[test]
fn test_render_no_chained_substitution() {
    let t = table(json!({"x": "@y@", "y": "Z"}));
    assert_eq!(t.render_str("@x@"), "@y@");
    assert_eq!(t.render_str("@x@@y@"), "@y@Z");
}

#[test]
fn test_render_unknown_token_untouched() {
    let t = table(json!({"a": "1"}));
    assert_eq!(t.render_str("@missing@ @a@ a@"), "@missing@ 1 a@");
}

#[test]
fn test_render_empty_table() {
    let t = PlaceholderTable::new();
    assert!(t.is_empty());
    assert_eq!(t.render(b"@a@"), b"@a@");
}

#[test]
fn test_render_non_utf8() {
    let t = table(json!({"v": "1.0"}));
    assert_eq!(t.render(&[0xff, b'@', b'v', b'@', 0xfe]), vec![0xff, b'1', b'.', b'0', 0xfe]);
}

#[test]
fn test_render_metachar_keys() {
    let t = table(json!({"a.b": "dot", "a*": "star"}));
    assert_eq!(t.render_str("@a.b@ @axb@ @a*@"), "dot @axb@ star");
}

#[test]
fn test_configure_rust_values() {
    let mut t = PlaceholderTable::new();
    t.configure([("name", PlaceholderValue::from("box")), ("n", 3i64.into()), ("on", true.into())]).unwrap();
    assert_eq!(t.len(), 3);
    assert_eq!(t.get("name"), Some("box"));
    assert_eq!(t.get("n"), Some("3"));
    assert_eq!(t.get("on"), Some("1"));
    assert_eq!(t.value("n"), Some(&PlaceholderValue::Integer(3)));
    assert_eq!(t.tokens().collect::<Vec<_>>(), vec!["@n@", "@name@", "@on@"]);
}

#[test]
fn test_configure_replaces_table() {
    let mut t = table(json!({"a": "1", "b": "2"}));
    t.configure([("c", "3")]).unwrap();
    assert_eq!(t.len(), 1);
    assert_eq!(t.get("a"), None);
    assert_eq!(t.render_str("@a@@c@"), "@a@3");
}

#[test]
fn test_configure_non_scalar_rolls_back() {
    let mut t = table(json!({"a": "1"}));
    let err = t.configure_json(json!({"b": "2", "list": [1, 2]}).as_object().unwrap()).unwrap_err();
    match err {
        PackError::InvalidValue { key, actual_type } => {
            assert_eq!(key, "list");
            assert_eq!(actual_type, "array");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(t.len(), 1);
    assert_eq!(t.render_str("@a@@b@"), "1@b@");
}

#[test]
fn test_configure_non_finite_rolls_back() {
    let mut t = table(json!({"a": "1"}));
    let err = t.configure([("a", 2.0), ("ratio", f64::NAN)]).unwrap_err();
    assert_eq!(err.key(), Some("ratio"));
    assert_eq!(t.get("a"), Some("1"));
}

#[test]
fn test_configure_invalid_key() {
    let mut t = table(json!({"a": "1"}));
    let err = t.configure([("ok", "x"), ("bad@key", "y")]).unwrap_err();
    assert!(matches!(err, PackError::InvalidKey { ref key, .. } if key == "bad@key"));
    let err = t.configure([("", "y")]).unwrap_err();
    assert!(matches!(err, PackError::InvalidKey { .. }));
    assert_eq!(t.get("a"), Some("1"));
    assert_eq!(t.get("ok"), None);
}

#[test]
fn test_longest_token_wins() {
    let t = table(json!({"a": "short", "a b": "long"}));
    assert_eq!(t.render_str("@a b@ @a@"), "long short");
}

// ========== Pipeline ==========

#[test]
fn test_process_compacts_then_renders() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.add_compactor(upper(".txt"));
    p.configure_values([("name", "box")]).unwrap();
    // Values are not subject to compaction; the token is upper-cased first.
    assert_eq!(p.process("a.txt", b"@name@ @NAME@").unwrap(), b"@NAME@ @NAME@");

    p.configure_values([("NAME", "box")]).unwrap();
    assert_eq!(p.process("a.txt", b"hi @name@").unwrap(), b"HI box");
}

#[test]
fn test_process_is_pure() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.add_compactor(upper(".txt"));
    p.configure_values([("V", 1i64)]).unwrap();
    let first = p.process("a.txt", b"v=@v@").unwrap();
    let second = p.process("a.txt", b"v=@v@").unwrap();
    assert_eq!(first, second);
    assert_eq!(first, b"V=1");
    assert!(p.sink().is_empty());
}

#[test]
fn test_process_unsupported_file_only_rendered() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.add_compactor(upper(".txt"));
    p.configure_values([("v", "x")]).unwrap();
    assert_eq!(p.process("a.bin", b"ab @v@").unwrap(), b"ab x");
}

#[test]
fn test_process_transform_error() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.add_compactor(Arc::new(pb_compactor::JsonCompactor::new()));
    let err = p.process("composer.json", b"{").unwrap_err();
    assert_eq!(err.file(), Some("composer.json"));
    assert!(matches!(err, PackError::Transform { ref compactor, position: 0, .. } if compactor == "json"));
}

#[test]
fn test_pipeline_stage_accessors() {
    let mut p = Pipeline::new(MemoryArchive::new());
    let c = upper(".txt");
    assert!(p.add_compactor(c.clone()));
    assert!(!p.add_compactor(c));
    assert_eq!(p.compactors().len(), 1);
    p.configure_values([("v", "x")]).unwrap();
    assert_eq!(p.compact_contents("a.txt", b"@v@").unwrap(), b"@V@");
    assert_eq!(p.replace_values(b"@v@"), b"x");
    assert_eq!(p.placeholders().len(), 1);
}

#[test]
fn test_pipeline_metadata_passthrough() {
    let mut p = Pipeline::new(MemoryArchive::with_metadata(json!({"stub": "index.php"})));
    assert_eq!(p.metadata()["stub"], "index.php");
    p.metadata_mut()["version"] = json!("1.0");
    let archive = p.into_sink();
    assert_eq!(archive.metadata()["version"], "1.0");
}

#[test]
fn test_from_config() {
    let config = PackConfig::from_json_str(
        r#"{
            "compactors": [{"kind": "comments", "extensions": ["php"]}, {"kind": "json"}],
            "values": {"version": "1.2.0", "debug": false}
        }"#,
    )
    .unwrap();
    assert_eq!(config.on_error, FailurePolicy::Abort);
    let p = Pipeline::from_config(&config, MemoryArchive::new()).unwrap();
    assert_eq!(p.compactors().names(), vec!["comments", "json"]);
    assert_eq!(
        p.process("src/a.php", b"<?php\n// drop\n$v = '@version@';\n").unwrap(),
        b"<?php\n$v = '1.2.0';\n"
    );
    assert_eq!(p.process("box.json", b"{ \"v\": \"@version@\" }").unwrap(), br#"{"v":"1.2.0"}"#);
}

#[test]
fn test_from_config_bad_value() {
    let config = PackConfig::from_json_str(r#"{"values": {"nested": {"a": 1}}}"#).unwrap();
    let err = Pipeline::from_config(&config, MemoryArchive::new()).err().unwrap();
    assert!(matches!(err, PackError::InvalidValue { ref key, .. } if key == "nested"));
}

#[test]
fn test_config_rejects_unknown_fields() {
    assert!(matches!(
        PackConfig::from_json_str(r#"{"compactor": []}"#),
        Err(PackError::Serialization(_))
    ));
    assert!(PackConfig::from_json_str(r#"{"on_error": "skip"}"#).unwrap().on_error == FailurePolicy::Skip);
}

// ========== Sinks ==========

#[test]
fn test_memory_archive() {
    let mut a = MemoryArchive::new();
    a.add_entry("a.txt", b"1").unwrap();
    a.add_entry("a.txt", b"2").unwrap();
    assert_eq!(a.len(), 1);
    assert_eq!(a.entry("a.txt"), Some(&b"2"[..]));
    assert!(matches!(a.add_entry("", b""), Err(PackError::Sink(_))));
}

#[test]
fn test_zip_sink_duplicate() {
    let mut z = ZipArchiveSink::new(std::io::Cursor::new(Vec::new()));
    z.add_entry("a.txt", b"1").unwrap();
    assert!(matches!(z.add_entry("a.txt", b"2"), Err(PackError::Sink(_))));
    assert_eq!(z.len(), 1);
}

/// Writer whose every write fails.
struct BrokenWriter(std::io::Cursor<Vec<u8>>);

impl std::io::Write for BrokenWriter {
    fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
        Err(std::io::Error::other("disk full"))
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl std::io::Seek for BrokenWriter {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        std::io::Seek::seek(&mut self.0, pos)
    }
}

#[test]
fn test_zip_sink_failed_write_not_recorded() {
    let mut z = ZipArchiveSink::new(BrokenWriter(std::io::Cursor::new(Vec::new())));
    assert!(z.add_entry("a.txt", b"1").is_err());
    assert_eq!(z.len(), 0);
    assert!(z.is_empty());
}

// ========== Batch ==========

#[test]
fn test_process_batch_keeps_order() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.configure_values([("n", "N")]).unwrap();
    let files: Vec<SourceFile> = (0..50).map(|i| SourceFile::new(format!("f{i}.txt"), format!("{i}@n@"))).collect();
    let results = process_batch(&p, &files);
    assert_eq!(results.len(), 50);
    for (i, r) in results.into_iter().enumerate() {
        let r = r.unwrap();
        assert_eq!(r.name, format!("f{i}.txt"));
        assert_eq!(r.contents, format!("{i}N").into_bytes());
    }
}

#[test]
fn test_package_abort_writes_nothing() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.add_compactor(Arc::new(pb_compactor::JsonCompactor::new()));
    let files = vec![
        SourceFile::new("ok.json", "{ }"),
        SourceFile::new("bad.json", "{"),
        SourceFile::new("worse.json", "]"),
    ];
    let err = package(&mut p, &files, FailurePolicy::Abort).unwrap_err();
    assert_eq!(err.file(), Some("bad.json"));
    assert!(p.sink().is_empty());
}

#[test]
fn test_package_skip() {
    let mut p = Pipeline::new(MemoryArchive::new());
    p.add_compactor(Arc::new(pb_compactor::JsonCompactor::new()));
    let files = vec![
        SourceFile::new("a.json", "{ \"a\": 1 }"),
        SourceFile::new("bad.json", "{"),
        SourceFile::new("b.txt", "plain"),
    ];
    let report = package(&mut p, &files, FailurePolicy::Skip).unwrap();
    assert_eq!(report.written, vec!["a.json", "b.txt"]);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].0, "bad.json");
    assert_eq!(report.bytes_in, 10 + 5);
    assert_eq!(report.bytes_out, 7 + 5);
    assert!(report.reduction_pct() > 0.0);
    assert_eq!(p.sink().entry("a.json"), Some(&br#"{"a":1}"#[..]));
    assert_eq!(p.sink().entry("bad.json"), None);
}

#[test]
fn test_report_empty_reduction() {
    assert_eq!(PackageReport::default().reduction_pct(), 0.0);
}

#[test]
fn test_package_sink_error_keeps_earlier_entries() {
    let mut p = Pipeline::new(MemoryArchive::new());
    let files = vec![
        SourceFile::new("a.txt", "1"),
        SourceFile::new("", "2"),
        SourceFile::new("b.txt", "3"),
    ];
    let err = package(&mut p, &files, FailurePolicy::Skip).unwrap_err();
    assert!(matches!(err, PackError::Sink(_)));
    assert_eq!(p.sink().names().collect::<Vec<_>>(), vec!["a.txt"]);
}

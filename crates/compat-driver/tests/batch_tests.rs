use compat_driver::{
    report, BatchDriver, DriverConfig, DriverError, ErrorPolicy, FileOutcome, ReportFormat,
    NOT_CANDIDATE,
};
use compat_test_utils::{
    legacy_tree, LEGACY_ARRAYLIST, LEGACY_HASHMAP, MIGRATED_ARRAYLIST, MIGRATED_HASHMAP,
    UNRELATED,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::PathBuf;

#[test]
fn test_directory_batch_fixes_and_counts() {
    let tree = legacy_tree();
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    let batch = driver.run(tree.path()).unwrap();

    assert_eq!(batch.scanned(), 3);
    assert_eq!(batch.changed(), 2);
    assert_eq!(report::summary_line(&batch), "✅ Fixed 2/3 files");

    assert_eq!(tree.read("src/list.zig"), MIGRATED_ARRAYLIST);
    assert_eq!(tree.read("src/map.zig"), MIGRATED_HASHMAP);
    assert_eq!(tree.read("src/plain.zig"), UNRELATED);
    assert_eq!(tree.read("zig-cache/stale.zig"), LEGACY_ARRAYLIST);

    let paths: Vec<_> = batch.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("src/list.zig"),
            PathBuf::from("src/map.zig"),
            PathBuf::from("src/plain.zig"),
        ]
    );
}

#[test]
fn test_second_batch_changes_nothing() {
    let tree = legacy_tree();
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    driver.run(tree.path()).unwrap();
    let second = driver.run(tree.path()).unwrap();

    assert_eq!(second.changed(), 0);
    assert!(second
        .files
        .iter()
        .all(|f| f.outcome == FileOutcome::Unchanged));
}

#[test]
fn test_dry_run_detects_same_files_and_writes_nothing() {
    let tree = legacy_tree();
    let dry = BatchDriver::new(DriverConfig::new().with_dry_run(true)).unwrap();
    let mtime = |rel: &str| fs::metadata(tree.join(rel)).unwrap().modified().unwrap();
    let before = (mtime("src/list.zig"), mtime("src/map.zig"));

    let batch = dry.run(tree.path()).unwrap();

    assert_eq!(batch.changed(), 2);
    assert_eq!(report::summary_line(&batch), "[DRY RUN] Would fix 2/3 files");
    assert_eq!(tree.read("src/list.zig"), LEGACY_ARRAYLIST);
    assert_eq!(tree.read("src/map.zig"), LEGACY_HASHMAP);
    assert_eq!((mtime("src/list.zig"), mtime("src/map.zig")), before);

    let real = BatchDriver::new(DriverConfig::new()).unwrap();
    assert_eq!(real.run(tree.path()).unwrap().changed(), batch.changed());
}

#[test]
fn test_unreadable_file_is_skipped() {
    let tree = legacy_tree().with_file("src/binary.zig", [0xc3, 0x28, 0xa0]);
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    let batch = driver.run(tree.path()).unwrap();

    assert_eq!(batch.scanned(), 4);
    assert_eq!(batch.skipped(), 1);
    assert_eq!(batch.changed(), 2);
    assert_eq!(tree.read("src/map.zig"), MIGRATED_HASHMAP);
}

#[test]
fn test_abort_policy_stops_batch() {
    let tree = legacy_tree().with_file("src/binary.zig", [0xc3, 0x28, 0xa0]);
    let config = DriverConfig::new().with_error_policy(ErrorPolicy::Abort);
    let driver = BatchDriver::new(config).unwrap();

    let err = driver.run(tree.path()).unwrap_err();

    assert!(matches!(err, DriverError::Aborted { .. }));
    // binary.zig sorts first, so nothing was written
    assert_eq!(tree.read("src/list.zig"), LEGACY_ARRAYLIST);
}

#[test]
fn test_single_file_report() {
    let tree = legacy_tree();
    let path = tree.join("src/plain.zig");
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    let batch = driver.run(&path).unwrap();
    let text = report::render(&batch, ReportFormat::Text).unwrap();

    assert_eq!(batch.scanned(), 1);
    assert!(text.contains("No changes needed"));
    assert!(text.ends_with("✅ Fixed 0/1 files\n"));
}

#[test]
fn test_single_non_candidate_file_is_not_rewritten() {
    let notes = "std.ArrayList(u8).init(allocator)\nlist.append(5);\nlist.deinit();\n";
    let tree = legacy_tree().with_file("NOTES.md", notes);
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    let batch = driver.run(&tree.join("NOTES.md")).unwrap();

    assert_eq!(batch.scanned(), 1);
    assert_eq!(batch.changed(), 0);
    assert_eq!(
        batch.files[0].outcome,
        FileOutcome::Skipped {
            reason: NOT_CANDIDATE.to_string()
        }
    );
    assert_eq!(tree.read("NOTES.md"), notes);
}

#[cfg(feature = "parallel")]
#[test]
fn test_parallel_batch_keeps_discovery_order() {
    let tree = legacy_tree().with_file("src/binary.zig", [0xc3, 0x28, 0xa0]);
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    let batch = driver.run(tree.path()).unwrap();

    let paths: Vec<_> = batch.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        vec![
            PathBuf::from("src/binary.zig"),
            PathBuf::from("src/list.zig"),
            PathBuf::from("src/map.zig"),
            PathBuf::from("src/plain.zig"),
        ]
    );
    assert_eq!((batch.scanned(), batch.changed(), batch.skipped()), (4, 2, 1));
    assert_eq!(tree.read("src/list.zig"), MIGRATED_ARRAYLIST);
    assert_eq!(tree.read("src/map.zig"), MIGRATED_HASHMAP);
}

#[test]
fn test_missing_root_is_input_error() {
    let tree = legacy_tree();
    let driver = BatchDriver::new(DriverConfig::new()).unwrap();

    let err = driver.run(&tree.join("nope")).unwrap_err();
    assert!(err.is_input_error());
}

#[test]
fn test_json_report_lists_categories() {
    let tree = legacy_tree();
    let driver = BatchDriver::new(DriverConfig::new().with_dry_run(true)).unwrap();

    let batch = driver.run(tree.path()).unwrap();
    let json = report::render(&batch, ReportFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    assert_eq!(value["dry_run"], true);
    assert_eq!(value["files"][0]["status"], "would-fix");
    assert_eq!(
        value["categories"]["Container.deinit: Added allocator parameter"],
        2
    );
}

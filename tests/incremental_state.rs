use std::collections::BTreeMap;
use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assertgen::fs::mock::MockFileSystem;
use assertgen::fs::FileSystem;
use assertgen::incremental::hash::{compute_file_hash, compute_text_hash};
use assertgen::incremental::{
    prepare_output_dir, FileRecord, FileStateStore, FullReason, GenerationInputs,
    GenerationState, MemoryStateStore, Partition, RegenerationPlan, Snapshot, StateStore,
    STATE_FILE_PATH,
};
use assertgen::patterns::FilterState;
use assertgen::types::EntryPointType;

type TestResult = Result<(), Box<dyn Error>>;

fn inputs() -> GenerationInputs {
    GenerationInputs {
        generator_cmd: "gen".to_string(),
        output_dir: "out".to_string(),
        hierarchical: false,
        entry_points: vec![EntryPointType::Standard, EntryPointType::Soft],
        entry_point_package: Some("org.example".to_string()),
        classes: FilterState {
            version: 1,
            includes: vec!["org.**".to_string()],
            excludes: vec![],
        },
        packages: FilterState::default(),
        inline_templates: BTreeMap::from([("object".to_string(), compute_text_hash("x"))]),
        template_files: BTreeMap::from([(
            "assertion_class".to_string(),
            "templates/class.txt".to_string(),
        )]),
    }
}

fn sample_state() -> GenerationState {
    let mut snapshot = Snapshot::new();
    snapshot.insert(
        PathBuf::from("src/org/A.java"),
        FileRecord {
            partition: Partition::Source,
            hash: "abc".to_string(),
        },
    );
    snapshot.insert(
        PathBuf::from("libs/dep.jar"),
        FileRecord {
            partition: Partition::Classpath,
            hash: "def".to_string(),
        },
    );
    let outputs = BTreeMap::from([(
        PathBuf::from("src/org/A.java"),
        vec![PathBuf::from("out/org/AAssert.java")],
    )]);
    GenerationState::new(inputs(), &snapshot, &outputs)
}

#[test]
fn file_store_round_trips_state() -> TestResult {
    let fs = MockFileSystem::new();
    let mut store = FileStateStore::new(Arc::new(fs.clone()), PathBuf::from("project"));
    assert!(store.load()?.is_none());

    let state = sample_state();
    store.save(&state)?;
    assert!(fs.is_file(&PathBuf::from("project").join(STATE_FILE_PATH)));

    let loaded = store.load()?.expect("state was saved");
    assert_eq!(loaded, state);
    assert_eq!(loaded.snapshot().len(), 2);
    assert_eq!(
        loaded.outputs().get(Path::new("src/org/A.java")),
        Some(&vec![PathBuf::from("out/org/AAssert.java")])
    );

    store.clear()?;
    assert!(store.load()?.is_none());
    Ok(())
}

#[test]
fn unreadable_or_foreign_state_is_ignored() -> TestResult {
    let fs = MockFileSystem::new();
    let store = FileStateStore::new(Arc::new(fs.clone()), PathBuf::new());

    fs.add_file(STATE_FILE_PATH, "this is = = not toml");
    assert!(store.load()?.is_none());

    let mut old = sample_state();
    old.version = 0;
    fs.add_file(STATE_FILE_PATH, toml::to_string(&old)?);
    assert!(store.load()?.is_none());
    Ok(())
}

#[test]
fn memory_store_keeps_the_last_state() -> TestResult {
    let mut store = MemoryStateStore::new();
    assert!(store.load()?.is_none());
    store.save(&sample_state())?;
    assert_eq!(store.load()?, Some(sample_state()));
    store.clear()?;
    assert!(store.load()?.is_none());
    Ok(())
}

#[test]
fn file_hash_tracks_content() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("a.txt", "hello world");
    let first = compute_file_hash(&fs, Path::new("a.txt"))?;
    assert_eq!(first, compute_text_hash("hello world"));

    fs.add_file("a.txt", "hello world!");
    assert_ne!(compute_file_hash(&fs, Path::new("a.txt"))?, first);
    Ok(())
}

#[test]
fn full_plan_clears_the_output_tree() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("out/org/AAssert.java", "old");
    fs.add_file("out/org/BAssert.java", "old");
    fs.add_file("keep/me.txt", "x");

    prepare_output_dir(
        &fs,
        Path::new("out"),
        &RegenerationPlan::Full(FullReason::NotIncremental),
        &BTreeMap::new(),
        &[],
    )?;

    assert!(fs.is_dir(Path::new("out")));
    assert!(!fs.exists(Path::new("out/org/AAssert.java")));
    assert!(fs.is_file(Path::new("keep/me.txt")));
    Ok(())
}

#[test]
fn scoped_plan_removes_only_the_regenerated_outputs() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("out/org/AAssert.java", "old a");
    fs.add_file("out/org/BAssert.java", "old b");
    fs.add_file("elsewhere/AAssert.java", "not ours");

    let previous = BTreeMap::from([
        (
            PathBuf::from("src/org/A.java"),
            vec![
                PathBuf::from("out/org/AAssert.java"),
                PathBuf::from("elsewhere/AAssert.java"),
            ],
        ),
        (
            PathBuf::from("src/org/B.java"),
            vec![PathBuf::from("out/org/BAssert.java")],
        ),
    ]);
    let plan = RegenerationPlan::Scoped([PathBuf::from("src/org/A.java")].into_iter().collect());

    let removed = prepare_output_dir(
        &fs,
        Path::new("out"),
        &plan,
        &previous,
        &[PathBuf::from("src/org/A.java")],
    )?;

    assert_eq!(removed, vec![PathBuf::from("out/org/AAssert.java")]);
    assert_eq!(fs.contents("out/org/BAssert.java").as_deref(), Some("old b"));
    assert!(fs.is_file(Path::new("elsewhere/AAssert.java")));
    Ok(())
}

#[test]
fn skip_plan_touches_nothing() -> TestResult {
    let fs = MockFileSystem::new();
    fs.add_file("out/org/AAssert.java", "old");
    let before = fs.file_paths();

    prepare_output_dir(
        &fs,
        Path::new("out"),
        &RegenerationPlan::Skip,
        &BTreeMap::new(),
        &[PathBuf::from("src/org/A.java")],
    )?;

    assert_eq!(fs.file_paths(), before);
    Ok(())
}

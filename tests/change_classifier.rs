use std::collections::BTreeSet;
use std::error::Error;
use std::path::{Path, PathBuf};

use assertgen::errors::AssertgenError;
use assertgen::incremental::{
    CandidateFile, ChangeKind, ChangeSet, ChangeSetClassifier, FileRecord, FullReason, Partition,
    RegenerationPlan, Snapshot,
};

type TestResult = Result<(), Box<dyn Error>>;

fn record(partition: Partition, hash: &str) -> FileRecord {
    FileRecord {
        partition,
        hash: hash.to_string(),
    }
}

fn snapshot(entries: &[(&str, Partition, &str)]) -> Snapshot {
    entries
        .iter()
        .map(|(path, partition, hash)| (PathBuf::from(path), record(*partition, hash)))
        .collect()
}

fn baseline() -> Snapshot {
    snapshot(&[
        ("libs/dep.jar", Partition::Classpath, "c1"),
        ("templates/assert.txt", Partition::Template, "t1"),
        ("src/A.java", Partition::Source, "a1"),
        ("src/B.java", Partition::Source, "b1"),
    ])
}

fn classify(previous: &Snapshot, current: &Snapshot) -> RegenerationPlan {
    let changes = ChangeSet::between(Some(previous), current);
    ChangeSetClassifier::new(true).classify(&changes)
}

#[test]
fn no_changes_is_skip() {
    assert_eq!(classify(&baseline(), &baseline()), RegenerationPlan::Skip);
}

#[test]
fn not_incremental_is_always_full() {
    let changes = ChangeSet::between(Some(&baseline()), &baseline());
    assert_eq!(
        ChangeSetClassifier::new(false).classify(&changes),
        RegenerationPlan::Full(FullReason::NotIncremental)
    );

    let first_run = ChangeSet::between(None, &baseline());
    assert!(first_run.iter().all(|f| f.change == ChangeKind::Added));
    assert!(ChangeSetClassifier::new(false).classify(&first_run).is_full());
}

#[test]
fn modified_source_is_scoped_to_that_file() {
    let mut current = baseline();
    current.insert(PathBuf::from("src/A.java"), record(Partition::Source, "a2"));
    current.insert(PathBuf::from("src/C.java"), record(Partition::Source, "c1"));

    let plan = classify(&baseline(), &current);
    let expected: BTreeSet<PathBuf> = [PathBuf::from("src/A.java"), PathBuf::from("src/C.java")]
        .into_iter()
        .collect();
    assert_eq!(plan, RegenerationPlan::Scoped(expected));
    assert!(plan.covers(Path::new("src/A.java")));
    assert!(!plan.covers(Path::new("src/B.java")));
}

#[test]
fn classpath_change_wins_over_source_changes() {
    let mut current = baseline();
    current.insert(PathBuf::from("src/A.java"), record(Partition::Source, "a2"));
    current.insert(PathBuf::from("libs/dep.jar"), record(Partition::Classpath, "c2"));

    assert_eq!(
        classify(&baseline(), &current),
        RegenerationPlan::Full(FullReason::ClasspathChanged(PathBuf::from("libs/dep.jar")))
    );
}

#[test]
fn removed_classpath_entry_is_full() {
    let mut current = baseline();
    current.remove(Path::new("libs/dep.jar"));
    assert!(matches!(
        classify(&baseline(), &current),
        RegenerationPlan::Full(FullReason::ClasspathChanged(_))
    ));
}

#[test]
fn template_change_is_full() {
    let mut current = baseline();
    current.insert(
        PathBuf::from("templates/assert.txt"),
        record(Partition::Template, "t2"),
    );
    assert_eq!(
        classify(&baseline(), &current),
        RegenerationPlan::Full(FullReason::TemplateChanged(PathBuf::from(
            "templates/assert.txt"
        )))
    );
}

#[test]
fn source_removal_is_full_even_with_other_edits() {
    let mut current = baseline();
    current.remove(Path::new("src/B.java"));
    current.insert(PathBuf::from("src/A.java"), record(Partition::Source, "a2"));

    assert_eq!(
        classify(&baseline(), &current),
        RegenerationPlan::Full(FullReason::SourceRemoved(PathBuf::from("src/B.java")))
    );
}

#[test]
fn partition_move_is_a_modification_in_the_new_partition() {
    let mut current = baseline();
    current.insert(PathBuf::from("src/B.java"), record(Partition::Classpath, "b1"));

    let changes = ChangeSet::between(Some(&baseline()), &current);
    let moved = changes.get(Path::new("src/B.java")).cloned();
    let mut expected = CandidateFile::new("src/B.java", Partition::Classpath, ChangeKind::Modified);
    expected.moved_from = Some(Partition::Source);
    assert_eq!(moved, Some(expected));
    assert_eq!(
        classify(&baseline(), &current),
        RegenerationPlan::Full(FullReason::ClasspathChanged(PathBuf::from("src/B.java")))
    );
}

#[test]
fn leaving_the_classpath_is_full_even_with_identical_content() {
    let previous = snapshot(&[
        ("lib/X.java", Partition::Classpath, "x1"),
        ("src/A.java", Partition::Source, "a1"),
    ]);
    let current = snapshot(&[
        ("lib/X.java", Partition::Source, "x1"),
        ("src/A.java", Partition::Source, "a1"),
    ]);

    let changes = ChangeSet::between(Some(&previous), &current);
    let moved = changes.get(Path::new("lib/X.java")).map(|f| (f.partition, f.moved_from));
    assert_eq!(moved, Some((Partition::Source, Some(Partition::Classpath))));
    assert_eq!(
        classify(&previous, &current),
        RegenerationPlan::Full(FullReason::ClasspathChanged(PathBuf::from("lib/X.java")))
    );
}

#[test]
fn leaving_the_templates_is_full() {
    let previous = snapshot(&[("templates/x.txt", Partition::Template, "t1")]);
    let current = snapshot(&[("templates/x.txt", Partition::Source, "t1")]);
    assert_eq!(
        classify(&previous, &current),
        RegenerationPlan::Full(FullReason::TemplateChanged(PathBuf::from("templates/x.txt")))
    );
}

#[test]
fn change_set_rejects_a_second_partition() -> TestResult {
    let mut changes = ChangeSet::new();
    changes.insert(CandidateFile::new("x.jar", Partition::Classpath, ChangeKind::Added))?;
    changes.insert(CandidateFile::new("x.jar", Partition::Classpath, ChangeKind::Modified))?;
    assert_eq!(changes.len(), 1);

    match changes.insert(CandidateFile::new("x.jar", Partition::Source, ChangeKind::Added)) {
        Err(AssertgenError::PartitionConflict {
            existing,
            requested,
            ..
        }) => {
            assert_eq!(existing, "classpath");
            assert_eq!(requested, "source");
        }
        other => panic!("expected PartitionConflict, got {:?}", other),
    }
    Ok(())
}

#[test]
fn hand_built_change_set_classifies_like_a_diff() -> TestResult {
    let mut changes = ChangeSet::new();
    changes.insert(CandidateFile::new("src/A.java", Partition::Source, ChangeKind::Added))?;
    changes.insert(CandidateFile::new("src/B.java", Partition::Source, ChangeKind::Unchanged))?;
    changes.insert(CandidateFile::new("libs/dep.jar", Partition::Classpath, ChangeKind::Unchanged))?;

    let plan = ChangeSetClassifier::new(true).classify(&changes);
    let expected: BTreeSet<PathBuf> = [PathBuf::from("src/A.java")].into_iter().collect();
    assert_eq!(plan, RegenerationPlan::Scoped(expected));
    Ok(())
}

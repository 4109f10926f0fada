#![cfg(unix)]

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use assertgen::cli::CliArgs;
use assertgen::errors::AssertgenError;
use assertgen::generate::command::{job_environment, parse_generated_paths};
use assertgen::generate::{AssertionGenerator, CommandGenerator, GenerationContext, GenerationJob};
use assertgen::incremental::STATE_FILE_PATH;
use assertgen::scan::ClassName;
use assertgen::templates::{LoadedTemplate, TemplateType};
use assertgen::types::EntryPointType;
use assertgen_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

fn context(root: &Path) -> GenerationContext {
    GenerationContext {
        output_dir: root.join("out"),
        working_dir: root.to_path_buf(),
        templates: vec![LoadedTemplate {
            kind: TemplateType::Object,
            content: "object template".to_string(),
        }],
    }
}

fn class_job(name: &str) -> GenerationJob {
    GenerationJob::Class {
        class: ClassName::new("org.example", name),
        source: PathBuf::from(format!("src/org/example/{name}.java")),
    }
}

fn lookup<'a>(env: &'a [(String, String)], key: &str) -> Option<&'a str> {
    env.iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

#[test]
fn environment_describes_the_job() {
    let ctx = context(Path::new("/project"));

    let env = job_environment(&ctx, &class_job("A"));
    assert_eq!(lookup(&env, "ASSERTGEN_MODE"), Some("class"));
    assert_eq!(lookup(&env, "ASSERTGEN_CLASS"), Some("org.example.A"));
    assert_eq!(lookup(&env, "ASSERTGEN_SOURCE"), Some("src/org/example/A.java"));
    assert_eq!(lookup(&env, "ASSERTGEN_OUTPUT_DIR"), Some("/project/out"));
    assert_eq!(
        lookup(&env, &TemplateType::Object.env_var()),
        Some("object template")
    );

    let entry = GenerationJob::EntryPoint {
        kind: EntryPointType::Soft,
        classes: vec![ClassName::new("a", "X"), ClassName::new("b", "Y")],
        class_package: Some("api".to_string()),
    };
    let env = job_environment(&ctx, &entry);
    assert_eq!(lookup(&env, "ASSERTGEN_MODE"), Some("entry_point"));
    assert_eq!(lookup(&env, "ASSERTGEN_ENTRY_POINT"), Some("soft"));
    assert_eq!(lookup(&env, "ASSERTGEN_CLASSES"), Some("a.X\nb.Y"));
    assert_eq!(lookup(&env, "ASSERTGEN_CLASS_PACKAGE"), Some("api"));
    assert_eq!(lookup(&env, "ASSERTGEN_CLASS"), None);
}

#[test]
fn reported_paths_resolve_against_output_dir() {
    let files = parse_generated_paths("a/AAssert.java\n\n  /abs/B.java  \n", Path::new("out"));
    assert_eq!(
        files,
        vec![PathBuf::from("out/a/AAssert.java"), PathBuf::from("/abs/B.java")]
    );
}

#[tokio::test]
async fn command_runs_in_working_dir_and_reports_files() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let ctx = context(dir.path());

    let mut generator = CommandGenerator::new(
        r#"mkdir -p out && echo "$ASSERTGEN_CLASS" > out/A.txt && echo A.txt"#,
    );
    let files = generator.generate(&ctx, class_job("A")).await?;

    assert_eq!(files, vec![dir.path().join("out/A.txt")]);
    assert_eq!(fs::read_to_string(&files[0])?, "org.example.A\n");
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_is_a_generator_failure() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let ctx = context(dir.path());

    let mut generator = CommandGenerator::new("echo boom >&2; exit 3");
    let err = match generator.generate(&ctx, class_job("A")).await {
        Ok(files) => panic!("expected failure, got {:?}", files),
        Err(err) => err,
    };

    match err.downcast_ref::<AssertgenError>() {
        Some(AssertgenError::GeneratorFailed { code, stderr }) => {
            assert_eq!(*code, 3);
            assert_eq!(stderr, "boom");
        }
        other => panic!("expected GeneratorFailed, got {:?}", other),
    }
    assert!(format!("{err:#}").contains("org.example.A"));
    Ok(())
}

#[tokio::test]
async fn cli_run_generates_then_skips() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let root = dir.path();

    fs::create_dir_all(root.join("src/org/example"))?;
    fs::write(
        root.join("src/org/example/Hello.java"),
        "package org.example;\n\npublic class Hello {}\n",
    )?;
    fs::write(
        root.join("Assertgen.toml"),
        r#"
[generator]
cmd = 'mkdir -p "$ASSERTGEN_OUTPUT_DIR" && f="$ASSERTGEN_OUTPUT_DIR/$(echo "$ASSERTGEN_CLASS" | tr . _)Assert.java" && echo "// $ASSERTGEN_CLASS" > "$f" && echo "$f"'
output_dir = "generated"

[sources]
roots = ["src"]

[entry_points]
types = []
"#,
    )?;

    let args = CliArgs {
        config: root.join("Assertgen.toml").to_string_lossy().into_owned(),
        rerun_all: false,
        log_level: None,
        dry_run: false,
    };

    assertgen::run(args.clone()).await?;
    let generated = root.join("generated/org_example_HelloAssert.java");
    assert_eq!(fs::read_to_string(&generated)?, "// org.example.Hello\n");
    assert!(root.join(STATE_FILE_PATH).is_file());

    // Unchanged inputs: nothing is rewritten.
    fs::write(&generated, "kept")?;
    assertgen::run(args).await?;
    assert_eq!(fs::read_to_string(&generated)?, "kept");
    Ok(())
}

use std::collections::BTreeSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use assertgen::fs::FileSystem;
use assertgen::generate::{AssertionGenerator, GenerationContext, GenerationJob};
use assertgen::scan::ClassName;

/// A fake generator that:
/// - records every job it receives
/// - writes one deterministic file per output into the given filesystem
/// - fails jobs for the configured subjects (qualified class names or entry
///   point class names such as `"Assertions"`)
pub struct FakeGenerator {
    fs: Arc<dyn FileSystem>,
    jobs: Arc<Mutex<Vec<GenerationJob>>>,
    failing: BTreeSet<String>,
}

impl FakeGenerator {
    pub fn new(fs: Arc<dyn FileSystem>, jobs: Arc<Mutex<Vec<GenerationJob>>>) -> Self {
        Self {
            fs,
            jobs,
            failing: BTreeSet::new(),
        }
    }

    pub fn failing_on(mut self, subject: &str) -> Self {
        self.failing.insert(subject.to_string());
        self
    }
}

/// Path the fake writes for a flat job on `class`.
pub fn assert_file(output_dir: &Path, class: &ClassName) -> PathBuf {
    package_dir(output_dir, class.package())
        .join(format!("{}Assert.java", class.type_name().replace('.', "_")))
}

/// Extra path the fake writes for a hierarchical job on `class`.
pub fn abstract_assert_file(output_dir: &Path, class: &ClassName) -> PathBuf {
    package_dir(output_dir, class.package())
        .join(format!("Abstract{}Assert.java", class.type_name().replace('.', "_")))
}

/// Path the fake writes for an entry point class.
pub fn entry_point_file(output_dir: &Path, package: Option<&str>, class_name: &str) -> PathBuf {
    package_dir(output_dir, package.unwrap_or_default()).join(format!("{class_name}.java"))
}

fn package_dir(output_dir: &Path, package: &str) -> PathBuf {
    package
        .split('.')
        .filter(|s| !s.is_empty())
        .fold(output_dir.to_path_buf(), |dir, seg| dir.join(seg))
}

fn subject_of(job: &GenerationJob) -> String {
    match job {
        GenerationJob::Class { class, .. } | GenerationJob::Hierarchical { class, .. } => {
            class.qualified().to_string()
        }
        GenerationJob::EntryPoint { kind, .. } => kind.class_name().to_string(),
    }
}

impl AssertionGenerator for FakeGenerator {
    fn generate<'a>(
        &'a mut self,
        ctx: &'a GenerationContext,
        job: GenerationJob,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PathBuf>>> + Send + 'a>> {
        Box::pin(async move {
            self.jobs.lock().unwrap().push(job.clone());

            let subject = subject_of(&job);
            if self.failing.contains(&subject) {
                return Err(anyhow!("fake generator failure for {subject}"));
            }

            let files = match &job {
                GenerationJob::Class { class, .. } => vec![assert_file(&ctx.output_dir, class)],
                GenerationJob::Hierarchical { class, .. } => vec![
                    abstract_assert_file(&ctx.output_dir, class),
                    assert_file(&ctx.output_dir, class),
                ],
                GenerationJob::EntryPoint {
                    kind,
                    class_package,
                    ..
                } => vec![entry_point_file(
                    &ctx.output_dir,
                    class_package.as_deref(),
                    kind.class_name(),
                )],
            };

            for file in &files {
                self.fs.write(file, format!("// {subject}\n").as_bytes())?;
            }
            Ok(files)
        })
    }
}

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use assertgen::config::ConfigFile;
use assertgen::engine::{Engine, EngineOptions};
use assertgen::fs::mock::MockFileSystem;
use assertgen::fs::FileSystem;
use assertgen::generate::GenerationJob;
use assertgen::incremental::FileStateStore;
use assertgen_test_utils::builders::java_class;
use assertgen_test_utils::fake_generator::FakeGenerator;

pub use assertgen_test_utils::init_tracing;

/// An in-memory project: sources, outputs and state all live in one
/// `MockFileSystem`, so consecutive engines see each other's effects.
pub struct Project {
    pub fs: MockFileSystem,
    pub jobs: Arc<Mutex<Vec<GenerationJob>>>,
}

impl Project {
    pub fn new() -> Self {
        init_tracing();
        Self {
            fs: MockFileSystem::new(),
            jobs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Write `src/<package path>/<name>.java` declaring `class <name>`.
    pub fn add_class(&self, package: &str, name: &str) -> PathBuf {
        let path = source_path(package, name);
        self.fs.add_file(&path, java_class(package, name));
        path
    }

    pub fn shared_fs(&self) -> Arc<dyn FileSystem> {
        Arc::new(self.fs.clone())
    }

    pub fn generator(&self) -> FakeGenerator {
        FakeGenerator::new(self.shared_fs(), Arc::clone(&self.jobs))
    }

    pub fn engine(&self, config: ConfigFile) -> Engine {
        self.engine_with(config, self.generator(), EngineOptions::default())
    }

    pub fn engine_with(
        &self,
        config: ConfigFile,
        generator: FakeGenerator,
        options: EngineOptions,
    ) -> Engine {
        let state = FileStateStore::new(self.shared_fs(), PathBuf::new());
        Engine::new(
            config,
            PathBuf::new(),
            self.shared_fs(),
            Box::new(state),
            Box::new(generator),
        )
        .with_options(options)
    }

    /// Jobs received since the last call.
    pub fn take_jobs(&self) -> Vec<GenerationJob> {
        std::mem::take(&mut *self.jobs.lock().unwrap())
    }

    /// Qualified class names of the per-class jobs since the last call.
    pub fn take_generated_classes(&self) -> Vec<String> {
        self.take_jobs()
            .iter()
            .filter_map(|job| job.class().map(|c| c.qualified().to_string()))
            .collect()
    }
}

pub fn source_path(package: &str, name: &str) -> PathBuf {
    let mut path = PathBuf::from("src");
    for segment in package.split('.').filter(|s| !s.is_empty()) {
        path.push(segment);
    }
    path.push(format!("{name}.java"));
    path
}

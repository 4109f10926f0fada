// src/generate/command.rs

use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::errors::AssertgenError;
use crate::generate::backend::{AssertionGenerator, GenerationContext, GenerationJob};

/// Generator that runs a shell command once per job.
///
/// The job is described through `ASSERTGEN_*` environment variables; the
/// command prints one generated file path per stdout line.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    cmd: String,
}

impl CommandGenerator {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

impl AssertionGenerator for CommandGenerator {
    fn generate<'a>(
        &'a mut self,
        ctx: &'a GenerationContext,
        job: GenerationJob,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<PathBuf>>> + Send + 'a>> {
        Box::pin(async move { run_job(&self.cmd, ctx, &job).await })
    }
}

/// Environment describing `job` to the generator command.
pub fn job_environment(ctx: &GenerationContext, job: &GenerationJob) -> Vec<(String, String)> {
    let mut env = vec![
        ("ASSERTGEN_MODE".to_string(), job.mode().to_string()),
        (
            "ASSERTGEN_OUTPUT_DIR".to_string(),
            ctx.output_dir.to_string_lossy().into_owned(),
        ),
    ];

    match job {
        GenerationJob::Class { class, source } => {
            env.push(("ASSERTGEN_CLASS".into(), class.qualified().to_string()));
            env.push(("ASSERTGEN_SOURCE".into(), source.to_string_lossy().into_owned()));
        }
        GenerationJob::Hierarchical {
            class,
            source,
            siblings,
        } => {
            env.push(("ASSERTGEN_CLASS".into(), class.qualified().to_string()));
            env.push(("ASSERTGEN_SOURCE".into(), source.to_string_lossy().into_owned()));
            env.push(("ASSERTGEN_CLASSES".into(), join_names(siblings)));
        }
        GenerationJob::EntryPoint {
            kind,
            classes,
            class_package,
        } => {
            env.push(("ASSERTGEN_ENTRY_POINT".into(), kind.as_str().to_string()));
            env.push(("ASSERTGEN_CLASSES".into(), join_names(classes)));
            if let Some(package) = class_package {
                env.push(("ASSERTGEN_CLASS_PACKAGE".into(), package.clone()));
            }
        }
    }

    for template in &ctx.templates {
        env.push((template.kind.env_var(), template.content.clone()));
    }

    env
}

fn join_names(names: &[crate::scan::ClassName]) -> String {
    names
        .iter()
        .map(|n| n.qualified())
        .collect::<Vec<_>>()
        .join("\n")
}

async fn run_job(cmd_line: &str, ctx: &GenerationContext, job: &GenerationJob) -> Result<Vec<PathBuf>> {
    info!(job = %job, cmd = %cmd_line, "starting generator process");

    // Build a shell command appropriate for the platform.
    let mut cmd = if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd_line);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd_line);
        c
    };

    if !ctx.working_dir.as_os_str().is_empty() {
        cmd.current_dir(&ctx.working_dir);
    }
    cmd.envs(job_environment(ctx, job))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let output = cmd
        .output()
        .await
        .with_context(|| format!("running generator for {job}"))?;

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    for line in stderr.lines() {
        debug!(job = %job, "stderr: {}", line);
    }

    let code = output.status.code().unwrap_or(-1);
    info!(
        job = %job,
        exit_code = code,
        success = output.status.success(),
        "generator process exited"
    );

    if !output.status.success() {
        return Err(AssertgenError::GeneratorFailed { code, stderr })
            .with_context(|| format!("generating {job}"));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let files = parse_generated_paths(&stdout, &ctx.output_dir);
    if files.is_empty() {
        warn!(job = %job, "generator reported no files");
    }
    Ok(files)
}

/// One path per non-empty line; relative paths resolve against `output_dir`.
pub fn parse_generated_paths(stdout: &str, output_dir: &Path) -> Vec<PathBuf> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let path = PathBuf::from(line);
            if path.is_absolute() {
                path
            } else {
                output_dir.join(path)
            }
        })
        .collect()
}

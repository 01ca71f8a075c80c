//! Project-level transpilation
//!
//! Discovers `.godsl` sources under a root directory, maps each one to a
//! `.go` file under the build directory and transpiles them on a bounded
//! set of worker threads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::thread;

use crate::errors::{GodslError, GodslResult};
use crate::transpile_file;

/// Extension of source files
pub const SOURCE_EXTENSION: &str = "godsl";
/// Extension of generated files
pub const TARGET_EXTENSION: &str = "go";
/// Default output directory, relative to the project root. Directories with
/// this name are never searched for sources.
pub const BUILD_DIR: &str = "build";
/// Default number of files transpiled at once
pub const DEFAULT_JOBS: usize = 8;

/// Settings for [`generate`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateOptions {
    pub root: PathBuf,
    pub out_dir: PathBuf,
    pub jobs: usize,
}

impl GenerateOptions {
    /// Options for a project root, writing to `<root>/build`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            out_dir: root.join(BUILD_DIR),
            root,
            jobs: DEFAULT_JOBS,
        }
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// At least one job always runs
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self::new(".")
    }
}

/// One source file and where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Outcome of one [`FileTask`]
#[derive(Debug)]
pub struct TaskReport {
    pub task: FileTask,
    pub result: GodslResult<()>,
}

impl TaskReport {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Find every source file under `root`, in sorted path order
pub fn collect_sources(root: &Path, build_dir: &Path) -> GodslResult<Vec<FileTask>> {
    if !root.is_dir() {
        return Err(GodslError::MissingRoot(root.to_path_buf()));
    }

    let skip = fs::canonicalize(build_dir).ok();
    let mut tasks = Vec::new();
    walk(root, root, build_dir, skip.as_deref(), &mut tasks)?;
    Ok(tasks)
}

fn walk(
    root: &Path,
    dir: &Path,
    build_dir: &Path,
    skip: Option<&Path>,
    tasks: &mut Vec<FileTask>,
) -> GodslResult<()> {
    let read_error = |source| GodslError::Read {
        path: dir.to_path_buf(),
        source,
    };
    let mut entries = fs::read_dir(dir)
        .map_err(read_error)?
        .collect::<Result<Vec<_>, _>>()
        .map_err(read_error)?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            let is_build_dir = entry.file_name() == BUILD_DIR
                || (skip.is_some() && fs::canonicalize(&path).ok().as_deref() == skip);
            if !is_build_dir {
                walk(root, &path, build_dir, skip, tasks)?;
            }
        } else if path
            .extension()
            .is_some_and(|ext| ext == SOURCE_EXTENSION)
        {
            let relative = path.strip_prefix(root).unwrap_or(&path);
            let target = build_dir.join(relative).with_extension(TARGET_EXTENSION);
            tasks.push(FileTask {
                source: path,
                target,
            });
        }
    }

    Ok(())
}

/// Read, transpile and write a single file
pub fn transpile_task(task: &FileTask) -> GodslResult<()> {
    let source = fs::read_to_string(&task.source).map_err(|source| GodslError::Read {
        path: task.source.clone(),
        source,
    })?;

    let output = transpile_file(&source).map_err(|err| err.in_file(&task.source))?;

    if let Some(parent) = task.target.parent() {
        fs::create_dir_all(parent).map_err(|source| GodslError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(&task.target, output).map_err(|source| GodslError::Write {
        path: task.target.clone(),
        source,
    })
}

/// Run every task on at most `jobs` threads. Reports come back in task order.
pub fn transpile_all(tasks: &[FileTask], jobs: usize) -> Vec<TaskReport> {
    let workers = jobs.clamp(1, tasks.len().max(1));
    let next = AtomicUsize::new(0);
    let (sender, receiver) = mpsc::channel();

    thread::scope(|scope| {
        for _ in 0..workers {
            let sender = sender.clone();
            let next = &next;
            scope.spawn(move || {
                loop {
                    let index = next.fetch_add(1, Ordering::Relaxed);
                    let Some(task) = tasks.get(index) else {
                        break;
                    };
                    if sender.send((index, transpile_task(task))).is_err() {
                        break;
                    }
                }
            });
        }
    });
    drop(sender);

    let mut results: Vec<(usize, GodslResult<()>)> = receiver.into_iter().collect();
    results.sort_by_key(|(index, _)| *index);

    tasks
        .iter()
        .cloned()
        .zip(results)
        .map(|(task, (_, result))| TaskReport { task, result })
        .collect()
}

/// Remove a build directory; a missing directory is not an error
pub fn clean_build_dir(path: &Path) -> GodslResult<()> {
    if !path.exists() {
        return Ok(());
    }
    fs::remove_dir_all(path).map_err(|source| GodslError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Transpile a whole project. If any file fails the build directory is removed,
/// so a failed run never leaves partial output behind.
pub fn generate(options: &GenerateOptions) -> GodslResult<Vec<TaskReport>> {
    let tasks = collect_sources(&options.root, &options.out_dir)?;
    let reports = transpile_all(&tasks, options.jobs);

    if reports.iter().any(|report| !report.is_ok()) {
        clean_build_dir(&options.out_dir)?;
    }

    Ok(reports)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_project(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("godsl-{}-{}", name, std::process::id()));
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write(path: &Path, contents: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_collect_sources_maps_targets_and_skips_build() {
        let root = temp_project("collect");
        write(&root.join("main.godsl"), "package main");
        write(&root.join("pkg/util.godsl"), "package pkg");
        write(&root.join("notes.txt"), "ignored");
        write(&root.join("build/old.godsl"), "package old");
        write(&root.join("vendor/build/skip.godsl"), "package skip");

        let build = root.join(BUILD_DIR);
        let tasks = collect_sources(&root, &build).unwrap();

        assert_eq!(
            tasks,
            vec![
                FileTask {
                    source: root.join("main.godsl"),
                    target: build.join("main.go"),
                },
                FileTask {
                    source: root.join("pkg").join("util.godsl"),
                    target: build.join("pkg").join("util.go"),
                },
            ]
        );

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_collect_sources_skips_custom_out_dir() {
        let root = temp_project("custom-out");
        write(&root.join("a.godsl"), "package a");
        write(&root.join("out/stale.godsl"), "package stale");

        let tasks = collect_sources(&root, &root.join("out")).unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].target, root.join("out").join("a.go"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_missing_root() {
        let root = std::env::temp_dir().join("godsl-definitely-missing-root");
        let err = collect_sources(&root, &root.join(BUILD_DIR)).unwrap_err();
        assert!(matches!(err, GodslError::MissingRoot(_)));
    }

    #[test]
    fn test_transpile_all_preserves_order_and_reports_failures() {
        let root = temp_project("transpile-all");
        write(&root.join("a.godsl"), "package a\n\nfunc f() {\n\tthrow \"x\"\n}");
        write(&root.join("b.godsl"), "func f( { }");
        write(&root.join("c.godsl"), "package c");

        let tasks = collect_sources(&root, &root.join(BUILD_DIR)).unwrap();
        let reports = transpile_all(&tasks, 2);

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].task.source, root.join("a.godsl"));
        assert!(reports[0].is_ok());
        assert!(!reports[1].is_ok());
        assert!(reports[2].is_ok());

        let err = reports[1].result.as_ref().unwrap_err();
        assert!(!err.parse_errors().is_empty());
        assert!(err.to_string().contains("Parser errors:"));

        let generated = fs::read_to_string(root.join("build/a.go")).unwrap();
        assert!(generated.contains("func f() error {"));

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_generate_cleans_up_on_failure() {
        let root = temp_project("generate-fail");
        write(&root.join("good.godsl"), "package good");
        write(&root.join("bad.godsl"), "x := )");

        let options = GenerateOptions::new(&root).with_jobs(4);
        let reports = generate(&options).unwrap();

        assert_eq!(reports.iter().filter(|r| !r.is_ok()).count(), 1);
        assert!(!options.out_dir.exists());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_generate_writes_mirrored_tree() {
        let root = temp_project("generate-ok");
        write(&root.join("cmd/app/main.godsl"), "package main\n\nfunc main() {\n}");

        let out = root.join("dist");
        let options = GenerateOptions::new(&root).with_out_dir(&out).with_jobs(0);
        assert_eq!(options.jobs, 1);

        let reports = generate(&options).unwrap();
        assert!(reports.iter().all(TaskReport::is_ok));
        assert!(out.join("cmd/app/main.go").is_file());

        fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_clean_missing_dir_is_ok() {
        let path = std::env::temp_dir().join("godsl-never-created-build");
        assert!(clean_build_dir(&path).is_ok());
    }

    #[test]
    fn test_default_options() {
        let options = GenerateOptions::default();
        assert_eq!(options.root, PathBuf::from("."));
        assert_eq!(options.out_dir, PathBuf::from(".").join(BUILD_DIR));
        assert_eq!(options.jobs, DEFAULT_JOBS);
    }
}

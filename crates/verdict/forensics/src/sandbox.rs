//! Isolated, read-only working copy of the audited repository.

use crate::error::ExtractionError;
use crate::process::{excerpt, ProcessRunner};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{info, instrument};

/// Name of the checkout inside the sandbox's temporary directory.
const CHECKOUT: &str = "repo";

/// A repository materialised inside its own temporary directory.
///
/// The directory is removed when the sandbox is dropped, on success and on
/// every error path alike.
#[derive(Debug)]
pub struct RepoSandbox {
    dir: TempDir,
    root: PathBuf,
    locator: String,
}

impl RepoSandbox {
    /// `git clone -- <locator> <tmp>/repo`. Full history is fetched: the
    /// commit-log protocol needs every commit.
    #[instrument(skip(runner))]
    pub async fn clone_from(locator: &str, runner: &ProcessRunner) -> Result<Self, ExtractionError> {
        Self::clone_within(locator, runner, None).await
    }

    pub(crate) async fn clone_within(
        locator: &str,
        runner: &ProcessRunner,
        parent: Option<&Path>,
    ) -> Result<Self, ExtractionError> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(ExtractionError::SourceUnavailable(
                "empty repository locator".into(),
            ));
        }

        let dir = new_temp_dir(parent)?;
        let root = dir.path().join(CHECKOUT);
        let target = root.to_string_lossy().into_owned();

        let output = runner
            .run("git", &["clone", "--quiet", "--", locator, &target], None)
            .await?;
        if !output.success() {
            return Err(ExtractionError::CloneFailed {
                locator: locator.to_string(),
                stderr: excerpt(&output.stderr, 400),
            });
        }

        info!(locator, path = %root.display(), "repository cloned");
        Ok(Self {
            dir,
            root,
            locator: locator.to_string(),
        })
    }

    /// Copy a plain directory (no version control) into a sandbox. `.git`
    /// directories are skipped.
    pub fn copy_from(source: &Path) -> Result<Self, ExtractionError> {
        if !source.is_dir() {
            return Err(ExtractionError::SourceUnavailable(format!(
                "{} is not a directory",
                source.display()
            )));
        }
        let dir = new_temp_dir(None)?;
        let root = dir.path().join(CHECKOUT);
        copy_tree(source, &root)?;
        Ok(Self {
            dir,
            root,
            locator: source.display().to_string(),
        })
    }

    /// Root of the checkout.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// The temporary directory that owns the checkout.
    pub fn temp_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Read a repository-relative file. `Ok(None)` when it does not exist.
    pub fn read_source(&self, relative: &str) -> Result<Option<String>, ExtractionError> {
        let path = self.root.join(relative);
        if !path.is_file() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| ExtractionError::io(relative, e))
    }

    /// Repository-relative paths of the files directly inside `relative_dir`
    /// with the given extension, sorted.
    pub fn list_files(&self, relative_dir: &str, extension: &str) -> Result<Vec<String>, ExtractionError> {
        let dir = self.root.join(relative_dir);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&dir).map_err(|e| ExtractionError::io(relative_dir, e))? {
            let entry = entry.map_err(|e| ExtractionError::io(relative_dir, e))?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
                let name = entry.file_name().to_string_lossy().into_owned();
                files.push(format!("{}/{name}", relative_dir.trim_end_matches('/')));
            }
        }
        files.sort();
        Ok(files)
    }

    pub fn has_dir(&self, relative: &str) -> bool {
        self.root.join(relative).is_dir()
    }

    /// Every file in the checkout as a `/`-separated relative path, `.git`
    /// excluded.
    pub fn file_tree(&self) -> Result<BTreeSet<String>, ExtractionError> {
        let mut files = BTreeSet::new();
        walk(&self.root, &self.root, &mut files)?;
        Ok(files)
    }
}

fn new_temp_dir(parent: Option<&Path>) -> Result<TempDir, ExtractionError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("verdict-");
    match parent {
        Some(parent) => builder.tempdir_in(parent),
        None => builder.tempdir(),
    }
    .map_err(|e| ExtractionError::io("temporary directory", e))
}

fn walk(root: &Path, dir: &Path, out: &mut BTreeSet<String>) -> Result<(), ExtractionError> {
    let entries = fs::read_dir(dir).map_err(|e| ExtractionError::io(dir.display(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| ExtractionError::io(dir.display(), e))?;
        let path = entry.path();
        if entry.file_name() == ".git" {
            continue;
        }
        let file_type = entry
            .file_type()
            .map_err(|e| ExtractionError::io(path.display(), e))?;
        if file_type.is_dir() {
            walk(root, &path, out)?;
        } else if file_type.is_file() {
            if let Ok(relative) = path.strip_prefix(root) {
                let parts: Vec<_> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                out.insert(parts.join("/"));
            }
        }
    }
    Ok(())
}

fn copy_tree(from: &Path, to: &Path) -> Result<(), ExtractionError> {
    fs::create_dir_all(to).map_err(|e| ExtractionError::io(to.display(), e))?;
    for entry in fs::read_dir(from).map_err(|e| ExtractionError::io(from.display(), e))? {
        let entry = entry.map_err(|e| ExtractionError::io(from.display(), e))?;
        if entry.file_name() == ".git" {
            continue;
        }
        let source = entry.path();
        let target = to.join(entry.file_name());
        let file_type = entry
            .file_type()
            .map_err(|e| ExtractionError::io(source.display(), e))?;
        if file_type.is_dir() {
            copy_tree(&source, &target)?;
        } else if file_type.is_file() {
            fs::copy(&source, &target).map_err(|e| ExtractionError::io(source.display(), e))?;
        }
    }
    Ok(())
}

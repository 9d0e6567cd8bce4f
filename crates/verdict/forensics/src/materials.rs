//! Evidence sources materialised once per audit and shared read-only by
//! every extractor.

use crate::error::ExtractionError;
use crate::process::ProcessRunner;
use crate::sandbox::RepoSandbox;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

pub struct Materials {
    repo: Result<RepoSandbox, ExtractionError>,
    document: Option<PathBuf>,
    images: Option<PathBuf>,
}

impl Materials {
    pub fn new(
        repo: Result<RepoSandbox, ExtractionError>,
        document: Option<PathBuf>,
        images: Option<PathBuf>,
    ) -> Self {
        Self {
            repo,
            document,
            images,
        }
    }

    /// Clone (or, for a plain local directory, copy) the repository into a
    /// sandbox. A failure is kept, not raised: extractors that need the
    /// repository report it as their own error.
    pub async fn materialise(
        locator: &str,
        document: Option<PathBuf>,
        images: Option<PathBuf>,
        runner: &ProcessRunner,
    ) -> Self {
        let local = Path::new(locator);
        let repo = if local.is_dir() && !local.join(".git").exists() {
            RepoSandbox::copy_from(local)
        } else {
            RepoSandbox::clone_from(locator, runner).await
        };
        match &repo {
            Ok(sandbox) => info!(locator, path = %sandbox.path().display(), "repository materialised"),
            Err(err) => warn!(locator, error = %err, "repository unavailable"),
        }
        Self::new(repo, document, images)
    }

    pub fn repo(&self) -> Result<&RepoSandbox, ExtractionError> {
        self.repo.as_ref().map_err(|e| e.clone())
    }

    pub fn document(&self) -> Option<&Path> {
        self.document.as_deref()
    }

    pub fn images(&self) -> Option<&Path> {
        self.images.as_deref()
    }
}

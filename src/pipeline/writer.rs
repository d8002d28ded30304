use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;

use crate::error::{GenError, Result};
use crate::generate::RenderedArtifacts;
use crate::generate::context::ArtifactKind;
use crate::generate::target::GenerationTarget;

// ============================================================================
// Output layout
// ============================================================================

/// Where the three artifacts go, relative to an output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    pub root: PathBuf,
    pub pages_dir: String,
    pub features_dir: String,
    pub steps_dir: String,
}

impl Default for OutputLayout {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            pages_dir: "src/test/java/pages".to_string(),
            features_dir: "src/test/resources/features".to_string(),
            steps_dir: "src/test/java/steps".to_string(),
        }
    }
}

impl OutputLayout {
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    pub fn resolve(&self, target: &GenerationTarget) -> ArtifactPaths {
        ArtifactPaths {
            page_module: self
                .root
                .join(&self.pages_dir)
                .join(format!("{}.java", target.page_class())),
            specification: self
                .root
                .join(&self.features_dir)
                .join(format!("{}.feature", target.feature_file_stem())),
            glue: self
                .root
                .join(&self.steps_dir)
                .join(format!("{}.java", target.glue_class())),
        }
    }
}

/// Final file path of each artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub page_module: PathBuf,
    pub specification: PathBuf,
    pub glue: PathBuf,
}

impl ArtifactPaths {
    /// Write order: page module, specification, glue.
    pub fn entries(&self) -> [(ArtifactKind, &Path); 3] {
        [
            (ArtifactKind::PageModule, self.page_module.as_path()),
            (ArtifactKind::Specification, self.specification.as_path()),
            (ArtifactKind::Glue, self.glue.as_path()),
        ]
    }
}

// ============================================================================
// Writing
// ============================================================================

/// One artifact that reached disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WrittenArtifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
    pub bytes: usize,

    /// SHA-1 of the written text
    pub fingerprint: String,
}

/// Stable hex SHA-1 of a piece of text.
pub fn text_fingerprint(text: &str) -> String {
    use sha1::{Digest, Sha1};

    let mut hasher = Sha1::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Write one file through a sibling temp file and a rename, so a reader
/// never sees a half-written artifact.
fn write_one(path: &Path, content: &str) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, path)) {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Write all three artifacts, in order.
///
/// On the first failure the artifacts already written by this call are
/// removed again and the error names the artifact that failed. Callers must
/// treat any error as "no usable output".
pub fn write_artifacts(
    paths: &ArtifactPaths,
    rendered: &RenderedArtifacts,
) -> Result<Vec<WrittenArtifact>> {
    let contents = [
        rendered.page_module.as_str(),
        rendered.specification.as_str(),
        rendered.glue.as_str(),
    ];

    let mut written: Vec<WrittenArtifact> = Vec::with_capacity(3);
    for ((kind, path), content) in paths.entries().into_iter().zip(contents) {
        if let Err(source) = write_one(path, content) {
            rollback(&written);
            return Err(GenError::Write {
                artifact: kind,
                path: path.display().to_string(),
                source,
            });
        }

        debug!("wrote {} to {}", kind, path.display());
        written.push(WrittenArtifact {
            kind,
            path: path.to_path_buf(),
            bytes: content.len(),
            fingerprint: text_fingerprint(content),
        });
    }

    Ok(written)
}

fn rollback(written: &[WrittenArtifact]) {
    for artifact in written {
        match fs::remove_file(&artifact.path) {
            Ok(()) => warn!("removed partially generated {} at {}", artifact.kind, artifact.path.display()),
            Err(e) => warn!(
                "could not remove partially generated {} at {}: {}",
                artifact.kind,
                artifact.path.display(),
                e
            ),
        }
    }
}

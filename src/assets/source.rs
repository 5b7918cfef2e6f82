use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::foundation::error::{ReelError, ReelResult};

/// Build the resource identifier of frame `index` of a sequence.
///
/// `<base><index:03>_delay-0.04s.<format>`
pub fn frame_url(base: &str, index: usize, format: &str) -> String {
    format!("{base}{index:03}_delay-0.04s.{format}")
}

/// Fetches the encoded bytes of a frame resource.
///
/// Implementations are called concurrently from loader worker threads.
pub trait FrameSource: Send + Sync {
    fn fetch(&self, url: &str) -> ReelResult<Vec<u8>>;
}

/// Resolves frame identifiers as relative paths under a filesystem root.
#[derive(Clone, Debug)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Filesystem path a frame identifier resolves to.
    pub fn resolve(&self, url: &str) -> ReelResult<PathBuf> {
        let norm = normalize_rel_path(url)?;
        Ok(self.root.join(Path::new(&norm)))
    }
}

impl FrameSource for DirSource {
    fn fetch(&self, url: &str) -> ReelResult<Vec<u8>> {
        let path = self.resolve(url)?;
        std::fs::read(&path)
            .with_context(|| format!("read frame bytes from '{}'", path.display()))
            .map_err(ReelError::from)
    }
}

/// Normalize a relative resource path to forward slashes, rejecting escapes from the root.
pub fn normalize_rel_path(source: &str) -> ReelResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(ReelError::validation("frame paths must be relative"));
    }
    if s.is_empty() {
        return Err(ReelError::validation("frame path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(ReelError::validation("frame paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(ReelError::validation(
            "frame path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/source.rs"]
mod tests;

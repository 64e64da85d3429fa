use std::path::PathBuf;
use std::sync::mpsc;

use super::ExportFormat;
use crate::error::SceneError;

/// One exported file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// File name including extension.
    pub filename: String,
    /// Encoding of `bytes`.
    pub format: ExportFormat,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Where exported artifacts go: a download prompt, a directory, memory.
pub trait ExportSink {
    /// Take ownership of one artifact.
    fn deliver(&mut self, artifact: Artifact) -> Result<(), SceneError>;
}

/// Writes artifacts into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    /// Sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ExportSink for DirectorySink {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), SceneError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(&artifact.filename);
        std::fs::write(&path, &artifact.bytes)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}

/// Keeps artifacts in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    artifacts: Vec<Artifact>,
}

impl MemorySink {
    /// Artifacts received so far, oldest first.
    #[must_use]
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Remove and return everything received.
    pub fn take(&mut self) -> Vec<Artifact> {
        std::mem::take(&mut self.artifacts)
    }
}

impl ExportSink for MemorySink {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), SceneError> {
        self.artifacts.push(artifact);
        Ok(())
    }
}

/// Forwards artifacts to a channel, e.g. a host thread that offers them
/// as downloads.
impl ExportSink for mpsc::Sender<Artifact> {
    fn deliver(&mut self, artifact: Artifact) -> Result<(), SceneError> {
        self.send(artifact).map_err(|_| {
            SceneError::Io(std::io::Error::other("export receiver dropped"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_sink_writes_file() {
        let dir = std::env::temp_dir()
            .join(format!("crystal-scene-sink-{}", std::process::id()));
        let mut sink = DirectorySink::new(&dir);
        sink.deliver(Artifact {
            filename: "scene.json".to_owned(),
            format: ExportFormat::Json,
            bytes: b"{}".to_vec(),
        })
        .unwrap();
        assert_eq!(std::fs::read(dir.join("scene.json")).unwrap(), b"{}");
        std::fs::remove_dir_all(&dir).unwrap();
    }
}

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::image_pipeline::common::error::{PipelineError, Result};

/// Output file that only appears under its final name once committed.
///
/// Data goes to `<name>.partial` next to the target; dropping without
/// [`PendingOutput::commit`] removes the partial file.
pub struct PendingOutput {
    target: PathBuf,
    partial: PathBuf,
    writer: Option<BufWriter<File>>,
    committed: bool,
}

fn write_error(path: &Path, e: impl std::fmt::Display) -> PipelineError {
    PipelineError::OutputWriteError(format!("{}: {}", path.display(), e))
}

impl PendingOutput {
    pub fn create(target: impl AsRef<Path>) -> Result<Self> {
        let target = target.as_ref().to_path_buf();
        let mut name: OsString = target
            .file_name()
            .ok_or_else(|| write_error(&target, "not a file path"))?
            .to_os_string();
        name.push(".partial");
        let partial = target.with_file_name(name);

        let file = File::create(&partial).map_err(|e| write_error(&partial, e))?;
        debug!(partial = %partial.display(), "Opened pending output");
        Ok(Self {
            target,
            partial,
            writer: Some(BufWriter::new(file)),
            committed: false,
        })
    }

    pub fn writer(&mut self) -> Result<&mut dyn Write> {
        match self.writer.as_mut() {
            Some(writer) => Ok(writer as &mut dyn Write),
            None => Err(write_error(&self.partial, "output already closed")),
        }
    }

    /// Flushes and syncs the partial file; the output stays pending.
    pub fn finish(&mut self) -> Result<()> {
        if let Some(writer) = self.writer.take() {
            let file = writer
                .into_inner()
                .map_err(|e| write_error(&self.partial, e.error()))?;
            file.sync_all().map_err(|e| write_error(&self.partial, e))?;
        }
        Ok(())
    }

    fn rename_into_place(&mut self) -> Result<()> {
        fs::rename(&self.partial, &self.target).map_err(|e| write_error(&self.target, e))?;
        self.committed = true;
        debug!(output = %self.target.display(), "Committed output");
        Ok(())
    }

    /// Flushes and moves the partial file to the target path.
    pub fn commit(self) -> Result<()> {
        Self::commit_all([self])
    }

    /// Commits every output or none of them. All files are flushed before
    /// the first rename; if a rename fails, targets already moved into place
    /// are removed again.
    pub fn commit_all(outputs: impl IntoIterator<Item = PendingOutput>) -> Result<()> {
        let mut outputs: Vec<PendingOutput> = outputs.into_iter().collect();
        for output in &mut outputs {
            output.finish()?;
        }

        for i in 0..outputs.len() {
            if let Err(e) = outputs[i].rename_into_place() {
                for done in &outputs[..i] {
                    if let Err(remove) = fs::remove_file(&done.target) {
                        warn!(
                            "Failed to roll back output {}: {}",
                            done.target.display(),
                            remove
                        );
                    }
                }
                return Err(e);
            }
        }
        Ok(())
    }
}

impl Drop for PendingOutput {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        drop(self.writer.take());
        match fs::remove_file(&self.partial) {
            Err(e) if e.kind() != ErrorKind::NotFound => {
                warn!("Failed to remove partial output {}: {}", self.partial.display(), e);
            }
            _ => debug!(partial = %self.partial.display(), "Discarded partial output"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_moves_partial_into_place() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("bayer.ppm");

        let mut output = PendingOutput::create(&target).unwrap();
        output.writer().unwrap().write_all(b"P2\n").unwrap();
        assert!(!target.exists());
        assert!(dir.path().join("bayer.ppm.partial").exists());

        output.commit().unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"P2\n");
        assert!(!dir.path().join("bayer.ppm.partial").exists());
    }

    #[test]
    fn test_drop_discards_partial() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("demosaic.ppm");
        {
            let mut output = PendingOutput::create(&target).unwrap();
            output.writer().unwrap().write_all(b"P3\n").unwrap();
        }
        assert!(!target.exists());
        assert!(!dir.path().join("demosaic.ppm.partial").exists());
    }

    #[test]
    fn test_commit_all_rolls_back_on_failed_rename() {
        let dir = tempfile::tempdir().unwrap();
        let mosaic = dir.path().join("bayer.ppm");
        // A non-empty directory cannot be replaced by a file
        let blocked = dir.path().join("demosaic.ppm");
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), b"x").unwrap();

        let mut first = PendingOutput::create(&mosaic).unwrap();
        first.writer().unwrap().write_all(b"P2\n").unwrap();
        let mut second = PendingOutput::create(&blocked).unwrap();
        second.writer().unwrap().write_all(b"P3\n").unwrap();

        let result = PendingOutput::commit_all([first, second]);
        assert!(matches!(result, Err(PipelineError::OutputWriteError(_))));
        assert!(!mosaic.exists());
        assert!(!dir.path().join("bayer.ppm.partial").exists());
        assert!(!dir.path().join("demosaic.ppm.partial").exists());
        assert!(blocked.join("keep").exists());
    }

    #[test]
    fn test_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("missing").join("out.ppm");
        assert!(matches!(
            PendingOutput::create(&target),
            Err(PipelineError::OutputWriteError(_))
        ));
    }
}

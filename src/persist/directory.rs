use std::ffi::OsStr;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use super::error::SinkError;
use super::sink::AssetSink;
use crate::images::ExtractedImage;

/// Stores each image as `<uuid>.jpg` inside one directory.
#[derive(Debug, Clone)]
pub struct DirectoryAssetSink {
    dir: PathBuf,
}

impl DirectoryAssetSink {
    /// Use `dir`, creating it when missing.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl AssetSink for DirectoryAssetSink {
    fn store(&self, image: &ExtractedImage) -> Result<String, SinkError> {
        let name = format!("{}.jpg", Uuid::new_v4());
        let path = self.dir.join(&name);
        let mut file = OpenOptions::new().write(true).create_new(true).open(&path)?;
        if let Err(err) = file.write_all(&image.bytes).and_then(|()| file.sync_all()) {
            drop(file);
            let _ = fs::remove_file(&path);
            return Err(err.into());
        }
        debug!(name = %name, size = image.len(), "stored image asset");
        Ok(name)
    }

    fn remove(&self, name: &str) -> Result<(), SinkError> {
        if Path::new(name).file_name() != Some(OsStr::new(name)) {
            return Err(SinkError::Rejected(format!("{name:?} is not an asset name")));
        }
        match fs::remove_file(self.dir.join(name)) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

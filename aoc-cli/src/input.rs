//! Writing downloaded puzzle inputs to disk

use crate::error::CliError;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// File name every puzzle input is saved as
pub const INPUT_FILE_NAME: &str = "input.txt";

/// Destination for one puzzle input: `{dir}/input.txt`
pub struct InputFile {
    path: PathBuf,
}

impl InputFile {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(INPUT_FILE_NAME),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fail early if an input was already saved here
    pub fn ensure_absent(&self) -> Result<(), CliError> {
        if self.path.exists() {
            return Err(CliError::InputExists(self.path.clone()));
        }
        Ok(())
    }

    /// Write the input, never replacing an existing file
    pub fn write(&self, contents: &str) -> Result<(), CliError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
            .map_err(|e| match e.kind() {
                ErrorKind::AlreadyExists => CliError::InputExists(self.path.clone()),
                _ => CliError::Io(e),
            })?;
        file.write_all(contents.as_bytes())?;
        Ok(())
    }
}

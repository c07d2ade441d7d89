use anyhow::{Context, Result, anyhow};
use log::debug;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

// @module: File and directory utilities

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {:?}", path))?;
        }
        Ok(())
    }

    // @generates: `<dir>/<stem>_<index>.<extension>`, index zero-padded to `width`
    pub fn clip_path<P: AsRef<Path>>(dir: P, stem: &str, index: u64, width: usize, extension: &str) -> PathBuf {
        dir.as_ref()
            .join(format!("{}_{:0width$}.{}", stem, index, extension, width = width))
    }

    /// Read a file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        fs::read_to_string(&path)
            .with_context(|| format!("Failed to read file: {:?}", path.as_ref()))
    }

    /// Write bytes through a temp file in the same directory, then rename into place
    pub fn write_atomic<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
        let path = path.as_ref();
        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        Self::ensure_dir(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temp file in: {:?}", parent))?;
        tmp.write_all(content)
            .with_context(|| format!("Failed to write temp file for: {:?}", path))?;
        tmp.persist(path)
            .map_err(|e| anyhow!("Failed to write to file {:?}: {}", path, e.error))?;

        debug!("Wrote {} bytes to {:?}", content.len(), path);
        Ok(())
    }

    // @generates: Path `from` would take inside `dir`
    pub fn target_in_dir<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, dir: P2) -> Result<PathBuf> {
        let from = from.as_ref();
        let name = from
            .file_name()
            .ok_or_else(|| anyhow!("Not a file path: {:?}", from))?;
        Ok(dir.as_ref().join(name))
    }

    /// Move a file into `dir`, keeping its name. An existing file of the same
    /// name in `dir` is never replaced. Falls back to copy and remove when a
    /// plain rename is not possible (e.g. across devices).
    pub fn move_into_dir<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, dir: P2) -> Result<PathBuf> {
        let from = from.as_ref();
        let to = Self::target_in_dir(from, dir)?;

        if !Self::file_exists(from) {
            return Err(anyhow!("Source file does not exist: {:?}", from));
        }
        if to.exists() {
            return Err(anyhow!("Destination path already exists: {:?}", to));
        }

        if fs::rename(from, &to).is_err() {
            fs::copy(from, &to).with_context(|| format!("Failed to copy {:?} to {:?}", from, to))?;
            fs::remove_file(from).with_context(|| format!("Failed to remove {:?}", from))?;
        }

        Ok(to)
    }
}

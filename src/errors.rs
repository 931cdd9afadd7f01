use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("No .tex files found in {}", .dir.display())]
    NoSources { dir: PathBuf },
    #[error("Could not list {}: {source}", .dir.display())]
    ListDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

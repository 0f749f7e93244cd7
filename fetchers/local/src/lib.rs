use bytes::Bytes;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Reads input documents from the local machine.
pub enum LocalFetcher {
    /// Reads the process's standard input until end-of-stream.
    Stdin,
    /// Reads a whole file.
    File(PathBuf),
}

impl LocalFetcher {
    pub async fn fetch(&self) -> io::Result<Bytes> {
        match self {
            LocalFetcher::Stdin => {
                log::debug!("Reading standard input");
                read_all(tokio::io::stdin()).await
            }
            LocalFetcher::File(path) => read_file(path).await,
        }
    }
}

pub async fn read_file(path: &Path) -> io::Result<Bytes> {
    log::debug!("Reading file {:?}", path);
    let contents = tokio::fs::read(path).await?;
    log::debug!("Read {} bytes from {:?}", contents.len(), path);
    Ok(contents.into())
}

/// Drains `reader` to end-of-stream. No timeout applies.
pub async fn read_all<R: AsyncRead + Unpin>(mut reader: R) -> io::Result<Bytes> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf).await?;
    Ok(buf.into())
}

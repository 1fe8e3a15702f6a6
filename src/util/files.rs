use std::io;
use std::path::Path;

/// Removes the file at `path`. A missing file is not an error.
pub async fn safe_remove_file(path: impl AsRef<Path>) -> io::Result<()> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err),
    }
}

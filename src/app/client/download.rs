//! File download operations with atomic writes and streaming
//!
//! Bodies are streamed chunk by chunk into a sibling `.tmp` file which is
//! renamed over the final path only after the whole body arrived. Any
//! failure removes the temporary file, so the final path never holds a
//! partial transfer.

use std::path::Path;

use futures::{Stream, StreamExt};
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::app::client::http::HttpHandler;
use crate::app::storage::PathGenerator;
use crate::errors::{DownloadError, DownloadResult};

/// Result of one completed transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transfer {
    /// Bytes written to the final path
    pub bytes_written: u64,
    /// Content length declared by the server, if any
    pub content_length: Option<u64>,
}

/// Single-attempt binary transfer handler
pub struct DownloadHandler<'a> {
    http_handler: &'a HttpHandler,
}

impl<'a> DownloadHandler<'a> {
    /// Creates a new DownloadHandler with the given HTTP handler
    pub fn new(http_handler: &'a HttpHandler) -> Self {
        Self { http_handler }
    }

    /// Performs one transfer of `url` into `destination`
    ///
    /// Only status 200 is accepted.
    ///
    /// # Errors
    ///
    /// Returns `DownloadError` if:
    /// - The request fails or the server answers with another status
    /// - The body is shorter than the advertised content length
    /// - File I/O or the final rename fails
    pub async fn download_file(&self, url: &str, destination: &Path) -> DownloadResult<Transfer> {
        let response = self.http_handler.get_binary(url).await?;

        let status = response.status().as_u16();
        if status != 200 {
            return Err(DownloadError::ServerError { status });
        }

        let content_length = response.content_length().filter(|len| *len > 0);
        let bytes_written =
            write_atomically(response.bytes_stream(), destination, content_length).await?;

        Ok(Transfer {
            bytes_written,
            content_length,
        })
    }
}

/// Streams `body` into `destination` through a temporary sibling file
///
/// When `expected` is set, a body of a different length fails with
/// `IncompleteDownload`. On every failure path the temporary file is
/// removed and `destination` is left untouched.
pub async fn write_atomically<S, B, E>(
    body: S,
    destination: &Path,
    expected: Option<u64>,
) -> DownloadResult<u64>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DownloadError>,
{
    let temp_path = PathGenerator::temp_path(destination);

    let written = match stream_to_file(body, &temp_path, expected).await {
        Ok(written) => written,
        Err(e) => {
            discard_temp_file(&temp_path).await;
            return Err(e);
        }
    };

    if let Err(source) = tokio::fs::rename(&temp_path, destination).await {
        discard_temp_file(&temp_path).await;
        return Err(DownloadError::AtomicOperationFailed {
            temp_path,
            final_path: destination.to_path_buf(),
            source,
        });
    }

    Ok(written)
}

async fn stream_to_file<S, B, E>(body: S, temp_path: &Path, expected: Option<u64>) -> DownloadResult<u64>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Into<DownloadError>,
{
    futures::pin_mut!(body);

    let mut file = File::create(temp_path).await?;
    let mut written: u64 = 0;

    while let Some(chunk) = body.next().await {
        let chunk = chunk.map_err(Into::into)?;
        let bytes = chunk.as_ref();
        file.write_all(bytes).await?;
        written += bytes.len() as u64;
    }

    file.flush().await?;
    file.sync_all().await?;

    if let Some(expected) = expected {
        if written != expected {
            return Err(DownloadError::IncompleteDownload {
                received: written,
                expected,
            });
        }
    }

    Ok(written)
}

async fn discard_temp_file(temp_path: &Path) {
    if let Err(e) = tokio::fs::remove_file(temp_path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!("Failed to remove temp file {}: {}", temp_path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::stream;
    use std::io;
    use tempfile::tempdir;

    use crate::app::client::config::ClientConfig;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn chunks(parts: Vec<io::Result<&'static [u8]>>) -> impl Stream<Item = io::Result<&'static [u8]>> {
        stream::iter(parts)
    }

    #[tokio::test]
    async fn test_complete_stream_is_renamed_into_place() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("Clip.mp3");

        let body = chunks(vec![Ok(&b"ID3"[..]), Ok(&b"-data"[..])]);
        let written = write_atomically(body, &destination, Some(8)).await.unwrap();

        assert_eq!(written, 8);
        assert_eq!(std::fs::read(&destination).unwrap(), b"ID3-data");
        assert!(!PathGenerator::temp_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_mid_stream_failure_leaves_nothing_behind() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("Clip.mp3");

        let body = chunks(vec![
            Ok(&b"partial"[..]),
            Err(io::Error::new(io::ErrorKind::ConnectionReset, "reset")),
        ]);
        let result = write_atomically(body, &destination, None).await;

        assert!(matches!(result, Err(DownloadError::Io(_))));
        assert!(!destination.exists());
        assert!(!PathGenerator::temp_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_short_body_is_incomplete() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("Clip.mp3");

        let body = chunks(vec![Ok(&b"abc"[..])]);
        let result = write_atomically(body, &destination, Some(10)).await;

        match result {
            Err(DownloadError::IncompleteDownload { received, expected }) => {
                assert_eq!(received, 3);
                assert_eq!(expected, 10);
            }
            other => panic!("Expected IncompleteDownload, got {:?}", other),
        }
        assert!(!destination.exists());
        assert!(!PathGenerator::temp_path(&destination).exists());
    }

    #[tokio::test]
    async fn test_existing_file_is_replaced_only_on_success() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("Clip.mp3");
        std::fs::write(&destination, b"old").unwrap();

        let failing = chunks(vec![Err(io::Error::new(io::ErrorKind::Other, "boom"))]);
        assert!(write_atomically(failing, &destination, None).await.is_err());
        assert_eq!(std::fs::read(&destination).unwrap(), b"old");

        let ok = chunks(vec![Ok(&b"new"[..])]);
        write_atomically(ok, &destination, None).await.unwrap();
        assert_eq!(std::fs::read(&destination).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_non_200_status_is_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/clip.mp3"))
            .respond_with(ResponseTemplate::new(206).set_body_bytes(b"abc".to_vec()))
            .mount(&server)
            .await;

        let client = ClientConfig::default().build_http_client().unwrap();
        let http_handler = HttpHandler::new(client, 50).unwrap();
        let handler = DownloadHandler::new(&http_handler);

        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("Clip.mp3");
        let result = handler
            .download_file(&format!("{}/clip.mp3", server.uri()), &destination)
            .await;

        assert!(matches!(result, Err(DownloadError::ServerError { status: 206 })));
        assert!(!destination.exists());
    }
}

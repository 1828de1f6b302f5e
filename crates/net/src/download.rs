//! Streaming download of source archives

use futures::StreamExt;
use keg_errors::{Error, NetworkError};
use keg_events::{DownloadEvent, EventEmitter, EventSender};
use std::path::Path;

use crate::client::NetClient;
use crate::validation::{validate_response, validate_url};

/// Download a URL to a local path, streaming the body to disk
///
/// Emits `DownloadEvent`s over the channel. The destination file is created
/// (or truncated) before the first byte arrives; callers download into a
/// temporary location and only move verified files into place.
///
/// # Errors
///
/// Returns an error if the URL is invalid, the request fails after retries,
/// the server responds with a non-success status, or a filesystem write
/// fails.
pub async fn download_to_path(
    client: &NetClient,
    url: &str,
    dest: &Path,
    events: Option<&EventSender>,
) -> Result<u64, Error> {
    let url = validate_url(url)?;

    let response = client.get(&url).await?;
    validate_response(&response)?;

    let total_bytes = response.content_length();
    events.emit(DownloadEvent::Started {
        url: url.clone(),
        formula: None,
        total_bytes,
    });

    let mut file = tokio::fs::File::create(dest)
        .await
        .map_err(|e| Error::io_with_path(&e, dest))?;
    let mut stream = response.bytes_stream();
    let mut downloaded = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(e) => {
                events.emit(DownloadEvent::Failed {
                    url: url.clone(),
                    formula: None,
                    error: e.to_string(),
                });
                return Err(NetworkError::DownloadFailed(e.to_string()).into());
            }
        };
        tokio::io::AsyncWriteExt::write_all(&mut file, &chunk).await?;

        downloaded += chunk.len() as u64;
        events.emit(DownloadEvent::Progress {
            url: url.clone(),
            bytes_downloaded: downloaded,
            total_bytes,
        });
    }

    tokio::io::AsyncWriteExt::flush(&mut file).await?;

    events.emit(DownloadEvent::Completed {
        url,
        formula: None,
        bytes_downloaded: downloaded,
    });

    Ok(downloaded)
}

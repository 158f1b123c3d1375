//! Progress-reporting multipart upload bodies.
//!
//! The file part streams in fixed-size chunks through a counting wrapper so
//! the caller's progress callback sees integer percentages as bytes go out.

use std::sync::Arc;

use bytes::Bytes;
use reqwest::multipart::Part;

use crate::error::{ApiError, Result};

/// Chunk size for the streaming upload body.
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Callback receiving upload progress as an integer percentage.
///
/// Values are monotonically non-decreasing and within `[0, 100]` for a
/// single upload call.
pub type ProgressCallback = Arc<dyn Fn(u8) + Send + Sync>;

/// A file staged for multipart upload.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// Multipart field name (e.g. `"file"`).
    pub field_name: &'static str,
    /// File name reported to the server.
    pub file_name: String,
    /// MIME type of the payload.
    pub mime_type: String,
    /// The file contents.
    pub bytes: Bytes,
}

impl UploadFile {
    /// Stage a file for upload under the conventional `file` field.
    #[must_use]
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            field_name: "file",
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            bytes,
        }
    }
}

/// Build the multipart file part, wrapping the payload in a byte-counting
/// stream when a progress callback is supplied.
pub(crate) fn progress_part(file: &UploadFile, progress: Option<ProgressCallback>) -> Result<Part> {
    let total = file.bytes.len() as u64;
    let body = reqwest::Body::wrap_stream(progress_stream(file.bytes.clone(), progress));

    Part::stream_with_length(body, total)
        .file_name(file.file_name.clone())
        .mime_str(&file.mime_type)
        .map_err(|e| ApiError::Validation(format!("invalid mime type: {e}")))
}

/// Split the payload into chunks, invoking the callback with the rounded
/// percentage after each chunk is handed to the transport.
fn progress_stream(
    data: Bytes,
    progress: Option<ProgressCallback>,
) -> impl futures_util::Stream<Item = std::result::Result<Bytes, std::io::Error>> + Send {
    let total = data.len() as u64;

    futures_util::stream::unfold(
        (data, 0u64, None::<u8>, progress),
        move |(mut remaining, sent, last_reported, progress)| async move {
            if remaining.is_empty() {
                return None;
            }

            let take = remaining.len().min(UPLOAD_CHUNK_SIZE);
            let chunk = remaining.split_to(take);
            let sent = sent + take as u64;

            let mut last_reported = last_reported;
            if let Some(callback) = &progress {
                let pct = percent(sent, total);
                // Report each percentage at most once, and never backwards
                if last_reported.is_none_or(|last| pct > last) {
                    callback(pct);
                    last_reported = Some(pct);
                }
            }

            Some((Ok(chunk), (remaining, sent, last_reported, progress)))
        },
    )
}

/// Rounded integer percentage of `sent` out of `total`, clamped to 100.
fn percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }

    #[allow(clippy::cast_precision_loss)] // upload sizes are far below f64 precision
    let ratio = sent as f64 / total as f64;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // bounded to [0, 100]
    let pct = (ratio * 100.0).round() as u8;
    pct.min(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::StreamExt;
    use std::sync::Mutex;

    fn collecting_callback() -> (ProgressCallback, Arc<Mutex<Vec<u8>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let callback: ProgressCallback = Arc::new(move |pct| {
            sink.lock().expect("progress sink").push(pct);
        });
        (callback, seen)
    }

    #[tokio::test]
    async fn test_progress_monotonic_and_bounded() {
        let (callback, seen) = collecting_callback();
        // 5 chunks worth of data
        let data = Bytes::from(vec![0u8; UPLOAD_CHUNK_SIZE * 4 + 123]);

        let chunks: Vec<_> = progress_stream(data, Some(callback)).collect().await;
        assert!(chunks.iter().all(std::result::Result::is_ok));

        let seen = seen.lock().expect("progress sink");
        assert!(!seen.is_empty());
        assert_eq!(*seen.last().expect("final report"), 100);
        for pair in seen.windows(2) {
            assert!(pair[0] < pair[1], "progress must be strictly increasing");
        }
        assert!(seen.iter().all(|&pct| pct <= 100));
    }

    #[tokio::test]
    async fn test_progress_small_payload_reports_once() {
        let (callback, seen) = collecting_callback();
        let data = Bytes::from_static(b"tiny model");

        let _chunks: Vec<_> = progress_stream(data, Some(callback)).collect().await;

        assert_eq!(*seen.lock().expect("progress sink"), vec![100]);
    }

    #[tokio::test]
    async fn test_stream_preserves_payload() {
        let payload = vec![7u8; UPLOAD_CHUNK_SIZE + 17];
        let data = Bytes::from(payload.clone());

        let mut out = Vec::new();
        let mut stream = std::pin::pin!(progress_stream(data, None));
        while let Some(chunk) = stream.next().await {
            out.extend_from_slice(&chunk.expect("chunk"));
        }

        assert_eq!(out, payload);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(0, 200), 0);
        assert_eq!(percent(1, 200), 1); // 0.5% rounds up
        assert_eq!(percent(100, 200), 50);
        assert_eq!(percent(199, 200), 100); // 99.5% rounds up
        assert_eq!(percent(200, 200), 100);
    }

    #[test]
    fn test_percent_empty_payload() {
        assert_eq!(percent(0, 0), 100);
    }
}

use std::io;
use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;
use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures_util::StreamExt;
use futures_util::stream::Stream;
use tempfile::TempDir;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tokio_util::io::ReaderStream;
use tracing::{debug, info, warn};

use crate::error::{AppError, AppResult};
use crate::infrastructure::http::client::{InstagramHttp, UpstreamError};
use crate::infrastructure::transcoder::ffmpeg;
use crate::state::AppState;

const CHUNK_SIZE: usize = 64 * 1024;
const TEMP_PREFIX: &str = "reeltomp3_";

/// Streams a converted MP3 and owns the temporary directory it lives in.
/// Dropping the stream (finished, failed, or abandoned by the client) removes
/// the directory.
pub struct AudioStream {
    reader: Option<ReaderStream<File>>,
    dir: Option<TempDir>,
    pub size: u64,
}

impl AudioStream {
    fn new(dir: TempDir, file: File, size: u64) -> Self {
        Self {
            reader: Some(ReaderStream::with_capacity(file, CHUNK_SIZE)),
            dir: Some(dir),
            size,
        }
    }

    #[cfg(test)]
    fn dir_path(&self) -> Option<PathBuf> {
        self.dir.as_ref().map(|d| d.path().to_path_buf())
    }
}

impl Stream for AudioStream {
    type Item = io::Result<Bytes>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        match self.reader.as_mut() {
            Some(reader) => Pin::new(reader).poll_next(cx),
            None => Poll::Ready(None),
        }
    }
}

fn remove_dir(dir: TempDir) {
    let path = dir.path().to_path_buf();
    match dir.close() {
        Ok(()) => debug!("Removed conversion dir {}", path.display()),
        Err(e) => warn!("Failed to remove conversion dir {}: {}", path.display(), e),
    }
}

impl Drop for AudioStream {
    fn drop(&mut self) {
        // Close the file before removing its directory.
        self.reader.take();
        let Some(dir) = self.dir.take() else {
            return;
        };
        // Keep the recursive delete off the async workers.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || remove_dir(dir));
            }
            Err(_) => remove_dir(dir),
        }
    }
}

fn conversion_error(context: &'static str) -> impl Fn(io::Error) -> AppError {
    move |e| AppError::Conversion(format!("{}: {}", context, e))
}

pub struct MediaService;

impl MediaService {
    /// Opens the upstream video for pass-through streaming.
    pub async fn open_preview(
        state: &AppState,
        url: &str,
        range: Option<&str>,
    ) -> Result<reqwest::Response, UpstreamError> {
        state.http.get_media(url, range).await
    }

    /// Downloads `url` into a fresh temp dir, converts it to MP3 and returns a
    /// stream over the result. Any failure removes the temp dir before
    /// returning.
    pub async fn convert_to_mp3(state: &AppState, url: &str) -> AppResult<AudioStream> {
        let root = &state.config.temp_root;
        tokio::fs::create_dir_all(root)
            .await
            .map_err(conversion_error("create temp root"))?;
        let dir = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempdir_in(root)
            .map_err(conversion_error("create temp dir"))?;

        let input = dir.path().join("input.mp4");
        let output = dir.path().join("output.mp3");

        let downloaded = Self::download(&state.http, url, &input).await?;
        info!("Downloaded {} bytes from {}", downloaded, url);

        ffmpeg::extract_mp3(&state.config.ffmpeg_path, &input, &output).await?;

        let file = File::open(&output)
            .await
            .map_err(conversion_error("open mp3"))?;
        let size = file
            .metadata()
            .await
            .map_err(conversion_error("stat mp3"))?
            .len();

        Ok(AudioStream::new(dir, file, size))
    }

    /// Streams `url` to `dest` in 64 KiB writes.
    async fn download(http: &InstagramHttp, url: &str, dest: &Path) -> AppResult<u64> {
        let response = http
            .get_media(url, None)
            .await
            .map_err(|e| AppError::Conversion(format!("download failed: {}", e)))?;

        let file = File::create(dest)
            .await
            .map_err(conversion_error("create input file"))?;
        let mut writer = BufWriter::with_capacity(CHUNK_SIZE, file);
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| AppError::Conversion(format!("download interrupted: {}", e)))?;
            writer
                .write_all(&chunk)
                .await
                .map_err(conversion_error("write input file"))?;
            written += chunk.len() as u64;
        }

        writer.flush().await.map_err(conversion_error("flush input file"))?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    async fn wait_for_removal(path: &Path) -> bool {
        for _ in 0..100 {
            if !path.exists() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_stream_drop_removes_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir_in(root.path()).unwrap();
        let path = dir.path().join("output.mp3");
        tokio::fs::write(&path, b"ID3fake").await.unwrap();

        let file = File::open(&path).await.unwrap();
        let stream = AudioStream::new(dir, file, 7);
        let dir_path = stream.dir_path().unwrap();
        assert!(dir_path.exists());

        let chunks: Vec<_> = stream.collect().await;
        assert_eq!(chunks.len(), 1);
        assert!(wait_for_removal(&dir_path).await);
    }

    #[tokio::test]
    async fn test_abandoned_stream_removes_dir() {
        let root = tempfile::tempdir().unwrap();
        let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir_in(root.path()).unwrap();
        let path = dir.path().join("output.mp3");
        tokio::fs::write(&path, vec![0u8; CHUNK_SIZE * 3]).await.unwrap();

        let file = File::open(&path).await.unwrap();
        let mut stream = AudioStream::new(dir, file, (CHUNK_SIZE * 3) as u64);
        let dir_path = stream.dir_path().unwrap();

        let first = stream.next().await.unwrap().unwrap();
        assert!(!first.is_empty());
        drop(stream);
        assert!(wait_for_removal(&dir_path).await);
    }

    #[test]
    fn test_drop_without_runtime_removes_dir_inline() {
        let root = tempfile::tempdir().unwrap();
        let dir = tempfile::Builder::new().prefix(TEMP_PREFIX).tempdir_in(root.path()).unwrap();
        let dir_path = dir.path().to_path_buf();
        let stream = AudioStream {
            reader: None,
            dir: Some(dir),
            size: 0,
        };
        drop(stream);
        assert!(!dir_path.exists());
    }
}

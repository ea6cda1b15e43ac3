use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{error, info};

use crate::error::AppError;

#[cfg(windows)]
const BINARY_NAME: &str = "ffmpeg.exe";
#[cfg(not(windows))]
const BINARY_NAME: &str = "ffmpeg";

/// Picks the ffmpeg binary: explicit override, then a copy shipped next to the
/// executable or under `./bin`, then whatever `ffmpeg` is on PATH.
pub fn resolve_binary(override_path: Option<String>) -> PathBuf {
    if let Some(path) = override_path {
        return PathBuf::from(path);
    }

    let beside_exe = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(BINARY_NAME)));

    let bundled = [beside_exe, Some(PathBuf::from("bin").join(BINARY_NAME))];
    for candidate in bundled.into_iter().flatten() {
        if candidate.is_file() {
            return candidate;
        }
    }

    PathBuf::from(BINARY_NAME)
}

fn mp3_args(input: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = ["-hide_banner", "-loglevel", "error", "-y", "-i"]
        .into_iter()
        .map(OsString::from)
        .collect();
    args.push(input.as_os_str().to_owned());
    args.extend(
        ["-vn", "-acodec", "libmp3lame", "-b:a", "192k"]
            .into_iter()
            .map(OsString::from),
    );
    args.push(output.as_os_str().to_owned());
    args
}

/// Strips the video stream from `input` and writes a 192 kbps MP3 to `output`.
pub async fn extract_mp3(ffmpeg: &Path, input: &Path, output: &Path) -> Result<(), AppError> {
    info!("Transcoding {} -> {}", input.display(), output.display());

    let result = Command::new(ffmpeg)
        .args(mp3_args(input, output))
        .kill_on_drop(true)
        .output()
        .await
        .map_err(|e| {
            error!("Failed to spawn {}: {}", ffmpeg.display(), e);
            AppError::Conversion(format!("failed to spawn ffmpeg: {}", e))
        })?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr).trim().to_string();
        let message = if stderr.is_empty() {
            "ffmpeg failed".to_string()
        } else {
            stderr
        };
        error!(
            "ffmpeg exited with {}: {}",
            result.status.code().unwrap_or(-1),
            message
        );
        return Err(AppError::Conversion(message));
    }

    Ok(())
}

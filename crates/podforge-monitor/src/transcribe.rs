//! Audio transcription backends.
//!
//! Implement [`TranscribeBackend`] for a remote Whisper-style API or a test
//! placeholder. The upload ceiling is 25 MiB; larger files are re-encoded
//! with ffmpeg (mono, 22050 Hz) at progressively lower bitrates until one
//! fits. Running out of bitrates is fatal for that file.

use crate::error::{MonitorError, MonitorResult};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{info, warn};

/// Upload size ceiling in bytes (25 MiB).
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// Bitrates tried in order when re-encoding oversized audio.
pub const COMPRESSION_BITRATES: &[&str] = &["32k", "24k", "16k"];

/// Backend for converting an audio file into an SRT transcript string.
pub trait TranscribeBackend: Send + Sync {
    fn transcribe_file(&self, audio_path: &Path) -> MonitorResult<String>;
}

impl TranscribeBackend for Box<dyn TranscribeBackend> {
    fn transcribe_file(&self, audio_path: &Path) -> MonitorResult<String> {
        (**self).transcribe_file(audio_path)
    }
}

/// Destination path for a re-encoded copy of `input` under `temp_dir`.
pub fn compressed_output_path(input: &Path, temp_dir: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string());
    temp_dir.join(format!("compressed_{}.mp3", stem))
}

/// Re-encode `input` until it fits under `max_bytes`.
///
/// Tries each bitrate in [`COMPRESSION_BITRATES`] (mono, 22050 Hz,
/// libmp3lame). Returns the path of the first output under the ceiling;
/// exhausting all bitrates is a [`MonitorError::Compression`].
pub fn compress_audio(input: &Path, temp_dir: &Path, max_bytes: u64) -> MonitorResult<PathBuf> {
    fs::create_dir_all(temp_dir)?;
    let output = compressed_output_path(input, temp_dir);

    for bitrate in COMPRESSION_BITRATES {
        info!(
            "Compressing {} at {} into {}",
            input.display(),
            bitrate,
            output.display()
        );
        let result = Command::new("ffmpeg")
            .arg("-i")
            .arg(input)
            .args(["-acodec", "libmp3lame", "-b:a", bitrate, "-ac", "1", "-ar", "22050", "-y"])
            .arg(&output)
            .output()
            .map_err(|e| MonitorError::Compression(format!("ffmpeg spawn failed: {}", e)))?;

        if !result.status.success() {
            let stderr = String::from_utf8_lossy(&result.stderr);
            return Err(MonitorError::Compression(format!(
                "ffmpeg exited with {}: {}",
                result.status,
                stderr.trim()
            )));
        }

        let size = fs::metadata(&output)?.len();
        if size < max_bytes {
            info!("Compressed to {} bytes with {}", size, bitrate);
            return Ok(output);
        }
        warn!("Still {} bytes at {}, trying lower bitrate", size, bitrate);
    }

    Err(MonitorError::Compression(format!(
        "{} does not fit under {} bytes at any tried bitrate",
        input.display(),
        max_bytes
    )))
}

/// Placeholder backend: returns a canned SRT transcript. Use to exercise the
/// pipeline without audio hardware or network.
#[derive(Debug, Default)]
pub struct PlaceholderTranscriber {
    /// If set, return this instead of the default transcript.
    pub response: Option<String>,
}

impl PlaceholderTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(srt: String) -> Self {
        Self {
            response: Some(srt),
        }
    }
}

impl TranscribeBackend for PlaceholderTranscriber {
    fn transcribe_file(&self, audio_path: &Path) -> MonitorResult<String> {
        if let Some(ref srt) = self.response {
            return Ok(srt.clone());
        }
        Ok(format!(
            "1\n00:00:00,000 --> 00:00:02,000\n[transcription placeholder for {}]\n",
            audio_path.display()
        ))
    }
}

/// Production backend: OpenAI-compatible transcription API returning SRT.
/// Uses `STT_API_URL` (default https://api.openai.com/v1), `OPENAI_API_KEY`
/// (or `STT_API_KEY`), and `STT_MODEL` (default whisper-1).
pub struct WhisperApiTranscriber {
    base_url: String,
    api_key: String,
    model: String,
    temp_dir: PathBuf,
    client: reqwest::blocking::Client,
}

impl WhisperApiTranscriber {
    /// Build from environment. Errors when no API key is configured.
    pub fn from_env(temp_dir: PathBuf) -> MonitorResult<Self> {
        let base_url = std::env::var("STT_API_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let api_key = std::env::var("OPENAI_API_KEY")
            .or_else(|_| std::env::var("STT_API_KEY"))
            .map_err(|_| {
                MonitorError::Transcribe("transcription requires OPENAI_API_KEY or STT_API_KEY".to_string())
            })?;
        let model = std::env::var("STT_MODEL").unwrap_or_else(|_| "whisper-1".to_string());
        Self::new(base_url, api_key, model, temp_dir)
    }

    /// Create with explicit config.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        temp_dir: PathBuf,
    ) -> MonitorResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(600))
            .build()
            .map_err(|e| MonitorError::Transcribe(e.to_string()))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
            temp_dir,
            client,
        })
    }

    fn upload(&self, audio_path: &Path) -> MonitorResult<String> {
        let url = format!("{}/audio/transcriptions", self.base_url);
        let form = reqwest::blocking::multipart::Form::new()
            .file("file", audio_path)
            .map_err(|e| MonitorError::Transcribe(e.to_string()))?
            .text("model", self.model.clone())
            .text("response_format", "srt");

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| MonitorError::Transcribe(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().unwrap_or_default();
            return Err(MonitorError::Transcribe(format!(
                "STT API error {}: {}",
                status, body
            )));
        }

        // With response_format=srt the body is the transcript itself.
        res.text()
            .map_err(|e| MonitorError::Transcribe(e.to_string()))
    }
}

impl TranscribeBackend for WhisperApiTranscriber {
    fn transcribe_file(&self, audio_path: &Path) -> MonitorResult<String> {
        let size = fs::metadata(audio_path)?.len();

        let (upload_path, temp_copy) = if size > MAX_UPLOAD_BYTES {
            info!(
                "{} is {} bytes, over the {} byte ceiling; compressing",
                audio_path.display(),
                size,
                MAX_UPLOAD_BYTES
            );
            let compressed = compress_audio(audio_path, &self.temp_dir, MAX_UPLOAD_BYTES)?;
            (compressed.clone(), Some(compressed))
        } else {
            (audio_path.to_path_buf(), None)
        };

        let result = self.upload(&upload_path);

        if let Some(temp) = temp_copy {
            if let Err(e) = fs::remove_file(&temp) {
                warn!("Could not remove temp file {}: {}", temp.display(), e);
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_returns_parseable_srt() {
        let backend = PlaceholderTranscriber::new();
        let srt = backend.transcribe_file(Path::new("ep.m4a")).unwrap();
        let entries = podforge_core::parse_srt(&srt).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].text.contains("ep.m4a"));
    }

    #[test]
    fn placeholder_with_custom_response() {
        let backend = PlaceholderTranscriber::with_response("canned".to_string());
        assert_eq!(
            backend.transcribe_file(Path::new("x.m4a")).unwrap(),
            "canned"
        );
    }

    #[test]
    fn compressed_path_uses_stem_and_mp3() {
        let out = compressed_output_path(Path::new("/rec/Episode 12.m4a"), Path::new("/tmp/pf"));
        assert_eq!(out, PathBuf::from("/tmp/pf/compressed_Episode 12.mp3"));
    }

    #[test]
    fn bitrate_ladder_descends() {
        assert_eq!(COMPRESSION_BITRATES, &["32k", "24k", "16k"]);
    }
}

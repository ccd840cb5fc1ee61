//! Rendition transcoding
//!
//! The production adapter shells out to ImageMagick. Animated sources are coalesced
//! before resizing so frames drawn at offsets are flattened against their canvas first.

use crate::planner::PlannedRendition;
use async_trait::async_trait;
use bytes::Bytes;
use emotia_core::AppError;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("Failed to start transcoder: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("Transcoder timed out after {secs}s for tier {tier}")]
    Timeout { tier: u8, secs: u64 },

    #[error("Transcoder exited with {status} for tier {tier}: {stderr}")]
    Failed {
        tier: u8,
        status: String,
        stderr: String,
    },

    #[error("Transcoder output for tier {tier} could not be read: {source}")]
    Output {
        tier: u8,
        #[source]
        source: std::io::Error,
    },

    #[error("Input file has no parent directory: {0}")]
    InvalidInput(PathBuf),
}

impl From<TranscodeError> for AppError {
    fn from(err: TranscodeError) -> Self {
        AppError::Transcode(err.to_string())
    }
}

/// Produces one encoded rendition from the original upload.
///
/// Implementations must be safe to call concurrently for different tiers of the same input.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn transcode(
        &self,
        input: &Path,
        rendition: &PlannedRendition,
    ) -> Result<Bytes, TranscodeError>;
}

/// ImageMagick-backed transcoder writing `{tier}.webp` next to the input.
#[derive(Debug, Clone)]
pub struct MagickTranscoder {
    program: String,
    timeout: Duration,
}

impl MagickTranscoder {
    pub fn new(program: impl Into<String>, timeout: Duration) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    pub fn output_path(input: &Path, rendition: &PlannedRendition) -> Option<PathBuf> {
        input
            .parent()
            .map(|dir| dir.join(format!("{}.webp", rendition.tier.id)))
    }

    fn args(input: &Path, output: &Path, rendition: &PlannedRendition) -> Vec<String> {
        vec![
            input.to_string_lossy().to_string(),
            "-coalesce".to_string(),
            "-resize".to_string(),
            format!("{}x{}", rendition.width, rendition.height),
            "-define".to_string(),
            "webp:lossless=false,auto-filter=true,method=4".to_string(),
            output.to_string_lossy().to_string(),
        ]
    }
}

#[async_trait]
impl Transcoder for MagickTranscoder {
    #[tracing::instrument(skip(self, input), fields(tier = rendition.tier.id))]
    async fn transcode(
        &self,
        input: &Path,
        rendition: &PlannedRendition,
    ) -> Result<Bytes, TranscodeError> {
        let tier = rendition.tier.id;
        let output_path = Self::output_path(input, rendition)
            .ok_or_else(|| TranscodeError::InvalidInput(input.to_path_buf()))?;
        let args = Self::args(input, &output_path, rendition);

        let start = std::time::Instant::now();

        // stderr is drained by `output()` while the process runs
        let run = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| TranscodeError::Timeout {
                tier,
                secs: self.timeout.as_secs(),
            })?
            .map_err(TranscodeError::Spawn)?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        for line in stderr.lines().filter(|l| !l.trim().is_empty()) {
            tracing::debug!(tier, line = %line, "Transcoder diagnostic");
        }

        if !output.status.success() {
            tracing::error!(
                tier,
                status = %output.status,
                stderr = %stderr,
                "Transcoder failed"
            );
            return Err(TranscodeError::Failed {
                tier,
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }

        let data = tokio::fs::read(&output_path)
            .await
            .map_err(|source| TranscodeError::Output { tier, source })?;

        tracing::debug!(
            tier,
            width = rendition.width,
            height = rendition.height,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Rendition transcoded"
        );

        Ok(Bytes::from(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::TIERS;

    fn rendition(tier: usize, width: u32, height: u32) -> PlannedRendition {
        PlannedRendition {
            tier: TIERS[tier],
            width,
            height,
        }
    }

    #[test]
    fn test_args_coalesce_before_resize() {
        let input = Path::new("/tmp/run/og");
        let output = Path::new("/tmp/run/2.webp");
        let args = MagickTranscoder::args(input, output, &rendition(1, 128, 64));

        assert_eq!(
            args,
            vec![
                "/tmp/run/og",
                "-coalesce",
                "-resize",
                "128x64",
                "-define",
                "webp:lossless=false,auto-filter=true,method=4",
                "/tmp/run/2.webp",
            ]
        );
    }

    #[test]
    fn test_output_path_next_to_input() {
        let path = MagickTranscoder::output_path(Path::new("/tmp/run/og"), &rendition(3, 1, 1));
        assert_eq!(path, Some(PathBuf::from("/tmp/run/4.webp")));
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("og");
        tokio::fs::write(&input, b"gif").await.unwrap();

        let transcoder =
            MagickTranscoder::new("emotia-no-such-transcoder", Duration::from_secs(5));
        let result = transcoder.transcode(&input, &rendition(0, 32, 32)).await;
        assert!(matches!(result, Err(TranscodeError::Spawn(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("og");
        tokio::fs::write(&input, b"gif").await.unwrap();

        // `false` ignores its arguments and exits 1
        let transcoder = MagickTranscoder::new("false", Duration::from_secs(5));
        let result = transcoder.transcode(&input, &rendition(0, 32, 32)).await;
        assert!(matches!(result, Err(TranscodeError::Failed { tier: 1, .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_success_without_output_file_is_output_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("og");
        tokio::fs::write(&input, b"gif").await.unwrap();

        let transcoder = MagickTranscoder::new("true", Duration::from_secs(5));
        let result = transcoder.transcode(&input, &rendition(0, 32, 32)).await;
        assert!(matches!(result, Err(TranscodeError::Output { tier: 1, .. })));
    }

    #[test]
    fn test_maps_to_transcode_app_error() {
        let err = TranscodeError::Timeout { tier: 2, secs: 120 };
        assert!(matches!(AppError::from(err), AppError::Transcode(_)));
    }
}

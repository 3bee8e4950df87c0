//! Pose Frame Source
//!
//! The pose estimator is a separate process (camera capture, model
//! inference, rotation - all out of scope here). It streams keypoint frames
//! as JSON lines, one object per frame, keyed by joint name:
//!
//! ```text
//! {"l_shoulder":{"x":300,"y":300,"visibility":0.98}, "l_ear":{...}, ...}
//! ```
//!
//! The daemon reads them from stdin by default, or from a path (FIFO or
//! replay file) named by `POSE_SOURCE`. Failing to open the source is the
//! one fatal startup condition; a malformed line at runtime is logged and
//! skipped.

use std::io;

use posturekit_core::KeypointFrame;

use tokio::fs::File;
use tokio::io::{stdin, AsyncBufReadExt, AsyncRead, BufReader, Lines};

/// Line-delimited JSON frame reader over any byte stream
pub struct FrameSource<R> {
    lines: Lines<BufReader<R>>,
}

/// Frame source reading the estimator's stdout piped to our stdin
pub type StdinFrameSource = FrameSource<tokio::io::Stdin>;

impl StdinFrameSource {
    /// Attach to stdin
    pub fn from_stdin() -> Self {
        Self { lines: BufReader::new(stdin()).lines() }
    }
}

impl FrameSource<File> {
    /// Open a FIFO or replay file
    ///
    /// An unopenable source is a startup failure the caller propagates.
    pub async fn open(path: &str) -> io::Result<Self> {
        let file = File::open(path).await?;
        Ok(Self { lines: BufReader::new(file).lines() })
    }
}

impl<R: AsyncRead + Unpin> FrameSource<R> {
    /// Next frame, or `None` when the stream ends
    ///
    /// Malformed lines are logged and skipped; the estimator occasionally
    /// emits diagnostics on the same pipe.
    pub async fn next_frame(&mut self) -> io::Result<Option<KeypointFrame>> {
        while let Some(line) = self.lines.next_line().await? {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            match serde_json::from_str::<KeypointFrame>(trimmed) {
                Ok(frame) => return Ok(Some(frame)),
                Err(e) => {
                    log::warn!("skipping malformed frame line: {e}");
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source_from(data: &str) -> FrameSource<&[u8]> {
        FrameSource { lines: BufReader::new(data.as_bytes()).lines() }
    }

    #[tokio::test]
    async fn parses_frames_and_skips_noise() {
        let mut source = source_from(concat!(
            r#"{"l_shoulder":{"x":300,"y":300,"visibility":0.98}}"#,
            "\n",
            "estimator: dropped to 28fps\n",
            "\n",
            r#"{"r_shoulder":{"x":380,"y":300}}"#,
            "\n",
        ));

        let first = source.next_frame().await.unwrap().unwrap();
        assert_eq!(first.l_shoulder.unwrap().x, 300);

        // The log line and blank line are skipped
        let second = source.next_frame().await.unwrap().unwrap();
        assert_eq!(second.r_shoulder.unwrap().visibility, 0.0);

        assert!(source.next_frame().await.unwrap().is_none());
    }
}

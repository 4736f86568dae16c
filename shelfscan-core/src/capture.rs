//! Frame sources standing in for the device camera

use crate::error::CaptureError;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::path::PathBuf;

/// A captured JPEG frame, held in memory only for the duration of one scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedFrame {
    jpeg: Vec<u8>,
}

impl CapturedFrame {
    pub fn from_jpeg(jpeg: Vec<u8>) -> Result<Self, CaptureError> {
        if jpeg.is_empty() {
            return Err(CaptureError::Empty);
        }
        Ok(Self { jpeg })
    }

    pub fn len(&self) -> usize {
        self.jpeg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jpeg.is_empty()
    }

    /// Base64 encoding of the JPEG bytes, as sent to the vision service
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.jpeg)
    }
}

/// Produces a single frame on request
#[async_trait]
pub trait FrameSource: Send + Sync {
    async fn capture(&self) -> Result<CapturedFrame, CaptureError>;
}

/// Reads a JPEG from disk in place of a live camera
pub struct ImageFileSource {
    path: PathBuf,
}

impl ImageFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl FrameSource for ImageFileSource {
    async fn capture(&self) -> Result<CapturedFrame, CaptureError> {
        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CaptureError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        CapturedFrame::from_jpeg(data)
    }
}

/// Serves a fixed frame; useful for tests and replays
pub struct StaticFrameSource {
    frame: CapturedFrame,
}

impl StaticFrameSource {
    pub fn new(frame: CapturedFrame) -> Self {
        Self { frame }
    }
}

#[async_trait]
impl FrameSource for StaticFrameSource {
    async fn capture(&self) -> Result<CapturedFrame, CaptureError> {
        Ok(self.frame.clone())
    }
}

use anyhow::Context;
use base64::{Engine, engine::general_purpose::STANDARD};
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::error::{EngineError, EngineResult};
use crate::media::platform::{MediaElement, RgbaFrame};
use crate::media::source::StreamingVideoSource;

/// Outcome of thumbnail extraction for one tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ThumbnailStatus {
    /// Not extracted yet.
    Pending,
    /// Data URI available.
    Ready,
    /// Extraction failed; the poster stays.
    Failed,
}

/// Per-tile thumbnail slot. Terminal once it leaves `Pending`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThumbnailCache {
    status: ThumbnailStatus,
    data_uri: Option<String>,
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self {
            status: ThumbnailStatus::Pending,
            data_uri: None,
        }
    }
}

impl ThumbnailCache {
    /// Current status.
    pub fn status(&self) -> ThumbnailStatus {
        self.status
    }

    /// Encoded thumbnail once ready.
    pub fn data_uri(&self) -> Option<&str> {
        self.data_uri.as_deref()
    }

    /// Store an extracted image. Ignored unless pending.
    pub fn set_ready(&mut self, data_uri: String) -> bool {
        if self.status != ThumbnailStatus::Pending {
            return false;
        }
        self.status = ThumbnailStatus::Ready;
        self.data_uri = Some(data_uri);
        true
    }

    /// Record a failure. Ignored unless pending.
    pub fn set_failed(&mut self) -> bool {
        if self.status != ThumbnailStatus::Pending {
            return false;
        }
        self.status = ThumbnailStatus::Failed;
        true
    }

    /// Image to show: the extracted still when ready, the poster otherwise.
    pub fn display<'a>(&'a self, poster: Option<&'a str>) -> Option<&'a str> {
        match self.status {
            ThumbnailStatus::Ready => self.data_uri.as_deref(),
            ThumbnailStatus::Pending | ThumbnailStatus::Failed => poster,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Job {
    Idle,
    Seeking,
    Done,
}

/// Pulls one still frame out of a ready video source.
///
/// `start` seeks; the host reports completion through `on_seeked`, which captures and
/// encodes. Each extractor produces exactly one result and never retries.
#[derive(Clone, Debug)]
pub struct ThumbnailExtractor {
    timestamp_sec: f64,
    jpeg_quality: u8,
    job: Job,
}

impl ThumbnailExtractor {
    /// Extractor capturing at `timestamp_sec` with JPEG `jpeg_quality` (1-100).
    pub fn new(timestamp_sec: f64, jpeg_quality: u8) -> Self {
        Self {
            timestamp_sec: timestamp_sec.max(0.0),
            jpeg_quality: jpeg_quality.clamp(1, 100),
            job: Job::Idle,
        }
    }

    /// Capture position in seconds.
    pub fn timestamp_sec(&self) -> f64 {
        self.timestamp_sec
    }

    /// Whether a seek is outstanding.
    pub fn in_flight(&self) -> bool {
        self.job == Job::Seeking
    }

    /// Whether the single result was produced.
    pub fn is_done(&self) -> bool {
        self.job == Job::Done
    }

    /// Seek `source` to the thumbnail timestamp. Returns `false` when the source is not
    /// ready yet or this extractor already ran.
    pub fn start<E: MediaElement>(&mut self, source: &mut StreamingVideoSource<E>) -> bool {
        if self.job != Job::Idle || !source.is_ready() {
            return false;
        }
        source.element_mut().seek(self.timestamp_sec);
        self.job = Job::Seeking;
        true
    }

    /// Seek completed: capture and encode. `None` when no extraction was waiting.
    #[tracing::instrument(skip(self, source))]
    pub fn on_seeked<E: MediaElement>(
        &mut self,
        source: &mut StreamingVideoSource<E>,
    ) -> Option<EngineResult<String>> {
        if self.job != Job::Seeking {
            return None;
        }
        self.job = Job::Done;
        let result = source
            .element_mut()
            .capture_frame()
            .and_then(|frame| encode_jpeg_data_uri(&frame, self.jpeg_quality));
        if let Err(err) = &result {
            tracing::warn!(error = %err, "thumbnail extraction failed");
        }
        Some(result)
    }

    /// Media error while seeking. `None` when no extraction was waiting.
    pub fn on_error(&mut self, message: &str) -> Option<EngineError> {
        if self.job != Job::Seeking {
            return None;
        }
        self.job = Job::Done;
        let err = EngineError::thumbnail_failed(format!("media error while seeking: {message}"));
        tracing::warn!(error = %err, "thumbnail extraction failed");
        Some(err)
    }
}

/// Encode `frame` as a `data:image/jpeg;base64,...` URI. Alpha is discarded.
pub fn encode_jpeg_data_uri(frame: &RgbaFrame, quality: u8) -> EngineResult<String> {
    frame.validate()?;
    let rgb: Vec<u8> = frame
        .data
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode(&rgb, frame.width, frame.height, image::ExtendedColorType::Rgb8)
        .context("jpeg encode")
        .map_err(|e| EngineError::thumbnail_failed(format!("{e:#}")))?;

    Ok(format!("data:image/jpeg;base64,{}", STANDARD.encode(&jpeg)))
}

#[cfg(test)]
#[path = "../../tests/unit/media/thumbnail.rs"]
mod tests;

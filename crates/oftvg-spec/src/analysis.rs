//! Analyzer report types.
//!
//! The analyzer writes one JSON document per media file to stdout. This
//! module mirrors that document as plain data so test cases can compare
//! fields structurally.

use serde::{Deserialize, Serialize};

use crate::error::{SpecError, SpecResult};

/// Literal the analyzer reports when a stream has no decoder (e.g. raw PCM).
pub const AUDIO_CODEC_NONE: &str = "(null)";

/// Parsed analyzer output for one generated media file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Demuxer element that opened the container (e.g. "avidemux").
    pub demuxer: String,
    /// Video decoder element (e.g. "jpegdec").
    pub video_codec: String,
    /// Audio decoder element, or [`AUDIO_CODEC_NONE`].
    pub audio_codec: String,
    /// Frame size as `[width, height]`.
    pub resolution: [u32; 2],
    /// Frames per second.
    pub framerate: f64,
    /// Number of timing markers detected.
    pub markers_found: u32,
    /// Marker records in discovery order.
    #[serde(default)]
    pub markers: Vec<Marker>,
    /// Header/content/trailer frame split.
    pub video_structure: VideoStructure,
    /// Audio/video lipsync measurements.
    pub lipsync: Lipsync,
    /// Anomalies noticed by the analyzer; empty on a clean run.
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl AnalysisResult {
    /// Parses a report from a JSON string.
    pub fn from_json(json: &str) -> SpecResult<Self> {
        serde_json::from_str(json).map_err(SpecError::ParseReportFailed)
    }

    /// Parses a report from raw analyzer stdout.
    pub fn from_slice(bytes: &[u8]) -> SpecResult<Self> {
        serde_json::from_slice(bytes).map_err(SpecError::ParseReportFailed)
    }

    /// Returns true if the audio stream had no decoder.
    pub fn has_no_audio_decoder(&self) -> bool {
        self.audio_codec == AUDIO_CODEC_NONE
    }

    /// Interval of the marker at `index`, if that many markers were found.
    pub fn marker_interval(&self, index: usize) -> Option<i64> {
        self.markers.get(index).map(|m| m.interval)
    }
}

/// One detected marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Marker {
    /// Frame interval encoded by the marker.
    pub interval: i64,
    /// Any further per-marker fields the analyzer reports.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Frame counts per section of the generated video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoStructure {
    pub header_frames: u32,
    pub content_frames: u32,
    pub trailer_frames: u32,
}

/// Lipsync measurement summary.
///
/// The delay bounds are only reported when lipsync markers were found.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Lipsync {
    pub audio_markers: u32,
    pub video_markers: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_delay_min_ms: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_delay_max_ms: Option<f64>,
}

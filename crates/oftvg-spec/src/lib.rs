//! OFTVG Test Suite Data Model
//!
//! This crate provides the types shared by the runner and the harness:
//!
//! - [`ParameterSet`]: ordered generator parameters for one test run, and the
//!   `SET <KEY>=<VALUE>` config format the generator reads
//! - [`AnalysisResult`]: the JSON report the analyzer writes for one media file
//!
//! # Example
//!
//! ```
//! use oftvg_spec::{keys, parse_config, ParameterSet};
//!
//! let params = ParameterSet::new()
//!     .with(keys::CONTAINER, "avimux")
//!     .with(keys::NUM_BUFFERS, "256");
//!
//! let config = params.to_config_string();
//! assert_eq!(config, "SET CONTAINER=avimux\r\nSET NUM_BUFFERS=256\r\n");
//! assert_eq!(parse_config(&config).unwrap(), params);
//! ```

pub mod analysis;
pub mod error;
pub mod params;

// Re-export commonly used types at the crate root
pub use analysis::{AnalysisResult, Lipsync, Marker, VideoStructure, AUDIO_CODEC_NONE};
pub use error::{HarnessError, SpecError, SpecResult};
pub use params::{keys, parse_config, ParameterSet};

//! Built-in scenarios.
//!
//! Each scenario is a unit struct registered by name in [`BUILTIN_CASES`].
//! Marker interval and frame-count expectations reflect what the analyzer
//! reports for the reference input; they are a contract with that tool,
//! not values derived from the parameters.

use oftvg_runner::{RunTest, RunnerResult};
use oftvg_spec::{keys, AnalysisResult, ParameterSet, AUDIO_CODEC_NONE};

use crate::assertion::Assertions;
use crate::case::{boxed, CaseFactory, TestCase};
use crate::{check_eq, check_range};

/// Every built-in scenario, in run order.
pub const BUILTIN_CASES: &[(&str, CaseFactory)] = &[
    ("TestBasicVideo", boxed::<TestBasicVideo>),
    ("TestCalibrationPrepend", boxed::<TestCalibrationPrepend>),
    ("TestQuicktimeLipsync", boxed::<TestQuicktimeLipsync>),
];

/// Index of the first calibration marker in a prepended sequence.
const CALIBRATION_FIRST_MARKER: usize = 3;
/// Index of the last calibration marker in a prepended sequence.
const CALIBRATION_LAST_MARKER: usize = 10;

/// Frame bounds for calibration sections added by the generator.
const CALIBRATION_MIN_FRAMES: u32 = 80;
const CALIBRATION_MAX_FRAMES: u32 = 300;

/// Tolerated lipsync delay, in milliseconds.
const LIPSYNC_TOLERANCE_MS: f64 = 1.0;

/// MJPEG + AC-3 in AVI, no lipsync markers.
fn avi_params(calibration: &str) -> ParameterSet {
    ParameterSet::new()
        .with(keys::COMPRESSION, "jpegenc")
        .with(keys::CONTAINER, "avimux")
        .with(keys::AUDIOCOMPRESSION, "avenc_ac3")
        .with(keys::NUM_BUFFERS, "256")
        .with(keys::LIPSYNC, "-1")
        .with(keys::CALIBRATION, calibration)
        .with(keys::OUTPUT, "output.avi")
}

fn check_avi_report(check: &mut Assertions, r: &AnalysisResult) {
    check_eq!(check, r.demuxer, "avidemux");
    check_eq!(check, r.video_codec, "jpegdec");
    check_eq!(check, r.audio_codec, "a52dec");
    check_eq!(check, r.resolution, [1920u32, 1080]);
    check_eq!(check, r.framerate, 24.0);
    check_eq!(check, r.markers_found, 27u32);
    check_eq!(check, r.video_structure.content_frames, 256u32);
    check_eq!(check, r.lipsync.audio_markers, 0u32);
    check_eq!(check, r.lipsync.video_markers, 0u32);
    check_eq!(check, r.warnings, Vec::<String>::new());
}

/// Plain AVI output with calibration disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestBasicVideo;

impl TestCase for TestBasicVideo {
    fn run(&self, runner: &dyn RunTest, check: &mut Assertions) -> RunnerResult<()> {
        let r = runner.run_test(avi_params("off"))?;
        check_avi_report(check, &r);
        Ok(())
    }
}

/// AVI output with calibration markers prepended to the content.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestCalibrationPrepend;

impl TestCase for TestCalibrationPrepend {
    fn run(&self, runner: &dyn RunTest, check: &mut Assertions) -> RunnerResult<()> {
        let r = runner.run_test(avi_params("prepend"))?;
        check_avi_report(check, &r);

        // Intervals double from 1 at the first calibration marker.
        for index in CALIBRATION_FIRST_MARKER..=CALIBRATION_LAST_MARKER {
            let step = index - CALIBRATION_FIRST_MARKER;
            check_eq!(
                check,
                r.marker_interval(index),
                Some(1i64 << step),
                "marker {}",
                index
            );
        }

        check_range!(
            check,
            r.video_structure.header_frames,
            CALIBRATION_MIN_FRAMES,
            CALIBRATION_MAX_FRAMES
        );
        check_eq!(check, r.video_structure.trailer_frames, 0u32);
        Ok(())
    }
}

/// H.264 in QuickTime at 640x480, with lipsync markers and calibration on both ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct TestQuicktimeLipsync;

impl TestQuicktimeLipsync {
    fn params() -> ParameterSet {
        ParameterSet::new()
            .with(keys::COMPRESSION, "x264enc")
            .with(keys::CONTAINER, "qtmux")
            .with(keys::AUDIOCOMPRESSION, "identity")
            .with(keys::PREPROCESS, "videoscale ! video/x-raw,width=640,height=480")
            .with(keys::NUM_BUFFERS, "240")
            .with(keys::LIPSYNC, "2000")
            .with(keys::CALIBRATION, "both")
            .with(keys::OUTPUT, "output.mov")
    }
}

impl TestCase for TestQuicktimeLipsync {
    fn run(&self, runner: &dyn RunTest, check: &mut Assertions) -> RunnerResult<()> {
        let r = runner.run_test(Self::params())?;

        check_eq!(check, r.demuxer, "qtdemux");
        check_eq!(check, r.video_codec, "avdec_h264");
        check_eq!(check, r.audio_codec, AUDIO_CODEC_NONE);
        check_eq!(check, r.resolution, [640u32, 480]);
        check_eq!(check, r.video_structure.content_frames, 240u32);
        check_range!(
            check,
            r.video_structure.header_frames,
            CALIBRATION_MIN_FRAMES,
            CALIBRATION_MAX_FRAMES
        );
        check_range!(
            check,
            r.video_structure.trailer_frames,
            CALIBRATION_MIN_FRAMES,
            CALIBRATION_MAX_FRAMES
        );

        check_eq!(check, r.lipsync.audio_markers, 5u32);
        check_eq!(check, r.lipsync.video_markers, 5u32);
        // A missing delay is NaN, which fails the range check.
        check_range!(
            check,
            r.lipsync.audio_delay_min_ms.unwrap_or(f64::NAN),
            -LIPSYNC_TOLERANCE_MS,
            LIPSYNC_TOLERANCE_MS
        );
        check_range!(
            check,
            r.lipsync.audio_delay_max_ms.unwrap_or(f64::NAN),
            -LIPSYNC_TOLERANCE_MS,
            LIPSYNC_TOLERANCE_MS
        );

        check_eq!(check, r.warnings, Vec::<String>::new());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oftvg_runner::RunnerError;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    /// Returns a fixed report and records the parameters it was given.
    struct Canned {
        report: String,
        seen: RefCell<Vec<ParameterSet>>,
    }

    impl Canned {
        fn new(report: &str) -> Self {
            Self {
                report: report.to_string(),
                seen: RefCell::new(Vec::new()),
            }
        }
    }

    impl RunTest for Canned {
        fn run_test(&self, params: ParameterSet) -> RunnerResult<AnalysisResult> {
            self.seen.borrow_mut().push(params);
            Ok(AnalysisResult::from_json(&self.report)?)
        }
    }

    const BASIC_REPORT: &str = r#"{
        "demuxer": "avidemux", "video_codec": "jpegdec", "audio_codec": "a52dec",
        "resolution": [1920, 1080], "framerate": 24.0, "markers_found": 27,
        "markers": [],
        "video_structure": {"header_frames": 0, "content_frames": 256, "trailer_frames": 0},
        "lipsync": {"audio_markers": 0, "video_markers": 0},
        "warnings": []
    }"#;

    #[test]
    fn test_builtin_names_are_unique() {
        let mut names: Vec<_> = BUILTIN_CASES.iter().map(|(name, _)| *name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), BUILTIN_CASES.len());
    }

    #[test]
    fn test_basic_video_params() {
        let runner = Canned::new(BASIC_REPORT);
        let mut check = Assertions::quiet("TestBasicVideo");
        TestBasicVideo.run(&runner, &mut check).unwrap();

        let seen = runner.seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(
            seen[0].to_config_string(),
            "SET COMPRESSION=jpegenc\r\n\
             SET CONTAINER=avimux\r\n\
             SET AUDIOCOMPRESSION=avenc_ac3\r\n\
             SET NUM_BUFFERS=256\r\n\
             SET LIPSYNC=-1\r\n\
             SET CALIBRATION=off\r\n\
             SET OUTPUT=output.avi\r\n"
        );
        assert!(!check.errors(), "{:?}", check.failures());
        assert_eq!(check.checks(), 10);
    }

    #[test]
    fn test_basic_video_reports_every_mismatch() {
        let report = BASIC_REPORT
            .replace("\"avidemux\"", "\"qtdemux\"")
            .replace("\"markers_found\": 27", "\"markers_found\": 26")
            .replace("\"warnings\": []", "\"warnings\": [\"late frame\"]");
        let runner = Canned::new(&report);
        let mut check = Assertions::quiet("TestBasicVideo");
        TestBasicVideo.run(&runner, &mut check).unwrap();

        assert!(check.errors());
        assert_eq!(check.checks(), 10);
        let expressions: Vec<_> = check
            .failures()
            .iter()
            .map(|f| f.expression.as_str())
            .collect();
        assert_eq!(expressions.len(), 3);
        assert_eq!(expressions[0], "r.demuxer == \"avidemux\"");
        assert_eq!(expressions[1], "r.markers_found == 27u32");
        assert!(expressions[2].starts_with("r.warnings == "));
    }

    #[test]
    fn test_prepend_short_marker_list_does_not_panic() {
        // Only four markers: indices 4..=10 are missing.
        let report = BASIC_REPORT.replace(
            "\"markers\": []",
            "\"markers\": [{\"interval\": 0}, {\"interval\": 0}, {\"interval\": 0}, {\"interval\": 1}]",
        );
        let runner = Canned::new(&report);
        let mut check = Assertions::quiet("TestCalibrationPrepend");
        TestCalibrationPrepend.run(&runner, &mut check).unwrap();

        // header_frames is 0, below the calibration range.
        let notes: Vec<_> = check
            .failures()
            .iter()
            .filter_map(|f| f.note.as_deref())
            .collect();
        assert_eq!(
            notes,
            vec![
                "marker 4", "marker 5", "marker 6", "marker 7", "marker 8", "marker 9",
                "marker 10",
            ]
        );
        assert_eq!(check.failures().len(), 8);
        assert_eq!(runner.seen.borrow()[0].get(keys::CALIBRATION), Some("prepend"));
    }

    #[test]
    fn test_lipsync_missing_delay_fails() {
        let report = r#"{
            "demuxer": "qtdemux", "video_codec": "avdec_h264", "audio_codec": "(null)",
            "resolution": [640, 480], "framerate": 24.0, "markers_found": 10,
            "video_structure": {"header_frames": 120, "content_frames": 240, "trailer_frames": 120},
            "lipsync": {"audio_markers": 5, "video_markers": 5, "audio_delay_max_ms": 0.4},
            "warnings": []
        }"#;
        let runner = Canned::new(report);
        let mut check = Assertions::quiet("TestQuicktimeLipsync");
        TestQuicktimeLipsync.run(&runner, &mut check).unwrap();

        assert_eq!(check.failures().len(), 1);
        assert_eq!(check.failures()[0].actual, "NaN");
    }

    #[test]
    fn test_runner_error_propagates() {
        struct Broken;
        impl RunTest for Broken {
            fn run_test(&self, _params: ParameterSet) -> RunnerResult<AnalysisResult> {
                Err(RunnerError::process_failed(
                    oftvg_runner::Tool::Generator,
                    "/opt/tvg/Run_TVG.sh",
                    1,
                    "",
                ))
            }
        }

        let mut check = Assertions::quiet("TestQuicktimeLipsync");
        let err = TestQuicktimeLipsync.run(&Broken, &mut check).unwrap_err();
        assert!(matches!(err, RunnerError::ProcessFailed { .. }));
        assert_eq!(check.checks(), 0);
    }
}

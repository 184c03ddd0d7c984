use super::*;
use crate::config::session::DitherKernel;

#[test]
fn json_keys_are_camel_case_and_unknown_keys_are_ignored() {
    let v = serde_json::json!({
        "workers": 4,
        "globalPalette": true,
        "workerTimeoutMs": 250,
        "debug": true,
        "somethingElse": [1, 2, 3]
    });
    let opts = SessionOptions::from_json(&v).unwrap();
    assert_eq!(opts.workers, Some(4));
    assert_eq!(opts.global_palette, Some(true));
    assert_eq!(opts.worker_timeout_ms, Some(250));
    assert_eq!(opts.quality, None);
}

#[test]
fn json_value_domains_are_typed() {
    let v = serde_json::json!({
        "repeat": -1,
        "background": "#fff",
        "transparent": 0x00ff00,
        "dither": "Stucki-serpentine",
        "dispose": 2
    });
    let opts = SessionOptions::from_json(&v).unwrap();
    assert_eq!(opts.repeat, Some(Repeat::NoLoop));
    assert_eq!(opts.background, Some(Rgba8::from_hex("#ffffff").unwrap()));
    assert_eq!(opts.transparent, Some(Rgb8::from_u32(0x00ff00).unwrap()));
    assert_eq!(
        opts.dither,
        Some(Dither::Kernel {
            kernel: DitherKernel::Stucki,
            serpentine: true
        })
    );
    assert_eq!(opts.dispose, Some(DisposeMode::RestoreBackground));
}

#[test]
fn json_rejects_bad_values_and_non_objects() {
    assert!(SessionOptions::from_json(&serde_json::json!({ "dither": "Bayer" })).is_err());
    assert!(SessionOptions::from_json(&serde_json::json!({ "dispose": 9 })).is_err());
    assert!(SessionOptions::from_json(&serde_json::json!({ "workers": -2 })).is_err());
    let err = SessionOptions::from_json(&serde_json::json!([1, 2])).unwrap_err();
    assert!(matches!(err, GifError::Validation(_)));
}

#[test]
fn frame_options_default_to_session_values() {
    let opts: FrameOptions = serde_json::from_value(serde_json::json!({ "delay": 40 })).unwrap();
    assert_eq!(opts, FrameOptions::with_delay(40));
    assert!(opts.dispose.is_none());
    assert!(!opts.copy);
}

use super::*;
use crate::frame::source::ImageData;

fn pixels(width: u32, height: u32) -> FrameInput {
    FrameInput::Pixels(ImageData::new(width, height, vec![0; (width * height * 4) as usize]))
}

#[test]
fn push_resolves_defaults_from_session() {
    let cfg = SessionConfig {
        delay_ms: 80,
        transparent: Some(Rgb8::from_u32(0x00ff00).unwrap()),
        ..Default::default()
    };
    let mut queue = FrameQueue::default();
    let (count, dims) = queue.push(pixels(3, 2), &FrameOptions::default(), &cfg).unwrap();
    assert_eq!(count, 1);
    assert_eq!(dims, (3, 2));

    let frames = queue.snapshot();
    assert_eq!(frames[0].delay_ms, 80);
    assert_eq!(frames[0].dispose, DisposeMode::Auto);
    assert_eq!(frames[0].transparent, cfg.transparent);
}

#[test]
fn push_applies_frame_overrides() {
    let cfg = SessionConfig::default();
    let mut queue = FrameQueue::default();
    let opts = FrameOptions {
        delay: Some(20),
        dispose: Some(DisposeMode::RestorePrevious),
        ..Default::default()
    };
    queue.push(pixels(1, 1), &opts, &cfg).unwrap();
    let frames = queue.snapshot();
    assert_eq!(frames[0].delay_ms, 20);
    assert_eq!(frames[0].dispose, DisposeMode::RestorePrevious);
}

#[test]
fn rejected_input_leaves_queue_unchanged() {
    let cfg = SessionConfig::default();
    let mut queue = FrameQueue::default();
    queue.push(pixels(1, 1), &FrameOptions::default(), &cfg).unwrap();
    let err = queue.push(
        FrameInput::Unsupported("video element".into()),
        &FrameOptions::default(),
        &cfg,
    );
    assert!(err.is_err());
    assert_eq!(queue.len(), 1);
    assert!(!queue.is_empty());
}

use super::*;
use crate::frame::source::ImageData;
use crate::worker::result::{EncodedFrame, PageWriter};
use crate::worker::task::Task;
use crossbeam_channel::Sender;

fn byte_encoder(task: &Task) -> anyhow::Result<EncodedFrame> {
    let mut w = PageWriter::with_page_size(16);
    w.write_byte(task.index.0 as u8);
    Ok(EncodedFrame::from_writer(task.index, w, None))
}

fn pixels(w: u32, h: u32) -> ImageData {
    ImageData::new(w, h, vec![0; (w * h * 4) as usize])
}

fn gated_session() -> (EncodeSession, Sender<()>) {
    let (gate_tx, gate_rx) = bounded::<()>(0);
    let session = EncodeSession::new(move |task: &Task| -> anyhow::Result<EncodedFrame> {
        let _ = gate_rx.recv();
        byte_encoder(task)
    });
    (session, gate_tx)
}

#[test]
fn start_requires_dimensions_then_frames() {
    let mut session = EncodeSession::new(byte_encoder);
    assert!(matches!(session.start(), Err(GifError::MissingDimensions)));
    session.set_width(4).unwrap();
    session.set_height(4).unwrap();
    assert!(matches!(session.start(), Err(GifError::NoFrames)));
    assert_eq!(session.state(), RunState::Idle);
    assert!(matches!(session.wait(), Err(GifError::InvalidState(_))));
}

#[test]
fn first_frame_supplies_missing_dimensions() {
    let mut session = EncodeSession::new(byte_encoder);
    session.set_height(7).unwrap();
    assert_eq!(session.add_frame(pixels(3, 2), &FrameOptions::default()).unwrap(), 1);
    assert_eq!(session.config().width, Some(3));
    assert_eq!(session.config().height, Some(7));
    assert_eq!(session.add_frame(pixels(5, 5), &FrameOptions::default()).unwrap(), 2);
    assert_eq!(session.config().width, Some(3));
}

#[test]
fn zero_dimension_is_rejected() {
    let mut session = EncodeSession::new(byte_encoder);
    assert!(matches!(session.set_width(0), Err(GifError::Validation(_))));
    assert_eq!(session.config().width, None);
}

#[test]
fn configure_json_ignores_unknown_keys() {
    let mut session = EncodeSession::new(byte_encoder);
    session
        .configure_json(&serde_json::json!({
            "workers": 4,
            "globalPalette": true,
            "debug": true,
        }))
        .unwrap();
    assert_eq!(session.config().workers, 4);
    assert!(session.config().global_palette);
    assert!(session.configure_json(&serde_json::json!([1, 2])).is_err());
}

#[test]
fn mutation_during_run_is_rejected() {
    let (mut session, gate) = gated_session();
    session.add_frame(pixels(2, 2), &FrameOptions::default()).unwrap();
    session.start().unwrap();
    assert_eq!(session.state(), RunState::Running);

    assert!(matches!(session.set_width(9), Err(GifError::InvalidState(_))));
    assert!(matches!(
        session.configure(&SessionOptions::default()),
        Err(GifError::InvalidState(_))
    ));
    assert!(matches!(
        session.add_frame(pixels(2, 2), &FrameOptions::default()),
        Err(GifError::InvalidState(_))
    ));
    assert!(matches!(session.start(), Err(GifError::InvalidState(_))));
    assert_eq!(session.frame_count(), 1);

    drop(gate);
    let artifact = session.wait().unwrap();
    assert_eq!(artifact.bytes()[0], 0);
    assert_eq!(session.state(), RunState::Finished);
}

#[test]
fn abort_handle_is_a_no_op_when_idle() {
    let session = EncodeSession::new(byte_encoder);
    let handle = session.abort_handle();
    assert!(!handle.abort());
    assert!(!session.abort());
    assert_eq!(session.state(), RunState::Idle);
}

#[test]
fn session_can_run_again_after_finishing() {
    let mut session = EncodeSession::new(byte_encoder);
    session.add_frame(pixels(2, 2), &FrameOptions::default()).unwrap();
    session.start().unwrap();
    let first = session.wait().unwrap();

    session.add_frame(pixels(2, 2), &FrameOptions::default()).unwrap();
    session.start().unwrap();
    let second = session.wait().unwrap();
    assert_eq!(first.bytes()[0], 0);
    assert_eq!(&second.bytes()[..2], &[0, 1]);
}

#[test]
fn dropping_a_running_session_aborts_it() {
    let (mut session, gate) = gated_session();
    session.add_frame(pixels(2, 2), &FrameOptions::default()).unwrap();
    session.start().unwrap();
    let handle = session.abort_handle();
    drop(session);
    assert!(!handle.abort());
    drop(gate);
}

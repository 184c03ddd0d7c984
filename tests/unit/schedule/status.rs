use super::*;
use crossbeam_channel::bounded;

#[test]
fn begin_rejects_a_second_run() {
    let status = RunStatus::new();
    assert_eq!(status.state(), RunState::Idle);
    let (tx, _rx) = bounded(1);
    status.begin(tx.clone()).unwrap();
    assert!(status.is_running());
    assert!(matches!(status.begin(tx), Err(GifError::InvalidState(_))));
}

#[test]
fn abort_wakes_the_coordinator_once() {
    let status = RunStatus::new();
    let (tx, rx) = bounded(1);
    status.begin(tx).unwrap();

    assert!(status.request_abort());
    assert_eq!(status.state(), RunState::Aborted);
    assert!(rx.try_recv().is_ok());
    assert!(!status.request_abort());
    assert!(rx.try_recv().is_err());
}

#[test]
fn first_terminal_transition_wins() {
    let status = RunStatus::new();
    let (tx, _rx) = bounded(1);
    status.begin(tx).unwrap();
    assert!(status.request_abort());
    assert!(!status.settle(RunState::Finished));
    assert_eq!(status.state(), RunState::Aborted);

    let (tx, _rx) = bounded(1);
    status.begin(tx).unwrap();
    assert!(status.settle(RunState::Finished));
    assert!(!status.request_abort());
    assert_eq!(status.state(), RunState::Finished);
    assert!(status.state().is_terminal());
    assert!(!RunState::Running.is_terminal());
}

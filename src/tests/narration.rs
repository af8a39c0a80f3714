use super::{CommandSpeech, NarrationState, Narrator, Speech};
use crate::error::GuideError;
use std::cell::RefCell;
use std::io;
use std::rc::Rc;
use std::thread;
use std::time::Duration;

#[derive(Default)]
struct Log {
    started: Vec<String>,
    stops: usize,
    finished: bool,
    fail_start: bool,
}

struct FakeSpeech(Rc<RefCell<Log>>);

impl Speech for FakeSpeech {
    fn start(&mut self, text: &str) -> io::Result<()> {
        let mut log = self.0.borrow_mut();
        if log.fail_start {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no espeak"));
        }
        log.started.push(text.to_string());
        log.finished = false;
        Ok(())
    }

    fn stop(&mut self) {
        self.0.borrow_mut().stops += 1;
    }

    fn finished(&mut self) -> bool {
        self.0.borrow().finished
    }
}

fn narrator() -> (Narrator, Rc<RefCell<Log>>) {
    let log = Rc::new(RefCell::new(Log::default()));
    (Narrator::new(Box::new(FakeSpeech(Rc::clone(&log)))), log)
}

#[test]
fn test_start_sets_speaking() {
    let (mut narrator, log) = narrator();
    narrator.start("Welcome. Enjoy. ").unwrap();

    assert!(narrator.is_speaking());
    assert_eq!(log.borrow().started, vec!["Welcome. Enjoy. ".to_string()]);
}

#[test]
fn test_starting_again_cancels_active_narration() {
    let (mut narrator, log) = narrator();
    narrator.start("first").unwrap();
    narrator.start("second").unwrap();

    assert_eq!(log.borrow().stops, 1);
    assert_eq!(log.borrow().started.len(), 2);
    assert!(narrator.is_speaking());
}

#[test]
fn test_blank_text_is_empty_narration() {
    let (mut narrator, log) = narrator();
    let err = narrator.start("   ").unwrap_err();

    assert!(matches!(err, GuideError::EmptyNarration));
    assert!(log.borrow().started.is_empty());
    assert!(!narrator.is_speaking());
}

#[test]
fn test_toggle_stops_when_speaking() {
    let (mut narrator, log) = narrator();
    assert_eq!(
        narrator.toggle(|| Ok("text".to_string())).unwrap(),
        NarrationState::Speaking
    );
    assert_eq!(
        narrator.toggle(|| panic!("text is not needed to stop")).unwrap(),
        NarrationState::Idle
    );
    assert_eq!(log.borrow().stops, 1);
}

#[test]
fn test_natural_end_resets_state_once() {
    let (mut narrator, log) = narrator();
    narrator.start("text").unwrap();
    assert!(!narrator.poll());

    log.borrow_mut().finished = true;
    assert!(narrator.poll());
    assert!(!narrator.is_speaking());
    assert!(!narrator.poll());
}

#[test]
fn test_failed_start_stays_idle() {
    let (mut narrator, log) = narrator();
    log.borrow_mut().fail_start = true;

    let err = narrator.start("text").unwrap_err();
    assert!(matches!(err, GuideError::Speech(_)));
    assert_eq!(narrator.state(), NarrationState::Idle);
}

#[cfg(unix)]
#[test]
fn test_command_speech_reads_long_text_from_stdin() {
    // Larger than the per-argument limit of exec on Linux.
    let page = "Bonjour. ".repeat(30_000);
    let mut speech = CommandSpeech::new("cat", Vec::new());

    speech.start(&page).unwrap();

    let mut finished = false;
    for _ in 0..500 {
        if speech.finished() {
            finished = true;
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert!(finished);
}

#[cfg(unix)]
#[test]
fn test_command_speech_stop_ends_program() {
    let mut speech = CommandSpeech::new("sleep", vec!["30".to_string()]);
    speech.start("ignored").unwrap();
    assert!(!speech.finished());

    speech.stop();

    assert!(speech.finished());
}

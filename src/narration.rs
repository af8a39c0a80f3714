//! Reading a guide aloud.
//!
//! Speech output is a platform capability injected through [`Speech`]: start an utterance, stop
//! it, and report when it is over. [`Narrator`] owns the narration-active flag on top of that
//! capability. Only one utterance plays at a time and the flag always returns to idle when
//! playback ends, whether it finished, failed, or was stopped.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};
use std::thread;

use crate::error::{GuideError, Result};

/// Text-to-speech capability.
pub trait Speech {
    /// Begin speaking `text`.
    ///
    /// # Errors
    ///
    /// Returns an error if playback cannot be started.
    fn start(&mut self, text: &str) -> io::Result<()>;

    /// Cancel the current utterance, if any.
    fn stop(&mut self);

    /// Whether the utterance started last is over, naturally or by error.
    fn finished(&mut self) -> bool;
}

/// Speech through an external program that reads the text from standard input.
///
/// Text is fed from a writer thread so a long page neither hits argument length limits nor
/// blocks the caller while the program is still speaking.
pub struct CommandSpeech {
    program: String,
    args: Vec<String>,
    child: Option<Child>,
}

impl CommandSpeech {
    #[must_use]
    /// Speech via `program` run with `args`, e.g. `espeak --stdin`.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            child: None,
        }
    }
}

impl Speech for CommandSpeech {
    fn start(&mut self, text: &str) -> io::Result<()> {
        self.stop();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()?;
        if let Some(mut stdin) = child.stdin.take() {
            let text = text.to_string();
            thread::spawn(move || {
                // Fails with a broken pipe once the program is stopped early.
                if let Err(e) = stdin.write_all(text.as_bytes()) {
                    tracing::debug!(error = %e, "Speech input closed early");
                }
            });
        }
        tracing::debug!(program = %self.program, pid = child.id(), "Started narration");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            // The child may already have exited; either way it must be reaped.
            let _ = child.kill();
            let _ = child.wait();
        }
    }

    fn finished(&mut self) -> bool {
        let Some(child) = self.child.as_mut() else {
            return true;
        };
        match child.try_wait() {
            Ok(None) => false,
            Ok(Some(status)) => {
                if !status.success() {
                    tracing::warn!(%status, "Speech program exited with an error");
                }
                self.child = None;
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Lost track of speech program");
                self.child = None;
                true
            }
        }
    }
}

impl Drop for CommandSpeech {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Whether narration is active.
pub enum NarrationState {
    /// Nothing is being read.
    Idle,
    /// An utterance is playing.
    Speaking,
}

/// Narration-active state over an injected [`Speech`] capability.
pub struct Narrator {
    speech: Box<dyn Speech>,
    state: NarrationState,
}

impl Narrator {
    #[must_use]
    /// Idle narrator over `speech`.
    pub fn new(speech: Box<dyn Speech>) -> Self {
        Self {
            speech,
            state: NarrationState::Idle,
        }
    }

    #[must_use]
    /// Current narration state.
    pub fn state(&self) -> NarrationState {
        self.state
    }

    #[must_use]
    /// Whether an utterance is playing.
    pub fn is_speaking(&self) -> bool {
        self.state == NarrationState::Speaking
    }

    /// Speak `text`, cancelling whatever is playing first.
    ///
    /// # Errors
    ///
    /// Returns `EmptyNarration` for blank text and `Speech` if playback cannot start.
    pub fn start(&mut self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(GuideError::EmptyNarration);
        }
        self.stop();
        self.speech.start(text).map_err(GuideError::Speech)?;
        self.state = NarrationState::Speaking;
        Ok(())
    }

    /// Cancel playback and return to idle.
    pub fn stop(&mut self) {
        if self.is_speaking() {
            self.speech.stop();
        }
        self.state = NarrationState::Idle;
    }

    /// Stop when speaking, otherwise speak the text produced by `text`.
    ///
    /// # Errors
    ///
    /// Propagates errors from `text` and from [`Narrator::start`].
    pub fn toggle(&mut self, text: impl FnOnce() -> Result<String>) -> Result<NarrationState> {
        if self.is_speaking() {
            self.stop();
        } else {
            self.start(&text()?)?;
        }
        Ok(self.state)
    }

    /// Check for the end of playback; returns true when narration has just ended.
    pub fn poll(&mut self) -> bool {
        if self.is_speaking() && self.speech.finished() {
            self.state = NarrationState::Idle;
            return true;
        }
        false
    }
}

#[cfg(test)]
#[path = "tests/narration.rs"]
mod tests;

//! Scripted recognizer for pipeline tests

use std::collections::VecDeque;

use crate::{SpeechRecognizer, SttError};

enum Scripted {
    Text(String),
    Failure(String),
}

/// Test double that replays a fixed sequence of transcripts.
///
/// Each `transcribe` call pops the next entry; an exhausted script yields
/// empty text, the same way a real engine responds to silence. Window
/// lengths are recorded so tests can assert what audio actually reached
/// the recognizer.
#[derive(Default)]
pub struct ScriptedRecognizer {
    script: VecDeque<Scripted>,
    received_window_lens: Vec<usize>,
}

impl ScriptedRecognizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transcripts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut mock = Self::new();
        for text in texts {
            mock.push_text(text);
        }
        mock
    }

    pub fn push_text(&mut self, text: impl Into<String>) {
        self.script.push_back(Scripted::Text(text.into()));
    }

    pub fn push_failure(&mut self, message: impl Into<String>) {
        self.script.push_back(Scripted::Failure(message.into()));
    }

    pub fn received_window_lens(&self) -> &[usize] {
        &self.received_window_lens
    }

    pub fn calls(&self) -> usize {
        self.received_window_lens.len()
    }
}

impl SpeechRecognizer for ScriptedRecognizer {
    fn transcribe(&mut self, samples: &[f32]) -> Result<String, SttError> {
        self.received_window_lens.push(samples.len());
        match self.script.pop_front() {
            Some(Scripted::Text(text)) => Ok(text),
            Some(Scripted::Failure(message)) => Err(SttError::Transcription(message)),
            None => Ok(String::new()),
        }
    }
}

use std::time::SystemTime;

use tracing::{debug, info};

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::evaluator::{evaluate_final, evaluate_live, WordState};
use crate::stats::{self, Stats};
use crate::word_generator::{WordGenerator, DEFAULT_WORD_COUNT};

/// Character that submits the active word
pub const DELIMITER: char = ' ';

/// Durations, in seconds, a session can be run for
pub const TIME_OPTIONS: [u64; 4] = [15, 30, 60, 120];

pub const DEFAULT_SECS: u64 = 30;

pub fn validate_duration(secs: u64) -> Result<u64> {
    if TIME_OPTIONS.contains(&secs) {
        Ok(secs)
    } else {
        Err(Error::UnsupportedDuration(secs))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub number_of_words: usize,
    pub secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            number_of_words: DEFAULT_WORD_COUNT,
            secs: DEFAULT_SECS,
        }
    }
}

/// Countdown state. `running` and `finished` are never both set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    pub selected_secs: u64,
    pub remaining_secs: u64,
    pub running: bool,
    pub finished: bool,
}

impl TimerState {
    pub fn new(secs: u64) -> Self {
        Self {
            selected_secs: secs,
            remaining_secs: secs,
            running: false,
            finished: false,
        }
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.selected_secs.saturating_sub(self.remaining_secs)
    }

    fn finish(&mut self) {
        self.running = false;
        self.finished = true;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

/// Keys the session reacts to besides plain text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// restart with the current duration
    Tab,
    Backspace,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Full contents of the text field after a keystroke
    TextInput(String),
    Key(Key),
    Tick,
    ChangeDuration(u64),
}

/// Result of applying one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// false when the event was ignored
    pub handled: bool,
}

/// One typing test: the words, their evaluation, the cursor, the counters and the countdown
#[derive(Debug, Clone)]
pub struct Session {
    generator: WordGenerator,
    number_of_words: usize,
    words: Vec<String>,
    word_states: Vec<WordState>,
    active_word: usize,
    active_char: usize,
    input: String,
    timer: TimerState,
    correct_chars: usize,
    incorrect_chars: usize,
    total_keystrokes: usize,
    started_at: Option<SystemTime>,
}

impl Session {
    pub fn new(generator: WordGenerator, config: SessionConfig) -> Self {
        let mut session = Self {
            generator,
            number_of_words: config.number_of_words.max(1),
            words: vec![],
            word_states: vec![],
            active_word: 0,
            active_char: 0,
            input: String::new(),
            timer: TimerState::new(config.secs),
            correct_chars: 0,
            incorrect_chars: 0,
            total_keystrokes: 0,
            started_at: None,
        };
        session.initialize(config.secs);
        session
    }

    /// Session over a fixed word sequence, in order. Restarts draw randomly from these words.
    pub fn from_words(words: Vec<String>, secs: u64) -> Result<Self> {
        let dictionary = Dictionary::from_words("custom", words.clone())?;
        let mut session = Self::new(
            WordGenerator::new(dictionary),
            SessionConfig {
                number_of_words: words.len(),
                secs,
            },
        );
        session.word_states = words.iter().map(|w| WordState::pending(w)).collect();
        session.words = words;
        Ok(session)
    }

    /// Fresh words, cleared counters, idle timer set to `secs`. Valid from any phase.
    pub fn initialize(&mut self, secs: u64) {
        self.words = self.generator.generate(self.number_of_words);
        self.word_states = self.words.iter().map(|w| WordState::pending(w)).collect();
        self.active_word = 0;
        self.active_char = 0;
        self.input.clear();
        self.timer = TimerState::new(secs);
        self.correct_chars = 0;
        self.incorrect_chars = 0;
        self.total_keystrokes = 0;
        self.started_at = None;
        debug!(secs, words = self.words.len(), "session initialized");
    }

    pub fn restart(&mut self) {
        self.initialize(self.timer.selected_secs);
    }

    pub fn change_duration(&mut self, secs: u64) -> Result<()> {
        let secs = validate_duration(secs)?;
        self.initialize(secs);
        Ok(())
    }

    /// Handles the new contents of the text field. Returns false when ignored.
    pub fn handle_text_input(&mut self, value: &str) -> bool {
        if self.timer.finished {
            return false;
        }
        let Some(target) = self.words.get(self.active_word).cloned() else {
            return false;
        };

        if !self.timer.running {
            self.timer.running = true;
            self.started_at = Some(SystemTime::now());
            info!(secs = self.timer.selected_secs, "session started");
        }

        self.total_keystrokes += 1;

        if value.ends_with(DELIMITER) {
            self.submit_word(&target, value.trim());
            return true;
        }

        self.input = value.to_string();
        self.active_char = value.chars().count();
        self.word_states[self.active_word] = evaluate_live(&target, value);
        true
    }

    fn submit_word(&mut self, target: &str, typed: &str) {
        let (state, tally) = evaluate_final(target, typed);
        debug!(
            word = self.active_word,
            expected = target,
            typed,
            has_error = state.has_error,
            "word submitted"
        );

        self.correct_chars += tally.correct + 1; // the delimiter itself
        self.incorrect_chars += tally.incorrect;
        self.word_states[self.active_word] = state;

        self.active_word += 1;
        self.active_char = 0;
        self.input.clear();

        if self.active_word == self.words.len() {
            self.timer.finish();
            self.log_finished("word list exhausted");
        }
    }

    /// Handles a special key. Returns true when the key was consumed and the
    /// caller should not also apply its default editing behaviour.
    pub fn handle_key_event(&mut self, key: Key) -> bool {
        match key {
            Key::Tab => {
                self.restart();
                true
            }
            Key::Backspace => self.uncommit_previous_word(),
            Key::Other => false,
        }
    }

    /// Deletion on an empty buffer steps back into the previous word, with
    /// the buffer refilled with that word's target text.
    ///
    /// Counters added when that word was submitted are left as they are.
    fn uncommit_previous_word(&mut self) -> bool {
        if self.timer.finished || !self.input.is_empty() || self.active_word == 0 {
            return false;
        }

        self.active_word -= 1;
        let target = &self.words[self.active_word];

        self.active_char = target.chars().count();
        self.input = target.clone();
        self.word_states[self.active_word] = WordState::reverted(target);
        debug!(word = self.active_word, "word reopened for editing");
        true
    }

    /// Advances the countdown by one second. Returns false when the timer is not running.
    pub fn tick(&mut self) -> bool {
        if !self.timer.running {
            return false;
        }

        if self.timer.remaining_secs <= 1 {
            self.timer.remaining_secs = 0;
            self.timer.finish();
            self.log_finished("time up");
        } else {
            self.timer.remaining_secs -= 1;
        }
        true
    }

    pub fn apply(&mut self, event: SessionEvent) -> Result<Transition> {
        let from = self.phase();
        let handled = match event {
            SessionEvent::TextInput(value) => self.handle_text_input(&value),
            SessionEvent::Key(key) => self.handle_key_event(key),
            SessionEvent::Tick => self.tick(),
            SessionEvent::ChangeDuration(secs) => {
                self.change_duration(secs)?;
                true
            }
        };
        Ok(Transition {
            from,
            to: self.phase(),
            handled,
        })
    }

    fn log_finished(&self, reason: &str) {
        let stats = self.stats();
        info!(
            reason,
            wpm = stats.wpm,
            raw_wpm = stats.raw_wpm,
            accuracy = stats.accuracy,
            words = self.active_word,
            "session finished"
        );
    }

    pub fn phase(&self) -> Phase {
        if self.timer.finished {
            Phase::Finished
        } else if self.timer.running {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    /// Whether the host should be delivering one-second ticks
    pub fn timer_should_run(&self) -> bool {
        self.timer.running && !self.timer.finished
    }

    pub fn stats(&self) -> Stats {
        stats::calculate(
            self.timer.selected_secs,
            self.timer.remaining_secs,
            self.correct_chars,
            self.incorrect_chars,
            self.total_keystrokes,
        )
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn word_states(&self) -> &[WordState] {
        &self.word_states
    }

    pub fn active_word(&self) -> usize {
        self.active_word
    }

    pub fn active_char(&self) -> usize {
        self.active_char
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn timer(&self) -> TimerState {
        self.timer
    }

    pub fn correct_chars(&self) -> usize {
        self.correct_chars
    }

    pub fn incorrect_chars(&self) -> usize {
        self.incorrect_chars
    }

    pub fn total_keystrokes(&self) -> usize {
        self.total_keystrokes
    }

    pub fn started_at(&self) -> Option<SystemTime> {
        self.started_at
    }
}

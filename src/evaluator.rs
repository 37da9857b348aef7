//! Per-keystroke diffing of the typed input against the active target word.
//!
//! Every evaluation rebuilds the word's cells from the target; nothing is
//! patched incrementally. Live evaluation runs on every input change and
//! leaves the session counters alone. Final evaluation runs once, when the
//! word is submitted, and reports the tallies the session adds to its counters.

#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum CharacterState {
    Pending,
    Correct,
    Incorrect,
    Extra,
}

impl CharacterState {
    pub fn is_error(self) -> bool {
        matches!(self, CharacterState::Incorrect | CharacterState::Extra)
    }
}

/// One rendered character: the expected char, or the typed char for `Extra`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CharCell {
    pub char: char,
    pub state: CharacterState,
}

impl CharCell {
    pub fn new(char: char, state: CharacterState) -> Self {
        Self { char, state }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WordState {
    pub chars: Vec<CharCell>,
    pub completed: bool,
    pub has_error: bool,
}

impl WordState {
    /// Fresh state for a word nobody has typed yet
    pub fn pending(target: &str) -> Self {
        Self {
            chars: target
                .chars()
                .map(|c| CharCell::new(c, CharacterState::Pending))
                .collect(),
            completed: false,
            has_error: false,
        }
    }

    /// A submitted word pulled back for editing with the buffer refilled
    /// with the target itself, so every character compares as correct.
    pub fn reverted(target: &str) -> Self {
        Self {
            chars: target
                .chars()
                .map(|c| CharCell::new(c, CharacterState::Correct))
                .collect(),
            completed: false,
            has_error: false,
        }
    }

    pub fn states(&self) -> Vec<CharacterState> {
        self.chars.iter().map(|c| c.state).collect()
    }

    fn refresh_error_flag(&mut self) {
        self.has_error = self.chars.iter().any(|c| c.state.is_error());
    }
}

/// Characters classified by a final evaluation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub correct: usize,
    pub incorrect: usize,
}

fn classify(target: &[char], input: &str) -> Vec<CharCell> {
    let mut cells: Vec<CharCell> = target
        .iter()
        .map(|&c| CharCell::new(c, CharacterState::Pending))
        .collect();

    for (idx, typed) in input.chars().enumerate() {
        match target.get(idx) {
            Some(&expected) if expected == typed => {
                cells[idx] = CharCell::new(expected, CharacterState::Correct)
            }
            Some(&expected) => cells[idx] = CharCell::new(expected, CharacterState::Incorrect),
            None => cells.push(CharCell::new(typed, CharacterState::Extra)),
        }
    }

    cells
}

/// Recomputes the active word from the partial input. Untyped characters stay pending.
pub fn evaluate_live(target: &str, input: &str) -> WordState {
    let target: Vec<char> = target.chars().collect();
    let mut state = WordState {
        chars: classify(&target, input),
        completed: false,
        has_error: false,
    };
    state.refresh_error_flag();
    state
}

/// Evaluates a submitted word. `typed` excludes the delimiter.
///
/// Target characters the input never reached count as incorrect, so the
/// returned state has no pending cells.
pub fn evaluate_final(target: &str, typed: &str) -> (WordState, Tally) {
    let target: Vec<char> = target.chars().collect();
    let mut chars = classify(&target, typed);

    for cell in chars.iter_mut() {
        if cell.state == CharacterState::Pending {
            cell.state = CharacterState::Incorrect;
        }
    }

    let tally = chars.iter().fold(Tally::default(), |mut tally, cell| {
        if cell.state == CharacterState::Correct {
            tally.correct += 1;
        } else {
            tally.incorrect += 1;
        }
        tally
    });

    let mut state = WordState {
        chars,
        completed: true,
        has_error: false,
    };
    state.refresh_error_flag();

    (state, tally)
}

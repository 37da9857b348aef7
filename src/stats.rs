/// Characters per "word" in the WPM convention
pub const CHARS_PER_WORD: f64 = 5.0;

/// Live and final results of a session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub wpm: u32,
    pub accuracy: u32,
    pub raw_wpm: u32,
}

/// Derives the stats from the timer and the session counters.
///
/// No time elapsed yields zero WPM; no evaluated characters yields 100% accuracy.
pub fn calculate(
    selected_secs: u64,
    remaining_secs: u64,
    correct_chars: usize,
    incorrect_chars: usize,
    total_keystrokes: usize,
) -> Stats {
    let elapsed_secs = selected_secs.saturating_sub(remaining_secs);
    let minutes = elapsed_secs as f64 / 60.0;

    let per_minute = |chars: usize| -> u32 {
        if minutes > 0.0 {
            (chars as f64 / CHARS_PER_WORD / minutes).round() as u32
        } else {
            0
        }
    };

    let evaluated = correct_chars + incorrect_chars;
    let accuracy = if evaluated > 0 {
        (correct_chars as f64 / evaluated as f64 * 100.0).round() as u32
    } else {
        100
    };

    Stats {
        wpm: per_minute(correct_chars),
        accuracy,
        raw_wpm: per_minute(total_keystrokes),
    }
}

mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use keytype::{
    app_dirs::AppDirs,
    config::{Config, ConfigStore, FileConfigStore},
    dictionary::Dictionary,
    logging,
    runtime::{AppEvent, CrosstermEventSource, FixedTicker, Runner},
    session::{self, Key, Phase, Session, SessionConfig, TIME_OPTIONS},
    word_generator::WordGenerator,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
};
use tracing::{info, warn};

/// timed typing test with live per-character feedback
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "A timed typing test. Type the random words shown, space submits a word, and the test reports wpm, raw wpm and accuracy when the clock runs out."
)]
pub struct Cli {
    /// number of seconds to run the test (15, 30, 60 or 120)
    #[clap(short = 's', long, value_parser = parse_secs)]
    secs: Option<u64>,

    /// number of words generated for each test
    #[clap(short = 'w', long, value_parser = parse_word_count)]
    number_of_words: Option<usize>,

    /// do not remember duration changes made inside the app
    #[clap(long)]
    no_save: bool,
}

fn parse_secs(s: &str) -> Result<u64, String> {
    let secs = s.parse::<u64>().map_err(|err| err.to_string())?;
    session::validate_duration(secs).map_err(|err| err.to_string())
}

fn parse_word_count(s: &str) -> Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("at least one word is required".to_string()),
        Ok(n) => Ok(n),
        Err(err) => Err(err.to_string()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug)]
pub struct App {
    pub session: Session,
    /// Preferences as stored on disk; command line overrides never land here
    pub config: Config,
    store: Option<FileConfigStore>,
}

impl App {
    pub fn new(session: Session, config: Config, store: Option<FileConfigStore>) -> Self {
        Self {
            session,
            config,
            store,
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => return Control::Quit,
            KeyCode::Char('c') if ctrl => return Control::Quit,
            KeyCode::Tab => {
                self.session.handle_key_event(Key::Tab);
            }
            KeyCode::Backspace => {
                if !self.session.handle_key_event(Key::Backspace) {
                    self.delete_char();
                }
            }
            KeyCode::Left => self.cycle_duration(false),
            KeyCode::Right => self.cycle_duration(true),
            KeyCode::Char(c) if !ctrl => {
                let mut value = self.session.input().to_string();
                value.push(c);
                self.session.handle_text_input(&value);
            }
            _ => {
                self.session.handle_key_event(Key::Other);
            }
        }
        Control::Continue
    }

    fn delete_char(&mut self) {
        if self.session.phase() == Phase::Finished || self.session.input().is_empty() {
            return;
        }
        let mut value = self.session.input().to_string();
        value.pop();
        self.session.handle_text_input(&value);
    }

    fn cycle_duration(&mut self, forward: bool) {
        let current = self.session.timer().selected_secs;
        let idx = TIME_OPTIONS
            .iter()
            .position(|secs| *secs == current)
            .unwrap_or(0);
        let next = if forward {
            (idx + 1) % TIME_OPTIONS.len()
        } else {
            (idx + TIME_OPTIONS.len() - 1) % TIME_OPTIONS.len()
        };

        if let Err(err) = self.session.change_duration(TIME_OPTIONS[next]) {
            warn!(%err, "duration change rejected");
            return;
        }
        self.config.secs = TIME_OPTIONS[next];

        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.config) {
                warn!(%err, path = %store.path().display(), "failed to save config");
            }
        }
    }
}

impl Cli {
    /// Session settings for this run: stored preferences with flags on top
    fn session_config(&self, stored: Config) -> SessionConfig {
        SessionConfig {
            secs: self.secs.unwrap_or(stored.secs),
            number_of_words: self.number_of_words.unwrap_or(stored.number_of_words),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = AppDirs::log_path() {
        if let Err(err) = logging::init(&path) {
            eprintln!("keytype: logging disabled: {err}");
        }
    }

    let store = FileConfigStore::new();
    let config = store.load();
    let session_config = cli.session_config(config);

    let generator = WordGenerator::new(Dictionary::common()?);
    let session = Session::new(generator, session_config);
    let mut app = App::new(session, config, (!cli.no_save).then_some(store));
    info!(
        secs = session_config.secs,
        words = session_config.number_of_words,
        "starting"
    );

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(CrosstermEventSource::new(), FixedTicker::default());
    let mut ticking = app.session.timer_should_run();

    terminal.draw(|f| f.render_widget(&*app, f.area()))?;

    loop {
        match runner.step() {
            AppEvent::Tick => {
                if !app.session.tick() {
                    continue;
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
        }

        // the countdown interval restarts whenever the session starts running
        let should_tick = app.session.timer_should_run();
        if should_tick && !ticking {
            runner.reset_ticks();
        }
        ticking = should_tick;

        terminal.draw(|f| f.render_widget(&*app, f.area()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use keytype::evaluator::CharacterState;

    fn create_test_app(words: &[&str]) -> App {
        let session =
            Session::from_words(words.iter().map(|w| w.to_string()).collect(), 30).unwrap();
        App::new(session, Config::default(), None)
    }

    fn press(app: &mut App, code: KeyCode) -> Control {
        app.on_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["keytype"]);
        assert_eq!(cli.secs, None);
        assert_eq!(cli.number_of_words, None);
        assert!(!cli.no_save);
    }

    #[test]
    fn test_cli_accepts_supported_durations() {
        let cli = Cli::parse_from(["keytype", "-s", "60", "-w", "20"]);
        assert_eq!(cli.secs, Some(60));
        assert_eq!(cli.number_of_words, Some(20));
    }

    #[test]
    fn test_cli_rejects_unsupported_duration() {
        assert!(Cli::try_parse_from(["keytype", "--secs", "45"]).is_err());
        assert!(Cli::try_parse_from(["keytype", "--secs", "abc"]).is_err());
    }

    #[test]
    fn test_cli_rejects_zero_words() {
        assert!(Cli::try_parse_from(["keytype", "-w", "0"]).is_err());
    }

    #[test]
    fn test_typing_a_word() {
        let mut app = create_test_app(&["the", "be"]);

        type_str(&mut app, "the ");

        assert_eq!(app.session.active_word(), 1);
        assert_eq!(app.session.phase(), Phase::Running);
        assert!(!app.session.word_states()[0].has_error);
    }

    #[test]
    fn test_backspace_deletes_last_char() {
        let mut app = create_test_app(&["the", "be"]);
        type_str(&mut app, "tx");

        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.session.input(), "t");
        assert_eq!(
            app.session.word_states()[0].states(),
            vec![
                CharacterState::Correct,
                CharacterState::Pending,
                CharacterState::Pending
            ]
        );
    }

    #[test]
    fn test_backspace_at_boundary_reopens_word() {
        let mut app = create_test_app(&["the", "be"]);
        type_str(&mut app, "teh ");

        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.session.active_word(), 0);
        assert_eq!(app.session.input(), "the");

        // a further backspace edits the reopened word
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.session.active_word(), 0);
        assert_eq!(app.session.input(), "th");
    }

    #[test]
    fn test_tab_restarts() {
        let mut app = create_test_app(&["the", "be"]);
        type_str(&mut app, "th");

        press(&mut app, KeyCode::Tab);

        assert_eq!(app.session.phase(), Phase::Idle);
        assert_eq!(app.session.input(), "");
    }

    #[test]
    fn test_arrows_cycle_duration() {
        let mut app = create_test_app(&["the"]);

        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.timer().selected_secs, 60);
        assert_eq!(app.config.secs, 60);

        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.session.timer().selected_secs, 15);

        press(&mut app, KeyCode::Left);
        assert_eq!(app.session.timer().selected_secs, 120);
    }

    #[test]
    fn test_cli_overrides_are_not_saved() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileConfigStore::with_path(dir.path().join("config.json"));
        let stored = Config {
            secs: 30,
            number_of_words: 100,
        };
        store.save(&stored).unwrap();

        let cli = Cli::parse_from(["keytype", "-w", "5", "-s", "15"]);
        let session_config = cli.session_config(store.load());
        assert_eq!(session_config.number_of_words, 5);
        assert_eq!(session_config.secs, 15);

        let session = Session::new(
            WordGenerator::new(Dictionary::common().unwrap()),
            session_config,
        );
        let mut app = App::new(session, store.load(), Some(store.clone()));
        assert_eq!(app.session.words().len(), 5);

        press(&mut app, KeyCode::Right);

        assert_eq!(app.session.timer().selected_secs, 30);
        assert_eq!(
            store.load(),
            Config {
                secs: 30,
                number_of_words: 100,
            }
        );

        press(&mut app, KeyCode::Right);
        assert_eq!(store.load().secs, 60);
        assert_eq!(store.load().number_of_words, 100);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = create_test_app(&["the"]);

        assert_eq!(press(&mut app, KeyCode::Esc), Control::Quit);
        assert_eq!(
            app.on_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Control::Quit
        );
        assert_eq!(press(&mut app, KeyCode::Char('c')), Control::Continue);
    }

    #[test]
    fn test_keys_after_finish_leave_session_alone() {
        let mut app = create_test_app(&["a"]);
        type_str(&mut app, "a ");
        assert_eq!(app.session.phase(), Phase::Finished);

        type_str(&mut app, "xyz");
        press(&mut app, KeyCode::Backspace);

        assert_eq!(app.session.total_keystrokes(), 2);
        assert_eq!(app.session.input(), "");
    }
}

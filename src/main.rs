mod app;
mod config;
mod notify;
mod phrase;
mod theme;
mod ui;
mod wordlist;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{
        self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use config::AppConfig;
use phrase::{EmptyListPolicy, Phrase, SubmitOutcome, PHRASE_LEN};
use theme::Theme;
use wordlist::{WordList, WordListSource};

#[derive(Parser, Debug)]
#[command(name = "seedcheck")]
#[command(version = "0.1.0")]
#[command(about = "Enter a 12-word recovery phrase and check it against a word list")]
struct Args {
    /// Check a phrase without the TUI and print a JSON report (reads stdin when no words are given)
    #[arg(short, long)]
    check: bool,

    /// Words to check (with --check)
    #[arg(requires = "check")]
    words: Vec<String>,

    /// Newline-delimited word list to use instead of the bundled BIP-39 English list
    #[arg(short, long, value_name = "PATH")]
    wordlist: Option<PathBuf>,

    /// Alternate config file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.check);

    let mut config = match &args.config {
        Some(path) => AppConfig::load_from(path)?,
        None => AppConfig::load().unwrap_or_default(),
    };
    if let Some(path) = args.wordlist {
        config.wordlist_path = Some(path);
    }
    let source = WordListSource::from_path(config.wordlist_path.clone());

    // CLI-only mode
    if args.check {
        return check_phrase(&config, &source, &args.words).await;
    }

    ui::init_theme(Theme::from_config(&config.theme));
    run_tui(config, source).await
}

/// Log to stderr in --check mode. The TUI owns the screen, so there logs go
/// to a file in the data directory (or nowhere if it can't be opened).
fn init_logging(to_stderr: bool) {
    if to_stderr {
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .with(tracing_subscriber::EnvFilter::from_default_env())
            .init();
        return;
    }

    match open_log_file() {
        Ok(file) => {
            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(Mutex::new(file))
                        .with_ansi(false),
                )
                .with(tracing_subscriber::EnvFilter::from_default_env())
                .init();
        }
        Err(e) => eprintln!("seedcheck: logging disabled: {:#}", e),
    }
}

fn open_log_file() -> Result<std::fs::File> {
    let log_dir = dirs::data_dir()
        .ok_or_else(|| anyhow::anyhow!("Could not find data directory"))?
        .join("seedcheck");
    std::fs::create_dir_all(&log_dir).context("Could not create data directory")?;

    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("seedcheck.log"))
        .context("Could not open log file")
}

async fn check_phrase(config: &AppConfig, source: &WordListSource, words: &[String]) -> Result<()> {
    let input = read_phrase(words, tokio::io::stdin()).await?;
    let wordlist = wordlist::load_source(source).await;

    let (report, outcome) =
        check_report(&input, &wordlist, config.empty_list_policy(), &source.describe());
    println!("{}", serde_json::to_string(&report)?);

    if !outcome.is_accepted() {
        anyhow::bail!("{}", outcome.headline());
    }
    Ok(())
}

/// Words from the command line, or all of `stdin` when none were given
async fn read_phrase<R: AsyncRead + Unpin>(words: &[String], mut stdin: R) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .await
        .context("Failed to read phrase from stdin")?;
    Ok(buf)
}

/// JSON report for `--check`. Slot numbers in the report are 1-based.
fn check_report(
    input: &str,
    wordlist: &WordList,
    policy: EmptyListPolicy,
    wordlist_name: &str,
) -> (serde_json::Value, SubmitOutcome) {
    let tokens: Vec<&str> = input.split_whitespace().collect();
    let entered = Phrase::from_words(tokens.iter().copied());

    let outcome = if tokens.len() > PHRASE_LEN {
        SubmitOutcome::TooManyWords { count: tokens.len() }
    } else {
        phrase::check_submission(&entered, wordlist, policy)
    };
    let flags = phrase::validate(&entered, wordlist);

    let one_based = |pred: &dyn Fn(usize) -> bool| -> Vec<usize> {
        (0..PHRASE_LEN).filter(|&i| pred(i)).map(|i| i + 1).collect()
    };

    let report = serde_json::json!({
        "accepted": outcome.is_accepted(),
        "outcome": outcome,
        "invalid_slots": one_based(&|i: usize| flags[i]),
        "empty_slots": one_based(&|i: usize| entered.is_slot_empty(i)),
        "word_count": tokens.len(),
        "wordlist": wordlist_name,
        "wordlist_size": wordlist.len(),
    });
    (report, outcome)
}

async fn run_tui(config: AppConfig, source: WordListSource) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Word list loads in the background
    tracing::info!("Starting seedcheck with word list: {}", source.describe());
    let mut app = App::new(config, source);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if key.modifiers.contains(KeyModifiers::CONTROL)
                        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
                    {
                        return Ok(());
                    }
                    app.handle_key(key);
                }
                Event::Mouse(mouse) if mouse.kind == MouseEventKind::Down(MouseButton::Left) => {
                    let size = terminal.size()?;
                    let area = Rect::new(0, 0, size.width, size.height);
                    if let Some(hit) = ui::hit_test(app, area, mouse.column, mouse.row) {
                        app.handle_click(hit);
                    }
                }
                Event::Paste(text) => app.handle_paste(&text),
                _ => {}
            }
        }

        // Let the loader task and status timer make progress
        app.tick();
        tokio::task::yield_now().await;
    }
}

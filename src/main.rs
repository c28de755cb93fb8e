mod app;
mod config;
mod engine;
mod event;
mod generator;
mod session;
mod store;
mod ui;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use generator::fetch::StoryFetcher;
use generator::story::{OfflineSource, StorySource};
use session::daily::DailyPhase;
use store::ScoreStore;
use store::json_store::{JsonStore, default_data_dir};
use store::memory::MemoryStore;
use ui::components::problem_card::ProblemCard;
use ui::components::story_card::StoryCard;
use ui::layout::{AppLayout, pack_hint_lines};
use ui::theme::Theme;

#[derive(Parser)]
#[command(name = "iga-neza", version, about = "Arithmetic practice with daily story problems")]
struct Cli {
    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Never contact the story API; always use the built-in problem")]
    offline: bool,

    #[arg(long, help = "Directory for the score file and log")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let data_dir = cli.data_dir.clone().unwrap_or_else(default_data_dir);
    init_logging(&data_dir);

    let mut config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "config unreadable, using defaults");
        Config::default()
    });
    if let Some(theme_name) = cli.theme {
        config.theme = theme_name;
    }
    let theme: &'static Theme = Box::leak(Box::new(
        Theme::load(&config.theme).unwrap_or_default(),
    ));

    let store: Box<dyn ScoreStore> = match JsonStore::with_base_dir(data_dir) {
        Ok(store) => Box::new(store),
        Err(err) => {
            warn!(error = %err, "no data dir, score will not be saved");
            Box::new(MemoryStore::new())
        }
    };

    let events = EventHandler::new(Duration::from_millis(100));
    let fetcher = StoryFetcher::new(build_source(&config, cli.offline), events.sender());
    let mut app = App::new(config, theme, store, fetcher);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }
    info!(total = app.total_score(), "exiting");

    Ok(())
}

/// Log to a file next to the score so output never lands on the TUI.
fn init_logging(data_dir: &Path) {
    if fs::create_dir_all(data_dir).is_err() {
        return;
    }
    let Ok(file) = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join("iga-neza.log"))
    else {
        return;
    };
    let filter = EnvFilter::try_from_env("IGA_NEZA_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn build_source(config: &Config, offline: bool) -> Option<Arc<dyn StorySource>> {
    if offline {
        return Some(Arc::new(OfflineSource));
    }
    let settings = config.gemini_settings()?;
    network_source(settings)
}

#[cfg(feature = "network")]
fn network_source(
    settings: generator::gemini::GeminiSettings,
) -> Option<Arc<dyn StorySource>> {
    match generator::gemini::GeminiSource::new(settings) {
        Ok(source) => Some(Arc::new(source)),
        Err(err) => {
            warn!(error = %err, "could not build HTTP client");
            None
        }
    }
}

#[cfg(not(feature = "network"))]
fn network_source(
    _settings: generator::gemini::GeminiSettings,
) -> Option<Arc<dyn StorySource>> {
    Some(Arc::new(OfflineSource))
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.on_tick(Instant::now()),
            AppEvent::Story(reply) => app.handle_story_reply(reply),
            AppEvent::Resize(_, _) => {}
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Drill => handle_drill_key(app, key),
        AppScreen::Daily => handle_daily_key(app, key),
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu.prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu.next(),
        KeyCode::Enter => {
            let action = app.menu.selected_action();
            app.select(action);
        }
        KeyCode::Char(ch) => {
            if let Some(action) = app.menu.action_for_key(ch) {
                app.select(action);
            }
        }
        _ => {}
    }
}

fn handle_drill_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => app.submit(Instant::now()),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_daily_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.go_to_menu(),
        KeyCode::Enter => app.submit(Instant::now()),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Char('h') | KeyCode::Char('?') => app.request_explanation(),
        KeyCode::Char('r') => app.retry_daily_load(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    let layout = AppLayout::new(area);
    render_header(frame, app, layout.header);

    let main = ui::layout::centered_rect(60, 90, layout.main);
    match app.screen {
        AppScreen::Menu => frame.render_widget(&app.menu, main),
        AppScreen::Drill => {
            if let Some(ref drill) = app.drill {
                frame.render_widget(ProblemCard::new(drill, app.theme), main);
            }
        }
        AppScreen::Daily => {
            if let Some(ref daily) = app.daily {
                frame.render_widget(StoryCard::new(daily, app.tick_count, app.theme), main);
            }
        }
    }

    let hints = footer_hints(app);
    let lines = pack_hint_lines(&hints, layout.footer.width as usize);
    let footer = Paragraph::new(
        lines
            .into_iter()
            .take(1)
            .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.muted()))))
            .collect::<Vec<_>>(),
    );
    frame.render_widget(footer, layout.footer);
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " Iga Neza ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "Math Whiz",
            Style::default()
                .fg(colors.score())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" | Total score {}", app.total_score()),
            Style::default().fg(colors.muted()).bg(colors.header_bg()),
        ),
    ]))
    .block(Block::bordered().border_style(Style::default().fg(colors.border())))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

fn footer_hints(app: &App) -> Vec<&'static str> {
    match app.screen {
        AppScreen::Menu => vec!["[1-4] Drill", "[5] Daily problem", "[j/k] Move", "[Enter] Start", "[q] Quit"],
        AppScreen::Drill => vec!["[Enter] Check answer", "[Backspace] Delete", "[Esc] Menu"],
        AppScreen::Daily => {
            let mut hints = vec!["[Esc] Menu"];
            if let Some(ref daily) = app.daily {
                if matches!(daily.phase(), DailyPhase::Ready | DailyPhase::AwaitingRetry) {
                    hints.insert(0, "[Enter] Check answer");
                }
                if daily.can_explain() {
                    hints.push("[h] Explain");
                }
                if daily.can_retry_load() {
                    hints.push("[r] Retry");
                }
            }
            hints
        }
    }
}

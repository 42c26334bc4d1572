use anyhow::{Context, Result};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::{io, time::Duration};

use crate::directory::{self, Station};
use crate::lifecycle::SharedSession;
use crate::shared::{constants, presets};
use crate::utils::logger;

type UiTerminal = Terminal<CrosstermBackend<io::Stderr>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SearchBy {
    Name,
    Genre,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Home,
    Presets,
    SearchInput,
    Results,
    UrlInput,
    NowPlaying,
}

impl Step {
    fn title(self) -> &'static str {
        match self {
            Step::Home => "Home",
            Step::Presets => "Presets",
            Step::SearchInput => "Search",
            Step::Results => "Results",
            Step::UrlInput => "Stream URL",
            Step::NowPlaying => "Now Playing",
        }
    }
}

struct MenuApp {
    session: SharedSession,
    step: Step,
    status: String,
    should_quit: bool,
    home_index: usize,
    stations: Vec<Station>,
    list_index: usize,
    input: String,
    search_by: SearchBy,
    playing: bool,
}

impl MenuApp {
    fn new(session: SharedSession) -> Self {
        Self {
            session,
            step: Step::Home,
            status: "Enter to select, Esc to quit".to_string(),
            should_quit: false,
            home_index: 0,
            stations: Vec::new(),
            list_index: 0,
            input: String::new(),
            search_by: SearchBy::Name,
            playing: false,
        }
    }

    fn on_key(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.should_quit = true;
            return;
        }

        match self.step {
            Step::Home => self.handle_home(key),
            Step::Presets | Step::Results => self.handle_station_select(key),
            Step::SearchInput | Step::UrlInput => self.handle_text_input(key),
            Step::NowPlaying => self.handle_now_playing(key),
        }
    }

    /// Refresh the playback flag between input events.
    fn tick(&mut self) {
        if self.step != Step::NowPlaying {
            return;
        }
        let was_playing = self.playing;
        self.playing = match self.session.lock() {
            Ok(mut guard) => guard.is_playing(),
            Err(_) => false,
        };
        if was_playing && !self.playing {
            self.status = "Playback stopped".to_string();
        }
    }

    fn handle_home(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.home_index = self.home_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.home_index + 1 < constants::MENU_HOME_ACTIONS.len() {
                    self.home_index += 1;
                }
            }
            KeyCode::Enter => match self.home_index {
                0 => {
                    self.stations = presets::all();
                    self.list_index = 0;
                    self.step = Step::Presets;
                    self.status = "Pick a station".to_string();
                }
                1 => self.open_search(SearchBy::Name),
                2 => self.open_search(SearchBy::Genre),
                3 => {
                    self.input.clear();
                    self.step = Step::UrlInput;
                    self.status = "Type a stream URL, then Enter".to_string();
                }
                _ => self.should_quit = true,
            },
            _ => {}
        }
    }

    fn open_search(&mut self, by: SearchBy) {
        self.search_by = by;
        self.input.clear();
        self.step = Step::SearchInput;
        self.status = match by {
            SearchBy::Name => "Type a station name, then Enter".to_string(),
            SearchBy::Genre => "Type a genre (e.g. jazz), then Enter".to_string(),
        };
    }

    fn handle_station_select(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => {
                self.list_index = self.list_index.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.list_index + 1 < self.stations.len() {
                    self.list_index += 1;
                }
            }
            KeyCode::Backspace => {
                self.step = Step::Home;
                self.status = "Enter to select, Esc to quit".to_string();
            }
            KeyCode::Enter => {
                if let Some(station) = self.stations.get(self.list_index).cloned() {
                    self.play(station);
                }
            }
            _ => {}
        }
    }

    fn handle_text_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Backspace => {
                if self.input.is_empty() {
                    self.step = Step::Home;
                } else {
                    self.input.pop();
                }
            }
            KeyCode::Char(c) => {
                self.input.push(c);
            }
            KeyCode::Enter => {
                let text = self.input.trim().to_string();
                if text.is_empty() {
                    self.status = "Nothing entered".to_string();
                    return;
                }
                if self.step == Step::UrlInput {
                    self.play(Station::from_url("Custom stream", &text));
                } else {
                    self.run_search(&text);
                }
            }
            _ => {}
        }
    }

    fn run_search(&mut self, query: &str) {
        self.status = "Searching...".to_string();
        let results = match self.search_by {
            SearchBy::Name => {
                directory::search_stations(query, constants::DEFAULT_SEARCH_LIMIT)
            }
            SearchBy::Genre => {
                directory::search_by_genre(query, constants::DEFAULT_SEARCH_LIMIT)
            }
        };

        if results.is_empty() {
            self.status = format!("No stations found for '{}', try another query", query);
            return;
        }

        self.status = format!("{} station(s) found", results.len());
        self.stations = results;
        self.list_index = 0;
        self.step = Step::Results;
    }

    fn handle_now_playing(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('s') => {
                if let Ok(mut guard) = self.session.lock() {
                    guard.stop();
                }
                self.playing = false;
                self.status = "Stopped".to_string();
            }
            KeyCode::Backspace => {
                self.step = Step::Home;
                self.status = "Enter to select, Esc to quit".to_string();
            }
            _ => {}
        }
    }

    fn play(&mut self, station: Station) {
        logger::info(&format!("menu: playing '{}'", station.name));
        let outcome = match self.session.lock() {
            Ok(mut guard) => guard.start(station.clone()),
            Err(poisoned) => poisoned.into_inner().start(station.clone()),
        };

        match outcome {
            Ok(()) => {
                self.playing = true;
                self.step = Step::NowPlaying;
                self.status = format!("Tuned to {}", station.name);
            }
            Err(err) => {
                self.status = format!("{:#}", err);
            }
        }
    }

    fn current_station(&self) -> Option<Station> {
        self.session
            .lock()
            .ok()
            .and_then(|guard| guard.current_station().cloned())
    }
}

pub fn run_menu(session: SharedSession) -> Result<()> {
    let mut app = MenuApp::new(session);

    let mut terminal = setup_terminal()?;
    let run_result = run_app(&mut terminal, &mut app);
    let restore_result = restore_terminal(&mut terminal);

    if let Err(err) = restore_result {
        logger::error(&format!("Failed to restore terminal from menu: {}", err));
    }

    run_result?;

    Ok(())
}

fn setup_terminal() -> Result<UiTerminal> {
    enable_raw_mode().context("failed to enable raw mode")?;

    let mut stderr = io::stderr();
    execute!(stderr, EnterAlternateScreen, Hide).context("failed to switch to alternate screen")?;

    let backend = CrosstermBackend::new(stderr);
    let terminal = Terminal::new(backend).context("failed to initialize terminal backend")?;

    Ok(terminal)
}

fn restore_terminal(terminal: &mut UiTerminal) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, Show)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor().context("failed to show cursor")?;
    Ok(())
}

fn run_app(terminal: &mut UiTerminal, app: &mut MenuApp) -> Result<()> {
    loop {
        terminal.draw(|frame| draw_menu(frame, app))?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key.code);
                }
            }
        } else {
            app.tick();
        }
    }

    Ok(())
}

fn draw_menu(frame: &mut Frame<'_>, app: &MenuApp) {
    let area = frame.size();

    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        format!(" {} | {} ", constants::APP_NAME, app.step.title()),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(8),
            Constraint::Length(3),
        ])
        .split(inner);

    draw_logo(frame, layout[0]);

    match app.step {
        Step::Home => draw_home(frame, layout[1], app),
        Step::Presets | Step::Results => draw_station_list(frame, layout[1], app),
        Step::SearchInput => draw_input(frame, layout[1], app, "Search query"),
        Step::UrlInput => draw_input(frame, layout[1], app, "Stream URL"),
        Step::NowPlaying => draw_now_playing(frame, layout[1], app),
    }

    draw_footer(frame, layout[2], &app.status);
}

fn draw_logo(frame: &mut Frame<'_>, area: Rect) {
    let lines: Vec<Line<'_>> = constants::MENU_LOGO
        .iter()
        .map(|line| {
            Line::from(Span::styled(
                *line,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ))
        })
        .collect();

    let logo = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(logo, area);
}

fn draw_home(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let items = constants::MENU_HOME_ACTIONS
        .iter()
        .map(|item| ListItem::new(*item))
        .collect::<Vec<_>>();

    draw_select_list(frame, area, "What do you want to hear?", items, app.home_index);
}

fn draw_station_list(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let items: Vec<ListItem<'_>> = app
        .stations
        .iter()
        .map(|station| ListItem::new(Line::from(station.summary())))
        .collect();

    draw_select_list(frame, area, "Stations", items, app.list_index);
}

fn draw_input(frame: &mut Frame<'_>, area: Rect, app: &MenuApp, title: &'static str) {
    let input_block = Block::default().borders(Borders::ALL).title(title);

    let text = if app.input.is_empty() {
        "_".to_string()
    } else {
        format!("{}_", app.input)
    };

    let input = Paragraph::new(text)
        .block(input_block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    frame.render_widget(input, area);
}

fn draw_now_playing(frame: &mut Frame<'_>, area: Rect, app: &MenuApp) {
    let mut lines = vec![Line::from("")];

    match app.current_station() {
        Some(station) => {
            lines.push(Line::from(Span::styled(
                station.name.clone(),
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("URL: {}", station.url)));
            if let Some(genre) = &station.genre {
                lines.push(Line::from(format!("Genre: {}", genre)));
            }
            if let Some(country) = &station.country {
                lines.push(Line::from(format!("Country: {}", country)));
            }
            if let Some(bitrate) = station.bitrate {
                lines.push(Line::from(format!("Bitrate: {} kbps", bitrate)));
            }
            lines.push(Line::from(""));
            lines.push(Line::from(if app.playing {
                "▶ Playing"
            } else {
                "■ Stopped"
            }));
        }
        None => {
            lines.push(Line::from("Nothing playing"));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from("s: stop   Backspace: menu   q: quit"));

    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(body, area);
}

fn draw_select_list(
    frame: &mut Frame<'_>,
    area: Rect,
    title: &'static str,
    items: Vec<ListItem<'_>>,
    selected: usize,
) {
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_footer(frame: &mut Frame<'_>, area: Rect, status: &str) {
    let footer = Paragraph::new(Line::from(vec![
        Span::styled(
            "[↑↓/j,k] move  [Enter] select  [Esc] quit  ",
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(status, Style::default().fg(Color::White)),
    ]))
    .alignment(Alignment::Left)
    .wrap(Wrap { trim: true });

    frame.render_widget(footer, area);
}

mod app;
mod config;
mod content;
mod event;
mod logging;
mod media;
mod nav;
mod preferences;
mod store;
mod ui;

rust_i18n::i18n!("locales", fallback = "en");

use std::io;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};
use rust_i18n::t;
use tracing::{info, warn};

use app::{App, AppScreen, OnboardingStep, StatusKind};
use config::Config;
use content::LessonCatalog;
use event::{AppEvent, EventHandler, TICK_RATE};
use media::SystemOpener;
use preferences::{ColorScheme, Language, Overrides, SystemPreferences};
use store::json_store::JsonStore;
use store::progress::ProgressRecorder;
use ui::components::menu::{Menu, MenuItem};
use ui::components::progress_bar::ProgressBar;
use ui::components::section_view::SectionView;
use ui::components::sidebar::{Overlay, SectionSidebar};
use ui::layout::{AppLayout, centered_rect, pack_hint_lines};
use ui::line_input::InputResult;

#[derive(Parser)]
#[command(name = "rimba", version, about = "Bilingual wildlife conservation lessons for the terminal")]
struct Cli {
    #[arg(short, long, value_enum, help = "Language for this run (en, ms)")]
    language: Option<Language>,

    #[arg(short, long, value_enum, help = "Colour scheme for this run (light, dark)")]
    scheme: Option<ColorScheme>,

    #[arg(long, help = "Open a lesson directly by topic id, e.g. malayan-tapir")]
    lesson: Option<String>,

    #[arg(long, help = "Base URL for lesson audio and PDF files")]
    media_base_url: Option<String>,

    #[arg(long, help = "Write logs to stderr instead of the log file")]
    log_stderr: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = JsonStore::default_dir();
    if cli.log_stderr {
        logging::init_stderr_logging();
    } else if let Err(err) = logging::init_file_logging(&data_dir) {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let mut catalog = LessonCatalog::load_embedded().context("bundled lessons failed to load")?;
    if let Some(url) = cli.media_base_url {
        catalog = catalog.with_media_base_url(url);
    }

    let config = Config::load().unwrap_or_else(|err| {
        warn!(error = %err, "config unreadable, using defaults");
        Config::default()
    });
    let store = match JsonStore::new() {
        Ok(store) => Some(store),
        Err(err) => {
            warn!(error = %err, "progress will not be saved");
            None
        }
    };
    let overrides = Overrides {
        language: cli.language,
        color_scheme: cli.scheme,
    };

    let mut app = App::new(
        catalog,
        config,
        Some(Config::config_path()),
        ProgressRecorder::new(store),
        SystemPreferences::detect(),
        overrides,
        Box::new(SystemOpener),
    );

    if let Ok((width, height)) = crossterm::terminal::size() {
        app.resize(width, height);
    }
    if let Some(topic) = cli.lesson.as_deref() {
        if !app.start_lesson_by_topic(topic) {
            bail!("unknown lesson '{topic}'");
        }
    }

    info!(version = env!("CARGO_PKG_VERSION"), "rimba starting");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key, Instant::now()),
            AppEvent::Tick => {}
            AppEvent::Resize { width, height } => app.resize(width, height),
        }
        // Timers are checked after every event so a stream of key presses
        // cannot starve a due commit.
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Onboarding => handle_onboarding_key(app, key),
        AppScreen::Menu => handle_menu_key(app, key),
        AppScreen::Lesson => handle_lesson_key(app, key, now),
        AppScreen::LessonComplete => handle_complete_key(app, key),
    }
}

fn digit_index(key: &KeyEvent) -> Option<usize> {
    match key.code {
        KeyCode::Char(ch @ '1'..='9') => ch.to_digit(10).map(|d| d as usize - 1),
        _ => None,
    }
}

fn handle_onboarding_key(app: &mut App, key: KeyEvent) {
    match app.onboarding.step {
        OnboardingStep::Language => match key.code {
            KeyCode::Esc | KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Up
            | KeyCode::Down
            | KeyCode::Tab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => app.toggle_language(),
            KeyCode::Enter => app.onboarding_continue(),
            _ => {}
        },
        OnboardingStep::Name => match app.onboarding.name.handle(key) {
            InputResult::Submit => app.finish_onboarding(),
            InputResult::Cancel => app.onboarding_back(),
            InputResult::Continue => {}
        },
    }
}

fn handle_menu_key(app: &mut App, key: KeyEvent) {
    if let Some(index) = digit_index(&key) {
        app.start_lesson(index);
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.menu_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.menu_next(),
        KeyCode::Enter => app.start_lesson(app.menu_selected),
        KeyCode::Char('L') => app.toggle_language(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

fn handle_lesson_key(app: &mut App, key: KeyEvent, now: Instant) {
    let sidebar_open = app
        .lesson
        .as_ref()
        .is_some_and(|s| s.controller.sidebar().is_open());

    if sidebar_open {
        if let Some(index) = digit_index(&key) {
            app.select_section(index, now);
            return;
        }
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => app.sidebar_cursor_up(),
            KeyCode::Down | KeyCode::Char('j') => app.sidebar_cursor_down(),
            KeyCode::Enter => app.select_sidebar_cursor(now),
            KeyCode::Esc | KeyCode::Char('s') => app.close_sidebar(now),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => app.leave_lesson(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char('n') | KeyCode::Char(' ') => {
            app.next_section(now)
        }
        KeyCode::Left | KeyCode::Char('h') | KeyCode::Char('p') => app.previous_section(now),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_by(1),
        KeyCode::Up | KeyCode::Char('k') => app.scroll_by(-1),
        KeyCode::PageDown => app.scroll_by(10),
        KeyCode::PageUp => app.scroll_by(-10),
        KeyCode::Char('s') => app.toggle_sidebar(now),
        KeyCode::Char('a') => app.play_audio(),
        KeyCode::Char('d') => app.download_pdf(),
        KeyCode::Char('o') => app.open_download(),
        KeyCode::Char('L') => app.toggle_language(),
        KeyCode::Char('t') => app.toggle_theme(),
        KeyCode::Enter => {
            let on_last = app.lesson.as_ref().is_some_and(|s| s.controller.is_last());
            if on_last {
                app.finish_lesson();
            }
        }
        _ => {}
    }
}

fn handle_complete_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.read_again(),
        KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q') => app.go_to_menu(),
        _ => {}
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let bg = Block::default().style(Style::default().bg(colors.bg()));
    frame.render_widget(bg, area);

    match app.screen {
        AppScreen::Onboarding => render_onboarding(frame, app),
        AppScreen::Menu => render_menu(frame, app),
        AppScreen::Lesson => render_lesson(frame, app),
        AppScreen::LessonComplete => render_complete(frame, app),
    }
}

fn render_header(frame: &mut ratatui::Frame, app: &App, area: Rect, info: &str) {
    let colors = &app.theme.colors;
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " rimba ",
            Style::default()
                .fg(colors.header_fg())
                .bg(colors.header_bg())
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {info}"),
            Style::default().fg(colors.text_muted()).bg(colors.header_bg()),
        ),
    ]))
    .style(Style::default().bg(colors.header_bg()));
    frame.render_widget(header, area);
}

/// Status line (if any) above the packed key hints.
fn render_footer(frame: &mut ratatui::Frame, app: &App, area: Rect, hints: &[&str]) {
    let colors = &app.theme.colors;
    let mut lines: Vec<Line> = Vec::new();
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => colors.accent(),
            StatusKind::Error => colors.error(),
        };
        lines.push(Line::from(Span::styled(
            format!("  {}", status.text),
            Style::default().fg(color),
        )));
    }
    for hint_line in pack_hint_lines(hints, area.width as usize) {
        lines.push(Line::from(Span::styled(
            hint_line,
            Style::default().fg(colors.text_muted()),
        )));
    }
    let skip = lines.len().saturating_sub(area.height as usize);
    let footer = Paragraph::new(lines.into_iter().skip(skip).collect::<Vec<_>>());
    frame.render_widget(footer, area);
}

fn split_hints(hints: &str) -> Vec<&str> {
    hints.split("  ").map(str::trim).filter(|h| !h.is_empty()).collect()
}

fn render_onboarding(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;

    let centered = centered_rect(60, 60, area);
    let block = Block::bordered()
        .title(format!(" {} ", t!("onboarding.welcome")))
        .border_style(Style::default().fg(colors.accent()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(3), Constraint::Length(2)])
        .split(inner);

    let tagline = Paragraph::new(Line::from(Span::styled(
        t!("app.tagline").to_string(),
        Style::default().fg(colors.text_muted()),
    )))
    .alignment(Alignment::Center);
    tagline.render(layout[0], frame.buffer_mut());

    let (body, hints) = match app.onboarding.step {
        OnboardingStep::Language => {
            let mut lines = vec![
                Line::from(Span::styled(
                    format!("  {}", t!("onboarding.choose_language")),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];
            for language in Language::ALL {
                let selected = language == app.language();
                let indicator = if selected { " > " } else { "   " };
                let style = if selected {
                    Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(colors.fg())
                };
                lines.push(Line::from(Span::styled(
                    format!("{indicator}{}", language.native_name()),
                    style,
                )));
            }
            (lines, t!("onboarding.language_hints"))
        }
        OnboardingStep::Name => {
            let (before, cursor, after) = app.onboarding.name.render_parts();
            let cursor_text = cursor.map(String::from).unwrap_or_else(|| " ".to_string());
            let lines = vec![
                Line::from(Span::styled(
                    format!("  {}", t!("onboarding.name_prompt")),
                    Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(vec![
                    Span::styled("  > ", Style::default().fg(colors.accent())),
                    Span::styled(before.to_string(), Style::default().fg(colors.fg())),
                    Span::styled(
                        cursor_text,
                        Style::default().fg(colors.bg()).bg(colors.accent()),
                    ),
                    Span::styled(after.to_string(), Style::default().fg(colors.fg())),
                ]),
            ];
            (lines, t!("onboarding.name_hints"))
        }
    };
    Paragraph::new(body).render(layout[1], frame.buffer_mut());

    let hint_list = split_hints(&hints);
    let hint_lines: Vec<Line> = pack_hint_lines(&hint_list, layout[2].width as usize)
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.text_muted()))))
        .collect();
    Paragraph::new(hint_lines).render(layout[2], frame.buffer_mut());
}

fn render_menu(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let language = app.language();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(area);

    let header_info = if app.config.display_name.is_empty() {
        t!("app.tagline").to_string()
    } else {
        t!("app.greeting", name = app.config.display_name.as_str()).to_string()
    };
    render_header(frame, app, layout[0], &header_info);

    let items = app
        .catalog
        .lessons()
        .iter()
        .enumerate()
        .map(|(i, lesson)| {
            let progress = app.progress.lesson(lesson.topic());
            let completed = progress.is_some_and(|p| p.is_completed());
            let read = progress.map_or(0, |p| p.completed_sections.len());
            let description = if completed {
                t!("menu.completed").to_string()
            } else if read > 0 {
                t!(
                    "menu.in_progress",
                    done = read,
                    total = lesson.section_count()
                )
                .to_string()
            } else {
                t!("menu.sections", count = lesson.section_count()).to_string()
            };
            MenuItem {
                key: (i + 1).to_string(),
                label: lesson.title(language).to_string(),
                description,
                completed,
            }
        })
        .collect();

    let menu = Menu::new(&t!("menu.title"), language.native_name(), items, &app.theme)
        .selected(app.menu_selected);
    let menu_area = centered_rect(50, 80, layout[1]);
    frame.render_widget(&menu, menu_area);

    let hints = t!("menu.hints");
    render_footer(frame, app, layout[2], &split_hints(&hints));
}

fn render_lesson(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let Some(session) = app.lesson.as_ref() else {
        return;
    };
    let controller = &session.controller;
    let language = app.language();
    let app_layout = AppLayout::new(area);

    let lesson_title = app
        .catalog
        .lesson(controller.topic().as_str())
        .map(|l| l.title(language))
        .unwrap_or_default();
    let section_progress = t!(
        "lesson.section_progress",
        current = controller.safe_index() + 1,
        total = controller.len()
    )
    .to_string();
    let pending = if controller.is_navigating() { " …" } else { "" };
    let header_info = format!(
        "{lesson_title} | {} | {section_progress}{pending}",
        language.native_name()
    );
    render_header(frame, app, app_layout.header, &header_info);

    if let Some(section) = controller.current_section() {
        let view = SectionView::new(section, &app.theme)
            .scroll(session.scroll)
            .margin(app_layout.tier.reading_margin());
        frame.render_widget(view, app_layout.main);
    }

    if let Some(progress_area) = app_layout.progress {
        let bar = ProgressBar::new(lesson_title, controller.progress(), &app.theme)
            .caption(section_progress.clone());
        frame.render_widget(bar, progress_area);
    }

    let hints = t!("lesson.hints");
    let finish = t!("lesson.hint_finish");
    let mut hint_list = split_hints(&hints);
    if controller.is_last() {
        hint_list.push(finish.as_ref());
    }
    render_footer(frame, app, app_layout.footer, &hint_list);

    if controller.sidebar_visible() {
        frame.render_widget(Overlay::new(controller.overlay_opacity(), &app.theme), area);

        let panel_area = Rect::new(
            area.x,
            app_layout.header.bottom(),
            area.width,
            area.height.saturating_sub(app_layout.header.height),
        );
        let sidebar_hints = t!("lesson.sidebar_hints");
        let panel = SectionSidebar::new(
            controller.sections(),
            controller.safe_index(),
            controller.completed_sections(),
            &app.theme,
        )
        .cursor(session.sidebar_cursor)
        .width(controller.sidebar().panel_width().round() as u16)
        .offset(controller.slide_offset())
        .title(&t!("lesson.sidebar_title"))
        .hints(&sidebar_hints);
        frame.render_widget(panel, panel_area);
    }
}

fn render_complete(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let colors = &app.theme.colors;
    let Some(summary) = app.last_completion.as_ref() else {
        return;
    };

    let centered = centered_rect(60, 50, area);
    let block = Block::bordered()
        .title(format!(" {} ", t!("complete.title")))
        .border_style(Style::default().fg(colors.completed()))
        .style(Style::default().bg(colors.bg()));
    let inner = block.inner(centered);
    block.render(centered, frame.buffer_mut());

    let lesson_title = app
        .catalog
        .lesson(summary.topic.as_str())
        .map(|l| l.title(app.language()))
        .unwrap_or_default();

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            lesson_title.to_string(),
            Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            t!("complete.badge", badge = summary.badge.as_str()).to_string(),
            Style::default().fg(colors.accent()).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            t!("complete.times", count = summary.times_completed).to_string(),
            Style::default().fg(colors.text_muted()),
        )),
    ];
    if !app.config.display_name.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            t!("app.greeting", name = app.config.display_name.as_str()).to_string(),
            Style::default().fg(colors.fg()),
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        t!("complete.hints").to_string(),
        Style::default().fg(colors.text_muted()),
    )));

    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(inner, frame.buffer_mut());
}

use std::path::PathBuf;
use std::time::{Duration, Instant};

use ratatui::layout::Rect;
use rust_i18n::t;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::content::{AudioProvider, ContentProvider, LessonCatalog, TopicId};
use crate::media::{DownloadRequest, LinkOpener, PdfDownloader};
use crate::nav::{NavEvent, SectionNavigationController};
use crate::preferences::{Language, Overrides, Preferences, SystemPreferences};
use crate::store::progress::ProgressRecorder;
use crate::ui::components::section_view::content_height;
use crate::ui::layout::{AppLayout, LayoutTier};
use crate::ui::line_input::LineInput;
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(5);
const MAX_NAME_CHARS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Onboarding,
    Menu,
    Lesson,
    LessonComplete,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OnboardingStep {
    Language,
    Name,
}

pub struct Onboarding {
    pub step: OnboardingStep,
    pub name: LineInput,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

pub struct StatusMessage {
    pub text: String,
    pub kind: StatusKind,
    set_at: Instant,
}

/// Everything that lives only while a lesson screen is mounted.
pub struct LessonSession {
    pub controller: SectionNavigationController,
    pub sidebar_cursor: usize,
    pub scroll: u16,
}

pub struct CompletionSummary {
    pub topic: TopicId,
    pub badge: String,
    pub times_completed: u32,
}

pub struct App {
    pub screen: AppScreen,
    pub catalog: LessonCatalog,
    pub config: Config,
    config_path: Option<PathBuf>,
    system: SystemPreferences,
    pub overrides: Overrides,
    pub preferences: Preferences,
    pub theme: Theme,
    pub menu_selected: usize,
    pub lesson: Option<LessonSession>,
    pub last_completion: Option<CompletionSummary>,
    pub progress: ProgressRecorder,
    downloader: PdfDownloader,
    pub last_download: Option<PathBuf>,
    opener: Box<dyn LinkOpener>,
    pub status: Option<StatusMessage>,
    pub onboarding: Onboarding,
    pub viewport: Rect,
    pub should_quit: bool,
}

impl App {
    /// `config_path` of `None` keeps configuration changes in memory only.
    pub fn new(
        catalog: LessonCatalog,
        config: Config,
        config_path: Option<PathBuf>,
        progress: ProgressRecorder,
        system: SystemPreferences,
        overrides: Overrides,
        opener: Box<dyn LinkOpener>,
    ) -> Self {
        let preferences = Preferences::resolve(system, config.language, config.color_scheme, overrides);
        let screen = if config.onboarding_done {
            AppScreen::Menu
        } else {
            AppScreen::Onboarding
        };
        let downloader = PdfDownloader::new(&config.pdf_download_dir);
        let onboarding = Onboarding {
            step: OnboardingStep::Language,
            name: LineInput::new(&config.display_name, MAX_NAME_CHARS),
        };

        let mut app = Self {
            screen,
            catalog,
            config,
            config_path,
            system,
            overrides,
            preferences,
            theme: Theme::for_scheme(preferences.color_scheme),
            menu_selected: 0,
            lesson: None,
            last_completion: None,
            progress,
            downloader,
            last_download: None,
            opener,
            status: None,
            onboarding,
            viewport: Rect::new(0, 0, 80, 24),
            should_quit: false,
        };
        app.apply_preferences();
        app
    }

    pub fn language(&self) -> Language {
        self.preferences.language
    }

    fn apply_preferences(&mut self) {
        self.preferences = Preferences::resolve(
            self.system,
            self.config.language,
            self.config.color_scheme,
            self.overrides,
        );
        rust_i18n::set_locale(self.preferences.language.code());
        if self.theme.name != self.preferences.color_scheme.theme_name() {
            self.theme = Theme::for_scheme(self.preferences.color_scheme);
        }
    }

    fn save_config(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(err) = self.config.save_to(path) {
            warn!(error = %err, "failed to save config");
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
            set_at: Instant::now(),
        });
    }

    pub fn is_busy_downloading(&self) -> bool {
        self.downloader.is_busy()
    }

    // --- menu ---

    pub fn menu_next(&mut self) {
        let count = self.catalog.lessons().len();
        if count > 0 {
            self.menu_selected = (self.menu_selected + 1) % count;
        }
    }

    pub fn menu_prev(&mut self) {
        let count = self.catalog.lessons().len();
        if count > 0 {
            self.menu_selected = (self.menu_selected + count - 1) % count;
        }
    }

    // --- lesson lifecycle ---

    pub fn start_lesson(&mut self, index: usize) {
        let Some(lesson) = self.catalog.lessons().get(index) else {
            return;
        };
        let topic = lesson.topic().clone();
        let sections = lesson.sections(self.language());
        let restored = self.progress.completed_indices(&topic, &sections);

        let mut controller =
            SectionNavigationController::with_debounce(topic.clone(), sections, self.config.debounce());
        for index in restored {
            controller.mark_completed(index);
        }
        controller.set_sidebar_width(self.sidebar_width() as f32);

        info!(topic = %topic, language = %self.language(), "lesson opened");
        self.menu_selected = index;
        self.lesson = Some(LessonSession {
            controller,
            sidebar_cursor: 0,
            scroll: 0,
        });
        self.status = None;
        self.screen = AppScreen::Lesson;
    }

    /// Open a lesson by topic id. Returns false for an unknown topic.
    pub fn start_lesson_by_topic(&mut self, topic: &str) -> bool {
        match self.catalog.lessons().iter().position(|l| l.topic().as_str() == topic) {
            Some(index) => {
                self.start_lesson(index);
                true
            }
            None => false,
        }
    }

    pub fn leave_lesson(&mut self) {
        if let Some(mut session) = self.lesson.take() {
            session.controller.dispose();
            info!(topic = %session.controller.topic(), "lesson closed");
        }
        self.status = None;
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_menu(&mut self) {
        self.last_completion = None;
        self.screen = AppScreen::Menu;
    }

    /// Drive timers: the controller's debounce and sidebar animation,
    /// finished downloads and status expiry.
    pub fn on_tick(&mut self, now: Instant) {
        if let Some(session) = self.lesson.as_mut() {
            if let Some(NavEvent::Committed { from, to }) = session.controller.poll(now) {
                if to > from {
                    session.controller.mark_completed(from);
                    if let Some(section) = session.controller.sections().get(from) {
                        self.progress.record_section(session.controller.topic(), section);
                    }
                }
                session.scroll = 0;
                session.sidebar_cursor = to;
            }
        }

        if let Some(result) = self.downloader.poll() {
            match result {
                Ok(path) => {
                    let text = t!("lesson.download_done", path = path.display().to_string()).to_string();
                    self.last_download = Some(path);
                    self.set_status(StatusKind::Info, text);
                }
                Err(err) => {
                    let text = t!("lesson.download_failed", error = err.to_string()).to_string();
                    self.set_status(StatusKind::Error, text);
                }
            }
        }

        if self
            .status
            .as_ref()
            .is_some_and(|s| now.saturating_duration_since(s.set_at) > STATUS_TTL)
        {
            self.status = None;
        }
    }

    pub fn next_section(&mut self, now: Instant) {
        if let Some(session) = self.lesson.as_mut() {
            session.controller.request_next(now);
        }
    }

    pub fn previous_section(&mut self, now: Instant) {
        if let Some(session) = self.lesson.as_mut() {
            session.controller.request_previous(now);
        }
    }

    pub fn toggle_sidebar(&mut self, now: Instant) {
        if let Some(session) = self.lesson.as_mut() {
            if !session.controller.sidebar().is_open() {
                session.sidebar_cursor = session
                    .controller
                    .pending_target()
                    .unwrap_or_else(|| session.controller.safe_index());
            }
            session.controller.toggle_sidebar(now);
        }
    }

    pub fn close_sidebar(&mut self, now: Instant) {
        if let Some(session) = self.lesson.as_mut() {
            session.controller.close_sidebar(now);
        }
    }

    pub fn sidebar_cursor_down(&mut self) {
        if let Some(session) = self.lesson.as_mut() {
            let last = session.controller.len().saturating_sub(1);
            session.sidebar_cursor = (session.sidebar_cursor + 1).min(last);
        }
    }

    pub fn sidebar_cursor_up(&mut self) {
        if let Some(session) = self.lesson.as_mut() {
            session.sidebar_cursor = session.sidebar_cursor.saturating_sub(1);
        }
    }

    pub fn select_section(&mut self, target: usize, now: Instant) {
        if let Some(session) = self.lesson.as_mut() {
            session.controller.request_select(target, now);
        }
    }

    pub fn select_sidebar_cursor(&mut self, now: Instant) {
        if let Some(cursor) = self.lesson.as_ref().map(|s| s.sidebar_cursor) {
            self.select_section(cursor, now);
        }
    }

    pub fn scroll_by(&mut self, delta: i32) {
        let max = self.max_scroll();
        if let Some(session) = self.lesson.as_mut() {
            let next = (session.scroll as i32 + delta).clamp(0, max as i32);
            session.scroll = next as u16;
        }
    }

    fn max_scroll(&self) -> u16 {
        let Some(section) = self.lesson.as_ref().and_then(|s| s.controller.current_section()) else {
            return 0;
        };
        let body = AppLayout::new(self.viewport).body_viewport();
        content_height(section, body.width).saturating_sub(body.height)
    }

    /// Report the lesson as finished. Ignored while a section change is
    /// still pending.
    pub fn finish_lesson(&mut self) {
        let Some(session) = self.lesson.as_mut() else {
            return;
        };
        if !session.controller.request_complete(&mut self.progress) {
            debug!("finish ignored: navigation pending");
            return;
        }
        session.controller.mark_all_completed();
        let topic = session.controller.topic().clone();
        for section in session.controller.sections() {
            self.progress.record_section(&topic, section);
        }

        let badge = self
            .catalog
            .lesson(topic.as_str())
            .and_then(|lesson| self.catalog.badge_name(lesson, self.preferences.language))
            .unwrap_or_default()
            .to_string();
        let times_completed = self
            .progress
            .lesson(&topic)
            .map(|p| p.times_completed)
            .unwrap_or(1);

        if let Some(mut session) = self.lesson.take() {
            session.controller.dispose();
        }
        self.last_completion = Some(CompletionSummary {
            topic,
            badge,
            times_completed,
        });
        self.status = None;
        self.screen = AppScreen::LessonComplete;
    }

    pub fn read_again(&mut self) {
        let Some(summary) = self.last_completion.take() else {
            return;
        };
        if !self.start_lesson_by_topic(summary.topic.as_str()) {
            self.go_to_menu();
        }
    }

    // --- media ---

    pub fn play_audio(&mut self) {
        let Some(topic) = self.lesson.as_ref().map(|s| s.controller.topic().clone()) else {
            return;
        };
        match self.catalog.resolve_audio_url(&topic, self.language()) {
            Some(url) => match self.opener.open(&url) {
                Ok(()) => {
                    info!(topic = %topic, url = %url, "audio opened");
                    let text = t!("lesson.audio_opening", url = url).to_string();
                    self.set_status(StatusKind::Info, text);
                }
                Err(err) => {
                    warn!(error = %err, url = %url, "could not open audio");
                    let text = t!("lesson.open_failed", target = url).to_string();
                    self.set_status(StatusKind::Error, text);
                }
            },
            None => {
                let text = t!("lesson.audio_missing").to_string();
                self.set_status(StatusKind::Info, text);
            }
        }
    }

    pub fn download_pdf(&mut self) {
        let Some(topic) = self.lesson.as_ref().map(|s| s.controller.topic().clone()) else {
            return;
        };
        let language = self.language();
        let Some(url) = self.catalog.pdf_url(&topic, language) else {
            return;
        };
        let started = self.downloader.start(DownloadRequest {
            url,
            topic,
            language,
        });
        let text = if started {
            t!("lesson.download_started")
        } else {
            t!("lesson.download_busy")
        };
        self.set_status(StatusKind::Info, text.to_string());
    }

    /// Hand the last downloaded PDF to the system so it can be viewed or shared.
    pub fn open_download(&mut self) {
        let Some(path) = self.last_download.clone() else {
            return;
        };
        let target = path.display().to_string();
        if let Err(err) = self.opener.open(&target) {
            warn!(error = %err, path = %target, "could not open download");
            let text = t!("lesson.open_failed", target = target).to_string();
            self.set_status(StatusKind::Error, text);
        }
    }

    // --- preferences ---

    pub fn toggle_language(&mut self) {
        let language = self.language().toggled();
        self.overrides.language = Some(language);
        self.config.language = Some(language);
        self.save_config();
        self.apply_preferences();

        if let Some(session) = self.lesson.as_mut() {
            let topic = session.controller.topic().clone();
            if let Some(lesson) = self.catalog.lesson(topic.as_str()) {
                session.controller.replace_sections(lesson.sections(language));
                session.sidebar_cursor = session
                    .controller
                    .pending_target()
                    .unwrap_or_else(|| session.controller.safe_index());
            }
        }

        info!(language = %language, "language switched");
        let text = t!("status.language", language = language.native_name()).to_string();
        self.set_status(StatusKind::Info, text);
    }

    pub fn toggle_theme(&mut self) {
        let scheme = self.preferences.color_scheme.toggled();
        self.overrides.color_scheme = Some(scheme);
        self.config.color_scheme = Some(scheme);
        self.save_config();
        self.apply_preferences();
        let text = t!("status.theme", theme = scheme.theme_name()).to_string();
        self.set_status(StatusKind::Info, text);
    }

    // --- onboarding ---

    pub fn onboarding_continue(&mut self) {
        self.onboarding.step = OnboardingStep::Name;
    }

    pub fn onboarding_back(&mut self) {
        self.onboarding.step = OnboardingStep::Language;
    }

    pub fn finish_onboarding(&mut self) {
        self.config.display_name = self.onboarding.name.value().trim().to_string();
        self.config.language = Some(self.language());
        self.config.onboarding_done = true;
        self.save_config();
        info!("onboarding finished");
        self.screen = AppScreen::Menu;
    }

    // --- terminal ---

    fn sidebar_width(&self) -> u16 {
        LayoutTier::from_area(self.viewport).sidebar_width(self.viewport.width)
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.viewport = Rect::new(0, 0, width, height);
        let sidebar_width = self.sidebar_width() as f32;
        if let Some(session) = self.lesson.as_mut() {
            session.controller.set_sidebar_width(sidebar_width);
        }
        self.scroll_by(0);
    }
}

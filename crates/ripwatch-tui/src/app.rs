//! Application core: event loop, screen switching, action dispatch.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use ripwatch_core::{Alert, Dashboard, Poller, PollerConfig, RipperClient};

use crate::action::{Action, ConfirmAction};
use crate::component::Component;
use crate::event::{Event, EventReader};
use crate::screen::ScreenId;
use crate::screens::create_screens;
use crate::theme;
use crate::tui::Tui;

pub struct App {
    active_screen: ScreenId,
    screens: HashMap<ScreenId, Box<dyn Component>>,
    running: bool,
    /// Status, logs and translator shared by every screen.
    dashboard: Dashboard,
    client: RipperClient,
    poller_config: PollerConfig,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// Stops the poll loops on exit.
    data_cancel: CancellationToken,
    /// Pending confirmation dialog; captures input while open.
    pending_confirm: Option<ConfirmAction>,
    /// Alert toast and when it was raised.
    notification: Option<(Alert, Instant)>,
    alert_lifetime: Duration,
}

impl App {
    pub fn new(
        dashboard: Dashboard,
        client: RipperClient,
        poller_config: PollerConfig,
        alert_lifetime: Duration,
    ) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let screens = create_screens(&client).into_iter().collect();

        Self {
            active_screen: ScreenId::Status,
            screens,
            running: true,
            dashboard,
            client,
            poller_config,
            action_tx,
            action_rx,
            data_cancel: CancellationToken::new(),
            pending_confirm: None,
            notification: None,
            alert_lifetime,
        }
    }

    fn init_screens(&mut self) -> Result<()> {
        for screen in self.screens.values_mut() {
            screen.init(self.action_tx.clone())?;
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(true);
        }
        Ok(())
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.init_screens()?;

        let poller = Poller::new(self.client.clone(), self.poller_config.clone());
        let bridge = tokio::spawn(crate::data_bridge::spawn_data_bridge(
            poller,
            self.action_tx.clone(),
            self.data_cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if let Some(action) = self.handle_mouse_event(mouse)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.set_title(&self.window_title())?;
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        self.data_cancel.cancel();
        events.stop();
        let _ = bridge.await;
        tui.exit()?;
        info!("TUI event loop ended");
        Ok(())
    }

    /// Global keys first, then the confirmation dialog, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Ok(Some(Action::Quit));
        }

        if self.pending_confirm.is_some() {
            return Ok(match key.code {
                KeyCode::Char('y' | 'Y') => Some(Action::ConfirmYes),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Action::ConfirmNo),
                _ => None,
            });
        }

        // Settings takes every other key for its text fields.
        if self.active_screen == ScreenId::Status {
            match (key.modifiers, key.code) {
                (KeyModifiers::NONE, KeyCode::Char('q')) => return Ok(Some(Action::Quit)),
                (KeyModifiers::NONE, KeyCode::Char(',')) => return Ok(Some(Action::OpenSettings)),
                (KeyModifiers::NONE, KeyCode::Esc) if self.notification.is_some() => {
                    return Ok(Some(Action::DismissNotification));
                }
                _ => {}
            }
        }

        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_key_event(key);
        }
        Ok(None)
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        if self.pending_confirm.is_some() {
            return Ok(None);
        }
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            return screen.handle_mouse_event(mouse);
        }
        Ok(None)
    }

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::Resize(..) => {}

            Action::Tick => {
                if let Some((_, raised)) = &self.notification {
                    if raised.elapsed() >= self.alert_lifetime {
                        self.notification = None;
                    }
                }
                self.forward(self.active_screen, action)?;
            }

            Action::Poll(event) => {
                if !self.dashboard.apply(event.clone()) {
                    debug!(generation = event.generation(), "stale poll result dropped");
                }
            }

            // ── Navigation ──
            Action::OpenSettings => {
                self.switch_to(ScreenId::Settings);
                self.action_tx.send(Action::ReloadConfig)?;
            }
            Action::CloseSettings => self.switch_to(ScreenId::Status),

            // ── Confirmation ──
            Action::ShowConfirm(confirm) => self.pending_confirm = Some(*confirm),
            Action::ConfirmNo => self.pending_confirm = None,
            Action::ConfirmYes => {
                if let Some(confirm) = self.pending_confirm.take() {
                    self.execute_confirm(confirm)?;
                }
            }

            Action::EjectDone(outcome) => {
                let alert = outcome.alert(self.dashboard.translator());
                self.action_tx.send(Action::Notify(alert))?;
            }

            // ── Alerts ──
            Action::Notify(alert) => {
                self.notification = Some((alert.clone(), Instant::now()));
            }
            Action::DismissNotification => self.notification = None,

            // Settings results arrive even after the screen was left.
            Action::ReloadConfig
            | Action::ConfigLoaded(_)
            | Action::Saved(_)
            | Action::SaveAndRestart
            | Action::RestartPending
            | Action::Restarted(_) => self.forward(ScreenId::Settings, action)?,

            Action::Render
            | Action::CycleLanguage
            | Action::ToggleLogs
            | Action::ClearLogs
            | Action::ToggleAutoScroll
            | Action::ScrollLogs(_) => self.forward(ScreenId::Status, action)?,
        }
        Ok(())
    }

    /// Hand `action` to one screen and queue whatever it returns.
    fn forward(&mut self, target: ScreenId, action: &Action) -> Result<()> {
        if let Some(screen) = self.screens.get_mut(&target) {
            if let Some(follow_up) = screen.update(action, &mut self.dashboard)? {
                self.action_tx.send(follow_up)?;
            }
        }
        Ok(())
    }

    fn switch_to(&mut self, target: ScreenId) {
        if target == self.active_screen {
            return;
        }
        debug!("switching screen: {} → {}", self.active_screen, target);
        if let Some(screen) = self.screens.get_mut(&self.active_screen) {
            screen.set_focused(false);
        }
        self.active_screen = target;
        if let Some(screen) = self.screens.get_mut(&target) {
            screen.set_focused(true);
        }
    }

    fn execute_confirm(&self, confirm: ConfirmAction) -> Result<()> {
        match confirm {
            ConfirmAction::Eject => {
                let client = self.client.clone();
                let tx = self.action_tx.clone();
                tokio::spawn(async move {
                    let outcome = ripwatch_core::eject(&client).await;
                    let _ = tx.send(Action::EjectDone(outcome));
                });
            }
            ConfirmAction::SaveAndRestart => self.action_tx.send(Action::SaveAndRestart)?,
        }
        Ok(())
    }

    fn window_title(&self) -> String {
        self.dashboard
            .translator()
            .title(self.active_screen.page_key())
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        if self.active_screen == ScreenId::Settings {
            if let Some(screen) = self.screens.get(&ScreenId::Settings) {
                screen.render(frame, area, &self.dashboard);
            }
        } else {
            let [content, status_bar] =
                Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);
            if let Some(screen) = self.screens.get(&ScreenId::Status) {
                screen.render(frame, content, &self.dashboard);
            }
            frame.render_widget(Paragraph::new(self.status_bar()), status_bar);
        }

        if let Some((alert, _)) = &self.notification {
            render_notification(frame, area, alert);
        }
        if let Some(confirm) = self.pending_confirm {
            self.render_confirm_dialog(frame, area, confirm);
        }
    }

    /// Language and key hints of the status screen.
    fn status_bar(&self) -> Line<'static> {
        let t = self.dashboard.translator();
        let mut spans = vec![
            Span::styled(format!(" {} ", t.language_name()), theme::title_style()),
            Span::styled("│ ", theme::key_hint()),
        ];
        for (key, label) in [
            ("e", t.t("btn_eject")),
            (",", t.t("btn_settings")),
            ("l", t.t("btn_language")),
            ("t", t.t("btn_toggle_logs")),
            ("c", t.t("btn_clear_logs")),
            ("a", t.t("logs_auto_scroll")),
            ("q", t.t("btn_quit")),
        ] {
            spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
            spans.push(Span::styled(format!("{label}  "), theme::key_hint()));
        }
        Line::from(spans)
    }

    fn render_confirm_dialog(&self, frame: &mut Frame, area: Rect, confirm: ConfirmAction) {
        let t = self.dashboard.translator();
        let width = 54u16.min(area.width.saturating_sub(4));
        let height = 6u16.min(area.height);
        let x = area.width.saturating_sub(width) / 2;
        let y = area.height.saturating_sub(height) / 2;
        let dialog = Rect::new(area.x + x, area.y + y, width, height);

        frame.render_widget(Clear, dialog);
        let block = Block::default()
            .title(format!(" {} ", t.t("confirm_title")))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme::ELECTRIC_YELLOW))
            .style(Style::default().bg(theme::BG_DARK));
        let inner = block.inner(dialog);
        frame.render_widget(block, dialog);

        let text = vec![
            Line::styled(
                format!(" {}", t.t(confirm.message_key())),
                Style::default().fg(theme::DIM_WHITE),
            ),
            Line::default(),
            Line::styled(format!(" {}", t.t("confirm_hint")), theme::key_hint()),
        ];
        frame.render_widget(Paragraph::new(text).wrap(Wrap { trim: false }), inner);
    }
}

/// Alert toast in the bottom-right corner, above the status bar.
fn render_notification(frame: &mut Frame, area: Rect, alert: &Alert) {
    let msg_len = u16::try_from(alert.message.chars().count()).unwrap_or(u16::MAX);
    let width = msg_len
        .saturating_add(6)
        .clamp(20, 70)
        .min(area.width);
    let height = 3u16;
    let x = area.width.saturating_sub(width + 1);
    let y = area.height.saturating_sub(height + 1);
    let toast = Rect::new(area.x + x, area.y + y, width, height.min(area.height));

    let (color, icon) = theme::alert(alert.level);
    frame.render_widget(Clear, toast);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .style(Style::default().bg(theme::BG_DARK));
    let inner = block.inner(toast);
    frame.render_widget(block, toast);

    let line = Line::from(vec![
        Span::styled(format!(" {icon} "), Style::default().fg(color)),
        Span::styled(alert.message.clone(), Style::default().fg(theme::DIM_WHITE)),
    ]);
    frame.render_widget(Paragraph::new(line), inner);
}

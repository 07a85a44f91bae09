//! Settings screen: edit the ripper service's configuration.
//!
//! Opened with `,`. The configuration is fetched every time the screen
//! opens and again shortly after each successful save. Enter saves;
//! Ctrl+R saves and restarts the service after a confirmation. Esc goes
//! back to the status screen.

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use strum::IntoEnumIterator;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use ripwatch_core::settings::{self, restart_pending_alert};
use ripwatch_core::{
    Dashboard, FieldKind, FieldValue, RipperClient, SettingsController, SettingsField,
    SettingsTab, Translator,
};

use crate::action::{Action, ConfirmAction, send_after};
use crate::component::Component;
use crate::theme;

const LABEL_WIDTH: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SettingsState {
    /// Waiting for the first configuration fetch.
    Loading,
    Editing,
    /// A save (or save & restart) is in flight.
    Saving,
}

pub struct SettingsScreen {
    focused: bool,
    action_tx: Option<UnboundedSender<Action>>,
    client: RipperClient,
    controller: SettingsController,
    state: SettingsState,
    tab: SettingsTab,
    field: SettingsField,
    reveal_secret: bool,
    throbber_state: throbber_widgets_tui::ThrobberState,
}

impl SettingsScreen {
    pub fn new(client: RipperClient) -> Self {
        let tab = SettingsTab::Ripper;
        Self {
            focused: false,
            action_tx: None,
            client,
            controller: SettingsController::new(),
            state: SettingsState::Loading,
            tab,
            field: first_field(tab),
            reveal_secret: false,
            throbber_state: throbber_widgets_tui::ThrobberState::default(),
        }
    }

    // ── Navigation ───────────────────────────────────────────────────

    fn select_tab(&mut self, forward: bool) {
        let tabs: Vec<SettingsTab> = SettingsTab::iter().collect();
        let pos = tabs.iter().position(|&t| t == self.tab).unwrap_or(0);
        let next = if forward {
            (pos + 1) % tabs.len()
        } else {
            (pos + tabs.len() - 1) % tabs.len()
        };
        if let Some(&tab) = tabs.get(next) {
            self.tab = tab;
            self.field = first_field(tab);
        }
    }

    fn select_field(&mut self, forward: bool) {
        let fields: Vec<SettingsField> = self.tab.fields().collect();
        let pos = fields.iter().position(|&f| f == self.field).unwrap_or(0);
        let next = if forward {
            (pos + 1) % fields.len()
        } else {
            (pos + fields.len() - 1) % fields.len()
        };
        if let Some(&field) = fields.get(next) {
            self.field = field;
        }
    }

    // ── Editing ──────────────────────────────────────────────────────

    fn edit(&mut self, key: KeyEvent) {
        let field = self.field;
        let form = self.controller.form_mut();
        match field.kind() {
            FieldKind::Toggle => {
                if matches!(key.code, KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right) {
                    form.toggle(field);
                }
            }
            FieldKind::Choice(_) => match key.code {
                KeyCode::Left => {
                    form.cycle(field, false);
                }
                KeyCode::Right | KeyCode::Char(' ') => {
                    form.cycle(field, true);
                }
                _ => {}
            },
            FieldKind::Number | FieldKind::Text | FieldKind::Secret => {
                let Some(text) = form.text_mut(field) else {
                    return;
                };
                match key.code {
                    KeyCode::Backspace => {
                        text.pop();
                    }
                    KeyCode::Char(c)
                        if field.kind() == FieldKind::Number && !c.is_ascii_digit() => {}
                    KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                        text.push(c);
                    }
                    _ => {}
                }
            }
        }
    }

    // ── Service calls ────────────────────────────────────────────────

    fn load(&mut self) {
        if !self.controller.is_loaded() {
            self.state = SettingsState::Loading;
        }
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = settings::load_configuration(&client).await;
            let _ = tx.send(Action::ConfigLoaded(outcome));
        });
    }

    fn start_save(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.state = SettingsState::Saving;
        let doc = self.controller.build();
        let client = self.client.clone();
        tokio::spawn(async move {
            let outcome = settings::save(&client, &doc).await;
            let _ = tx.send(Action::Saved(outcome));
        });
    }

    fn start_save_and_restart(&mut self) {
        let Some(tx) = self.action_tx.clone() else {
            return;
        };
        self.state = SettingsState::Saving;
        let doc = self.controller.build();
        let client = self.client.clone();
        tokio::spawn(async move {
            let pending = tx.clone();
            let outcome = settings::save_and_restart(&client, &doc, move || {
                let _ = pending.send(Action::RestartPending);
            })
            .await;
            let _ = tx.send(Action::Restarted(outcome));
        });
    }

    fn after(&self, delay: Option<std::time::Duration>, action: Action) {
        if let (Some(delay), Some(tx)) = (delay, self.action_tx.as_ref()) {
            debug!(?delay, ?action, "scheduling follow-up");
            send_after(tx, delay, action);
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_panel(frame: &mut Frame, area: Rect, t: &Translator) -> Rect {
        let panel_w = 78u16.min(area.width.saturating_sub(2));
        let panel_h = 20u16.min(area.height.saturating_sub(2));
        let x = area.width.saturating_sub(panel_w) / 2;
        let y = area.height.saturating_sub(panel_h) / 2;
        let panel = Rect::new(area.x + x, area.y + y, panel_w, panel_h);

        let block = Block::default()
            .title(Line::from(vec![
                Span::raw(" "),
                Span::styled(t.t("settings_title"), theme::title_style()),
                Span::raw(" "),
            ]))
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused());
        let inner = block.inner(panel);
        frame.render_widget(block, panel);
        inner
    }

    fn render_tabs(&self, frame: &mut Frame, area: Rect, t: &Translator) {
        let titles: Vec<Line> = SettingsTab::iter()
            .map(|tab| {
                let style = if tab == self.tab {
                    theme::tab_active()
                } else {
                    theme::tab_inactive()
                };
                Line::from(Span::styled(t.t(tab.label_key()), style))
            })
            .collect();
        let selected = SettingsTab::iter().position(|tab| tab == self.tab).unwrap_or(0);
        let tabs = Tabs::new(titles)
            .divider(Span::styled("│", theme::key_hint()))
            .select(selected);
        frame.render_widget(tabs, area);
    }

    fn render_fields(&self, frame: &mut Frame, area: Rect, t: &Translator) {
        let lines: Vec<Line> = self
            .tab
            .fields()
            .map(|field| self.field_line(field, t))
            .collect();
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn field_line(&self, field: SettingsField, t: &Translator) -> Line<'static> {
        let active = field == self.field;
        let label_style = if active {
            theme::selected_row()
        } else {
            Style::default().fg(theme::DIM_WHITE)
        };
        let value_style = Style::default().fg(theme::NEON_CYAN);
        let label = Span::styled(
            format!(" {:<width$}", t.t(field.label_key()), width = LABEL_WIDTH),
            label_style,
        );

        let value = match (field.kind(), self.controller.form().value(field)) {
            (_, FieldValue::Toggle(on)) => {
                let marker = if on { "[✓]" } else { "[ ]" };
                let style = if on {
                    Style::default().fg(theme::SUCCESS_GREEN)
                } else {
                    theme::key_hint()
                };
                vec![Span::styled(marker.to_owned(), style)]
            }
            (FieldKind::Choice(_), FieldValue::Text(text)) => {
                let arrow = if active {
                    Style::default().fg(theme::ELECTRIC_PURPLE)
                } else {
                    theme::key_hint()
                };
                vec![
                    Span::styled("◂ ", arrow),
                    Span::styled(text.to_owned(), value_style.add_modifier(Modifier::BOLD)),
                    Span::styled(" ▸", arrow),
                ]
            }
            (kind, FieldValue::Text(text)) => {
                let mut shown = if kind == FieldKind::Secret && !self.reveal_secret {
                    "●".repeat(text.chars().count())
                } else {
                    text.to_owned()
                };
                if active {
                    shown.push('█');
                }
                vec![Span::styled(shown, value_style)]
            }
        };

        let mut spans = vec![label, Span::raw(" ")];
        spans.extend(value);
        Line::from(spans)
    }

    fn render_busy(&self, frame: &mut Frame, area: Rect, t: &Translator) {
        let label = match self.state {
            SettingsState::Loading => t.t("settings_loading"),
            _ => format!("{}…", t.t("settings_save")),
        };
        let [_, row, _] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .areas(area);
        let throbber = throbber_widgets_tui::Throbber::default()
            .label(format!("  {label}"))
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, row, &mut self.throbber_state.clone());
    }

    fn key_hints(&self, t: &Translator) -> Line<'static> {
        let mut pairs: Vec<(&str, String)> = Vec::new();
        if self.state == SettingsState::Editing {
            pairs.push(("Tab", String::new()));
            pairs.push(("↑/↓", String::new()));
            match self.field.kind() {
                FieldKind::Choice(_) => pairs.push(("◂/▸", String::new())),
                FieldKind::Toggle => pairs.push(("Space", "✓".into())),
                FieldKind::Secret => pairs.push(("Ctrl+U", "●".into())),
                FieldKind::Text | FieldKind::Number => {}
            }
            pairs.push(("Enter", t.t("settings_save")));
            pairs.push(("Ctrl+R", t.t("settings_save_restart")));
        }
        pairs.push(("Esc", t.t("settings_back")));

        let mut spans = Vec::new();
        for (key, label) in pairs {
            spans.push(Span::styled(format!("{key} "), theme::key_hint_key()));
            if !label.is_empty() {
                spans.push(Span::styled(format!("{label} "), theme::key_hint()));
            }
            spans.push(Span::raw(" "));
        }
        Line::from(spans)
    }
}

fn first_field(tab: SettingsTab) -> SettingsField {
    tab.fields().next().unwrap_or(SettingsField::Device)
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for SettingsScreen {
    fn init(&mut self, action_tx: UnboundedSender<Action>) -> Result<()> {
        self.action_tx = Some(action_tx);
        Ok(())
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.code == KeyCode::Esc {
            return Ok(Some(Action::CloseSettings));
        }
        if self.state != SettingsState::Editing {
            return Ok(None);
        }

        match (key.modifiers, key.code) {
            (_, KeyCode::Tab) => self.select_tab(true),
            (_, KeyCode::BackTab) => self.select_tab(false),
            (_, KeyCode::Up) => self.select_field(false),
            (_, KeyCode::Down) => self.select_field(true),
            (_, KeyCode::Enter) | (KeyModifiers::CONTROL, KeyCode::Char('s')) => self.start_save(),
            (KeyModifiers::CONTROL, KeyCode::Char('r')) => {
                return Ok(Some(Action::ShowConfirm(ConfirmAction::SaveAndRestart)));
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.reveal_secret = !self.reveal_secret,
            _ => self.edit(key),
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action, ctx: &mut Dashboard) -> Result<Option<Action>> {
        let t = ctx.translator();
        let follow_up = match action {
            Action::ReloadConfig => {
                self.load();
                None
            }
            Action::ConfigLoaded(outcome) => {
                if self.state == SettingsState::Loading {
                    self.state = SettingsState::Editing;
                }
                self.controller
                    .apply_loaded(outcome.clone(), t)
                    .map(Action::Notify)
            }
            Action::Saved(outcome) => {
                self.state = SettingsState::Editing;
                self.after(outcome.refetch_after(), Action::ReloadConfig);
                Some(Action::Notify(outcome.alert(t)))
            }
            Action::SaveAndRestart => {
                self.start_save_and_restart();
                None
            }
            Action::RestartPending => Some(Action::Notify(restart_pending_alert(t))),
            Action::Restarted(outcome) => {
                self.state = SettingsState::Editing;
                self.after(outcome.navigate_back_after(), Action::CloseSettings);
                Some(Action::Notify(outcome.alert(t)))
            }
            Action::Tick => {
                if self.state != SettingsState::Editing {
                    self.throbber_state.calc_next();
                }
                None
            }
            _ => None,
        };
        Ok(follow_up)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Dashboard) {
        let t = ctx.translator();
        frame.render_widget(
            Block::default().style(Style::default().bg(theme::BG_DARK)),
            area,
        );

        let inner = Self::render_panel(frame, area, t);
        let [tabs_area, _, body_area, hints_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(inner);

        self.render_tabs(frame, tabs_area, t);
        match self.state {
            SettingsState::Editing => self.render_fields(frame, body_area, t),
            SettingsState::Loading | SettingsState::Saving => self.render_busy(frame, body_area, t),
        }
        frame.render_widget(
            Paragraph::new(self.key_hints(t)).alignment(Alignment::Center),
            hints_area,
        );
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "settings"
    }
}

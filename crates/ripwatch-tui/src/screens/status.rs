//! Status screen: the disc panel on top, the live log panel below.

use std::cell::Cell;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};
use url::Url;

use ripwatch_core::{Dashboard, LogView, Markup, StatusPhase, StatusView, Translator};

use crate::action::{Action, ConfirmAction, Scroll};
use crate::component::Component;
use crate::theme;

const WHEEL_STEP: usize = 3;

pub struct StatusScreen {
    focused: bool,
    /// Log rows that fit in the panel at the last draw.
    log_rows: Cell<Option<usize>>,
}

impl StatusScreen {
    pub fn new() -> Self {
        Self {
            focused: false,
            log_rows: Cell::new(None),
        }
    }

    fn scroll(ctx: &mut Dashboard, scroll: Scroll) {
        let logs = ctx.logs_mut();
        let page = logs.viewport().max(1);
        match scroll {
            Scroll::Up(n) => logs.scroll_up(n),
            Scroll::Down(n) => logs.scroll_down(n),
            Scroll::PageUp => logs.scroll_up(page),
            Scroll::PageDown => logs.scroll_down(page),
            Scroll::Top => logs.scroll_to_top(),
            Scroll::Bottom => logs.scroll_to_bottom(),
        }
    }

    fn render_status_panel(frame: &mut Frame, area: Rect, ctx: &Dashboard) {
        let view = ctx.status_view();
        let t = ctx.translator();
        let border = if view.phase == StatusPhase::Processing {
            theme::border_focused()
        } else {
            theme::border_default()
        };
        let block = Block::default()
            .title(format!(" {} ", t.t("app_title")))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines = status_lines(view, ctx.cover_url().as_ref());
        let gauge_height = u16::from(view.progress.is_some());
        let [text_area, gauge_area] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(gauge_height)]).areas(inner);

        frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), text_area);

        if let Some(progress) = &view.progress {
            let percent = u16::try_from(progress.percent.min(100)).unwrap_or(100);
            let gauge = Gauge::default()
                .gauge_style(theme::gauge())
                .percent(percent)
                .label(format!("{}%", progress.percent));
            frame.render_widget(gauge, gauge_area);
        }
    }

    fn render_log_panel(&self, frame: &mut Frame, area: Rect, ctx: &Dashboard) {
        let t = ctx.translator();
        let logs = ctx.logs();
        let title = Line::from(vec![
            Span::styled(
                format!(" {} {} ", ctx.log_panel_indicator(), t.t("logs_title")),
                theme::title_style(),
            ),
        ]);

        if !ctx.logs_expanded() {
            frame.render_widget(Paragraph::new(title), area);
            return;
        }

        let auto = if logs.auto_scroll() { "✓" } else { " " };
        let block = Block::default()
            .title(title)
            .title_bottom(
                Line::from(Span::styled(
                    format!(" [{auto}] {} ", t.t("logs_auto_scroll")),
                    theme::key_hint(),
                ))
                .right_aligned(),
            )
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);
        self.log_rows.set(Some(usize::from(inner.height)));

        frame.render_widget(Paragraph::new(log_lines(logs, t)), inner);
    }
}

// ── Line builders ────────────────────────────────────────────────────

/// Disc graphic shown while ripping a disc without cover art.
const COVER_PLACEHOLDER: &str = "💿";

/// Text lines of the disc panel.
pub(crate) fn status_lines(view: &StatusView, cover: Option<&Url>) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(warning) = &view.warning {
        lines.push(markup_line(warning, theme::warning_banner()));
        lines.push(Line::default());
    }

    lines.push(Line::styled(view.title.clone(), theme::disc_title()));

    if view.phase != StatusPhase::NoDisc {
        if !view.artist.is_empty() {
            lines.push(Line::styled(
                view.artist.clone(),
                theme::artist(view.artist_highlight),
            ));
        }
        if let Some(url) = cover {
            lines.push(Line::styled(format!("♪ {url}"), theme::key_hint()));
        } else if view.cover_placeholder {
            lines.push(Line::styled(COVER_PLACEHOLDER, theme::key_hint()));
        }
    }

    if let Some(progress) = &view.progress {
        lines.push(Line::default());
        let mut step = vec![Span::styled(
            progress.step.clone(),
            Style::default()
                .fg(theme::ELECTRIC_PURPLE)
                .add_modifier(Modifier::BOLD),
        )];
        if let Some(track) = &progress.track {
            step.push(Span::styled(format!("  ·  {track}"), theme::log_message()));
        }
        lines.push(Line::from(step));
    }

    lines
}

/// Emphasised segments bold, the rest in `base`.
pub(crate) fn markup_line(markup: &Markup, base: Style) -> Line<'static> {
    let spans: Vec<Span<'static>> = markup
        .segments
        .iter()
        .map(|segment| {
            let style = if segment.strong {
                base.add_modifier(Modifier::BOLD)
            } else {
                base
            };
            Span::styled(segment.text.clone(), style)
        })
        .collect();
    Line::from(spans)
}

/// Visible log rows, or the placeholder when there are none.
pub(crate) fn log_lines(logs: &LogView, t: &Translator) -> Vec<Line<'static>> {
    if let Some(placeholder) = logs.placeholder(t) {
        return vec![Line::styled(placeholder, theme::key_hint())];
    }
    logs.visible()
        .iter()
        .map(|row| {
            Line::from(vec![
                Span::styled(row.time.clone(), theme::log_time()),
                Span::raw(" "),
                Span::styled(format!("{:<8}", row.level), theme::log_level(&row.class)),
                Span::raw(" "),
                Span::styled(row.message.clone(), theme::log_message()),
            ])
        })
        .collect()
}

// ── Component impl ───────────────────────────────────────────────────

impl Component for StatusScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        let action = match (key.modifiers, key.code) {
            (KeyModifiers::NONE, KeyCode::Char('e')) => Action::ShowConfirm(ConfirmAction::Eject),
            (KeyModifiers::NONE, KeyCode::Char('l')) => Action::CycleLanguage,
            (KeyModifiers::NONE, KeyCode::Char('t')) => Action::ToggleLogs,
            (KeyModifiers::NONE, KeyCode::Char('c')) => Action::ClearLogs,
            (KeyModifiers::NONE, KeyCode::Char('a')) => Action::ToggleAutoScroll,
            (KeyModifiers::NONE, KeyCode::Char('k') | KeyCode::Up) => {
                Action::ScrollLogs(Scroll::Up(1))
            }
            (KeyModifiers::NONE, KeyCode::Char('j') | KeyCode::Down) => {
                Action::ScrollLogs(Scroll::Down(1))
            }
            (KeyModifiers::NONE, KeyCode::PageUp) | (KeyModifiers::CONTROL, KeyCode::Char('u')) => {
                Action::ScrollLogs(Scroll::PageUp)
            }
            (KeyModifiers::NONE, KeyCode::PageDown)
            | (KeyModifiers::CONTROL, KeyCode::Char('d')) => Action::ScrollLogs(Scroll::PageDown),
            (KeyModifiers::NONE, KeyCode::Char('g') | KeyCode::Home) => {
                Action::ScrollLogs(Scroll::Top)
            }
            (KeyModifiers::SHIFT, KeyCode::Char('G')) | (KeyModifiers::NONE, KeyCode::End) => {
                Action::ScrollLogs(Scroll::Bottom)
            }
            _ => return Ok(None),
        };
        Ok(Some(action))
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Result<Option<Action>> {
        Ok(match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollLogs(Scroll::Up(WHEEL_STEP))),
            MouseEventKind::ScrollDown => Some(Action::ScrollLogs(Scroll::Down(WHEEL_STEP))),
            _ => None,
        })
    }

    fn update(&mut self, action: &Action, ctx: &mut Dashboard) -> Result<Option<Action>> {
        match action {
            Action::Render => {
                if let Some(rows) = self.log_rows.get() {
                    ctx.logs_mut().set_viewport(rows);
                }
            }
            Action::ToggleLogs => {
                ctx.toggle_log_panel();
            }
            Action::ClearLogs => ctx.clear_logs_view(),
            Action::ToggleAutoScroll => {
                let enabled = !ctx.logs().auto_scroll();
                ctx.set_auto_scroll(enabled);
            }
            Action::ScrollLogs(scroll) => Self::scroll(ctx, *scroll),
            Action::CycleLanguage => return Ok(Some(Action::Notify(ctx.cycle_language()))),
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect, ctx: &Dashboard) {
        let status_height = if ctx.status_view().phase == StatusPhase::Processing {
            12
        } else {
            7
        };
        let log_constraint = if ctx.logs_expanded() {
            Constraint::Min(3)
        } else {
            Constraint::Length(1)
        };
        let [status_area, log_area] =
            Layout::vertical([Constraint::Length(status_height), log_constraint]).areas(area);

        Self::render_status_panel(frame, status_area, ctx);
        self.render_log_panel(frame, log_area, ctx);
    }

    fn focused(&self) -> bool {
        self.focused
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &'static str {
        "status"
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use pretty_assertions::assert_eq;
    use ratatui::{Terminal, backend::TestBackend};
    use ripwatch_core::{Catalog, CdInfo, LogEntry, PollEvent, StatusSnapshot, StepId};

    use super::*;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Translator::new(Catalog::builtin()),
            Url::parse("http://ripper.local:5000").unwrap(),
        )
    }

    fn processing_snapshot() -> StatusSnapshot {
        StatusSnapshot {
            current_cd: Some(CdInfo {
                name: Some("Abbey Road".into()),
                artist: Some("The Beatles".into()),
                cover_url: Some("/covers/abbey.jpg".into()),
                ..CdInfo::default()
            }),
            processing: true,
            current_step: Some(StepId::Encoding),
            current_track: Some(3),
            total_tracks: Some(17),
            progress: Some(140),
            ..StatusSnapshot::default()
        }
    }

    fn entries(n: usize) -> Vec<LogEntry> {
        (0..n)
            .map(|i| LogEntry {
                timestamp: format!("2025-11-03 00:00:{i:02}"),
                level: "INFO".into(),
                message: format!("line {i}"),
                ..LogEntry::default()
            })
            .collect()
    }

    fn text(lines: &[Line<'_>]) -> Vec<String> {
        lines.iter().map(ToString::to_string).collect()
    }

    fn draw(screen: &StatusScreen, ctx: &Dashboard) -> String {
        let mut terminal = Terminal::new(TestBackend::new(70, 20)).unwrap();
        terminal.draw(|f| screen.render(f, f.area(), ctx)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(ratatui::buffer::Cell::symbol)
            .collect()
    }

    #[test]
    fn no_disc_shows_only_the_title() {
        let d = dashboard();
        assert_eq!(text(&status_lines(d.status_view(), None)), vec!["No CD inserted"]);
    }

    #[test]
    fn processing_lines_carry_banner_cover_and_track() {
        let mut d = dashboard();
        d.apply(PollEvent::Status {
            generation: 1,
            snapshot: processing_snapshot(),
        });

        let lines = status_lines(d.status_view(), d.cover_url().as_ref());
        assert_eq!(
            text(&lines),
            vec![
                "Do not remove CD! Ripping in progress...",
                "",
                "Abbey Road",
                "The Beatles",
                "♪ http://ripper.local:5000/covers/abbey.jpg",
                "",
                "Encoding  ·  Track 3 of 17",
            ]
        );
        // The emphasised part of the banner is bold.
        let banner = &lines[0].spans[0];
        assert!(banner.style.add_modifier.contains(Modifier::BOLD));
        assert!(!lines[0].spans[1].style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn processing_without_cover_shows_disc_graphic() {
        let mut d = dashboard();
        let mut snapshot = processing_snapshot();
        if let Some(cd) = snapshot.current_cd.as_mut() {
            cd.cover_url = None;
        }
        d.apply(PollEvent::Status {
            generation: 1,
            snapshot,
        });

        assert_eq!(d.cover_url(), None);
        let lines = status_lines(d.status_view(), d.cover_url().as_ref());
        assert_eq!(
            text(&lines),
            vec![
                "Do not remove CD! Ripping in progress...",
                "",
                "Abbey Road",
                "The Beatles",
                "💿",
                "",
                "Encoding  ·  Track 3 of 17",
            ]
        );
    }

    #[test]
    fn gauge_label_shows_reported_percent() {
        let mut d = dashboard();
        d.apply(PollEvent::Status {
            generation: 1,
            snapshot: processing_snapshot(),
        });
        let screen = StatusScreen::new();
        assert!(draw(&screen, &d).contains("140%"));
    }

    #[test]
    fn log_placeholder_then_rows() {
        let mut d = dashboard();
        let t = Translator::new(Catalog::builtin());
        assert_eq!(text(&log_lines(d.logs(), &t)), vec!["No logs available yet..."]);

        d.logs_mut().set_viewport(5);
        d.apply(PollEvent::Logs {
            generation: 1,
            entries: entries(2),
        });
        assert_eq!(
            text(&log_lines(d.logs(), &t)),
            vec!["00:00:00 INFO     line 0", "00:00:01 INFO     line 1"]
        );

        d.clear_logs_view();
        assert_eq!(text(&log_lines(d.logs(), &t)), vec!["Logs cleared"]);
    }

    #[test]
    fn language_key_retranslates_log_placeholder() {
        let mut d = dashboard();
        let mut screen = StatusScreen::new();
        assert!(draw(&screen, &d).contains("No logs available yet..."));

        let action = screen
            .handle_key_event(KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE))
            .unwrap()
            .unwrap();
        screen.update(&action, &mut d).unwrap();
        let drawn = draw(&screen, &d);
        assert!(drawn.contains("Noch keine Logs verfügbar..."));
        assert!(drawn.contains("Live-Logs"));
        assert!(!drawn.contains("No logs available yet..."));

        screen.update(&Action::ClearLogs, &mut d).unwrap();
        assert!(draw(&screen, &d).contains("Logs gelöscht"));
    }

    #[test]
    fn render_feeds_viewport_back() {
        let mut d = dashboard();
        let mut screen = StatusScreen::new();
        draw(&screen, &d);
        screen.update(&Action::Render, &mut d).unwrap();
        // 20 rows minus the 7-row status panel minus the log borders.
        assert_eq!(d.logs().viewport(), 11);

        d.apply(PollEvent::Logs {
            generation: 1,
            entries: entries(30),
        });
        assert_eq!(d.logs().visible().len(), 11);
        assert_eq!(d.logs().distance_from_bottom(), 0);
    }

    #[test]
    fn collapsed_panel_is_one_line() {
        let mut d = dashboard();
        let mut screen = StatusScreen::new();
        screen.update(&Action::ToggleLogs, &mut d).unwrap();
        let drawn = draw(&screen, &d);
        assert!(drawn.contains("▶ Live Logs"));
        assert!(!drawn.contains("Auto-scroll"));
    }

    #[test]
    fn scroll_keys_move_the_log_view() {
        let mut d = dashboard();
        d.logs_mut().set_viewport(5);
        d.apply(PollEvent::Logs {
            generation: 1,
            entries: entries(20),
        });
        let mut screen = StatusScreen::new();

        let key = KeyEvent::new(KeyCode::Char('g'), KeyModifiers::NONE);
        let action = screen.handle_key_event(key).unwrap().unwrap();
        screen.update(&action, &mut d).unwrap();
        assert_eq!(d.logs().offset(), 0);

        screen
            .update(&Action::ScrollLogs(Scroll::PageDown), &mut d)
            .unwrap();
        assert_eq!(d.logs().offset(), 5);
    }

    #[test]
    fn language_key_switches_and_notifies() {
        let mut d = dashboard();
        let mut screen = StatusScreen::new();
        let key = KeyEvent::new(KeyCode::Char('l'), KeyModifiers::NONE);
        let action = screen.handle_key_event(key).unwrap().unwrap();

        let follow_up = screen.update(&action, &mut d).unwrap();
        let Some(Action::Notify(alert)) = follow_up else {
            panic!("expected a notification, got {follow_up:?}");
        };
        assert_eq!(alert.message, "Sprache: Deutsch");
        assert_eq!(d.status_view().title, "Keine CD eingelegt");
    }
}

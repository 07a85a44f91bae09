// ── View-model renderer ──
//
// Pure transformations from service payloads into what the terminal
// draws. Nothing here touches the terminal; the TUI only paints these
// structures, which keeps every display rule unit-testable.

use std::fmt::Write as _;

use ripwatch_api::{LogEntry, StatusSnapshot, StepId};
use strum::EnumString;

use crate::i18n::{Markup, Translator};

/// Rows of slack below which the log view counts as "at the bottom".
pub const PIN_THRESHOLD: usize = 1;

// ── Status ──────────────────────────────────────────────────────────

/// Which of the three status layouts applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusPhase {
    /// No disc in the drive. `processing` is ignored in this state.
    #[default]
    NoDisc,
    /// Disc present, pipeline idle.
    Detected,
    /// Disc present and being ripped.
    Processing,
}

/// Progress block, shown only while processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub step: String,
    /// "Track 3 of 10"; `None` unless both numbers are non-zero.
    pub track: Option<String>,
    /// Percentage as reported, 0 when absent.
    pub percent: u32,
}

/// Everything the status panel shows for one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusView {
    pub phase: StatusPhase,
    pub title: String,
    pub artist: String,
    /// Highlight the artist line (disc detected but idle).
    pub artist_highlight: bool,
    pub cover_url: Option<String>,
    /// Show the disc graphic in place of a missing cover while processing.
    pub cover_placeholder: bool,
    pub warning: Option<Markup>,
    pub progress: Option<ProgressView>,
}

/// Build the status view for `snapshot` in the translator's language.
pub fn render_status(snapshot: &StatusSnapshot, t: &Translator) -> StatusView {
    let Some(cd) = snapshot.current_cd.as_ref() else {
        return StatusView {
            phase: StatusPhase::NoDisc,
            title: t.t("no_cd"),
            ..StatusView::default()
        };
    };

    let processing = snapshot.processing;
    let fallback_title = if processing { "unknown_cd" } else { "cd_detected" };
    let title = non_empty(cd.name.as_deref()).map_or_else(|| t.t(fallback_title), escape_text);
    let artist = non_empty(cd.artist.as_deref()).map(escape_text).unwrap_or_default();
    let cover_url = non_empty(cd.cover_url.as_deref()).map(str::to_owned);

    if !processing {
        return StatusView {
            phase: StatusPhase::Detected,
            title,
            artist,
            artist_highlight: true,
            cover_url,
            cover_placeholder: false,
            warning: None,
            progress: None,
        };
    }

    let track = match (snapshot.current_track, snapshot.total_tracks) {
        (Some(current), Some(total)) if current != 0 && total != 0 => {
            let (current, total) = (current.to_string(), total.to_string());
            Some(t.t_with(
                "track_of",
                &[("current", current.as_str()), ("total", total.as_str())],
            ))
        }
        _ => None,
    };

    StatusView {
        phase: StatusPhase::Processing,
        title,
        artist,
        artist_highlight: false,
        cover_placeholder: cover_url.is_none(),
        cover_url,
        warning: Some(t.markup("warning_banner")),
        progress: Some(ProgressView {
            step: step_name(snapshot.current_step.as_ref(), t),
            track,
            percent: snapshot.progress.unwrap_or(0),
        }),
    }
}

/// Localized label for a pipeline stage.
pub fn step_name(step: Option<&StepId>, t: &Translator) -> String {
    let key = match step {
        None => "waiting",
        Some(StepId::Detecting) => "step_detecting",
        Some(StepId::Identifying) => "step_identifying",
        Some(StepId::Ripping) => "step_ripping",
        Some(StepId::Encoding) => "step_encoding",
        Some(StepId::Tagging) => "step_tagging",
        Some(StepId::Syncing) => "step_syncing",
        Some(StepId::Done) => "step_done",
        Some(StepId::Other(_)) => "processing",
    };
    t.t(key)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ── Logs ────────────────────────────────────────────────────────────

/// Styling class of a log level.
#[derive(Debug, Clone, PartialEq, Eq, EnumString)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum LevelClass {
    Debug,
    Info,
    #[strum(serialize = "WARNING", serialize = "WARN")]
    Warning,
    Error,
    Critical,
    Success,
    #[strum(default)]
    Other(String),
}

impl LevelClass {
    /// Levels carrying a check mark render as `SUCCESS`; everything else
    /// keeps the level text as its class.
    pub fn classify(level: &str) -> Self {
        if level.contains('✅') || level.contains('✓') {
            return Self::Success;
        }
        level.parse().unwrap_or_else(|_| Self::Other(level.to_owned()))
    }
}

/// One rendered log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow {
    pub time: String,
    /// Level text exactly as the service sent it.
    pub level: String,
    pub class: LevelClass,
    /// Escaped message, always drawn as literal text.
    pub message: String,
}

impl LogRow {
    pub fn from_entry(entry: &LogEntry) -> Self {
        Self {
            time: time_of_day(&entry.timestamp).to_owned(),
            level: entry.level.clone(),
            class: LevelClass::classify(&entry.level),
            message: escape_text(&entry.message),
        }
    }
}

/// What the log panel currently holds.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogContent {
    /// Nothing fetched yet, or the last batch was empty.
    #[default]
    Empty,
    /// Cleared by the operator; the next poll repopulates.
    Cleared,
    Rows(Vec<LogRow>),
}

/// Log panel state: rows, scroll position and the auto-scroll flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogView {
    content: LogContent,
    /// Index of the first visible row.
    offset: usize,
    viewport: usize,
    auto_scroll: bool,
}

impl Default for LogView {
    fn default() -> Self {
        Self {
            content: LogContent::Empty,
            offset: 0,
            viewport: 0,
            auto_scroll: true,
        }
    }
}

impl LogView {
    /// Replace every row with `entries` (oldest first).
    ///
    /// If auto-scroll is on and the view was within `PIN_THRESHOLD` rows of
    /// the bottom, it follows the new bottom. Otherwise the scroll position
    /// is left alone.
    pub fn render(&mut self, entries: &[LogEntry]) {
        if entries.is_empty() {
            self.content = LogContent::Empty;
            self.offset = 0;
            return;
        }

        let pinned = self.auto_scroll && self.near_bottom();
        self.content = LogContent::Rows(entries.iter().map(LogRow::from_entry).collect());

        if pinned {
            self.scroll_to_bottom();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Drop all rows in favour of the "cleared" placeholder.
    pub fn clear(&mut self) {
        self.content = LogContent::Cleared;
        self.offset = 0;
    }

    /// Placeholder text, when there are no rows to show.
    pub fn placeholder(&self, t: &Translator) -> Option<String> {
        match self.content {
            LogContent::Empty => Some(t.t("logs_empty")),
            LogContent::Cleared => Some(t.t("logs_cleared")),
            LogContent::Rows(_) => None,
        }
    }

    pub fn content(&self) -> &LogContent {
        &self.content
    }

    pub fn rows(&self) -> &[LogRow] {
        match &self.content {
            LogContent::Rows(rows) => rows,
            _ => &[],
        }
    }

    /// Rows inside the viewport.
    pub fn visible(&self) -> &[LogRow] {
        let rows = self.rows();
        let start = self.offset.min(rows.len());
        let end = start.saturating_add(self.viewport).min(rows.len());
        rows.get(start..end).unwrap_or_default()
    }

    pub fn auto_scroll(&self) -> bool {
        self.auto_scroll
    }

    pub fn set_auto_scroll(&mut self, enabled: bool) {
        self.auto_scroll = enabled;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn viewport(&self) -> usize {
        self.viewport
    }

    /// Update the number of visible rows. A view within `PIN_THRESHOLD`
    /// rows of the bottom ends up at the bottom after the resize.
    pub fn set_viewport(&mut self, rows: usize) {
        if rows == self.viewport {
            return;
        }
        let at_bottom = self.near_bottom();
        self.viewport = rows;
        if at_bottom {
            self.scroll_to_bottom();
        } else {
            self.offset = self.offset.min(self.max_offset());
        }
    }

    /// Rows between the last visible row and the last row.
    pub fn distance_from_bottom(&self) -> usize {
        self.max_offset().saturating_sub(self.offset)
    }

    fn near_bottom(&self) -> bool {
        self.distance_from_bottom() <= PIN_THRESHOLD
    }

    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset());
    }

    pub fn scroll_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    fn max_offset(&self) -> usize {
        self.rows().len().saturating_sub(self.viewport)
    }
}

// ── Text helpers ────────────────────────────────────────────────────

/// Time-of-day part of a `"YYYY-MM-DD HH:MM:SS"` timestamp; anything
/// without a space-separated second field is returned whole.
pub fn time_of_day(timestamp: &str) -> &str {
    match timestamp.split(' ').nth(1) {
        Some(time) if !time.is_empty() => time,
        _ => timestamp,
    }
}

/// Make untrusted text safe to print in a terminal.
///
/// Control characters (including ESC, so no terminal escape sequence can
/// survive) and bidi overrides are replaced with visible `\u{..}` escapes.
/// Tabs become a single space.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c == '\t' {
            out.push(' ');
        } else if c.is_control() || is_bidi_control(c) {
            let _ = write!(out, "\\u{{{:x}}}", u32::from(c));
        } else {
            out.push(c);
        }
    }
    out
}

fn is_bidi_control(c: char) -> bool {
    matches!(c, '\u{202a}'..='\u{202e}' | '\u{2066}'..='\u{2069}')
}

#[cfg(test)]
mod tests {
    use ripwatch_api::CdInfo;

    use super::*;
    use crate::i18n::Catalog;

    fn en() -> Translator {
        Translator::new(Catalog::builtin())
    }

    fn disc(name: Option<&str>) -> Option<CdInfo> {
        Some(CdInfo {
            name: name.map(str::to_owned),
            artist: Some("Queen".into()),
            cover_url: Some("/covers/1.jpg".into()),
            ..CdInfo::default()
        })
    }

    fn entries(n: usize) -> Vec<LogEntry> {
        (0..n)
            .map(|i| LogEntry {
                timestamp: format!("2025-11-03 00:00:{i:02}"),
                message: format!("line {i}"),
                ..LogEntry::default()
            })
            .collect()
    }

    // ── Status ──────────────────────────────────────────────────────

    #[test]
    fn no_disc_hides_progress_whatever_else_is_set() {
        let snapshot = StatusSnapshot {
            current_cd: None,
            processing: true,
            current_step: Some(StepId::Ripping),
            current_track: Some(3),
            total_tracks: Some(10),
            progress: Some(50),
            last_update: None,
        };
        let view = render_status(&snapshot, &en());
        assert_eq!(view.phase, StatusPhase::NoDisc);
        assert_eq!(view.title, "No CD inserted");
        assert!(view.warning.is_none());
        assert!(view.progress.is_none());
        assert!(view.cover_url.is_none());
    }

    #[test]
    fn processing_passes_progress_through() {
        for percent in [0, 1, 37, 100] {
            let snapshot = StatusSnapshot {
                current_cd: disc(Some("A Night at the Opera")),
                processing: true,
                progress: Some(percent),
                ..StatusSnapshot::default()
            };
            let view = render_status(&snapshot, &en());
            assert_eq!(view.progress.map(|p| p.percent), Some(percent));
        }
    }

    #[test]
    fn processing_without_progress_shows_zero() {
        let snapshot = StatusSnapshot {
            current_cd: disc(None),
            processing: true,
            ..StatusSnapshot::default()
        };
        let view = render_status(&snapshot, &en());
        assert_eq!(view.phase, StatusPhase::Processing);
        assert_eq!(view.title, "Unknown CD");
        assert!(view.warning.is_some());
        let progress = view.progress.expect("progress");
        assert_eq!(progress.percent, 0);
        assert_eq!(progress.step, "Waiting...");
    }

    #[test]
    fn processing_without_cover_shows_placeholder() {
        let mut snapshot = StatusSnapshot {
            current_cd: Some(CdInfo {
                name: Some("Jazz".into()),
                artist: Some("Queen".into()),
                cover_url: None,
                ..CdInfo::default()
            }),
            processing: true,
            ..StatusSnapshot::default()
        };
        let view = render_status(&snapshot, &en());
        assert!(view.cover_url.is_none());
        assert!(view.cover_placeholder);

        snapshot.current_cd = disc(Some("Jazz"));
        let view = render_status(&snapshot, &en());
        assert_eq!(view.cover_url.as_deref(), Some("/covers/1.jpg"));
        assert!(!view.cover_placeholder);

        // Idle discs never get the placeholder.
        snapshot.processing = false;
        snapshot.current_cd = Some(CdInfo::default());
        assert!(!render_status(&snapshot, &en()).cover_placeholder);
    }

    #[test]
    fn track_text_needs_both_numbers() {
        let mut snapshot = StatusSnapshot {
            current_cd: disc(Some("x")),
            processing: true,
            current_track: Some(3),
            total_tracks: Some(10),
            ..StatusSnapshot::default()
        };
        let track = |s: &StatusSnapshot| render_status(s, &en()).progress.and_then(|p| p.track);
        assert_eq!(track(&snapshot).as_deref(), Some("Track 3 of 10"));

        snapshot.current_track = Some(0);
        assert_eq!(track(&snapshot), None);

        snapshot.current_track = Some(3);
        snapshot.total_tracks = None;
        assert_eq!(track(&snapshot), None);
    }

    #[test]
    fn detected_disc_is_idle_layout() {
        let snapshot = StatusSnapshot {
            current_cd: disc(None),
            processing: false,
            progress: Some(80),
            ..StatusSnapshot::default()
        };
        let view = render_status(&snapshot, &en());
        assert_eq!(view.phase, StatusPhase::Detected);
        assert_eq!(view.title, "CD detected");
        assert_eq!(view.artist, "Queen");
        assert!(view.artist_highlight);
        assert_eq!(view.cover_url.as_deref(), Some("/covers/1.jpg"));
        assert!(view.progress.is_none());
    }

    #[test]
    fn step_names_follow_language() {
        let mut t = en();
        assert_eq!(step_name(Some(&StepId::Syncing), &t), "Syncing to server");
        assert_eq!(step_name(Some(&StepId::Other("x".into())), &t), "Processing...");
        t.set_language("de");
        assert_eq!(step_name(Some(&StepId::Encoding), &t), "Kodiere");
        assert_eq!(step_name(None, &t), "Warte...");
    }

    // ── Logs ────────────────────────────────────────────────────────

    #[test]
    fn script_message_stays_literal() {
        let entry = LogEntry {
            message: "<script>alert(1)</script>".into(),
            ..LogEntry::default()
        };
        let row = LogRow::from_entry(&entry);
        assert_eq!(row.message, "<script>alert(1)</script>");
    }

    #[test]
    fn escape_sequences_are_neutralized() {
        let escaped = escape_text("\u{1b}[2Jboom\u{7}\ttab\u{202e}");
        assert!(!escaped.contains('\u{1b}'));
        assert!(!escaped.contains('\u{202e}'));
        assert_eq!(escaped, "\\u{1b}[2Jboom\\u{7} tab\\u{202e}");
    }

    #[test]
    fn time_of_day_extraction() {
        assert_eq!(time_of_day("2025-11-03 00:15:52"), "00:15:52");
        assert_eq!(time_of_day("2025-11-03T00:15:52"), "2025-11-03T00:15:52");
        assert_eq!(time_of_day(""), "");
    }

    #[test]
    fn level_classes() {
        assert_eq!(LevelClass::classify("✅ SUCCESS"), LevelClass::Success);
        assert_eq!(LevelClass::classify("✓ done"), LevelClass::Success);
        assert_eq!(LevelClass::classify("warning"), LevelClass::Warning);
        assert_eq!(LevelClass::classify("ERROR"), LevelClass::Error);
        assert_eq!(
            LevelClass::classify("NOTICE"),
            LevelClass::Other("NOTICE".into())
        );
    }

    #[test]
    fn pinned_view_follows_new_bottom() {
        let mut view = LogView::default();
        view.set_viewport(10);
        view.render(&entries(30));
        assert_eq!(view.offset(), 20);

        view.render(&entries(45));
        assert_eq!(view.distance_from_bottom(), 0);
        assert_eq!(view.offset(), 35);
    }

    #[test]
    fn scrolled_up_view_keeps_position() {
        let mut view = LogView::default();
        view.set_viewport(10);
        view.render(&entries(30));
        view.scroll_up(5);
        assert_eq!(view.offset(), 15);

        view.render(&entries(45));
        assert_eq!(view.offset(), 15);
    }

    #[test]
    fn one_row_of_slack_still_counts_as_bottom() {
        let mut view = LogView::default();
        view.set_viewport(10);
        view.render(&entries(30));
        view.scroll_up(PIN_THRESHOLD);

        view.render(&entries(40));
        assert_eq!(view.distance_from_bottom(), 0);
    }

    #[test]
    fn resize_uses_the_same_slack_as_new_rows() {
        let mut view = LogView::default();
        view.set_viewport(10);
        view.render(&entries(30));
        view.scroll_up(PIN_THRESHOLD);

        view.set_viewport(8);
        assert_eq!(view.distance_from_bottom(), 0);
        assert_eq!(view.offset(), 22);

        // Further up than the slack: the position is kept.
        view.scroll_up(5);
        view.set_viewport(6);
        assert_eq!(view.offset(), 17);
    }

    #[test]
    fn auto_scroll_off_never_follows() {
        let mut view = LogView::default();
        view.set_viewport(10);
        view.render(&entries(30));
        view.set_auto_scroll(false);

        view.render(&entries(40));
        assert_eq!(view.offset(), 20);
    }

    #[test]
    fn empty_batch_shows_placeholder() {
        let t = en();
        let mut view = LogView::default();
        view.render(&entries(3));
        assert!(view.placeholder(&t).is_none());

        view.render(&[]);
        assert_eq!(view.placeholder(&t).as_deref(), Some("No logs available yet..."));

        view.clear();
        assert_eq!(view.placeholder(&t).as_deref(), Some("Logs cleared"));
        assert!(view.rows().is_empty());
    }

    #[test]
    fn visible_window_tracks_offset() {
        let mut view = LogView::default();
        view.set_viewport(4);
        view.render(&entries(6));
        let messages: Vec<_> = view.visible().iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, ["line 2", "line 3", "line 4", "line 5"]);
    }
}

// ── Dashboard context ──
//
// The state behind the status screen, owned by the UI loop. Poll events
// are applied here after passing the freshness gates; the operator
// actions in `actions.rs` mutate it as well.

use ripwatch_api::StatusSnapshot;
use url::Url;

use crate::i18n::Translator;
use crate::poller::{FreshnessGate, PollEvent};
use crate::render::{LogView, StatusView, render_status};

pub struct Dashboard {
    pub(crate) translator: Translator,
    base_url: Url,
    snapshot: StatusSnapshot,
    status_view: StatusView,
    pub(crate) logs: LogView,
    pub(crate) logs_expanded: bool,
    status_gate: FreshnessGate,
    logs_gate: FreshnessGate,
}

impl Dashboard {
    /// Starts in the "no disc" state with an empty log panel.
    pub fn new(translator: Translator, base_url: Url) -> Self {
        let snapshot = StatusSnapshot::default();
        let status_view = render_status(&snapshot, &translator);
        Self {
            translator,
            base_url,
            snapshot,
            status_view,
            logs: LogView::default(),
            logs_expanded: true,
            status_gate: FreshnessGate::default(),
            logs_gate: FreshnessGate::default(),
        }
    }

    /// Apply a poll result. Returns `false` if it was stale and dropped.
    pub fn apply(&mut self, event: PollEvent) -> bool {
        match event {
            PollEvent::Status {
                generation,
                snapshot,
            } => {
                if !self.status_gate.admit(generation) {
                    return false;
                }
                self.status_view = render_status(&snapshot, &self.translator);
                self.snapshot = snapshot;
            }
            PollEvent::Logs {
                generation,
                entries,
            } => {
                if !self.logs_gate.admit(generation) {
                    return false;
                }
                self.logs.render(&entries);
            }
        }
        true
    }

    /// Rebuild every translated piece of the view.
    pub fn rerender(&mut self) {
        self.status_view = render_status(&self.snapshot, &self.translator);
    }

    pub fn translator(&self) -> &Translator {
        &self.translator
    }

    pub fn snapshot(&self) -> &StatusSnapshot {
        &self.snapshot
    }

    pub fn status_view(&self) -> &StatusView {
        &self.status_view
    }

    pub fn logs(&self) -> &LogView {
        &self.logs
    }

    /// Scrolling and viewport updates from the UI.
    pub fn logs_mut(&mut self) -> &mut LogView {
        &mut self.logs
    }

    pub fn logs_expanded(&self) -> bool {
        self.logs_expanded
    }

    /// Window title for the status page.
    pub fn title(&self) -> String {
        self.translator.title("page_status")
    }

    /// The cover image location, resolved against the service URL when the
    /// service reports a relative path.
    pub fn cover_url(&self) -> Option<Url> {
        let raw = self.status_view.cover_url.as_deref()?;
        self.base_url.join(raw).ok()
    }
}

#[cfg(test)]
mod tests {
    use ripwatch_api::{CdInfo, LogEntry, StepId};

    use super::*;
    use crate::i18n::Catalog;
    use crate::render::StatusPhase;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            Translator::new(Catalog::builtin()),
            Url::parse("http://ripper.local:5000/").expect("url"),
        )
    }

    fn processing(generation: u64, progress: u32) -> PollEvent {
        PollEvent::Status {
            generation,
            snapshot: StatusSnapshot {
                current_cd: Some(CdInfo {
                    name: Some("Rumours".into()),
                    cover_url: Some("/covers/rumours.jpg".into()),
                    ..CdInfo::default()
                }),
                processing: true,
                current_step: Some(StepId::Ripping),
                progress: Some(progress),
                ..StatusSnapshot::default()
            },
        }
    }

    #[test]
    fn initial_state_is_no_disc() {
        let d = dashboard();
        assert_eq!(d.status_view().phase, StatusPhase::NoDisc);
        assert_eq!(d.title(), "CD-Ripper - Status");
    }

    #[test]
    fn stale_status_does_not_overwrite_newer() {
        let mut d = dashboard();
        assert!(d.apply(processing(2, 60)));
        assert!(!d.apply(processing(1, 10)));
        let percent = d.status_view().progress.as_ref().map(|p| p.percent);
        assert_eq!(percent, Some(60));
    }

    #[test]
    fn log_and_status_generations_are_independent() {
        let mut d = dashboard();
        assert!(d.apply(processing(5, 1)));
        assert!(d.apply(PollEvent::Logs {
            generation: 1,
            entries: vec![LogEntry::default()],
        }));
        assert_eq!(d.logs().rows().len(), 1);
    }

    #[test]
    fn cover_url_resolves_relative_paths() {
        let mut d = dashboard();
        d.apply(processing(1, 0));
        assert_eq!(
            d.cover_url().map(String::from).as_deref(),
            Some("http://ripper.local:5000/covers/rumours.jpg")
        );
    }
}

//! Screen identifiers.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ScreenId {
    /// Disc status and live logs.
    #[default]
    Status,
    /// Service configuration editor, opened with `,`.
    Settings,
}

impl ScreenId {
    /// Translation key of the page name, used in the window title.
    pub fn page_key(self) -> &'static str {
        match self {
            Self::Status => "page_status",
            Self::Settings => "settings_title",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Status => "Status",
            Self::Settings => "Settings",
        }
    }
}

impl fmt::Display for ScreenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

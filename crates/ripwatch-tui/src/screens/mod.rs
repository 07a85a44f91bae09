//! Screen implementations. Each screen is a top-level Component.

pub mod settings;
pub mod status;

use ripwatch_core::RipperClient;

use crate::component::Component;
use crate::screen::ScreenId;

/// Create every screen up front; they live for the whole session.
pub fn create_screens(client: &RipperClient) -> Vec<(ScreenId, Box<dyn Component>)> {
    vec![
        (ScreenId::Status, Box::new(status::StatusScreen::new())),
        (
            ScreenId::Settings,
            Box::new(settings::SettingsScreen::new(client.clone())),
        ),
    ]
}

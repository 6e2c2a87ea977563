//! Application window lifecycle

use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Shown,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub width: u16,
    pub height: u16,
    pub x: Option<i32>,
    pub y: Option<i32>,
}

/// Single-owner window handle with explicit lifecycle states. The
/// coordinator owns it exclusively; everything else observes it through
/// channel events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowState {
    Absent,
    Created {
        visibility: Visibility,
        geometry: Geometry,
    },
    Destroyed,
}

/// What a close request turned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    /// The window was hidden, not destroyed; the user dismissed it.
    Hidden,
    /// The window was destroyed; the application is exiting.
    Destroyed,
}

impl WindowState {
    /// Build the window from config-derived geometry and visibility.
    pub fn create(config: &Config) -> Self {
        WindowState::Created {
            visibility: if config.startmin {
                Visibility::Hidden
            } else {
                Visibility::Shown
            },
            geometry: Geometry {
                width: config.width,
                height: config.height,
                x: config.x,
                y: config.y,
            },
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, WindowState::Created { .. })
    }

    pub fn is_shown(&self) -> bool {
        matches!(
            self,
            WindowState::Created {
                visibility: Visibility::Shown,
                ..
            }
        )
    }

    pub fn hide(&mut self) {
        if let WindowState::Created { visibility, .. } = self {
            *visibility = Visibility::Hidden;
        }
    }

    pub fn show(&mut self) {
        if let WindowState::Created { visibility, .. } = self {
            *visibility = Visibility::Shown;
        }
    }

    pub fn destroy(&mut self) {
        *self = WindowState::Destroyed;
    }

    /// The close intercept: a normal close request hides the window;
    /// with an update pending the close proceeds and destroys it.
    pub fn handle_close_request(&mut self, update_pending: bool) -> CloseOutcome {
        if update_pending {
            self.destroy();
            CloseOutcome::Destroyed
        } else {
            self.hide();
            CloseOutcome::Hidden
        }
    }
}

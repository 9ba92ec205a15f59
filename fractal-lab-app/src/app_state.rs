/// Top-level screen the application is currently displaying.
///
/// Derived from the store's `show_introduction` flag each frame and used to
/// dispatch `update()` to the right screen-drawing logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AppScreen {
    /// Coordinate walkthrough shown on first launch.
    Introduction,
    /// Full-window tree with the control panel.
    Explorer,
}

impl AppScreen {
    pub(crate) fn from_flag(show_introduction: bool) -> Self {
        if show_introduction {
            Self::Introduction
        } else {
            Self::Explorer
        }
    }
}

/// Progress through the introduction walkthrough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum IntroStep {
    /// A single glowing dot at the origin; any click moves on.
    #[default]
    Origin,
    /// The user places up to three labelled points.
    PlacingPoints,
    /// Closing message, dismissed after a short pause.
    Closing,
}

/// Number of points the user places before the closing message.
pub(crate) const INTRO_POINT_COUNT: usize = 3;

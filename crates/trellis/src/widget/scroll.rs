//! Scrollbar policy and reporting.
//!
//! Only the *policy* of scrolling lives in the toolkit core: when a bar is
//! shown, what range/page/position it reports, and how scroll commands move
//! the viewport. The scrollbar's own drawing and thumb dragging belong to
//! the host, which reads [`ScrollInfo`] after any mutation and feeds
//! [`ScrollCommand`]s back in.

/// When a scrollbar should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBarPolicy {
    /// Show the bar whenever content overflows, hide it otherwise.
    #[default]
    Automatic,
    /// Always show the bar; it renders disabled when nothing overflows.
    Always,
    /// Never show the bar.
    Never,
}

/// Presentation state derived from the policy and the content extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBarVisibility {
    /// The bar is not shown.
    Hidden,
    /// The bar is shown but disabled, its page spanning the full range.
    DisabledFull,
    /// The bar is shown and live.
    Enabled,
}

/// Range, page and position reported to the host's scrollbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollInfo {
    /// Lowest scroll position.
    pub min: f32,
    /// Highest scroll position (inclusive).
    pub max: f32,
    /// Size of one page, in the same units as the range.
    pub page: f32,
    /// Current position.
    pub pos: f32,
    /// How the bar should be presented.
    pub visibility: ScrollBarVisibility,
}

impl ScrollInfo {
    /// Info for a hidden bar with a zeroed range.
    pub fn hidden() -> Self {
        Self {
            min: 0.0,
            max: 0.0,
            page: 0.0,
            pos: 0.0,
            visibility: ScrollBarVisibility::Hidden,
        }
    }
}

/// A scroll request delivered by the host's scrollbar or wheel handling.
///
/// The same commands serve both axes: "back" is up/left, "forward" is
/// down/right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollCommand {
    /// One line (one item, or one pixel horizontally) backwards.
    LineBack,
    /// One line forwards.
    LineForward,
    /// One page backwards.
    PageBack,
    /// One page forwards.
    PageForward,
    /// Drag the thumb to an absolute position in range units.
    ThumbTrack(f32),
}

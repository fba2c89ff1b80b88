//! # Swap Transitions
//!
//! The order of media changes during a mode swap, as a pure plan the swapper
//! executes against a host.
//!
//! Each link moves `absent -> not-applied -> applied`, and back to
//! `not-applied` only while being swapped out. The new link is always applied
//! *before* the old one is retired, so the document may briefly hold two
//! applied theme stylesheets but never zero.

use crate::mode::Media;

/// Lifecycle state of the link serving one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    /// No link exists for the mode.
    Absent,
    /// The link exists with `media="not all"`.
    NotApplied,
    /// The link exists with `media="all"`.
    Applied,
}

impl LinkState {
    /// State of a link with the given media, or [LinkState::Absent].
    pub fn of(media: Option<Media>) -> Self {
        match media {
            None => Self::Absent,
            Some(Media::NotAll) => Self::NotApplied,
            Some(Media::All) => Self::Applied,
        }
    }
}

/// One media change of a swap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapStep {
    /// Keep the outgoing link applied while the new one loads.
    HoldOld,
    /// Apply the incoming link.
    ApplyNew,
    /// Retire the outgoing link.
    RetireOld,
}

impl SwapStep {
    /// The media this step writes and whether it targets the new link.
    pub fn effect(self) -> (bool, Media) {
        match self {
            Self::HoldOld => (false, Media::All),
            Self::ApplyNew => (true, Media::All),
            Self::RetireOld => (false, Media::NotAll),
        }
    }
}

/// The ordered steps of one swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapPlan {
    /// Steps executed immediately.
    pub immediate: Vec<SwapStep>,
    /// Steps executed once the new stylesheet has loaded. Empty if it already has.
    pub after_load: Vec<SwapStep>,
}

impl SwapPlan {
    /// Plan a swap given whether an outgoing link exists and whether the
    /// incoming stylesheet is already loaded.
    pub fn new(has_old: bool, new_loaded: bool) -> Self {
        let mut immediate = Vec::with_capacity(3);
        if has_old {
            immediate.push(SwapStep::HoldOld);
        }

        let mut finish = vec![SwapStep::ApplyNew];
        if has_old {
            finish.push(SwapStep::RetireOld);
        }

        if new_loaded {
            immediate.extend(finish);
            Self {
                immediate,
                after_load: Vec::new(),
            }
        } else {
            Self {
                immediate,
                after_load: finish,
            }
        }
    }

    /// Returns `true` if part of the swap waits for the load event.
    pub fn awaits_load(&self) -> bool {
        !self.after_load.is_empty()
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One-shot completion cell for color-description negotiation.
//!
//! A description request is answered by exactly one asynchronous ready or
//! failed event. The protocol backend's event callback writes the cell
//! once; the blocking round-trip pump polls it between round trips. Only
//! one thread ever waits and one callback ever signals, so this is a
//! plain state cell rather than a condition variable.

/// State of one in-flight description negotiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NegotiationState {
    /// The compositor has not answered yet.
    Waiting,
    /// The description is usable; `identity` is the compositor's identity
    /// value for it.
    Ready {
        /// Compositor-assigned description identity.
        identity: u32,
    },
    /// The compositor rejected the description.
    Failed {
        /// Protocol cause code.
        cause: u32,
        /// Human-readable reason from the compositor.
        message: String,
    },
}

/// Single-shot cell written by the event callback, read by the pump loop.
///
/// The first completion wins; later attempts are reported to the caller
/// (`false`) and otherwise ignored, preserving the exactly-once transition
/// out of [`NegotiationState::Waiting`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NegotiationCell {
    state: NegotiationState,
}

impl NegotiationCell {
    /// Creates a cell in the waiting state.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: NegotiationState::Waiting,
        }
    }

    /// Records a ready reply. Returns `false` if the cell was already
    /// resolved, in which case the existing outcome is kept.
    pub fn complete_ready(&mut self, identity: u32) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = NegotiationState::Ready { identity };
        true
    }

    /// Records a failed reply. Returns `false` if the cell was already
    /// resolved, in which case the existing outcome is kept.
    pub fn complete_failed(&mut self, cause: u32, message: String) -> bool {
        if !self.is_pending() {
            return false;
        }
        self.state = NegotiationState::Failed { cause, message };
        true
    }

    /// Returns `true` while no reply has arrived.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self.state, NegotiationState::Waiting)
    }

    /// Current state of the negotiation.
    #[must_use]
    pub fn state(&self) -> &NegotiationState {
        &self.state
    }
}

impl Default for NegotiationCell {
    fn default() -> Self {
        Self::new()
    }
}

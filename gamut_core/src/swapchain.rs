// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-swapchain color-description bookkeeping.
//!
//! The description handle type is generic so the state machine can be
//! exercised without a protocol backend; the Wayland backend instantiates
//! it with its image-description proxy.

use crate::error::DescriptionError;

/// Color state carried by one managed swapchain.
///
/// `description == None` means "use the compositor default". The dirty
/// flag is set whenever the intended description differs from what was
/// last pushed to the compositor; present clears it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwapchainColorState<D> {
    /// Resolved primaries code (`0` = untagged).
    pub primaries: u32,
    /// Resolved transfer-function code (`0` = untagged).
    pub transfer_function: u32,
    /// Currently intended description handle.
    pub description: Option<D>,
    /// Whether the description still has to be pushed before present.
    pub dirty: bool,
}

impl<D> SwapchainColorState<D> {
    /// State for a freshly created swapchain. The initial description is
    /// pushed lazily, so the state starts dirty.
    #[must_use]
    pub fn new(primaries: u32, transfer_function: u32, description: Option<D>) -> Self {
        Self {
            primaries,
            transfer_function,
            description,
            dirty: true,
        }
    }

    /// Applies the outcome of a metadata-update negotiation.
    ///
    /// On success the stored description is replaced and marked dirty; the
    /// superseded handle is returned so the caller can release it. On
    /// failure the update is dropped: description and dirty flag stay
    /// exactly as they were, and the error is handed back for logging.
    pub fn apply_update(
        &mut self,
        outcome: Result<Option<D>, DescriptionError>,
    ) -> Result<Option<D>, DescriptionError> {
        let replacement = outcome?;
        let superseded = core::mem::replace(&mut self.description, replacement);
        self.dirty = true;
        Ok(superseded)
    }

    /// Takes the pending push for present time, clearing the dirty flag.
    ///
    /// Returns `None` when nothing has to be pushed, `Some(None)` for a
    /// "use compositor default" push, and `Some(Some(description))` for a
    /// description push.
    pub fn pending_push(&mut self) -> Option<Option<D>>
    where
        D: Clone,
    {
        if !self.dirty {
            return None;
        }
        self.dirty = false;
        Some(self.description.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::SwapchainColorState;
    use crate::error::DescriptionError;

    #[test]
    fn new_swapchain_starts_dirty() {
        let state = SwapchainColorState::new(9, 16, Some(1_u32));
        assert!(state.dirty, "initial description is pushed lazily");
    }

    #[test]
    fn failed_update_leaves_state_untouched() {
        let mut state = SwapchainColorState::new(9, 16, Some(1_u32));
        state.dirty = false;

        let result = state.apply_update(Err(DescriptionError::Rejected {
            cause: 1,
            message: "unsupported".into(),
        }));

        assert!(result.is_err(), "the failure is surfaced to the caller");
        assert_eq!(state.description, Some(1), "description unchanged");
        assert!(!state.dirty, "dirty flag unchanged");
    }

    #[test]
    fn successful_update_replaces_description_and_returns_superseded() {
        let mut state = SwapchainColorState::new(9, 16, Some(1_u32));
        state.dirty = false;

        let superseded = state.apply_update(Ok(Some(2))).expect("update applied");

        assert_eq!(superseded, Some(1), "old handle handed back for release");
        assert_eq!(state.description, Some(2));
        assert!(state.dirty, "replacement must be pushed at next present");
    }

    #[test]
    fn dirty_null_description_pushes_default_exactly_once() {
        let mut state: SwapchainColorState<u32> = SwapchainColorState::new(0, 0, None);

        assert_eq!(
            state.pending_push(),
            Some(None),
            "one use-default push for a dirty null description"
        );
        assert!(!state.dirty);
        assert_eq!(state.pending_push(), None, "no second push until dirtied");
    }

    #[test]
    fn clean_state_pushes_nothing() {
        let mut state = SwapchainColorState::new(9, 16, Some(5_u32));
        state.dirty = false;
        assert_eq!(state.pending_push(), None);
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-swapchain record tying the color state to its surface.

use gamut_core::registry::SurfaceHandle;
use gamut_core::swapchain::SwapchainColorState;
use parking_lot::{Mutex, MutexGuard};
use wayland_protocols::wp::color_management::v1::client::wp_image_description_v1::WpImageDescriptionV1;

/// One managed swapchain: the surface it presents to and its color state.
#[derive(Debug)]
pub struct SwapchainRecord {
    surface: SurfaceHandle,
    state: Mutex<SwapchainColorState<WpImageDescriptionV1>>,
}

impl SwapchainRecord {
    /// Creates the record for a freshly created swapchain.
    #[must_use]
    pub fn new(
        surface: SurfaceHandle,
        state: SwapchainColorState<WpImageDescriptionV1>,
    ) -> Self {
        Self {
            surface,
            state: Mutex::new(state),
        }
    }

    /// Handle of the surface this swapchain presents to.
    #[must_use]
    pub fn surface(&self) -> SurfaceHandle {
        self.surface
    }

    /// Locks the color state for an update or a present push.
    pub(crate) fn lock(&self) -> MutexGuard<'_, SwapchainColorState<WpImageDescriptionV1>> {
        self.state.lock()
    }

    /// Destroys the held description object, if any, at swapchain teardown.
    pub fn release_description(&self) {
        if let Some(description) = self.state.lock().description.take() {
            description.destroy();
        }
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface protocol object bookkeeping.

use gamut_core::error::DiscoveryError;
use gamut_core::registry::InstanceHandle;
use parking_lot::{Mutex, MutexGuard};
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_client::{Connection, Proxy};
use wayland_protocols::wp::color_management::v1::client::wp_color_management_surface_v1::WpColorManagementSurfaceV1;
use wayland_protocols::wp::color_representation::v1::client::wp_color_representation_surface_v1::WpColorRepresentationSurfaceV1;

use crate::connection::ColorConnection;

/// Protocol objects attached to one application surface.
///
/// The connection, the color-management surface and the representation
/// surface live and die together; all three are created when the surface
/// is first seen and destroyed when the application destroys it.
#[derive(Debug)]
pub(crate) struct SurfaceState {
    pub(crate) connection: ColorConnection,
    pub(crate) color_surface: WpColorManagementSurfaceV1,
    pub(crate) representation: WpColorRepresentationSurfaceV1,
}

/// One intercepted surface and its color state.
#[derive(Debug)]
pub struct SurfaceRecord {
    instance: InstanceHandle,
    surface_id: u32,
    inner: Mutex<SurfaceState>,
}

impl SurfaceRecord {
    /// Runs discovery for `wl_surface` and attaches the color objects.
    ///
    /// Fails when the compositor lacks the color protocols or the
    /// mandatory features, in which case the caller records nothing and
    /// the surface stays on the pass-through path.
    pub fn create(
        instance: InstanceHandle,
        conn: &Connection,
        wl_surface: &WlSurface,
    ) -> Result<Self, DiscoveryError> {
        let connection = ColorConnection::discover(conn)?;
        let qh = connection.queue_handle();
        let color_surface = connection.color_manager().get_surface(wl_surface, &qh, ());
        let representation = connection
            .representation_manager()
            .get_surface(wl_surface, &qh, ());
        connection
            .flush()
            .map_err(DiscoveryError::Transport)?;

        Ok(Self {
            instance,
            surface_id: wl_surface.id().protocol_id(),
            inner: Mutex::new(SurfaceState {
                connection,
                color_surface,
                representation,
            }),
        })
    }

    /// Handle of the instance this surface belongs to.
    #[must_use]
    pub fn instance(&self) -> InstanceHandle {
        self.instance
    }

    /// Protocol id of the underlying `wl_surface`, for log correlation.
    #[must_use]
    pub fn surface_id(&self) -> u32 {
        self.surface_id
    }

    /// Locks the protocol state for a negotiation or a present push.
    pub(crate) fn lock(&self) -> MutexGuard<'_, SurfaceState> {
        self.inner.lock()
    }

    /// Destroys the per-surface protocol objects.
    ///
    /// Swapchain records keyed on this surface become dangling once this
    /// runs; touching them afterwards is an application lifetime bug.
    pub fn destroy_objects(&self) {
        let state = self.inner.lock();
        state.color_surface.destroy();
        state.representation.destroy();
        if let Err(err) = state.connection.flush() {
            log::warn!(
                "failed to flush surface {} teardown: {err}",
                self.surface_id
            );
        }
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Compositor connection state and capability discovery.

use std::fmt;

use gamut_core::code;
use gamut_core::code::ColorCapabilities;
use gamut_core::error::DiscoveryError;
use gamut_core::negotiate::NegotiationCell;
use wayland_client::protocol::wl_registry::{self, WlRegistry};
use wayland_client::{Connection, Dispatch, EventQueue, QueueHandle, WEnum, delegate_noop};
use wayland_protocols::wp::color_management::v1::client::wp_color_management_surface_v1::WpColorManagementSurfaceV1;
use wayland_protocols::wp::color_management::v1::client::wp_color_manager_v1::{
    self, WpColorManagerV1,
};
use wayland_protocols::wp::color_management::v1::client::wp_image_description_creator_params_v1::WpImageDescriptionCreatorParamsV1;
use wayland_protocols::wp::color_management::v1::client::wp_image_description_v1::{
    self, WpImageDescriptionV1,
};
use wayland_protocols::wp::color_representation::v1::client::wp_color_representation_manager_v1::WpColorRepresentationManagerV1;
use wayland_protocols::wp::color_representation::v1::client::wp_color_representation_surface_v1::WpColorRepresentationSurfaceV1;

use crate::cicp;

/// Registry global advertised by compositors that want clients to skip
/// color management for forwarded X11 windows. Only its presence is
/// meaningful; the protocol itself is private to those compositors.
const BYPASS_GLOBAL: &str = "zcolor_bypass_xwayland";

/// Event-queue state for one surface's private connection view.
///
/// Holds everything the dispatch callbacks write: the capability sets the
/// manager advertises during discovery and the completion cell of the one
/// in-flight description negotiation, if any.
#[derive(Debug, Default)]
pub(crate) struct ConnectionState {
    pub(crate) caps: ColorCapabilities,
    color_manager: Option<WpColorManagerV1>,
    representation_manager: Option<WpColorRepresentationManagerV1>,
    bypass_seen: bool,
    pub(crate) negotiation: Option<NegotiationCell>,
}

impl Dispatch<WlRegistry, ()> for ConnectionState {
    fn event(
        state: &mut Self,
        registry: &WlRegistry,
        event: wl_registry::Event,
        _: &(),
        _: &Connection,
        qh: &QueueHandle<Self>,
    ) {
        if let wl_registry::Event::Global {
            name,
            interface,
            version,
        } = event
        {
            match interface.as_str() {
                "wp_color_manager_v1" => {
                    let manager =
                        registry.bind::<WpColorManagerV1, _, Self>(name, version.min(1), qh, ());
                    state.color_manager = Some(manager);
                }
                "wp_color_representation_manager_v1" => {
                    let manager = registry.bind::<WpColorRepresentationManagerV1, _, Self>(
                        name,
                        version.min(1),
                        qh,
                        (),
                    );
                    state.representation_manager = Some(manager);
                }
                BYPASS_GLOBAL => {
                    log::debug!("compositor advertises the X11 color bypass global");
                    state.bypass_seen = true;
                }
                _ => {}
            }
        }
    }
}

impl Dispatch<WpColorManagerV1, ()> for ConnectionState {
    fn event(
        state: &mut Self,
        _: &WpColorManagerV1,
        event: wp_color_manager_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        match event {
            wp_color_manager_v1::Event::SupportedFeature {
                feature: WEnum::Value(feature),
            } => {
                if let Some(feature) = cicp::feature_code(feature) {
                    state.caps.features.insert(feature);
                }
            }
            wp_color_manager_v1::Event::SupportedTfNamed {
                tf: WEnum::Value(tf),
            } => {
                if let Some(tf) = cicp::transfer_function_code(tf) {
                    state.caps.transfer_functions.insert(tf);
                }
            }
            wp_color_manager_v1::Event::SupportedPrimariesNamed {
                primaries: WEnum::Value(primaries),
            } => {
                if let Some(primaries) = cicp::primaries_code(primaries) {
                    state.caps.primaries.insert(primaries);
                }
            }
            wp_color_manager_v1::Event::Done => {
                state.caps.done = true;
            }
            _ => {}
        }
    }
}

impl Dispatch<WpImageDescriptionV1, ()> for ConnectionState {
    fn event(
        state: &mut Self,
        _: &WpImageDescriptionV1,
        event: wp_image_description_v1::Event,
        _: &(),
        _: &Connection,
        _: &QueueHandle<Self>,
    ) {
        let Some(cell) = state.negotiation.as_mut() else {
            log::warn!("image description reply with no negotiation in flight");
            return;
        };
        match event {
            wp_image_description_v1::Event::Ready { identity } => {
                if !cell.complete_ready(identity) {
                    log::warn!("duplicate ready for an already resolved description");
                }
            }
            wp_image_description_v1::Event::Failed { cause, msg } => {
                let cause = match cause {
                    WEnum::Value(cause) => cicp::cause_code(cause),
                    WEnum::Unknown(raw) => raw,
                };
                if !cell.complete_failed(cause, msg) {
                    log::warn!("duplicate failure for an already resolved description");
                }
            }
            _ => {}
        }
    }
}

delegate_noop!(ConnectionState: ignore WpColorRepresentationManagerV1);
delegate_noop!(ConnectionState: ignore WpImageDescriptionCreatorParamsV1);
delegate_noop!(ConnectionState: ignore WpColorManagementSurfaceV1);
delegate_noop!(ConnectionState: ignore WpColorRepresentationSurfaceV1);

/// One surface's private view of the compositor's color facilities.
///
/// Created by [`ColorConnection::discover`], which binds the globals on a
/// fresh event queue and pumps the capability burst. A connection that
/// survives discovery is guaranteed to hold both managers and the
/// mandatory parametric feature set.
pub struct ColorConnection {
    conn: Connection,
    queue: EventQueue<ConnectionState>,
    pub(crate) state: ConnectionState,
    color_manager: WpColorManagerV1,
    representation_manager: WpColorRepresentationManagerV1,
}

impl ColorConnection {
    /// Binds the color globals on a fresh queue and pumps discovery.
    ///
    /// Two round trips are required: the first delivers the registry
    /// globals and issues the binds, the second delivers the bound
    /// managers' capability bursts. Any missing global or mandatory
    /// feature fails discovery, after which the caller degrades the
    /// affected surface to pass-through.
    pub fn discover(conn: &Connection) -> Result<Self, DiscoveryError> {
        let mut queue = conn.new_event_queue::<ConnectionState>();
        let qh = queue.handle();
        let _registry = conn.display().get_registry(&qh, ());

        let mut state = ConnectionState::default();
        queue
            .dispatch_pending(&mut state)
            .map_err(|err| DiscoveryError::Transport(err.to_string()))?;
        for _ in 0..2 {
            queue
                .roundtrip(&mut state)
                .map_err(|err| DiscoveryError::Transport(err.to_string()))?;
        }

        let color_manager = state
            .color_manager
            .clone()
            .ok_or(DiscoveryError::MissingColorManager)?;
        for feature in [
            code::FEATURE_PARAMETRIC,
            code::FEATURE_SET_PRIMARIES,
            code::FEATURE_SET_TF_POWER,
        ] {
            if !state.caps.features.contains(feature) {
                return Err(DiscoveryError::MissingFeature(feature));
            }
        }
        let representation_manager = state
            .representation_manager
            .clone()
            .ok_or(DiscoveryError::MissingRepresentationManager)?;

        Ok(Self {
            conn: conn.clone(),
            queue,
            state,
            color_manager,
            representation_manager,
        })
    }

    /// Capabilities accumulated during discovery.
    #[must_use]
    pub fn capabilities(&self) -> &ColorCapabilities {
        &self.state.caps
    }

    /// Whether the compositor asked X11 clients to bypass color management.
    #[must_use]
    pub fn bypass_advertised(&self) -> bool {
        self.state.bypass_seen
    }

    /// The bound color-management manager.
    #[must_use]
    pub fn color_manager(&self) -> &WpColorManagerV1 {
        &self.color_manager
    }

    /// The bound color-representation manager.
    #[must_use]
    pub fn representation_manager(&self) -> &WpColorRepresentationManagerV1 {
        &self.representation_manager
    }

    /// Handle for creating protocol objects on this connection's queue.
    #[must_use]
    pub(crate) fn queue_handle(&self) -> QueueHandle<ConnectionState> {
        self.queue.handle()
    }

    /// Destroys the bound managers, releasing the protocol objects while
    /// the underlying connection stays open. Used by the instance-level
    /// probe, which only needs the capability snapshot.
    pub fn release(self) {
        self.color_manager.destroy();
        self.representation_manager.destroy();
        if let Err(err) = self.flush() {
            log::debug!("failed to flush manager teardown: {err}");
        }
    }

    /// Performs one blocking round trip on the private queue.
    pub(crate) fn pump(&mut self) -> Result<(), String> {
        self.queue
            .roundtrip(&mut self.state)
            .map(|_| ())
            .map_err(|err| err.to_string())
    }

    /// Flushes queued requests without waiting for replies.
    pub(crate) fn flush(&self) -> Result<(), String> {
        self.conn.flush().map_err(|err| err.to_string())
    }
}

impl fmt::Debug for ColorConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorConnection")
            .field("caps", &self.state.caps)
            .field("bypass_seen", &self.state.bypass_seen)
            .field("negotiation", &self.state.negotiation)
            .finish_non_exhaustive()
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Intercepted entry-point flows.
//!
//! Every entry point takes the wrapped driver's own implementation as a
//! closure and degrades to calling exactly that closure whenever the
//! relevant object is unmanaged. The interception shim decodes the raw
//! call parameters into the types used here and owns error reporting
//! back through the wrapped API.

use gamut_core::alpha::{self, CompositeAlpha};
use gamut_core::code::ColorCapabilities;
use gamut_core::describe::{DescriptionRequest, HdrMetadata};
use gamut_core::error::{DriverStatus, SwapchainError};
use gamut_core::format::{self, ColorSpace, PixelFormat, SurfaceFormat};
use gamut_core::registry::{HandleRegistry, InstanceHandle, SurfaceHandle, SwapchainHandle};
use gamut_core::swapchain::SwapchainColorState;
use wayland_client::Connection;
use wayland_client::protocol::wl_surface::WlSurface;
use wayland_protocols::wp::color_management::v1::client::wp_color_manager_v1::RenderIntent;
use wayland_protocols::wp::color_representation::v1::client::wp_color_representation_surface_v1::AlphaMode;

use crate::connection::ColorConnection;
use crate::surface::SurfaceRecord;
use crate::swapchain::SwapchainRecord;

/// Decoded parameters of an intercepted swapchain creation.
#[derive(Clone, Copy, Debug)]
pub struct SwapchainCreateInfo {
    /// Surface the swapchain presents to.
    pub surface: SurfaceHandle,
    /// Requested pixel format.
    pub format: PixelFormat,
    /// Requested color space.
    pub color_space: ColorSpace,
    /// Requested composite alpha.
    pub composite_alpha: CompositeAlpha,
}

/// Instance-level record: the capability snapshot of the environment
/// probe that decided this instance is managed.
#[derive(Debug)]
struct InstanceRecord {
    caps: ColorCapabilities,
}

/// The layer's global state: one registry per wrapped object kind.
#[derive(Debug, Default)]
pub struct HdrLayer {
    instances: HandleRegistry<InstanceHandle, InstanceRecord>,
    surfaces: HandleRegistry<SurfaceHandle, SurfaceRecord>,
    swapchains: HandleRegistry<SwapchainHandle, SwapchainRecord>,
}

impl HdrLayer {
    /// Creates a layer with empty registries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Probes the environment for a freshly created instance.
    ///
    /// The instance is recorded as managed only when a compositor with
    /// the full color protocol stack is reachable; in every other case
    /// this logs and leaves the instance unmanaged. Instance creation
    /// itself never fails on account of color support.
    pub fn instance_created(&self, instance: InstanceHandle) {
        let conn = match Connection::connect_to_env() {
            Ok(conn) => conn,
            Err(err) => {
                log::debug!("no wayland display, {instance:?} unmanaged: {err}");
                return;
            }
        };
        match ColorConnection::discover(&conn) {
            Ok(probe) => {
                let caps = probe.capabilities().clone();
                if probe.bypass_advertised() {
                    log::debug!("{instance:?}: compositor advertises the X11 bypass global");
                }
                probe.release();
                log::info!(
                    "{instance:?} managed: {} transfer functions, {} primaries",
                    caps.transfer_functions.len(),
                    caps.primaries.len(),
                );
                if !self.instances.insert(instance, InstanceRecord { caps }) {
                    log::warn!("{instance:?} created twice without destruction");
                }
            }
            Err(err) => {
                log::info!("{instance:?} unmanaged: {err}");
            }
        }
    }

    /// Capability snapshot taken when `instance` was probed, if managed.
    #[must_use]
    pub fn instance_capabilities(&self, instance: InstanceHandle) -> Option<ColorCapabilities> {
        self.instances.get(instance).map(|record| record.caps.clone())
    }

    /// Drops the instance record, if any.
    pub fn instance_destroyed(&self, instance: InstanceHandle) {
        if self.instances.remove(instance).is_some() {
            log::debug!("{instance:?} destroyed");
        }
    }

    /// Attaches color state to a freshly created presentation surface.
    ///
    /// `conn` is the connection that owns `wl_surface`; discovery runs on
    /// a private queue of that connection. A discovery failure leaves the
    /// surface unmanaged and the surface creation call unaffected.
    pub fn surface_created(
        &self,
        instance: InstanceHandle,
        surface: SurfaceHandle,
        conn: &Connection,
        wl_surface: &WlSurface,
    ) {
        if self.instances.get(instance).is_none() {
            log::debug!("{surface:?} on unmanaged {instance:?}, skipping color setup");
            return;
        }
        match SurfaceRecord::create(instance, conn, wl_surface) {
            Ok(record) => {
                log::info!("{surface:?} managed (wl_surface {})", record.surface_id());
                if !self.surfaces.insert(surface, record) {
                    log::warn!("{surface:?} created twice without destruction");
                }
            }
            Err(err) => {
                log::info!("{surface:?} unmanaged: {err}");
            }
        }
    }

    /// Drops the surface record and its protocol objects, if any.
    pub fn surface_destroyed(&self, surface: SurfaceHandle) {
        if let Some(record) = self.surfaces.remove(surface) {
            record.destroy_objects();
            log::debug!("{surface:?} destroyed");
        }
    }

    /// Intercepted surface-format enumeration.
    ///
    /// Returns the driver's own list with the supported candidate pairs
    /// appended. The splice is deterministic for a given surface, so the
    /// count and fill phases of the wrapped two-call enumeration see the
    /// same sequence.
    pub fn surface_formats<F>(&self, surface: SurfaceHandle, next: F) -> Vec<SurfaceFormat>
    where
        F: FnOnce() -> Vec<SurfaceFormat>,
    {
        let mut formats = next();
        let Some(record) = self.surfaces.get(surface) else {
            return formats;
        };

        let native: Vec<PixelFormat> = formats.iter().map(|pair| pair.format).collect();
        let extras = {
            let state = record.lock();
            format::extra_formats(state.connection.capabilities(), &native)
        };
        if !extras.is_empty() {
            log::debug!("{surface:?}: advertising {} extra format pairs", extras.len());
        }
        formats.extend(extras);
        formats
    }

    /// Intercepted swapchain creation.
    ///
    /// For a managed surface the driver sees the neutral sRGB color space
    /// while the requested one is negotiated out-of-band; the swapchain
    /// record starts dirty so the first present pushes the description.
    /// `native_formats` is the driver's format list for the surface,
    /// without the layer's additions.
    pub fn create_swapchain<F>(
        &self,
        swapchain: SwapchainHandle,
        info: &SwapchainCreateInfo,
        native_formats: &[PixelFormat],
        next: F,
    ) -> Result<(), SwapchainError>
    where
        F: FnOnce(&SwapchainCreateInfo) -> Result<(), DriverStatus>,
    {
        let Some(surface_record) = self.surfaces.get(info.surface) else {
            return next(info).map_err(SwapchainError::from);
        };

        if !native_formats.contains(&info.format) {
            log::warn!(
                "{:?}: rejecting swapchain with format {:?} the surface lacks",
                info.surface,
                info.format,
            );
            return Err(SwapchainError::UnsupportedFormat);
        }

        let forwarded = SwapchainCreateInfo {
            color_space: ColorSpace::SRGB_NONLINEAR,
            ..*info
        };
        next(&forwarded)?;

        let (primaries, transfer_function) = match format::resolve_codes(info.color_space) {
            Some(codes) => codes,
            None => {
                log::warn!(
                    "{:?}: unknown color space {:?}, treating as untagged",
                    info.surface,
                    info.color_space,
                );
                (0, 0)
            }
        };

        let mut state = surface_record.lock();
        if let Some(mode) = alpha::alpha_mode_for(info.composite_alpha) {
            state.representation.set_alpha_mode(protocol_alpha(mode));
        }
        let request = DescriptionRequest::from_codes(primaries, transfer_function);
        let description = state.connection.negotiate_description(&request)?;
        drop(state);

        log::info!(
            "{swapchain:?} on {:?}: {:?} negotiated (primaries {primaries}, tf {transfer_function})",
            info.surface,
            info.color_space,
        );
        let record = SwapchainRecord::new(
            info.surface,
            SwapchainColorState::new(primaries, transfer_function, description),
        );
        if !self.swapchains.insert(swapchain, record) {
            log::warn!("{swapchain:?} created twice without destruction");
        }
        Ok(())
    }

    /// Intercepted HDR metadata update for a batch of swapchains.
    ///
    /// Unmanaged swapchains are logged and skipped. For a managed one the
    /// mastering description is renegotiated; a rejected negotiation
    /// drops the update and keeps the previous description and dirty
    /// state untouched.
    pub fn set_hdr_metadata(&self, updates: &[(SwapchainHandle, HdrMetadata)]) {
        for (handle, metadata) in updates {
            let Some(record) = self.swapchains.get(*handle) else {
                log::debug!("{handle:?} is unmanaged, hdr metadata ignored");
                continue;
            };
            let surface = self.surface_record_or_abort(record.surface(), "hdr metadata update");

            let outcome = {
                let mut state = surface.lock();
                state
                    .connection
                    .negotiate_description(&DescriptionRequest::Mastering(*metadata))
            };
            let mut chain = record.lock();
            match chain.apply_update(outcome) {
                Ok(Some(superseded)) => superseded.destroy(),
                Ok(None) => {}
                Err(err) => {
                    log::warn!("{handle:?}: hdr metadata update dropped: {err}");
                }
            }
        }
    }

    /// Intercepted present for a batch of swapchains.
    ///
    /// Pushes any pending description change for each managed swapchain
    /// before forwarding the present to the driver.
    pub fn present<F>(&self, presented: &[SwapchainHandle], next: F) -> Result<(), DriverStatus>
    where
        F: FnOnce() -> Result<(), DriverStatus>,
    {
        for handle in presented {
            let Some(record) = self.swapchains.get(*handle) else {
                continue;
            };
            let surface = self.surface_record_or_abort(record.surface(), "present");

            let state = surface.lock();
            let push = record.lock().pending_push();
            if let Some(push) = push {
                match push.as_ref() {
                    Some(description) => {
                        state
                            .color_surface
                            .set_image_description(description, RenderIntent::Perceptual);
                    }
                    None => state.color_surface.unset_image_description(),
                }
                if let Err(err) = state.connection.flush() {
                    log::warn!("{handle:?}: failed to flush description push: {err}");
                }
            }
        }
        next()
    }

    /// Drops the swapchain record and its description, if any.
    pub fn swapchain_destroyed(&self, swapchain: SwapchainHandle) {
        if let Some(record) = self.swapchains.remove(swapchain) {
            record.release_description();
            log::debug!("{swapchain:?} destroyed");
        }
    }

    /// Looks up the surface record a managed swapchain points at.
    ///
    /// A managed swapchain outliving its surface record means the
    /// application destroyed the surface first. The handle maps are
    /// corrupt at that point and continuing would dereference freed
    /// driver objects, so the process aborts.
    fn surface_record_or_abort(
        &self,
        surface: SurfaceHandle,
        during: &str,
    ) -> std::sync::Arc<SurfaceRecord> {
        let Some(record) = self.surfaces.get(surface) else {
            log::error!("{during} for a swapchain whose {surface:?} is destroyed, aborting");
            std::process::abort();
        };
        if self.instances.get(record.instance()).is_none() {
            log::error!(
                "{during} for a swapchain whose instance {:?} is destroyed, aborting",
                record.instance(),
            );
            std::process::abort();
        }
        record
    }
}

fn protocol_alpha(mode: alpha::AlphaMode) -> AlphaMode {
    match mode {
        alpha::AlphaMode::PremultipliedElectrical => AlphaMode::PremultipliedElectrical,
        alpha::AlphaMode::Straight => AlphaMode::Straight,
    }
}

#[cfg(test)]
mod tests {
    use super::{HdrLayer, SwapchainCreateInfo};
    use gamut_core::alpha::CompositeAlpha;
    use gamut_core::describe::HdrMetadata;
    use gamut_core::error::DriverStatus;
    use gamut_core::format::{ColorSpace, PixelFormat, SurfaceFormat};
    use gamut_core::registry::{InstanceHandle, SurfaceHandle, SwapchainHandle};

    fn driver_formats() -> Vec<SurfaceFormat> {
        vec![
            SurfaceFormat {
                format: PixelFormat::B8G8R8A8_UNORM,
                color_space: ColorSpace::SRGB_NONLINEAR,
            },
            SurfaceFormat {
                format: PixelFormat::B8G8R8A8_SRGB,
                color_space: ColorSpace::SRGB_NONLINEAR,
            },
        ]
    }

    #[test]
    fn unmanaged_surface_formats_are_passed_through_unchanged() {
        let layer = HdrLayer::new();
        let formats = layer.surface_formats(SurfaceHandle(1), driver_formats);
        assert_eq!(formats, driver_formats(), "no splice without a record");
    }

    #[test]
    fn unmanaged_swapchain_creation_forwards_the_original_info() {
        let layer = HdrLayer::new();
        let info = SwapchainCreateInfo {
            surface: SurfaceHandle(1),
            format: PixelFormat::B8G8R8A8_UNORM,
            color_space: ColorSpace::HDR10_ST2084,
            composite_alpha: CompositeAlpha::Opaque,
        };

        let mut seen = None;
        layer
            .create_swapchain(SwapchainHandle(7), &info, &[], |forwarded| {
                seen = Some(*forwarded);
                Ok(())
            })
            .expect("pass-through succeeds");

        let forwarded = seen.expect("driver must be called");
        assert_eq!(
            forwarded.color_space,
            ColorSpace::HDR10_ST2084,
            "unmanaged surfaces see the application's own color space"
        );
    }

    #[test]
    fn unmanaged_swapchain_creation_forwards_driver_failures() {
        let layer = HdrLayer::new();
        let info = SwapchainCreateInfo {
            surface: SurfaceHandle(1),
            format: PixelFormat::B8G8R8A8_UNORM,
            color_space: ColorSpace::SRGB_NONLINEAR,
            composite_alpha: CompositeAlpha::Opaque,
        };

        let result = layer.create_swapchain(SwapchainHandle(7), &info, &[], |_| {
            Err(DriverStatus(-4))
        });
        assert!(result.is_err(), "driver failure must surface");
    }

    #[test]
    fn metadata_for_unmanaged_swapchains_is_ignored() {
        let layer = HdrLayer::new();
        // Must not abort or panic; the handle simply is not ours.
        layer.set_hdr_metadata(&[(SwapchainHandle(9), HdrMetadata::default())]);
    }

    #[test]
    fn present_without_managed_swapchains_just_forwards() {
        let layer = HdrLayer::new();
        let mut called = false;
        layer
            .present(&[SwapchainHandle(1), SwapchainHandle(2)], || {
                called = true;
                Ok(())
            })
            .expect("forwarded result");
        assert!(called, "driver present must run exactly as without the layer");
    }

    #[test]
    fn destroying_unknown_handles_is_harmless() {
        let layer = HdrLayer::new();
        layer.instance_destroyed(InstanceHandle(1));
        layer.surface_destroyed(SurfaceHandle(2));
        layer.swapchain_destroyed(SwapchainHandle(3));
        assert!(layer.instance_capabilities(InstanceHandle(1)).is_none());
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Wayland backend for the gamut HDR presentation layer.
//!
//! This crate talks the `wp_color_management_v1` and
//! `wp_color_representation_v1` staging protocols on behalf of a call
//! interception shim:
//!
//! - [`ColorConnection`] discovers compositor capabilities over a private
//!   event queue and negotiates image descriptions by pumping that queue
//!   until the asynchronous ready/failed reply arrives.
//! - [`SurfaceRecord`] owns the per-surface protocol objects.
//! - [`HdrLayer`] wires the intercepted entry points (instance, surface,
//!   swapchain, metadata update, present) to the registries and to the
//!   pass-through closures the shim supplies.
//!
//! # Queue ownership
//!
//! Every surface gets its own `EventQueue` on the shared connection, so
//! one surface's blocking negotiation never dispatches (or starves)
//! another surface's events. All protocol objects this crate creates are
//! created with that surface's queue handle; using the application's
//! queue would deliver our events to a dispatcher that does not know
//! about them.

mod cicp;
mod connection;
mod description;
mod layer;
mod surface;
mod swapchain;

pub use connection::ColorConnection;
pub use layer::{HdrLayer, SwapchainCreateInfo};
pub use surface::SurfaceRecord;
pub use swapchain::SwapchainRecord;

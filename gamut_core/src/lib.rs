// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core capability model and color-description negotiation state for the
//! gamut HDR presentation layer.
//!
//! `gamut_core` holds everything the layer decides *about*, with no
//! windowing-protocol dependency: which extra surface formats a compositor
//! connection can advertise, how an application's requested color space
//! resolves to protocol codes, how HDR mastering metadata is encoded for
//! transmission, and how the asynchronous ready/failed reply of a color
//! description request is folded into a synchronous decision. Protocol
//! backends depend on this crate and supply the transport.
//!
//! # Architecture
//!
//! The layer intercepts presentation entry points and routes them through
//! the following pipeline:
//!
//! ```text
//!   surface creation
//!       │
//!       ▼
//!   capability discovery ──► ColorCapabilities (append-only code sets)
//!                                 │
//!        format enumeration ──────┤
//!                                 ▼
//!                          extra_formats() ──► spliced (format, color space) pairs
//!
//!   swapchain creation ──► resolve_codes() ──► DescriptionRequest
//!                                                  │
//!                                                  ▼
//!                                          NegotiationCell (one-shot)
//!                                                  │
//!                                                  ▼
//!                                     SwapchainColorState (dirty description)
//!                                                  │
//!   present ──────────────────────────► pending_push() ──► compositor
//! ```
//!
//! **[`code`]**: CICP-style capability codes and the append-only
//! [`CodeSet`](code::CodeSet) / [`ColorCapabilities`](code::ColorCapabilities)
//! accumulators populated by discovery.
//!
//! **[`format`]**: The process-wide candidate table of advertisable
//! (pixel format, color space) pairs and the capability-gated
//! [`extra_formats`](format::extra_formats) filter.
//!
//! **[`describe`]**: Color-description requests and the fixed-point
//! encoding of HDR mastering metadata.
//!
//! **[`negotiate`]**: The single-shot completion cell that a protocol
//! backend's event callback writes and its round-trip pump polls.
//!
//! **[`swapchain`]**: Per-swapchain description/dirty bookkeeping shared
//! by metadata updates and present-time pushes.
//!
//! **[`registry`]**: Sharded handle-to-record registry mirroring the
//! lifetimes of the wrapped API's opaque objects.
//!
//! **[`alpha`]**: Composite-alpha to protocol alpha-mode mapping.
//!
//! **[`error`]**: The discovery / description / swapchain error taxonomy.

pub mod alpha;
pub mod code;
pub mod describe;
pub mod error;
pub mod format;
pub mod negotiate;
pub mod registry;
pub mod swapchain;

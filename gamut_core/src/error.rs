// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error taxonomy of the layer.
//!
//! Discovery failures are absorbed at the instance/surface boundary; the
//! layer degrades to pass-through instead of failing creation. Format and
//! description failures are fatal to the single swapchain-creation call
//! that triggered them and are reported through the wrapped API's own
//! error channel by the shim.

use thiserror::Error;

/// Raw status code returned by the wrapped driver, forwarded unchanged.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("driver status {0}")]
pub struct DriverStatus(pub i32);

/// Why capability discovery declared a connection unsupported.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    /// The compositor does not advertise the color-management global.
    #[error("compositor lacks the color management protocol")]
    MissingColorManager,
    /// The color manager lacks one of the mandatory features.
    #[error("color management implementation lacks required feature {0}")]
    MissingFeature(u32),
    /// The compositor does not advertise the color-representation global.
    #[error("compositor lacks the color representation protocol")]
    MissingRepresentationManager,
    /// The transport failed while pumping discovery round trips.
    #[error("transport error during capability discovery: {0}")]
    Transport(String),
}

/// Why a color-description request did not produce a usable description.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum DescriptionError {
    /// The compositor answered with the failed event.
    #[error("compositor rejected the image description (cause {cause}): {message}")]
    Rejected {
        /// Protocol cause code reported by the compositor.
        cause: u32,
        /// Compositor-supplied message.
        message: String,
    },
    /// The resolved code pair has no encoding in the wire protocol. The
    /// candidate table only resolves to encodable pairs, so this marks an
    /// internal inconsistency rather than an application mistake.
    #[error("no protocol encoding for primaries {primaries} / transfer function {transfer_function}")]
    Unrepresentable {
        /// Primaries code that could not be encoded.
        primaries: u32,
        /// Transfer-function code that could not be encoded.
        transfer_function: u32,
    },
    /// The transport failed while waiting for the reply.
    #[error("transport error while awaiting the image description: {0}")]
    Transport(String),
}

/// Why an intercepted swapchain creation was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SwapchainError {
    /// The requested pixel format is not in the driver's native list for
    /// the surface, independent of the color-space augmentation.
    #[error("requested pixel format is unsupported by the underlying surface")]
    UnsupportedFormat,
    /// Description negotiation failed for the requested color space.
    #[error(transparent)]
    Description(#[from] DescriptionError),
    /// The wrapped driver itself failed the call.
    #[error(transparent)]
    Driver(#[from] DriverStatus),
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Composite-alpha to protocol alpha-mode mapping.

/// Composite alpha requested for a swapchain, as decoded by the shim.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CompositeAlpha {
    /// Alpha is ignored at composition.
    #[default]
    Opaque,
    /// Color channels are premultiplied by alpha.
    PreMultiplied,
    /// Color channels are independent of alpha.
    PostMultiplied,
    /// The native window system decides.
    Inherit,
}

/// Alpha interpretation communicated through the color-representation
/// protocol object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlphaMode {
    /// Electrical (post-transfer) premultiplied alpha.
    PremultipliedElectrical,
    /// Straight alpha.
    Straight,
}

/// Maps a requested composite alpha to a protocol alpha mode.
///
/// Opaque and inherit swapchains keep the compositor's default handling
/// and map to `None`.
#[must_use]
pub fn alpha_mode_for(composite: CompositeAlpha) -> Option<AlphaMode> {
    match composite {
        CompositeAlpha::PreMultiplied => Some(AlphaMode::PremultipliedElectrical),
        CompositeAlpha::PostMultiplied => Some(AlphaMode::Straight),
        CompositeAlpha::Opaque | CompositeAlpha::Inherit => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{AlphaMode, CompositeAlpha, alpha_mode_for};

    #[test]
    fn premultiplied_maps_to_electrical() {
        assert_eq!(
            alpha_mode_for(CompositeAlpha::PreMultiplied),
            Some(AlphaMode::PremultipliedElectrical)
        );
    }

    #[test]
    fn postmultiplied_maps_to_straight() {
        assert_eq!(
            alpha_mode_for(CompositeAlpha::PostMultiplied),
            Some(AlphaMode::Straight)
        );
    }

    #[test]
    fn opaque_and_inherit_leave_the_default() {
        assert_eq!(alpha_mode_for(CompositeAlpha::Opaque), None);
        assert_eq!(alpha_mode_for(CompositeAlpha::Inherit), None);
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Color-description requests and HDR metadata wire encoding.
//!
//! The application supplies floating-point chromaticities and luminances in
//! its own units; the protocol wants fixed-point integers. Chromaticity
//! coordinates and the minimum mastering luminance are scaled by 10000 and
//! rounded to nearest; the remaining luminances are rounded as-is. Values
//! are forwarded without validation, the compositor rejects degenerate
//! descriptions itself.

/// Scale factor between application floats and protocol fixed-point units.
const FIXED_POINT_SCALE: f64 = 10_000.0;

/// A CIE 1931 xy chromaticity coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Chromaticity {
    /// x coordinate.
    pub x: f32,
    /// y coordinate.
    pub y: f32,
}

/// HDR mastering metadata as supplied by the application.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HdrMetadata {
    /// Red primary of the mastering display.
    pub red_primary: Chromaticity,
    /// Green primary of the mastering display.
    pub green_primary: Chromaticity,
    /// Blue primary of the mastering display.
    pub blue_primary: Chromaticity,
    /// White point of the mastering display.
    pub white_point: Chromaticity,
    /// Minimum mastering luminance in nits.
    pub min_luminance: f32,
    /// Maximum mastering luminance in nits.
    pub max_luminance: f32,
    /// Maximum content light level in nits.
    pub max_content_light_level: f32,
    /// Maximum frame-average light level in nits.
    pub max_frame_average_light_level: f32,
}

/// What a swapchain asks the compositor to describe its images as.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DescriptionRequest {
    /// No description; the compositor default applies.
    Untagged,
    /// Compact parametric description from two code points.
    Parametric {
        /// Primaries code point.
        primaries: u32,
        /// Transfer-function code point.
        transfer_function: u32,
    },
    /// Full mastering-metadata description.
    Mastering(HdrMetadata),
}

impl DescriptionRequest {
    /// Builds the request for a resolved (primaries, transfer function)
    /// pair, mapping `(0, 0)` to [`Self::Untagged`].
    #[must_use]
    pub fn from_codes(primaries: u32, transfer_function: u32) -> Self {
        if primaries == 0 && transfer_function == 0 {
            Self::Untagged
        } else {
            Self::Parametric {
                primaries,
                transfer_function,
            }
        }
    }

    /// Returns `true` when no compositor-side description is needed.
    #[must_use]
    pub fn is_untagged(&self) -> bool {
        matches!(self, Self::Untagged)
    }
}

/// [`HdrMetadata`] encoded in protocol fixed-point units.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MasteringParams {
    /// Red primary x, scaled.
    pub red_x: u32,
    /// Red primary y, scaled.
    pub red_y: u32,
    /// Green primary x, scaled.
    pub green_x: u32,
    /// Green primary y, scaled.
    pub green_y: u32,
    /// Blue primary x, scaled.
    pub blue_x: u32,
    /// Blue primary y, scaled.
    pub blue_y: u32,
    /// White point x, scaled.
    pub white_x: u32,
    /// White point y, scaled.
    pub white_y: u32,
    /// Minimum mastering luminance, scaled.
    pub min_luminance: u32,
    /// Maximum mastering luminance in nits, rounded.
    pub max_luminance: u32,
    /// Maximum content light level in nits, rounded.
    pub max_cll: u32,
    /// Maximum frame-average light level in nits, rounded.
    pub max_fall: u32,
}

impl MasteringParams {
    /// Encodes application metadata into protocol units.
    #[must_use]
    pub fn encode(metadata: &HdrMetadata) -> Self {
        Self {
            red_x: scaled(metadata.red_primary.x),
            red_y: scaled(metadata.red_primary.y),
            green_x: scaled(metadata.green_primary.x),
            green_y: scaled(metadata.green_primary.y),
            blue_x: scaled(metadata.blue_primary.x),
            blue_y: scaled(metadata.blue_primary.y),
            white_x: scaled(metadata.white_point.x),
            white_y: scaled(metadata.white_point.y),
            min_luminance: scaled(metadata.min_luminance),
            max_luminance: rounded(metadata.max_luminance),
            max_cll: rounded(metadata.max_content_light_level),
            max_fall: rounded(metadata.max_frame_average_light_level),
        }
    }
}

fn scaled(value: f32) -> u32 {
    saturating_u32((f64::from(value) * FIXED_POINT_SCALE).round())
}

fn rounded(value: f32) -> u32 {
    saturating_u32(f64::from(value).round())
}

fn saturating_u32(value: f64) -> u32 {
    if value <= 0.0 {
        0
    } else if value >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "range checked above"
        )]
        {
            value as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Chromaticity, DescriptionRequest, HdrMetadata, MasteringParams};

    fn hdr10_metadata() -> HdrMetadata {
        // Typical HDR10 mastering values for a BT.2020 display.
        HdrMetadata {
            red_primary: Chromaticity { x: 0.708, y: 0.292 },
            green_primary: Chromaticity { x: 0.170, y: 0.797 },
            blue_primary: Chromaticity { x: 0.131, y: 0.046 },
            white_point: Chromaticity {
                x: 0.3127,
                y: 0.3290,
            },
            min_luminance: 0.005,
            max_luminance: 1000.0,
            max_content_light_level: 1000.0,
            max_frame_average_light_level: 400.0,
        }
    }

    #[test]
    fn from_codes_maps_zero_pair_to_untagged() {
        assert!(DescriptionRequest::from_codes(0, 0).is_untagged());
        assert_eq!(
            DescriptionRequest::from_codes(9, 16),
            DescriptionRequest::Parametric {
                primaries: 9,
                transfer_function: 16,
            }
        );
    }

    #[test]
    fn encode_scales_chromaticities_by_ten_thousand() {
        let params = MasteringParams::encode(&hdr10_metadata());

        assert_eq!(params.red_x, 7080);
        assert_eq!(params.red_y, 2920);
        assert_eq!(params.green_x, 1700);
        assert_eq!(params.green_y, 7970);
        assert_eq!(params.blue_x, 1310);
        assert_eq!(params.blue_y, 460);
        assert_eq!(params.white_x, 3127);
        assert_eq!(params.white_y, 3290);
    }

    #[test]
    fn encode_scales_min_luminance_but_not_the_rest() {
        let params = MasteringParams::encode(&hdr10_metadata());

        assert_eq!(params.min_luminance, 50, "0.005 nits in 0.0001 units");
        assert_eq!(params.max_luminance, 1000);
        assert_eq!(params.max_cll, 1000);
        assert_eq!(params.max_fall, 400);
    }

    #[test]
    fn encode_rounds_to_nearest() {
        let mut metadata = hdr10_metadata();
        metadata.max_content_light_level = 999.6;
        metadata.max_frame_average_light_level = 399.4;
        let params = MasteringParams::encode(&metadata);

        assert_eq!(params.max_cll, 1000);
        assert_eq!(params.max_fall, 399);
    }

    #[test]
    fn encode_clamps_negative_values_to_zero() {
        let mut metadata = hdr10_metadata();
        metadata.min_luminance = -1.0;
        let params = MasteringParams::encode(&metadata);

        assert_eq!(params.min_luminance, 0);
    }
}

// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The candidate format table and the capability-gated advertisement filter.
//!
//! [`PixelFormat`] and [`ColorSpace`] carry the wrapped graphics API's raw
//! enumeration values; the engine never interprets them beyond equality.
//! [`CANDIDATES`] is the process-wide table of extra (format, color space)
//! pairs this layer can offer, and [`extra_formats`] computes the subset a
//! discovered connection actually supports.

use core::fmt;

use crate::code::{
    ColorCapabilities, PRIMARIES_BT2020, PRIMARIES_SRGB, TF_EXT_LINEAR, TF_ST2084_PQ,
};

/// Pixel format code of the wrapped graphics API, passed through opaquely.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct PixelFormat(pub u32);

impl PixelFormat {
    /// 10-bit ABGR packed, unsigned normalized.
    pub const A2B10G10R10_UNORM: Self = Self(64);
    /// 10-bit ARGB packed, unsigned normalized.
    pub const A2R10G10B10_UNORM: Self = Self(58);
    /// 16-bit-per-channel RGBA, signed float.
    pub const R16G16B16A16_SFLOAT: Self = Self(97);
    /// 8-bit BGRA, unsigned normalized.
    pub const B8G8R8A8_UNORM: Self = Self(44);
    /// 8-bit BGRA, sRGB-encoded.
    pub const B8G8R8A8_SRGB: Self = Self(50);
}

impl fmt::Debug for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::A2B10G10R10_UNORM => write!(f, "A2B10G10R10_UNORM"),
            Self::A2R10G10B10_UNORM => write!(f, "A2R10G10B10_UNORM"),
            Self::R16G16B16A16_SFLOAT => write!(f, "R16G16B16A16_SFLOAT"),
            Self::B8G8R8A8_UNORM => write!(f, "B8G8R8A8_UNORM"),
            Self::B8G8R8A8_SRGB => write!(f, "B8G8R8A8_SRGB"),
            Self(raw) => write!(f, "PixelFormat({raw})"),
        }
    }
}

/// Color space code of the wrapped graphics API, passed through opaquely.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ColorSpace(pub u32);

impl ColorSpace {
    /// Standard non-linear sRGB; the neutral value forwarded to the driver
    /// while a managed description is negotiated out-of-band.
    pub const SRGB_NONLINEAR: Self = Self(0);
    /// HDR10 with the ST 2084 perceptual quantizer.
    pub const HDR10_ST2084: Self = Self(1_000_104_008);
    /// Linear extended-range sRGB.
    pub const EXTENDED_SRGB_LINEAR: Self = Self(1_000_104_002);
}

impl fmt::Debug for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::SRGB_NONLINEAR => write!(f, "SRGB_NONLINEAR"),
            Self::HDR10_ST2084 => write!(f, "HDR10_ST2084"),
            Self::EXTENDED_SRGB_LINEAR => write!(f, "EXTENDED_SRGB_LINEAR"),
            Self(raw) => write!(f, "ColorSpace({raw})"),
        }
    }
}

/// One (pixel format, color space) pair as enumerated to the application.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SurfaceFormat {
    /// Pixel format of the pair.
    pub format: PixelFormat,
    /// Color space of the pair.
    pub color_space: ColorSpace,
}

/// One advertisable candidate: a surface format annotated with the protocol
/// codes needed to negotiate it and whether the compositor must support
/// extended target volumes for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CandidateFormat {
    /// The pair offered to the application.
    pub surface_format: SurfaceFormat,
    /// Primaries code point the pair negotiates with.
    pub primaries: u32,
    /// Transfer-function code point the pair negotiates with.
    pub transfer_function: u32,
    /// Whether the pair exceeds the standard reference range.
    pub needs_extended_volume: bool,
}

/// Process-wide table of candidate pairs, in advertisement order.
///
/// Two ten-bit HDR10/ST2084 entries plus one extended-linear half-float
/// entry gated on the extended-target-volume capability.
pub const CANDIDATES: [CandidateFormat; 3] = [
    CandidateFormat {
        surface_format: SurfaceFormat {
            format: PixelFormat::A2B10G10R10_UNORM,
            color_space: ColorSpace::HDR10_ST2084,
        },
        primaries: PRIMARIES_BT2020,
        transfer_function: TF_ST2084_PQ,
        needs_extended_volume: false,
    },
    CandidateFormat {
        surface_format: SurfaceFormat {
            format: PixelFormat::A2R10G10B10_UNORM,
            color_space: ColorSpace::HDR10_ST2084,
        },
        primaries: PRIMARIES_BT2020,
        transfer_function: TF_ST2084_PQ,
        needs_extended_volume: false,
    },
    CandidateFormat {
        surface_format: SurfaceFormat {
            format: PixelFormat::R16G16B16A16_SFLOAT,
            color_space: ColorSpace::EXTENDED_SRGB_LINEAR,
        },
        primaries: PRIMARIES_SRGB,
        transfer_function: TF_EXT_LINEAR,
        needs_extended_volume: true,
    },
];

/// Computes the extra (format, color space) pairs a connection supports.
///
/// A candidate is included iff its transfer function and primaries codes
/// are in the connection's supported sets, its extended-volume requirement
/// (if any) is met, and its pixel format appears in the caller-supplied
/// native format list. Output follows [`CANDIDATES`] order and is
/// deterministic for frozen capabilities, so the count/buffer query pair
/// of the wrapped enumeration sees an identical sequence both times.
#[must_use]
pub fn extra_formats(caps: &ColorCapabilities, native: &[PixelFormat]) -> Vec<SurfaceFormat> {
    CANDIDATES
        .iter()
        .filter(|candidate| {
            caps.supports(
                candidate.transfer_function,
                candidate.primaries,
                candidate.needs_extended_volume,
            ) && native.contains(&candidate.surface_format.format)
        })
        .map(|candidate| candidate.surface_format)
        .collect()
}

/// Resolves a requested color space to its (primaries, transfer function)
/// code pair for description negotiation.
///
/// `SRGB_NONLINEAR` resolves to `(0, 0)`, meaning untagged (compositor
/// default). Color spaces outside the candidate table resolve to `None`;
/// the caller decides whether to fall back to untagged.
#[must_use]
pub fn resolve_codes(color_space: ColorSpace) -> Option<(u32, u32)> {
    if color_space == ColorSpace::SRGB_NONLINEAR {
        return Some((0, 0));
    }
    CANDIDATES
        .iter()
        .find(|candidate| candidate.surface_format.color_space == color_space)
        .map(|candidate| (candidate.primaries, candidate.transfer_function))
}

#[cfg(test)]
mod tests {
    use super::{CANDIDATES, ColorSpace, PixelFormat, SurfaceFormat, extra_formats, resolve_codes};
    use crate::code::{
        ColorCapabilities, FEATURE_EXTENDED_TARGET_VOLUME, FEATURE_PARAMETRIC,
        FEATURE_SET_PRIMARIES, FEATURE_SET_TF_POWER, PRIMARIES_BT2020, PRIMARIES_SRGB,
        TF_EXT_LINEAR, TF_ST2084_PQ,
    };

    fn hdr10_caps() -> ColorCapabilities {
        let mut caps = ColorCapabilities::new();
        caps.features.insert(FEATURE_PARAMETRIC);
        caps.features.insert(FEATURE_SET_PRIMARIES);
        caps.features.insert(FEATURE_SET_TF_POWER);
        caps.transfer_functions.insert(TF_ST2084_PQ);
        caps.primaries.insert(PRIMARIES_BT2020);
        caps.done = true;
        caps
    }

    #[test]
    fn table_has_no_duplicate_pairs() {
        for (i, a) in CANDIDATES.iter().enumerate() {
            for b in &CANDIDATES[i + 1..] {
                assert_ne!(
                    a.surface_format, b.surface_format,
                    "candidate table must not contain duplicate pairs"
                );
            }
        }
    }

    #[test]
    fn hdr10_connection_advertises_exactly_the_two_hdr10_entries() {
        let native = [
            PixelFormat::A2B10G10R10_UNORM,
            PixelFormat::A2R10G10B10_UNORM,
            PixelFormat::R16G16B16A16_SFLOAT,
        ];
        let extras = extra_formats(&hdr10_caps(), &native);

        assert_eq!(
            extras,
            vec![
                SurfaceFormat {
                    format: PixelFormat::A2B10G10R10_UNORM,
                    color_space: ColorSpace::HDR10_ST2084,
                },
                SurfaceFormat {
                    format: PixelFormat::A2R10G10B10_UNORM,
                    color_space: ColorSpace::HDR10_ST2084,
                },
            ],
            "linear entry must be omitted without the extended-volume feature"
        );
    }

    #[test]
    fn extended_volume_entry_requires_the_feature_flag() {
        let mut caps = hdr10_caps();
        caps.transfer_functions.insert(TF_EXT_LINEAR);
        caps.primaries.insert(PRIMARIES_SRGB);
        let native = [PixelFormat::R16G16B16A16_SFLOAT];

        assert!(
            extra_formats(&caps, &native).is_empty(),
            "codes alone must not unlock the extended-volume entry"
        );

        caps.features.insert(FEATURE_EXTENDED_TARGET_VOLUME);
        assert_eq!(
            extra_formats(&caps, &native),
            vec![SurfaceFormat {
                format: PixelFormat::R16G16B16A16_SFLOAT,
                color_space: ColorSpace::EXTENDED_SRGB_LINEAR,
            }]
        );
    }

    #[test]
    fn filter_respects_native_format_membership() {
        let native = [PixelFormat::A2R10G10B10_UNORM, PixelFormat::B8G8R8A8_UNORM];
        let extras = extra_formats(&hdr10_caps(), &native);

        assert_eq!(
            extras,
            vec![SurfaceFormat {
                format: PixelFormat::A2R10G10B10_UNORM,
                color_space: ColorSpace::HDR10_ST2084,
            }],
            "pairs whose pixel format the driver lacks are not advertised"
        );
    }

    #[test]
    fn filter_is_deterministic_and_idempotent() {
        let caps = hdr10_caps();
        let native = [
            PixelFormat::R16G16B16A16_SFLOAT,
            PixelFormat::A2B10G10R10_UNORM,
            PixelFormat::A2R10G10B10_UNORM,
        ];

        let first = extra_formats(&caps, &native);
        let second = extra_formats(&caps, &native);
        assert_eq!(first, second, "same capabilities and input, same output");
    }

    #[test]
    fn empty_capabilities_advertise_nothing() {
        let native = [
            PixelFormat::A2B10G10R10_UNORM,
            PixelFormat::R16G16B16A16_SFLOAT,
        ];
        assert!(extra_formats(&ColorCapabilities::new(), &native).is_empty());
    }

    #[test]
    fn resolve_codes_maps_the_table_and_untagged() {
        assert_eq!(resolve_codes(ColorSpace::SRGB_NONLINEAR), Some((0, 0)));
        assert_eq!(
            resolve_codes(ColorSpace::HDR10_ST2084),
            Some((PRIMARIES_BT2020, TF_ST2084_PQ))
        );
        assert_eq!(
            resolve_codes(ColorSpace::EXTENDED_SRGB_LINEAR),
            Some((PRIMARIES_SRGB, TF_EXT_LINEAR))
        );
        assert_eq!(resolve_codes(ColorSpace(0xDEAD)), None);
    }
}

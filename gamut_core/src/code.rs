// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capability codes and the append-only sets discovery accumulates.
//!
//! Transfer functions and primaries are identified by their H.273 (CICP)
//! code points, the scheme the capability table and the swapchain color
//! resolution both speak. Compositor feature flags use the color-management
//! protocol's own enumeration values. `0` is reserved in both code kinds
//! for "untagged/unknown".

/// ICC v2/v4 image descriptions.
pub const FEATURE_ICC_V2_V4: u32 = 0;
/// Parametric image descriptions built from code points or explicit values.
pub const FEATURE_PARAMETRIC: u32 = 1;
/// Explicit primary chromaticities in parametric descriptions.
pub const FEATURE_SET_PRIMARIES: u32 = 2;
/// Power-law transfer functions in parametric descriptions.
pub const FEATURE_SET_TF_POWER: u32 = 3;
/// Explicit luminance ranges in parametric descriptions.
pub const FEATURE_SET_LUMINANCES: u32 = 4;
/// Mastering display primaries distinct from the image primaries.
pub const FEATURE_SET_MASTERING_DISPLAY_PRIMARIES: u32 = 5;
/// Target color volumes exceeding the standard reference range.
pub const FEATURE_EXTENDED_TARGET_VOLUME: u32 = 6;
/// Windows scRGB surfaces.
pub const FEATURE_WINDOWS_SCRGB: u32 = 7;

/// BT.709 / sRGB primaries.
pub const PRIMARIES_SRGB: u32 = 1;
/// BT.2020 wide-gamut primaries.
pub const PRIMARIES_BT2020: u32 = 9;
/// DCI-P3 theater primaries.
pub const PRIMARIES_DCI_P3: u32 = 11;
/// Display-P3 primaries.
pub const PRIMARIES_DISPLAY_P3: u32 = 12;

/// Linear transfer, extended range.
pub const TF_EXT_LINEAR: u32 = 8;
/// IEC 61966-2-1 sRGB transfer.
pub const TF_SRGB: u32 = 13;
/// SMPTE ST 2084 perceptual quantizer.
pub const TF_ST2084_PQ: u32 = 16;
/// Hybrid log-gamma.
pub const TF_HLG: u32 = 18;

/// Append-only set of distinct capability codes.
///
/// Discovery inserts codes as the compositor advertises them; insertion
/// order is irrelevant and duplicates are ignored. Compositors do not
/// retract capabilities at runtime, so the set only ever grows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CodeSet {
    codes: Vec<u32>,
}

impl CodeSet {
    /// Creates an empty set.
    #[must_use]
    pub const fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Inserts `code`, returning `false` if it was already present.
    pub fn insert(&mut self, code: u32) -> bool {
        if self.contains(code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Returns `true` when `code` has been advertised.
    #[must_use]
    pub fn contains(&self, code: u32) -> bool {
        self.codes.contains(&code)
    }

    /// Number of distinct codes advertised so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` when nothing has been advertised.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Iterates the codes in advertisement order.
    pub fn iter(&self) -> impl Iterator<Item = u32> + '_ {
        self.codes.iter().copied()
    }
}

/// Accumulated color-management capabilities of one compositor connection.
///
/// All three sets are empty until discovery has pumped the capability
/// events, and append-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ColorCapabilities {
    /// Protocol feature flags the color manager advertised.
    pub features: CodeSet,
    /// Supported transfer-function code points.
    pub transfer_functions: CodeSet,
    /// Supported primaries code points.
    pub primaries: CodeSet,
    /// Set once the manager signals the end of its capability burst.
    pub done: bool,
}

impl ColorCapabilities {
    /// Creates an empty, pre-discovery capability record.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            features: CodeSet::new(),
            transfer_functions: CodeSet::new(),
            primaries: CodeSet::new(),
            done: false,
        }
    }

    /// Returns `true` when this connection can express the given
    /// (transfer function, primaries, extended-volume) combination.
    #[must_use]
    pub fn supports(
        &self,
        transfer_function: u32,
        primaries: u32,
        needs_extended_volume: bool,
    ) -> bool {
        self.transfer_functions.contains(transfer_function)
            && self.primaries.contains(primaries)
            && (!needs_extended_volume || self.features.contains(FEATURE_EXTENDED_TARGET_VOLUME))
    }
}

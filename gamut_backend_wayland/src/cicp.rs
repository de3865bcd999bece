// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Translation between protocol named enumerations and CICP code points.
//!
//! The core crate speaks H.273 (CICP) codes; the wire protocol speaks its
//! own named enumerations. Only the values the candidate table can use
//! are translated; everything else maps to `None` and is not recorded in
//! the capability sets.

use gamut_core::code;
use wayland_protocols::wp::color_management::v1::client::wp_color_manager_v1::{
    Feature, Primaries, TransferFunction,
};
use wayland_protocols::wp::color_management::v1::client::wp_image_description_v1::Cause;

/// Maps an advertised feature to its protocol code point.
pub(crate) fn feature_code(feature: Feature) -> Option<u32> {
    match feature {
        Feature::IccV2V4 => Some(code::FEATURE_ICC_V2_V4),
        Feature::Parametric => Some(code::FEATURE_PARAMETRIC),
        Feature::SetPrimaries => Some(code::FEATURE_SET_PRIMARIES),
        Feature::SetTfPower => Some(code::FEATURE_SET_TF_POWER),
        Feature::SetLuminances => Some(code::FEATURE_SET_LUMINANCES),
        Feature::SetMasteringDisplayPrimaries => {
            Some(code::FEATURE_SET_MASTERING_DISPLAY_PRIMARIES)
        }
        Feature::ExtendedTargetVolume => Some(code::FEATURE_EXTENDED_TARGET_VOLUME),
        Feature::WindowsScrgb => Some(code::FEATURE_WINDOWS_SCRGB),
        _ => None,
    }
}

/// Maps an advertised transfer function to its CICP code point.
pub(crate) fn transfer_function_code(tf: TransferFunction) -> Option<u32> {
    match tf {
        TransferFunction::ExtLinear => Some(code::TF_EXT_LINEAR),
        TransferFunction::Srgb => Some(code::TF_SRGB),
        TransferFunction::St2084Pq => Some(code::TF_ST2084_PQ),
        TransferFunction::Hlg => Some(code::TF_HLG),
        _ => None,
    }
}

/// Maps advertised primaries to their CICP code point.
pub(crate) fn primaries_code(primaries: Primaries) -> Option<u32> {
    match primaries {
        Primaries::Srgb => Some(code::PRIMARIES_SRGB),
        Primaries::Bt2020 => Some(code::PRIMARIES_BT2020),
        Primaries::DciP3 => Some(code::PRIMARIES_DCI_P3),
        Primaries::DisplayP3 => Some(code::PRIMARIES_DISPLAY_P3),
        _ => None,
    }
}

/// Maps a CICP transfer-function code back to the protocol enumeration.
pub(crate) fn named_transfer_function(tf_code: u32) -> Option<TransferFunction> {
    match tf_code {
        code::TF_EXT_LINEAR => Some(TransferFunction::ExtLinear),
        code::TF_SRGB => Some(TransferFunction::Srgb),
        code::TF_ST2084_PQ => Some(TransferFunction::St2084Pq),
        code::TF_HLG => Some(TransferFunction::Hlg),
        _ => None,
    }
}

/// Maps a CICP primaries code back to the protocol enumeration.
pub(crate) fn named_primaries(primaries_code: u32) -> Option<Primaries> {
    match primaries_code {
        code::PRIMARIES_SRGB => Some(Primaries::Srgb),
        code::PRIMARIES_BT2020 => Some(Primaries::Bt2020),
        code::PRIMARIES_DCI_P3 => Some(Primaries::DciP3),
        code::PRIMARIES_DISPLAY_P3 => Some(Primaries::DisplayP3),
        _ => None,
    }
}

/// Maps a rejection cause to the numeric code surfaced to the caller.
pub(crate) fn cause_code(cause: Cause) -> u32 {
    match cause {
        Cause::LowVersion => 0,
        Cause::Unsupported => 1,
        Cause::OperatingSystem => 2,
        Cause::NoOutput => 3,
        _ => u32::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        feature_code, named_primaries, named_transfer_function, primaries_code,
        transfer_function_code,
    };
    use gamut_core::code;
    use gamut_core::format::CANDIDATES;
    use wayland_protocols::wp::color_management::v1::client::wp_color_manager_v1::{
        Feature, Primaries, TransferFunction,
    };

    #[test]
    fn mandatory_features_are_translated() {
        assert_eq!(feature_code(Feature::Parametric), Some(code::FEATURE_PARAMETRIC));
        assert_eq!(
            feature_code(Feature::SetPrimaries),
            Some(code::FEATURE_SET_PRIMARIES)
        );
        assert_eq!(
            feature_code(Feature::SetTfPower),
            Some(code::FEATURE_SET_TF_POWER)
        );
        assert_eq!(
            feature_code(Feature::ExtendedTargetVolume),
            Some(code::FEATURE_EXTENDED_TARGET_VOLUME)
        );
    }

    #[test]
    fn every_candidate_code_pair_is_encodable() {
        for candidate in &CANDIDATES {
            assert!(
                named_primaries(candidate.primaries).is_some(),
                "candidate primaries {} must have a named encoding",
                candidate.primaries
            );
            assert!(
                named_transfer_function(candidate.transfer_function).is_some(),
                "candidate transfer function {} must have a named encoding",
                candidate.transfer_function
            );
        }
    }

    #[test]
    fn code_translation_round_trips() {
        for named in [
            TransferFunction::ExtLinear,
            TransferFunction::Srgb,
            TransferFunction::St2084Pq,
            TransferFunction::Hlg,
        ] {
            let cicp = transfer_function_code(named).expect("mapped");
            assert_eq!(named_transfer_function(cicp), Some(named));
        }
        for named in [
            Primaries::Srgb,
            Primaries::Bt2020,
            Primaries::DciP3,
            Primaries::DisplayP3,
        ] {
            let cicp = primaries_code(named).expect("mapped");
            assert_eq!(named_primaries(cicp), Some(named));
        }
    }

    #[test]
    fn unmodeled_values_are_not_recorded() {
        assert_eq!(transfer_function_code(TransferFunction::Gamma22), None);
        assert_eq!(primaries_code(Primaries::Ntsc), None);
    }
}

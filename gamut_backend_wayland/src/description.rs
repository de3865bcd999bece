// Copyright 2026 the Gamut Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Blocking image-description negotiation.
//!
//! The protocol answers a `create` on the parametric creator with exactly
//! one `ready` or `failed` event on the new description object. The
//! callers of this module are synchronous, so the private queue is pumped
//! until the completion cell resolves instead of hoping a fixed number of
//! round trips suffices.

use gamut_core::describe::{DescriptionRequest, MasteringParams};
use gamut_core::error::DescriptionError;
use gamut_core::negotiate::{NegotiationCell, NegotiationState};
use wayland_protocols::wp::color_management::v1::client::wp_color_manager_v1::TransferFunction;
use wayland_protocols::wp::color_management::v1::client::wp_image_description_v1::WpImageDescriptionV1;

use crate::cicp;
use crate::connection::ColorConnection;

impl ColorConnection {
    /// Negotiates an image description for `request`.
    ///
    /// Returns `Ok(None)` for the untagged request, `Ok(Some(desc))` once
    /// the compositor reports the description ready, and an error if it
    /// rejects the parameters or the transport fails. The description
    /// object is destroyed on every error path.
    pub fn negotiate_description(
        &mut self,
        request: &DescriptionRequest,
    ) -> Result<Option<WpImageDescriptionV1>, DescriptionError> {
        let qh = self.queue_handle();
        let creator = match *request {
            DescriptionRequest::Untagged => {
                // Nothing to create, but drain any replies still in flight
                // so the queue does not back up behind an idle surface.
                self.pump().map_err(DescriptionError::Transport)?;
                return Ok(None);
            }
            DescriptionRequest::Parametric {
                primaries,
                transfer_function,
            } => {
                // Resolve the named encodings before touching the wire so
                // an unrepresentable pair leaves no protocol object behind.
                let Some((named_primaries, named_tf)) = cicp::named_primaries(primaries)
                    .zip(cicp::named_transfer_function(transfer_function))
                else {
                    return Err(DescriptionError::Unrepresentable {
                        primaries,
                        transfer_function,
                    });
                };
                let creator = self.color_manager().create_parametric_creator(&qh, ());
                creator.set_primaries_named(named_primaries);
                creator.set_tf_named(named_tf);
                creator
            }
            DescriptionRequest::Mastering(ref metadata) => {
                let params = MasteringParams::encode(metadata);
                let creator = self.color_manager().create_parametric_creator(&qh, ());
                creator.set_primaries(
                    signed(params.red_x),
                    signed(params.red_y),
                    signed(params.green_x),
                    signed(params.green_y),
                    signed(params.blue_x),
                    signed(params.blue_y),
                    signed(params.white_x),
                    signed(params.white_y),
                );
                creator.set_tf_named(TransferFunction::St2084Pq);
                creator.set_mastering_luminance(params.min_luminance, params.max_luminance);
                creator.set_max_cll(params.max_cll);
                creator.set_max_fall(params.max_fall);
                creator
            }
        };

        self.state.negotiation = Some(NegotiationCell::new());
        let description = creator.create(&qh, ());
        let outcome = self.wait_for_reply();
        self.state.negotiation = None;

        match outcome {
            Ok(NegotiationState::Ready { identity }) => {
                log::debug!("image description ready, identity {identity}");
                Ok(Some(description))
            }
            Ok(NegotiationState::Failed { cause, message }) => {
                description.destroy();
                Err(DescriptionError::Rejected { cause, message })
            }
            Ok(NegotiationState::Waiting) => {
                unreachable!("pump loop only returns resolved states")
            }
            Err(transport) => {
                description.destroy();
                Err(DescriptionError::Transport(transport))
            }
        }
    }

    /// Pumps the private queue until the in-flight negotiation resolves.
    fn wait_for_reply(&mut self) -> Result<NegotiationState, String> {
        loop {
            self.pump()?;
            match self.state.negotiation.as_ref() {
                Some(cell) if cell.is_pending() => {}
                Some(cell) => return Ok(cell.state().clone()),
                None => return Err("negotiation cell vanished while pumping".into()),
            }
        }
    }
}

/// Converts an encoded fixed-point value to the protocol's signed field,
/// saturating out-of-range values rather than wrapping them.
fn signed(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::signed;

    #[test]
    fn signed_saturates_instead_of_wrapping() {
        assert_eq!(signed(0), 0);
        assert_eq!(signed(10_000), 10_000);
        assert_eq!(signed(u32::MAX), i32::MAX);
    }
}

//! Confirmation event verification
//!
//! A confirmed swap must carry the swap's `message` event and a `transfer`
//! of exactly the estimated output. A transfer of the output denom with any
//! other amount means local math and chain math disagree, which is reported
//! separately from a missing event.

use crate::broadcaster::{SigningIdentity, TxConfirmation, TxEvent};
use crate::error::SwapError;
use gamm_config::protocol::{events, format_coin};
use gamm_config::ExecutorSettings;
use gamm_math::SwapEstimate;
use gamm_types::Denom;

/// Check a confirmed transaction against the estimate it was built from
pub fn verify_swap_events(
    settings: &ExecutorSettings,
    confirmation: &TxConfirmation,
    signer: &SigningIdentity,
    estimate: &SwapEstimate,
    token_out_denom: &Denom,
) -> Result<(), SwapError> {
    verify_message_event(settings, confirmation, signer)?;
    verify_transfer(confirmation, estimate, token_out_denom)
}

fn events_of<'a>(confirmation: &'a TxConfirmation, kind: &'a str) -> impl Iterator<Item = &'a TxEvent> + 'a {
    confirmation.events.iter().filter(move |event| event.kind == kind)
}

fn verify_message_event(
    settings: &ExecutorSettings,
    confirmation: &TxConfirmation,
    signer: &SigningIdentity,
) -> Result<(), SwapError> {
    let unexpected = |reason: String| SwapError::UnexpectedEvents {
        tx_hash: confirmation.tx_hash.clone(),
        reason,
    };

    let action_event = events_of(confirmation, events::MESSAGE)
        .find(|event| event.values(events::ATTR_ACTION).any(|v| v == settings.swap_action))
        .ok_or_else(|| unexpected(format!("no message event with action {}", settings.swap_action)))?;

    let module_seen = events_of(confirmation, events::MESSAGE)
        .any(|event| event.values(events::ATTR_MODULE).any(|v| v == settings.swap_module));
    if !module_seen {
        return Err(unexpected(format!(
            "no message event from module {}",
            settings.swap_module
        )));
    }

    if let Some(sender) = action_event.first_value(events::ATTR_SENDER) {
        if sender != signer.address() {
            return Err(unexpected(format!(
                "swap sent by {}, expected {}",
                sender, signer
            )));
        }
    }

    Ok(())
}

fn verify_transfer(
    confirmation: &TxConfirmation,
    estimate: &SwapEstimate,
    token_out_denom: &Denom,
) -> Result<(), SwapError> {
    let expected = format_coin(&estimate.token_out_amount, token_out_denom.as_str());

    // Multi-coin transfers print as a comma-separated list
    let coins: Vec<&str> = events_of(confirmation, events::TRANSFER)
        .flat_map(|event| event.values(events::ATTR_AMOUNT))
        .flat_map(|amount| amount.split(','))
        .map(str::trim)
        .collect();

    if coins.iter().any(|coin| *coin == expected) {
        return Ok(());
    }

    let observed: Vec<&str> = coins
        .iter()
        .copied()
        .filter(|coin| matches!(split_coin(coin), Some((_, denom)) if denom == token_out_denom.as_str()))
        .collect();

    if observed.is_empty() {
        return Err(SwapError::UnexpectedEvents {
            tx_hash: confirmation.tx_hash.clone(),
            reason: format!("no transfer of {}", token_out_denom),
        });
    }

    Err(SwapError::EstimateMismatch {
        tx_hash: confirmation.tx_hash.clone(),
        expected,
        observed: observed.join(","),
    })
}

/// Split `"496280uosmo"` into `("496280", "uosmo")`
fn split_coin(coin: &str) -> Option<(&str, &str)> {
    let split = coin.find(|c: char| !c.is_ascii_digit())?;
    let (amount, denom) = coin.split_at(split);
    if amount.is_empty() || denom.is_empty() {
        return None;
    }
    Some((amount, denom))
}

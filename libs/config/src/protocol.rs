//! Chain protocol constants
//!
//! Message type URLs and event/attribute names emitted by the gamm module
//! when a swap is delivered. Confirmation verification matches on these.

/// Type URL of the exact-amount-in swap message
pub const MSG_SWAP_EXACT_AMOUNT_IN: &str = "/osmosis.gamm.v1beta1.MsgSwapExactAmountIn";

/// Module name reported in the swap's `message` event
pub const GAMM_MODULE: &str = "gamm";

/// Event and attribute names
pub mod events {
    /// Per-message event carrying `action`, `module` and `sender`
    pub const MESSAGE: &str = "message";

    /// Bank transfer event carrying `recipient`, `sender` and `amount`
    pub const TRANSFER: &str = "transfer";

    pub const ATTR_ACTION: &str = "action";
    pub const ATTR_MODULE: &str = "module";
    pub const ATTR_AMOUNT: &str = "amount";
    pub const ATTR_SENDER: &str = "sender";
    pub const ATTR_RECIPIENT: &str = "recipient";
}

/// Format a coin the way bank events print it: `{amount}{denom}` with no separator
pub fn format_coin(amount: impl std::fmt::Display, denom: &str) -> String {
    format!("{}{}", amount, denom)
}

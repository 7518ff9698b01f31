//! Transaction broadcast interface
//!
//! Signing, fee payment and block inclusion live behind
//! [`TransactionBroadcaster`]. The executor only sees a confirmed result with
//! ordered events or a chain-reported rejection.

use crate::message::MsgSwapExactAmountIn;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Account that signs and pays for a transaction, by bech32 address
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SigningIdentity(String);

impl SigningIdentity {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn address(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SigningIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// ABCI event as reported in a transaction result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(EventAttribute {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Values of every attribute with `key`, in order
    pub fn values<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.attributes
            .iter()
            .filter(move |attr| attr.key == key)
            .map(|attr| attr.value.as_str())
    }

    pub fn first_value<'a>(&'a self, key: &'a str) -> Option<&'a str> {
        self.values(key).next()
    }
}

/// Transaction included in a block with a success code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxConfirmation {
    pub tx_hash: String,
    pub height: u64,
    pub events: Vec<TxEvent>,
}

/// Transaction rejected by the chain, at check or deliver time
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{codespace} code {code}: {reason}")]
pub struct ChainRejection {
    pub code: u32,
    pub codespace: String,
    pub reason: String,
    /// Present when the transaction reached a block before failing
    pub tx_hash: Option<String>,
}

/// Signs, broadcasts and waits for a terminal result
///
/// The returned future resolves only once the transaction is confirmed or
/// rejected. Dropping it abandons the wait; it must not leave any partial
/// local state behind.
#[async_trait]
pub trait TransactionBroadcaster: Send + Sync {
    async fn submit(
        &self,
        message: &MsgSwapExactAmountIn,
        signer: &SigningIdentity,
        sequence: u64,
    ) -> Result<TxConfirmation, ChainRejection>;
}

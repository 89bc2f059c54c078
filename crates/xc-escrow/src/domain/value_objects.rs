//! # Domain Value Objects
//!
//! Identifiers, stages and status enums shared by escrows and swaps.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Ledger a swap leg lives on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainId {
    /// NEAR protocol.
    Near,
    /// Ethereum mainnet.
    Ethereum,
    /// Bitcoin mainnet.
    Bitcoin,
    /// Polygon PoS.
    Polygon,
    /// Arbitrum L2.
    Arbitrum,
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Account on a ledger (maker, taker, relayer, owner).
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create an account id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Asset (token contract) identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetId(String);

impl AssetId {
    /// Create an asset id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Escrow record identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EscrowId(Uuid);

impl EscrowId {
    /// Allocate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for EscrowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Swap identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapId(Uuid);

impl SwapId {
    /// Allocate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Timelock stage of an escrow, in chronological order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    /// Waiting for the deposit to become final; nothing allowed.
    Finality,
    /// Taker may withdraw with the secret.
    PrivateWithdrawal,
    /// Anyone may withdraw with the secret.
    PublicWithdrawal,
    /// Maker may cancel.
    PrivateCancellation,
    /// Anyone may cancel. Terminal and indefinite.
    PublicCancellation,
}

impl Stage {
    /// All stages in chronological order.
    pub const ALL: [Stage; 5] = [
        Stage::Finality,
        Stage::PrivateWithdrawal,
        Stage::PublicWithdrawal,
        Stage::PrivateCancellation,
        Stage::PublicCancellation,
    ];

    /// Stage grants a withdrawal right.
    pub fn is_withdrawal(&self) -> bool {
        matches!(self, Self::PrivateWithdrawal | Self::PublicWithdrawal)
    }

    /// Stage grants a cancellation right.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::PrivateCancellation | Self::PublicCancellation)
    }
}

/// Escrow state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscrowStatus {
    /// Created, maker has not deposited.
    #[default]
    Pending,
    /// Maker's funds are locked.
    Funded,
    /// Secret revealed, funds released to the taker side.
    Withdrawn,
    /// Funds (if any) returned to the maker.
    Cancelled,
}

impl EscrowStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: EscrowStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Funded)
                | (Self::Funded, Self::Withdrawn)
                | (Self::Pending, Self::Cancelled)
                | (Self::Funded, Self::Cancelled)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Withdrawn | Self::Cancelled)
    }
}

/// Swap state machine.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapStatus {
    /// Legs created, not both funded.
    #[default]
    Pending,
    /// Both legs funded; secret may be revealed.
    BothFunded,
    /// Both legs withdrawn.
    Completed,
    /// A leg was cancelled before both were withdrawn.
    Cancelled,
    /// Destination leg withdrawn but the source leg could not be.
    Failed,
}

impl SwapStatus {
    /// Check if transition is valid.
    pub fn can_transition_to(&self, next: SwapStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::BothFunded)
                | (Self::Pending, Self::Cancelled)
                | (Self::BothFunded, Self::Completed)
                | (Self::BothFunded, Self::Cancelled)
                | (Self::BothFunded, Self::Failed)
        )
    }

    /// Check if terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::Failed)
    }
}

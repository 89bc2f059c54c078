//! # Timelock Schedule
//!
//! Stage offsets of an escrow, relative to its creation time.
//!
//! Each offset marks the moment its stage *ends*:
//!
//! ```text
//! created_at      +finality   +private_wd   +public_wd   +private_cancel
//!     |  Finality  |  PrivateWd  |  PublicWd  | PrivateCancel | PublicCancel ...
//! ```
//!
//! Intervals are half-open with an inclusive lower bound, so a timestamp
//! equal to a boundary belongs to the later stage. `PublicCancellation`
//! never ends.

use super::errors::{EscrowError, Timestamp};
use super::value_objects::Stage;
use serde::{Deserialize, Serialize};

/// Ordered stage offsets in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelockSchedule {
    /// End of the finality stage.
    pub finality: u64,
    /// End of the taker-only withdrawal window.
    pub private_withdrawal: u64,
    /// End of the open withdrawal window.
    pub public_withdrawal: u64,
    /// End of the maker-only cancellation window.
    pub private_cancellation: u64,
    /// Nominal end of the open cancellation window; the stage itself is
    /// indefinite, past this point the escrow is considered expired.
    pub public_cancellation: u64,
}

impl TimelockSchedule {
    /// Create a validated schedule.
    pub fn new(
        finality: u64,
        private_withdrawal: u64,
        public_withdrawal: u64,
        private_cancellation: u64,
        public_cancellation: u64,
    ) -> Result<Self, EscrowError> {
        let schedule = Self {
            finality,
            private_withdrawal,
            public_withdrawal,
            private_cancellation,
            public_cancellation,
        };
        schedule.validate()?;
        Ok(schedule)
    }

    /// Check the ordering invariant.
    ///
    /// Deserialized schedules bypass [`TimelockSchedule::new`], so the engine
    /// calls this again on every `create`.
    pub fn validate(&self) -> Result<(), EscrowError> {
        let offsets = self.offsets();
        for (pair, stages) in offsets.windows(2).zip(Stage::ALL.windows(2)) {
            if pair[0] > pair[1] {
                return Err(EscrowError::InvalidSchedule(format!(
                    "{:?} ends at {} but {:?} ends at {}",
                    stages[0], pair[0], stages[1], pair[1]
                )));
            }
        }
        Ok(())
    }

    /// Offset at which `stage` ends.
    pub fn offset(&self, stage: Stage) -> u64 {
        match stage {
            Stage::Finality => self.finality,
            Stage::PrivateWithdrawal => self.private_withdrawal,
            Stage::PublicWithdrawal => self.public_withdrawal,
            Stage::PrivateCancellation => self.private_cancellation,
            Stage::PublicCancellation => self.public_cancellation,
        }
    }

    /// Absolute timestamp at which `stage` ends.
    pub fn boundary_for(&self, stage: Stage, created_at: Timestamp) -> Timestamp {
        created_at.saturating_add(self.offset(stage))
    }

    /// Absolute timestamp at which `stage` begins.
    pub fn start_of(&self, stage: Stage, created_at: Timestamp) -> Timestamp {
        match stage {
            Stage::Finality => created_at,
            Stage::PrivateWithdrawal => self.boundary_for(Stage::Finality, created_at),
            Stage::PublicWithdrawal => self.boundary_for(Stage::PrivateWithdrawal, created_at),
            Stage::PrivateCancellation => self.boundary_for(Stage::PublicWithdrawal, created_at),
            Stage::PublicCancellation => {
                self.boundary_for(Stage::PrivateCancellation, created_at)
            }
        }
    }

    /// Stage active at `now`.
    ///
    /// Timestamps earlier than `created_at` (clock skew between legs) are
    /// reported as `Finality`.
    pub fn active_stage(&self, now: Timestamp, created_at: Timestamp) -> Stage {
        let elapsed = now.saturating_sub(created_at);
        if elapsed < self.finality {
            Stage::Finality
        } else if elapsed < self.private_withdrawal {
            Stage::PrivateWithdrawal
        } else if elapsed < self.public_withdrawal {
            Stage::PublicWithdrawal
        } else if elapsed < self.private_cancellation {
            Stage::PrivateCancellation
        } else {
            Stage::PublicCancellation
        }
    }

    /// Past the nominal end of public cancellation.
    pub fn is_expired(&self, now: Timestamp, created_at: Timestamp) -> bool {
        now >= self.boundary_for(Stage::PublicCancellation, created_at)
    }

    fn offsets(&self) -> [u64; 5] {
        [
            self.finality,
            self.private_withdrawal,
            self.public_withdrawal,
            self.private_cancellation,
            self.public_cancellation,
        ]
    }
}

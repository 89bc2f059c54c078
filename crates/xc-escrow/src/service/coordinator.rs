//! Swap Coordinator - two-leg orchestration
//!
//! Leg A is the source ledger (the swap initiator's deposit), leg B the
//! destination. The coordinator holds the only copy of the secret until
//! reveal and acts on behalf of leg parties: each leg's taker for
//! withdrawals, each leg's maker for cancellations.

use crate::algorithms::{
    funding_outcome, reveal_precheck, FundingOutcome, LegView, SecretCommitment,
};
use crate::config::EscrowConfig;
use crate::domain::{
    invariant_hashlock_match, invariant_timelock_margin, invariant_valid_params, AccountId,
    EscrowError, EscrowRecord, EscrowStatus, LegRef, SecureSecret, Swap, SwapId, SwapLegParams,
    SwapStatus,
};
use crate::ports::inbound::{EscrowLedger, SwapCoordinatorApi};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

/// A swap and its custodied secret.
struct SwapEntry {
    swap: Swap,
    /// `None` once destroyed by cancellation.
    secret: Option<SecureSecret>,
}

impl SwapEntry {
    fn destroy_secret(&mut self) {
        // SecureSecret zeroizes on drop
        self.secret = None;
    }
}

/// Which side of the swap a ledger serves.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    A,
    B,
}

/// Two-leg swap coordinator.
pub struct SwapCoordinator {
    leg_a: Arc<dyn EscrowLedger>,
    leg_b: Arc<dyn EscrowLedger>,
    config: EscrowConfig,
    /// Per-swap lock, held across ledger calls.
    swaps: RwLock<HashMap<SwapId, Arc<Mutex<SwapEntry>>>>,
}

impl SwapCoordinator {
    /// Create a coordinator between a source and a destination ledger.
    pub fn new(
        leg_a: Arc<dyn EscrowLedger>,
        leg_b: Arc<dyn EscrowLedger>,
        config: EscrowConfig,
    ) -> Self {
        Self {
            leg_a,
            leg_b,
            config,
            swaps: RwLock::new(HashMap::new()),
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Secret of a swap whose destination leg was already withdrawn.
    ///
    /// Only `Completed` and `Failed` swaps disclose it; by then it is public
    /// on the destination ledger and relayers may need it to finish leg A.
    pub async fn revealed_secret(&self, swap_id: SwapId) -> Option<SecureSecret> {
        let entry = self.entry(swap_id).ok()?;
        let entry = entry.lock().await;
        match entry.swap.status {
            SwapStatus::Completed | SwapStatus::Failed => entry.secret.clone(),
            _ => None,
        }
    }

    /// Number of swaps tracked.
    pub fn len(&self) -> usize {
        self.swaps.read().len()
    }

    /// True when no swap was initiated yet.
    pub fn is_empty(&self) -> bool {
        self.swaps.read().is_empty()
    }

    fn entry(&self, swap_id: SwapId) -> Result<Arc<Mutex<SwapEntry>>, EscrowError> {
        self.swaps
            .read()
            .get(&swap_id)
            .cloned()
            .ok_or(EscrowError::SwapNotFound(swap_id))
    }

    fn ledger(&self, side: Side) -> &Arc<dyn EscrowLedger> {
        match side {
            Side::A => &self.leg_a,
            Side::B => &self.leg_b,
        }
    }

    async fn read_leg(&self, side: Side, leg: LegRef) -> Result<EscrowRecord, EscrowError> {
        self.ledger(side)
            .get(leg.escrow_id)
            .await
            .ok_or(EscrowError::EscrowNotFound(leg.escrow_id))
    }

    async fn read_legs(&self, swap: &Swap) -> Result<(EscrowRecord, EscrowRecord), EscrowError> {
        let a = self.read_leg(Side::A, swap.leg_a).await?;
        let b = self.read_leg(Side::B, swap.leg_b).await?;
        Ok((a, b))
    }

    /// Cancel every leg whose cancellation window is open, funded legs first.
    ///
    /// Returns how many legs were cancelled and the first ledger error.
    async fn cancel_open_legs(
        &self,
        a: &EscrowRecord,
        b: &EscrowRecord,
    ) -> (usize, Option<EscrowError>) {
        let now_a = self.leg_a.now();
        let now_b = self.leg_b.now();
        let mut legs = vec![(Side::A, a, now_a), (Side::B, b, now_b)];
        legs.sort_by_key(|(_, record, _)| record.status != EscrowStatus::Funded);

        let mut cancelled = 0;
        let mut first_error = None;
        for (side, record, now) in legs {
            if !LegView::new(record, now).cancellable() {
                continue;
            }
            match self.ledger(side).cancel(record.id, &record.maker).await {
                Ok(_) => {
                    info!(escrow_id = %record.id, ?side, "leg cancelled");
                    cancelled += 1;
                }
                Err(e) => {
                    warn!(escrow_id = %record.id, ?side, error = %e, "leg cancel failed");
                    first_error.get_or_insert(e);
                }
            }
        }
        (cancelled, first_error)
    }

    /// The swap can no longer complete: free what can be freed now and drop
    /// the secret. Legs still inside a withdrawal window, or whose cancel
    /// failed here, are swept later by [`SwapCoordinatorApi::cancel`].
    async fn abandon(
        &self,
        entry: &mut SwapEntry,
        a: &EscrowRecord,
        b: &EscrowRecord,
    ) -> Result<(), EscrowError> {
        let (cancelled, first_error) = self.cancel_open_legs(a, b).await;
        entry.destroy_secret();
        entry.swap.transition_to(SwapStatus::Cancelled)?;
        match first_error {
            Some(e) => warn!(
                swap_id = %entry.swap.id,
                cancelled,
                error = %e,
                "swap abandoned, leg left for a later cancel sweep"
            ),
            None => warn!(swap_id = %entry.swap.id, cancelled, "swap abandoned"),
        }
        Ok(())
    }
}

#[async_trait]
impl SwapCoordinatorApi for SwapCoordinator {
    async fn initiate(
        &self,
        leg_a: SwapLegParams,
        leg_b: SwapLegParams,
    ) -> Result<Swap, EscrowError> {
        let commitment = SecretCommitment::generate_with_len(self.config.secret_len)?;
        let default = self.config.default_schedule;
        let params_a = leg_a.into_escrow_params(commitment.hash, default);
        let params_b = leg_b.into_escrow_params(commitment.hash, default);

        // Validate both legs before touching either ledger.
        invariant_valid_params(&params_a)?;
        invariant_valid_params(&params_b)?;
        invariant_timelock_margin(
            &params_a.schedule,
            &params_b.schedule,
            self.config.min_timelock_margin_secs,
        )?;

        let record_a = self.leg_a.create(params_a).await?;
        let record_b = match self.leg_b.create(params_b).await {
            Ok(record) => record,
            Err(e) => {
                warn!(
                    escrow_id = %record_a.id,
                    error = %e,
                    "leg B create failed, leg A left to lapse"
                );
                return Err(e);
            }
        };
        invariant_hashlock_match(&record_a.commitment_hash, &commitment.hash)?;
        invariant_hashlock_match(&record_b.commitment_hash, &commitment.hash)?;

        let swap = Swap::new(
            LegRef {
                chain: self.leg_a.chain(),
                escrow_id: record_a.id,
            },
            LegRef {
                chain: self.leg_b.chain(),
                escrow_id: record_b.id,
            },
            commitment.hash,
            record_a.created_at,
        );
        info!(
            swap_id = %swap.id,
            leg_a = %swap.leg_a.escrow_id,
            leg_b = %swap.leg_b.escrow_id,
            hashlock = %hex::encode(swap.commitment_hash),
            "swap initiated"
        );

        let entry = SwapEntry {
            swap: swap.clone(),
            secret: Some(commitment.secret),
        };
        self.swaps
            .write()
            .insert(swap.id, Arc::new(Mutex::new(entry)));
        Ok(swap)
    }

    async fn confirm_funding(&self, swap_id: SwapId) -> Result<Swap, EscrowError> {
        let entry = self.entry(swap_id)?;
        let mut entry = entry.lock().await;
        if entry.swap.status != SwapStatus::Pending {
            return Ok(entry.swap.clone());
        }

        let (a, b) = self.read_legs(&entry.swap).await?;
        let outcome = funding_outcome(
            LegView::new(&a, self.leg_a.now()),
            LegView::new(&b, self.leg_b.now()),
        );
        debug!(%swap_id, ?outcome, a = ?a.status, b = ?b.status, "funding check");

        match outcome {
            FundingOutcome::BothFunded => {
                entry.swap.transition_to(SwapStatus::BothFunded)?;
                info!(%swap_id, "both legs funded");
            }
            FundingOutcome::Waiting => {}
            FundingOutcome::Abandoned => self.abandon(&mut entry, &a, &b).await?,
        }
        Ok(entry.swap.clone())
    }

    async fn reveal_and_withdraw(
        &self,
        swap_id: SwapId,
        receiver: Option<AccountId>,
    ) -> Result<Swap, EscrowError> {
        let entry = self.entry(swap_id)?;
        let mut entry = entry.lock().await;
        if entry.swap.status != SwapStatus::BothFunded {
            return Err(EscrowError::transition(
                entry.swap.status,
                SwapStatus::Completed,
            ));
        }

        let (a, b) = self.read_legs(&entry.swap).await?;
        reveal_precheck(
            LegView::new(&a, self.leg_a.now()),
            LegView::new(&b, self.leg_b.now()),
        )?;
        let secret = entry.secret.clone().ok_or(EscrowError::InvalidSecret)?;

        // Destination first: leg A's taker learns the secret from it.
        if let Err(e) = self.leg_b.withdraw(b.id, &secret, &b.taker, receiver).await {
            warn!(%swap_id, error = %e, "leg B withdrawal failed, secret still private");
            return Err(e);
        }
        info!(%swap_id, escrow_id = %b.id, "leg B withdrawn, secret public");

        if let Err(e) = self.leg_a.withdraw(a.id, &secret, &a.taker, None).await {
            entry.swap.transition_to(SwapStatus::Failed)?;
            error!(
                %swap_id,
                escrow_id = %a.id,
                error = %e,
                "leg A withdrawal failed after reveal, manual reconciliation required"
            );
            return Err(e);
        }

        entry.swap.transition_to(SwapStatus::Completed)?;
        info!(%swap_id, "swap completed");
        Ok(entry.swap.clone())
    }

    async fn cancel(&self, swap_id: SwapId) -> Result<Swap, EscrowError> {
        let entry = self.entry(swap_id)?;
        let mut entry = entry.lock().await;
        match entry.swap.status {
            SwapStatus::Pending | SwapStatus::BothFunded | SwapStatus::Cancelled => {}
            status => return Err(EscrowError::transition(status, SwapStatus::Cancelled)),
        }

        let (a, b) = self.read_legs(&entry.swap).await?;
        let (cancelled, first_error) = self.cancel_open_legs(&a, &b).await;
        if cancelled == 0 {
            debug!(%swap_id, "no leg cancellable yet");
            return Err(first_error.unwrap_or(EscrowError::NotYetCancellable));
        }

        entry.destroy_secret();
        if entry.swap.status != SwapStatus::Cancelled {
            entry.swap.transition_to(SwapStatus::Cancelled)?;
        }
        info!(%swap_id, cancelled, "swap cancelled");
        Ok(entry.swap.clone())
    }

    async fn get_swap(&self, swap_id: SwapId) -> Option<Swap> {
        let entry = self.entry(swap_id).ok()?;
        let entry = entry.lock().await;
        Some(entry.swap.clone())
    }
}

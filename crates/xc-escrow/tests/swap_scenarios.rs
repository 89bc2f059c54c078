//! # End-to-End Escrow Scenarios
//!
//! Drives engines and the coordinator through full lifecycles with
//! manually controlled ledger clocks.
//!
//! ## Test Categories
//!
//! 1. **Single-leg lifecycle** - stage windows, caller rights
//! 2. **Two-leg swaps** - legs funded at different times, reveal ordering
//! 3. **Concurrency** - racing withdrawals on one record
//! 4. **Persisted layout** - JSON never carries the secret

use std::sync::Arc;
use tokio::sync::Barrier;
use xc_escrow::{
    AccountId, ChainId, DepositProof, EscrowConfig, EscrowEngine, EscrowError, EscrowLedger,
    EscrowParams, EscrowRecord, EscrowStatus, InMemoryLedgerClient, ManualClock,
    RecordingEventSink, SecretCommitment, SwapCoordinator, SwapCoordinatorApi, SwapLegParams,
    SwapStatus, TimelockSchedule, Timestamp, TracingEventSink,
};
use xc_telemetry::{init_tracing, TelemetryConfig};

// =============================================================================
// TEST HELPERS
// =============================================================================

const T0: Timestamp = 1_700_000_000;

fn init_logs() {
    // Another test may already have installed the subscriber.
    let _ = init_tracing(&TelemetryConfig {
        log_level: "xc_escrow=debug".to_string(),
        ..TelemetryConfig::default()
    });
}

fn scenario_schedule() -> TimelockSchedule {
    TimelockSchedule::new(60, 300, 600, 900, 1_200).unwrap()
}

struct Ledger {
    engine: Arc<EscrowEngine>,
    clock: Arc<ManualClock>,
    client: Arc<InMemoryLedgerClient>,
}

fn ledger(chain: ChainId, start: Timestamp) -> Ledger {
    let clock = Arc::new(ManualClock::new(start));
    let client = Arc::new(InMemoryLedgerClient::new());
    let engine = Arc::new(EscrowEngine::new(
        chain,
        "operator".into(),
        clock.clone(),
        client.clone(),
        Arc::new(TracingEventSink),
    ));
    Ledger {
        engine,
        clock,
        client,
    }
}

impl Ledger {
    async fn deposit(&self, record: &EscrowRecord, tx: u8) -> Result<EscrowRecord, EscrowError> {
        let proof = DepositProof {
            tx_hash: [tx; 32],
            depositor: record.maker.clone(),
            asset: record.maker_asset.clone(),
            amount: record.making_amount,
        };
        self.client.submit_deposit(self.engine.chain(), proof.clone());
        self.engine.fund(record.id, proof).await
    }
}

fn params(hash: [u8; 32]) -> EscrowParams {
    EscrowParams {
        maker: "maker.near".into(),
        taker: "taker.near".into(),
        maker_asset: "usdc.near".into(),
        taker_asset: "usdc.eth".into(),
        making_amount: 250_000,
        taking_amount: 249_000,
        commitment_hash: hash,
        schedule: scenario_schedule(),
    }
}

// =============================================================================
// 1. SINGLE-LEG LIFECYCLE
// =============================================================================

#[tokio::test]
async fn test_scenario_withdraw_windows() {
    init_logs();
    let near = ledger(ChainId::Near, T0);
    let commitment = SecretCommitment::generate();
    let record = near.engine.create(params(commitment.hash)).await.unwrap();
    near.deposit(&record, 1).await.unwrap();

    let taker: AccountId = "taker.near".into();
    let third: AccountId = "relayer.near".into();

    near.clock.set(T0 + 50);
    assert_eq!(
        near.engine
            .withdraw(record.id, &commitment.secret, &taker, None)
            .await,
        Err(EscrowError::NotYetWithdrawable)
    );

    near.clock.set(T0 + 200);
    assert_eq!(
        near.engine
            .withdraw(record.id, &commitment.secret, &third, None)
            .await,
        Err(EscrowError::Unauthorized)
    );
    let done = near
        .engine
        .withdraw(record.id, &commitment.secret, &taker, None)
        .await
        .unwrap();
    assert_eq!(done.status, EscrowStatus::Withdrawn);
    assert_eq!(done.settled_at, Some(T0 + 200));
}

#[tokio::test]
async fn test_scenario_cancel_then_withdraw() {
    init_logs();
    let near = ledger(ChainId::Near, T0);
    let commitment = SecretCommitment::generate();
    let record = near.engine.create(params(commitment.hash)).await.unwrap();
    near.deposit(&record, 1).await.unwrap();

    near.clock.set(T0 + 950);
    let cancelled = near
        .engine
        .cancel(record.id, &"maker.near".into())
        .await
        .unwrap();
    assert_eq!(cancelled.status, EscrowStatus::Cancelled);
    assert_eq!(cancelled.settled_to, Some(AccountId::new("maker.near")));

    near.clock.set(T0 + 1_000);
    assert!(matches!(
        near.engine
            .withdraw(record.id, &commitment.secret, &"taker.near".into(), None)
            .await,
        Err(EscrowError::InvalidStateTransition { .. })
    ));
    assert_eq!(near.engine.get(record.id).await, Some(cancelled));
}

#[tokio::test]
async fn test_no_cancel_while_withdrawal_open() {
    let near = ledger(ChainId::Near, T0);
    let commitment = SecretCommitment::generate();
    let record = near.engine.create(params(commitment.hash)).await.unwrap();
    near.deposit(&record, 1).await.unwrap();

    for offset in [0, 59, 60, 299, 300, 599] {
        near.clock.set(T0 + offset);
        assert_eq!(
            near.engine.cancel(record.id, &"maker.near".into()).await,
            Err(EscrowError::NotYetCancellable),
            "offset {}",
            offset
        );
    }
    near.clock.set(T0 + 600);
    assert!(near
        .engine
        .cancel(record.id, &"maker.near".into())
        .await
        .is_ok());
}

// =============================================================================
// 2. TWO-LEG SWAPS
// =============================================================================

fn swap_legs() -> (SwapLegParams, SwapLegParams) {
    let source = SwapLegParams {
        maker: "alice.eth".into(),
        taker: "resolver.eth".into(),
        maker_asset: "usdc.eth".into(),
        taker_asset: "usdc.near".into(),
        making_amount: 1_000_000,
        taking_amount: 999_000,
        schedule: Some(TimelockSchedule::new(120, 900, 2_400, 3_000, 3_600).unwrap()),
    };
    let destination = SwapLegParams {
        maker: "resolver.near".into(),
        taker: "alice.near".into(),
        maker_asset: "usdc.near".into(),
        taker_asset: "usdc.eth".into(),
        making_amount: 999_000,
        taking_amount: 1_000_000,
        schedule: Some(TimelockSchedule::new(60, 600, 1_200, 1_800, 2_400).unwrap()),
    };
    (source, destination)
}

#[tokio::test]
async fn test_two_leg_swap_with_skewed_clocks() {
    init_logs();
    // Ledgers disagree on wall time.
    let eth = ledger(ChainId::Ethereum, T0);
    let near = ledger(ChainId::Near, T0 + 37);
    let coordinator = SwapCoordinator::new(
        eth.engine.clone(),
        near.engine.clone(),
        EscrowConfig::default().with_margin(1_200),
    );

    let (source, destination) = swap_legs();
    let swap = coordinator.initiate(source, destination).await.unwrap();
    let leg_a = eth.engine.get(swap.leg_a.escrow_id).await.unwrap();
    let leg_b = near.engine.get(swap.leg_b.escrow_id).await.unwrap();
    assert_eq!(leg_a.created_at, T0);
    assert_eq!(leg_b.created_at, T0 + 37);

    // Source funds first, destination much later.
    eth.deposit(&leg_a, 0xA1).await.unwrap();
    assert_eq!(
        coordinator.confirm_funding(swap.id).await.unwrap().status,
        SwapStatus::Pending
    );
    assert!(matches!(
        coordinator.reveal_and_withdraw(swap.id, None).await,
        Err(EscrowError::InvalidStateTransition { .. })
    ));

    eth.clock.advance(400);
    near.clock.advance(400);
    near.deposit(&leg_b, 0xB1).await.unwrap();
    assert_eq!(
        coordinator.confirm_funding(swap.id).await.unwrap().status,
        SwapStatus::BothFunded
    );

    let swap = coordinator.reveal_and_withdraw(swap.id, None).await.unwrap();
    assert_eq!(swap.status, SwapStatus::Completed);

    let leg_a = eth.engine.get(swap.leg_a.escrow_id).await.unwrap();
    let leg_b = near.engine.get(swap.leg_b.escrow_id).await.unwrap();
    assert_eq!(leg_a.settled_to, Some(AccountId::new("resolver.eth")));
    assert_eq!(leg_b.settled_to, Some(AccountId::new("alice.near")));
    assert_eq!(eth.client.deposit_count(), 1);
    assert_eq!(near.client.deposit_count(), 1);
}

#[tokio::test]
async fn test_destination_never_funds() {
    let eth = ledger(ChainId::Ethereum, T0);
    let near = ledger(ChainId::Near, T0);
    let coordinator = SwapCoordinator::new(
        eth.engine.clone(),
        near.engine.clone(),
        EscrowConfig::default(),
    );
    let (source, destination) = swap_legs();
    let swap = coordinator.initiate(source, destination).await.unwrap();
    let leg_a = eth.engine.get(swap.leg_a.escrow_id).await.unwrap();
    eth.deposit(&leg_a, 1).await.unwrap();

    near.clock.advance(1_300);
    eth.clock.advance(1_300);
    let swap = coordinator.confirm_funding(swap.id).await.unwrap();
    assert_eq!(swap.status, SwapStatus::Cancelled);
    assert!(coordinator.revealed_secret(swap.id).await.is_none());

    // The source maker recovers funds once their own cancellation opens.
    eth.clock.advance(1_800);
    coordinator.cancel(swap.id).await.unwrap();
    let leg_a = eth.engine.get(swap.leg_a.escrow_id).await.unwrap();
    assert_eq!(leg_a.status, EscrowStatus::Cancelled);
    assert_eq!(leg_a.settled_to, Some(AccountId::new("alice.eth")));
}

// =============================================================================
// 3. CONCURRENCY
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_racing_withdrawals_only_one_wins() {
    const RACERS: usize = 8;
    let near = ledger(ChainId::Near, T0);
    let commitment = SecretCommitment::generate();
    let record = near.engine.create(params(commitment.hash)).await.unwrap();
    near.deposit(&record, 1).await.unwrap();
    near.clock.set(T0 + 400);

    let id = record.id;
    let barrier = Arc::new(Barrier::new(RACERS));
    let mut handles = Vec::with_capacity(RACERS);
    for i in 0..RACERS {
        let engine = near.engine.clone();
        let barrier = barrier.clone();
        let secret = commitment.secret.clone();
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            let caller = AccountId::new(format!("relayer-{}.near", i));
            engine.withdraw(id, &secret, &caller, None).await
        }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => wins += 1,
            Err(e) => assert!(matches!(e, EscrowError::InvalidStateTransition { .. })),
        }
    }
    assert_eq!(wins, 1);
    assert_eq!(
        near.engine.get(id).await.unwrap().status,
        EscrowStatus::Withdrawn
    );
}

// =============================================================================
// 4. PERSISTED LAYOUT
// =============================================================================

#[tokio::test]
async fn test_persisted_json_never_contains_secret() {
    let events = Arc::new(RecordingEventSink::new());
    let clock = Arc::new(ManualClock::new(T0));
    let client = Arc::new(InMemoryLedgerClient::new());
    let engine_a = Arc::new(EscrowEngine::new(
        ChainId::Ethereum,
        "operator".into(),
        clock.clone(),
        client.clone(),
        events.clone(),
    ));
    let engine_b = Arc::new(EscrowEngine::new(
        ChainId::Near,
        "operator".into(),
        clock.clone(),
        client.clone(),
        events.clone(),
    ));
    let coordinator = SwapCoordinator::new(
        engine_a.clone(),
        engine_b.clone(),
        EscrowConfig::default(),
    );
    let (source, destination) = swap_legs();
    let swap = coordinator.initiate(source, destination).await.unwrap();

    for (engine, id, tx) in [
        (&engine_a, swap.leg_a.escrow_id, 1u8),
        (&engine_b, swap.leg_b.escrow_id, 2u8),
    ] {
        let record = engine.get(id).await.unwrap();
        let proof = DepositProof {
            tx_hash: [tx; 32],
            depositor: record.maker.clone(),
            asset: record.maker_asset.clone(),
            amount: record.making_amount,
        };
        client.submit_deposit(engine.chain(), proof.clone());
        engine.fund(id, proof).await.unwrap();
    }
    let swap = coordinator.confirm_funding(swap.id).await.unwrap();

    // Snapshot while the secret is still private.
    let swap_json = serde_json::to_string(&swap).unwrap();
    let record_a = engine_a.get(swap.leg_a.escrow_id).await.unwrap();
    let record_json = serde_json::to_string(&record_a).unwrap();

    clock.advance(700);
    coordinator.reveal_and_withdraw(swap.id, None).await.unwrap();
    let secret = coordinator.revealed_secret(swap.id).await.unwrap();
    let secret_hex = hex::encode(secret.as_bytes());

    let after_a =
        serde_json::to_string(&engine_a.get(swap.leg_a.escrow_id).await.unwrap()).unwrap();
    let after_swap =
        serde_json::to_string(&coordinator.get_swap(swap.id).await.unwrap()).unwrap();
    for json in [&swap_json, &record_json, &after_a, &after_swap] {
        assert!(!json.contains(&secret_hex));
    }

    let value: serde_json::Value = serde_json::from_str(&after_swap).unwrap();
    for key in ["id", "leg_a", "leg_b", "commitment_hash", "status", "created_at"] {
        assert!(value.get(key).is_some(), "missing {}", key);
    }
    assert!(value.get("secret").is_none());

    // Only the withdrawal events carry it, once it is public.
    let withdrawn = events
        .events()
        .into_iter()
        .filter(|e| serde_json::to_string(e).unwrap().contains(&secret_hex))
        .count();
    assert_eq!(withdrawn, 2);
}

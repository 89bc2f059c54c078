//! Escrow configuration from environment variables.

use crate::domain::{TimelockSchedule, DEFAULT_SECRET_LEN, MIN_SECRET_LEN};
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Engine and coordinator defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscrowConfig {
    /// Schedule for legs that do not bring their own.
    pub default_schedule: TimelockSchedule,

    /// Length of generated secrets in bytes.
    pub secret_len: usize,

    /// Seconds the source leg's withdrawal window must outlast the
    /// destination leg's.
    pub min_timelock_margin_secs: u64,
}

impl Default for EscrowConfig {
    fn default() -> Self {
        Self {
            default_schedule: TimelockSchedule {
                finality: 60,
                private_withdrawal: 600,
                public_withdrawal: 1_800,
                private_cancellation: 3_600,
                public_cancellation: 7_200,
            },
            secret_len: DEFAULT_SECRET_LEN,
            min_timelock_margin_secs: 0,
        }
    }
}

impl EscrowConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `ESCROW_FINALITY_SECS`: end of the finality stage (default: 60)
    /// - `ESCROW_PRIVATE_WITHDRAWAL_SECS`: end of private withdrawal (default: 600)
    /// - `ESCROW_PUBLIC_WITHDRAWAL_SECS`: end of public withdrawal (default: 1800)
    /// - `ESCROW_PRIVATE_CANCELLATION_SECS`: end of private cancellation (default: 3600)
    /// - `ESCROW_PUBLIC_CANCELLATION_SECS`: expiry marker (default: 7200)
    /// - `ESCROW_SECRET_LEN`: generated secret length, at least 16 (default: 32)
    /// - `ESCROW_MIN_TIMELOCK_MARGIN_SECS`: cross-leg margin (default: 0)
    ///
    /// Unparseable values, a mis-ordered schedule and a too-short secret
    /// length are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) over an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let d = defaults.default_schedule;

        let schedule = TimelockSchedule {
            finality: parse_or(&lookup, "ESCROW_FINALITY_SECS", d.finality),
            private_withdrawal: parse_or(
                &lookup,
                "ESCROW_PRIVATE_WITHDRAWAL_SECS",
                d.private_withdrawal,
            ),
            public_withdrawal: parse_or(
                &lookup,
                "ESCROW_PUBLIC_WITHDRAWAL_SECS",
                d.public_withdrawal,
            ),
            private_cancellation: parse_or(
                &lookup,
                "ESCROW_PRIVATE_CANCELLATION_SECS",
                d.private_cancellation,
            ),
            public_cancellation: parse_or(
                &lookup,
                "ESCROW_PUBLIC_CANCELLATION_SECS",
                d.public_cancellation,
            ),
        };
        let default_schedule = match schedule.validate() {
            Ok(()) => schedule,
            Err(e) => {
                warn!(error = %e, "ignoring schedule overrides");
                d
            }
        };

        let mut secret_len = parse_or(&lookup, "ESCROW_SECRET_LEN", defaults.secret_len);
        if secret_len < MIN_SECRET_LEN {
            warn!(secret_len, min = MIN_SECRET_LEN, "ignoring ESCROW_SECRET_LEN");
            secret_len = defaults.secret_len;
        }

        Self {
            default_schedule,
            secret_len,
            min_timelock_margin_secs: parse_or(
                &lookup,
                "ESCROW_MIN_TIMELOCK_MARGIN_SECS",
                defaults.min_timelock_margin_secs,
            ),
        }
    }

    /// Builder: replace the default schedule.
    pub fn with_schedule(mut self, schedule: TimelockSchedule) -> Self {
        self.default_schedule = schedule;
        self
    }

    /// Builder: replace the cross-leg margin.
    pub fn with_margin(mut self, secs: u64) -> Self {
        self.min_timelock_margin_secs = secs;
        self
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                warn!(key, value = %raw, "ignoring unparseable override");
                default
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_schedule_is_valid() {
        assert!(EscrowConfig::default().default_schedule.validate().is_ok());
    }

    #[test]
    fn test_no_overrides_gives_default() {
        assert_eq!(EscrowConfig::from_lookup(|_| None), EscrowConfig::default());
    }

    #[test]
    fn test_overrides_applied() {
        let config = EscrowConfig::from_lookup(lookup(&[
            ("ESCROW_FINALITY_SECS", "10"),
            ("ESCROW_PRIVATE_WITHDRAWAL_SECS", "20"),
            ("ESCROW_PUBLIC_WITHDRAWAL_SECS", "30"),
            ("ESCROW_PRIVATE_CANCELLATION_SECS", "40"),
            ("ESCROW_PUBLIC_CANCELLATION_SECS", "50"),
            ("ESCROW_SECRET_LEN", "48"),
            ("ESCROW_MIN_TIMELOCK_MARGIN_SECS", "5"),
        ]));
        assert_eq!(
            config.default_schedule,
            TimelockSchedule::new(10, 20, 30, 40, 50).unwrap()
        );
        assert_eq!(config.secret_len, 48);
        assert_eq!(config.min_timelock_margin_secs, 5);
    }

    #[test]
    fn test_invalid_overrides_ignored() {
        let config = EscrowConfig::from_lookup(lookup(&[
            ("ESCROW_FINALITY_SECS", "soon"),
            ("ESCROW_SECRET_LEN", "8"),
            ("ESCROW_MIN_TIMELOCK_MARGIN_SECS", "-1"),
        ]));
        assert_eq!(config, EscrowConfig::default());
    }

    #[test]
    fn test_misordered_schedule_falls_back() {
        let config = EscrowConfig::from_lookup(lookup(&[("ESCROW_FINALITY_SECS", "100000")]));
        assert_eq!(
            config.default_schedule,
            EscrowConfig::default().default_schedule
        );
    }

    #[test]
    fn test_serde_layout() {
        let json = serde_json::to_value(EscrowConfig::default()).unwrap();
        assert_eq!(json["secret_len"], 32);
        assert_eq!(json["default_schedule"]["finality"], 60);
    }
}

//! Per-world outcomes and pass-level accounting.
//!
//! Outcomes are terminal: recorded once per catalog entry and never
//! revisited. The report is three counters owned by the engine for the
//! duration of a single pass; counts and log order exactly mirror catalog
//! order because the pass is single-threaded and strictly sequential.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Load strategy that claimed success for a world, for the per-world log
/// line. Tiers are tried strictly in this order.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    /// Structured call carrying a resolved generator handle.
    Structured,
    /// Structured call carrying the raw generator reference string.
    Named,
    /// Legacy call with no generator parameter.
    Legacy,
    /// External orchestrator console commands.
    Console,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Structured => "structured",
            Tier::Named => "named",
            Tier::Legacy => "legacy",
            Tier::Console => "console",
        }
    }
}

/// Why a world ended the pass unloaded.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum FailReason {
    /// The world was loaded, a generator must be enforced, and no unload
    /// shape took effect; loading over the live instance is never allowed.
    #[error("unload was refused or unsupported")]
    UnloadFailed,
    /// Every applicable strategy tier was exhausted, or the registry still
    /// reported the world unloaded after a claimed success.
    #[error("no load strategy left the world loaded")]
    LoadNotConfirmed,
}

/// Terminal state for one catalog entry.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Outcome {
    /// The world is confirmed loaded. `tier` is absent when no mutating
    /// call was needed.
    Loaded { tier: Option<Tier> },
    /// Backing storage is missing; the engine will not create it.
    SkippedMissingStorage,
    Failed { reason: FailReason },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Loaded { .. } => "loaded",
            Outcome::SkippedMissingStorage => "skipped_missing_storage",
            Outcome::Failed { .. } => "failed",
        }
    }
}

/// Counter sink for one reconciliation pass.
#[derive(Debug, Default)]
pub struct Report {
    ok: u32,
    skipped_missing_storage: u32,
    failed: u32,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one terminal outcome; increments exactly one counter.
    pub fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Loaded { .. } => self.ok += 1,
            Outcome::SkippedMissingStorage => self.skipped_missing_storage += 1,
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    pub fn summary(&self) -> Summary {
        Summary {
            ok: self.ok,
            skipped_missing_storage: self.skipped_missing_storage,
            failed: self.failed,
        }
    }
}

/// Final aggregate counts for a pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub ok: u32,
    pub skipped_missing_storage: u32,
    pub failed: u32,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ok={} skipped_missing_storage={} failed={}",
            self.ok, self.skipped_missing_storage, self.failed
        )
    }
}

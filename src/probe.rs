//! Capability probing over ordered call-shape variants.
//!
//! One host build exposes one overlapping subset of the historical operation
//! signatures, and which subset cannot be known in advance. The probe walks
//! the supplied shapes strictly in order, treating "shape missing" and
//! "invocation failed" identically as cues to move on, and remembers the
//! first shape that completed per `(target, operation)` so later worlds skip
//! the discovery walk. Exhausting every shape is an ordinary `Unsupported`
//! result the caller can fall through on, never an error.

use crate::host::CallOutcome;
use std::collections::BTreeMap;
use tracing::debug;

/// Which boundary owns a probed operation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum TargetKind {
    Host,
    Extension,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Host => "host",
            TargetKind::Extension => "extension",
        }
    }
}

/// Operation families the engine probes for.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum OpName {
    UnloadWorld,
    LoadStructured,
    LoadNamed,
    LoadLegacy,
    DefaultGenerator,
}

impl OpName {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpName::UnloadWorld => "unload_world",
            OpName::LoadStructured => "load_structured",
            OpName::LoadNamed => "load_named",
            OpName::LoadLegacy => "load_legacy",
            OpName::DefaultGenerator => "default_generator",
        }
    }
}

/// Process-lifetime cache of discovered call shapes.
///
/// Maps `(target, operation)` to the index of the first variant that
/// completed. Populated lazily during a reconciliation pass and read-only
/// afterwards; `reset` exists for test isolation, not runtime use. Only
/// successes are cached; an operation no shape satisfies is re-probed on
/// the next world.
#[derive(Debug, Default)]
pub struct CapabilityCache {
    discovered: BTreeMap<(TargetKind, OpName), usize>,
}

impl CapabilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index of the variant previously discovered for `(target, op)`.
    pub fn discovered(&self, target: TargetKind, op: OpName) -> Option<usize> {
        self.discovered.get(&(target, op)).copied()
    }

    /// Drop every discovery so the next probe re-walks from the top.
    pub fn reset(&mut self) {
        self.discovered.clear();
    }

    fn remember(&mut self, target: TargetKind, op: OpName, index: usize) {
        self.discovered.insert((target, op), index);
    }
}

/// Result of probing one operation across its variants.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Probed {
    /// Some variant completed; `variant` is its index in the supplied order.
    Completed { variant: usize },
    /// Every variant was unavailable or failed.
    Unsupported,
}

/// Try `variant_count` call shapes in order until one completes.
///
/// A previously discovered shape is tried first; when it stops working the
/// walk falls back to the full priority order, so a host that changes under
/// us degrades to rediscovery instead of a hard failure.
pub fn probe_call<F>(
    cache: &mut CapabilityCache,
    target: TargetKind,
    op: OpName,
    variant_count: usize,
    mut call: F,
) -> Probed
where
    F: FnMut(usize) -> CallOutcome,
{
    let cached = cache.discovered(target, op);
    if let Some(index) = cached {
        if index < variant_count && call(index) == CallOutcome::Completed {
            return Probed::Completed { variant: index };
        }
        debug!(
            boundary = target.as_str(),
            op = op.as_str(),
            variant = index,
            "cached variant no longer completes, rediscovering"
        );
    }

    for index in 0..variant_count {
        if cached == Some(index) {
            continue;
        }
        match call(index) {
            CallOutcome::Completed => {
                cache.remember(target, op, index);
                return Probed::Completed { variant: index };
            }
            CallOutcome::Rejected | CallOutcome::Unsupported => {
                debug!(
                    boundary = target.as_str(),
                    op = op.as_str(),
                    variant = index,
                    "variant did not complete"
                );
            }
        }
    }

    Probed::Unsupported
}

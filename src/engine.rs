//! The per-world reconciliation state machine.
//!
//! One pass walks the catalog in declared order and drives each world toward
//! loaded-with-its-generator. The decision ladder per world: storage gate,
//! registry query, enforced unload when a generator binding must change
//! hands, generator resolution, then load strategy tiers in strict priority
//! order, and finally a mandatory confirmation query. The registry is the
//! sole source of truth for the final outcome; a strategy claiming success
//! while the world stays unloaded is still a failure.
//!
//! Failures are scoped to the world that suffered them; the pass always
//! continues to the next catalog entry.

use crate::catalog::{Catalog, WorldSpec};
use crate::fallback::dispatch_orchestrator_commands;
use crate::generator::resolve_generator;
use crate::host::{
    ConsoleSink, DEFAULT_SEED, ExtensionRegistry, GeneratorArg, LEGACY_VARIANTS, LoadRequest,
    STRUCTURED_VARIANTS, UNLOAD_VARIANTS, WorldHost,
};
use crate::probe::{CapabilityCache, OpName, Probed, TargetKind, probe_call};
use crate::report::{FailReason, Outcome, Report, Tier};
use crate::storage::WorldStore;
use tracing::{debug, info, warn};

/// External orchestrator used for the console fallback tier.
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// Extension that must be installed and enabled before any command is
    /// dispatched.
    pub extension: String,
    /// Command prefix the orchestrator registered on the console, e.g. `wo`.
    pub command_prefix: String,
}

/// Pass-wide knobs.
#[derive(Clone, Debug)]
pub struct EngineOptions {
    /// Ask the host to persist chunks when unloading for enforcement.
    pub save_on_unload: bool,
    /// Seed handed to seeded load shapes; existing storage keeps its own.
    pub seed: i64,
    /// Console fallback configuration; `None` disables the tier entirely.
    pub orchestrator: Option<OrchestratorConfig>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            save_on_unload: true,
            seed: DEFAULT_SEED,
            orchestrator: None,
        }
    }
}

/// Single-threaded reconciler for one catalog pass.
///
/// Owns the capability cache and report counters for the duration of the
/// pass. All host-facing calls are blocking and sequential; there is no
/// parallel reconciliation and no timeout: a hung host call hangs the pass,
/// which is an accepted property of the deployment, not something the engine
/// works around.
pub struct Reconciler<'a> {
    store: &'a WorldStore,
    host: &'a mut dyn WorldHost,
    extensions: &'a dyn ExtensionRegistry,
    console: Option<&'a mut dyn ConsoleSink>,
    options: EngineOptions,
    capabilities: CapabilityCache,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        store: &'a WorldStore,
        host: &'a mut dyn WorldHost,
        extensions: &'a dyn ExtensionRegistry,
    ) -> Self {
        Self {
            store,
            host,
            extensions,
            console: None,
            options: EngineOptions::default(),
            capabilities: CapabilityCache::new(),
        }
    }

    /// Attach the console sink the orchestrator tier dispatches through.
    pub fn with_console(mut self, console: &'a mut dyn ConsoleSink) -> Self {
        self.console = Some(console);
        self
    }

    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Call shapes discovered so far, for inspection after a pass.
    pub fn capabilities(&self) -> &CapabilityCache {
        &self.capabilities
    }

    /// Drop discovered shapes so the next pass re-probes from the top.
    pub fn reset_capabilities(&mut self) {
        self.capabilities.reset();
    }

    /// Reconcile every catalog entry in declared order.
    pub fn run(&mut self, catalog: &Catalog) -> Report {
        let mut report = Report::new();
        for spec in &catalog.worlds {
            let outcome = self.reconcile(spec);
            match &outcome {
                Outcome::Loaded { tier } => info!(
                    world = %spec.name,
                    outcome = outcome.label(),
                    tier = tier.map(|tier| tier.as_str()),
                    "world reconciled"
                ),
                Outcome::SkippedMissingStorage => info!(
                    world = %spec.name,
                    outcome = outcome.label(),
                    "storage missing on disk, will not create"
                ),
                Outcome::Failed { reason } => warn!(
                    world = %spec.name,
                    outcome = outcome.label(),
                    %reason,
                    "world left unreconciled"
                ),
            }
            report.record(&outcome);
        }
        info!(summary = %report.summary(), "reconciliation pass complete");
        report
    }

    /// Drive one world toward its desired state and return the terminal
    /// outcome. `run` is the usual entry point; this is public so embedders
    /// can reconcile a single world on demand with the same semantics.
    pub fn reconcile(&mut self, spec: &WorldSpec) -> Outcome {
        // Storage gate first: the registry is never consulted for a world
        // with no backing storage, and nothing is ever created.
        if !self.store.exists(&spec.name) {
            return Outcome::SkippedMissingStorage;
        }

        if self.host.is_loaded(&spec.name) {
            if !spec.wants_generator() {
                // Desired state already holds; zero mutating calls.
                return Outcome::Loaded { tier: None };
            }
            // Enforcement cannot happen in place: the binding only changes
            // hands across an unload/reload cycle.
            debug!(world = %spec.name, "loaded without enforced generator, unloading first");
            if !self.unload(spec) {
                return Outcome::Failed {
                    reason: FailReason::UnloadFailed,
                };
            }
        }

        let tier = self.attempt_load_tiers(spec);

        if self.host.is_loaded(&spec.name) {
            Outcome::Loaded { tier }
        } else {
            Outcome::Failed {
                reason: FailReason::LoadNotConfirmed,
            }
        }
    }

    fn unload(&mut self, spec: &WorldSpec) -> bool {
        let world = spec.name.as_str();
        let save = self.options.save_on_unload;
        let host = &mut *self.host;
        let probed = probe_call(
            &mut self.capabilities,
            TargetKind::Host,
            OpName::UnloadWorld,
            UNLOAD_VARIANTS.len(),
            |index| host.unload(UNLOAD_VARIANTS[index], world, save),
        );
        if let Probed::Completed { variant } = probed {
            debug!(world, shape = UNLOAD_VARIANTS[variant].as_str(), "unload shape completed");
        }
        matches!(probed, Probed::Completed { .. })
    }

    /// Walk the strategy tiers in priority order; returns the first tier
    /// that claimed success, or `None` when every applicable tier was
    /// exhausted. The claim is only provisional; `reconcile` confirms it
    /// against the registry afterwards.
    fn attempt_load_tiers(&mut self, spec: &WorldSpec) -> Option<Tier> {
        let reference = spec.generator.as_deref().filter(|g| !g.is_empty());

        let handle = reference.and_then(|reference| {
            let handle =
                resolve_generator(self.extensions, &mut self.capabilities, &spec.name, reference);
            if handle.is_none() {
                debug!(world = %spec.name, reference, "generator reference did not resolve");
            }
            handle
        });

        if let Some(handle) = handle.as_ref() {
            if self.try_load(spec, OpName::LoadStructured, GeneratorArg::Handle(handle)) {
                return Some(Tier::Structured);
            }
        }

        if let Some(reference) = reference {
            if self.try_load(spec, OpName::LoadNamed, GeneratorArg::Name(reference)) {
                return Some(Tier::Named);
            }
        }

        // Legacy shapes carry no generator argument, so they only apply when
        // the catalog did not ask for one.
        if reference.is_none() && self.try_legacy(spec) {
            return Some(Tier::Legacy);
        }

        if reference.is_some() {
            if let Some(tier) = self.try_console(spec) {
                return Some(tier);
            }
        }

        None
    }

    fn try_load(&mut self, spec: &WorldSpec, op: OpName, generator: GeneratorArg<'_>) -> bool {
        let request = LoadRequest {
            world: &spec.name,
            environment: &spec.environment,
            seed: self.options.seed,
            generator,
        };
        let host = &mut *self.host;
        let probed = probe_call(
            &mut self.capabilities,
            TargetKind::Host,
            op,
            STRUCTURED_VARIANTS.len(),
            |index| host.load(STRUCTURED_VARIANTS[index], &request),
        );
        if let Probed::Completed { variant } = probed {
            debug!(
                world = %spec.name,
                shape = STRUCTURED_VARIANTS[variant].as_str(),
                "structured load shape completed"
            );
        }
        matches!(probed, Probed::Completed { .. })
    }

    fn try_legacy(&mut self, spec: &WorldSpec) -> bool {
        let request = LoadRequest {
            world: &spec.name,
            environment: &spec.environment,
            seed: self.options.seed,
            generator: GeneratorArg::None,
        };
        let host = &mut *self.host;
        let probed = probe_call(
            &mut self.capabilities,
            TargetKind::Host,
            OpName::LoadLegacy,
            LEGACY_VARIANTS.len(),
            |index| host.load(LEGACY_VARIANTS[index], &request),
        );
        if let Probed::Completed { variant } = probed {
            debug!(
                world = %spec.name,
                shape = LEGACY_VARIANTS[variant].as_str(),
                "legacy load shape completed"
            );
        }
        matches!(probed, Probed::Completed { .. })
    }

    /// Console tier: gated on an installed, enabled orchestrator extension
    /// and an attached sink. The dispatched commands are unverifiable, so
    /// the claim here is already a registry query rather than anything the
    /// console reported.
    fn try_console(&mut self, spec: &WorldSpec) -> Option<Tier> {
        let config = self.options.orchestrator.as_ref()?;
        let enabled = self
            .extensions
            .status(&config.extension)
            .is_some_and(|status| status.enabled);
        if !enabled {
            debug!(
                world = %spec.name,
                extension = %config.extension,
                "orchestrator extension unavailable, skipping console tier"
            );
            return None;
        }
        let console = self.console.as_deref_mut()?;
        dispatch_orchestrator_commands(console, &config.command_prefix, spec);
        self.host.is_loaded(&spec.name).then_some(Tier::Console)
    }
}

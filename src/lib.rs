//! Declarative reconciler for named, persistent worlds.
//!
//! The crate drives a fixed catalog of worlds into a desired runtime state:
//! present on backing storage, loaded into the host runtime, and bound to the
//! terrain generator the catalog names. Host builds expose overlapping but
//! unpredictable subsets of the historical load/unload/create signatures, so
//! every mutating call goes through a capability probe that walks known call
//! shapes in priority order, and every outcome is confirmed against live host
//! state instead of trusting a call's own return value.
//!
//! The engine never creates a world: storage missing on disk is a skip, not a
//! provisioning request.

pub mod catalog;
pub mod engine;
pub mod fallback;
pub mod generator;
pub mod host;
pub mod probe;
pub mod report;
pub mod storage;

pub use catalog::{Catalog, Environment, WorldSpec, load_catalog_from_path};
pub use engine::{EngineOptions, OrchestratorConfig, Reconciler};
pub use fallback::orchestrator_commands;
pub use generator::resolve_generator;
pub use host::{
    CallOutcome, ConsoleSink, DEFAULT_SEED, ExtensionRegistry, ExtensionStatus, GENERATOR_VARIANTS,
    GeneratorArg, GeneratorHandle, GeneratorOutcome, GeneratorVariant, LEGACY_VARIANTS,
    LoadRequest, LoadVariant, STRUCTURED_VARIANTS, UNLOAD_VARIANTS, UnloadVariant, WorldHost,
};
pub use probe::{CapabilityCache, OpName, Probed, TargetKind, probe_call};
pub use report::{FailReason, Outcome, Report, Summary, Tier};
pub use storage::{WorldStore, storage_root_from_env};

//! Host-facing boundaries: runtime registry, extension registry, console.
//!
//! Host builds differ in which load/unload signatures they expose, so every
//! mutating operation is described as an explicit call shape the host either
//! completes, rejects, or does not support. The probe layer walks shapes in
//! the priority order declared here; implementations must answer
//! `Unsupported` for shapes they cannot express rather than guessing at the
//! caller's intent.

use crate::catalog::Environment;

/// Seed passed to seeded load shapes. Pre-existing storage carries its own
/// seed; hosts that demand one anyway receive this fixed value.
pub const DEFAULT_SEED: i64 = 0;

/// Result of one host call shape.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CallOutcome {
    /// The host accepted the call and claims it took effect.
    Completed,
    /// The shape exists on this host build but the invocation failed.
    Rejected,
    /// The shape does not exist on this host build.
    Unsupported,
}

/// Opaque generator reference minted by an extension.
///
/// The token only has meaning to the host that minted it; the engine passes
/// it back verbatim on structured load shapes and never inspects it.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct GeneratorHandle(String);

impl GeneratorHandle {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

/// Unload signatures observed across host generations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum UnloadVariant {
    /// `unload(world_handle, save)`
    ByHandle,
    /// `unload(name, save)`
    ByName,
}

impl UnloadVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnloadVariant::ByHandle => "by_handle",
            UnloadVariant::ByName => "by_name",
        }
    }
}

/// Unload shapes in probe order.
pub const UNLOAD_VARIANTS: &[UnloadVariant] = &[UnloadVariant::ByHandle, UnloadVariant::ByName];

/// Load/create signatures observed across host generations.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LoadVariant {
    /// `create(name, environment, generator)`
    Create,
    /// `create(name, environment, seed, generator)`
    CreateSeeded,
    /// `load(name, environment, generator)`
    Load,
    /// `load(name, environment, seed, generator)`
    LoadSeeded,
    /// `create(name)`
    CreateBare,
    /// `create(name, environment)`
    CreateWithEnvironment,
    /// `load(name)`
    LoadBare,
    /// `load(name, environment)`
    LoadWithEnvironment,
}

impl LoadVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadVariant::Create => "create",
            LoadVariant::CreateSeeded => "create_seeded",
            LoadVariant::Load => "load",
            LoadVariant::LoadSeeded => "load_seeded",
            LoadVariant::CreateBare => "create_bare",
            LoadVariant::CreateWithEnvironment => "create_with_environment",
            LoadVariant::LoadBare => "load_bare",
            LoadVariant::LoadWithEnvironment => "load_with_environment",
        }
    }
}

/// Structured shapes carrying a generator argument, in probe order: create
/// before load, plain before seeded, the order the host lineage grew them.
pub const STRUCTURED_VARIANTS: &[LoadVariant] = &[
    LoadVariant::Create,
    LoadVariant::CreateSeeded,
    LoadVariant::Load,
    LoadVariant::LoadSeeded,
];

/// Legacy shapes with no generator parameter, in probe order.
pub const LEGACY_VARIANTS: &[LoadVariant] = &[
    LoadVariant::CreateBare,
    LoadVariant::CreateWithEnvironment,
    LoadVariant::LoadBare,
    LoadVariant::LoadWithEnvironment,
];

/// Generator argument attached to a load shape.
#[derive(Clone, Copy, Debug)]
pub enum GeneratorArg<'a> {
    /// Resolved handle minted by the owning extension.
    Handle(&'a GeneratorHandle),
    /// Raw extension reference, for hosts that resolve strings themselves.
    Name(&'a str),
    /// No generator argument (legacy shapes).
    None,
}

/// One fully-described load attempt.
#[derive(Clone, Copy, Debug)]
pub struct LoadRequest<'a> {
    pub world: &'a str,
    pub environment: &'a Environment,
    pub seed: i64,
    pub generator: GeneratorArg<'a>,
}

/// The host's registry of currently-loaded worlds.
///
/// `is_loaded` is the single source of truth for confirmation. Mutating
/// calls are advisory: their outcomes steer the probe walk but are never
/// trusted as the final word on state.
pub trait WorldHost {
    fn is_loaded(&self, world: &str) -> bool;

    fn unload(&mut self, variant: UnloadVariant, world: &str, save: bool) -> CallOutcome;

    fn load(&mut self, variant: LoadVariant, request: &LoadRequest<'_>) -> CallOutcome;
}

/// Presence and enablement of a named extension.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct ExtensionStatus {
    pub enabled: bool,
}

/// Signatures for asking an extension to mint a generator for a world.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GeneratorVariant {
    /// `default_generator(world, generator_id)`
    ForWorldWithId,
    /// `default_generator(world)`
    ForWorld,
}

impl GeneratorVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorVariant::ForWorldWithId => "for_world_with_id",
            GeneratorVariant::ForWorld => "for_world",
        }
    }
}

/// Generator factory shapes in probe order.
pub const GENERATOR_VARIANTS: &[GeneratorVariant] =
    &[GeneratorVariant::ForWorldWithId, GeneratorVariant::ForWorld];

/// Result of a generator factory call.
#[derive(Clone, Debug)]
pub enum GeneratorOutcome {
    Produced(GeneratorHandle),
    Rejected,
    Unsupported,
}

/// Lookup of installed host extensions.
pub trait ExtensionRegistry {
    /// Presence and enabled flag for `extension`, `None` if not installed.
    fn status(&self, extension: &str) -> Option<ExtensionStatus>;

    /// Ask `extension` to mint a generator for `world` via one factory shape.
    fn default_generator(
        &self,
        variant: GeneratorVariant,
        extension: &str,
        world: &str,
        generator_id: &str,
    ) -> GeneratorOutcome;
}

/// Fire-and-forget sink for textual management commands.
///
/// Dispatch has no return channel and no error signal; it is unverifiable by
/// design. Callers judge success only by a later registry query.
pub trait ConsoleSink {
    fn dispatch(&mut self, command: &str);
}

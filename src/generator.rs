//! Generator resolution through the extension registry.
//!
//! A generator reference names the extension that owns the strategy, with an
//! optional id after a colon (`"SkyForge:islands"`). Resolution is silent and
//! non-fatal by contract: an absent extension, a disabled one, or one that
//! exposes no usable factory shape all yield `None`, and the engine degrades
//! to a weaker load tier instead of failing the world outright.

use crate::host::{
    CallOutcome, ExtensionRegistry, GENERATOR_VARIANTS, GeneratorHandle, GeneratorOutcome,
};
use crate::probe::{CapabilityCache, OpName, Probed, TargetKind, probe_call};
use tracing::debug;

/// Split a generator reference into extension name and generator id.
pub(crate) fn split_reference(reference: &str) -> (&str, &str) {
    match reference.split_once(':') {
        Some((extension, id)) => (extension, id),
        None => (reference, ""),
    }
}

/// Resolve `reference` to a concrete generator handle for `world`, or `None`.
pub fn resolve_generator(
    extensions: &dyn ExtensionRegistry,
    cache: &mut CapabilityCache,
    world: &str,
    reference: &str,
) -> Option<GeneratorHandle> {
    let (extension, generator_id) = split_reference(reference);
    let status = match extensions.status(extension) {
        Some(status) => status,
        None => {
            debug!(extension, world, "generator extension not installed");
            return None;
        }
    };
    if !status.enabled {
        debug!(extension, world, "generator extension disabled");
        return None;
    }

    let mut produced = None;
    let probed = probe_call(
        cache,
        TargetKind::Extension,
        OpName::DefaultGenerator,
        GENERATOR_VARIANTS.len(),
        |index| match extensions.default_generator(
            GENERATOR_VARIANTS[index],
            extension,
            world,
            generator_id,
        ) {
            GeneratorOutcome::Produced(handle) => {
                produced = Some(handle);
                CallOutcome::Completed
            }
            GeneratorOutcome::Rejected => CallOutcome::Rejected,
            GeneratorOutcome::Unsupported => CallOutcome::Unsupported,
        },
    );

    match probed {
        Probed::Completed { variant } => {
            debug!(
                extension,
                world,
                shape = GENERATOR_VARIANTS[variant].as_str(),
                "generator factory shape completed"
            );
            produced
        }
        Probed::Unsupported => {
            debug!(extension, world, "extension exposes no usable generator factory");
            None
        }
    }
}

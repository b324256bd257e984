//! Last-resort console commands routed through an external orchestrator.
//!
//! Dispatch is fire-and-forget: no return channel, no error signal. The
//! fixed sequence mirrors how operators drive the orchestrator by hand:
//! load first, then import (which registers an existing folder), then create
//! as a final long shot that some forks treat as import. Every command is
//! sent regardless of what the previous one appeared to do; only the
//! engine's registry confirmation decides whether any of it worked.

use crate::catalog::WorldSpec;
use crate::host::ConsoleSink;
use tracing::debug;

/// Render the fixed command sequence for one world.
pub fn orchestrator_commands(prefix: &str, spec: &WorldSpec) -> Vec<String> {
    let world = &spec.name;
    let environment = spec.environment.console_token();
    let generator = spec.generator.as_deref().unwrap_or_default();
    vec![
        format!("{prefix} load {world}"),
        format!("{prefix} import {world} {environment} -g {generator}"),
        format!("{prefix} create {world} {environment} -g {generator}"),
    ]
}

/// Dispatch the whole sequence in order, unconditionally.
pub fn dispatch_orchestrator_commands(
    console: &mut dyn ConsoleSink,
    prefix: &str,
    spec: &WorldSpec,
) {
    for command in orchestrator_commands(prefix, spec) {
        debug!(%command, "dispatching orchestrator command");
        console.dispatch(&command);
    }
}

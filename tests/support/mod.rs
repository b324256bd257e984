// Scripted doubles for the host boundaries, shared by the integration suite.
// The host journals every registry call (queries included) so tests can
// assert call ordering and the zero-call properties, and the console shares
// the loaded-set so dispatched commands can visibly take effect.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fs;
use std::rc::Rc;
use tempfile::TempDir;
use worldkeeper::{
    CallOutcome, Catalog, ConsoleSink, Environment, ExtensionRegistry, ExtensionStatus,
    GeneratorArg, GeneratorHandle, GeneratorOutcome, GeneratorVariant, LoadRequest, LoadVariant,
    UnloadVariant, WorldHost, WorldSpec, WorldStore,
};

/// Worlds the scripted host currently considers loaded.
pub type LoadedWorlds = Rc<RefCell<BTreeSet<String>>>;

pub fn loaded_worlds(names: &[&str]) -> LoadedWorlds {
    Rc::new(RefCell::new(
        names.iter().map(|name| name.to_string()).collect(),
    ))
}

/// Which kind of generator argument a load call carried.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GeneratorKind {
    Handle,
    Name,
    None,
}

impl GeneratorKind {
    fn of(arg: &GeneratorArg<'_>) -> Self {
        match arg {
            GeneratorArg::Handle(_) => GeneratorKind::Handle,
            GeneratorArg::Name(_) => GeneratorKind::Name,
            GeneratorArg::None => GeneratorKind::None,
        }
    }
}

/// One journaled host call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostCall {
    IsLoaded(String),
    Unload {
        variant: UnloadVariant,
        world: String,
        save: bool,
    },
    Load {
        variant: LoadVariant,
        kind: GeneratorKind,
        world: String,
    },
}

impl HostCall {
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HostCall::IsLoaded(_))
    }
}

/// Host double scripted with per-shape outcomes; unscripted shapes answer
/// `Unsupported`, like a build that never had them.
pub struct ScriptedHost {
    pub loaded: LoadedWorlds,
    unload_outcomes: Vec<(UnloadVariant, CallOutcome)>,
    load_outcomes: Vec<(LoadVariant, GeneratorKind, CallOutcome)>,
    loads_take_effect: bool,
    calls: RefCell<Vec<HostCall>>,
}

impl ScriptedHost {
    pub fn new(loaded: LoadedWorlds) -> Self {
        Self {
            loaded,
            unload_outcomes: Vec::new(),
            load_outcomes: Vec::new(),
            loads_take_effect: true,
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn unload_shape(mut self, variant: UnloadVariant, outcome: CallOutcome) -> Self {
        self.unload_outcomes.push((variant, outcome));
        self
    }

    pub fn load_shape(
        mut self,
        variant: LoadVariant,
        kind: GeneratorKind,
        outcome: CallOutcome,
    ) -> Self {
        self.load_outcomes.push((variant, kind, outcome));
        self
    }

    /// Model a host that claims load success without touching the registry.
    pub fn claims_without_effect(mut self) -> Self {
        self.loads_take_effect = false;
        self
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn mutating_calls(&self) -> Vec<HostCall> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.is_mutating())
            .cloned()
            .collect()
    }

    pub fn load_calls(&self) -> Vec<(LoadVariant, GeneratorKind)> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::Load { variant, kind, .. } => Some((*variant, *kind)),
                _ => None,
            })
            .collect()
    }
}

impl WorldHost for ScriptedHost {
    fn is_loaded(&self, world: &str) -> bool {
        self.calls
            .borrow_mut()
            .push(HostCall::IsLoaded(world.to_string()));
        self.loaded.borrow().contains(world)
    }

    fn unload(&mut self, variant: UnloadVariant, world: &str, save: bool) -> CallOutcome {
        self.calls.borrow_mut().push(HostCall::Unload {
            variant,
            world: world.to_string(),
            save,
        });
        let outcome = self
            .unload_outcomes
            .iter()
            .find(|(scripted, _)| *scripted == variant)
            .map(|(_, outcome)| *outcome)
            .unwrap_or(CallOutcome::Unsupported);
        if outcome == CallOutcome::Completed {
            self.loaded.borrow_mut().remove(world);
        }
        outcome
    }

    fn load(&mut self, variant: LoadVariant, request: &LoadRequest<'_>) -> CallOutcome {
        let kind = GeneratorKind::of(&request.generator);
        self.calls.borrow_mut().push(HostCall::Load {
            variant,
            kind,
            world: request.world.to_string(),
        });
        let outcome = self
            .load_outcomes
            .iter()
            .find(|(scripted, scripted_kind, _)| *scripted == variant && *scripted_kind == kind)
            .map(|(_, _, outcome)| *outcome)
            .unwrap_or(CallOutcome::Unsupported);
        if outcome == CallOutcome::Completed && self.loads_take_effect {
            self.loaded.borrow_mut().insert(request.world.to_string());
        }
        outcome
    }
}

/// Extension registry double.
pub struct ScriptedExtensions {
    extensions: Vec<(String, ExtensionStatus)>,
    factories: Vec<(GeneratorVariant, String)>,
}

impl ScriptedExtensions {
    pub fn none() -> Self {
        Self {
            extensions: Vec::new(),
            factories: Vec::new(),
        }
    }

    pub fn with_extension(mut self, name: &str, enabled: bool) -> Self {
        self.extensions
            .push((name.to_string(), ExtensionStatus { enabled }));
        self
    }

    /// Mint `token` when the factory is invoked via `variant`; other shapes
    /// stay unsupported.
    pub fn with_factory(mut self, variant: GeneratorVariant, token: &str) -> Self {
        self.factories.push((variant, token.to_string()));
        self
    }
}

impl ExtensionRegistry for ScriptedExtensions {
    fn status(&self, extension: &str) -> Option<ExtensionStatus> {
        self.extensions
            .iter()
            .find(|(name, _)| name == extension)
            .map(|(_, status)| *status)
    }

    fn default_generator(
        &self,
        variant: GeneratorVariant,
        _extension: &str,
        _world: &str,
        _generator_id: &str,
    ) -> GeneratorOutcome {
        self.factories
            .iter()
            .find(|(scripted, _)| *scripted == variant)
            .map(|(_, token)| GeneratorOutcome::Produced(GeneratorHandle::new(token.clone())))
            .unwrap_or(GeneratorOutcome::Unsupported)
    }
}

/// Console double; journals every dispatch, and can optionally honor
/// `import` commands by marking the named world loaded.
pub struct RecordingConsole {
    loaded: LoadedWorlds,
    import_takes_effect: bool,
    pub dispatched: Vec<String>,
}

impl RecordingConsole {
    pub fn new(loaded: LoadedWorlds) -> Self {
        Self {
            loaded,
            import_takes_effect: false,
            dispatched: Vec::new(),
        }
    }

    pub fn import_takes_effect(mut self) -> Self {
        self.import_takes_effect = true;
        self
    }
}

impl ConsoleSink for RecordingConsole {
    fn dispatch(&mut self, command: &str) {
        self.dispatched.push(command.to_string());
        if self.import_takes_effect {
            let mut tokens = command.split_whitespace();
            let _prefix = tokens.next();
            if tokens.next() == Some("import") {
                if let Some(world) = tokens.next() {
                    self.loaded.borrow_mut().insert(world.to_string());
                }
            }
        }
    }
}

pub fn spec(name: &str, generator: Option<&str>) -> WorldSpec {
    WorldSpec {
        name: name.to_string(),
        environment: Environment::Normal,
        generator: generator.map(|reference| reference.to_string()),
    }
}

pub fn catalog_of(worlds: Vec<WorldSpec>) -> Catalog {
    Catalog { worlds }
}

/// Tempdir-backed storage root with directories for the named worlds. Keep
/// the `TempDir` alive for the duration of the test.
pub fn store_with(worlds: &[&str]) -> (TempDir, WorldStore) {
    let dir = TempDir::new().expect("tempdir");
    for world in worlds {
        fs::create_dir_all(dir.path().join(world)).expect("world dir");
    }
    let store = WorldStore::new(dir.path());
    (dir, store)
}

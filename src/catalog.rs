//! Deserializable representation of a world catalog.
//!
//! The catalog is the engine's only input: an ordered list of worlds with the
//! environment and (optionally) the generator binding each one must carry.
//! Ordering is significant: worlds are reconciled, logged, and counted in
//! declared order. Loading from disk validates against
//! `schema/world_catalog.schema.json` and then applies the structural rules
//! the schema cannot express (duplicate names).

use anyhow::{Context, Result, anyhow, bail};
use jsonschema::JSONSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Ordered catalog of worlds to reconcile.
#[derive(Clone, Debug, Deserialize)]
pub struct Catalog {
    pub worlds: Vec<WorldSpec>,
}

/// Desired state for one named world.
///
/// `name` must match the on-disk storage directory exactly (case-sensitive).
/// `generator` is an extension reference such as `"SkyForge"` or
/// `"SkyForge:islands"`; absent means any generator the host picks is
/// acceptable and enforcement is skipped.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldSpec {
    pub name: String,
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub generator: Option<String>,
}

impl WorldSpec {
    /// Whether the catalog asks for a specific generator binding.
    pub fn wants_generator(&self) -> bool {
        self.generator.as_deref().is_some_and(|g| !g.is_empty())
    }
}

/// Environment kind a world is loaded under.
///
/// Known variants keep serialization stable; `Other` preserves forward
/// compatibility with host forks that add environments.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub enum Environment {
    #[default]
    Normal,
    Nether,
    Other(String),
}

impl Environment {
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Normal => "normal",
            Environment::Nether => "nether",
            Environment::Other(value) => value.as_str(),
        }
    }

    fn from_str(value: &str) -> Self {
        match value {
            "normal" => Environment::Normal,
            "nether" => Environment::Nether,
            other => Environment::Other(other.to_string()),
        }
    }

    /// Token used in orchestrator console commands. Hosts only distinguish
    /// nether there; everything else is addressed as `normal`.
    pub fn console_token(&self) -> &'static str {
        match self {
            Environment::Nether => "nether",
            _ => "normal",
        }
    }
}

impl Serialize for Environment {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Environment {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_str(&value))
    }
}

impl Catalog {
    /// Apply the structural rules the JSON Schema cannot express.
    ///
    /// Rejects empty catalogs, empty or duplicate world names, and empty
    /// generator references so a bad catalog surfaces at load time instead of
    /// producing a confusing half-pass.
    pub fn validate(&self) -> Result<()> {
        if self.worlds.is_empty() {
            bail!("catalog contains no worlds");
        }
        let mut seen: BTreeSet<&str> = BTreeSet::new();
        for spec in &self.worlds {
            if spec.name.trim().is_empty() {
                bail!("encountered world with no name");
            }
            if !seen.insert(spec.name.as_str()) {
                bail!("duplicate world name {}", spec.name);
            }
            if let Some(generator) = &spec.generator {
                if generator.trim().is_empty() {
                    bail!("world {} declares an empty generator reference", spec.name);
                }
            }
        }
        Ok(())
    }
}

/// Read, schema-validate, and structurally validate a catalog from disk.
pub fn load_catalog_from_path(path: &Path) -> Result<Catalog> {
    let data =
        fs::read_to_string(path).with_context(|| format!("reading catalog {}", path.display()))?;
    let value: Value = serde_json::from_str(&data)
        .with_context(|| format!("parsing catalog {}", path.display()))?;
    validate_against_schema(&value)
        .with_context(|| format!("validating catalog {}", path.display()))?;
    let catalog: Catalog = serde_json::from_value(value)?;
    catalog.validate()?;
    Ok(catalog)
}

fn validate_against_schema(catalog_value: &Value) -> Result<()> {
    let schema_path = canonical_catalog_schema_path();
    let schema_file = File::open(&schema_path)
        .with_context(|| format!("opening catalog schema {}", schema_path.display()))?;
    let schema_value: Value = serde_json::from_reader(BufReader::new(schema_file))
        .with_context(|| format!("parsing catalog schema {}", schema_path.display()))?;

    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|err| anyhow!("catalog schema does not compile: {err}"))?;
    if let Err(errors) = compiled.validate(catalog_value) {
        let details = errors
            .map(|err| err.to_string())
            .collect::<Vec<_>>()
            .join("\n");
        bail!("world catalog failed schema validation:\n{details}");
    }
    Ok(())
}

fn canonical_catalog_schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schema/world_catalog.schema.json")
}

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static MANIFEST: Lazy<Manifest> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Manifest {
    pages: HashMap<String, String>,
    scenarios: HashMap<String, String>,
}

/// The two fixture families listed in the manifest.
#[derive(Clone, Copy, Debug)]
enum Kind {
    Page,
    Scenario,
}

impl Kind {
    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Kind::Page => &MANIFEST.pages,
            Kind::Scenario => &MANIFEST.scenarios,
        }
    }

    fn names(self) -> Vec<String> {
        let mut names: Vec<String> = self.entries().keys().cloned().collect();
        names.sort();
        names
    }

    /// Absolute path of a named fixture under the workspace `fixtures/` dir.
    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("no {self:?} fixture named '{name}' in manifest.json"))?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn text(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path)
            .with_context(|| format!("reading {self:?} fixture {}", path.display()))
    }

    fn parse<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.text(name)?;
        serde_json::from_str(&text).with_context(|| format!("parsing {self:?} fixture '{name}'"))
    }
}

/// Page configurations (`Config` JSON documents).
pub mod pages {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Page.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Page.text(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Kind::Page.parse(name)
    }
}

/// Scroll / load scenarios replayed by integration tests.
pub mod scenarios {
    use super::*;

    pub fn keys() -> Vec<String> {
        Kind::Scenario.names()
    }

    pub fn json(name: &str) -> Result<String> {
        Kind::Scenario.text(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Kind::Scenario.parse(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Kind::Scenario.path(name)
    }
}

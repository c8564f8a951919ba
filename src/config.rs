//! Tunable constants, read from TOML.
//!
//! Every field is optional; missing ones take the built-in defaults.
//!
//! ```toml
//! algorithm = "surface-area"
//!
//! [generator]
//! analogous_jitter = 25
//!
//! [scoring]
//! cluster_angle = 25
//!
//! [[catalog]]
//! name = "Piano"
//! weight = 5
//! lightness = [5, 30]
//! role = "anchor"
//! ```

use std::{fs, path::Path};
use serde::{Deserialize, Serialize};
use crate::{
    assign::Filler,
    catalog::{self, Catalog, CatalogEntry, Kind},
    cohesion::{Algorithm, Scorer, ScoringConfig},
    error::Result,
    harmony::{Generator, GeneratorConfig},
};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub generator: GeneratorConfig,
    pub scoring: ScoringConfig,
    /// Weighting used when none is given explicitly.
    pub algorithm: Algorithm,
    /// Additions to (or replacements in) the default catalogs.
    pub catalog: Vec<CatalogEntry>,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Config> {
        Ok(toml::from_str(s)?)
    }

    /// Read the configuration file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::debug!("configuration loaded from {}", path.display());
        Ok(config)
    }

    /// The default catalog of `kind` with the configured entries applied.
    pub fn catalog(&self, kind: Kind) -> Catalog {
        let mut c = match kind {
            Kind::Room => catalog::ROOM.clone(),
            Kind::Wardrobe => catalog::WARDROBE.clone(),
        };
        c.extend(&self.catalog);
        c
    }

    pub fn generator(&self) -> Generator { Generator::new(self.generator) }

    pub fn scorer(&self) -> Scorer<'static> {
        Scorer::new(self.algorithm).config(self.scoring)
    }

    pub fn filler(&self) -> Filler {
        Filler::new(self.algorithm).scoring(self.scoring)
    }
}

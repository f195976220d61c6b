//! Named preset shape geometries.
//!
//! The catalogue is an owned value; callers decide where it lives. Resources
//! are read through a [`PresetGeometryLoader`].

use super::custom::CustomGeometry;
use crate::common::error::Result;
use std::collections::BTreeMap;

/// Source of preset geometry definitions.
pub trait PresetGeometryLoader {
    fn load(&self) -> Result<BTreeMap<String, CustomGeometry>>;
}

/// Preset name to geometry map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresetGeometries {
    shapes: BTreeMap<String, CustomGeometry>,
}

impl PresetGeometries {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(loader: &impl PresetGeometryLoader) -> Result<Self> {
        let shapes = loader.load()?;
        tracing::debug!("Loaded {} preset geometries", shapes.len());
        Ok(Self { shapes })
    }

    pub fn get(&self, name: &str) -> Option<&CustomGeometry> {
        self.shapes.get(name)
    }

    /// Add or replace a geometry, returning the previous one.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        geometry: CustomGeometry,
    ) -> Option<CustomGeometry> {
        self.shapes.insert(name.into(), geometry)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CustomGeometry)> {
        self.shapes.iter().map(|(name, geometry)| (name.as_str(), geometry))
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

/// Loads presets from a YAML document mapping names to geometries.
#[cfg(feature = "presets")]
#[derive(Debug, Clone)]
pub struct YamlPresetLoader {
    source: String,
}

#[cfg(feature = "presets")]
impl YamlPresetLoader {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    /// Read the YAML document from a file.
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(std::fs::read_to_string(path)?))
    }
}

#[cfg(feature = "presets")]
impl PresetGeometryLoader for YamlPresetLoader {
    fn load(&self) -> Result<BTreeMap<String, CustomGeometry>> {
        serde_saphyr::from_str(&self.source)
            .map_err(|e| crate::common::error::Error::Preset(e.to_string()))
    }
}

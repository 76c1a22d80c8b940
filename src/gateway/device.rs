use anyhow::{Result, anyhow};
use indexmap::IndexMap;
use serde::Serialize;

use crate::gateway::{Property, PropertyDescription};

pub const THING_CONTEXT: &str = "https://iot.mozilla.org/schemas/";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Device {
    pub id: String,

    pub title: String,

    pub description: String,

    #[serde(rename = "@context")]
    pub context: &'static str,

    #[serde(rename = "@type")]
    pub types: Vec<&'static str>,

    pub properties: IndexMap<&'static str, Property>,
}

impl Device {
    pub fn new(id: String, title: String, description: String, types: Vec<&'static str>) -> Self {
        Self {
            id,
            title,
            description,
            context: THING_CONTEXT,
            types,
            properties: IndexMap::new(),
        }
    }

    pub fn add_property(&mut self, description: PropertyDescription) {
        let property = Property::new(description);
        self.properties.insert(property.name, property);
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    /// Updates the cached value of `name` and returns the updated property.
    pub fn set_property_value(&mut self, name: &str, value: f64) -> Result<&Property> {
        let property = self
            .properties
            .get_mut(name)
            .ok_or_else(|| anyhow!("unknown property on device {}: {name}", self.id))?;
        property.set_cached_value(value);

        Ok(property)
    }
}

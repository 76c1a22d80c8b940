use serde::Serialize;

/// Static description of a property, in the shape the gateway renders it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyDescription {
    #[serde(rename = "@type", skip_serializing_if = "Option::is_none")]
    pub at_type: Option<&'static str>,

    #[serde(rename = "type")]
    pub value_type: &'static str,

    pub minimum: f64,

    pub maximum: f64,

    pub multiple_of: f64,

    pub unit: &'static str,

    pub title: &'static str,

    pub description: &'static str,

    pub read_only: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub name: &'static str,

    #[serde(flatten)]
    pub description: PropertyDescription,

    /// Last value pushed to the gateway, `None` until the first reading.
    pub value: Option<f64>,
}

impl Property {
    pub fn new(description: PropertyDescription) -> Self {
        Self {
            name: description.title,
            description,
            value: None,
        }
    }

    pub fn set_cached_value(&mut self, value: f64) {
        self.value = Some(value);
    }
}

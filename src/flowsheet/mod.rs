//! In-memory model of the simulated flowsheet: objects, typed properties and
//! the connections derived from them. The store is immutable after
//! construction; tools read it, nothing writes it.

mod seed;
mod topology;

pub use seed::ethanol_recovery_plant;
pub use topology::{Connection, connections};

use std::fmt;

/// Unit-operation and stream categories, rendered with the labels the
/// command surface exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Stream,
    Pump,
    Heater,
    HeatExchanger,
    Compressor,
    DistillationColumn,
    Cstr,
    FlowsheetSettings,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ObjectKind::Stream => "Stream",
            ObjectKind::Pump => "Pump",
            ObjectKind::Heater => "Heater",
            ObjectKind::HeatExchanger => "HeatExchanger",
            ObjectKind::Compressor => "Compressor",
            ObjectKind::DistillationColumn => "DistillationColumn",
            ObjectKind::Cstr => "CSTR",
            ObjectKind::FlowsheetSettings => "FlowsheetSettings",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Number(number) => write!(f, "{number}"),
            PropertyValue::Text(text) => f.write_str(text),
            PropertyValue::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A single measured or configured quantity. A property may have no value
/// at all (rendered `N/A`) and may carry a display unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    value: Option<PropertyValue>,
    unit: Option<String>,
}

impl Property {
    pub fn number(value: f64) -> Self {
        Self {
            value: Some(PropertyValue::Number(value)),
            unit: None,
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self {
            value: Some(PropertyValue::Text(value.into())),
            unit: None,
        }
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            value: Some(PropertyValue::List(
                values.into_iter().map(Into::into).collect(),
            )),
            unit: None,
        }
    }

    pub fn none() -> Self {
        Self {
            value: None,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn value(&self) -> Option<&PropertyValue> {
        self.value.as_ref()
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            Some(PropertyValue::Number(number)) => Some(number),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Some(PropertyValue::Text(text)) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.unit) {
            (None, _) => f.write_str("N/A"),
            (Some(value), Some(unit)) => write!(f, "{value} {unit}"),
            (Some(value), None) => write!(f, "{value}"),
        }
    }
}

/// A named object in the flowsheet. Property order is the order the fixture
/// declares, and the command surface preserves it.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationObject {
    name: String,
    kind: ObjectKind,
    properties: Vec<(String, Property)>,
}

impl SimulationObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind) -> Self {
        Self {
            name: name.into(),
            kind,
            properties: Vec::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, property: Property) -> Self {
        self.properties.push((key.into(), property));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ObjectKind {
        self.kind
    }

    pub fn properties(&self) -> &[(String, Property)] {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, property)| property)
    }

    pub fn number_property(&self, key: &str) -> Option<f64> {
        self.property(key).and_then(Property::as_number)
    }

    pub fn text_property(&self, key: &str) -> Option<&str> {
        self.property(key).and_then(Property::as_text)
    }
}

/// The full simulated plant. Objects keep insertion order, which every
/// listing and validation pass relies on.
#[derive(Debug, Clone, PartialEq)]
pub struct Flowsheet {
    objects: Vec<SimulationObject>,
}

impl Flowsheet {
    pub fn new(objects: Vec<SimulationObject>) -> Self {
        Self { objects }
    }

    pub fn objects(&self) -> &[SimulationObject] {
        &self.objects
    }

    pub fn get(&self, name: &str) -> Option<&SimulationObject> {
        self.objects.iter().find(|object| object.name == name)
    }

    /// Looks up `name` only among material streams.
    pub fn stream(&self, name: &str) -> Option<&SimulationObject> {
        self.objects
            .iter()
            .find(|object| object.name == name && object.kind == ObjectKind::Stream)
    }

    pub fn settings(&self) -> Option<&SimulationObject> {
        self.objects
            .iter()
            .find(|object| object.kind == ObjectKind::FlowsheetSettings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_without_value_renders_not_available() {
        assert_eq!(Property::none().to_string(), "N/A");
        assert_eq!(Property::none().with_unit("C").to_string(), "N/A");
    }

    #[test]
    fn property_with_unit_appends_it_after_the_value() {
        let flow = Property::number(100.0).with_unit("kmol/h");
        assert_eq!(flow.to_string(), "100 kmol/h");
    }

    #[test]
    fn whole_numbers_render_without_decimal_digits() {
        assert_eq!(Property::number(2.0).to_string(), "2");
        assert_eq!(Property::number(0.4).to_string(), "0.4");
        assert_eq!(Property::number(1.5).to_string(), "1.5");
    }

    #[test]
    fn list_property_renders_bracketed_and_comma_separated() {
        let inlets = Property::list(["heated_feed", "recycle"]);
        assert_eq!(inlets.to_string(), "[heated_feed, recycle]");
    }

    #[test]
    fn object_preserves_property_declaration_order() {
        let object = SimulationObject::new("s1", ObjectKind::Stream)
            .with("Temperature", Property::number(25.0).with_unit("C"))
            .with("Pressure", Property::number(1.2).with_unit("atm"));

        let keys: Vec<&str> = object
            .properties()
            .iter()
            .map(|(key, _)| key.as_str())
            .collect();
        assert_eq!(keys, ["Temperature", "Pressure"]);
    }

    #[test]
    fn stream_lookup_ignores_non_stream_objects() {
        let flowsheet = Flowsheet::new(vec![
            SimulationObject::new("feed_heater", ObjectKind::Heater),
            SimulationObject::new("raw_feed", ObjectKind::Stream),
        ]);

        assert!(flowsheet.stream("raw_feed").is_some());
        assert!(flowsheet.stream("feed_heater").is_none());
        assert!(flowsheet.get("feed_heater").is_some());
    }

    #[test]
    fn settings_returns_first_settings_object() {
        let flowsheet = ethanol_recovery_plant();
        let settings = flowsheet.settings().expect("settings object");
        assert_eq!(settings.name(), "flowsheet_settings");
        assert_eq!(settings.kind(), ObjectKind::FlowsheetSettings);
    }

    #[test]
    fn kind_labels_match_the_command_surface() {
        assert_eq!(ObjectKind::Cstr.to_string(), "CSTR");
        assert_eq!(
            ObjectKind::DistillationColumn.to_string(),
            "DistillationColumn"
        );
        assert_eq!(ObjectKind::HeatExchanger.to_string(), "HeatExchanger");
    }
}

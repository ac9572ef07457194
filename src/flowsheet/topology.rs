//! Derives the directed stream graph from object properties. There is no
//! separate connection table in the model; inlet/outlet-typed properties are
//! the single source of truth.

use super::{Flowsheet, ObjectKind, PropertyValue, SimulationObject};

const OUTLET_KEYS: [&str; 5] = [
    "Outlet",
    "Top Outlet",
    "Bottom Outlet",
    "Hot Side Outlet",
    "Cold Side Outlet",
];
const INLET_KEYS: [&str; 4] = ["Inlet", "Inlets", "Hot Side Inlet", "Cold Side Inlet"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connection {
    pub from: String,
    pub to: String,
}

/// Collects every edge in store order: for each object, outlet properties
/// first (object to named stream), then inlet properties (named stream to
/// object). Settings objects never contribute edges.
pub fn connections(flowsheet: &Flowsheet) -> Vec<Connection> {
    let mut edges = Vec::new();
    for object in flowsheet.objects() {
        if object.kind() == ObjectKind::FlowsheetSettings {
            continue;
        }
        for key in OUTLET_KEYS {
            for target in endpoint_names(object, key) {
                edges.push(Connection {
                    from: object.name().to_string(),
                    to: target,
                });
            }
        }
        for key in INLET_KEYS {
            for source in endpoint_names(object, key) {
                edges.push(Connection {
                    from: source,
                    to: object.name().to_string(),
                });
            }
        }
    }
    edges
}

fn endpoint_names(object: &SimulationObject, key: &str) -> Vec<String> {
    match object.property(key).and_then(|property| property.value()) {
        Some(PropertyValue::Text(name)) if !name.is_empty() => vec![name.clone()],
        Some(PropertyValue::List(names)) => names.clone(),
        _ => Vec::new(),
    }
}

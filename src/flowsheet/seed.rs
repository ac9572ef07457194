//! The built-in demonstration plant: an ethanol/water feed section, a
//! distillation column with feed/bottoms heat integration, and an
//! esterification reactor on the distillate line.

use super::{Flowsheet, ObjectKind, Property, SimulationObject};

/// Builds the fixed plant every session starts from. Callers own the result
/// and decide its lifetime; nothing here is global.
pub fn ethanol_recovery_plant() -> Flowsheet {
    Flowsheet::new(vec![
        // Feed section
        SimulationObject::new("raw_feed", ObjectKind::Stream)
            .with("Temperature", Property::number(25.0).with_unit("C"))
            .with("Pressure", Property::number(1.2).with_unit("atm"))
            .with("Molar Flow", Property::number(100.0).with_unit("kmol/h"))
            .with("Ethanol", Property::number(0.4))
            .with("Water", Property::number(0.6)),
        SimulationObject::new("feed_pump", ObjectKind::Pump)
            .with("Inlet", Property::text("raw_feed"))
            .with("Outlet", Property::text("pressurized_feed"))
            .with("Outlet Pressure", Property::number(3.0).with_unit("atm"))
            .with("Efficiency", Property::number(0.8)),
        SimulationObject::new("pressurized_feed", ObjectKind::Stream)
            .with("Temperature", Property::number(26.0).with_unit("C"))
            .with("Pressure", Property::number(3.0).with_unit("atm"))
            .with("Molar Flow", Property::number(100.0).with_unit("kmol/h")),
        SimulationObject::new("feed_preheater", ObjectKind::HeatExchanger)
            .with("Hot Side Inlet", Property::text("bottoms"))
            .with("Hot Side Outlet", Property::text("cooled_bottoms"))
            .with("Cold Side Inlet", Property::text("pressurized_feed"))
            .with("Cold Side Outlet", Property::text("preheated_feed"))
            .with("Duty", Property::number(800.0).with_unit("kW"))
            .with(
                "Overall Heat Transfer Coefficient",
                Property::number(1500.0).with_unit("W/m^2.K"),
            ),
        SimulationObject::new("preheated_feed", ObjectKind::Stream)
            .with("Temperature", Property::number(70.0).with_unit("C"))
            .with("Pressure", Property::number(2.8).with_unit("atm"))
            .with("Molar Flow", Property::number(100.0).with_unit("kmol/h")),
        SimulationObject::new("feed_heater", ObjectKind::Heater)
            .with("Inlet", Property::text("preheated_feed"))
            .with("Outlet", Property::text("heated_feed"))
            .with("Duty", Property::number(400.0).with_unit("kW"))
            .with("Outlet Temperature", Property::number(95.0).with_unit("C")),
        SimulationObject::new("heated_feed", ObjectKind::Stream)
            .with("Temperature", Property::number(95.0).with_unit("C"))
            .with("Pressure", Property::number(2.6).with_unit("atm"))
            .with("Molar Flow", Property::number(100.0).with_unit("kmol/h")),
        // Separation section
        SimulationObject::new("distillation_column", ObjectKind::DistillationColumn)
            .with("Inlets", Property::list(["heated_feed"]))
            .with("Top Outlet", Property::text("distillate"))
            .with("Bottom Outlet", Property::text("bottoms"))
            .with("Number of Stages", Property::number(10.0))
            .with("Feed Stage", Property::number(5.0))
            .with("Reflux Ratio", Property::number(1.5))
            .with("Boilup Ratio", Property::number(2.0)),
        SimulationObject::new("distillate", ObjectKind::Stream)
            .with("Temperature", Property::number(78.0).with_unit("C"))
            .with("Pressure", Property::number(1.0).with_unit("atm"))
            .with("Molar Flow", Property::number(38.0).with_unit("kmol/h"))
            .with("Ethanol", Property::number(0.95))
            .with("Water", Property::number(0.05)),
        SimulationObject::new("bottoms", ObjectKind::Stream)
            .with("Temperature", Property::number(102.0).with_unit("C"))
            .with("Pressure", Property::number(1.1).with_unit("atm"))
            .with("Molar Flow", Property::number(62.0).with_unit("kmol/h"))
            .with("Ethanol", Property::number(0.01))
            .with("Water", Property::number(0.99)),
        SimulationObject::new("cooled_bottoms", ObjectKind::Stream)
            .with("Temperature", Property::number(45.0).with_unit("C"))
            .with("Pressure", Property::number(1.0).with_unit("atm"))
            .with("Molar Flow", Property::number(62.0).with_unit("kmol/h")),
        // Reaction section
        SimulationObject::new("distillate_compressor", ObjectKind::Compressor)
            .with("Inlet", Property::text("distillate"))
            .with("Outlet", Property::text("compressed_distillate"))
            .with("Outlet Pressure", Property::number(5.0).with_unit("atm"))
            .with("Isentropic Efficiency", Property::number(0.75))
            .with("Power Consumed", Property::number(50.0).with_unit("kW")),
        SimulationObject::new("compressed_distillate", ObjectKind::Stream)
            .with("Temperature", Property::number(120.0).with_unit("C"))
            .with("Pressure", Property::number(5.0).with_unit("atm"))
            .with("Molar Flow", Property::number(38.0).with_unit("kmol/h")),
        SimulationObject::new("cstr_reactor", ObjectKind::Cstr)
            .with("Inlet", Property::text("compressed_distillate"))
            .with("Outlet", Property::text("reactor_product"))
            .with("Temperature", Property::number(80.0).with_unit("C"))
            .with("Reaction Set", Property::text("Esterification"))
            .with("Conversion", Property::number(0.85)),
        SimulationObject::new("reactor_product", ObjectKind::Stream)
            .with("Temperature", Property::number(80.0).with_unit("C"))
            .with("Pressure", Property::number(4.8).with_unit("atm"))
            .with("Molar Flow", Property::number(35.0).with_unit("kmol/h"))
            .with("Ethyl Acetate", Property::number(0.82))
            .with("Water", Property::number(0.18)),
        // Settings
        SimulationObject::new("flowsheet_settings", ObjectKind::FlowsheetSettings)
            .with("Thermodynamic Package", Property::none()),
    ])
}

//! The text command surface over the flowsheet store. Every call resolves to
//! a plain string; failures come back as `Error: `-prefixed messages rather
//! than typed errors, so callers can relay output without caring which side
//! of the boundary produced it.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::Duration;

use crate::flowsheet::{Flowsheet, SimulationObject};

use super::validation::{ValidationError, validate_calculation};

/// How long a synchronous `calculate` pretends to solve the flowsheet.
const CALCULATION_LATENCY: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, PartialEq)]
pub enum CommandError {
    MissingObjectArgument,
    MissingPropertyArguments,
    MissingPropertyName { object: String },
    ObjectNotFound { name: String },
    PropertyNotFound { object: String, property: String },
    UnknownCommand { action: String },
    UnknownMode { mode: String },
    Validation(ValidationError),
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingObjectArgument => {
                write!(f, "Missing argument. Usage: get_all_properties <object_name>")
            }
            Self::MissingPropertyArguments => {
                write!(
                    f,
                    "Missing arguments. Usage: get_property <object_name> <property_name>"
                )
            }
            Self::MissingPropertyName { object } => {
                write!(
                    f,
                    "Missing property name. Usage: get_property {object} <property_name>"
                )
            }
            Self::ObjectNotFound { name } => write!(f, "Object '{name}' not found."),
            Self::PropertyNotFound { object, property } => {
                write!(f, "Property '{property}' not found in object '{object}'.")
            }
            Self::UnknownCommand { action } => write!(
                f,
                "Unknown command '{action}'. Valid commands: \
                 list_objects, get_all_properties, get_property, calculate."
            ),
            Self::UnknownMode { mode } => write!(
                f,
                "Unknown calculation mode '{mode}'. Valid modes are 'sync' or 'async'."
            ),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CommandError {}

impl From<ValidationError> for CommandError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

pub struct CommandInterpreter {
    flowsheet: Arc<Flowsheet>,
    calculation_latency: Duration,
}

impl CommandInterpreter {
    pub fn new(flowsheet: Arc<Flowsheet>) -> Self {
        Self {
            flowsheet,
            calculation_latency: CALCULATION_LATENCY,
        }
    }

    /// Same interpreter with a custom solver latency. Tests use this to keep
    /// synchronous calculations instant.
    pub fn with_calculation_latency(flowsheet: Arc<Flowsheet>, latency: Duration) -> Self {
        Self {
            flowsheet,
            calculation_latency: latency,
        }
    }

    pub fn flowsheet(&self) -> &Arc<Flowsheet> {
        &self.flowsheet
    }

    pub async fn execute(&self, command: &str) -> String {
        match self.execute_inner(command).await {
            Ok(output) => output,
            Err(err) => format!("Error: {err}"),
        }
    }

    async fn execute_inner(&self, command: &str) -> Result<String, CommandError> {
        let tokens: Vec<&str> = command.split_whitespace().collect();
        let action = tokens.first().copied().unwrap_or("");

        match action {
            "list_objects" => Ok(self.list_objects()),
            "get_all_properties" => self.all_properties(tokens.get(1).copied()),
            "get_property" => self.single_property(&tokens),
            "calculate" => self.calculate(tokens.get(1).copied()).await,
            _ => Err(CommandError::UnknownCommand {
                action: action.to_string(),
            }),
        }
    }

    fn list_objects(&self) -> String {
        let mut lines = vec!["Available objects:".to_string()];
        for object in self.flowsheet.objects() {
            lines.push(format!("- {} ({})", object.name(), object.kind()));
        }
        lines.join("\n")
    }

    fn all_properties(&self, name: Option<&str>) -> Result<String, CommandError> {
        let name = name.ok_or(CommandError::MissingObjectArgument)?;
        let object = self.lookup(name)?;

        if object.properties().is_empty() {
            return Ok(format!("Object '{}' has no properties.", object.name()));
        }

        // Pad every key to the longest one so the values line up.
        let width = object
            .properties()
            .iter()
            .map(|(key, _)| key.len())
            .max()
            .unwrap_or(0);
        let mut lines = vec![format!("Properties for {}:", object.name())];
        for (key, property) in object.properties() {
            lines.push(format!("- {key:<width$} : {property}"));
        }
        Ok(lines.join("\n"))
    }

    fn single_property(&self, tokens: &[&str]) -> Result<String, CommandError> {
        let name = tokens
            .get(1)
            .copied()
            .ok_or(CommandError::MissingPropertyArguments)?;
        if tokens.len() < 3 {
            return Err(CommandError::MissingPropertyName {
                object: name.to_string(),
            });
        }

        let object = self.lookup(name)?;
        let property_name = tokens[2..].join(" ");
        let property =
            object
                .property(&property_name)
                .ok_or_else(|| CommandError::PropertyNotFound {
                    object: name.to_string(),
                    property: property_name.clone(),
                })?;
        Ok(format!("{name}.{property_name}: {property}"))
    }

    async fn calculate(&self, mode: Option<&str>) -> Result<String, CommandError> {
        validate_calculation(&self.flowsheet)?;

        match mode.unwrap_or("sync") {
            "sync" => {
                tokio::time::sleep(self.calculation_latency).await;
                Ok("Flowsheet calculation completed successfully (Synchronous).".to_string())
            }
            "async" => {
                Ok("Flowsheet calculation started in the background (Asynchronous).".to_string())
            }
            other => Err(CommandError::UnknownMode {
                mode: other.to_string(),
            }),
        }
    }

    fn lookup(&self, name: &str) -> Result<&SimulationObject, CommandError> {
        self.flowsheet
            .get(name)
            .ok_or_else(|| CommandError::ObjectNotFound {
                name: name.to_string(),
            })
    }
}

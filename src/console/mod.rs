mod interpreter;
mod validation;

pub use interpreter::{CommandError, CommandInterpreter};
pub use validation::{ValidationError, validate_calculation};

use crate::console::CommandInterpreter;
use crate::sandbox::ScriptSandbox;

use super::step::{AgentStep, ToolKind};

/// Runs the side-effecting half of a planned step.
///
/// Python steps go to the script sandbox and DWSIM steps to the command
/// interpreter; both need a `tool_input` to do anything. The remaining tools
/// carry their text in `tool_output` already, so there is nothing to execute
/// and `None` is returned.
pub async fn execute_step(
    step: &AgentStep,
    console: &CommandInterpreter,
    sandbox: &ScriptSandbox,
) -> Option<String> {
    let input = step.tool_input.as_deref()?;
    match step.tool {
        ToolKind::Python => Some(sandbox.run(input).await),
        ToolKind::Dwsim => Some(console.execute(input).await),
        ToolKind::DataAnalysis | ToolKind::FinalAnswer | ToolKind::Visualization => None,
    }
}

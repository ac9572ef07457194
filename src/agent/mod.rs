mod dispatch;
mod prompt;
mod step;

pub use dispatch::execute_step;
pub use prompt::PLANNER_SYSTEM_PROMPT;
pub use step::{AgentReply, AgentStep, ToolKind};

//! Wire types for planner replies. These are deserialized from model output,
//! so every optional field defaults and unknown fields are ignored.

use serde::Deserialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ToolKind {
    Python,
    #[serde(rename = "DWSIM")]
    Dwsim,
    DataAnalysis,
    FinalAnswer,
    Visualization,
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ToolKind::Python => "Python",
            ToolKind::Dwsim => "DWSIM",
            ToolKind::DataAnalysis => "DataAnalysis",
            ToolKind::FinalAnswer => "FinalAnswer",
            ToolKind::Visualization => "Visualization",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentStep {
    pub thought: String,
    pub tool: ToolKind,
    #[serde(default)]
    pub tool_input: Option<String>,
    #[serde(default)]
    pub tool_output: Option<String>,
    #[serde(default)]
    pub is_final_answer: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AgentReply {
    #[serde(default)]
    pub plan: Vec<String>,
    #[serde(default)]
    pub steps: Vec<AgentStep>,
}

use std::error::Error;
use std::fmt::{Display, Formatter};

use crate::agent::AgentReply;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanRequest {
    pub user_message: String,
    pub system_instruction: Option<String>,
    pub image: Option<ImageAttachment>,
    pub thinking: bool,
}

/// Image payload forwarded verbatim to the model, base64-encoded by the
/// caller. Only `image/*` MIME types are accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub mime_type: String,
    pub data_base64: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlannerError {
    MissingApiKey,
    UnsupportedImageType { mime_type: String },
    HttpStatus { status: u16, body: String },
    Transport(String),
    Parse(String),
    EmptyResponse,
}

impl Display for PlannerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing GEMINI_API_KEY"),
            Self::UnsupportedImageType { mime_type } => {
                write!(f, "unsupported attachment type: {mime_type}")
            }
            Self::HttpStatus { status, body } => {
                write!(f, "planner request failed with status {status}: {body}")
            }
            Self::Transport(msg) => write!(f, "planner transport error: {msg}"),
            Self::Parse(msg) => write!(f, "planner parse error: {msg}"),
            Self::EmptyResponse => write!(f, "planner returned empty response text"),
        }
    }
}

impl Error for PlannerError {}

pub type PlannerResult<T> = std::result::Result<T, PlannerError>;

pub trait PlannerProvider {
    fn plan(
        &self,
        request: PlanRequest,
    ) -> impl std::future::Future<Output = PlannerResult<AgentReply>> + Send;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Command {
    Help,
    Quit,
    Dwsim { command: String },
    Python { code: String },
    Script { path: String },
    Flowsheet,
    Thinking(Option<bool>),
    Trace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParseError {
    message: String,
}

impl ParseError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub(crate) fn message(&self) -> &str {
        &self.message
    }
}

pub(crate) const HELP_TEXT: &str = "Available commands:\n  /help               Show this command list\n  /quit               Exit the agent\n  /dwsim <command>    Run one simulation console command directly\n  /py <code>          Run Python code in the script sandbox\n  /script <file.py>   Run a Python file in the script sandbox\n  /flowsheet          Show flowsheet objects and their connections\n  /thinking [on|off]  Show or switch the thinking model toggle\n  /trace              Show path to the current trace file";

pub(crate) fn parse_command(line: &str) -> Result<Command, ParseError> {
    if !line.starts_with('/') {
        return Err(ParseError::new("not a command"));
    }

    let trimmed = line.trim();
    if trimmed == "/" {
        return Err(ParseError::new("empty command. Try /help"));
    }

    let command_text = &trimmed[1..];
    let mut parts = command_text.splitn(2, char::is_whitespace);
    let name = parts.next().unwrap_or("").to_ascii_lowercase();
    if name.is_empty() {
        return Err(ParseError::new("empty command. Try /help"));
    }
    let rest = parts.next().map(str::trim).unwrap_or("");

    match name.as_str() {
        "help" => expect_no_args(rest, Command::Help, "usage: /help"),
        "quit" => expect_no_args(rest, Command::Quit, "usage: /quit"),
        "dwsim" => parse_required_text_arg(rest, "usage: /dwsim <command>")
            .map(|command| Command::Dwsim { command }),
        "py" => {
            parse_required_text_arg(rest, "usage: /py <code>").map(|code| Command::Python { code })
        }
        "script" => parse_script(rest),
        "flowsheet" => expect_no_args(rest, Command::Flowsheet, "usage: /flowsheet"),
        "thinking" => parse_thinking(rest),
        "trace" => expect_no_args(rest, Command::Trace, "usage: /trace"),
        _ => Err(ParseError::new(format!(
            "unknown command '/{name}'. Try /help"
        ))),
    }
}

pub(crate) fn is_command_line(line: &str) -> bool {
    line.starts_with('/')
}

fn expect_no_args(rest: &str, command: Command, usage: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        Ok(command)
    } else {
        Err(ParseError::new(usage))
    }
}

fn parse_script(rest: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::new(
            "missing file argument. usage: /script <file.py>",
        ));
    }

    let path = rest.to_string();
    if !path.ends_with(".py") {
        return Err(ParseError::new("usage: /script <file.py>"));
    }
    Ok(Command::Script { path })
}

fn parse_thinking(rest: &str) -> Result<Command, ParseError> {
    if rest.is_empty() {
        return Ok(Command::Thinking(None));
    }

    match rest {
        "on" => Ok(Command::Thinking(Some(true))),
        "off" => Ok(Command::Thinking(Some(false))),
        _ => Err(ParseError::new("usage: /thinking [on|off]")),
    }
}

fn parse_required_text_arg(rest: &str, usage: &str) -> Result<String, ParseError> {
    if rest.is_empty() {
        return Err(ParseError::new(usage));
    }
    Ok(rest.to_string())
}

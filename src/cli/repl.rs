use anyhow::Result;
use crossterm::style::Stylize;
use std::fs;
use std::io::{self, BufRead, Write};

use crate::agent::{self, AgentReply, PLANNER_SYSTEM_PROMPT, ToolKind};
use crate::cli::commands::{self, Command};
use crate::cli::render;
use crate::console::CommandInterpreter;
use crate::llm::gemini::GeminiPlanner;
use crate::llm::provider::{PlanRequest, PlannerProvider};
use crate::sandbox::ScriptSandbox;
use crate::trace::SessionTrace;

const PROMPT: &str = "dwsim>";

pub struct AppState {
    pub console: CommandInterpreter,
    pub sandbox: ScriptSandbox,
    pub planner: Option<GeminiPlanner>,
    pub trace: SessionTrace,
    pub thinking: bool,
}

#[derive(Debug, PartialEq, Eq)]
enum CommandOutcome {
    Continue,
    Quit,
}

pub async fn run_repl(state: &mut AppState) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print_prompt()?;
        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }
        if line.is_empty() {
            continue;
        }

        if commands::is_command_line(line) {
            if handle_command(state, line).await == CommandOutcome::Quit {
                break;
            }
            continue;
        }

        handle_user_message(state, line).await;
    }

    Ok(())
}

fn print_prompt() -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{} ", PROMPT.dark_green())?;
    stdout.flush()?;
    Ok(())
}

async fn handle_command(state: &mut AppState, line: &str) -> CommandOutcome {
    let command = match commands::parse_command(line) {
        Ok(command) => command,
        Err(err) => {
            println!("{}", err.message());
            return CommandOutcome::Continue;
        }
    };

    match command {
        Command::Help => println!("{}", commands::HELP_TEXT),
        Command::Quit => return CommandOutcome::Quit,
        Command::Dwsim { command } => {
            let output = run_traced_console(state, &command).await;
            render::print_tool_output(&output);
        }
        Command::Python { code } => {
            let output = run_traced_script(state, &code).await;
            render::print_tool_output(&output);
        }
        Command::Script { path } => match fs::read_to_string(&path) {
            Ok(code) => {
                let output = run_traced_script(state, &code).await;
                render::print_tool_output(&output);
            }
            Err(err) => println!("Failed to read {path}: {err}"),
        },
        Command::Flowsheet => render::print_flowsheet(state.console.flowsheet()),
        Command::Thinking(None) => {
            println!("Thinking mode is {}", on_off(state.thinking));
        }
        Command::Thinking(Some(enabled)) => {
            state.thinking = enabled;
            println!("Thinking mode {}", on_off(enabled));
        }
        Command::Trace => println!("{}", state.trace.file_path().display()),
    }

    CommandOutcome::Continue
}

async fn run_traced_console(state: &AppState, command: &str) -> String {
    state.trace.log_output("tool.in", command);
    let output = state.console.execute(command).await;
    state.trace.log_output("tool.out", &output);
    output
}

async fn run_traced_script(state: &AppState, code: &str) -> String {
    state.trace.log_output("tool.in", code);
    let output = state.sandbox.run(code).await;
    state.trace.log_output("tool.out", &output);
    output
}

async fn handle_user_message(state: &mut AppState, message: &str) {
    state.trace.log_user_input(message);

    let Some(planner) = &state.planner else {
        println!(
            "Planner unavailable: missing GEMINI_API_KEY. Configure it in your shell or .env file (example: GEMINI_API_KEY=your_key)."
        );
        return;
    };

    let request = PlanRequest {
        user_message: message.to_string(),
        system_instruction: Some(PLANNER_SYSTEM_PROMPT.to_string()),
        image: None,
        thinking: state.thinking,
    };

    match planner.plan(request).await {
        Ok(reply) => run_reply(state, &reply).await,
        Err(err) => {
            state.trace.log_output("system.err", &err.to_string());
            println!("Planner request failed: {err}");
        }
    }
}

async fn run_reply(state: &AppState, reply: &AgentReply) {
    render::print_plan(&reply.plan);
    for entry in &reply.plan {
        state.trace.log_output("agent.plan", entry);
    }

    for step in &reply.steps {
        state
            .trace
            .log_output("agent.step", &format!("[{}] {}", step.tool, step.thought));
        if let Some(input) = step.tool_input.as_deref()
            && matches!(step.tool, ToolKind::Python | ToolKind::Dwsim)
        {
            state.trace.log_output("tool.in", input);
        }

        let executed = agent::execute_step(step, &state.console, &state.sandbox).await;
        if let Some(output) = executed.as_deref() {
            state.trace.log_output("tool.out", output);
        }

        render::print_step(step, executed.as_deref(), state.console.flowsheet());
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

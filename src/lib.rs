pub mod agent;
pub mod cli;
pub mod config;
pub mod console;
pub mod flowsheet;
pub mod llm;
pub mod sandbox;
pub mod trace;

use anyhow::{Result, anyhow, bail};
use cli::{AppState, CliArgs, run_repl};
use config::AppConfig;
use console::CommandInterpreter;
use flowsheet::ethanol_recovery_plant;
use llm::gemini::GeminiPlanner;
use sandbox::ScriptSandbox;
use std::fs;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use trace::SessionTrace;

pub async fn run(args: CliArgs) -> Result<()> {
    let config = AppConfig::load_with_path(args.config.clone())?;

    let flowsheet = Arc::new(ethanol_recovery_plant());
    let console = CommandInterpreter::new(Arc::clone(&flowsheet));
    let sandbox = ScriptSandbox::new(Arc::clone(&flowsheet));

    if let Some(command) = args.command.as_deref() {
        println!("{}", console.execute(command).await);
        return Ok(());
    }

    if let Some(path) = args.script.as_deref() {
        let code = fs::read_to_string(path)
            .map_err(|err| anyhow!("Failed to read script {}: {err}", path.display()))?;
        println!("{}", sandbox.run(&code).await);
        return Ok(());
    }

    if args.smoke_sandbox {
        let output = sandbox.run("print(len(simulation_objects))").await;
        if output.starts_with("Error: ") {
            bail!("smoke-sandbox failed: {output}");
        }
        println!("smoke-sandbox: ok");
        return Ok(());
    }

    let session_id = generate_session_id();
    let trace = SessionTrace::create(&session_id)?;
    let planner = GeminiPlanner::new(
        reqwest::Client::new(),
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
        config.gemini_thinking_model.clone(),
        config.gemini_base_url.clone(),
    )
    .ok();

    print_banner(planner.is_some());

    let mut app_state = AppState {
        console,
        sandbox,
        planner,
        trace,
        thinking: false,
    };

    run_repl(&mut app_state).await
}

fn print_banner(planner_available: bool) {
    println!(
        "DWSIM agent console. Type /help for commands; anything else is sent to the planner."
    );
    if !planner_available {
        println!(
            "Planner unavailable: missing GEMINI_API_KEY (console and sandbox commands still work)."
        );
    }
}

fn generate_session_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis());
    format!("{millis:x}-{:x}", std::process::id())
}

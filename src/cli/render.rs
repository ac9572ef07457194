use crossterm::style::Stylize;
use regex::Regex;
use std::sync::OnceLock;

use crate::agent::{AgentStep, ToolKind};
use crate::flowsheet::{Flowsheet, connections};

const CHART_WIDTH: usize = 40;

/// Prints one tool result. Failures follow the `"Error: ..."` output
/// contract, so the prefix alone decides the styling. Successful inspection
/// output that contains more than one molar-fraction line additionally gets
/// a composition bar chart.
pub(crate) fn print_tool_output(output: &str) {
    if output.starts_with("Error: ") {
        println!("{}", output.dark_red());
        return;
    }

    println!("{output}");
    let fractions = composition_fractions(output);
    if fractions.len() > 1 {
        print_composition_chart(&fractions);
    }
}

pub(crate) fn print_plan(plan: &[String]) {
    if plan.is_empty() {
        return;
    }

    println!("{}", "Plan".bold());
    for (index, entry) in plan.iter().enumerate() {
        println!("  {}. {entry}", index + 1);
    }
}

/// Prints one executed step. `executed_output` is the live tool result when
/// the step ran against the console or the sandbox; narrative tools fall back
/// to the planner-provided `tool_output`.
pub(crate) fn print_step(step: &AgentStep, executed_output: Option<&str>, flowsheet: &Flowsheet) {
    println!();
    println!("{} {}", "thought:".dark_grey(), step.thought);

    match step.tool {
        ToolKind::Python | ToolKind::Dwsim => {
            if let Some(input) = step.tool_input.as_deref() {
                println!("{}", format!("[{}] {input}", step.tool).dark_cyan());
            }
            if let Some(output) = executed_output.or(step.tool_output.as_deref()) {
                print_tool_output(output);
            }
        }
        ToolKind::Visualization => print_topology(flowsheet),
        ToolKind::DataAnalysis => {
            if let Some(text) = step.tool_output.as_deref() {
                println!("{text}");
            }
        }
        ToolKind::FinalAnswer => {
            if let Some(text) = step.tool_output.as_deref() {
                println!("{}", text.bold());
            }
        }
    }
}

pub(crate) fn print_flowsheet(flowsheet: &Flowsheet) {
    println!("{}", "Flowsheet objects".bold());
    for object in flowsheet.objects() {
        let kind = format!("[{}]", object.kind());
        println!("  {:<22} {}", object.name(), kind.dark_grey());
    }
    println!();
    print_topology(flowsheet);
}

pub(crate) fn print_topology(flowsheet: &Flowsheet) {
    println!("{}", "Flowsheet topology".bold());
    for connection in connections(flowsheet) {
        println!("  {} -> {}", connection.from, connection.to);
    }
}

/// Molar-fraction lines look like `- Ethanol : 0.4` in inspection output.
/// Values need a decimal point and must lie in [0, 1]; anything with a unit
/// suffix does not match the line anchor.
fn composition_fractions(output: &str) -> Vec<(String, f64)> {
    static FRACTION_LINE: OnceLock<Regex> = OnceLock::new();
    let re = FRACTION_LINE.get_or_init(|| {
        Regex::new(r"-\s*([A-Za-z\s]+?)\s*:\s*(\d\.\d+)\s*$").expect("fraction regex")
    });

    let mut fractions = Vec::new();
    for line in output.lines() {
        let Some(captures) = re.captures(line) else {
            continue;
        };
        let Ok(value) = captures[2].parse::<f64>() else {
            continue;
        };
        if (0.0..=1.0).contains(&value) {
            fractions.push((captures[1].trim().to_string(), value));
        }
    }
    fractions
}

fn print_composition_chart(fractions: &[(String, f64)]) {
    let width = fractions
        .iter()
        .map(|(name, _)| name.len())
        .max()
        .unwrap_or(0);

    println!();
    println!("{}", "Composition".bold());
    for (name, value) in fractions {
        let filled = ((value * CHART_WIDTH as f64).round() as usize).min(CHART_WIDTH);
        let bar = "█".repeat(filled);
        let rest = "░".repeat(CHART_WIDTH - filled);
        println!(
            "  {name:<width$} {}{} {:>5}%",
            bar.dark_cyan(),
            rest.dark_grey(),
            format_percent(*value),
        );
    }
}

fn format_percent(value: f64) -> String {
    format!("{:.1}", value * 100.0)
}

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

use crate::assemble::{EXPORT_ERROR_PREFIX, NO_OBJECTS_MARKER};
use crate::exec::RunOutcome;
use crate::provider::ProbeStatus;

/// Status banner shown at startup. Neither check gates a run; a missing
/// engine or an offline model only fails later, visibly.
pub fn print_status(engine: Option<&Path>, configured: &str, probe: &ProbeStatus, model: &str) {
    println!("\n=== SYSTEM STATUS ===");
    match engine {
        Some(p) => println!(
            "{}  FreeCAD engine ready: {}",
            "[ENGINE]".green().bold(),
            p.display()
        ),
        None => println!(
            "{}  FreeCAD engine not found: {}",
            "[ENGINE]".red().bold(),
            configured
        ),
    }
    match probe {
        ProbeStatus::Online => println!("{}  {} online", "[MODEL] ".green().bold(), model.bold()),
        ProbeStatus::TimedOut => println!(
            "{}  readiness probe timed out (is Ollama running?)",
            "[MODEL] ".yellow().bold()
        ),
        ProbeStatus::Error(e) => println!("{}  service error: {}", "[MODEL] ".yellow().bold(), e),
    }
    println!();
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(120));
    pb
}

/// Prompt-loop input. `None` means quit (explicit 'q' or EOF).
pub fn read_task() -> Option<String> {
    print!("Describe what you want to build (or 'q' to quit): ");
    let _ = io::stdout().flush();
    let mut s = String::new();
    match io::stdin().read_line(&mut s) {
        Ok(0) | Err(_) => None,
        Ok(_) => {
            let task = s.trim().to_string();
            if task.eq_ignore_ascii_case("q") {
                None
            } else {
                Some(task)
            }
        }
    }
}

pub fn print_run_dashboard(outcome: &RunOutcome, step: Option<&Path>, stl: Option<&Path>) {
    let verdict = if outcome.succeeded() {
        "SUCCESS".green().bold()
    } else if outcome.timed_out {
        "TIMED OUT".red().bold()
    } else {
        "FAILED".red().bold()
    };
    println!(
        "\n{}",
        "┏━━━━━━━━━━━━━━━━━━━━━━━ Run Results ━━━━━━━━━━━━━━━━━━━━━┓".bold()
    );
    println!(
        "  {}: {}   {}: {}ms   {}: {}",
        "Status".bold(),
        verdict,
        "Time".bold(),
        outcome.duration_ms,
        "Exit".bold(),
        outcome.status
    );
    println!(
        "{}",
        "┗━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━┛".bold()
    );
    if let Some(p) = step {
        println!("  {} {}", "STEP:".green().bold(), p.display());
    }
    if let Some(p) = stl {
        println!("  {} {}", "STL :".green().bold(), p.display());
    }
}

/// Failure detail: classify what the epilogue managed to say, then show the
/// engine's stderr verbatim.
pub fn print_failure(outcome: &RunOutcome) {
    if outcome.stdout.contains(NO_OBJECTS_MARKER) {
        println!("{}", "Script ran but created no objects.".yellow());
    }
    if let Some(line) = outcome
        .stdout
        .lines()
        .find(|l| l.trim_start().starts_with(EXPORT_ERROR_PREFIX))
    {
        println!("{}", line.red());
    }
    if !outcome.stderr.trim().is_empty() {
        println!("{}", "Engine error log:".bold());
        println!("{}", indent(&outcome.stderr, 2));
    }
}

pub fn print_script(script: &str) {
    println!("\n{}", "Sanitized script:".bold());
    println!("{}", indent(script, 2));
}

fn indent(s: &str, n: usize) -> String {
    let pad = " ".repeat(n);
    s.lines()
        .map(|l| format!("{}{}", pad, l))
        .collect::<Vec<_>>()
        .join("\n")
}

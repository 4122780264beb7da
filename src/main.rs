use chrono::Utc;
use clap::Parser;
use std::path::Path;
use std::time::Duration;

mod assemble;
mod cli;
mod config;
mod errors;
mod exec;
mod log;
mod prompt;
mod provider;
mod sanitize;
mod ux;
mod workspace;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = cli::Args::parse();

    let mut cfg = config::Config::load(args.config.as_deref())?;
    cfg.apply_cli(&args);

    let prov = provider::make_provider(
        cfg.model.clone(),
        cfg.ollama_url.clone(),
        Duration::from_secs(cfg.request_timeout_secs),
        Duration::from_secs(cfg.probe_timeout_secs),
    );

    // Readiness checks feed the banner only; a failed probe never blocks a
    // generation attempt.
    let engine = exec::resolve_engine(&cfg.engine_python);
    let probe = prov.probe().await;
    ux::print_status(engine.as_deref(), &cfg.engine_python, &probe, &cfg.model);

    if let Some(task) = &args.task {
        return run_once(&cfg, prov.as_ref(), task, args.debug).await;
    }

    loop {
        let task = match ux::read_task() {
            None => break,
            Some(t) if t.is_empty() => continue,
            Some(t) => t,
        };
        // Failures are reported and the loop stays interactive.
        if let Err(e) = run_once(&cfg, prov.as_ref(), &task, args.debug).await {
            eprintln!("run failed: {e:#}");
        }
    }
    Ok(())
}

async fn run_once(
    cfg: &config::Config,
    prov: &dyn provider::Provider,
    task: &str,
    debug: bool,
) -> anyhow::Result<()> {
    let started = Utc::now();

    // ===== PHASE 1: GENERATE =====
    let full_prompt = prompt::build_prompt(task);
    let pb = ux::spinner("AI is engineering the geometry...");
    let raw = prov.complete(&full_prompt, debug).await;
    pb.finish_and_clear();
    let raw = raw?;

    // ===== PHASE 2: SANITIZE =====
    let (fragment, warnings) = sanitize::sanitize(&raw);
    if !warnings.is_empty() {
        println!("Sanitizer warnings:");
        for w in &warnings {
            println!(" - {}", w);
        }
    }

    // ===== PHASE 3: ASSEMBLE =====
    let ws = workspace::RunWorkspace::create(Path::new(&cfg.out_dir))?;
    let script = assemble::assemble(&fragment, &ws.step_path(), &ws.stl_path());
    let script_path = ws.write_script(&script)?;
    let saved = log::save_request_stages(&ws, &raw, &fragment, cfg.save_stages)?;
    if debug {
        println!("debug: run workspace at {}", ws.root().display());
        log::print_saved_paths(&saved);
        println!("debug: assembled script at {}", script_path.display());
    }

    // ===== PHASE 4: EXECUTE =====
    let engine = exec::resolve_engine(&cfg.engine_python).ok_or_else(|| {
        errors::CadError::Engine(format!("interpreter not found: {}", cfg.engine_python))
    })?;
    let pb = ux::spinner("FreeCAD is building the model...");
    let outcome = exec::run_engine_script(
        &engine,
        &script_path,
        Duration::from_secs(cfg.exec_timeout_secs),
    )
    .await;
    pb.finish_and_clear();
    let outcome = outcome?;

    log::save_run_output(&ws, &outcome)?;
    log::save_run_record(
        &ws,
        &log::RunRecord {
            id: ws.id(),
            timestamp: started,
            task,
            model: &cfg.model,
            success: outcome.succeeded(),
            timed_out: outcome.timed_out,
            duration_ms: outcome.duration_ms,
        },
    )?;

    // ===== PHASE 5: REPORT =====
    if outcome.succeeded() {
        let dir = ws.persist();
        ux::print_run_dashboard(
            &outcome,
            Some(&dir.join(workspace::STEP_FILE)),
            Some(&dir.join(workspace::STL_FILE)),
        );
        if cfg.show_script {
            ux::print_script(&fragment);
        }
    } else {
        let kept = if cfg.keep_workdir { Some(ws.persist()) } else { None };
        ux::print_run_dashboard(&outcome, None, None);
        ux::print_failure(&outcome);
        if let Some(dir) = kept {
            println!("run directory kept at {}", dir.display());
        }
    }
    Ok(())
}

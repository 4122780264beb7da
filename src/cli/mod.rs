use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "text2cad",
    version,
    about = "Generate FreeCAD models from natural-language prompts via a local LLM"
)]
pub struct Args {
    /// One-shot request; omit to enter the interactive prompt loop.
    #[arg(long)]
    pub task: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Path (or bare binary name) of the FreeCAD Python interpreter.
    #[arg(long)]
    pub engine_python: Option<String>,

    #[arg(long)]
    pub ollama_url: Option<String>,

    /// Root directory per-run workspaces are created under.
    #[arg(long)]
    pub out_dir: Option<String>,

    /// TOML config file; CLI flags override its values.
    #[arg(long)]
    pub config: Option<String>,

    /// Completion request timeout, seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Engine execution timeout, seconds.
    #[arg(long)]
    pub exec_timeout_secs: Option<u64>,

    /// Print the sanitized script after a successful run.
    #[arg(long, default_value_t = false)]
    pub show_script: bool,

    /// Save raw completion and sanitized fragment into the run directory.
    #[arg(long, default_value_t = false)]
    pub save_stages: bool,

    /// Keep the run directory even when the run fails.
    #[arg(long, default_value_t = false)]
    pub keep_workdir: bool,

    #[arg(long, default_value_t = false)]
    pub debug: bool,
}

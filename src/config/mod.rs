use anyhow::{Context, Result};
use fs_err as fs;
use serde::{Deserialize, Serialize};

/// Explicit pipeline configuration. Built from defaults, optionally a TOML
/// file, then CLI overrides; passed into the components that need it rather
/// than living in process-wide globals.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: String,
    /// FreeCAD-bundled Python interpreter: a path, or a bare binary name
    /// resolved on PATH.
    pub engine_python: String,
    pub model: String,
    pub ollama_url: String,
    /// Root directory per-run workspaces are created under.
    pub out_dir: String,
    pub probe_timeout_secs: u64,
    pub request_timeout_secs: u64,
    pub exec_timeout_secs: u64,
    pub show_script: bool,
    pub save_stages: bool,
    pub keep_workdir: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: "2026-08-01".into(),
            engine_python: "freecadcmd".into(),
            model: "codellama".into(),
            ollama_url: "http://localhost:11434".into(),
            out_dir: "runs".into(),
            probe_timeout_secs: 3,
            request_timeout_secs: 2400,
            exec_timeout_secs: 120,
            show_script: false,
            save_stages: false,
            keep_workdir: false,
        }
    }
}

impl Config {
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(p) => {
                let text = fs::read_to_string(p)
                    .with_context(|| format!("failed to read config file {p}"))?;
                toml::from_str(&text).with_context(|| format!("failed to parse config file {p}"))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn apply_cli(&mut self, args: &crate::cli::Args) {
        if let Some(v) = &args.model {
            self.model = v.clone();
        }
        if let Some(v) = &args.engine_python {
            self.engine_python = v.clone();
        }
        if let Some(v) = &args.ollama_url {
            self.ollama_url = v.clone();
        }
        if let Some(v) = &args.out_dir {
            self.out_dir = v.clone();
        }
        if let Some(v) = args.timeout_secs {
            self.request_timeout_secs = v;
        }
        if let Some(v) = args.exec_timeout_secs {
            self.exec_timeout_secs = v;
        }
        if args.show_script {
            self.show_script = true;
        }
        if args.save_stages {
            self.save_stages = true;
        }
        if args.keep_workdir {
            self.keep_workdir = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_file_keeps_defaults_for_the_rest() {
        let cfg: Config = toml::from_str(r#"model = "deepseek-coder""#).unwrap();
        assert_eq!(cfg.model, "deepseek-coder");
        assert_eq!(cfg.ollama_url, Config::default().ollama_url);
        assert_eq!(cfg.engine_python, Config::default().engine_python);
    }

    #[test]
    fn defaults_match_the_known_stack() {
        let cfg = Config::default();
        assert_eq!(cfg.model, "codellama");
        assert!(cfg.ollama_url.starts_with("http://localhost"));
        assert!(cfg.probe_timeout_secs < cfg.request_timeout_secs);
    }
}

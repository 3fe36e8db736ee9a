use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::history;
use crate::root::RootOptions;

/// Directory (relative to the project root) holding a project-local config.
pub const PROJECT_DIR: &str = ".calclog";
pub const CONFIG_FILE: &str = "config.toml";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub history_path: PathBuf,
    pub root: RootOptions,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            history_path: PathBuf::from(history::DEFAULT_PATH),
            root: RootOptions::default(),
        }
    }
}

/// Private: parsed representation of a calclog config file.
#[derive(serde::Deserialize, Default, Debug)]
struct ConfigFile {
    history: Option<HistorySection>,
    root: Option<RootSection>,
}

#[derive(serde::Deserialize, Debug)]
struct HistorySection {
    path: Option<PathBuf>,
}

#[derive(serde::Deserialize, Debug)]
struct RootSection {
    tolerance: Option<f64>,
    max_iterations: Option<u32>,
}

/// Parse a config file. `Ok(None)` if it does not exist.
fn read_config(path: &Path) -> anyhow::Result<Option<ConfigFile>> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("failed to read config file: {}", path.display())));
        }
    };
    let cfg: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("failed to parse config file: {}", path.display()))?;
    Ok(Some(cfg))
}

/// Like [`read_config`], but a broken file is reported and skipped.
fn read_config_or_warn(path: &Path) -> Option<ConfigFile> {
    match read_config(path) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!("ignoring config: {e:#}");
            None
        }
    }
}

/// Path of the user-level config file, e.g. `~/.config/calclog/config.toml`.
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("calclog").join(CONFIG_FILE))
}

impl Settings {
    /// Resolve settings for the current working directory.
    ///
    /// `history_override` (from `--history-file` / `CALCLOG_HISTORY_FILE`)
    /// beats any config file.
    pub fn load(history_override: Option<&Path>) -> Self {
        let cwd = std::env::current_dir().ok();
        let global = global_config_path();
        let mut settings = Self::load_from(cwd.as_deref(), global.as_deref());
        if let Some(path) = history_override {
            settings.history_path = path.to_path_buf();
        }
        settings
    }

    /// Resolve settings from explicit paths. Priority per key:
    /// `{project_root}/.calclog/config.toml` → `global_config` → default.
    ///
    /// A relative `[history] path` in a project config is resolved against
    /// the project root. A NaN, infinite or negative `[root] tolerance` falls
    /// back to the default.
    pub fn load_from(project_root: Option<&Path>, global_config: Option<&Path>) -> Self {
        let project = project_root.and_then(|root| {
            read_config_or_warn(&root.join(PROJECT_DIR).join(CONFIG_FILE)).map(|cfg| (root, cfg))
        });
        let global = global_config.and_then(read_config_or_warn);

        let project_history = project.as_ref().and_then(|(root, cfg)| {
            let path = cfg.history.as_ref()?.path.as_ref()?;
            Some(root.join(path))
        });
        let global_history = global
            .as_ref()
            .and_then(|cfg| cfg.history.as_ref()?.path.clone());

        let project_root_section = project.as_ref().and_then(|(_, cfg)| cfg.root.as_ref());
        let global_root_section = global.as_ref().and_then(|cfg| cfg.root.as_ref());

        let defaults = RootOptions::default();
        let tolerance = project_root_section
            .and_then(|r| r.tolerance)
            .or_else(|| global_root_section.and_then(|r| r.tolerance))
            .unwrap_or(defaults.tolerance);
        let tolerance = if tolerance.is_finite() && tolerance >= 0.0 {
            tolerance
        } else {
            tracing::warn!(
                "ignoring [root] tolerance = {tolerance}: must be a finite, non-negative number"
            );
            defaults.tolerance
        };
        let max_iterations = project_root_section
            .and_then(|r| r.max_iterations)
            .or_else(|| global_root_section.and_then(|r| r.max_iterations))
            .unwrap_or(defaults.max_iterations);

        Self {
            history_path: project_history
                .or(global_history)
                .unwrap_or_else(|| PathBuf::from(history::DEFAULT_PATH)),
            root: RootOptions {
                tolerance,
                max_iterations,
            },
        }
    }
}

// src/config.rs  —  Runtime configuration (CLI + TOML)
use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The example config is embedded directly in the binary at compile time.
/// Users can write it out with:  loc-engine --write-config
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../config.toml.example");

// ── CLI ───────────────────────────────────────────────────────────────────────
#[derive(Parser, Debug, Default)]
#[command(
    name        = "loc-engine",
    about       = "Localization catalog + dialogue text resolver",
    version,
)]
pub struct Cli {
    /// Config file path (default: ~/.config/loc-engine/config.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Switch to this language (and persist it) before running the command
    #[arg(long)]
    pub lang: Option<String>,

    /// Directory holding <Language>_localization.json files
    #[arg(long)]
    pub resources: Option<PathBuf>,

    /// Settings file holding the persisted language preference
    #[arg(long)]
    pub settings: Option<PathBuf>,

    /// Resolve these keys in the active language and print them
    #[arg(long, num_args = 1..)]
    pub resolve: Vec<String>,

    /// List every known language and mark the active one
    #[arg(long, action)]
    pub list_languages: bool,

    /// Dialogue-graph JSON file (array of nodes) to localize from
    #[arg(long, requires = "node")]
    pub dialogue: Option<PathBuf>,

    /// Id of the node in --dialogue to localize and print
    #[arg(long, requires = "dialogue")]
    pub node: Option<String>,

    /// Write the built-in default config.toml to the config path and exit.
    /// Use --config <PATH> to write to a custom location.
    #[arg(long, action)]
    pub write_config: bool,

    /// Print the built-in default config.toml to stdout and exit
    #[arg(long, action)]
    pub print_config: bool,
}

// ── TOML file structure ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FileConfig {
    pub general:   Option<GeneralCfg>,
    pub resources: Option<ResourcesCfg>,
    pub settings:  Option<SettingsCfg>,
    pub dialogue:  Option<DialogueCfg>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralCfg {
    pub default_language: Option<String>,
    pub languages:        Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourcesCfg {
    /// Unset → embedded resources
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsCfg {
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialogueCfg {
    /// Scene-local dialogue localization file
    pub scene:  Option<PathBuf>,
    /// Global dialogue localization file
    pub global: Option<PathBuf>,
}

// ── Resolved / merged config ──────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub default_language: String,
    pub languages:        Vec<String>,
    pub resources_dir:    Option<PathBuf>,
    pub settings_path:    PathBuf,
    pub scene_dialogue:   Option<PathBuf>,
    pub global_dialogue:  Option<PathBuf>,
    /// Language requested on the command line, applied after startup
    pub switch_to:        Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_language: "English".into(),
            languages:        vec!["English".into(), "Turkish".into()],
            resources_dir:    None,
            settings_path:    config_dir().join("settings.toml"),
            scene_dialogue:   None,
            global_dialogue:  None,
            switch_to:        None,
        }
    }
}

// ── Config loader ─────────────────────────────────────────────────────────────
impl AppConfig {
    /// Write the embedded default config to disk.
    /// Returns the path it was written to.
    pub fn write_default_config(cli: &Cli) -> Result<PathBuf> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Creating config directory {:?}", parent))?;
        }
        std::fs::write(&path, DEFAULT_CONFIG_TOML)
            .with_context(|| format!("Writing config to {:?}", path))?;
        Ok(path)
    }

    pub fn load(cli: &Cli) -> Result<Self> {
        let mut cfg = Self::default();

        // 1. Load TOML file
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Reading config {:?}", path))?;
            let fc: FileConfig = toml::from_str(&raw)
                .with_context(|| format!("Parsing config {:?}", path))?;
            cfg.apply_file(&fc);
        } else {
            log::info!("No config file at {}, using defaults", path.display());
        }

        // 2. Apply CLI overrides
        cfg.apply_cli(cli);
        Ok(cfg)
    }

    fn apply_file(&mut self, fc: &FileConfig) {
        if let Some(g) = &fc.general {
            if let Some(v) = &g.default_language { self.default_language = v.clone(); }
            if let Some(v) = &g.languages        { self.languages        = v.clone(); }
        }
        if let Some(r) = &fc.resources {
            if let Some(v) = &r.dir { self.resources_dir = Some(v.clone()); }
        }
        if let Some(s) = &fc.settings {
            if let Some(v) = &s.path { self.settings_path = v.clone(); }
        }
        if let Some(d) = &fc.dialogue {
            if let Some(v) = &d.scene  { self.scene_dialogue  = Some(v.clone()); }
            if let Some(v) = &d.global { self.global_dialogue = Some(v.clone()); }
        }
        // the default language is always a supported one
        if !self.languages.contains(&self.default_language) {
            self.languages.push(self.default_language.clone());
        }
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(v) = &cli.resources { self.resources_dir = Some(v.clone()); }
        if let Some(v) = &cli.settings  { self.settings_path = v.clone(); }
        if let Some(v) = &cli.lang      { self.switch_to     = Some(v.clone()); }
    }
}

fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

fn config_dir() -> PathBuf {
    dirs_next().join("loc-engine")
}

fn dirs_next() -> PathBuf {
    if let Ok(v) = std::env::var("XDG_CONFIG_HOME") { return PathBuf::from(v); }
    if let Ok(v) = std::env::var("APPDATA")          { return PathBuf::from(v); }
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_default();
    PathBuf::from(home).join(".config")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_example_config_parses() {
        let fc: FileConfig = toml::from_str(DEFAULT_CONFIG_TOML).unwrap();
        let mut cfg = AppConfig::default();
        cfg.apply_file(&fc);
        assert_eq!(cfg.default_language, "English");
        assert_eq!(cfg.languages, vec!["English", "Turkish"]);
    }

    #[test]
    fn file_then_cli_layering() {
        let fc: FileConfig = toml::from_str(r#"
            [general]
            default_language = "Turkish"
            languages = ["English"]

            [resources]
            dir = "/srv/loc"

            [dialogue]
            global = "global_dialogue.json"
        "#).unwrap();
        let mut cfg = AppConfig::default();
        cfg.apply_file(&fc);
        assert_eq!(cfg.default_language, "Turkish");
        assert_eq!(cfg.languages, vec!["English", "Turkish"]);
        assert_eq!(cfg.global_dialogue, Some(PathBuf::from("global_dialogue.json")));

        let cli = Cli {
            resources: Some("/tmp/res".into()),
            lang:      Some("German".into()),
            ..Default::default()
        };
        cfg.apply_cli(&cli);
        assert_eq!(cfg.resources_dir, Some(PathBuf::from("/tmp/res")));
        assert_eq!(cfg.switch_to.as_deref(), Some("German"));
    }

    #[test]
    fn load_reads_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[settings]\npath = \"prefs.toml\"\n").unwrap();
        let cli = Cli { config: Some(path), ..Default::default() };
        let cfg = AppConfig::load(&cli).unwrap();
        assert_eq!(cfg.settings_path, PathBuf::from("prefs.toml"));
    }

    #[test]
    fn load_rejects_broken_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[general\n").unwrap();
        let cli = Cli { config: Some(path), ..Default::default() };
        assert!(AppConfig::load(&cli).is_err());
    }

    #[test]
    fn cli_parses_resolve_keys() {
        let cli = Cli::parse_from(["loc-engine", "--lang", "Turkish", "--resolve", "menu.play", "menu.quit"]);
        assert_eq!(cli.lang.as_deref(), Some("Turkish"));
        assert_eq!(cli.resolve, vec!["menu.play", "menu.quit"]);
    }
}

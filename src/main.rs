// src/main.rs  —  loc-engine  entry point
use anyhow::{Context, Result};
use clap::Parser;
use loc_engine::config::{self, AppConfig, Cli};
use loc_engine::{
    DialogueNode, DirResourceProvider, EmbeddedResourceProvider, Localization, Namespace,
    ResourceProvider, Subscriber, TomlSettingsStore,
};
use std::path::Path;
use std::sync::Arc;

/// Logs every language change, standing in for a UI label.
struct ChangeLogger {
    loc: Arc<Localization>,
}

impl Subscriber for ChangeLogger {
    fn refresh(&self) {
        log::info!("language is now {}", self.loc.current_language());
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    // ── --print-config  ───────────────────────────────────────────────────────
    if cli.print_config {
        print!("{}", config::DEFAULT_CONFIG_TOML);
        return Ok(());
    }

    // ── --write-config  ───────────────────────────────────────────────────────
    if cli.write_config {
        let path = AppConfig::write_default_config(&cli)?;
        println!("Config written to: {}", path.display());
        println!("Edit it to set languages, resource directory, dialogue files.");
        return Ok(());
    }

    // ── Load config ───────────────────────────────────────────────────────────
    let cfg = AppConfig::load(&cli)?;

    // ── Catalogs ──────────────────────────────────────────────────────────────
    let provider: Box<dyn ResourceProvider> = match &cfg.resources_dir {
        Some(dir) => Box::new(DirResourceProvider::new(dir)),
        None      => Box::new(EmbeddedResourceProvider),
    };
    let settings = TomlSettingsStore::open(&cfg.settings_path);
    let loc = Arc::new(Localization::startup(
        &cfg.default_language,
        &cfg.languages,
        provider.as_ref(),
        Box::new(settings),
    ));

    for (ns, path) in [(Namespace::Scene, &cfg.scene_dialogue), (Namespace::Global, &cfg.global_dialogue)] {
        let Some(path) = path else { continue };
        match loc.load_dialogue_file(ns, path) {
            Ok(n)  => log::debug!("[dialogue] {n} records from {}", path.display()),
            Err(e) => log::warn!("[dialogue] {e:#}"),
        }
    }

    let logger = Arc::new(ChangeLogger { loc: Arc::clone(&loc) });
    loc.subscribe(&logger);

    // ── --lang  ───────────────────────────────────────────────────────────────
    if let Some(lang) = &cfg.switch_to {
        if !loc.switch_language(lang) {
            log::info!("already using {lang}");
        }
    }

    // ── --list-languages  ─────────────────────────────────────────────────────
    if cli.list_languages {
        let current = loc.current_language();
        for lang in loc.available_languages() {
            let mark = if lang == current { '*' } else { ' ' };
            println!("{mark} {lang}");
        }
    }

    // ── --resolve  ────────────────────────────────────────────────────────────
    for key in &cli.resolve {
        println!("{key} = {}", loc.resolve(key));
    }

    // ── --dialogue / --node  ──────────────────────────────────────────────────
    if let (Some(file), Some(id)) = (&cli.dialogue, &cli.node) {
        let nodes = read_nodes(file)?;
        let node = nodes.iter()
            .find(|n| n.id.as_deref() == Some(id.as_str()))
            .with_context(|| format!("No node {id:?} in {}", file.display()))?;
        print_node(&loc.localize(node));
    }

    if !cli.list_languages && cli.resolve.is_empty() && cli.dialogue.is_none() {
        println!("Active language: {}", loc.current_language());
        println!("Try --list-languages, --resolve <KEY>..., or --dialogue <FILE> --node <ID>");
    }
    Ok(())
}

fn read_nodes(path: &Path) -> Result<Vec<DialogueNode>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Reading dialogue graph {:?}", path))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Parsing dialogue graph {:?}", path))
}

fn print_node(node: &DialogueNode) {
    if !node.display_name.is_empty() {
        println!("[{}]", node.display_name);
    }
    println!("{}", node.body_text);
    for (i, choice) in node.choices.iter().enumerate() {
        match &choice.next {
            Some(next) => println!("  {}. {}  → {next}", i + 1, choice.text),
            None       => println!("  {}. {}", i + 1, choice.text),
        }
    }
}

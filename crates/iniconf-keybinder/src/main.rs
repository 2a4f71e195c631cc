//! iniconf keybinder entry point.
//!
//! Loads the registry config, the key-name directory and the keybind file,
//! then polls bound keys on a background thread until Ctrl-C.
//!
//! # Architecture
//!
//! ```text
//! main()
//!  └─ Settings (TOML file, CLI overrides)
//!  └─ Registry   -- declare schema, load, save
//!  └─ KeyData    -- UiAndKeyData, or built-in Windows names
//!  └─ KeybindTable
//!  └─ KeyPoller  (dedicated thread, stopped via shared flag)
//! ```

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

use anyhow::{anyhow, Context};
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use iniconf_core::{Color, ConfigError, KeyBind, KeyData, Registry, StdFileStore};
use iniconf_keybinder::application::keybinds::KeybindTable;
use iniconf_keybinder::application::poll::KeyPoller;
use iniconf_keybinder::infrastructure::key_state::system_key_state;
use iniconf_keybinder::infrastructure::settings::{load_settings, Settings};

/// Virtual key code of the middle mouse button.
const VK_MBUTTON: i32 = 0x04;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Keybind poller for iniconf configuration files.
#[derive(Debug, Parser)]
#[command(
    name = "iniconf-keybinder",
    about = "Drives iniconf configuration values from key presses",
    version
)]
struct Cli {
    /// Path of the TOML settings file.  A missing file means defaults.
    #[arg(long, default_value = "iniconf-keybinder.toml", env = "INICONF_SETTINGS")]
    settings: PathBuf,

    /// Directory holding the config, keybind and key-name files.
    #[arg(long, env = "INICONF_CONFIG_DIR")]
    config_dir: Option<PathBuf>,

    /// Name of the registry config file inside the config directory.
    #[arg(long, env = "INICONF_CONFIG_NAME")]
    config_name: Option<String>,

    /// Milliseconds between two poll ticks.
    #[arg(long, env = "INICONF_TICK_MS")]
    tick_ms: Option<u64>,

    /// Load and save the config once, then exit without polling.
    #[arg(long)]
    once: bool,
}

impl Cli {
    /// Applies the command-line overrides on top of the settings file.
    fn apply(&self, settings: &mut Settings) {
        if let Some(dir) = &self.config_dir {
            settings.config_dir.clone_from(dir);
        }
        if let Some(name) = &self.config_name {
            settings.config_name.clone_from(name);
        }
        if let Some(ms) = self.tick_ms {
            settings.tick_interval_ms = ms;
        }
    }
}

/// Declares the items this binary manages.
fn declare_schema(registry: &mut Registry) -> Result<(), ConfigError> {
    registry.declare("testInt", "Section1", 0_i32)?;
    registry.declare("testFloat", "Section1", 1.0_f32)?;
    registry.declare("testBool", "Section1", true)?;
    registry.declare("TestKey", "Section1", KeyBind::new(VK_MBUTTON))?;
    registry.declare("color1", "Section2", Color::new(255, 0, 0, 255))?;
    registry.declare("color2", "Section2", Color::new(255, 0, 0, 255))?;
    Ok(())
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut settings = load_settings(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;
    cli.apply(&mut settings);

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .init();

    info!("iniconf keybinder starting");

    // ── Registry ──────────────────────────────────────────────────────────────
    let mut registry = Registry::new();
    registry.set_config_directory(&settings.config_dir);
    declare_schema(&mut registry).context("declaring config schema")?;

    match registry.load(&settings.config_name) {
        Ok(report) if !report.is_clean() => {
            warn!("{} config entries rejected", report.rejected.len());
        }
        Ok(_) => {}
        Err(e) => warn!("config not loaded, using defaults: {e}"),
    }
    registry
        .save(&settings.config_name)
        .context("saving config")?;

    if cli.once {
        return Ok(());
    }

    // ── Key tables ────────────────────────────────────────────────────────────
    let keys = KeyData::load(&StdFileStore, &settings.key_names_path()).unwrap_or_else(|e| {
        warn!("key names not loaded, using built-in Windows names: {e}");
        KeyData::windows_defaults()
    });
    let table = KeybindTable::load(&StdFileStore, &settings.keybinds_path(), &keys)
        .unwrap_or_else(|e| {
            warn!("keybinds not loaded, nothing to poll: {e}");
            KeybindTable::new()
        });

    let oracle = system_key_state().context("no key-state source on this platform")?;

    // ── Poller ────────────────────────────────────────────────────────────────
    let registry = Arc::new(Mutex::new(registry));
    let running = Arc::new(AtomicBool::new(true));
    let poller = KeyPoller::new(table, Arc::from(oracle), Arc::clone(&registry));
    let handle = poller
        .spawn(Arc::clone(&running), settings.tick_interval())
        .context("spawning poll thread")?;

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl-C signal: {e}"),
        }
    });

    info!("iniconf keybinder ready.  Press Ctrl-C to exit.");

    while running.load(Ordering::Relaxed) {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    tokio::task::spawn_blocking(move || handle.join())
        .await
        .context("joining poll thread")?
        .map_err(|_| anyhow!("poll thread panicked"))?;

    let registry = registry
        .lock()
        .map_err(|_| anyhow!("registry lock poisoned"))?;
    registry
        .save(&settings.config_name)
        .context("saving config on shutdown")?;

    info!("iniconf keybinder stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults_keep_settings_untouched() {
        // Arrange
        let cli = Cli::parse_from(["iniconf-keybinder"]);
        let mut settings = Settings::default();

        // Act
        cli.apply(&mut settings);

        // Assert
        assert_eq!(settings, Settings::default());
        assert!(!cli.once);
    }

    #[test]
    fn test_cli_flags_override_settings() {
        let cli = Cli::parse_from([
            "iniconf-keybinder",
            "--config-dir",
            "somedir",
            "--config-name",
            "profile",
            "--tick-ms",
            "25",
            "--once",
        ]);
        let mut settings = Settings::default();

        cli.apply(&mut settings);

        assert_eq!(settings.config_dir, PathBuf::from("somedir"));
        assert_eq!(settings.config_name, "profile");
        assert_eq!(settings.tick_interval(), Duration::from_millis(25));
        assert!(cli.once);
    }

    #[test]
    fn test_schema_declares_six_items() {
        let mut registry = Registry::new();
        declare_schema(&mut registry).expect("declare");
        assert_eq!(registry.len(), 6);
        assert!(registry.get::<bool>(2).expect("get"));
    }
}

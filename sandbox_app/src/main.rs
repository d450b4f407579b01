//! Headless sandbox
//!
//! Loads the configured initial scene and drives it for a bounded number of
//! frames, pressing the system keys on a fixed schedule. Exits non-zero when
//! the initial scene cannot be loaded.

use clap::Parser;
use scene_engine::foundation::logging;
use scene_engine::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;
use std::rc::Rc;

#[derive(Debug, Parser)]
#[command(author, version, about = "Headless scene engine sandbox")]
struct Cli {
    /// Engine configuration file (.toml, .ron or .json)
    #[arg(long, default_value = "sandbox_app/config/engine.toml")]
    config: PathBuf,

    /// Frames to run before exiting
    #[arg(long, default_value_t = 600)]
    frames: u64,

    /// Override the asset directory from the configuration
    #[arg(long)]
    assets: Option<String>,

    /// Don't press any keys
    #[arg(long)]
    no_script: bool,
}

/// Frame at which each key goes down; it is released the frame after
const KEY_SCHEDULE: &[(u64, KeyCode)] = &[
    (60, KeyCode::Backquote),
    (180, KeyCode::P),
    (240, KeyCode::P),
    (300, KeyCode::Backquote),
    (360, KeyCode::R),
];

fn load_config(cli: &Cli) -> Result<EngineConfig, EngineError> {
    let mut config = if cli.config.exists() {
        EngineConfig::load_from_file(&cli.config.to_string_lossy())?
    } else {
        log::warn!("No config at {}, using defaults", cli.config.display());
        EngineConfig::default()
    };
    if let Some(dir) = &cli.assets {
        config.assets.assets_dir.clone_from(dir);
    }
    Ok(config)
}

fn press_scheduled_keys(frame: u64, input: &mut InputManager) {
    for &(at, key) in KEY_SCHEDULE {
        if frame == at {
            log::info!("Sandbox: pressing {:?}", key);
            input.handle_key_input(key, true);
        } else if frame == at + 1 {
            input.handle_key_input(key, false);
        }
    }
}

fn run(cli: &Cli) -> Result<u64, EngineError> {
    let config = load_config(cli)?;
    logging::init_with_filter(&config.log_level);

    let source = Rc::new(FileAssets::new(&config.assets.assets_dir));
    let mut renderer = HeadlessRenderer::new();
    let scripted = !cli.no_script;
    Engine::run_with(
        config,
        ScriptRegistry::with_builtins(),
        &mut renderer,
        source,
        Some(cli.frames),
        |frame, input| {
            if scripted {
                press_scheduled_keys(frame, input);
            }
        },
    )
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(frames) => {
            log::info!("Sandbox finished after {} frames", frames);
            ExitCode::SUCCESS
        }
        Err(e) => {
            // logging may not be up yet if the config itself failed
            logging::init();
            log::error!("Sandbox failed: {}", e);
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

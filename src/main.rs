use std::panic;
use std::process;

use clap::Parser;
use kiss3d::window::Window;

use rust_orrery::config::{CliArgs, SceneConfig, WindowConfig};
use rust_orrery::error::InitError;
use rust_orrery::gui::Simulation;

fn main() {
    let args = CliArgs::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&args.log_level))
        .init();

    if let Err(err) = run(&args) {
        log::error!("{}", err);
        process::exit(1);
    }
}

fn run(args: &CliArgs) -> Result<(), InitError> {
    let mut config = match &args.config {
        Some(path) => {
            log::info!("Loading scene from {}", path.display());
            SceneConfig::load(path)?
        }
        None => {
            log::info!("Using the built-in scene");
            SceneConfig::default()
        }
    };
    config.apply_cli_overrides(args);
    config.validate()?;

    let mut window = open_window(&config.window)?;
    let [r, g, b] = config.render.background;
    window.set_background_color(r, g, b);
    window.set_framerate_limit(Some(60));

    let simulation = Simulation::new(&config, &mut window)?;
    window.render_loop(simulation);

    log::info!("Window closed, shutting down");
    Ok(())
}

fn open_window(config: &WindowConfig) -> Result<Window, InitError> {
    // kiss3d has no fallible constructor; a missing display or GL context
    // shows up as a panic.
    let (title, width, height) = (config.title.as_str(), config.width, config.height);
    panic::catch_unwind(|| Window::new_with_size(title, width, height)).map_err(|cause| {
        let message = cause
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| cause.downcast_ref::<&str>().map(|s| s.to_string()))
            .unwrap_or_else(|| "unknown error".to_owned());
        InitError::Window(message)
    })
}

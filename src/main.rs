//! # Compass Map Application Entry Point
//!
//! Runs the UI loop in a terminal. Each line typed on stdin is an address
//! submitted with the "Find address" button; the map and the compass overlay
//! are redrawn on stdout whenever they change.
//!
//! Options:
//! - `--config <path>`: configuration file (default `compass-map.toml`)
//! - `--no-compass`: run without a heading sensor
//! - `--write-config <path>`: write the effective configuration to `path` and exit

// Test modules
#[cfg(test)]
mod tests;

use std::env;

use compass_map_lib::{
    app::App,
    config::Config,
    heading::{HeadingSensor, HeadingSubscriber},
    renderer::heading_label,
    sensors::{NoCompass, SimulatedCompass},
};
use tokio::io::{AsyncBufReadExt, BufReader};

/// Typed on its own line to leave the application
const QUIT: &str = ":quit";

fn draw(app: &App, config: &Config) {
    println!("{}", app.render(&config.display));
}

fn heading_sensor(config: &Config, enabled: bool) -> Box<dyn HeadingSensor> {
    if enabled && config.compass.simulated {
        Box::new(SimulatedCompass::new(
            std::time::Duration::from_millis(config.compass.interval_ms),
            config.compass.step_degrees,
        ))
    } else {
        Box::new(NoCompass)
    }
}

async fn run(config: Config, compass_enabled: bool) -> anyhow::Result<()> {
    let mut app = App::new(&config);

    let mut compass = HeadingSubscriber::new(
        heading_sensor(&config, compass_enabled),
        app.heading_callback(),
    );
    compass.mount();

    let mut map_changes = app.map().subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    draw(&app, &config);

    loop {
        tokio::select! {
            line = lines.next_line() => {
                match line? {
                    Some(line) if line.trim() == QUIT => break,
                    // Every line is submitted as-is, empty ones included
                    Some(line) => {
                        app.find_address(&line);
                    }
                    None => break,
                }
            }
            Some(event) = app.next_event() => {
                let shown = heading_label(app.heading());
                app.handle(event);
                // Apply whatever else is already queued before redrawing once
                while let Some(event) = app.try_next_event() {
                    app.handle(event);
                }
                if heading_label(app.heading()) != shown {
                    draw(&app, &config);
                }
            }
            Ok(()) = map_changes.changed() => {
                map_changes.borrow_and_update();
                draw(&app, &config);
            }
        }
    }

    compass.unmount();
    Ok(())
}

/// Value following `flag`, if the flag was given.
fn option_value<'a>(args: &'a [String], flag: &str) -> anyhow::Result<Option<&'a str>> {
    match args.iter().position(|arg| arg == flag) {
        Some(index) => match args.get(index + 1) {
            Some(value) => Ok(Some(value.as_str())),
            None => anyhow::bail!("{flag} requires a path"),
        },
        None => Ok(None),
    }
}

/// Main application entry point.
fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let compass_enabled = !args.iter().any(|arg| arg == "--no-compass");
    let config = match option_value(&args, "--config")? {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    if let Some(path) = option_value(&args, "--write-config")? {
        return config.save(path);
    }

    // Create Tokio runtime for async operations
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run(config, compass_enabled))
}

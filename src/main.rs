// src/main.rs
use std::process::ExitCode;

use log::error;
use sprite_renderer::app::App;
use sprite_renderer::config::AppConfig;
use sprite_renderer::error::AppError;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match App::run(AppConfig::default()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ AppError::Load(_)) => {
            error!("{e}");
            ExitCode::from(255)
        }
        Err(e) => {
            error!("Renderer failed: {e}");
            ExitCode::from(255)
        }
    }
}

// src/config.rs
use std::path::PathBuf;

/// Fixed startup parameters. The demo takes no command line arguments.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub sprite_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "Sprite Renderer".to_string(),
            width: 800,
            height: 600,
            sprite_path: PathBuf::from("assets/sprite.png"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_demo_constants() {
        let config = AppConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.sprite_path, PathBuf::from("assets/sprite.png"));
        assert_eq!(config.title, "Sprite Renderer");
    }
}

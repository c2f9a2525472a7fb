use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::overlay::{Direction, OverlayStyle};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

/// Reading direction requested by the user; `Auto` keeps the detected one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionPreference {
    #[default]
    Auto,
    Horizontal,
    Vertical,
}

impl DirectionPreference {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "horizontal" | "h" => Ok(Self::Horizontal),
            "vertical" | "v" => Ok(Self::Vertical),
            other => Err(anyhow!("unknown direction '{}'", other)),
        }
    }

    pub fn resolve(self, detected: Direction) -> Direction {
        match self {
            Self::Auto => detected,
            Self::Horizontal => Direction::Horizontal,
            Self::Vertical => Direction::Vertical,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub direction: DirectionPreference,
    pub overlay_stroke_color: String,
    pub overlay_fill_opacity: f32,
    pub overlay_palette: Vec<String>,
    pub debug_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            direction: DirectionPreference::Auto,
            overlay_stroke_color: "#4338ca".to_string(),
            overlay_fill_opacity: 0.25,
            overlay_palette: Vec::new(),
            debug_dir: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    reader: Option<ReaderSettings>,
    overlay: Option<OverlaySettings>,
    debug: Option<DebugSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct ReaderSettings {
    direction: Option<DirectionPreference>,
}

#[derive(Debug, Default, Deserialize)]
struct OverlaySettings {
    stroke_color: Option<String>,
    fill_opacity: Option<f32>,
    palette: Option<Vec<String>>,
}

#[derive(Debug, Default, Deserialize)]
struct DebugSettings {
    dir: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    load_settings_with_home(home_dir().as_deref(), extra_path)
}

/// Layers `./settings.toml`, `./settings.local.toml`, the same pair under
/// `home`, then `extra_path`. Later files win per key.
pub fn load_settings_with_home(home: Option<&Path>, extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    if let Some(home) = home {
        ensure_home_settings_file(home)?;
    }

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    pub fn overlay_style(&self) -> OverlayStyle {
        OverlayStyle {
            stroke_color: self.overlay_stroke_color.clone(),
            fill_opacity: self.overlay_fill_opacity,
            palette: self.overlay_palette.clone(),
        }
    }

    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(reader) = incoming.reader {
            if let Some(direction) = reader.direction {
                self.direction = direction;
            }
        }
        if let Some(overlay) = incoming.overlay {
            if let Some(color) = overlay.stroke_color {
                if !color.trim().is_empty() {
                    self.overlay_stroke_color = color;
                }
            }
            if let Some(opacity) = overlay.fill_opacity {
                if (0.0..=1.0).contains(&opacity) {
                    self.overlay_fill_opacity = opacity;
                }
            }
            if let Some(palette) = overlay.palette {
                let palette: Vec<String> = palette
                    .into_iter()
                    .filter(|color| !color.trim().is_empty())
                    .collect();
                if !palette.is_empty() {
                    self.overlay_palette = palette;
                }
            }
        }
        if let Some(debug) = incoming.debug {
            if let Some(dir) = debug.dir {
                if !dir.trim().is_empty() {
                    self.debug_dir = Some(PathBuf::from(dir));
                }
            }
        }
    }
}

fn ensure_home_settings_file(home: &Path) -> Result<()> {
    fs::create_dir_all(home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

pub(crate) fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".reader-overlay-rust"))
        }
    })
}

//! Word highlight regions for rendered document pages.
//!
//! Glyph runs from a page renderer and words from a tokenizer describe the
//! same text in two shapes. [`compute_word_regions`] lines them up and
//! returns one box per visual segment of every word, ready for overlay
//! hit-testing.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub mod debug;
pub mod logging;
pub mod overlay;
pub mod page;
pub mod settings;

pub use overlay::{
    CharacterRect, Direction, FontTransform, GlyphRun, PageRegions, Word, WordBoundingRegion,
    compute_word_regions,
};
pub use page::{PageInput, Viewport};

#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Page JSON file; stdin is used when absent.
    pub data: Option<String>,
    pub settings_path: Option<String>,
    pub direction: Option<String>,
    pub base_text: bool,
    pub pretty: bool,
    pub image: Option<String>,
    pub debug_overlay: bool,
}

#[derive(Debug, Serialize)]
pub struct RegionReport {
    pub direction: Direction,
    pub detected_direction: Direction,
    pub regions: Vec<RegionEntry>,
    pub unmapped: Vec<UnmappedEntry>,
}

#[derive(Debug, Serialize)]
pub struct RegionEntry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub area: f32,
    pub word: usize,
    pub surface: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub reading: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub part_of_speech: String,
}

#[derive(Debug, Serialize)]
pub struct UnmappedEntry {
    pub word: usize,
    pub surface: String,
}

pub fn run(config: Config, input: Option<String>) -> Result<String> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;
    run_with_settings(config, input, &settings)
}

/// Same as [`run`] with already loaded settings.
pub fn run_with_settings(
    config: Config,
    input: Option<String>,
    settings: &settings::Settings,
) -> Result<String> {
    let content = match config.data.as_deref() {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read page: {}", path))?,
        None => input.unwrap_or_default(),
    };
    if content.trim().is_empty() {
        return Err(anyhow!("page input is empty"));
    }
    let page = PageInput::from_json(&content)?;

    if config.base_text {
        return Ok(page.base_text());
    }

    let preference = match config.direction.as_deref() {
        Some(value) => settings::DirectionPreference::parse(value)?,
        None => settings.direction,
    };
    let regions = page.compute();
    let report = build_report(&page, &regions, preference);
    info!(
        "page: {} regions, {} unmapped words",
        report.regions.len(),
        report.unmapped.len()
    );

    if config.image.is_some() && !config.debug_overlay {
        warn!("page image is only used with the debug overlay; ignoring it");
    }
    if config.debug_overlay {
        let image_bytes = match config.image.as_deref() {
            Some(path) => Some(
                fs::read(path).with_context(|| format!("failed to read page image: {}", path))?,
            ),
            None => None,
        };
        let image_mime = config
            .image
            .as_deref()
            .map(image_mime_from_path)
            .unwrap_or("image/png");
        let debug_config = debug::build_debug_config(
            config.data.as_deref().map(Path::new),
            settings.debug_dir.as_deref(),
        )?;
        let written = debug::write_debug_overlay(
            &debug_config,
            &page,
            &regions,
            image_bytes.as_deref().map(|bytes| (bytes, image_mime)),
            &settings.overlay_style(),
        )?;
        for path in written {
            info!("debug overlay: {}", path.display());
        }
    }

    let output = if config.pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    };
    output.with_context(|| "failed to serialize regions")
}

pub fn build_report(
    page: &PageInput,
    regions: &PageRegions,
    preference: settings::DirectionPreference,
) -> RegionReport {
    let entries = regions
        .regions
        .iter()
        .filter_map(|region| {
            let word = page.words.get(region.word)?;
            Some(RegionEntry {
                x: region.x,
                y: region.y,
                width: region.width,
                height: region.height,
                area: region.area,
                word: region.word,
                surface: word.surface_form.clone(),
                reading: word.reading.clone(),
                part_of_speech: word.part_of_speech.clone(),
            })
        })
        .collect();
    let unmapped = regions
        .unmapped_words
        .iter()
        .zip(debug::describe_unmapped(&page.words, &regions.unmapped_words))
        .map(|(word, surface)| UnmappedEntry {
            word: *word,
            surface,
        })
        .collect();

    RegionReport {
        direction: preference.resolve(regions.direction),
        detected_direction: regions.direction,
        regions: entries,
        unmapped,
    }
}

fn image_mime_from_path(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
        "image/jpeg"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else if lower.ends_with(".bmp") {
        "image/bmp"
    } else {
        "image/png"
    }
}

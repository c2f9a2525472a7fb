use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::overlay::{self, OverlayStyle, Word};
use crate::page::PageInput;
use crate::settings::home_dir;

#[derive(Debug, Clone)]
pub struct OverlayDebugConfig {
    output_dir: PathBuf,
    base_name: String,
}

impl OverlayDebugConfig {
    pub fn page_label(&self, page: Option<usize>) -> String {
        if let Some(index) = page {
            format!("{}_page{:02}", self.base_name, index + 1)
        } else {
            self.base_name.clone()
        }
    }

    pub fn output_path(&self, label: &str) -> PathBuf {
        self.output_dir.join(format!("{}_overlay.png", label))
    }

    pub fn json_path(&self, label: &str) -> PathBuf {
        self.output_dir.join(format!("{}_regions.json", label))
    }
}

/// Output goes next to the source file, or under `dir`/the cache directory
/// when reading from stdin.
pub fn build_debug_config(
    src_path: Option<&Path>,
    dir: Option<&Path>,
) -> Result<OverlayDebugConfig> {
    let (dir, base) = match (src_path, dir) {
        (Some(path), override_dir) => {
            let parent = path.parent().unwrap_or_else(|| Path::new("."));
            let base = path
                .file_stem()
                .and_then(|value| value.to_str())
                .unwrap_or("page");
            let dir = override_dir.map(Path::to_path_buf).unwrap_or_else(|| parent.to_path_buf());
            (dir, base.to_string())
        }
        (None, Some(dir)) => (dir.to_path_buf(), "stdin".to_string()),
        (None, None) => (default_debug_dir(), "stdin".to_string()),
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create debug dir: {}", dir.display()))?;
    Ok(OverlayDebugConfig {
        output_dir: dir,
        base_name: sanitize_filename_component(&base),
    })
}

/// Writes the region JSON and, when a page image is available, the PNG with
/// the regions drawn on top. Files are labelled with the page number when the
/// input carries one. Returns the written paths.
pub fn write_debug_overlay(
    config: &OverlayDebugConfig,
    page: &PageInput,
    regions: &overlay::PageRegions,
    page_image: Option<(&[u8], &str)>,
    style: &OverlayStyle,
) -> Result<Vec<PathBuf>> {
    let label = config.page_label(page.page);
    let mut written = Vec::new();

    let json_path = config.json_path(&label);
    let json =
        serde_json::to_string_pretty(regions).with_context(|| "failed to serialize regions")?;
    fs::write(&json_path, json)
        .with_context(|| format!("failed to write debug json: {}", json_path.display()))?;
    written.push(json_path);

    if page_image.is_some() {
        let png_path = config.output_path(&label);
        let svg = overlay::render_region_svg(
            page_image,
            page.viewport.width,
            page.viewport.height,
            &regions.regions,
            &page.words,
            style,
        )?;
        let png = overlay::render_svg_bytes(&svg, "image/png")?;
        fs::write(&png_path, png)
            .with_context(|| format!("failed to write debug overlay: {}", png_path.display()))?;
        written.push(png_path);
    }

    Ok(written)
}

pub(crate) fn describe_unmapped(words: &[Word], unmapped: &[usize]) -> Vec<String> {
    unmapped
        .iter()
        .filter_map(|index| words.get(*index))
        .map(|word| word.surface_form.clone())
        .collect()
}

fn default_debug_dir() -> PathBuf {
    match home_dir() {
        Some(home) => home.join(".cache/overlay"),
        None => Path::new(".reader-overlay-rust/.cache/overlay").to_path_buf(),
    }
}

fn sanitize_filename_component(value: &str) -> String {
    let mut out = String::new();
    for ch in value.chars() {
        if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
            out.push(ch);
        } else if ch.is_whitespace() {
            out.push('_');
        }
    }
    if out.is_empty() {
        "page".to_string()
    } else {
        out
    }
}

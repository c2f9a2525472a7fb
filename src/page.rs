use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use crate::overlay::{self, FontTransform, GlyphRun, PageRegions, Word};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// One page as handed over by the renderer and the tokenizer.
#[derive(Debug, Clone)]
pub struct PageInput {
    /// Zero-based page number inside the source document, when known.
    pub page: Option<usize>,
    pub viewport: Viewport,
    pub glyph_runs: Vec<GlyphRun>,
    pub words: Vec<Word>,
}

#[derive(Debug, Deserialize)]
struct PageFile {
    #[serde(default, alias = "page_index")]
    page: Option<usize>,
    viewport: Viewport,
    #[serde(default, alias = "items")]
    glyph_runs: Vec<GlyphRunRecord>,
    #[serde(default)]
    words: Vec<Word>,
}

/// Accepts both the pdf.js text item shape and a spelled-out transform.
#[derive(Debug, Deserialize)]
struct GlyphRunRecord {
    #[serde(alias = "str")]
    text: String,
    transform: TransformRecord,
    width: f32,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TransformRecord {
    Matrix([f32; 6]),
    Named(FontTransform),
}

impl From<GlyphRunRecord> for GlyphRun {
    fn from(record: GlyphRunRecord) -> Self {
        let transform = match record.transform {
            TransformRecord::Matrix(matrix) => FontTransform::from_matrix(matrix),
            TransformRecord::Named(transform) => transform,
        };
        GlyphRun::new(record.text, transform, record.width)
    }
}

impl PageInput {
    pub fn from_json(content: &str) -> Result<Self> {
        let file: PageFile =
            serde_json::from_str(content).with_context(|| "failed to parse page JSON")?;
        let viewport = file.viewport;
        if !(viewport.height.is_finite() && viewport.height > 0.0) {
            return Err(anyhow!("viewport height must be positive: {}", viewport.height));
        }
        if !(viewport.width.is_finite() && viewport.width > 0.0) {
            return Err(anyhow!("viewport width must be positive: {}", viewport.width));
        }
        Ok(Self {
            page: file.page,
            viewport,
            glyph_runs: file.glyph_runs.into_iter().map(GlyphRun::from).collect(),
            words: file.words,
        })
    }

    pub fn base_text(&self) -> String {
        overlay::base_text(&self.glyph_runs)
    }

    pub fn compute(&self) -> PageRegions {
        overlay::compute_word_regions(&self.glyph_runs, &self.words, self.viewport.height)
    }
}

mod engine;
mod render;

use serde::{Deserialize, Serialize};

pub use engine::{
    BaseCharacter, BaseText, CharacterWordMap, align_words, base_text, build_character_rects,
    compute_word_regions, detect_direction, filter_furigana, font_size, group_segments,
};
pub use render::{OverlayStyle, render_region_svg, render_svg_bytes};

/// Runs smaller than this fraction of the median font size are furigana.
pub const FURIGANA_RATIO: f32 = 0.65;
/// Mean vertical advance must exceed the horizontal one by this factor.
pub const VERTICAL_RATIO: f32 = 1.5;
/// Share of the font height reserved below the baseline.
pub const DESCENDER_RATIO: f32 = 0.2;
/// Two rects whose tops differ by at most this much sit on the same line.
pub const SAME_LINE_TOLERANCE: f32 = 5.0;
/// A horizontal gap wider than this many previous-glyph widths splits a segment.
pub const SEGMENT_GAP_FACTOR: f32 = 2.0;

/// Text-space transform of a glyph run, in pdf.js order `[a, b, c, d, e, f]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FontTransform {
    pub scale_x: f32,
    pub skew_y: f32,
    pub skew_x: f32,
    pub scale_y: f32,
    /// Baseline origin.
    pub x: f32,
    pub y: f32,
}

impl FontTransform {
    pub fn from_matrix(m: [f32; 6]) -> Self {
        Self {
            scale_x: m[0],
            skew_y: m[1],
            skew_x: m[2],
            scale_y: m[3],
            x: m[4],
            y: m[5],
        }
    }

    fn is_finite(&self) -> bool {
        [
            self.scale_x,
            self.skew_y,
            self.skew_x,
            self.scale_y,
            self.x,
            self.y,
        ]
        .iter()
        .all(|value| value.is_finite())
    }
}

/// One positioned string fragment emitted by the page renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlyphRun {
    pub text: String,
    pub transform: FontTransform,
    /// Rendered width of the whole fragment.
    pub width: f32,
}

impl GlyphRun {
    pub fn new(text: impl Into<String>, transform: FontTransform, width: f32) -> Self {
        Self {
            text: text.into(),
            transform,
            width,
        }
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Finite metrics and a non-negative width. Anything else never reaches
    /// the base text.
    pub fn is_well_formed(&self) -> bool {
        self.transform.is_finite() && self.width.is_finite() && self.width >= 0.0
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Glyphs inside a run are treated as monospaced.
    pub fn char_width(&self) -> f32 {
        let count = self.char_count();
        if count == 0 {
            return 0.0;
        }
        self.width / count as f32
    }
}

/// One token from the linguistic tokenizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Word {
    #[serde(alias = "surface")]
    pub surface_form: String,
    #[serde(default)]
    pub reading: String,
    #[serde(default, alias = "pos")]
    pub part_of_speech: String,
    /// Learner-facing data carried through untouched.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub metadata: serde_json::Value,
}

impl Word {
    pub fn new(surface_form: impl Into<String>) -> Self {
        Self {
            surface_form: surface_form.into(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Horizontal,
    Vertical,
}

/// Page-space rectangle of one base character. `word` is the index of the
/// owning token in the word slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CharacterRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub word: Option<usize>,
}

/// One contiguous visual segment of a word.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WordBoundingRegion {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub area: f32,
    pub word: usize,
}

impl WordBoundingRegion {
    pub fn contains(&self, rect: &CharacterRect) -> bool {
        rect.x >= self.x
            && rect.y >= self.y
            && rect.x + rect.width <= self.x + self.width
            && rect.y + rect.height <= self.y + self.height
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct PageRegions {
    pub direction: Direction,
    /// Sorted by area, largest first.
    pub regions: Vec<WordBoundingRegion>,
    /// Tokens that matched nowhere in the base text.
    pub unmapped_words: Vec<usize>,
}

impl PageRegions {
    pub fn unmapped_count(&self) -> usize {
        self.unmapped_words.len()
    }

    pub fn regions_for(&self, word: usize) -> impl Iterator<Item = &WordBoundingRegion> + '_ {
        self.regions.iter().filter(move |region| region.word == word)
    }
}

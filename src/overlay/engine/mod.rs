mod align;
mod direction;
mod furigana;
mod geom;
mod rects;
mod segment;

use tracing::{debug, info};

use crate::overlay::{GlyphRun, PageRegions, Word};

pub use align::{CharacterWordMap, align_words};
pub use direction::detect_direction;
pub use furigana::{filter_furigana, font_size};
pub use rects::{BaseCharacter, BaseText, base_text, build_character_rects};
pub use segment::group_segments;

/// Maps tokenizer words onto the glyph runs of one page and returns their
/// screen-space regions, largest first.
///
/// Direction is classified on the unfiltered runs; everything else works on
/// the furigana-free base text. Never fails: words that match nowhere are
/// listed in [`PageRegions::unmapped_words`].
pub fn compute_word_regions(
    glyph_runs: &[GlyphRun],
    words: &[Word],
    viewport_height: f32,
) -> PageRegions {
    let direction = detect_direction(glyph_runs);
    let base_runs = filter_furigana(glyph_runs);
    debug!(
        "overlay: {} of {} runs kept as base text, direction={:?}",
        base_runs.len(),
        glyph_runs.len(),
        direction
    );

    let base = BaseText::from_runs(&base_runs);
    let map = align_words(base.chars(), words);
    let rects = build_character_rects(&base, &map, viewport_height);
    let regions = group_segments(&rects);

    let unmapped_words = map.unmapped_words(words.len());
    if !unmapped_words.is_empty() {
        info!(
            "overlay: {} of {} words unmapped",
            unmapped_words.len(),
            words.len()
        );
    }
    debug!("overlay: {} regions", regions.len());

    PageRegions {
        direction,
        regions,
        unmapped_words,
    }
}

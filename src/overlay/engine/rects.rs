use crate::overlay::{CharacterRect, DESCENDER_RATIO, GlyphRun};

use super::align::CharacterWordMap;
use super::furigana::{filter_furigana, font_size};

/// One character of the base text and the run it was drawn from.
#[derive(Debug, Clone, Copy)]
pub struct BaseCharacter<'a> {
    pub run: &'a GlyphRun,
    /// Position inside `run.text`, counted in chars.
    pub index: usize,
}

/// Concatenated text of the base runs, kept alongside the per-character
/// run lookup the rectangle builder needs.
#[derive(Debug, Clone)]
pub struct BaseText<'a> {
    text: Vec<char>,
    characters: Vec<BaseCharacter<'a>>,
}

impl<'a> BaseText<'a> {
    pub fn from_runs(runs: &'a [GlyphRun]) -> Self {
        let mut text = Vec::new();
        let mut characters = Vec::new();
        for run in runs {
            for (index, ch) in run.text.chars().enumerate() {
                text.push(ch);
                characters.push(BaseCharacter { run, index });
            }
        }
        Self { text, characters }
    }

    pub fn chars(&self) -> &[char] {
        &self.text
    }

    pub fn characters(&self) -> &[BaseCharacter<'a>] {
        &self.characters
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn to_text(&self) -> String {
        self.text.iter().collect()
    }
}

/// The furigana-free text the tokenizer has to be given for the word
/// alignment to line up.
pub fn base_text(runs: &[GlyphRun]) -> String {
    let base_runs = filter_furigana(runs);
    BaseText::from_runs(&base_runs).to_text()
}

/// Turns every base character into a top-down page rectangle. Zero-sized
/// rects from degenerate transforms are kept.
pub fn build_character_rects(
    base: &BaseText<'_>,
    map: &CharacterWordMap,
    viewport_height: f32,
) -> Vec<CharacterRect> {
    base.characters()
        .iter()
        .enumerate()
        .map(|(offset, character)| {
            let run = character.run;
            let width = run.char_width();
            let height = font_size(&run.transform);
            let x = run.transform.x + character.index as f32 * width;
            let y = (viewport_height - run.transform.y) - height + height * DESCENDER_RATIO;
            CharacterRect {
                x,
                y,
                width,
                height,
                word: map.owner(offset),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overlay::{FontTransform, Word, align_words};

    fn run(text: &str, x: f32, y: f32, width: f32) -> GlyphRun {
        GlyphRun::new(
            text,
            FontTransform::from_matrix([3.0, 0.0, 0.0, 4.0, x, y]),
            width,
        )
    }

    #[test]
    fn characters_remember_their_run() {
        let runs = vec![run("東京", 0.0, 0.0, 6.0), run("に", 6.0, 0.0, 3.0)];
        let base = BaseText::from_runs(&runs);
        assert_eq!(base.to_text(), "東京に");
        let indices: Vec<usize> = base.characters().iter().map(|c| c.index).collect();
        assert_eq!(indices, vec![0, 1, 0]);
        assert_eq!(base.characters()[2].run.text, "に");
    }

    #[test]
    fn rects_follow_run_metrics() {
        let runs = vec![run("東京に", 10.0, 80.0, 18.0)];
        let base = BaseText::from_runs(&runs);
        let map = align_words(base.chars(), &[Word::new("京")]);
        let rects = build_character_rects(&base, &map, 100.0);

        assert_eq!(rects.len(), 3);
        let xs: Vec<f32> = rects.iter().map(|rect| rect.x).collect();
        assert_eq!(xs, vec![10.0, 16.0, 22.0]);
        for rect in &rects {
            assert_eq!(rect.width, 6.0);
            assert_eq!(rect.height, 5.0);
            assert_eq!(rect.y, 16.0);
        }
        let owners: Vec<Option<usize>> = rects.iter().map(|rect| rect.word).collect();
        assert_eq!(owners, vec![None, Some(0), None]);
    }

    #[test]
    fn degenerate_transform_yields_empty_rect() {
        let runs = vec![GlyphRun::new("点", FontTransform::default(), 0.0)];
        let base = BaseText::from_runs(&runs);
        let map = align_words(base.chars(), &[]);
        let rects = build_character_rects(&base, &map, 50.0);
        assert_eq!(rects.len(), 1);
        assert_eq!(rects[0].width, 0.0);
        assert_eq!(rects[0].height, 0.0);
        assert_eq!(rects[0].y, 50.0);
    }

    #[test]
    fn base_text_skips_furigana() {
        let mut runs = vec![run("東京", 0.0, 100.0, 6.0)];
        runs.push(GlyphRun::new(
            "とうきょう",
            FontTransform::from_matrix([1.0, 0.0, 0.0, 1.0, 0.0, 105.0]),
            5.0,
        ));
        runs.push(run("に行った", 6.0, 100.0, 12.0));
        assert_eq!(base_text(&runs), "東京に行った");
    }
}

use crate::overlay::{CharacterRect, WordBoundingRegion};

/// Horizontal distance between the right edge of `a` and the left edge of `b`.
pub(super) fn horizontal_gap(a: &CharacterRect, b: &CharacterRect) -> f32 {
    b.x - (a.x + a.width)
}

pub(super) fn vertical_offset(a: &CharacterRect, b: &CharacterRect) -> f32 {
    (b.y - a.y).abs()
}

pub(super) fn union_region(rects: &[CharacterRect], word: usize) -> WordBoundingRegion {
    let mut x1 = f32::INFINITY;
    let mut y1 = f32::INFINITY;
    let mut x2 = f32::NEG_INFINITY;
    let mut y2 = f32::NEG_INFINITY;
    for rect in rects {
        x1 = x1.min(rect.x);
        y1 = y1.min(rect.y);
        x2 = x2.max(rect.x + rect.width);
        y2 = y2.max(rect.y + rect.height);
    }
    let width = x2 - x1;
    let height = y2 - y1;
    WordBoundingRegion {
        x: x1,
        y: y1,
        width,
        height,
        area: width * height,
        word,
    }
}

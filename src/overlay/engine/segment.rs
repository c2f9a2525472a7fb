use std::collections::HashMap;

use crate::overlay::{CharacterRect, SAME_LINE_TOLERANCE, SEGMENT_GAP_FACTOR, WordBoundingRegion};

use super::geom::{horizontal_gap, union_region, vertical_offset};

/// Collapses owned character rects into one region per contiguous segment of
/// each word, then orders all regions by area, largest first, so smaller
/// boxes end up drawn on top.
pub fn group_segments(rects: &[CharacterRect]) -> Vec<WordBoundingRegion> {
    let mut buckets: Vec<(usize, Vec<CharacterRect>)> = Vec::new();
    let mut slots: HashMap<usize, usize> = HashMap::new();
    for rect in rects {
        let Some(word) = rect.word else {
            continue;
        };
        let slot = *slots.entry(word).or_insert_with(|| {
            buckets.push((word, Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(*rect);
    }

    let mut regions = Vec::new();
    for (word, mut members) in buckets {
        sort_reading_order(&mut members);
        for segment in split_segments(&members) {
            regions.push(union_region(segment, word));
        }
    }
    regions.sort_by(|a, b| b.area.total_cmp(&a.area));
    regions
}

/// Top-to-bottom by line, left-to-right inside a line. Rects join the current
/// line while their top stays within tolerance of the line's first rect.
fn sort_reading_order(rects: &mut Vec<CharacterRect>) {
    rects.sort_by(|a, b| a.y.total_cmp(&b.y).then(a.x.total_cmp(&b.x)));

    let mut ordered = Vec::with_capacity(rects.len());
    let mut line: Vec<CharacterRect> = Vec::new();
    for rect in rects.drain(..) {
        let next_line = line
            .first()
            .is_some_and(|first| rect.y - first.y > SAME_LINE_TOLERANCE);
        if next_line {
            flush_line(&mut line, &mut ordered);
        }
        line.push(rect);
    }
    flush_line(&mut line, &mut ordered);
    *rects = ordered;
}

fn flush_line(line: &mut Vec<CharacterRect>, ordered: &mut Vec<CharacterRect>) {
    line.sort_by(|a, b| a.x.total_cmp(&b.x));
    ordered.append(line);
}

fn split_segments(rects: &[CharacterRect]) -> Vec<&[CharacterRect]> {
    let mut segments = Vec::new();
    let mut start = 0usize;
    for idx in 1..rects.len() {
        let prev = &rects[idx - 1];
        let current = &rects[idx];
        let wrapped = vertical_offset(prev, current) > SAME_LINE_TOLERANCE;
        let detached = horizontal_gap(prev, current) > prev.width * SEGMENT_GAP_FACTOR;
        if wrapped || detached {
            segments.push(&rects[start..idx]);
            start = idx;
        }
    }
    if start < rects.len() {
        segments.push(&rects[start..]);
    }
    segments
}

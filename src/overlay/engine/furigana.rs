use crate::overlay::{FURIGANA_RATIO, FontTransform, GlyphRun};

pub fn font_size(transform: &FontTransform) -> f32 {
    transform.scale_x.hypot(transform.scale_y)
}

/// Drops blank, malformed and furigana-sized runs.
///
/// The cut-off is relative to the median size of the non-blank runs so it
/// holds across zoom levels. With no non-blank run there is nothing to
/// measure and the input comes back as is. Malformed runs never pass, even
/// when they are the only ones on the page.
pub fn filter_furigana(runs: &[GlyphRun]) -> Vec<GlyphRun> {
    if runs.iter().all(GlyphRun::is_blank) {
        return runs.to_vec();
    }
    let mut sizes: Vec<f32> = runs
        .iter()
        .filter(|run| is_measurable(run))
        .map(|run| font_size(&run.transform))
        .collect();
    if sizes.is_empty() {
        return Vec::new();
    }
    sizes.sort_by(f32::total_cmp);
    let threshold = median(&sizes) * FURIGANA_RATIO;

    runs.iter()
        .filter(|run| is_measurable(run) && font_size(&run.transform) >= threshold)
        .cloned()
        .collect()
}

fn is_measurable(run: &GlyphRun) -> bool {
    !run.is_blank() && run.is_well_formed() && font_size(&run.transform).is_finite()
}

fn median(sorted: &[f32]) -> f32 {
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

use crate::overlay::{Direction, GlyphRun, VERTICAL_RATIO};

/// Guesses the reading direction from the average baseline advance between
/// consecutive non-blank runs. Only a default; callers may override it.
pub fn detect_direction(runs: &[GlyphRun]) -> Direction {
    let mut previous: Option<&GlyphRun> = None;
    let mut sum_dx = 0.0f32;
    let mut sum_dy = 0.0f32;
    let mut pairs = 0usize;

    for run in runs.iter().filter(|run| !run.is_blank()) {
        if let Some(prev) = previous {
            sum_dx += (run.transform.x - prev.transform.x).abs();
            sum_dy += (run.transform.y - prev.transform.y).abs();
            pairs += 1;
        }
        previous = Some(run);
    }

    if pairs == 0 {
        return Direction::Horizontal;
    }
    let mean_dx = sum_dx / pairs as f32;
    let mean_dy = sum_dy / pairs as f32;
    if mean_dy > mean_dx * VERTICAL_RATIO {
        Direction::Vertical
    } else {
        Direction::Horizontal
    }
}

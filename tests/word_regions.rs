use reader_overlay_rust::overlay::{BaseText, align_words, filter_furigana, font_size};
use reader_overlay_rust::{Direction, FontTransform, GlyphRun, Word, compute_word_regions};

const VIEWPORT_HEIGHT: f32 = 100.0;

fn run(text: &str, x: f32, y: f32) -> GlyphRun {
    let count = text.chars().count() as f32;
    GlyphRun::new(
        text,
        FontTransform::from_matrix([3.0, 0.0, 0.0, 4.0, x, y]),
        3.0 * count,
    )
}

fn words(surfaces: &[&str]) -> Vec<Word> {
    surfaces.iter().map(|surface| Word::new(*surface)).collect()
}

#[test]
fn single_line_sentence_gives_one_region_per_word() {
    let runs = vec![run("東京に行った", 10.0, 80.0)];
    let tokens = words(&["東京", "に", "行った"]);
    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);

    assert_eq!(result.direction, Direction::Horizontal);
    assert_eq!(result.regions.len(), 3);
    assert_eq!(result.unmapped_count(), 0);
    for word in 0..3 {
        assert_eq!(result.regions_for(word).count(), 1);
    }
    for pair in result.regions.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        let disjoint = a.x + a.width <= b.x || b.x + b.width <= a.x;
        assert!(disjoint, "{a:?} overlaps {b:?}");
    }
}

#[test]
fn word_inside_second_line_stays_one_segment() {
    let runs = vec![run("東京に", 10.0, 80.0), run("行った", 10.0, 60.0)];
    let tokens = words(&["東京", "に", "行った"]);
    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    let segments: Vec<_> = result.regions_for(2).collect();
    assert_eq!(segments.len(), 1);
    assert_eq!(segments[0].x, 10.0);
    assert_eq!(segments[0].y, 36.0);
}

#[test]
fn word_across_line_break_splits_in_two() {
    let runs = vec![run("東京に", 10.0, 80.0), run("行った", 10.0, 60.0)];
    let tokens = words(&["東京", "に行", "った"]);
    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    let mut segments: Vec<_> = result.regions_for(1).copied().collect();
    assert_eq!(segments.len(), 2);
    segments.sort_by(|a, b| a.y.total_cmp(&b.y));
    assert_eq!((segments[0].x, segments[0].y), (16.0, 16.0));
    assert_eq!((segments[1].x, segments[1].y), (10.0, 36.0));
}

#[test]
fn repeated_particles_claim_different_characters() {
    let runs = vec![run("猫は可愛い。犬は大きい。", 0.0, 80.0)];
    let tokens = words(&["猫", "は", "可愛い", "。", "犬", "は", "大きい", "。"]);
    let base = BaseText::from_runs(&runs);
    let map = align_words(base.chars(), &tokens);
    assert_eq!(map.span_of(1), vec![1]);
    assert_eq!(map.span_of(5), vec![7]);

    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    let first = result.regions_for(1).next().expect("first は");
    let second = result.regions_for(5).next().expect("second は");
    assert_eq!(first.x, 3.0);
    assert_eq!(second.x, 21.0);
}

#[test]
fn no_character_is_owned_twice() {
    let runs = vec![run("ははははは", 0.0, 80.0)];
    let tokens = words(&["はは", "は", "ははは", "はは", "は", "は"]);
    let base = BaseText::from_runs(&runs);
    let map = align_words(base.chars(), &tokens);

    let mut claimed = 0;
    for (word, token) in tokens.iter().enumerate() {
        let span = map.span_of(word);
        if !span.is_empty() {
            assert_eq!(span.len(), token.surface_form.chars().count());
            claimed += span.len();
        }
    }
    let owned = map.owners().iter().filter(|owner| owner.is_some()).count();
    assert_eq!(claimed, owned);
}

#[test]
fn empty_page_reports_every_word_unmapped() {
    let tokens = words(&["猫", "は", "いる"]);
    let result = compute_word_regions(&[], &tokens, VIEWPORT_HEIGHT);
    assert_eq!(result.direction, Direction::Horizontal);
    assert!(result.regions.is_empty());
    assert_eq!(result.unmapped_count(), tokens.len());
}

#[test]
fn furigana_run_is_left_out_of_alignment() {
    let furigana = GlyphRun::new(
        "とうきょう",
        FontTransform::from_matrix([1.0, 0.0, 0.0, 1.0, 10.0, 85.0]),
        6.0,
    );
    let runs = vec![run("東京", 10.0, 80.0), furigana, run("に行った", 16.0, 80.0)];
    let tokens = words(&["東京", "に", "行った", "とうきょう"]);
    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    assert_eq!(result.unmapped_words, vec![3]);
    assert_eq!(result.regions.len(), 3);
}

#[test]
fn size_ten_run_is_dropped_among_size_twenty_four() {
    let sized = |size: f32| {
        GlyphRun::new(
            "字",
            FontTransform {
                scale_x: size,
                ..FontTransform::default()
            },
            size,
        )
    };
    let mut runs = vec![sized(10.0)];
    runs.extend((0..9).map(|_| sized(24.0)));
    let kept = filter_furigana(&runs);
    assert_eq!(kept.len(), 9);
    assert!(kept.iter().all(|run| font_size(&run.transform) > 15.6));
}

#[test]
fn vertical_columns_are_detected_and_stable() {
    let runs: Vec<GlyphRun> = (0..4)
        .map(|idx| run("縦", 50.0, 90.0 - idx as f32 * 5.0))
        .collect();
    let tokens = words(&["縦"]);
    let first = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    let second = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    assert_eq!(first.direction, Direction::Vertical);
    assert_eq!(first, second);
}

#[test]
fn regions_are_ordered_by_area_and_cover_their_glyphs() {
    let runs = vec![run("東京に行った", 10.0, 80.0), run("大きい猫", 10.0, 60.0)];
    let tokens = words(&["東京", "に", "行った", "大きい", "猫"]);
    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    assert!(result.regions.windows(2).all(|pair| pair[0].area >= pair[1].area));

    let base = BaseText::from_runs(&runs);
    let map = align_words(base.chars(), &tokens);
    let rects = reader_overlay_rust::overlay::build_character_rects(&base, &map, VIEWPORT_HEIGHT);
    for rect in &rects {
        let word = rect.word.expect("every character is owned");
        assert!(result.regions_for(word).any(|region| region.contains(rect)));
    }
}

#[test]
fn empty_surface_and_mismatched_text_produce_no_regions() {
    let runs = vec![run("東京", 10.0, 80.0)];
    let tokens = words(&["", "ＴＯＫＹＯ", "東京"]);
    let result = compute_word_regions(&runs, &tokens, VIEWPORT_HEIGHT);
    assert_eq!(result.unmapped_words, vec![0, 1]);
    assert_eq!(result.regions.len(), 1);
}

#[test]
fn page_of_only_malformed_runs_yields_nothing() {
    let runs = vec![GlyphRun::new(
        "猫",
        FontTransform::from_matrix([f32::INFINITY, 0.0, 0.0, f32::INFINITY, 0.0, 50.0]),
        10.0,
    )];
    let result = compute_word_regions(&runs, &words(&["猫"]), VIEWPORT_HEIGHT);
    assert!(result.regions.is_empty());
    assert_eq!(result.unmapped_words, vec![0]);
}

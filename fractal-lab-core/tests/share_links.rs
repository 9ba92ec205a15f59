use fractal_lab_core::constants::{ANGLE, DEPTH, SCALE};
use fractal_lab_core::{parse_query, FractalParameters, ParameterStore, Rgb};

/// Every value a slider can produce, stepping from `min` the way the UI does.
fn slider_values(min: f64, max: f64, step: f64) -> Vec<f64> {
    let steps = ((max - min) / step).round() as usize;
    (0..=steps).map(|i| min + i as f64 * step).collect()
}

#[test]
fn every_slider_position_survives_a_share_link() {
    let colors = [
        (Rgb::new(0x39, 0xFF, 0x14), Rgb::new(0xFF, 0x45, 0x00)),
        (Rgb::new(0, 0, 0), Rgb::new(0xFF, 0xFF, 0xFF)),
    ];

    for angle in slider_values(ANGLE.min, ANGLE.max, ANGLE.step) {
        for scale in slider_values(SCALE.min, SCALE.max, SCALE.step) {
            let (start, end) = colors[(angle as usize) % colors.len()];
            let depth = DEPTH.min + (scale * 100.0) as u32 % (DEPTH.max - DEPTH.min + 1);

            let mut source = ParameterStore::new();
            source.set_branch_angle(angle);
            source.set_scale_factor(scale);
            source.set_depth(depth);
            source.set_color_start(start);
            source.set_color_end(end);

            let url = source.share_url("https://lab.example/");
            let mut target = ParameterStore::new();
            target.load_from_query(parse_query(&url));
            let got = target.params();

            assert!(
                (got.branch_angle_degrees - angle).abs() < 0.05 + 1e-9,
                "angle {angle} decoded as {}",
                got.branch_angle_degrees
            );
            assert!(
                (got.scale_factor - scale).abs() < 0.005 + 1e-9,
                "scale {scale} decoded as {}",
                got.scale_factor
            );
            assert_eq!(got.depth, depth);
            assert_eq!(got.color_start, start);
            assert_eq!(got.color_end, end);
            assert!(!target.show_introduction());
        }
    }
}

#[test]
fn legacy_lowercase_links_decode() {
    let mut store = ParameterStore::new();
    store.load_from_query(parse_query(
        "https://lab.example/?a=42.5&s=0.61&d=12&c=ff00ff&c2=00ffcc",
    ));
    let p = store.params();
    assert_eq!(
        p,
        FractalParameters::new(
            42.5,
            0.61,
            12,
            Rgb::new(0xFF, 0x00, 0xFF),
            Rgb::new(0x00, 0xFF, 0xCC)
        )
        .unwrap()
    );
    // Re-encoding normalizes case but keeps the values.
    assert_eq!(
        store.to_share_query().to_string(),
        "a=42.5&s=0.61&d=12&c=FF00FF&c2=00FFCC"
    );
}

#[test]
fn garbage_link_changes_nothing() {
    let mut store = ParameterStore::new();
    let applied = store.load_from_query(parse_query("?a=&s=wide&d=1e3&c=%23123456&c2=ggg000"));
    assert_eq!(applied, 0);
    assert_eq!(store.params(), FractalParameters::default());
    assert!(store.show_introduction());
}

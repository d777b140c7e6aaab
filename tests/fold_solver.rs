use kami::{FoldParams, FoldSolver};

fn assert_approximately_equal(left: f32, right: f32, tolerance: f32) {
    assert!(
        (left - right).abs() <= tolerance,
        "expected {left} to be within {tolerance} of {right}"
    );
}

#[test]
fn identical_inputs_produce_bit_identical_outputs() {
    let mut solver = FoldSolver::default();
    let first = solver.solve(0.37, -0.62, 1.0, 1.5);
    let second = solver.solve(0.37, -0.62, 1.0, 1.5);
    assert_eq!(first, second);

    // The vertical-fold case holds its previous apex, which is itself the
    // previous output, so repeats stay bit-identical too.
    let degenerate_first = solver.solve(0.2, 0.0, 1.0, 1.5);
    let degenerate_second = solver.solve(0.2, 0.0, 1.0, 1.5);
    assert_eq!(degenerate_first, degenerate_second);
}

#[test]
fn pointer_at_the_right_edge_reaches_the_page_edge() {
    let mut solver = FoldSolver::default();
    let fold = solver.solve(1.0, -0.4, 1.0, 1.0);
    assert_approximately_equal(fold.finger_tip[0], 0.5, 1e-6);

    // Approaching the edge, the finger tip climbs to width/2 in small
    // steps; the near-edge zone amplifies by 3x at most.
    let mut prev = solver.solve(0.9, -0.4, 1.0, 1.0).finger_tip[0];
    for step in 1..=20 {
        let x = 0.9 + step as f32 * 0.005;
        let xt = solver.solve(x, -0.4, 1.0, 1.0).finger_tip[0];
        assert!(xt >= prev);
        assert!(xt - prev < 0.02, "jump of {} at x = {x}", xt - prev);
        prev = xt;
    }
    assert_approximately_equal(prev, 0.5, 1e-6);
}

#[test]
fn bounds_are_the_page_rectangle_regardless_of_pointer() {
    let mut solver = FoldSolver::default();
    for x in [-1.0f32, -0.3, 0.0, 0.8, 1.0] {
        let fold = solver.solve(x, x / 2.0, 1.0, 1.5);
        assert_eq!(fold.bounds, [-0.5, 0.75, 0.5, -0.75]);
    }
}

// Pinned end-to-end scenario on a unit page with the default parameters
// (turn_point 0.1, fold_delta 0.25, curvature 0.2).
#[test]
fn regression_unit_page_pointer_at_right_edge_lower_half() {
    let mut solver = FoldSolver::new(FoldParams::default());
    let fold = solver.solve(1.0, -0.5, 1.0, 1.0);

    // xt lands exactly on the page edge; yt maps to -0.25.
    assert_approximately_equal(fold.finger_tip[0], 0.5, 1e-6);
    assert_approximately_equal(fold.finger_tip[1], -0.25, 1e-6);

    // dx = -0.05, dy = -0.375 before normalization.
    assert_approximately_equal(fold.direction[0], -0.13216, 1e-4);
    assert_approximately_equal(fold.direction[1], -0.99123, 1e-4);
    let magnitude = (fold.direction[0].powi(2) + fold.direction[1].powi(2)).sqrt();
    assert_approximately_equal(magnitude, 1.0, 1e-5);

    // The fold line traced back from (0.5, -0.25) with slope 7.5 crosses
    // the left edge far below the page.
    assert_approximately_equal(fold.apex[0], -0.5, 1e-6);
    assert_approximately_equal(fold.apex[1], -7.75, 1e-4);

    assert_eq!(fold.bounds, [-0.5, 0.5, 0.5, -0.5]);
}

#[test]
fn left_half_damps_the_curl() {
    let mut solver = FoldSolver::default();
    let fold = solver.solve(-0.6, -0.4, 1.0, 1.0);
    // xt = 0.5 * -0.6 = -0.3, halved by the left-half branch.
    assert_approximately_equal(fold.finger_tip[0], -0.15, 1e-6);
}

#[test]
fn custom_parameters_change_the_response() {
    let params = FoldParams {
        turn_point: 0.2,
        ..FoldParams::default()
    };
    let mut wide = FoldSolver::new(params);
    let mut default = FoldSolver::default();
    // xt = 0.35 sits in the near-edge zone for the wider turn point but in
    // the middle zone for the default, so the responses diverge.
    let a = wide.solve(0.7, -0.4, 1.0, 1.0).finger_tip[0];
    let b = default.solve(0.7, -0.4, 1.0, 1.0).finger_tip[0];
    assert!((a - b).abs() > 1e-3);
}

//! Per-frame fold computation.
//!
//! Given the pointer position in normalized device coordinates, the solver
//! derives everything the shader needs to bend the page: the fold line
//! direction, the apex where the fold line crosses the page's left edge,
//! the mapped finger tip, and the page bounds. The computation is O(1) and
//! runs once per rendered frame on whichever thread owns the render loop.

/// Tunable constants of the curl response.
///
/// These are the named versions of the literals scattered through a typical
/// page-curl implementation, pulled out so that the curl can be tuned and
/// tested without code changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldParams {
    /// Width of the near-edge zone of the horizontal response curve, in
    /// model units. Inside this zone the page lifts three times faster than
    /// the finger moves.
    pub turn_point: f32,
    /// Step used to numerically differentiate the fold-line response curve.
    pub fold_delta: f32,
    /// Curvature constant `k` of the fold-line response curve `f(y) = -k*y^2`.
    pub curvature: f32,
    /// Radius of the cylinder the page rolls around, consumed by the vertex
    /// shader.
    pub curl_radius: f32,
}

impl Default for FoldParams {
    fn default() -> Self {
        Self {
            turn_point: 0.1,
            fold_delta: 0.25,
            curvature: 0.2,
            curl_radius: 0.15,
        }
    }
}

/// The solver's per-frame output, consumed as shader uniforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoldUniforms {
    /// Pointer position mapped to model units and run through the
    /// horizontal response curve.
    pub finger_tip: [f32; 2],
    /// Intersection of the fold line with the page's left edge.
    pub apex: [f32; 2],
    /// Unit direction of the fold line.
    pub direction: [f32; 2],
    /// Page rectangle as `(left, top, right, bottom)`.
    pub bounds: [f32; 4],
}

/// Computes the fold state for each frame.
///
/// The solver is deterministic: identical inputs produce bit-identical
/// outputs. The only state it carries is the previous frame's direction and
/// apex, used as the fallback when the math degenerates (a vertical fold
/// line makes the apex computation divide by zero). Degenerate inputs are
/// clamped to that previous well-defined state instead of failing; the
/// solver never panics and never returns an error.
///
/// # Examples
///
/// ```
/// use kami::FoldSolver;
///
/// let mut solver = FoldSolver::default();
/// let fold = solver.solve(1.0, -0.5, 1.0, 1.0);
/// assert_eq!(fold.apex[0], -0.5);
/// let mag = (fold.direction[0].powi(2) + fold.direction[1].powi(2)).sqrt();
/// assert!((mag - 1.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct FoldSolver {
    params: FoldParams,
    prev_direction: [f32; 2],
    prev_apex_y: f32,
}

impl Default for FoldSolver {
    fn default() -> Self {
        Self::new(FoldParams::default())
    }
}

impl FoldSolver {
    pub fn new(params: FoldParams) -> Self {
        Self {
            params,
            // Seeds for the degenerate-case fallbacks. The direction seed is
            // the straight-down fold a centered pointer produces; the apex
            // seed matches the resting state of the curl.
            prev_direction: [0.0, -1.0],
            prev_apex_y: -0.25,
        }
    }

    pub fn params(&self) -> FoldParams {
        self.params
    }

    /// Computes the fold for a pointer at `(x, y)`, both in `[-1, 1]`
    /// normalized device coordinates, on a page of `width` x `height` model
    /// units. Aspect correction of the pointer is the caller's concern.
    pub fn solve(&mut self, x: f32, y: f32, width: f32, height: f32) -> FoldUniforms {
        // Map the pointer into model units.
        let mut xt = 0.5 * x * width;
        let yt = 0.5 * y * height;

        let right = width / 2.0;
        let turn_point = self.params.turn_point;

        // Three-zone horizontal response: curling inward is damped, the
        // middle runs at half speed, and the page lifts fast near the right
        // edge. The branches are ordered so the left-half check wins.
        if xt < 0.0 {
            xt /= 2.0;
        } else if right - xt < turn_point {
            let p = (right - xt) / turn_point;
            xt = right - p * turn_point * 3.0;
        } else {
            let p = 0.5 * xt / (2.0 * turn_point);
            xt = 2.0 * turn_point * p;
        }

        // Differentiate the fold-line response curve around yt to get the
        // fold inclination. The sign flips in the upper half so the page
        // folds toward the nearer horizontal edge.
        let sig = if yt > 0.0 { -1.0 } else { 1.0 };
        let delta = sig * self.params.fold_delta;
        let dx = sig * (self.fold_line(yt - delta) - self.fold_line(yt + delta));
        let dy = sig * (yt - 0.5 * delta);

        let direction = self.normalize_direction(dx, dy);
        self.prev_direction = direction;

        // The apex is where the fold line, traced back from the finger tip,
        // crosses the left edge of the page.
        let apex_x = -width / 2.0;
        let apex_y = if dx == 0.0 {
            // Vertical fold line; the intersection with the left edge is not
            // defined, so hold the previous frame's apex.
            tracing::debug!(yt, "vertical fold line, keeping previous apex");
            self.prev_apex_y
        } else {
            (dy / dx) * (apex_x - xt) + yt
        };
        self.prev_apex_y = apex_y;

        FoldUniforms {
            finger_tip: [xt, yt],
            apex: [apex_x, apex_y],
            direction,
            bounds: [-width / 2.0, height / 2.0, width / 2.0, -height / 2.0],
        }
    }

    /// The fold-line response curve `f(y) = -k*y^2`.
    fn fold_line(&self, y: f32) -> f32 {
        -self.params.curvature * y * y
    }

    fn normalize_direction(&self, dx: f32, dy: f32) -> [f32; 2] {
        let mag = (dx * dx + dy * dy).sqrt();
        if mag == 0.0 || !mag.is_finite() {
            tracing::warn!(dx, dy, "degenerate fold direction, keeping previous");
            return self.prev_direction;
        }
        [dx / mag, dy / mag]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn magnitude(v: [f32; 2]) -> f32 {
        (v[0] * v[0] + v[1] * v[1]).sqrt()
    }

    #[test]
    fn centered_pointer_folds_straight_down() {
        let mut solver = FoldSolver::default();
        let fold = solver.solve(0.0, 0.0, 1.0, 1.0);
        // f(yt - d) == f(yt + d) at yt = 0, so dx is exactly zero and the
        // fold line is vertical; the apex falls back to its seed value.
        assert_eq!(fold.direction, [0.0, -1.0]);
        assert_eq!(fold.apex, [-0.5, -0.25]);
    }

    #[test]
    fn response_curve_is_continuous_at_zone_boundaries() {
        // The zone edges sit at xt = 0 and xt = right - turn_point. With a
        // unit page those map back to pointer x = 0 and x = 0.8.
        for boundary in [0.0f32, 0.8] {
            let eps = 1e-4;
            let below = FoldSolver::default()
                .solve(boundary - eps, -0.3, 1.0, 1.0)
                .finger_tip[0];
            let above = FoldSolver::default()
                .solve(boundary + eps, -0.3, 1.0, 1.0)
                .finger_tip[0];
            assert!(
                (above - below).abs() < 1e-2,
                "jump of {} at boundary {}",
                (above - below).abs(),
                boundary
            );
        }
    }

    #[test]
    fn response_curve_is_monotonic_across_the_sweep() {
        let mut solver = FoldSolver::default();
        let mut prev = f32::NEG_INFINITY;
        for step in 0..=200 {
            let x = -1.0 + step as f32 / 100.0;
            let xt = solver.solve(x, -0.4, 1.0, 1.0).finger_tip[0];
            assert!(xt >= prev - 1e-6, "xt regressed at x = {x}");
            prev = xt;
        }
    }

    #[test]
    fn direction_is_always_unit_length() {
        let mut solver = FoldSolver::default();
        for xi in -10..=10 {
            for yi in -10..=10 {
                let fold = solver.solve(xi as f32 / 10.0, yi as f32 / 10.0, 1.0, 1.5);
                let mag = magnitude(fold.direction);
                assert!((mag - 1.0).abs() < 1e-5, "|direction| = {mag}");
            }
        }
    }

    #[test]
    fn zero_direction_falls_back_to_the_previous_frame() {
        let mut solver = FoldSolver::default();
        let first = solver.solve(0.3, -0.6, 1.0, 1.0);
        assert_eq!(solver.normalize_direction(0.0, 0.0), first.direction);
        assert_eq!(solver.normalize_direction(f32::NAN, 0.0), first.direction);
    }
}

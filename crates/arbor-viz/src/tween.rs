//! Transition interpolation, decoupled from event handling.
//!
//! A [`Tween`] is a pure function of progress: the layout decides start and
//! end states, a timer elsewhere decides elapsed time, and nothing about
//! correctness depends on an animation finishing. A later layout write simply
//! supersedes an in-flight interpolation.

/// Fixed duration for node movement and enter/exit fades.
pub const TRANSITION_MS: u64 = 400;

pub type EasingFn = fn(f32) -> f32;

pub fn linear(t: f32) -> f32 {
    t
}

/// Cubic ease-in-out, the default feel for node movement.
pub fn ease_in_out(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = 2.0 * t - 2.0;
        1.0 + u * u * u / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Straight-line interpolation between two layout positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tween {
    pub from: Point,
    pub to: Point,
}

impl Tween {
    pub fn new(from: Point, to: Point) -> Self {
        Tween { from, to }
    }

    /// Position at `progress` in `[0, 1]`; values outside the range clamp to
    /// the endpoints.
    pub fn at(&self, progress: f32) -> Point {
        let t = progress.clamp(0.0, 1.0) as f64;
        Point {
            x: self.from.x + (self.to.x - self.from.x) * t,
            y: self.from.y + (self.to.y - self.from.y) * t,
        }
    }

    pub fn at_eased(&self, progress: f32, easing: EasingFn) -> Point {
        self.at(easing(progress.clamp(0.0, 1.0)))
    }
}

/// Normalized progress for an elapsed time against a fixed duration.
pub fn progress(elapsed_ms: u64, duration_ms: u64) -> f32 {
    if duration_ms == 0 {
        return 1.0;
    }
    (elapsed_ms as f32 / duration_ms as f32).min(1.0)
}

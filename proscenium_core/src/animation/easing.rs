// Copyright 2026 the Proscenium Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Progress modes.
//!
//! An [`AnimationMode`] maps linear timeline progress in `[0, 1]` onto eased
//! progress. Overshooting modes (elastic, back) may leave `[0, 1]`
//! transiently but always end on exactly `0.0` and `1.0`.

use core::f64::consts::{FRAC_PI_2, PI};

/// Whether a step function jumps at the start or the end of each step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepPosition {
    /// Jump at the start of each interval.
    Start,
    /// Jump at the end of each interval.
    End,
}

/// An easing curve.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum AnimationMode {
    /// Constant speed.
    #[default]
    Linear,
    /// Quadratic, accelerating.
    EaseInQuad,
    /// Quadratic, decelerating.
    EaseOutQuad,
    /// Quadratic, accelerating then decelerating.
    EaseInOutQuad,
    /// Cubic, accelerating.
    EaseInCubic,
    /// Cubic, decelerating. The default for pushed easing states.
    EaseOutCubic,
    /// Cubic, accelerating then decelerating.
    EaseInOutCubic,
    /// Quartic, accelerating.
    EaseInQuart,
    /// Quartic, decelerating.
    EaseOutQuart,
    /// Quartic, accelerating then decelerating.
    EaseInOutQuart,
    /// Quintic, accelerating.
    EaseInQuint,
    /// Quintic, decelerating.
    EaseOutQuint,
    /// Quintic, accelerating then decelerating.
    EaseInOutQuint,
    /// Sinusoidal, accelerating.
    EaseInSine,
    /// Sinusoidal, decelerating.
    EaseOutSine,
    /// Sinusoidal, accelerating then decelerating.
    EaseInOutSine,
    /// Exponential, accelerating.
    EaseInExpo,
    /// Exponential, decelerating.
    EaseOutExpo,
    /// Exponential, accelerating then decelerating.
    EaseInOutExpo,
    /// Circular, accelerating.
    EaseInCirc,
    /// Circular, decelerating.
    EaseOutCirc,
    /// Circular, accelerating then decelerating.
    EaseInOutCirc,
    /// Damped sine wave, accelerating.
    EaseInElastic,
    /// Damped sine wave, decelerating.
    EaseOutElastic,
    /// Damped sine wave on both ends.
    EaseInOutElastic,
    /// Overshooting cubic, accelerating.
    EaseInBack,
    /// Overshooting cubic, decelerating.
    EaseOutBack,
    /// Overshooting cubic on both ends.
    EaseInOutBack,
    /// Bouncing, accelerating.
    EaseInBounce,
    /// Bouncing, decelerating.
    EaseOutBounce,
    /// Bouncing on both ends.
    EaseInOutBounce,
    /// A staircase with `steps` equal steps.
    Steps {
        /// Number of steps, at least one.
        steps: u32,
        /// Where each jump happens.
        position: StepPosition,
    },
    /// `cubic-bezier(0.25, 0.1, 0.25, 1.0)`.
    Ease,
    /// `cubic-bezier(0.42, 0.0, 1.0, 1.0)`.
    EaseIn,
    /// `cubic-bezier(0.0, 0.0, 0.58, 1.0)`.
    EaseOut,
    /// `cubic-bezier(0.42, 0.0, 0.58, 1.0)`.
    EaseInOut,
    /// A cubic Bézier through `(0, 0)`, the two control points and `(1, 1)`.
    CubicBezier {
        /// First control point X, in `[0, 1]`.
        x1: f64,
        /// First control point Y.
        y1: f64,
        /// Second control point X, in `[0, 1]`.
        x2: f64,
        /// Second control point Y.
        y2: f64,
    },
}

impl AnimationMode {
    /// Applies the curve to linear progress `t`, clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseInCubic => t.powi(3),
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t.powi(3)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Self::EaseInQuart => t.powi(4),
            Self::EaseOutQuart => 1.0 - (1.0 - t).powi(4),
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t.powi(4)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
                }
            }
            Self::EaseInQuint => t.powi(5),
            Self::EaseOutQuint => 1.0 - (1.0 - t).powi(5),
            Self::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t.powi(5)
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(5) / 2.0
                }
            }
            Self::EaseInSine => 1.0 - (t * FRAC_PI_2).cos(),
            Self::EaseOutSine => (t * FRAC_PI_2).sin(),
            Self::EaseInOutSine => -((PI * t).cos() - 1.0) / 2.0,
            Self::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    2f64.powf(10.0 * t - 10.0)
                }
            }
            Self::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::EaseInOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    2f64.powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - 2f64.powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::EaseOutCirc => (1.0 - (t - 1.0).powi(2)).sqrt(),
            Self::EaseInOutCirc => {
                if t < 0.5 {
                    (1.0 - (1.0 - (2.0 * t).powi(2)).sqrt()) / 2.0
                } else {
                    ((1.0 - (-2.0 * t + 2.0).powi(2)).sqrt() + 1.0) / 2.0
                }
            }
            Self::EaseInElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (p, s) = (0.3, 0.075);
                let q = t - 1.0;
                -(2f64.powf(10.0 * q) * ((q - s) * (2.0 * PI) / p).sin())
            }
            Self::EaseOutElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let (p, s) = (0.3, 0.075);
                2f64.powf(-10.0 * t) * ((t - s) * (2.0 * PI) / p).sin() + 1.0
            }
            Self::EaseInOutElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let p = 0.3 * 1.5;
                let s = p / 4.0;
                let q = t * 2.0 - 1.0;
                if q < 0.0 {
                    -0.5 * (2f64.powf(10.0 * q) * ((q - s) * (2.0 * PI) / p).sin())
                } else {
                    2f64.powf(-10.0 * q) * ((q - s) * (2.0 * PI) / p).sin() * 0.5 + 1.0
                }
            }
            Self::EaseInBack => {
                let s = 1.70158;
                t * t * ((s + 1.0) * t - s)
            }
            Self::EaseOutBack => {
                let s = 1.70158;
                let q = t - 1.0;
                q * q * ((s + 1.0) * q + s) + 1.0
            }
            Self::EaseInOutBack => {
                let s = 1.70158 * 1.525;
                let q = t * 2.0;
                if q < 1.0 {
                    0.5 * (q * q * ((s + 1.0) * q - s))
                } else {
                    let q = q - 2.0;
                    0.5 * (q * q * ((s + 1.0) * q + s) + 2.0)
                }
            }
            Self::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Self::EaseOutBounce => bounce_out(t),
            Self::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - 2.0 * t)) / 2.0
                } else {
                    (1.0 + bounce_out(2.0 * t - 1.0)) / 2.0
                }
            }
            Self::Steps { steps, position } => {
                let n = f64::from(steps.max(1));
                match position {
                    StepPosition::Start => (t * n).ceil() / n,
                    StepPosition::End => (t * n).floor() / n,
                }
            }
            Self::Ease => cubic_bezier(t, 0.25, 0.1, 0.25, 1.0),
            Self::EaseIn => cubic_bezier(t, 0.42, 0.0, 1.0, 1.0),
            Self::EaseOut => cubic_bezier(t, 0.0, 0.0, 0.58, 1.0),
            Self::EaseInOut => cubic_bezier(t, 0.42, 0.0, 0.58, 1.0),
            Self::CubicBezier { x1, y1, x2, y2 } => cubic_bezier(t, x1, y1, x2, y2),
        }
    }

    /// Looks a mode up by its kebab-case name, e.g. `"ease-out-cubic"` or
    /// `"steps-start"` (a single step).
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "linear" => Self::Linear,
            "ease-in-quad" => Self::EaseInQuad,
            "ease-out-quad" => Self::EaseOutQuad,
            "ease-in-out-quad" => Self::EaseInOutQuad,
            "ease-in-cubic" => Self::EaseInCubic,
            "ease-out-cubic" => Self::EaseOutCubic,
            "ease-in-out-cubic" => Self::EaseInOutCubic,
            "ease-in-quart" => Self::EaseInQuart,
            "ease-out-quart" => Self::EaseOutQuart,
            "ease-in-out-quart" => Self::EaseInOutQuart,
            "ease-in-quint" => Self::EaseInQuint,
            "ease-out-quint" => Self::EaseOutQuint,
            "ease-in-out-quint" => Self::EaseInOutQuint,
            "ease-in-sine" => Self::EaseInSine,
            "ease-out-sine" => Self::EaseOutSine,
            "ease-in-out-sine" => Self::EaseInOutSine,
            "ease-in-expo" => Self::EaseInExpo,
            "ease-out-expo" => Self::EaseOutExpo,
            "ease-in-out-expo" => Self::EaseInOutExpo,
            "ease-in-circ" => Self::EaseInCirc,
            "ease-out-circ" => Self::EaseOutCirc,
            "ease-in-out-circ" => Self::EaseInOutCirc,
            "ease-in-elastic" => Self::EaseInElastic,
            "ease-out-elastic" => Self::EaseOutElastic,
            "ease-in-out-elastic" => Self::EaseInOutElastic,
            "ease-in-back" => Self::EaseInBack,
            "ease-out-back" => Self::EaseOutBack,
            "ease-in-out-back" => Self::EaseInOutBack,
            "ease-in-bounce" => Self::EaseInBounce,
            "ease-out-bounce" => Self::EaseOutBounce,
            "ease-in-out-bounce" => Self::EaseInOutBounce,
            "steps-start" => Self::Steps {
                steps: 1,
                position: StepPosition::Start,
            },
            "steps-end" => Self::Steps {
                steps: 1,
                position: StepPosition::End,
            },
            "ease" => Self::Ease,
            "ease-in" => Self::EaseIn,
            "ease-out" => Self::EaseOut,
            "ease-in-out" => Self::EaseInOut,
            _ => return None,
        })
    }
}

fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;
    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984_375
    }
}

/// Evaluates a unit cubic Bézier at horizontal position `x`.
///
/// Solves for the curve parameter with Newton's method and falls back to
/// bisection when the slope is too flat.
fn cubic_bezier(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 || x >= 1.0 {
        return x;
    }

    let cx = 3.0 * x1;
    let bx = 3.0 * (x2 - x1) - cx;
    let ax = 1.0 - cx - bx;
    let cy = 3.0 * y1;
    let by = 3.0 * (y2 - y1) - cy;
    let ay = 1.0 - cy - by;

    let sample_x = |t: f64| ((ax * t + bx) * t + cx) * t;
    let sample_dx = |t: f64| (3.0 * ax * t + 2.0 * bx) * t + cx;
    let sample_y = |t: f64| ((ay * t + by) * t + cy) * t;

    const EPSILON: f64 = 1e-7;

    let mut t = x;
    for _ in 0..8 {
        let err = sample_x(t) - x;
        if err.abs() < EPSILON {
            return sample_y(t);
        }
        let d = sample_dx(t);
        if d.abs() < 1e-6 {
            break;
        }
        t -= err / d;
    }

    let (mut lo, mut hi) = (0.0_f64, 1.0_f64);
    t = x;
    while lo < hi {
        let v = sample_x(t);
        if (v - x).abs() < EPSILON {
            break;
        }
        if x > v {
            lo = t;
        } else {
            hi = t;
        }
        let next = (hi - lo) / 2.0 + lo;
        if next == t {
            break;
        }
        t = next;
    }
    sample_y(t)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_CURVES: &[AnimationMode] = &[
        AnimationMode::Linear,
        AnimationMode::EaseInQuad,
        AnimationMode::EaseOutQuad,
        AnimationMode::EaseInOutQuad,
        AnimationMode::EaseInCubic,
        AnimationMode::EaseOutCubic,
        AnimationMode::EaseInOutCubic,
        AnimationMode::EaseInQuart,
        AnimationMode::EaseOutQuart,
        AnimationMode::EaseInOutQuart,
        AnimationMode::EaseInQuint,
        AnimationMode::EaseOutQuint,
        AnimationMode::EaseInOutQuint,
        AnimationMode::EaseInSine,
        AnimationMode::EaseOutSine,
        AnimationMode::EaseInOutSine,
        AnimationMode::EaseInExpo,
        AnimationMode::EaseOutExpo,
        AnimationMode::EaseInOutExpo,
        AnimationMode::EaseInCirc,
        AnimationMode::EaseOutCirc,
        AnimationMode::EaseInOutCirc,
        AnimationMode::EaseInElastic,
        AnimationMode::EaseOutElastic,
        AnimationMode::EaseInOutElastic,
        AnimationMode::EaseInBack,
        AnimationMode::EaseOutBack,
        AnimationMode::EaseInOutBack,
        AnimationMode::EaseInBounce,
        AnimationMode::EaseOutBounce,
        AnimationMode::EaseInOutBounce,
        AnimationMode::Ease,
        AnimationMode::EaseIn,
        AnimationMode::EaseOut,
        AnimationMode::EaseInOut,
    ];

    #[test]
    fn endpoints_are_stable() {
        for &mode in ALL_CURVES {
            assert!(mode.apply(0.0).abs() < 1e-9, "{mode:?} at 0");
            assert!((mode.apply(1.0) - 1.0).abs() < 1e-9, "{mode:?} at 1");
        }
    }

    #[test]
    fn monotonic_spot_check() {
        for mode in [
            AnimationMode::Linear,
            AnimationMode::EaseInQuad,
            AnimationMode::EaseOutCubic,
            AnimationMode::EaseInOutSine,
            AnimationMode::EaseOutExpo,
            AnimationMode::Ease,
            AnimationMode::EaseInOut,
        ] {
            let a = mode.apply(0.25);
            let b = mode.apply(0.5);
            let c = mode.apply(0.75);
            assert!(a < b, "{mode:?}");
            assert!(b < c, "{mode:?}");
        }
    }

    #[test]
    fn bezier_matches_linear_when_control_points_lie_on_diagonal() {
        let m = AnimationMode::CubicBezier {
            x1: 0.25,
            y1: 0.25,
            x2: 0.75,
            y2: 0.75,
        };
        for t in [0.1, 0.3, 0.5, 0.9] {
            assert!((m.apply(t) - t).abs() < 1e-5, "{t}");
        }
    }

    #[test]
    fn ease_in_out_is_symmetric() {
        let m = AnimationMode::EaseInOut;
        assert!((m.apply(0.5) - 0.5).abs() < 1e-5);
        assert!((m.apply(0.2) + m.apply(0.8) - 1.0).abs() < 1e-5);
    }

    #[test]
    fn steps() {
        let end = AnimationMode::Steps {
            steps: 4,
            position: StepPosition::End,
        };
        let start = AnimationMode::Steps {
            steps: 4,
            position: StepPosition::Start,
        };
        assert_eq!(end.apply(0.3), 0.25);
        assert_eq!(start.apply(0.3), 0.5);
        assert_eq!(end.apply(1.0), 1.0);
        assert_eq!(start.apply(0.0), 0.0);
    }

    #[test]
    fn back_overshoots() {
        assert!(AnimationMode::EaseInBack.apply(0.2) < 0.0);
        assert!(AnimationMode::EaseOutBack.apply(0.8) > 1.0);
    }

    #[test]
    fn names() {
        assert_eq!(
            AnimationMode::from_name("ease-out-cubic"),
            Some(AnimationMode::EaseOutCubic)
        );
        assert_eq!(AnimationMode::from_name("wobble"), None);
    }
}

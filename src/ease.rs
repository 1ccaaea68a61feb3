use std::f64::consts::PI;

/// Easing curve applied to a normalized elapsed fraction.
///
/// `OutElastic` and `OutBack` overshoot 1.0 mid-curve but settle exactly at
/// the endpoints; everything else stays inside `[0,1]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    OutQuart,
    InOutExpo,
    OutElastic { amplitude: f64, period: f64 },
    OutBack { overshoot: f64 },
}

impl Ease {
    /// The release curve used for snap-back resets: `elastic.out(1, 0.4)`.
    pub const SNAP_BACK: Self = Self::OutElastic {
        amplitude: 1.0,
        period: 0.4,
    };

    /// The spin-in curve used for glyph rotation: `back.out(1.7)`.
    pub const SPIN_IN: Self = Self::OutBack { overshoot: 1.7 };

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::InQuad => t * t,
            Self::OutQuad => 1.0 - (1.0 - t) * (1.0 - t),
            Self::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(2) / 2.0)
                }
            }
            Self::InCubic => t * t * t,
            Self::OutCubic => 1.0 - (1.0 - t).powi(3),
            Self::InOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - ((-2.0 * t + 2.0).powi(3) / 2.0)
                }
            }
            Self::OutQuart => 1.0 - (1.0 - t).powi(4),
            Self::InOutExpo => {
                if t == 0.0 || t == 1.0 {
                    t
                } else if t < 0.5 {
                    (2.0f64).powf(20.0 * t - 10.0) / 2.0
                } else {
                    (2.0 - (2.0f64).powf(-20.0 * t + 10.0)) / 2.0
                }
            }
            Self::OutElastic { amplitude, period } => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let amp = amplitude.max(1.0);
                let period = period.max(1e-6);
                // Phase shift keeps the curve anchored at apply(1) == 1.
                let s = period / (2.0 * PI) * (1.0 / amp).asin();
                amp * (2.0f64).powf(-10.0 * t) * ((t - s) * 2.0 * PI / period).sin() + 1.0
            }
            Self::OutBack { overshoot } => {
                let c1 = overshoot;
                let c3 = c1 + 1.0;
                let u = t - 1.0;
                1.0 + c3 * u.powi(3) + c1 * u.powi(2)
            }
        }
    }
}

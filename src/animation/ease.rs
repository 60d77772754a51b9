/// Easing curves applied to camera travel segments.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Ease {
    /// Constant-velocity interpolation.
    Linear,
    /// Cubic ease-in-out `t² · (3 − 2t)` with zero first derivative at
    /// both ends, so travel starts and stops without a velocity jump.
    Smoothstep,
}

impl Ease {
    /// Apply the curve to a progress value; input is clamped to `[0, 1]`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Smoothstep => t * t * (3.0 - 2.0 * t),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;

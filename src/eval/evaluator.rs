use crate::{
    animation::ease::Ease,
    foundation::core::Point,
    timeline::model::{Keyframe, Timeline},
};

/// Instantaneous interpolated camera pose.
///
/// Recomputed per query from the timeline, never persisted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    /// Zoom factor.
    pub zoom: f64,
    /// Camera center in source coordinates.
    pub center: Point,
}

impl From<&Keyframe> for CameraState {
    fn from(k: &Keyframe) -> Self {
        Self {
            zoom: k.zoom,
            center: k.center,
        }
    }
}

/// Interpolated camera state at `secs`.
///
/// Scans consecutive keyframe pairs and eases with smoothstep inside the
/// first pair whose span contains `secs` (first pair wins at shared
/// boundaries). A zero-length segment returns its end pose directly, so
/// jump-cut schedules never divide by zero. Queries past the last keyframe
/// clamp to the final pose rather than extrapolating; the result is
/// continuous across segment boundaries.
pub fn camera_at(timeline: &Timeline, secs: f64) -> CameraState {
    let keys = &timeline.keyframes;
    let Some(first) = keys.first() else {
        return CameraState {
            zoom: 1.0,
            center: Point::ZERO,
        };
    };
    if secs <= first.secs {
        return CameraState::from(first);
    }

    for pair in keys.windows(2) {
        let (k1, k2) = (&pair[0], &pair[1]);
        if !(k1.secs <= secs && secs <= k2.secs) {
            continue;
        }
        if k2.secs == k1.secs {
            return CameraState::from(k2);
        }
        let progress = (secs - k1.secs) / (k2.secs - k1.secs);
        let eased = Ease::Smoothstep.apply(progress);
        return CameraState {
            zoom: lerp(k1.zoom, k2.zoom, eased),
            center: Point::new(
                lerp(k1.center.x, k2.center.x, eased),
                lerp(k1.center.y, k2.center.y, eased),
            ),
        };
    }

    CameraState::from(keys.last().unwrap_or(first))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
#[path = "../../tests/unit/eval/evaluator.rs"]
mod tests;

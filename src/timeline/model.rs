use crate::foundation::core::Point;
use crate::foundation::error::{PanreelError, PanreelResult};

/// Role of a keyframe within the camera schedule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum KeyframeKind {
    /// Opening overview pose at `t = 0`.
    Intro,
    /// Overview pose at the end of the intro hold.
    IntroEnd,
    /// Arrival pose at a snippet (end of travel).
    SnippetTravel,
    /// Same snippet pose at the end of its hold.
    SnippetHold,
    /// Arrival pose at an overlay target.
    OverlayTravel,
    /// Same overlay pose at the end of its hold.
    OverlayHold,
    /// Closing overview pose; always the last keyframe.
    Outro,
}

/// A timestamped camera pose used as an interpolation anchor.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Absolute time in seconds from the start of the clip.
    pub secs: f64,
    /// Zoom factor; 1.0 shows the whole image.
    pub zoom: f64,
    /// Camera center in source-image coordinates.
    pub center: Point,
    /// Keyframe role.
    pub kind: KeyframeKind,
}

/// An ordered camera keyframe sequence.
///
/// Built once per render by [`build_timeline`](crate::build_timeline) and
/// immutable afterwards. Times are non-decreasing; the sequence begins and
/// ends at `zoom = 1.0` over the image center.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Keyframes in schedule order.
    pub keyframes: Vec<Keyframe>,
}

impl Timeline {
    /// Total clip duration in seconds (time of the last keyframe).
    pub fn duration_secs(&self) -> f64 {
        self.keyframes.last().map_or(0.0, |k| k.secs)
    }

    /// Check ordering and overview invariants.
    pub fn validate(&self) -> PanreelResult<()> {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return Err(PanreelError::EmptyTimeline);
        };
        if !self.keyframes.windows(2).all(|w| w[0].secs <= w[1].secs) {
            return Err(PanreelError::validation(
                "timeline keyframe times must be non-decreasing",
            ));
        }
        if first.kind != KeyframeKind::Intro || last.kind != KeyframeKind::Outro {
            return Err(PanreelError::validation(
                "timeline must begin with an intro keyframe and end with an outro keyframe",
            ));
        }
        if first.zoom != 1.0 || last.zoom != 1.0 {
            return Err(PanreelError::validation(
                "timeline must begin and end at zoom 1.0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/model.rs"]
mod tests;

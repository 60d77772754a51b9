use std::path::PathBuf;

use crate::{
    assets::store::PreparedSnippet,
    compose::overlay::OverlayTarget,
    composition::model::MotionSettings,
    foundation::error::PanreelResult,
    timeline::builder::{self, TimelineEvent},
};

/// A narration clip pinned to an absolute start time on the clip timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduledAudio {
    /// Audio clip file.
    pub source: PathBuf,
    /// Absolute start time in seconds (the start of the target hold).
    pub start_secs: f64,
    /// Clip duration in seconds.
    pub duration_secs: f64,
}

/// Assign each narration clip its absolute start time.
///
/// This is a filter over the same walk (and therefore the same running
/// clock) as [`build_timeline`](crate::build_timeline), so audio placement
/// cannot drift from the camera schedule. Targets without narration
/// contribute no entry.
pub fn schedule_audio(
    snippets: &[PreparedSnippet],
    overlay_targets: &[OverlayTarget],
    settings: &MotionSettings,
    image_w: u32,
    image_h: u32,
) -> PanreelResult<Vec<ScheduledAudio>> {
    Ok(
        builder::walk_timeline(snippets, overlay_targets, settings, image_w, image_h)?
            .into_iter()
            .filter_map(|event| match event {
                TimelineEvent::Audio(audio) => Some(audio),
                TimelineEvent::Keyframe(_) => None,
            })
            .collect(),
    )
}

#[cfg(test)]
#[path = "../../tests/unit/audio/schedule.rs"]
mod tests;

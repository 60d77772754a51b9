use crate::{
    assets::store::{NarrationClip, PreparedSnippet},
    audio::schedule::ScheduledAudio,
    camera::solver::zoom_to_fit,
    compose::overlay::OverlayTarget,
    composition::model::MotionSettings,
    foundation::core::{Point, Region},
    foundation::error::{PanreelError, PanreelResult},
    timeline::model::{Keyframe, KeyframeKind, Timeline},
};

/// One event produced by the timeline walk.
///
/// Keyframes and scheduled audio come out of a single running clock, so
/// the camera schedule and the audio schedule cannot drift apart.
#[derive(Clone, Debug)]
pub enum TimelineEvent {
    /// A camera keyframe.
    Keyframe(Keyframe),
    /// A narration clip placed at the start of its target's hold.
    Audio(ScheduledAudio),
}

/// Walk intro -> snippets -> overlay targets -> outro once, emitting camera
/// keyframes and narration placements from one running clock.
///
/// Each target contributes a travel segment followed by a hold of
/// `max(narration_duration, hold_floor_secs)`; narration is never
/// truncated. Fails with [`PanreelError::EmptyTimeline`] when there are no
/// snippets; overlays alone cannot start a render.
#[tracing::instrument(skip_all, fields(snippets = snippets.len(), overlays = overlay_targets.len()))]
pub fn walk_timeline(
    snippets: &[PreparedSnippet],
    overlay_targets: &[OverlayTarget],
    settings: &MotionSettings,
    image_w: u32,
    image_h: u32,
) -> PanreelResult<Vec<TimelineEvent>> {
    if snippets.is_empty() {
        return Err(PanreelError::EmptyTimeline);
    }

    let (intro_secs, travel_secs, outro_secs) = settings.effective_durations();
    let overview = Point::new(f64::from(image_w) / 2.0, f64::from(image_h) / 2.0);
    let mut events = Vec::new();
    let mut clock = 0.0f64;

    events.push(TimelineEvent::Keyframe(Keyframe {
        secs: clock,
        zoom: 1.0,
        center: overview,
        kind: KeyframeKind::Intro,
    }));
    clock += intro_secs;
    events.push(TimelineEvent::Keyframe(Keyframe {
        secs: clock,
        zoom: 1.0,
        center: overview,
        kind: KeyframeKind::IntroEnd,
    }));

    for snippet in snippets {
        clock = visit_target(
            &mut events,
            clock,
            snippet.region,
            snippet.narration.as_ref(),
            settings.snippet_padding,
            travel_secs,
            settings,
            image_w,
            image_h,
            KeyframeKind::SnippetTravel,
            KeyframeKind::SnippetHold,
        )?;
    }
    for target in overlay_targets {
        clock = visit_target(
            &mut events,
            clock,
            target.region,
            target.narration.as_ref(),
            settings.overlay_padding,
            travel_secs,
            settings,
            image_w,
            image_h,
            KeyframeKind::OverlayTravel,
            KeyframeKind::OverlayHold,
        )?;
    }

    clock += outro_secs;
    events.push(TimelineEvent::Keyframe(Keyframe {
        secs: clock,
        zoom: 1.0,
        center: overview,
        kind: KeyframeKind::Outro,
    }));

    Ok(events)
}

#[allow(clippy::too_many_arguments)]
fn visit_target(
    events: &mut Vec<TimelineEvent>,
    mut clock: f64,
    region: Region,
    narration: Option<&NarrationClip>,
    padding: f64,
    travel_secs: f64,
    settings: &MotionSettings,
    image_w: u32,
    image_h: u32,
    travel_kind: KeyframeKind,
    hold_kind: KeyframeKind,
) -> PanreelResult<f64> {
    let zoom = zoom_to_fit(
        region,
        image_w,
        image_h,
        padding,
        settings.min_zoom,
        settings.max_zoom,
    )?;
    let center = region.center();

    clock += travel_secs;
    events.push(TimelineEvent::Keyframe(Keyframe {
        secs: clock,
        zoom,
        center,
        kind: travel_kind,
    }));

    if let Some(clip) = narration {
        events.push(TimelineEvent::Audio(ScheduledAudio {
            source: clip.path.clone(),
            start_secs: clock,
            duration_secs: clip.duration_secs,
        }));
    }

    let narration_secs = narration.map_or(0.0, |clip| clip.duration_secs);
    clock += narration_secs.max(settings.hold_floor_secs);
    events.push(TimelineEvent::Keyframe(Keyframe {
        secs: clock,
        zoom,
        center,
        kind: hold_kind,
    }));

    Ok(clock)
}

/// Build the camera timeline (keyframes only) from a walk.
pub fn build_timeline(
    snippets: &[PreparedSnippet],
    overlay_targets: &[OverlayTarget],
    settings: &MotionSettings,
    image_w: u32,
    image_h: u32,
) -> PanreelResult<Timeline> {
    let keyframes = walk_timeline(snippets, overlay_targets, settings, image_w, image_h)?
        .into_iter()
        .filter_map(|event| match event {
            TimelineEvent::Keyframe(k) => Some(k),
            TimelineEvent::Audio(_) => None,
        })
        .collect();
    Ok(Timeline { keyframes })
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/builder.rs"]
mod tests;

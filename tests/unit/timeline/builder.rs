use std::path::PathBuf;
use std::sync::Arc;

use super::*;
use crate::assets::store::PreparedImage;

fn snippet(x: u32, y: u32, w: u32, h: u32, narration_secs: Option<f64>) -> PreparedSnippet {
    PreparedSnippet {
        region: Region {
            x,
            y,
            width: w,
            height: h,
        },
        narration: narration_secs.map(|duration_secs| NarrationClip {
            path: PathBuf::from("clip.mp3"),
            duration_secs,
        }),
    }
}

fn overlay_target(x: u32, y: u32, w: u32, h: u32, narration_secs: Option<f64>) -> OverlayTarget {
    OverlayTarget {
        region: Region {
            x,
            y,
            width: w,
            height: h,
        },
        pixels: PreparedImage {
            width: w,
            height: h,
            rgba8: Arc::new(vec![0u8; w as usize * h as usize * 4]),
        },
        narration: narration_secs.map(|duration_secs| NarrationClip {
            path: PathBuf::from("overlay.mp3"),
            duration_secs,
        }),
        persistent: false,
    }
}

#[test]
fn worked_example_schedule() {
    // One 200x150 snippet with 4s narration on a 1920x1080 image and stock
    // pacing: travel arrives at 5s, hold runs to 9s, total 11s, zoom
    // clamps at 4.0.
    let timeline = build_timeline(
        &[snippet(100, 100, 200, 150, Some(4.0))],
        &[],
        &MotionSettings::default(),
        1920,
        1080,
    )
    .unwrap();

    let kinds: Vec<KeyframeKind> = timeline.keyframes.iter().map(|k| k.kind).collect();
    assert_eq!(
        kinds,
        vec![
            KeyframeKind::Intro,
            KeyframeKind::IntroEnd,
            KeyframeKind::SnippetTravel,
            KeyframeKind::SnippetHold,
            KeyframeKind::Outro,
        ]
    );
    assert_eq!(timeline.keyframes[2].secs, 5.0);
    assert_eq!(timeline.keyframes[2].zoom, 4.0);
    assert_eq!(timeline.keyframes[2].center, Point::new(200.0, 175.0));
    assert_eq!(timeline.keyframes[3].secs, 9.0);
    assert!((timeline.duration_secs() - 11.0).abs() < 1e-9);
    timeline.validate().unwrap();
}

#[test]
fn duration_is_sum_of_segments() {
    let snippets = [
        snippet(0, 0, 100, 100, Some(2.5)),
        snippet(50, 50, 400, 400, None),
    ];
    let targets = [overlay_target(200, 200, 120, 90, Some(0.4))];
    let timeline = build_timeline(&snippets, &targets, &MotionSettings::default(), 1000, 1000)
        .unwrap();

    // intro + (travel + hold) per target + outro; short narration holds
    // sit on the floor.
    let expected = 2.0 + (3.0 + 2.5) + (3.0 + 1.0) + (3.0 + 1.0) + 2.0;
    assert!((timeline.duration_secs() - expected).abs() < 1e-9);
}

#[test]
fn zero_snippets_refuse_even_with_overlays() {
    let targets = [overlay_target(10, 10, 20, 20, Some(3.0))];
    assert!(matches!(
        build_timeline(&[], &targets, &MotionSettings::default(), 100, 100),
        Err(PanreelError::EmptyTimeline)
    ));
}

#[test]
fn overlays_are_visited_after_snippets_with_wider_framing() {
    let snippets = [snippet(0, 0, 100, 100, None)];
    let targets = [overlay_target(300, 300, 100, 100, None)];
    let timeline =
        build_timeline(&snippets, &targets, &MotionSettings::default(), 1000, 1000).unwrap();

    let kinds: Vec<KeyframeKind> = timeline.keyframes.iter().map(|k| k.kind).collect();
    assert_eq!(
        kinds,
        vec![
            KeyframeKind::Intro,
            KeyframeKind::IntroEnd,
            KeyframeKind::SnippetTravel,
            KeyframeKind::SnippetHold,
            KeyframeKind::OverlayTravel,
            KeyframeKind::OverlayHold,
            KeyframeKind::Outro,
        ]
    );
    // Same region size, but overlay padding (0.6) frames wider than
    // snippet padding (0.8).
    assert!(timeline.keyframes[4].zoom < timeline.keyframes[2].zoom);
}

#[test]
fn disabling_ken_burns_keeps_keyframe_count_and_holds() {
    let snippets = [snippet(10, 10, 50, 50, None), snippet(80, 80, 60, 60, None)];
    let enabled =
        build_timeline(&snippets, &[], &MotionSettings::default(), 500, 500).unwrap();
    let jump_cut_settings = MotionSettings {
        ken_burns: false,
        ..MotionSettings::default()
    };
    let disabled = build_timeline(&snippets, &[], &jump_cut_settings, 500, 500).unwrap();

    assert_eq!(enabled.keyframes.len(), disabled.keyframes.len());
    // Only the holds remain: 2 * hold_floor.
    assert!((disabled.duration_secs() - 2.0).abs() < 1e-9);
    // Travel segments collapse to zero-length pairs.
    assert_eq!(disabled.keyframes[0].secs, 0.0);
    assert_eq!(disabled.keyframes[1].secs, 0.0);
    assert_eq!(disabled.keyframes[2].secs, 0.0);
    disabled.validate().unwrap();
}

#[test]
fn narration_extends_hold_but_never_below_floor() {
    let long = build_timeline(
        &[snippet(0, 0, 50, 50, Some(7.5))],
        &[],
        &MotionSettings::default(),
        500,
        500,
    )
    .unwrap();
    // hold = max(7.5, 1.0)
    assert!((long.duration_secs() - (2.0 + 3.0 + 7.5 + 2.0)).abs() < 1e-9);

    let short = build_timeline(
        &[snippet(0, 0, 50, 50, Some(0.2))],
        &[],
        &MotionSettings::default(),
        500,
        500,
    )
    .unwrap();
    // hold = max(0.2, 1.0)
    assert!((short.duration_secs() - (2.0 + 3.0 + 1.0 + 2.0)).abs() < 1e-9);
}

#[test]
fn walk_emits_audio_events_sharing_the_keyframe_clock() {
    let events = walk_timeline(
        &[snippet(100, 100, 200, 150, Some(4.0))],
        &[],
        &MotionSettings::default(),
        1920,
        1080,
    )
    .unwrap();

    let mut audio_starts = Vec::new();
    let mut travel_times = Vec::new();
    for event in &events {
        match event {
            TimelineEvent::Audio(a) => audio_starts.push(a.start_secs),
            TimelineEvent::Keyframe(k) if k.kind == KeyframeKind::SnippetTravel => {
                travel_times.push(k.secs)
            }
            TimelineEvent::Keyframe(_) => {}
        }
    }
    assert_eq!(audio_starts, travel_times);
}

use super::*;
use crate::foundation::error::PanreelError;

fn keyframe(secs: f64, zoom: f64, kind: KeyframeKind) -> Keyframe {
    Keyframe {
        secs,
        zoom,
        center: Point::new(50.0, 50.0),
        kind,
    }
}

#[test]
fn empty_timeline_fails_validation() {
    let timeline = Timeline { keyframes: vec![] };
    assert!(matches!(
        timeline.validate(),
        Err(PanreelError::EmptyTimeline)
    ));
}

#[test]
fn decreasing_times_fail_validation() {
    let timeline = Timeline {
        keyframes: vec![
            keyframe(0.0, 1.0, KeyframeKind::Intro),
            keyframe(2.0, 1.0, KeyframeKind::IntroEnd),
            keyframe(1.0, 1.0, KeyframeKind::Outro),
        ],
    };
    assert!(timeline.validate().is_err());
}

#[test]
fn timeline_must_open_and_close_on_overview() {
    let timeline = Timeline {
        keyframes: vec![
            keyframe(0.0, 1.0, KeyframeKind::Intro),
            keyframe(2.0, 2.0, KeyframeKind::Outro),
        ],
    };
    assert!(timeline.validate().is_err());

    let timeline = Timeline {
        keyframes: vec![
            keyframe(0.0, 1.0, KeyframeKind::Intro),
            keyframe(2.0, 1.0, KeyframeKind::Outro),
        ],
    };
    timeline.validate().unwrap();
}

#[test]
fn duration_is_last_keyframe_time() {
    let timeline = Timeline {
        keyframes: vec![
            keyframe(0.0, 1.0, KeyframeKind::Intro),
            keyframe(11.0, 1.0, KeyframeKind::Outro),
        ],
    };
    assert_eq!(timeline.duration_secs(), 11.0);
    assert_eq!(Timeline { keyframes: vec![] }.duration_secs(), 0.0);
}

use std::sync::{Arc, Mutex};

use super::*;
use crate::{
    composition::model::{Snippet, Storyboard},
    encode::sink::NullSink,
    foundation::core::Region,
};

fn test_store() -> PreparedAssetStore {
    let width = 64u32;
    let height = 64u32;
    let mut pixels = Vec::with_capacity((width * height * 4) as usize);
    for i in 0..width * height {
        let shade = (i % 251) as u8;
        pixels.extend_from_slice(&[shade, shade, shade, 255]);
    }
    PreparedAssetStore {
        source: PreparedImage {
            width,
            height,
            rgba8: Arc::new(pixels),
        },
        snippets: vec![
            PreparedSnippet {
                region: Region {
                    x: 8,
                    y: 8,
                    width: 16,
                    height: 16,
                },
                narration: None,
            },
            PreparedSnippet {
                region: Region {
                    x: 32,
                    y: 32,
                    width: 24,
                    height: 20,
                },
                narration: None,
            },
        ],
        overlays: vec![],
    }
}

fn test_storyboard() -> Storyboard {
    let store = test_store();
    Storyboard {
        source_image: "page.png".to_string(),
        canvas: Canvas {
            width: 32,
            height: 32,
        },
        fps: Fps { num: 10, den: 1 },
        snippets: store
            .snippets
            .iter()
            .map(|s| Snippet {
                region: s.region,
                narration: None,
            })
            .collect(),
        overlays: vec![],
        settings: MotionSettings {
            intro_secs: 0.25,
            travel_secs: 0.25,
            hold_floor_secs: 0.5,
            outro_secs: 0.25,
            ..MotionSettings::default()
        },
    }
}

fn test_session() -> RenderSession {
    RenderSession::new(&test_storyboard(), &test_store()).unwrap()
}

#[test]
fn session_exposes_walk_derived_state() {
    let session = test_session();
    // intro + 2 * (travel + hold) + outro
    assert!((session.duration_secs() - 2.0).abs() < 1e-9);
    assert_eq!(session.frame_count(), 20);
    assert!(session.scheduled_audio().is_empty());
    assert_eq!(session.outline_windows().len(), 2);
    assert_eq!(session.camera_at(0.0).zoom, 1.0);
}

#[test]
fn null_sink_receives_every_frame_in_order() {
    let session = test_session();
    let mut sink = NullSink::default();
    let stats = render_to_sink(&session, &mut sink, &RenderOpts::default(), None).unwrap();

    assert_eq!(sink.frames, session.frame_count());
    assert_eq!(stats.frames_total, session.frame_count());
    assert_eq!(stats.frames_rendered, session.frame_count());
}

#[test]
fn parallel_render_matches_sequential_frames() {
    let session = test_session();
    let opts = RenderOpts {
        threading: RenderThreading {
            parallel: true,
            chunk_size: 4,
            threads: Some(2),
        },
        ..RenderOpts::default()
    };
    let mut sink = NullSink::default();
    render_to_sink(&session, &mut sink, &opts, None).unwrap();
    assert_eq!(sink.frames, session.frame_count());

    // Frames for a fixed time are bit-identical regardless of who rendered
    // them.
    let a = session.render_frame_at(0.75).unwrap();
    let b = session.render_frame_at(0.75).unwrap();
    assert_eq!(a, b);
}

#[test]
fn progress_events_stream_in_order() {
    let session = test_session();
    let events = Arc::new(Mutex::new(Vec::new()));
    let recorder = {
        let events = Arc::clone(&events);
        move |event: ProgressEvent| events.lock().unwrap().push(event)
    };
    let opts = RenderOpts {
        threading: RenderThreading {
            chunk_size: 7,
            ..RenderThreading::default()
        },
        ..RenderOpts::default()
    };
    let mut sink = NullSink::default();
    render_to_sink(&session, &mut sink, &opts, Some(&recorder)).unwrap();

    let events = events.lock().unwrap();
    assert_eq!(
        events.first(),
        Some(&ProgressEvent::Started { total_frames: 20 })
    );
    assert_eq!(events.last(), Some(&ProgressEvent::Finished));
    let dones: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            ProgressEvent::FramesSubmitted { done, .. } => Some(*done),
            _ => None,
        })
        .collect();
    assert_eq!(dones, vec![7, 14, 20]);
}

#[test]
fn cancelled_token_aborts_the_run() {
    let session = test_session();
    let opts = RenderOpts::default();
    opts.cancel.cancel();
    let mut sink = NullSink::default();
    assert!(matches!(
        render_to_sink(&session, &mut sink, &opts, None),
        Err(PanreelError::Cancelled)
    ));
}

#[test]
fn elapsed_deadline_aborts_the_run() {
    let session = test_session();
    let opts = RenderOpts {
        deadline: Some(Duration::ZERO),
        ..RenderOpts::default()
    };
    // Burn a little wall clock before the first deadline check.
    let stall = |_event: ProgressEvent| std::thread::sleep(Duration::from_millis(5));
    let mut sink = NullSink::default();
    assert!(matches!(
        render_to_sink(&session, &mut sink, &opts, Some(&stall)),
        Err(PanreelError::DeadlineExceeded)
    ));
}

#[test]
fn failing_sink_aborts_without_retry() {
    struct FailingSink {
        submits: u32,
    }
    impl crate::encode::sink::VideoSink for FailingSink {
        fn begin(
            &mut self,
            _canvas: Canvas,
            _fps: Fps,
            _audio: &[ScheduledAudio],
        ) -> PanreelResult<()> {
            Ok(())
        }
        fn submit(&mut self, _frame: &FrameRGBA) -> PanreelResult<()> {
            self.submits += 1;
            Err(PanreelError::sink_failure("muxer exploded"))
        }
        fn finish(&mut self) -> PanreelResult<()> {
            Ok(())
        }
    }

    let session = test_session();
    let mut sink = FailingSink { submits: 0 };
    let err = render_to_sink(&session, &mut sink, &RenderOpts::default(), None).unwrap_err();
    assert!(matches!(err, PanreelError::SinkFailure(_)));
    assert_eq!(err.to_string(), "sink failure: muxer exploded");
    assert_eq!(sink.submits, 1);
}

#[test]
fn persistent_overlay_outline_extends_to_the_end() {
    use crate::composition::model::OverlaySpec;

    let mut store = test_store();
    store.overlays = vec![crate::assets::store::PreparedOverlay {
        image: PreparedImage {
            width: 8,
            height: 8,
            rgba8: Arc::new(vec![255u8; 8 * 8 * 4]),
        },
        x: 40,
        y: 40,
        narration: None,
        persistent: true,
    }];
    let mut storyboard = test_storyboard();
    storyboard.overlays = vec![OverlaySpec {
        image: "badge.png".to_string(),
        x: 40,
        y: 40,
        narration: None,
        persistent: true,
    }];

    let session = RenderSession::new(&storyboard, &store).unwrap();
    let windows = session.outline_windows();
    assert_eq!(windows.len(), 3);
    let overlay_window = windows.last().unwrap();
    assert_eq!(overlay_window.end_secs, session.duration_secs());
    // Snippet windows stay hold-bounded.
    assert!(windows[0].end_secs < session.duration_secs());
}

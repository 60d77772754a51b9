use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::{Duration, Instant},
};

use rayon::prelude::*;

use crate::{
    assets::store::{PreparedAssetStore, PreparedImage, PreparedSnippet},
    audio::schedule::ScheduledAudio,
    compose::overlay::{OverlayTarget, composite_overlays},
    composition::model::{MotionSettings, Storyboard},
    encode::sink::VideoSink,
    eval::evaluator::{CameraState, camera_at},
    foundation::core::{Canvas, Fps},
    foundation::error::{PanreelError, PanreelResult},
    render::frame::{FrameRGBA, OutlineWindow, render_frame},
    timeline::builder::{TimelineEvent, walk_timeline},
    timeline::model::{KeyframeKind, Timeline},
};

/// Cooperative cancellation flag, checked between frame renders and around
/// sink calls.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create an unset token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation; the running render fails with
    /// [`PanreelError::Cancelled`] at its next check.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Progress messages emitted by [`render_to_sink`].
///
/// Progress is an append-only stream of status messages, never a return
/// value; callers hand in a callback and receive events in order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Rendering started.
    Started {
        /// Total frames that will be rendered.
        total_frames: u64,
    },
    /// A chunk of frames has been rendered and submitted to the sink.
    FramesSubmitted {
        /// Frames submitted so far.
        done: u64,
        /// Total frames.
        total: u64,
    },
    /// The sink finalized the output.
    Finished,
}

/// Progress callback; invoked in submission order.
pub type ProgressFn<'a> = &'a (dyn Fn(ProgressEvent) + Send + Sync);

/// Threading/chunking configuration for the render driver.
#[derive(Clone, Debug)]
pub struct RenderThreading {
    /// Render frames on a rayon worker pool.
    pub parallel: bool,
    /// Frames per chunk submitted to the sink.
    pub chunk_size: usize,
    /// Worker thread count; `None` uses the rayon default.
    pub threads: Option<usize>,
}

impl Default for RenderThreading {
    fn default() -> Self {
        Self {
            parallel: false,
            chunk_size: 64,
            threads: None,
        }
    }
}

/// Options for [`render_to_sink`].
#[derive(Clone, Debug, Default)]
pub struct RenderOpts {
    /// Threading/chunking configuration.
    pub threading: RenderThreading,
    /// Cooperative cancellation token.
    pub cancel: CancelToken,
    /// Wall-clock budget for the whole render, if any.
    pub deadline: Option<Duration>,
}

/// Counters reported by [`render_to_sink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RenderStats {
    /// Frames the run was asked to produce.
    pub frames_total: u64,
    /// Frames actually rendered and submitted.
    pub frames_rendered: u64,
}

/// A storyboard resolved into immutable render state.
///
/// Construction bakes overlays into the composite, builds the camera
/// timeline and the audio schedule from one walk, and derives outline
/// activation windows. Everything is read-only afterwards, which is what
/// makes `t -> frame` pure and safe to evaluate from worker threads.
#[derive(Clone, Debug)]
pub struct RenderSession {
    composite: PreparedImage,
    timeline: Timeline,
    outlines: Vec<OutlineWindow>,
    audio: Vec<ScheduledAudio>,
    canvas: Canvas,
    fps: Fps,
    settings: MotionSettings,
}

impl RenderSession {
    /// Resolve `storyboard` against its prepared assets.
    #[tracing::instrument(skip(storyboard, store))]
    pub fn new(storyboard: &Storyboard, store: &PreparedAssetStore) -> PanreelResult<Self> {
        storyboard.validate()?;

        let (composite, targets) = composite_overlays(&store.source, &store.overlays);
        let events = walk_timeline(
            &store.snippets,
            &targets,
            &storyboard.settings,
            store.source.width,
            store.source.height,
        )?;

        let mut keyframes = Vec::new();
        let mut audio = Vec::new();
        for event in events {
            match event {
                TimelineEvent::Keyframe(keyframe) => keyframes.push(keyframe),
                TimelineEvent::Audio(clip) => audio.push(clip),
            }
        }
        let timeline = Timeline { keyframes };
        timeline.validate()?;
        let outlines = outline_windows(&timeline, &store.snippets, &targets);

        tracing::info!(
            duration_secs = timeline.duration_secs(),
            keyframes = timeline.keyframes.len(),
            audio_clips = audio.len(),
            "render session built"
        );

        Ok(Self {
            composite,
            timeline,
            outlines,
            audio,
            canvas: storyboard.canvas,
            fps: storyboard.fps,
            settings: storyboard.settings.clone(),
        })
    }

    /// Total clip duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.timeline.duration_secs()
    }

    /// Number of output frames at the session frame rate.
    pub fn frame_count(&self) -> u64 {
        self.fps.secs_to_frames_ceil(self.duration_secs())
    }

    /// Camera pose at `secs`.
    pub fn camera_at(&self, secs: f64) -> CameraState {
        camera_at(&self.timeline, secs)
    }

    /// Render the output frame for `secs`.
    pub fn render_frame_at(&self, secs: f64) -> PanreelResult<FrameRGBA> {
        render_frame(
            &self.composite,
            self.camera_at(secs),
            self.canvas,
            &self.outlines,
            secs,
            self.settings.outlines.as_ref(),
        )
    }

    /// Narration clips with their absolute start times.
    pub fn scheduled_audio(&self) -> &[ScheduledAudio] {
        &self.audio
    }

    /// The resolved camera timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Outline activation windows in target order.
    pub fn outline_windows(&self) -> &[OutlineWindow] {
        &self.outlines
    }

    /// Output canvas.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }
}

// Pair each travel keyframe with its hold keyframe to recover the hold
// window per target; a persistent overlay's window extends to the end.
fn outline_windows(
    timeline: &Timeline,
    snippets: &[PreparedSnippet],
    targets: &[OverlayTarget],
) -> Vec<OutlineWindow> {
    let duration = timeline.duration_secs();
    let mut windows = Vec::with_capacity(snippets.len() + targets.len());
    let mut snippet_iter = snippets.iter();
    let mut target_iter = targets.iter();
    let mut hold_start = 0.0;

    for keyframe in &timeline.keyframes {
        match keyframe.kind {
            KeyframeKind::SnippetTravel | KeyframeKind::OverlayTravel => {
                hold_start = keyframe.secs;
            }
            KeyframeKind::SnippetHold => {
                if let Some(snippet) = snippet_iter.next() {
                    windows.push(OutlineWindow {
                        region: snippet.region,
                        start_secs: hold_start,
                        end_secs: keyframe.secs,
                    });
                }
            }
            KeyframeKind::OverlayHold => {
                if let Some(target) = target_iter.next() {
                    windows.push(OutlineWindow {
                        region: target.region,
                        start_secs: hold_start,
                        end_secs: if target.persistent {
                            duration
                        } else {
                            keyframe.secs
                        },
                    });
                }
            }
            _ => {}
        }
    }
    windows
}

/// Drive a session's frames into `sink` at the session frame rate.
///
/// Frames are produced in chunks, sequentially or on a rayon worker pool,
/// and submitted in presentation order. The cancel token is checked between
/// frames and around sink calls; `opts.deadline` bounds the wall-clock time
/// of the whole run. The sink is never retried: its failure aborts the run
/// and surfaces verbatim.
#[tracing::instrument(skip(session, sink, opts, progress))]
pub fn render_to_sink(
    session: &RenderSession,
    sink: &mut dyn VideoSink,
    opts: &RenderOpts,
    progress: Option<ProgressFn<'_>>,
) -> PanreelResult<RenderStats> {
    let total_frames = session.frame_count();
    if total_frames == 0 {
        return Err(PanreelError::validation("render produces zero frames"));
    }

    let started = Instant::now();
    let frame_secs = session.fps.frame_duration_secs();
    let chunk_size = opts.threading.chunk_size.max(1) as u64;

    emit(progress, ProgressEvent::Started { total_frames });
    check_interrupt(opts, started)?;
    sink.begin(session.canvas, session.fps, session.scheduled_audio())?;

    let pool = if opts.threading.parallel {
        Some(build_thread_pool(opts.threading.threads)?)
    } else {
        None
    };

    let mut stats = RenderStats {
        frames_total: total_frames,
        frames_rendered: 0,
    };
    let mut chunk_start = 0u64;
    while chunk_start < total_frames {
        let chunk_end = (chunk_start + chunk_size).min(total_frames);

        let frames: Vec<FrameRGBA> = if let Some(pool) = &pool {
            check_interrupt(opts, started)?;
            pool.install(|| {
                (chunk_start..chunk_end)
                    .into_par_iter()
                    .map(|frame| {
                        if opts.cancel.is_cancelled() {
                            return Err(PanreelError::Cancelled);
                        }
                        session.render_frame_at(frame as f64 * frame_secs)
                    })
                    .collect::<PanreelResult<Vec<_>>>()
            })?
        } else {
            let mut out = Vec::with_capacity((chunk_end - chunk_start) as usize);
            for frame in chunk_start..chunk_end {
                check_interrupt(opts, started)?;
                out.push(session.render_frame_at(frame as f64 * frame_secs)?);
            }
            out
        };

        check_interrupt(opts, started)?;
        for frame in &frames {
            sink.submit(frame)?;
        }
        stats.frames_rendered += chunk_end - chunk_start;
        emit(
            progress,
            ProgressEvent::FramesSubmitted {
                done: chunk_end,
                total: total_frames,
            },
        );
        chunk_start = chunk_end;
    }

    check_interrupt(opts, started)?;
    sink.finish()?;
    emit(progress, ProgressEvent::Finished);
    Ok(stats)
}

fn check_interrupt(opts: &RenderOpts, started: Instant) -> PanreelResult<()> {
    if opts.cancel.is_cancelled() {
        return Err(PanreelError::Cancelled);
    }
    if let Some(deadline) = opts.deadline
        && started.elapsed() > deadline
    {
        return Err(PanreelError::DeadlineExceeded);
    }
    Ok(())
}

fn emit(progress: Option<ProgressFn<'_>>, event: ProgressEvent) {
    if let Some(callback) = progress {
        callback(event);
    }
}

fn build_thread_pool(threads: Option<usize>) -> PanreelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PanreelError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PanreelError::validation(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;

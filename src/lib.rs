//! Panreel is a Ken Burns style video generation engine.
//!
//! Panreel turns one still image, a set of rectangular regions of interest
//! ("snippets"), optional narration clips, and optional overlay sub-images
//! into a single video: the virtual camera overviews the whole image, zooms
//! and pans to each region in turn while its narration plays, visits each
//! overlay, then returns to the overview.
//!
//! # Pipeline overview
//!
//! 1. **Prepare**: `Storyboard + NarrationService -> PreparedAssetStore` (decode images, synthesize narration)
//! 2. **Compose**: bake overlay images onto a copy of the source (`composite_overlays`)
//! 3. **Build**: walk the snippet/overlay list once into a `Timeline` plus the audio schedule
//! 4. **Render**: `camera_at` + `render_frame` produce pixels for any time `t`
//! 5. **Encode**: stream frames and scheduled audio to a [`VideoSink`] (system `ffmpeg` by default)
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Immutable after construction**: the composite image, timeline, and
//!   audio schedule are computed once by [`RenderSession::new`] and never
//!   mutated during a render.
//! - **No IO in renderers**: external IO is front-loaded in [`PreparedAssetStore`].
//! - **Pure frame function**: `t -> frame` has no hidden state, so frames
//!   may be rendered on a worker pool in any order.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod assets;
mod audio;
mod camera;
mod compose;
mod composition;
mod encode;
mod eval;
mod foundation;
mod render;
mod timeline;

pub use animation::ease::Ease;
pub use assets::decode::decode_image;
pub use assets::store::{
    NarrationClip, NarrationService, PreparedAssetStore, PreparedImage, PreparedOverlay,
    PreparedSnippet, default_voices,
};
pub use audio::schedule::{ScheduledAudio, schedule_audio};
pub use camera::solver::{visible_rect, zoom_to_fit};
pub use compose::overlay::{OverlayTarget, composite_overlays};
pub use composition::model::{
    MotionSettings, NarrationSpec, OutlineStyle, OverlaySpec, Snippet, Storyboard,
};
pub use encode::ffmpeg::{FfmpegSink, FfmpegSinkConfig, ensure_parent_dir, is_ffmpeg_on_path};
pub use encode::sink::{NullSink, VideoSink};
pub use eval::evaluator::{CameraState, camera_at};
pub use foundation::core::{Canvas, Fps, Point, Rect, Region, Vec2};
pub use foundation::error::{PanreelError, PanreelResult};
pub use render::frame::{FrameRGBA, OutlineWindow, render_frame};
pub use render::pipeline::{
    CancelToken, ProgressEvent, ProgressFn, RenderOpts, RenderSession, RenderStats,
    RenderThreading, render_to_sink,
};
pub use timeline::builder::{TimelineEvent, build_timeline, walk_timeline};
pub use timeline::model::{Keyframe, KeyframeKind, Timeline};

use crate::{
    audio::schedule::ScheduledAudio,
    foundation::core::{Canvas, Fps},
    foundation::error::PanreelResult,
    render::frame::FrameRGBA,
};

/// External video/audio container sink.
///
/// The engine hands a sink opaque RGBA frames in presentation order plus
/// the resolved audio schedule; container and codec concerns live entirely
/// behind this trait. A failing sink surfaces its diagnostic verbatim as
/// [`PanreelError::SinkFailure`](crate::PanreelError::SinkFailure), and
/// nothing is retried by the engine; retries are a caller-level policy
/// around the whole pipeline invocation.
pub trait VideoSink {
    /// Start an encode of `canvas`-sized frames at `fps`, mixing `audio`
    /// at its scheduled offsets.
    fn begin(&mut self, canvas: Canvas, fps: Fps, audio: &[ScheduledAudio]) -> PanreelResult<()>;

    /// Submit the next frame in presentation order.
    fn submit(&mut self, frame: &FrameRGBA) -> PanreelResult<()>;

    /// Finalize the output.
    fn finish(&mut self) -> PanreelResult<()>;
}

/// Sink that counts frames and discards them; useful for tests and dry
/// runs.
#[derive(Clone, Debug, Default)]
pub struct NullSink {
    /// Frames submitted since `begin`.
    pub frames: u64,
}

impl VideoSink for NullSink {
    fn begin(&mut self, _canvas: Canvas, _fps: Fps, _audio: &[ScheduledAudio]) -> PanreelResult<()> {
        self.frames = 0;
        Ok(())
    }

    fn submit(&mut self, _frame: &FrameRGBA) -> PanreelResult<()> {
        self.frames += 1;
        Ok(())
    }

    fn finish(&mut self) -> PanreelResult<()> {
        Ok(())
    }
}

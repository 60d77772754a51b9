use std::{
    path::{Path, PathBuf},
    process::{Child, ChildStdin, Command, Stdio},
};

use crate::{
    audio::schedule::ScheduledAudio,
    encode::sink::VideoSink,
    foundation::core::{Canvas, Fps},
    foundation::error::{PanreelError, PanreelResult},
    render::frame::FrameRGBA,
};

/// Encoder settings for [`FfmpegSink`].
#[derive(Clone, Debug)]
pub struct FfmpegSinkConfig {
    /// Output file path.
    pub out_path: PathBuf,
    /// Overwrite an existing output file.
    pub overwrite: bool,
    /// x264 speed/quality preset.
    pub preset: String,
    /// x264 constant rate factor.
    pub crf: u32,
}

impl FfmpegSinkConfig {
    /// Config writing to `out_path` with the stock preset (`medium`) and
    /// CRF (23).
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
            preset: "medium".to_string(),
            crf: 23,
        }
    }
}

/// Whether a usable `ffmpeg` binary is on `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> PanreelResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Video sink that streams raw RGBA frames to the system `ffmpeg` binary.
///
/// Narration clips are attached as extra inputs and placed with an
/// `adelay`/`amix` filter graph, so audio mixing stays inside ffmpeg. A
/// non-zero exit surfaces ffmpeg's stderr verbatim as
/// [`PanreelError::SinkFailure`].
pub struct FfmpegSink {
    cfg: FfmpegSinkConfig,
    child: Option<Child>,
    stdin: Option<ChildStdin>,
    canvas: Canvas,
}

impl FfmpegSink {
    /// Create a sink writing to `cfg.out_path`.
    pub fn new(cfg: FfmpegSinkConfig) -> Self {
        Self {
            cfg,
            child: None,
            stdin: None,
            canvas: Canvas {
                width: 0,
                height: 0,
            },
        }
    }
}

impl VideoSink for FfmpegSink {
    fn begin(&mut self, canvas: Canvas, fps: Fps, audio: &[ScheduledAudio]) -> PanreelResult<()> {
        if canvas.width == 0 || canvas.height == 0 {
            return Err(PanreelError::validation(
                "encode width/height must be non-zero",
            ));
        }
        if !canvas.width.is_multiple_of(2) || !canvas.height.is_multiple_of(2) {
            // Default settings target yuv420p output for maximum compatibility.
            return Err(PanreelError::validation(
                "encode width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        let fps = if fps.den == 1 {
            fps.num
        } else {
            return Err(PanreelError::validation(
                "ffmpeg sink requires integer fps (fps.den == 1)",
            ));
        };
        if !self.cfg.overwrite && self.cfg.out_path.exists() {
            return Err(PanreelError::validation(format!(
                "output file '{}' already exists",
                self.cfg.out_path.display()
            )));
        }
        if !is_ffmpeg_on_path() {
            return Err(PanreelError::sink_failure(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }
        ensure_parent_dir(&self.cfg.out_path)?;

        // System `ffmpeg` binary rather than linked FFmpeg libs, to avoid
        // native dev header/lib requirements.
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        cmd.arg(if self.cfg.overwrite { "-y" } else { "-n" });
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", canvas.width, canvas.height),
            "-r",
            &fps.to_string(),
            "-i",
            "pipe:0",
        ]);
        for clip in audio {
            cmd.arg("-i").arg(&clip.source);
        }
        if audio.is_empty() {
            cmd.arg("-an");
        } else {
            cmd.args(["-filter_complex", &audio_filter_graph(audio)]);
            cmd.args(["-map", "0:v", "-map", "[aout]", "-c:a", "aac"]);
        }
        cmd.args([
            "-c:v",
            "libx264",
            "-preset",
            &self.cfg.preset,
            "-crf",
            &self.cfg.crf.to_string(),
            "-pix_fmt",
            "yuv420p",
            "-movflags",
            "+faststart",
        ])
        .arg(&self.cfg.out_path);

        let mut child = cmd.spawn().map_err(|e| {
            PanreelError::sink_failure(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;
        let stdin = child.stdin.take().ok_or_else(|| {
            PanreelError::sink_failure("failed to open ffmpeg stdin (unexpected)")
        })?;

        self.child = Some(child);
        self.stdin = Some(stdin);
        self.canvas = canvas;
        Ok(())
    }

    fn submit(&mut self, frame: &FrameRGBA) -> PanreelResult<()> {
        if frame.width != self.canvas.width || frame.height != self.canvas.height {
            return Err(PanreelError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, self.canvas.width, self.canvas.height
            )));
        }
        if frame.data.len() != frame.width as usize * frame.height as usize * 4 {
            return Err(PanreelError::validation(
                "frame.data size mismatch with width*height*4",
            ));
        }
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(PanreelError::sink_failure(
                "ffmpeg sink is not started or already finalized",
            ));
        };

        use std::io::Write as _;
        stdin.write_all(&frame.data).map_err(|e| {
            PanreelError::sink_failure(format!("failed to write frame to ffmpeg stdin: {e}"))
        })
    }

    fn finish(&mut self) -> PanreelResult<()> {
        drop(self.stdin.take());
        let Some(child) = self.child.take() else {
            return Err(PanreelError::sink_failure("ffmpeg sink was never started"));
        };

        let output = child.wait_with_output().map_err(|e| {
            PanreelError::sink_failure(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PanreelError::sink_failure(format!(
                "ffmpeg exited with status {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(())
    }
}

// One adelay per clip (milliseconds, all channels), then a single amix.
// Input 0 is the rawvideo stream, so clip N maps to input N+1.
fn audio_filter_graph(audio: &[ScheduledAudio]) -> String {
    let mut graph = String::new();
    for (idx, clip) in audio.iter().enumerate() {
        let delay_ms = (clip.start_secs * 1000.0).round().max(0.0) as u64;
        graph.push_str(&format!("[{}:a]adelay={delay_ms}:all=1[a{idx}];", idx + 1));
    }
    for idx in 0..audio.len() {
        graph.push_str(&format!("[a{idx}]"));
    }
    graph.push_str(&format!("amix=inputs={}:normalize=0[aout]", audio.len()));
    graph
}

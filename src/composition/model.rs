use crate::foundation::core::{Canvas, Fps, Region};
use crate::foundation::error::{PanreelError, PanreelResult};

/// A complete video project description.
///
/// A storyboard is a pure data model: one source image, the ordered
/// snippet regions the camera visits, optional overlay sub-images, and the
/// motion settings. It can be built programmatically or serialized via
/// Serde (JSON). Rendering a storyboard is performed by
/// [`crate::RenderSession`] after assets are prepared with
/// [`crate::PreparedAssetStore::prepare`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Storyboard {
    /// Path to the source image, relative to the asset root.
    pub source_image: String,
    /// Output canvas dimensions.
    pub canvas: Canvas,
    /// Output frame rate.
    pub fps: Fps,
    /// Snippet regions; visit order on the timeline.
    pub snippets: Vec<Snippet>,
    /// Overlay sub-images; visited after all snippets, in order.
    #[serde(default)]
    pub overlays: Vec<OverlaySpec>,
    /// Camera motion and rendering settings.
    #[serde(default)]
    pub settings: MotionSettings,
}

impl Storyboard {
    /// Validate the model before asset preparation.
    pub fn validate(&self) -> PanreelResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(PanreelError::validation("canvas dimensions must be non-zero"));
        }
        Fps::new(self.fps.num, self.fps.den)?;
        for snippet in &self.snippets {
            snippet.region.validate()?;
        }
        self.settings.validate()
    }
}

/// A rectangular region of interest with optional narration.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Snippet {
    /// Region in source-image pixel coordinates.
    pub region: Region,
    /// Narration spoken while the camera holds on this region.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<NarrationSpec>,
}

/// Narration text routed to the external synthesis service.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct NarrationSpec {
    /// Text to speak. Blank text counts as "no narration" and never
    /// reaches the service.
    pub text: String,
    /// Service voice identifier.
    #[serde(default = "default_voice")]
    pub voice: String,
}

fn default_voice() -> String {
    "en-US-AriaNeural".to_string()
}

/// A secondary image composited onto the source and used as a camera
/// target after all snippets.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OverlaySpec {
    /// Path to the overlay image, relative to the asset root.
    pub image: String,
    /// Left edge in source-image coordinates; may place the overlay
    /// partially off-image.
    pub x: i32,
    /// Top edge in source-image coordinates.
    pub y: i32,
    /// Narration spoken while the camera holds on this overlay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub narration: Option<NarrationSpec>,
    /// Keep the overlay's outline active through the end of the video.
    #[serde(default)]
    pub persistent: bool,
}

/// Camera motion, zoom, and outline settings.
///
/// One immutable configuration value carried by the storyboard; every
/// field has a documented default, and the defaults together reproduce
/// the stock pacing (2s overviews, 3s travels, 1s minimum holds).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MotionSettings {
    /// Seconds the camera holds the opening overview. Default 2.0.
    #[serde(default = "default_intro_secs")]
    pub intro_secs: f64,
    /// Seconds per travel segment between targets. Default 3.0.
    #[serde(default = "default_travel_secs")]
    pub travel_secs: f64,
    /// Minimum seconds the camera holds each target; narration extends a
    /// hold but is never truncated by it. Default 1.0.
    #[serde(default = "default_hold_floor_secs")]
    pub hold_floor_secs: f64,
    /// Seconds of the closing overview. Default 2.0.
    #[serde(default = "default_outro_secs")]
    pub outro_secs: f64,
    /// Lower zoom clamp. Default 1.0.
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    /// Upper zoom clamp. Default 4.0.
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    /// Fraction of the viewport a snippet fills (tight framing).
    /// Default 0.8.
    #[serde(default = "default_snippet_padding")]
    pub snippet_padding: f64,
    /// Fraction of the viewport an overlay fills (wider context).
    /// Default 0.6.
    #[serde(default = "default_overlay_padding")]
    pub overlay_padding: f64,
    /// Animate camera travel. Disabling degenerates the schedule to
    /// jump cuts with the same holds. Default true.
    #[serde(default = "default_ken_burns")]
    pub ken_burns: bool,
    /// Draw region outlines while their targets are active. Default off.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlines: Option<OutlineStyle>,
}

impl Default for MotionSettings {
    fn default() -> Self {
        Self {
            intro_secs: default_intro_secs(),
            travel_secs: default_travel_secs(),
            hold_floor_secs: default_hold_floor_secs(),
            outro_secs: default_outro_secs(),
            min_zoom: default_min_zoom(),
            max_zoom: default_max_zoom(),
            snippet_padding: default_snippet_padding(),
            overlay_padding: default_overlay_padding(),
            ken_burns: default_ken_burns(),
            outlines: None,
        }
    }
}

impl MotionSettings {
    /// Check duration, zoom, and padding ranges.
    pub fn validate(&self) -> PanreelResult<()> {
        let durations = [
            self.intro_secs,
            self.travel_secs,
            self.hold_floor_secs,
            self.outro_secs,
        ];
        if durations.iter().any(|d| !d.is_finite() || *d < 0.0) {
            return Err(PanreelError::validation(
                "intro/travel/hold/outro durations must be finite and >= 0",
            ));
        }
        if !(self.min_zoom > 0.0 && self.max_zoom >= self.min_zoom) {
            return Err(PanreelError::validation(
                "zoom bounds require 0 < min_zoom <= max_zoom",
            ));
        }
        for padding in [self.snippet_padding, self.overlay_padding] {
            if !(padding > 0.0 && padding <= 1.0) {
                return Err(PanreelError::validation(
                    "padding factors must be in (0, 1]",
                ));
            }
        }
        Ok(())
    }

    /// Intro/travel/outro durations with the ken-burns switch applied:
    /// disabling the animation zeroes every travel segment while holds
    /// keep their full length.
    pub(crate) fn effective_durations(&self) -> (f64, f64, f64) {
        if self.ken_burns {
            (self.intro_secs, self.travel_secs, self.outro_secs)
        } else {
            (0.0, 0.0, 0.0)
        }
    }
}

fn default_intro_secs() -> f64 {
    2.0
}

fn default_travel_secs() -> f64 {
    3.0
}

fn default_hold_floor_secs() -> f64 {
    1.0
}

fn default_outro_secs() -> f64 {
    2.0
}

fn default_min_zoom() -> f64 {
    1.0
}

fn default_max_zoom() -> f64 {
    4.0
}

fn default_snippet_padding() -> f64 {
    0.8
}

fn default_overlay_padding() -> f64 {
    0.6
}

fn default_ken_burns() -> bool {
    true
}

/// Outline drawing style for active regions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutlineStyle {
    /// Straight-alpha RGBA8 outline color.
    #[serde(default = "default_outline_color")]
    pub color_rgba8: [u8; 4],
    /// Outline thickness in output pixels.
    #[serde(default = "default_outline_thickness")]
    pub thickness_px: u32,
}

impl Default for OutlineStyle {
    fn default() -> Self {
        Self {
            color_rgba8: default_outline_color(),
            thickness_px: default_outline_thickness(),
        }
    }
}

fn default_outline_color() -> [u8; 4] {
    [255, 64, 64, 255]
}

fn default_outline_thickness() -> u32 {
    3
}

#[cfg(test)]
#[path = "../../tests/unit/composition/model.rs"]
mod tests;

use crate::foundation::error::{PanreelError, PanreelResult};

pub use kurbo::{Point, Rect, Vec2};

/// Output frame rate as a rational number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator in frames.
    pub num: u32,
    /// Denominator in seconds; must be > 0.
    pub den: u32,
}

impl Fps {
    /// Construct a validated frame rate.
    pub fn new(num: u32, den: u32) -> PanreelResult<Self> {
        if den == 0 {
            return Err(PanreelError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(PanreelError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// Frames per second as a float.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of a single frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Smallest frame count covering `secs` of playback.
    pub fn secs_to_frames_ceil(self, secs: f64) -> u64 {
        (secs * self.as_f64()).ceil().max(0.0) as u64
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Resolve a social-video aspect preset to concrete dimensions.
    ///
    /// Accepts `"9:16"` (1080x1920), `"16:9"` (1920x1080), and `"1:1"`
    /// (1080x1080); anything else is a validation error rather than a
    /// silent fallback.
    pub fn from_aspect_ratio(ratio: &str) -> PanreelResult<Self> {
        match ratio.trim() {
            "9:16" => Ok(Self {
                width: 1080,
                height: 1920,
            }),
            "16:9" => Ok(Self {
                width: 1920,
                height: 1080,
            }),
            "1:1" => Ok(Self {
                width: 1080,
                height: 1080,
            }),
            other => Err(PanreelError::validation(format!(
                "unknown aspect ratio '{other}' (expected 9:16, 16:9, or 1:1)"
            ))),
        }
    }
}

/// A rectangular region of interest in source-image pixel coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Region {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Width in pixels; must be > 0.
    pub width: u32,
    /// Height in pixels; must be > 0.
    pub height: u32,
}

impl Region {
    /// Reject regions with non-positive dimensions.
    pub fn validate(&self) -> PanreelResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PanreelError::invalid_region(format!(
                "region at ({}, {}) is {}x{}; width and height must be positive",
                self.x, self.y, self.width, self.height
            )));
        }
        Ok(())
    }

    /// Region center in source coordinates.
    pub fn center(&self) -> Point {
        Point::new(
            f64::from(self.x) + f64::from(self.width) / 2.0,
            f64::from(self.y) + f64::from(self.height) / 2.0,
        )
    }
}

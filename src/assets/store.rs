use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;

use crate::{
    assets::decode,
    composition::model::{NarrationSpec, Storyboard},
    foundation::core::Region,
    foundation::error::{PanreelError, PanreelResult},
};

/// Prepared raster image in row-major straight-alpha RGBA8 form.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes, `width * height * 4` long.
    pub rgba8: Arc<Vec<u8>>,
}

/// A synthesized narration clip on disk.
#[derive(Clone, Debug, PartialEq)]
pub struct NarrationClip {
    /// Path to the synthesized audio file.
    pub path: PathBuf,
    /// Clip duration in seconds.
    pub duration_secs: f64,
}

/// External text-to-speech service.
///
/// The engine treats narration text as opaque: it forwards non-blank text
/// and a voice id, and receives back a clip path plus its duration. Blank
/// text never reaches the service.
pub trait NarrationService {
    /// Synthesize `text` with `voice`, returning the clip and its duration.
    fn synthesize(&self, text: &str, voice: &str) -> PanreelResult<NarrationClip>;
}

/// Voice identifiers accepted by the stock narration backend.
pub fn default_voices() -> &'static [&'static str] {
    &[
        "en-US-AriaNeural",
        "en-US-GuyNeural",
        "en-US-JennyNeural",
        "en-GB-SoniaNeural",
        "en-GB-RyanNeural",
    ]
}

/// Snippet with its narration resolved.
#[derive(Clone, Debug)]
pub struct PreparedSnippet {
    /// Region in source coordinates.
    pub region: Region,
    /// Synthesized narration, if any.
    pub narration: Option<NarrationClip>,
}

/// Overlay with pixels decoded and narration resolved.
#[derive(Clone, Debug)]
pub struct PreparedOverlay {
    /// Decoded overlay pixels.
    pub image: PreparedImage,
    /// Left edge in source coordinates (may be off-image).
    pub x: i32,
    /// Top edge in source coordinates.
    pub y: i32,
    /// Synthesized narration, if any.
    pub narration: Option<NarrationClip>,
    /// Outline stays active through the end of the video.
    pub persistent: bool,
}

/// All external assets loaded and narration synthesized, front-loading IO
/// before any rendering starts. Read-only once built.
#[derive(Clone, Debug)]
pub struct PreparedAssetStore {
    /// Decoded source image.
    pub source: PreparedImage,
    /// Snippets in storyboard order.
    pub snippets: Vec<PreparedSnippet>,
    /// Overlays in storyboard order; unloadable overlays are dropped here.
    pub overlays: Vec<PreparedOverlay>,
}

impl PreparedAssetStore {
    /// Load every asset referenced by `storyboard`, resolving relative
    /// paths against `root`.
    ///
    /// The source image is required: a missing or undecodable source fails
    /// with [`PanreelError::MissingAsset`]. A missing overlay image or a
    /// failed narration call degrades gracefully: the overlay or clip is
    /// skipped with a warning and the rest of the storyboard proceeds.
    #[tracing::instrument(skip(storyboard, narration))]
    pub fn prepare(
        storyboard: &Storyboard,
        root: &Path,
        narration: &dyn NarrationService,
    ) -> PanreelResult<Self> {
        storyboard.validate()?;

        let source = load_image(&root.join(&storyboard.source_image)).map_err(|e| {
            PanreelError::missing_asset(format!(
                "source image '{}': {e}",
                storyboard.source_image
            ))
        })?;

        let snippets = storyboard
            .snippets
            .iter()
            .map(|snippet| PreparedSnippet {
                region: snippet.region,
                narration: resolve_narration(snippet.narration.as_ref(), narration),
            })
            .collect();

        let mut overlays = Vec::with_capacity(storyboard.overlays.len());
        for spec in &storyboard.overlays {
            match load_image(&root.join(&spec.image)) {
                Ok(image) => overlays.push(PreparedOverlay {
                    image,
                    x: spec.x,
                    y: spec.y,
                    narration: resolve_narration(spec.narration.as_ref(), narration),
                    persistent: spec.persistent,
                }),
                Err(e) => {
                    tracing::warn!(image = %spec.image, error = %e, "skipping overlay: image failed to load");
                }
            }
        }

        Ok(Self {
            source,
            snippets,
            overlays,
        })
    }
}

fn load_image(path: &Path) -> PanreelResult<PreparedImage> {
    let bytes =
        std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
    decode::decode_image(&bytes)
}

fn resolve_narration(
    spec: Option<&NarrationSpec>,
    service: &dyn NarrationService,
) -> Option<NarrationClip> {
    let spec = spec?;
    if spec.text.trim().is_empty() {
        return None;
    }
    match service.synthesize(&spec.text, &spec.voice) {
        Ok(clip) => Some(clip),
        Err(e) => {
            tracing::warn!(voice = %spec.voice, error = %e, "skipping narration: synthesis failed");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;

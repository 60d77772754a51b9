use std::sync::Arc;

use crate::{
    assets::store::{NarrationClip, PreparedImage, PreparedOverlay},
    foundation::core::Region,
};

/// An overlay baked into the composite and tracked as a camera target.
#[derive(Clone, Debug)]
pub struct OverlayTarget {
    /// Overlay bounding box in source coordinates, clipped to the image.
    pub region: Region,
    /// The overlay's own pixels.
    pub pixels: PreparedImage,
    /// Narration spoken while the camera holds on this overlay.
    pub narration: Option<NarrationClip>,
    /// Outline stays active through the end of the video.
    pub persistent: bool,
}

/// Bake each overlay onto a copy of `source` and emit one camera target
/// per overlay.
///
/// Input order is preserved in the target list; the timeline later visits
/// targets in exactly this order. An overlay with no pixels inside the
/// image bounds is logged and skipped, not fatal.
pub fn composite_overlays(
    source: &PreparedImage,
    overlays: &[PreparedOverlay],
) -> (PreparedImage, Vec<OverlayTarget>) {
    let mut pixels = source.rgba8.as_ref().clone();
    let mut targets = Vec::with_capacity(overlays.len());

    for overlay in overlays {
        let Some(region) = clip_to_image(overlay, source.width, source.height) else {
            tracing::warn!(
                x = overlay.x,
                y = overlay.y,
                width = overlay.image.width,
                height = overlay.image.height,
                "skipping overlay: fully outside image bounds"
            );
            continue;
        };
        blend_overlay(&mut pixels, source.width, source.height, overlay);
        targets.push(OverlayTarget {
            region,
            pixels: overlay.image.clone(),
            narration: overlay.narration.clone(),
            persistent: overlay.persistent,
        });
    }

    (
        PreparedImage {
            width: source.width,
            height: source.height,
            rgba8: Arc::new(pixels),
        },
        targets,
    )
}

// Intersection of the overlay bounding box with the image, in unsigned
// source coordinates. None when the overlay lies fully outside.
fn clip_to_image(overlay: &PreparedOverlay, image_w: u32, image_h: u32) -> Option<Region> {
    let left = i64::from(overlay.x).max(0);
    let top = i64::from(overlay.y).max(0);
    let right = (i64::from(overlay.x) + i64::from(overlay.image.width)).min(i64::from(image_w));
    let bottom = (i64::from(overlay.y) + i64::from(overlay.image.height)).min(i64::from(image_h));
    if left >= right || top >= bottom {
        return None;
    }
    Some(Region {
        x: left as u32,
        y: top as u32,
        width: (right - left) as u32,
        height: (bottom - top) as u32,
    })
}

// Straight-alpha src-over blend of the overlay into the destination
// buffer; rows and columns falling outside the image are skipped.
fn blend_overlay(dst: &mut [u8], dst_w: u32, dst_h: u32, overlay: &PreparedOverlay) {
    let src = overlay.image.rgba8.as_ref();
    for row in 0..overlay.image.height {
        let dy = i64::from(overlay.y) + i64::from(row);
        if dy < 0 || dy >= i64::from(dst_h) {
            continue;
        }
        for col in 0..overlay.image.width {
            let dx = i64::from(overlay.x) + i64::from(col);
            if dx < 0 || dx >= i64::from(dst_w) {
                continue;
            }
            let si = (row as usize * overlay.image.width as usize + col as usize) * 4;
            let di = (dy as usize * dst_w as usize + dx as usize) * 4;
            blend_px(&mut dst[di..di + 4], &src[si..si + 4]);
        }
    }
}

fn blend_px(dst: &mut [u8], src: &[u8]) {
    let a = u16::from(src[3]);
    if a == 0 {
        return;
    }
    if a == 255 {
        dst.copy_from_slice(src);
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        dst[c] = ((u16::from(src[c]) * a + u16::from(dst[c]) * inv + 127) / 255) as u8;
    }
    dst[3] = (a + (u16::from(dst[3]) * inv + 127) / 255).min(255) as u8;
}

#[cfg(test)]
#[path = "../../tests/unit/compose/overlay.rs"]
mod tests;

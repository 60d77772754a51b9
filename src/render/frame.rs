use image::{RgbaImage, imageops};

use crate::{
    assets::store::PreparedImage,
    camera::solver::visible_rect,
    composition::model::OutlineStyle,
    eval::evaluator::CameraState,
    foundation::core::{Canvas, Region},
    foundation::error::{PanreelError, PanreelResult},
};

/// One opaque output frame in row-major RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pixel bytes; alpha is always 255.
    pub data: Vec<u8>,
}

/// A region outline with its activation window on the clip timeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutlineWindow {
    /// Region in source coordinates.
    pub region: Region,
    /// Window start in seconds (the target's hold start).
    pub start_secs: f64,
    /// Window end in seconds.
    pub end_secs: f64,
}

impl OutlineWindow {
    /// Whether the outline is active at `secs`.
    pub fn contains(&self, secs: f64) -> bool {
        self.start_secs <= secs && secs <= self.end_secs
    }
}

/// Render one output frame for a camera pose.
///
/// Crops the composite to the camera's visible rectangle, resizes with
/// Lanczos3 resampling to exactly the output canvas, draws any outline
/// whose window contains `secs`, and flattens alpha over opaque black.
/// Pure for a given `(camera, outlines, secs)` with no hidden state, which
/// is what allows frame-parallel rendering.
pub fn render_frame(
    composite: &PreparedImage,
    camera: CameraState,
    canvas: Canvas,
    outlines: &[OutlineWindow],
    secs: f64,
    style: Option<&OutlineStyle>,
) -> PanreelResult<FrameRGBA> {
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PanreelError::validation("output canvas must be non-zero"));
    }
    if composite.width == 0 || composite.height == 0 {
        return Err(PanreelError::validation("composite image must be non-empty"));
    }

    let vis = visible_rect(camera.center, camera.zoom, composite.width, composite.height);

    // Integer crop bounds; the solver keeps the rect inside the image, so
    // only rounding needs guarding here.
    let left = (vis.x0.floor().max(0.0) as u32).min(composite.width - 1);
    let top = (vis.y0.floor().max(0.0) as u32).min(composite.height - 1);
    let right = (vis.x1.ceil() as u32).clamp(left + 1, composite.width);
    let bottom = (vis.y1.ceil() as u32).clamp(top + 1, composite.height);
    let crop_w = right - left;
    let crop_h = bottom - top;

    let mut crop_pixels = vec![0u8; crop_w as usize * crop_h as usize * 4];
    let src = composite.rgba8.as_ref();
    let src_stride = composite.width as usize * 4;
    let crop_stride = crop_w as usize * 4;
    for row in 0..crop_h as usize {
        let so = (top as usize + row) * src_stride + left as usize * 4;
        crop_pixels[row * crop_stride..(row + 1) * crop_stride]
            .copy_from_slice(&src[so..so + crop_stride]);
    }
    let crop = RgbaImage::from_raw(crop_w, crop_h, crop_pixels)
        .ok_or_else(|| PanreelError::validation("crop buffer size mismatch"))?;

    let mut out = imageops::resize(
        &crop,
        canvas.width,
        canvas.height,
        imageops::FilterType::Lanczos3,
    );

    if let Some(style) = style {
        let scale_x = f64::from(canvas.width) / f64::from(crop_w);
        let scale_y = f64::from(canvas.height) / f64::from(crop_h);
        for window in outlines.iter().filter(|w| w.contains(secs)) {
            draw_outline(&mut out, window.region, left, top, scale_x, scale_y, style);
        }
    }

    let mut data = out.into_raw();
    flatten_over_black(&mut data);

    Ok(FrameRGBA {
        width: canvas.width,
        height: canvas.height,
        data,
    })
}

// Transform the region into output-frame space with the same crop/scale
// mapping the resize used, then paint four clipped edge bands.
fn draw_outline(
    frame: &mut RgbaImage,
    region: Region,
    crop_left: u32,
    crop_top: u32,
    scale_x: f64,
    scale_y: f64,
    style: &OutlineStyle,
) {
    let x0 = ((f64::from(region.x) - f64::from(crop_left)) * scale_x).round() as i64;
    let y0 = ((f64::from(region.y) - f64::from(crop_top)) * scale_y).round() as i64;
    let x1 = x0 + (f64::from(region.width) * scale_x).round() as i64;
    let y1 = y0 + (f64::from(region.height) * scale_y).round() as i64;
    let t = i64::from(style.thickness_px.max(1));

    let bands = [
        (x0, y0, x1, y0 + t),
        (x0, y1 - t, x1, y1),
        (x0, y0, x0 + t, y1),
        (x1 - t, y0, x1, y1),
    ];
    let (w, h) = (i64::from(frame.width()), i64::from(frame.height()));
    for (bx0, by0, bx1, by1) in bands {
        for y in by0.max(0)..by1.min(h) {
            for x in bx0.max(0)..bx1.min(w) {
                blend_outline_px(frame.get_pixel_mut(x as u32, y as u32), style.color_rgba8);
            }
        }
    }
}

fn blend_outline_px(px: &mut image::Rgba<u8>, color: [u8; 4]) {
    let a = u16::from(color[3]);
    if a == 0 {
        return;
    }
    let inv = 255 - a;
    for c in 0..3 {
        px.0[c] = ((u16::from(color[c]) * a + u16::from(px.0[c]) * inv + 127) / 255) as u8;
    }
}

// Output pixels are always opaque; any alpha left in the composite is
// flattened over black before the frame leaves the renderer.
fn flatten_over_black(data: &mut [u8]) {
    for px in data.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 255 {
            continue;
        }
        for c in 0..3 {
            px[c] = ((u16::from(px[c]) * a + 127) / 255) as u8;
        }
        px[3] = 255;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;

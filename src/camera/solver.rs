use crate::foundation::core::{Point, Rect, Region};
use crate::foundation::error::PanreelResult;

/// Compute the zoom factor that frames `region` in the viewport with a
/// padding margin.
///
/// Smaller regions produce higher zoom (more detail), larger regions lower
/// zoom (more context). The result is clamped to `[min_zoom, max_zoom]`.
pub fn zoom_to_fit(
    region: Region,
    image_w: u32,
    image_h: u32,
    padding_factor: f64,
    min_zoom: f64,
    max_zoom: f64,
) -> PanreelResult<f64> {
    region.validate()?;
    let zoom_x = f64::from(image_w) * padding_factor / f64::from(region.width);
    let zoom_y = f64::from(image_h) * padding_factor / f64::from(region.height);
    Ok(zoom_x.min(zoom_y).clamp(min_zoom, max_zoom))
}

/// The source-image rectangle visible to a camera at `center` with `zoom`.
///
/// The rectangle spans `image_w/zoom × image_h/zoom`, is centered on
/// `center`, then **shifted** back inside `[0, image_w] × [0, image_h]`.
/// Shifting (rather than clamping each edge) preserves the requested
/// width/height, and with it the zoom level actually displayed; only when
/// the image itself is smaller than the viewport is the rectangle
/// truncated to image bounds.
pub fn visible_rect(center: Point, zoom: f64, image_w: u32, image_h: u32) -> Rect {
    let image_w = f64::from(image_w);
    let image_h = f64::from(image_h);
    let zoom = zoom.max(1e-6);
    let vis_w = image_w / zoom;
    let vis_h = image_h / zoom;

    let x0 = shift_into(center.x - vis_w / 2.0, vis_w, image_w);
    let y0 = shift_into(center.y - vis_h / 2.0, vis_h, image_h);

    Rect::new(x0, y0, (x0 + vis_w).min(image_w), (y0 + vis_h).min(image_h))
}

// Slide a span of fixed length back inside [0, limit]. Spans longer than
// the limit pin to 0; the caller truncates the far edge.
fn shift_into(start: f64, span: f64, limit: f64) -> f64 {
    if span >= limit {
        return 0.0;
    }
    start.clamp(0.0, limit - span)
}

#[cfg(test)]
#[path = "../../tests/unit/camera/solver.rs"]
mod tests;

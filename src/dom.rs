use crate::constants::{CANVAS_ID, CURSOR_PROPERTY, MAX_DEVICE_PIXEL_RATIO};
use glam::Vec2;
use stage_core::{letterbox, Cursor, Letterbox, SurfaceRect};
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

#[inline]
pub fn js_err(e: JsValue) -> anyhow::Error {
    anyhow::anyhow!("{:?}", e)
}

/// Create the stage canvas and append it to `container`.
pub fn mount_canvas(
    document: &web::Document,
    container: &web::Element,
) -> anyhow::Result<web::HtmlCanvasElement> {
    let canvas: web::HtmlCanvasElement = document
        .create_element("canvas")
        .map_err(js_err)?
        .dyn_into()
        .map_err(|_| anyhow::anyhow!("created element is not a canvas"))?;
    canvas.set_id(CANVAS_ID);
    _ = canvas.style().set_property("display", "block");
    container.append_child(&canvas).map_err(js_err)?;
    Ok(canvas)
}

/// Letterbox the canvas inside its container and match the backing store to
/// the CSS size times devicePixelRatio.
pub fn fit_canvas(
    canvas: &web::HtmlCanvasElement,
    container: &web::Element,
    target_aspect: f32,
) -> Letterbox {
    let available = Vec2::new(container.client_width() as f32, container.client_height() as f32);
    let fit = letterbox(available, target_aspect);
    let style = canvas.style();
    _ = style.set_property("width", &format!("{}px", fit.width));
    _ = style.set_property("height", &format!("{}px", fit.height));
    _ = style.set_property("margin-left", &format!("{}px", fit.offset_x));
    _ = style.set_property("margin-top", &format!("{}px", fit.offset_y));
    sync_canvas_backing_size(canvas, &fit);
    fit
}

fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement, fit: &Letterbox) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio().clamp(1.0, MAX_DEVICE_PIXEL_RATIO);
        let w_px = (fit.width as f64 * dpr) as u32;
        let h_px = (fit.height as f64 * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

/// Client rect of the canvas, or `None` while it has no layout box.
pub fn surface_rect(canvas: &web::HtmlCanvasElement) -> Option<SurfaceRect> {
    let rect = canvas.get_bounding_client_rect();
    (rect.width() > 0.0 && rect.height() > 0.0).then(|| {
        SurfaceRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        )
    })
}

pub fn viewport_size() -> Option<Vec2> {
    let w = web::window()?;
    let width = w.inner_width().ok()?.as_f64()?;
    let height = w.inner_height().ok()?.as_f64()?;
    Some(Vec2::new(width as f32, height as f32))
}

#[inline]
pub fn set_cursor(canvas: &web::HtmlCanvasElement, cursor: Cursor) {
    _ = canvas.style().set_property(CURSOR_PROPERTY, cursor.css());
}

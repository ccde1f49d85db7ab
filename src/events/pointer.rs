use super::ListenerGuard;
use crate::dom;
use glam::Vec2;
use stage_core::{Camera, PointerInteractionController, StageCoordinator, TARGET_ASPECT};
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

#[derive(Clone)]
pub struct StageWiring {
    pub canvas: web::HtmlCanvasElement,
    pub container: web::Element,
    pub stage: Rc<StageCoordinator>,
    pub controller: Rc<RefCell<PointerInteractionController>>,
}

/// Canvas hover/click for the interactive objects, window pointer moves for
/// parallax and window resize for letterboxing. Dropping the guards removes
/// every listener.
pub fn wire_stage_events(w: &StageWiring) -> anyhow::Result<Vec<ListenerGuard>> {
    let window = web::window().ok_or_else(|| anyhow::anyhow!("no window"))?;
    Ok(vec![
        wire_pointermove(w)?,
        wire_pointerleave(w)?,
        wire_click(w)?,
        wire_parallax(&window, w)?,
        wire_resize(&window, w)?,
    ])
}

#[inline]
fn client_pos(ev: &web::MouseEvent) -> Vec2 {
    Vec2::new(ev.client_x() as f32, ev.client_y() as f32)
}

/// Track the canvas rect; the page may have scrolled or reflowed since the
/// last event. A controller left inert at mount is set up once the canvas has
/// a layout box.
fn refresh_surface(w: &StageWiring) {
    let Some(rect) = dom::surface_rect(&w.canvas) else {
        return;
    };
    let mut controller = w.controller.borrow_mut();
    if controller.is_ready() {
        controller.set_surface(rect);
    } else {
        controller.setup(Some(Camera::default()), Some(rect));
    }
}

fn wire_pointermove(w: &StageWiring) -> anyhow::Result<ListenerGuard> {
    let target = w.canvas.clone();
    let w = w.clone();
    ListenerGuard::new(&target, "pointermove", move |ev: web::PointerEvent| {
        refresh_surface(&w);
        let cursor = {
            let mut scene = w.stage.scene().borrow_mut();
            w.controller
                .borrow_mut()
                .pointer_move(client_pos(&ev), &mut scene)
        };
        dom::set_cursor(&w.canvas, cursor);
    })
}

fn wire_pointerleave(w: &StageWiring) -> anyhow::Result<ListenerGuard> {
    let target = w.canvas.clone();
    let w = w.clone();
    ListenerGuard::new(&target, "pointerleave", move |_ev: web::PointerEvent| {
        let cursor = {
            let mut scene = w.stage.scene().borrow_mut();
            w.controller.borrow_mut().pointer_leave(&mut scene)
        };
        dom::set_cursor(&w.canvas, cursor);
    })
}

fn wire_click(w: &StageWiring) -> anyhow::Result<ListenerGuard> {
    let target = w.canvas.clone();
    let w = w.clone();
    ListenerGuard::new(&target, "click", move |ev: web::MouseEvent| {
        refresh_surface(&w);
        let mut controller = w.controller.borrow_mut();
        if controller.dispatch_click(client_pos(&ev), w.stage.scene()) {
            log::debug!("[input] click handled");
            dom::set_cursor(&w.canvas, controller.cursor());
        }
    })
}

fn wire_parallax(window: &web::Window, w: &StageWiring) -> anyhow::Result<ListenerGuard> {
    let w = w.clone();
    ListenerGuard::new(window, "pointermove", move |ev: web::PointerEvent| {
        if let Some(viewport) = dom::viewport_size() {
            w.stage.handle_pointer_move(client_pos(&ev), viewport);
        }
    })
}

fn wire_resize(window: &web::Window, w: &StageWiring) -> anyhow::Result<ListenerGuard> {
    let w = w.clone();
    ListenerGuard::new(window, "resize", move |_ev: web::Event| {
        dom::fit_canvas(&w.canvas, &w.container, TARGET_ASPECT);
        refresh_surface(&w);
    })
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use fundref::HierarchyGraph;
use leptos::*;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent};

use super::render;
use super::state::{GraphCanvasState, PointerRelease};
use crate::config::{GRAPH_HEIGHT, GRAPH_WIDTH, MINIMAP_HEIGHT, MINIMAP_WIDTH};

/// Seconds simulated per animation frame.
const FRAME_DT: f32 = 0.016;

/// Interactive canvas for one hierarchy graph.
///
/// The graph is fixed for the lifetime of the component; the parent mounts a
/// new canvas for every rebuilt graph. `on_select` receives the id of a
/// clicked node, or `None` when the background is clicked.
#[component]
pub fn GraphCanvas(
    graph: HierarchyGraph,
    #[prop(into)] on_select: Callback<Option<String>>,
    #[prop(default = GRAPH_HEIGHT)] height: f64,
) -> impl IntoView {
    let canvas_ref = create_node_ref::<html::Canvas>();
    let state: Rc<RefCell<Option<GraphCanvasState>>> = Rc::new(RefCell::new(None));
    let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let running = Rc::new(Cell::new(true));
    let (state_init, animate_init, running_init) = (state.clone(), animate.clone(), running.clone());

    create_effect(move |_| {
        let Some(el) = canvas_ref.get() else {
            return;
        };
        if state_init.borrow().is_some() {
            return;
        }
        let canvas: HtmlCanvasElement = (*el).clone();

        let width = canvas
            .parent_element()
            .map(|p| p.client_width() as f64)
            .filter(|w| *w > 0.0)
            .unwrap_or(GRAPH_WIDTH);
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);

        let ctx: CanvasRenderingContext2d = match canvas.get_context("2d") {
            Ok(Some(ctx)) => match ctx.dyn_into() {
                Ok(ctx) => ctx,
                Err(_) => {
                    log::error!("Canvas context is not 2d");
                    return;
                }
            },
            _ => {
                log::error!("Canvas 2d context unavailable");
                return;
            }
        };
        *state_init.borrow_mut() = Some(GraphCanvasState::new(&graph, width, height));
        log::debug!(
            "Graph canvas ready: {} nodes, {} edges",
            graph.nodes.len(),
            graph.edges.len()
        );

        let (state_anim, animate_inner, running_anim) =
            (state_init.clone(), animate_init.clone(), running_init.clone());
        *animate_init.borrow_mut() = Some(Closure::new(move || {
            if !running_anim.get() {
                let _ = animate_inner.borrow_mut().take();
                return;
            }
            if let Some(ref mut s) = *state_anim.borrow_mut() {
                s.tick(FRAME_DT);
                render::render(s, &ctx);
            }
            if let (Some(cb), Some(window)) = (animate_inner.borrow().as_ref(), web_sys::window()) {
                let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
            }
        }));
        if let (Some(cb), Some(window)) = (animate_init.borrow().as_ref(), web_sys::window()) {
            let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    });

    let (state_cleanup, running_cleanup) = (state.clone(), running.clone());
    on_cleanup(move || {
        running_cleanup.set(false);
        state_cleanup.borrow_mut().take();
    });

    let state_md = state.clone();
    let on_mousedown = move |ev: MouseEvent| {
        let Some((x, y)) = local_point(canvas_ref, &ev) else {
            return;
        };
        if let Some(ref mut s) = *state_md.borrow_mut() {
            let map = s.minimap(MINIMAP_WIDTH, MINIMAP_HEIGHT);
            if map.contains(x, y) {
                let (gx, gy) = map.unproject(x, y);
                let (w, h) = (s.width, s.height);
                s.transform.center_on(gx, gy, w, h);
            } else {
                s.pointer_down(x, y);
            }
        }
    };

    let state_mm = state.clone();
    let on_mousemove = move |ev: MouseEvent| {
        let Some((x, y)) = local_point(canvas_ref, &ev) else {
            return;
        };
        if let Some(ref mut s) = *state_mm.borrow_mut() {
            s.pointer_move(x, y);
        }
    };

    let state_mu = state.clone();
    let on_mouseup = move |_: MouseEvent| {
        // Release the borrow before notifying the parent.
        let release = state_mu.borrow_mut().as_mut().map(|s| s.pointer_up());
        match release {
            Some(PointerRelease::Node(id)) => on_select.call(Some(id)),
            Some(PointerRelease::Background) => on_select.call(None),
            Some(PointerRelease::Moved) | None => {}
        }
    };

    let state_ml = state.clone();
    let on_mouseleave = move |_: MouseEvent| {
        if let Some(ref mut s) = *state_ml.borrow_mut() {
            s.pointer_leave();
        }
    };

    let state_wh = state;
    let on_wheel = move |ev: WheelEvent| {
        ev.prevent_default();
        let Some((x, y)) = local_point(canvas_ref, &ev) else {
            return;
        };
        if let Some(ref mut s) = *state_wh.borrow_mut() {
            let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
            s.transform.zoom_at(x, y, factor);
        }
    };

    view! {
        <canvas
            node_ref=canvas_ref
            class="graph-canvas"
            on:mousedown=on_mousedown
            on:mousemove=on_mousemove
            on:mouseup=on_mouseup
            on:mouseleave=on_mouseleave
            on:wheel=on_wheel
            style="display: block; cursor: grab;"
        />
    }
}

/// Pointer position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
    let el = canvas_ref.get_untracked()?;
    let rect = el.get_bounding_client_rect();
    Some((
        ev.client_x() as f64 - rect.left(),
        ev.client_y() as f64 - rect.top(),
    ))
}

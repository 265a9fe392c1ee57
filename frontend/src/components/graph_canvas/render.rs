use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{GraphCanvasState, Minimap};
use crate::config::{MINIMAP_HEIGHT, MINIMAP_WIDTH};

/// Zoom above which relation labels are drawn on edges.
const EDGE_LABEL_ZOOM: f64 = 1.2;

fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
    ctx.set_fill_style_str("#fafafa");
    ctx.fill_rect(0.0, 0.0, state.width, state.height);
    ctx.save();
    let _ = ctx.translate(state.transform.x, state.transform.y);
    let _ = ctx.scale(state.transform.k, state.transform.k);
    draw_edges(state, ctx);
    draw_nodes(state, ctx);
    ctx.restore();
    draw_minimap(state, ctx);
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
    let k = state.transform.k;
    let (line_width, arrow_size) = (1.5 / k, 7.0 / k);
    let t = ease_out_cubic(state.hover.highlight_t);
    let show_labels = k >= EDGE_LABEL_ZOOM;

    state.graph.visit_edges(|n1, n2, _| {
        let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
        let (dx, dy) = (x2 - x1, y2 - y1);
        let dist = (dx * dx + dy * dy).sqrt();
        if dist < 0.001 {
            return;
        }
        let (r1, r2) = (n1.data.user_data.radius, n2.data.user_data.radius);

        let highlighted = state.is_highlighted(n1.index()) && state.is_highlighted(n2.index());
        let alpha = if highlighted {
            0.5 + 0.4 * t
        } else {
            0.5 - 0.35 * t
        };
        let color = format!("rgba(90, 90, 110, {})", alpha);

        let (ux, uy) = (dx / dist, dy / dist);
        ctx.set_stroke_style_str(&color);
        ctx.set_line_width(if highlighted {
            line_width * (1.0 + 0.5 * t)
        } else {
            line_width
        });
        ctx.begin_path();
        ctx.move_to(x1 + ux * r1, y1 + uy * r1);
        ctx.line_to(x2 - ux * (r2 + arrow_size), y2 - uy * (r2 + arrow_size));
        ctx.stroke();

        ctx.set_fill_style_str(&color);
        let (tip_x, tip_y) = (x2 - ux * r2, y2 - uy * r2);
        let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
        let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
        ctx.begin_path();
        ctx.move_to(tip_x, tip_y);
        ctx.line_to(back_x + px, back_y + py);
        ctx.line_to(back_x - px, back_y - py);
        ctx.close_path();
        ctx.fill();

        if show_labels {
            if let Some(relation) = state.relation(n1.index(), n2.index()) {
                ctx.set_fill_style_str(&format!("rgba(90, 90, 110, {})", alpha));
                ctx.set_font(&format!("{}px sans-serif", 9.0 / k));
                let _ = ctx.fill_text(relation.label(), (x1 + x2) / 2.0, (y1 + y2) / 2.0 - 3.0 / k);
            }
        }
    });
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
    let k = state.transform.k;
    let t = ease_out_cubic(state.hover.highlight_t);
    let has_highlight = state.hover.node.is_some();

    state.graph.visit_nodes(|node| {
        let idx = node.index();
        let info = &node.data.user_data;
        let (x, y) = (node.x() as f64, node.y() as f64);
        let highlighted = has_highlight && state.is_highlighted(idx);
        let hovered = state.hover.node == Some(idx);

        let (alpha, radius) = if !has_highlight || highlighted {
            let grow = if hovered { 0.35 } else if highlighted { 0.15 } else { 0.0 };
            (1.0, info.radius * (1.0 + grow * t))
        } else {
            (1.0 - 0.7 * t, info.radius)
        };

        if hovered && t > 0.01 {
            let glow = info.radius * (1.8 + 1.2 * t);
            if let Ok(gradient) = ctx.create_radial_gradient(x, y, radius * 0.3, x, y, glow) {
                let _ = gradient.add_color_stop(0.0, &format!("rgba(25, 118, 210, {})", 0.3 * t));
                let _ = gradient.add_color_stop(1.0, "rgba(25, 118, 210, 0)");
                ctx.begin_path();
                let _ = ctx.arc(x, y, glow, 0.0, 2.0 * PI);
                #[allow(deprecated)]
                ctx.set_fill_style(&gradient);
                ctx.fill();
            }
        }

        ctx.set_global_alpha(alpha);
        ctx.begin_path();
        let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
        ctx.set_fill_style_str(info.color);
        ctx.fill();

        if state.selected == Some(idx) {
            ctx.begin_path();
            let _ = ctx.arc(x, y, radius + 3.0 / k, 0.0, 2.0 * PI);
            ctx.set_stroke_style_str("#212121");
            ctx.set_line_width(2.0 / k);
            ctx.stroke();
        }

        ctx.set_fill_style_str("#212121");
        ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
        let _ = ctx.fill_text(&info.label, x + radius + 3.0, y + 3.0);
        ctx.set_global_alpha(1.0);
    });
}

fn draw_minimap(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
    let map: Minimap = state.minimap(MINIMAP_WIDTH, MINIMAP_HEIGHT);

    ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
    ctx.fill_rect(map.x, map.y, map.width, map.height);
    ctx.set_stroke_style_str("#bdbdbd");
    ctx.set_line_width(1.0);
    ctx.stroke_rect(map.x, map.y, map.width, map.height);

    ctx.set_stroke_style_str("rgba(90, 90, 110, 0.4)");
    state.graph.visit_edges(|n1, n2, _| {
        let (x1, y1) = map.project(n1.x() as f64, n1.y() as f64);
        let (x2, y2) = map.project(n2.x() as f64, n2.y() as f64);
        ctx.begin_path();
        ctx.move_to(x1, y1);
        ctx.line_to(x2, y2);
        ctx.stroke();
    });

    state.graph.visit_nodes(|node| {
        let (x, y) = map.project(node.x() as f64, node.y() as f64);
        ctx.begin_path();
        let _ = ctx.arc(x, y, 2.0, 0.0, 2.0 * PI);
        ctx.set_fill_style_str(node.data.user_data.color);
        ctx.fill();
    });

    let viewport = state.viewport();
    let (vx0, vy0) = map.project(viewport.min_x, viewport.min_y);
    let (vx1, vy1) = map.project(viewport.max_x, viewport.max_y);
    ctx.set_stroke_style_str("#1976d2");
    ctx.set_line_width(1.5);
    ctx.stroke_rect(vx0, vy0, vx1 - vx0, vy1 - vy0);
}

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use geo::{LineString, MultiPolygon};
use leptos::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, CanvasWindingRule, HtmlCanvasElement, MouseEvent};

use regionmap_shared::spatial::ProjectedMap;
use regionmap_shared::{HoveredRegion, MapInteraction, MapOption, RegisteredMap};

use crate::app::{CHART_HEIGHT, CHART_WIDTH, ChartOption, Hovered, Selected};
use crate::render_loop::RepaintScheduler;

fn device_pixel_ratio() -> f64 {
    web_sys::window()
        .map(|w| w.device_pixel_ratio())
        .unwrap_or(1.0)
        .max(1.0)
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()
        .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok())
}

fn trace_ring(ctx: &CanvasRenderingContext2d, ring: &LineString<f64>) {
    let mut coords = ring.coords();
    let Some(first) = coords.next() else {
        return;
    };
    ctx.move_to(first.x, first.y);
    for c in coords {
        ctx.line_to(c.x, c.y);
    }
    ctx.close_path();
}

fn trace_shape(ctx: &CanvasRenderingContext2d, shape: &MultiPolygon<f64>) {
    ctx.begin_path();
    for polygon in &shape.0 {
        trace_ring(ctx, polygon.exterior());
        for hole in polygon.interiors() {
            trace_ring(ctx, hole);
        }
    }
}

fn draw_map(
    ctx: &CanvasRenderingContext2d,
    projected: &ProjectedMap,
    option: &MapOption,
    hovered: Option<usize>,
) {
    ctx.set_fill_style_str(option.background_color);
    ctx.fill_rect(0.0, 0.0, CHART_WIDTH, CHART_HEIGHT);

    let styles: Vec<_> = projected
        .regions()
        .iter()
        .enumerate()
        .map(|(idx, region)| option.geo.style_for(region.name.as_deref(), hovered == Some(idx)))
        .collect();

    ctx.set_line_join("round");
    for (region, style) in projected.regions().iter().zip(&styles) {
        trace_shape(ctx, &region.shape);
        ctx.set_fill_style_str(style.area_color);
        ctx.fill_with_canvas_winding_rule(CanvasWindingRule::Evenodd);
        ctx.set_stroke_style_str(style.border_color);
        ctx.set_line_width(style.border_width);
        ctx.stroke();
    }

    // Labels go on top of every fill so neighbours never cover them.
    ctx.set_text_align("center");
    ctx.set_text_baseline("middle");
    for (region, style) in projected.regions().iter().zip(&styles) {
        if !style.label_show {
            continue;
        }
        let (Some(name), Some((x, y))) = (region.name.as_deref(), region.label_at) else {
            continue;
        };
        ctx.set_font(&style.label_font());
        ctx.set_fill_style_str(style.label_color);
        let _ = ctx.fill_text(name, x, y);
    }
}

fn publish_hover(hovered: RwSignal<Option<HoveredRegion>>, target: Option<HoveredRegion>) {
    if hovered.with_untracked(|current| *current != target) {
        hovered.set(target);
    }
}

/// Canvas surface for the registered map: paints regions and turns pointer
/// input into hover and selection updates.
#[component]
pub fn MapCanvas() -> impl IntoView {
    let map: Arc<RegisteredMap> = expect_context();
    let ChartOption(option) = expect_context();
    let Hovered(hovered) = expect_context();
    let Selected(selected) = expect_context();

    let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
    let projected = Rc::new(ProjectedMap::build(&map, CHART_WIDTH, CHART_HEIGHT));
    let interaction = Rc::new(RefCell::new(MapInteraction::default()));
    let warned_no_context = Rc::new(Cell::new(false));

    let scheduler = Rc::new(RepaintScheduler::new({
        let projected = projected.clone();
        move || {
            let Some(canvas) = canvas_ref.get_untracked() else {
                return;
            };
            let canvas: &HtmlCanvasElement = &canvas;
            let dpr = device_pixel_ratio();
            let width = (CHART_WIDTH * dpr).round() as u32;
            let height = (CHART_HEIGHT * dpr).round() as u32;
            if canvas.width() != width || canvas.height() != height {
                canvas.set_width(width);
                canvas.set_height(height);
            }
            let Some(ctx) = context_2d(canvas) else {
                if !warned_no_context.replace(true) {
                    web_sys::console::warn_1(&"map canvas: 2d context unavailable".into());
                }
                return;
            };
            let _ = ctx.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0);
            let hovered_idx = hovered.with_untracked(|h| h.as_ref().map(|h| h.index));
            option.with_untracked(|option| {
                draw_map(&ctx, &projected, option, hovered_idx);
            });
        }
    }));

    // Repaint whenever the option (selection) or hover changes.
    Effect::new({
        let scheduler = scheduler.clone();
        move || {
            option.track();
            hovered.track();
            if canvas_ref.get().is_none() {
                return;
            }
            scheduler.request();
        }
    });

    let local_point = move |e: &MouseEvent| -> [f64; 2] {
        match canvas_ref.get_untracked() {
            Some(el) => {
                let rect = el.get_bounding_client_rect();
                [
                    e.client_x() as f64 - rect.left(),
                    e.client_y() as f64 - rect.top(),
                ]
            }
            None => [e.offset_x() as f64, e.offset_y() as f64],
        }
    };

    let on_pointer_move = {
        let projected = projected.clone();
        let interaction = interaction.clone();
        move |e: web_sys::PointerEvent| {
            let target = {
                let mut state = interaction.borrow_mut();
                state.pointer_move(&projected, local_point(&e));
                state.hover_target(&projected)
            };
            publish_hover(hovered, target);
        }
    };

    let on_pointer_leave = {
        let interaction = interaction.clone();
        move |_: web_sys::PointerEvent| {
            interaction.borrow_mut().pointer_leave();
            publish_hover(hovered, None);
        }
    };

    let on_pointer_down = {
        let interaction = interaction.clone();
        move |e: web_sys::PointerEvent| {
            interaction.borrow_mut().pointer_down(local_point(&e));
        }
    };

    let on_click = move |e: MouseEvent| {
        // The tooltip also triggers on click, which matters for touch input.
        let (target, next) = {
            let mut state = interaction.borrow_mut();
            let changed = state.click(&projected, local_point(&e));
            (
                state.hover_target(&projected),
                changed.then(|| state.selection().clone()),
            )
        };
        publish_hover(hovered, target);
        if let Some(next) = next {
            selected.set(next);
        }
    };

    view! {
        <canvas
            node_ref=canvas_ref
            style="position: absolute; inset: 0; width: 100%; height: 100%; display: block;"
            style:cursor=move || if hovered.with(Option::is_some) { "pointer" } else { "default" }
            on:pointermove=on_pointer_move
            on:pointerleave=on_pointer_leave
            on:pointerdown=on_pointer_down
            on:click=on_click
        />
    }
}

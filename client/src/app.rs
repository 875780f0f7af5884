use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use gloo_timers::callback::Timeout;
use leptos::prelude::*;

use regionmap_shared::tooltip::{TooltipAction, place_tooltip, tooltip_content};
use regionmap_shared::{
    BUNDLED_MAP_NAME, GeoFeatureCollection, HoveredRegion, MapOption, MapRegistry, RegisteredMap,
    Selection,
};

use crate::canvas::MapCanvas;

/// Fixed widget surface, CSS px. The widget does not resize.
pub(crate) const CHART_WIDTH: f64 = 1200.0;
pub(crate) const CHART_HEIGHT: f64 = 900.0;

/// First color of the default chart palette, used for legend markers.
const LEGEND_MARKER_COLOR: &str = "#5470c6";

thread_local! {
    static MAP_REGISTRY: RefCell<MapRegistry> = RefCell::new(MapRegistry::default());
}

/// Newtype wrappers so each signal gets its own Leptos context slot.
#[derive(Clone, Copy)]
pub(crate) struct Hovered(pub RwSignal<Option<HoveredRegion>>);
#[derive(Clone, Copy)]
pub(crate) struct Selected(pub RwSignal<Selection>);
#[derive(Clone, Copy)]
pub(crate) struct ChartOption(pub Memo<MapOption>);

/// Make the bundled dataset available under its map name. A map already
/// registered on this thread (e.g. by an earlier mount) is reused as is.
fn register_bundled_map() -> Arc<RegisteredMap> {
    MAP_REGISTRY.with(|slot| {
        let mut registry = slot.borrow_mut();
        if let Some(map) = registry.get(BUNDLED_MAP_NAME) {
            return map;
        }
        let collection = GeoFeatureCollection::bundled();
        if collection.is_empty() {
            web_sys::console::warn_1(
                &format!("map {BUNDLED_MAP_NAME}: bundled dataset has no features").into(),
            );
        }
        registry.register(BUNDLED_MAP_NAME, collection)
    })
}

/// Root widget. Owns the selection and derives the chart option from it.
#[component]
pub fn App() -> impl IntoView {
    let map = register_bundled_map();

    let hovered: RwSignal<Option<HoveredRegion>> = RwSignal::new(None);
    let selected: RwSignal<Selection> = RwSignal::new(Selection::default());
    let option = Memo::new({
        let map = map.clone();
        move |_| selected.with(|selection| MapOption::build(&map.name, &map.catalog, selection))
    });

    provide_context(map);
    provide_context(Hovered(hovered));
    provide_context(Selected(selected));
    provide_context(ChartOption(option));

    let background = option.with_untracked(|option| option.background_color);

    view! {
        <div style="width: 1200px; height: 900px; background-color: #eee;">
            <div
                id=BUNDLED_MAP_NAME
                style=format!(
                    "position: relative; width: 100%; height: 100%; overflow: hidden; font-family: sans-serif; background-color: {background};"
                )
            >
                <MapCanvas />
                <TitleBlock />
                <LegendBar />
                <Tooltip />
            </div>
        </div>
    }
}

/// Static title and subtitle in the top-left corner.
#[component]
fn TitleBlock() -> impl IntoView {
    let ChartOption(option) = expect_context();

    option.with_untracked(|option| {
        option
            .title
            .iter()
            .map(|title| {
                view! {
                    <div style=format!(
                        "position: absolute; top: {}; left: {}; pointer-events: none;",
                        title.top, title.left
                    )>
                        <div style=format!("{} font-weight: bold;", title.text_style.css())>
                            {title.text.clone()}
                        </div>
                        <div style=format!("{} margin-top: 6px;", title.subtext_style.css())>
                            {title.subtext.clone()}
                        </div>
                    </div>
                }
            })
            .collect_view()
    })
}

/// Horizontal legend centered along the top edge.
#[component]
fn LegendBar() -> impl IntoView {
    let ChartOption(option) = expect_context();

    option.with_untracked(|option| {
        option
            .legend
            .iter()
            .filter(|legend| legend.show && !legend.data.is_empty())
            .map(|legend| {
                let items = legend
                    .data
                    .iter()
                    .map(|label| {
                        view! {
                            <span style="display: inline-flex; align-items: center; gap: 5px; margin: 0 5px;">
                                <span style=format!(
                                    "display: inline-block; width: 10px; height: 10px; border-radius: 50%; background: {LEGEND_MARKER_COLOR};"
                                ) />
                                <span style="font-size: 12px; color: #333;">{label.clone()}</span>
                            </span>
                        }
                    })
                    .collect_view();
                view! {
                    <div style="position: absolute; top: 5px; left: 0; right: 0; display: flex; flex-direction: row; justify-content: center; pointer-events: none;">
                        {items}
                    </div>
                }
            })
            .collect_view()
    })
}

/// Pending tooltip timers. Dropping a `Timeout` cancels it.
#[derive(Default)]
struct TooltipTimers {
    show: RefCell<Option<Timeout>>,
    hide: RefCell<Option<Timeout>>,
}

impl TooltipTimers {
    fn apply(&self, action: TooltipAction, shown: RwSignal<Option<String>>, name: Option<String>) {
        match action {
            TooltipAction::Show { delay_ms } => {
                self.hide.take();
                self.show.take();
                if delay_ms == 0 {
                    shown.set(name);
                } else {
                    *self.show.borrow_mut() =
                        Some(Timeout::new(delay_ms, move || shown.set(name)));
                }
            }
            TooltipAction::Hide { delay_ms } => {
                self.show.take();
                if shown.with_untracked(Option::is_none) {
                    return;
                }
                *self.hide.borrow_mut() = Some(Timeout::new(delay_ms, move || shown.set(None)));
            }
            TooltipAction::Hold => {
                self.hide.take();
            }
            TooltipAction::Ignore => {}
        }
    }
}

fn hovered_name(hovered: Option<&HoveredRegion>) -> Option<String> {
    hovered.and_then(|region| region.name.clone())
}

/// Tooltip for the hovered region, hung below its anchor and kept inside the chart.
#[component]
fn Tooltip() -> impl IntoView {
    let ChartOption(option) = expect_context();
    let Hovered(hovered) = expect_context();

    let (behavior, box_css) =
        option.with_untracked(|option| (option.tooltip.behavior(), option.tooltip.style.css()));

    let tooltip_ref = NodeRef::<leptos::html::Div>::new();
    // Name on display; trails `hovered` by the show/hide delays.
    let shown: RwSignal<Option<String>> = RwSignal::new(None);
    let anchor: RwSignal<[f64; 2]> = RwSignal::new([0.0, 0.0]);
    let over_tooltip = RwSignal::new(false);
    let timers = Rc::new(TooltipTimers::default());

    Effect::new({
        let timers = timers.clone();
        move || {
            let target = hovered.get();
            if let Some(target) = &target {
                anchor.set(target.anchor);
            }
            let name = hovered_name(target.as_ref());
            let action = behavior.on_hover(name.is_some(), over_tooltip.get_untracked());
            timers.apply(action, shown, name);
        }
    });

    // Position after content changes so the measured box is current.
    Effect::new(move || {
        let visible = shown.with(Option::is_some);
        let anchor = anchor.get();
        let Some(el) = tooltip_ref.get() else {
            return;
        };
        if !visible {
            return;
        }
        let size = [el.offset_width() as f64, el.offset_height() as f64];
        let [left, top] = place_tooltip(anchor, size, [CHART_WIDTH, CHART_HEIGHT]);
        let style = web_sys::HtmlElement::style(&el);
        style.set_property("left", &format!("{left}px")).ok();
        style.set_property("top", &format!("{top}px")).ok();
    });

    let on_enter = {
        let timers = timers.clone();
        move |_| {
            if behavior.enterable {
                over_tooltip.set(true);
            }
            timers.apply(behavior.on_tooltip_enter(), shown, None);
        }
    };

    let on_leave = move |_| {
        over_tooltip.set(false);
        let hovering = hovered.with_untracked(|target| hovered_name(target.as_ref()).is_some());
        timers.apply(behavior.on_tooltip_leave(hovering), shown, None);
    };

    let pointer_events = if behavior.enterable { "auto" } else { "none" };

    view! {
        <div
            node_ref=tooltip_ref
            style=format!(
                "position: absolute; left: 0; top: 0; z-index: 10; white-space: nowrap; pointer-events: {pointer_events}; {box_css}"
            )
            style:display=move || if shown.with(Option::is_some) { "block" } else { "none" }
            inner_html=move || shown.with(|name| name.as_deref().map(tooltip_content).unwrap_or_default())
            on:pointerenter=on_enter
            on:pointerleave=on_leave
        />
    }
}

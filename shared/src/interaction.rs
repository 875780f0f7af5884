use crate::selection::{ClickEvent, Selection};
use crate::spatial::ProjectedMap;
use crate::tooltip::resolve_anchor;

/// Pointer travel (CSS px) between press and click past which the gesture is a drag.
pub const CLICK_SLOP_PX: f64 = 5.0;

/// True when a release at `release` still counts as a click for a press at
/// `press`. A click with no recorded press (keyboard, synthetic) counts.
pub fn is_click(press: Option<[f64; 2]>, release: [f64; 2]) -> bool {
    let Some([px, py]) = press else {
        return true;
    };
    (release[0] - px).abs() < CLICK_SLOP_PX && (release[1] - py).abs() < CLICK_SLOP_PX
}

/// The region under the pointer, as the surface and tooltip consume it.
#[derive(Debug, Clone, PartialEq)]
pub struct HoveredRegion {
    /// Index into [`ProjectedMap::regions`].
    pub index: usize,
    pub name: Option<String>,
    /// Screen point the tooltip hangs from.
    pub anchor: [f64; 2],
}

/// Pointer state of one map surface: hover, pending press, and the selection.
///
/// Hover and selection are kept apart; only [`MapInteraction::click`] can move
/// the selection.
#[derive(Debug, Clone, Default)]
pub struct MapInteraction {
    hovered: Option<usize>,
    selection: Selection,
    press: Option<[f64; 2]>,
    pointer: [f64; 2],
    last_click: Option<[f64; 2]>,
}

impl MapInteraction {
    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    pub fn pointer_move(&mut self, map: &ProjectedMap, at: [f64; 2]) {
        self.pointer = at;
        self.last_click = None;
        self.hovered = map.index_at(at[0], at[1]);
    }

    pub fn pointer_leave(&mut self) {
        self.hovered = None;
        self.press = None;
        self.last_click = None;
    }

    pub fn pointer_down(&mut self, at: [f64; 2]) {
        self.press = Some(at);
    }

    /// Apply a click at `at`. Drags and clicks off the map are dropped. A click
    /// on a region also hovers it. Returns true when the selection changed.
    pub fn click(&mut self, map: &ProjectedMap, at: [f64; 2]) -> bool {
        if !is_click(self.press.take(), at) {
            return false;
        }
        let Some(index) = map.index_at(at[0], at[1]) else {
            return false;
        };
        self.pointer = at;
        self.hovered = Some(index);

        let name = map.regions()[index].name.as_deref();
        let event = ClickEvent::region(name, Some(at));
        self.last_click = event.coord;
        match self.selection.on_click(&event) {
            Some(next) => {
                self.selection = next;
                true
            }
            None => false,
        }
    }

    /// Hovered region with its tooltip anchor: the region's dataset anchor,
    /// else the click that hovered it, else the pointer.
    pub fn hover_target(&self, map: &ProjectedMap) -> Option<HoveredRegion> {
        let index = self.hovered?;
        let region = map.regions().get(index)?;
        let data_anchor = region.anchor_at.map(|(x, y)| [x, y]);
        Some(HoveredRegion {
            index,
            name: region.name.clone(),
            anchor: resolve_anchor(data_anchor, self.last_click, self.pointer),
        })
    }
}

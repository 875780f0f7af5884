use crate::catalog::RegionName;

/// The single piece of interaction state: which region, if any, is highlighted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    Unselected,
    Selected(RegionName),
}

/// What kind of element a click landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    /// A region polygon of the map surface.
    Region,
    /// A data point of a series drawn on top of the map.
    Series,
}

/// Click payload narrowed to the fields the controller reads.
#[derive(Debug, Clone, PartialEq)]
pub struct ClickEvent {
    pub kind: ElementKind,
    pub name: Option<String>,
    /// Click position on the map surface, CSS px.
    pub coord: Option<[f64; 2]>,
}

impl ClickEvent {
    pub fn region(name: Option<&str>, coord: Option<[f64; 2]>) -> Self {
        Self {
            kind: ElementKind::Region,
            name: name.map(str::to_owned),
            coord,
        }
    }
}

impl Selection {
    pub fn region(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Selected(name) => Some(name),
        }
    }

    /// Exact, case-sensitive match against the selected name.
    pub fn is(&self, name: &str) -> bool {
        self.region() == Some(name)
    }

    /// Next state for a click, or `None` when the click leaves the state as is.
    ///
    /// Only named region-surface clicks select. The latest click always wins and
    /// there is no way back to [`Selection::Unselected`]. Re-clicking the selected
    /// region reports no change, so observers are not woken for an identical state.
    pub fn on_click(&self, event: &ClickEvent) -> Option<Selection> {
        if event.kind != ElementKind::Region {
            return None;
        }
        let name = event.name.as_deref().filter(|name| !name.is_empty())?;
        if self.is(name) {
            return None;
        }
        tracing::debug!(region = name, "region selected");
        Some(Self::Selected(name.to_owned()))
    }
}

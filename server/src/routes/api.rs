use axum::Json;
use axum::extract::{Query, State};
use regionmap_shared::{MapOption, Selection};
use serde::Deserialize;

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "map": state.map.name,
        "regions": state.map.catalog.len(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct OptionQuery {
    /// Region to render as selected. Names outside the catalog highlight nothing.
    pub selected: Option<String>,
}

/// Chart option for the bundled map, as the widget would build it for the
/// given selection.
pub async fn option(
    State(state): State<AppState>,
    Query(query): Query<OptionQuery>,
) -> Json<MapOption> {
    let selection = match query.selected {
        Some(name) if !name.is_empty() => Selection::Selected(name),
        _ => Selection::Unselected,
    };
    Json(MapOption::build(
        &state.map.name,
        &state.map.catalog,
        &selection,
    ))
}

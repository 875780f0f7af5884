use geo::{BoundingRect, Contains, Coord, InteriorPoint, MapCoords, MultiPolygon, Point, Rect};

use crate::projection::MapProjection;
use crate::registry::RegisteredMap;

const GRID_COLS: usize = 32;
const GRID_ROWS: usize = 32;

/// A feature outline in screen coordinates.
#[derive(Debug, Clone)]
pub struct ProjectedRegion {
    pub name: Option<String>,
    pub shape: MultiPolygon<f64>,
    /// Screen position of the label.
    pub label_at: Option<(f64, f64)>,
    /// Screen position of the dataset's own anchor (`cp`/`center`), if it has one.
    pub anchor_at: Option<(f64, f64)>,
    bounds: Rect<f64>,
}

/// Screen-space outlines of a registered map plus a uniform grid for hit-testing.
/// Rebuilt only when the surface size changes.
#[derive(Debug, Clone)]
pub struct ProjectedMap {
    pub projection: Option<MapProjection>,
    regions: Vec<ProjectedRegion>,
    cells: Vec<Vec<usize>>,
    min_x: f64,
    min_y: f64,
    cell_w: f64,
    cell_h: f64,
}

impl ProjectedMap {
    pub fn build(map: &RegisteredMap, view_w: f64, view_h: f64) -> Self {
        let projection = map
            .bounds
            .and_then(|bounds| MapProjection::fit(bounds, view_w, view_h));
        let Some(projection) = projection else {
            return Self {
                projection: None,
                regions: Vec::new(),
                cells: Vec::new(),
                min_x: 0.0,
                min_y: 0.0,
                cell_w: 1.0,
                cell_h: 1.0,
            };
        };

        let regions: Vec<ProjectedRegion> = map
            .collection
            .features
            .iter()
            .filter_map(|feature| {
                let geometry = feature.geometry.as_ref()?;
                let shape = geometry.map_coords(|c| {
                    let (x, y) = projection.project(c.x, c.y);
                    Coord { x, y }
                });
                let bounds = shape.bounding_rect()?;
                let anchor_at = feature
                    .properties
                    .label_anchor
                    .map(|[lon, lat]| projection.project(lon, lat));
                let label_at = anchor_at.or_else(|| {
                    geometry
                        .interior_point()
                        .map(|point: Point<f64>| projection.project(point.x(), point.y()))
                });
                Some(ProjectedRegion {
                    name: feature.resolved_name().map(str::to_owned),
                    label_at,
                    anchor_at,
                    shape,
                    bounds,
                })
            })
            .collect();

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for region in &regions {
            min_x = min_x.min(region.bounds.min().x);
            min_y = min_y.min(region.bounds.min().y);
            max_x = max_x.max(region.bounds.max().x);
            max_y = max_y.max(region.bounds.max().y);
        }
        if regions.is_empty() {
            (min_x, min_y, max_x, max_y) = (0.0, 0.0, 1.0, 1.0);
        }
        min_x -= 1.0;
        min_y -= 1.0;
        max_x += 1.0;
        max_y += 1.0;

        let cell_w = (max_x - min_x) / GRID_COLS as f64;
        let cell_h = (max_y - min_y) / GRID_ROWS as f64;
        let mut cells = vec![Vec::new(); GRID_COLS * GRID_ROWS];

        for (idx, region) in regions.iter().enumerate() {
            let b = region.bounds;
            let col_start = ((b.min().x - min_x) / cell_w).floor().max(0.0) as usize;
            let col_end = ((b.max().x - min_x) / cell_w).ceil().min(GRID_COLS as f64) as usize;
            let row_start = ((b.min().y - min_y) / cell_h).floor().max(0.0) as usize;
            let row_end = ((b.max().y - min_y) / cell_h).ceil().min(GRID_ROWS as f64) as usize;

            for row in row_start..row_end {
                for col in col_start..col_end {
                    cells[row * GRID_COLS + col].push(idx);
                }
            }
        }

        Self {
            projection: Some(projection),
            regions,
            cells,
            min_x,
            min_y,
            cell_w,
            cell_h,
        }
    }

    /// Regions in dataset order (features without geometry are absent).
    pub fn regions(&self) -> &[ProjectedRegion] {
        &self.regions
    }

    /// Region under a screen point. Overlaps resolve to the earliest feature.
    pub fn find_at(&self, x: f64, y: f64) -> Option<&ProjectedRegion> {
        self.index_at(x, y).map(|idx| &self.regions[idx])
    }

    /// Index into [`ProjectedMap::regions`] of the region under a screen point.
    pub fn index_at(&self, x: f64, y: f64) -> Option<usize> {
        if self.cells.is_empty() {
            return None;
        }

        let col = ((x - self.min_x) / self.cell_w).floor() as isize;
        let row = ((y - self.min_y) / self.cell_h).floor() as isize;
        if col < 0 || row < 0 || col >= GRID_COLS as isize || row >= GRID_ROWS as isize {
            return None;
        }

        let point = Point::new(x, y);
        self.cells[row as usize * GRID_COLS + col as usize]
            .iter()
            .copied()
            .find(|&idx| self.regions[idx].shape.contains(&point))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::ProjectedMap;
    use crate::dataset::GeoFeatureCollection;
    use crate::registry::RegisteredMap;

    fn two_squares() -> RegisteredMap {
        let collection = GeoFeatureCollection::from_value(&json!({
            "features": [
                {
                    "properties": { "name": "west", "cp": [0.5, 0.5] },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]] }
                },
                {
                    "properties": {},
                    "geometry": { "type": "Polygon", "coordinates": [[[1.0, 0.0], [2.0, 0.0], [2.0, 1.0], [1.0, 1.0]]] }
                },
                { "properties": { "name": "nowhere" } }
            ]
        }));
        RegisteredMap::new("squares", collection)
    }

    #[test]
    fn skips_features_without_geometry() {
        let projected = ProjectedMap::build(&two_squares(), 300.0, 200.0);
        assert_eq!(projected.regions().len(), 2);
    }

    #[test]
    fn finds_region_under_its_label() {
        let projected = ProjectedMap::build(&two_squares(), 300.0, 200.0);
        let (x, y) = projected.regions()[0].label_at.expect("label");
        let hit = projected.find_at(x, y).expect("hit");
        assert_eq!(hit.name.as_deref(), Some("west"));
    }

    #[test]
    fn unnamed_region_is_hit_without_a_name() {
        let projected = ProjectedMap::build(&two_squares(), 300.0, 200.0);
        let projection = projected.projection.expect("projection");
        let (x, y) = projection.project(1.5, 0.5);
        let hit = projected.find_at(x, y).expect("hit");
        assert_eq!(hit.name, None);
        assert!(hit.label_at.is_some());
        assert!(hit.anchor_at.is_none());
    }

    #[test]
    fn misses_outside_every_region() {
        let projected = ProjectedMap::build(&two_squares(), 300.0, 200.0);
        assert!(projected.find_at(-50.0, -50.0).is_none());
        assert!(projected.find_at(2.0, 2.0).is_none());
    }

    #[test]
    fn index_at_matches_find_at() {
        let projected = ProjectedMap::build(&two_squares(), 300.0, 200.0);
        let (x, y) = projected.projection.expect("projection").project(1.5, 0.5);
        assert_eq!(projected.index_at(x, y), Some(1));
        assert!(projected.find_at(x, y).is_some_and(|region| region.name.is_none()));
        assert_eq!(projected.index_at(-50.0, -50.0), None);
    }

    #[test]
    fn empty_map_builds_without_projection() {
        let map = RegisteredMap::new("empty", GeoFeatureCollection::default());
        let projected = ProjectedMap::build(&map, 300.0, 200.0);
        assert!(projected.projection.is_none());
        assert!(projected.find_at(10.0, 10.0).is_none());
        assert!(projected.index_at(10.0, 10.0).is_none());
    }

    #[test]
    fn bundled_regions_are_all_hittable() {
        let map = RegisteredMap::new("湖北", GeoFeatureCollection::bundled());
        let projected = ProjectedMap::build(&map, 1200.0, 900.0);
        assert_eq!(projected.regions().len(), 17);
        for (idx, region) in projected.regions().iter().enumerate() {
            let (x, y) = region.label_at.expect("label");
            assert_eq!(projected.index_at(x, y), Some(idx), "{:?}", region.name);
        }
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use geo::{BoundingRect, Rect};

use crate::catalog::{RegionName, region_catalog};
use crate::dataset::GeoFeatureCollection;

/// A boundary dataset made available under a map name.
#[derive(Debug, Clone, PartialEq)]
pub struct RegisteredMap {
    pub name: String,
    pub collection: GeoFeatureCollection,
    /// Computed once at registration.
    pub catalog: Vec<RegionName>,
    /// Lon/lat extent of every feature geometry, `None` when nothing has geometry.
    pub bounds: Option<Rect<f64>>,
}

impl RegisteredMap {
    pub fn new(name: &str, collection: GeoFeatureCollection) -> Self {
        let catalog = region_catalog(&collection);
        let bounds = collection
            .features
            .iter()
            .filter_map(|feature| feature.geometry.as_ref()?.bounding_rect())
            .reduce(union_rect);
        Self {
            name: name.to_owned(),
            collection,
            catalog,
            bounds,
        }
    }
}

fn union_rect(a: Rect<f64>, b: Rect<f64>) -> Rect<f64> {
    Rect::new(
        (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
        (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
    )
}

/// Named map resources. Registering a name again replaces the previous entry.
#[derive(Debug, Default)]
pub struct MapRegistry {
    maps: HashMap<String, Arc<RegisteredMap>>,
}

impl MapRegistry {
    pub fn register(&mut self, name: &str, collection: GeoFeatureCollection) -> Arc<RegisteredMap> {
        let map = Arc::new(RegisteredMap::new(name, collection));
        let replaced = self.maps.insert(name.to_owned(), map.clone()).is_some();
        tracing::debug!(
            map = name,
            regions = map.catalog.len(),
            replaced,
            "map registered"
        );
        map
    }

    pub fn get(&self, name: &str) -> Option<Arc<RegisteredMap>> {
        self.maps.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::MapRegistry;
    use crate::dataset::GeoFeatureCollection;

    fn sample() -> GeoFeatureCollection {
        GeoFeatureCollection::from_value(&json!({
            "features": [
                {
                    "properties": { "name": "west" },
                    "geometry": { "type": "Polygon", "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]] }
                },
                {
                    "properties": { "name": "east" },
                    "geometry": { "type": "Polygon", "coordinates": [[[1.0, -1.0], [3.0, -1.0], [3.0, 2.0], [1.0, 2.0]]] }
                },
                { "properties": { "name": "floating" } }
            ]
        }))
    }

    #[test]
    fn registering_twice_is_idempotent() {
        let mut registry = MapRegistry::default();
        let first = registry.register("sample", sample());
        let second = registry.register("sample", sample());
        assert_eq!(registry.len(), 1);
        assert_eq!(*first, *second);
        assert_eq!(registry.get("sample").as_deref(), Some(&*second));
    }

    #[test]
    fn precomputes_catalog_and_bounds() {
        let mut registry = MapRegistry::default();
        let map = registry.register("sample", sample());
        assert_eq!(map.catalog, vec!["west", "east", "floating"]);
        let bounds = map.bounds.expect("bounds");
        assert_eq!((bounds.min().x, bounds.min().y), (0.0, -1.0));
        assert_eq!((bounds.max().x, bounds.max().y), (3.0, 2.0));
    }

    #[test]
    fn unknown_name_is_absent() {
        let registry = MapRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get("nowhere").is_none());
    }

    #[test]
    fn empty_collection_has_no_bounds() {
        let mut registry = MapRegistry::default();
        let map = registry.register("empty", GeoFeatureCollection::default());
        assert!(map.catalog.is_empty());
        assert!(map.bounds.is_none());
    }
}

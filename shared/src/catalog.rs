use crate::dataset::{GeoFeature, GeoFeatureCollection};

pub type RegionName = String;

/// Selectable region names in dataset order. Duplicates are kept; features
/// without a resolvable name are skipped.
pub fn region_catalog(collection: &GeoFeatureCollection) -> Vec<RegionName> {
    collection
        .features
        .iter()
        .filter_map(GeoFeature::resolved_name)
        .map(str::to_owned)
        .collect()
}

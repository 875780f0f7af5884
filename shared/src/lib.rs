pub mod catalog;
pub mod dataset;
pub mod interaction;
pub mod option;
pub mod projection;
pub mod registry;
pub mod selection;
pub mod spatial;
pub mod style;
pub mod tooltip;

pub use catalog::{RegionName, region_catalog};
pub use dataset::{BUNDLED_MAP_NAME, GeoFeature, GeoFeatureCollection};
pub use interaction::{HoveredRegion, MapInteraction};
pub use option::MapOption;
pub use registry::{MapRegistry, RegisteredMap};
pub use selection::{ClickEvent, ElementKind, Selection};
pub use style::{ProfileKind, RegionStyleOverride, ResolvedStyle, StyleProfile, resolve_styles};

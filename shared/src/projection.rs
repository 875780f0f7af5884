use geo::Rect;

/// Horizontal squash applied to longitude before fitting, as ECharts `geo.aspectScale`.
pub const ASPECT_SCALE: f64 = 0.75;
/// Fraction of the map extent left empty on each side.
const FIT_PADDING: f64 = 0.05;

/// Linear lon/lat to screen mapping with the y axis flipped (north up).
/// Fixed once fitted; the widget does not roam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapProjection {
    pub offset_x: f64,
    pub offset_y: f64,
    pub scale: f64,
}

impl MapProjection {
    /// Fit `bounds` (lon/lat) centered into a `view_w` x `view_h` surface.
    /// Returns `None` for degenerate bounds or an empty surface.
    pub fn fit(bounds: Rect<f64>, view_w: f64, view_h: f64) -> Option<Self> {
        let world_w = bounds.width() * ASPECT_SCALE;
        let world_h = bounds.height();
        if world_w <= 0.0 || world_h <= 0.0 || view_w <= 0.0 || view_h <= 0.0 {
            return None;
        }

        let scale_x = view_w / (world_w * (1.0 + FIT_PADDING * 2.0));
        let scale_y = view_h / (world_h * (1.0 + FIT_PADDING * 2.0));
        let scale = scale_x.min(scale_y);

        let center = bounds.center();
        let center_x = center.x * ASPECT_SCALE;
        let center_y = -center.y;
        Some(Self {
            offset_x: view_w / 2.0 - center_x * scale,
            offset_y: view_h / 2.0 - center_y * scale,
            scale,
        })
    }

    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            lon * ASPECT_SCALE * self.scale + self.offset_x,
            -lat * self.scale + self.offset_y,
        )
    }
}

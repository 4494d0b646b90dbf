// Log-only map binding, used when no map output is configured
use crate::application::map_renderer::{Bounds, MapError, MapLoader, MapService, MapView, Marker, TileLayer};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct LogMap {
    pending: Vec<Marker>,
}

#[async_trait]
impl MapService for LogMap {
    fn clear_markers(&mut self) {
        self.pending.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.pending.push(marker);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        tracing::debug!(
            south = bounds.south_west.lat,
            west = bounds.south_west.lng,
            north = bounds.north_east.lat,
            east = bounds.north_east.lng,
            padding_px,
            "Map view fitted"
        );
    }

    async fn flush(&mut self) -> Result<(), MapError> {
        for marker in &self.pending {
            tracing::info!(
                lat = marker.position.lat,
                lng = marker.position.lng,
                color = marker.color,
                alerts = %marker.label,
                "Hotspot marker"
            );
        }
        Ok(())
    }
}

pub struct LogMapLoader;

#[async_trait]
impl MapLoader for LogMapLoader {
    async fn load(&self, view: &MapView, tiles: &TileLayer) -> Result<Box<dyn MapService>, MapError> {
        tracing::info!(
            lat = view.center.lat,
            lng = view.center.lng,
            zoom = view.zoom,
            tiles = %tiles.url_template,
            "Map initialized"
        );
        Ok(Box::new(LogMap::default()))
    }
}

// Map marker renderer - Mirrors snapshot hotspots onto a map service
use crate::domain::risk::RiskTier;
use crate::domain::snapshot::Hotspot;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, OnceCell};

/// Padding applied around the hotspot bounds, in pixels
pub const FIT_PADDING_PX: u32 = 50;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("map failed to load: {0}")]
    Load(String),

    #[error("map output failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("map encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl Bounds {
    /// Smallest box containing every point; `None` for an empty slice
    pub fn enclosing(points: &[LatLng]) -> Option<Self> {
        let first = points.first()?;
        let mut bounds = Bounds {
            south_west: *first,
            north_east: *first,
        };
        for p in &points[1..] {
            bounds.south_west.lat = bounds.south_west.lat.min(p.lat);
            bounds.south_west.lng = bounds.south_west.lng.min(p.lng);
            bounds.north_east.lat = bounds.north_east.lat.max(p.lat);
            bounds.north_east.lng = bounds.north_east.lng.max(p.lng);
        }
        Some(bounds)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapView {
    pub center: LatLng,
    pub zoom: u8,
}

impl Default for MapView {
    fn default() -> Self {
        Self {
            center: LatLng {
                lat: -23.55,
                lng: -46.64,
            },
            zoom: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TileLayer {
    pub url_template: String,
    pub attribution: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    pub position: LatLng,
    pub tier: RiskTier,
    pub color: &'static str,
    pub label: String,
    pub popup: String,
}

impl Marker {
    pub fn from_hotspot(hotspot: &Hotspot) -> Self {
        let tier = RiskTier::from_level(hotspot.risk_level);
        Self {
            position: LatLng {
                lat: hotspot.latitude,
                lng: hotspot.longitude,
            },
            tier,
            color: tier.color(),
            label: hotspot.alert_count.to_string(),
            popup: format!(
                "Coordenadas: {:.3}, {:.3}\nRisco: {}%\nTipo: {}",
                hotspot.latitude, hotspot.longitude, hotspot.risk_level, hotspot.predominant_alert_type
            ),
        }
    }
}

/// A live map the renderer draws on
#[async_trait]
pub trait MapService: Send {
    fn clear_markers(&mut self);
    fn add_marker(&mut self, marker: Marker);
    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32);
    /// Push pending changes to wherever the map is displayed
    async fn flush(&mut self) -> Result<(), MapError>;
}

/// Creates the map with its base tile layer. Called at most once per
/// successful load.
#[async_trait]
pub trait MapLoader: Send + Sync {
    async fn load(&self, view: &MapView, tiles: &TileLayer) -> Result<Box<dyn MapService>, MapError>;
}

pub struct MarkerRenderer {
    loader: Arc<dyn MapLoader>,
    view: MapView,
    tiles: TileLayer,
    map: OnceCell<Mutex<Box<dyn MapService>>>,
}

impl MarkerRenderer {
    pub fn new(loader: Arc<dyn MapLoader>, view: MapView, tiles: TileLayer) -> Self {
        Self {
            loader,
            view,
            tiles,
            map: OnceCell::new(),
        }
    }

    #[cfg(test)]
    pub fn is_loaded(&self) -> bool {
        self.map.initialized()
    }

    /// Replace every marker with one per hotspot, then fit the view around
    /// them. With no hotspots the view is left where it was.
    ///
    /// The map is loaded on first use; concurrent first calls share a
    /// single load, and a failed load is retried on the next sync.
    pub async fn sync(&self, hotspots: &[Hotspot]) -> Result<usize, MapError> {
        let map = self
            .map
            .get_or_try_init(|| async {
                tracing::info!(tiles = %self.tiles.url_template, "Loading map");
                self.loader.load(&self.view, &self.tiles).await.map(Mutex::new)
            })
            .await?;

        let mut map = map.lock().await;
        map.clear_markers();

        let mut points = Vec::with_capacity(hotspots.len());
        for hotspot in hotspots {
            let marker = Marker::from_hotspot(hotspot);
            points.push(marker.position);
            map.add_marker(marker);
        }

        if let Some(bounds) = Bounds::enclosing(&points) {
            map.fit_bounds(bounds, FIT_PADDING_PX);
        }
        map.flush().await?;

        tracing::debug!(markers = points.len(), "Map markers synchronized");
        Ok(points.len())
    }
}

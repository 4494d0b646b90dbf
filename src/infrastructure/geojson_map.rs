// GeoJSON map binding - Writes the hotspot layer to a file any map viewer can open
use crate::application::map_renderer::{Bounds, MapError, MapLoader, MapService, MapView, Marker, TileLayer};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

pub struct GeoJsonMap {
    path: PathBuf,
    view: MapView,
    tiles: TileLayer,
    markers: Vec<Marker>,
    fitted: Option<(Bounds, u32)>,
}

impl GeoJsonMap {
    fn feature(marker: &Marker) -> Value {
        json!({
            "type": "Feature",
            "geometry": {
                "type": "Point",
                // GeoJSON positions are [longitude, latitude]
                "coordinates": [marker.position.lng, marker.position.lat],
            },
            "properties": {
                "color": marker.color,
                "label": marker.label,
                "popup": marker.popup,
                "tier": format!("{:?}", marker.tier).to_lowercase(),
            },
        })
    }

    pub fn to_geojson(&self) -> Value {
        let mut collection = json!({
            "type": "FeatureCollection",
            "features": self.markers.iter().map(Self::feature).collect::<Vec<_>>(),
            "view": {
                "center": [self.view.center.lng, self.view.center.lat],
                "zoom": self.view.zoom,
            },
            "tiles": {
                "url": self.tiles.url_template,
                "attribution": self.tiles.attribution,
            },
        });

        if let Some((bounds, padding)) = self.fitted {
            collection["bbox"] = json!([
                bounds.south_west.lng,
                bounds.south_west.lat,
                bounds.north_east.lng,
                bounds.north_east.lat,
            ]);
            collection["view"]["padding"] = json!(padding);
        }
        collection
    }
}

/// Sibling path the next version is staged at before it replaces `path`
fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

#[async_trait]
impl MapService for GeoJsonMap {
    fn clear_markers(&mut self) {
        self.markers.clear();
    }

    fn add_marker(&mut self, marker: Marker) {
        self.markers.push(marker);
    }

    fn fit_bounds(&mut self, bounds: Bounds, padding_px: u32) {
        self.fitted = Some((bounds, padding_px));
    }

    /// Readers of `path` only ever see a complete file
    async fn flush(&mut self) -> Result<(), MapError> {
        let encoded = serde_json::to_vec_pretty(&self.to_geojson())?;
        let staged = staging_path(&self.path);
        tokio::fs::write(&staged, encoded).await?;
        tokio::fs::rename(&staged, &self.path).await?;
        Ok(())
    }
}

pub struct GeoJsonMapLoader {
    path: PathBuf,
}

impl GeoJsonMapLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl MapLoader for GeoJsonMapLoader {
    async fn load(&self, view: &MapView, tiles: &TileLayer) -> Result<Box<dyn MapService>, MapError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tracing::info!(path = %self.path.display(), "Writing hotspot map as GeoJSON");

        Ok(Box::new(GeoJsonMap {
            path: self.path.clone(),
            view: view.clone(),
            tiles: tiles.clone(),
            markers: Vec::new(),
            fitted: None,
        }))
    }
}

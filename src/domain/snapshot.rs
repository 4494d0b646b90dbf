// Dashboard snapshot domain model
use serde::{Deserialize, Deserializer, Serialize};

/// Statistics payload as of the last successful fetch.
///
/// Every field defaults so a partial or `null`-laden payload still decodes;
/// fields the dashboard does not read are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub total_alerts: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub active_devices: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_shelters: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_resources: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub device_type_statistics: Vec<DeviceTypeStatistic>,
    #[serde(deserialize_with = "null_as_default")]
    pub alert_trends: Vec<AlertTrend>,
    #[serde(deserialize_with = "null_as_default")]
    pub geographic_hotspots: Vec<Hotspot>,
    /// Absent in some upstream versions; the location section is hidden then
    pub location_statistics: Option<Vec<LocationStatistic>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeviceTypeStatistic {
    #[serde(deserialize_with = "null_as_default")]
    pub device_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub total_devices: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub active_devices: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub alerts_generated: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub average_value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AlertTrend {
    #[serde(deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(deserialize_with = "null_as_default")]
    pub alert_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub severity: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hotspot {
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub risk_level: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub alert_count: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub predominant_alert_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LocationStatistic {
    #[serde(deserialize_with = "null_as_default")]
    pub latitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub longitude: f64,
    #[serde(deserialize_with = "null_as_default")]
    pub flood_incidents: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub fire_incidents: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub total_incidents: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub risk_score: f64,
    pub last_incident: Option<String>,
}

/// Upstream sends `null` for empty counters and lists
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_upstream_payload() {
        let json = r#"{
            "totalAlerts": 42,
            "activeDevices": 17,
            "totalShelters": 5,
            "totalResources": 120,
            "deviceTypeStatistics": [
                {"deviceType": "WaterLevelSensor", "totalDevices": 10, "activeDevices": 9, "alertsGenerated": 30, "averageValue": 1.75}
            ],
            "alertTrends": [
                {"date": "2024-05-01T00:00:00Z", "alertType": "Flood", "count": 12, "severity": 3}
            ],
            "geographicHotspots": [
                {"latitude": -23.55, "longitude": -46.64, "riskLevel": 85, "alertCount": 7, "predominantAlertType": "Flood"}
            ],
            "locationStatistics": [
                {"latitude": -23.5, "longitude": -46.6, "floodIncidents": 3, "fireIncidents": 1, "totalIncidents": 4, "riskScore": 72.5, "lastIncident": "2024-05-02T10:30:00Z"}
            ],
            "generatedBy": "statistics-service"
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.total_alerts, 42);
        assert_eq!(snapshot.device_type_statistics[0].average_value, 1.75);
        assert_eq!(snapshot.alert_trends[0].severity, 3.0);
        assert_eq!(snapshot.geographic_hotspots[0].risk_level, 85.0);
        let locations = snapshot.location_statistics.unwrap();
        assert_eq!(locations[0].total_incidents, 4);
    }

    #[test]
    fn test_partial_payload_defaults() {
        let snapshot: DashboardSnapshot = serde_json::from_str(r#"{"totalAlerts": 3}"#).unwrap();
        assert_eq!(snapshot.total_alerts, 3);
        assert_eq!(snapshot.active_devices, 0);
        assert!(snapshot.geographic_hotspots.is_empty());
        assert!(snapshot.location_statistics.is_none());
    }

    #[test]
    fn test_null_fields_decode_as_defaults() {
        let json = r#"{
            "totalAlerts": null,
            "activeDevices": 4,
            "alertTrends": null,
            "geographicHotspots": [
                {"latitude": -23.55, "longitude": -46.64, "riskLevel": null, "alertCount": 2, "predominantAlertType": null}
            ],
            "locationStatistics": null
        }"#;

        let snapshot: DashboardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.total_alerts, 0);
        assert_eq!(snapshot.active_devices, 4);
        assert!(snapshot.alert_trends.is_empty());
        let hotspot = &snapshot.geographic_hotspots[0];
        assert_eq!(hotspot.risk_level, 0.0);
        assert_eq!(hotspot.predominant_alert_type, "");
        assert!(snapshot.location_statistics.is_none());
    }
}

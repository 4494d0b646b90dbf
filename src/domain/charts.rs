// Chart-ready views derived from a snapshot
use super::snapshot::{AlertTrend, DeviceTypeStatistic};
use chrono::{DateTime, NaiveDate, NaiveDateTime};

#[derive(Debug, Clone, PartialEq)]
pub struct DeviceRow {
    pub name: String,
    pub total: i64,
    pub active: i64,
    pub alerts: i64,
    pub average_value: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrendRow {
    pub date: String,
    pub kind: String,
    pub count: i64,
    pub severity: f64,
}

pub fn device_label(device_type: &str) -> &'static str {
    match device_type {
        "WaterLevelSensor" => "Sensor de Nível",
        _ => "Sensor de Fumaça",
    }
}

pub fn alert_type_label(alert_type: &str) -> String {
    match alert_type {
        "Flood" => "Enchente".to_string(),
        "Fire" => "Incêndio".to_string(),
        other => other.to_string(),
    }
}

pub fn device_rows(stats: &[DeviceTypeStatistic]) -> Vec<DeviceRow> {
    stats
        .iter()
        .map(|d| DeviceRow {
            name: device_label(&d.device_type).to_string(),
            total: d.total_devices,
            active: d.active_devices,
            alerts: d.alerts_generated,
            average_value: d.average_value,
        })
        .collect()
}

pub fn trend_rows(trends: &[AlertTrend]) -> Vec<TrendRow> {
    trends
        .iter()
        .map(|t| TrendRow {
            date: format_date(&t.date),
            kind: alert_type_label(&t.alert_type),
            count: t.count,
            severity: t.severity,
        })
        .collect()
}

fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// `dd/mm/yyyy`; unparseable input is returned as-is
pub fn format_date(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// `dd/mm/yyyy HH:MM:SS`; unparseable input is returned as-is
pub fn format_date_time(raw: &str) -> String {
    parse_timestamp(raw)
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_rows() {
        let stats = vec![
            DeviceTypeStatistic {
                device_type: "WaterLevelSensor".to_string(),
                total_devices: 10,
                active_devices: 8,
                alerts_generated: 4,
                average_value: 2.5,
            },
            DeviceTypeStatistic {
                device_type: "SmokeSensor".to_string(),
                total_devices: 3,
                ..Default::default()
            },
        ];

        let rows = device_rows(&stats);
        assert_eq!(rows[0].name, "Sensor de Nível");
        assert_eq!(rows[0].active, 8);
        assert_eq!(rows[1].name, "Sensor de Fumaça");
        assert_eq!(rows[1].total, 3);
    }

    #[test]
    fn test_trend_rows() {
        let trends = vec![
            AlertTrend {
                date: "2024-05-01T00:00:00".to_string(),
                alert_type: "Fire".to_string(),
                count: 2,
                severity: 4.0,
            },
            AlertTrend {
                date: "2024-05-02".to_string(),
                alert_type: "Landslide".to_string(),
                count: 1,
                severity: 1.0,
            },
        ];

        let rows = trend_rows(&trends);
        assert_eq!(rows[0].date, "01/05/2024");
        assert_eq!(rows[0].kind, "Incêndio");
        assert_eq!(rows[1].date, "02/05/2024");
        assert_eq!(rows[1].kind, "Landslide");
    }

    #[test]
    fn test_format_date_time() {
        assert_eq!(format_date_time("2024-05-02T10:30:00Z"), "02/05/2024 10:30:00");
        assert_eq!(format_date_time("not a date"), "not a date");
    }
}

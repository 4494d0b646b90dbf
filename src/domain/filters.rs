// Dashboard filter domain model
use thiserror::Error;

/// Wire keys in the order they appear in the outbound query string
pub const FILTER_KEYS: [&str; 5] = ["fromDate", "toDate", "radiusKm", "centerLat", "centerLng"];

#[derive(Debug, Error, PartialEq)]
pub enum FilterError {
    #[error("unknown filter '{0}' (expected one of: fromDate, toDate, radiusKm, centerLat, centerLng)")]
    UnknownKey(String),
}

/// Optional query filters sent to the statistics endpoint.
///
/// Values are kept as the user typed them; the upstream API is the only validator.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSet {
    pub from_date: Option<String>,
    pub to_date: Option<String>,
    pub radius_km: Option<String>,
    pub center_lat: Option<String>,
    pub center_lng: Option<String>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot_mut(&mut self, key: &str) -> Result<&mut Option<String>, FilterError> {
        match key {
            "fromDate" => Ok(&mut self.from_date),
            "toDate" => Ok(&mut self.to_date),
            "radiusKm" => Ok(&mut self.radius_km),
            "centerLat" => Ok(&mut self.center_lat),
            "centerLng" => Ok(&mut self.center_lng),
            other => Err(FilterError::UnknownKey(other.to_string())),
        }
    }

    /// Set a filter by wire key. An empty value clears it.
    pub fn set(&mut self, key: &str, value: impl Into<String>) -> Result<(), FilterError> {
        let value = value.into();
        let slot = self.slot_mut(key)?;
        *slot = if value.is_empty() { None } else { Some(value) };
        Ok(())
    }

    pub fn clear(&mut self, key: &str) -> Result<(), FilterError> {
        *self.slot_mut(key)? = None;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.query_pairs().is_empty()
    }

    /// Populated filters only, in fixed key order
    pub fn query_pairs(&self) -> Vec<(&'static str, &str)> {
        let values = [
            &self.from_date,
            &self.to_date,
            &self.radius_km,
            &self.center_lat,
            &self.center_lng,
        ];

        FILTER_KEYS
            .iter()
            .zip(values)
            .filter_map(|(key, value)| match value.as_deref() {
                Some(v) if !v.is_empty() => Some((*key, v)),
                _ => None,
            })
            .collect()
    }

    pub fn to_query_string(&self) -> String {
        encode_query(self.query_pairs())
    }

    /// Path of the proxy dashboard endpoint with these filters applied
    pub fn dashboard_path(&self) -> String {
        with_query("/api/dashboard", &self.to_query_string())
    }
}

/// Form-encode key/value pairs, preserving their order
pub fn encode_query<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                urlencoding::encode(k.as_ref()),
                urlencoding::encode(v.as_ref())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Append `?query` to a path, omitting the separator when the query is empty
pub fn with_query(path: &str, query: &str) -> String {
    if query.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, query)
    }
}

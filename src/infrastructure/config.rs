use serde::Deserialize;

/// Default location of the optional settings file, without extension
pub const DEFAULT_CONFIG_PATH: &str = "config/shield";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub upstream: UpstreamSettings,
    pub proxy: ProxySettings,
    pub monitor: MonitorSettings,
    pub map: MapSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct UpstreamSettings {
    pub base_url: String,
    /// Sent by the passthrough route when the caller has no credentials
    pub placeholder_authorization: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProxySettings {
    pub dashboard_tip: String,
    pub passthrough_tip: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MonitorSettings {
    pub proxy_url: String,
    pub interval_secs: u64,
    pub realtime: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MapSettings {
    /// GeoJSON file the hotspot map is written to; markers are only logged when unset
    #[serde(default)]
    pub output: Option<String>,
    pub tile_url: String,
    pub attribution: String,
}

/// Load settings from defaults, an optional file and `SHIELD__*` environment
/// variables, in increasing priority.
///
/// An explicitly given file must exist; the default one may be missing.
pub fn load_settings(path: Option<&str>) -> anyhow::Result<Settings> {
    let settings = config::Config::builder()
        .set_default("server.bind", "0.0.0.0:3000")?
        .set_default("upstream.base_url", "http://localhost:5046")?
        .set_default("upstream.placeholder_authorization", "Bearer seu-token-aqui")?
        .set_default("proxy.dashboard_tip", "Verifique se sua API está rodando na porta 5000 e se os endpoints estão funcionando")?
        .set_default("proxy.passthrough_tip", "Verifique se sua API está rodando na porta 5000")?
        .set_default("monitor.proxy_url", "http://localhost:3000")?
        .set_default("monitor.interval_secs", 30)?
        .set_default("monitor.realtime", true)?
        .set_default("map.tile_url", "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png")?
        .set_default("map.attribution", "© OpenStreetMap contributors")?
        .add_source(config::File::with_name(path.unwrap_or(DEFAULT_CONFIG_PATH)).required(path.is_some()))
        .add_source(
            config::Environment::with_prefix("SHIELD")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

// Terminal rendering of the dashboard state
use crate::application::polling_controller::DashboardState;
use crate::domain::charts::{alert_type_label, device_rows, format_date_time, trend_rows};
use crate::domain::polling::interval_label;
use crate::domain::risk::{risk_distribution, RiskTier};
use crate::domain::snapshot::DashboardSnapshot;
use chrono::{DateTime, Local, Utc};
use colored::{ColoredString, Colorize};
use std::fmt::Write;

/// Render the whole dashboard as text.
///
/// With no snapshot yet, only the loading or error page is shown.
pub fn render(state: &DashboardState, now: DateTime<Utc>) -> String {
    let mut out = String::new();
    render_header(&mut out);

    let Some(snapshot) = &state.snapshot else {
        match &state.error {
            Some(error) if !state.loading => {
                let _ = writeln!(out, "{} Erro: {}", "⚠".red().bold(), error.red());
            }
            _ => {
                let _ = writeln!(out, "Carregando dados do DisasterShield...");
            }
        }
        return out;
    };

    render_controls(&mut out, state, now);
    if let Some(error) = &state.error {
        let _ = writeln!(
            out,
            "{}\n",
            format!("⚠ Erro na última atualização: {}", error).yellow()
        );
    }
    render_stats(&mut out, snapshot);
    render_devices(&mut out, snapshot);
    render_trends(&mut out, snapshot);
    render_risk(&mut out, snapshot);
    render_hotspots(&mut out, snapshot);
    render_locations(&mut out, snapshot);
    out
}

fn render_header(out: &mut String) {
    let _ = writeln!(out, "{}", "DisasterShield".bold().blue());
    let _ = writeln!(out, "Dashboard de Monitoramento e Prevenção de Desastres\n");
}

fn render_controls(out: &mut String, state: &DashboardState, now: DateTime<Utc>) {
    let polling = &state.polling;
    let mode = if polling.enabled {
        "Tempo Real: ativo".green()
    } else {
        "Tempo Real: pausado".dimmed()
    };
    let _ = write!(out, "{} | Intervalo: {}", mode, interval_label(polling.interval_secs));

    if let Some(last) = polling.last_update {
        let _ = write!(
            out,
            " | Última atualização: {}",
            last.with_timezone(&Local).format("%H:%M:%S")
        );
    }

    if state.loading {
        let _ = write!(out, " | Atualizando...");
    } else if let Some(secs) = polling.seconds_until_next(now).filter(|_| polling.enabled) {
        let _ = write!(out, " | Próxima em: {}s", secs);
    }

    if !state.filters.is_empty() {
        let shown: Vec<_> = state
            .filters
            .query_pairs()
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        let _ = write!(out, "\nFiltros: {}", shown.join(", "));
    }
    let _ = writeln!(out, "\n");
}

fn render_stats(out: &mut String, snapshot: &DashboardSnapshot) {
    let cards = [
        ("Total de Alertas", snapshot.total_alerts, "Alertas registrados"),
        ("Dispositivos Ativos", snapshot.active_devices, "Sensores em operação"),
        ("Abrigos", snapshot.total_shelters, "Locais de proteção"),
        ("Recursos", snapshot.total_resources, "Recursos disponíveis"),
    ];
    for (title, value, label) in cards {
        let _ = writeln!(
            out,
            "{:<22}{:>8}  {}",
            title,
            value.to_string().bold().blue(),
            label.dimmed()
        );
    }
    let _ = writeln!(out);
}

fn render_devices(out: &mut String, snapshot: &DashboardSnapshot) {
    let rows = device_rows(&snapshot.device_type_statistics);
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", "Dispositivos por Tipo".bold());
    let _ = writeln!(
        out,
        "  {:<18}{:>8}{:>8}{:>9}{:>13}",
        "Tipo", "Total", "Ativos", "Alertas", "Valor Médio"
    );
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<18}{:>8}{:>8}{:>9}{:>13.2}",
            row.name, row.total, row.active, row.alerts, row.average_value
        );
    }
    let _ = writeln!(out);
}

fn render_trends(out: &mut String, snapshot: &DashboardSnapshot) {
    let rows = trend_rows(&snapshot.alert_trends);
    if rows.is_empty() {
        return;
    }
    let _ = writeln!(out, "{}", "Tendências de Alertas".bold());
    for row in rows {
        let _ = writeln!(
            out,
            "  {:<12}{:<12} quantidade {:>4}  severidade {}",
            row.date, row.kind, row.count, row.severity
        );
    }
    let _ = writeln!(out);
}

fn render_risk(out: &mut String, snapshot: &DashboardSnapshot) {
    let buckets = risk_distribution(&snapshot.geographic_hotspots);
    let total: usize = buckets.iter().map(|b| b.count).sum();
    if total == 0 {
        return;
    }
    let _ = writeln!(out, "{}", "Distribuição de Níveis de Risco".bold());
    for bucket in buckets {
        let percent = bucket.count as f64 * 100.0 / total as f64;
        let _ = writeln!(
            out,
            "  {} {} ({:.0}%)",
            tier_paint(bucket.tier, &format!("{:<6}", bucket.tier.label())),
            bucket.count,
            percent
        );
    }
    let _ = writeln!(out);
}

fn render_hotspots(out: &mut String, snapshot: &DashboardSnapshot) {
    let _ = writeln!(out, "{}", "Hotspots Geográficos".bold());
    for (index, hotspot) in snapshot.geographic_hotspots.iter().enumerate() {
        let tier = RiskTier::from_level(hotspot.risk_level);
        let _ = writeln!(
            out,
            "  {} {:.3}, {:.3} | Alertas: {} | Risco: {}% | Tipo: {}",
            tier_paint(tier, &format!("Hotspot #{}", index + 1)),
            hotspot.latitude,
            hotspot.longitude,
            hotspot.alert_count,
            hotspot.risk_level,
            alert_type_label(&hotspot.predominant_alert_type)
        );
    }
    let _ = writeln!(out);
}

fn render_locations(out: &mut String, snapshot: &DashboardSnapshot) {
    let Some(locations) = &snapshot.location_statistics else {
        return;
    };
    let _ = writeln!(out, "{}", "Estatísticas por Localização".bold());
    for (index, location) in locations.iter().enumerate() {
        let last = location
            .last_incident
            .as_deref()
            .map(format_date_time)
            .unwrap_or_else(|| "-".to_string());
        let _ = writeln!(
            out,
            "  Localização #{} {}, {} | Enchentes: {} | Incêndios: {} | Total: {} | Score de Risco: {} | Último Incidente: {}",
            index + 1,
            location.latitude,
            location.longitude,
            location.flood_incidents,
            location.fire_incidents,
            location.total_incidents,
            location.risk_score,
            last
        );
    }
}

fn tier_paint(tier: RiskTier, text: &str) -> ColoredString {
    match tier {
        RiskTier::High => text.red().bold(),
        RiskTier::Medium => text.yellow().bold(),
        RiskTier::Low => text.green().bold(),
    }
}

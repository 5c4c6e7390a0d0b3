use std::fmt::Write as _;
use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::{Config, ReportFormat};
use crate::data::aggregate::DashboardViews;
use crate::data::filter::{filter_dataset, FilterSelection};
use crate::data::loader::DataProvider;
use crate::data::model::DayType;

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

pub fn month_name(month: u8) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|i| MONTHS.get(usize::from(i)))
        .copied()
        .unwrap_or("?")
}

#[derive(Serialize)]
struct JsonReport<'a> {
    years: Vec<String>,
    seasons: Vec<String>,
    weather: Vec<String>,
    views: &'a DashboardViews,
}

/// Load through `provider`, filter with the configured selection and write
/// the report to `out`.
pub fn run(config: &Config, provider: &dyn DataProvider, out: &mut dyn Write) -> Result<()> {
    let dataset = provider
        .dataset()
        .with_context(|| format!("loading dataset from {}", provider.describe()))?;
    let selection = config.selection(&dataset);
    let views = DashboardViews::compute(&filter_dataset(&dataset, &selection));

    match config.format {
        ReportFormat::Json => {
            let report = JsonReport {
                years: selection.years.iter().map(|v| v.to_string()).collect(),
                seasons: selection.seasons.iter().map(|v| v.to_string()).collect(),
                weather: selection.weather.iter().map(|v| v.to_string()).collect(),
                views: &views,
            };
            serde_json::to_writer_pretty(&mut *out, &report).context("writing JSON report")?;
            writeln!(out)?;
        }
        ReportFormat::Text => {
            out.write_all(render_text(&selection, &views).as_bytes())
                .context("writing report")?;
        }
    }
    Ok(())
}

/// `12,345` style grouping for the headline total.
pub fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Metric value or "n/a" for an undefined one.
pub fn fmt_opt(value: Option<f64>, suffix: &str) -> String {
    value
        .map(|v| format!("{v:.1}{suffix}"))
        .unwrap_or_else(|| "n/a".to_string())
}

fn fmt_f(value: f64) -> String {
    if value.is_nan() {
        "n/a".to_string()
    } else {
        format!("{value:.1}")
    }
}

fn join<T: ToString>(values: impl IntoIterator<Item = T>) -> String {
    let parts: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
    if parts.is_empty() {
        "(none)".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn render_text(selection: &FilterSelection, views: &DashboardViews) -> String {
    let mut s = String::new();
    let m = &views.summary;

    // Writing into a String cannot fail.
    let _ = writeln!(s, "Bike sharing report");
    let _ = writeln!(s, "  years:   {}", join(&selection.years));
    let _ = writeln!(s, "  seasons: {}", join(&selection.seasons));
    let _ = writeln!(s, "  weather: {}", join(&selection.weather));
    let _ = writeln!(s);

    let _ = writeln!(s, "Key metrics");
    let _ = writeln!(s, "  days selected:         {}", m.days);
    let _ = writeln!(s, "  total rentals:         {}", thousands(m.total_rentals));
    let _ = writeln!(s, "  average daily rentals: {}", fmt_opt(m.average_daily, ""));
    let _ = writeln!(s, "  casual riders:         {}", fmt_opt(m.casual_pct, "%"));
    let _ = writeln!(s, "  registered riders:     {}", fmt_opt(m.registered_pct, "%"));
    let _ = writeln!(s);

    let _ = writeln!(s, "Rentals by weather");
    for row in &views.weather_impact {
        let _ = writeln!(
            s,
            "  {:<16} mean {:>8}  days {:>4}",
            row.weather.label(),
            fmt_f(row.mean_total),
            row.count
        );
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Rentals by season and weather (min / q1 / median / q3 / max)");
    for b in &views.weather_season_box {
        let _ = writeln!(
            s,
            "  {:<7} {:<16} {:>6.0} {:>6.0} {:>6.0} {:>6.0} {:>6.0}  (n={})",
            b.season.label(),
            b.weather.label(),
            b.min,
            b.q1,
            b.median,
            b.q3,
            b.max,
            b.count
        );
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Average rentals by season and user type");
    for row in &views.seasonal_user_trend {
        let _ = writeln!(
            s,
            "  {:<7} casual {:>8}  registered {:>8}  total {:>8}",
            row.season.label(),
            fmt_f(row.mean_casual),
            fmt_f(row.mean_registered),
            fmt_f(row.mean_total)
        );
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Average monthly rentals");
    for p in &views.monthly_trend {
        let _ = writeln!(
            s,
            "  {} {}  {:>8}",
            month_name(p.month),
            p.year.label(),
            fmt_f(p.mean_total)
        );
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Peak hours");
    for day_type in DayType::ALL {
        let peak = views
            .hourly_pattern
            .iter()
            .filter(|p| p.day_type == day_type)
            .max_by(|a, b| a.mean_total.total_cmp(&b.mean_total));
        match peak {
            Some(p) => {
                let _ = writeln!(
                    s,
                    "  {:<8} {:02}:00  mean {}",
                    day_type.label(),
                    p.hour,
                    fmt_f(p.mean_total)
                );
            }
            None => {
                let _ = writeln!(s, "  {:<8} n/a", day_type.label());
            }
        }
    }
    let _ = writeln!(s);

    let _ = writeln!(s, "Correlation with total rentals");
    for (feature, r) in views.correlation.ranked_against_total() {
        let value = if r.is_nan() {
            "n/a".to_string()
        } else {
            format!("{r:+.2}")
        };
        let _ = writeln!(s, "  {:<10} {value}", feature.column());
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_dataset;
    use crate::data::loader::StaticDataProvider;
    use clap::Parser;

    fn config(args: &[&str]) -> Config {
        let mut argv = vec!["bike-sharing-dashboard", "--report"];
        argv.extend_from_slice(args);
        Config::try_parse_from(argv).unwrap()
    }

    #[test]
    fn thousands_groups_digits() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(3292679), "3,292,679");
    }

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "?");
        assert_eq!(month_name(13), "?");
    }

    #[test]
    fn text_report_lists_sections() {
        let provider = StaticDataProvider::new(sample_dataset());
        let mut out = Vec::new();
        run(&config(&[]), &provider, &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Key metrics"));
        assert!(text.contains("Rentals by weather"));
        assert!(text.contains("Correlation with total rentals"));
        assert!(text.contains("Winter"));
    }

    #[test]
    fn empty_selection_reports_placeholders() {
        let provider = StaticDataProvider::new(sample_dataset());
        let ds = provider.dataset().unwrap();
        let mut selection = FilterSelection::all_from(&ds);
        selection.weather.clear();
        let views = DashboardViews::compute(&filter_dataset(&ds, &selection));

        let text = render_text(&selection, &views);
        assert!(text.contains("weather: (none)"));
        assert!(text.contains("casual riders:         n/a"));
        assert!(text.contains("Weekday  n/a"));
    }

    #[test]
    fn json_report_carries_selection_and_views() {
        let provider = StaticDataProvider::new(sample_dataset());
        let mut out = Vec::new();
        run(&config(&["--format", "json", "--season", "Fall"]), &provider, &mut out).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["seasons"], serde_json::json!(["Fall"]));
        assert_eq!(value["views"]["summary"]["days"], 2);
        assert!(value["views"]["seasonal_user_trend"]
            .as_array()
            .unwrap()
            .iter()
            .all(|r| r["season"] == "Fall"));
    }
}

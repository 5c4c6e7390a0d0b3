//! Named aggregation views over filtered tables.
//!
//! Every view is a pure function of its input rows and is independent of the
//! others. Groups come out in a fixed order: hours and months ascending,
//! seasons Winter → Fall, weather in code order, weekdays before weekends.
//! Rows whose grouping label is unmapped are left out of that view's groups.
//! An empty input never panics: grouped views return no groups, the
//! correlation matrix is all NaN and the summary metrics carry `None`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredViews;
use super::model::{DailyRow, DayType, HourlyRow, Season, Weather, Year};

// ---------------------------------------------------------------------------
// Accumulators
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default)]
struct Mean {
    sum: f64,
    count: usize,
}

impl Mean {
    fn push(&mut self, value: impl Into<f64>) {
        self.sum += value.into();
        self.count += 1;
    }

    fn value(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

fn mean_of(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut mean = Mean::default();
    for v in values {
        mean.push(v);
    }
    (mean.count > 0).then(|| mean.value())
}

/// Quantile with linear interpolation between closest ranks. `sorted` must be
/// non-empty and ascending.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

// ---------------------------------------------------------------------------
// Weather × season distribution
// ---------------------------------------------------------------------------

/// Five-number summary of daily rentals for one (season, weather) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSummary {
    pub season: Season,
    pub weather: Weather,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub count: usize,
}

pub fn weather_season_box(rows: &[&DailyRow]) -> Vec<BoxSummary> {
    let mut groups: BTreeMap<(Season, Weather), Vec<f64>> = BTreeMap::new();
    for row in rows {
        if let (Some(season), Some(weather)) = (row.labels.season, row.labels.weather) {
            groups
                .entry((season, weather))
                .or_default()
                .push(f64::from(row.record.cnt));
        }
    }

    groups
        .into_iter()
        .map(|((season, weather), mut values)| {
            values.sort_by(f64::total_cmp);
            BoxSummary {
                season,
                weather,
                min: values[0],
                q1: quantile(&values, 0.25),
                median: quantile(&values, 0.5),
                q3: quantile(&values, 0.75),
                max: values[values.len() - 1],
                count: values.len(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonWeatherMean {
    pub season: Season,
    pub weather: Weather,
    pub mean_total: f64,
}

/// Mean daily rentals per (season, weather), for the grouped bar chart.
pub fn season_weather_mean(rows: &[&DailyRow]) -> Vec<SeasonWeatherMean> {
    let mut groups: BTreeMap<(Season, Weather), Mean> = BTreeMap::new();
    for row in rows {
        if let (Some(season), Some(weather)) = (row.labels.season, row.labels.weather) {
            groups.entry((season, weather)).or_default().push(row.record.cnt);
        }
    }
    groups
        .into_iter()
        .map(|((season, weather), mean)| SeasonWeatherMean {
            season,
            weather,
            mean_total: mean.value(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Hourly views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyPoint {
    pub hour: u8,
    pub day_type: DayType,
    pub mean_total: f64,
}

/// Mean rentals per hour of day, split by weekday/weekend.
pub fn hourly_pattern(rows: &[&HourlyRow]) -> Vec<HourlyPoint> {
    let mut groups: BTreeMap<(u8, DayType), Mean> = BTreeMap::new();
    for row in rows {
        groups
            .entry((row.record.hour, row.day_type))
            .or_default()
            .push(row.record.cnt);
    }
    groups
        .into_iter()
        .map(|((hour, day_type), mean)| HourlyPoint {
            hour,
            day_type,
            mean_total: mean.value(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyUserPoint {
    pub hour: u8,
    pub day_type: DayType,
    pub mean_casual: f64,
    pub mean_registered: f64,
}

/// Mean casual and registered rentals per hour, split by weekday/weekend.
pub fn hourly_by_user_type(rows: &[&HourlyRow]) -> Vec<HourlyUserPoint> {
    let mut groups: BTreeMap<(u8, DayType), (Mean, Mean)> = BTreeMap::new();
    for row in rows {
        let (casual, registered) = groups.entry((row.record.hour, row.day_type)).or_default();
        casual.push(row.record.casual);
        registered.push(row.record.registered);
    }
    groups
        .into_iter()
        .map(|((hour, day_type), (casual, registered))| HourlyUserPoint {
            hour,
            day_type,
            mean_casual: casual.value(),
            mean_registered: registered.value(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Calendar views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyPoint {
    pub month: u8,
    pub year: Year,
    pub mean_total: f64,
}

/// Mean daily rentals per month, one series per year.
pub fn monthly_trend(rows: &[&DailyRow]) -> Vec<MonthlyPoint> {
    let mut groups: BTreeMap<(u8, Year), Mean> = BTreeMap::new();
    for row in rows {
        if let Some(year) = row.labels.year {
            groups.entry((row.record.month, year)).or_default().push(row.record.cnt);
        }
    }
    groups
        .into_iter()
        .map(|((month, year), mean)| MonthlyPoint {
            month,
            year,
            mean_total: mean.value(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalUserRow {
    pub season: Season,
    pub mean_casual: f64,
    pub mean_registered: f64,
    pub mean_total: f64,
}

pub fn seasonal_user_trend(rows: &[&DailyRow]) -> Vec<SeasonalUserRow> {
    let mut groups: BTreeMap<Season, [Mean; 3]> = BTreeMap::new();
    for row in rows {
        if let Some(season) = row.labels.season {
            let [casual, registered, total] = groups.entry(season).or_default();
            casual.push(row.record.casual);
            registered.push(row.record.registered);
            total.push(row.record.cnt);
        }
    }
    groups
        .into_iter()
        .map(|(season, [casual, registered, total])| SeasonalUserRow {
            season,
            mean_casual: casual.value(),
            mean_registered: registered.value(),
            mean_total: total.value(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherImpactRow {
    pub weather: Weather,
    pub mean_total: f64,
    pub count: usize,
}

pub fn weather_impact(rows: &[&DailyRow]) -> Vec<WeatherImpactRow> {
    let mut groups: BTreeMap<Weather, Mean> = BTreeMap::new();
    for row in rows {
        if let Some(weather) = row.labels.weather {
            groups.entry(weather).or_default().push(row.record.cnt);
        }
    }
    groups
        .into_iter()
        .map(|(weather, mean)| WeatherImpactRow {
            weather,
            mean_total: mean.value(),
            count: mean.count,
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Correlation
// ---------------------------------------------------------------------------

/// Numeric daily columns entering the correlation matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    Temp,
    Atemp,
    Hum,
    Windspeed,
    Casual,
    Registered,
    Cnt,
}

impl Feature {
    pub const ALL: [Feature; 7] = [
        Feature::Temp,
        Feature::Atemp,
        Feature::Hum,
        Feature::Windspeed,
        Feature::Casual,
        Feature::Registered,
        Feature::Cnt,
    ];

    /// Column name in the source CSV.
    pub fn column(self) -> &'static str {
        match self {
            Feature::Temp => "temp",
            Feature::Atemp => "atemp",
            Feature::Hum => "hum",
            Feature::Windspeed => "windspeed",
            Feature::Casual => "casual",
            Feature::Registered => "registered",
            Feature::Cnt => "cnt",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    fn value(self, row: &DailyRow) -> f64 {
        let r = &row.record;
        match self {
            Feature::Temp => r.temp,
            Feature::Atemp => r.atemp,
            Feature::Hum => r.hum,
            Feature::Windspeed => r.windspeed,
            Feature::Casual => f64::from(r.casual),
            Feature::Registered => f64::from(r.registered),
            Feature::Cnt => f64::from(r.cnt),
        }
    }
}

const N_FEATURES: usize = Feature::ALL.len();

/// Pairwise Pearson correlations, indexed in [`Feature::ALL`] order.
///
/// Cells are NaN when fewer than two rows are present or either column is
/// constant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub features: [Feature; N_FEATURES],
    pub values: [[f64; N_FEATURES]; N_FEATURES],
}

impl CorrelationMatrix {
    pub fn get(&self, a: Feature, b: Feature) -> f64 {
        self.values[a.index()][b.index()]
    }

    /// Correlation of every other feature with total rentals, strongest
    /// positive first. NaN cells sort last.
    pub fn ranked_against_total(&self) -> Vec<(Feature, f64)> {
        let mut ranked: Vec<(Feature, f64)> = Feature::ALL
            .into_iter()
            .filter(|f| *f != Feature::Cnt)
            .map(|f| (f, self.get(f, Feature::Cnt)))
            .collect();
        ranked.sort_by(|(_, a), (_, b)| match (a.is_nan(), b.is_nan()) {
            (true, true) => std::cmp::Ordering::Equal,
            (true, false) => std::cmp::Ordering::Greater,
            (false, true) => std::cmp::Ordering::Less,
            (false, false) => b.total_cmp(a),
        });
        ranked
    }
}

pub fn correlation_matrix(rows: &[&DailyRow]) -> CorrelationMatrix {
    let columns: Vec<Vec<f64>> = Feature::ALL
        .iter()
        .map(|f| rows.iter().map(|row| f.value(row)).collect())
        .collect();

    let mut values = [[f64::NAN; N_FEATURES]; N_FEATURES];
    for i in 0..N_FEATURES {
        for j in i..N_FEATURES {
            let r = pearson(&columns[i], &columns[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    CorrelationMatrix {
        features: Feature::ALL,
        values,
    }
}

fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len();
    if n < 2 || n != ys.len() {
        return f64::NAN;
    }
    let mean_x = xs.iter().sum::<f64>() / n as f64;
    let mean_y = ys.iter().sum::<f64>() / n as f64;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0)
}

// ---------------------------------------------------------------------------
// Summary metrics
// ---------------------------------------------------------------------------

/// Headline numbers for the filtered daily table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub days: usize,
    pub total_rentals: u64,
    /// `None` when no day is selected.
    pub average_daily: Option<f64>,
    /// `None` when the total is zero.
    pub casual_pct: Option<f64>,
    pub registered_pct: Option<f64>,
}

pub fn summary_metrics(rows: &[&DailyRow]) -> SummaryMetrics {
    let total: u64 = rows.iter().map(|r| u64::from(r.record.cnt)).sum();
    let casual: u64 = rows.iter().map(|r| u64::from(r.record.casual)).sum();
    let registered: u64 = rows.iter().map(|r| u64::from(r.record.registered)).sum();
    let pct = |part: u64| (total > 0).then(|| part as f64 / total as f64 * 100.0);

    SummaryMetrics {
        days: rows.len(),
        total_rentals: total,
        average_daily: mean_of(rows.iter().map(|r| f64::from(r.record.cnt))),
        casual_pct: pct(casual),
        registered_pct: pct(registered),
    }
}

// ---------------------------------------------------------------------------
// All views for one render
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardViews {
    pub summary: SummaryMetrics,
    pub weather_season_box: Vec<BoxSummary>,
    pub season_weather_mean: Vec<SeasonWeatherMean>,
    pub hourly_pattern: Vec<HourlyPoint>,
    pub hourly_by_user_type: Vec<HourlyUserPoint>,
    pub monthly_trend: Vec<MonthlyPoint>,
    pub seasonal_user_trend: Vec<SeasonalUserRow>,
    pub weather_impact: Vec<WeatherImpactRow>,
    pub correlation: CorrelationMatrix,
}

impl DashboardViews {
    pub fn compute(views: &FilteredViews<'_>) -> Self {
        DashboardViews {
            summary: summary_metrics(&views.daily),
            weather_season_box: weather_season_box(&views.daily),
            season_weather_mean: season_weather_mean(&views.daily),
            hourly_pattern: hourly_pattern(&views.hourly),
            hourly_by_user_type: hourly_by_user_type(&views.hourly),
            monthly_trend: monthly_trend(&views.daily),
            seasonal_user_trend: seasonal_user_trend(&views.daily),
            weather_impact: weather_impact(&views.daily),
            correlation: correlation_matrix(&views.daily),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::{apply, filter_dataset, FilterSelection};
    use crate::data::fixtures::{daily, dataset, hourly, sample_dataset};

    fn refs<T>(rows: &[T]) -> Vec<&T> {
        rows.iter().collect()
    }

    #[test]
    fn weather_impact_after_winter_clear_filter() {
        let ds = dataset(vec![daily(1, 0, 1, 30, 70), daily(1, 0, 2, 20, 60)], vec![]);
        let selection = FilterSelection {
            years: Year::ALL.into_iter().collect(),
            seasons: [Season::Winter].into(),
            weather: [Weather::Clear].into(),
        };
        let rows = apply(&ds.daily, &selection);

        let impact = weather_impact(&rows);
        assert_eq!(
            impact,
            vec![WeatherImpactRow {
                weather: Weather::Clear,
                mean_total: 100.0,
                count: 1,
            }]
        );
    }

    #[test]
    fn box_summary_uses_interpolated_quartiles() {
        let rows: Vec<_> = [10, 20, 30, 40]
            .into_iter()
            .map(|cnt| daily(2, 0, 1, 0, cnt))
            .collect();
        let summary = weather_season_box(&refs(&rows));

        assert_eq!(summary.len(), 1);
        let b = &summary[0];
        assert_eq!((b.season, b.weather), (Season::Spring, Weather::Clear));
        assert_eq!(b.min, 10.0);
        assert_eq!(b.q1, 17.5);
        assert_eq!(b.median, 25.0);
        assert_eq!(b.q3, 32.5);
        assert_eq!(b.max, 40.0);
        assert_eq!(b.count, 4);
    }

    #[test]
    fn season_groups_follow_calendar_order() {
        let rows = vec![
            daily(4, 0, 1, 1, 1),
            daily(2, 0, 2, 1, 1),
            daily(3, 0, 1, 1, 1),
            daily(1, 0, 3, 1, 1),
        ];
        let seasons: Vec<Season> = seasonal_user_trend(&refs(&rows))
            .into_iter()
            .map(|r| r.season)
            .collect();
        assert_eq!(seasons, Season::ALL.to_vec());

        let boxes: Vec<Season> = weather_season_box(&refs(&rows))
            .into_iter()
            .map(|b| b.season)
            .collect();
        assert_eq!(boxes, Season::ALL.to_vec());
    }

    #[test]
    fn seasonal_user_trend_means() {
        let rows = vec![daily(3, 0, 1, 10, 90), daily(3, 1, 2, 30, 110)];
        let trend = seasonal_user_trend(&refs(&rows));
        assert_eq!(
            trend,
            vec![SeasonalUserRow {
                season: Season::Summer,
                mean_casual: 20.0,
                mean_registered: 100.0,
                mean_total: 120.0,
            }]
        );
    }

    #[test]
    fn season_weather_mean_per_cell() {
        let rows = vec![
            daily(1, 0, 2, 0, 40),
            daily(1, 0, 1, 0, 100),
            daily(1, 0, 1, 0, 200),
        ];
        let means = season_weather_mean(&refs(&rows));
        assert_eq!(means.len(), 2);
        assert_eq!(means[0].weather, Weather::Clear);
        assert_eq!(means[0].mean_total, 150.0);
        assert_eq!(means[1].weather, Weather::MistCloudy);
        assert_eq!(means[1].mean_total, 40.0);
    }

    #[test]
    fn hourly_pattern_splits_day_types_in_hour_order() {
        let rows = vec![
            hourly(17, 3, 1, 0, 1, 10, 90),
            hourly(8, 0, 1, 0, 1, 5, 15),
            hourly(8, 6, 1, 0, 1, 15, 25),
            hourly(8, 2, 1, 0, 1, 20, 180),
        ];
        let pattern = hourly_pattern(&refs(&rows));
        assert_eq!(
            pattern,
            vec![
                HourlyPoint { hour: 8, day_type: DayType::Weekday, mean_total: 200.0 },
                HourlyPoint { hour: 8, day_type: DayType::Weekend, mean_total: 30.0 },
                HourlyPoint { hour: 17, day_type: DayType::Weekday, mean_total: 100.0 },
            ]
        );

        let users = hourly_by_user_type(&refs(&rows));
        assert_eq!(users[1].mean_casual, 10.0);
        assert_eq!(users[1].mean_registered, 20.0);
    }

    #[test]
    fn monthly_trend_is_month_then_year() {
        let mut a = daily(1, 1, 1, 0, 300);
        a.record.month = 2;
        let mut b = daily(1, 0, 1, 0, 100);
        b.record.month = 2;
        let mut c = daily(4, 0, 1, 0, 50);
        c.record.month = 12;
        let mut d = daily(1, 0, 1, 0, 10);
        d.record.month = 1;
        let rows = vec![a, b, c, d];

        let keys: Vec<(u8, Year)> = monthly_trend(&refs(&rows))
            .into_iter()
            .map(|p| (p.month, p.year))
            .collect();
        assert_eq!(
            keys,
            vec![(1, Year::Y2011), (2, Year::Y2011), (2, Year::Y2012), (12, Year::Y2011)]
        );
    }

    #[test]
    fn unmapped_group_labels_are_left_out() {
        let rows = vec![daily(1, 0, 1, 1, 1), daily(1, 0, 9, 1, 1)];
        let impact = weather_impact(&refs(&rows));
        assert_eq!(impact.len(), 1);
        assert_eq!(impact[0].count, 1);
    }

    #[test]
    fn correlation_matrix_is_symmetric_with_unit_diagonal() {
        let ds = sample_dataset();
        let matrix = correlation_matrix(&refs(&ds.daily));

        for a in Feature::ALL {
            assert!((matrix.get(a, a) - 1.0).abs() < 1e-12, "{a:?} diagonal");
            for b in Feature::ALL {
                assert_eq!(matrix.get(a, b), matrix.get(b, a));
                assert!(matrix.get(a, b).abs() <= 1.0);
            }
        }
    }

    #[test]
    fn perfectly_linear_columns_correlate_to_one() {
        let rows: Vec<_> = (1..=5).map(|i| daily(1, 0, 1, i * 10, i * 30)).collect();
        let matrix = correlation_matrix(&refs(&rows));
        assert!((matrix.get(Feature::Casual, Feature::Cnt) - 1.0).abs() < 1e-12);
        assert!((matrix.get(Feature::Registered, Feature::Casual) - 1.0).abs() < 1e-12);
        // temp is constant in the fixture
        assert!(matrix.get(Feature::Temp, Feature::Cnt).is_nan());
    }

    #[test]
    fn ranked_against_total_excludes_total_and_sorts_descending() {
        let ds = sample_dataset();
        let ranked = correlation_matrix(&refs(&ds.daily)).ranked_against_total();

        assert_eq!(ranked.len(), Feature::ALL.len() - 1);
        assert!(ranked.iter().all(|(f, _)| *f != Feature::Cnt));
        for pair in ranked.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn summary_metrics_percentages() {
        let rows = vec![daily(1, 0, 1, 25, 75), daily(2, 0, 1, 25, 175)];
        let summary = summary_metrics(&refs(&rows));
        assert_eq!(summary.days, 2);
        assert_eq!(summary.total_rentals, 300);
        assert_eq!(summary.average_daily, Some(150.0));
        assert!((summary.casual_pct.unwrap() - 50.0 / 3.0).abs() < 1e-9);
        assert!((summary.registered_pct.unwrap() - 250.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn zero_rentals_give_no_percentages() {
        let rows = vec![daily(1, 0, 1, 0, 0)];
        let summary = summary_metrics(&refs(&rows));
        assert_eq!(summary.average_daily, Some(0.0));
        assert_eq!(summary.casual_pct, None);
        assert_eq!(summary.registered_pct, None);
    }

    #[test]
    fn empty_weather_selection_yields_defined_sentinels() {
        let ds = sample_dataset();
        let mut selection = FilterSelection::all_from(&ds);
        selection.weather.clear();

        let views = DashboardViews::compute(&filter_dataset(&ds, &selection));

        assert_eq!(views.summary.total_rentals, 0);
        assert_eq!(views.summary.average_daily, None);
        assert_eq!(views.summary.casual_pct, None);
        assert_eq!(views.summary.registered_pct, None);
        assert!(views.weather_season_box.is_empty());
        assert!(views.season_weather_mean.is_empty());
        assert!(views.hourly_pattern.is_empty());
        assert!(views.hourly_by_user_type.is_empty());
        assert!(views.monthly_trend.is_empty());
        assert!(views.seasonal_user_trend.is_empty());
        assert!(views.weather_impact.is_empty());
        assert!(views.correlation.values.iter().flatten().all(|v| v.is_nan()));
    }

    #[test]
    fn views_serialize_with_labels() {
        let rows = vec![daily(1, 0, 2, 30, 70)];
        let json = serde_json::to_value(weather_impact(&refs(&rows))).unwrap();
        assert_eq!(json[0]["weather"], "Mist/Cloudy");
        assert_eq!(json[0]["count"], 1);
    }
}

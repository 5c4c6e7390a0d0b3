use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// Displayed wherever a categorical code has no mapping.
pub const UNKNOWN_LABEL: &str = "Unknown";

// ---------------------------------------------------------------------------
// Categorical codes – closed enumerations with total label functions
// ---------------------------------------------------------------------------

/// Meteorological season as encoded in the `season` column.
///
/// Declaration order is the display order used by every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Winter, Season::Spring, Season::Summer, Season::Fall];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Season::Winter),
            2 => Some(Season::Spring),
            3 => Some(Season::Summer),
            4 => Some(Season::Fall),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
        }
    }
}

/// Weather situation as encoded in the `weathersit` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Weather {
    Clear,
    #[serde(rename = "Mist/Cloudy")]
    MistCloudy,
    #[serde(rename = "Light Rain/Snow")]
    LightRainSnow,
    #[serde(rename = "Heavy Rain/Snow")]
    HeavyRainSnow,
}

impl Weather {
    pub const ALL: [Weather; 4] = [
        Weather::Clear,
        Weather::MistCloudy,
        Weather::LightRainSnow,
        Weather::HeavyRainSnow,
    ];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Weather::Clear),
            2 => Some(Weather::MistCloudy),
            3 => Some(Weather::LightRainSnow),
            4 => Some(Weather::HeavyRainSnow),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Weather::Clear => "Clear",
            Weather::MistCloudy => "Mist/Cloudy",
            Weather::LightRainSnow => "Light Rain/Snow",
            Weather::HeavyRainSnow => "Heavy Rain/Snow",
        }
    }
}

/// Calendar year as encoded in the `yr` column (0 = 2011, 1 = 2012).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Year {
    #[serde(rename = "2011")]
    Y2011,
    #[serde(rename = "2012")]
    Y2012,
}

impl Year {
    pub const ALL: [Year; 2] = [Year::Y2011, Year::Y2012];

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Year::Y2011),
            1 => Some(Year::Y2012),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Year::Y2011 => "2011",
            Year::Y2012 => "2012",
        }
    }
}

/// Weekday/weekend split of the `weekday` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DayType {
    Weekday,
    Weekend,
}

impl DayType {
    pub const ALL: [DayType; 2] = [DayType::Weekday, DayType::Weekend];

    /// Weekday codes count from Sunday: 0 = Sunday, 6 = Saturday.
    pub fn from_weekday(weekday: u8) -> Self {
        match weekday {
            0 | 6 => DayType::Weekend,
            _ => DayType::Weekday,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayType::Weekday => "Weekday",
            DayType::Weekend => "Weekend",
        }
    }
}

macro_rules! label_impls {
    ($($ty:ident),*) => {$(
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        /// Accepts the display label (case-insensitive) or the raw column code.
        impl FromStr for $ty {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim();
                if let Some(v) = $ty::ALL.iter().find(|v| v.label().eq_ignore_ascii_case(s)) {
                    return Ok(*v);
                }
                s.parse::<u8>()
                    .ok()
                    .and_then($ty::from_code)
                    .ok_or_else(|| {
                        let options: Vec<&str> = $ty::ALL.iter().map(|v| v.label()).collect();
                        format!("unknown {} '{s}', expected one of {options:?}", stringify!($ty).to_lowercase())
                    })
            }
        }
    )*};
}

label_impls!(Season, Weather, Year);

impl fmt::Display for DayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display text for an optional label; unmapped codes render as "Unknown".
pub fn label_or_unknown<T: fmt::Display>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| UNKNOWN_LABEL.to_string())
}

// ---------------------------------------------------------------------------
// Raw records – one CSV row each
// ---------------------------------------------------------------------------

/// One row of `day.csv`. Codes are kept exactly as read.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DailyRecord {
    pub instant: u32,
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    pub season: u8,
    #[serde(rename = "yr")]
    pub year: u8,
    #[serde(rename = "mnth")]
    pub month: u8,
    #[serde(deserialize_with = "flag")]
    pub holiday: bool,
    pub weekday: u8,
    #[serde(deserialize_with = "flag")]
    pub workingday: bool,
    #[serde(rename = "weathersit")]
    pub weather: u8,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

/// One row of `hour.csv`: the daily columns plus the hour of day.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HourlyRecord {
    pub instant: u32,
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    pub season: u8,
    #[serde(rename = "yr")]
    pub year: u8,
    #[serde(rename = "mnth")]
    pub month: u8,
    #[serde(rename = "hr")]
    pub hour: u8,
    #[serde(deserialize_with = "flag")]
    pub holiday: bool,
    pub weekday: u8,
    #[serde(deserialize_with = "flag")]
    pub workingday: bool,
    #[serde(rename = "weathersit")]
    pub weather: u8,
    pub temp: f64,
    pub atemp: f64,
    pub hum: f64,
    pub windspeed: f64,
    pub casual: u32,
    pub registered: u32,
    pub cnt: u32,
}

/// The dataset stores booleans as 0/1.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    match u8::deserialize(deserializer)? {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(serde::de::Error::custom(format!(
            "expected 0 or 1, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Enriched rows and tables
// ---------------------------------------------------------------------------

/// Human-readable labels derived from the raw codes. `None` = unmapped code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Labels {
    pub season: Option<Season>,
    pub weather: Option<Weather>,
    pub year: Option<Year>,
}

impl Labels {
    pub fn from_codes(season: u8, weather: u8, year: u8) -> Self {
        Labels {
            season: Season::from_code(season),
            weather: Weather::from_code(weather),
            year: Year::from_code(year),
        }
    }
}

/// Anything carrying the three filterable labels.
pub trait Labelled {
    fn labels(&self) -> &Labels;
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow {
    pub record: DailyRecord,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourlyRow {
    pub record: HourlyRecord,
    pub labels: Labels,
    pub day_type: DayType,
    /// `date` at midnight plus `hour` hours.
    pub datetime: NaiveDateTime,
}

impl Labelled for DailyRow {
    fn labels(&self) -> &Labels {
        &self.labels
    }
}

impl Labelled for HourlyRow {
    fn labels(&self) -> &Labels {
        &self.labels
    }
}

impl<T: Labelled> Labelled for &T {
    fn labels(&self) -> &Labels {
        (**self).labels()
    }
}

pub type DailyTable = Vec<DailyRow>;
pub type HourlyTable = Vec<HourlyRow>;

// ---------------------------------------------------------------------------
// Dataset – both enriched tables, shared read-only
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub daily: DailyTable,
    pub hourly: HourlyTable,
}

pub type SharedDataset = Arc<Dataset>;

impl Dataset {
    pub fn new(daily: DailyTable, hourly: HourlyTable) -> Self {
        Dataset { daily, hourly }
    }

    /// Year labels present in the daily table, in calendar order.
    pub fn distinct_years(&self) -> Vec<Year> {
        distinct(self.daily.iter().filter_map(|r| r.labels.year))
    }

    /// Season labels present in the daily table, Winter first.
    pub fn distinct_seasons(&self) -> Vec<Season> {
        distinct(self.daily.iter().filter_map(|r| r.labels.season))
    }

    /// Weather labels present in the daily table, in code order.
    pub fn distinct_weather(&self) -> Vec<Weather> {
        distinct(self.daily.iter().filter_map(|r| r.labels.weather))
    }
}

fn distinct<T: Ord>(values: impl Iterator<Item = T>) -> Vec<T> {
    values
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{daily, dataset};

    #[test]
    fn codes_map_to_fixed_labels() {
        assert_eq!(Season::from_code(1).map(Season::label), Some("Winter"));
        assert_eq!(Season::from_code(4).map(Season::label), Some("Fall"));
        assert_eq!(Weather::from_code(2).map(Weather::label), Some("Mist/Cloudy"));
        assert_eq!(Weather::from_code(4).map(Weather::label), Some("Heavy Rain/Snow"));
        assert_eq!(Year::from_code(0).map(Year::label), Some("2011"));
        assert_eq!(Year::from_code(1).map(Year::label), Some("2012"));
    }

    #[test]
    fn unmapped_codes_have_no_label() {
        assert_eq!(Season::from_code(0), None);
        assert_eq!(Season::from_code(5), None);
        assert_eq!(Weather::from_code(9), None);
        assert_eq!(Year::from_code(2), None);
        assert_eq!(label_or_unknown(Weather::from_code(9)), "Unknown");
        assert_eq!(label_or_unknown(Weather::from_code(1)), "Clear");
    }

    #[test]
    fn weekend_is_sunday_and_saturday() {
        assert_eq!(DayType::from_weekday(0), DayType::Weekend);
        assert_eq!(DayType::from_weekday(6), DayType::Weekend);
        for weekday in 1..=5 {
            assert_eq!(DayType::from_weekday(weekday), DayType::Weekday);
        }
    }

    #[test]
    fn season_order_is_not_alphabetical() {
        let mut seasons = vec![Season::Fall, Season::Summer, Season::Winter, Season::Spring];
        seasons.sort();
        assert_eq!(seasons, Season::ALL.to_vec());
    }

    #[test]
    fn parses_labels_and_codes() {
        assert_eq!("mist/cloudy".parse::<Weather>(), Ok(Weather::MistCloudy));
        assert_eq!("3".parse::<Weather>(), Ok(Weather::LightRainSnow));
        assert_eq!(" Summer ".parse::<Season>(), Ok(Season::Summer));
        assert_eq!("2012".parse::<Year>(), Ok(Year::Y2012));
        assert_eq!("0".parse::<Year>(), Ok(Year::Y2011));
        assert!("Monsoon".parse::<Weather>().is_err());
    }

    #[test]
    fn serializes_as_display_labels() {
        let json = serde_json::to_string(&(Weather::LightRainSnow, Year::Y2011, Season::Fall))
            .unwrap();
        assert_eq!(json, r#"["Light Rain/Snow","2011","Fall"]"#);
    }

    #[test]
    fn distinct_labels_skip_unmapped_and_keep_order() {
        let ds = dataset(
            vec![
                daily(4, 1, 3, 10, 5),
                daily(1, 0, 1, 10, 5),
                daily(1, 0, 9, 10, 5),
                daily(7, 1, 2, 10, 5),
            ],
            vec![],
        );
        assert_eq!(ds.distinct_seasons(), vec![Season::Winter, Season::Fall]);
        assert_eq!(ds.distinct_years(), vec![Year::Y2011, Year::Y2012]);
        assert_eq!(
            ds.distinct_weather(),
            vec![Weather::Clear, Weather::MistCloudy, Weather::LightRainSnow]
        );
    }
}

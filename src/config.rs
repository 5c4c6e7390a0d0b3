use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::data::filter::FilterSelection;
use crate::data::model::{Dataset, Season, Weather, Year};

/// Command-line configuration.
#[derive(Debug, Parser)]
#[command(
    name = "bike-sharing-dashboard",
    version,
    about = "Bike sharing rentals dashboard"
)]
pub struct Config {
    /// Directory holding day.csv and hour.csv
    #[arg(long, env = "BIKE_DASHBOARD_DATA_DIR", default_value = "data")]
    pub data_dir: PathBuf,

    /// Print the report for the selection and exit instead of opening the window
    #[arg(long)]
    pub report: bool,

    /// Report output format
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    /// Year to include (label or code); repeat for several. Default: all present
    #[arg(long = "year", value_name = "YEAR")]
    pub years: Vec<Year>,

    /// Season to include (label or code); repeat for several. Default: all present
    #[arg(long = "season", value_name = "SEASON")]
    pub seasons: Vec<Season>,

    /// Weather condition to include (label or code); repeat for several. Default: all present
    #[arg(long = "weather", value_name = "WEATHER")]
    pub weather: Vec<Weather>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Text,
    Json,
}

impl Config {
    /// Build the selection for `dataset`: an omitted dimension selects every
    /// label present in the data.
    pub fn selection(&self, dataset: &Dataset) -> FilterSelection {
        let mut selection = FilterSelection::all_from(dataset);
        if !self.years.is_empty() {
            selection.years = self.years.iter().copied().collect();
        }
        if !self.seasons.is_empty() {
            selection.seasons = self.seasons.iter().copied().collect();
        }
        if !self.weather.is_empty() {
            selection.weather = self.weather.iter().copied().collect();
        }
        selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::sample_dataset;

    #[test]
    fn parses_repeated_filters() {
        let config = Config::try_parse_from([
            "bike-sharing-dashboard",
            "--data-dir",
            "/tmp/bikes",
            "--report",
            "--format",
            "json",
            "--season",
            "winter",
            "--season",
            "3",
            "--weather",
            "Mist/Cloudy",
        ])
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/bikes"));
        assert!(config.report);
        assert_eq!(config.format, ReportFormat::Json);
        assert_eq!(config.seasons, vec![Season::Winter, Season::Summer]);
        assert_eq!(config.weather, vec![Weather::MistCloudy]);
        assert!(config.years.is_empty());
    }

    #[test]
    fn rejects_unknown_labels() {
        let result = Config::try_parse_from(["bike-sharing-dashboard", "--weather", "Hail"]);
        assert!(result.is_err());
    }

    #[test]
    fn omitted_dimensions_select_everything_present() {
        let ds = sample_dataset();
        let config =
            Config::try_parse_from(["bike-sharing-dashboard", "--year", "2012"]).unwrap();

        let selection = config.selection(&ds);
        assert_eq!(selection.years, [Year::Y2012].into());
        assert_eq!(selection.seasons, FilterSelection::all_from(&ds).seasons);
        assert_eq!(selection.weather, FilterSelection::all_from(&ds).weather);
    }
}

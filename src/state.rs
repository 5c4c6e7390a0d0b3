use crate::color::CategoryColors;
use crate::data::aggregate::DashboardViews;
use crate::data::filter::{filter_dataset, FilterSelection};
use crate::data::loader::{CsvDataProvider, DataProvider};
use crate::data::model::{Season, SharedDataset, Weather, Year};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTab {
    SeasonWeatherBox,
    SeasonWeatherBars,
    HourlyPattern,
    HourlyUserType,
    MonthlyTrend,
    SeasonalUsers,
    WeatherImpact,
    Correlation,
}

impl ChartTab {
    pub const ALL: [ChartTab; 8] = [
        ChartTab::SeasonWeatherBox,
        ChartTab::SeasonWeatherBars,
        ChartTab::HourlyPattern,
        ChartTab::HourlyUserType,
        ChartTab::MonthlyTrend,
        ChartTab::SeasonalUsers,
        ChartTab::WeatherImpact,
        ChartTab::Correlation,
    ];

    pub fn title(self) -> &'static str {
        match self {
            ChartTab::SeasonWeatherBox => "Weather by Season",
            ChartTab::SeasonWeatherBars => "Season × Weather",
            ChartTab::HourlyPattern => "Hourly Patterns",
            ChartTab::HourlyUserType => "User Types",
            ChartTab::MonthlyTrend => "Monthly Trends",
            ChartTab::SeasonalUsers => "Seasonal Users",
            ChartTab::WeatherImpact => "Weather Impact",
            ChartTab::Correlation => "Correlation",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Where the dataset comes from; cached after the first load.
    pub provider: Box<dyn DataProvider>,

    /// Loaded dataset (None until a load succeeds).
    pub dataset: Option<SharedDataset>,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Views for the current selection (recomputed on every change).
    pub views: Option<DashboardViews>,

    /// Number of daily / hourly rows passing the current selection.
    pub visible_rows: (usize, usize),

    /// True when neither table has a row passing the selection.
    pub nothing_matches: bool,

    pub colors: CategoryColors,

    pub tab: ChartTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(provider: Box<dyn DataProvider>) -> Self {
        Self {
            provider,
            dataset: None,
            selection: FilterSelection::default(),
            views: None,
            visible_rows: (0, 0),
            nothing_matches: false,
            colors: CategoryColors::default(),
            tab: ChartTab::SeasonWeatherBox,
            status_message: None,
        }
    }

    /// Fetch the dataset from the provider and reset filters to "everything present".
    pub fn load(&mut self) {
        match self.provider.dataset() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                log::error!("Failed to load dataset: {e:#}");
                self.status_message = Some(format!("Error: {}", error_chain(&e)));
                self.dataset = None;
                self.views = None;
                self.visible_rows = (0, 0);
                self.nothing_matches = false;
            }
        }
    }

    /// Drop the provider's cache and load again.
    pub fn reload(&mut self) {
        self.provider.reload();
        self.load();
    }

    /// Switch to a CSV directory chosen at runtime.
    pub fn open_directory(&mut self, dir: std::path::PathBuf) {
        log::info!("Switching data directory to {}", dir.display());
        self.provider = Box::new(CsvDataProvider::new(dir));
        self.load();
    }

    /// Ingest a newly loaded dataset and initialise filters.
    pub fn set_dataset(&mut self, dataset: SharedDataset) {
        self.selection = FilterSelection::all_from(&dataset);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute every view after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let filtered = filter_dataset(ds, &self.selection);
            self.visible_rows = (filtered.daily.len(), filtered.hourly.len());
            self.nothing_matches = filtered.is_empty();
            self.views = Some(DashboardViews::compute(&filtered));
        }
    }

    pub fn toggle_year(&mut self, year: Year) {
        self.selection.toggle_year(year);
        self.refilter();
    }

    pub fn toggle_season(&mut self, season: Season) {
        self.selection.toggle_season(season);
        self.refilter();
    }

    pub fn toggle_weather(&mut self, weather: Weather) {
        self.selection.toggle_weather(weather);
        self.refilter();
    }

    /// Select every value of one dimension present in the data.
    pub fn select_all(&mut self, dimension: Dimension) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let all = FilterSelection::all_from(ds);
        match dimension {
            Dimension::Year => self.selection.years = all.years,
            Dimension::Season => self.selection.seasons = all.seasons,
            Dimension::Weather => self.selection.weather = all.weather,
        }
        self.refilter();
    }

    /// Deselect all values of one dimension.
    pub fn select_none(&mut self, dimension: Dimension) {
        match dimension {
            Dimension::Year => self.selection.years.clear(),
            Dimension::Season => self.selection.seasons.clear(),
            Dimension::Weather => self.selection.weather.clear(),
        }
        self.refilter();
    }
}

/// The three filterable dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Year,
    Season,
    Weather,
}

fn error_chain(e: &dyn std::error::Error) -> String {
    let mut msg = e.to_string();
    let mut source = e.source();
    while let Some(s) = source {
        msg.push_str(": ");
        msg.push_str(&s.to_string());
        source = s.source();
    }
    msg
}

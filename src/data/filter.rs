use std::collections::BTreeSet;

use super::model::{DailyRow, Dataset, HourlyRow, Labelled, Labels, Season, Weather, Year};

// ---------------------------------------------------------------------------
// Filter predicate: which labels are selected per dimension
// ---------------------------------------------------------------------------

/// Selected values per dimension.
///
/// A row passes when its year, season and weather labels are all selected.
/// An empty set selects nothing; rows with an unmapped label never pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSelection {
    pub years: BTreeSet<Year>,
    pub seasons: BTreeSet<Season>,
    pub weather: BTreeSet<Weather>,
}

impl FilterSelection {
    /// Select every label present in the loaded data (the dashboard default).
    pub fn all_from(dataset: &Dataset) -> Self {
        FilterSelection {
            years: dataset.distinct_years().into_iter().collect(),
            seasons: dataset.distinct_seasons().into_iter().collect(),
            weather: dataset.distinct_weather().into_iter().collect(),
        }
    }

    /// Select every known label, whether or not the data contains it.
    #[cfg(test)]
    pub fn everything() -> Self {
        FilterSelection {
            years: Year::ALL.into_iter().collect(),
            seasons: Season::ALL.into_iter().collect(),
            weather: Weather::ALL.into_iter().collect(),
        }
    }

    pub fn matches(&self, labels: &Labels) -> bool {
        contains(&self.years, labels.year)
            && contains(&self.seasons, labels.season)
            && contains(&self.weather, labels.weather)
    }

    /// True when some dimension has nothing selected.
    pub fn selects_nothing(&self) -> bool {
        self.years.is_empty() || self.seasons.is_empty() || self.weather.is_empty()
    }

    pub fn toggle_year(&mut self, year: Year) {
        toggle(&mut self.years, year);
    }

    pub fn toggle_season(&mut self, season: Season) {
        toggle(&mut self.seasons, season);
    }

    pub fn toggle_weather(&mut self, weather: Weather) {
        toggle(&mut self.weather, weather);
    }
}

fn contains<T: Ord>(selected: &BTreeSet<T>, label: Option<T>) -> bool {
    label.is_some_and(|l| selected.contains(&l))
}

fn toggle<T: Ord>(selected: &mut BTreeSet<T>, value: T) {
    if !selected.remove(&value) {
        selected.insert(value);
    }
}

// ---------------------------------------------------------------------------
// Applying a selection
// ---------------------------------------------------------------------------

/// Return the rows that pass `selection`, borrowed from the source.
pub fn apply<'a, R, I>(rows: I, selection: &FilterSelection) -> Vec<&'a R>
where
    R: Labelled + 'a,
    I: IntoIterator<Item = &'a R>,
{
    rows.into_iter()
        .filter(|row| selection.matches(row.labels()))
        .collect()
}

/// Both tables filtered with the same selection.
#[derive(Debug, Clone, Default)]
pub struct FilteredViews<'a> {
    pub daily: Vec<&'a DailyRow>,
    pub hourly: Vec<&'a HourlyRow>,
}

impl FilteredViews<'_> {
    pub fn is_empty(&self) -> bool {
        self.daily.is_empty() && self.hourly.is_empty()
    }
}

pub fn filter_dataset<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredViews<'a> {
    let views = FilteredViews {
        daily: apply(&dataset.daily, selection),
        hourly: apply(&dataset.hourly, selection),
    };
    log::debug!(
        "Filter kept {}/{} daily and {}/{} hourly rows",
        views.daily.len(),
        dataset.daily.len(),
        views.hourly.len(),
        dataset.hourly.len()
    );
    views
}

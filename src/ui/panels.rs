use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::{label_or_unknown, Dataset};
use crate::report::{fmt_opt, thousands};
use crate::state::{AppState, Dimension};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let years = dataset.distinct_years();
            filter_group(ui, state, Dimension::Year, "Year", years.len(), |ui, state| {
                for year in &years {
                    let mut checked = state.selection.years.contains(year);
                    let text = RichText::new(year.label()).color(state.colors.year(*year));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_year(*year);
                    }
                }
            });

            let seasons = dataset.distinct_seasons();
            filter_group(ui, state, Dimension::Season, "Season", seasons.len(), |ui, state| {
                for season in &seasons {
                    let mut checked = state.selection.seasons.contains(season);
                    let text =
                        RichText::new(season.label()).color(state.colors.season(*season));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_season(*season);
                    }
                }
            });

            let weather = dataset.distinct_weather();
            filter_group(ui, state, Dimension::Weather, "Weather", weather.len(), |ui, state| {
                for w in &weather {
                    let mut checked = state.selection.weather.contains(w);
                    let text = RichText::new(w.label()).color(state.colors.weather(*w));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_weather(*w);
                    }
                }
            });
        });
}

/// Collapsible group with All/None buttons and the `(selected/total)` count.
fn filter_group(
    ui: &mut Ui,
    state: &mut AppState,
    dimension: Dimension,
    title: &str,
    n_total: usize,
    add_checkboxes: impl FnOnce(&mut Ui, &mut AppState),
) {
    let n_selected = match dimension {
        Dimension::Year => state.selection.years.len(),
        Dimension::Season => state.selection.seasons.len(),
        Dimension::Weather => state.selection.weather.len(),
    };
    let header_text = format!("{title}  ({n_selected}/{n_total})");

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all(dimension);
                }
                if ui.small_button("None").clicked() {
                    state.select_none(dimension);
                }
            });
            add_checkboxes(ui, state);
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open data folder…").clicked() {
                open_folder_dialog(state);
                ui.close_menu();
            }
            if ui.button("Reload").clicked() {
                state.reload();
                ui.close_menu();
            }
        });

        ui.separator();
        ui.label(format!("Source: {}", state.provider.describe()));

        if let Some(ds) = &state.dataset {
            ui.separator();
            let (days, hours) = state.visible_rows;
            ui.label(format!(
                "{days}/{} days, {hours}/{} hours visible",
                ds.daily.len(),
                ds.hourly.len()
            ));

            if state.selection.selects_nothing() {
                ui.label(RichText::new("A filter group has nothing selected").weak());
            } else if state.nothing_matches {
                ui.label(RichText::new("No rows match the current filters").weak());
            }
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// Key metrics and dataset preview
// ---------------------------------------------------------------------------

pub fn key_metrics(ui: &mut Ui, state: &AppState) {
    let Some(views) = &state.views else {
        return;
    };
    let m = &views.summary;

    ui.heading("Key Metrics");
    ui.columns(4, |cols| {
        metric(&mut cols[0], "Total Bike Rentals", thousands(m.total_rentals));
        metric(&mut cols[1], "Average Daily Rentals", fmt_opt(m.average_daily, ""));
        metric(&mut cols[2], "Casual Riders", fmt_opt(m.casual_pct, "%"));
        metric(&mut cols[3], "Registered Riders", fmt_opt(m.registered_pct, "%"));
    });
}

fn metric(ui: &mut Ui, label: &str, value: String) {
    ui.vertical(|ui: &mut Ui| {
        ui.label(RichText::new(label).weak());
        ui.label(RichText::new(value).size(24.0).strong());
    });
}

pub fn about_dataset(ui: &mut Ui, dataset: &Dataset) {
    egui::CollapsingHeader::new("About the Dataset")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.label(
                "Daily and hourly counts of rental bikes in a bike-sharing system, \
                 with the matching weather and calendar information.",
            );
            ui.label("season: 1 Winter, 2 Spring, 3 Summer, 4 Fall");
            ui.label("weathersit: 1 Clear, 2 Mist/Cloudy, 3 Light Rain/Snow, 4 Heavy Rain/Snow");
            ui.label("weekday: 0 Sunday … 6 Saturday (0 and 6 count as weekend)");
            ui.label("temp / atemp / hum / windspeed are normalised to 0..1");
            ui.label("casual + registered = cnt");
            ui.add_space(6.0);

            ui.columns(2, |cols| {
                cols[0].strong("Daily Data Sample");
                cols[0].push_id("daily_preview", |ui: &mut Ui| {
                    preview_table(
                        ui,
                        dataset.daily.iter().take(3).map(|r| {
                            let rec = &r.record;
                            [
                                rec.date.to_string(),
                                label_or_unknown(r.labels.season),
                                label_or_unknown(r.labels.year),
                                label_or_unknown(r.labels.weather),
                                rec.casual.to_string(),
                                rec.registered.to_string(),
                                rec.cnt.to_string(),
                            ]
                        }),
                        "date",
                    );
                });

                cols[1].strong("Hourly Data Sample");
                cols[1].push_id("hourly_preview", |ui: &mut Ui| {
                    preview_table(
                        ui,
                        dataset.hourly.iter().take(3).map(|r| {
                            let rec = &r.record;
                            [
                                r.datetime.format("%Y-%m-%d %H:00").to_string(),
                                label_or_unknown(r.labels.season),
                                label_or_unknown(r.labels.year),
                                label_or_unknown(r.labels.weather),
                                rec.casual.to_string(),
                                rec.registered.to_string(),
                                rec.cnt.to_string(),
                            ]
                        }),
                        "datetime",
                    );
                });
            });
        });
}

fn preview_table(ui: &mut Ui, rows: impl Iterator<Item = [String; 7]>, first_column: &str) {
    let headers = [first_column, "season", "yr", "weathersit", "casual", "registered", "cnt"];
    TableBuilder::new(ui)
        .striped(true)
        .columns(Column::auto(), headers.len())
        .header(20.0, |mut header| {
            for h in headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(h);
                });
            }
        })
        .body(|mut body| {
            for cells in rows {
                body.row(18.0, |mut row| {
                    for cell in &cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(cell);
                        });
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Folder dialog
// ---------------------------------------------------------------------------

pub fn open_folder_dialog(state: &mut AppState) {
    let folder = rfd::FileDialog::new()
        .set_title("Open folder with day.csv and hour.csv")
        .pick_folder();

    if let Some(dir) = folder {
        state.open_directory(dir);
        if let Some(ds) = &state.dataset {
            log::info!(
                "Loaded {} days and {} hours",
                ds.daily.len(),
                ds.hourly.len()
            );
        }
    }
}


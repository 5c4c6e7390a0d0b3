use eframe::egui::{Align2, Color32, FontId, Sense, Ui, Vec2};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Line, LineStyle, Plot,
    PlotPoints, Points,
};

use crate::color::{diverging, text_on, CategoryColors};
use crate::data::aggregate::{CorrelationMatrix, DashboardViews, Feature};
use crate::data::model::{DayType, Season, Weather, Year};
use crate::report::month_name;
use crate::state::{AppState, ChartTab};

const PLOT_HEIGHT: f32 = 380.0;

// ---------------------------------------------------------------------------
// Central panel: tab strip + the selected chart
// ---------------------------------------------------------------------------

pub fn charts(ui: &mut Ui, state: &mut AppState) {
    let Some(views) = &state.views else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a data folder to view rentals  (File → Open data folder…)");
        });
        return;
    };

    ui.horizontal_wrapped(|ui: &mut Ui| {
        for tab in ChartTab::ALL {
            ui.selectable_value(&mut state.tab, tab, tab.title());
        }
    });
    ui.separator();

    if state.nothing_matches {
        ui.label("No rows match the current filters.");
        return;
    }

    let colors = &state.colors;
    match state.tab {
        ChartTab::SeasonWeatherBox => season_weather_box(ui, views, colors),
        ChartTab::SeasonWeatherBars => season_weather_bars(ui, views, colors),
        ChartTab::HourlyPattern => hourly_pattern(ui, views, colors),
        ChartTab::HourlyUserType => hourly_user_type(ui, views, colors),
        ChartTab::MonthlyTrend => monthly_trend(ui, views, colors),
        ChartTab::SeasonalUsers => seasonal_users(ui, views),
        ChartTab::WeatherImpact => weather_impact(ui, views, colors),
        ChartTab::Correlation => correlation(ui, &views.correlation),
    }
}

/// Label for a category axis tick: the entry at an integer position, blank
/// between categories and outside the slice.
fn category_label(value: f64, labels: &[&str]) -> String {
    let i = value.round();
    if (value - i).abs() > 1e-6 || i < 0.0 {
        return String::new();
    }
    labels
        .get(i as usize)
        .map(|l| l.to_string())
        .unwrap_or_default()
}

fn season_axis(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    category_label(mark.value, &Season::ALL.map(Season::label))
}

fn weather_axis(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    category_label(mark.value, &Weather::ALL.map(Weather::label))
}

fn hour_axis(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 && (0.0..24.0).contains(&mark.value) {
        format!("{:02}", mark.value as u8)
    } else {
        String::new()
    }
}

fn month_axis(mark: GridMark, _range: &std::ops::RangeInclusive<f64>) -> String {
    if mark.value.fract() == 0.0 && (1.0..=12.0).contains(&mark.value) {
        month_name(mark.value as u8).to_string()
    } else {
        String::new()
    }
}

/// Horizontal offset of `weather` inside a season's slot.
fn weather_offset(weather: Weather) -> f64 {
    (weather as usize as f64 - 1.5) * 0.2
}

/// Shared look of every chart in the central panel.
fn styled(plot: Plot) -> Plot {
    plot.legend(Legend::default())
        .height(PLOT_HEIGHT)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(false)
        .allow_zoom(true)
}

// ---------------------------------------------------------------------------
// Season × weather
// ---------------------------------------------------------------------------

fn season_weather_box(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Bike Rentals by Season and Weather Condition");
    styled(Plot::new("season_weather_box"))
        .x_axis_label("Season")
        .y_axis_label("Number of Rentals")
        .x_axis_formatter(season_axis)
        .show(ui, |plot_ui| {
            for weather in Weather::ALL {
                let boxes: Vec<BoxElem> = views
                    .weather_season_box
                    .iter()
                    .filter(|b| b.weather == weather)
                    .map(|b| {
                        let x = b.season as usize as f64 + weather_offset(weather);
                        BoxElem::new(x, BoxSpread::new(b.min, b.q1, b.median, b.q3, b.max))
                            .box_width(0.18)
                            .name(format!("{} / {} (n={})", b.season, b.weather, b.count))
                    })
                    .collect();
                if boxes.is_empty() {
                    continue;
                }
                plot_ui.box_plot(
                    BoxPlot::new(boxes)
                        .name(weather.label())
                        .color(colors.weather(weather)),
                );
            }
        });
}

fn season_weather_bars(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Average Bike Rentals by Season and Weather");
    styled(Plot::new("season_weather_bars"))
        .x_axis_label("Season")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(season_axis)
        .show(ui, |plot_ui| {
            for weather in Weather::ALL {
                let bars: Vec<Bar> = views
                    .season_weather_mean
                    .iter()
                    .filter(|m| m.weather == weather)
                    .map(|m| {
                        Bar::new(m.season as usize as f64 + weather_offset(weather), m.mean_total)
                            .width(0.18)
                            .name(format!("{} / {}", m.season, m.weather))
                    })
                    .collect();
                if bars.is_empty() {
                    continue;
                }
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(weather.label())
                        .color(colors.weather(weather)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Hourly
// ---------------------------------------------------------------------------

fn hourly_pattern(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Average Hourly Bike Rentals: Weekdays vs. Weekends");
    styled(Plot::new("hourly_pattern"))
        .x_axis_label("Hour of Day")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(hour_axis)
        .show(ui, |plot_ui| {
            for day_type in DayType::ALL {
                let points: Vec<[f64; 2]> = views
                    .hourly_pattern
                    .iter()
                    .filter(|p| p.day_type == day_type)
                    .map(|p| [f64::from(p.hour), p.mean_total])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                let color = colors.day_type(day_type);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(day_type.label())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(day_type.label())
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

fn hourly_user_type(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Average Hourly Bike Rentals by User Type: Weekdays vs. Weekends");
    let casual_color = colors.season(Season::Summer);
    let registered_color = colors.season(Season::Fall);

    styled(Plot::new("hourly_user_type"))
        .x_axis_label("Hour of Day")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(hour_axis)
        .show(ui, |plot_ui| {
            for day_type in DayType::ALL {
                let style = match day_type {
                    DayType::Weekday => LineStyle::Solid,
                    DayType::Weekend => LineStyle::dashed_dense(),
                };
                let rows: Vec<_> = views
                    .hourly_by_user_type
                    .iter()
                    .filter(|p| p.day_type == day_type)
                    .collect();
                if rows.is_empty() {
                    continue;
                }
                let casual: PlotPoints =
                    rows.iter().map(|p| [f64::from(p.hour), p.mean_casual]).collect();
                let registered: PlotPoints =
                    rows.iter().map(|p| [f64::from(p.hour), p.mean_registered]).collect();

                plot_ui.line(
                    Line::new(casual)
                        .name(format!("casual / {day_type}"))
                        .color(casual_color)
                        .style(style)
                        .width(2.0),
                );
                plot_ui.line(
                    Line::new(registered)
                        .name(format!("registered / {day_type}"))
                        .color(registered_color)
                        .style(style)
                        .width(2.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Calendar
// ---------------------------------------------------------------------------

fn monthly_trend(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Average Monthly Bike Rentals by Year");
    styled(Plot::new("monthly_trend"))
        .x_axis_label("Month")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(month_axis)
        .show(ui, |plot_ui| {
            for year in Year::ALL {
                let points: Vec<[f64; 2]> = views
                    .monthly_trend
                    .iter()
                    .filter(|p| p.year == year)
                    .map(|p| [f64::from(p.month), p.mean_total])
                    .collect();
                if points.is_empty() {
                    continue;
                }
                let color = colors.year(year);
                plot_ui.line(
                    Line::new(PlotPoints::from(points.clone()))
                        .name(year.label())
                        .color(color)
                        .width(2.0),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from(points))
                        .name(year.label())
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

fn seasonal_users(ui: &mut Ui, views: &DashboardViews) {
    ui.heading("Average Seasonal Bike Rentals by User Type");
    let casual: Vec<Bar> = views
        .seasonal_user_trend
        .iter()
        .map(|r| Bar::new(r.season as usize as f64 - 0.15, r.mean_casual).width(0.3))
        .collect();
    let registered: Vec<Bar> = views
        .seasonal_user_trend
        .iter()
        .map(|r| Bar::new(r.season as usize as f64 + 0.15, r.mean_registered).width(0.3))
        .collect();

    styled(Plot::new("seasonal_users"))
        .x_axis_label("Season")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(season_axis)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(casual)
                    .name("casual")
                    .color(Color32::from_rgb(31, 119, 180)),
            );
            plot_ui.bar_chart(
                BarChart::new(registered)
                    .name("registered")
                    .color(Color32::from_rgb(255, 127, 14)),
            );
        });
}

fn weather_impact(ui: &mut Ui, views: &DashboardViews, colors: &CategoryColors) {
    ui.heading("Average Bike Rentals by Weather Condition");
    styled(Plot::new("weather_impact"))
        .x_axis_label("Weather Condition")
        .y_axis_label("Average Number of Rentals")
        .x_axis_formatter(weather_axis)
        .show(ui, |plot_ui| {
            for row in &views.weather_impact {
                let bar = Bar::new(row.weather as usize as f64, row.mean_total)
                    .width(0.6)
                    .name(format!("{} ({} days)", row.weather, row.count));
                plot_ui.bar_chart(
                    BarChart::new(vec![bar])
                        .name(row.weather.label())
                        .color(colors.weather(row.weather)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn correlation(ui: &mut Ui, matrix: &CorrelationMatrix) {
    ui.heading("Correlation Matrix of Numerical Features");

    let cell = Vec2::new(78.0, 30.0);
    let label_width = 90.0;
    let font = FontId::proportional(13.0);

    // Column header row.
    ui.horizontal(|ui: &mut Ui| {
        ui.add_space(label_width);
        for feature in Feature::ALL {
            let (rect, _) = ui.allocate_exact_size(cell, Sense::hover());
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                feature.column(),
                font.clone(),
                ui.visuals().text_color(),
            );
        }
    });

    for row in Feature::ALL {
        ui.horizontal(|ui: &mut Ui| {
            let (rect, _) = ui.allocate_exact_size(Vec2::new(label_width, cell.y), Sense::hover());
            ui.painter().text(
                rect.right_center(),
                Align2::RIGHT_CENTER,
                row.column(),
                font.clone(),
                ui.visuals().text_color(),
            );
            for col in Feature::ALL {
                let r = matrix.get(row, col);
                let (rect, response) = ui.allocate_exact_size(cell, Sense::hover());
                let fill = diverging(r);
                ui.painter().rect_filled(rect.shrink(1.0), 2.0, fill);
                let text = if r.is_nan() { "n/a".to_string() } else { format!("{r:.2}") };
                ui.painter()
                    .text(rect.center(), Align2::CENTER_CENTER, text, font.clone(), text_on(fill));
                response.on_hover_text(format!("{} vs {}", row.column(), col.column()));
            }
        });
    }

    ui.add_space(12.0);
    ui.heading("Features Correlation with Total Rentals");
    let ranked = matrix.ranked_against_total();
    let bars: Vec<Bar> = ranked
        .iter()
        .enumerate()
        .filter(|(_, (_, r))| !r.is_nan())
        .map(|(i, (feature, r))| {
            Bar::new(i as f64, *r)
                .width(0.6)
                .name(feature.column())
                .fill(diverging(*r))
        })
        .collect();
    let names: Vec<&'static str> = ranked.iter().map(|(f, _)| f.column()).collect();

    Plot::new("correlation_with_total")
        .height(260.0)
        .include_y(-1.0)
        .include_y(1.0)
        .y_axis_label("Correlation Coefficient")
        .x_axis_formatter(move |mark, _range| category_label(mark.value, &names))
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("correlation with cnt"));
        });
}

//! Small literal tables shared by the unit tests.

use chrono::NaiveDate;

use super::enrich::{enrich_daily_record, enrich_hourly_record};
use super::model::{DailyRecord, DailyRow, Dataset, HourlyRecord, HourlyRow};

fn jan_5_2011() -> NaiveDate {
    NaiveDate::from_ymd_opt(2011, 1, 5).unwrap()
}

/// A Wednesday in January with mid-range weather readings.
pub fn daily_record(season: u8, year: u8, weather: u8, casual: u32, registered: u32) -> DailyRecord {
    DailyRecord {
        instant: 1,
        date: jan_5_2011(),
        season,
        year,
        month: 1,
        holiday: false,
        weekday: 3,
        workingday: true,
        weather,
        temp: 0.3,
        atemp: 0.3,
        hum: 0.5,
        windspeed: 0.2,
        casual,
        registered,
        cnt: casual + registered,
    }
}

pub fn daily(season: u8, year: u8, weather: u8, casual: u32, registered: u32) -> DailyRow {
    enrich_daily_record(&daily_record(season, year, weather, casual, registered))
}

pub fn hourly_record(
    hour: u8,
    weekday: u8,
    season: u8,
    year: u8,
    weather: u8,
    casual: u32,
    registered: u32,
) -> HourlyRecord {
    HourlyRecord {
        instant: 1,
        date: jan_5_2011(),
        season,
        year,
        month: 1,
        hour,
        holiday: false,
        weekday,
        workingday: !matches!(weekday, 0 | 6),
        weather,
        temp: 0.3,
        atemp: 0.3,
        hum: 0.5,
        windspeed: 0.2,
        casual,
        registered,
        cnt: casual + registered,
    }
}

pub fn hourly(
    hour: u8,
    weekday: u8,
    season: u8,
    year: u8,
    weather: u8,
    casual: u32,
    registered: u32,
) -> HourlyRow {
    enrich_hourly_record(&hourly_record(
        hour, weekday, season, year, weather, casual, registered,
    ))
}

pub fn dataset(daily: Vec<DailyRow>, hourly: Vec<HourlyRow>) -> Dataset {
    Dataset::new(daily, hourly)
}

/// A mixed table covering both years, every season and three weather codes.
pub fn sample_dataset() -> Dataset {
    let mut days = Vec::new();
    for (i, (season, year, weather)) in [
        (1, 0, 1),
        (1, 0, 2),
        (2, 0, 1),
        (2, 1, 3),
        (3, 1, 1),
        (3, 1, 2),
        (4, 0, 1),
        (4, 1, 2),
    ]
    .into_iter()
    .enumerate()
    {
        let mut row = daily(season, year, weather, 50 + 10 * i as u32, 200 + 35 * i as u32);
        row.record.month = 1 + (i as u8 * 3) % 12;
        row.record.temp = 0.1 * (i as f64 + 1.0);
        row.record.atemp = 0.09 * (i as f64 + 1.0) + 0.01;
        row.record.hum = 0.9 - 0.05 * i as f64;
        row.record.windspeed = 0.1 + 0.02 * ((i * 7) % 5) as f64;
        days.push(row);
    }

    let mut hours = Vec::new();
    for hour in 0..24u8 {
        for (weekday, season, year, weather) in [(0, 1, 0, 1), (3, 3, 1, 2), (6, 2, 1, 1)] {
            hours.push(hourly(
                hour,
                weekday,
                season,
                year,
                weather,
                u32::from(hour) + 2,
                3 * u32::from(hour) + 1,
            ));
        }
    }

    Dataset::new(days, hours)
}

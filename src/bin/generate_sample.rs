//! Writes a synthetic `day.csv` / `hour.csv` pair in the public bike-sharing
//! layout, for demos when the real dataset is not at hand.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{Datelike, NaiveDate};
use clap::Parser;
use serde::Serialize;

#[derive(Parser)]
#[command(about = "Generate a synthetic bike sharing dataset")]
struct Args {
    /// Output directory for day.csv and hour.csv
    #[arg(long, default_value = "data")]
    out_dir: PathBuf,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

#[derive(Serialize)]
struct DayRow {
    instant: u32,
    dteday: String,
    season: u8,
    yr: u8,
    mnth: u32,
    holiday: u8,
    weekday: u32,
    workingday: u8,
    weathersit: u8,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u32,
    registered: u32,
    cnt: u32,
}

#[derive(Serialize)]
struct HourRow {
    instant: u32,
    dteday: String,
    season: u8,
    yr: u8,
    mnth: u32,
    hr: u32,
    holiday: u8,
    weekday: u32,
    workingday: u8,
    weathersit: u8,
    temp: f64,
    atemp: f64,
    hum: f64,
    windspeed: f64,
    casual: u32,
    registered: u32,
    cnt: u32,
}

/// Astronomical seasons, coded 1 = winter … 4 = fall.
fn season_of(date: NaiveDate) -> u8 {
    match (date.month(), date.day()) {
        (12, 21..=31) | (1..=2, _) | (3, 1..=20) => 1,
        (3, _) | (4..=5, _) | (6, 1..=20) => 2,
        (6, _) | (7..=8, _) | (9, 1..=22) => 3,
        _ => 4,
    }
}

fn is_holiday(date: NaiveDate) -> bool {
    matches!(
        (date.year(), date.month(), date.day()),
        (_, 1, 1) | (_, 7, 4) | (_, 12, 25) | (2011, 11, 24) | (2012, 11, 22)
    )
}

fn pick_weather(rng: &mut SimpleRng) -> u8 {
    match rng.next_f64() {
        p if p < 0.63 => 1,
        p if p < 0.96 => 2,
        p if p < 0.998 => 3,
        _ => 4,
    }
}

/// Relative demand per hour for commuters and leisure riders.
fn hour_profile(hour: u32, working: bool) -> (f64, f64) {
    let h = hour as f64;
    let bump = |centre: f64, width: f64| (-(h - centre).powi(2) / (2.0 * width * width)).exp();
    let leisure = 0.05 + bump(14.0, 3.5);
    let commute = if working {
        0.04 + 1.6 * bump(8.0, 1.0) + 1.9 * bump(17.5, 1.3) + 0.4 * bump(12.5, 2.0)
    } else {
        0.04 + 0.9 * bump(13.0, 3.5)
    };
    (leisure, commute)
}

fn round(v: f64, places: i32) -> f64 {
    let f = 10f64.powi(places);
    (v * f).round() / f
}

fn main() -> Result<()> {
    let args = Args::parse();
    let (days, hours) = generate(args.seed)?;

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    write_csv(&args.out_dir.join("day.csv"), &days)?;
    write_csv(&args.out_dir.join("hour.csv"), &hours)?;

    println!(
        "Wrote {} days and {} hours to {}",
        days.len(),
        hours.len(),
        args.out_dir.display()
    );
    Ok(())
}

/// Build every day of 2011-2012 with its 24 hourly rows. Daily counts are
/// the sums of the day's hours.
fn generate(seed: u64) -> Result<(Vec<DayRow>, Vec<HourRow>)> {
    let mut rng = SimpleRng::new(seed);

    let start = NaiveDate::from_ymd_opt(2011, 1, 1).context("start date")?;
    let end = NaiveDate::from_ymd_opt(2012, 12, 31).context("end date")?;

    let mut days = Vec::new();
    let mut hours = Vec::new();

    for (i, date) in start.iter_days().take_while(|d| *d <= end).enumerate() {
        let yr = u8::from(date.year() == 2012);
        let season = season_of(date);
        let weekday = date.weekday().num_days_from_sunday();
        let holiday = is_holiday(date);
        let working = !holiday && !matches!(weekday, 0 | 6);
        let day_weather = pick_weather(&mut rng);

        // Warmest around late July.
        let phase = (date.ordinal() as f64 - 200.0) / 365.0 * 2.0 * std::f64::consts::PI;
        let temp = (0.5 + 0.3 * phase.cos() + rng.gauss(0.0, 0.05)).clamp(0.02, 0.98);
        let atemp = (temp * 0.93 + rng.gauss(0.02, 0.02)).clamp(0.0, 1.0);
        let hum = (0.62 + 0.08 * f64::from(day_weather) + rng.gauss(0.0, 0.08)).clamp(0.1, 1.0);
        let windspeed = (0.19 + rng.gauss(0.0, 0.07)).clamp(0.02, 0.5);

        let growth = if yr == 1 { 1.6 } else { 1.0 };
        let weather_factor = match day_weather {
            1 => 1.0,
            2 => 0.85,
            3 => 0.45,
            _ => 0.2,
        };
        let demand = growth * weather_factor * (0.35 + 1.1 * temp);

        let (mut day_casual, mut day_registered) = (0u32, 0u32);
        for hour in 0..24u32 {
            let weather = if rng.next_f64() < 0.1 {
                (day_weather % 4) + 1
            } else {
                day_weather
            };
            let (leisure, commute) = hour_profile(hour, working);
            let casual_scale = if working { 12.0 } else { 45.0 };
            let casual = (demand * casual_scale * leisure * rng.gauss(1.0, 0.15)).max(0.0) as u32;
            let registered = (demand * 160.0 * commute * rng.gauss(1.0, 0.1)).max(0.0) as u32;
            day_casual += casual;
            day_registered += registered;

            hours.push(HourRow {
                instant: hours.len() as u32 + 1,
                dteday: date.to_string(),
                season,
                yr,
                mnth: date.month(),
                hr: hour,
                holiday: u8::from(holiday),
                weekday,
                workingday: u8::from(working),
                weathersit: weather,
                temp: round(temp, 2),
                atemp: round(atemp, 4),
                hum: round(hum, 2),
                windspeed: round(windspeed, 4),
                casual,
                registered,
                cnt: casual + registered,
            });
        }

        days.push(DayRow {
            instant: i as u32 + 1,
            dteday: date.to_string(),
            season,
            yr,
            mnth: date.month(),
            holiday: u8::from(holiday),
            weekday,
            workingday: u8::from(working),
            weathersit: day_weather,
            temp: round(temp, 6),
            atemp: round(atemp, 6),
            hum: round(hum, 6),
            windspeed: round(windspeed, 6),
            casual: day_casual,
            registered: day_registered,
            cnt: day_casual + day_registered,
        });
    }

    Ok((days, hours))
}

fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn covers_two_years_hour_by_hour() {
        let (days, hours) = generate(7).unwrap();
        assert_eq!(days.len(), 731);
        assert_eq!(hours.len(), 731 * 24);
        assert_eq!(days[0].dteday, "2011-01-01");
        assert_eq!(days[730].dteday, "2012-12-31");
        assert_eq!(days.iter().filter(|d| d.yr == 1).count(), 366);
    }

    #[test]
    fn totals_are_casual_plus_registered() {
        let (days, hours) = generate(7).unwrap();
        assert!(days.iter().all(|d| d.cnt == d.casual + d.registered));
        assert!(hours.iter().all(|h| h.cnt == h.casual + h.registered));
    }

    #[test]
    fn daily_counts_are_sums_of_hours() {
        let (days, hours) = generate(7).unwrap();
        for (day, day_hours) in days.iter().zip(hours.chunks(24)) {
            assert!(day_hours.iter().all(|h| h.dteday == day.dteday));
            assert_eq!(day.casual, day_hours.iter().map(|h| h.casual).sum::<u32>());
            assert_eq!(day.registered, day_hours.iter().map(|h| h.registered).sum::<u32>());
            assert_eq!(day.cnt, day_hours.iter().map(|h| h.cnt).sum::<u32>());
        }
    }

    #[test]
    fn weekday_codes_count_from_sunday() {
        let (days, _) = generate(7).unwrap();
        // 2011-01-01 was a Saturday
        assert_eq!(days[0].weekday, 6);
        assert_eq!(days[1].weekday, 0);
        assert_eq!(days[0].workingday, 0);
        assert_eq!(days[2].workingday, 1);
    }

    #[test]
    fn same_seed_same_data() {
        let (a, _) = generate(3).unwrap();
        let (b, _) = generate(3).unwrap();
        let counts = |rows: &[DayRow]| rows.iter().map(|d| d.cnt).collect::<Vec<_>>();
        assert_eq!(counts(&a), counts(&b));
    }
}

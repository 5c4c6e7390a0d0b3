use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

use crate::data::model::{DayType, Season, Weather, Year};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    let rgb: Srgb<u8> = rgb.into_format();
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

// ---------------------------------------------------------------------------
// Category colours: one fixed colour per label
// ---------------------------------------------------------------------------

/// Stable series colours, so a label keeps its colour whatever is filtered.
#[derive(Debug, Clone)]
pub struct CategoryColors {
    season: Vec<Color32>,
    weather: Vec<Color32>,
    year: Vec<Color32>,
    day_type: Vec<Color32>,
}

impl Default for CategoryColors {
    fn default() -> Self {
        CategoryColors {
            season: generate_palette(Season::ALL.len()),
            weather: generate_palette(Weather::ALL.len()),
            year: generate_palette(Year::ALL.len()),
            day_type: vec![Color32::from_rgb(66, 133, 244), Color32::from_rgb(234, 67, 53)],
        }
    }
}

impl CategoryColors {
    pub fn season(&self, season: Season) -> Color32 {
        self.season[season as usize]
    }

    pub fn weather(&self, weather: Weather) -> Color32 {
        self.weather[weather as usize]
    }

    pub fn year(&self, year: Year) -> Color32 {
        self.year[year as usize]
    }

    pub fn day_type(&self, day_type: DayType) -> Color32 {
        self.day_type[day_type as usize]
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for correlations
// ---------------------------------------------------------------------------

/// Blue (-1) → white (0) → red (+1). NaN maps to grey.
pub fn diverging(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::GRAY;
    }
    let t = value.clamp(-1.0, 1.0) as f32;
    let white = LinSrgb::new(1.0, 1.0, 1.0);
    let end = if t < 0.0 {
        LinSrgb::new(0.02, 0.19, 0.38)
    } else {
        LinSrgb::new(0.40, 0.0, 0.05)
    };
    let mixed = white.mix(end, t.abs());
    to_color32(Srgb::from_linear(mixed))
}

/// Black or white, whichever reads better on `background`.
pub fn text_on(background: Color32) -> Color32 {
    let luma = 0.299 * f32::from(background.r())
        + 0.587 * f32::from(background.g())
        + 0.114 * f32::from(background.b());
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

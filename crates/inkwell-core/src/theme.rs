//! Day/night theme selection
//!
//! The default theme follows the sun at the site's location, using the NOAA
//! fractional-year approximation. A visitor's explicit choice is kept in a
//! session-scoped [`PreferenceStore`] and wins over the solar default.

use std::collections::HashMap;
use std::f64::consts::PI;
use std::time::Duration;

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Session storage key holding the visitor's explicit choice.
pub const THEME_STORAGE_KEY: &str = "mv_theme_preference";

/// Must match the CSS `--wipe-duration`.
pub const WIPE_DURATION: Duration = Duration::from_millis(600);

/// Official zenith for sunrise/sunset, accounting for refraction and the solar disc.
const SUNRISE_ZENITH_DEG: f64 = 90.833;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub const BELGRADE: Location = Location {
        latitude: 44.82,
        longitude: 20.46,
    };
}

impl Default for Location {
    fn default() -> Self {
        Location::BELGRADE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SunTimes {
    pub sunrise: DateTime<Utc>,
    pub sunset: DateTime<Utc>,
}

impl SunTimes {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.sunrise <= instant && instant < self.sunset
    }
}

/// Sunrise and sunset for `date`, rounded to the minute.
///
/// During polar day or night the hour angle is clamped, so sunrise and
/// sunset either span the whole day or collapse onto solar noon.
pub fn sun_times(date: NaiveDate, location: Location) -> SunTimes {
    let day_of_year = f64::from(date.ordinal());
    let gamma = (2.0 * PI / 365.0) * (day_of_year - 1.0);

    // Minutes
    let eq_time = 229.18
        * (0.000075 + 0.001868 * gamma.cos()
            - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin());

    // Radians
    let declination = 0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin()
        - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin();

    let latitude = location.latitude.to_radians();
    let cos_hour_angle = SUNRISE_ZENITH_DEG.to_radians().cos()
        / (latitude.cos() * declination.cos())
        - latitude.tan() * declination.tan();
    let hour_angle = cos_hour_angle.clamp(-1.0, 1.0).acos().to_degrees();

    // Four minutes of clock time per degree of longitude.
    let solar_noon = 720.0 - eq_time - 4.0 * location.longitude;
    let sunrise_minutes = (solar_noon - hour_angle * 4.0).round() as i64;
    let sunset_minutes = (solar_noon + hour_angle * 4.0).round() as i64;

    let midnight = Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN));
    SunTimes {
        sunrise: midnight + chrono::Duration::minutes(sunrise_minutes),
        sunset: midnight + chrono::Duration::minutes(sunset_minutes),
    }
}

/// Whether the sun is up at `now`, using the calendar date in `now`'s zone.
pub fn is_daytime<Tz: TimeZone>(now: &DateTime<Tz>, location: Location) -> bool {
    let times = sun_times(now.date_naive(), location);
    let instant = now.with_timezone(&Utc);
    let day = times.contains(instant);
    debug!(
        sunrise = %times.sunrise,
        sunset = %times.sunset,
        now = %instant,
        day,
        "Solar theme check"
    );
    day
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn for_daylight(is_day: bool) -> Self {
        if is_day { Theme::Light } else { Theme::Dark }
    }
}

/// Where the active theme came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeSource {
    Stored,
    Solar,
}

/// Direction of the wipe animation played on toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WipeDirection {
    /// Left to right
    ToDay,
    /// Right to left
    ToNight,
}

impl WipeDirection {
    pub fn class_name(self) -> &'static str {
        match self {
            WipeDirection::ToDay => "theme-switch--to-day",
            WipeDirection::ToNight => "theme-switch--to-night",
        }
    }

    pub const ALL_CLASSES: [&'static str; 2] = ["theme-switch--to-day", "theme-switch--to-night"];
}

/// A toggle's visual side effect: add `direction`'s class now, remove it after `clear_after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Wipe {
    pub direction: WipeDirection,
    pub clear_after: Duration,
}

/// Key/value storage scoped to the visitor's session.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

/// Theme state for one page load.
pub struct ThemeSwitch<P: PreferenceStore> {
    store: P,
    current: Theme,
    source: ThemeSource,
}

impl<P: PreferenceStore> ThemeSwitch<P> {
    /// Pick the initial theme: a stored preference if present and valid,
    /// otherwise whatever the sun says at `now`.
    pub fn new<Tz: TimeZone>(store: P, location: Location, now: &DateTime<Tz>) -> Self {
        let stored = store.get(THEME_STORAGE_KEY).and_then(|v| Theme::parse(&v));
        let (current, source) = match stored {
            Some(theme) => (theme, ThemeSource::Stored),
            None => (
                Theme::for_daylight(is_daytime(now, location)),
                ThemeSource::Solar,
            ),
        };
        debug!(theme = current.as_str(), ?source, "Initial theme");
        Self {
            store,
            current,
            source,
        }
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    pub fn source(&self) -> ThemeSource {
        self.source
    }

    /// Flip the theme and remember the choice for the rest of the session.
    pub fn toggle(&mut self) -> Wipe {
        self.current = self.current.toggled();
        self.source = ThemeSource::Stored;
        self.store.set(THEME_STORAGE_KEY, self.current.as_str());
        debug!(theme = self.current.as_str(), "Theme toggled");

        let direction = match self.current {
            Theme::Light => WipeDirection::ToDay,
            Theme::Dark => WipeDirection::ToNight,
        };
        Wipe {
            direction,
            clear_after: WIPE_DURATION + Duration::from_millis(50),
        }
    }

    pub fn store(&self) -> &P {
        &self.store
    }
}

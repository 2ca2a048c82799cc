use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of completed pomodoros that make up one cycle.
pub const POMODOROS_PER_CYCLE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Pomodoro, Mode::ShortBreak, Mode::LongBreak];

    /// Allowed duration range in minutes.
    pub fn duration_bounds(self) -> RangeInclusive<u32> {
        match self {
            Mode::Pomodoro | Mode::LongBreak => 1..=60,
            Mode::ShortBreak => 1..=30,
        }
    }

    pub fn default_minutes(self) -> u32 {
        match self {
            Mode::Pomodoro => 25,
            Mode::ShortBreak => 5,
            Mode::LongBreak => 15,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Pomodoro => "pomodoro",
            Mode::ShortBreak => "short_break",
            Mode::LongBreak => "long_break",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::Pomodoro => "Pomodoro",
            Mode::ShortBreak => "Short Break",
            Mode::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "pomodoro" | "work" | "focus" => Ok(Mode::Pomodoro),
            "short_break" | "shortbreak" | "short" => Ok(Mode::ShortBreak),
            "long_break" | "longbreak" | "long" => Ok(Mode::LongBreak),
            _ => Err(ValidationError::UnknownMode(s.to_string())),
        }
    }
}

/// Minutes configured for each mode.
///
/// Every field is always within [`Mode::duration_bounds`]; values only
/// change through [`DurationSettings::set`], which rejects anything else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationSettings {
    pomodoro: u32,
    short_break: u32,
    long_break: u32,
}

impl DurationSettings {
    /// Build settings from raw minutes, validating every mode.
    pub fn new(pomodoro: u32, short_break: u32, long_break: u32) -> Result<Self, ValidationError> {
        let mut settings = Self::default();
        settings.set(Mode::Pomodoro, pomodoro)?;
        settings.set(Mode::ShortBreak, short_break)?;
        settings.set(Mode::LongBreak, long_break)?;
        Ok(settings)
    }

    pub fn minutes(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Pomodoro => self.pomodoro,
            Mode::ShortBreak => self.short_break,
            Mode::LongBreak => self.long_break,
        }
    }

    /// Full countdown length for `mode` in seconds.
    pub fn seconds(&self, mode: Mode) -> u32 {
        self.minutes(mode).saturating_mul(60)
    }

    pub fn set(&mut self, mode: Mode, minutes: u32) -> Result<(), ValidationError> {
        validate_minutes(mode, minutes)?;
        match mode {
            Mode::Pomodoro => self.pomodoro = minutes,
            Mode::ShortBreak => self.short_break = minutes,
            Mode::LongBreak => self.long_break = minutes,
        }
        Ok(())
    }

    /// Check values that bypassed `set`, e.g. after deserialization.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for mode in Mode::ALL {
            validate_minutes(mode, self.minutes(mode))?;
        }
        Ok(())
    }
}

impl Default for DurationSettings {
    fn default() -> Self {
        Self {
            pomodoro: Mode::Pomodoro.default_minutes(),
            short_break: Mode::ShortBreak.default_minutes(),
            long_break: Mode::LongBreak.default_minutes(),
        }
    }
}

fn validate_minutes(mode: Mode, minutes: u32) -> Result<(), ValidationError> {
    let bounds = mode.duration_bounds();
    if bounds.contains(&minutes) {
        Ok(())
    } else {
        Err(ValidationError::InvalidDuration {
            mode,
            minutes,
            min: *bounds.start(),
            max: *bounds.end(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_technique() {
        let d = DurationSettings::default();
        assert_eq!(d.seconds(Mode::Pomodoro), 1500);
        assert_eq!(d.seconds(Mode::ShortBreak), 300);
        assert_eq!(d.seconds(Mode::LongBreak), 900);
    }

    #[test]
    fn short_break_upper_bound_is_30() {
        let mut d = DurationSettings::default();
        assert!(d.set(Mode::ShortBreak, 30).is_ok());
        assert_eq!(
            d.set(Mode::ShortBreak, 31),
            Err(ValidationError::InvalidDuration {
                mode: Mode::ShortBreak,
                minutes: 31,
                min: 1,
                max: 30
            })
        );
        assert_eq!(d.minutes(Mode::ShortBreak), 30);
    }

    #[test]
    fn zero_minutes_rejected_for_every_mode() {
        let mut d = DurationSettings::default();
        for mode in Mode::ALL {
            assert!(d.set(mode, 0).is_err());
        }
        assert_eq!(d, DurationSettings::default());
    }

    #[test]
    fn validate_catches_deserialized_garbage() {
        let d: DurationSettings =
            serde_json::from_str(r#"{"pomodoro":90,"short_break":5,"long_break":15}"#).unwrap();
        assert!(d.validate().is_err());
    }

    #[test]
    fn mode_parses_aliases() {
        assert_eq!("work".parse::<Mode>().unwrap(), Mode::Pomodoro);
        assert_eq!("short-break".parse::<Mode>().unwrap(), Mode::ShortBreak);
        assert_eq!("LONG".parse::<Mode>().unwrap(), Mode::LongBreak);
        assert!("nap".parse::<Mode>().is_err());
    }

    #[test]
    fn mode_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Mode::ShortBreak).unwrap(), "\"short_break\"");
    }
}

//! Check-in rule configuration.
//!
//! Two sections, morning and night, each holding one time window and two
//! interval rules:
//! - `good_morning_intime` / `good_night_intime`: allowed clock-hour range
//! - `multi_get_up`, `super_get_up`: morning anti-abuse thresholds
//! - `good_sleep`, `deep_sleep`: night anti-abuse thresholds
//!
//! Serialized to/from TOML as `config.toml` in the data directory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Allowed clock-hour range for a check-in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub enabled: bool,
    pub early_hour: u32,
    pub late_hour: u32,
}

/// A feature gated by an interval in hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalRule {
    pub enabled: bool,
    pub interval_hours: u32,
}

/// Rules applied to wake check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorningRules {
    #[serde(default = "default_good_morning_intime")]
    pub good_morning_intime: TimeWindow,
    /// When disabled, a second wake within `interval_hours` is refused.
    #[serde(default = "default_multi_get_up")]
    pub multi_get_up: IntervalRule,
    /// When disabled, waking after less than `interval_hours` of sleep is refused.
    #[serde(default = "default_super_get_up")]
    pub super_get_up: IntervalRule,
}

/// Rules applied to sleep check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightRules {
    /// `late_hour` is on the following day.
    #[serde(default = "default_good_night_intime")]
    pub good_night_intime: TimeWindow,
    /// When enabled, a second sleep within `interval_hours` is refused.
    #[serde(default = "default_good_sleep")]
    pub good_sleep: IntervalRule,
    /// When disabled, sleeping after less than `interval_hours` awake is refused.
    #[serde(default = "default_deep_sleep")]
    pub deep_sleep: IntervalRule,
}

/// Full rule configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RuleConfig {
    #[serde(default)]
    pub morning: MorningRules,
    #[serde(default)]
    pub night: NightRules,
}

// Default functions
fn default_good_morning_intime() -> TimeWindow {
    TimeWindow {
        enabled: true,
        early_hour: 6,
        late_hour: 12,
    }
}
fn default_multi_get_up() -> IntervalRule {
    IntervalRule {
        enabled: false,
        interval_hours: 6,
    }
}
fn default_super_get_up() -> IntervalRule {
    IntervalRule {
        enabled: false,
        interval_hours: 3,
    }
}
fn default_good_night_intime() -> TimeWindow {
    TimeWindow {
        enabled: true,
        early_hour: 21,
        late_hour: 3,
    }
}
fn default_good_sleep() -> IntervalRule {
    IntervalRule {
        enabled: true,
        interval_hours: 6,
    }
}
fn default_deep_sleep() -> IntervalRule {
    IntervalRule {
        enabled: false,
        interval_hours: 3,
    }
}

impl Default for MorningRules {
    fn default() -> Self {
        Self {
            good_morning_intime: default_good_morning_intime(),
            multi_get_up: default_multi_get_up(),
            super_get_up: default_super_get_up(),
        }
    }
}

impl Default for NightRules {
    fn default() -> Self {
        Self {
            good_night_intime: default_good_night_intime(),
            good_sleep: default_good_sleep(),
            deep_sleep: default_deep_sleep(),
        }
    }
}

/// A configurable feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    GoodMorningIntime,
    MultiGetUp,
    SuperGetUp,
    GoodNightIntime,
    GoodSleep,
    DeepSleep,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::GoodMorningIntime,
        Feature::MultiGetUp,
        Feature::SuperGetUp,
        Feature::GoodNightIntime,
        Feature::GoodSleep,
        Feature::DeepSleep,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Feature::GoodMorningIntime => "good_morning_intime",
            Feature::MultiGetUp => "multi_get_up",
            Feature::SuperGetUp => "super_get_up",
            Feature::GoodNightIntime => "good_night_intime",
            Feature::GoodSleep => "good_sleep",
            Feature::DeepSleep => "deep_sleep",
        }
    }

    /// Whether the feature is configured with an early/late hour pair.
    pub fn is_window(self) -> bool {
        matches!(self, Feature::GoodMorningIntime | Feature::GoodNightIntime)
    }

    pub fn is_morning(self) -> bool {
        matches!(
            self,
            Feature::GoodMorningIntime | Feature::MultiGetUp | Feature::SuperGetUp
        )
    }

    /// Enable state restored whenever the feature's boundary is set.
    pub fn default_enabled(self) -> bool {
        matches!(
            self,
            Feature::GoodMorningIntime | Feature::GoodNightIntime | Feature::GoodSleep
        )
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Feature {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Feature::ALL
            .into_iter()
            .find(|f| f.key() == normalized)
            .ok_or_else(|| ValidationError::UnknownFeature(s.to_string()))
    }
}

/// New boundary values for a feature, unvalidated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Window { early: i64, late: i64 },
    Interval(i64),
}

/// Outcome of a successful configuration change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigChange {
    pub feature: Feature,
    /// Set when the change flipped the feature's enable flag.
    pub forced_enabled: Option<bool>,
}

/// Check that an hour bound or interval lies in `0..=24`.
pub fn validate_hour(field: &'static str, value: i64) -> Result<u32, ValidationError> {
    if (0..=24).contains(&value) {
        Ok(value as u32)
    } else {
        Err(ValidationError::HourOutOfRange { field, value })
    }
}

impl RuleConfig {
    pub fn is_enabled(&self, feature: Feature) -> bool {
        match feature {
            Feature::GoodMorningIntime => self.morning.good_morning_intime.enabled,
            Feature::MultiGetUp => self.morning.multi_get_up.enabled,
            Feature::SuperGetUp => self.morning.super_get_up.enabled,
            Feature::GoodNightIntime => self.night.good_night_intime.enabled,
            Feature::GoodSleep => self.night.good_sleep.enabled,
            Feature::DeepSleep => self.night.deep_sleep.enabled,
        }
    }

    fn enabled_mut(&mut self, feature: Feature) -> &mut bool {
        match feature {
            Feature::GoodMorningIntime => &mut self.morning.good_morning_intime.enabled,
            Feature::MultiGetUp => &mut self.morning.multi_get_up.enabled,
            Feature::SuperGetUp => &mut self.morning.super_get_up.enabled,
            Feature::GoodNightIntime => &mut self.night.good_night_intime.enabled,
            Feature::GoodSleep => &mut self.night.good_sleep.enabled,
            Feature::DeepSleep => &mut self.night.deep_sleep.enabled,
        }
    }

    fn window_mut(&mut self, feature: Feature) -> Option<&mut TimeWindow> {
        match feature {
            Feature::GoodMorningIntime => Some(&mut self.morning.good_morning_intime),
            Feature::GoodNightIntime => Some(&mut self.night.good_night_intime),
            _ => None,
        }
    }

    fn interval_mut(&mut self, feature: Feature) -> Option<&mut IntervalRule> {
        match feature {
            Feature::MultiGetUp => Some(&mut self.morning.multi_get_up),
            Feature::SuperGetUp => Some(&mut self.morning.super_get_up),
            Feature::GoodSleep => Some(&mut self.night.good_sleep),
            Feature::DeepSleep => Some(&mut self.night.deep_sleep),
            _ => None,
        }
    }

    /// Enable or disable a feature.
    pub fn toggle(&mut self, feature: Feature, enabled: bool) {
        *self.enabled_mut(feature) = enabled;
    }

    /// Set a feature's boundary and restore its default enable state.
    ///
    /// Inputs are validated before anything is written; on error the config
    /// is left untouched.
    pub fn change(
        &mut self,
        feature: Feature,
        setting: Setting,
    ) -> Result<ConfigChange, ValidationError> {
        match (feature.is_window(), setting) {
            (true, Setting::Window { early, late }) => {
                let early = validate_hour("early_hour", early)?;
                let late = validate_hour("late_hour", late)?;
                if let Some(window) = self.window_mut(feature) {
                    window.early_hour = early;
                    window.late_hour = late;
                }
            }
            (false, Setting::Interval(hours)) => {
                let hours = validate_hour("interval_hours", hours)?;
                if let Some(rule) = self.interval_mut(feature) {
                    rule.interval_hours = hours;
                }
            }
            (true, Setting::Interval(_)) => {
                return Err(ValidationError::SettingMismatch {
                    feature: feature.key(),
                    expected: "an early and a late hour",
                })
            }
            (false, Setting::Window { .. }) => {
                return Err(ValidationError::SettingMismatch {
                    feature: feature.key(),
                    expected: "a single interval in hours",
                })
            }
        }

        let target = feature.default_enabled();
        let flag = self.enabled_mut(feature);
        let forced_enabled = if *flag != target {
            *flag = target;
            Some(target)
        } else {
            None
        };

        Ok(ConfigChange {
            feature,
            forced_enabled,
        })
    }
}

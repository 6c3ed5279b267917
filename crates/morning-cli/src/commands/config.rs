use clap::Subcommand;
use morning_core::{CoreError, Feature, Setting, ValidationError};

use super::{CommandResult, Service};
use crate::render;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current rules
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a feature's hours: two values (early late) for
    /// good_morning_intime / good_night_intime, one interval otherwise
    Set {
        /// Feature key (e.g. "good_sleep", "good_morning_intime")
        feature: Feature,
        /// Hour values, 0-24
        #[arg(required = true, num_args = 1..=2, allow_negative_numbers = true)]
        values: Vec<i64>,
    },
    /// Enable a feature
    Enable { feature: Feature },
    /// Disable a feature
    Disable { feature: Feature },
}

fn setting_from(feature: Feature, values: &[i64]) -> Result<Setting, ValidationError> {
    match (feature.is_window(), values) {
        (true, [early, late]) => Ok(Setting::Window {
            early: *early,
            late: *late,
        }),
        (_, [hours]) => Ok(Setting::Interval(*hours)),
        (true, _) => Err(ValidationError::SettingMismatch {
            feature: feature.key(),
            expected: "an early and a late hour",
        }),
        (false, _) => Err(ValidationError::SettingMismatch {
            feature: feature.key(),
            expected: "a single interval in hours",
        }),
    }
}

pub fn run(service: &mut Service, action: ConfigAction) -> CommandResult {
    match action {
        ConfigAction::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(service.config())?);
            } else {
                println!("{}", render::config_summary(service.config()));
            }
        }
        ConfigAction::Set { feature, values } => {
            let setting = setting_from(feature, &values)
                .map_err(|e| render::validation_reply(&e))?;
            match service.change_config(feature, setting) {
                Ok(change) => println!("{}", render::config_change_reply(&change)),
                Err(CoreError::Validation(e)) => return Err(render::validation_reply(&e).into()),
                Err(e) => return Err(e.into()),
            }
        }
        ConfigAction::Enable { feature } => {
            service.toggle_feature(feature, true)?;
            println!("配置更新成功！");
        }
        ConfigAction::Disable { feature } => {
            service.toggle_feature(feature, false)?;
            println!("配置更新成功！");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_features_take_two_values() {
        assert_eq!(
            setting_from(Feature::GoodNightIntime, &[21, 3]),
            Ok(Setting::Window { early: 21, late: 3 })
        );
        assert_eq!(setting_from(Feature::GoodSleep, &[5]), Ok(Setting::Interval(5)));
    }

    // A single value for a window feature is forwarded so the core can
    // report the missing late hour.
    #[test]
    fn single_value_for_window_is_left_to_validation() {
        assert_eq!(
            setting_from(Feature::GoodMorningIntime, &[7]),
            Ok(Setting::Interval(7))
        );
    }

    #[test]
    fn wrong_value_count_is_a_validation_error() {
        assert!(matches!(
            setting_from(Feature::DeepSleep, &[1, 2]),
            Err(ValidationError::SettingMismatch { feature: "deep_sleep", .. })
        ));
        assert!(matches!(
            setting_from(Feature::GoodSleep, &[]),
            Err(ValidationError::SettingMismatch { .. })
        ));
        assert!(matches!(
            setting_from(Feature::GoodNightIntime, &[]),
            Err(ValidationError::SettingMismatch { .. })
        ));
    }
}

//! Chat-style text replies.

use chrono::NaiveDateTime;
use morning_core::clock::TIMESTAMP_FORMAT;
use morning_core::{
    CheckinKind, ConfigChange, Decision, Elapsed, GroupSummary, Rejection, RuleConfig,
    SleepOutcome, UserSummary, ValidationError, WakeOutcome,
};

pub fn wake_reply(decision: &Decision<WakeOutcome>, title: &str) -> String {
    match decision {
        Decision::Accept(outcome) => match outcome.slept {
            Elapsed::Span(span) => format!(
                "早安成功！你的睡眠时长为{span}，\n你是今天第{}个起床的{title}！",
                outcome.daily_rank
            ),
            Elapsed::MultiDay => {
                format!("早安成功！你是今天第{}个起床的{title}！", outcome.daily_rank)
            }
        },
        Decision::Reject(rejection) => rejection_reply(rejection),
    }
}

pub fn sleep_reply(decision: &Decision<SleepOutcome>, title: &str) -> String {
    match decision {
        Decision::Accept(outcome) => match outcome.awake {
            Some(Elapsed::Span(span)) => format!(
                "晚安成功！你今天的清醒时长为{span}，\n你是今天第{}个睡觉的{title}！",
                outcome.daily_rank
            ),
            _ => format!("晚安成功！你是今天第{}个睡觉的{title}！", outcome.daily_rank),
        },
        Decision::Reject(rejection) => rejection_reply(rejection),
    }
}

pub fn rejection_reply(rejection: &Rejection) -> String {
    match rejection {
        Rejection::OutsideTimeWindow {
            check_in: CheckinKind::Wake,
            early_hour,
            late_hour,
            ..
        } => format!("现在不能早安哦，可以早安的时间为{early_hour}时到{late_hour}时~"),
        Rejection::OutsideTimeWindow {
            check_in: CheckinKind::Sleep,
            early_hour,
            late_hour,
            ..
        } => format!("现在不能晚安哦，可以晚安的时间为{early_hour}时到第二天早上{late_hour}时~"),
        Rejection::NotAsleep { .. } => "你还没睡过觉呢！不能早安哦~".to_string(),
        Rejection::TooSoonAfterLastWake { interval_hours, .. } => {
            format!("{interval_hours}小时内你已经早安过了哦~")
        }
        Rejection::SleepTooShort { .. } => "你可猝死算了吧？现在不能早安哦~".to_string(),
        Rejection::TooSoonAfterLastSleep { interval_hours, .. } => {
            format!("{interval_hours}小时内你已经晚安过了哦~")
        }
        Rejection::AwakeTooShort { .. } => "睡这么久还不够？现在不能晚安哦~".to_string(),
    }
}

fn yes_no(enabled: bool) -> &'static str {
    if enabled {
        "是"
    } else {
        "否"
    }
}

pub fn config_summary(config: &RuleConfig) -> String {
    let m = &config.morning;
    let n = &config.night;
    let mut lines = vec!["早安晚安设置如下：".to_string()];

    lines.push(format!(
        "是否要求规定时间内起床：{}",
        yes_no(m.good_morning_intime.enabled)
    ));
    if m.good_morning_intime.enabled {
        lines.push(format!(" - 最早允许起床时间：{}点", m.good_morning_intime.early_hour));
        lines.push(format!(" - 最晚允许起床时间：{}点", m.good_morning_intime.late_hour));
    }

    lines.push(format!("是否允许连续多次起床：{}", yes_no(m.multi_get_up.enabled)));
    if !m.multi_get_up.enabled {
        lines.push(format!(" - 允许的最短起床间隔：{}小时", m.multi_get_up.interval_hours));
    }

    lines.push(format!(
        "是否允许超级亢奋(即睡眠时长很短)：{}",
        yes_no(m.super_get_up.enabled)
    ));
    if !m.super_get_up.enabled {
        lines.push(format!(" - 允许的最短睡觉时长：{}小时", m.super_get_up.interval_hours));
    }

    lines.push(format!(
        "是否要求规定时间内睡觉：{}",
        yes_no(n.good_night_intime.enabled)
    ));
    if n.good_night_intime.enabled {
        lines.push(format!(" - 最早允许睡觉时间：{}点", n.good_night_intime.early_hour));
        lines.push(format!(
            " - 最晚允许睡觉时间：第二天早上{}点",
            n.good_night_intime.late_hour
        ));
    }

    lines.push(format!("是否开启优质睡眠：{}", yes_no(n.good_sleep.enabled)));
    if !n.good_sleep.enabled {
        lines.push(format!(" - 允许的最短优质睡眠：{}小时", n.good_sleep.interval_hours));
    }

    lines.push(format!(
        "是否允许深度睡眠(即清醒时长很短)：{}",
        yes_no(n.deep_sleep.enabled)
    ));
    if !n.deep_sleep.enabled {
        lines.push(format!(" - 允许的最短清醒时长：{}小时", n.deep_sleep.interval_hours));
    }

    lines.join("\n")
}

pub fn config_change_reply(change: &ConfigChange) -> String {
    match change.forced_enabled {
        Some(true) => "配置更新成功！且此项设置已启用！".to_string(),
        Some(false) => "配置更新成功！且此项设置已禁用！".to_string(),
        None => "配置更新成功！".to_string(),
    }
}

pub fn validation_reply(err: &ValidationError) -> String {
    match err {
        ValidationError::HourOutOfRange {
            field: "interval_hours",
            ..
        } => "错误！您设置的时间间隔未在0-24之间，要求：0 <= 时间 <= 24".to_string(),
        ValidationError::HourOutOfRange { .. } => {
            "错误！您设置的时间未在0-24之间，要求：0 <= 时间 <= 24".to_string()
        }
        ValidationError::SettingMismatch { .. } => "配置更新失败：缺少参数！".to_string(),
        ValidationError::UnknownFeature(name) => format!("配置更新失败：没有名为{name}的设置！"),
    }
}

fn timestamp(t: Option<NaiveDateTime>) -> String {
    t.map_or_else(|| "无".to_string(), |t| t.format(TIMESTAMP_FORMAT).to_string())
}

pub fn user_routine(summary: Option<&UserSummary>) -> String {
    let Some(summary) = summary else {
        return "你还没有早安晚安过呢！暂无数据~".to_string();
    };
    [
        "你的作息数据如下：".to_string(),
        format!("最近一次早安时间为{}", timestamp(summary.last_wake)),
        format!("最近一次晚安时间为{}", timestamp(summary.last_sleep)),
        format!("一共早安了{}次", summary.wake_count),
        format!("一共晚安了{}次", summary.sleep_count),
    ]
    .join("\n")
}

pub fn group_routine(summary: &GroupSummary) -> String {
    let mut msg = format!(
        "今天已经有{}位群友早安了，{}位群友晚安了~",
        summary.wake_today, summary.sleep_today
    );
    if let Some(king) = &summary.sleeping_king {
        msg.push_str(&format!(
            "\n本周睡得最少的是{}，只睡了{}",
            king.user_id, king.slept
        ));
    }
    msg
}

#[cfg(test)]
mod tests {
    use super::*;
    use morning_core::clock::parse_timestamp;
    use morning_core::{ClockSpan, Feature, SleepingKing};

    fn at(s: &str) -> NaiveDateTime {
        parse_timestamp(s).unwrap()
    }

    fn wake(slept: Elapsed) -> Decision<WakeOutcome> {
        Decision::Accept(WakeOutcome {
            woke_at: at("2024-01-02 07:00:00"),
            wake_count: 1,
            weekly_wake_count: 1,
            earliest_wake: at("2024-01-02 07:00:00"),
            slept,
            daily_rank: 3,
        })
    }

    #[test]
    fn wake_reply_includes_duration_and_rank() {
        let span = ClockSpan {
            hours: 4,
            minutes: 0,
            seconds: 0,
        };
        assert_eq!(
            wake_reply(&wake(Elapsed::Span(span)), "群友"),
            "早安成功！你的睡眠时长为4时0分0秒，\n你是今天第3个起床的群友！"
        );
        assert_eq!(
            wake_reply(&wake(Elapsed::MultiDay), "群友"),
            "早安成功！你是今天第3个起床的群友！"
        );
    }

    #[test]
    fn sleep_rejections_render_chat_wording() {
        let d: Decision<SleepOutcome> = Decision::Reject(Rejection::OutsideTimeWindow {
            check_in: CheckinKind::Sleep,
            early_hour: 21,
            late_hour: 3,
            hour: 15,
        });
        assert_eq!(
            sleep_reply(&d, "群友"),
            "现在不能晚安哦，可以晚安的时间为21时到第二天早上3时~"
        );
        let d: Decision<SleepOutcome> = Decision::Reject(Rejection::TooSoonAfterLastSleep {
            interval_hours: 6,
            elapsed_secs: 60,
        });
        assert_eq!(sleep_reply(&d, "群友"), "6小时内你已经晚安过了哦~");
    }

    #[test]
    fn config_summary_lists_thresholds_of_disabled_guards() {
        let mut config = RuleConfig::default();
        let text = config_summary(&config);
        assert!(text.starts_with("早安晚安设置如下："));
        assert!(text.contains(" - 允许的最短起床间隔：6小时"));
        assert!(text.contains(" - 最晚允许睡觉时间：第二天早上3点"));

        config.toggle(Feature::MultiGetUp, true);
        assert!(!config_summary(&config).contains("允许的最短起床间隔"));
    }

    #[test]
    fn good_sleep_interval_listed_only_when_disabled() {
        let mut config = RuleConfig::default();
        let text = config_summary(&config);
        assert!(text.contains("是否开启优质睡眠：是"));
        assert!(!text.contains("允许的最短优质睡眠"));

        config.toggle(Feature::GoodSleep, false);
        let text = config_summary(&config);
        assert!(text.contains("是否开启优质睡眠：否\n - 允许的最短优质睡眠：6小时"));
    }

    #[test]
    fn validation_reply_distinguishes_interval() {
        let err = ValidationError::HourOutOfRange {
            field: "interval_hours",
            value: 30,
        };
        assert!(validation_reply(&err).contains("时间间隔"));
        let err = ValidationError::HourOutOfRange {
            field: "early_hour",
            value: -1,
        };
        assert!(!validation_reply(&err).contains("时间间隔"));
    }

    #[test]
    fn routines() {
        assert_eq!(user_routine(None), "你还没有早安晚安过呢！暂无数据~");
        let summary = GroupSummary {
            wake_today: 2,
            sleep_today: 5,
            sleeping_king: Some(SleepingKing {
                user_id: "alice".into(),
                slept: ClockSpan {
                    hours: 3,
                    minutes: 10,
                    seconds: 0,
                },
            }),
            members: 5,
        };
        assert_eq!(
            group_routine(&summary),
            "今天已经有2位群友早安了，5位群友晚安了~\n本周睡得最少的是alice，只睡了3时10分0秒"
        );
    }
}

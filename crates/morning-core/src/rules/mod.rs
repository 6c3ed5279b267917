//! Check-in rule evaluation.
//!
//! - [`RuleEngine`]: decides whether a wake or sleep check-in is accepted
//! - [`window`]: clock-hour windows and elapsed-time arithmetic

mod engine;
pub mod window;

pub use engine::{
    CheckinKind, Decision, Rejection, RuleEngine, SleepDecision, SleepOutcome, WakeDecision,
    WakeOutcome,
};
pub use window::{ClockSpan, Elapsed};

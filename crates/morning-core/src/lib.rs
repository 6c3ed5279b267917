//! # Morning Core Library
//!
//! Core logic for a "good morning / good night" check-in tracker used by chat
//! groups. Members report waking up and going to sleep; each report is checked
//! against a configurable rule set and, when accepted, recorded with per-user
//! and per-group statistics.
//!
//! ## Architecture
//!
//! - **Rule Engine**: pure evaluation of a check-in against the rule config,
//!   returning an accept/reject decision
//! - **Record Store**: per-group, per-user records and daily group counters,
//!   mutated only by applying accepted decisions
//! - **Storage**: JSON records and TOML rule configuration behind a
//!   [`Persistence`] trait
//! - **Service**: evaluate-then-commit facade over the pieces above
//!
//! ## Key Components
//!
//! - [`RuleEngine`]: wake/sleep rule evaluation
//! - [`RecordStore`]: check-in state
//! - [`RuleConfig`]: rule configuration
//! - [`MorningService`]: entry point for callers

pub mod clock;
pub mod error;
pub mod records;
pub mod rules;
pub mod service;
pub mod storage;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{CoreError, Result, StorageError, ValidationError};
pub use records::{
    GroupDailyCounters, GroupData, GroupSummary, RecordStore, SleepingKing, UserRecord,
    UserSummary, WeeklyStats,
};
pub use rules::{
    CheckinKind, ClockSpan, Decision, Elapsed, Rejection, RuleEngine, SleepDecision, SleepOutcome,
    WakeDecision, WakeOutcome,
};
pub use service::MorningService;
pub use storage::{
    ConfigChange, Feature, FileStore, MemoryStore, Persistence, RuleConfig, Setting, TimeWindow,
};

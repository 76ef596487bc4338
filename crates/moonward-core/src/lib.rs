// moonward-core: Device state synchronization and mutation engine.
//
// Single-task cooperative concurrency: suspension points are network
// calls and awaited observers. Nothing here locks; a Device is meant to
// be driven from one task at a time.

pub mod account;
pub mod convert;
pub mod device;
pub mod error;
pub mod model;
pub mod observer;

// ── Primary re-exports ──────────────────────────────────────────────
pub use account::Account;
pub use device::{DAILY_PLAYTIME_MAX, DAILY_PLAYTIME_UNLIMITED, Device};
pub use error::CoreError;
pub use observer::UpdateObserver;

// Re-export model types at the crate root for ergonomics.
pub use model::{
    AlarmSettingState, Application, BedtimeSchedule, DayOfWeek, DayRegulation,
    FunctionalRestrictionLevel, Player, RestrictionMode, SafeLaunchSetting, TimerMode,
};

// The transport crate, for consumers that need the auth seam or raw
// wire types.
pub use moonward_api as api;

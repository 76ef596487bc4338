// ── Domain model ──

pub mod application;
pub mod enums;
pub mod player;
pub mod regulation;

pub use application::Application;
pub use enums::{
    AlarmSettingState, DayOfWeek, FunctionalRestrictionLevel, RestrictionMode, SafeLaunchSetting,
    TimerMode,
};
pub use player::Player;
pub use regulation::{BedtimeSchedule, DayRegulation};

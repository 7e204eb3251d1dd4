//! Typed domain records read and written by the service layer.

pub mod booking;
pub mod business;
pub mod interval;
pub mod macros;
pub mod schedule;
pub mod service;
pub mod settings;

pub use booking::{Booking, BookingStatus};
pub use business::Business;
pub use interval::{intervals_overlap, TimeRange};
pub use schedule::{BlockCategory, ScheduleBlock, WeeklySchedule};
pub use service::Service;
pub use settings::{PlatformSetting, SettingDataType, SettingDecodeError, SettingValue};

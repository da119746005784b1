pub mod config;
pub mod data;
pub mod error;
pub mod label;
pub mod serialize;
pub mod timetable;

pub use config::LoadOptions;
pub use data::{Event, Lecturer, Room, Subject, TimeTableData};
pub use error::{Result, TimeTableError};
pub use timetable::{EventAssignment, TimeSlot, TimeTable, Week, WeeklyAssignment};

use std::{collections::HashMap, fmt, sync::Arc};

use crate::data::{Event, Room, TimeTableData};
use crate::error::{Result, TimeTableError};

/// A weekly recurring period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeSlot {
    pub day: u32,
    pub slot: u32,
}

impl TimeSlot {
    pub fn new(day: u32, slot: u32) -> TimeSlot {
        TimeSlot { day, slot }
    }
}

/// Week of the biweekly cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Week {
    First = 1,
    Second = 2,
}

impl Week {
    pub fn number(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Week {
    type Error = TimeTableError;

    fn try_from(week: u8) -> Result<Week> {
        match week {
            1 => Ok(Week::First),
            2 => Ok(Week::Second),
            _ => Err(TimeTableError::InvalidArgument(format!(
                "week must be 1 or 2, got {week}"
            ))),
        }
    }
}

impl fmt::Display for Week {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Where one event sits in one week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyAssignment {
    event: Event,
    room: Option<Room>,
    time_slot: TimeSlot,
    week: Week,
    // maintained by conflict detection outside this crate
    conflicts: u32,
}

impl WeeklyAssignment {
    pub fn new(event: Event, room: Option<Room>, time_slot: TimeSlot, week: Week) -> Self {
        WeeklyAssignment {
            event,
            room,
            time_slot,
            week,
            conflicts: 0,
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn room(&self) -> Option<&Room> {
        self.room.as_ref()
    }

    /// Room id, or `Room::UNASSIGNED_ID` when no room is set.
    pub fn room_id(&self) -> i32 {
        self.room.as_ref().map_or(Room::UNASSIGNED_ID, |r| r.id)
    }

    pub fn time_slot(&self) -> TimeSlot {
        self.time_slot
    }

    pub fn week(&self) -> Week {
        self.week
    }

    pub fn conflicts(&self) -> u32 {
        self.conflicts
    }

    pub fn set_conflicts(&mut self, conflicts: u32) {
        self.conflicts = conflicts;
    }
}

/// Both weeks of the cycle for a single event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAssignment {
    event: Event,
    first_week: Option<WeeklyAssignment>,
    second_week: Option<WeeklyAssignment>,
}

impl EventAssignment {
    pub fn new(event: Event) -> EventAssignment {
        EventAssignment {
            event,
            first_week: None,
            second_week: None,
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn first_week(&self) -> Option<&WeeklyAssignment> {
        self.first_week.as_ref()
    }

    pub fn second_week(&self) -> Option<&WeeklyAssignment> {
        self.second_week.as_ref()
    }

    pub fn week(&self, week: Week) -> Option<&WeeklyAssignment> {
        match week {
            Week::First => self.first_week(),
            Week::Second => self.second_week(),
        }
    }

    pub fn week_mut(&mut self, week: Week) -> Option<&mut WeeklyAssignment> {
        match week {
            Week::First => self.first_week.as_mut(),
            Week::Second => self.second_week.as_mut(),
        }
    }

    pub fn is_unassigned(&self) -> bool {
        self.first_week.is_none() && self.second_week.is_none()
    }

    fn set(&mut self, assignment: WeeklyAssignment) {
        match assignment.week {
            Week::First => self.first_week = Some(assignment),
            Week::Second => self.second_week = Some(assignment),
        }
    }
}

/// Event assignments over one reference dataset.
///
/// Entries are keyed by event id. The dataset is fixed at construction, so
/// a timetable is only meaningful together with the dataset it was built
/// or loaded against.
#[derive(Debug, Clone)]
pub struct TimeTable {
    data: Arc<TimeTableData>,
    name: String,
    // event id -> assignment
    assignments: HashMap<i32, EventAssignment>,
}

impl TimeTable {
    pub fn new(data: Arc<TimeTableData>, name: impl Into<String>) -> TimeTable {
        TimeTable {
            data,
            name: name.into(),
            assignments: HashMap::new(),
        }
    }

    pub fn data(&self) -> &Arc<TimeTableData> {
        &self.data
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Sets the slot for `assignment.week()`, replacing whatever was there.
    ///
    /// The entry for the event is created on first use. The other week is
    /// left untouched.
    pub fn add_assignment(&mut self, assignment: WeeklyAssignment) {
        let event = assignment.event;
        self.assignments
            .entry(event.id)
            .or_insert_with(|| EventAssignment::new(event))
            .set(assignment);
    }

    /// Registers `event` with both weeks unassigned, keeping any existing entry.
    pub fn insert_event(&mut self, event: Event) -> &mut EventAssignment {
        self.assignments
            .entry(event.id)
            .or_insert_with(|| EventAssignment::new(event))
    }

    /// Drops both weeks for `event`. Returns whether an entry existed.
    pub fn remove_assignment(&mut self, event: &Event) -> bool {
        self.assignments.remove(&event.id).is_some()
    }

    pub fn get_assignment(&self, event: &Event) -> Option<&EventAssignment> {
        self.assignments.get(&event.id)
    }

    pub fn get_assignment_mut(&mut self, event: &Event) -> Option<&mut EventAssignment> {
        self.assignments.get_mut(&event.id)
    }

    /// All entries, in no particular order.
    pub fn assignments(&self) -> impl Iterator<Item = &EventAssignment> + '_ {
        self.assignments.values()
    }

    /// One element per entry, in the same order as `assignments()`.
    pub fn week_assignments(&self, week: Week) -> Vec<Option<&WeeklyAssignment>> {
        self.assignments().map(|a| a.week(week)).collect()
    }

    /// Like `week_assignments`, for a raw week number.
    pub fn weekly_assignments(&self, week: u8) -> Result<Vec<Option<&WeeklyAssignment>>> {
        let week = Week::try_from(week)?;
        Ok(self.week_assignments(week))
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

use polars::prelude::*;
use std::{fmt, path::Path};

use crate::error::{Result, TimeTableError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Event {
    pub id: i32,
    pub subject_id: i32,
    pub lecturer_id: i32,
}

impl Event {
    pub fn new(id: i32, subject_id: i32, lecturer_id: i32) -> Event {
        Event {
            id,
            subject_id,
            lecturer_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Room {
    pub id: i32,
    pub name: String,
}

impl Room {
    /// Id written to files for an assignment without a room
    pub const UNASSIGNED_ID: i32 = -1;

    pub fn new(id: i32, name: impl Into<String>) -> Room {
        Room {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub id: i32,
    pub name: String,
}

impl Subject {
    pub fn new(id: i32, name: impl Into<String>) -> Subject {
        Subject {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lecturer {
    pub id: i32,
    pub name: String,
}

impl Lecturer {
    pub fn new(id: i32, name: impl Into<String>) -> Lecturer {
        Lecturer {
            id,
            name: name.into(),
        }
    }
}

impl fmt::Display for Lecturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// The reference dataset a timetable is defined over.
///
/// Ids are expected to be unique within each collection. Nothing in this
/// crate mutates a dataset once built; timetables share it through an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct TimeTableData {
    pub id: String,
    pub events: Vec<Event>,
    pub rooms: Vec<Room>,
    pub subjects: Vec<Subject>,
    pub lecturers: Vec<Lecturer>,
}

impl TimeTableData {
    pub fn new(
        id: impl Into<String>,
        events: Vec<Event>,
        rooms: Vec<Room>,
        subjects: Vec<Subject>,
        lecturers: Vec<Lecturer>,
    ) -> TimeTableData {
        TimeTableData {
            id: id.into(),
            events,
            rooms,
            subjects,
            lecturers,
        }
    }

    pub fn event(&self, id: i32) -> Option<&Event> {
        self.events.iter().find(|e| e.id == id)
    }

    pub fn room(&self, id: i32) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn subject(&self, id: i32) -> Option<&Subject> {
        self.subjects.iter().find(|s| s.id == id)
    }

    pub fn lecturer(&self, id: i32) -> Option<&Lecturer> {
        self.lecturers.iter().find(|l| l.id == id)
    }

    /// Loads a dataset from `events.csv`, `rooms.csv`, `subjects.csv` and
    /// `lecturers.csv` inside `dir`.
    ///
    /// Expected headers: `id,subject_id,lecturer_id` for events and `id,name`
    /// for the other three tables.
    pub fn load_csv_dir(id: impl Into<String>, dir: &Path) -> Result<TimeTableData> {
        let events = read_table(&dir.join("events.csv"))?;
        let rooms = read_table(&dir.join("rooms.csv"))?;
        let subjects = read_table(&dir.join("subjects.csv"))?;
        let lecturers = read_table(&dir.join("lecturers.csv"))?;

        let data = TimeTableData::from_frames(id, &events, &rooms, &subjects, &lecturers)?;
        log::debug!(
            "loaded dataset {:?} from {}: {} events, {} rooms",
            data.id,
            dir.display(),
            data.events.len(),
            data.rooms.len()
        );
        Ok(data)
    }

    pub fn from_frames(
        id: impl Into<String>,
        events: &DataFrame,
        rooms: &DataFrame,
        subjects: &DataFrame,
        lecturers: &DataFrame,
    ) -> Result<TimeTableData> {
        let events = events
            .select(["id", "subject_id", "lecturer_id"])?
            .lazy()
            .with_columns([
                col("id").cast(DataType::Int32),
                col("subject_id").cast(DataType::Int32),
                col("lecturer_id").cast(DataType::Int32),
            ])
            .collect()?;

        let mut event_list = Vec::with_capacity(events.height());
        for i in 0..events.height() {
            let row = row_at(&events, i)?;
            event_list.push(Event::new(
                row[0].try_extract::<i32>()?,
                row[1].try_extract::<i32>()?,
                row[2].try_extract::<i32>()?,
            ));
        }

        let rooms = named_rows(rooms)?
            .into_iter()
            .map(|(id, name)| Room::new(id, name))
            .collect();
        let subjects = named_rows(subjects)?
            .into_iter()
            .map(|(id, name)| Subject::new(id, name))
            .collect();
        let lecturers = named_rows(lecturers)?
            .into_iter()
            .map(|(id, name)| Lecturer::new(id, name))
            .collect();

        Ok(TimeTableData::new(id, event_list, rooms, subjects, lecturers))
    }
}

fn read_table(path: &Path) -> Result<DataFrame> {
    let df = LazyCsvReader::new(path)
        .has_header(true)
        .finish()?
        .collect()?;

    Ok(df)
}

fn row_at(df: &DataFrame, i: usize) -> Result<Vec<AnyValue<'_>>> {
    df.get(i)
        .ok_or_else(|| TimeTableError::Catalog(format!("row {i} out of bounds")))
}

// (id, name) pairs from a two column catalog table
fn named_rows(df: &DataFrame) -> Result<Vec<(i32, String)>> {
    // names like "101" are read as integers
    let df = df
        .select(["id", "name"])?
        .lazy()
        .with_columns([
            col("id").cast(DataType::Int32),
            col("name").cast(DataType::String),
        ])
        .collect()?;

    let mut rows = Vec::with_capacity(df.height());
    for i in 0..df.height() {
        let row = row_at(&df, i)?;
        let id = row[0].try_extract::<i32>()?;
        let name = row[1]
            .get_str()
            .ok_or_else(|| TimeTableError::Catalog(format!("row {i}: missing name")))?;
        rows.push((id, name.to_string()));
    }
    Ok(rows)
}

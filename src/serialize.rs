//! XML persistence for [`TimeTable`].
//!
//! ```xml
//! <TimeTable time_table_id="fall-2024" name="draft">
//!   <Event id="1">
//!     <FirstWeek room="2" day="0" slot="1"/>
//!     <SecondWeek room="-1" day="3" slot="2"/>
//!   </Event>
//! </TimeTable>
//! ```
//!
//! Both week elements are optional. A `room` of `-1` (or no `room` at all)
//! means the assignment has no room.

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, io::Write, path::Path, sync::Arc};
use tempfile::NamedTempFile;

use crate::config::LoadOptions;
use crate::data::{Event, Room, TimeTableData};
use crate::error::{Result, TimeTableError};
use crate::timetable::{EventAssignment, TimeSlot, TimeTable, Week, WeeklyAssignment};

const XML_DECLARATION: &str = "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n";
const ROOT_TAG: &str = "TimeTable";

#[derive(Debug, Serialize)]
#[serde(rename = "TimeTable")]
struct TimeTableRecord {
    #[serde(rename = "@time_table_id")]
    time_table_id: String,
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "Event")]
    events: Vec<EventRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EventRecord {
    #[serde(rename = "@id")]
    id: i32,
    #[serde(rename = "FirstWeek", default, skip_serializing_if = "Option::is_none")]
    first_week: Option<WeekRecord>,
    #[serde(rename = "SecondWeek", default, skip_serializing_if = "Option::is_none")]
    second_week: Option<WeekRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WeekRecord {
    #[serde(rename = "@room", default = "unassigned_room")]
    room: i32,
    #[serde(rename = "@day")]
    day: u32,
    #[serde(rename = "@slot")]
    slot: u32,
}

// Event children of the root; the root attributes are read by `read_header`.
#[derive(Debug, Deserialize)]
struct TimeTableBody {
    #[serde(rename = "Event", default)]
    events: Vec<EventRecord>,
}

#[derive(Debug, PartialEq, Eq)]
struct Header {
    time_table_id: String,
    name: String,
}

fn unassigned_room() -> i32 {
    Room::UNASSIGNED_ID
}

/// Reads the attributes of the root element, skipping the prolog.
fn read_header(xml: &str) -> Result<Header> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            XmlEvent::Start(root) | XmlEvent::Empty(root) => return header_from(&root),
            XmlEvent::Decl(_)
            | XmlEvent::Comment(_)
            | XmlEvent::PI(_)
            | XmlEvent::DocType(_)
            | XmlEvent::Text(_) => continue,
            XmlEvent::Eof => {
                return Err(TimeTableError::MalformedFile("no root element".to_string()))
            }
            other => {
                return Err(TimeTableError::MalformedFile(format!(
                    "unexpected {other:?} before root element"
                )))
            }
        }
    }
}

fn header_from(root: &BytesStart<'_>) -> Result<Header> {
    let tag = String::from_utf8_lossy(root.name().as_ref()).into_owned();
    if tag != ROOT_TAG {
        return Err(TimeTableError::MalformedFile(format!(
            "expected root element <{ROOT_TAG}>, found <{tag}>"
        )));
    }

    Ok(Header {
        time_table_id: required_attribute(root, "time_table_id")?,
        name: required_attribute(root, "name")?,
    })
}

fn required_attribute(element: &BytesStart<'_>, key: &str) -> Result<String> {
    match element.try_get_attribute(key)? {
        Some(attribute) => Ok(attribute.unescape_value()?.into_owned()),
        None => Err(TimeTableError::MalformedFile(format!(
            "missing attribute {key:?} on <{ROOT_TAG}>"
        ))),
    }
}

/// Writes through a temporary file in the destination directory which then
/// replaces `path`. Nothing is written to `path` if `write` fails.
fn write_atomically<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut NamedTempFile) -> Result<()>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(dir)?;
    write(&mut file)?;
    file.as_file().sync_all()?;
    file.persist(path)?;
    Ok(())
}

impl From<&WeeklyAssignment> for WeekRecord {
    fn from(assignment: &WeeklyAssignment) -> Self {
        let time_slot = assignment.time_slot();
        WeekRecord {
            room: assignment.room_id(),
            day: time_slot.day,
            slot: time_slot.slot,
        }
    }
}

impl From<&EventAssignment> for EventRecord {
    fn from(assignment: &EventAssignment) -> Self {
        EventRecord {
            id: assignment.event().id,
            first_week: assignment.first_week().map(WeekRecord::from),
            second_week: assignment.second_week().map(WeekRecord::from),
        }
    }
}

impl From<&TimeTable> for TimeTableRecord {
    fn from(table: &TimeTable) -> Self {
        TimeTableRecord {
            time_table_id: table.data().id.clone(),
            name: table.name().to_string(),
            events: table.assignments().map(EventRecord::from).collect(),
        }
    }
}

impl TimeTable {
    /// Loads a timetable saved for `data`, resolving unknown ids leniently.
    pub fn load_from_xml(data: Arc<TimeTableData>, path: impl AsRef<Path>) -> Result<TimeTable> {
        TimeTable::load_from_xml_with(data, path, &LoadOptions::default())
    }

    pub fn load_from_xml_with(
        data: Arc<TimeTableData>,
        path: impl AsRef<Path>,
        options: &LoadOptions,
    ) -> Result<TimeTable> {
        let path = path.as_ref();
        let xml = fs::read_to_string(path)?;
        let table = TimeTable::from_xml_str(data, &xml, options)?;
        log::debug!(
            "loaded time table {:?} from {} ({} events)",
            table.name(),
            path.display(),
            table.len()
        );
        Ok(table)
    }

    /// Parses a timetable document against `data`.
    ///
    /// The root element and its attributes are checked first, so a document
    /// saved for another dataset fails with `IdMismatch` even if its event
    /// records are broken. Anything unparsable fails with `MalformedFile`.
    /// Nothing is returned on failure.
    pub fn from_xml_str(
        data: Arc<TimeTableData>,
        xml: &str,
        options: &LoadOptions,
    ) -> Result<TimeTable> {
        let header = read_header(xml)?;
        if header.time_table_id != data.id {
            return Err(TimeTableError::IdMismatch {
                expected: data.id.clone(),
                found: header.time_table_id,
            });
        }

        let body: TimeTableBody = quick_xml::de::from_str(xml)?;
        let mut table = TimeTable::new(data.clone(), header.name);
        let mut seen = HashSet::new();

        for event_record in body.events {
            if !seen.insert(event_record.id) {
                return Err(TimeTableError::MalformedFile(format!(
                    "duplicate event id {}",
                    event_record.id
                )));
            }

            let Some(event) = data.event(event_record.id).copied() else {
                if options.strict {
                    return Err(TimeTableError::UnknownEvent(event_record.id));
                }
                log::warn!(
                    "dropping event {} not present in dataset {:?}",
                    event_record.id,
                    data.id
                );
                continue;
            };

            table.insert_event(event);
            let weeks = [
                (Week::First, event_record.first_week),
                (Week::Second, event_record.second_week),
            ];
            for (week, week_record) in weeks {
                if let Some(week_record) = week_record {
                    let assignment =
                        parse_weekly_assignment(&data, event, week, &week_record, options)?;
                    table.add_assignment(assignment);
                }
            }
        }

        Ok(table)
    }

    /// Renders the timetable as an XML document.
    pub fn to_xml_string(&self) -> Result<String> {
        let record = TimeTableRecord::from(self);

        let mut buffer = String::from(XML_DECLARATION);
        let mut ser = quick_xml::se::Serializer::new(&mut buffer);
        ser.indent(' ', 2);
        record.serialize(ser)?;
        buffer.push('\n');

        Ok(buffer)
    }

    /// Writes the timetable to `path`.
    ///
    /// The document goes to a temporary file next to `path` which then
    /// replaces the destination, so a failed save leaves the old file intact.
    pub fn save_to_xml(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let xml = self.to_xml_string()?;

        write_atomically(path, |file| Ok(file.write_all(xml.as_bytes())?))?;

        log::debug!(
            "saved time table {:?} to {} ({} events)",
            self.name(),
            path.display(),
            self.len()
        );
        Ok(())
    }
}

fn parse_weekly_assignment(
    data: &TimeTableData,
    event: Event,
    week: Week,
    record: &WeekRecord,
    options: &LoadOptions,
) -> Result<WeeklyAssignment> {
    let room = if record.room == Room::UNASSIGNED_ID {
        None
    } else {
        match data.room(record.room) {
            Some(room) => Some(room.clone()),
            None if options.strict => return Err(TimeTableError::UnknownRoom(record.room)),
            None => {
                log::warn!(
                    "event {} week {}: room {} not in dataset, leaving unassigned",
                    event.id,
                    week,
                    record.room
                );
                None
            }
        }
    };

    Ok(WeeklyAssignment::new(
        event,
        room,
        TimeSlot::new(record.day, record.slot),
        week,
    ))
}

use crate::data::TimeTableData;
use crate::error::{Result, TimeTableError};
use crate::timetable::WeeklyAssignment;

/// Subjects shown by name alone (military and physical training).
pub const NAME_ONLY_SUBJECTS: [&str; 3] = [
    "Військова підготовка",
    "Фізична підготовка",
    "Фізичне виховання",
];

pub const UNASSIGNED_ROOM: &str = "unassigned";

impl WeeklyAssignment {
    /// Short text for a schedule cell: subject, lecturer and room on separate lines.
    pub fn label(&self, data: &TimeTableData) -> Result<String> {
        let event = self.event();
        let subject = data
            .subject(event.subject_id)
            .ok_or(TimeTableError::MissingReference {
                kind: "subject",
                id: event.subject_id,
            })?;
        if NAME_ONLY_SUBJECTS.contains(&subject.name.as_str()) {
            return Ok(subject.to_string());
        }

        let lecturer = data
            .lecturer(event.lecturer_id)
            .ok_or(TimeTableError::MissingReference {
                kind: "lecturer",
                id: event.lecturer_id,
            })?;
        let room = match self.room() {
            Some(room) => room.to_string(),
            None => UNASSIGNED_ROOM.to_string(),
        };

        Ok(format!("{subject}\n{lecturer}\n{room}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Event, Lecturer, Room, Subject};
    use crate::timetable::{TimeSlot, Week};

    fn data() -> TimeTableData {
        TimeTableData::new(
            "fall",
            vec![
                Event::new(1, 10, 100),
                Event::new(2, 11, 100),
                Event::new(3, 12, 999),
            ],
            vec![Room::new(5, "Aud. 5")],
            vec![
                Subject::new(10, "Algebra"),
                Subject::new(11, "Фізичне виховання"),
            ],
            vec![Lecturer::new(100, "Ivanenko")],
        )
    }

    #[test]
    fn test_full_label() {
        let data = data();
        let room = data.room(5).cloned();
        let wa = WeeklyAssignment::new(data.events[0], room, TimeSlot::new(0, 0), Week::First);
        assert_eq!(wa.label(&data).unwrap(), "Algebra\nIvanenko\nAud. 5");

        let wa = WeeklyAssignment::new(data.events[0], None, TimeSlot::new(0, 0), Week::First);
        assert_eq!(wa.label(&data).unwrap(), "Algebra\nIvanenko\nunassigned");
    }

    #[test]
    fn test_name_only_label() {
        let data = data();
        let wa = WeeklyAssignment::new(data.events[1], None, TimeSlot::new(0, 0), Week::Second);
        assert_eq!(wa.label(&data).unwrap(), "Фізичне виховання");
    }

    #[test]
    fn test_missing_subject() {
        let data = data();
        let wa = WeeklyAssignment::new(data.events[2], None, TimeSlot::new(0, 0), Week::First);
        assert!(matches!(
            wa.label(&data),
            Err(TimeTableError::MissingReference { kind: "subject", id: 12 })
        ));
    }
}

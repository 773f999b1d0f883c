// File: ./src/model/event.rs
use std::collections::BTreeSet;
use std::fmt;

use chrono::NaiveDateTime;

use crate::model::error::{EntityKind, ModelError};
use crate::model::fields::{self, Tag, Title};
use crate::model::profile::ProfileId;
use crate::model::unique::UniqueItem;

pub const PERIOD_CONSTRAINTS: &str =
    "Event start date-time must be earlier than its end date-time";

/// Handle to a stored event: the full identity triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventId {
    title: Title,
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl EventId {
    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} - {})",
            self.title,
            fields::format_display(&self.start),
            fields::format_display(&self.end)
        )
    }
}

/// A scheduled gathering. The (title, start, end) triple is the identity
/// and never changes after construction; the attendee list is mutated by
/// the store only.
#[derive(Debug, Clone)]
pub struct Event {
    title: Title,
    start: NaiveDateTime,
    end: NaiveDateTime,
    tags: BTreeSet<Tag>,
    attendees: Vec<ProfileId>,
}

impl Event {
    pub fn new(
        title: Title,
        start: NaiveDateTime,
        end: NaiveDateTime,
        tags: BTreeSet<Tag>,
    ) -> Result<Self, ModelError> {
        if start >= end {
            return Err(ModelError::Validation(PERIOD_CONSTRAINTS.to_string()));
        }
        Ok(Event {
            title,
            start,
            end,
            tags,
            attendees: Vec::new(),
        })
    }

    pub fn id(&self) -> EventId {
        EventId {
            title: self.title.clone(),
            start: self.start,
            end: self.end,
        }
    }

    pub fn title(&self) -> &Title {
        &self.title
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Attendees in attach order.
    pub fn attendees(&self) -> &[ProfileId] {
        &self.attendees
    }

    pub fn has_attendee(&self, profile: &ProfileId) -> bool {
        self.attendees.contains(profile)
    }

    pub fn matches_id(&self, id: &EventId) -> bool {
        self.title == *id.title() && self.start == id.start() && self.end == id.end()
    }

    pub(crate) fn add_attendee(&mut self, profile: ProfileId) {
        if !self.has_attendee(&profile) {
            self.attendees.push(profile);
        }
    }

    pub(crate) fn remove_attendee(&mut self, profile: &ProfileId) {
        self.attendees.retain(|attendee| attendee != profile);
    }

    pub(crate) fn replace_attendee(&mut self, old: &ProfileId, new: ProfileId) {
        if let Some(slot) = self.attendees.iter_mut().find(|attendee| **attendee == *old) {
            *slot = new;
        }
    }

    pub(crate) fn set_attendees(&mut self, attendees: Vec<ProfileId>) {
        self.attendees = attendees;
    }
}

impl UniqueItem for Event {
    const KIND: EntityKind = EntityKind::Event;

    fn is_same(&self, other: &Self) -> bool {
        self.title == other.title && self.start == other.start && self.end == other.end
    }
}

// Attendees do not take part in equality, mirroring Profile.
impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other) && self.tags == other.tags
    }
}

impl Eq for Event {}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}; From: {}; To: {}",
            self.title,
            fields::format_display(&self.start),
            fields::format_display(&self.end)
        )?;
        if !self.tags.is_empty() {
            write!(f, "; Tags: ")?;
            for tag in &self.tags {
                write!(f, "[{}]", tag)?;
            }
        }
        Ok(())
    }
}

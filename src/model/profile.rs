// File: ./src/model/profile.rs
use std::collections::BTreeSet;
use std::fmt;

use crate::model::error::EntityKind;
use crate::model::event::EventId;
use crate::model::fields::{Email, Name, Phone, Tag, Telegram};
use crate::model::unique::UniqueItem;

/// Lightweight handle to a stored profile. Profiles are identified by
/// name alone, so the handle is just the name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProfileId(Name);

impl ProfileId {
    pub fn new(name: Name) -> Self {
        ProfileId(name)
    }

    pub fn name(&self) -> &Name {
        &self.0
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A person in the records. Identity fields never change after
/// construction; only the association list is mutated, and only by the
/// store.
#[derive(Debug, Clone)]
pub struct Profile {
    name: Name,
    phone: Phone,
    email: Email,
    telegram: Telegram,
    tags: BTreeSet<Tag>,
    events_attending: Vec<EventId>,
}

impl Profile {
    pub fn new(name: Name, phone: Phone, email: Email, telegram: Telegram, tags: BTreeSet<Tag>) -> Self {
        Profile {
            name,
            phone,
            email,
            telegram,
            tags,
            events_attending: Vec::new(),
        }
    }

    pub fn id(&self) -> ProfileId {
        ProfileId(self.name.clone())
    }

    pub fn name(&self) -> &Name {
        &self.name
    }

    pub fn phone(&self) -> &Phone {
        &self.phone
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn telegram(&self) -> &Telegram {
        &self.telegram
    }

    pub fn tags(&self) -> &BTreeSet<Tag> {
        &self.tags
    }

    /// Events this profile attends, in attach order.
    pub fn events_attending(&self) -> &[EventId] {
        &self.events_attending
    }

    pub fn attends(&self, event: &EventId) -> bool {
        self.events_attending.contains(event)
    }

    pub fn matches_id(&self, id: &ProfileId) -> bool {
        self.name == *id.name()
    }

    pub(crate) fn add_event_attending(&mut self, event: EventId) {
        if !self.attends(&event) {
            self.events_attending.push(event);
        }
    }

    pub(crate) fn remove_event_attending(&mut self, event: &EventId) {
        self.events_attending.retain(|attended| attended != event);
    }

    pub(crate) fn replace_event_attending(&mut self, old: &EventId, new: EventId) {
        if let Some(slot) = self.events_attending.iter_mut().find(|attended| **attended == *old) {
            *slot = new;
        }
    }

    pub(crate) fn set_events_attending(&mut self, events: Vec<EventId>) {
        self.events_attending = events;
    }
}

impl UniqueItem for Profile {
    const KIND: EntityKind = EntityKind::Profile;

    fn is_same(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

// The association list does not take part in equality; a profile pulled
// from a view stays equal to its stored counterpart while attachments
// change underneath it.
impl PartialEq for Profile {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.phone == other.phone
            && self.email == other.email
            && self.telegram == other.telegram
            && self.tags == other.tags
    }
}

impl Eq for Profile {}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}; Phone: {}; Email: {}", self.name, self.phone, self.email)?;
        if !self.telegram.is_empty() {
            write!(f, "; Telegram: {}", self.telegram)?;
        }
        if !self.tags.is_empty() {
            write!(f, "; Tags: ")?;
            for tag in &self.tags {
                write!(f, "[{}]", tag)?;
            }
        }
        Ok(())
    }
}

// Predicates backing the filtered read views.
//
// Every view holds one replaceable filter value and re-applies it on each
// read; nothing observes the backing lists. Each filter is a small tagged
// union with an explicit `matches` method so callers can see exactly what
// a variant accepts.

use chrono::NaiveDate;

use crate::model::appointment::Appointment;
use crate::model::event::Event;
use crate::model::profile::Profile;

#[derive(Debug, Clone, PartialEq)]
pub enum ProfileFilter {
    All,
    /// Any keyword equals a whole word of the name, case-insensitive.
    NameContainsKeywords(Vec<String>),
    /// Any keyword equals a tag, case-insensitive.
    TagsContainKeywords(Vec<String>),
    Not(Box<ProfileFilter>),
}

impl ProfileFilter {
    pub fn matches(&self, profile: &Profile) -> bool {
        match self {
            ProfileFilter::All => true,
            ProfileFilter::NameContainsKeywords(keywords) => keywords
                .iter()
                .any(|keyword| contains_word(profile.name().as_str(), keyword)),
            ProfileFilter::TagsContainKeywords(keywords) => profile.tags().iter().any(|tag| {
                keywords
                    .iter()
                    .any(|keyword| tag.as_str().eq_ignore_ascii_case(keyword))
            }),
            ProfileFilter::Not(inner) => !inner.matches(profile),
        }
    }
}

impl Default for ProfileFilter {
    fn default() -> Self {
        ProfileFilter::All
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EventFilter {
    All,
    TitleContainsKeywords(Vec<String>),
    TagsContainKeywords(Vec<String>),
    /// Event starts on this calendar date.
    StartsOnDate(NaiveDate),
    Not(Box<EventFilter>),
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::TitleContainsKeywords(keywords) => keywords
                .iter()
                .any(|keyword| contains_word(event.title().as_str(), keyword)),
            EventFilter::TagsContainKeywords(keywords) => event.tags().iter().any(|tag| {
                keywords
                    .iter()
                    .any(|keyword| tag.as_str().eq_ignore_ascii_case(keyword))
            }),
            EventFilter::StartsOnDate(date) => event.start().date() == *date,
            EventFilter::Not(inner) => !inner.matches(event),
        }
    }
}

impl Default for EventFilter {
    fn default() -> Self {
        EventFilter::All
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppointmentFilter {
    All,
    Marked,
    Not(Box<AppointmentFilter>),
}

impl AppointmentFilter {
    pub fn matches(&self, appointment: &Appointment) -> bool {
        match self {
            AppointmentFilter::All => true,
            AppointmentFilter::Marked => appointment.is_marked(),
            AppointmentFilter::Not(inner) => !inner.matches(appointment),
        }
    }
}

impl Default for AppointmentFilter {
    fn default() -> Self {
        AppointmentFilter::All
    }
}

fn contains_word(haystack: &str, keyword: &str) -> bool {
    haystack
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case(keyword))
}

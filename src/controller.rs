// File: src/controller.rs
//! Central coordinator for record operations.
//! Surfaces (CLI subcommands, future front ends) delegate here so store
//! mutations and the filtered views stay in step.
use crate::model::{
    Appointment, AppointmentFilter, Event, EventFilter, EventId, ModelError, Profile,
    ProfileFilter, ProfileId,
};
use crate::store::RecordStore;

/// Owns the record store plus one replaceable filter per record kind.
/// Filters only shape the read views; the store itself always holds
/// everything.
#[derive(Debug, Clone, Default)]
pub struct RecordController {
    store: RecordStore,
    profile_filter: ProfileFilter,
    event_filter: EventFilter,
    appointment_filter: AppointmentFilter,
}

impl RecordController {
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            profile_filter: ProfileFilter::default(),
            event_filter: EventFilter::default(),
            appointment_filter: AppointmentFilter::default(),
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Swaps in a whole new store and clears every filter.
    pub fn reset(&mut self, store: RecordStore) {
        log::info!("replacing records wholesale");
        self.store = store;
        self.profile_filter = ProfileFilter::default();
        self.event_filter = EventFilter::default();
        self.appointment_filter = AppointmentFilter::default();
    }

    // --- FILTERS ---

    pub fn profile_filter(&self) -> &ProfileFilter {
        &self.profile_filter
    }

    pub fn event_filter(&self) -> &EventFilter {
        &self.event_filter
    }

    pub fn appointment_filter(&self) -> &AppointmentFilter {
        &self.appointment_filter
    }

    pub fn set_profile_filter(&mut self, filter: ProfileFilter) {
        self.profile_filter = filter;
    }

    pub fn set_event_filter(&mut self, filter: EventFilter) {
        self.event_filter = filter;
    }

    pub fn set_appointment_filter(&mut self, filter: AppointmentFilter) {
        self.appointment_filter = filter;
    }

    // --- READ VIEWS ---

    /// Profiles passing the active filter, sorted by name.
    pub fn filtered_profiles(&self) -> Vec<&Profile> {
        self.store
            .profiles()
            .into_iter()
            .filter(|profile| self.profile_filter.matches(profile))
            .collect()
    }

    /// Events passing the active filter, in insertion order.
    pub fn filtered_events(&self) -> Vec<&Event> {
        self.store
            .events()
            .iter()
            .filter(|event| self.event_filter.matches(event))
            .collect()
    }

    /// Appointments passing the active filter, in booking order.
    pub fn filtered_appointments(&self) -> Vec<&Appointment> {
        self.store
            .appointments()
            .iter()
            .filter(|appointment| self.appointment_filter.matches(appointment))
            .collect()
    }

    // --- PROFILES ---

    /// Adds a profile and widens the profile view back to everything, so
    /// the new entry is visible regardless of the previous filter.
    pub fn add_profile(&mut self, profile: Profile) -> Result<(), ModelError> {
        log::debug!("adding profile '{}'", profile.name());
        self.store.add_profile(profile)?;
        self.profile_filter = ProfileFilter::All;
        Ok(())
    }

    pub fn set_profile(&mut self, target: &ProfileId, edited: Profile) -> Result<(), ModelError> {
        log::debug!("editing profile '{}'", target.name());
        self.store.set_profile(target, edited)
    }

    pub fn remove_profile(&mut self, target: &Profile) -> Result<(), ModelError> {
        log::debug!("removing profile '{}'", target.name());
        self.store.remove_profile(target)
    }

    // --- EVENTS ---

    /// Adds an event and widens the event view back to everything.
    pub fn add_event(&mut self, event: Event) -> Result<(), ModelError> {
        log::debug!("adding event '{}'", event.title());
        self.store.add_event(event)?;
        self.event_filter = EventFilter::All;
        Ok(())
    }

    pub fn set_event(&mut self, target: &EventId, edited: Event) -> Result<(), ModelError> {
        log::debug!("editing event '{}'", target.title());
        self.store.set_event(target, edited)
    }

    pub fn remove_event(&mut self, target: &Event) -> Result<(), ModelError> {
        log::debug!("removing event '{}'", target.title());
        self.store.remove_event(target)
    }

    // --- ASSOCIATIONS ---

    pub fn add_attendees(
        &mut self,
        event: &EventId,
        profiles: &[ProfileId],
    ) -> Result<(), ModelError> {
        log::debug!("attaching {} profile(s) to '{}'", profiles.len(), event.title());
        self.store.add_attendees(event, profiles)
    }

    pub fn remove_attendees(
        &mut self,
        event: &EventId,
        profiles: &[ProfileId],
    ) -> Result<(), ModelError> {
        log::debug!("detaching {} profile(s) from '{}'", profiles.len(), event.title());
        self.store.remove_attendees(event, profiles)
    }

    pub fn add_events_attending(
        &mut self,
        profile: &ProfileId,
        events: &[EventId],
    ) -> Result<(), ModelError> {
        self.store.add_events_attending(profile, events)
    }

    pub fn remove_events_attending(
        &mut self,
        profile: &ProfileId,
        events: &[EventId],
    ) -> Result<(), ModelError> {
        self.store.remove_events_attending(profile, events)
    }

    // --- APPOINTMENTS ---

    pub fn book_appointment(&mut self, appointment: Appointment) -> Result<(), ModelError> {
        log::debug!("booking appointment for '{}'", appointment.patient().name());
        self.store.book_appointment(appointment)
    }

    pub fn cancel_appointment(&mut self, target: &Appointment) -> Result<(), ModelError> {
        self.store.cancel_appointment(target)
    }

    pub fn set_appointment(
        &mut self,
        target: &Appointment,
        edited: Appointment,
    ) -> Result<(), ModelError> {
        self.store.set_appointment(target, edited)
    }

    pub fn mark_appointment(&mut self, target: &Appointment) -> Result<(), ModelError> {
        self.store.mark_appointment(target)
    }

    pub fn unmark_appointment(&mut self, target: &Appointment) -> Result<(), ModelError> {
        self.store.unmark_appointment(target)
    }
}

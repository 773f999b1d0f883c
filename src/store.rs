// File: src/store.rs
use crate::model::{
    Appointment, EntityKind, Event, EventId, ModelError, Profile, ProfileId, UniqueItem, UniqueList,
};

/// Aggregate holding every record. All cross-record bookkeeping happens
/// here so that a profile's attended events and an event's attendee list
/// never disagree, and no association ever points at an untracked record.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    profiles: UniqueList<Profile>,
    events: UniqueList<Event>,
    appointments: Vec<Appointment>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- PROFILES ---

    pub fn has_profile(&self, profile: &Profile) -> bool {
        self.profiles.contains(profile)
    }

    pub fn find_profile(&self, id: &ProfileId) -> Option<&Profile> {
        self.profiles.iter().find(|profile| profile.matches_id(id))
    }

    fn find_profile_mut(&mut self, id: &ProfileId) -> Option<&mut Profile> {
        self.profiles.iter_mut().find(|profile| profile.matches_id(id))
    }

    fn require_profile(&self, id: &ProfileId) -> Result<(), ModelError> {
        if self.find_profile(id).is_none() {
            return Err(ModelError::NotFound(EntityKind::Profile));
        }
        Ok(())
    }

    pub fn add_profile(&mut self, profile: Profile) -> Result<(), ModelError> {
        self.profiles.add(profile)
    }

    /// Replaces the profile identified by `target` with `edited`. Every
    /// event the target attends and every appointment it owns is
    /// re-pointed at the edited profile before the list replacement, and
    /// the edited profile inherits the target's attendance list, so the
    /// two-sided links survive a rename.
    pub fn set_profile(&mut self, target: &ProfileId, edited: Profile) -> Result<(), ModelError> {
        let target_profile = self
            .profiles
            .iter()
            .find(|profile| profile.matches_id(target))
            .cloned()
            .ok_or(ModelError::NotFound(EntityKind::Profile))?;
        if !target_profile.is_same(&edited) && self.profiles.contains(&edited) {
            return Err(ModelError::Duplicate(EntityKind::Profile));
        }

        let edited_id = edited.id();
        let attended: Vec<EventId> = target_profile.events_attending().to_vec();
        for event_id in &attended {
            if let Some(event) = self.find_event_mut(event_id) {
                event.replace_attendee(target, edited_id.clone());
            }
        }
        for appointment in self.appointments.iter_mut() {
            if appointment.patient() == target {
                appointment.set_patient(edited_id.clone());
            }
        }

        let mut edited = edited;
        edited.set_events_attending(attended);
        self.profiles.set(&target_profile, edited)?;
        self.debug_assert_consistent();
        Ok(())
    }

    /// Removes the profile fully equal to `target`, detaching it from
    /// every event it attends and dropping its appointments first.
    pub fn remove_profile(&mut self, target: &Profile) -> Result<(), ModelError> {
        let index = self
            .profiles
            .iter()
            .position(|existing| existing == target)
            .ok_or(ModelError::NotFound(EntityKind::Profile))?;
        let target_id = target.id();
        let attended: Vec<EventId> = self.profiles.as_slice()[index].events_attending().to_vec();
        for event_id in &attended {
            if let Some(event) = self.find_event_mut(event_id) {
                event.remove_attendee(&target_id);
            }
        }
        self.appointments
            .retain(|appointment| appointment.patient() != &target_id);
        self.profiles.remove(target)?;
        self.debug_assert_consistent();
        Ok(())
    }

    // --- EVENTS ---

    pub fn has_event(&self, event: &Event) -> bool {
        self.events.contains(event)
    }

    pub fn find_event(&self, id: &EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.matches_id(id))
    }

    fn find_event_mut(&mut self, id: &EventId) -> Option<&mut Event> {
        self.events.iter_mut().find(|event| event.matches_id(id))
    }

    fn require_event(&self, id: &EventId) -> Result<(), ModelError> {
        if self.find_event(id).is_none() {
            return Err(ModelError::NotFound(EntityKind::Event));
        }
        Ok(())
    }

    pub fn add_event(&mut self, event: Event) -> Result<(), ModelError> {
        self.events.add(event)
    }

    /// Event counterpart of [`Self::set_profile`]: attendees keep
    /// pointing at the event through its new identity.
    pub fn set_event(&mut self, target: &EventId, edited: Event) -> Result<(), ModelError> {
        let target_event = self
            .events
            .iter()
            .find(|event| event.matches_id(target))
            .cloned()
            .ok_or(ModelError::NotFound(EntityKind::Event))?;
        if !target_event.is_same(&edited) && self.events.contains(&edited) {
            return Err(ModelError::Duplicate(EntityKind::Event));
        }

        let edited_id = edited.id();
        let attendees: Vec<ProfileId> = target_event.attendees().to_vec();
        for profile_id in &attendees {
            if let Some(profile) = self.find_profile_mut(profile_id) {
                profile.replace_event_attending(target, edited_id.clone());
            }
        }

        let mut edited = edited;
        edited.set_attendees(attendees);
        self.events.set(&target_event, edited)?;
        self.debug_assert_consistent();
        Ok(())
    }

    /// Removes the event fully equal to `target`, scrubbing it from
    /// every attendee's list first.
    pub fn remove_event(&mut self, target: &Event) -> Result<(), ModelError> {
        let index = self
            .events
            .iter()
            .position(|existing| existing == target)
            .ok_or(ModelError::NotFound(EntityKind::Event))?;
        let target_id = target.id();
        let attendees: Vec<ProfileId> = self.events.as_slice()[index].attendees().to_vec();
        for profile_id in &attendees {
            if let Some(profile) = self.find_profile_mut(profile_id) {
                profile.remove_event_attending(&target_id);
            }
        }
        self.events.remove(target)?;
        self.debug_assert_consistent();
        Ok(())
    }

    // --- ASSOCIATIONS ---

    /// Attaches each profile to the event, updating both sides. Profiles
    /// already attending are left alone. Fails without touching anything
    /// when the event or any named profile is untracked.
    pub fn add_attendees(&mut self, event: &EventId, profiles: &[ProfileId]) -> Result<(), ModelError> {
        self.require_event(event)?;
        for profile_id in profiles {
            self.require_profile(profile_id)?;
        }
        for profile_id in profiles {
            if let Some(entry) = self.find_event_mut(event) {
                entry.add_attendee(profile_id.clone());
            }
            if let Some(profile) = self.find_profile_mut(profile_id) {
                profile.add_event_attending(event.clone());
            }
        }
        self.debug_assert_consistent();
        Ok(())
    }

    /// Detaches each profile from the event on both sides. Profiles not
    /// attending are left alone.
    pub fn remove_attendees(
        &mut self,
        event: &EventId,
        profiles: &[ProfileId],
    ) -> Result<(), ModelError> {
        self.require_event(event)?;
        for profile_id in profiles {
            self.require_profile(profile_id)?;
        }
        for profile_id in profiles {
            if let Some(entry) = self.find_event_mut(event) {
                entry.remove_attendee(profile_id);
            }
            if let Some(profile) = self.find_profile_mut(profile_id) {
                profile.remove_event_attending(event);
            }
        }
        self.debug_assert_consistent();
        Ok(())
    }

    /// Profile-first spelling of [`Self::add_attendees`].
    pub fn add_events_attending(
        &mut self,
        profile: &ProfileId,
        events: &[EventId],
    ) -> Result<(), ModelError> {
        self.require_profile(profile)?;
        for event_id in events {
            self.require_event(event_id)?;
        }
        for event_id in events {
            self.add_attendees(event_id, std::slice::from_ref(profile))?;
        }
        Ok(())
    }

    /// Profile-first spelling of [`Self::remove_attendees`].
    pub fn remove_events_attending(
        &mut self,
        profile: &ProfileId,
        events: &[EventId],
    ) -> Result<(), ModelError> {
        self.require_profile(profile)?;
        for event_id in events {
            self.require_event(event_id)?;
        }
        for event_id in events {
            self.remove_attendees(event_id, std::slice::from_ref(profile))?;
        }
        Ok(())
    }

    // --- APPOINTMENTS ---

    pub fn appointments_of(&self, patient: &ProfileId) -> Vec<&Appointment> {
        self.appointments
            .iter()
            .filter(|appointment| appointment.patient() == patient)
            .collect()
    }

    /// Books an appointment for its patient. A patient can hold at most
    /// one appointment per time slot.
    pub fn book_appointment(&mut self, appointment: Appointment) -> Result<(), ModelError> {
        self.require_profile(appointment.patient())?;
        let collides = self.appointments.iter().any(|existing| {
            existing.patient() == appointment.patient() && existing.is_same_time(&appointment)
        });
        if collides {
            return Err(ModelError::Duplicate(EntityKind::Appointment));
        }
        self.appointments.push(appointment);
        Ok(())
    }

    /// Removes the appointment fully equal to `target`.
    pub fn cancel_appointment(&mut self, target: &Appointment) -> Result<(), ModelError> {
        let index = self
            .appointments
            .iter()
            .position(|existing| existing == target)
            .ok_or(ModelError::NotFound(EntityKind::Appointment))?;
        self.appointments.remove(index);
        Ok(())
    }

    /// Replaces `target` in place. The edited appointment must keep a
    /// free slot for its patient.
    pub fn set_appointment(
        &mut self,
        target: &Appointment,
        edited: Appointment,
    ) -> Result<(), ModelError> {
        let index = self
            .appointments
            .iter()
            .position(|existing| existing == target)
            .ok_or(ModelError::NotFound(EntityKind::Appointment))?;
        self.require_profile(edited.patient())?;
        let collides = self.appointments.iter().enumerate().any(|(other, existing)| {
            other != index
                && existing.patient() == edited.patient()
                && existing.is_same_time(&edited)
        });
        if collides {
            return Err(ModelError::Duplicate(EntityKind::Appointment));
        }
        self.appointments[index] = edited;
        Ok(())
    }

    pub fn mark_appointment(&mut self, target: &Appointment) -> Result<(), ModelError> {
        let mut edited = target.clone();
        edited.mark();
        self.set_appointment(target, edited)
    }

    pub fn unmark_appointment(&mut self, target: &Appointment) -> Result<(), ModelError> {
        let mut edited = target.clone();
        edited.unmark();
        self.set_appointment(target, edited)
    }

    // --- SIMILARITY QUERIES ---

    /// True when a different profile shares the probe's email. The probe
    /// itself, matched by identity, never counts.
    pub fn has_similar_email(&self, probe: &Profile) -> bool {
        self.profiles
            .iter()
            .any(|existing| !existing.is_same(probe) && existing.email() == probe.email())
    }

    pub fn has_similar_phone(&self, probe: &Profile) -> bool {
        self.profiles
            .iter()
            .any(|existing| !existing.is_same(probe) && existing.phone() == probe.phone())
    }

    pub fn has_similar_telegram(&self, probe: &Profile) -> bool {
        !probe.telegram().is_empty()
            && self
                .profiles
                .iter()
                .any(|existing| !existing.is_same(probe) && existing.telegram() == probe.telegram())
    }

    // --- READ VIEWS & BULK ---

    /// Profiles sorted by name. The backing list keeps insertion order;
    /// readers see the roster alphabetically.
    pub fn profiles(&self) -> Vec<&Profile> {
        let mut view: Vec<&Profile> = self.profiles.iter().collect();
        view.sort_by(|a, b| a.name().cmp(b.name()));
        view
    }

    /// Events in insertion order.
    pub fn events(&self) -> &[Event] {
        self.events.as_slice()
    }

    /// Appointments in booking order.
    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Wholesale replacement of both record lists. Appointments hang off
    /// profiles, so resetting the roster drops them.
    pub fn reset_data(&mut self, profiles: Vec<Profile>, events: Vec<Event>) -> Result<(), ModelError> {
        if !UniqueList::are_unique(&profiles) {
            return Err(ModelError::Duplicate(EntityKind::Profile));
        }
        if !UniqueList::are_unique(&events) {
            return Err(ModelError::Duplicate(EntityKind::Event));
        }
        self.profiles.replace_all(profiles)?;
        self.events.replace_all(events)?;
        self.appointments.clear();
        self.debug_assert_consistent();
        Ok(())
    }

    // --- CONSISTENCY ---

    /// True when every attendance link is mirrored on both sides and no
    /// association or appointment points at an untracked record.
    pub fn is_consistent(&self) -> bool {
        for profile in self.profiles.iter() {
            for event_id in profile.events_attending() {
                match self.find_event(event_id) {
                    Some(event) if event.has_attendee(&profile.id()) => {}
                    _ => return false,
                }
            }
        }
        for event in self.events.iter() {
            for profile_id in event.attendees() {
                match self.find_profile(profile_id) {
                    Some(profile) if profile.attends(&event.id()) => {}
                    _ => return false,
                }
            }
        }
        for appointment in &self.appointments {
            if self.find_profile(appointment.patient()).is_none() {
                return false;
            }
        }
        true
    }

    fn debug_assert_consistent(&self) {
        debug_assert!(self.is_consistent(), "record associations out of sync");
    }
}

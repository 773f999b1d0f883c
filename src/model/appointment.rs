// File: ./src/model/appointment.rs
use std::fmt;

use chrono::NaiveDateTime;

use crate::model::fields::{self, Reason};
use crate::model::profile::ProfileId;

/// A booked appointment, owned by exactly one patient profile. Unlike
/// events there is no shared attendance; the patient handle is the whole
/// relationship.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    reason: Reason,
    date_time: NaiveDateTime,
    marked: bool,
    patient: ProfileId,
}

impl Appointment {
    pub fn new(reason: Reason, date_time: NaiveDateTime, marked: bool, patient: ProfileId) -> Self {
        Appointment {
            reason,
            date_time,
            marked,
            patient,
        }
    }

    pub fn reason(&self) -> &Reason {
        &self.reason
    }

    pub fn date_time(&self) -> NaiveDateTime {
        self.date_time
    }

    pub fn is_marked(&self) -> bool {
        self.marked
    }

    pub fn patient(&self) -> &ProfileId {
        &self.patient
    }

    /// Same booking: reason, time and marked status all agree. The
    /// patient is deliberately left out, matching how bookings read to a
    /// receptionist.
    pub fn is_same_appointment(&self, other: &Appointment) -> bool {
        self.reason == other.reason
            && self.date_time == other.date_time
            && self.marked == other.marked
    }

    /// Same slot, whatever the reason. Drives the one-booking-per-slot
    /// rule for a single patient.
    pub fn is_same_time(&self, other: &Appointment) -> bool {
        self.date_time == other.date_time
    }

    pub(crate) fn mark(&mut self) {
        self.marked = true;
    }

    pub(crate) fn unmark(&mut self) {
        self.marked = false;
    }

    pub(crate) fn set_patient(&mut self, patient: ProfileId) {
        self.patient = patient;
    }
}

impl fmt::Display for Appointment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}",
            self.reason,
            fields::format_display(&self.date_time)
        )?;
        if self.marked {
            write!(f, " [done]")?;
        }
        Ok(())
    }
}

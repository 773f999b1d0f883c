// File: ./src/messages.rs
// User-visible message strings shared by the store, storage and binary.

pub const MESSAGE_DUPLICATE_PROFILE: &str = "This profile already exists in the records";
pub const MESSAGE_DUPLICATE_EVENT: &str = "This event already exists in the records";
pub const MESSAGE_DUPLICATE_APPOINTMENT: &str =
    "This person already booked an appointment at this time";

pub const MESSAGE_PROFILE_NOT_FOUND: &str = "The target profile is not in the records";
pub const MESSAGE_EVENT_NOT_FOUND: &str = "The target event is not in the records";
pub const MESSAGE_APPOINTMENT_NOT_FOUND: &str = "The target appointment is not in the records";

pub const MESSAGE_SIMILAR_EMAIL: &str = "Profiles list contains similar email(s).";
pub const MESSAGE_SIMILAR_PHONE: &str = "Profiles list contains similar phone(s).";
pub const MESSAGE_SIMILAR_TELEGRAM: &str = "Profiles list contains similar telegram(s).";

pub const MESSAGE_UNKNOWN_ATTENDEE: &str = "Event attendee does not match any stored profile";
pub const MESSAGE_UNKNOWN_PATIENT: &str = "Appointment patient does not match any stored profile";

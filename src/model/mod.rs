// File: ./src/model/mod.rs
pub mod appointment;
pub mod error;
pub mod event;
pub mod fields;
pub mod filter;
pub mod profile;
pub mod unique;

pub use appointment::Appointment;
pub use error::{EntityKind, ModelError};
pub use event::{Event, EventId};
pub use fields::{Email, Name, Phone, Reason, Tag, Telegram, Title};
pub use filter::{AppointmentFilter, EventFilter, ProfileFilter};
pub use profile::{Profile, ProfileId};
pub use unique::{UniqueItem, UniqueList};

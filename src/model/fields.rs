// File: ./src/model/fields.rs
// Validated value types for record fields. Constructors reject bad input
// so no record ever holds an invalid field.
use std::fmt;

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::error::ModelError;

pub const NAME_CONSTRAINTS: &str =
    "Names should only contain alphanumeric characters and spaces, and it should not be blank";
pub const PHONE_CONSTRAINTS: &str =
    "Phone numbers should only contain numbers, and it should be at least 3 digits long";
pub const EMAIL_CONSTRAINTS: &str = "Emails should be of the format local-part@domain";
pub const TELEGRAM_CONSTRAINTS: &str =
    "Telegram handles should be 5 to 32 characters of letters, digits and underscores, with an optional leading @";
pub const TAG_CONSTRAINTS: &str = "Tags names should be alphanumeric";
pub const TITLE_CONSTRAINTS: &str =
    "Titles should only contain alphanumeric characters and spaces, and it should not be blank";
pub const REASON_CONSTRAINTS: &str = "Reasons can take any values, and it should not be blank";
pub const DATE_TIME_CONSTRAINTS: &str =
    "Date-times should be of the format yyyy-MM-dd HH:mm or HH:mm yyyy-MM-dd, and must be valid";

static NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ]*$").expect("valid name regex"));
static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]{3,}$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[A-Za-z0-9]+([+_.-][A-Za-z0-9]+)*@([A-Za-z0-9]+(-[A-Za-z0-9]+)*\.)*([A-Za-z0-9]+(-[A-Za-z0-9]+)*){2,}$",
    )
    .expect("valid email regex")
});
static TELEGRAM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^@?[A-Za-z0-9_]{5,32}$").expect("valid telegram regex"));
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("valid tag regex"));

const STORAGE_FORMAT: &str = "%Y-%m-%d %H:%M";
const ALT_INPUT_FORMAT: &str = "%H:%M %Y-%m-%d";
const DISPLAY_FORMAT: &str = "%b %-d %Y %H:%M";

/// A person's name. Doubles as the profile identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if NAME_RE.is_match(value) {
            Ok(Name(value.to_string()))
        } else {
            Err(ModelError::Validation(NAME_CONSTRAINTS.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phone(String);

impl Phone {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if PHONE_RE.is_match(value) {
            Ok(Phone(value.to_string()))
        } else {
            Err(ModelError::Validation(PHONE_CONSTRAINTS.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if EMAIL_RE.is_match(value) {
            Ok(Email(value.to_string()))
        } else {
            Err(ModelError::Validation(EMAIL_CONSTRAINTS.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Optional messaging handle. The empty value stands for "not provided",
/// so a profile without one still compares and stores cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Telegram(String);

impl Telegram {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(Telegram(String::new()));
        }
        if TELEGRAM_RE.is_match(value) {
            Ok(Telegram(value.to_string()))
        } else {
            Err(ModelError::Validation(TELEGRAM_CONSTRAINTS.to_string()))
        }
    }

    pub fn none() -> Self {
        Telegram(String::new())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Telegram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tag(String);

impl Tag {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if TAG_RE.is_match(value) {
            Ok(Tag(value.to_string()))
        } else {
            Err(ModelError::Validation(TAG_CONSTRAINTS.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Title(String);

impl Title {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if NAME_RE.is_match(value) {
            Ok(Title(value.to_string()))
        } else {
            Err(ModelError::Validation(TITLE_CONSTRAINTS.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form appointment reason. Anything goes except blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reason(String);

impl Reason {
    pub fn new(value: &str) -> Result<Self, ModelError> {
        let value = value.trim();
        if value.is_empty() {
            Err(ModelError::Validation(REASON_CONSTRAINTS.to_string()))
        } else {
            Ok(Reason(value.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses a date-time in either accepted order, date-first or time-first.
/// Runs of whitespace are collapsed first so padded input still parses.
pub fn parse_date_time(value: &str) -> Result<NaiveDateTime, ModelError> {
    let normalized = value.split_whitespace().collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&normalized, STORAGE_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(&normalized, ALT_INPUT_FORMAT))
        .map_err(|_| ModelError::Validation(DATE_TIME_CONSTRAINTS.to_string()))
}

/// Canonical on-disk form, "yyyy-MM-dd HH:mm".
pub fn format_storage(date_time: &NaiveDateTime) -> String {
    date_time.format(STORAGE_FORMAT).to_string()
}

/// Human-oriented form, "MMM d yyyy HH:mm".
pub fn format_display(date_time: &NaiveDateTime) -> String {
    date_time.format(DISPLAY_FORMAT).to_string()
}

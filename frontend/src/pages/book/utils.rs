use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::{
    api::{CreateBookingRequest, Id, SessionType, DEFAULT_DURATION_MINUTES},
    utils::money::{format_amount, total_amount},
};

pub const DURATION_OPTIONS: [(u32, &str); 4] = [
    (30, "30 minutes"),
    (60, "1 hour"),
    (90, "1.5 hours"),
    (120, "2 hours"),
];

pub const SESSION_TYPES: [(SessionType, &str); 4] = [
    (SessionType::VideoCall, "Video Call"),
    (SessionType::AudioCall, "Audio Call"),
    (SessionType::Chat, "Chat"),
    (SessionType::InPerson, "In Person"),
];

/// Raw form input. Date and time are entered in the app time zone.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingForm {
    pub session_type: SessionType,
    pub session_date: String,
    pub session_time: String,
    pub duration_minutes: u32,
    pub topic: String,
    pub description: String,
}

impl Default for BookingForm {
    fn default() -> Self {
        Self {
            session_type: SessionType::VideoCall,
            session_date: String::new(),
            session_time: String::new(),
            duration_minutes: DEFAULT_DURATION_MINUTES,
            topic: String::new(),
            description: String::new(),
        }
    }
}

impl BookingForm {
    pub fn total(&self, hourly_rate: Decimal) -> Decimal {
        total_amount(self.duration_minutes, hourly_rate)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.session_date.trim().is_empty()
            || self.session_time.trim().is_empty()
            || self.topic.trim().is_empty()
        {
            return Err("Please fill in all required fields".into());
        }
        if !is_valid_duration(self.duration_minutes) {
            return Err("Please choose a valid session length".into());
        }
        Ok(())
    }

    /// Validates the form and builds the create payload. `today` is the
    /// earliest date a session may be booked for.
    pub fn to_request(
        &self,
        mentor: Id,
        tz: Tz,
        today: NaiveDate,
    ) -> Result<CreateBookingRequest, String> {
        self.validate()?;
        let start = session_start(&self.session_date, &self.session_time, tz)?;
        if start.with_timezone(&tz).date_naive() < today {
            return Err("Session date cannot be in the past".into());
        }
        let description = self.description.trim();
        Ok(CreateBookingRequest {
            mentor,
            session_type: self.session_type,
            session_date: start,
            duration_minutes: self.duration_minutes,
            topic: self.topic.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

pub fn is_valid_duration(minutes: u32) -> bool {
    DURATION_OPTIONS.iter().any(|(value, _)| *value == minutes)
}

pub fn duration_label(minutes: u32) -> String {
    DURATION_OPTIONS
        .iter()
        .find(|(value, _)| *value == minutes)
        .map(|(_, label)| label.to_string())
        .unwrap_or_else(|| format!("{minutes} minutes"))
}

/// `"90 minutes × 40.00/hour"` breakdown shown next to the total.
pub fn price_breakdown(duration_minutes: u32, hourly_rate: Decimal) -> String {
    format!("{duration_minutes} minutes × {}/hour", format_amount(hourly_rate))
}

fn session_start(date: &str, time: &str, tz: Tz) -> Result<DateTime<Utc>, String> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| "Invalid session date".to_string())?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(time.trim(), "%H:%M:%S"))
        .map_err(|_| "Invalid session time".to_string())?;
    tz.from_local_datetime(&NaiveDateTime::new(date, time))
        .earliest()
        .map(|local| local.with_timezone(&Utc))
        .ok_or_else(|| "Session time does not exist in this time zone".to_string())
}

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::utils::time;

pub type Id = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

impl TokenPair {
    /// `exp` claim of the access token, read without verifying the signature.
    pub fn access_expires_at(&self) -> Option<DateTime<Utc>> {
        jwt_expiry(&self.access)
    }
}

pub fn jwt_expiry(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    let claims: Value = serde_json::from_slice(&bytes).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    Utc.timestamp_opt(exp, 0).single()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
    #[serde(default)]
    pub refresh: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Mentor,
    #[default]
    Mentee,
    Admin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub user_type: UserType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub access: Option<String>,
    #[serde(default)]
    pub refresh: Option<String>,
}

impl RegisterResponse {
    pub fn tokens(&self) -> Option<TokenPair> {
        Some(TokenPair {
            access: self.access.clone()?,
            refresh: self.refresh.clone()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: Id,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub date_joined: Option<DateTime<Utc>>,
}

impl UserSummary {
    pub fn display_name(&self) -> String {
        let full_name = [self.first_name.trim(), self.last_name.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        if !full_name.is_empty() {
            return full_name;
        }
        [self.username.as_str(), self.email.as_str()]
            .into_iter()
            .find(|candidate| !candidate.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: Id,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub github: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn is_mentor(&self) -> bool {
        self.user_type == UserType::Mentor
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Partial profile update; `None` fields are left untouched by the server.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<UserType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(skip)]
    pub profile_picture: Option<FileUpload>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserStats {
    pub total_sessions: u32,
    pub upcoming_sessions: u32,
    pub total_hours: f64,
    pub unique_mentors: u32,
    pub total_earnings: f64,
    pub average_rating: f64,
    pub total_reviews: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expertise {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MentorProfile {
    pub id: Id,
    #[serde(default)]
    pub user: Option<UserSummary>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub expertise: Vec<Expertise>,
    #[serde(default)]
    pub experience_level: Option<String>,
    #[serde(default)]
    pub experience_years: Option<u32>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default)]
    pub hourly_rate: Decimal,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: f64,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub total_sessions: u32,
    #[serde(default)]
    pub location: Option<String>,
}

fn default_true() -> bool {
    true
}

fn deserialize_rating<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(n) => Ok(n.as_f64().unwrap_or_default()),
        Value::String(s) => s
            .trim()
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid rating: {s}"))),
        Value::Null => Ok(0.0),
        other => Err(serde::de::Error::custom(format!("invalid rating: {other}"))),
    }
}

impl MentorProfile {
    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(UserSummary::display_name)
            .unwrap_or_else(|| "User".into())
    }

    pub fn rating_label(&self) -> String {
        format!("{:.1}", self.rating)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MentorQuery {
    pub search: Option<String>,
    pub expertise: Option<String>,
    pub experience_level: Option<String>,
    pub ordering: Option<String>,
    pub page: Option<u32>,
}

impl MentorQuery {
    pub fn pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(expertise) = &self.expertise {
            pairs.push(("expertise", expertise.clone()));
        }
        if let Some(level) = &self.experience_level {
            pairs.push(("experience_level", level.clone()));
        }
        if let Some(ordering) = &self.ordering {
            pairs.push(("ordering", ordering.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
}

impl BookingStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Pending or confirmed: the session may still take place.
    pub fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Pending, Self::Cancelled)
                | (Self::Confirmed, Self::Completed)
                | (Self::Confirmed, Self::Cancelled)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookingAction {
    Accept,
    Decline,
    Complete,
    Cancel,
}

impl BookingAction {
    pub const ALL: [BookingAction; 4] = [
        BookingAction::Accept,
        BookingAction::Decline,
        BookingAction::Complete,
        BookingAction::Cancel,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Complete => "complete",
            Self::Cancel => "cancel",
        }
    }

    pub fn target_status(self) -> BookingStatus {
        match self {
            Self::Accept => BookingStatus::Confirmed,
            Self::Decline | Self::Cancel => BookingStatus::Cancelled,
            Self::Complete => BookingStatus::Completed,
        }
    }

    pub fn allowed_from(self, status: BookingStatus) -> bool {
        match self {
            Self::Accept | Self::Decline => status == BookingStatus::Pending,
            Self::Complete => status == BookingStatus::Confirmed,
            Self::Cancel => status.is_active(),
        }
    }

    pub fn is_mentor_only(self) -> bool {
        !matches!(self, Self::Cancel)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    #[default]
    VideoCall,
    AudioCall,
    Chat,
    InPerson,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Id,
    #[serde(default)]
    pub mentor: Option<MentorProfile>,
    #[serde(default)]
    pub mentee: Option<UserSummary>,
    #[serde(default)]
    pub session_type: SessionType,
    #[serde(deserialize_with = "time::deserialize_timestamp")]
    pub session_date: DateTime<Utc>,
    /// Sent next to a bare `session_date`; moves the start to this time of day.
    #[serde(
        default,
        deserialize_with = "time::deserialize_clock_time",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_time: Option<NaiveTime>,
    #[serde(default = "default_duration_minutes")]
    pub duration_minutes: u32,
    pub status: BookingStatus,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default)]
    pub is_paid: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

pub const DEFAULT_DURATION_MINUTES: u32 = 60;

fn default_duration_minutes() -> u32 {
    DEFAULT_DURATION_MINUTES
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTiming {
    Upcoming,
    Past,
}

impl Booking {
    pub fn starts_at(&self) -> DateTime<Utc> {
        match self.session_time {
            Some(clock) => time::at_clock_time(self.session_date, clock),
            None => self.session_date,
        }
    }

    pub fn session_end(&self) -> DateTime<Utc> {
        time::session_end(self.starts_at(), self.duration_minutes)
    }

    pub fn timing(&self, now: DateTime<Utc>) -> SessionTiming {
        if self.status.is_active() && self.session_end() > now {
            SessionTiming::Upcoming
        } else {
            SessionTiming::Past
        }
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.timing(now) == SessionTiming::Upcoming
    }

    pub fn is_past(&self, now: DateTime<Utc>) -> bool {
        self.timing(now) == SessionTiming::Past
    }

    pub fn time_range_label(&self) -> String {
        time::format_session_time_range_in_app_tz(self.starts_at(), self.duration_minutes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub mentor: Id,
    pub session_type: SessionType,
    pub session_date: DateTime<Utc>,
    pub duration_minutes: u32,
    pub topic: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Id,
    #[serde(default)]
    pub mentee: Option<UserSummary>,
    #[serde(default)]
    pub mentor: Option<MentorProfile>,
    #[serde(default)]
    pub booking: Option<Id>,
    pub rating: u8,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub comment: String,
    #[serde(default = "default_true")]
    pub is_public: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRequest {
    pub mentor: Id,
    pub booking: Id,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub comment: String,
    pub is_public: bool,
}

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

impl ReviewRequest {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_RATING..=MAX_RATING).contains(&self.rating) {
            return Err(format!(
                "Rating must be between {MIN_RATING} and {MAX_RATING}"
            ));
        }
        if self.comment.trim().is_empty() {
            return Err("Please share a comment about your session".into());
        }
        Ok(())
    }
}

/// List payload normalised from either a paginated object or a bare array.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Default for ListResponse<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> ListResponse<T> {
    pub fn empty() -> Self {
        Self {
            count: None,
            next: None,
            previous: None,
            results: Vec::new(),
        }
    }

    pub fn from_items(results: Vec<T>) -> Self {
        Self {
            results,
            ..Self::empty()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn first(&self) -> Option<&T> {
        self.results.first()
    }

    pub fn into_items(self) -> Vec<T> {
        self.results
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawList<T> {
    Paginated {
        #[serde(default)]
        count: Option<u64>,
        #[serde(default)]
        next: Option<String>,
        #[serde(default)]
        previous: Option<String>,
        results: Vec<T>,
    },
    Plain(Vec<T>),
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ListResponse<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawList::deserialize(deserializer)? {
            RawList::Paginated {
                count,
                next,
                previous,
                results,
            } => Self {
                count,
                next,
                previous,
                results,
            },
            RawList::Plain(results) => Self::from_items(results),
        })
    }
}

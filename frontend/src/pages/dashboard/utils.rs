use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::{
    api::{Booking, BookingStatus, Id, UserProfile, UserStats},
    utils::time::{format_session_date, format_session_time_range},
};

pub const UPCOMING_LIMIT: usize = 5;
pub const RECENT_LIMIT: usize = 3;

#[derive(Debug, Clone, PartialEq)]
pub struct StatCard {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionCard {
    pub booking_id: Id,
    pub title: String,
    pub date_label: String,
    pub time_range: String,
    pub status: BookingStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub greeting_name: String,
    pub is_mentor: bool,
    pub role_label: &'static str,
    pub stats: Vec<StatCard>,
    pub upcoming: Vec<SessionCard>,
    pub recent: Vec<SessionCard>,
}

/// Soonest first, capped at [`UPCOMING_LIMIT`].
pub fn upcoming_sessions(bookings: &[Booking], now: DateTime<Utc>) -> Vec<&Booking> {
    let mut upcoming: Vec<&Booking> = bookings.iter().filter(|b| b.is_upcoming(now)).collect();
    upcoming.sort_by_key(|b| b.starts_at());
    upcoming.truncate(UPCOMING_LIMIT);
    upcoming
}

/// Latest first, capped at [`RECENT_LIMIT`].
pub fn recent_sessions(bookings: &[Booking], now: DateTime<Utc>) -> Vec<&Booking> {
    let mut past: Vec<&Booking> = bookings.iter().filter(|b| b.is_past(now)).collect();
    past.sort_by_key(|b| std::cmp::Reverse(b.starts_at()));
    past.truncate(RECENT_LIMIT);
    past
}

/// Name of whoever sits on the other side of the booking for this viewer.
pub fn other_party_name(booking: &Booking, viewer_is_mentor: bool) -> String {
    let name = if viewer_is_mentor {
        booking.mentee.as_ref().map(|mentee| mentee.display_name())
    } else {
        booking.mentor.as_ref().map(|mentor| mentor.display_name())
    };
    name.unwrap_or_else(|| "User".into())
}

pub fn session_card(booking: &Booking, viewer_is_mentor: bool, tz: Tz) -> SessionCard {
    SessionCard {
        booking_id: booking.id,
        title: format!("Session with {}", other_party_name(booking, viewer_is_mentor)),
        date_label: format_session_date(booking.starts_at(), tz),
        time_range: format_session_time_range(booking.starts_at(), booking.duration_minutes, tz),
        status: booking.status,
    }
}

pub fn stat_cards(stats: &UserStats, is_mentor: bool) -> Vec<StatCard> {
    let card = |label, value: String| StatCard { label, value };
    if is_mentor {
        vec![
            card("Total Sessions", stats.total_sessions.to_string()),
            card("Upcoming", stats.upcoming_sessions.to_string()),
            card("Earnings", format!("{:.2}", stats.total_earnings)),
            card("Rating", format!("{:.1}", stats.average_rating)),
        ]
    } else {
        vec![
            card("Sessions Attended", stats.total_sessions.to_string()),
            card("Upcoming", stats.upcoming_sessions.to_string()),
            card("Hours Learned", format!("{:.1}", stats.total_hours)),
            card("Mentors", stats.unique_mentors.to_string()),
        ]
    }
}

pub fn build_dashboard(
    profile: Option<&UserProfile>,
    bookings: &[Booking],
    stats: &UserStats,
    now: DateTime<Utc>,
    tz: Tz,
) -> DashboardView {
    let is_mentor = profile.is_some_and(UserProfile::is_mentor);
    let greeting_name = profile
        .and_then(|p| p.user.as_ref())
        .map(|user| user.first_name.trim().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "User".into());
    let cards = |selected: Vec<&Booking>| {
        selected
            .into_iter()
            .map(|booking| session_card(booking, is_mentor, tz))
            .collect::<Vec<_>>()
    };
    DashboardView {
        greeting_name,
        is_mentor,
        role_label: if is_mentor { "Mentor" } else { "Mentee" },
        stats: stat_cards(stats, is_mentor),
        upcoming: cards(upcoming_sessions(bookings, now)),
        recent: cards(recent_sessions(bookings, now)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{MentorProfile, UserSummary, UserType};
    use crate::utils::time::parse_timestamp;

    fn at(raw: &str) -> DateTime<Utc> {
        parse_timestamp(raw).unwrap()
    }

    fn booking(id: Id, status: BookingStatus, start: &str, minutes: u32) -> Booking {
        Booking {
            id,
            mentor: Some(MentorProfile {
                id: 3,
                user: Some(UserSummary {
                    id: 21,
                    first_name: "Grace".into(),
                    last_name: "Hopper".into(),
                    ..UserSummary::default()
                }),
                ..MentorProfile::default()
            }),
            mentee: Some(UserSummary {
                id: 11,
                username: "ada".into(),
                ..UserSummary::default()
            }),
            session_type: Default::default(),
            session_date: at(start),
            session_time: None,
            duration_minutes: minutes,
            status,
            topic: "Ownership".into(),
            description: None,
            meeting_link: None,
            notes: None,
            total_amount: Default::default(),
            is_paid: false,
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn upcoming_takes_the_five_soonest_active_sessions() {
        let now = at("2030-01-01T12:00:00Z");
        let mut bookings: Vec<Booking> = (1..=7)
            .rev()
            .map(|day| {
                booking(
                    day,
                    BookingStatus::Confirmed,
                    &format!("2030-01-{:02}T09:00:00Z", day + 1),
                    60,
                )
            })
            .collect();
        bookings.push(booking(50, BookingStatus::Cancelled, "2030-01-02T08:00:00Z", 60));

        let ids: Vec<Id> = upcoming_sessions(&bookings, now).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn session_in_progress_is_still_upcoming() {
        let now = at("2030-01-01T10:30:00Z");
        let bookings = vec![booking(1, BookingStatus::Pending, "2030-01-01T10:00:00Z", 60)];
        assert_eq!(upcoming_sessions(&bookings, now).len(), 1);
        assert!(recent_sessions(&bookings, now).is_empty());
    }

    #[test]
    fn recent_takes_the_three_latest_past_sessions() {
        let now = at("2030-02-01T00:00:00Z");
        let bookings = vec![
            booking(1, BookingStatus::Completed, "2030-01-01T09:00:00Z", 60),
            booking(2, BookingStatus::Completed, "2030-01-05T09:00:00Z", 60),
            booking(3, BookingStatus::Cancelled, "2030-03-01T09:00:00Z", 60),
            booking(4, BookingStatus::Confirmed, "2030-01-10T09:00:00Z", 60),
            booking(5, BookingStatus::NoShow, "2030-01-03T09:00:00Z", 60),
        ];
        let ids: Vec<Id> = recent_sessions(&bookings, now).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![3, 4, 2]);
    }

    #[test]
    fn other_party_depends_on_viewer_role() {
        let b = booking(1, BookingStatus::Pending, "2030-01-01T09:00:00Z", 60);
        assert_eq!(other_party_name(&b, false), "Grace Hopper");
        assert_eq!(other_party_name(&b, true), "ada");

        let anonymous = Booking {
            mentor: None,
            ..b
        };
        assert_eq!(other_party_name(&anonymous, false), "User");
    }

    #[test]
    fn session_card_formats_in_the_given_zone() {
        let b = booking(9, BookingStatus::Confirmed, "2030-01-01T09:00:00Z", 90);
        let card = session_card(&b, false, chrono_tz::Asia::Tokyo);
        assert_eq!(card.title, "Session with Grace Hopper");
        assert_eq!(card.date_label, "2030-01-01");
        assert_eq!(card.time_range, "06:00 PM - 07:30 PM");
    }

    #[test]
    fn stats_differ_by_role() {
        let stats = UserStats {
            total_sessions: 12,
            upcoming_sessions: 2,
            total_hours: 10.5,
            unique_mentors: 3,
            total_earnings: 480.0,
            average_rating: 4.5,
            total_reviews: 6,
        };
        let mentor: Vec<_> = stat_cards(&stats, true).into_iter().map(|c| c.value).collect();
        assert_eq!(mentor, vec!["12", "2", "480.00", "4.5"]);
        let mentee: Vec<_> = stat_cards(&stats, false).into_iter().map(|c| c.label).collect();
        assert_eq!(
            mentee,
            vec!["Sessions Attended", "Upcoming", "Hours Learned", "Mentors"]
        );
    }

    #[test]
    fn dashboard_uses_profile_role_and_name() {
        let profile = UserProfile {
            id: 7,
            user: Some(UserSummary {
                id: 11,
                first_name: "Ada".into(),
                ..UserSummary::default()
            }),
            user_type: UserType::Mentor,
            ..UserProfile::default()
        };
        let now = at("2030-01-01T00:00:00Z");
        let bookings = vec![booking(1, BookingStatus::Confirmed, "2030-01-02T09:00:00Z", 60)];
        let view = build_dashboard(Some(&profile), &bookings, &UserStats::default(), now, Tz::UTC);
        assert!(view.is_mentor);
        assert_eq!(view.greeting_name, "Ada");
        assert_eq!(view.role_label, "Mentor");
        assert_eq!(view.upcoming[0].title, "Session with ada");
        assert!(view.recent.is_empty());

        let anonymous = build_dashboard(None, &[], &UserStats::default(), now, Tz::UTC);
        assert_eq!(anonymous.greeting_name, "User");
        assert_eq!(anonymous.role_label, "Mentee");
    }
}

use crate::api::{Booking, BookingAction, BookingStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BookingsTab {
    #[default]
    Upcoming,
    Past,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingLists {
    pub upcoming: Vec<Booking>,
    pub past: Vec<Booking>,
}

impl BookingLists {
    pub fn tab(&self, tab: BookingsTab) -> &[Booking] {
        match tab {
            BookingsTab::Upcoming => &self.upcoming,
            BookingsTab::Past => &self.past,
        }
    }

    pub fn tab_label(&self, tab: BookingsTab) -> String {
        match tab {
            BookingsTab::Upcoming => format!("Upcoming ({})", self.upcoming.len()),
            BookingsTab::Past => format!("Past ({})", self.past.len()),
        }
    }

    /// Swaps in the server's copy of a booking wherever it is listed.
    pub fn apply_update(&mut self, updated: &Booking) {
        for list in [&mut self.upcoming, &mut self.past] {
            for booking in list.iter_mut().filter(|b| b.id == updated.id) {
                *booking = updated.clone();
            }
        }
    }
}

/// Actions a viewer may take on a booking in `status`. Cancelling is open to
/// both sides; the rest belong to the mentor.
pub fn available_actions(status: BookingStatus, viewer_is_mentor: bool) -> Vec<BookingAction> {
    BookingAction::ALL
        .into_iter()
        .filter(|action| action.allowed_from(status))
        .filter(|action| viewer_is_mentor || !action.is_mentor_only())
        .collect()
}

pub fn action_label(action: BookingAction) -> &'static str {
    match action {
        BookingAction::Accept => "Accept",
        BookingAction::Decline => "Decline",
        BookingAction::Complete => "Complete",
        BookingAction::Cancel => "Cancel",
    }
}

pub fn page_title(viewer_is_mentor: bool) -> &'static str {
    if viewer_is_mentor {
        "My Sessions"
    } else {
        "My Bookings"
    }
}

pub mod book;
pub mod bookings;
pub mod dashboard;
pub mod login;

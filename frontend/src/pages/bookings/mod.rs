pub mod repository;
pub mod utils;

pub use repository::BookingsRepository;
pub use utils::{available_actions, BookingLists, BookingsTab};

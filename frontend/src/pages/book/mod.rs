pub mod repository;
pub mod utils;

pub use repository::BookRepository;
pub use utils::BookingForm;

pub mod repository;
pub mod utils;

pub use repository::DashboardRepository;
pub use utils::DashboardView;

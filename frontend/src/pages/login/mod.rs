pub mod utils;

pub use utils::{login_request, validate_credentials, RegistrationForm};

mod auth;
mod bookings;
pub mod client;
pub mod error;
mod mentors;
mod profile;
mod reviews;
pub mod types;

pub use client::*;
pub use error::*;
pub use types::*;

#[cfg(test)]
pub mod test_support;

pub mod token;

pub use token::{PersonalAccessToken, PersonalAccessTokenScope};

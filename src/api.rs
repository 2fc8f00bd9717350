pub mod list_options;
pub mod personal_access_tokens;

pub use self::list_options::{ListOptions, ListOptionsBuilder};
pub use self::personal_access_tokens::PersonalAccessTokensService;

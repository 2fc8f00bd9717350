//! Client for the personal access tokens of the Gitlab API.
//!
//! ```no_run
//! use gitlab::Gitlab;
//! use glpat::api::PersonalAccessTokensService;
//! use std::sync::Arc;
//!
//! let gitlab = Arc::new(Gitlab::new("gitlab.example.com", "glpat-xxxx")?);
//! let tokens = PersonalAccessTokensService::new(gitlab);
//! let (tokens, response) = tokens.list_personal_access_tokens(None, Vec::new())?;
//! println!("{} tokens, next page {:?}", tokens.len(), response.next_page());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod types;

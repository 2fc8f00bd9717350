use crate::{args::Opts, config::Config};

use anyhow::Result;
use chrono::{DateTime, Utc};
use gitlab::Gitlab;
use glpat::{api::PersonalAccessTokensService, types::PersonalAccessToken};
use std::{io::Write, sync::Arc};
#[cfg(feature = "color")]
use termcolor::{Color, ColorSpec, StandardStream, WriteColor};

/// Structure to pass around functions containing informations
/// about execution context
pub struct CliContext {
	/// verbose mode
	pub verbose: bool,
	/// open links automatically
	pub open: bool,
	/// color output
	#[cfg(feature = "color")]
	pub color: termcolor::ColorChoice,
	/// the configuration file
	pub config: Config,
	/// the personal access tokens api
	pub tokens: PersonalAccessTokensService<Gitlab>,
}

/// How a token is displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
	Active,
	Revoked,
	Expired,
	Inactive,
}

impl TokenState {
	pub fn of(token: &PersonalAccessToken) -> Self {
		if token.revoked {
			Self::Revoked
		} else if token.expired() {
			Self::Expired
		} else if token.active {
			Self::Active
		} else {
			Self::Inactive
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Active => "active",
			Self::Revoked => "revoked",
			Self::Expired => "expired",
			Self::Inactive => "inactive",
		}
	}

	#[cfg(feature = "color")]
	fn color(self) -> Color {
		match self {
			Self::Active => Color::Green,
			Self::Revoked => Color::Red,
			Self::Expired | Self::Inactive => Color::Yellow,
		}
	}
}

impl CliContext {
	/// Inializer from cli arguments
	pub fn from_args(opts: &Opts) -> Result<Self> {
		// read yaml config
		let config = Config::read(opts.config.as_ref())?;

		// connect to gitlab
		let gitlab = config.connect()?;

		Ok(Self {
			verbose: opts.verbose,
			open: opts.open,
			#[cfg(feature = "color")]
			color: color_choice(opts.color),
			config,
			tokens: PersonalAccessTokensService::new(Arc::new(gitlab)),
		})
	}

	/// Print the tokens, one per line
	pub fn print_tokens(&self, tokens: &[PersonalAccessToken]) -> Result<()> {
		let now = Utc::now();
		#[cfg(feature = "color")]
		let mut out = StandardStream::stdout(self.color);
		#[cfg(not(feature = "color"))]
		let mut out = std::io::stdout().lock();

		for token in tokens {
			let state = TokenState::of(token);
			write!(out, "#{} {} ", token.id, token.name)?;
			#[cfg(feature = "color")]
			out.set_color(ColorSpec::new().set_fg(Some(state.color())))?;
			write!(out, "[{}]", state.as_str())?;
			#[cfg(feature = "color")]
			out.reset()?;
			writeln!(out, " {}", token.scopes.join(","))?;
			if self.verbose {
				writeln!(out, "{}", token_details(token, now))?;
			}
		}
		Ok(())
	}
}

/// Dates of a token relative to now
pub fn token_details(token: &PersonalAccessToken, now: DateTime<Utc>) -> String {
	let formatter = timeago::Formatter::new();
	let ago = |date: Option<DateTime<Utc>>| match date {
		Some(date) => formatter.convert_chrono(date, now),
		None => "never".to_owned(),
	};
	let expires = token
		.expires_at
		.map(|date| date.to_string())
		.unwrap_or_else(|| "never".to_owned());

	format!(
		"  created: {}, last used: {}, expires: {}",
		ago(token.created_at),
		ago(token.last_used_at),
		expires
	)
}

#[cfg(feature = "color")]
fn color_choice(choice: crate::args::ColorChoice) -> termcolor::ColorChoice {
	use crate::args::ColorChoice;

	match choice {
		ColorChoice::Always => termcolor::ColorChoice::Always,
		ColorChoice::Never => termcolor::ColorChoice::Never,
		ColorChoice::Auto if atty::is(atty::Stream::Stdout) => termcolor::ColorChoice::Auto,
		ColorChoice::Auto => termcolor::ColorChoice::Never,
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::{Duration, NaiveDate, TimeZone};

	#[test]
	fn token_states() {
		let mut token = PersonalAccessToken {
			active: true,
			..Default::default()
		};
		assert_eq!(TokenState::of(&token), TokenState::Active);
		token.expires_at = NaiveDate::from_ymd_opt(2000, 1, 1);
		assert_eq!(TokenState::of(&token), TokenState::Expired);
		token.revoked = true;
		assert_eq!(TokenState::of(&token), TokenState::Revoked);
		let token = PersonalAccessToken::default();
		assert_eq!(TokenState::of(&token), TokenState::Inactive);
	}

	#[test]
	fn details() {
		let now = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
		let token = PersonalAccessToken {
			created_at: Some(now - Duration::days(3)),
			expires_at: NaiveDate::from_ymd_opt(2024, 6, 1),
			..Default::default()
		};
		assert_eq!(
			token_details(&token, now),
			"  created: 3 days ago, last used: never, expires: 2024-06-01"
		);
	}
}

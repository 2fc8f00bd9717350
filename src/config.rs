use anyhow::{anyhow, bail, Context, Result};
use directories::ProjectDirs;
use gitlab::{Gitlab, GitlabBuilder};
use serde::Deserialize;
use std::{env, fs::File, path::PathBuf};
use tracing::debug;

const CONFIG_ENV: &str = "GLPAT_CONFIG";
const TOKEN_ENV: &str = "GITLAB_TOKEN";

/// Credentials used to connect to gitlab
#[derive(Debug, PartialEq, Eq)]
pub enum Credentials {
	/// personal, project or group access token
	Token(String),
	/// oauth2 access token
	OAuth2(String),
}

#[derive(Deserialize, Debug)]
pub struct Config {
	pub host: String,
	/// private token
	pub token: Option<String>,
	/// oauth2 access token
	pub oauth2: Option<String>,
	/// use http instead of https
	#[serde(default)]
	pub insecure: bool,
	#[serde(skip)]
	pub path: PathBuf,
}

impl Config {
	pub fn read(config: Option<&String>) -> Result<Self> {
		let config_path = if let Some(config) = config {
			PathBuf::from(config)
		} else {
			// returns the first configuration path that exists from that order
			// - GLPAT_CONFIG
			// - ~/.config/glpat/config.yaml
			// - .glpat.yaml
			//
			// first test from env var
			env::var(CONFIG_ENV)
				.ok()
				.map(PathBuf::from)
				.filter(|path| path.exists())
				// then test from project dir
				.or(ProjectDirs::from("me", "IT Sufficient", "glpat")
					.map(|path| path.config_dir().join("config.yaml"))
					.filter(|path| path.exists()))
				// then test in current directory
				.or(Some(PathBuf::from(".glpat.yaml")))
				.filter(|path| path.exists())
				.ok_or(anyhow!("Unable to find a suitable configuration file"))?
		};

		Self::from_path(config_path)
	}

	pub fn from_path(config_path: PathBuf) -> Result<Self> {
		debug!("Reading configuration from {:?}", &config_path);
		// open configuration file
		let file =
			File::open(&config_path).with_context(|| format!("Can't open {:?}", &config_path))?;
		// deserialize configuration
		let mut config: Self = serde_yaml::from_reader(file)
			.with_context(|| format!("Can't read {:?}", &config_path))?;

		// save the choosen path
		config.path = config_path;
		Ok(config)
	}

	/// Credentials to use, a token in the environment taking precedence
	pub fn credentials(&self) -> Result<Credentials> {
		self.credentials_with(env::var(TOKEN_ENV).ok())
	}

	fn credentials_with(&self, env_token: Option<String>) -> Result<Credentials> {
		if let Some(token) = env_token.filter(|token| !token.is_empty()) {
			Ok(Credentials::Token(token))
		} else if let Some(token) = &self.token {
			Ok(Credentials::Token(token.to_owned()))
		} else if let Some(token) = &self.oauth2 {
			Ok(Credentials::OAuth2(token.to_owned()))
		} else {
			bail!(
				"No credentials in {:?}: set token, oauth2 or {}",
				&self.path,
				TOKEN_ENV
			)
		}
	}

	/// Connect to the configured gitlab instance
	pub fn connect(&self) -> Result<Gitlab> {
		let mut builder = match self.credentials()? {
			Credentials::Token(token) => GitlabBuilder::new(&self.host, token),
			Credentials::OAuth2(token) => {
				let mut builder = GitlabBuilder::new(&self.host, token);
				builder.oauth2_token();
				builder
			}
		};
		if self.insecure {
			builder.insecure();
		}
		builder
			.build()
			.with_context(|| format!("Can't connect to {}", &self.host))
	}
}

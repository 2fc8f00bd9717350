use anyhow::{anyhow, Error};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::{fmt, str::FromStr};

/// Scopes for personal access tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PersonalAccessTokenScope {
	/// Access the API and perform git reads and writes.
	Api,
	/// Access to read the user information.
	ReadUser,
	/// Access to API read-only.
	ReadApi,
	/// Access to read private repository
	ReadRepository,
	/// Access to write private repository
	WriteRepository,
	/// Access to read container registry
	ReadRegistry,
	/// Access to write container registry
	WriteRegistry,
	/// Access to perform API actions as any user if authenticated as administrator
	Sudo,
	/// Access to perform API actions as administrator when Admin Mode is enabled
	AdminMode,
	/// Access to creation of runners
	CreateRunner,
	/// Access to API Action on Gitlab Duo
	AiFeatures,
	/// Access to k8s API call
	K8sFeatures,
}

impl PersonalAccessTokenScope {
	/// The scope as sent by the server.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Api => "api",
			Self::ReadUser => "read_user",
			Self::ReadApi => "read_api",
			Self::ReadRepository => "read_repository",
			Self::WriteRepository => "write_repository",
			Self::ReadRegistry => "read_registry",
			Self::WriteRegistry => "write_registry",
			Self::Sudo => "sudo",
			Self::AdminMode => "admin_mode",
			Self::CreateRunner => "create_runner",
			Self::AiFeatures => "ai_features",
			Self::K8sFeatures => "k8s_features",
		}
	}
}

impl fmt::Display for PersonalAccessTokenScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PersonalAccessTokenScope {
	type Err = Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"api" => Ok(Self::Api),
			"read_user" => Ok(Self::ReadUser),
			"read_api" => Ok(Self::ReadApi),
			"read_repository" => Ok(Self::ReadRepository),
			"write_repository" => Ok(Self::WriteRepository),
			"read_registry" => Ok(Self::ReadRegistry),
			"write_registry" => Ok(Self::WriteRegistry),
			"sudo" => Ok(Self::Sudo),
			"admin_mode" => Ok(Self::AdminMode),
			"create_runner" => Ok(Self::CreateRunner),
			"ai_features" => Ok(Self::AiFeatures),
			"k8s_features" => Ok(Self::K8sFeatures),
			_ => Err(anyhow!("Unknown scope {}", s)),
		}
	}
}

/// A personal access token as listed by the server.
///
/// Fields missing from the payload or set to `null` take their zero value,
/// except the optional ones which stay `None`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct PersonalAccessToken {
	#[serde(deserialize_with = "null_as_default")]
	pub id: u64,
	#[serde(deserialize_with = "null_as_default")]
	pub name: String,
	#[serde(deserialize_with = "null_as_default")]
	pub revoked: bool,
	pub created_at: Option<DateTime<Utc>>,
	/// Raw scopes, unknown ones included.
	#[serde(deserialize_with = "null_as_default")]
	pub scopes: Vec<String>,
	#[serde(deserialize_with = "null_as_default")]
	pub user_id: u64,
	#[serde(rename = "createlast_used_at")]
	pub last_used_at: Option<DateTime<Utc>>,
	#[serde(deserialize_with = "null_as_default")]
	pub active: bool,
	pub expires_at: Option<NaiveDate>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

impl PersonalAccessToken {
	pub fn expired(&self) -> bool {
		if let Some(d) = self.expires_at {
			Utc::now().date_naive() > d
		} else {
			false
		}
	}

	pub fn has_scope(&self, scope: PersonalAccessTokenScope) -> bool {
		self.scopes.iter().any(|s| s == scope.as_str())
	}

	/// The scopes this crate knows about, skipping the others.
	pub fn parsed_scopes(&self) -> Vec<PersonalAccessTokenScope> {
		self.scopes.iter().filter_map(|s| s.parse().ok()).collect()
	}
}

mod args;
mod cmd;
mod config;
mod context;

use crate::{
	args::{Opts, SubCommand},
	cmd::token::cmd as token,
	context::CliContext,
};

use anyhow::Result;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
	let opts: Opts = args::from_env();

	// RUST_LOG takes precedence over --verbose
	let level = if opts.verbose { "debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(
			EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
		)
		.with_writer(std::io::stderr)
		.init();

	let context = CliContext::from_args(&opts)?;
	match &opts.cmd {
		SubCommand::Token(args) => token(&context, args),
	}
}

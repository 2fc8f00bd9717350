use crate::{
    args,
    args::{TokenCmd, TokenList},
    context::CliContext,
};

use anyhow::{bail, Context, Result};
use glpat::{
    api::ListOptions,
    client::{with_sudo, RequestOptionFunc},
    types::PersonalAccessToken,
};
use tracing::debug;

pub fn cmd(context: &CliContext, args: &args::Token) -> Result<()> {
    match &args.cmd {
        TokenCmd::List(args) => {
            let mut options = ListOptions {
                page: args.page,
                per_page: args.per_page,
            };
            let mut tokens = Vec::new();
            loop {
                let request_options: Vec<RequestOptionFunc> =
                    args.sudo.iter().map(|user| with_sudo(user)).collect();
                let (page, response) = context
                    .tokens
                    .list_personal_access_tokens(Some(&options), request_options)
                    .context("Failed to list personal access tokens")?;
                debug!(count = page.len(), pagination = ?response.pagination, "got tokens");
                tokens.extend(page);

                // follow pagination only if requested
                match follow(args.follow, options.page, response.next_page()) {
                    Some(next) => options.page = Some(next),
                    None => break,
                }
            }

            let tokens: Vec<_> = tokens.into_iter().filter(|t| keep(args, t)).collect();
            if tokens.is_empty() {
                bail!("No token found matching criterias");
            } else {
                context.print_tokens(&tokens)?;
            }
        }
    }
    if context.open {
        let _ = open::that(format!(
            "https://{}/-/user_settings/personal_access_tokens",
            context.config.host
        ));
    }
    Ok(())
}

/// Page to request after `current`, only ever moving forward
fn follow(enabled: bool, current: Option<u64>, next: Option<u64>) -> Option<u64> {
    next.filter(|&next| enabled && next > current.unwrap_or(1))
}

/// Whether a token matches the list criterias
fn keep(args: &TokenList, token: &PersonalAccessToken) -> bool {
    let state = if args.revoked {
        token.revoked
    } else {
        args.all || token.active
    };
    state
        && args
            .search
            .as_ref()
            .map_or(true, |search| token.name.contains(search.as_str()))
}

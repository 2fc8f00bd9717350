#[cfg(feature = "color")]
use argh::FromArgValue;
use argh::{FromArgs, TopLevelCommand};
use std::path::Path;

/// Color mode
#[allow(dead_code)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ColorChoice {
    Auto,
    Always,
    Never,
}

#[cfg(feature = "color")]
impl FromArgValue for ColorChoice {
    fn from_arg_value(value: &str) -> Result<Self, String> {
        if value == "auto" {
            Ok(Self::Auto)
        } else if value == "always" {
            Ok(Self::Always)
        } else if value == "never" {
            Ok(Self::Never)
        } else {
            Err(format!(
                "{} not supported for --color. Use either \"auto\", \"always\" or \"never\"",
                value
            ))
        }
    }
}

/// Interact with Gitlab personal access tokens
#[derive(FromArgs)]
pub struct Opts {
    /// configuration file containing gitlab connection parameters
    #[argh(option, short = 'c')]
    pub config: Option<String>,

    /// more detailed output
    #[argh(switch, short = 'v')]
    pub verbose: bool,

    /// try to open links whenever possible
    #[argh(switch, short = 'o')]
    pub open: bool,

    #[cfg(feature = "color")]
    /// color mode: auto (default), always or never
    #[argh(option, default = "ColorChoice::Auto")]
    pub color: ColorChoice,

    #[argh(subcommand)]
    pub cmd: SubCommand,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum SubCommand {
    Token(Token),
}

/// copy of argh::from_env to insert command name and version in help text
pub fn from_env<T: TopLevelCommand>() -> T {
    let args: Vec<String> = std::env::args().collect();
    let cmd = Path::new(&args[0])
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(&args[0]);
    let args_str: Vec<&str> = args.iter().map(|s| s.as_str()).collect();
    T::from_args(&[cmd], &args_str[1..]).unwrap_or_else(|early_exit| {
        println!("{} {}\n", env!("CARGO_BIN_NAME"), env!("CARGO_PKG_VERSION"));
        println!("{}", early_exit.output);
        std::process::exit(match early_exit.status {
            Ok(()) => 0,
            Err(()) => 1,
        })
    })
}

/// Manage user tokens
#[derive(FromArgs)]
#[argh(subcommand, name = "token")]
pub struct Token {
    #[argh(subcommand)]
    /// operate on tokens
    pub cmd: TokenCmd,
}

#[derive(FromArgs)]
#[argh(subcommand)]
pub enum TokenCmd {
    List(TokenList),
}

/// List tokens of the authenticated user
#[derive(FromArgs)]
#[argh(subcommand, name = "list")]
pub struct TokenList {
    /// the page to start listing from
    #[argh(option, short = 'p')]
    pub page: Option<u64>,

    /// the number of tokens per page
    #[argh(option, short = 'n')]
    pub per_page: Option<u64>,

    /// follow pagination until the last page
    #[argh(switch, short = 'f')]
    pub follow: bool,

    /// list the tokens of another user (only for admin)
    #[argh(option, short = 's')]
    pub sudo: Option<String>,

    /// list revoked tokens (implies --all)
    #[argh(switch, short = 'r')]
    pub revoked: bool,

    /// list all tokens (only active ones per default)
    #[argh(switch, short = 'a')]
    pub all: bool,

    /// the pattern of token to search names for
    #[argh(positional)]
    pub search: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_token_list() {
        let opts = Opts::from_args(
            &["glpat"],
            &["-c", "conf.yaml", "token", "list", "-p", "2", "-n", "50", "-f", "-s", "root", "ci"],
        )
        .unwrap();

        assert_eq!(opts.config.as_deref(), Some("conf.yaml"));
        let SubCommand::Token(Token {
            cmd: TokenCmd::List(list),
        }) = opts.cmd;
        assert_eq!(list.page, Some(2));
        assert_eq!(list.per_page, Some(50));
        assert!(list.follow);
        assert_eq!(list.sudo.as_deref(), Some("root"));
        assert!(!list.revoked && !list.all);
        assert_eq!(list.search.as_deref(), Some("ci"));
    }

    #[cfg(feature = "color")]
    #[test]
    fn color_choice() {
        assert_eq!(ColorChoice::from_arg_value("never"), Ok(ColorChoice::Never));
        assert!(ColorChoice::from_arg_value("sometimes").is_err());
    }
}

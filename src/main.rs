use std::ffi::OsString;

use clap::{
    CommandFactory, Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use bumplist::{
    cli::{self, BumpOptions},
    config::{self, Config},
    error, warning,
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    /// Choose the target playlist again instead of using the stored one
    #[clap(long)]
    reset: bool,

    /// Remove the current song from the playlist instead of moving it to the end
    #[clap(short = 'r', long = "remove")]
    remove: bool,

    /// Only report whether the current song is in the playlist
    #[clap(short = 'c', long, conflicts_with = "remove")]
    check: bool,

    /// Print debug logs (overridden by RUST_LOG)
    #[clap(short = 'v', long)]
    verbose: bool,

    /// Print shell completions and exit
    #[clap(long, value_name = "SHELL")]
    completions: Option<Shell>,
}

/// Accepts the single-dash `-reset` spelling as an alias of `--reset`.
fn normalize_args<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            if arg == "-reset" {
                OsString::from("--reset")
            } else {
                arg
            }
        })
        .collect()
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse_from(normalize_args(std::env::args_os()));

    if let Some(shell) = cli.completions {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(shell, &mut cmd, name, &mut std::io::stdout());
        return;
    }

    init_logging(cli.verbose);

    if let Err(e) = config::load_env().await {
        warning!("Cannot load environment file. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let options = BumpOptions {
        reset: cli.reset,
        remove_only: cli.remove,
        check_only: cli.check,
    };

    let run = cli::run(config, options);
    if let Err(e) = cli::until_interrupted(run, tokio::signal::ctrl_c()).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(normalize_args(args.iter().map(OsString::from)))
    }

    #[test]
    fn single_dash_reset_is_accepted() {
        let cli = parse(&["bumplist", "-reset"]).unwrap();
        assert!(cli.reset);
        assert!(!cli.remove);
    }

    #[test]
    fn single_dash_reset_combines_with_remove() {
        let cli = parse(&["bumplist", "-reset", "-r"]).unwrap();
        assert!(cli.reset);
        assert!(cli.remove);
    }

    #[test]
    fn double_dash_reset_still_works() {
        assert!(parse(&["bumplist", "--reset"]).unwrap().reset);
    }

    #[test]
    fn no_flags_means_plain_bump() {
        let cli = parse(&["bumplist"]).unwrap();
        assert!(!cli.reset && !cli.remove && !cli.check);
    }

    #[test]
    fn check_conflicts_with_remove() {
        assert!(parse(&["bumplist", "-c", "-r"]).is_err());
    }

    #[test]
    fn only_exact_reset_is_rewritten() {
        let args = normalize_args(["bumplist", "-resetx", "-r"].map(OsString::from));
        assert_eq!(args, ["bumplist", "-resetx", "-r"].map(OsString::from).to_vec());
    }
}

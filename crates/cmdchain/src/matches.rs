//! [`Context`] view over clap's parsed arguments.
//!
//! clap does the tokenizing and validation; [`MatchesContext`] only answers
//! the three questions a chain asks: which command, which options, which
//! executable.
//!
//! - The command is the name of the first subcommand, or empty when none was
//!   given. External subcommands (see `Command::allow_external_subcommands`)
//!   are reported by name, so unknown commands reach the chain's fallback.
//! - An option is present when it was set on the command line or from the
//!   environment, either on the root command or on the invoked subcommand.
//!   Values filled in from defaults do not count.
//!
//! For the built-in help trigger to see `-h` / `--help`, disable clap's own
//! help flag and declare an argument with id `h` (or `-help`) instead. Mark it
//! `.global(true)`: otherwise clap rejects `-h` after a subcommand and it never
//! reaches the chain's help fallback.

use clap::parser::ValueSource;
use clap::ArgMatches;

use crate::context::{Context, Options};

/// A [`Context`] backed by `clap::ArgMatches`.
///
/// # Example
///
/// ```rust
/// use clap::{Arg, ArgAction, Command};
/// use cmdchain::{Context, MatchesContext};
///
/// let cmd = Command::new("notes")
///     .disable_help_flag(true)
///     .arg(
///         Arg::new("h")
///             .short('h')
///             .long("help")
///             .action(ArgAction::SetTrue)
///             .global(true),
///     )
///     .subcommand(Command::new("list"));
///
/// let matches = cmd.try_get_matches_from(["notes", "list", "-h"]).unwrap();
/// let ctx = MatchesContext::new("notes", &matches);
///
/// assert_eq!(ctx.command(), "list");
/// assert!(ctx.options().contains("h"));
/// ```
#[derive(Debug, Clone)]
pub struct MatchesContext<'a> {
    executable: String,
    command: String,
    options: MatchedOptions<'a>,
}

impl<'a> MatchesContext<'a> {
    /// Creates a context for `executable` from its parsed matches.
    pub fn new(executable: impl Into<String>, matches: &'a ArgMatches) -> Self {
        let mut scopes = vec![matches];
        let command = match matches.subcommand() {
            Some((name, sub)) => {
                scopes.push(sub);
                name.to_string()
            }
            None => String::new(),
        };

        Self {
            executable: executable.into(),
            command,
            options: MatchedOptions { scopes },
        }
    }

    /// Returns the matches of the invoked subcommand, if there is one.
    pub fn subcommand_matches(&self) -> Option<&'a ArgMatches> {
        self.options.scopes.get(1).copied()
    }
}

impl Context for MatchesContext<'_> {
    fn command(&self) -> &str {
        &self.command
    }

    fn options(&self) -> &dyn Options {
        &self.options
    }

    fn executable(&self) -> &str {
        &self.executable
    }
}

/// Options looked up across the root and subcommand matches.
#[derive(Debug, Clone)]
struct MatchedOptions<'a> {
    scopes: Vec<&'a ArgMatches>,
}

impl Options for MatchedOptions<'_> {
    fn is_any(&self, names: &[&str]) -> bool {
        names
            .iter()
            .any(|name| self.scopes.iter().any(|m| explicitly_set(m, name)))
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.scopes
            .iter()
            .rev()
            .filter(|m| explicitly_set(m, name))
            .find_map(|m| m.try_get_one::<String>(name).ok().flatten())
            .map(String::as_str)
    }
}

/// Returns true if `name` is a known id in `matches` and was not defaulted.
fn explicitly_set(matches: &ArgMatches, name: &str) -> bool {
    if !matches.ids().any(|id| id.as_str() == name) {
        return false;
    }
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine) | Some(ValueSource::EnvVariable)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{Arg, ArgAction, Command};

    fn cli() -> Command {
        Command::new("app")
            .disable_help_flag(true)
            .disable_help_subcommand(true)
            .allow_external_subcommands(true)
            .arg(
                Arg::new("h")
                    .short('h')
                    .long("help")
                    .action(ArgAction::SetTrue)
                    .global(true),
            )
            .arg(
                Arg::new("format")
                    .long("format")
                    .default_value("text"),
            )
            .subcommand(
                Command::new("add")
                    .arg(Arg::new("text").required(true))
                    .arg(Arg::new("pin").long("pin").action(ArgAction::SetTrue)),
            )
            .subcommand(Command::new("list"))
    }

    #[test]
    fn test_no_subcommand_is_empty_command() {
        let matches = cli().try_get_matches_from(["app"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert_eq!(ctx.command(), "");
        assert_eq!(ctx.executable(), "app");
        assert!(ctx.subcommand_matches().is_none());
    }

    #[test]
    fn test_subcommand_name() {
        let matches = cli().try_get_matches_from(["app", "list"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert_eq!(ctx.command(), "list");
        assert!(ctx.subcommand_matches().is_some());
    }

    #[test]
    fn test_external_subcommand_name() {
        let matches = cli().try_get_matches_from(["app", "frobnicate"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert_eq!(ctx.command(), "frobnicate");
    }

    #[test]
    fn test_unset_flag_not_present() {
        let matches = cli().try_get_matches_from(["app", "add", "milk"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert!(!ctx.options().is_any(&["h", "pin"]));
    }

    #[test]
    fn test_default_value_not_present() {
        let matches = cli().try_get_matches_from(["app", "list"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert!(!ctx.options().contains("format"));
        assert_eq!(ctx.options().value("format"), None);
    }

    #[test]
    fn test_explicit_option_present_with_value() {
        let matches = cli()
            .try_get_matches_from(["app", "--format", "json", "list"])
            .unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert!(ctx.options().contains("format"));
        assert_eq!(ctx.options().value("format"), Some("json"));
    }

    #[test]
    fn test_subcommand_flags_and_positionals() {
        let matches = cli()
            .try_get_matches_from(["app", "add", "--pin", "milk"])
            .unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert!(ctx.options().contains("pin"));
        assert_eq!(ctx.options().value("text"), Some("milk"));
    }

    #[test]
    fn test_help_flag_short_and_long() {
        for args in [["app", "list", "-h"], ["app", "list", "--help"]] {
            let matches = cli().try_get_matches_from(args).unwrap();
            let ctx = MatchesContext::new("app", &matches);
            assert!(ctx.options().is_any(&["h", "-help"]), "args: {:?}", args);
        }
    }

    #[test]
    fn test_non_global_help_flag_rejected_after_subcommand() {
        let local = Command::new("app")
            .disable_help_flag(true)
            .arg(Arg::new("h").short('h').action(ArgAction::SetTrue))
            .subcommand(Command::new("list"));
        assert!(local.try_get_matches_from(["app", "list", "-h"]).is_err());

        let matches = cli().try_get_matches_from(["app", "list", "-h"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert_eq!(ctx.command(), "list");
        assert!(ctx.options().contains("h"));
    }

    #[test]
    fn test_unknown_option_name_is_absent() {
        let matches = cli().try_get_matches_from(["app", "list"]).unwrap();
        let ctx = MatchesContext::new("app", &matches);
        assert!(!ctx.options().contains("no-such-arg"));
        assert_eq!(ctx.options().value("no-such-arg"), None);
    }
}

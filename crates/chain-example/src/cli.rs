//! Argument parsing and command wiring.
//!
//! clap turns the process arguments into `ArgMatches`; everything after that
//! goes through the handler chain built in [`chain`].

use std::ffi::OsString;

use anyhow::{bail, Context as _, Result};
use clap::{Arg, ArgAction, Command};
use cmdchain::predicate::{name, option, PredicateExt};
use cmdchain::{Chain, Context, Handler, MatchesContext};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Name the binary reports in usage and error text.
pub const EXECUTABLE: &str = "calc";

/// Installs a stderr log subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn binary(name: &'static str) -> Command {
    Command::new(name)
        .arg(Arg::new("a").required(true).allow_negative_numbers(true))
        .arg(Arg::new("b").required(true).allow_negative_numbers(true))
}

/// The clap definition.
///
/// clap's own help handling is turned off so `-h`, `--help` and `help` reach
/// the chain's usage fallback, and unknown subcommands reach its
/// unknown-command error.
pub fn command() -> Command {
    Command::new(EXECUTABLE)
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
        .subcommand(binary("add"))
        .subcommand(binary("sub"))
        .subcommand(binary("mul"))
        .subcommand(
            binary("div").arg(
                Arg::new("r")
                    .short('r')
                    .long("remainder")
                    .action(ArgAction::SetTrue),
            ),
        )
        .subcommand(Command::new("version"))
}

fn operand(ctx: &dyn Context, id: &str) -> Result<i64> {
    let raw = ctx
        .options()
        .value(id)
        .with_context(|| format!("missing operand <{}>", id))?;
    raw.parse()
        .with_context(|| format!("operand <{}> is not an integer: {}", id, raw))
}

fn operands(ctx: &dyn Context) -> Result<(i64, i64)> {
    Ok((operand(ctx, "a")?, operand(ctx, "b")?))
}

fn division_operands(ctx: &dyn Context) -> Result<(i64, i64)> {
    let (a, b) = operands(ctx)?;
    if b == 0 {
        bail!("division by zero");
    }
    Ok((a, b))
}

/// The command tree.
pub fn chain() -> Chain {
    let arithmetic = Chain::new()
        .with_usage("arithmetic:")
        .add(Handler::command(
            "add",
            |ctx: &dyn Context| {
                let (a, b) = operands(ctx)?;
                Ok(a.checked_add(b).context("overflow")?.to_string())
            },
            "  add <a> <b>       sum",
        ))
        .add(Handler::command(
            "sub",
            |ctx: &dyn Context| {
                let (a, b) = operands(ctx)?;
                Ok(a.checked_sub(b).context("overflow")?.to_string())
            },
            "  sub <a> <b>       difference",
        ))
        .add(Handler::command(
            "mul",
            |ctx: &dyn Context| {
                let (a, b) = operands(ctx)?;
                Ok(a.checked_mul(b).context("overflow")?.to_string())
            },
            "  mul <a> <b>       product",
        ))
        .add(Handler::new(
            name("div").and(option(["r", "-remainder"])),
            |ctx: &dyn Context| {
                let (a, b) = division_operands(ctx)?;
                let quotient = a.checked_div(b).context("overflow")?;
                let remainder = a.checked_rem(b).context("overflow")?;
                Ok(format!("{} r {}", quotient, remainder))
            },
            "  div -r <a> <b>    quotient and remainder",
        ))
        .add(Handler::command(
            "div",
            |ctx: &dyn Context| {
                let (a, b) = division_operands(ctx)?;
                Ok(a.checked_div(b).context("overflow")?.to_string())
            },
            "  div <a> <b>       integer quotient",
        ));

    Chain::new()
        .with_usage("calc - integer arithmetic")
        .add(arithmetic)
        .add(Handler::command(
            "version",
            |_: &dyn Context| Ok(env!("CARGO_PKG_VERSION").to_string()),
            "version             print the version",
        ))
}

/// Parses `args` and dispatches them, returning the text to print.
pub fn execute<I, T>(args: I) -> Result<String>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let matches = command().try_get_matches_from(args)?;
    let ctx = MatchesContext::new(EXECUTABLE, &matches);
    debug!(command = ctx.command(), "parsed invocation");
    let output = chain().dispatch(&ctx)?;
    Ok(output)
}

/// Runs the CLI and prints the result.
pub fn run<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let output = execute(args)?;
    println!("{}", output);
    Ok(())
}

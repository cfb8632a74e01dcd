//! Predicate-guarded handler chains for command dispatch.
//!
//! `cmdchain` routes one parsed command invocation to the first handler whose
//! predicate accepts it. When nothing accepts it, the chain either prints
//! generated usage text (for help requests) or reports an unknown command.
//! Parsing the process arguments is left to the caller; the chain only sees a
//! [`Context`].
//!
//! # Features
//!
//! - **Predicates**: composable `and` / `or` / `not` over command name and
//!   option presence (see [`predicate`])
//! - **Handlers**: a predicate, an action and a usage line
//! - **Chains**: ordered entries, nested chains, generated usage text
//! - **Clap integration**: [`MatchesContext`] reads `clap::ArgMatches`
//!
//! # Example
//!
//! ```rust
//! use cmdchain::predicate::{name, option, PredicateExt};
//! use cmdchain::{Chain, Context, Handler, Invocation};
//!
//! let remotes = Chain::new()
//!     .with_usage("remote commands:")
//!     .add(Handler::command("push", |_: &dyn Context| Ok("pushed".into()), "  push"))
//!     .add(Handler::command("pull", |_: &dyn Context| Ok("pulled".into()), "  pull"));
//!
//! let app = Chain::new()
//!     .with_usage("vault - a tiny store")
//!     .add(Handler::new(
//!         name("status").and(option(["s", "-short"])),
//!         |_: &dyn Context| Ok("clean".into()),
//!         "status -s  short status",
//!     ))
//!     .add(remotes);
//!
//! let ctx = Invocation::new("vault").with_command("pull");
//! assert_eq!(app.dispatch(&ctx).unwrap(), "pulled");
//!
//! let ctx = Invocation::new("vault").with_command("status");
//! assert!(app.dispatch(&ctx).unwrap_err().is_unknown_command());
//! ```
//!
//! # Logging
//!
//! Dispatch decisions are reported through `tracing` at `debug` and `trace`
//! level. The crate never installs a subscriber.

// Core modules
mod chain;
mod context;
mod error;
mod handler;
mod matches;
pub mod predicate;

pub use chain::Chain;

pub use context::{Context, Invocation, OptionSet, Options};

pub use error::DispatchError;

pub use handler::{Action, Attempt, Dispatchable, FnAction, Handler, IntoActionResult};

pub use matches::MatchesContext;

pub use predicate::{Predicate, PredicateExt, SharedPredicate};

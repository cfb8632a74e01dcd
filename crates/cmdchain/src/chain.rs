//! Ordered handler chains.
//!
//! A [`Chain`] tries its entries in registration order and stops at the first
//! one that handles the invocation. Entries are anything [`Dispatchable`]:
//! plain [`Handler`](crate::Handler)s or other chains, so command groups nest
//! without special cases.
//!
//! # Dispatch Flow
//!
//! ```text
//! dispatch(ctx)
//!   → entry 1 .. entry n     first non-continue result wins
//!   → all continued?
//!       help requested       → usage text, Ok
//!       otherwise            → DispatchError::UnknownCommand
//! ```
//!
//! Only the chain `dispatch` is called on runs the fallback. A nested chain
//! that runs out of entries reports [`Attempt::Continue`] to its parent, which
//! moves on to its own next entry.
//!
//! # Usage Text
//!
//! [`Dispatchable::usage_text`] on a chain is its leading line followed by
//! every entry's usage text, one per line, in registration order. The help
//! fallback prints:
//!
//! ```text
//! <leading line>
//! Usage for <executable>:
//! <entry usage>
//! <entry usage>
//! ```

use std::fmt;

use tracing::{debug, trace};

use crate::context::Context;
use crate::error::DispatchError;
use crate::handler::{Attempt, Dispatchable};
use crate::predicate::{help_requested, shared, Predicate, SharedPredicate};

/// An ordered list of dispatchable entries with usage fallback.
///
/// # Example
///
/// ```rust
/// use cmdchain::{Chain, Context, Handler, Invocation};
///
/// let chain = Chain::new()
///     .with_usage("notes - keep short notes")
///     .add(Handler::command("add", |_: &dyn Context| Ok("added".into()), "add     add a note"))
///     .add(Handler::command("list", |_: &dyn Context| Ok("(none)".into()), "list    list notes"));
///
/// let out = chain.dispatch(&Invocation::new("notes").with_command("add")).unwrap();
/// assert_eq!(out, "added");
///
/// let help = chain.dispatch(&Invocation::new("notes")).unwrap();
/// assert_eq!(
///     help,
///     "notes - keep short notes\nUsage for notes:\nadd     add a note\nlist    list notes"
/// );
///
/// let err = chain.dispatch(&Invocation::new("notes").with_command("rm")).unwrap_err();
/// assert_eq!(err.to_string(), "notes rm: unknown command");
/// ```
pub struct Chain {
    usage: String,
    entries: Vec<Box<dyn Dispatchable>>,
    help: SharedPredicate,
}

impl Chain {
    /// Creates an empty chain with no leading usage line.
    pub fn new() -> Self {
        Self {
            usage: String::new(),
            entries: Vec::new(),
            help: shared(help_requested()),
        }
    }

    /// Creates a chain from already boxed entries.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Dispatchable>>,
    {
        Self::new().extend(entries)
    }

    /// Appends an entry.
    pub fn add<D: Dispatchable + 'static>(mut self, entry: D) -> Self {
        self.push(entry);
        self
    }

    /// Appends an entry in place.
    pub fn push<D: Dispatchable + 'static>(&mut self, entry: D) {
        self.entries.push(Box::new(entry));
    }

    /// Appends several already boxed entries.
    pub fn extend<I>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Dispatchable>>,
    {
        self.entries.extend(entries);
        self
    }

    /// Sets the chain's leading usage line.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Replaces the predicate that turns an unmatched invocation into a
    /// help request.
    ///
    /// Defaults to [`help_requested`]: no command, the `help` command, or an
    /// `h` / `-help` flag.
    pub fn with_help_trigger<P: Predicate + 'static>(mut self, trigger: P) -> Self {
        self.help = shared(trigger);
        self
    }

    /// Returns the number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the chain has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Dispatches one invocation.
    ///
    /// Returns the first matching entry's result. When nothing matches,
    /// returns generated usage text for help requests and
    /// [`DispatchError::UnknownCommand`] otherwise.
    pub fn dispatch(&self, ctx: &dyn Context) -> Result<String, DispatchError> {
        match self.attempt(ctx) {
            Attempt::Handled(result) => {
                debug!(
                    command = ctx.command(),
                    ok = result.is_ok(),
                    "command dispatched"
                );
                result.map_err(DispatchError::Action)
            }
            Attempt::Continue => self.fallback(ctx),
        }
    }

    /// Usage text shown for help requests against this chain.
    pub fn help_text(&self, executable: &str) -> String {
        format!(
            "{}\nUsage for {}:\n{}",
            self.usage,
            executable,
            self.entries_usage()
        )
    }

    fn fallback(&self, ctx: &dyn Context) -> Result<String, DispatchError> {
        if self.help.evaluate(ctx) {
            debug!(
                command = ctx.command(),
                executable = ctx.executable(),
                "no handler matched, showing usage"
            );
            return Ok(self.help_text(ctx.executable()));
        }

        debug!(
            command = ctx.command(),
            executable = ctx.executable(),
            "unknown command"
        );
        Err(DispatchError::unknown_command(
            ctx.executable(),
            ctx.command(),
        ))
    }

    fn entries_usage(&self) -> String {
        self.entries
            .iter()
            .map(|entry| entry.usage_text())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Chain {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatchable for Chain {
    fn attempt(&self, ctx: &dyn Context) -> Attempt {
        for (index, entry) in self.entries.iter().enumerate() {
            match entry.attempt(ctx) {
                Attempt::Continue => {
                    trace!(index, "entry continued");
                }
                handled => {
                    trace!(index, "entry handled invocation");
                    return handled;
                }
            }
        }
        Attempt::Continue
    }

    fn usage_text(&self) -> String {
        std::iter::once(self.usage.clone())
            .chain(self.entries.iter().map(|entry| entry.usage_text()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("usage", &self.usage)
            .field("entries", &self.entries.len())
            .finish_non_exhaustive()
    }
}

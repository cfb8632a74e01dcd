//! Command handler types.
//!
//! A [`Handler`] pairs a [`Predicate`] with an [`Action`] and a line of usage
//! text. The predicate decides whether the handler applies; the action does
//! the actual work. Handlers are built once while wiring the command tree and
//! are read-only afterwards.
//!
//! # Core Types
//!
//! - [`Action`]: the command behavior, `&dyn Context -> anyhow::Result<String>`
//! - [`Attempt`]: what trying an entry produced (handled, or continue)
//! - [`Dispatchable`]: anything a [`Chain`](crate::Chain) can hold
//! - [`Handler`]: the predicate-guarded leaf entry
//!
//! # Continue Is Not an Error
//!
//! When a handler's predicate does not match, [`Handler::attempt`] returns
//! [`Attempt::Continue`]. That variant only tells the owning chain to move on;
//! it never reaches the caller of [`Chain::dispatch`](crate::Chain::dispatch).

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::context::Context;
use crate::predicate::{name, shared, Predicate, SharedPredicate};

/// The behavior run when a handler's predicate matches.
///
/// Closures of the form `Fn(&dyn Context) -> anyhow::Result<String>` are
/// actions. For closures returning other result types, wrap them with
/// [`FnAction`].
pub trait Action: Send + Sync {
    /// Runs the action.
    fn execute(&self, ctx: &dyn Context) -> anyhow::Result<String>;
}

impl<F> Action for F
where
    F: Fn(&dyn Context) -> anyhow::Result<String> + Send + Sync,
{
    fn execute(&self, ctx: &dyn Context) -> anyhow::Result<String> {
        self(ctx)
    }
}

/// Conversion into the result an [`Action`] returns.
///
/// Lets [`FnAction`] closures return `Result<S, E>` for any message type
/// convertible to `String` and any error convertible to `anyhow::Error`, or
/// a bare message when they cannot fail.
///
/// ```rust
/// use cmdchain::IntoActionResult;
///
/// let ok: Result<&str, std::io::Error> = Ok("done");
/// assert_eq!(ok.into_action_result().unwrap(), "done");
///
/// let plain = String::from("done");
/// assert_eq!(plain.into_action_result().unwrap(), "done");
/// ```
pub trait IntoActionResult {
    /// Converts into `anyhow::Result<String>`.
    fn into_action_result(self) -> anyhow::Result<String>;
}

impl<S, E> IntoActionResult for Result<S, E>
where
    S: Into<String>,
    E: Into<anyhow::Error>,
{
    fn into_action_result(self) -> anyhow::Result<String> {
        self.map(Into::into).map_err(Into::into)
    }
}

impl IntoActionResult for String {
    fn into_action_result(self) -> anyhow::Result<String> {
        Ok(self)
    }
}

impl IntoActionResult for &'static str {
    fn into_action_result(self) -> anyhow::Result<String> {
        Ok(self.to_string())
    }
}

/// An [`Action`] wrapping a closure with a flexible return type.
///
/// # Example
///
/// ```rust
/// use cmdchain::{Action, Context, FnAction, Invocation};
///
/// let action = FnAction::new(|ctx: &dyn Context| format!("hi from {}", ctx.executable()));
/// let ctx = Invocation::new("app");
/// assert_eq!(action.execute(&ctx).unwrap(), "hi from app");
///
/// let fallible = FnAction::new(|_: &dyn Context| "42".parse::<u8>().map(|n| n.to_string()));
/// assert_eq!(fallible.execute(&ctx).unwrap(), "42");
/// ```
pub struct FnAction<F, R> {
    f: F,
    _phantom: PhantomData<fn() -> R>,
}

impl<F, R> FnAction<F, R>
where
    F: Fn(&dyn Context) -> R + Send + Sync,
    R: IntoActionResult,
{
    /// Creates a new FnAction wrapping the given closure.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, R> Action for FnAction<F, R>
where
    F: Fn(&dyn Context) -> R + Send + Sync,
    R: IntoActionResult,
{
    fn execute(&self, ctx: &dyn Context) -> anyhow::Result<String> {
        (self.f)(ctx).into_action_result()
    }
}

/// Outcome of trying one entry of a chain.
#[must_use]
#[derive(Debug)]
pub enum Attempt {
    /// The entry matched; carries the action's result, untouched.
    Handled(anyhow::Result<String>),
    /// The entry did not match; the chain should try the next one.
    Continue,
}

impl Attempt {
    /// Returns true if an entry handled the invocation.
    pub fn is_handled(&self) -> bool {
        matches!(self, Attempt::Handled(_))
    }

    /// Returns true if nothing matched.
    pub fn is_continue(&self) -> bool {
        matches!(self, Attempt::Continue)
    }

    /// Returns the action result, or `None` on continue.
    pub fn into_result(self) -> Option<anyhow::Result<String>> {
        match self {
            Attempt::Handled(result) => Some(result),
            Attempt::Continue => None,
        }
    }
}

/// An entry a chain can try and ask for usage text.
///
/// Implemented by [`Handler`] and by [`Chain`](crate::Chain), so chains nest.
pub trait Dispatchable: Send + Sync {
    /// Tries to handle the invocation.
    fn attempt(&self, ctx: &dyn Context) -> Attempt;

    /// Usage text describing this entry.
    fn usage_text(&self) -> String;
}

impl<D: Dispatchable + ?Sized> Dispatchable for Box<D> {
    fn attempt(&self, ctx: &dyn Context) -> Attempt {
        (**self).attempt(ctx)
    }

    fn usage_text(&self) -> String {
        (**self).usage_text()
    }
}

impl<D: Dispatchable + ?Sized> Dispatchable for Arc<D> {
    fn attempt(&self, ctx: &dyn Context) -> Attempt {
        (**self).attempt(ctx)
    }

    fn usage_text(&self) -> String {
        (**self).usage_text()
    }
}

/// A predicate-guarded action with its usage line.
///
/// # Example
///
/// ```rust
/// use cmdchain::{Context, Dispatchable, Handler, Invocation};
///
/// let version = Handler::command(
///     "version",
///     |_: &dyn Context| Ok("1.0.0".to_string()),
///     "version    print the version",
/// );
///
/// let ctx = Invocation::new("app").with_command("version");
/// assert_eq!(version.attempt(&ctx).into_result().unwrap().unwrap(), "1.0.0");
///
/// let other = Invocation::new("app").with_command("list");
/// assert!(version.attempt(&other).is_continue());
/// ```
#[derive(Clone)]
pub struct Handler {
    predicate: SharedPredicate,
    action: Arc<dyn Action>,
    usage: String,
}

impl Handler {
    /// Creates a handler from a predicate, an action closure and a usage line.
    pub fn new<P, F>(predicate: P, action: F, usage: impl Into<String>) -> Self
    where
        P: Predicate + 'static,
        F: Fn(&dyn Context) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self::with_action(predicate, action, usage)
    }

    /// Creates a handler from a predicate and any [`Action`] implementation.
    pub fn with_action<P, A>(predicate: P, action: A, usage: impl Into<String>) -> Self
    where
        P: Predicate + 'static,
        A: Action + 'static,
    {
        Self {
            predicate: shared(predicate),
            action: Arc::new(action),
            usage: usage.into(),
        }
    }

    /// Creates a handler for the command called `command`.
    pub fn command<F>(command: impl Into<String>, action: F, usage: impl Into<String>) -> Self
    where
        F: Fn(&dyn Context) -> anyhow::Result<String> + Send + Sync + 'static,
    {
        Self::new(name(command), action, usage)
    }

    /// Replaces the usage line.
    pub fn with_usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }

    /// Returns true if this handler applies to `ctx`.
    pub fn matches(&self, ctx: &dyn Context) -> bool {
        self.predicate.evaluate(ctx)
    }
}

impl Dispatchable for Handler {
    fn attempt(&self, ctx: &dyn Context) -> Attempt {
        if self.matches(ctx) {
            Attempt::Handled(self.action.execute(ctx))
        } else {
            Attempt::Continue
        }
    }

    fn usage_text(&self) -> String {
        self.usage.clone()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("usage", &self.usage)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Invocation;
    use crate::predicate::option;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Debug, thiserror::Error)]
    #[error("disk full")]
    struct DiskFull;

    fn counting_action(
        calls: Arc<AtomicUsize>,
    ) -> impl Fn(&dyn Context) -> anyhow::Result<String> + Send + Sync {
        move |ctx: &dyn Context| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("ran {}", ctx.command()))
        }
    }

    #[test]
    fn test_attempt_continue_when_predicate_false() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = Handler::command("add", counting_action(calls.clone()), "add");

        let attempt = handler.attempt(&Invocation::new("app").with_command("rm"));
        assert!(attempt.is_continue());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_attempt_runs_action_once_when_matched() {
        let calls = Arc::new(AtomicUsize::new(0));
        let handler = Handler::command("add", counting_action(calls.clone()), "add");

        let attempt = handler.attempt(&Invocation::new("app").with_command("add"));
        assert!(attempt.is_handled());
        assert_eq!(attempt.into_result().unwrap().unwrap(), "ran add");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_action_error_passes_through() {
        let handler = Handler::command(
            "save",
            |_: &dyn Context| Err(anyhow::Error::new(DiskFull)),
            "save",
        );

        let err = handler
            .attempt(&Invocation::new("app").with_command("save"))
            .into_result()
            .unwrap()
            .unwrap_err();
        assert!(err.downcast_ref::<DiskFull>().is_some());
        assert_eq!(err.to_string(), "disk full");
    }

    #[test]
    fn test_usage_text_unchanged() {
        let handler = Handler::new(
            option(["v"]),
            |_: &dyn Context| Ok(String::new()),
            "  -v    be verbose  ",
        );
        assert_eq!(handler.usage_text(), "  -v    be verbose  ");
    }

    #[test]
    fn test_with_usage_replaces() {
        let handler = Handler::command("x", |_: &dyn Context| Ok(String::new()), "old")
            .with_usage("new");
        assert_eq!(handler.usage_text(), "new");
    }

    #[test]
    fn test_fn_action_result_types() {
        let ctx = Invocation::new("app");

        let plain = FnAction::new(|_: &dyn Context| "static");
        assert_eq!(plain.execute(&ctx).unwrap(), "static");

        let typed = FnAction::new(|_: &dyn Context| Err::<String, _>(DiskFull));
        let err = typed.execute(&ctx).unwrap_err();
        assert!(err.is::<DiskFull>());
    }

    #[test]
    fn test_with_action_accepts_wrapped_closure() {
        let handler = Handler::with_action(
            name("greet"),
            FnAction::new(|ctx: &dyn Context| format!("hello {}", ctx.executable())),
            "greet",
        );
        let result = handler
            .attempt(&Invocation::new("app").with_command("greet"))
            .into_result()
            .unwrap();
        assert_eq!(result.unwrap(), "hello app");
    }

    #[test]
    fn test_boxed_and_arc_dispatchable() {
        let handler = Handler::command("x", |_: &dyn Context| Ok("x".to_string()), "x");
        let boxed: Box<dyn Dispatchable> = Box::new(handler.clone());
        let shared: Arc<dyn Dispatchable> = Arc::new(handler);
        let ctx = Invocation::new("app").with_command("x");

        assert!(boxed.attempt(&ctx).is_handled());
        assert!(shared.attempt(&ctx).is_handled());
        assert_eq!(boxed.usage_text(), "x");
    }

    #[test]
    fn test_handler_debug_shows_usage() {
        let handler = Handler::command("x", |_: &dyn Context| Ok(String::new()), "x  do x");
        assert!(format!("{:?}", handler).contains("x  do x"));
    }
}

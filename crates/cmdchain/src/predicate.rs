//! Predicate combinators.
//!
//! A [`Predicate`] decides whether a handler applies to an invocation. It
//! reads the [`Context`] and nothing else: no side effects, same answer for
//! the same context. That makes predicates safe to evaluate repeatedly and
//! in any order the chain needs.
//!
//! # Building Blocks
//!
//! | Constructor | True when |
//! |-------------|-----------|
//! | [`name`] | the invoked command equals the given name exactly |
//! | [`option`] | any of the given option flags is present |
//! | [`and`] | every predicate holds (short-circuits on the first `false`) |
//! | [`or`] | some predicate holds (short-circuits on the first `true`) |
//! | [`not`] | the inner predicate does not hold |
//!
//! Closures of the form `Fn(&dyn Context) -> bool` are predicates too.
//!
//! ```rust
//! use cmdchain::predicate::{name, option, PredicateExt};
//! use cmdchain::{Invocation, Predicate};
//!
//! let verbose_list = name("list").and(option(["v", "-verbose"]));
//!
//! let ctx = Invocation::new("app").with_command("list").with_flag("v");
//! assert!(verbose_list.evaluate(&ctx));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::Context;

/// A pure test over an invocation context.
pub trait Predicate: Send + Sync {
    /// Evaluates the predicate against `ctx`.
    fn evaluate(&self, ctx: &dyn Context) -> bool;
}

impl<F> Predicate for F
where
    F: Fn(&dyn Context) -> bool + Send + Sync,
{
    fn evaluate(&self, ctx: &dyn Context) -> bool {
        self(ctx)
    }
}

/// A type-erased predicate behind an `Arc`, cheap to clone and share.
pub type SharedPredicate = Arc<dyn Predicate>;

/// Erases a predicate's type behind an `Arc` so it can sit in a list next
/// to others and be shared between chains.
pub fn shared<P: Predicate + 'static>(predicate: P) -> SharedPredicate {
    Arc::new(predicate)
}

/// Conjunction of predicates, evaluated left to right.
///
/// An empty conjunction is `true`.
#[derive(Clone, Default)]
pub struct And {
    predicates: Vec<SharedPredicate>,
}

impl Predicate for And {
    fn evaluate(&self, ctx: &dyn Context) -> bool {
        self.predicates.iter().all(|p| p.evaluate(ctx))
    }
}

impl fmt::Debug for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("And")
            .field("len", &self.predicates.len())
            .finish()
    }
}

/// Disjunction of predicates, evaluated left to right.
///
/// An empty disjunction is `false`.
#[derive(Clone, Default)]
pub struct Or {
    predicates: Vec<SharedPredicate>,
}

impl Predicate for Or {
    fn evaluate(&self, ctx: &dyn Context) -> bool {
        self.predicates.iter().any(|p| p.evaluate(ctx))
    }
}

impl fmt::Debug for Or {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Or")
            .field("len", &self.predicates.len())
            .finish()
    }
}

/// Negation of a predicate.
#[derive(Clone)]
pub struct Not {
    inner: SharedPredicate,
}

impl Predicate for Not {
    fn evaluate(&self, ctx: &dyn Context) -> bool {
        !self.inner.evaluate(ctx)
    }
}

impl fmt::Debug for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Not").finish_non_exhaustive()
    }
}

/// Matches one command name exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Name {
    name: String,
}

impl Predicate for Name {
    fn evaluate(&self, ctx: &dyn Context) -> bool {
        ctx.command() == self.name
    }
}

/// Matches when any of a set of option flags is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnyOption {
    names: Vec<String>,
}

impl Predicate for AnyOption {
    fn evaluate(&self, ctx: &dyn Context) -> bool {
        let names: Vec<&str> = self.names.iter().map(String::as_str).collect();
        ctx.options().is_any(&names)
    }
}

/// All of `predicates` must hold.
pub fn and<I>(predicates: I) -> And
where
    I: IntoIterator<Item = SharedPredicate>,
{
    And {
        predicates: predicates.into_iter().collect(),
    }
}

/// At least one of `predicates` must hold.
pub fn or<I>(predicates: I) -> Or
where
    I: IntoIterator<Item = SharedPredicate>,
{
    Or {
        predicates: predicates.into_iter().collect(),
    }
}

/// Inverts `predicate`.
pub fn not<P: Predicate + 'static>(predicate: P) -> Not {
    Not {
        inner: shared(predicate),
    }
}

/// The invoked command is exactly `name` (case-sensitive, untrimmed).
pub fn name(name: impl Into<String>) -> Name {
    Name { name: name.into() }
}

/// Any of `names` is present among the invocation's options.
pub fn option<I, S>(names: I) -> AnyOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    AnyOption {
        names: names.into_iter().map(Into::into).collect(),
    }
}

/// The built-in help trigger: no command, the `help` command, or the
/// `h` / `-help` flag.
pub fn help_requested() -> Or {
    or([
        shared(name("")),
        shared(name("help")),
        shared(option(["h", "-help"])),
    ])
}

/// Method-style composition for any predicate.
pub trait PredicateExt: Predicate + Sized + 'static {
    /// `self` and then `other`.
    fn and<P: Predicate + 'static>(self, other: P) -> And {
        and([shared(self), shared(other)])
    }

    /// `self` or else `other`.
    fn or<P: Predicate + 'static>(self, other: P) -> Or {
        or([shared(self), shared(other)])
    }

    /// Erases the concrete type.
    fn shared(self) -> SharedPredicate {
        shared(self)
    }
}

impl<P: Predicate + Sized + 'static> PredicateExt for P {}

//! Invocation context consumed by predicates and actions.
//!
//! A [`Context`] is the parsed form of one command-line invocation: the
//! command name, the options that were passed, and the name of the
//! executable. The chain never builds one itself; whoever parses the
//! process arguments owns it and hands out a shared reference for the
//! duration of a single dispatch.
//!
//! Two implementations ship with the crate:
//!
//! - [`Invocation`]: an owned, in-memory context. Handy for tests and for
//!   callers that parse arguments themselves.
//! - [`MatchesContext`](crate::MatchesContext): a view over `clap::ArgMatches`.

use std::collections::BTreeMap;
use std::fmt;

/// Option flags of an invocation.
pub trait Options {
    /// Returns `true` if **any** of `names` is present.
    fn is_any(&self, names: &[&str]) -> bool;

    /// Returns `true` if `name` is present.
    fn contains(&self, name: &str) -> bool {
        self.is_any(&[name])
    }

    /// Returns the value given for `name`, if it carries one.
    fn value(&self, _name: &str) -> Option<&str> {
        None
    }
}

/// The parsed invocation a chain dispatches on.
///
/// Implementations must not change between calls during one dispatch;
/// predicates rely on seeing the same answers every time they ask.
pub trait Context {
    /// The invoked command name. Empty when no command was given.
    fn command(&self) -> &str;

    /// The option flags passed with the invocation.
    fn options(&self) -> &dyn Options;

    /// Name of the invoking executable, used in usage and error text.
    fn executable(&self) -> &str;
}

/// An owned invocation context.
///
/// Options map a flag name to an optional value. Flag names are stored
/// exactly as given, so a long flag parsed as `-help` stays `-help`.
///
/// # Example
///
/// ```rust
/// use cmdchain::{Context, Invocation, Options};
///
/// let ctx = Invocation::new("notes")
///     .with_command("add")
///     .with_flag("v")
///     .with_option("title", "groceries");
///
/// assert_eq!(ctx.command(), "add");
/// assert!(ctx.options().is_any(&["q", "v"]));
/// assert_eq!(ctx.value("title"), Some("groceries"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Invocation {
    executable: String,
    command: String,
    options: OptionSet,
}

impl Invocation {
    /// Creates an invocation of `executable` with no command and no options.
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    /// Sets the invoked command.
    pub fn with_command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Adds a valueless flag.
    pub fn with_flag(mut self, name: impl Into<String>) -> Self {
        self.options.insert(name.into(), None);
        self
    }

    /// Adds an option carrying a value.
    pub fn with_option(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(name.into(), Some(value.into()));
        self
    }

    /// Returns the value of option `name`, if it was given one.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.options.value(name)
    }

    /// Returns the option set.
    pub fn option_set(&self) -> &OptionSet {
        &self.options
    }
}

impl Context for Invocation {
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

/// Key/value option flags backing an [`Invocation`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionSet {
    entries: BTreeMap<String, Option<String>>,
}

impl OptionSet {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a flag, replacing any previous value.
    pub fn insert(&mut self, name: String, value: Option<String>) {
        self.entries.insert(name, value);
    }

    /// Returns the value of `name`, if present and valued.
    pub fn value(&self, name: &str) -> Option<&str> {
        self.entries.get(name).and_then(|v| v.as_deref())
    }

    /// Returns the number of flags.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no flags are set.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates flag names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl Options for OptionSet {
    fn is_any(&self, names: &[&str]) -> bool {
        names.iter().any(|name| self.entries.contains_key(*name))
    }

    fn value(&self, name: &str) -> Option<&str> {
        OptionSet::value(self, name)
    }
}

impl<K, V> FromIterator<(K, Option<V>)> for OptionSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.map(Into::into)))
                .collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.executable)?;
        if !self.command.is_empty() {
            write!(f, " {}", self.command)?;
        }
        for (name, value) in &self.options.entries {
            match value {
                Some(v) => write!(f, " -{}={}", name, v)?,
                None => write!(f, " -{}", name)?,
            }
        }
        Ok(())
    }
}

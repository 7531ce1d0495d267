/*!
# Tartan: Flag Set.
*/

use crate::{
	ErrorPolicy,
	Flag,
	ParseError,
	RegistryError,
	Value,
};
use indexmap::IndexMap;
use std::{
	collections::HashMap,
	fmt,
	io::Write,
};
use tracing::debug;



/// # Flag Set.
///
/// This is the flag registry. Flags are indexed by long name (in
/// registration order) and, optionally, by shorthand.
///
/// Register everything up front with [`FlagSet::register`], then call
/// [`FlagSet::parse`] (or one of its variants) to apply an argument list.
/// Afterwards, values can be read back from the flags themselves or any
/// shared handles kept by the caller, and the leftover positional arguments
/// from [`FlagSet::args`].
///
/// A `FlagSet` is plain mutable state; if more than one thread needs one,
/// wrap it in a lock (as [`command_line`](crate::command_line) does).
///
/// ## Examples
///
/// ```
/// use tartan::{ErrorPolicy, FlagSet, Slot};
///
/// let threads = Slot::new(1_usize);
/// let mut flags = FlagSet::new("demo", ErrorPolicy::Report);
/// flags.register("threads", Some('j'), threads.clone(), "Worker count.", None).unwrap();
/// flags.register("verbose", Some('v'), Slot::new(false), "Be chatty.", None).unwrap();
///
/// let args = flags.parse(["-vj", "4", "in.txt", "--", "--not-a-flag"]).unwrap();
/// assert_eq!(args, ["in.txt", "--not-a-flag"]);
/// assert_eq!(threads.get(), 4);
/// assert!(flags.changed("verbose"));
/// ```
pub struct FlagSet {
	/// # Name.
	pub(crate) name: String,

	/// # Default Error Policy.
	pub(crate) policy: ErrorPolicy,

	/// # Flags by Long Name.
	pub(crate) flags: IndexMap<String, Flag>,

	/// # Flag Indexes by Shorthand.
	pub(crate) shorthands: HashMap<char, usize>,

	/// # Positional Arguments.
	pub(crate) args: Vec<String>,

	/// # Positional Count at Terminator.
	pub(crate) args_len_at_dash: Option<usize>,

	/// # Parsed?
	pub(crate) parsed: bool,

	/// # Allow Flags After Positionals?
	pub(crate) interspersed: bool,

	/// # Allow Abbreviated Long Names?
	pub(crate) abbreviations: bool,

	/// # Diagnostic Stream.
	///
	/// When `None`, STDERR is used.
	pub(crate) output: Option<Box<dyn Write + Send>>,
}

impl Default for FlagSet {
	#[inline]
	fn default() -> Self { Self::new("", ErrorPolicy::Report) }
}

impl fmt::Debug for FlagSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FlagSet")
			.field("name", &self.name)
			.field("policy", &self.policy)
			.field("flags", &self.flags.values().collect::<Vec<_>>())
			.field("args", &self.args)
			.field("args_len_at_dash", &self.args_len_at_dash)
			.field("parsed", &self.parsed)
			.field("interspersed", &self.interspersed)
			.field("abbreviations", &self.abbreviations)
			.finish_non_exhaustive()
	}
}

/// ## Instantiation and Builder Patterns.
impl FlagSet {
	#[must_use]
	/// # New.
	///
	/// Create an empty set. The policy determines what [`FlagSet::parse`]
	/// does when something goes wrong.
	pub fn new<S: Into<String>>(name: S, policy: ErrorPolicy) -> Self {
		Self {
			name: name.into(),
			policy,
			flags: IndexMap::new(),
			shorthands: HashMap::new(),
			args: Vec::new(),
			args_len_at_dash: None,
			parsed: false,
			interspersed: true,
			abbreviations: true,
			output: None,
		}
	}

	#[must_use]
	/// # With Interspersed.
	///
	/// When `false`, flag scanning stops at the first positional argument;
	/// it and everything after it are collected as-are. The default is
	/// `true`.
	pub const fn with_interspersed(mut self, interspersed: bool) -> Self {
		self.interspersed = interspersed;
		self
	}

	#[must_use]
	/// # With Abbreviations.
	///
	/// When `true` (the default), long flags may be given as any
	/// unambiguous prefix of their name, e.g. `--verb` for `--verbose`.
	pub const fn with_abbreviations(mut self, abbreviations: bool) -> Self {
		self.abbreviations = abbreviations;
		self
	}

	#[must_use]
	/// # With Output.
	///
	/// Set the diagnostic stream used by [`ErrorPolicy::Terminate`]. The
	/// default is STDERR.
	pub fn with_output<W: Write + Send + 'static>(mut self, out: W) -> Self {
		self.output = Some(Box::new(out));
		self
	}

	/// # Register.
	///
	/// Add a flag named `--name` (and `-shorthand`, if provided) backed by
	/// `value`.
	///
	/// `no_opt_default` is the value to use when the flag is given without
	/// one. If `None`, the value's own [`Value::no_opt_default`] is used,
	/// if any; flags without one always require a value.
	///
	/// Note that `None` means "inherit", not "none". Booleans, for example,
	/// will still default to `"true"`. To make such a flag demand an explicit
	/// value, clear it afterwards with [`FlagSet::set_no_opt_default`].
	///
	/// ## Errors
	///
	/// This will return an error if the name or shorthand is invalid or
	/// already taken.
	pub fn register<V: Value + 'static>(
		&mut self,
		name: &str,
		shorthand: Option<char>,
		value: V,
		usage: &str,
		no_opt_default: Option<&str>,
	) -> Result<&Flag, RegistryError> {
		if self.flags.contains_key(name) {
			return Err(RegistryError::DuplicateFlag(name.to_owned()));
		}
		if let Some(c) = shorthand {
			if self.shorthands.contains_key(&c) {
				return Err(RegistryError::DuplicateShorthand(c));
			}
		}

		let flag = Flag::new(name, shorthand, Box::new(value), usage, no_opt_default)?;
		debug!(
			flag = name,
			shorthand = ?shorthand,
			kind = flag.type_name(),
			default = flag.default_value(),
			"flag registered",
		);

		let (idx, _) = self.flags.insert_full(name.to_owned(), flag);
		if let Some(c) = shorthand { self.shorthands.insert(c, idx); }
		Ok(&self.flags[idx])
	}
}

/// ## Lookups.
impl FlagSet {
	#[must_use]
	/// # Lookup (Exact).
	///
	/// Return the flag with this exact long name (sans dashes), if any.
	pub fn lookup(&self, name: &str) -> Option<&Flag> { self.flags.get(name) }

	/// # Lookup (Abbreviated).
	///
	/// Like [`FlagSet::lookup`], but if there is no exact match, a unique
	/// prefix of a registered name will do. Abbreviations are not
	/// considered if disabled via [`FlagSet::with_abbreviations`].
	///
	/// ## Examples
	///
	/// ```
	/// use tartan::{FlagSet, ParseError, Slot};
	///
	/// let mut flags = FlagSet::default();
	/// flags.register("verbose", None, Slot::new(false), "", None).unwrap();
	/// flags.register("version", None, Slot::new(false), "", None).unwrap();
	///
	/// assert_eq!(flags.lookup_long("verb").unwrap().name(), "verbose");
	/// assert!(matches!(flags.lookup_long("ver"), Err(ParseError::AmbiguousFlag { .. })));
	/// assert!(matches!(flags.lookup_long("quiet"), Err(ParseError::UnknownFlag { .. })));
	/// ```
	///
	/// ## Errors
	///
	/// Returns [`ParseError::UnknownFlag`] if nothing matches, or
	/// [`ParseError::AmbiguousFlag`] if more than one name does.
	pub fn lookup_long(&self, name: &str) -> Result<&Flag, ParseError> {
		let token = format!("--{name}");
		self.find_long(name, &token, self.abbreviations).map(|idx| &self.flags[idx])
	}

	#[must_use]
	/// # Lookup Shorthand.
	pub fn lookup_short(&self, shorthand: char) -> Option<&Flag> {
		self.find_short(shorthand).map(|idx| &self.flags[idx])
	}

	/// # Find Long Index.
	///
	/// Resolve `name` to an index, trying an exact match first, then a unique
	/// prefix if `abbrev` is allowed.
	pub(crate) fn find_long(&self, name: &str, token: &str, abbrev: bool)
	-> Result<usize, ParseError> {
		if let Some(idx) = self.flags.get_index_of(name) { return Ok(idx); }

		if abbrev && ! name.is_empty() {
			let mut found = self.flags.keys()
				.enumerate()
				.filter(|(_, k)| k.starts_with(name));

			if let Some((idx, first)) = found.next() {
				let rest: Vec<String> = found.map(|(_, k)| k.clone()).collect();
				if rest.is_empty() { return Ok(idx); }

				let mut candidates = Vec::with_capacity(rest.len() + 1);
				candidates.push(first.clone());
				candidates.extend(rest);
				return Err(ParseError::AmbiguousFlag {
					token: token.to_owned(),
					candidates,
				});
			}
		}

		Err(ParseError::UnknownFlag {
			token: token.to_owned(),
			name: name.to_owned(),
		})
	}

	#[inline]
	/// # Find Short Index.
	pub(crate) fn find_short(&self, shorthand: char) -> Option<usize> {
		self.shorthands.get(&shorthand).copied()
	}

	#[must_use]
	/// # Get (Typed).
	///
	/// Return a copy of the named flag's current value, if the flag exists
	/// and holds a `T`.
	pub fn get<T: 'static>(&self, name: &str) -> Option<T> {
		self.lookup(name).and_then(Flag::get::<T>)
	}

	#[must_use]
	/// # Changed?
	///
	/// Returns `true` if the named flag exists and was explicitly set.
	pub fn changed(&self, name: &str) -> bool {
		self.lookup(name).is_some_and(Flag::changed)
	}

	/// # All Flags.
	///
	/// Iterate over every flag in registration order.
	pub fn iter(&self) -> impl Iterator<Item=&Flag> { self.flags.values() }

	/// # Changed Flags.
	///
	/// Iterate over the explicitly-set flags in registration order.
	pub fn iter_changed(&self) -> impl Iterator<Item=&Flag> {
		self.flags.values().filter(|f| f.changed())
	}

	#[must_use]
	/// # Number of Flags.
	pub fn n_flag(&self) -> usize { self.flags.len() }
}

/// ## Positionals and State.
impl FlagSet {
	#[must_use]
	/// # Name.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # Error Policy.
	pub const fn policy(&self) -> ErrorPolicy { self.policy }

	#[must_use]
	/// # Parsed?
	///
	/// Returns `true` once a parse has been attempted.
	pub const fn parsed(&self) -> bool { self.parsed }

	#[must_use]
	/// # Positional Arguments.
	///
	/// Return the arguments left over from the most recent parse. If that
	/// parse failed, these are the ones collected before the failure.
	pub fn args(&self) -> &[String] { &self.args }

	#[must_use]
	/// # Positional Argument.
	pub fn arg(&self, idx: usize) -> Option<&str> {
		self.args.get(idx).map(String::as_str)
	}

	#[must_use]
	/// # Number of Positional Arguments.
	pub fn n_arg(&self) -> usize { self.args.len() }

	#[must_use]
	/// # Positionals Before Terminator.
	///
	/// Return the number of positional arguments that preceded the `--`
	/// terminator, or `None` if there wasn't one.
	pub const fn args_len_at_dash(&self) -> Option<usize> { self.args_len_at_dash }
}

/// ## Programmatic Changes.
impl FlagSet {
	/// # Set.
	///
	/// Set the named flag exactly as if `--name=raw` had been parsed. The name
	/// must match exactly.
	///
	/// ## Errors
	///
	/// Returns an error if there is no such flag or the value is rejected.
	pub fn set(&mut self, name: &str, raw: &str) -> Result<(), ParseError> {
		let idx = self.flags.get_index_of(name).ok_or_else(|| ParseError::UnknownFlag {
			token: format!("--{name}={raw}"),
			name: name.to_owned(),
		})?;
		self.apply(idx, &format!("--{name}={raw}"), raw)
	}

	/// # Set No-Option Default.
	///
	/// Replace the named flag's no-option default. Passing `None` removes
	/// it, so the flag will always require a value, even if its
	/// [`Value`] would normally provide one.
	///
	/// Returns `false` if there is no such flag.
	///
	/// ## Examples
	///
	/// ```
	/// use tartan::{FlagSet, ParseError, Slot};
	///
	/// let force = Slot::new(false);
	/// let mut flags = FlagSet::default();
	/// flags.register("force", Some('f'), force.clone(), "Force it.", None).unwrap();
	/// assert!(flags.set_no_opt_default("force", None));
	///
	/// assert!(matches!(flags.parse(["--force"]), Err(ParseError::MissingValue { .. })));
	/// assert!(flags.parse(["-f", "true"]).unwrap().is_empty());
	/// assert!(force.get());
	/// ```
	pub fn set_no_opt_default(&mut self, name: &str, no_opt_default: Option<&str>) -> bool {
		if let Some(flag) = self.flags.get_mut(name) {
			flag.set_no_opt_default(no_opt_default);
			true
		}
		else { false }
	}

	/// # Apply.
	///
	/// Set the flag at `idx`, mapping any value error to a parse error
	/// attributed to `token`.
	pub(crate) fn apply(&mut self, idx: usize, token: &str, raw: &str)
	-> Result<(), ParseError> {
		let Some((name, flag)) = self.flags.get_index_mut(idx) else {
			return Err(ParseError::UnknownFlag {
				token: token.to_owned(),
				name: String::new(),
			});
		};

		flag.apply(raw).map_err(|source| ParseError::InvalidValue {
			token: token.to_owned(),
			flag: name.clone(),
			source,
		})?;

		debug!(flag = name.as_str(), value = raw, token, "flag set");
		Ok(())
	}

	/// # Reset.
	///
	/// Restore every flag to its registration-time value and state, and
	/// forget the last parse.
	///
	/// ## Errors
	///
	/// Returns an error if a value refuses its own default rendering; the
	/// remaining flags are still reset.
	pub fn reset(&mut self) -> Result<(), ParseError> {
		let mut res = Ok(());
		for (name, flag) in &mut self.flags {
			let default = flag.default_value().to_owned();
			if let Err(source) = flag.reset() {
				if res.is_ok() {
					res = Err(ParseError::InvalidValue {
						token: format!("--{name}={default}"),
						flag: name.clone(),
						source,
					});
				}
			}
		}

		self.args.clear();
		self.args_len_at_dash = None;
		self.parsed = false;
		res
	}
}

/*!
# Tartan: Flags.
*/

use crate::{
	RegistryError,
	Value,
	ValueError,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Flag State.
///
/// This records whether or not a flag has been explicitly set. Once set, it
/// stays set until [`FlagSet::reset`](crate::FlagSet::reset).
pub enum FlagState {
	#[default]
	/// # Untouched.
	Default,

	/// # Explicitly Set.
	ExplicitlySet,
}



/// # Flag.
///
/// This is a registered flag: its names, its documentation, and the
/// [`Value`] that backs it.
///
/// Flags are created and owned by [`FlagSet`](crate::FlagSet); use its
/// lookup methods to get at them.
pub struct Flag {
	/// # Long Name (sans dashes).
	name: String,

	/// # Shorthand.
	shorthand: Option<char>,

	/// # Usage.
	usage: String,

	/// # No-Option Default.
	no_opt_default: Option<String>,

	/// # Registration-Time Rendering.
	default_value: String,

	/// # State.
	state: FlagState,

	/// # Value.
	value: Box<dyn Value>,
}

impl fmt::Debug for Flag {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Flag")
			.field("name", &self.name)
			.field("shorthand", &self.shorthand)
			.field("type", &self.value.type_name())
			.field("value", &self.value.render())
			.field("default_value", &self.default_value)
			.field("no_opt_default", &self.no_opt_default)
			.field("state", &self.state)
			.finish_non_exhaustive()
	}
}

impl Flag {
	/// # New.
	///
	/// When `no_opt_default` is `None`, the value's own preference (if any)
	/// is used instead.
	///
	/// ## Errors
	///
	/// An error is returned if the name or shorthand is unusable.
	pub(crate) fn new(
		name: &str,
		shorthand: Option<char>,
		value: Box<dyn Value>,
		usage: &str,
		no_opt_default: Option<&str>,
	) -> Result<Self, RegistryError> {
		if ! valid_name(name.as_bytes()) {
			return Err(RegistryError::InvalidName(name.to_owned()));
		}
		if let Some(c) = shorthand {
			if ! valid_shorthand(c) { return Err(RegistryError::InvalidShorthand(c)); }
		}

		let no_opt_default = no_opt_default.or_else(|| value.no_opt_default())
			.map(str::to_owned);

		Ok(Self {
			name: name.to_owned(),
			shorthand,
			usage: usage.to_owned(),
			no_opt_default,
			default_value: value.render(),
			state: FlagState::Default,
			value,
		})
	}

	/// # Apply.
	///
	/// Set the value and mark the flag as explicitly set.
	pub(crate) fn apply(&mut self, raw: &str) -> Result<(), ValueError> {
		self.value.set(raw)?;
		self.state = FlagState::ExplicitlySet;
		Ok(())
	}

	/// # Reset.
	///
	/// Restore the registration-time value and state.
	pub(crate) fn reset(&mut self) -> Result<(), ValueError> {
		self.value.reset(&self.default_value)?;
		self.state = FlagState::Default;
		Ok(())
	}

	/// # Set No-Option Default.
	pub(crate) fn set_no_opt_default(&mut self, no_opt_default: Option<&str>) {
		self.no_opt_default = no_opt_default.map(str::to_owned);
	}

	/// # Accepts Trailing?
	pub(crate) fn accepts_trailing(&self, next: &str) -> bool {
		self.value.accepts_trailing(next)
	}
}

/// ## Getters.
impl Flag {
	#[must_use]
	/// # Long Name.
	///
	/// This is the name without its leading `--`.
	pub fn name(&self) -> &str { &self.name }

	#[must_use]
	/// # Shorthand.
	pub const fn shorthand(&self) -> Option<char> { self.shorthand }

	#[must_use]
	/// # Usage.
	pub fn usage(&self) -> &str { &self.usage }

	#[must_use]
	/// # No-Option Default.
	///
	/// The value used when the flag is given without one, if any.
	pub fn no_opt_default(&self) -> Option<&str> { self.no_opt_default.as_deref() }

	#[must_use]
	/// # Default Value.
	///
	/// This is how the value rendered at registration time.
	pub fn default_value(&self) -> &str { &self.default_value }

	#[must_use]
	/// # State.
	pub const fn state(&self) -> FlagState { self.state }

	#[must_use]
	/// # Changed?
	///
	/// Returns `true` if the flag has been explicitly set.
	pub fn changed(&self) -> bool { self.state == FlagState::ExplicitlySet }

	#[must_use]
	/// # Render.
	///
	/// Return the current value as a string.
	pub fn render(&self) -> String { self.value.render() }

	#[must_use]
	/// # Type Label.
	pub fn type_name(&self) -> &'static str { self.value.type_name() }

	#[must_use]
	/// # Value.
	pub fn value(&self) -> &dyn Value { self.value.as_ref() }

	#[must_use]
	/// # Get (Typed).
	///
	/// Return a copy of the current value if it is a `T`.
	///
	/// ## Examples
	///
	/// ```
	/// use tartan::{FlagSet, Slot};
	///
	/// let mut flags = FlagSet::default();
	/// flags.register("count", Some('c'), Slot::new(0_u32), "How many.", None).unwrap();
	/// flags.parse(["-c", "3"]).unwrap();
	///
	/// let flag = flags.lookup("count").unwrap();
	/// assert_eq!(flag.get::<u32>(), Some(3));
	/// assert_eq!(flag.get::<i32>(), None); // Wrong type.
	/// ```
	pub fn get<T: 'static>(&self) -> Option<T> {
		self.value.get().downcast::<T>().ok().map(|v| *v)
	}
}



/// # Valid Long Name?
///
/// Names must be non-empty, may not start with a dash, and may not contain
/// `=` or any whitespace/control characters.
const fn valid_name(mut bytes: &[u8]) -> bool {
	if matches!(bytes, [] | [b'-', ..]) { return false; }

	while let [b, rest @ ..] = bytes {
		if *b == b'=' || b.is_ascii_whitespace() || b.is_ascii_control() { return false; }
		bytes = rest;
	}

	true
}

/// # Valid Shorthand?
fn valid_shorthand(c: char) -> bool {
	! matches!(c, '-' | '=') && ! c.is_whitespace() && ! c.is_control()
}

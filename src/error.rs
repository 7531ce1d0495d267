/*!
# Tartan: Errors.

There are three error enums here, one per stage:

* [`ValueError`] is returned by [`Value::set`](crate::Value::set) when a raw string is rejected;
* [`RegistryError`] is returned when a flag cannot be registered;
* [`ParseError`] is returned when an argument list cannot be parsed.
*/

use std::ffi::OsString;
use thiserror::Error;



#[derive(Debug, Clone, Eq, PartialEq, Error)]
/// # Value Error.
pub enum ValueError {
	/// # Not a Valid `expected`.
	#[error("{raw:?} is not a valid {expected}")]
	Invalid {
		/// # Expected Type Label.
		expected: &'static str,

		/// # Rejected Input.
		raw: String,
	},

	/// # Custom Message.
	///
	/// For user-defined values that want to say something more specific.
	#[error("{0}")]
	Custom(String),
}

impl ValueError {
	#[must_use]
	/// # New Invalid.
	pub fn invalid(expected: &'static str, raw: &str) -> Self {
		Self::Invalid { expected, raw: raw.to_owned() }
	}
}



#[derive(Debug, Clone, Eq, PartialEq, Error)]
/// # Registration Error.
///
/// These are construction-time problems; they are never produced by a parse.
pub enum RegistryError {
	/// # Duplicate Long Name.
	#[error("flag redefined: --{0}")]
	DuplicateFlag(String),

	/// # Duplicate Shorthand.
	#[error("shorthand redefined: -{0}")]
	DuplicateShorthand(char),

	/// # Invalid Long Name.
	#[error("invalid flag name: {0:?}")]
	InvalidName(String),

	/// # Invalid Shorthand.
	#[error("invalid shorthand: {0:?}")]
	InvalidShorthand(char),
}

impl RegistryError {
	#[must_use]
	/// # As String Slice.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::DuplicateFlag(_) | Self::DuplicateShorthand(_) => "Duplicate flag.",
			Self::InvalidName(_) | Self::InvalidShorthand(_) => "Invalid flag.",
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq, Error)]
/// # Parse Error.
///
/// Every variant carries the offending token as it appeared in the argument
/// list.
pub enum ParseError {
	/// # Unknown Flag.
	#[error("unknown flag: {token}")]
	UnknownFlag {
		/// # Token.
		token: String,

		/// # Name (long name or shorthand) that failed to resolve.
		name: String,
	},

	/// # Ambiguous Abbreviation.
	#[error("ambiguous flag: {token} could be any of --{}", candidates.join(", --"))]
	AmbiguousFlag {
		/// # Token.
		token: String,

		/// # Matching Long Names (registration order).
		candidates: Vec<String>,
	},

	/// # Missing Value.
	#[error("flag needs an argument: --{flag} (from {token})")]
	MissingValue {
		/// # Token.
		token: String,

		/// # Flag (long name).
		flag: String,
	},

	/// # Rejected Value.
	#[error("invalid argument for --{flag} (from {token}): {source}")]
	InvalidValue {
		/// # Token.
		token: String,

		/// # Flag (long name).
		flag: String,

		/// # What the value had to say about it.
		source: ValueError,
	},

	/// # Bad Syntax.
	///
	/// A long flag without a name, like `--=foo`.
	#[error("bad flag syntax: {token}")]
	BadSyntax {
		/// # Token.
		token: String,
	},

	/// # Invalid UTF-8.
	///
	/// The original [`OsString`] is kept in case you want to dig deeper.
	#[error("argument is not valid UTF-8: {0:?}")]
	InvalidUtf8(OsString),
}

impl ParseError {
	#[must_use]
	/// # Exit Code.
	///
	/// This is the status used by [`ErrorPolicy::Terminate`](crate::ErrorPolicy::Terminate).
	pub const fn exit_code(&self) -> i32 { 2 }

	#[must_use]
	/// # As String Slice.
	pub const fn as_str(&self) -> &'static str {
		match self {
			Self::UnknownFlag { .. } => "Unknown flag.",
			Self::AmbiguousFlag { .. } => "Ambiguous flag.",
			Self::MissingValue { .. } => "Missing value.",
			Self::InvalidValue { .. } => "Invalid value.",
			Self::BadSyntax { .. } => "Bad flag syntax.",
			Self::InvalidUtf8(_) => "Invalid UTF-8.",
		}
	}

	#[must_use]
	/// # Offending Token.
	pub fn token(&self) -> Option<&str> {
		match self {
			Self::UnknownFlag { token, .. }
				| Self::AmbiguousFlag { token, .. }
				| Self::MissingValue { token, .. }
				| Self::InvalidValue { token, .. }
				| Self::BadSyntax { token } => Some(token),
			Self::InvalidUtf8(_) => None,
		}
	}
}

/*!
# Tartan: Scalars.
*/

use crate::ValueError;
use std::num::IntErrorKind;



/// # Scalar.
///
/// This is implemented for the single-value types [`Slot`](crate::Slot)
/// can hold: `bool`, all the integers, `f32`/`f64`, `String`, and
/// [`Duration`](std::time::Duration).
///
/// Floats round-trip everything except `NaN`, which never equals itself.
pub trait Scalar: Clone + Send + 'static {
	/// # Type Label.
	const TYPE_NAME: &'static str;

	/// # No-Option Default.
	const NO_OPT_DEFAULT: Option<&'static str> = None;

	/// # From Raw.
	///
	/// ## Errors
	///
	/// An error is returned if the string cannot be parsed.
	fn from_raw(raw: &str) -> Result<Self, ValueError>;

	/// # To Raw.
	///
	/// The canonical rendering.
	fn to_raw(&self) -> String;
}



impl Scalar for bool {
	const TYPE_NAME: &'static str = "bool";
	const NO_OPT_DEFAULT: Option<&'static str> = Some("true");

	fn from_raw(raw: &str) -> Result<Self, ValueError> {
		match raw {
			"1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
			"0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
			_ => Err(ValueError::invalid(Self::TYPE_NAME, raw)),
		}
	}

	fn to_raw(&self) -> String {
		if *self { "true" } else { "false" }.to_owned()
	}
}

impl Scalar for String {
	const TYPE_NAME: &'static str = "string";

	#[inline]
	fn from_raw(raw: &str) -> Result<Self, ValueError> { Ok(raw.to_owned()) }

	#[inline]
	fn to_raw(&self) -> String { self.clone() }
}

/// # Helper: Floats.
macro_rules! float {
	($ty:ty, $label:literal) => (
		impl Scalar for $ty {
			const TYPE_NAME: &'static str = $label;

			fn from_raw(raw: &str) -> Result<Self, ValueError> {
				raw.parse::<Self>().map_err(|_| ValueError::invalid(Self::TYPE_NAME, raw))
			}

			#[inline]
			fn to_raw(&self) -> String { self.to_string() }
		}
	);
}

float!(f32, "float32");
float!(f64, "float64");

/// # Helper: Integers.
///
/// Integers accept an optional sign, a `0x`/`0o`/`0b` radix prefix, and
/// `_` digit separators. They always render as plain decimal.
macro_rules! int {
	($($ty:ty, $label:literal),+ $(,)?) => ($(
		impl Scalar for $ty {
			const TYPE_NAME: &'static str = $label;

			fn from_raw(raw: &str) -> Result<Self, ValueError> {
				let (neg, radix, digits) = split_int(raw)
					.ok_or_else(|| ValueError::invalid(Self::TYPE_NAME, raw))?;

				let mut txt = String::with_capacity(digits.len() + 1);
				if neg { txt.push('-'); }
				txt.extend(digits.chars().filter(|&c| c != '_'));

				Self::from_str_radix(&txt, radix).map_err(|e| match e.kind() {
					IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => ValueError::Custom(
						format!("{raw:?} is out of range for {}", Self::TYPE_NAME)
					),
					_ => ValueError::invalid(Self::TYPE_NAME, raw),
				})
			}

			#[inline]
			fn to_raw(&self) -> String { self.to_string() }
		}
	)+);
}

int!(
	i8, "int8",
	i16, "int16",
	i32, "int32",
	i64, "int64",
	i128, "int128",
	isize, "int",
	u8, "uint8",
	u16, "uint16",
	u32, "uint32",
	u64, "uint64",
	u128, "uint128",
	usize, "uint",
);



/// # Split Integer.
///
/// Break an integer string into its sign, radix, and digits. Separators are
/// only allowed between digits.
fn split_int(raw: &str) -> Option<(bool, u32, &str)> {
	let (neg, rest) =
		if let Some(r) = raw.strip_prefix('-') { (true, r) }
		else { (false, raw.strip_prefix('+').unwrap_or(raw)) };

	let (radix, digits) = match rest.as_bytes() {
		[b'0', b'x' | b'X', ..] => (16, &rest[2..]),
		[b'0', b'o' | b'O', ..] => (8, &rest[2..]),
		[b'0', b'b' | b'B', ..] => (2, &rest[2..]),
		_ => (10, rest),
	};

	if
		digits.is_empty() ||
		digits.starts_with('_') ||
		digits.ends_with('_') ||
		digits.contains("__") ||
		digits.starts_with(['+', '-'])
	{
		return None;
	}

	Some((neg, radix, digits))
}

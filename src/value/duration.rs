/*!
# Tartan: Durations.

Durations are written as a sequence of decimal numbers, each with an
optional fraction and a mandatory unit: `300ms`, `1.5h`, `2h45m`. The
valid units are `ns`, `us` (or `µs`), `ms`, `s`, `m`, and `h`. A bare `0`
is also allowed.

Rendering uses the largest sensible units, e.g. `1h30m0s` or `1.5ms`.
Fractions beyond nanosecond precision are truncated, so those (and only
those) don't round-trip.
*/

use crate::{
	Scalar,
	ValueError,
};
use std::time::Duration;



/// # Nanoseconds Per Microsecond.
const NS_US: u128 = 1_000;

/// # Nanoseconds Per Millisecond.
const NS_MS: u128 = 1_000_000;

/// # Nanoseconds Per Second.
const NS_S: u128 = 1_000_000_000;

/// # Nanoseconds Per Minute.
const NS_M: u128 = 60 * NS_S;

/// # Nanoseconds Per Hour.
const NS_H: u128 = 60 * NS_M;



impl Scalar for Duration {
	const TYPE_NAME: &'static str = "duration";

	fn from_raw(raw: &str) -> Result<Self, ValueError> {
		parse(raw).ok_or_else(|| ValueError::invalid(Self::TYPE_NAME, raw))
	}

	fn to_raw(&self) -> String { render(*self) }
}



/// # Parse.
fn parse(raw: &str) -> Option<Duration> {
	let mut src = raw.strip_prefix('+').unwrap_or(raw);
	if src == "0" { return Some(Duration::ZERO); }
	if src.is_empty() { return None; }

	let mut total: u128 = 0;
	while ! src.is_empty() {
		// The whole number.
		let (whole, rest) = split_digits(src);

		// The fraction, if any.
		let (frac, rest) = match rest.strip_prefix('.') {
			Some(rest) => split_digits(rest),
			None => ("", rest),
		};
		if whole.is_empty() && frac.is_empty() { return None; }

		// The unit runs until the next number.
		let end = rest.find(|c: char| c == '.' || c.is_ascii_digit()).unwrap_or(rest.len());
		let (unit, rest) = rest.split_at(end);
		let scale = match unit {
			"ns" => 1,
			"us" | "µs" | "μs" => NS_US,
			"ms" => NS_MS,
			"s" => NS_S,
			"m" => NS_M,
			"h" => NS_H,
			_ => return None,
		};

		if ! whole.is_empty() {
			let whole: u128 = whole.parse().ok()?;
			total = total.checked_add(whole.checked_mul(scale)?)?;
		}

		// Each fractional digit is worth a tenth of the last.
		let mut place = scale;
		for d in frac.bytes() {
			place /= 10;
			if place == 0 { break; }
			total = total.checked_add(u128::from(d - b'0') * place)?;
		}

		src = rest;
	}

	let secs = u64::try_from(total / NS_S).ok()?;
	let nanos = u32::try_from(total % NS_S).ok()?;
	Some(Duration::new(secs, nanos))
}

/// # Split Leading Digits.
fn split_digits(src: &str) -> (&str, &str) {
	let end = src.find(|c: char| ! c.is_ascii_digit()).unwrap_or(src.len());
	src.split_at(end)
}

/// # Render.
fn render(d: Duration) -> String {
	let total = d.as_nanos();
	if total == 0 { return "0s".to_owned(); }

	// Sub-second values use a single small unit.
	if total < NS_US { return format!("{total}ns"); }
	if total < NS_MS { return decimal(total, NS_US) + "µs"; }
	if total < NS_S { return decimal(total, NS_MS) + "ms"; }

	let mut out = String::new();
	let h = total / NS_H;
	let m = (total % NS_H) / NS_M;
	if h != 0 {
		out.push_str(&h.to_string());
		out.push('h');
	}
	if h != 0 || m != 0 {
		out.push_str(&m.to_string());
		out.push('m');
	}
	out.push_str(&decimal(total % NS_M, NS_S));
	out.push('s');
	out
}

/// # Decimal.
///
/// Format `n / unit` with as many fractional digits as needed and no
/// trailing zeroes. `unit` must be a power of ten.
fn decimal(n: u128, unit: u128) -> String {
	let whole = n / unit;
	let rem = n % unit;
	if rem == 0 { return whole.to_string(); }

	let width = unit.ilog10() as usize;
	let frac = format!("{rem:0width$}");
	format!("{whole}.{}", frac.trim_end_matches('0'))
}

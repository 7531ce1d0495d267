/*!
# Tartan: Values.

Every flag is backed by something implementing [`Value`]. The trait is
deliberately open: the built-in [`Slot`] and [`StringList`] cover the
usual suspects, but anything that can validate a string and render itself
back out can participate.
*/

mod duration;
mod list;
mod scalar;

pub use list::StringList;
pub use scalar::Scalar;

use crate::ValueError;
use parking_lot::Mutex;
use std::{
	any::Any,
	fmt,
	sync::Arc,
};



/// # Settable Value.
///
/// This is the contract between a flag and its backing storage.
///
/// ## Laws
///
/// * [`Value::set`] must either succeed, or fail without changing anything;
/// * [`Value::render`] must never fail, and feeding its output back through [`Value::set`] on a fresh value of the same kind must reproduce an equivalent state;
/// * [`Value::get`] must not have side effects.
///
/// ## Examples
///
/// A custom three-state value:
///
/// ```
/// use tartan::{Value, ValueError};
/// use std::any::Any;
///
/// #[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// enum Tri { No, Yes, Maybe }
///
/// struct TriValue(Tri);
///
/// impl Value for TriValue {
///     fn set(&mut self, raw: &str) -> Result<(), ValueError> {
///         self.0 = match raw {
///             "true" => Tri::Yes,
///             "false" => Tri::No,
///             "maybe" => Tri::Maybe,
///             _ => return Err(ValueError::invalid("tri-state", raw)),
///         };
///         Ok(())
///     }
///
///     fn get(&self) -> Box<dyn Any> { Box::new(self.0) }
///
///     fn render(&self) -> String {
///         match self.0 {
///             Tri::No => "false",
///             Tri::Yes => "true",
///             Tri::Maybe => "maybe",
///         }.to_owned()
///     }
///
///     fn type_name(&self) -> &'static str { "tri-state" }
///
///     fn no_opt_default(&self) -> Option<&'static str> { Some("true") }
/// }
///
/// let mut flags = tartan::FlagSet::default();
/// flags.register("tri", Some('t'), TriValue(Tri::No), "A tri-state.", None).unwrap();
/// flags.parse(["-t"]).unwrap();
/// assert_eq!(flags.get::<Tri>("tri"), Some(Tri::Yes));
/// ```
pub trait Value: Send {
	/// # Set.
	///
	/// Validate `raw` and update the inner state accordingly.
	///
	/// ## Errors
	///
	/// If `raw` is not acceptable, an error is returned and the state is
	/// left exactly as it was.
	fn set(&mut self, raw: &str) -> Result<(), ValueError>;

	/// # Current Value.
	///
	/// Return a snapshot of the current value. [`Flag::get`](crate::Flag::get)
	/// downcasts this for typed access.
	fn get(&self) -> Box<dyn Any>;

	/// # Render.
	///
	/// Return the canonical textual form of the current value.
	fn render(&self) -> String;

	/// # Type Label.
	///
	/// This is only used for diagnostics.
	fn type_name(&self) -> &'static str;

	/// # No-Option Default.
	///
	/// The value to use when the flag appears without one, unless the
	/// registration says otherwise. Booleans, for example, use `"true"`.
	fn no_opt_default(&self) -> Option<&'static str> { None }

	/// # Claim Trailing Token?
	///
	/// When a flag with a no-option default is the last shorthand in a
	/// cluster, the parser asks the value whether it wants the next whole
	/// argument, `next`. Returning `true` consumes it through [`Value::set`];
	/// the default, `false`, leaves it for the positionals.
	fn accepts_trailing(&self, next: &str) -> bool {
		let _ = next;
		false
	}

	/// # Reset.
	///
	/// Restore the registration-time state from its rendering. Most values
	/// can simply [`Value::set`] it; accumulating values need to override
	/// this to start over.
	///
	/// ## Errors
	///
	/// This bubbles up any [`Value::set`] errors.
	fn reset(&mut self, default: &str) -> Result<(), ValueError> { self.set(default) }
}



/// # Shared Slot.
///
/// A slot is a cheaply-cloneable handle to a single [`Scalar`], letting the
/// caller keep a copy to read the final value after parsing while the
/// registry owns the other.
///
/// ## Examples
///
/// ```
/// use tartan::{FlagSet, Slot};
///
/// let verbose = Slot::new(false);
/// let mut flags = FlagSet::default();
/// flags.register("verbose", Some('v'), verbose.clone(), "Be chatty.", None).unwrap();
///
/// flags.parse(["-v", "file.txt"]).unwrap();
/// assert!(verbose.get());
/// ```
pub struct Slot<T>(Arc<Mutex<T>>);

impl<T> Clone for Slot<T> {
	#[inline]
	fn clone(&self) -> Self { Self(Arc::clone(&self.0)) }
}

impl<T: Default> Default for Slot<T> {
	#[inline]
	fn default() -> Self { Self::new(T::default()) }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Slot").field(&*self.0.lock()).finish()
	}
}

impl<T> Slot<T> {
	#[must_use]
	/// # New.
	pub fn new(value: T) -> Self { Self(Arc::new(Mutex::new(value))) }

	#[must_use]
	/// # Get (Copy).
	pub fn get(&self) -> T
	where T: Clone { self.0.lock().clone() }

	/// # Replace.
	///
	/// Swap in a new value, returning the old one.
	pub fn replace(&self, value: T) -> T {
		std::mem::replace(&mut *self.0.lock(), value)
	}

	/// # With.
	///
	/// Run a callback against a reference to the inner value.
	pub fn with<F, R>(&self, cb: F) -> R
	where F: FnOnce(&T) -> R { cb(&self.0.lock()) }

	/// # With (Mutable).
	///
	/// Run a callback against a mutable reference to the inner value.
	pub fn with_mut<F, R>(&self, cb: F) -> R
	where F: FnOnce(&mut T) -> R { cb(&mut self.0.lock()) }
}

impl<T: Scalar> Value for Slot<T> {
	fn set(&mut self, raw: &str) -> Result<(), ValueError> {
		// Parse first so failures leave the old value alone.
		let next = T::from_raw(raw)?;
		self.replace(next);
		Ok(())
	}

	fn get(&self) -> Box<dyn Any> { Box::new(Self::get(self)) }

	fn render(&self) -> String { self.with(Scalar::to_raw) }

	fn type_name(&self) -> &'static str { T::TYPE_NAME }

	fn no_opt_default(&self) -> Option<&'static str> { T::NO_OPT_DEFAULT }
}

/*!
# Tartan: String Lists.
*/

use crate::{
	Slot,
	Value,
	ValueError,
};
use std::any::Any;



#[derive(Debug, Clone, Default)]
/// # Repeated String Value.
///
/// This collects comma-separated values, with repeat occurrences appending
/// to the list. The registration-time contents are treated as a default:
/// the first explicit set replaces them rather than adding to them.
///
/// Items cannot themselves contain commas; such lists are rendered and
/// re-parsed as more, smaller items. (A list holding a single empty item
/// likewise comes back empty.)
///
/// ## Examples
///
/// ```
/// use tartan::{FlagSet, StringList};
///
/// let tags = StringList::new(vec!["default".to_owned()]);
/// let mut flags = FlagSet::default();
/// flags.register("tag", None, tags.clone(), "Tags.", None).unwrap();
///
/// flags.parse(["--tag=a,b", "--tag", "c"]).unwrap();
/// assert_eq!(tags.get(), ["a", "b", "c"]);
/// ```
pub struct StringList {
	/// # Storage.
	inner: Slot<Vec<String>>,

	/// # Explicitly Set?
	touched: bool,
}

impl StringList {
	#[must_use]
	/// # New.
	pub fn new(default: Vec<String>) -> Self {
		Self {
			inner: Slot::new(default),
			touched: false,
		}
	}

	#[must_use]
	/// # Get (Copy).
	pub fn get(&self) -> Vec<String> { self.inner.get() }
}

impl Value for StringList {
	fn set(&mut self, raw: &str) -> Result<(), ValueError> {
		let items = split(raw);
		if self.touched {
			self.inner.with_mut(|v| v.extend(items));
		}
		else {
			self.inner.replace(items);
			self.touched = true;
		}
		Ok(())
	}

	fn get(&self) -> Box<dyn Any> { Box::new(Self::get(self)) }

	fn render(&self) -> String { self.inner.with(|v| v.join(",")) }

	fn type_name(&self) -> &'static str { "strings" }

	fn reset(&mut self, default: &str) -> Result<(), ValueError> {
		self.inner.replace(split(default));
		self.touched = false;
		Ok(())
	}
}



/// # Split.
fn split(raw: &str) -> Vec<String> {
	if raw.is_empty() { Vec::new() }
	else { raw.split(',').map(str::to_owned).collect() }
}

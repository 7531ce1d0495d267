/*!
# Tartan

This crate provides a POSIX/GNU-style flag registry and argument parser: long
names (`--flag`), single-character shorthands (`-f`), clustered shorthands
(`-abc`), attached values (`--flag=value`, `-fvalue`), flags that work with
or without a value, unambiguous long-name abbreviation (`--verb` for
`--verbose`), and positional arguments, with `--` marking the end of flags.

Flags are registered with a [`FlagSet`], each backed by something
implementing [`Value`]. The built-in [`Slot`] covers booleans, integers,
floats, strings, and [`Duration`](std::time::Duration)s; [`StringList`]
handles repeatable comma-separated lists. Anything else, like an enum, just
needs its own [`Value`] implementation.

What happens when parsing fails is up to the [`ErrorPolicy`]: report it, print
it and exit, or panic.

Help screens, shell completions, config files and the like are left to you;
[`FlagSet::iter`] and the [`Flag`] getters expose everything needed to build
them.



## Example

```
use tartan::{ErrorPolicy, FlagSet, Slot, StringList};
use std::time::Duration;

let verbose = Slot::new(false);
let timeout = Slot::new(Duration::from_secs(30));
let include = StringList::default();

let mut flags = FlagSet::new("demo", ErrorPolicy::Report);
flags.register("verbose", Some('v'), verbose.clone(), "Be chatty.", None).unwrap();
flags.register("timeout", Some('t'), timeout.clone(), "Give up after.", None).unwrap();
flags.register("include", Some('I'), include.clone(), "Extra paths.", None).unwrap();

let args = flags.parse([
    "-vt", "1m30s",
    "--include=/usr/lib,/opt/lib",
    "-I", "/home/lib",
    "input.txt",
    "--",
    "--literally",
]).unwrap();

assert_eq!(args, ["input.txt", "--literally"]);
assert!(verbose.get());
assert_eq!(timeout.get(), Duration::from_secs(90));
assert_eq!(include.get(), ["/usr/lib", "/opt/lib", "/home/lib"]);
```
*/

#![forbid(unsafe_code)]

#![deny(
	clippy::allow_attributes_without_reason,
	clippy::correctness,
	unreachable_pub,
)]

#![warn(
	clippy::complexity,
	clippy::nursery,
	clippy::pedantic,
	clippy::perf,
	clippy::style,

	clippy::allow_attributes,
	clippy::clone_on_ref_ptr,
	clippy::create_dir,
	clippy::filetype_is_file,
	clippy::format_push_string,
	clippy::get_unwrap,
	clippy::impl_trait_in_params,
	clippy::lossy_float_literal,
	clippy::missing_assert_message,
	clippy::missing_docs_in_private_items,
	clippy::needless_raw_strings,
	clippy::panic_in_result_fn,
	clippy::pub_without_shorthand,
	clippy::rest_pat_in_fully_bound_structs,
	clippy::semicolon_inside_block,
	clippy::str_to_string,
	clippy::string_to_string,
	clippy::todo,
	clippy::undocumented_unsafe_blocks,
	clippy::unneeded_field_pattern,
	clippy::unseparated_literal_suffix,
	clippy::unwrap_in_result,

	macro_use_extern_crate,
	missing_copy_implementations,
	missing_docs,
	non_ascii_idents,
	trivial_casts,
	trivial_numeric_casts,
	unused_crate_dependencies,
	unused_extern_crates,
	unused_import_braces,
)]

#![cfg_attr(docsrs, feature(doc_cfg))]



mod error;
mod flag;
mod parse;
mod policy;
mod set;
mod value;

pub use error::{
	ParseError,
	RegistryError,
	ValueError,
};
pub use flag::{
	Flag,
	FlagState,
};
pub use policy::ErrorPolicy;
pub use set::FlagSet;
pub use value::{
	Scalar,
	Slot,
	StringList,
	Value,
};

use parking_lot::Mutex;
use std::sync::OnceLock;



/// # The Default Registry.
static COMMAND_LINE: OnceLock<Mutex<FlagSet>> = OnceLock::new();



/// # Default Registry.
///
/// Return the process-wide [`FlagSet`], creating it on first use. It is named
/// after the program, uses [`ErrorPolicy::Terminate`], and lives until the
/// process ends.
///
/// This is just a convenience for programs with a single set of flags.
/// Nothing in this crate touches it implicitly, and isolated sets can always
/// be built with [`FlagSet::new`] instead.
///
/// ## Examples
///
/// ```
/// use tartan::Slot;
///
/// let quiet = Slot::new(false);
/// let mut flags = tartan::command_line().lock();
/// flags.register("quiet", Some('q'), quiet.clone(), "Shh.", None).unwrap();
/// flags.parse(["-q"]).unwrap();
/// assert!(quiet.get());
/// ```
pub fn command_line() -> &'static Mutex<FlagSet> {
	COMMAND_LINE.get_or_init(|| Mutex::new(FlagSet::new(program_name(), ErrorPolicy::Terminate)))
}

/// # Program Name.
fn program_name() -> String {
	std::env::args_os()
		.next()
		.and_then(|p| {
			std::path::Path::new(&p).file_name()
				.map(|n| n.to_string_lossy().into_owned())
		})
		.unwrap_or_default()
}

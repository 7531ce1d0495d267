/*!
# Tartan: Error Policy.
*/

use crate::ParseError;
use std::io::Write;



#[derive(Debug, Clone, Copy, Default, Eq, Hash, PartialEq)]
/// # Error Policy.
///
/// This decides what happens to a [`ParseError`] once the parser gives up.
/// The parser itself doesn't care; it always stops at the first failure and
/// hands it over.
///
/// In every case, flags set before the failure keep their values and the
/// positionals collected so far remain available.
pub enum ErrorPolicy {
	#[default]
	/// # Report.
	///
	/// Return the error to the caller.
	Report,

	/// # Terminate.
	///
	/// Write the error to the diagnostic stream and exit the process with
	/// [`ParseError::exit_code`].
	Terminate,

	/// # Escalate.
	///
	/// Panic.
	Escalate,
}

impl ErrorPolicy {
	/// # Dispose.
	///
	/// Do whatever the policy calls for with `err`. Only [`ErrorPolicy::Report`]
	/// actually returns.
	pub(crate) fn dispose(self, err: ParseError, out: &mut dyn Write) -> ParseError {
		match self {
			Self::Report => err,
			Self::Terminate => {
				let _res = writeln!(out, "Error: {err}").and_then(|()| out.flush());
				std::process::exit(err.exit_code());
			},
			Self::Escalate => panic!("{err}"),
		}
	}
}

/*!
# Tartan: Parsing.

This module holds the dispatcher: the state machine that walks an argument
list, classifies each token, and hands values off to the matching flags.

The token grammar is the usual POSIX/GNU fare:

* `--name`, `--name=value`, `--name value`;
* `-c`, `-c value`, `-cvalue`, `-c=value`;
* `-abc` (clustered shorthands);
* `--` (everything after is positional).

Anything else, including a lone `-`, is a positional argument.
*/

use crate::{
	ErrorPolicy,
	FlagSet,
	ParseError,
};
use std::{
	ffi::OsString,
	io::Write,
	iter::Peekable,
	vec::IntoIter,
};
use tracing::{
	trace,
	warn,
};



/// # The Terminator.
const TERMINATOR: &str = "--";



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Dispatcher State.
enum State {
	/// # Looking for Flags.
	Scanning,

	/// # Waiting on a Value.
	///
	/// The flag (by index) ended its token needing the next one as its
	/// value.
	AwaitingValue {
		/// # Flag Index.
		flag: usize,

		/// # The Token That Left Us Waiting.
		token: String,
	},

	/// # Everything Else is Positional.
	PositionalOnly,

	/// # All Done.
	Done,
}



/// # Dispatcher.
///
/// This borrows a [`FlagSet`] for the duration of one parse.
struct Dispatcher<'a> {
	/// # Registry.
	set: &'a mut FlagSet,

	/// # Remaining Tokens.
	tokens: Peekable<IntoIter<String>>,
}

impl<'a> Dispatcher<'a> {
	/// # New.
	fn new(set: &'a mut FlagSet, tokens: Vec<String>) -> Self {
		Self {
			set,
			tokens: tokens.into_iter().peekable(),
		}
	}

	/// # Run.
	///
	/// Process tokens until they run out or something fails. Failures stop
	/// everything immediately; whatever was applied before stays applied.
	fn run(mut self) -> Result<(), ParseError> {
		let mut state = State::Scanning;
		loop {
			state = match state {
				State::Scanning => match self.tokens.next() {
					Some(token) => self.scan(token)?,
					None => State::Done,
				},
				State::AwaitingValue { flag, token } => match self.tokens.next() {
					Some(raw) => {
						self.set.apply(flag, &token, &raw)?;
						State::Scanning
					},
					None => return Err(ParseError::MissingValue {
						flag: self.set.flags.get_index(flag)
							.map_or_else(String::new, |(k, _)| k.clone()),
						token,
					}),
				},
				State::PositionalOnly => {
					self.set.args.extend(self.tokens.by_ref());
					State::Done
				},
				State::Done => return Ok(()),
			};
		}
	}

	/// # Scan Token.
	fn scan(&mut self, token: String) -> Result<State, ParseError> {
		if token == TERMINATOR {
			trace!(positionals = self.set.args.len(), "terminator");
			self.set.args_len_at_dash = Some(self.set.args.len());
			Ok(State::PositionalOnly)
		}
		else if token.starts_with(TERMINATOR) { self.long(token) }
		else if 2 <= token.len() && token.starts_with('-') { self.short(token) }
		else {
			trace!(arg = token.as_str(), "positional");
			self.set.args.push(token);
			if self.set.interspersed { Ok(State::Scanning) }
			else { Ok(State::PositionalOnly) }
		}
	}

	/// # Long Flag.
	///
	/// Handle `--name`, `--name=value`, or `--name value`.
	fn long(&mut self, token: String) -> Result<State, ParseError> {
		let body = &token[TERMINATOR.len()..];
		let (name, explicit) = match body.split_once('=') {
			Some((name, value)) => (name, Some(value)),
			None => (body, None),
		};

		if name.is_empty() || name.starts_with('-') {
			return Err(ParseError::BadSyntax { token });
		}

		// Abbreviations are only considered without an attached value.
		let idx = self.set.find_long(
			name,
			&token,
			explicit.is_none() && self.set.abbreviations,
		)?;

		if let Some(value) = explicit {
			self.set.apply(idx, &token, value)?;
			return Ok(State::Scanning);
		}

		if let Some(default) = self.no_opt_default(idx) {
			self.set.apply(idx, &token, &default)?;
			return Ok(State::Scanning);
		}

		Ok(State::AwaitingValue { flag: idx, token })
	}

	/// # Short Flag Cluster.
	///
	/// Walk the characters after the dash, one shorthand at a time.
	///
	/// Shorthands with a no-opt default take it and move on, unless directly
	/// followed by `=value`. A shorthand without one takes the rest of the
	/// cluster as its value, or if nothing is left, the next token.
	fn short(&mut self, token: String) -> Result<State, ParseError> {
		let mut rest = &token[1..];
		while let Some(c) = rest.chars().next() {
			rest = &rest[c.len_utf8()..];

			let idx = self.set.find_short(c).ok_or_else(|| ParseError::UnknownFlag {
				token: token.clone(),
				name: c.to_string(),
			})?;

			// An explicit -c=value.
			if let Some(value) = rest.strip_prefix('=') {
				self.set.apply(idx, &token, value)?;
				return Ok(State::Scanning);
			}

			match self.no_opt_default(idx) {
				// Keep going if there is more to the cluster.
				Some(default) if ! rest.is_empty() => {
					self.set.apply(idx, &token, &default)?;
				},

				// Last in the cluster; the value might want the next token.
				Some(default) => {
					let trailing = self.tokens.peek()
						.filter(|next| self.set.flags[idx].accepts_trailing(next))
						.is_some();

					if trailing {
						if let Some(next) = self.tokens.next() {
							self.set.apply(idx, &token, &next)?;
						}
					}
					else { self.set.apply(idx, &token, &default)?; }
					return Ok(State::Scanning);
				},

				// Nothing left means the value is the next token.
				None if rest.is_empty() => {
					return Ok(State::AwaitingValue { flag: idx, token });
				},

				// Otherwise the rest of the cluster is the value.
				None => {
					self.set.apply(idx, &token, rest)?;
					return Ok(State::Scanning);
				},
			}
		}

		Ok(State::Scanning)
	}

	/// # No-Opt Default (Owned).
	fn no_opt_default(&self, idx: usize) -> Option<String> {
		self.set.flags.get_index(idx)
			.and_then(|(_, f)| f.no_opt_default())
			.map(str::to_owned)
	}
}



/// ## Parsing.
impl FlagSet {
	/// # Parse.
	///
	/// Parse `tokens` (not including the program path) using the set's own
	/// [`ErrorPolicy`], returning the positional arguments.
	///
	/// Every parse starts a fresh positional list, but flag values and states
	/// accumulate.
	///
	/// ## Errors
	///
	/// Returns the first problem encountered if the policy is
	/// [`ErrorPolicy::Report`]. (The other policies don't return errors.)
	pub fn parse<I, S>(&mut self, tokens: I) -> Result<&[String], ParseError>
	where I: IntoIterator<Item=S>, S: Into<String> {
		self.parse_with(tokens, self.policy)
	}

	/// # Parse With Policy.
	///
	/// Same as [`FlagSet::parse`], but with a one-off [`ErrorPolicy`].
	///
	/// ## Examples
	///
	/// ```
	/// use tartan::{ErrorPolicy, FlagSet, ParseError, Slot};
	///
	/// let mut flags = FlagSet::new("demo", ErrorPolicy::Terminate);
	/// flags.register("level", Some('l'), Slot::new(0_u8), "Level.", None).unwrap();
	///
	/// let res = flags.parse_with(["a", "-l", "999", "b"], ErrorPolicy::Report);
	/// assert!(matches!(res, Err(ParseError::InvalidValue { .. })));
	/// assert_eq!(flags.args(), ["a"]);
	/// ```
	///
	/// ## Errors
	///
	/// Returns the first problem encountered if the policy is
	/// [`ErrorPolicy::Report`].
	pub fn parse_with<I, S>(&mut self, tokens: I, policy: ErrorPolicy)
	-> Result<&[String], ParseError>
	where I: IntoIterator<Item=S>, S: Into<String> {
		let tokens: Vec<String> = tokens.into_iter().map(Into::into).collect();
		self.start();
		let res = Dispatcher::new(self, tokens).run();
		self.finish(res, policy)
	}

	/// # Parse `OsString`s.
	///
	/// Same as [`FlagSet::parse`], but for raw OS strings. Anything that isn't
	/// valid UTF-8 is an error; in that case nothing is parsed.
	///
	/// ## Errors
	///
	/// Returns the first problem encountered if the policy is
	/// [`ErrorPolicy::Report`].
	pub fn parse_os<I>(&mut self, tokens: I) -> Result<&[String], ParseError>
	where I: IntoIterator<Item=OsString> {
		match tokens.into_iter().map(OsString::into_string).collect::<Result<Vec<_>, _>>() {
			Ok(tokens) => self.parse(tokens),
			Err(raw) => {
				self.start();
				self.finish(Err(ParseError::InvalidUtf8(raw)), self.policy)
			},
		}
	}

	/// # Parse Environment.
	///
	/// Parse [`std::env::args_os`], skipping the first (program path) entry.
	///
	/// ## Errors
	///
	/// Returns the first problem encountered if the policy is
	/// [`ErrorPolicy::Report`].
	pub fn parse_env(&mut self) -> Result<&[String], ParseError> {
		self.parse_os(std::env::args_os().skip(1))
	}

	/// # Start a Parse.
	fn start(&mut self) {
		self.args.clear();
		self.args_len_at_dash = None;
		self.parsed = true;
	}

	/// # Finish a Parse.
	///
	/// Hand any error to the policy.
	fn finish(&mut self, res: Result<(), ParseError>, policy: ErrorPolicy)
	-> Result<&[String], ParseError> {
		match res {
			Ok(()) => Ok(&self.args),
			Err(err) => {
				warn!(set = self.name.as_str(), error = %err, ?policy, "parse failed");
				let err = match self.output.as_mut() {
					Some(out) => policy.dispose(err, out),
					None => policy.dispose(err, &mut std::io::stderr().lock() as &mut dyn Write),
				};
				Err(err)
			},
		}
	}
}



#[cfg(test)]
mod test {
	use super::*;
	use crate::{
		Slot,
		StringList,
	};
	use std::time::Duration;

	/// # Test Set.
	///
	/// Return a set along with handles to its values.
	fn flags() -> (FlagSet, Slot<bool>, Slot<bool>, Slot<String>, Slot<i32>) {
		let all = Slot::new(false);
		let brief = Slot::new(false);
		let output = Slot::new(String::new());
		let level = Slot::new(0_i32);

		let mut flags = FlagSet::new("test", ErrorPolicy::Report);
		flags.register("all", Some('a'), all.clone(), "All.", None).unwrap();
		flags.register("brief", Some('b'), brief.clone(), "Brief.", None).unwrap();
		flags.register("output", Some('o'), output.clone(), "Output.", None).unwrap();
		flags.register("level", Some('l'), level.clone(), "Level.", None).unwrap();

		(flags, all, brief, output, level)
	}

	#[test]
	fn t_long() {
		let (mut flags, all, _, output, level) = flags();
		let args = flags.parse(["--all", "--output=out.txt", "--level", "3", "file"]).unwrap();
		assert_eq!(args, ["file"]);
		assert!(all.get());
		assert_eq!(output.get(), "out.txt");
		assert_eq!(level.get(), 3);
		assert!(flags.changed("all"));
		assert!(! flags.changed("brief"));

		// Empty values are still values.
		flags.parse(["--output="]).unwrap();
		assert_eq!(output.get(), "");

		// Values can look like flags.
		flags.parse(["--output", "--all"]).unwrap();
		assert_eq!(output.get(), "--all");

		// Only the first = splits.
		flags.parse(["--output=a=b"]).unwrap();
		assert_eq!(output.get(), "a=b");

		// Explicit bools.
		flags.parse(["--all=false"]).unwrap();
		assert!(! all.get());
		assert!(flags.changed("all"));
	}

	#[test]
	fn t_abbreviations() {
		let (mut flags, all, _, output, _) = flags();
		flags.parse(["--al", "--out", "x"]).unwrap();
		assert!(all.get());
		assert_eq!(output.get(), "x");

		// Not with an attached value.
		assert_eq!(
			flags.parse(["--out=x"]),
			Err(ParseError::UnknownFlag {
				token: "--out=x".to_owned(),
				name: "out".to_owned(),
			}),
		);

		// Not when disabled.
		let (flags, ..) = self::flags();
		let mut flags = flags.with_abbreviations(false);
		assert!(matches!(flags.parse(["--al"]), Err(ParseError::UnknownFlag { .. })));
	}

	#[test]
	fn t_short() {
		let (mut flags, all, brief, output, level) = flags();
		let args = flags.parse(["-ab", "-o", "out.txt", "-l7", "x", "-"]).unwrap();
		assert_eq!(args, ["x", "-"]);
		assert!(all.get());
		assert!(brief.get());
		assert_eq!(output.get(), "out.txt");
		assert_eq!(level.get(), 7);

		// A value flag at the end of a cluster takes the next token.
		flags.parse(["-abo", "next"]).unwrap();
		assert_eq!(output.get(), "next");

		// Or the rest of the cluster, if there is any.
		flags.parse(["-aoba"]).unwrap();
		assert_eq!(output.get(), "ba");

		// Explicit values.
		flags.parse(["-a=false", "-o=x=y", "-b=0"]).unwrap();
		assert!(! all.get());
		assert!(! brief.get());
		assert_eq!(output.get(), "x=y");

		// Bools don't eat the next token.
		let args = flags.parse(["-a", "true"]).unwrap();
		assert_eq!(args, ["true"]);
	}

	#[test]
	fn t_shorthand_equivalence() {
		for (long, short) in [
			(&["--all"][..], &["-a"][..]),
			(&["--level=5"][..], &["-l5"][..]),
			(&["--level", "5"][..], &["-l", "5"][..]),
			(&["--output=x"][..], &["-o=x"][..]),
		] {
			let (mut a, ..) = flags();
			let (mut b, ..) = flags();
			let args_a = a.parse(long.iter().copied()).unwrap().to_vec();
			let args_b = b.parse(short.iter().copied()).unwrap().to_vec();
			assert_eq!(args_a, args_b);
			for (fa, fb) in a.iter().zip(b.iter()) {
				assert_eq!(fa.render(), fb.render(), "{long:?} vs {short:?}");
				assert_eq!(fa.state(), fb.state(), "{long:?} vs {short:?}");
			}
		}
	}

	#[test]
	fn t_terminator() {
		let (mut flags, all, ..) = flags();
		let args = flags.parse(["x", "--", "-a", "--all", "--", "", "y"]).unwrap();
		assert_eq!(args, ["x", "-a", "--all", "--", "", "y"]);
		assert_eq!(flags.args_len_at_dash(), Some(1));
		assert_eq!(flags.n_arg(), 6);
		assert_eq!(flags.arg(0), Some("x"));
		assert_eq!(flags.arg(3), Some("--"));
		assert_eq!(flags.arg(4), Some(""));
		assert_eq!(flags.arg(6), None);
		assert!(! all.get(), "Nothing after -- should be parsed.");

		// The terminator itself never shows up.
		assert!(flags.parse(["--"]).unwrap().is_empty());
		assert_eq!(flags.args_len_at_dash(), Some(0));

		// Each parse starts over.
		flags.parse(["z"]).unwrap();
		assert_eq!(flags.args(), ["z"]);
		assert_eq!(flags.args_len_at_dash(), None);

		// A flag still waiting on its value takes even the terminator.
		assert!(matches!(
			flags.parse(["--output", "--"]),
			Ok(args) if args.is_empty()
		));
		assert_eq!(flags.get::<String>("output").as_deref(), Some("--"));
	}

	#[test]
	fn t_interspersed() {
		let (flags, all, brief, ..) = flags();
		let mut flags = flags.with_interspersed(false);
		let args = flags.parse(["-a", "cmd", "-b", "--", "x"]).unwrap();
		assert_eq!(args, ["cmd", "-b", "--", "x"]);
		assert!(all.get());
		assert!(! brief.get());
		assert_eq!(flags.args_len_at_dash(), None);
	}

	#[test]
	fn t_errors() {
		let (mut flags, ..) = flags();

		assert_eq!(
			flags.parse(["--nope"]),
			Err(ParseError::UnknownFlag { token: "--nope".to_owned(), name: "nope".to_owned() }),
		);
		assert_eq!(
			flags.parse(["-az"]),
			Err(ParseError::UnknownFlag { token: "-az".to_owned(), name: "z".to_owned() }),
		);
		assert_eq!(
			flags.parse(["--level"]),
			Err(ParseError::MissingValue { token: "--level".to_owned(), flag: "level".to_owned() }),
		);
		assert_eq!(
			flags.parse(["-al"]),
			Err(ParseError::MissingValue { token: "-al".to_owned(), flag: "level".to_owned() }),
		);
		assert!(matches!(
			flags.parse(["--level=high"]),
			Err(ParseError::InvalidValue { ref token, ref flag, .. })
				if token == "--level=high" && flag == "level"
		));
		assert_eq!(
			flags.parse(["--=x"]),
			Err(ParseError::BadSyntax { token: "--=x".to_owned() }),
		);
		assert_eq!(
			flags.parse(["---a"]),
			Err(ParseError::BadSyntax { token: "---a".to_owned() }),
		);

		// Ambiguity.
		flags.register("allow", None, Slot::new(false), "Allow.", None).unwrap();
		assert!(matches!(
			flags.parse(["--al"]),
			Err(ParseError::AmbiguousFlag { ref candidates, .. })
				if candidates == &["all", "allow"]
		));
	}

	#[test]
	fn t_first_failure_stops() {
		let (mut flags, all, brief, output, level) = flags();
		let res = flags.parse(["x", "-a", "--level=2", "y", "--bogus", "-b", "--output=z", "w"]);
		assert!(matches!(res, Err(ParseError::UnknownFlag { .. })));

		// Everything before stuck.
		assert!(all.get());
		assert_eq!(level.get(), 2);
		assert_eq!(flags.args(), ["x", "y"]);

		// Nothing after happened.
		assert!(! brief.get());
		assert_eq!(output.get(), "");
		assert!(! flags.changed("brief"));
	}

	#[test]
	fn t_last_write_wins() {
		let (mut flags, _, _, output, _) = flags();
		let tags = StringList::default();
		let wait = Slot::new(Duration::ZERO);
		flags.register("tag", Some('t'), tags.clone(), "Tags.", None).unwrap();
		flags.register("wait", Some('w'), wait.clone(), "Wait.", None).unwrap();

		flags.parse(["-o", "a", "--output=b", "-t", "x", "--tag=y,z", "-w1m", "--wait", "1.5s"]).unwrap();
		assert_eq!(output.get(), "b");
		assert_eq!(tags.get(), ["x", "y", "z"]);
		assert_eq!(wait.get(), Duration::from_millis(1500));
		assert!(flags.changed("output"));
	}

	#[test]
	fn t_os() {
		let (mut flags, all, ..) = flags();
		assert_eq!(
			flags.parse_os([OsString::from("-a"), OsString::from("x")]).map(<[String]>::to_vec),
			Ok(vec!["x".to_owned()]),
		);
		assert!(all.get());

		#[cfg(unix)]
		{
			use std::os::unix::ffi::OsStringExt;
			let bad = OsString::from_vec(vec![b'-', 0xff]);
			assert_eq!(
				flags.parse_os([OsString::from("-b"), bad.clone()]),
				Err(ParseError::InvalidUtf8(bad)),
			);
			assert!(! flags.changed("brief"), "Nothing should be parsed.");
			assert!(flags.args().is_empty());
			assert_eq!(flags.n_arg(), 0);
			assert!(flags.parsed());
		}
	}

	/// # Child Process Mode.
	///
	/// When set, [`t_terminate`] is running as its own child and should
	/// do the thing that exits.
	const CHILD_MODE: &str = "TARTAN_TERMINATE_CHILD";

	/// # Run Child.
	///
	/// Re-run [`t_terminate`] as a child process in the given mode, returning
	/// its exit code, STDOUT, and STDERR.
	fn run_child(mode: &str) -> (Option<i32>, String, String) {
		let out = std::process::Command::new(std::env::current_exe().expect("Missing test binary."))
			.args(["parse::test::t_terminate", "--exact"])
			.env(CHILD_MODE, mode)
			.output()
			.expect("Unable to run child.");

		(
			out.status.code(),
			String::from_utf8_lossy(&out.stdout).into_owned(),
			String::from_utf8_lossy(&out.stderr).into_owned(),
		)
	}

	#[test]
	fn t_terminate() {
		match std::env::var(CHILD_MODE).as_deref() {
			// Default output.
			Ok("stderr") => {
				let (mut flags, ..) = flags();
				let _res = flags.parse_with(["-a", "--nope"], ErrorPolicy::Terminate);
				unreachable!("Terminate should have exited.");
			},
			// Custom output.
			Ok("stdout") => {
				let (flags, ..) = flags();
				let mut flags = flags.with_output(std::io::stdout());
				let _res = flags.parse_with(["--level"], ErrorPolicy::Terminate);
				unreachable!("Terminate should have exited.");
			},
			// The real arguments: the test filter, then --exact.
			Ok("env") => {
				let mut flags = FlagSet::new("test", ErrorPolicy::Terminate);
				flags.register("all", Some('a'), Slot::new(false), "All.", None)
					.expect("Registration failed.");
				let _res = flags.parse_env();
				unreachable!("Terminate should have exited.");
			},
			_ => {},
		}

		let (code, _, stderr) = run_child("stderr");
		assert_eq!(code, Some(2), "Wrong exit code.");
		assert!(
			stderr.contains("Error: unknown flag: --nope\n"),
			"Unexpected STDERR: {stderr:?}",
		);

		let (code, stdout, stderr) = run_child("stdout");
		assert_eq!(code, Some(2), "Wrong exit code.");
		assert!(
			stdout.contains("Error: flag needs an argument: --level (from --level)\n"),
			"Unexpected STDOUT: {stdout:?}",
		);
		assert!(! stderr.contains("Error:"), "Custom output should replace STDERR.");

		let (code, _, stderr) = run_child("env");
		assert_eq!(code, Some(2), "Wrong exit code.");
		assert!(
			stderr.contains("Error: unknown flag: --exact\n"),
			"Unexpected STDERR: {stderr:?}",
		);
	}

	#[test]
	fn t_report_output() {
		// Report never writes to the output, even when there is one.
		let (flags, ..) = flags();
		let mut flags = flags.with_output(std::io::sink());
		assert!(flags.parse(["--nope"]).is_err());
	}

	#[test]
	#[should_panic(expected = "unknown flag: --nope")]
	fn t_escalate() {
		let (mut flags, ..) = flags();
		let _res = flags.parse_with(["--nope"], ErrorPolicy::Escalate);
	}
}

//! Strongly typed identifiers enforced across the adapter domain.

// std
use std::{borrow::Borrow, ops::Deref};
// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
		#[serde(try_from = "String", into = "String")]
		pub struct $name(String);
		impl $name {
			/// Creates a new identifier after validation.
			pub fn new(value: impl AsRef<str>) -> Result<Self, IdentifierError> {
				let view = value.as_ref();

				validate_view($kind, view)?;

				Ok(Self(view.to_owned()))
			}
		}
		impl Deref for $name {
			type Target = str;

			fn deref(&self) -> &Self::Target {
				&self.0
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl From<$name> for String {
			fn from(value: $name) -> Self {
				value.0
			}
		}
		impl TryFrom<String> for $name {
			type Error = IdentifierError;

			fn try_from(value: String) -> Result<Self, Self::Error> {
				validate_view($kind, &value)?;

				Ok(Self(value))
			}
		}
		impl Borrow<str> for $name {
			fn borrow(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
		impl FromStr for $name {
			type Err = IdentifierError;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Self::new(s)
			}
		}
	};
}

const IDENTIFIER_MAX_LEN: usize = 128;

/// Error returned when identifier validation fails.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ThisError)]
pub enum IdentifierError {
	/// The identifier was empty or whitespace.
	#[error("{kind} identifier cannot be empty.")]
	Empty {
		/// Kind of identifier (app, service).
		kind: &'static str,
	},
	/// The identifier contains whitespace characters.
	#[error("{kind} identifier contains whitespace.")]
	ContainsWhitespace {
		/// Kind of identifier (app, service).
		kind: &'static str,
	},
	/// The identifier exceeded the allowed character count.
	#[error("{kind} identifier exceeds {max} characters.")]
	TooLong {
		/// Kind of identifier (app, service).
		kind: &'static str,
		/// Maximum permitted character count.
		max: usize,
	},
}

def_id! { AppName, "Name of a registered platform application (consumer key owner).", "App" }
def_id! { ServiceName, "Registry name of an adapter; doubles as its secret-store namespace.", "Service" }

impl AppName {
	/// App name used when callers do not pick one.
	pub const DEFAULT: &'static str = "default";

	/// Returns the `default` app name.
	pub fn default_app() -> Self {
		Self(Self::DEFAULT.to_owned())
	}
}
impl Default for AppName {
	fn default() -> Self {
		Self::default_app()
	}
}
impl ServiceName {
	/// Registry name of the Twitter adapter.
	pub const TWITTER: &'static str = "twitter";

	/// Returns the `twitter` service name.
	pub fn twitter() -> Self {
		Self(Self::TWITTER.to_owned())
	}
}

fn validate_view(kind: &'static str, view: &str) -> Result<(), IdentifierError> {
	if view.is_empty() {
		return Err(IdentifierError::Empty { kind });
	}
	if view.chars().any(char::is_whitespace) {
		return Err(IdentifierError::ContainsWhitespace { kind });
	}
	if view.chars().count() > IDENTIFIER_MAX_LEN {
		return Err(IdentifierError::TooLong { kind, max: IDENTIFIER_MAX_LEN });
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn identifiers_reject_whitespace_and_empty_values() {
		assert!(AppName::new(" default").is_err(), "Leading whitespace must be rejected.");
		assert!(AppName::new("default ").is_err(), "Trailing whitespace must be rejected.");

		let app = AppName::new("collector-1").expect("App fixture should be considered valid.");

		assert_eq!(app.as_ref(), "collector-1");
		assert!(ServiceName::new("").is_err());
		assert!(ServiceName::new("with space").is_err());
	}

	#[test]
	fn default_app_name_is_default() {
		assert_eq!(AppName::default().as_ref(), "default");
		assert_eq!(AppName::default_app(), AppName::new("default").expect("Valid app name."));
	}

	#[test]
	fn serde_round_trip_enforces_validation() {
		let app: AppName =
			serde_json::from_str("\"default\"").expect("App name should deserialize successfully.");

		assert_eq!(app.as_ref(), "default");
		assert!(serde_json::from_str::<AppName>("\"with space\"").is_err());
		assert!(serde_json::from_str::<ServiceName>("\"\"").is_err());
	}

	#[test]
	fn unicode_whitespace_and_length_limits() {
		let nbsp = format!("app{}name", '\u{00A0}');

		assert!(AppName::new(&nbsp).is_err());

		let exact = "a".repeat(IDENTIFIER_MAX_LEN);

		AppName::new(&exact).expect("Exact length should succeed.");

		let too_long = "a".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(
			AppName::new(&too_long),
			Err(IdentifierError::TooLong { kind: "App", max: IDENTIFIER_MAX_LEN })
		));
	}

	#[test]
	fn length_limit_counts_characters_not_bytes() {
		let wide = "é".repeat(IDENTIFIER_MAX_LEN);

		assert_eq!(wide.len(), IDENTIFIER_MAX_LEN * 2);
		AppName::new(&wide).expect("Multi-byte names within the character limit should succeed.");

		let too_long = "é".repeat(IDENTIFIER_MAX_LEN + 1);

		assert!(matches!(
			AppName::new(&too_long),
			Err(IdentifierError::TooLong { kind: "App", max: IDENTIFIER_MAX_LEN })
		));
	}

	#[test]
	fn borrow_supports_fast_lookup() {
		let map: HashMap<AppName, u8> = HashMap::from_iter([(
			AppName::new("default").expect("App used for lookup should be valid."),
			7_u8,
		)]);

		assert_eq!(map.get("default"), Some(&7));
	}
}

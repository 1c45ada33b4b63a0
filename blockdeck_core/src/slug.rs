use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::BlockdeckError;
use crate::BlockdeckResult;

/// The default template suffix: a templating-language marker followed by the
/// base extension.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".blade.php";

/// A two-part file suffix identifying block templates, such as `.blade.php`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateSuffix(String);

impl TemplateSuffix {
	/// Validate a suffix. It must start with a dot and hold exactly two
	/// non-empty extensions.
	pub fn new(suffix: impl Into<String>) -> BlockdeckResult<Self> {
		let suffix = suffix.into();
		let Some(rest) = suffix.strip_prefix('.') else {
			return Err(BlockdeckError::InvalidSuffix(suffix));
		};

		let segments: Vec<&str> = rest.split('.').collect();
		if segments.len() != 2 || segments.iter().any(|segment| segment.is_empty()) {
			return Err(BlockdeckError::InvalidSuffix(suffix));
		}

		Ok(Self(suffix))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// The file name of the template for `slug`.
	pub fn file_name(&self, slug: &str) -> String {
		format!("{slug}{}", self.0)
	}

	/// Strip the suffix from `file_name` to recover the block slug. Returns
	/// `None` if the name does not end with the suffix or nothing is left
	/// once it is removed.
	pub fn slug<'a>(&self, file_name: &'a str) -> Option<&'a str> {
		file_name
			.strip_suffix(self.0.as_str())
			.filter(|slug| !slug.is_empty())
	}
}

impl Default for TemplateSuffix {
	fn default() -> Self {
		Self(DEFAULT_TEMPLATE_SUFFIX.to_string())
	}
}

impl fmt::Display for TemplateSuffix {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl TryFrom<String> for TemplateSuffix {
	type Error = BlockdeckError;

	fn try_from(value: String) -> Result<Self, Self::Error> {
		Self::new(value)
	}
}

impl From<TemplateSuffix> for String {
	fn from(value: TemplateSuffix) -> Self {
		value.0
	}
}

use std::path::Path;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::assets::AssetResolver;
use crate::header::HeaderField;
use crate::header::TemplateHeaderFields;
use crate::report::ErrorReporter;

/// Render callback bound to every registered block.
pub const RENDER_CALLBACK: &str = "blockdeck::render";

/// Format of a fully qualified block name, e.g. `core/group`.
pub const BLOCK_NAME_PATTERN: &str = r"^[a-z]+/[a-z][a-z0-9-]+$";

static BLOCK_NAME_RE: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(BLOCK_NAME_PATTERN).expect("block name pattern is valid"));

/// Normalized block registration record handed to the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockDescriptor {
	pub name: String,
	pub title: String,
	pub description: String,
	pub category: String,
	pub icon: String,
	pub keywords: Vec<String>,
	pub mode: String,
	pub align: String,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub supports: Option<Supports>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub post_types: Option<Vec<String>>,
	/// Allowed parent blocks. Entries that failed validation are `None`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub parent: Option<Vec<Option<String>>>,
	pub enqueue_style: String,
	pub enqueue_script: String,
	pub enqueue_assets: String,
	pub render_callback: String,
	pub example: BlockExample,
}

/// Editor features a block opts into or out of. Unset capabilities keep the
/// host's defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Supports {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub align: Option<AlignSupport>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub anchor: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub mode: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub jsx: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub align_text: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub align_content: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub full_height: Option<bool>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub multiple: Option<bool>,
}

impl Supports {
	pub fn is_empty(&self) -> bool {
		*self == Self::default()
	}
}

/// Alignment support: either toggled wholesale or limited to a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AlignSupport {
	Enabled(bool),
	Allowed(Vec<String>),
}

/// Attributes the editor uses to show an inserter preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockExample {
	pub attributes: BlockExampleAttributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockExampleAttributes {
	pub mode: String,
}

impl Default for BlockExample {
	fn default() -> Self {
		Self {
			attributes: BlockExampleAttributes {
				mode: "preview".to_string(),
			},
		}
	}
}

/// A template file that passed the suffix check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateFile {
	pub slug: String,
	pub file_name: String,
	pub directory: PathBuf,
}

impl TemplateFile {
	pub fn path(&self) -> PathBuf {
		self.directory.join(&self.file_name)
	}

	fn display(&self) -> String {
		format!("{}/{}", display_dir(&self.directory), self.file_name)
	}
}

fn display_dir(dir: &Path) -> String {
	dir.display().to_string().trim_end_matches('/').to_string()
}

/// Build the descriptor of `template` from its header fields.
///
/// Missing titles and categories are reported but do not stop the
/// descriptor from being built. Asset headers go through `assets`, which may
/// register deferred enqueue actions.
pub fn build_descriptor(
	template: &TemplateFile,
	fields: &TemplateHeaderFields,
	reporter: &dyn ErrorReporter,
	assets: &mut AssetResolver<'_>,
) -> BlockDescriptor {
	let field = |f: HeaderField| fields.get(f).to_string();

	if fields.get(HeaderField::Title).is_empty() {
		reporter.report(
			&format!("This block needs a title: {}", template.display()),
			"Block title missing",
		);
	}

	if fields.get(HeaderField::Category).is_empty() {
		reporter.report(
			&format!("This block needs a category: {}", template.display()),
			"Block category missing",
		);
	}

	let mut enqueue_style = field(HeaderField::EnqueueStyle);
	if !enqueue_style.is_empty() {
		enqueue_style = assets.resolve(&enqueue_style, &template.slug);
	}

	let mut enqueue_script = field(HeaderField::EnqueueScript);
	if !enqueue_script.is_empty() {
		enqueue_script = assets.resolve(&enqueue_script, &template.slug);
	}

	let post_types = Some(fields.get(HeaderField::PostTypes))
		.filter(|raw| !raw.is_empty())
		.map(split_words);

	let parent = Some(fields.get(HeaderField::Parent))
		.filter(|raw| !raw.is_empty())
		.map(|raw| {
			raw.split(' ')
				.map(|name| validate_block_name(name, reporter))
				.collect()
		});

	let supports = Some(build_supports(fields)).filter(|supports| !supports.is_empty());

	BlockDescriptor {
		name: template.slug.clone(),
		title: field(HeaderField::Title),
		description: field(HeaderField::Description),
		category: field(HeaderField::Category),
		icon: field(HeaderField::Icon),
		keywords: split_words(fields.get(HeaderField::Keywords)),
		mode: field(HeaderField::Mode),
		align: field(HeaderField::Align),
		supports,
		post_types,
		parent,
		enqueue_style,
		enqueue_script,
		enqueue_assets: field(HeaderField::EnqueueAssets),
		render_callback: RENDER_CALLBACK.to_string(),
		example: BlockExample::default(),
	}
}

fn build_supports(fields: &TemplateHeaderFields) -> Supports {
	let flag = |f: HeaderField| {
		Some(fields.get(f))
			.filter(|raw| !raw.is_empty())
			.and_then(coerce_bool)
	};

	let align = Some(fields.get(HeaderField::SupportsAlign))
		.filter(|raw| !raw.is_empty())
		.map(|raw| {
			match raw {
				"true" => AlignSupport::Enabled(true),
				"false" => AlignSupport::Enabled(false),
				list => AlignSupport::Allowed(split_words(list)),
			}
		});

	Supports {
		align,
		anchor: flag(HeaderField::SupportsAnchor),
		mode: flag(HeaderField::SupportsMode),
		jsx: flag(HeaderField::SupportsJsx),
		align_text: flag(HeaderField::SupportsAlignText),
		align_content: flag(HeaderField::SupportsAlignContent),
		full_height: flag(HeaderField::SupportsFullHeight),
		multiple: flag(HeaderField::SupportsMultiple),
	}
}

/// Split a header value on single spaces. An empty value yields no words.
pub fn split_words(raw: &str) -> Vec<String> {
	if raw.is_empty() {
		return Vec::new();
	}

	raw.split(' ').map(str::to_string).collect()
}

/// Permissive boolean parsing: `true`, `1`, `yes`, `on` and `false`, `0`,
/// `no`, `off` in any case, ignoring surrounding whitespace. Anything else
/// is `None`.
pub fn coerce_bool(raw: &str) -> Option<bool> {
	let value = raw.trim().to_ascii_lowercase();
	match value.as_str() {
		"true" | "1" | "yes" | "on" => Some(true),
		"false" | "0" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Check the format of a parent block name. Only the format is checked; the
/// named block may be registered later by someone else.
pub fn validate_block_name(name: &str, reporter: &dyn ErrorReporter) -> Option<String> {
	if BLOCK_NAME_RE.is_match(name) {
		return Some(name.to_string());
	}

	reporter.report(
		&format!("Invalid parent block name format: {name}"),
		"Invalid parent block name",
	);
	None
}

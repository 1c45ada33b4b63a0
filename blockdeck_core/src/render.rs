use derive_more::Deref;
use derive_more::DerefMut;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

use crate::BlockdeckResult;
use crate::filters::Filters;
use crate::host::HostEnvironment;
use crate::host::ViewRef;
use crate::registry::BlockSettings;
use crate::registry::template_directories;

/// Prefix removed from a template directory to form its view name.
const VIEWS_PREFIX: &str = "views/";

/// A block instance the host asks to render.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlockInstance {
	/// Fully qualified block identifier, e.g. `acf/hero`.
	pub name: String,
	/// Instance attributes such as `className`, `align`, `anchor` or `mode`.
	#[serde(default)]
	pub attributes: Map<String, Value>,
	/// Rendered inner content.
	#[serde(default)]
	pub content: String,
	/// Whether the block is rendered as an editor preview.
	#[serde(default)]
	pub is_preview: bool,
	/// The post the block belongs to.
	#[serde(default)]
	pub post_id: i64,
}

impl BlockInstance {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			..Self::default()
		}
	}

	#[must_use]
	pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
		self.attributes.insert(key.into(), value.into());
		self
	}

	#[must_use]
	pub fn with_content(mut self, content: impl Into<String>) -> Self {
		self.content = content.into();
		self
	}

	#[must_use]
	pub fn with_preview(mut self, is_preview: bool) -> Self {
		self.is_preview = is_preview;
		self
	}

	#[must_use]
	pub fn with_post_id(mut self, post_id: i64) -> Self {
		self.post_id = post_id;
		self
	}
}

/// The data a block template is rendered with, exposed to it as `block`.
/// Data filters may add, remove or rename any key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Deref, DerefMut)]
#[serde(transparent)]
pub struct BlockRecord(Map<String, Value>);

impl BlockRecord {
	pub fn new() -> Self {
		Self::default()
	}

	/// The string value of `key`, or `""` when missing or not a string.
	pub fn str(&self, key: &str) -> &str {
		self.0.get(key).and_then(Value::as_str).unwrap_or_default()
	}
}

impl From<Map<String, Value>> for BlockRecord {
	fn from(map: Map<String, Value>) -> Self {
		Self(map)
	}
}

/// Maps a render request back to its template and renders it.
#[derive(Debug, Clone, Copy)]
pub struct RenderDispatcher<'a> {
	settings: &'a BlockSettings,
	filters: &'a Filters,
}

impl<'a> RenderDispatcher<'a> {
	pub fn new(settings: &'a BlockSettings, filters: &'a Filters) -> Self {
		Self { settings, filters }
	}

	/// Build the record the template for `instance` is rendered with. The
	/// data filter for the block has already run and `classes` is joined.
	pub fn prepare(&self, instance: BlockInstance) -> (String, BlockRecord) {
		let slug = self.slug_of(&instance.name).to_string();

		let mut record = BlockRecord::new();
		record.insert("className".into(), Value::String(String::new()));
		record.insert("name".into(), Value::String(instance.name));
		record.extend(instance.attributes);

		record.insert("post_id".into(), Value::from(instance.post_id));
		record.insert("is_preview".into(), Value::Bool(instance.is_preview));
		record.insert("content".into(), Value::String(instance.content));
		record.insert("slug".into(), Value::String(slug.clone()));
		if record.get("anchor").is_none_or(Value::is_null) {
			record.insert("anchor".into(), Value::String(String::new()));
		}

		let classes = initial_classes(&slug, &record, instance.is_preview);
		record.insert("classes".into(), Value::Array(classes));

		let mut record = self.filters.apply_data(&slug, record);
		join_classes(&mut record);

		(slug, record)
	}

	/// Render `instance` once for every template directory holding its
	/// template, concatenating the output. No matching template renders
	/// nothing.
	pub fn dispatch(
		&self,
		host: &dyn HostEnvironment,
		instance: BlockInstance,
	) -> BlockdeckResult<String> {
		let (slug, record) = self.prepare(instance);
		let context = json!({ "block": record });
		let mut output = String::new();

		for directory in template_directories(self.settings, self.filters, host) {
			let path = directory
				.path
				.join(self.settings.template_suffix.file_name(&slug));
			if !path.is_file() {
				continue;
			}

			let view = ViewRef {
				name: view_name(&directory.relative, &slug),
				path,
			};
			tracing::debug!(view = %view.name, "rendering block");
			output.push_str(&host.render_view(&view, &context)?);
		}

		if output.is_empty() {
			tracing::debug!(slug, "no template rendered for block");
		}

		Ok(output)
	}

	fn slug_of<'n>(&self, name: &'n str) -> &'n str {
		name.strip_prefix(self.settings.block_namespace.as_str())
			.and_then(|rest| rest.strip_prefix('/'))
			.unwrap_or(name)
	}
}

/// The view name for `slug` in `directory`, with a leading `views/` removed.
pub fn view_name(directory: &str, slug: &str) -> String {
	let directory = directory.strip_prefix(VIEWS_PREFIX).unwrap_or(directory);
	format!("{}/{slug}", directory.trim_end_matches('/'))
}

fn initial_classes(slug: &str, record: &BlockRecord, is_preview: bool) -> Vec<Value> {
	let class_name = record.get("className").map(to_class).unwrap_or_default();
	let align = record.get("align").map(to_class).unwrap_or_default();

	vec![
		Value::String(slug.to_string()),
		Value::String(class_name),
		if is_preview {
			Value::String("is-preview".to_string())
		} else {
			Value::Null
		},
		Value::String(format!("align{align}")),
	]
}

/// Join an array-valued `classes` entry into one space-separated string,
/// dropping empty entries. Any other value is left as the filter set it.
fn join_classes(record: &mut BlockRecord) {
	let Some(Value::Array(classes)) = record.get("classes") else {
		return;
	};

	let joined = classes
		.iter()
		.filter(|class| !is_falsy(class))
		.map(to_class)
		.filter(|class| !class.is_empty())
		.collect::<Vec<_>>()
		.join(" ");
	record.insert("classes".into(), Value::String(joined));
}

fn to_class(value: &Value) -> String {
	match value {
		Value::String(s) => s.clone(),
		Value::Number(n) => n.to_string(),
		Value::Bool(true) => "1".to_string(),
		Value::Bool(false) | Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
	}
}

fn is_falsy(value: &Value) -> bool {
	match value {
		Value::Null | Value::Bool(false) => true,
		Value::String(s) => s.is_empty() || s == "0",
		Value::Number(n) => n.as_f64() == Some(0.0),
		Value::Array(items) => items.is_empty(),
		Value::Object(map) => map.is_empty(),
		Value::Bool(true) => false,
	}
}

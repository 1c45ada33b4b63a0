use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use crate::BlockdeckError;
use crate::BlockdeckResult;
use crate::assets::AssetPipeline;
use crate::config::BlockdeckConfig;
use crate::descriptor::BlockDescriptor;

/// A view the dispatcher asks the host to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRef {
	/// Dotted-path style view name relative to the host's view root, e.g.
	/// `blocks/hero`.
	pub name: String,
	/// Absolute path of the template file backing the view.
	pub path: PathBuf,
}

/// Capabilities of the content-management host that blocks are registered
/// with and rendered by. One implementation is selected at startup.
pub trait HostEnvironment {
	/// Map a configured template directory to a filesystem path.
	fn resolve_directory(&self, relative: &str) -> PathBuf;

	/// The asset pipeline generation available on this host.
	fn asset_pipeline(&self) -> AssetPipeline;

	/// Look up `path` in the bundler manifest.
	fn manifest_asset(&self, path: &str) -> Option<String>;

	/// Convert a `styles/...` or `scripts/...` path to a public URL.
	fn legacy_asset_url(&self, path: &str) -> String;

	/// Whether the fully qualified block `name` is used on the current page
	/// or in the current editor session.
	fn has_block(&self, name: &str) -> bool;

	/// Enqueue an asset bundle for the current request.
	fn enqueue_bundle(&self, path: &str);

	/// Render `view` with `context` and return the markup.
	fn render_view(&self, view: &ViewRef, context: &serde_json::Value) -> BlockdeckResult<String>;
}

/// The host's block registration API. Descriptors are handed over by value.
pub trait BlockRegistrar {
	fn register_block(&mut self, descriptor: BlockDescriptor);
}

impl BlockRegistrar for Vec<BlockDescriptor> {
	fn register_block(&mut self, descriptor: BlockDescriptor) {
		self.push(descriptor);
	}
}

/// A host backed by a project directory on disk. Views are rendered with
/// `minijinja`.
#[derive(Debug)]
pub struct LocalHost {
	resources: PathBuf,
	pipeline: AssetPipeline,
	manifest: HashMap<String, String>,
	base_url: String,
	page_blocks: HashSet<String>,
	enqueued: RefCell<Vec<String>>,
}

impl LocalHost {
	/// A host resolving template directories against `resources`, using the
	/// legacy asset pipeline and no base URL.
	pub fn new(resources: impl Into<PathBuf>) -> Self {
		Self {
			resources: resources.into(),
			pipeline: AssetPipeline::Legacy,
			manifest: HashMap::new(),
			base_url: String::new(),
			page_blocks: HashSet::new(),
			enqueued: RefCell::new(Vec::new()),
		}
	}

	/// Build a host for the project at `root`. The asset manifest is only
	/// read when the manifest pipeline is configured.
	pub fn from_config(root: &Path, config: &BlockdeckConfig) -> BlockdeckResult<Self> {
		let mut host = Self::new(root.join(&config.resources))
			.with_pipeline(config.assets.pipeline)
			.with_base_url(config.assets.base_url.clone());

		if config.assets.pipeline == AssetPipeline::Manifest {
			let manifest_path = root.join(&config.assets.manifest);
			host.manifest = load_manifest(&manifest_path)?;
		}

		Ok(host)
	}

	#[must_use]
	pub fn with_pipeline(mut self, pipeline: AssetPipeline) -> Self {
		self.pipeline = pipeline;
		self
	}

	#[must_use]
	pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
		self.base_url = base_url.into();
		self
	}

	#[must_use]
	pub fn with_manifest_entry(mut self, path: impl Into<String>, file: impl Into<String>) -> Self {
		self.manifest.insert(path.into(), file.into());
		self
	}

	/// Mark fully qualified block names as present on the current page.
	#[must_use]
	pub fn with_page_blocks<I, S>(mut self, blocks: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.add_page_blocks(blocks);
		self
	}

	pub fn add_page_blocks<I, S>(&mut self, blocks: I)
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.page_blocks.extend(blocks.into_iter().map(Into::into));
	}

	pub fn resources(&self) -> &Path {
		&self.resources
	}

	/// Bundles enqueued so far, in order.
	pub fn enqueued(&self) -> Vec<String> {
		self.enqueued.borrow().clone()
	}

	fn url(&self, file: &str) -> String {
		if self.base_url.is_empty() {
			return file.to_string();
		}

		format!(
			"{}/{}",
			self.base_url.trim_end_matches('/'),
			file.trim_start_matches('/')
		)
	}
}

impl HostEnvironment for LocalHost {
	fn resolve_directory(&self, relative: &str) -> PathBuf {
		self.resources.join(relative)
	}

	fn asset_pipeline(&self) -> AssetPipeline {
		self.pipeline
	}

	fn manifest_asset(&self, path: &str) -> Option<String> {
		self.manifest.get(path).map(|file| self.url(file))
	}

	fn legacy_asset_url(&self, path: &str) -> String {
		self.url(path)
	}

	fn has_block(&self, name: &str) -> bool {
		self.page_blocks.contains(name)
	}

	fn enqueue_bundle(&self, path: &str) {
		tracing::debug!(path, "enqueue bundle");
		self.enqueued.borrow_mut().push(path.to_string());
	}

	fn render_view(&self, view: &ViewRef, context: &serde_json::Value) -> BlockdeckResult<String> {
		let source = std::fs::read_to_string(&view.path)?;

		let mut env = minijinja::Environment::new();
		env.set_keep_trailing_newline(true);
		env.set_undefined_behavior(minijinja::UndefinedBehavior::Chainable);

		let ctx = minijinja::Value::from_serialize(context);
		env.render_named_str(&view.name, &source, ctx)
			.map_err(|e| {
				BlockdeckError::TemplateRender {
					view: view.name.clone(),
					reason: e.to_string(),
				}
			})
	}
}

/// Read a bundler manifest. Entries map a source path either to the built
/// file name or to an object with a `file` key.
fn load_manifest(path: &Path) -> BlockdeckResult<HashMap<String, String>> {
	let display = path.display().to_string();
	let content = std::fs::read_to_string(path).map_err(|e| {
		BlockdeckError::ManifestParse {
			path: display.clone(),
			reason: e.to_string(),
		}
	})?;

	let value: serde_json::Value =
		serde_json::from_str(&content).map_err(|e| BlockdeckError::ManifestParse {
			path: display.clone(),
			reason: e.to_string(),
		})?;

	let serde_json::Value::Object(entries) = value else {
		return Err(BlockdeckError::ManifestParse {
			path: display,
			reason: "expected a JSON object".to_string(),
		});
	};

	let mut manifest = HashMap::new();
	for (key, entry) in entries {
		let file = match entry {
			serde_json::Value::String(file) => file,
			serde_json::Value::Object(mut object) => {
				match object.remove("file") {
					Some(serde_json::Value::String(file)) => file,
					_ => continue,
				}
			}
			_ => continue,
		};
		manifest.insert(key, file);
	}

	Ok(manifest)
}

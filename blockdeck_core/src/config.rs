use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::BlockdeckError;
use crate::BlockdeckResult;
use crate::assets::AssetPipeline;
use crate::header::DEFAULT_MAX_HEADER_BYTES;
use crate::slug::TemplateSuffix;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = [
	"blockdeck.toml",
	".blockdeck.toml",
	".config/blockdeck.toml",
];

/// Template directory used when none are configured.
pub const DEFAULT_TEMPLATE_DIRECTORY: &str = "views/blocks";

/// Namespace of runtime block identifiers, as in `acf/hero`.
pub const DEFAULT_BLOCK_NAMESPACE: &str = "acf";

/// Namespace of filter hook names, as in `sage/blocks/hero/data`.
pub const DEFAULT_HOOK_NAMESPACE: &str = "sage";

/// Root that template directories resolve against.
pub const DEFAULT_RESOURCES_DIR: &str = "resources";

/// Default location of the bundler manifest.
pub const DEFAULT_MANIFEST_PATH: &str = "public/manifest.json";

/// Configuration loaded from a `blockdeck.toml` file.
///
/// ```toml
/// block_namespace = "acf"
/// hook_namespace = "sage"
/// template_suffix = ".blade.php"
/// resources = "resources"
/// max_header_bytes = 8192
///
/// [templates]
/// directories = ["views/blocks"]
///
/// [assets]
/// pipeline = "legacy"
/// base_url = "/dist"
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BlockdeckConfig {
	/// Prefix of block identifiers received at render time.
	#[serde(default = "default_block_namespace")]
	pub block_namespace: String,
	/// Prefix of extension filter hook names.
	#[serde(default = "default_hook_namespace")]
	pub hook_namespace: String,
	/// Two-part suffix identifying block templates.
	#[serde(default)]
	pub template_suffix: TemplateSuffix,
	/// Directory, relative to the project root, that template directories
	/// are resolved against.
	#[serde(default = "default_resources")]
	pub resources: PathBuf,
	/// Number of bytes read from the top of each template when parsing
	/// headers.
	#[serde(default = "default_max_header_bytes")]
	pub max_header_bytes: u64,
	/// Template directory configuration.
	#[serde(default)]
	pub templates: TemplatesConfig,
	/// Asset pipeline configuration.
	#[serde(default)]
	pub assets: AssetsConfig,
}

/// Configuration for template directories.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplatesConfig {
	/// Ordered template directories, relative to `resources`. Blocks are
	/// registered in this order.
	#[serde(default = "default_directories")]
	pub directories: Vec<String>,
}

impl Default for TemplatesConfig {
	fn default() -> Self {
		Self {
			directories: default_directories(),
		}
	}
}

/// Configuration for resolving `EnqueueStyle` and `EnqueueScript` headers.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AssetsConfig {
	/// `manifest`, `bundle` or `legacy`.
	#[serde(default)]
	pub pipeline: AssetPipeline,
	/// Bundler manifest path relative to the project root. Only read by the
	/// `manifest` pipeline.
	#[serde(default = "default_manifest")]
	pub manifest: PathBuf,
	/// Public URL prefix for resolved assets.
	#[serde(default)]
	pub base_url: String,
}

impl Default for AssetsConfig {
	fn default() -> Self {
		Self {
			pipeline: AssetPipeline::default(),
			manifest: default_manifest(),
			base_url: String::new(),
		}
	}
}

impl Default for BlockdeckConfig {
	fn default() -> Self {
		Self {
			block_namespace: default_block_namespace(),
			hook_namespace: default_hook_namespace(),
			template_suffix: TemplateSuffix::default(),
			resources: default_resources(),
			max_header_bytes: default_max_header_bytes(),
			templates: TemplatesConfig::default(),
			assets: AssetsConfig::default(),
		}
	}
}

fn default_block_namespace() -> String {
	DEFAULT_BLOCK_NAMESPACE.to_string()
}

fn default_hook_namespace() -> String {
	DEFAULT_HOOK_NAMESPACE.to_string()
}

fn default_resources() -> PathBuf {
	PathBuf::from(DEFAULT_RESOURCES_DIR)
}

fn default_max_header_bytes() -> u64 {
	DEFAULT_MAX_HEADER_BYTES
}

fn default_directories() -> Vec<String> {
	vec![DEFAULT_TEMPLATE_DIRECTORY.to_string()]
}

fn default_manifest() -> PathBuf {
	PathBuf::from(DEFAULT_MANIFEST_PATH)
}

impl BlockdeckConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if no config file exists.
	pub fn load(root: &Path) -> BlockdeckResult<Option<BlockdeckConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config = Self::parse(&content)?;

		Ok(Some(config))
	}

	/// Parse and validate config file contents.
	pub fn parse(content: &str) -> BlockdeckResult<BlockdeckConfig> {
		let config: BlockdeckConfig =
			toml::from_str(content).map_err(|e| BlockdeckError::ConfigParse(e.to_string()))?;
		config.validate()?;

		Ok(config)
	}

	/// Check the namespaces. The template suffix is validated while parsing.
	pub fn validate(&self) -> BlockdeckResult<()> {
		for namespace in [&self.block_namespace, &self.hook_namespace] {
			if !is_valid_namespace(namespace) {
				return Err(BlockdeckError::InvalidNamespace(namespace.clone()));
			}
		}

		Ok(())
	}
}

fn is_valid_namespace(namespace: &str) -> bool {
	!namespace.is_empty()
		&& namespace
			.bytes()
			.all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

use std::path::PathBuf;

use serde::Serialize;

use crate::BlockdeckResult;
use crate::assets::AssetResolver;
use crate::config::BlockdeckConfig;
use crate::config::DEFAULT_BLOCK_NAMESPACE;
use crate::config::DEFAULT_HOOK_NAMESPACE;
use crate::config::DEFAULT_TEMPLATE_DIRECTORY;
use crate::descriptor::TemplateFile;
use crate::descriptor::build_descriptor;
use crate::filters::Filters;
use crate::header::DEFAULT_MAX_HEADER_BYTES;
use crate::header::read_headers;
use crate::hooks::LifecycleHooks;
use crate::host::BlockRegistrar;
use crate::host::HostEnvironment;
use crate::report::ErrorReporter;
use crate::slug::TemplateSuffix;

/// Options shared by the registry and the render dispatcher.
///
/// Use [`BlockSettings::default()`] for the stock layout or
/// [`BlockSettings::from_config`] to construct from a [`BlockdeckConfig`].
#[derive(Debug, Clone)]
pub struct BlockSettings {
	/// Prefix stripped from block identifiers at render time.
	pub block_namespace: String,
	/// Suffix identifying template files.
	pub template_suffix: TemplateSuffix,
	/// Template directories before the directory filter runs.
	pub directories: Vec<String>,
	/// Bytes read from each template when parsing headers.
	pub max_header_bytes: u64,
}

impl Default for BlockSettings {
	fn default() -> Self {
		Self {
			block_namespace: DEFAULT_BLOCK_NAMESPACE.to_string(),
			template_suffix: TemplateSuffix::default(),
			directories: vec![DEFAULT_TEMPLATE_DIRECTORY.to_string()],
			max_header_bytes: DEFAULT_MAX_HEADER_BYTES,
		}
	}
}

impl BlockSettings {
	/// Construct [`BlockSettings`] from a [`BlockdeckConfig`].
	pub fn from_config(config: Option<&BlockdeckConfig>) -> Self {
		let Some(config) = config else {
			return Self::default();
		};

		Self {
			block_namespace: config.block_namespace.clone(),
			template_suffix: config.template_suffix.clone(),
			directories: config.templates.directories.clone(),
			max_header_bytes: config.max_header_bytes,
		}
	}

	/// Filters with the hook namespace from `config`, or the default one.
	pub fn filters_for(config: Option<&BlockdeckConfig>) -> Filters {
		Filters::new(config.map_or(DEFAULT_HOOK_NAMESPACE, |c| c.hook_namespace.as_str()))
	}
}

/// A configured template directory that exists on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateDirectory {
	/// The directory as configured, e.g. `views/blocks`.
	pub relative: String,
	/// Where the host resolved it to.
	pub path: PathBuf,
}

/// Run the directory filter and resolve each entry through the host,
/// dropping directories that do not exist.
pub fn template_directories(
	settings: &BlockSettings,
	filters: &Filters,
	host: &dyn HostEnvironment,
) -> Vec<TemplateDirectory> {
	filters
		.apply_directories(settings.directories.clone())
		.into_iter()
		.filter_map(|relative| {
			let path = host.resolve_directory(&relative);
			if path.is_dir() {
				Some(TemplateDirectory { relative, path })
			} else {
				tracing::debug!(directory = %path.display(), "template directory missing, skipping");
				None
			}
		})
		.collect()
}

/// A block handed to the registrar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegisteredBlock {
	pub slug: String,
	pub path: PathBuf,
}

/// Outcome of a registration pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Registration {
	/// Registered blocks in registration order.
	pub blocks: Vec<RegisteredBlock>,
}

impl Registration {
	pub fn len(&self) -> usize {
		self.blocks.len()
	}

	pub fn is_empty(&self) -> bool {
		self.blocks.is_empty()
	}

	pub fn slugs(&self) -> impl Iterator<Item = &str> {
		self.blocks.iter().map(|block| block.slug.as_str())
	}
}

/// Discovers block templates and registers a descriptor for each.
#[derive(Debug, Clone, Copy)]
pub struct BlockRegistry<'a> {
	settings: &'a BlockSettings,
	filters: &'a Filters,
}

impl<'a> BlockRegistry<'a> {
	pub fn new(settings: &'a BlockSettings, filters: &'a Filters) -> Self {
		Self { settings, filters }
	}

	/// Walk every template directory in order and register one block per
	/// template. Files without the template suffix are ignored. Blocks are
	/// registered in directory listing order.
	///
	/// Header problems are sent to `reporter` and never abort the pass;
	/// filesystem errors do.
	pub fn register(
		&self,
		host: &dyn HostEnvironment,
		hooks: &mut LifecycleHooks,
		registrar: &mut dyn BlockRegistrar,
		reporter: &dyn ErrorReporter,
	) -> BlockdeckResult<Registration> {
		let mut registration = Registration::default();

		for directory in template_directories(self.settings, self.filters, host) {
			for entry in std::fs::read_dir(&directory.path)? {
				let entry = entry?;
				let path = entry.path();
				if path.is_dir() {
					continue;
				}

				let file_name = entry.file_name();
				let Some(file_name) = file_name.to_str() else {
					tracing::debug!(file = %path.display(), "skipping non UTF-8 file name");
					continue;
				};

				let Some(slug) = self.settings.template_suffix.slug(file_name) else {
					continue;
				};

				let template = TemplateFile {
					slug: slug.to_string(),
					file_name: file_name.to_string(),
					directory: directory.path.clone(),
				};

				let fields = read_headers(&path, self.settings.max_header_bytes)?;
				let mut assets = AssetResolver::new(host, hooks, &self.settings.block_namespace);
				let descriptor = build_descriptor(&template, &fields, reporter, &mut assets);
				let descriptor = self.filters.apply_register_data(&template.slug, descriptor);

				tracing::debug!(slug = %template.slug, file = %path.display(), "registering block");
				registrar.register_block(descriptor);
				registration.blocks.push(RegisteredBlock {
					slug: template.slug,
					path,
				});
			}
		}

		Ok(registration)
	}
}

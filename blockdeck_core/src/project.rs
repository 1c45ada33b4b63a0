use std::path::Path;
use std::path::PathBuf;

use crate::BlockdeckResult;
use crate::config::BlockdeckConfig;
use crate::filters::Filters;
use crate::hooks::LifecycleEvent;
use crate::hooks::LifecycleHooks;
use crate::host::BlockRegistrar;
use crate::host::LocalHost;
use crate::registry::BlockRegistry;
use crate::registry::BlockSettings;
use crate::registry::Registration;
use crate::render::BlockInstance;
use crate::render::RenderDispatcher;
use crate::report::ErrorReporter;

/// A project directory together with its loaded configuration, host and
/// extension points.
#[derive(Debug)]
pub struct Project {
	/// Project root directory.
	pub root: PathBuf,
	/// Where the config was loaded from, if a config file exists.
	pub config_path: Option<PathBuf>,
	pub config: BlockdeckConfig,
	pub settings: BlockSettings,
	pub filters: Filters,
	pub hooks: LifecycleHooks,
	pub host: LocalHost,
}

impl Project {
	/// Register every block template in the project.
	pub fn register(
		&mut self,
		registrar: &mut dyn BlockRegistrar,
		reporter: &dyn ErrorReporter,
	) -> BlockdeckResult<Registration> {
		BlockRegistry::new(&self.settings, &self.filters).register(
			&self.host,
			&mut self.hooks,
			registrar,
			reporter,
		)
	}

	/// Render a single block instance.
	pub fn render(&self, instance: BlockInstance) -> BlockdeckResult<String> {
		RenderDispatcher::new(&self.settings, &self.filters).dispatch(&self.host, instance)
	}

	/// Fire a lifecycle event on the project's host. Returns the enqueued
	/// asset paths.
	pub fn fire(&self, event: LifecycleEvent) -> Vec<String> {
		self.hooks.fire(event, &self.host)
	}
}

/// Load the project at `root`: read the discovered config (or defaults) and
/// build the filesystem host.
pub fn load_project(root: &Path) -> BlockdeckResult<Project> {
	let config_path = BlockdeckConfig::resolve_path(root);
	let config = BlockdeckConfig::load(root)?.unwrap_or_default();
	load_project_with_config(root, config, config_path)
}

/// Like [`load_project`], but with an already loaded config.
pub fn load_project_with_config(
	root: &Path,
	config: BlockdeckConfig,
	config_path: Option<PathBuf>,
) -> BlockdeckResult<Project> {
	config.validate()?;
	let settings = BlockSettings::from_config(Some(&config));
	let filters = BlockSettings::filters_for(Some(&config));
	let host = LocalHost::from_config(root, &config)?;

	Ok(Project {
		root: root.to_path_buf(),
		config_path,
		config,
		settings,
		filters,
		hooks: LifecycleHooks::new(),
		host,
	})
}

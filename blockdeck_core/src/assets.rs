use serde::Deserialize;
use serde::Serialize;

use crate::hooks::DEFERRED_ENQUEUE_PRIORITY;
use crate::hooks::DeferredEnqueue;
use crate::hooks::LifecycleEvent;
use crate::hooks::LifecycleHooks;
use crate::host::HostEnvironment;

/// Path prefixes that the legacy pipeline rewrites to asset URLs.
pub const LEGACY_ASSET_PREFIXES: [&str; 2] = ["styles", "scripts"];

/// The asset pipeline generation offered by the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetPipeline {
	/// A bundler manifest resolves asset paths directly.
	Manifest,
	/// Bundles are enqueued on demand, only on pages that use the block.
	#[serde(rename = "bundle")]
	DeferredBundle,
	/// Paths under `styles` or `scripts` map to URLs by a helper.
	#[default]
	Legacy,
}

/// Resolves the `EnqueueStyle` and `EnqueueScript` header values of a block.
pub struct AssetResolver<'a> {
	host: &'a dyn HostEnvironment,
	hooks: &'a mut LifecycleHooks,
	block_namespace: &'a str,
}

impl<'a> AssetResolver<'a> {
	pub fn new(
		host: &'a dyn HostEnvironment,
		hooks: &'a mut LifecycleHooks,
		block_namespace: &'a str,
	) -> Self {
		Self {
			host,
			hooks,
			block_namespace,
		}
	}

	/// Resolve `path` for the block `slug`.
	///
	/// With the deferred bundle pipeline nothing is enqueued now: two actions
	/// are registered (front end and editor) and an empty path is returned.
	pub fn resolve(&mut self, path: &str, slug: &str) -> String {
		match self.host.asset_pipeline() {
			AssetPipeline::Manifest => {
				if let Some(uri) = self.host.manifest_asset(path) {
					return uri;
				}

				tracing::debug!(path, "asset missing from manifest, using legacy rules");
				self.resolve_legacy(path)
			}
			AssetPipeline::DeferredBundle => {
				let block = format!("{}/{slug}", self.block_namespace);
				for event in [LifecycleEvent::FrontendAssets, LifecycleEvent::EditorAssets] {
					self.hooks.add(
						event,
						DeferredEnqueue {
							block: block.clone(),
							path: path.to_string(),
							priority: DEFERRED_ENQUEUE_PRIORITY,
						},
					);
				}

				String::new()
			}
			AssetPipeline::Legacy => self.resolve_legacy(path),
		}
	}

	fn resolve_legacy(&self, path: &str) -> String {
		if LEGACY_ASSET_PREFIXES
			.iter()
			.any(|prefix| path.starts_with(prefix))
		{
			self.host.legacy_asset_url(path)
		} else {
			path.to_string()
		}
	}
}

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::host::HostEnvironment;

/// Priority used for deferred asset enqueues, so they run after the host's
/// own assets.
pub const DEFERRED_ENQUEUE_PRIORITY: i32 = 50;

/// Page lifecycle points at which deferred actions run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
	/// Front-end assets are being enqueued for the current page.
	FrontendAssets,
	/// Assets are being enqueued for the block editor.
	EditorAssets,
}

impl LifecycleEvent {
	pub fn name(self) -> &'static str {
		match self {
			Self::FrontendAssets => "frontend_assets",
			Self::EditorAssets => "editor_assets",
		}
	}
}

impl fmt::Display for LifecycleEvent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// Enqueue `path` once the event fires, but only when `block` is present on
/// the page or in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeferredEnqueue {
	/// Fully qualified block name, e.g. `acf/hero`.
	pub block: String,
	/// Asset bundle to enqueue.
	pub path: String,
	/// Lower priorities run first.
	pub priority: i32,
}

/// Actions registered against lifecycle events. Registration happens while
/// blocks are built; the host fires the events later.
#[derive(Debug, Default)]
pub struct LifecycleHooks {
	actions: BTreeMap<LifecycleEvent, Vec<DeferredEnqueue>>,
}

impl LifecycleHooks {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add(&mut self, event: LifecycleEvent, action: DeferredEnqueue) {
		tracing::trace!(%event, block = %action.block, path = %action.path, "deferring asset enqueue");
		self.actions.entry(event).or_default().push(action);
	}

	/// Actions waiting on `event`, in registration order.
	pub fn pending(&self, event: LifecycleEvent) -> &[DeferredEnqueue] {
		self.actions.get(&event).map(Vec::as_slice).unwrap_or_default()
	}

	pub fn is_empty(&self) -> bool {
		self.actions.values().all(Vec::is_empty)
	}

	/// Run every action registered for `event`, ordered by priority and then
	/// registration order. Returns the asset paths that were enqueued.
	pub fn fire(&self, event: LifecycleEvent, host: &dyn HostEnvironment) -> Vec<String> {
		let mut actions: Vec<&DeferredEnqueue> = self.pending(event).iter().collect();
		actions.sort_by_key(|action| action.priority);

		let mut enqueued = Vec::new();
		for action in actions {
			if !host.has_block(&action.block) {
				tracing::debug!(%event, block = %action.block, "block not present, skipping enqueue");
				continue;
			}

			host.enqueue_bundle(&action.path);
			enqueued.push(action.path.clone());
		}

		enqueued
	}
}

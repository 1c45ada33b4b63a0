use std::collections::HashMap;
use std::fmt;

use crate::descriptor::BlockDescriptor;
use crate::render::BlockRecord;

type Filter<T> = Box<dyn Fn(T) -> T>;

/// Named chains of transforms. Filters under the same hook run in the order
/// they were added, each receiving the previous one's output.
pub struct FilterChain<T> {
	hooks: HashMap<String, Vec<Filter<T>>>,
}

impl<T> FilterChain<T> {
	pub fn new() -> Self {
		Self {
			hooks: HashMap::new(),
		}
	}

	pub fn add(&mut self, hook: impl Into<String>, filter: impl Fn(T) -> T + 'static) {
		self.hooks
			.entry(hook.into())
			.or_default()
			.push(Box::new(filter));
	}

	/// Pass `value` through every filter registered under `hook`.
	pub fn apply(&self, hook: &str, value: T) -> T {
		let Some(filters) = self.hooks.get(hook) else {
			return value;
		};

		tracing::trace!(hook, count = filters.len(), "applying filters");
		filters.iter().fold(value, |value, filter| filter(value))
	}

	pub fn has(&self, hook: &str) -> bool {
		self.hooks.get(hook).is_some_and(|filters| !filters.is_empty())
	}
}

impl<T> Default for FilterChain<T> {
	fn default() -> Self {
		Self::new()
	}
}

impl<T> fmt::Debug for FilterChain<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut hooks: Vec<(&String, usize)> = self
			.hooks
			.iter()
			.map(|(hook, filters)| (hook, filters.len()))
			.collect();
		hooks.sort();
		f.debug_struct("FilterChain").field("hooks", &hooks).finish()
	}
}

/// The extension points consumers can hook into. Hook names are prefixed
/// with the hook namespace:
///
/// - `<ns>-blocks-templates`: the ordered list of template directories.
/// - `<ns>/blocks/<slug>/register-data`: a descriptor before registration.
/// - `<ns>/blocks/<slug>/data`: a block record before it is rendered.
#[derive(Debug)]
pub struct Filters {
	namespace: String,
	directories: FilterChain<Vec<String>>,
	register_data: FilterChain<BlockDescriptor>,
	data: FilterChain<BlockRecord>,
}

impl Filters {
	pub fn new(namespace: impl Into<String>) -> Self {
		Self {
			namespace: namespace.into(),
			directories: FilterChain::new(),
			register_data: FilterChain::new(),
			data: FilterChain::new(),
		}
	}

	pub fn directories_hook(&self) -> String {
		format!("{}-blocks-templates", self.namespace)
	}

	pub fn register_data_hook(&self, slug: &str) -> String {
		format!("{}/blocks/{slug}/register-data", self.namespace)
	}

	pub fn data_hook(&self, slug: &str) -> String {
		format!("{}/blocks/{slug}/data", self.namespace)
	}

	/// Transform the list of template directories.
	pub fn add_directories_filter(&mut self, filter: impl Fn(Vec<String>) -> Vec<String> + 'static) {
		let hook = self.directories_hook();
		self.directories.add(hook, filter);
	}

	/// Transform the descriptor of `slug` before it is registered.
	pub fn add_register_data_filter(
		&mut self,
		slug: &str,
		filter: impl Fn(BlockDescriptor) -> BlockDescriptor + 'static,
	) {
		let hook = self.register_data_hook(slug);
		self.register_data.add(hook, filter);
	}

	/// Transform the record of `slug` before it is rendered.
	pub fn add_data_filter(&mut self, slug: &str, filter: impl Fn(BlockRecord) -> BlockRecord + 'static) {
		let hook = self.data_hook(slug);
		self.data.add(hook, filter);
	}

	pub fn apply_directories(&self, directories: Vec<String>) -> Vec<String> {
		self.directories.apply(&self.directories_hook(), directories)
	}

	pub fn apply_register_data(&self, slug: &str, descriptor: BlockDescriptor) -> BlockDescriptor {
		self.register_data
			.apply(&self.register_data_hook(slug), descriptor)
	}

	pub fn apply_data(&self, slug: &str, record: BlockRecord) -> BlockRecord {
		self.data.apply(&self.data_hook(slug), record)
	}
}

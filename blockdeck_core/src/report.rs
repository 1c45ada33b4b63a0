use std::cell::RefCell;

use serde::Serialize;

/// A problem found in a template that should be surfaced to the site
/// operator. Reports never abort registration or rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Report {
	/// Full message, usually naming the offending file or value.
	pub message: String,
	/// Short headline for the problem.
	pub title: String,
}

impl Report {
	pub fn new(message: impl Into<String>, title: impl Into<String>) -> Self {
		Self {
			message: message.into(),
			title: title.into(),
		}
	}
}

/// Receives non-fatal problems detected while building block descriptors.
pub trait ErrorReporter {
	fn report(&self, message: &str, title: &str);
}

/// Forwards every report to `tracing` at the `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
	fn report(&self, message: &str, title: &str) {
		tracing::warn!(title, "{message}");
	}
}

/// Keeps every report in memory, in the order they were made.
#[derive(Debug, Default)]
pub struct CollectingReporter {
	reports: RefCell<Vec<Report>>,
}

impl CollectingReporter {
	pub fn new() -> Self {
		Self::default()
	}

	/// Snapshot of the reports collected so far.
	pub fn reports(&self) -> Vec<Report> {
		self.reports.borrow().clone()
	}

	pub fn is_empty(&self) -> bool {
		self.reports.borrow().is_empty()
	}

	pub fn len(&self) -> usize {
		self.reports.borrow().len()
	}

	/// Take ownership of the collected reports, leaving the collector empty.
	pub fn take(&self) -> Vec<Report> {
		self.reports.take()
	}
}

impl ErrorReporter for CollectingReporter {
	fn report(&self, message: &str, title: &str) {
		tracing::debug!(title, "{message}");
		self.reports.borrow_mut().push(Report::new(message, title));
	}
}

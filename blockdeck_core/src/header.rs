use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::BlockdeckResult;

/// Default number of bytes read from the start of a template when looking
/// for header fields (8 KiB).
pub const DEFAULT_MAX_HEADER_BYTES: u64 = 8 * 1024;

/// Characters allowed before a header label on its line.
const LABEL_LEAD_CHARS: &[char] = &[' ', '\t', '/', '*', '#', '@'];

/// Comment closers that end a header value when they appear on the same line.
const COMMENT_CLOSERS: &[&str] = &["*/", "?>", "--}}", "#}"];

/// The fixed set of header fields a block template can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HeaderField {
	Title,
	Description,
	Category,
	Icon,
	Keywords,
	Mode,
	Align,
	PostTypes,
	SupportsAlign,
	SupportsAnchor,
	SupportsMode,
	SupportsJsx,
	SupportsAlignText,
	SupportsAlignContent,
	SupportsFullHeight,
	SupportsMultiple,
	EnqueueStyle,
	EnqueueScript,
	EnqueueAssets,
	Parent,
}

impl HeaderField {
	pub const ALL: [HeaderField; 20] = [
		Self::Title,
		Self::Description,
		Self::Category,
		Self::Icon,
		Self::Keywords,
		Self::Mode,
		Self::Align,
		Self::PostTypes,
		Self::SupportsAlign,
		Self::SupportsAnchor,
		Self::SupportsMode,
		Self::SupportsJsx,
		Self::SupportsAlignText,
		Self::SupportsAlignContent,
		Self::SupportsFullHeight,
		Self::SupportsMultiple,
		Self::EnqueueStyle,
		Self::EnqueueScript,
		Self::EnqueueAssets,
		Self::Parent,
	];

	/// The label written in the template header, e.g. `PostTypes`.
	pub fn label(self) -> &'static str {
		match self {
			Self::Title => "Title",
			Self::Description => "Description",
			Self::Category => "Category",
			Self::Icon => "Icon",
			Self::Keywords => "Keywords",
			Self::Mode => "Mode",
			Self::Align => "Align",
			Self::PostTypes => "PostTypes",
			Self::SupportsAlign => "SupportsAlign",
			Self::SupportsAnchor => "SupportsAnchor",
			Self::SupportsMode => "SupportsMode",
			Self::SupportsJsx => "SupportsInnerBlocks",
			Self::SupportsAlignText => "SupportsAlignText",
			Self::SupportsAlignContent => "SupportsAlignContent",
			Self::SupportsFullHeight => "SupportsFullHeight",
			Self::SupportsMultiple => "SupportsMultiple",
			Self::EnqueueStyle => "EnqueueStyle",
			Self::EnqueueScript => "EnqueueScript",
			Self::EnqueueAssets => "EnqueueAssets",
			Self::Parent => "Parent",
		}
	}

	/// The field name used in descriptors and diagnostics, e.g. `post_types`.
	pub fn key(self) -> &'static str {
		match self {
			Self::Title => "title",
			Self::Description => "description",
			Self::Category => "category",
			Self::Icon => "icon",
			Self::Keywords => "keywords",
			Self::Mode => "mode",
			Self::Align => "align",
			Self::PostTypes => "post_types",
			Self::SupportsAlign => "supports_align",
			Self::SupportsAnchor => "supports_anchor",
			Self::SupportsMode => "supports_mode",
			Self::SupportsJsx => "supports_jsx",
			Self::SupportsAlignText => "supports_align_text",
			Self::SupportsAlignContent => "supports_align_content",
			Self::SupportsFullHeight => "supports_full_height",
			Self::SupportsMultiple => "supports_multiple",
			Self::EnqueueStyle => "enqueue_style",
			Self::EnqueueScript => "enqueue_script",
			Self::EnqueueAssets => "enqueue_assets",
			Self::Parent => "parent",
		}
	}

	fn index(self) -> usize {
		self as usize
	}
}

/// Raw header values extracted from a template, one per [`HeaderField`].
/// Fields that were not declared hold an empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateHeaderFields {
	values: [String; 20],
}

impl TemplateHeaderFields {
	pub fn get(&self, field: HeaderField) -> &str {
		&self.values[field.index()]
	}

	pub fn set(&mut self, field: HeaderField, value: impl Into<String>) {
		self.values[field.index()] = value.into();
	}

	/// Builder-style variant of [`set`](Self::set).
	#[must_use]
	pub fn with(mut self, field: HeaderField, value: impl Into<String>) -> Self {
		self.set(field, value);
		self
	}

	/// Iterate the declared (non-empty) fields in [`HeaderField::ALL`] order.
	pub fn declared(&self) -> impl Iterator<Item = (HeaderField, &str)> {
		HeaderField::ALL
			.into_iter()
			.map(|field| (field, self.get(field)))
			.filter(|(_, value)| !value.is_empty())
	}
}

/// Read the header fields of the template at `path`. Only the first
/// `max_bytes` bytes of the file are inspected.
pub fn read_headers(path: &Path, max_bytes: u64) -> BlockdeckResult<TemplateHeaderFields> {
	let mut buffer = Vec::new();
	File::open(path)?.take(max_bytes).read_to_end(&mut buffer)?;
	Ok(parse_headers(&String::from_utf8_lossy(&buffer)))
}

/// Extract header fields from template source text.
///
/// A header line holds an optional `<?php` opener, any run of comment
/// characters (` \t/*#@`), then `Label: value`. Labels match
/// case-insensitively and the first matching line wins.
pub fn parse_headers(content: &str) -> TemplateHeaderFields {
	let content = if content.contains('\r') {
		content.replace('\r', "\n")
	} else {
		content.to_string()
	};

	let mut fields = TemplateHeaderFields::default();
	let mut found = [false; 20];

	for line in content.lines() {
		for field in HeaderField::ALL {
			if found[field.index()] {
				continue;
			}

			if let Some(raw) = match_label(line, field.label()) {
				found[field.index()] = true;
				fields.set(field, cleanup_value(raw));
			}
		}
	}

	fields
}

fn match_label<'a>(line: &'a str, label: &str) -> Option<&'a str> {
	let after_php = line
		.trim_start_matches([' ', '\t'])
		.strip_prefix("<?php")
		.map(|rest| match_label_after_opener(rest, label));

	after_php
		.flatten()
		.or_else(|| match_label_after_opener(line, label))
}

fn match_label_after_opener<'a>(rest: &'a str, label: &str) -> Option<&'a str> {
	let rest = rest.trim_start_matches(LABEL_LEAD_CHARS);
	let candidate = rest.get(..label.len())?;
	if !candidate.eq_ignore_ascii_case(label) {
		return None;
	}

	rest[label.len()..].strip_prefix(':')
}

fn cleanup_value(raw: &str) -> String {
	let end = COMMENT_CLOSERS
		.iter()
		.filter_map(|closer| raw.find(closer))
		.min()
		.unwrap_or(raw.len());

	raw[..end].trim().to_string()
}

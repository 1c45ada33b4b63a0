use std::path::Path;
use std::path::PathBuf;

use tempfile::TempDir;

use crate::AnyResult;
use crate::BlockSettings;
use crate::Filters;
use crate::LocalHost;
use crate::TemplateFile;

pub const HERO_TEMPLATE: &str = "{#
  Title: Hero
  Description: A large banner
  Category: formatting
  Icon: admin-comments
  Keywords: hero banner
  Mode: preview
  SupportsAlign: wide full
#}
<section id=\"{{ block.anchor }}\" class=\"{{ block.classes }}\">{{ block.content }}</section>
";

pub const CARD_TEMPLATE: &str = "{#
  Title: Card
  Category: common
  SupportsAnchor: true
  Parent: acf/grid
#}
<div class=\"{{ block.classes }}\">card</div>
";

/// A temporary project root with a `resources/` directory.
pub struct TestProject {
	pub dir: TempDir,
}

impl TestProject {
	pub fn new() -> AnyResult<Self> {
		let dir = tempfile::tempdir()?;
		std::fs::create_dir_all(dir.path().join("resources/views/blocks"))?;
		Ok(Self { dir })
	}

	pub fn root(&self) -> &Path {
		self.dir.path()
	}

	pub fn resources(&self) -> PathBuf {
		self.root().join("resources")
	}

	pub fn blocks_dir(&self) -> PathBuf {
		self.resources().join("views/blocks")
	}

	/// Write `content` to `relative` under `resources/`, creating parents.
	pub fn write(&self, relative: &str, content: &str) -> AnyResult<PathBuf> {
		let path = self.resources().join(relative);
		if let Some(parent) = path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&path, content)?;
		Ok(path)
	}

	pub fn write_block(&self, file_name: &str, content: &str) -> AnyResult<PathBuf> {
		self.write(&format!("views/blocks/{file_name}"), content)
	}

	pub fn host(&self) -> LocalHost {
		LocalHost::new(self.resources())
	}
}

pub fn default_settings() -> BlockSettings {
	BlockSettings::default()
}

pub fn default_filters() -> Filters {
	Filters::new("sage")
}

pub fn template_file(slug: &str) -> TemplateFile {
	TemplateFile {
		slug: slug.to_string(),
		file_name: format!("{slug}.blade.php"),
		directory: PathBuf::from("/theme/resources/views/blocks"),
	}
}

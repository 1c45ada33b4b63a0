#![allow(dead_code)]

use std::path::Path;

use assert_cmd::Command;
use blockdeck_core::AnyEmptyResult;
use insta_cmd::get_cargo_bin;

pub const HERO_TEMPLATE: &str = "{#
  Title: Hero
  Category: formatting
  Keywords: hero banner
  SupportsAlign: wide full
#}
<section id=\"{{ block.anchor }}\" class=\"{{ block.classes }}\">{{ block.content }}</section>
";

pub const CARD_TEMPLATE: &str = "{#
  Title: Card
  Category: common
  Parent: acf/grid
#}
<div class=\"{{ block.classes }}\">card</div>
";

pub fn blockdeck_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("blockdeck"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("BLOCKDECK_LOG");
	cmd
}

/// Write a template into `resources/views/blocks` under `root`.
pub fn write_block(root: &Path, file_name: &str, content: &str) -> AnyEmptyResult {
	write_file(root, &format!("resources/views/blocks/{file_name}"), content)
}

pub fn write_file(root: &Path, relative: &str, content: &str) -> AnyEmptyResult {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)?;
	Ok(())
}

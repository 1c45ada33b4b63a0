use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Register and preview content blocks described by template headers.",
	long_about = "blockdeck discovers block templates in your theme, reads the metadata in their \
	              header comments and turns it into block registrations.\n\nEach `*.blade.php` \
	              file in a template directory becomes one block. Its `Title:`, `Category:`, \
	              `SupportsAlign:` and related header lines describe how the block is \
	              registered.\n\nQuick start:\n  blockdeck list    Show every registered \
	              block\n  blockdeck check   Fail when a template header is incomplete\n  \
	              blockdeck render  Render one block instance"
)]
pub struct BlockdeckCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output. Also raises the log level to `debug` unless
	/// `BLOCKDECK_LOG` is set.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// List every block registered from the template directories.
	///
	/// Walks each configured template directory, reads the header of every
	/// file carrying the template suffix and prints the resulting block
	/// registrations. Problems in template headers are printed as warnings.
	List {
		/// Output format. Use `text` for human-readable output or `json` for
		/// the full block descriptors.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Check that every block template declares a valid header.
	///
	/// Runs the same registration pass as `list` and exits with a non-zero
	/// status code when a template is missing its title or category, or
	/// names an invalid parent block. Ideal for CI pipelines.
	Check,
	/// Render a single block instance through its template.
	///
	/// The block is rendered once for every template directory holding a
	/// matching template. Deferred asset bundles of blocks marked with
	/// `--on-page` are enqueued afterwards and listed on stderr.
	Render {
		/// Fully qualified block name, e.g. `acf/hero`.
		name: String,

		/// Inner content passed to the template.
		#[arg(long, default_value = "")]
		content: String,

		/// Render the block as an editor preview.
		#[arg(long, default_value_t = false)]
		preview: bool,

		/// Identifier of the post the block belongs to.
		#[arg(long, default_value_t = 0)]
		post_id: i64,

		/// Block attribute in `key=value` form. Values that parse as JSON are
		/// passed as JSON, anything else as a string. Can be repeated.
		#[arg(long = "attr", value_name = "KEY=VALUE")]
		attributes: Vec<String>,

		/// Mark a fully qualified block name as present on the page. Can be
		/// repeated.
		#[arg(long, value_name = "NAME")]
		on_page: Vec<String>,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption.
	Json,
}

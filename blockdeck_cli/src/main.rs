use std::path::Path;
use std::path::PathBuf;
use std::process;

use blockdeck_core::BlockDescriptor;
use blockdeck_core::BlockInstance;
use blockdeck_core::CollectingReporter;
use blockdeck_core::LifecycleEvent;
use blockdeck_core::Project;
use blockdeck_core::Registration;
use blockdeck_core::Report;
use blockdeck_core::load_project;
use blockdeck_cli::BlockdeckCli;
use blockdeck_cli::Commands;
use blockdeck_cli::OutputFormat;
use clap::Parser;
use owo_colors::OwoColorize;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "BLOCKDECK_LOG";

/// Whether stdout/stderr output may carry ANSI styles. Set once in `main`.
static STYLED_OUTPUT: std::sync::OnceLock<bool> = std::sync::OnceLock::new();

fn styled_output() -> bool {
	STYLED_OUTPUT.get().copied().unwrap_or(false)
}

/// Format `$text` with the `owo-colors` style method `$style` when styled
/// output is on, and plainly otherwise.
macro_rules! paint {
	($text:expr, $style:ident) => {
		if styled_output() {
			$text.$style().to_string()
		} else {
			$text.to_string()
		}
	};
}

fn main() {
	let args = BlockdeckCli::parse();

	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stdout).is_some();
	STYLED_OUTPUT.set(use_color).ok();

	init_tracing(args.verbose, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match &args.command {
		Some(Commands::List { format }) => run_list(&args, *format),
		Some(Commands::Check) => run_check(&args),
		Some(Commands::Render {
			name,
			content,
			preview,
			post_id,
			attributes,
			on_page,
		}) => {
			let request = RenderRequest {
				name,
				content,
				preview: *preview,
				post_id: *post_id,
				attributes,
				on_page,
			};
			run_render(&args, &request)
		}
		None => {
			eprintln!("No subcommand specified. Run `blockdeck --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(error) = result {
		print_error(error);
		process::exit(2);
	}
}

/// Blockdeck errors carry diagnostic codes and help text, so they go through
/// miette. Anything else gets a plain `error:` line.
fn print_error(error: Box<dyn std::error::Error>) {
	match error.downcast::<blockdeck_core::BlockdeckError>() {
		Ok(error) => eprintln!("{:?}", miette::Report::new(*error)),
		Err(error) => eprintln!("{} {error}", paint!("error:", red)),
	}
}

fn init_tracing(verbose: bool, use_color: bool) {
	let filter = EnvFilter::try_from_env(LOG_ENV)
		.unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.without_time()
		.init();
}

fn resolve_root(args: &BlockdeckCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn load(args: &BlockdeckCli) -> Result<Project, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let project = load_project(&root)?;

	if args.verbose {
		match &project.config_path {
			Some(path) => eprintln!("Using config: {}", make_relative(path, &root)),
			None => eprintln!("No config file found, using defaults."),
		}
	}

	Ok(project)
}

/// Everything a registration pass produced.
struct RegisterOutcome {
	registration: Registration,
	descriptors: Vec<BlockDescriptor>,
	reports: Vec<Report>,
}

fn register(project: &mut Project) -> Result<RegisterOutcome, Box<dyn std::error::Error>> {
	let reporter = CollectingReporter::new();
	let mut descriptors = Vec::new();
	let registration = project.register(&mut descriptors, &reporter)?;

	Ok(RegisterOutcome {
		registration,
		descriptors,
		reports: reporter.take(),
	})
}

fn print_reports(reports: &[Report]) {
	for report in reports {
		eprintln!(
			"{} {}: {}",
			paint!("warning:", yellow),
			report.title,
			report.message
		);
	}
}

fn run_list(args: &BlockdeckCli, format: OutputFormat) -> Result<(), Box<dyn std::error::Error>> {
	let mut project = load(args)?;
	let outcome = register(&mut project)?;

	if let OutputFormat::Json = format {
		let output = serde_json::json!({
			"blocks": outcome.descriptors,
			"reports": outcome.reports,
		});
		println!("{}", serde_json::to_string_pretty(&output)?);
		return Ok(());
	}

	print_reports(&outcome.reports);

	if outcome.registration.is_empty() {
		println!("No block templates found.");
		return Ok(());
	}

	println!("{}", paint!("Blocks:", bold));
	let namespace = &project.settings.block_namespace;
	for (block, descriptor) in outcome
		.registration
		.blocks
		.iter()
		.zip(&outcome.descriptors)
	{
		let rel = make_relative(&block.path, &project.root);
		let title = if descriptor.title.is_empty() {
			paint!("(untitled)", yellow)
		} else {
			descriptor.title.clone()
		};
		println!("  {namespace}/{} {title} {rel}", block.slug);

		if args.verbose {
			let category = display_or_dash(&descriptor.category);
			let mode = display_or_dash(&descriptor.mode);
			println!("      category: {category}, mode: {mode}");
		}
	}

	println!("\n{} block(s) registered", outcome.registration.len());

	Ok(())
}

fn run_check(args: &BlockdeckCli) -> Result<(), Box<dyn std::error::Error>> {
	let mut project = load(args)?;
	let outcome = register(&mut project)?;

	if outcome.reports.is_empty() {
		println!(
			"{}",
			paint!(
				format!(
					"All {} block template(s) are valid.",
					outcome.registration.len()
				),
				green
			)
		);
		return Ok(());
	}

	print_reports(&outcome.reports);
	eprintln!(
		"\n{}",
		paint!(
			format!(
				"{} problem(s) found in {} block template(s).",
				outcome.reports.len(),
				outcome.registration.len()
			),
			red
		)
	);
	process::exit(1);
}

struct RenderRequest<'a> {
	name: &'a str,
	content: &'a str,
	preview: bool,
	post_id: i64,
	attributes: &'a [String],
	on_page: &'a [String],
}

fn run_render(
	args: &BlockdeckCli,
	request: &RenderRequest<'_>,
) -> Result<(), Box<dyn std::error::Error>> {
	let mut project = load(args)?;
	project.host.add_page_blocks(request.on_page.iter().cloned());

	// Registration queues the deferred asset bundles.
	let outcome = register(&mut project)?;
	if args.verbose {
		print_reports(&outcome.reports);
		if project.hooks.is_empty() {
			eprintln!("No deferred asset bundles queued.");
		}
	}

	let mut instance = BlockInstance::new(request.name)
		.with_content(request.content)
		.with_preview(request.preview)
		.with_post_id(request.post_id);
	for raw in request.attributes {
		let (key, value) = parse_attribute(raw)?;
		instance = instance.with_attribute(key, value);
	}

	let output = project.render(instance)?;
	if output.is_empty() {
		eprintln!(
			"{} no template found for block `{}`",
			paint!("warning:", yellow),
			request.name
		);
	} else {
		print!("{output}");
	}

	for path in project.fire(LifecycleEvent::FrontendAssets) {
		eprintln!("{} {path}", paint!("enqueued:", green));
	}

	Ok(())
}

fn parse_attribute(raw: &str) -> Result<(String, Value), Box<dyn std::error::Error>> {
	let Some((key, value)) = raw.split_once('=') else {
		return Err(format!("invalid attribute `{raw}`, expected `key=value`").into());
	};

	let key = key.trim();
	if key.is_empty() {
		return Err(format!("invalid attribute `{raw}`, the key is empty").into());
	}

	let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
	Ok((key.to_string(), value))
}

fn display_or_dash(value: &str) -> &str {
	if value.is_empty() { "-" } else { value }
}

fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}

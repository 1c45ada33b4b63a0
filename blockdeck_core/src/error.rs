use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum BlockdeckError {
	#[error(transparent)]
	#[diagnostic(code(blockdeck::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(blockdeck::config_parse),
		help("check that blockdeck.toml is valid TOML with [templates] and/or [assets] sections")
	)]
	ConfigParse(String),

	#[error("failed to load asset manifest `{path}`: {reason}")]
	#[diagnostic(
		code(blockdeck::manifest_parse),
		help("the manifest must be a JSON object mapping asset paths to URIs")
	)]
	ManifestParse { path: String, reason: String },

	#[error("failed to render view `{view}`: {reason}")]
	#[diagnostic(code(blockdeck::template_render))]
	TemplateRender { view: String, reason: String },

	#[error("invalid namespace: `{0}`")]
	#[diagnostic(
		code(blockdeck::invalid_namespace),
		help("namespaces must be non-empty and contain only lowercase letters, digits and dashes")
	)]
	InvalidNamespace(String),

	#[error("invalid template suffix: `{0}`")]
	#[diagnostic(
		code(blockdeck::invalid_suffix),
		help("the template suffix needs two extensions, for example `.blade.php` or `.html.jinja`")
	)]
	InvalidSuffix(String),
}

pub type BlockdeckResult<T> = Result<T, BlockdeckError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;

use console::style;
use std::fmt;

/// Error with context and suggested fixes, rendered for humans
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    /// Print the full report to stderr
    pub fn display(&self) {
        eprint!("{}", self.report());
    }

    /// Message, context, numbered fixes and the help hint, one block each
    pub fn report(&self) -> String {
        let mut out =
            format!("{} {}\n\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(context) = &self.context {
            out.push_str(context);
            out.push_str("\n\n");
        }

        if !self.suggestions.is_empty() {
            out.push_str(&format!("{}\n", style("To fix this:").yellow().bold()));
            for (n, suggestion) in self.suggestions.iter().enumerate() {
                out.push_str(&format!("  {}. {}\n", n + 1, suggestion));
            }
            out.push('\n');
        }

        if let Some(help) = &self.help_command {
            let hint = format!("{} {}\n", style("Need help?").cyan(), style(help).cyan().bold());
            out.push_str(&hint);
        }
        out
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CliError")
            .field("message", &self.message)
            .field("suggestions", &self.suggestions.len())
            .finish()
    }
}

impl std::error::Error for CliError {}

/// Layers could not be fetched or parsed
pub fn load_failed(source: &str, status: &str) -> CliError {
    CliError::new("Failed to load map layers")
        .with_context(format!("{}\n\nSource: {}", status, source))
        .with_suggestion("Check that the backend is running, or pass --layers FILE")
        .with_suggestion("Run with RUST_LOG=geoview=debug to see the underlying error")
        .with_help("Run: geoview --help")
}

/// Layer id is unknown or the layer is hidden
pub fn layer_not_found(id: &str) -> CliError {
    CliError::new(format!("Layer not found: {}", id))
        .with_context("The layer does not exist or is not active.")
        .with_suggestion("List the loaded layers: geoview table --tab layers")
        .with_help("Run: geoview popup --help")
}

/// Layer exists but has no feature at the index
pub fn feature_not_found(layer: &str, index: usize) -> CliError {
    CliError::new(format!("Feature {} not found in layer {}", index, layer))
        .with_suggestion("List the features: geoview table --tab features")
        .with_help("Run: geoview popup --help")
}

/// Malformed `--select` value
pub fn invalid_selection(raw: &str) -> CliError {
    CliError::new(format!("Invalid feature reference: {}", raw))
        .with_context("Expected LAYER:INDEX, e.g. roads:0")
        .with_help("Run: geoview table --help")
}

/// Replay script could not be parsed
pub fn invalid_script(path: &str, reason: &str) -> CliError {
    CliError::new("Invalid replay script")
        .with_context(format!("{}\n\nScript: {}", reason, path))
        .with_suggestion("Put one command per line; lines starting with # are ignored")
        .with_help("Run: geoview replay --help")
}

/// Configuration failed validation
pub fn invalid_config(reason: &str) -> CliError {
    CliError::new("Invalid configuration")
        .with_context(format!("Configuration value is invalid.\n\nReason: {}", reason))
        .with_suggestion("Check geoview.toml and GEOVIEW_* environment variables")
        .with_suggestion("Inspect effective values: geoview config")
        .with_help("Run: geoview config --help")
}

//! Template content for the init command.

/// The stock equation-editor configuration, also used when a project has no
/// `pipewright.toml`.
pub const DEFAULT_CONFIG: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/pipewright.toml"));

/// License header carrying the stamp token, written when the project has none.
pub const LICENSE_HEADER_TEMPLATE: &str = "/**\n * Version: @BUILD_NUMBER@\n */\n";

/// Webpack configuration for the demo build: TypeScript is transpiled without
/// type checking, and source maps are kept.
pub const WEBPACK_DEMO_CONFIG: &str =
  include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates/webpack.demo.config.js"));

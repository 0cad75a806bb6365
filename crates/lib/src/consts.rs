//! Shared constants.

/// Default configuration file name, looked up in the current directory.
pub const CONFIG_FILENAME: &str = "pipewright.toml";

/// Default package manifest providing `name` and `version`.
pub const MANIFEST_FILENAME: &str = "package.json";

/// Environment variable carrying the CI build number.
pub const BUILD_NUMBER_ENV: &str = "BUILD_NUMBER";

/// Build number used when none is supplied.
pub const DEFAULT_BUILD_NUMBER: &str = "0";

/// Token replaced in license headers by the display version.
pub const DEFAULT_STAMP_TOKEN: &str = "@BUILD_NUMBER@";

/// Default separator between concatenated inputs.
pub const DEFAULT_SEPARATOR: &str = "\n";

/// Default debounce window of the watch loop, in milliseconds.
pub const DEFAULT_WATCH_INTERVAL_MS: u64 = 300;

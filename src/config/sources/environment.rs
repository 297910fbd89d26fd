//! Environment variable source: TOWNCTL_* prefix with __ separator

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment, Map};

pub const ENV_PREFIX: &str = "TOWNCTL";

/// Keys whose environment values are comma-separated lists.
const LIST_KEYS: &[&str] = &["compliance.extra_skip_dirs"];

/// Add the environment overlay to a builder.
///
/// `TOWNCTL__LOGGING__LEVEL=debug` sets `logging.level`. When `vars` is given
/// it replaces the process environment.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    vars: Option<Map<String, String>>,
) -> ConfigBuilder<DefaultState> {
    let mut source = Environment::with_prefix(ENV_PREFIX)
        .separator("__")
        .try_parsing(true)
        .list_separator(",");
    for key in LIST_KEYS {
        source = source.with_list_parse_key(key);
    }
    builder.add_source(source.source(vars))
}

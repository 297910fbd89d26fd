//! TOML file sources.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;
use tracing::debug;

/// Add a TOML file to a builder. Optional files may be absent.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    path: &Path,
    required: bool,
) -> ConfigBuilder<DefaultState> {
    debug!(path = %path.display(), required, "adding config file source");
    builder.add_source(
        File::from(path)
            .format(FileFormat::Toml)
            .required(required),
    )
}

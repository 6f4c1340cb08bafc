use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output for
/// this crate and everything else stays at warn.
pub fn init(verbose: bool) -> Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let level = if verbose { "warn,wp_rank=debug" } else { "warn" };
            EnvFilter::try_new(level)
                .with_context(|| format!("invalid log filter '{}'", level))?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {}", e))
}

use super::{CommonArgs, connect};
use crate::config::Config;
use crate::error::Result;
use crate::report::Reporter;

/// Health probes need no credentials; a bearer is never attached.
pub async fn run(common: &CommonArgs, config: &Config) -> Result<()> {
    let dispatcher = connect(common, None, config)?;
    let results = dispatcher.health().await?;

    for result in results.iter().filter(|result| !result.healthy) {
        tracing::warn!(probe = result.probe.label(), status = %result.status, "probe reports unhealthy");
    }
    Reporter::stdio(common.verbosity).render_health(&results)
}

use anyhow::Result;
use tracing::info;

use crate::config::PipelineConfig;
use crate::domain::{Secret, SourceView};
use crate::services::pipeline::Pipeline;
use crate::{tools, ui};

/// Run the lint pipeline over the bot sources.
pub async fn execute(source: String, secret: Secret) -> Result<()> {
    ui::print_header("MOCBOT CI: Lint Checks");

    let view = SourceView::open(&source)?;
    let config = PipelineConfig::load(view.root())?;
    tools::docker_preflight()?;

    info!("📂 Source: {}", view.root().display());

    let pipeline = Pipeline::new(view, secret, &config);
    pipeline.ci().await?;

    ui::print_success("Lint checks passed");
    Ok(())
}

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::config::PipelineConfig;
use crate::domain::{Secret, SourceView};
use crate::services::pipeline::Pipeline;
use crate::{tools, ui};

/// Build the bot image and push it to the container registry.
pub async fn execute(source: String, secret: Secret, env: String) -> Result<()> {
    ui::print_header("MOCBOT CI: Build & Push");

    let view = SourceView::open(&source)?;
    let config = PipelineConfig::load(view.root())?;
    tools::docker_preflight()?;

    info!("📂 Source: {}", view.root().display());
    info!("🌍 Environment: {}", env);
    info!("📦 Registry: {}", config.registry_base);

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    spinner.set_message("Building and publishing image...");
    spinner.enable_steady_tick(std::time::Duration::from_millis(100));

    let pipeline = Pipeline::new(view, secret, &config);
    let result = pipeline.build_and_push(Some(env)).await;

    spinner.finish_and_clear();

    let reference = result?;

    ui::print_success(&format!("Published {}", reference));
    println!("{}", reference);
    Ok(())
}

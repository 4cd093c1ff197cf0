use anyhow::Context;
use chrono::Utc;
use serde::Serialize;
use swarmforge::config::ConfigManager;
use swarmforge::engines::generation::{ConsoleProgressCallback, EvolutionEngine, EvolutionSummary};

#[derive(Serialize)]
struct RunReport {
    started_at: String,
    finished_at: String,
    config_file: Option<String>,
    #[serde(flatten)]
    result: EvolutionSummary,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config_file = std::env::args().nth(1);
    let manager = ConfigManager::new();
    if let Some(path) = &config_file {
        manager
            .load_layered(path)
            .with_context(|| format!("failed to load configuration from {}", path))?;
    }
    let config = manager.get();

    let started_at = Utc::now();
    let mut engine = EvolutionEngine::new(config).context("failed to set up the evolution engine")?;
    let result = engine.run(ConsoleProgressCallback)?;

    log::info!("Best individual: {}", result.best);
    let report = RunReport {
        started_at: started_at.to_rfc3339(),
        finished_at: Utc::now().to_rfc3339(),
        config_file,
        result: result.summary(),
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

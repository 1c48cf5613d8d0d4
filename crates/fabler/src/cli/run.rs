//! Session playback command handler.

use fabler::{
    CatalogPersonalization, ConsoleActuator, FablerConfig, FablerResult, FileScriptLoader,
    ScriptEngine, SessionSummary,
};
use std::path::PathBuf;
use tracing::{info, instrument};

/// What `fabler run` was asked to play.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Session number
    pub session: Option<i64>,
    /// Participant ID
    pub participant: Option<String>,
    /// Explicit session script
    pub script: Option<PathBuf>,
    /// Seed overriding the configured one
    pub seed: Option<u64>,
    /// Explicit configuration file
    pub config: Option<PathBuf>,
}

/// Play a session with the console actuator and the configured catalog.
#[instrument(skip_all, fields(session = ?options.session, participant = ?options.participant))]
pub async fn run_session(options: RunOptions) -> FablerResult<SessionSummary> {
    let config = match &options.config {
        Some(path) => FablerConfig::from_file(path)?,
        None => FablerConfig::load()?,
    };

    let main_script = match options.script {
        Some(script) => script,
        None => PathBuf::from(
            config
                .session()
                .script_for(options.session, options.participant.as_deref()),
        ),
    };
    info!(
        main_script = %main_script.display(),
        stories = config.stories().len(),
        "Starting session"
    );

    let mut engine = ScriptEngine::builder()
        .actuator(ConsoleActuator::stdin())
        .personalization(CatalogPersonalization::new(config.stories().clone()))
        .loader(FileScriptLoader::new())
        .paths(config.paths().clone())
        .main_script(main_script)
        .settings(config.playback().engine_settings(options.seed)?)
        .start()
        .await?;

    engine.run().await
}

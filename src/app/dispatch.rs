use crate::cli::commands::{Cli, Commands};
use anyhow::{Context, Result, bail};
use plantsnap::core::identify::{IdentifyEvent, IdentifySession};
use plantsnap::{
    Config, FileSecretStore, OpenAiIdentifier, PlantSnapError, SecretStore, SessionState,
};
use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

/// Route a parsed command. `identify` refuses to run without a stored key.
pub async fn dispatch(cli: Cli, config: Config) -> Result<()> {
    let store: Arc<dyn SecretStore> = Arc::new(FileSecretStore::new(
        &config.secrets_path(),
        config.secrets.encrypt,
    ));
    let mut session = SessionState::initialize(store);

    match cli.command {
        Commands::Login { key } => login(&mut session, key),
        Commands::Logout => {
            session.clear()?;
            println!("Logged out.");
            Ok(())
        }
        Commands::Status => {
            if session.is_authenticated() {
                println!("API key stored.");
            } else {
                println!("No API key stored. Run `plantsnap login`.");
            }
            Ok(())
        }
        Commands::Identify { image, demo } => identify(&config, &session, &image, demo).await,
    }
}

fn login(session: &mut SessionState, key: Option<String>) -> Result<()> {
    let raw = match key {
        Some(key) => key,
        None => {
            eprint!("Enter OpenAI API key: ");
            let mut line = String::new();
            std::io::stdin()
                .lock()
                .read_line(&mut line)
                .context("Failed to read API key from stdin")?;
            line
        }
    };

    match session.login(&raw) {
        Ok(()) => {
            println!("API key saved.");
            Ok(())
        }
        Err(PlantSnapError::Validation(reason)) => bail!("Invalid API Key: {reason}"),
        Err(other) => Err(other.into()),
    }
}

async fn identify(config: &Config, session: &SessionState, path: &Path, demo: bool) -> Result<()> {
    if !session.is_authenticated() {
        bail!("No API key stored. Run `plantsnap login` first.");
    }

    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image: {}", path.display()))?;

    let identifier = Arc::new(OpenAiIdentifier::new(config));
    let mut screen = IdentifySession::new(identifier, config.demo_delay());
    screen.set_demo_mode(demo);
    screen.set_image(bytes);

    let mut events = screen.subscribe();
    let progress = tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            if event == IdentifyEvent::LoadingChanged(true) {
                eprintln!("Identifying...");
            }
        }
    });

    let result = screen.identify(session).await.cloned();
    drop(screen);
    let _ = progress.await;

    match result {
        Some(result) => {
            print!("{result}");
            Ok(())
        }
        None => bail!("Nothing to identify"),
    }
}

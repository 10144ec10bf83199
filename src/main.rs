use dotenvy::dotenv;
use poise::serenity_prelude as serenity;
use scout_hub::{
    bot::{self, BotData, render},
    config::{self, database},
    core::seed,
    errors::{Error, Result},
    gateway::DbGateway,
    storage::BucketStore,
};
use std::{env, sync::Arc};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {}", ctx.command().qualified_name, error);
            if let Err(e) = ctx.say(render::error_message(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        // The check already told the member to sign in.
        poise::FrameworkError::CommandCheckFailed { error: None, .. } => {}
        poise::FrameworkError::CommandCheckFailed {
            error: Some(error),
            ctx,
            ..
        } => {
            error!("Session check failed: {}", error);
            if let Err(e) = ctx.say(render::error_message(&error)).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load .env file (non-fatal, env vars can be set externally)
    dotenv().ok();

    let app_config = Arc::new(config::load_default_config()?);
    info!("Configuration loaded, points mode {:?}", app_config.points.mode);

    let database_url = database::get_database_url();
    let db = database::create_connection(&database_url)
        .await
        .inspect_err(|e| error!("Failed to connect to the database: {}", e))?;
    database::create_tables(&db).await?;

    let store = BucketStore::new(
        app_config.storage.root.clone(),
        app_config.storage.public_base_url.clone(),
    );
    let gateway = DbGateway::new(db, store);
    seed::seed_from_config(&gateway, &app_config)
        .await
        .inspect_err(|e| error!("Failed to seed from configuration: {}", e))?;

    // DISCORD_BOT_TOKEN is loaded here, directly before use, not stored in AppConfig
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    let data = BotData::new(gateway, app_config);
    let sessions = Arc::clone(&data.sessions);

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                bot::ping(),
                bot::help(),
                bot::start(),
                bot::dashboard(),
                bot::settings(),
                bot::register(),
                bot::login(),
                bot::logout(),
                bot::badges(),
                bot::certificates(),
                bot::points(),
                bot::profile(),
                bot::trips(),
                bot::tasks(),
                bot::programs(),
            ],
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                info!("Registered {} commands globally", framework.options().commands.len());
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    let shard_manager = Arc::clone(&client.shard_manager);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Shutdown requested");
            shard_manager.shutdown_all().await;
        }
    });

    info!("Starting bot client...");
    let result = client.start().await;
    sessions.teardown().await;
    result.inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

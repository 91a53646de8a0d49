//! services/app/src/bin/app.rs

use std::sync::Arc;

use app_lib::{config::Config, error::AppError, state::AppState};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const USAGE: &str = "usage: app <plants|remedies|verified-remedies|blogs|guidebooks|herbalists|history|identify <image-path>>";

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded.");

    let state = AppState::from_config(config)?;

    // Pick up an existing session, then sign in if credentials were provided.
    state.session.initialize().await;
    if let (Ok(email), Ok(password)) = (
        std::env::var("MIMEA_EMAIL"),
        std::env::var("MIMEA_PASSWORD"),
    ) {
        if !state.session.is_authenticated() {
            state.session.login(&email, &password).await;
            if let Some(error) = state.session.snapshot().error {
                return Err(AppError::Internal(format!("login failed: {error}")));
            }
            if let Some(identity) = state.session.current_identity() {
                state.profiles.fetch_profile(&identity.id).await;
            }
        }
    }

    let mut args = std::env::args().skip(1);
    let command = args
        .next()
        .ok_or_else(|| AppError::Internal(USAGE.to_string()))?;

    match command.as_str() {
        "plants" => {
            state.plant_info.fetch().await;
            let snapshot = state.plant_info.snapshot();
            report(&snapshot.error)?;
            for plant in snapshot.items {
                println!("{} ({})", plant.common_name, plant.scientific_name);
            }
        }
        "remedies" => {
            state.remedies.fetch().await;
            let snapshot = state.remedies.snapshot();
            report(&snapshot.error)?;
            for remedy in snapshot.items {
                let status = if remedy.verification.verified {
                    "verified"
                } else {
                    "unverified"
                };
                println!("[{status}] {} — {}", remedy.plant_name, remedy.title);
            }
        }
        "verified-remedies" => {
            state.remedies.fetch_verified().await;
            let snapshot = state.remedies.snapshot();
            report(&snapshot.error)?;
            for remedy in snapshot.items {
                println!("{} — {}", remedy.plant_name, remedy.title);
            }
        }
        "blogs" => {
            state.blogs.fetch().await;
            let snapshot = state.blogs.snapshot();
            report(&snapshot.error)?;
            for blog in snapshot.items {
                println!(
                    "{} ({} likes, {} comments)",
                    blog.title, blog.likes_count, blog.comments_count
                );
            }
        }
        "guidebooks" => {
            state.guidebooks.fetch().await;
            let snapshot = state.guidebooks.snapshot();
            report(&snapshot.error)?;
            for guidebook in snapshot.items {
                println!("{} ({} downloads)", guidebook.title, guidebook.download_count);
            }
        }
        "herbalists" => {
            state.profiles.fetch_verified_herbalists().await;
            let snapshot = state.profiles.snapshot();
            report(&snapshot.error)?;
            for herbalist in snapshot.herbalists {
                println!(
                    "{} — {}",
                    herbalist.full_name,
                    herbalist.specializations.join(", ")
                );
            }
        }
        "history" => {
            state.history.fetch().await;
            let snapshot = state.history.snapshot();
            report(&snapshot.error)?;
            for entry in snapshot.items {
                println!(
                    "{} ({:.0}%) at {}",
                    entry.plant_name, entry.confidence, entry.created_at
                );
            }
        }
        "identify" => {
            let path = args
                .next()
                .ok_or_else(|| AppError::Internal(USAGE.to_string()))?;
            let image = std::fs::read(&path)?;
            let filename = std::path::Path::new(&path)
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("upload.jpg")
                .to_string();
            state.identify.classify(image, &filename).await;
            let snapshot = state.identify.snapshot();
            report(&snapshot.error)?;
            match snapshot.last_prediction {
                Some(prediction) => {
                    println!(
                        "{} ({:.0}% confidence)",
                        prediction.class_name, prediction.confidence
                    );
                    if let Some(info) = state.plant_info.lookup(&prediction.class_name).await {
                        println!("{} — treats {}", info.common_name, info.ailment_treated);
                    }
                }
                None => println!("No prediction returned."),
            }
        }
        _ => return Err(AppError::Internal(USAGE.to_string())),
    }

    Ok(())
}

fn report(error: &Option<String>) -> Result<(), AppError> {
    match error {
        Some(message) => Err(AppError::Internal(message.clone())),
        None => Ok(()),
    }
}

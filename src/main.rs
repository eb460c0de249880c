use actix_web::{middleware::Logger, App, HttpServer};
use anyhow::Context;

use catalogue_backend::config::AppConfig;
use catalogue_backend::{configure_app, db};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("Failed to load configuration")?;

    log::info!("Connecting to database...");
    let db = db::establish_connection(&config)
        .await
        .context("Failed to connect to database")?;
    log::info!("Database connected");

    if config.run_migrations {
        db::run_migrations(&db)
            .await
            .context("Failed to apply migrations")?;
    }

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload directory {:?}", config.upload_dir))?;

    log::info!("Starting server on http://{}:{}", config.bind_address, config.port);

    let server_db = db.clone();
    let server_config = config.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .configure(|cfg| configure_app(cfg, &server_db, &server_config))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await?;

    db::close(db).await.context("Failed to close database connection")?;
    Ok(())
}

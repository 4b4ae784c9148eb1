use actix_cors::Cors;
use actix_files::Files;
use actix_web::middleware::Logger;
use actix_web::{App, HttpServer, web};
use dotenv::dotenv;
use floormatch_backend::cache::IdentityCache;
use floormatch_backend::config::AppConfig;
use floormatch_backend::handlers;
use floormatch_backend::models::tariffs::TariffCatalog;
use floormatch_backend::{Storage, create_pool};
use migration::{Migrator, MigratorTrait};
use tracing_subscriber::EnvFilter;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let config = AppConfig::from_env();

    let storage = match config.database_url.as_deref() {
        Some(url) => {
            let db = create_pool(url).await.map_err(|e| {
                tracing::error!("Failed to connect to database: {e}");
                std::io::Error::other(e)
            })?;
            if config.run_migrations {
                Migrator::up(&db, None).await.map_err(|e| {
                    tracing::error!("Failed to apply migrations: {e}");
                    std::io::Error::other(e)
                })?;
                tracing::info!("Database schema is up to date");
            }
            tracing::info!("Connected to database");
            Storage::new(db)
        }
        None => {
            tracing::warn!("DATABASE_URL is not set; order and profile endpoints are disabled");
            Storage::disabled()
        }
    };

    let storage_data = web::Data::new(storage);
    let cache_data = web::Data::new(IdentityCache::new(&config.cache));
    let catalog_data = web::Data::new(TariffCatalog::default());
    let static_dir = config.static_dir.clone();

    let bind_addr = config.bind_addr();
    tracing::info!("Server running at http://{bind_addr}");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(vec!["GET", "POST", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .max_age(3600);

        let mut app = App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(storage_data.clone())
            .app_data(cache_data.clone())
            .app_data(catalog_data.clone())
            .service(web::scope("/api").configure(handlers::init_routes));

        // Static files come after /api so they never shadow it.
        if let Some(dir) = &static_dir {
            app = app.service(Files::new("/", dir).index_file("index.html"));
        }
        app
    })
    .bind(&bind_addr)?
    .run()
    .await
}

use std::{process, sync::Arc};

use carta::{
    application::dishes::DishService,
    application::error::AppError,
    application::menus::MenuService,
    application::submenus::SubmenuService,
    cache::{Cache, NullCache, RedisCache},
    config,
    infra::{
        db::PgUowFactory,
        error::InfraError,
        http::{ApiState, AppInfo, build_router},
        telemetry,
    },
};
use tower_http::trace::TraceLayer;
use tracing::{Dispatch, Level, dispatcher, error, info, warn};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt().with_max_level(Level::ERROR).finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()?;

    let command = cli_args
        .command
        .unwrap_or(config::Command::Serve(Box::<config::ServeArgs>::default()));

    telemetry::init(&settings.logging)?;

    match command {
        config::Command::Serve(_) => run_serve(settings).await,
        config::Command::Migrate(_) => run_migrate(settings).await,
    }
}

async fn run_serve(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_database(&settings).await?;

    PgUowFactory::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    let cache = build_cache(&settings).await?;
    let factory = PgUowFactory::new(pool.clone());

    let state = ApiState {
        menus: MenuService::new(cache.clone(), factory.clone()),
        submenus: SubmenuService::new(cache.clone(), factory.clone()),
        dishes: DishService::new(cache.clone(), factory.clone()),
        info: AppInfo {
            name: settings.app.name.clone(),
            version: settings.app.version.clone(),
            description: settings.app.description.clone(),
        },
        db: Some(pool.clone()),
    };

    let router = build_router(state).layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(settings.server.addr)
        .await
        .map_err(|err| AppError::from(InfraError::from(err)))?;
    info!(addr = %settings.server.addr, "listening");

    // If in-flight requests outlive the grace period the process is torn
    // down hard rather than hanging forever.
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let grace = settings.server.graceful_shutdown;
    tokio::spawn(async move {
        if shutdown_rx.await.is_ok() {
            tokio::time::sleep(grace).await;
            error!(grace_secs = grace.as_secs(), "graceful shutdown timed out");
            process::exit(1);
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("shutdown signal received");
            let _ = shutdown_tx.send(());
        })
        .await
        .map_err(|err| AppError::unexpected(format!("server error: {err}")))?;

    if let Err(err) = cache.close().await {
        warn!(error = %err, "failed to close cache connection");
    }
    pool.close().await;

    Ok(())
}

async fn run_migrate(settings: config::Settings) -> Result<(), AppError> {
    let pool = connect_database(&settings).await?;

    PgUowFactory::run_migrations(&pool)
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))?;

    info!("migrations applied");
    pool.close().await;
    Ok(())
}

async fn connect_database(settings: &config::Settings) -> Result<sqlx::PgPool, AppError> {
    let database_url = settings
        .database
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("database url is not configured"))?;

    PgUowFactory::connect(database_url, settings.database.max_connections.get())
        .await
        .map_err(|err| AppError::from(InfraError::database(err)))
}

async fn build_cache(settings: &config::Settings) -> Result<Arc<dyn Cache>, AppError> {
    if !settings.cache.enabled {
        info!("cache disabled; running without one");
        return Ok(Arc::new(NullCache));
    }

    let url = settings
        .cache
        .url
        .as_ref()
        .ok_or_else(|| InfraError::configuration("cache url is not configured"))?;

    let cache = RedisCache::connect(url, settings.cache.ttl)
        .await
        .map_err(|err| AppError::from(InfraError::cache(err)))?;
    info!(ttl_secs = settings.cache.ttl.as_secs(), "cache connected");
    Ok(Arc::new(cache))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install ctrl-c handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => warn!(error = %err, "failed to install sigterm handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

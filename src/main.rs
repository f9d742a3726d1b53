use axum::http::{header, HeaderValue, Method};
use orbit_api::{
    api_routes,
    config::{init_tracing, load_config},
    db::{establish_connection_from_app_config, run_migrations},
    openapi::swagger_ui,
    request_id::request_id_middleware,
    AppState,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_tracing(&config.log_level, config.log_json);

    let db = Arc::new(establish_connection_from_app_config(&config).await?);

    if config.auto_migrate {
        run_migrations(&db).await?;
    } else {
        info!("auto_migrate disabled, skipping migrations");
    }

    let cors = build_cors_layer(&config);
    let addr = SocketAddr::new(config.host.parse()?, config.port);
    let state = AppState::new(db, config);

    let app = axum::Router::new()
        .nest("/api", api_routes(&state.services))
        .merge(swagger_ui())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(60)))
        .layer(cors)
        .with_state(state);

    info!("Listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn build_cors_layer(config: &orbit_api::config::AppConfig) -> CorsLayer {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];
    let headers = [header::AUTHORIZATION, header::CONTENT_TYPE];

    if let Some(raw) = config.cors_allowed_origins.as_deref() {
        let origins: Vec<HeaderValue> = raw
            .split(',')
            .filter_map(|origin| {
                let origin = origin.trim();
                if origin.is_empty() {
                    return None;
                }
                match origin.parse::<HeaderValue>() {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin, "skipping unparseable CORS origin");
                        None
                    }
                }
            })
            .collect();

        if !origins.is_empty() {
            let layer = CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(methods)
                .allow_headers(headers);
            return if config.cors_allow_credentials {
                layer.allow_credentials(true)
            } else {
                layer
            };
        }
    }

    if config.should_allow_permissive_cors() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(headers)
    } else {
        // validate_additional_constraints rejects this combination earlier
        CorsLayer::new()
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!("Failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}

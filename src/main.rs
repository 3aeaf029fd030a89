use axum::Router;
use clap::Parser;
use dotenvy::dotenv;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing_subscriber::{EnvFilter, fmt};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;
use utoipa_redoc::{Redoc, Servable};
use utoipa_swagger_ui::SwaggerUi;

use stockroom::api_docs::ApiDoc;
use stockroom::config::MasterData;
use stockroom::controllers::site_handler::handler_404;
use stockroom::routes::{api_routes, middleware, site_routes};

#[derive(Parser)]
#[command(author, version, about = "Warehouse master data service")]
struct Cli {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(long, default_value = "3000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    let cli = Cli::parse();

    // Setup formatting and environment for trace
    let fmt_layer = fmt::layer().with_file(true).with_line_number(true).pretty();
    let filter_layer = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    // Connect to database
    let master_data = Arc::new(RwLock::new(
        MasterData::new().await.expect("database setup failed"),
    ));

    // handy openapi auto generated docs!
    let swagger_ui = SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi());
    let redoc_ui = Redoc::with_url("/redoc", ApiDoc::openapi());
    let rapidoc_ui = RapiDoc::new("/api-docs/openapi.json").path("/rapidoc");

    let app = Router::new()
        .merge(site_routes::get_routes())
        .nest("/api", api_routes::get_routes())
        .merge(swagger_ui)
        .merge(redoc_ui)
        .merge(rapidoc_ui)
        .fallback(handler_404)
        .with_state(master_data);
    let app = middleware::configure_middleware(app);

    let ip = SocketAddr::new(cli.host, cli.port);
    let listener = tokio::net::TcpListener::bind(ip)
        .await
        .expect("failed to bind");
    tracing::info!("serving {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("server error");
}

use std::sync::Arc;
use std::time::Duration;
use turnstile::application_impl::*;
use turnstile::application_port::*;
use turnstile::domain_model::*;
use turnstile::domain_port::TokenStore;
use turnstile::infra_http::*;
use turnstile::infra_store::*;
use turnstile::logger::*;
use turnstile::settings::*;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let logger = Logger::new_bootstrap();

    let project_settings = parse_settings(cli.settings.as_deref())?;
    info!(?project_settings);
    let logger_config = LogConfig {
        filter: project_settings.log.filter.clone(),
    };
    logger.reload_from_config(&logger_config)?;

    let client: Arc<dyn ApiClient> = match project_settings.api.backend.as_str() {
        "fake" => Arc::new(FakeApiClient::new()),
        "real" => Arc::new(build_real_client(&project_settings)?),
        other => return Err(anyhow::anyhow!("unknown api backend: {other}")),
    };

    match client.send(ApiRequest::get("/jobs")).await {
        Ok(response) => info!(status = response.status, body = %response.body, "request settled"),
        Err(e) => warn!("request failed: {e}"),
    }

    Ok(())
}

fn build_real_client(settings: &Settings) -> anyhow::Result<HttpApiClient> {
    let token_store: Arc<dyn TokenStore> = match settings.storage.backend.as_str() {
        "memory" => Arc::new(MemoryTokenStore::new()),
        "file" => Arc::new(FileTokenStore::new(&settings.storage.token_path)),
        other => return Err(anyhow::anyhow!("unknown storage backend: {other}")),
    };

    let http = build_client(Duration::from_secs(settings.api.timeout_secs))?;
    let transport = Arc::new(ReqwestTransport::new(
        http.clone(),
        settings.api.base_url.as_str(),
    ));
    let gateway = Arc::new(ReqwestRefreshGateway::new(
        http,
        &settings.api.base_url,
        &settings.api.refresh_path,
    ));
    let terminator = Arc::new(SessionTerminator::new(
        token_store.clone(),
        Arc::new(TracingLoginBoundary),
    ));
    let coordinator = Arc::new(RefreshCoordinator::new(
        gateway,
        token_store.clone(),
        terminator,
    ));

    Ok(HttpApiClient::new(transport, token_store, coordinator))
}

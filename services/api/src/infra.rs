use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use ta_portal::config::AppConfig;
use ta_portal::workflows::postings::applications::{
    FixedDecisionPrompt, JsonFileStore, PortalService,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Portal service over the configured data directory. Non-interactive
/// surfaces answer the save-as-default prompt with a fixed decision.
pub(crate) fn file_backed_service(
    config: &AppConfig,
    save_defaults: bool,
) -> PortalService<JsonFileStore, FixedDecisionPrompt> {
    let store = Arc::new(JsonFileStore::new(config.storage.data_dir.clone()));
    let prompt = Arc::new(if save_defaults {
        FixedDecisionPrompt::accepting()
    } else {
        FixedDecisionPrompt::declining()
    });
    PortalService::new(store, prompt, config.documents)
}

use crate::backend::{BackendConnector, register::get_backend_plugin};
use crate::config::{AppConfig, BackendConfig};
use crate::errors::{AmsError, Result};
use crate::services::notices::NoticeBoard;
use std::sync::Arc;
use tracing::{debug, warn};

const FALLBACK_BACKEND: &str = crate::backend::memory::PLUGIN_NAME;

pub struct StartupContext {
    pub connector: Arc<dyn BackendConnector>,
    pub notices: NoticeBoard,
}

async fn build(config: &BackendConfig, backend_type: &str) -> Result<Arc<dyn BackendConnector>> {
    let constructor = get_backend_plugin(backend_type).ok_or_else(|| {
        AmsError::backend_plugin_not_found(format!(
            "backend '{backend_type}' not found in registry"
        ))
    })?;
    let mut config = config.clone();
    config.backend_type = backend_type.to_string();
    constructor(config).await
}

/// 创建后端连接器，配置的后端不可用时回退到内存后端
async fn create_connector(config: &BackendConfig) -> Result<Arc<dyn BackendConnector>> {
    let backend_type = &config.backend_type;
    warn!("Attempting to create {} backend", backend_type);

    match build(config, backend_type).await {
        Ok(connector) => {
            warn!("Successfully created {} backend", backend_type);
            Ok(connector)
        }
        Err(e) if backend_type != FALLBACK_BACKEND => {
            warn!("Failed to create {} backend: {}", backend_type, e);
            warn!("Falling back to {} backend", FALLBACK_BACKEND);
            let connector = build(config, FALLBACK_BACKEND).await?;
            warn!("Successfully created fallback {} backend", FALLBACK_BACKEND);
            Ok(connector)
        }
        Err(e) => Err(e),
    }
}

/// 准备启动上下文：后端连接器与通知面板
pub async fn prepare_startup(config: &AppConfig) -> Result<StartupContext> {
    if cfg!(debug_assertions) {
        crate::backend::register::debug_backend_registry();
        debug!("Debug mode: backend registry is enabled");
    }

    let connector = create_connector(&config.backend).await?;
    warn!("Backend '{}' initialized", connector.name());

    Ok(StartupContext {
        connector,
        notices: NoticeBoard::new(config.notices.capacity),
    })
}

use crate::backend::BackendConnector;
use crate::config::BackendConfig;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedConnectorFuture =
    Pin<Box<dyn Future<Output = Result<Arc<dyn BackendConnector>>> + Send>>;
pub type BackendConstructor = Arc<dyn Fn(BackendConfig) -> BoxedConnectorFuture + Send + Sync>;

static BACKEND_REGISTRY: Lazy<RwLock<HashMap<String, BackendConstructor>>> = Lazy::new(|| {
    let mut registry: HashMap<String, BackendConstructor> = HashMap::new();
    // 内置插件
    registry.insert(
        crate::backend::memory::PLUGIN_NAME.to_string(),
        crate::backend::memory::constructor(),
    );
    RwLock::new(registry)
});

pub fn register_backend_plugin<S: Into<String>>(name: S, constructor: BackendConstructor) {
    let name = name.into();
    let mut registry = BACKEND_REGISTRY
        .write()
        .expect("Backend registry lock poisoned");
    registry.insert(name, constructor);
}

pub fn get_backend_plugin(name: &str) -> Option<BackendConstructor> {
    BACKEND_REGISTRY
        .read()
        .expect("Backend registry lock poisoned")
        .get(name)
        .cloned()
}

pub fn debug_backend_registry() {
    let registry = BACKEND_REGISTRY
        .read()
        .expect("Backend registry lock poisoned");
    if registry.is_empty() {
        tracing::debug!("No backend plugins registered.");
    } else {
        tracing::debug!("Registered backend plugins:");
        for key in registry.keys() {
            tracing::debug!(" - {}", key);
        }
    }
}

use serde::{Deserialize, Serialize};

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub query: QueryConfig,
    pub backend: BackendConfig,
    pub notices: NoticeConfig,
}

/// 应用设置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub system_name: String,
    pub environment: String,
    pub log_level: String,
}

/// 列表查询配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryConfig {
    pub debounce_ms: u64,  // 静默窗口（毫秒）
    pub page_size: usize,  // 每页条目数
    pub apply_mode: ApplyMode,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            page_size: 12,
            apply_mode: ApplyMode::Server,
        }
    }
}

impl QueryConfig {
    pub fn debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.debounce_ms)
    }
}

/// 过滤在哪一侧执行
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplyMode {
    /// 把过滤条件下推给后端
    Server,
    /// 拉取全部候选集后在本地过滤
    Client,
}

/// 后端配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(rename = "type")]
    pub backend_type: String,
    pub url: String,
    #[serde(skip_serializing, default)] // 不输出到日志
    pub api_key: String,
    pub channel_capacity: usize,
    pub seed_demo_data: bool,
}

/// 通知配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoticeConfig {
    pub capacity: usize,
}

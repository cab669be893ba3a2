//! 统一错误处理模块
//!
//! 使用宏自动生成错误类型，支持错误代码和类型名称。

use std::fmt;

/// 定义错误类型的宏
///
/// 自动生成：
/// - enum 定义
/// - code() 方法 - 返回错误代码
/// - error_type() 方法 - 返回错误类型名称
/// - message() 方法 - 返回错误详情
/// - 便捷构造函数
macro_rules! define_ams_errors {
    ($(
        $variant:ident($code:literal, $type_name:literal)
    ),* $(,)?) => {
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub enum AmsError {
            $($variant(String),)*
        }

        impl AmsError {
            /// 获取错误代码
            pub fn code(&self) -> &'static str {
                match self {
                    $(AmsError::$variant(_) => $code,)*
                }
            }

            /// 获取错误类型名称
            pub fn error_type(&self) -> &'static str {
                match self {
                    $(AmsError::$variant(_) => $type_name,)*
                }
            }

            /// 获取错误详情
            pub fn message(&self) -> &str {
                match self {
                    $(AmsError::$variant(msg) => msg,)*
                }
            }
        }

        // 生成便捷构造函数
        paste::paste! {
            impl AmsError {
                $(
                    pub fn [<$variant:snake>]<T: Into<String>>(msg: T) -> Self {
                        AmsError::$variant(msg.into())
                    }
                )*
            }
        }
    };
}

define_ams_errors! {
    Validation("E001", "Validation Error"),
    Remote("E002", "Remote Error"),
    Division("E003", "Division Error"),
    NotFound("E004", "Resource Not Found"),
    Serialization("E005", "Serialization Error"),
    DateParse("E006", "Date Parse Error"),
    Config("E007", "Configuration Error"),
    BackendPluginNotFound("E008", "Backend Plugin Not Found"),
    Channel("E009", "Channel Closed"),
}

impl AmsError {
    /// 本地校验错误不会发送到后端
    pub fn is_local(&self) -> bool {
        matches!(self, AmsError::Validation(_) | AmsError::Division(_))
    }

    /// 格式化为彩色输出（用于开发环境）
    #[cfg(debug_assertions)]
    pub fn format_colored(&self) -> String {
        format!(
            "\x1b[1;31m[ERROR]\x1b[0m \x1b[33m{}\x1b[0m \x1b[31m{}\x1b[0m\n  {}",
            self.code(),
            self.error_type(),
            self.message()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for AmsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for AmsError {}

// 为常见的错误类型实现 From trait
impl From<serde_json::Error> for AmsError {
    fn from(err: serde_json::Error) -> Self {
        AmsError::Serialization(err.to_string())
    }
}

impl From<chrono::ParseError> for AmsError {
    fn from(err: chrono::ParseError) -> Self {
        AmsError::DateParse(err.to_string())
    }
}

impl From<config::ConfigError> for AmsError {
    fn from(err: config::ConfigError) -> Self {
        AmsError::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AmsError>;

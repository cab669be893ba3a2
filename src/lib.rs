//! AMS Dashboard - 考核与评分系统前端核心
//!
//! 列表过滤、排序、分页引擎，防抖查询协调，以及由后端变更驱动的实时刷新。
//!
//! # 架构
//! - `backend`: 后端抽象与内存实现（插件注册）
//! - `config`: 配置管理
//! - `engine`: 过滤、排序、分页引擎
//! - `errors`: 统一错误处理
//! - `models`: 数据模型定义
//! - `presentation`: 视图模型适配
//! - `runtime`: 运行时生命周期管理
//! - `services`: 查询协调、实时刷新与操作入口
//! - `utils`: 状态推导与校验工具

pub mod backend;
pub mod config;
pub mod engine;
pub mod errors;
pub mod models;
pub mod presentation;
pub mod runtime;
pub mod services;
pub mod utils;

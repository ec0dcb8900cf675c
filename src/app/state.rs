// ==========================================
// FMCG 采购风险分析 - 应用状态
// ==========================================
// 职责: 一次加载基础表与阈值,持有共享的驾驶舱 API
// 红线: 基础表加载后只读,会话期内不失效
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::NaiveDate;

use crate::api::{ApiResult, RiskDashboardApi};
use crate::config::{ConfigManager, RiskThresholds};
use crate::domain::records::Dataset;
use crate::domain::types::DataSourceMode;
use crate::importer::{DqViolation, WorkbookLoader};

/// 数据源路径环境变量
pub const ENV_DATA_PATH: &str = "PROCUREMENT_RISK_DATA_PATH";
/// 阈值覆写文件环境变量
pub const ENV_CONFIG_PATH: &str = "PROCUREMENT_RISK_CONFIG";

const APP_DIR: &str = "fmcg-procurement-risk";
const DEFAULT_WORKBOOK: &str = "FMCG_Purchasing_Data.xlsx";

/// 应用状态
pub struct AppState {
    /// 数据源路径 (内存构建时为 None)
    pub data_path: Option<PathBuf>,

    /// 已加载的基础表
    pub dataset: Arc<Dataset>,

    /// 加载时发现的数据质量问题
    pub violations: Vec<DqViolation>,

    /// 生效阈值
    pub thresholds: RiskThresholds,

    /// 驾驶舱API
    pub dashboard_api: Arc<RiskDashboardApi>,
}

impl AppState {
    /// 从数据源加载并创建AppState
    ///
    /// # 参数
    /// - data_path: xlsx 工作簿或 CSV 目录
    /// - config_path: 可选的阈值覆写 JSON
    /// - as_of: PO 账龄基准日
    ///
    /// # 返回
    /// - Err(ApiError::Import): 数据源不可读或必填字段缺失
    /// - Err(ApiError::Config): 覆写文件不可读或取值非法
    pub fn new<P: AsRef<Path>>(
        data_path: P,
        config_path: Option<&Path>,
        as_of: NaiveDate,
    ) -> ApiResult<Self> {
        let data_path = data_path.as_ref();
        tracing::info!(path = %data_path.display(), "初始化AppState");

        let config = match config_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "加载阈值覆写");
                ConfigManager::from_file(path)?
            }
            None => ConfigManager::new(),
        };
        let thresholds = config.thresholds()?;

        let report = WorkbookLoader.load(data_path)?;
        if !report.violations.is_empty() {
            tracing::warn!(count = report.violations.len(), "数据质量检查存在告警");
        }
        tracing::info!(
            mode = ?report.mode,
            elapsed_ms = report.elapsed_ms,
            "基础表加载完成"
        );

        let mut state = Self::from_dataset(report.dataset, thresholds, as_of);
        state.data_path = Some(data_path.to_path_buf());
        state.violations = report.violations;
        Ok(state)
    }

    /// 从内存中的基础表创建AppState
    pub fn from_dataset(dataset: Dataset, thresholds: RiskThresholds, as_of: NaiveDate) -> Self {
        let dataset = Arc::new(dataset);
        let dashboard_api = Arc::new(RiskDashboardApi::new(
            Arc::clone(&dataset),
            thresholds.clone(),
            as_of,
        ));

        Self {
            data_path: None,
            dataset,
            violations: Vec::new(),
            thresholds,
            dashboard_api,
        }
    }

    pub fn mode(&self) -> DataSourceMode {
        self.dataset.mode()
    }
}

/// 获取默认数据源路径
///
/// # 规则
/// 1. 环境变量 PROCUREMENT_RISK_DATA_PATH
/// 2. 用户数据目录/fmcg-procurement-risk/FMCG_Purchasing_Data.xlsx
/// 3. ./data/FMCG_Purchasing_Data.xlsx
pub fn get_default_data_path() -> PathBuf {
    resolve_data_path(std::env::var(ENV_DATA_PATH).ok(), dirs::data_dir())
}

/// 获取阈值覆写文件路径 (环境变量未设置时为 None)
pub fn get_config_path() -> Option<PathBuf> {
    std::env::var(ENV_CONFIG_PATH)
        .ok()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}

fn resolve_data_path(explicit: Option<String>, data_dir: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        let trimmed = path.trim();
        if !trimmed.is_empty() {
            return PathBuf::from(trimmed);
        }
    }

    // 用户数据目录下存在工作簿时优先使用
    if let Some(dir) = data_dir {
        let candidate = dir.join(APP_DIR).join(DEFAULT_WORKBOOK);
        if candidate.exists() {
            return candidate;
        }
    }

    PathBuf::from("./data").join(DEFAULT_WORKBOOK)
}

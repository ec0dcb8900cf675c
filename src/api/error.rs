// ==========================================
// FMCG 采购风险分析 - API层错误类型
// ==========================================
// 职责: 汇总导入 / 配置 / 分析层错误,对外提供统一错误
// ==========================================

use crate::config::ConfigError;
use crate::engine::AnalysisError;
use crate::importer::ImportError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 下层错误
    // ==========================================
    #[error("数据导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("分析失败: {0}")]
    Analysis(#[from] AnalysisError),

    // ==========================================
    // 输入错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),
}

/// API层Result类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_error_conversion() {
        let err: ApiError = AnalysisError::InvalidCoverageImprovement {
            pct: 7,
            max: 50,
            step: 5,
        }
        .into();
        assert!(matches!(err, ApiError::Analysis(_)));
        assert!(err.to_string().contains("7%"));
    }

    #[test]
    fn test_import_error_conversion() {
        let err: ApiError = ImportError::SheetNotFound("Inventory".to_string()).into();
        assert!(matches!(err, ApiError::Import(ImportError::SheetNotFound(_))));
    }
}

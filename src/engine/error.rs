// ==========================================
// FMCG 采购风险分析 - 分析层错误类型
// ==========================================
// 说明: 数据条件 (未收货 / 零分母 / 空范围 / 缺绩效表) 不是错误
// ==========================================

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("覆盖提升比例无效: {pct}% (允许 0..={max}, 步长 {step})")]
    InvalidCoverageImprovement { pct: u32, max: u32, step: u32 },
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;

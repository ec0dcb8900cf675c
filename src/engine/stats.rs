// ==========================================
// FMCG 采购风险分析 - 统计工具
// ==========================================
// 红线: 零分母一律回落到定义值 (0 或排除),不产生 NaN / ∞
// ==========================================

/// 算术平均; 空输入返回 None
pub fn mean<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// 样本标准差 (n−1); 样本数 < 2 时为 0
pub fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = values.iter().sum::<f64>() / values.len() as f64;
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

/// 有限值中的最大值
pub fn max_finite<I: IntoIterator<Item = f64>>(values: I) -> Option<f64> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some(v),
            Some(m) => Some(if v > m { v } else { m }),
        })
}

/// 按范围内最大值归一; 最大值为 0 或未定义时归一值为 0
pub fn normalize(value: f64, max: Option<f64>) -> f64 {
    match max {
        Some(m) if m > 0.0 && value.is_finite() => value / m,
        _ => 0.0,
    }
}

/// 安全比值; 分母为 0 时为 0
pub fn ratio_or_zero(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// 安全比值; 分母 <= 0 时未定义
pub fn ratio_if_positive(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator > 0.0 {
        Some(numerator / denominator)
    } else {
        None
    }
}

/// 分位数 (线性插值)
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if sorted.is_empty() {
        return None;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

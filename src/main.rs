// ==========================================
// FMCG 采购风险分析 - 命令行入口
// ==========================================
// 职责: 初始化日志/语言 → 一次加载数据源 → 输出全量报表 JSON
// ==========================================

use anyhow::{Context, Result};
use chrono::Local;

use procurement_risk::app::{get_default_data_path, state::get_config_path, AppState};
use procurement_risk::engine::AnalysisScope;
use procurement_risk::{i18n, logging};

const ENV_LOCALE: &str = "PROCUREMENT_RISK_LOCALE";
const ENV_WHAT_IF_PCT: &str = "PROCUREMENT_RISK_WHAT_IF_PCT";

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{} - 系统版本: {}", procurement_risk::APP_NAME, procurement_risk::VERSION);
    tracing::info!("==================================================");

    if let Ok(locale) = std::env::var(ENV_LOCALE) {
        i18n::set_locale(locale.trim());
    }

    let what_if_pct = match std::env::var(ENV_WHAT_IF_PCT) {
        Ok(raw) => Some(
            raw.trim()
                .parse::<u32>()
                .with_context(|| format!("{} 不是非负整数: {}", ENV_WHAT_IF_PCT, raw))?,
        ),
        Err(_) => None,
    };

    let data_path = get_default_data_path();
    let config_path = get_config_path();
    tracing::info!("使用数据源: {}", data_path.display());

    let state = AppState::new(&data_path, config_path.as_deref(), Local::now().date_naive())
        .with_context(|| format!("无法初始化AppState: {}", data_path.display()))?;

    let report = state
        .dashboard_api
        .full_report(&AnalysisScope::all(), what_if_pct)
        .context("生成报表失败")?;

    let top_n = state.thresholds.top_n;
    for r in report.supplier.top(top_n) {
        tracing::info!(supplier = %r.supplier_id, score = r.risk_score, segment = ?r.segment, "供应商风险");
    }
    for r in report.inventory.top_early_warnings(top_n) {
        tracing::info!(material = %r.material_id, days_to_stockout = ?r.days_to_stockout, "断货预警");
    }
    for r in report.po_lead_time.top_overdue(top_n) {
        tracing::info!(po = %r.po_number, age = r.current_age, "超期未结PO");
    }
    for r in report.production.top(top_n) {
        tracing::info!(
            material = %r.material_id,
            product = %r.product_id,
            score = r.impact_risk_score,
            "生产影响"
        );
    }

    let json = serde_json::to_string_pretty(&report).context("报表序列化失败")?;
    println!("{}", json);

    Ok(())
}

// ==========================================
// 生产日报 OEE - 命令行入口
// ==========================================
// 用法:
//   shift-oee-report [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--out report.csv]
//                    [--db path] [--catalog eph.csv]
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;

use shift_oee_report::config::{get_default_db_path, ConfigManager};
use shift_oee_report::engine::MachineCatalog;
use shift_oee_report::importer::load_catalog;
use shift_oee_report::repository::ShiftRecordRepository;
use shift_oee_report::{logging, DateRangeFilter, ReportApi, ReportView};

#[derive(Debug, Default)]
struct CliArgs {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    out: Option<String>,
    db: Option<String>,
    catalog: Option<String>,
}

fn parse_args() -> Result<CliArgs> {
    let mut parsed = CliArgs::default();
    let mut args = std::env::args().skip(1);

    while let Some(flag) = args.next() {
        let mut value = || {
            args.next()
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow!("参数 {} 缺少取值", flag))
        };
        match flag.as_str() {
            "--from" => parsed.from = Some(parse_date(&value()?)?),
            "--to" => parsed.to = Some(parse_date(&value()?)?),
            "--out" => parsed.out = Some(value()?),
            "--db" => parsed.db = Some(value()?),
            "--catalog" => parsed.catalog = Some(value()?),
            other => bail!("未知参数: {}", other),
        }
    }

    Ok(parsed)
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("日期格式错误: {}", raw))
}

fn main() -> Result<()> {
    logging::init();

    let args = parse_args()?;

    tracing::info!("==================================================");
    tracing::info!("{} v{}", shift_oee_report::APP_NAME, shift_oee_report::VERSION);
    tracing::info!("==================================================");

    let db_path = args.db.clone().unwrap_or_else(get_default_db_path);
    tracing::info!("使用数据库: {}", db_path);

    // ConfigManager 返回 Box<dyn Error>（非 Send），转为 anyhow 文本
    let config = ConfigManager::new(&db_path).map_err(|e| anyhow!("配置初始化失败: {}", e))?;
    let default_rate = config
        .get_default_standard_rate()
        .map_err(|e| anyhow!("读取默认速率失败: {}", e))?;
    let percent_decimals = config
        .get_percent_decimals()
        .map_err(|e| anyhow!("读取小数位配置失败: {}", e))?;
    let catalog_path = match args.catalog.clone() {
        Some(path) => Some(path),
        None => config
            .get_catalog_path()
            .map_err(|e| anyhow!("读取目录路径失败: {}", e))?,
    };

    let catalog = match catalog_path {
        Some(path) => load_catalog(&path).with_context(|| format!("设备目录加载失败: {}", path))?,
        None => {
            tracing::warn!("未配置设备目录,所有记录将使用默认速率");
            MachineCatalog::empty()
        }
    }
    .with_default_rate(default_rate);

    let repo = ShiftRecordRepository::new(&db_path).context("班次记录仓储初始化失败")?;
    let api = ReportApi::new(Arc::new(repo), catalog);

    let filter = DateRangeFilter {
        start: args.from,
        end: args.to,
    };

    let view = match &args.out {
        Some(out) => api
            .export_report(&filter, out, percent_decimals)
            .with_context(|| format!("报表导出失败: {}", out))?,
        None => api.build_report(&filter).context("报表生成失败")?,
    };

    print_summary(&view, percent_decimals);
    Ok(())
}

fn print_summary(view: &ReportView, decimals: usize) {
    let aggregate = &view.aggregate;
    let pct = |ratio: Option<f64>| match ratio {
        Some(r) => format!("{:.*}%", decimals, r * 100.0),
        None => "-".to_string(),
    };

    println!(
        "记录: {} 条可计算, {} 条跳过, {} 条使用默认速率",
        aggregate.computed_count, aggregate.skipped_count, aggregate.unrated_count
    );
    println!("OEE:    {}", pct(aggregate.oee));
    println!("可用率: {}", pct(aggregate.availability));
    println!("性能率: {}", pct(aggregate.performance));
    println!("良品率: {}", pct(aggregate.quality));
}

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Context;
use herd_ledger::models::Investor;
use herd_ledger::normalize::parse_list;
use herd_ledger::utils::{create_spinner, finish_progress_bar, log_warning};
use herd_ledger::{DisplayFilter, JsonDirectoryApi, LivestockApi, OwnershipConfig, OwnershipManager};
use log::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let data_dir = PathBuf::from(
        args.next()
            .context("usage: herd-ledger <data-dir> [page]")?,
    );
    let page: usize = match args.next() {
        Some(raw) => raw
            .parse()
            .with_context(|| format!("page must be a number, got {raw:?}"))?,
        None => 1,
    };

    let config = OwnershipConfig::from_env()?;
    info!("{config}");

    let api = Arc::new(JsonDirectoryApi::new(&data_dir));
    let investors = parse_list::<Investor>(api.fetch_investors().await?)
        .with_context(|| format!("Failed to load investors from {}", data_dir.display()))?;
    if investors.is_empty() {
        warn!("No investors found in {}", data_dir.display());
        return Ok(());
    }

    let page_size = config.page_size;
    let page_count = investors.len().div_ceil(page_size);
    let page = page.clamp(1, page_count);
    let on_page: Vec<&Investor> = investors
        .iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();
    let ids: Vec<String> = on_page.iter().map(|inv| inv.id.clone()).collect();

    let manager = OwnershipManager::new(api, config);
    let known: Vec<String> = investors.iter().map(|inv| inv.id.clone()).collect();
    manager.set_known_investors(&known)?;

    let start = Instant::now();
    let spinner = create_spinner(Some("Counting animals per investor"));
    let stats = manager.load_page(&ids).await;
    finish_progress_bar(&spinner, Some("Counts ready"));
    info!("Loaded page {page}/{page_count} in {:?}", start.elapsed());

    println!("Investors (page {page} of {page_count}):");
    for (investor, stats) in on_page.iter().zip(&stats) {
        println!(
            "  {:<12} {:<24} buffaloes: {:>4}  calves: {:>4}  total: {:>5}",
            investor.id,
            investor.name.as_deref().unwrap_or("-"),
            stats.buffalo_count,
            stats.calf_count,
            stats.total_label()
        );
    }
    println!();
    println!("{}", manager.summary(5)?);

    let diagnostics = manager.last_diagnostics();
    if !diagnostics.orphaned_owners.is_empty() {
        log_warning(
            "Owners missing from the investor list",
            Some(&diagnostics.orphaned_owners.join(", ")),
        );
    }

    if let Some(first) = on_page.first() {
        let view = manager.compose_investor_detail(first, DisplayFilter::All).await;
        println!(
            "Detail for investor {} ({} buffaloes, {} calves):",
            view.investor.id, view.buffalo_count, view.calf_count
        );
        for row in &view.rows {
            println!(
                "  {:<10} {:<7} {:<16} {:<12} pos {:<6} doctor: {:<16} manager: {}",
                row.id, row.kind, row.farm_name, row.shed_name, row.position, row.doctor_name,
                row.manager_name
            );
            for calf in &row.linked_calves {
                println!("    └ {:<8} {:<7} {}", calf.id, calf.kind, calf.shed_name);
            }
        }
        if !view.is_complete() {
            warn!("Detail view degraded: {}", view.degraded.join(", "));
        }
    }

    Ok(())
}

use anyhow::Result;
use opentelemetry::KeyValue;
use std::sync::Arc;
use std::time::Instant;

use ngn_dex_core::amm::pricing;
use ngn_dex_core::dex::clock::SystemClock;
use ngn_dex_core::dex::tokens::{InMemoryToken, TokenLedger};
use ngn_dex_core::{telemetry, DexConfig, StockNgnDex, Wad, WAD};

const TRADER: &str = "demo-trader";

fn k_f64(ngn: Wad, stock: Wad) -> f64 {
    ngn as f64 * stock as f64
}

#[tokio::main]
async fn main() -> Result<()> {
    let tel = telemetry::init("ngn-dex-core")?;

    let config = DexConfig::default();
    let dex_account = config.dex_account.clone();

    let ngn: Arc<InMemoryToken> = Arc::new(InMemoryToken::new("NGNX"));
    let dangcem: Arc<InMemoryToken> = Arc::new(InMemoryToken::new("DANGCEM"));
    ngn.mint(TRADER, 1_000_000 * WAD)?;
    dangcem.mint(TRADER, 10_000 * WAD)?;
    ngn.approve(TRADER, &dex_account, Wad::MAX)?;
    dangcem.approve(TRADER, &dex_account, Wad::MAX)?;

    let dex = StockNgnDex::new(config, ngn.clone(), Arc::new(SystemClock));
    dex.create_pair(
        TRADER,
        "DANGCEM",
        dangcem.clone(),
        100_000 * WAD,
        1_000 * WAD,
        30,
    )?;

    let deadline = u64::MAX;
    for i in 0..5u32 {
        let span = telemetry::make_info_span("swap", i, "dex_demo");
        let _guard = span.enter();

        let pair = dex.get_trading_pair("DANGCEM")?;
        let ngn_in = 1_000 * WAD;
        let min_out = pricing::min_out_with_tolerance(
            pair.ngn_reserve,
            pair.stock_reserve,
            ngn_in,
            pair.fee_bps,
            50, // 0,5% de tolerância
        )?;

        let k0 = k_f64(pair.ngn_reserve, pair.stock_reserve);
        let t0 = Instant::now();
        let stock_out = dex.swap_ngn_for_stock(TRADER, "DANGCEM", ngn_in, min_out, deadline)?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1000.0;

        let after = dex.get_trading_pair("DANGCEM")?;
        let k1 = k_f64(after.ngn_reserve, after.stock_reserve);
        let dk_rel = if k0 > 0.0 { (k1 - k0) / k0 } else { 0.0 };

        tel.swap_latency_ms
            .record(elapsed_ms, &[KeyValue::new("op", "swap")]);
        tel.invariant_error_rel
            .record(dk_rel, &[KeyValue::new("op", "swap")]);

        println!(
            "swap #{i}: {ngn_in} NGN -> {stock_out} DANGCEM (preço {})",
            dex.get_current_price("DANGCEM")?
        );
    }

    println!(
        "stats: {}",
        serde_json::to_string_pretty(&dex.get_dex_stats())?
    );
    println!(
        "histórico DANGCEM: {:?}",
        dex.get_price_history("DANGCEM")?
    );

    tel.shutdown();
    Ok(())
}

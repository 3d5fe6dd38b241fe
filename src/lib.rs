#![forbid(unsafe_code)]
//! Núcleo CPMM (x·y=k) para pares ação↔NGN: cotação, swap com limite de
//! slippage/impacto, provisão de liquidez e contadores agregados.
//!
//! `amm` contém as funções puras (sem mutação); `dex` é o engine com estado
//! (registro de pares, execução serializada por par, seam de tokens).

pub mod amm;
pub mod dex;
pub mod telemetry;

pub use amm::pricing::Quote;
pub use amm::types::{Bps, SwapDirection, Wad, BPS_SCALE, U256, WAD};
pub use dex::config::DexConfig;
pub use dex::engine::StockNgnDex;
pub use dex::pair::PairInfo;
pub use dex::stats::DexStats;

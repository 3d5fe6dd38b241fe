//! Estado mutável por par: ledger de reservas, posições de provedores e
//! histórico de preço. Toda mutação acontece sob o Mutex do engine.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use serde::Serialize;

use crate::amm::types::{Bps, Reserves, Wad};
use crate::dex::tokens::{AccountId, TokenLedger};

pub type StockId = String;

pub struct PairState {
    pub stock_token: StockId,
    pub stock_ledger: Arc<dyn TokenLedger>,
    pub reserves: Reserves,
    pub total_liquidity: Wad,
    pub fee_bps: Bps,
    pub is_active: bool,
    pub last_update_time: u64,
    pub price_impact_limit_bps: Bps,
    /// provedor → shares; a soma dos valores é `total_liquidity`.
    pub positions: HashMap<AccountId, Wad>,
    price_history: VecDeque<Wad>,
    history_retention: Option<usize>,
}

impl PairState {
    pub fn new(
        stock_token: StockId,
        stock_ledger: Arc<dyn TokenLedger>,
        fee_bps: Bps,
        price_impact_limit_bps: Bps,
        history_retention: Option<usize>,
        now: u64,
    ) -> Self {
        Self {
            stock_token,
            stock_ledger,
            reserves: Reserves::new(0, 0),
            total_liquidity: 0,
            fee_bps,
            is_active: false,
            last_update_time: now,
            price_impact_limit_bps,
            positions: HashMap::new(),
            price_history: VecDeque::new(),
            history_retention,
        }
    }

    pub fn position_of(&self, provider: &str) -> Wad {
        self.positions.get(provider).copied().unwrap_or(0)
    }

    /// Anexa um preço observado; com retenção configurada, poda o mais antigo.
    pub fn record_price(&mut self, price: Wad) {
        self.price_history.push_back(price);
        if let Some(cap) = self.history_retention {
            while self.price_history.len() > cap {
                self.price_history.pop_front();
            }
        }
    }

    /// Histórico do mais antigo para o mais recente.
    pub fn price_history(&self) -> Vec<Wad> {
        self.price_history.iter().copied().collect()
    }

    pub fn snapshot(&self) -> PairInfo {
        PairInfo {
            stock_token: self.stock_token.clone(),
            ngn_reserve: self.reserves.ngn,
            stock_reserve: self.reserves.stock,
            total_liquidity: self.total_liquidity,
            fee_bps: self.fee_bps,
            is_active: self.is_active,
            last_update_time: self.last_update_time,
            price_impact_limit_bps: self.price_impact_limit_bps,
        }
    }
}

/// Visão imutável de um par, para leitura e serialização.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PairInfo {
    pub stock_token: StockId,
    pub ngn_reserve: Wad,
    pub stock_reserve: Wad,
    pub total_liquidity: Wad,
    pub fee_bps: Bps,
    pub is_active: bool,
    pub last_update_time: u64,
    pub price_impact_limit_bps: Bps,
}

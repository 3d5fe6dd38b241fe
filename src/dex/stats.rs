//! Contadores agregados do DEX, atualizados sob lock próprio (independente dos
//! locks por par: swaps de pares distintos incrementam em paralelo).

use serde::Serialize;

use crate::amm::types::Wad;

#[derive(Debug, Default)]
pub struct GlobalStats {
    pub pair_count: u64,
    /// Perna NGN acumulada de todos os swaps (monotônico).
    pub total_volume_ngn: Wad,
    /// Taxas acumuladas, valoradas em NGN (monotônico).
    pub fees_collected_ngn: Wad,
    /// Supply agregado corrente de shares (cresce no mint, cai no burn).
    pub total_liquidity: Wad,
}

impl GlobalStats {
    pub fn record_pair_created(&mut self, shares: Wad) {
        self.pair_count += 1;
        self.total_liquidity = self.total_liquidity.saturating_add(shares);
    }

    pub fn record_swap(&mut self, volume_ngn: Wad, fee_ngn: Wad) {
        self.total_volume_ngn = self.total_volume_ngn.saturating_add(volume_ngn);
        self.fees_collected_ngn = self.fees_collected_ngn.saturating_add(fee_ngn);
    }

    pub fn record_liquidity_added(&mut self, shares: Wad) {
        self.total_liquidity = self.total_liquidity.saturating_add(shares);
    }

    pub fn record_liquidity_removed(&mut self, shares: Wad) {
        self.total_liquidity = self.total_liquidity.saturating_sub(shares);
    }

    pub fn snapshot(&self) -> DexStats {
        DexStats {
            pair_count: self.pair_count,
            total_volume_ngn: self.total_volume_ngn,
            fees_collected_ngn: self.fees_collected_ngn,
            total_liquidity: self.total_liquidity,
        }
    }
}

/// Visão imutável dos agregados.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DexStats {
    pub pair_count: u64,
    pub total_volume_ngn: Wad,
    pub fees_collected_ngn: Wad,
    pub total_liquidity: Wad,
}

//! Configuração do engine.

use serde::{Deserialize, Serialize};

use crate::amm::types::{Bps, DEFAULT_PRICE_IMPACT_LIMIT_BPS, FEE_CAP_BPS};
use crate::dex::tokens::AccountId;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct DexConfig {
    /// Teto para a taxa de qualquer par, em bps.
    pub fee_cap_bps: Bps,
    /// Limite de impacto de preço aplicado a pares novos, em bps.
    pub default_price_impact_limit_bps: Bps,
    /// `None` = histórico de preço sem poda (comportamento da fonte on-chain);
    /// `Some(n)` = mantém só as n entradas mais recentes.
    pub price_history_retention: Option<usize>,
    /// Conta que custodia as reservas e figura como spender nas allowances.
    pub dex_account: AccountId,
    /// Conta com a capability administrativa (pause, taxas, limites).
    pub admin: AccountId,
}

impl Default for DexConfig {
    fn default() -> Self {
        Self {
            fee_cap_bps: FEE_CAP_BPS,
            default_price_impact_limit_bps: DEFAULT_PRICE_IMPACT_LIMIT_BPS,
            price_history_retention: None,
            dex_account: "ngn-dex-treasury".to_string(),
            admin: "ngn-dex-admin".to_string(),
        }
    }
}

//! Mapeamento entre condições de domínio e códigos de erro do DEX.
//! Classificação pré-voo de inputs brutos, sem rodar a curva.

use crate::amm::error::DexError;
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::types::{Bps, Wad, BPS_SCALE};

/// Determina o código de erro de um swap a partir dos inputs brutos.
pub fn from_swap_inputs(
    amount_in: Wad,
    reserves: (Wad, Wad),
    fee_bps: Bps,
) -> Option<DexErrorCode> {
    if amount_in == 0 {
        return Some(DexErrorCode::InvalidAmount);
    }
    if reserves.0 == 0 || reserves.1 == 0 {
        return Some(DexErrorCode::InsufficientLiquidity);
    }
    if fee_bps >= BPS_SCALE {
        return Some(DexErrorCode::InvalidFeeRate);
    }
    let keep = u128::from(BPS_SCALE - fee_bps);
    let net = match amount_in.checked_mul(keep) {
        Some(product) => product / u128::from(BPS_SCALE),
        // o caminho de produção usa U256 e não estoura; aqui basta sinalizar
        None => return Some(DexErrorCode::Overflow),
    };
    if net == 0 {
        return Some(DexErrorCode::InsufficientLiquidity);
    }
    if reserves.0.checked_add(amount_in).is_none() {
        return Some(DexErrorCode::Overflow);
    }
    None
}

/// Determina o código de erro do gate de deadline.
pub fn from_deadline(now: u64, deadline: u64) -> Option<DexErrorCode> {
    if deadline < now {
        return Some(DexErrorCode::Expired);
    }
    None
}

/// Constrói um [`DexError`] diretamente de um código.
pub fn to_error(code: DexErrorCode) -> DexError {
    DexError::new(code)
}

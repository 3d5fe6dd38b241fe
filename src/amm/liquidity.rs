//! Liquidez (CPMM): mint inicial, add e remove de shares.
//! Convenções:
//! - mint inicial: floor(sqrt(ngn * stock)) — média geométrica dos depósitos
//! - mint proporcional: o lado sub-ofertado limita; excesso do outro lado
//!   NÃO é devolvido (o caller pré-calcula a razão; min_shares é a guarda)
//! - payouts de burn: floor

use crate::amm::error::Result;
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::guardrails::{ensure_nonzero, ensure_reserves, mul_u128_to_u256, u256_to_u128_checked};
use crate::amm::types::{Wad, U256};
use crate::dex_bail;

/// sqrt inteira (babilônica) em U256.
#[inline]
fn isqrt_u256(n: U256) -> U256 {
    if n <= U256::from(1u8) {
        return n;
    }
    let mut x0 = n >> 1;
    let mut x1 = (x0 + n / x0) >> 1;
    while x1 < x0 {
        x0 = x1;
        x1 = (x0 + n / x0) >> 1;
    }
    x0
}

/// Shares do primeiro depósito: floor(sqrt(ngn * stock)).
/// sqrt de um produto u128·u128 sempre cabe em u128.
pub fn initial_shares(ngn: Wad, stock: Wad) -> Result<Wad> {
    ensure_nonzero(ngn)?;
    ensure_nonzero(stock)?;
    u256_to_u128_checked(isqrt_u256(mul_u128_to_u256(ngn, stock)))
}

/// Mint em pool existente (proporcional, floor):
/// shares = floor( min(ngn_in * S / ngn_reserve, stock_in * S / stock_reserve) ).
pub fn mint_shares(
    ngn_reserve: Wad,
    stock_reserve: Wad,
    ngn_in: Wad,
    stock_in: Wad,
    total_shares: Wad,
) -> Result<Wad> {
    ensure_reserves(ngn_reserve, stock_reserve)?;
    ensure_nonzero(ngn_in)?;
    ensure_nonzero(stock_in)?;
    if total_shares == 0 {
        // pool vazia usa initial_shares
        dex_bail!(DexErrorCode::InsufficientLiquidity, total_shares => 0u128);
    }

    let s = U256::from(total_shares);
    let by_ngn = U256::from(ngn_in) * s / U256::from(ngn_reserve);
    let by_stock = U256::from(stock_in) * s / U256::from(stock_reserve);
    let shares = u256_to_u128_checked(by_ngn.min(by_stock))?;
    if shares == 0 {
        dex_bail!(DexErrorCode::InvalidAmount, ngn_in => ngn_in, stock_in => stock_in);
    }
    Ok(shares)
}

/// Burn proporcional (floor): (ngn_out, stock_out).
/// Queimar todos os shares devolve as reservas inteiras (drenagem permitida;
/// o engine desativa o par quando o supply zera).
pub fn burn_amounts(
    ngn_reserve: Wad,
    stock_reserve: Wad,
    burn_shares: Wad,
    total_shares: Wad,
) -> Result<(Wad, Wad)> {
    ensure_reserves(ngn_reserve, stock_reserve)?;
    ensure_nonzero(burn_shares)?;
    if total_shares == 0 || burn_shares > total_shares {
        dex_bail!(
            DexErrorCode::InsufficientShares,
            burn_shares => burn_shares,
            total_shares => total_shares
        );
    }

    let s = U256::from(total_shares);
    let ngn_out = u256_to_u128_checked(U256::from(ngn_reserve) * U256::from(burn_shares) / s)?;
    let stock_out = u256_to_u128_checked(U256::from(stock_reserve) * U256::from(burn_shares) / s)?;

    if ngn_out == 0 && stock_out == 0 {
        // queimar shares por nada é sempre engano do caller
        dex_bail!(DexErrorCode::InvalidAmount, burn_shares => burn_shares);
    }
    Ok((ngn_out, stock_out))
}

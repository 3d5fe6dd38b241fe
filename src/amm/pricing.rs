//! Preço à vista, preço corrente do par, cotações e impacto de preço.
//! Tudo em WAD; razões calculadas em U256 e truncadas.

use crate::amm::error::Result;
use crate::amm::guardrails::{ensure_nonzero, ensure_reserves, u256_to_u128_checked};
use crate::amm::swap::{fee_on_input, get_amount_out, net_input};
use crate::amm::types::{Bps, Wad, BPS_SCALE, U256, WAD};

/// Resultado de uma cotação: output, taxa (no ativo de entrada) e impacto.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Quote {
    pub amount_out: Wad,
    pub fee: Wad,
    pub price_impact_bps: Bps,
}

/// Preço à vista do ativo de saída por unidade do de entrada: out/in (em WAD).
pub fn spot_price(reserve_in: Wad, reserve_out: Wad) -> Result<Wad> {
    ensure_reserves(reserve_in, reserve_out)?;
    u256_to_u128_checked(U256::from(reserve_out) * U256::from(WAD) / U256::from(reserve_in))
}

/// Preço corrente do par: NGN por token de ação (em WAD).
pub fn current_price(ngn_reserve: Wad, stock_reserve: Wad) -> Result<Wad> {
    ensure_reserves(stock_reserve, ngn_reserve)?;
    u256_to_u128_checked(U256::from(ngn_reserve) * U256::from(WAD) / U256::from(stock_reserve))
}

/// Cotação completa sobre as reservas correntes.
///
/// O impacto compara o preço à vista com o preço de execução do input
/// **líquido** de taxa: mede só o deslocamento da curva, não a taxa.
/// impact_bps = floor( (spot − exec) * 1e4 / spot ), limitado a 1e4.
pub fn quote(reserve_in: Wad, reserve_out: Wad, amount_in: Wad, fee_bps: Bps) -> Result<Quote> {
    let amount_out = get_amount_out(reserve_in, reserve_out, amount_in, fee_bps)?;
    let fee = fee_on_input(amount_in, fee_bps);

    let spot = spot_price(reserve_in, reserve_out)?;
    let dx_net = net_input(amount_in, fee_bps); // > 0, senão get_amount_out falhava
    let exec =
        u256_to_u128_checked(U256::from(amount_out) * U256::from(WAD) / U256::from(dx_net))?;

    let price_impact_bps = if exec >= spot || spot == 0 {
        0
    } else {
        let n = (U256::from(spot) - U256::from(exec)) * U256::from(BPS_SCALE);
        let q = (n / U256::from(spot)).as_u128();
        q.min(BPS_SCALE as u128) as Bps
    };

    Ok(Quote {
        amount_out,
        fee,
        price_impact_bps,
    })
}

/// min_out aceito pela UI para uma tolerância de slippage em bps:
/// min_out = floor( out * (1e4 − tol) / 1e4 ).
pub fn min_out_with_tolerance(
    reserve_in: Wad,
    reserve_out: Wad,
    amount_in: Wad,
    fee_bps: Bps,
    slippage_tolerance_bps: Bps,
) -> Result<Wad> {
    ensure_nonzero(amount_in)?;
    let out = get_amount_out(reserve_in, reserve_out, amount_in, fee_bps)?;
    let tol = slippage_tolerance_bps.min(BPS_SCALE);
    let keep = (BPS_SCALE - tol) as u64;
    Ok((U256::from(out) * U256::from(keep) / U256::from(BPS_SCALE)).as_u128())
}

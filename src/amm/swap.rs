//! Função pura de swap (CPMM x·y=k) com taxa sobre o input.
//! Política de arredondamento: divisão inteira truncada (floor) em todas as
//! etapas, casada com a aritmética de ponto fixo dos tokens (1e18).

use crate::amm::error::Result;
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::guardrails::{checked_add, ensure_nonzero, ensure_rate, ensure_reserves, u256_to_u128_checked};
use crate::amm::types::{Bps, Wad, BPS_SCALE, U256};
use crate::dex_bail;

/// Taxa cobrada sobre o input: floor(amount_in * fee_bps / 1e4).
#[inline]
pub fn fee_on_input(amount_in: Wad, fee_bps: Bps) -> Wad {
    if fee_bps == 0 {
        return 0;
    }
    (U256::from(amount_in) * U256::from(fee_bps) / U256::from(BPS_SCALE)).as_u128()
}

/// Input líquido que entra na curva: floor(amount_in * (1e4 - fee_bps) / 1e4).
/// A taxa não sai do pool; só não conta para o preço.
#[inline]
pub fn net_input(amount_in: Wad, fee_bps: Bps) -> Wad {
    let keep = BPS_SCALE - fee_bps;
    (U256::from(amount_in) * U256::from(keep) / U256::from(BPS_SCALE)).as_u128()
}

/// Calcula o `amount_out` ao enviar `amount_in` do ativo de entrada.
///
/// out = floor( reserve_out * dx_net / (reserve_in + dx_net) ), dx_net líquido
/// de taxa. Garante `0 < out < reserve_out`: o pool nunca é drenado por swap.
pub fn get_amount_out(
    reserve_in: Wad,
    reserve_out: Wad,
    amount_in: Wad,
    fee_bps: Bps,
) -> Result<Wad> {
    ensure_reserves(reserve_in, reserve_out)?;
    ensure_nonzero(amount_in)?;
    ensure_rate(fee_bps, BPS_SCALE - 1)?;

    let dx_net = net_input(amount_in, fee_bps);
    if dx_net == 0 {
        // taxa consumiu o input inteiro: output seria zero
        dex_bail!(DexErrorCode::InsufficientLiquidity, amount_in => amount_in, fee_bps => fee_bps);
    }

    let num = U256::from(reserve_out) * U256::from(dx_net);
    let den = U256::from(reserve_in) + U256::from(dx_net);
    let out = u256_to_u128_checked(num / den)?;

    if out == 0 || out >= reserve_out {
        dex_bail!(
            DexErrorCode::InsufficientLiquidity,
            amount_out => out,
            reserve_out => reserve_out
        );
    }

    // a reserva de entrada cresce pelo valor bruto (taxa fica no pool)
    checked_add(reserve_in, amount_in)?;

    Ok(out)
}

//! Referência de alta precisão ("goldens") baseada em BigUint/BigRational
//! para o swap CPMM (x·y=k) com taxa sobre o input.
//!
//! Três níveis, comparados entre si nos testes:
//! 1. contínuo/exato (racional, sem quantização) — identidade do CPMM;
//! 2. política (replica o core bit a bit: floor na taxa e na divisão);
//! 3. o próprio core inteiro (U256), para medir `Δk/k`.
//!
//! Não entra no caminho de produção — serve de oráculo independente para os
//! testes de arredondamento e goldens.

use crate::amm::error::Result;
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::swap;
use crate::amm::types::{Bps, Wad, BPS_SCALE};
use crate::dex_bail;

use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

#[inline]
fn bu(v: Wad) -> BigUint {
    BigUint::from(v)
}

#[inline]
fn rat(n: u128, d: u128) -> BigRational {
    BigRational::new(BigInt::from(n), BigInt::from(d))
}

#[inline]
fn floor_rat_to_u128(r: &BigRational) -> Result<u128> {
    let f: BigInt = r.clone().floor().to_integer();
    f.to_u128()
        .ok_or_else(|| crate::dex_err!(DexErrorCode::Overflow, op => "floor_rat"))
}

#[inline]
fn k_big(x: Wad, y: Wad) -> BigUint {
    bu(x) * bu(y)
}

// -------------------------
// Contínuo/exato (sem quantização)
// -------------------------

/// amount_out contínuo: taxa exata (racional), sem floor em etapa alguma.
pub fn continuous_amount_out(x: Wad, y: Wad, dx: Wad, fee_bps: Bps) -> Result<BigRational> {
    if x == 0 || y == 0 {
        dex_bail!(DexErrorCode::InsufficientLiquidity, reserve_in => x, reserve_out => y);
    }
    if dx == 0 {
        dex_bail!(DexErrorCode::InvalidAmount, amount_in => 0u128);
    }

    let fee_rate = rat(fee_bps as u128, BPS_SCALE as u128);
    let one = BigRational::from_integer(BigInt::one());
    let dx_net = rat(dx, 1) * (one - fee_rate);

    let x_q = rat(x, 1);
    let y_q = rat(y, 1);
    // out = y * dx_net / (x + dx_net)
    Ok(y_q * dx_net.clone() / (x_q + dx_net))
}

// -------------------------
// Política (replica exatamente o core, em Big-precision)
// -------------------------

/// amount_out com a política do core: net = floor(dx·(1e4−fee)/1e4),
/// out = floor(y·net/(x+net)).
pub fn policy_amount_out(x: Wad, y: Wad, dx: Wad, fee_bps: Bps) -> Result<Wad> {
    if x == 0 || y == 0 {
        dex_bail!(DexErrorCode::InsufficientLiquidity, reserve_in => x, reserve_out => y);
    }
    if dx == 0 {
        dex_bail!(DexErrorCode::InvalidAmount, amount_in => 0u128);
    }

    let keep = BigUint::from(BPS_SCALE - fee_bps);
    let (net, _) = (bu(dx) * keep).div_rem(&BigUint::from(BPS_SCALE));
    if net.is_zero() {
        dex_bail!(DexErrorCode::InsufficientLiquidity, amount_in => dx);
    }

    let (out, _) = (bu(y) * &net).div_rem(&(bu(x) + &net));
    match out.to_u128() {
        Some(v) if v > 0 && v < y => Ok(v),
        Some(v) => Err(crate::dex_err!(DexErrorCode::InsufficientLiquidity, amount_out => v)),
        None => Err(crate::dex_err!(DexErrorCode::Overflow, op => "policy_out")),
    }
}

// -------------------------
// Bundle de comparação (goldens)
// -------------------------

#[derive(Debug, Clone)]
pub struct RefOut {
    pub out_core: Wad,
    pub out_policy: Wad,
    pub out_cont_floor: Wad,
    pub out_cont: BigRational,
    /// (k1 − k0) / k0 do core, com reserva de entrada crescendo pelo bruto.
    pub dk_over_k_core: BigRational,
}

fn dk_over_k_from_core(x: Wad, y: Wad, dx: Wad, out: Wad) -> BigRational {
    let k0 = k_big(x, y);
    let k1 = k_big(x + dx, y - out);
    // k1 >= k0 por construção (out é floor do exato)
    let num = BigInt::from(k1) - BigInt::from(k0.clone());
    BigRational::new(num, BigInt::from(k0))
}

/// Compara o core com a referência para um swap.
pub fn golden_amount_out(x: Wad, y: Wad, dx: Wad, fee_bps: Bps) -> Result<RefOut> {
    let out_core = swap::get_amount_out(x, y, dx, fee_bps)?;
    let out_policy = policy_amount_out(x, y, dx, fee_bps)?;
    let out_cont = continuous_amount_out(x, y, dx, fee_bps)?;
    let out_cont_floor = floor_rat_to_u128(&out_cont)?;
    let dk_over_k_core = dk_over_k_from_core(x, y, dx, out_core);

    Ok(RefOut {
        out_core,
        out_policy,
        out_cont_floor,
        out_cont,
        dk_over_k_core,
    })
}

// -------------------------
// TESTES (sanidade & igualdade policy==core)
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;
    use crate::amm::types::WAD;

    const FEE0: Bps = 0;
    const FEE30: Bps = 30; // 0,30%

    #[inline]
    fn w(n: u128) -> Wad {
        n * WAD
    }

    #[test]
    fn t_policy_matches_core() {
        for (x, y, dx, fee) in [
            (w(1_000_000), w(1_000_000), w(10_000), FEE30),
            (w(100_000), w(1_000), w(1_000), FEE30),
            (w(1_000), w(1_000_000_000), w(17), FEE0),
            (w(5_000_000_000), w(5_000_000_000), w(1_000_000), 500),
        ] {
            let core = swap::get_amount_out(x, y, dx, fee).unwrap();
            let pol = policy_amount_out(x, y, dx, fee).unwrap();
            assert_eq!(core, pol, "x={x} y={y} dx={dx} fee={fee}");
        }
    }

    #[test]
    fn t_core_is_floor_of_continuous_no_fee() {
        let (x, y, dx) = (w(1_000_000), w(2_000_000), w(10_000));
        let g = golden_amount_out(x, y, dx, FEE0).unwrap();
        // sem taxa não há floor intermediário: core == floor(exato)
        assert_eq!(g.out_core, g.out_cont_floor);
    }

    #[test]
    fn t_core_never_exceeds_continuous_with_fee() {
        let (x, y, dx) = (w(1_000_000), w(2_000_000), w(10_000));
        let g = golden_amount_out(x, y, dx, FEE30).unwrap();
        // floor da taxa só reduz o input líquido
        assert!(g.out_core <= g.out_cont_floor);
    }

    #[test]
    fn t_dk_over_k_nonnegative_and_bounded() {
        let g0 = golden_amount_out(w(1_000_000), w(1_000_000), w(10_000), FEE0).unwrap();
        assert!(g0.dk_over_k_core >= BigRational::from_integer(BigInt::zero()));
        // fee=0: desvio só de quantização, ≤ 1e-9
        assert!(g0.dk_over_k_core <= rat(1, 1_000_000_000));

        let g3 = golden_amount_out(w(1_000_000), w(1_000_000), w(10_000), FEE30).unwrap();
        // com taxa, k cresce de verdade
        assert!(g3.dk_over_k_core > g0.dk_over_k_core);
    }
}

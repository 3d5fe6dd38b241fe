//! Validações e helpers numéricos seguros para o núcleo do DEX.
//! Entradas válidas e aritmética sem estouro; toda divisão é truncada (floor).

use crate::amm::error::{DexError, Result};
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::types::{Bps, Wad, U256};

#[inline]
pub fn ensure_nonzero(amount: Wad) -> Result<()> {
    if amount == 0 {
        return Err(DexError::new(DexErrorCode::InvalidAmount).with_context("amount", amount));
    }
    Ok(())
}

/// Reserva zerada em qualquer perna significa pool incapaz de cotar.
#[inline]
pub fn ensure_reserves(reserve_in: Wad, reserve_out: Wad) -> Result<()> {
    if reserve_in == 0 || reserve_out == 0 {
        return Err(DexError::new(DexErrorCode::InsufficientLiquidity)
            .with_context("reserve_in", reserve_in)
            .with_context("reserve_out", reserve_out));
    }
    Ok(())
}

#[inline]
pub fn ensure_rate(rate_bps: Bps, cap_bps: Bps) -> Result<()> {
    if rate_bps > cap_bps {
        return Err(DexError::new(DexErrorCode::InvalidFeeRate)
            .with_context("rate_bps", rate_bps)
            .with_context("cap_bps", cap_bps));
    }
    Ok(())
}

#[inline]
pub fn checked_add(a: Wad, b: Wad) -> Result<Wad> {
    a.checked_add(b)
        .ok_or_else(|| DexError::new(DexErrorCode::Overflow).with_context("op", "add"))
}

#[inline]
pub fn checked_sub(a: Wad, b: Wad) -> Result<Wad> {
    a.checked_sub(b)
        .ok_or_else(|| DexError::new(DexErrorCode::Overflow).with_context("op", "sub"))
}

#[inline]
pub fn mul_u128_to_u256(a: Wad, b: Wad) -> U256 {
    U256::from(a) * U256::from(b)
}

#[inline]
pub fn u256_to_u128_checked(v: U256) -> Result<Wad> {
    if v > U256::from(u128::MAX) {
        return Err(DexError::new(DexErrorCode::Overflow).with_context("op", "downcast"));
    }
    Ok(v.as_u128())
}

/// floor(n * num / den) em U256 → u128, com downcast checado.
#[inline]
pub fn mul_div_floor(n: Wad, num: Wad, den: Wad) -> Result<Wad> {
    if den == 0 {
        return Err(DexError::new(DexErrorCode::Overflow).with_context("op", "div0"));
    }
    u256_to_u128_checked(U256::from(n) * U256::from(num) / U256::from(den))
}

// -------------------------
// TESTES
// -------------------------
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_ensure_nonzero() {
        assert!(ensure_nonzero(1).is_ok());
        assert_eq!(
            ensure_nonzero(0).unwrap_err().code,
            DexErrorCode::InvalidAmount
        );
    }

    #[test]
    fn t_ensure_reserves() {
        assert!(ensure_reserves(1, 1).is_ok());
        assert_eq!(
            ensure_reserves(0, 1).unwrap_err().code,
            DexErrorCode::InsufficientLiquidity
        );
        assert_eq!(
            ensure_reserves(1, 0).unwrap_err().code,
            DexErrorCode::InsufficientLiquidity
        );
    }

    #[test]
    fn t_ensure_rate() {
        assert!(ensure_rate(1_000, 1_000).is_ok());
        assert_eq!(
            ensure_rate(1_001, 1_000).unwrap_err().code,
            DexErrorCode::InvalidFeeRate
        );
    }

    #[test]
    fn t_checked_add_sub_over_under_flow() {
        assert_eq!(checked_add(1, 2).unwrap(), 3);
        assert_eq!(
            checked_add(u128::MAX, 1).unwrap_err().code,
            DexErrorCode::Overflow
        );
        assert_eq!(checked_sub(5, 3).unwrap(), 2);
        assert_eq!(checked_sub(0, 1).unwrap_err().code, DexErrorCode::Overflow);
    }

    #[test]
    fn t_mul_div_floor_truncates() {
        // 7 * 3 / 2 = 10.5 → 10
        assert_eq!(mul_div_floor(7, 3, 2).unwrap(), 10);
        assert_eq!(mul_div_floor(7, 3, 0).unwrap_err().code, DexErrorCode::Overflow);
        // produto u128*u128 não estoura: passa por U256
        assert_eq!(mul_div_floor(u128::MAX, 2, 2).unwrap(), u128::MAX);
        assert_eq!(
            mul_div_floor(u128::MAX, 3, 2).unwrap_err().code,
            DexErrorCode::Overflow
        );
    }
}

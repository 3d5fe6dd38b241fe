//! Política única de arredondamento: floor (divisão truncada) em todas as
//! etapas, conferida contra recomputação em U256 e contra o oráculo racional.

use ngn_dex_core::amm::error_catalog::DexErrorCode;
use ngn_dex_core::amm::liquidity::{burn_amounts, initial_shares, mint_shares};
use ngn_dex_core::amm::pricing::quote;
use ngn_dex_core::amm::ref_golden::golden_amount_out;
use ngn_dex_core::amm::swap::{get_amount_out, net_input};
use ngn_dex_core::{Bps, Wad, U256, BPS_SCALE, WAD};

const FEE0: Bps = 0;
const FEE30: Bps = 30; // 0,30%

#[inline]
fn w(n: u128) -> Wad {
    n * WAD
}

#[test]
fn r1_amount_out_is_floor_of_curve() {
    let (x, y, dx) = (w(1_000_000), w(1_000_000), w(10_000));
    let out = get_amount_out(x, y, dx, FEE30).unwrap();

    // floor explícito sobre o input líquido
    let net = net_input(dx, FEE30);
    let expected = (U256::from(y) * U256::from(net) / (U256::from(x) + U256::from(net))).as_u128();
    assert_eq!(out, expected);
}

#[test]
fn r2_fee_is_floor_of_bps() {
    let (x, y, dx) = (w(100_000), w(1_000), 333_333_333_333_333_333u128);
    let q = quote(x, y, dx, FEE30).unwrap();
    let expected = (U256::from(dx) * U256::from(FEE30) / U256::from(BPS_SCALE)).as_u128();
    assert_eq!(q.fee, expected);
}

#[test]
fn r3_net_zero_input_is_rejected_not_rounded_up() {
    // 1 wei com qualquer taxa: floor zera o líquido, swap recusado
    let err = get_amount_out(w(1_000_000), w(1_000_000), 1, 1).unwrap_err();
    assert_eq!(err.code, DexErrorCode::InsufficientLiquidity);
}

#[test]
fn r4_mint_is_floor_of_sqrt_xy() {
    let (x, y) = (w(2_500_000), w(2_500_000));
    let s = initial_shares(x, y).unwrap();
    let k = U256::from(x) * U256::from(y);
    let s_plus = U256::from(s) + U256::from(1u8);
    // (s+1)^2 ultrapassa k ⇒ s é floor(sqrt(k))
    assert!(U256::from(s) * U256::from(s) <= k);
    assert!(s_plus * s_plus > k);
}

#[test]
fn r5_burn_amounts_are_floor_of_proportion() {
    let (x, y, s) = (w(1_000_000), w(3_000_000), w(1_000_000));
    let burn = w(123_456); // ~12,3456%
    let (xo, yo) = burn_amounts(x, y, burn, s).unwrap();
    let xo_theo = ((U256::from(x) * U256::from(burn)) / U256::from(s)).as_u128();
    let yo_theo = ((U256::from(y) * U256::from(burn)) / U256::from(s)).as_u128();
    assert_eq!(xo, xo_theo);
    assert_eq!(yo, yo_theo);
}

#[test]
fn r6_mint_shares_takes_min_of_floors() {
    let (x, y, s) = (w(1_000_000), w(3_000_000), w(1_500_000));
    let (dx, dy) = (w(10_000), w(29_999)); // lado ação fica ligeiramente curto
    let mint = mint_shares(x, y, dx, dy, s).unwrap();
    let by_x = ((U256::from(dx) * U256::from(s)) / U256::from(x)).as_u128();
    let by_y = ((U256::from(dy) * U256::from(s)) / U256::from(y)).as_u128();
    assert_eq!(mint, by_x.min(by_y));
    assert_eq!(mint, by_y);
}

#[test]
fn r7_core_tracks_rational_oracle() {
    for (x, y, dx, fee) in [
        (w(1_000_000), w(1_000_000), w(10_000), FEE0),
        (w(100_000), w(1_000), w(1_000), FEE30),
        (w(3_000), w(9_000_000), w(77), 500u32),
    ] {
        let g = golden_amount_out(x, y, dx, fee).unwrap();
        assert_eq!(g.out_core, g.out_policy, "política divergiu do core");
        if fee == 0 {
            assert_eq!(g.out_core, g.out_cont_floor, "floor(exato) divergiu sem taxa");
        } else {
            assert!(g.out_core <= g.out_cont_floor);
        }
    }
}

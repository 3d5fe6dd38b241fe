//! Tipos básicos do DEX (escala fixa) + U256 para intermediários.

use uint::construct_uint;
construct_uint! {
    /// Inteiro de 256 bits para contas intermediárias seguras.
    pub struct U256(4);
}

pub type Wad = u128; // escala 1e18 (mesma dos tokens)
pub type Bps = u32;  // 0..=10_000

pub const WAD: Wad = 1_000_000_000_000_000_000u128; // 1e18
pub const BPS_SCALE: Bps = 10_000;                  // 100% em basis points
pub const FEE_CAP_BPS: Bps = 1_000;                 // teto de taxa: 10%
pub const DEFAULT_PRICE_IMPACT_LIMIT_BPS: Bps = 1_000; // limite default de impacto: 10%

/// Sentido de um swap dentro de um par ação↔NGN.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Entrega NGN, recebe o token de ação.
    NgnToStock,
    /// Entrega o token de ação, recebe NGN.
    StockToNgn,
}

/// Reservas de um par: perna NGN e perna ação, ambas em Wad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reserves {
    pub ngn: Wad,
    pub stock: Wad,
}

impl Reserves {
    pub fn new(ngn: Wad, stock: Wad) -> Self {
        Self { ngn, stock }
    }

    /// (reserve_in, reserve_out) na ordem ditada pelo sentido do swap.
    pub fn oriented(&self, direction: SwapDirection) -> (Wad, Wad) {
        match direction {
            SwapDirection::NgnToStock => (self.ngn, self.stock),
            SwapDirection::StockToNgn => (self.stock, self.ngn),
        }
    }
}

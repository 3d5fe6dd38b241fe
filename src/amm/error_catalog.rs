//! Catálogo imutável de erros do DEX.
use core::fmt;

/// Código de erro do DEX.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
pub enum DexErrorCode {
    /// Nenhum par registrado para o token de ação.
    PairNotFound,
    /// Par já criado para o token de ação.
    PairExists,
    /// Par pausado ou ainda sem liquidez.
    PairInactive,
    /// Montante de entrada malformado (zero ou pequeno demais).
    InvalidAmount,
    /// Taxa ou limite em bps fora da faixa permitida.
    InvalidFeeRate,
    /// Pool não cobre o output pedido (ou reservas zeradas).
    InsufficientLiquidity,
    /// Impacto de preço acima do limite configurado do par.
    ExcessivePriceImpact,
    /// Output realizado abaixo do mínimo declarado pelo caller.
    SlippageExceeded,
    /// Deadline venceu antes da execução.
    Expired,
    /// Burn excede a posição registrada do caller.
    InsufficientShares,
    /// Movimentação de token falhou ou retornou falso.
    TransferFailed,
    /// Overflow ou underflow em cálculos numéricos.
    Overflow,
    /// Caller sem a capability administrativa.
    Unauthorized,
}

impl DexErrorCode {
    /// Código textual estável do erro.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::PairNotFound => "DEX-0001",
            Self::PairExists => "DEX-0002",
            Self::PairInactive => "DEX-0003",
            Self::InvalidAmount => "DEX-0004",
            Self::InvalidFeeRate => "DEX-0005",
            Self::InsufficientLiquidity => "DEX-0006",
            Self::ExcessivePriceImpact => "DEX-0007",
            Self::SlippageExceeded => "DEX-0008",
            Self::Expired => "DEX-0009",
            Self::InsufficientShares => "DEX-0010",
            Self::TransferFailed => "DEX-0011",
            Self::Overflow => "DEX-0012",
            Self::Unauthorized => "DEX-0013",
        }
    }

    /// Título curto para UI.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::PairNotFound => "Pair not found",
            Self::PairExists => "Pair already exists",
            Self::PairInactive => "Pair inactive",
            Self::InvalidAmount => "Invalid amount",
            Self::InvalidFeeRate => "Invalid fee rate",
            Self::InsufficientLiquidity => "Insufficient liquidity",
            Self::ExcessivePriceImpact => "Excessive price impact",
            Self::SlippageExceeded => "Slippage exceeded",
            Self::Expired => "Deadline expired",
            Self::InsufficientShares => "Insufficient shares",
            Self::TransferFailed => "Transfer failed",
            Self::Overflow => "Numeric overflow",
            Self::Unauthorized => "Unauthorized",
        }
    }

    /// Mensagem base (en).
    pub const fn message_en(&self) -> &'static str {
        match self {
            Self::PairNotFound => "no trading pair for this stock token",
            Self::PairExists => "trading pair already created for this stock token",
            Self::PairInactive => "trading pair is not active",
            Self::InvalidAmount => "amount must be > 0",
            Self::InvalidFeeRate => "rate in bps is out of range",
            Self::InsufficientLiquidity => "pool cannot cover the requested output",
            Self::ExcessivePriceImpact => "price impact above the pair limit",
            Self::SlippageExceeded => "output below the caller minimum",
            Self::Expired => "deadline passed before execution",
            Self::InsufficientShares => "burn exceeds the recorded position",
            Self::TransferFailed => "token transfer failed or returned false",
            Self::Overflow => "numeric overflow/underflow",
            Self::Unauthorized => "caller lacks the admin capability",
        }
    }

    /// Retorna todas as variantes em ordem estável.
    pub fn all() -> &'static [DexErrorCode] {
        const ALL: &[DexErrorCode] = &[
            DexErrorCode::PairNotFound,
            DexErrorCode::PairExists,
            DexErrorCode::PairInactive,
            DexErrorCode::InvalidAmount,
            DexErrorCode::InvalidFeeRate,
            DexErrorCode::InsufficientLiquidity,
            DexErrorCode::ExcessivePriceImpact,
            DexErrorCode::SlippageExceeded,
            DexErrorCode::Expired,
            DexErrorCode::InsufficientShares,
            DexErrorCode::TransferFailed,
            DexErrorCode::Overflow,
            DexErrorCode::Unauthorized,
        ];
        ALL
    }
}

impl fmt::Display for DexErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Mensagem padrão na localidade ativa (en).
pub fn default_locale_message(code: DexErrorCode) -> &'static str {
    code.message_en()
}

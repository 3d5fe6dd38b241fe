//! Seam ERC-20: o engine move os dois ativos só por este trait.
//! Qualquer falha da camada de token vira `TransferFailed` na borda do engine.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::amm::error::Result;
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::types::Wad;
use crate::{dex_bail, dex_err};

pub type AccountId = String;

/// Contrato mínimo consumido pelo engine (ERC-20/HTS-like, síncrono e atômico).
pub trait TokenLedger: Send + Sync {
    fn symbol(&self) -> &str;

    fn balance_of(&self, owner: &str) -> Wad;

    /// Transferência direta `from → to`.
    fn transfer(&self, from: &str, to: &str, amount: Wad) -> Result<()>;

    /// Transferência via allowance concedida por `from` a `spender`.
    fn transfer_from(&self, spender: &str, from: &str, to: &str, amount: Wad) -> Result<()>;

    /// Autoriza `spender` a sacar até `amount` de `owner` (valor absoluto).
    fn approve(&self, owner: &str, spender: &str, amount: Wad) -> Result<()>;
}

#[derive(Default)]
struct TokenState {
    balances: HashMap<AccountId, Wad>,
    allowances: HashMap<(AccountId, AccountId), Wad>, // (owner, spender)
}

/// Ledger em memória para testes, demos e deploys single-node.
pub struct InMemoryToken {
    symbol: String,
    state: RwLock<TokenState>,
}

impl InMemoryToken {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            state: RwLock::new(TokenState::default()),
        }
    }

    /// Emissão direta (fora do contrato do engine; tooling de setup).
    pub fn mint(&self, to: &str, amount: Wad) -> Result<()> {
        let mut state = self.state.write();
        let balance = state.balances.entry(to.to_string()).or_insert(0);
        *balance = balance
            .checked_add(amount)
            .ok_or_else(|| dex_err!(DexErrorCode::Overflow, op => "mint", token => &self.symbol))?;
        Ok(())
    }

    pub fn allowance(&self, owner: &str, spender: &str) -> Wad {
        self.state
            .read()
            .allowances
            .get(&(owner.to_string(), spender.to_string()))
            .copied()
            .unwrap_or(0)
    }
}

/// Valida as duas pontas antes de gravar qualquer saldo: ou a transferência
/// inteira acontece, ou nada muda.
fn move_balance(state: &mut TokenState, symbol: &str, from: &str, to: &str, amount: Wad) -> Result<()> {
    let from_balance = state.balances.get(from).copied().unwrap_or(0);
    if from_balance < amount {
        dex_bail!(
            DexErrorCode::TransferFailed,
            token => symbol,
            from => from,
            needed => amount,
            available => from_balance
        );
    }
    if from == to {
        return Ok(());
    }
    let to_balance = state.balances.get(to).copied().unwrap_or(0);
    let to_after = to_balance
        .checked_add(amount)
        .ok_or_else(|| dex_err!(DexErrorCode::Overflow, op => "credit", token => symbol))?;

    state.balances.insert(from.to_string(), from_balance - amount);
    state.balances.insert(to.to_string(), to_after);
    Ok(())
}

impl TokenLedger for InMemoryToken {
    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn balance_of(&self, owner: &str) -> Wad {
        self.state.read().balances.get(owner).copied().unwrap_or(0)
    }

    fn transfer(&self, from: &str, to: &str, amount: Wad) -> Result<()> {
        let mut state = self.state.write();
        move_balance(&mut state, &self.symbol, from, to, amount)
    }

    fn transfer_from(&self, spender: &str, from: &str, to: &str, amount: Wad) -> Result<()> {
        let mut state = self.state.write();
        let key = (from.to_string(), spender.to_string());
        let allowance = state.allowances.get(&key).copied().unwrap_or(0);
        if allowance < amount {
            dex_bail!(
                DexErrorCode::TransferFailed,
                token => &self.symbol,
                from => from,
                spender => spender,
                needed => amount,
                allowance => allowance
            );
        }
        move_balance(&mut state, &self.symbol, from, to, amount)?;
        state.allowances.insert(key, allowance - amount);
        Ok(())
    }

    fn approve(&self, owner: &str, spender: &str, amount: Wad) -> Result<()> {
        let mut state = self.state.write();
        state
            .allowances
            .insert((owner.to_string(), spender.to_string()), amount);
        Ok(())
    }
}

//! Engine de negociação: registro de pares, cotação, execução de swaps e
//! gestão de liquidez.
//!
//! Concorrência: cada par vive atrás do seu próprio Mutex (toda operação
//! mutante sobre um par é serializada; pares distintos progridem em paralelo).
//! Os agregados globais têm lock próprio, tomado sempre DEPOIS do lock do par.
//!
//! Atomicidade: validações e pré-checagens de overflow vêm antes de qualquer
//! movimentação de token; numa operação de duas pernas, falha na segunda
//! dispara transferência compensatória da primeira. Reservas e contadores só
//! mudam depois de todas as pernas liquidarem.

use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{info, info_span, warn};

use crate::amm::error::{DexError, Result};
use crate::amm::error_catalog::DexErrorCode;
use crate::amm::guardrails::{checked_add, checked_sub, ensure_nonzero, ensure_rate, mul_div_floor};
use crate::amm::liquidity;
use crate::amm::pricing::{self, Quote};
use crate::amm::types::{Bps, Reserves, SwapDirection, Wad, BPS_SCALE};
use crate::dex::clock::Clock;
use crate::dex::config::DexConfig;
use crate::dex::pair::{PairInfo, PairState, StockId};
use crate::dex::stats::{DexStats, GlobalStats};
use crate::dex::tokens::TokenLedger;
use crate::dex_err;

pub struct StockNgnDex {
    config: DexConfig,
    ngn: Arc<dyn TokenLedger>,
    clock: Arc<dyn Clock>,
    pairs: DashMap<StockId, Arc<Mutex<PairState>>>,
    stats: Mutex<GlobalStats>,
}

fn wrap_transfer(symbol: &str, leg: &str, err: DexError) -> DexError {
    dex_err!(
        DexErrorCode::TransferFailed,
        token => symbol,
        leg => leg,
        cause => err.to_user_string()
    )
}

impl StockNgnDex {
    pub fn new(config: DexConfig, ngn: Arc<dyn TokenLedger>, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            ngn,
            clock,
            pairs: DashMap::new(),
            stats: Mutex::new(GlobalStats::default()),
        }
    }

    pub fn config(&self) -> &DexConfig {
        &self.config
    }

    fn pair(&self, stock_token: &str) -> Result<Arc<Mutex<PairState>>> {
        self.pairs
            .get(stock_token)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| dex_err!(DexErrorCode::PairNotFound, stock_token => stock_token))
    }

    /// Puxa `amount` do caller para a tesouraria (padrão allowance).
    fn pull(&self, ledger: &dyn TokenLedger, from: &str, amount: Wad) -> Result<()> {
        ledger
            .transfer_from(&self.config.dex_account, from, &self.config.dex_account, amount)
            .map_err(|err| wrap_transfer(ledger.symbol(), "pull", err))
    }

    /// Envia `amount` da tesouraria para o caller.
    fn push(&self, ledger: &dyn TokenLedger, to: &str, amount: Wad) -> Result<()> {
        ledger
            .transfer(&self.config.dex_account, to, amount)
            .map_err(|err| wrap_transfer(ledger.symbol(), "push", err))
    }

    /// Devolve uma perna já liquidada; falha aqui só gera log (não há mais
    /// nada a desfazer).
    fn refund(&self, ledger: &dyn TokenLedger, to: &str, amount: Wad) {
        if let Err(err) = ledger.transfer(&self.config.dex_account, to, amount) {
            warn!(
                token = ledger.symbol(),
                to,
                amount,
                error = %err,
                "compensating refund failed"
            );
        }
    }

    /// Reverte um payout já enviado (perna dois falhou).
    fn claw_back(&self, ledger: &dyn TokenLedger, from: &str, amount: Wad) {
        if let Err(err) = ledger.transfer(from, &self.config.dex_account, amount) {
            warn!(
                token = ledger.symbol(),
                from,
                amount,
                error = %err,
                "compensating claw-back failed"
            );
        }
    }

    // ---------------------------------------------------------------
    // Ciclo de vida de pares e liquidez
    // ---------------------------------------------------------------

    /// Cria o par do token de ação, já semeado e ativo.
    /// Shares iniciais: floor(sqrt(ngn · stock)), creditados ao caller.
    pub fn create_pair(
        &self,
        caller: &str,
        stock_token: &str,
        stock_ledger: Arc<dyn TokenLedger>,
        initial_ngn: Wad,
        initial_stock: Wad,
        fee_bps: Bps,
    ) -> Result<PairInfo> {
        let _span = info_span!("create_pair", pair = stock_token).entered();

        ensure_rate(fee_bps, self.config.fee_cap_bps)?;
        ensure_nonzero(initial_ngn)?;
        ensure_nonzero(initial_stock)?;
        if self.pairs.contains_key(stock_token) {
            return Err(dex_err!(DexErrorCode::PairExists, stock_token => stock_token));
        }
        let shares = liquidity::initial_shares(initial_ngn, initial_stock)?;

        self.pull(&*self.ngn, caller, initial_ngn)?;
        if let Err(err) = self.pull(&*stock_ledger, caller, initial_stock) {
            self.refund(&*self.ngn, caller, initial_ngn);
            return Err(err);
        }

        let now = self.clock.now_unix();
        let mut state = PairState::new(
            stock_token.to_string(),
            stock_ledger.clone(),
            fee_bps,
            self.config.default_price_impact_limit_bps,
            self.config.price_history_retention,
            now,
        );
        state.reserves = Reserves::new(initial_ngn, initial_stock);
        state.total_liquidity = shares;
        state.positions.insert(caller.to_string(), shares);
        state.is_active = true;

        match self.pairs.entry(stock_token.to_string()) {
            Entry::Occupied(_) => {
                // corrida perdida: desfaz os dois pulls
                self.refund(&*self.ngn, caller, initial_ngn);
                self.refund(&*stock_ledger, caller, initial_stock);
                return Err(dex_err!(DexErrorCode::PairExists, stock_token => stock_token));
            }
            Entry::Vacant(slot) => {
                let info = state.snapshot();
                slot.insert(Arc::new(Mutex::new(state)));
                self.stats.lock().record_pair_created(shares);
                info!(
                    pair = stock_token,
                    ngn = initial_ngn,
                    stock = initial_stock,
                    shares,
                    fee_bps,
                    "pair created"
                );
                Ok(info)
            }
        }
    }

    /// Depósito proporcional; o lado sub-ofertado limita o mint e o excesso do
    /// outro lado NÃO é devolvido — o caller pré-calcula a razão e usa
    /// `min_shares` como guarda.
    pub fn add_liquidity(
        &self,
        caller: &str,
        stock_token: &str,
        ngn_amount: Wad,
        stock_amount: Wad,
        min_shares: Wad,
    ) -> Result<Wad> {
        let _span = info_span!("add_liquidity", pair = stock_token).entered();

        ensure_nonzero(ngn_amount)?;
        ensure_nonzero(stock_amount)?;

        let pair = self.pair(stock_token)?;
        let mut pair = pair.lock();

        let shares = if pair.total_liquidity == 0 {
            // par drenado volta pelo caminho de mint inicial
            liquidity::initial_shares(ngn_amount, stock_amount)?
        } else {
            if !pair.is_active {
                return Err(dex_err!(DexErrorCode::PairInactive, stock_token => stock_token));
            }
            liquidity::mint_shares(
                pair.reserves.ngn,
                pair.reserves.stock,
                ngn_amount,
                stock_amount,
                pair.total_liquidity,
            )?
        };
        if shares < min_shares {
            return Err(dex_err!(
                DexErrorCode::SlippageExceeded,
                shares => shares,
                min_shares => min_shares
            ));
        }

        // overflow antes de mover qualquer token
        let new_ngn = checked_add(pair.reserves.ngn, ngn_amount)?;
        let new_stock = checked_add(pair.reserves.stock, stock_amount)?;
        let new_total = checked_add(pair.total_liquidity, shares)?;
        let new_position = checked_add(pair.position_of(caller), shares)?;

        let stock_ledger = pair.stock_ledger.clone();
        self.pull(&*self.ngn, caller, ngn_amount)?;
        if let Err(err) = self.pull(&*stock_ledger, caller, stock_amount) {
            self.refund(&*self.ngn, caller, ngn_amount);
            return Err(err);
        }

        pair.reserves = Reserves::new(new_ngn, new_stock);
        pair.total_liquidity = new_total;
        pair.positions.insert(caller.to_string(), new_position);
        pair.is_active = true;
        pair.last_update_time = self.clock.now_unix();

        self.stats.lock().record_liquidity_added(shares);
        info!(
            pair = stock_token,
            ngn = ngn_amount,
            stock = stock_amount,
            shares,
            "liquidity added"
        );
        Ok(shares)
    }

    /// Queima shares e paga as reservas proporcionais. Permitido com o par
    /// pausado (pausa não aprisiona provedores); zerar o supply desativa o par.
    pub fn remove_liquidity(
        &self,
        caller: &str,
        stock_token: &str,
        shares: Wad,
        min_ngn_out: Wad,
        min_stock_out: Wad,
    ) -> Result<(Wad, Wad)> {
        let _span = info_span!("remove_liquidity", pair = stock_token).entered();

        ensure_nonzero(shares)?;

        let pair = self.pair(stock_token)?;
        let mut pair = pair.lock();

        let position = pair.position_of(caller);
        if shares > position {
            return Err(dex_err!(
                DexErrorCode::InsufficientShares,
                shares => shares,
                position => position
            ));
        }

        let (ngn_out, stock_out) = liquidity::burn_amounts(
            pair.reserves.ngn,
            pair.reserves.stock,
            shares,
            pair.total_liquidity,
        )?;
        if ngn_out < min_ngn_out || stock_out < min_stock_out {
            return Err(dex_err!(
                DexErrorCode::SlippageExceeded,
                ngn_out => ngn_out,
                stock_out => stock_out,
                min_ngn_out => min_ngn_out,
                min_stock_out => min_stock_out
            ));
        }

        let new_ngn = checked_sub(pair.reserves.ngn, ngn_out)?;
        let new_stock = checked_sub(pair.reserves.stock, stock_out)?;

        let stock_ledger = pair.stock_ledger.clone();
        self.push(&*self.ngn, caller, ngn_out)?;
        if let Err(err) = self.push(&*stock_ledger, caller, stock_out) {
            self.claw_back(&*self.ngn, caller, ngn_out);
            return Err(err);
        }

        pair.reserves = Reserves::new(new_ngn, new_stock);
        pair.total_liquidity -= shares;
        if position == shares {
            pair.positions.remove(caller);
        } else {
            pair.positions.insert(caller.to_string(), position - shares);
        }
        if pair.total_liquidity == 0 {
            pair.is_active = false;
        }
        pair.last_update_time = self.clock.now_unix();

        self.stats.lock().record_liquidity_removed(shares);
        info!(
            pair = stock_token,
            shares,
            ngn_out,
            stock_out,
            "liquidity removed"
        );
        Ok((ngn_out, stock_out))
    }

    // ---------------------------------------------------------------
    // Cotações e swap
    // ---------------------------------------------------------------

    fn quote_pair(
        &self,
        stock_token: &str,
        direction: SwapDirection,
        amount_in: Wad,
    ) -> Result<Quote> {
        let pair = self.pair(stock_token)?;
        let pair = pair.lock();
        if !pair.is_active {
            return Err(dex_err!(DexErrorCode::PairInactive, stock_token => stock_token));
        }
        let (reserve_in, reserve_out) = pair.reserves.oriented(direction);
        pricing::quote(reserve_in, reserve_out, amount_in, pair.fee_bps)
    }

    pub fn quote_ngn_to_stock(&self, stock_token: &str, ngn_in: Wad) -> Result<Quote> {
        self.quote_pair(stock_token, SwapDirection::NgnToStock, ngn_in)
    }

    pub fn quote_stock_to_ngn(&self, stock_token: &str, stock_in: Wad) -> Result<Quote> {
        self.quote_pair(stock_token, SwapDirection::StockToNgn, stock_in)
    }

    fn execute_swap(
        &self,
        caller: &str,
        stock_token: &str,
        direction: SwapDirection,
        amount_in: Wad,
        min_amount_out: Wad,
        deadline: u64,
    ) -> Result<Wad> {
        let _span = info_span!("swap", pair = stock_token, direction = ?direction).entered();

        let now = self.clock.now_unix();
        if deadline < now {
            return Err(dex_err!(DexErrorCode::Expired, deadline => deadline, now => now));
        }

        let pair = self.pair(stock_token)?;
        let mut pair = pair.lock();
        if !pair.is_active {
            return Err(dex_err!(DexErrorCode::PairInactive, stock_token => stock_token));
        }
        ensure_nonzero(amount_in)?;

        // recotiza sempre sobre as reservas correntes (cotação antiga do
        // caller não vale como preço de execução)
        let (reserve_in, reserve_out) = pair.reserves.oriented(direction);
        let quote = pricing::quote(reserve_in, reserve_out, amount_in, pair.fee_bps)?;

        if quote.price_impact_bps > pair.price_impact_limit_bps {
            return Err(dex_err!(
                DexErrorCode::ExcessivePriceImpact,
                price_impact_bps => quote.price_impact_bps,
                limit_bps => pair.price_impact_limit_bps
            ));
        }
        if quote.amount_out < min_amount_out {
            return Err(dex_err!(
                DexErrorCode::SlippageExceeded,
                amount_out => quote.amount_out,
                min_amount_out => min_amount_out
            ));
        }

        // overflow antes de mover qualquer token
        let new_in = checked_add(reserve_in, amount_in)?;
        let new_out = checked_sub(reserve_out, quote.amount_out)?;

        let stock_ledger = pair.stock_ledger.clone();
        let (ledger_in, ledger_out): (&dyn TokenLedger, &dyn TokenLedger) = match direction {
            SwapDirection::NgnToStock => (&*self.ngn, &*stock_ledger),
            SwapDirection::StockToNgn => (&*stock_ledger, &*self.ngn),
        };

        self.pull(ledger_in, caller, amount_in)?;
        if let Err(err) = self.push(ledger_out, caller, quote.amount_out) {
            self.refund(ledger_in, caller, amount_in);
            return Err(err);
        }

        // commit: entrada bruta soma (a taxa fica no pool e engorda k)
        pair.reserves = match direction {
            SwapDirection::NgnToStock => Reserves::new(new_in, new_out),
            SwapDirection::StockToNgn => Reserves::new(new_out, new_in),
        };

        let price = pricing::current_price(pair.reserves.ngn, pair.reserves.stock)?;
        pair.record_price(price);
        pair.last_update_time = now;

        // perna NGN do swap; taxa em ação é valorada ao preço pós-swap
        let (volume_ngn, fee_ngn) = match direction {
            SwapDirection::NgnToStock => (amount_in, quote.fee),
            SwapDirection::StockToNgn => (
                quote.amount_out,
                mul_div_floor(quote.fee, pair.reserves.ngn, pair.reserves.stock).unwrap_or(0),
            ),
        };
        self.stats.lock().record_swap(volume_ngn, fee_ngn);

        info!(
            pair = stock_token,
            direction = ?direction,
            amount_in,
            amount_out = quote.amount_out,
            fee = quote.fee,
            price_impact_bps = quote.price_impact_bps,
            "swap settled"
        );
        Ok(quote.amount_out)
    }

    pub fn swap_ngn_for_stock(
        &self,
        caller: &str,
        stock_token: &str,
        ngn_in: Wad,
        min_stock_out: Wad,
        deadline: u64,
    ) -> Result<Wad> {
        self.execute_swap(
            caller,
            stock_token,
            SwapDirection::NgnToStock,
            ngn_in,
            min_stock_out,
            deadline,
        )
    }

    pub fn swap_stock_for_ngn(
        &self,
        caller: &str,
        stock_token: &str,
        stock_in: Wad,
        min_ngn_out: Wad,
        deadline: u64,
    ) -> Result<Wad> {
        self.execute_swap(
            caller,
            stock_token,
            SwapDirection::StockToNgn,
            stock_in,
            min_ngn_out,
            deadline,
        )
    }

    // ---------------------------------------------------------------
    // Leituras
    // ---------------------------------------------------------------

    /// Preço corrente: NGN por token de ação (WAD).
    pub fn get_current_price(&self, stock_token: &str) -> Result<Wad> {
        let pair = self.pair(stock_token)?;
        let pair = pair.lock();
        if !pair.is_active {
            return Err(dex_err!(DexErrorCode::PairInactive, stock_token => stock_token));
        }
        pricing::current_price(pair.reserves.ngn, pair.reserves.stock)
    }

    pub fn get_trading_pair(&self, stock_token: &str) -> Result<PairInfo> {
        let pair = self.pair(stock_token)?;
        let pair = pair.lock();
        Ok(pair.snapshot())
    }

    /// Tokens com par registrado, em ordem lexicográfica (iteração do mapa
    /// concorrente não é estável).
    pub fn get_all_stock_tokens(&self) -> Vec<StockId> {
        let mut tokens: Vec<StockId> = self.pairs.iter().map(|e| e.key().clone()).collect();
        tokens.sort();
        tokens
    }

    pub fn get_dex_stats(&self) -> DexStats {
        self.stats.lock().snapshot()
    }

    /// Preços observados, do mais antigo para o mais recente.
    pub fn get_price_history(&self, stock_token: &str) -> Result<Vec<Wad>> {
        let pair = self.pair(stock_token)?;
        let pair = pair.lock();
        Ok(pair.price_history())
    }

    // ---------------------------------------------------------------
    // Administração (capability check simples)
    // ---------------------------------------------------------------

    fn ensure_admin(&self, caller: &str) -> Result<()> {
        if caller != self.config.admin {
            return Err(dex_err!(DexErrorCode::Unauthorized, caller => caller));
        }
        Ok(())
    }

    /// Pausa/retoma um par. Reativar um par drenado não é permitido: sem
    /// reservas não há preço.
    pub fn set_pair_active(&self, caller: &str, stock_token: &str, active: bool) -> Result<()> {
        self.ensure_admin(caller)?;
        let pair = self.pair(stock_token)?;
        let mut pair = pair.lock();
        if active && pair.total_liquidity == 0 {
            return Err(dex_err!(
                DexErrorCode::InsufficientLiquidity,
                stock_token => stock_token
            ));
        }
        pair.is_active = active;
        info!(pair = stock_token, active, "pair activity changed");
        Ok(())
    }

    pub fn set_fee_rate(&self, caller: &str, stock_token: &str, fee_bps: Bps) -> Result<()> {
        self.ensure_admin(caller)?;
        ensure_rate(fee_bps, self.config.fee_cap_bps)?;
        let pair = self.pair(stock_token)?;
        let mut pair = pair.lock();
        pair.fee_bps = fee_bps;
        info!(pair = stock_token, fee_bps, "fee rate changed");
        Ok(())
    }

    pub fn set_price_impact_limit(
        &self,
        caller: &str,
        stock_token: &str,
        limit_bps: Bps,
    ) -> Result<()> {
        self.ensure_admin(caller)?;
        ensure_rate(limit_bps, BPS_SCALE)?;
        let pair = self.pair(stock_token)?;
        let mut pair = pair.lock();
        pair.price_impact_limit_bps = limit_bps;
        info!(pair = stock_token, limit_bps, "price impact limit changed");
        Ok(())
    }
}

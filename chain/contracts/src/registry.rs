//! Token registry: ticker -> external token contract
//!
//! Registration is permanent. The quote asset is fixed by ticker when the
//! registry is built and can be registered like any other token, but it is
//! never accepted as the base asset of an order.

use dex_types::ids::{Address, Ticker};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::errors::DexError;
use crate::token::Erc20;

/// A registered token
#[derive(Debug, Clone)]
pub struct Token {
    pub ticker: Ticker,
    pub contract: Arc<dyn Erc20>,
}

impl Token {
    /// Address of the backing token contract
    pub fn address(&self) -> Address {
        self.contract.address()
    }
}

/// Public description of a registered token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub ticker: Ticker,
    pub address: Address,
}

#[derive(Debug)]
pub struct TokenRegistry {
    tokens: HashMap<Ticker, Token>,
    /// Registration order, for listing
    token_list: Vec<Ticker>,
    quote: Ticker,
}

impl TokenRegistry {
    pub fn new(quote: Ticker) -> Self {
        Self {
            tokens: HashMap::new(),
            token_list: Vec::new(),
            quote,
        }
    }

    /// Map `ticker` to `contract`. Fails if the ticker is already taken.
    pub fn register(&mut self, ticker: Ticker, contract: Arc<dyn Erc20>) -> Result<&Token, DexError> {
        if self.tokens.contains_key(&ticker) {
            return Err(DexError::DuplicateToken { ticker });
        }
        self.token_list.push(ticker.clone());
        let token = self
            .tokens
            .entry(ticker.clone())
            .or_insert(Token { ticker, contract });
        Ok(token)
    }

    pub fn resolve(&self, ticker: &Ticker) -> Result<&Token, DexError> {
        self.tokens.get(ticker).ok_or_else(|| DexError::UnknownToken {
            ticker: ticker.clone(),
        })
    }

    /// Resolve a ticker that is about to be used as an order's base asset
    pub fn resolve_tradable(&self, ticker: &Ticker) -> Result<&Token, DexError> {
        let token = self.resolve(ticker)?;
        if self.is_quote(ticker) {
            return Err(DexError::QuoteAssetNotTradable {
                ticker: ticker.clone(),
            });
        }
        Ok(token)
    }

    pub fn is_quote(&self, ticker: &Ticker) -> bool {
        *ticker == self.quote
    }

    pub fn quote(&self) -> &Ticker {
        &self.quote
    }

    /// All tokens in registration order
    pub fn tokens(&self) -> Vec<TokenInfo> {
        self.token_list
            .iter()
            .filter_map(|ticker| self.tokens.get(ticker))
            .map(|token| TokenInfo {
                ticker: token.ticker.clone(),
                address: token.address(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.token_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.token_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::MockToken;

    fn token(n: u64) -> Arc<dyn Erc20> {
        Arc::new(MockToken::new(Address::from_low_u64(n)))
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = TokenRegistry::new(Ticker::new("DAI"));
        registry.register(Ticker::new("ZRX"), token(10)).unwrap();

        let resolved = registry.resolve(&Ticker::new("ZRX")).unwrap();
        assert_eq!(resolved.address(), Address::from_low_u64(10));
    }

    #[test]
    fn test_register_duplicate_fails() {
        let mut registry = TokenRegistry::new(Ticker::new("DAI"));
        registry.register(Ticker::new("ZRX"), token(10)).unwrap();

        let err = registry.register(Ticker::new("ZRX"), token(11)).unwrap_err();
        assert_eq!(
            err,
            DexError::DuplicateToken {
                ticker: Ticker::new("ZRX")
            }
        );
        // Original mapping untouched
        assert_eq!(
            registry.resolve(&Ticker::new("ZRX")).unwrap().address(),
            Address::from_low_u64(10)
        );
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = TokenRegistry::new(Ticker::new("DAI"));
        assert!(matches!(
            registry.resolve(&Ticker::new("BAT")),
            Err(DexError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_quote_not_tradable() {
        let mut registry = TokenRegistry::new(Ticker::new("DAI"));
        registry.register(Ticker::new("DAI"), token(1)).unwrap();
        registry.register(Ticker::new("REP"), token(2)).unwrap();

        assert!(registry.resolve(&Ticker::new("DAI")).is_ok());
        assert_eq!(
            registry.resolve_tradable(&Ticker::new("DAI")).unwrap_err(),
            DexError::QuoteAssetNotTradable {
                ticker: Ticker::new("DAI")
            }
        );
        assert!(registry.resolve_tradable(&Ticker::new("REP")).is_ok());
    }

    #[test]
    fn test_unregistered_quote_reports_unknown_first() {
        let registry = TokenRegistry::new(Ticker::new("DAI"));
        assert!(matches!(
            registry.resolve_tradable(&Ticker::new("DAI")),
            Err(DexError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_tokens_in_registration_order() {
        let mut registry = TokenRegistry::new(Ticker::new("DAI"));
        for (i, t) in ["DAI", "ZRX", "BAT", "REP"].iter().enumerate() {
            registry.register(Ticker::new(*t), token(i as u64)).unwrap();
        }
        let tickers: Vec<_> = registry
            .tokens()
            .into_iter()
            .map(|info| info.ticker.to_string())
            .collect();
        assert_eq!(tickers, vec!["DAI", "ZRX", "BAT", "REP"]);
    }
}

//! Core traits that decouple cryptogrid from any specific price provider.
//!
//! The [`PriceSource`](crate::source::PriceSource) only depends on
//! [`PriceApi`]; the CoinGecko client, the demo random walk and the test
//! doubles all implement it.

use crate::api::{FetchError, SimplePriceResponse};

/// Abstraction over a remote price endpoint.
///
/// An implementation might issue an HTTP request, or it might be an
/// in-memory stub used in tests and demos.
///
/// # Contract
///
/// * One call is one batched request for **all** `ids`.
/// * Prices are denominated in USD.
/// * Implementations validate at the boundary: a response that does not
///   match the expected schema is reported as [`FetchError::Malformed`],
///   never as a partially filled [`SimplePriceResponse`].
pub trait PriceApi {
    /// Fetch the current USD price of every asset in `ids`.
    fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, FetchError>;
}

impl<A: PriceApi + ?Sized> PriceApi for Box<A> {
    fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, FetchError> {
        (**self).simple_price(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Answers every id with the same price.
    struct FlatApi(f64);

    impl PriceApi for FlatApi {
        fn simple_price(&self, ids: &[String]) -> Result<SimplePriceResponse, FetchError> {
            Ok(SimplePriceResponse::new(
                ids.iter().map(|id| (id.clone(), self.0)),
            ))
        }
    }

    #[test]
    fn boxed_api_delegates() {
        let api: Box<dyn PriceApi> = Box::new(FlatApi(1.0));
        let r = api.simple_price(&["x".to_string()]).unwrap();
        assert_eq!(r.iter().next(), Some(("x", 1.0)));
    }
}

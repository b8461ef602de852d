//! Brokerage collaborator interfaces and the in-memory paper implementation.
//!
//! The decision engine never talks to a venue directly; everything it needs
//! from the outside world comes through these traits.

mod paper;
mod traits;

pub use paper::PaperBroker;
pub use traits::{
    Brokerage, CapitalSource, HistoricalDataSource, MarketDataSource, OrderExecutor, OrderRequest,
    PositionSource,
};

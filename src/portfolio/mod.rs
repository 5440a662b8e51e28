pub mod storage;
pub mod types;

pub use storage::{get_portfolio_path, load_portfolio_state, save_portfolio_state};
pub use types::{PortfolioSelection, PortfolioState, DEFAULT_VOLUME};

pub mod formatter;

pub use formatter::{
    format_band_table, format_banded_score, format_baseline, format_breakdown, format_country_detail,
    format_portfolio_table, format_score, format_scored_table, format_tsv, should_use_colors,
    PortfolioRow, ScoredCountry,
};

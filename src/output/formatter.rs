use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::catalogue::CountryRecord;
use crate::risk::{BandInfo, RiskLevel, ScoreBreakdown, BANDS, UNKNOWN_COLOR};

/// A country with its calculated score for display
pub struct ScoredCountry<'a> {
    pub country: &'a CountryRecord,
    pub score: f64,
    pub band: BandInfo,
}

/// One selected country in the portfolio view
pub struct PortfolioRow<'a> {
    pub iso_code: &'a str,
    /// None when the code is not in the catalogue
    pub name: Option<&'a str>,
    pub volume: f64,
    pub score: f64,
    pub band: BandInfo,
}

/// Band name column width (fits "Medium High")
const BAND_WIDTH: usize = 11;
/// Score column width (fits "100.0" and gap scores like "39.995")
const SCORE_WIDTH: usize = 6;

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Scores are shown with one decimal place
pub fn format_score(score: f64) -> String {
    format!("{:.1}", score)
}

/// Score as shown next to its band.
///
/// A score that fell between two bands is printed in full, since rounding
/// to one decimal would place it visibly inside a neighbouring band.
pub fn format_banded_score(score: f64, band: &BandInfo) -> String {
    if band.level == RiskLevel::Unknown {
        format!("{}", score)
    } else {
        format_score(score)
    }
}

/// Render a band name padded to `width`, colored with the band's color.
fn paint_band(band: &BandInfo, width: usize, use_colors: bool) -> String {
    let padded = format!("{:<width$}", band.name, width = width);
    if use_colors {
        let (r, g, b) = band.rgb();
        padded.truecolor(r, g, b).bold().to_string()
    } else {
        padded
    }
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format countries as a scored table with columns: Index, Score, Band, Name, ISO code
/// Index column: 4 chars (fits "999."), right-aligned
pub fn format_scored_table(countries: &[ScoredCountry], use_colors: bool) -> String {
    if countries.is_empty() {
        return "No countries in catalogue.".to_string();
    }

    let term_width = get_terminal_width();
    let index_width = 4;
    let separator = "  ";

    countries
        .iter()
        .enumerate()
        .map(|(idx, scored)| {
            let index_str = format!("{:>3}.", idx + 1);
            let score_str = format!(
                "{:>width$}",
                format_banded_score(scored.score, &scored.band),
                width = SCORE_WIDTH
            );
            let band_str = paint_band(&scored.band, BAND_WIDTH, use_colors);

            let iso = &scored.country.iso_code;
            let fixed_width = index_width
                + 1
                + SCORE_WIDTH
                + BAND_WIDTH
                + separator.len() * 3
                + iso.chars().count();

            let name = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_name(&scored.country.name, width - fixed_width)
                }
                Some(_) => truncate_name(&scored.country.name, 20),
                None => scored.country.name.clone(),
            };

            if use_colors {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str.dimmed(),
                    score_str.bold(),
                    separator,
                    band_str,
                    separator,
                    name,
                    separator,
                    iso.cyan()
                )
            } else {
                format!(
                    "{} {}{}{}{}{}{}{}",
                    index_str, score_str, separator, band_str, separator, name, separator, iso
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format countries as tab-separated values for scripting
/// Columns: iso_code, name, score, band (no headers, no colors)
pub fn format_tsv(countries: &[ScoredCountry]) -> String {
    countries
        .iter()
        .map(|scored| {
            format!(
                "{}\t{}\t{}\t{}",
                scored.country.iso_code,
                scored.country.name,
                format_banded_score(scored.score, &scored.band),
                scored.band.name
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Per-indicator lines for verbose output
pub fn format_breakdown(breakdown: &ScoreBreakdown) -> String {
    let mut lines: Vec<String> = breakdown
        .contributions
        .iter()
        .map(|c| {
            if c.included {
                format!(
                    "  {:<26} {:>7.2} x {:>5}",
                    c.indicator.label(),
                    c.value,
                    c.weight
                )
            } else {
                format!("  {:<26} {:>7} (not counted)", c.indicator.label(), "n/a")
            }
        })
        .collect();
    lines.push(format!(
        "  {:<26} {:>7} / {}",
        "Weighted mean",
        format_score(breakdown.score),
        breakdown.total_weight
    ));
    lines.join("\n")
}

/// Multi-line country detail: header, band, reference score and breakdown
pub fn format_country_detail(
    country: &CountryRecord,
    breakdown: &ScoreBreakdown,
    band: &BandInfo,
    use_colors: bool,
) -> String {
    let header = if use_colors {
        format!("{} ({})", country.name.bold(), country.iso_code.cyan())
    } else {
        format!("{} ({})", country.name, country.iso_code)
    };

    format!(
        "{}\n  Score: {}\n  Band: {}\n  Reference score: {}\n{}",
        header,
        format_banded_score(breakdown.score, band),
        paint_band(band, 0, use_colors),
        format_score(country.base_risk_score),
        format_breakdown(breakdown)
    )
}

/// Format the selected countries with their volumes and scores
pub fn format_portfolio_table(rows: &[PortfolioRow], use_colors: bool) -> String {
    if rows.is_empty() {
        return "No countries selected.".to_string();
    }

    rows.iter()
        .map(|row| {
            let name = row.name.unwrap_or("(not in catalogue)");
            let line = format!(
                "{:<4} {:<28} vol {:>8.1}  {:>width$}  ",
                row.iso_code,
                truncate_name(name, 28),
                row.volume,
                format_banded_score(row.score, &row.band),
                width = SCORE_WIDTH
            );
            format!("{}{}", line, paint_band(&row.band, 0, use_colors))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line baseline summary
pub fn format_baseline(
    baseline: f64,
    band: &BandInfo,
    country_count: usize,
    total_volume: f64,
    use_colors: bool,
) -> String {
    let plural = if country_count == 1 { "country" } else { "countries" };
    let value = if use_colors {
        format_banded_score(baseline, band).bold().to_string()
    } else {
        format_banded_score(baseline, band)
    };
    format!(
        "Baseline risk: {} ({}) across {} {}, total volume {}",
        value,
        paint_band(band, 0, use_colors),
        country_count,
        plural,
        total_volume
    )
}

/// The static band table, with a closing line for scores that match no band
pub fn format_band_table(use_colors: bool) -> String {
    let mut lines: Vec<String> = BANDS
        .iter()
        .map(|def| {
            let info = BandInfo::from(def);
            format!(
                "{}  {:>6.2} - {:<6.2}  {}",
                paint_band(&info, BAND_WIDTH, use_colors),
                def.min,
                def.max,
                def.color
            )
        })
        .collect();
    lines.push(format!(
        "{}  between bands    {}",
        paint_band(&BandInfo::UNKNOWN, BAND_WIDTH, use_colors),
        UNKNOWN_COLOR
    ));
    lines.join("\n")
}

//! DexScreener listing extraction
//!
//! Turns the rendered listing table into token records. Rows whose quote
//! token is not the configured one (SOL) are dropped.

use chrono::Utc;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::domain::{AddressValidator, TokenRecord};
use crate::ports::ScrapeError;

const ROW: &str = ".ds-dex-table-row";
const QUOTE_SYMBOL: &str = ".ds-dex-table-row-quote-token-symbol";
const TOKEN_COL: &str = ".ds-dex-table-row-col-token";
const TOKEN_ICON: &str = ".ds-dex-table-row-token-icon-img";
const BASE_SYMBOL: &str = ".ds-dex-table-row-base-token-symbol";
const BASE_NAME: &str = ".ds-dex-table-row-base-token-name-text";
const PRICE_COL: &str = ".ds-dex-table-row-col-price";
const MCAP_COL: &str = ".ds-dex-table-row-col-market-cap";
const VOLUME_COL: &str = ".ds-dex-table-row-col-volume";

/// Pair links look like `/solana/<pair id>`
const PAIR_HREF_PREFIX: &str = "/solana/";

/// Base for icon `src` values given as a site-relative path
const SITE_ORIGIN: &str = "https://dexscreener.com/";

/// Compiled selectors for one listing layout
pub struct ListingSelectors {
    row: Selector,
    quote_symbol: Selector,
    token_col: Selector,
    token_icon: Selector,
    base_symbol: Selector,
    base_name: Selector,
    price: Selector,
    market_cap: Selector,
    volume: Selector,
}

impl ListingSelectors {
    pub fn new() -> Result<Self, ScrapeError> {
        Ok(Self {
            row: selector(ROW)?,
            quote_symbol: selector(QUOTE_SYMBOL)?,
            token_col: selector(TOKEN_COL)?,
            token_icon: selector(TOKEN_ICON)?,
            base_symbol: selector(BASE_SYMBOL)?,
            base_name: selector(BASE_NAME)?,
            price: selector(PRICE_COL)?,
            market_cap: selector(MCAP_COL)?,
            volume: selector(VOLUME_COL)?,
        })
    }
}

fn selector(css: &str) -> Result<Selector, ScrapeError> {
    Selector::parse(css).map_err(|e| ScrapeError::ParseError(format!("bad selector {}: {}", css, e)))
}

/// Extract every row quoted in `quote_symbol` from a rendered listing page
pub fn parse_listing(
    html: &str,
    selectors: &ListingSelectors,
    quote_symbol: &str,
    validator: &dyn AddressValidator,
) -> Vec<TokenRecord> {
    let document = Html::parse_document(html);
    let observed_at = Utc::now();

    document
        .select(&selectors.row)
        .filter(|row| text_of(row, &selectors.quote_symbol) == quote_symbol)
        .map(|row| {
            let mut record = TokenRecord::observed(
                text_of(&row, &selectors.base_symbol),
                text_of(&row, &selectors.base_name),
                observed_at,
            )
            .with_market(
                parse_numeric(&text_of(&row, &selectors.price)),
                parse_numeric(&text_of(&row, &selectors.market_cap)),
                parse_numeric(&text_of(&row, &selectors.volume)),
            );

            if let Some(href) = row.value().attr("href") {
                record = record.with_pair_id(href.strip_prefix(PAIR_HREF_PREFIX).unwrap_or(href));
            }
            if let Some(address) = icon_address(&row, selectors, validator) {
                record = record.with_address(address);
            }
            record
        })
        .collect()
}

fn text_of(row: &ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

/// Token icons are served as `<mint>.png`; take the file stem if it is a valid address
fn icon_address(
    row: &ElementRef<'_>,
    selectors: &ListingSelectors,
    validator: &dyn AddressValidator,
) -> Option<String> {
    let col = row.select(&selectors.token_col).next()?;
    let src = col.select(&selectors.token_icon).next()?.value().attr("src")?;
    let url = Url::parse(SITE_ORIGIN).ok()?.join(src).ok()?;
    let filename = url.path_segments()?.last()?;
    let candidate = filename.split('.').next()?;

    if validator.is_valid(candidate) {
        Some(candidate.to_string())
    } else {
        tracing::debug!("Ignoring icon file name {:?}: not a valid address", candidate);
        None
    }
}

/// Parse a listing figure such as `$1.2M`, `$12,345`, `$0.0₄5123`.
///
/// Returns 0.0 when the text is not a number.
pub fn parse_numeric(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '<' | '>') && !c.is_whitespace())
        .collect();

    let (digits, multiplier) = match cleaned.chars().last() {
        Some('K') | Some('k') => (&cleaned[..cleaned.len() - 1], 1e3),
        Some('M') | Some('m') => (&cleaned[..cleaned.len() - 1], 1e6),
        Some('B') | Some('b') => (&cleaned[..cleaned.len() - 1], 1e9),
        _ => (cleaned.as_str(), 1.0),
    };

    match expand_subscript_zeros(digits).parse::<f64>() {
        Ok(value) => value * multiplier,
        Err(_) => {
            if !text.trim().is_empty() {
                tracing::debug!("Unparseable listing value {:?}", text);
            }
            0.0
        }
    }
}

/// DexScreener prints tiny prices as `0.0₄5123`: the subscript is the
/// number of zeros after the decimal point
fn expand_subscript_zeros(digits: &str) -> String {
    let Some(start) = digits.find(is_subscript) else {
        return digits.to_string();
    };
    let Some(mantissa_start) = digits[start..].find(|c: char| !is_subscript(c)).map(|i| start + i) else {
        return digits.to_string();
    };

    let zeros: usize = digits[start..mantissa_start]
        .chars()
        .filter_map(|c| (c as u32).checked_sub('₀' as u32))
        .fold(0, |acc, d| acc * 10 + d as usize);

    let Some(int_part) = digits[..start].split('.').next() else {
        return digits.to_string();
    };
    format!("{}.{}{}", int_part, "0".repeat(zeros), &digits[mantissa_start..])
}

fn is_subscript(c: char) -> bool {
    ('₀'..='₉').contains(&c)
}

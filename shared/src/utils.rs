// Symbol and display helpers shared by the engine and its front-ends.

/// Uppercases a ticker code and appends the market suffix unless already present.
pub fn normalize_symbol(raw: &str, suffix: &str) -> String {
    let upper = raw.trim().to_uppercase();
    let suffix = suffix.to_uppercase();
    if suffix.is_empty() || upper.ends_with(&suffix) {
        upper
    } else {
        format!("{}{}", upper, suffix)
    }
}

/// Inverse of [`normalize_symbol`]: the bare ticker code.
pub fn strip_suffix<'a>(symbol: &'a str, suffix: &str) -> &'a str {
    if suffix.is_empty() {
        return symbol;
    }
    symbol
        .len()
        .checked_sub(suffix.len())
        .filter(|&cut| symbol.is_char_boundary(cut) && symbol[cut..].eq_ignore_ascii_case(suffix))
        .map_or(symbol, |cut| &symbol[..cut])
}

pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Normalize a header for lookup: trim, lowercase, spaces become underscores.
///
/// `"Supply Chain Cost"` and `"supply_chain_cost"` share the key
/// `supply_chain_cost`.
pub fn header_key(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c.to_ascii_lowercase() })
        .collect()
}

/// Parse a time-period cell. Accepts integers and integral floats (`"3.0"`).
pub fn parse_week(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(v) = s.parse::<i64>() {
        return Some(v);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse a metric cell; an empty cell is `Ok(None)`.
///
/// Only finite numbers are accepted. `inf` and `NaN` parse as `f64` but have
/// no SQL or JSON spelling, so they are rejected here.
pub fn parse_value(raw: &str) -> Result<Option<f64>, &'static str> {
    let s = raw.trim();
    if s.is_empty() {
        return Ok(None);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(Some(v)),
        Ok(_) => Err("not a finite number"),
        Err(_) => Err("not a number"),
    }
}

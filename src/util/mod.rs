/// Seconds since the epoch, the unit JWT `exp` claims use.
#[cfg(target_arch = "wasm32")]
pub(crate) fn now_secs() -> f64 {
    js_sys::Date::now() / 1000.0
}

/// Seconds since the epoch, the unit JWT `exp` claims use.
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn now_secs() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default()
}

/// `$1,234.50` style display for prices and totals.
pub(crate) fn format_money(amount: f64) -> String {
    let sign = if amount < 0.0 { "-" } else { "" };
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    format!("{sign}${grouped}.{:02}", cents % 100)
}

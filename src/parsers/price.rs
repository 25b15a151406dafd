use crate::models::BasicInfo;

/// Price column value: whole amounts without a fraction, empty when unknown
pub fn format_price(info: &BasicInfo) -> String {
    match info.effective_price() {
        Some(price) if price.is_finite() => format!("{}", price),
        _ => String::new(),
    }
}

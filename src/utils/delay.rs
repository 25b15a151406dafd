use std::ops::Range;
use std::time::Duration;
use tokio::time::sleep;

/// Sleep for a random duration drawn from `range_ms`; no-op when pauses are disabled
pub async fn polite_pause(range_ms: Option<Range<u64>>) {
    if let Some(range) = range_ms {
        let millis = fastrand::u64(range);
        sleep(Duration::from_millis(millis)).await;
    }
}

//! Test helper functions

use std::future::Future;
use std::time::{Duration, Instant};

/// Owned investor ids from string literals
#[must_use]
pub fn ids(list: &[&str]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
}

/// Await a future and report how long it took
pub async fn timed_execution<F, T>(future: F) -> (Duration, T)
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let result = future.await;
    (start.elapsed(), result)
}

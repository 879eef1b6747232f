use std::time::Duration;

use tokio::time::{sleep, timeout};

use crate::view::DocumentView;

/// Polls `condition` every `poll` until it holds. `false` on timeout.
pub async fn wait_until<F>(mut condition: F, limit: Duration, poll: Duration) -> bool
where
    F: FnMut() -> bool,
{
    let polling = async {
        loop {
            if condition() {
                return;
            }
            sleep(poll).await;
        }
    };
    timeout(limit, polling).await.is_ok()
}

/// Waits for the loading indicator to disappear from the view.
pub async fn wait_for_ready<V: DocumentView>(
    view: &V,
    loading_indicator: &str,
    limit: Duration,
    poll: Duration,
) -> bool {
    wait_until(|| view.query_first(loading_indicator).is_none(), limit, poll).await
}

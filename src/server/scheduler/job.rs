use std::collections::HashMap;
use std::time::Duration;
use chrono::{DateTime, Utc};
use log::info;
use tokio::{pin, select, time};
use tokio_util::sync::CancellationToken;
use tokio_util::task::task_tracker;
use crate::server::model::form::FormId;
use crate::server::service::form::OrderForm;
use crate::server::state::FormMap;
use crate::server::util::time::helper::get_utc_now;

const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Drop forms untouched for longer than `max_idle`. A form that is in the
/// middle of a submission is always kept. Returns how many were dropped.
pub(crate) fn sweep_idle_forms(
    forms: &mut HashMap<FormId, OrderForm>,
    now: DateTime<Utc>,
    max_idle: Duration,
) -> usize {
    let before = forms.len();
    forms.retain(|_, form| {
        let idle = now
            .signed_duration_since(form.last_touched())
            .to_std()
            .unwrap_or_default();
        form.is_submitting() || idle <= max_idle
    });
    before - forms.len()
}

async fn worker(forms: FormMap, max_idle: Duration, cancel_token: CancellationToken) {
    let interval = time::interval(SWEEP_INTERVAL); // run once every minute
    pin!(interval);
    loop {
        select! {
            _ = interval.tick() => {},
            _ = cancel_token.cancelled() => {
                info!("received cancel signal, returning gracefully");
                return;
            }
        }

        let mut forms = forms.lock().await;
        let removed = sweep_idle_forms(&mut forms, get_utc_now(), max_idle);
        if removed > 0 {
            info!("swept {} idle forms, {} still open", removed, forms.len());
        }
    }
}

pub async fn form_sweeper(forms: FormMap, max_idle: Duration, cancel_token: CancellationToken) {
    let tracker = task_tracker::TaskTracker::new();
    tracker.spawn(worker(forms, max_idle, cancel_token));
    if tracker.close() {
        tracker.wait().await;
    }
}

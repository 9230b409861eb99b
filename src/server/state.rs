use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use log::error;
use tokio::sync::{Mutex, MutexGuard};
use tokio::time;
use crate::server::model::form::FormId;
#[cfg(not(test))]
use crate::server::remote::postgrest::PostgrestStore;
#[cfg(test)]
use crate::server::remote::mock::MockStore;
use crate::server::service::form::OrderForm;

/// Open forms by id, one per customer page.
pub(crate) type FormMap = Arc<Mutex<HashMap<FormId, OrderForm>>>;

/// Remote store the handlers talk to.
#[cfg(not(test))]
pub(crate) type Store = PostgrestStore;
#[cfg(test)]
pub(crate) type Store = MockStore;

pub(crate) struct AppState<S = Store> {
    store: Arc<S>,
    forms: FormMap,
    default_session_id: Option<String>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            forms: Arc::clone(&self.forms),
            default_session_id: self.default_session_id.clone(),
        }
    }
}

impl<S> AppState<S> {
    const FORMS_LOCK_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(store: S, default_session_id: Option<String>) -> Self {
        Self {
            store: Arc::new(store),
            forms: Arc::new(Mutex::new(HashMap::new())),
            default_session_id,
        }
    }

    pub fn get_store(&self) -> &S {
        &self.store
    }

    pub fn get_forms(&self) -> FormMap {
        self.forms.clone()
    }

    pub fn default_session_id(&self) -> Option<&str> {
        self.default_session_id.as_deref()
    }

    /// Lock the form map, bail out if it stays contended past the timeout.
    pub async fn lock_forms(&self) -> Option<MutexGuard<'_, HashMap<FormId, OrderForm>>> {
        match time::timeout(Self::FORMS_LOCK_TIMEOUT, self.forms.lock()).await {
            Ok(guard) => Some(guard),
            Err(_) => {
                error!("timed out waiting for the form map after {:?}", Self::FORMS_LOCK_TIMEOUT);
                None
            }
        }
    }
}

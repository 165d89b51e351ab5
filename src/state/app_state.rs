//! Root application state container
//!
//! [`IntlContext`] owns the current locale and its message mapping. Every
//! locale change is an explicit transition:
//!
//! `Idle -> Loading(locale) -> Ready | Failed`, and `Ready`/`Failed` go back
//! to `Loading` on the next request.
//!
//! A newer request aborts the load task of an older one, and a finished
//! load is only applied while it is still the latest request, so the final
//! state always reflects the last `set_locale` call.

use crate::error::{LoadError, LoadResult};
use crate::locale::{ambient_locale_tag, load_locale_data, normalize, LocaleData, LocaleTable};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio::task::AbortHandle;

/// Where the context is in its load cycle
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    /// Nothing requested yet
    #[default]
    Idle,

    /// A catalog for `locale` is being loaded
    Loading { locale: String },

    /// `current()` holds the mapping for `locale`
    Ready { locale: String },

    /// The last request failed; `current()` still holds the previous mapping
    Failed { locale: String, error: String },
}

#[derive(Debug, Default)]
struct ContextInner {
    state: LoadState,
    /// Bumped on every request; identifies the latest one
    generation: u64,
    in_flight: Option<AbortHandle>,
    current: Option<Arc<LocaleData>>,
}

/// Application context holding the active locale and messages
#[derive(Debug)]
pub struct IntlContext {
    table: Arc<LocaleTable>,
    inner: Mutex<ContextInner>,
    published: watch::Sender<Option<Arc<LocaleData>>>,
}

impl IntlContext {
    pub fn new(table: LocaleTable) -> Self {
        let (published, _) = watch::channel(None);
        Self {
            table: Arc::new(table),
            inner: Mutex::new(ContextInner::default()),
            published,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ContextInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Load the catalog for the platform's ambient locale
    pub async fn bootstrap(&self) -> LoadResult<Arc<LocaleData>> {
        self.bootstrap_with(ambient_locale_tag()).await
    }

    /// Load the catalog for an ambient locale tag, or the default locale
    pub async fn bootstrap_with(&self, tag: Option<String>) -> LoadResult<Arc<LocaleData>> {
        let code = match tag {
            Some(tag) => normalize(&tag).to_string(),
            None => {
                log::debug!("No ambient locale set");
                self.table.default_locale().to_string()
            }
        };
        log::info!("Bootstrapping with locale '{}'", code);
        self.set_locale(&code).await
    }

    /// Switch to `code`, replacing the mapping once its catalog is loaded
    ///
    /// Returns [`LoadError::Superseded`] if another `set_locale` call started
    /// before this one finished; that call's result wins. Dropping the
    /// returned future aborts the load and leaves the previous mapping in
    /// place.
    pub async fn set_locale(&self, code: &str) -> LoadResult<Arc<LocaleData>> {
        let (generation, handle) = {
            let mut inner = self.lock();
            inner.generation += 1;
            if let Some(previous) = inner.in_flight.take() {
                log::debug!("Cancelling in-flight locale load");
                previous.abort();
            }

            let table = Arc::clone(&self.table);
            let requested = code.to_string();
            let handle = tokio::spawn(async move { load_locale_data(&table, &requested).await });

            inner.in_flight = Some(handle.abort_handle());
            inner.state = LoadState::Loading {
                locale: code.to_string(),
            };
            (inner.generation, handle)
        };

        let mut pending = PendingLoad {
            context: self,
            generation,
            armed: true,
        };
        let result = handle.await;
        pending.armed = false;

        let mut inner = self.lock();
        if inner.generation != generation {
            log::debug!("Discarding superseded load of '{}'", code);
            return Err(LoadError::Superseded {
                locale: code.to_string(),
            });
        }
        inner.in_flight = None;

        match result {
            Ok(Ok(data)) => {
                let data = Arc::new(data);
                log::info!("Locale is now '{}' (requested '{}')", data.locale, data.requested);
                inner.state = LoadState::Ready {
                    locale: data.locale.clone(),
                };
                inner.current = Some(Arc::clone(&data));
                self.published.send_replace(Some(Arc::clone(&data)));
                Ok(data)
            }
            Ok(Err(e)) => {
                log::error!("Failed to load locale '{}': {}", code, e);
                inner.state = LoadState::Failed {
                    locale: code.to_string(),
                    error: e.to_string(),
                };
                Err(e)
            }
            Err(e) => {
                log::error!("Locale load task for '{}' failed: {}", code, e);
                inner.state = LoadState::Failed {
                    locale: code.to_string(),
                    error: e.to_string(),
                };
                Err(LoadError::TaskFailed {
                    locale: code.to_string(),
                })
            }
        }
    }

    pub fn state(&self) -> LoadState {
        self.lock().state.clone()
    }

    /// Mapping from the last successful load
    pub fn current(&self) -> Option<Arc<LocaleData>> {
        self.lock().current.clone()
    }

    /// Observe every mapping the context applies
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<LocaleData>>> {
        self.published.subscribe()
    }

    pub fn table(&self) -> &LocaleTable {
        &self.table
    }
}

/// Rolls back a request whose `set_locale` future is dropped mid-load
struct PendingLoad<'a> {
    context: &'a IntlContext,
    generation: u64,
    armed: bool,
}

impl Drop for PendingLoad<'_> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        let mut inner = self.context.lock();
        if inner.generation != self.generation {
            return;
        }
        if let Some(handle) = inner.in_flight.take() {
            handle.abort();
        }
        inner.state = match &inner.current {
            Some(data) => LoadState::Ready {
                locale: data.locale.clone(),
            },
            None => LoadState::Idle,
        };
        log::debug!("Locale load dropped before completion");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::fs;
    use std::future::Future;
    use std::task::Poll;
    use tempfile::TempDir;

    fn setup() -> (TempDir, IntlContext) {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("en.json"),
            r#"{"greeting": [{"type": 0, "value": "Hello"}]}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("fr.json"),
            r#"{"greeting": [{"type": 0, "value": "Bonjour"}]}"#,
        )
        .unwrap();
        let mut config = Config::default();
        config.catalogs.compiled_dir = dir.path().to_path_buf();
        let table = LocaleTable::from_config(&config).unwrap();
        (dir, IntlContext::new(table))
    }

    #[tokio::test]
    async fn test_starts_idle() {
        let (_dir, context) = setup();
        assert_eq!(context.state(), LoadState::Idle);
        assert!(context.current().is_none());
    }

    #[tokio::test]
    async fn test_set_locale_becomes_ready() {
        let (_dir, context) = setup();
        let data = context.set_locale("fr").await.unwrap();
        assert_eq!(data.locale, "fr");
        assert_eq!(
            context.state(),
            LoadState::Ready {
                locale: "fr".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_switch_republishes_fresh_mapping() {
        let (_dir, context) = setup();
        let mut rx = context.subscribe();

        context.set_locale("en").await.unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().as_ref().unwrap().locale, "en");

        context.set_locale("fr").await.unwrap();
        assert!(rx.has_changed().unwrap());
        let published = rx.borrow_and_update().clone().unwrap();
        assert_eq!(published.locale, "fr");
        assert!(Arc::ptr_eq(&published, &context.current().unwrap()));
    }

    #[tokio::test]
    async fn test_newer_request_supersedes_older() {
        let (_dir, context) = setup();

        let (first, second) = tokio::join!(context.set_locale("fr"), context.set_locale("en"));

        assert!(matches!(first, Err(LoadError::Superseded { .. })));
        assert_eq!(second.unwrap().locale, "en");
        assert_eq!(context.current().unwrap().locale, "en");
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_mapping() {
        let (dir, context) = setup();
        context.set_locale("en").await.unwrap();
        fs::remove_file(dir.path().join("fr.json")).unwrap();

        let err = context.set_locale("fr").await.unwrap_err();

        assert!(matches!(err, LoadError::Catalog(_)));
        assert!(matches!(context.state(), LoadState::Failed { .. }));
        assert_eq!(context.current().unwrap().locale, "en");
    }

    #[tokio::test]
    async fn test_bootstrap_with_regional_tag_loads_base_catalog() {
        let (_dir, context) = setup();
        let data = context.bootstrap_with(Some("fr-CA".to_string())).await.unwrap();
        assert_eq!(data.locale, "fr");
        assert_eq!(data.requested, "fr");
    }

    #[tokio::test]
    async fn test_bootstrap_with_unlisted_tag_loads_default() {
        let (_dir, context) = setup();
        let data = context.bootstrap_with(Some("de-DE".to_string())).await.unwrap();
        assert_eq!(data.locale, "en");
        assert_eq!(data.requested, "de");
    }

    #[tokio::test]
    async fn test_bootstrap_without_ambient_locale_loads_default() {
        let (_dir, context) = setup();
        let data = context.bootstrap_with(None).await.unwrap();
        assert_eq!(data.locale, "en");
        assert_eq!(
            context.state(),
            LoadState::Ready {
                locale: "en".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_dropped_request_restores_previous_state() {
        let (_dir, context) = setup();
        context.set_locale("en").await.unwrap();

        {
            let mut load = std::pin::pin!(context.set_locale("fr"));
            std::future::poll_fn(|cx| {
                assert!(load.as_mut().poll(cx).is_pending());
                Poll::Ready(())
            })
            .await;
            assert_eq!(
                context.state(),
                LoadState::Loading {
                    locale: "fr".to_string()
                }
            );
        }

        assert!(context.lock().in_flight.is_none());
        assert_eq!(
            context.state(),
            LoadState::Ready {
                locale: "en".to_string()
            }
        );
        assert_eq!(context.current().unwrap().locale, "en");
        assert_eq!(context.set_locale("fr").await.unwrap().locale, "fr");
    }

    #[tokio::test]
    async fn test_unknown_locale_uses_default_catalog() {
        let (_dir, context) = setup();
        let data = context.set_locale("de").await.unwrap();
        assert_eq!(data.locale, "en");
        assert_eq!(data.requested, "de");
    }
}

//! Fit cache keyed by currency pair and last observation date
//!
//! Each key owns a slot guarded by its own mutex, so concurrent requests for
//! the same key wait for a single fit while other keys proceed. When a newer
//! last-observation date arrives for a pair, older entries for that pair are
//! dropped. Requests older than the newest cached date for a pair are fitted
//! but never stored.

use crate::currency::CurrencyPair;
use crate::error::Result;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

/// Cache key: the pair and the date of its latest observation
pub type FitKey = (CurrencyPair, NaiveDate);

type Slot<T> = Arc<Mutex<Option<Arc<T>>>>;

/// Thread-safe cache of trained models
#[derive(Debug)]
pub struct FitCache<T> {
    slots: RwLock<HashMap<FitKey, Slot<T>>>,
}

impl<T> Default for FitCache<T> {
    fn default() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }
}

impl<T> FitCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for the key, running `fit` once if absent.
    ///
    /// A failed fit leaves the slot empty so a later call can retry.
    pub fn get_or_fit<F>(&self, pair: &CurrencyPair, last_date: NaiveDate, fit: F) -> Result<Arc<T>>
    where
        F: FnOnce() -> Result<T>,
    {
        let Some(slot) = self.slot(pair, last_date) else {
            log::debug!("Fit for {} at {} predates the cached fit, not storing", pair, last_date);
            return fit().map(Arc::new);
        };
        let mut guard = slot.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(value) = guard.as_ref() {
            log::debug!("Fit cache hit for {} at {}", pair, last_date);
            return Ok(Arc::clone(value));
        }

        let value = Arc::new(fit()?);
        *guard = Some(Arc::clone(&value));
        Ok(value)
    }

    /// Check whether a fitted value exists for the key
    pub fn contains(&self, pair: &CurrencyPair, last_date: NaiveDate) -> bool {
        let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
        slots
            .get(&(pair.clone(), last_date))
            .map(|slot| slot.lock().unwrap_or_else(PoisonError::into_inner).is_some())
            .unwrap_or(false)
    }

    /// Drop every entry for a pair; returns how many were removed
    pub fn invalidate_pair(&self, pair: &CurrencyPair) -> usize {
        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        let before = slots.len();
        slots.retain(|(p, _), _| p != pair);
        let removed = before - slots.len();
        if removed > 0 {
            log::warn!("Invalidated {} cached fit(s) for {}", removed, pair);
        }
        removed
    }

    /// Number of keys held
    pub fn len(&self) -> usize {
        self.slots
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if the cache holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Remove everything
    pub fn clear(&self) {
        self.slots
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    /// Slot for the key, or `None` when a newer date is cached for the pair
    fn slot(&self, pair: &CurrencyPair, last_date: NaiveDate) -> Option<Slot<T>> {
        let key = (pair.clone(), last_date);
        {
            let slots = self.slots.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = slots.get(&key) {
                return Some(Arc::clone(slot));
            }
        }

        let mut slots = self.slots.write().unwrap_or_else(PoisonError::into_inner);
        if slots.keys().any(|(p, d)| p == pair && *d > last_date) {
            return None;
        }
        let stale: Vec<FitKey> = slots
            .keys()
            .filter(|(p, d)| p == pair && *d < last_date)
            .cloned()
            .collect();
        for old in stale {
            log::warn!("Newer observation for {} at {}, dropping fit at {}", pair, last_date, old.1);
            slots.remove(&old);
        }

        Some(Arc::clone(slots.entry(key).or_default()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ForecastError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    fn pair() -> CurrencyPair {
        CurrencyPair::new("EUR", "USD").unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_second_call_hits_cache() {
        let cache = FitCache::new();
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cache
                .get_or_fit(&pair(), date(1), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .unwrap();
            assert_eq!(*value, 42);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.contains(&pair(), date(1)));
    }

    #[test]
    fn test_failed_fit_is_not_cached() {
        let cache: FitCache<i32> = FitCache::new();

        let first = cache.get_or_fit(&pair(), date(1), || Err(ForecastError::EmptyForecast));
        assert!(first.is_err());
        assert!(!cache.contains(&pair(), date(1)));

        let second = cache.get_or_fit(&pair(), date(1), || Ok(7)).unwrap();
        assert_eq!(*second, 7);
    }

    #[test]
    fn test_newer_date_evicts_older_entry() {
        let cache = FitCache::new();
        let other = CurrencyPair::new("GBP", "JPY").unwrap();

        cache.get_or_fit(&pair(), date(1), || Ok(1)).unwrap();
        cache.get_or_fit(&other, date(1), || Ok(2)).unwrap();
        cache.get_or_fit(&pair(), date(2), || Ok(3)).unwrap();

        assert!(!cache.contains(&pair(), date(1)));
        assert!(cache.contains(&pair(), date(2)));
        assert!(cache.contains(&other, date(1)));
        assert_eq!(cache.len(), 2);

        assert_eq!(cache.invalidate_pair(&pair()), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_older_date_is_fitted_but_not_stored() {
        let cache = FitCache::new();
        let calls = AtomicUsize::new(0);

        cache.get_or_fit(&pair(), date(9), || Ok(9)).unwrap();
        for _ in 0..2 {
            let value = cache
                .get_or_fit(&pair(), date(4), || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(4)
                })
                .unwrap();
            assert_eq!(*value, 4);
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert!(!cache.contains(&pair(), date(4)));
        assert!(cache.contains(&pair(), date(9)));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_concurrent_callers_fit_once() {
        let cache = Arc::new(FitCache::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let calls = Arc::clone(&calls);
                thread::spawn(move || {
                    cache
                        .get_or_fit(&pair(), date(5), || {
                            calls.fetch_add(1, Ordering::SeqCst);
                            thread::sleep(Duration::from_millis(20));
                            Ok(99_u64)
                        })
                        .map(|v| *v)
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().unwrap(), 99);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

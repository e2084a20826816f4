//! Memoization Module
//!
//! Wraps pure functions so repeated calls with equal arguments are served
//! from a private cache.
//!
//! Multiple arguments are passed as a tuple. Automatic keys are the hex form
//! of the argument value's bincode encoding: equal values always encode
//! equally, argument order and structure both matter, and floats keep their
//! exact bits, so `NaN`, the infinities and `-0.0` each get their own key.
//! Struct fields encode in declaration order; maps should be `BTreeMap` so
//! their entries encode in a stable order.

use serde::Serialize;
use tracing::{trace, warn};

use crate::cache::{Cache, CacheStats};
use crate::config::CacheConfig;
use crate::error::Result;

// == Key Encoding ==
/// Encodes an argument value into its canonical cache key.
pub fn encode_key<A: Serialize + ?Sized>(args: &A) -> Result<String> {
    let bytes = bincode::serialize(args)?;
    Ok(hex::encode(bytes))
}

/// Derives the cache key for one call.
///
/// `None` means the call cannot be keyed and must bypass the cache.
pub trait CacheKey<A> {
    fn cache_key(&self, args: &A) -> Option<String>;
}

/// Keys calls by the structural encoding of their arguments.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralKey;

impl<A: Serialize> CacheKey<A> for StructuralKey {
    fn cache_key(&self, args: &A) -> Option<String> {
        match encode_key(args) {
            Ok(key) => Some(key),
            Err(e) => {
                warn!(error = %e, "Memoization key encoding failed, bypassing cache");
                None
            }
        }
    }
}

/// Keys calls with a caller-supplied function.
#[derive(Debug, Clone, Copy)]
pub struct CustomKey<K>(pub K);

impl<A, K> CacheKey<A> for CustomKey<K>
where
    K: Fn(&A) -> String,
{
    fn cache_key(&self, args: &A) -> Option<String> {
        Some((self.0)(args))
    }
}

// == Memoized ==
/// A function paired with its private result cache.
///
/// Only completed calls are cached: a panic in the wrapped function
/// propagates and stores nothing, and with [`Memoized::try_call`] an `Err`
/// is returned unchanged and not stored.
pub struct Memoized<F, K, R> {
    func: F,
    key: K,
    cache: Cache<R>,
}

impl<F, R: Clone> Memoized<F, StructuralKey, R> {
    /// Wraps `func`, keying calls by their structurally encoded arguments.
    pub fn new(func: F, config: CacheConfig) -> Self {
        Self {
            func,
            key: StructuralKey,
            cache: Cache::new(config),
        }
    }
}

impl<F, K, R: Clone> Memoized<F, CustomKey<K>, R> {
    /// Wraps `func`, keying calls with `key_fn`.
    pub fn with_key(func: F, key_fn: K, config: CacheConfig) -> Self {
        Self {
            func,
            key: CustomKey(key_fn),
            cache: Cache::new(config),
        }
    }
}

impl<F, K, R: Clone> Memoized<F, K, R> {
    // == Call ==
    /// Calls through the cache.
    pub fn call<A>(&self, args: A) -> R
    where
        F: Fn(A) -> R,
        K: CacheKey<A>,
    {
        let Some(key) = self.key.cache_key(&args) else {
            return (self.func)(args);
        };

        if let Some(cached) = self.cache.get(&key) {
            trace!(key = %key, "Memoization hit");
            return cached;
        }

        let result = (self.func)(args);
        self.cache.set(&key, result.clone());
        result
    }

    // == Try Call ==
    /// Calls a fallible function through the cache, storing only `Ok` values.
    pub fn try_call<A, E>(&self, args: A) -> std::result::Result<R, E>
    where
        F: Fn(A) -> std::result::Result<R, E>,
        K: CacheKey<A>,
    {
        let Some(key) = self.key.cache_key(&args) else {
            return (self.func)(args);
        };

        if let Some(cached) = self.cache.get(&key) {
            trace!(key = %key, "Memoization hit");
            return Ok(cached);
        }

        let result = (self.func)(args)?;
        self.cache.set(&key, result.clone());
        Ok(result)
    }

    /// Statistics of the private cache.
    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Forgets every memoized result.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &Cache<R> {
        &self.cache
    }
}

// == Function Wrappers ==
/// Memoizes `func`, keying calls by their structurally encoded arguments.
pub fn memoize<A, R, F>(func: F, config: CacheConfig) -> impl Fn(A) -> R
where
    A: Serialize,
    R: Clone,
    F: Fn(A) -> R,
{
    let memoized = Memoized::new(func, config);
    move |args: A| memoized.call(args)
}

/// Memoizes `func`, keying calls with `key_fn`.
///
/// Use this when arguments are not meaningfully comparable as a whole, or
/// when a coarser equivalence is wanted.
pub fn memoize_with_key<A, R, F, K>(func: F, key_fn: K, config: CacheConfig) -> impl Fn(A) -> R
where
    R: Clone,
    F: Fn(A) -> R,
    K: Fn(&A) -> String,
{
    let memoized = Memoized::with_key(func, key_fn, config);
    move |args: A| memoized.call(args)
}

/// Memoizes a fallible `func`; only `Ok` results are cached.
pub fn try_memoize<A, R, E, F>(
    func: F,
    config: CacheConfig,
) -> impl Fn(A) -> std::result::Result<R, E>
where
    A: Serialize,
    R: Clone,
    F: Fn(A) -> std::result::Result<R, E>,
{
    let memoized = Memoized::new(func, config);
    move |args: A| memoized.try_call(args)
}

/// Memoizes a fallible `func` with a custom key; only `Ok` results are cached.
pub fn try_memoize_with_key<A, R, E, F, K>(
    func: F,
    key_fn: K,
    config: CacheConfig,
) -> impl Fn(A) -> std::result::Result<R, E>
where
    R: Clone,
    F: Fn(A) -> std::result::Result<R, E>,
    K: Fn(&A) -> String,
{
    let memoized = Memoized::with_key(func, key_fn, config);
    move |args: A| memoized.try_call(args)
}

// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Transactional record store backing the pools.
//!
//! A [`Store`] is an ordered table of allocation records guarded by a mutex,
//! so every operation on it is a single atomically isolated unit of work
//! with respect to all concurrent callers. Mutations inside a unit of work
//! are staged as a change journal laid over the base table and only folded
//! into it when the closure succeeds; an `Err` return discards the journal
//! (commit-or-rollback on every exit path).
//!
//! The ordered base table makes `find` a deterministic lowest-key-first
//! scan, which keeps reservation order stable within a process.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::sync::{Mutex, PoisonError};

pub(crate) struct Store<K, R> {
    table: Mutex<BTreeMap<K, R>>,
}

impl<K, R> Default for Store<K, R> {
    fn default() -> Self {
        Self {
            table: Mutex::new(BTreeMap::new()),
        }
    }
}

impl<K: Ord + Clone, R: Clone> Store<K, R> {
    /// Run `f` as a unit of work. Staged changes are committed only when `f`
    /// returns `Ok`.
    pub(crate) fn transaction<T, E>(
        &self,
        f: impl FnOnce(&mut Txn<'_, K, R>) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        let staged;
        let out;
        {
            let mut txn = Txn {
                base: &table,
                staged: BTreeMap::new(),
            };
            out = f(&mut txn)?;
            staged = txn.staged;
        }
        for (key, change) in staged {
            match change {
                Some(record) => {
                    table.insert(key, record);
                }
                None => {
                    table.remove(&key);
                }
            }
        }
        Ok(out)
    }

    /// Run an infallible unit of work; always commits.
    pub(crate) fn mutate<T>(&self, f: impl FnOnce(&mut Txn<'_, K, R>) -> T) -> T {
        let result: Result<T, Infallible> = self.transaction(|txn| Ok(f(txn)));
        match result {
            Ok(out) => out,
            Err(never) => match never {},
        }
    }

    /// Run a read-only closure against the committed table.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&BTreeMap<K, R>) -> T) -> T {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        f(&table)
    }
}

/// Repository handle passed to unit-of-work closures.
///
/// Reads see the caller's own staged writes; `None` journal entries mark
/// deletions.
pub(crate) struct Txn<'t, K, R> {
    base: &'t BTreeMap<K, R>,
    staged: BTreeMap<K, Option<R>>,
}

impl<K: Ord + Clone, R: Clone> Txn<'_, K, R> {
    pub(crate) fn get(&self, key: &K) -> Option<&R> {
        match self.staged.get(key) {
            Some(change) => change.as_ref(),
            None => self.base.get(key),
        }
    }

    /// Insert or overwrite a record.
    pub(crate) fn insert(&mut self, key: K, record: R) {
        self.staged.insert(key, Some(record));
    }

    /// Delete a record if it exists.
    pub(crate) fn delete(&mut self, key: &K) {
        if self.get(key).is_some() {
            self.staged.insert(key.clone(), None);
        }
    }

    /// First live record matching `pred`, in key order.
    pub(crate) fn find(&self, mut pred: impl FnMut(&K, &R) -> bool) -> Option<(K, R)> {
        let base_hit = self
            .base
            .iter()
            .filter(|&(key, _)| !self.staged.contains_key(key))
            .find(|&(key, record)| pred(key, record));
        let staged_hit = self
            .staged
            .iter()
            .filter_map(|(key, change)| change.as_ref().map(|record| (key, record)))
            .find(|&(key, record)| pred(key, record));
        // The base scan skips every staged key, so the two hits never tie.
        match (base_hit, staged_hit) {
            (Some((bk, br)), Some((sk, sr))) => {
                if bk < sk {
                    Some((bk.clone(), br.clone()))
                } else {
                    Some((sk.clone(), sr.clone()))
                }
            }
            (Some((key, record)), None) | (None, Some((key, record))) => {
                Some((key.clone(), record.clone()))
            }
            (None, None) => None,
        }
    }

    /// Snapshot of all live records in key order.
    pub(crate) fn records(&self) -> Vec<(K, R)> {
        let mut out: Vec<(K, R)> = self
            .base
            .iter()
            .filter(|&(key, _)| !self.staged.contains_key(key))
            .map(|(key, record)| (key.clone(), record.clone()))
            .chain(
                self.staged
                    .iter()
                    .filter_map(|(key, change)| {
                        change.as_ref().map(|record| (key.clone(), record.clone()))
                    }),
            )
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

//! In-memory store for the last-fetched lead collection.
//!
//! Owns the collection, the multi-select set used for export, and the
//! derived search/stats views. No other component mutates these.

use std::collections::BTreeSet;

use crate::api::Lead;

/// Fields covered by [`LeadsStore::search`]: name, phone, email,
/// address, source, city, state, niche.
#[derive(Debug, Default)]
pub struct LeadsStore {
    leads: Vec<Lead>,
    selection: BTreeSet<i64>,
    fetch_generation: u64,
}

/// Counters derived from the current collection on demand; never cached
/// separately so they cannot drift from the collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeadStats {
    pub total: usize,
    pub with_phone: usize,
    pub with_email: usize,
}

impl LeadsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new fetch and return its generation token. A result
    /// applied with an older token is discarded, so a later fetch always
    /// wins over an earlier one still in flight.
    pub fn begin_fetch(&mut self) -> u64 {
        self.fetch_generation += 1;
        self.fetch_generation
    }

    /// Replace the collection wholesale if `generation` is still the
    /// newest issued. Returns whether the result was applied. Selection
    /// ids no longer present are pruned.
    pub fn apply_fetch(&mut self, generation: u64, leads: Vec<Lead>) -> bool {
        if generation != self.fetch_generation {
            return false;
        }
        self.leads = leads;
        let present: BTreeSet<i64> = self.leads.iter().map(|lead| lead.id).collect();
        self.selection.retain(|id| present.contains(id));
        true
    }

    pub fn leads(&self) -> &[Lead] {
        &self.leads
    }

    pub fn is_empty(&self) -> bool {
        self.leads.is_empty()
    }

    /// Case-insensitive substring match across the documented field set.
    /// An empty query returns the full collection. Pure; the base
    /// collection is never mutated.
    pub fn search(&self, query: &str) -> Vec<&Lead> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.leads.iter().collect();
        }
        self.leads
            .iter()
            .filter(|lead| haystack(lead).contains(&needle))
            .collect()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selection.contains(&id)
    }

    /// Toggle one lead in the selection. Ids not present in the current
    /// collection are ignored.
    pub fn toggle_select(&mut self, id: i64) {
        if !self.leads.iter().any(|lead| lead.id == id) {
            return;
        }
        if !self.selection.remove(&id) {
            self.selection.insert(id);
        }
    }

    /// Select-all is a toggle: if every lead is already selected, clear
    /// the selection instead.
    pub fn select_all(&mut self) {
        if !self.leads.is_empty() && self.selection.len() == self.leads.len() {
            self.selection.clear();
        } else {
            self.selection = self.leads.iter().map(|lead| lead.id).collect();
        }
    }

    pub fn selection(&self) -> &BTreeSet<i64> {
        &self.selection
    }

    pub fn selection_len(&self) -> usize {
        self.selection.len()
    }

    pub fn stats(&self) -> LeadStats {
        LeadStats {
            total: self.leads.len(),
            with_phone: self
                .leads
                .iter()
                .filter(|lead| lead.phone.as_deref().is_some_and(|p| !p.is_empty()))
                .count(),
            with_email: self
                .leads
                .iter()
                .filter(|lead| lead.email.as_deref().is_some_and(|e| !e.is_empty()))
                .count(),
        }
    }
}

fn haystack(lead: &Lead) -> String {
    [
        Some(lead.name.as_str()),
        lead.phone.as_deref(),
        lead.email.as_deref(),
        lead.address.as_deref(),
        lead.source.as_deref(),
        lead.city.as_deref(),
        lead.state.as_deref(),
        lead.niche.as_deref(),
    ]
    .into_iter()
    .flatten()
    .collect::<Vec<_>>()
    .join(" ")
    .to_lowercase()
}

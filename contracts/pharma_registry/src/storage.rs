//! Storage layout and TTL policy for the registry.
//!
//! Instance storage holds the administrator and the batch counter; every
//! participant and batch lives in its own persistent entry so that a single
//! record can be extended or read in isolation.
//!
//! Histories and handler lists are append-only and split into fixed-size
//! pages keyed by `(batch_id, page)`, with a per-batch length entry.

use soroban_sdk::{contracttype, Address, Env, Vec};

use crate::types::{DrugBatch, HistoryEntry, Participant};

/// Extend once fewer than ~30 days of ledgers remain (@ ~5s/ledger).
pub const TTL_THRESHOLD: u32 = 518_400;
/// Extend to ~120 days of ledgers (@ ~5s/ledger).
pub const TTL_EXTEND_TO: u32 = 2_073_600;

/// History entries or handler addresses per stored page. Appends only ever
/// rewrite the last page.
pub const PAGE_SIZE: u32 = 32;

#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DataKey {
    Admin,
    BatchCounter,
    Participant(Address),
    Batch(u64),
    HistoryLen(u64),
    HistoryPage(u64, u32),
    HandlerCount(u64),
    HandlerPage(u64, u32),
    Handled(u64, Address),
}

fn extend_persistent_ttl(env: &Env, key: &DataKey) {
    env.storage()
        .persistent()
        .extend_ttl(key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

fn page_count(len: u32) -> u32 {
    len.div_ceil(PAGE_SIZE)
}

fn read_len(env: &Env, key: &DataKey) -> u32 {
    match env.storage().persistent().get(key) {
        Some(len) => {
            extend_persistent_ttl(env, key);
            len
        }
        None => 0,
    }
}

fn write_len(env: &Env, key: &DataKey, len: u32) {
    env.storage().persistent().set(key, &len);
    extend_persistent_ttl(env, key);
}

// ── Instance ─────────────────────────────────────────────────────────────────

pub fn is_initialized(env: &Env) -> bool {
    env.storage().instance().has(&DataKey::Admin)
}

pub fn get_admin(env: &Env) -> Option<Address> {
    env.storage().instance().get(&DataKey::Admin)
}

pub fn set_admin(env: &Env, admin: &Address) {
    env.storage().instance().set(&DataKey::Admin, admin);
    extend_instance_ttl(env);
}

pub fn batch_count(env: &Env) -> u64 {
    env.storage()
        .instance()
        .get(&DataKey::BatchCounter)
        .unwrap_or(0)
}

pub fn set_batch_count(env: &Env, count: u64) {
    env.storage().instance().set(&DataKey::BatchCounter, &count);
}

// ── Participants ─────────────────────────────────────────────────────────────

pub fn has_participant(env: &Env, address: &Address) -> bool {
    env.storage()
        .persistent()
        .has(&DataKey::Participant(address.clone()))
}

pub fn get_participant(env: &Env, address: &Address) -> Option<Participant> {
    let key = DataKey::Participant(address.clone());
    let participant = env.storage().persistent().get(&key);
    if participant.is_some() {
        extend_persistent_ttl(env, &key);
    }
    participant
}

pub fn set_participant(env: &Env, participant: &Participant) {
    let key = DataKey::Participant(participant.address.clone());
    env.storage().persistent().set(&key, participant);
    extend_persistent_ttl(env, &key);
}

// ── Batches ──────────────────────────────────────────────────────────────────

pub fn get_batch(env: &Env, batch_id: u64) -> Option<DrugBatch> {
    let key = DataKey::Batch(batch_id);
    let batch = env.storage().persistent().get(&key);
    if batch.is_some() {
        extend_persistent_ttl(env, &key);
    }
    batch
}

pub fn set_batch(env: &Env, batch: &DrugBatch) {
    let key = DataKey::Batch(batch.id);
    env.storage().persistent().set(&key, batch);
    extend_persistent_ttl(env, &key);
}

// ── History ──────────────────────────────────────────────────────────────────

/// Number of history entries recorded for a batch.
pub fn history_len(env: &Env, batch_id: u64) -> u32 {
    read_len(env, &DataKey::HistoryLen(batch_id))
}

fn history_page(env: &Env, batch_id: u64, page: u32) -> Vec<HistoryEntry> {
    let key = DataKey::HistoryPage(batch_id, page);
    match env.storage().persistent().get(&key) {
        Some(entries) => {
            extend_persistent_ttl(env, &key);
            entries
        }
        None => Vec::new(env),
    }
}

/// Full history of a batch, oldest first.
pub fn get_history(env: &Env, batch_id: u64) -> Vec<HistoryEntry> {
    let len = history_len(env, batch_id);
    let mut history = Vec::new(env);
    for page in 0..page_count(len) {
        history.append(&history_page(env, batch_id, page));
    }
    history
}

/// Up to `limit` history entries starting at index `start`.
pub fn get_history_range(env: &Env, batch_id: u64, start: u32, limit: u32) -> Vec<HistoryEntry> {
    let end = history_len(env, batch_id).min(start.saturating_add(limit));
    let mut entries = Vec::new(env);
    let mut index = start;
    while index < end {
        let page = history_page(env, batch_id, index / PAGE_SIZE);
        let from = index % PAGE_SIZE;
        let to = page.len().min(from + (end - index));
        if to <= from {
            break;
        }
        entries.append(&page.slice(from..to));
        index += to - from;
    }
    entries
}

/// Appends to the batch history. Only the tail page is rewritten.
pub fn append_history(env: &Env, batch_id: u64, entry: HistoryEntry) {
    let len_key = DataKey::HistoryLen(batch_id);
    let len = read_len(env, &len_key);
    let page = len / PAGE_SIZE;

    let mut entries = history_page(env, batch_id, page);
    entries.push_back(entry);
    let key = DataKey::HistoryPage(batch_id, page);
    env.storage().persistent().set(&key, &entries);
    extend_persistent_ttl(env, &key);

    write_len(env, &len_key, len + 1);
}

// ── Handlers ─────────────────────────────────────────────────────────────────

fn handler_page(env: &Env, batch_id: u64, page: u32) -> Vec<Address> {
    let key = DataKey::HandlerPage(batch_id, page);
    match env.storage().persistent().get(&key) {
        Some(handlers) => {
            extend_persistent_ttl(env, &key);
            handlers
        }
        None => Vec::new(env),
    }
}

/// Every handler of a batch in order of first custody.
pub fn get_handlers(env: &Env, batch_id: u64) -> Vec<Address> {
    let count = read_len(env, &DataKey::HandlerCount(batch_id));
    let mut handlers = Vec::new(env);
    for page in 0..page_count(count) {
        handlers.append(&handler_page(env, batch_id, page));
    }
    handlers
}

/// Adds `handler` to the batch's handler set if it is not already present.
pub fn add_handler(env: &Env, batch_id: u64, handler: &Address) {
    let seen_key = DataKey::Handled(batch_id, handler.clone());
    if env.storage().persistent().has(&seen_key) {
        extend_persistent_ttl(env, &seen_key);
        return;
    }

    let count_key = DataKey::HandlerCount(batch_id);
    let count = read_len(env, &count_key);
    let page = count / PAGE_SIZE;

    let mut handlers = handler_page(env, batch_id, page);
    handlers.push_back(handler.clone());
    let key = DataKey::HandlerPage(batch_id, page);
    env.storage().persistent().set(&key, &handlers);
    extend_persistent_ttl(env, &key);

    env.storage().persistent().set(&seen_key, &true);
    extend_persistent_ttl(env, &seen_key);
    write_len(env, &count_key, count + 1);
}

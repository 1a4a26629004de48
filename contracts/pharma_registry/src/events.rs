//! Events emitted by the registry contract.

use soroban_sdk::{symbol_short, Address, Env, IntoVal, String, Symbol, Val};

use crate::types::{BatchAction, ParticipantRole};

// ── Internal helper ───────────────────────────────────────────────────────────

fn emit<T: IntoVal<Env, Val>>(env: &Env, topic: &str, data: T) {
    #[allow(deprecated)]
    env.events()
        .publish((symbol_short!("PHARMA"), Symbol::new(env, topic)), data);
}

// ── Event structs ─────────────────────────────────────────────────────────────

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct InitializedEvent {
    pub admin: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParticipantRegisteredEvent {
    pub participant: Address,
    pub name: String,
    pub role: ParticipantRole,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchCreatedEvent {
    pub batch_id: u64,
    pub owner: Address,
    pub drug_name: String,
    pub quantity: u64,
    pub expiry_date: u64,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct OwnershipTransferredEvent {
    pub batch_id: u64,
    pub from: Address,
    pub to: Address,
    pub timestamp: u64,
}

#[soroban_sdk::contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BatchStatusUpdatedEvent {
    pub batch_id: u64,
    pub status: BatchAction,
    pub timestamp: u64,
}

// ── Publishers ────────────────────────────────────────────────────────────────

pub fn publish_initialized(env: &Env, admin: Address) {
    emit(
        env,
        "initialized",
        InitializedEvent {
            admin,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_participant_registered(
    env: &Env,
    participant: Address,
    name: String,
    role: ParticipantRole,
) {
    emit(
        env,
        "participant_registered",
        ParticipantRegisteredEvent {
            participant,
            name,
            role,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_batch_created(
    env: &Env,
    batch_id: u64,
    owner: Address,
    drug_name: String,
    quantity: u64,
    expiry_date: u64,
) {
    emit(
        env,
        "batch_created",
        BatchCreatedEvent {
            batch_id,
            owner,
            drug_name,
            quantity,
            expiry_date,
            timestamp: env.ledger().timestamp(),
        },
    );
}

pub fn publish_ownership_transferred(env: &Env, batch_id: u64, from: Address, to: Address) {
    emit(
        env,
        "ownership_transferred",
        OwnershipTransferredEvent {
            batch_id,
            from,
            to,
            timestamp: env.ledger().timestamp(),
        },
    );
}

/// Emitted alongside every lifecycle change so observers can follow a batch
/// from a single topic.
pub fn publish_batch_status_updated(env: &Env, batch_id: u64, status: BatchAction) {
    emit(
        env,
        "batch_status_updated",
        BatchStatusUpdatedEvent {
            batch_id,
            status,
            timestamp: env.ledger().timestamp(),
        },
    );
}

//! # Pharmaceutical Batch Registry Contract
//!
//! Maps drug batch identifiers to ownership and provenance records.
//!
//! ## Roles
//! | Caller                 | May                                          |
//! |------------------------|----------------------------------------------|
//! | Administrator          | register participants, deactivate batches    |
//! | Authorized participant | create batches                               |
//! | Current batch owner    | transfer the batch to another participant    |
//! | Anyone                 | read batch info, history, verify authenticity|
//!
//! ## Batch lifecycle
//! ```text
//! Active ──deactivate_batch──▶ Deactivated (terminal)
//! ```
//! Expiry is not a stored state: it is recomputed from the ledger timestamp on
//! every read and gates transfers and authenticity checks.
//!
//! Deactivated batches stay readable through `get_batch_info`,
//! `get_supply_chain_history` and `get_batch_handlers` so that recalls can be
//! investigated; only mutating entry points are gated on activity.
#![no_std]
#![allow(clippy::too_many_arguments)]

pub mod events;
pub mod storage;
pub mod types;
pub mod validation;

pub use types::{BatchAction, DrugBatch, HistoryEntry, Participant, ParticipantRole};

use soroban_sdk::{contract, contracterror, contractimpl, log, Address, Env, String, Vec};

const CONTRACT_VERSION: u32 = 1;

/// Largest history window returned by `get_supply_chain_history_range`.
pub const MAX_HISTORY_RANGE: u32 = 64;

/// Actor name recorded in history when the administrator is not itself a
/// registered participant.
const ADMIN_DISPLAY_NAME: &str = "Registry Administrator";

// ── Contract errors ───────────────────────────────────────────────────────────

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum RegistryError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    /// Caller lacks the required role or does not own the batch.
    Unauthorized = 3,
    /// Malformed input: empty names, zero quantity, bad date ordering, or an
    /// invalid counterparty.
    InvalidArgument = 4,
    /// Unknown batch id, or an inactive batch where activity is required.
    InvalidBatch = 5,
    AlreadyExists = 6,
    /// Time-bound operation attempted at or after the batch's expiry.
    Expired = 7,
    ParticipantNotFound = 8,
}

// ── Contract ──────────────────────────────────────────────────────────────────

#[contract]
pub struct PharmaRegistryContract;

#[contractimpl]
impl PharmaRegistryContract {
    // ── Initialisation ────────────────────────────────────────────────────────

    /// Initialise the registry and fix its administrator.
    pub fn initialize(env: Env, admin: Address) -> Result<(), RegistryError> {
        if storage::is_initialized(&env) {
            return Err(RegistryError::AlreadyInitialized);
        }

        admin.require_auth();

        storage::set_admin(&env, &admin);
        storage::set_batch_count(&env, 0);

        events::publish_initialized(&env, admin);

        Ok(())
    }

    /// Return the administrator address.
    pub fn get_admin(env: Env) -> Result<Address, RegistryError> {
        storage::get_admin(&env).ok_or(RegistryError::NotInitialized)
    }

    // ── Guards ────────────────────────────────────────────────────────────────

    fn require_admin(env: &Env, caller: &Address) -> Result<Address, RegistryError> {
        let admin = storage::get_admin(env).ok_or(RegistryError::NotInitialized)?;
        if *caller != admin {
            return Err(RegistryError::Unauthorized);
        }
        Ok(admin)
    }

    fn require_authorized(env: &Env, caller: &Address) -> Result<Participant, RegistryError> {
        match storage::get_participant(env, caller) {
            Some(participant) if participant.active => Ok(participant),
            _ => Err(RegistryError::Unauthorized),
        }
    }

    fn load_batch(env: &Env, batch_id: u64) -> Result<DrugBatch, RegistryError> {
        if batch_id == 0 || batch_id > storage::batch_count(env) {
            return Err(RegistryError::InvalidBatch);
        }
        storage::get_batch(env, batch_id).ok_or(RegistryError::InvalidBatch)
    }

    fn load_active_batch(env: &Env, batch_id: u64) -> Result<DrugBatch, RegistryError> {
        let batch = Self::load_batch(env, batch_id)?;
        if !batch.active {
            return Err(RegistryError::InvalidBatch);
        }
        Ok(batch)
    }

    // ── Participants ──────────────────────────────────────────────────────────

    /// Register a supply-chain participant. Admin only.
    pub fn register_participant(
        env: Env,
        caller: Address,
        participant: Address,
        name: String,
        role: ParticipantRole,
    ) -> Result<(), RegistryError> {
        caller.require_auth();
        Self::require_admin(&env, &caller)?;

        validation::validate_name(&name)?;
        if participant == env.current_contract_address() {
            return Err(RegistryError::InvalidArgument);
        }
        if storage::has_participant(&env, &participant) {
            return Err(RegistryError::AlreadyExists);
        }

        let record = Participant {
            address: participant.clone(),
            name: name.clone(),
            role: role.clone(),
            active: true,
            registered_at: env.ledger().timestamp(),
        };
        storage::set_participant(&env, &record);
        storage::extend_instance_ttl(&env);

        log!(&env, "participant registered", participant);
        events::publish_participant_registered(&env, participant, name, role);

        Ok(())
    }

    /// Retrieve a participant's registration record.
    pub fn get_participant(env: Env, participant: Address) -> Result<Participant, RegistryError> {
        storage::get_participant(&env, &participant).ok_or(RegistryError::ParticipantNotFound)
    }

    pub fn is_authorized_participant(env: Env, address: Address) -> bool {
        Self::require_authorized(&env, &address).is_ok()
    }

    // ── Batch lifecycle ───────────────────────────────────────────────────────

    /// Create a new drug batch owned by `caller` and return its id.
    ///
    /// Ids are allocated sequentially starting at 1.
    #[allow(clippy::arithmetic_side_effects)]
    pub fn create_drug_batch(
        env: Env,
        caller: Address,
        drug_name: String,
        manufacturer: String,
        manufacturing_date: u64,
        expiry_date: u64,
        quantity: u64,
    ) -> Result<u64, RegistryError> {
        caller.require_auth();
        let creator = Self::require_authorized(&env, &caller)?;

        validation::validate_name(&drug_name)?;
        validation::validate_name(&manufacturer)?;
        let now = env.ledger().timestamp();
        validation::validate_batch_dates(manufacturing_date, expiry_date, now)?;
        validation::validate_quantity(quantity)?;

        let batch_id = storage::batch_count(&env) + 1;

        let batch = DrugBatch {
            id: batch_id,
            drug_name: drug_name.clone(),
            manufacturer,
            manufacturing_date,
            expiry_date,
            quantity,
            current_owner: caller.clone(),
            active: true,
            created_at: now,
        };
        storage::set_batch(&env, &batch);
        storage::append_history(&env, batch_id, HistoryEntry::created(&env, &creator, now));
        storage::add_handler(&env, batch_id, &caller);
        storage::set_batch_count(&env, batch_id);
        storage::extend_instance_ttl(&env);

        log!(&env, "batch created", batch_id, caller);
        events::publish_batch_created(&env, batch_id, caller, drug_name, quantity, expiry_date);
        events::publish_batch_status_updated(&env, batch_id, BatchAction::Created);

        Ok(batch_id)
    }

    /// Move ownership of an active, unexpired batch from its current owner to
    /// another authorized participant.
    pub fn transfer_batch_ownership(
        env: Env,
        caller: Address,
        batch_id: u64,
        new_owner: Address,
        note: String,
    ) -> Result<(), RegistryError> {
        caller.require_auth();
        let mut batch = Self::load_active_batch(&env, batch_id)?;

        let sender = Self::require_authorized(&env, &caller)?;
        if batch.current_owner != caller {
            return Err(RegistryError::Unauthorized);
        }

        if new_owner == caller || new_owner == env.current_contract_address() {
            return Err(RegistryError::InvalidArgument);
        }
        let recipient = Self::require_authorized(&env, &new_owner)
            .map_err(|_| RegistryError::InvalidArgument)?;
        validation::validate_note(&note)?;

        let now = env.ledger().timestamp();
        if now >= batch.expiry_date {
            return Err(RegistryError::Expired);
        }

        batch.current_owner = new_owner.clone();
        storage::set_batch(&env, &batch);
        storage::append_history(
            &env,
            batch_id,
            HistoryEntry::transferred(&sender, &recipient, note, now),
        );
        storage::add_handler(&env, batch_id, &new_owner);
        storage::extend_instance_ttl(&env);

        log!(&env, "batch transferred", batch_id, caller, new_owner);
        events::publish_ownership_transferred(&env, batch_id, caller, new_owner);
        events::publish_batch_status_updated(&env, batch_id, BatchAction::Transferred);

        Ok(())
    }

    /// Permanently deactivate (recall) a batch. Admin only.
    ///
    /// Calling this on an already deactivated batch fails with `InvalidBatch`.
    pub fn deactivate_batch(
        env: Env,
        caller: Address,
        batch_id: u64,
        reason: String,
    ) -> Result<(), RegistryError> {
        caller.require_auth();
        let admin = Self::require_admin(&env, &caller)?;
        let mut batch = Self::load_active_batch(&env, batch_id)?;
        validation::validate_note(&reason)?;

        let admin_name = storage::get_participant(&env, &admin)
            .map(|p| p.name)
            .unwrap_or_else(|| String::from_str(&env, ADMIN_DISPLAY_NAME));
        let now = env.ledger().timestamp();

        batch.active = false;
        storage::set_batch(&env, &batch);
        storage::append_history(
            &env,
            batch_id,
            HistoryEntry::deactivated(admin, admin_name, reason, now),
        );
        storage::extend_instance_ttl(&env);

        log!(&env, "batch deactivated", batch_id);
        events::publish_batch_status_updated(&env, batch_id, BatchAction::Deactivated);

        Ok(())
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    /// Scalar fields of a batch. Available whether or not the batch is active.
    pub fn get_batch_info(env: Env, batch_id: u64) -> Result<DrugBatch, RegistryError> {
        Self::load_batch(&env, batch_id)
    }

    /// Full ordered custody history of a batch, oldest first.
    pub fn get_supply_chain_history(
        env: Env,
        batch_id: u64,
    ) -> Result<Vec<HistoryEntry>, RegistryError> {
        Self::load_batch(&env, batch_id)?;
        Ok(storage::get_history(&env, batch_id))
    }

    /// Number of entries in a batch's history.
    pub fn get_history_length(env: Env, batch_id: u64) -> Result<u32, RegistryError> {
        Self::load_batch(&env, batch_id)?;
        Ok(storage::history_len(&env, batch_id))
    }

    /// Up to `limit` history entries starting at index `start`, oldest first.
    ///
    /// Lets clients walk the history of a long-lived batch in windows of at
    /// most `MAX_HISTORY_RANGE` entries. A `start` past the end yields an
    /// empty list.
    pub fn get_supply_chain_history_range(
        env: Env,
        batch_id: u64,
        start: u32,
        limit: u32,
    ) -> Result<Vec<HistoryEntry>, RegistryError> {
        if limit == 0 || limit > MAX_HISTORY_RANGE {
            return Err(RegistryError::InvalidArgument);
        }
        Self::load_batch(&env, batch_id)?;
        Ok(storage::get_history_range(&env, batch_id, start, limit))
    }

    /// Every address that has held the batch, in order of first custody.
    /// Audit trail only; never consulted for access control.
    pub fn get_batch_handlers(env: Env, batch_id: u64) -> Result<Vec<Address>, RegistryError> {
        Self::load_batch(&env, batch_id)?;
        Ok(storage::get_handlers(&env, batch_id))
    }

    /// True iff the batch exists, is active, and has not yet expired.
    /// Never fails.
    pub fn verify_batch_authenticity(env: Env, batch_id: u64) -> bool {
        match Self::load_batch(&env, batch_id) {
            Ok(batch) => batch.is_authentic(env.ledger().timestamp()),
            Err(_) => false,
        }
    }

    pub fn get_total_batches(env: Env) -> u64 {
        storage::batch_count(&env)
    }

    /// Contract version
    pub fn version() -> u32 {
        CONTRACT_VERSION
    }
}

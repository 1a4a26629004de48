use soroban_sdk::{contracttype, Address, Env, String};

/// Supply-chain role of a registered participant.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParticipantRole {
    Manufacturer,
    Distributor,
    Pharmacy,
    Hospital,
}

/// Registered supply-chain actor.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Participant {
    pub address: Address,
    pub name: String,
    pub role: ParticipantRole,
    pub active: bool,
    pub registered_at: u64,
}

/// Scalar record of a tracked drug batch.
///
/// History and the handler set are stored under their own keys so that
/// ownership checks never have to load them.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DrugBatch {
    pub id: u64,
    pub drug_name: String,
    pub manufacturer: String,
    pub manufacturing_date: u64,
    pub expiry_date: u64,
    pub quantity: u64,
    pub current_owner: Address,
    pub active: bool,
    pub created_at: u64,
}

impl DrugBatch {
    /// A batch is authentic while it has not been recalled and has not expired.
    pub fn is_authentic(&self, now: u64) -> bool {
        self.active && now < self.expiry_date
    }
}

/// Kind of custody event recorded against a batch.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum BatchAction {
    Created,
    Transferred,
    Deactivated,
}

/// One entry of a batch's append-only supply-chain history.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HistoryEntry {
    pub action: BatchAction,
    pub actor: Address,
    pub actor_name: String,
    pub recipient: Option<Address>,
    pub recipient_name: Option<String>,
    pub note: String,
    pub timestamp: u64,
}

impl HistoryEntry {
    pub fn created(env: &Env, creator: &Participant, timestamp: u64) -> Self {
        Self {
            action: BatchAction::Created,
            actor: creator.address.clone(),
            actor_name: creator.name.clone(),
            recipient: None,
            recipient_name: None,
            note: String::from_str(env, ""),
            timestamp,
        }
    }

    pub fn transferred(from: &Participant, to: &Participant, note: String, timestamp: u64) -> Self {
        Self {
            action: BatchAction::Transferred,
            actor: from.address.clone(),
            actor_name: from.name.clone(),
            recipient: Some(to.address.clone()),
            recipient_name: Some(to.name.clone()),
            note,
            timestamp,
        }
    }

    pub fn deactivated(admin: Address, admin_name: String, reason: String, timestamp: u64) -> Self {
        Self {
            action: BatchAction::Deactivated,
            actor: admin,
            actor_name: admin_name,
            recipient: None,
            recipient_name: None,
            note: reason,
            timestamp,
        }
    }
}

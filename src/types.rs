multiversx_sc::imports!();
multiversx_sc::derive_imports!();

// ============================================================
// Proposal lifecycle
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub enum ProposalStatus {
    /// Accepting ballots. Executable once the soak period has elapsed.
    Active,
    /// Quorum and majority met, actions dispatched. Terminal state.
    Executed,
    /// Soak period elapsed without quorum or majority. Terminal state.
    Defeated,
    /// Withdrawn by the governor. Terminal state.
    Canceled,
}

// ============================================================
// Membership ledger entry
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Contributor<M: ManagedTypeApi> {
    /// Total EGLD staked. Only ever increases.
    pub contribution: BigUint<M>,
    /// Starts at the joining stake, grows by 5% with every accepted ballot.
    pub vote_weight: BigUint<M>,
    pub vote_count: u64,
    /// Governor-approved proposer, exempt from the vote count threshold
    pub whitelisted: bool,
    /// Last proposal created by this address (0 if none)
    pub recent_proposal_id: u64,
}

impl<M: ManagedTypeApi> Contributor<M> {
    pub fn empty() -> Self {
        Contributor {
            contribution: BigUint::zero(),
            vote_weight: BigUint::zero(),
            vote_count: 0,
            whitelisted: false,
            recent_proposal_id: 0,
        }
    }
}

// ============================================================
// Proposals and their call bundles
// ============================================================

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct Proposal<M: ManagedTypeApi> {
    pub id: u64,
    pub proposer: ManagedAddress<M>,
    pub description: ManagedBuffer<M>,
    pub status: ProposalStatus,
    /// Number of accepted ballots
    pub votes: u64,
    /// Weight of supporting ballots, each taken at cast time
    pub pro_vote_weight: BigUint<M>,
    /// Weight of all accepted ballots, each taken at cast time
    pub total_vote_weight: BigUint<M>,
    pub created_at: u64,
}

/// One call dispatched when the proposal executes. An empty `endpoint`
/// means a plain EGLD transfer of `value` to `target`.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct ProposalAction<M: ManagedTypeApi> {
    pub target: ManagedAddress<M>,
    pub value: BigUint<M>,
    pub endpoint: ManagedBuffer<M>,
    /// Top-encoded list of raw call arguments
    pub payload: ManagedBuffer<M>,
}

// ============================================================
// Ballots
// ============================================================

/// An off-chain ballot relayed in a batch. ed25519 keys cannot be
/// recovered from a signature, so the signer claims its address and the
/// signature is checked against it.
#[type_abi]
#[derive(
    TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone, Debug,
)]
pub struct BallotSignature<M: ManagedTypeApi> {
    pub signer: ManagedAddress<M>,
    pub signature: ManagedBuffer<M>,
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Debug)]
pub struct VoteRecord<M: ManagedTypeApi> {
    pub voter: ManagedAddress<M>,
    pub support: bool,
    /// Voter weight at the moment the ballot was counted
    pub weight: BigUint<M>,
}

/// Why a ballot in a signed batch was dropped.
#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, Copy, PartialEq, Debug)]
pub enum SkipReason {
    BadSignature,
    NotMember,
    AlreadyVoted,
}

#![no_std]

multiversx_sc::imports!();

pub mod ballot;
pub mod errors;
pub mod membership;
pub mod nft_marketplace_proxy;
pub mod proposals;
pub mod types;

use errors::*;
use membership::{grow_vote_weight, MINIMUM_STAKE};
use proposals::{decode_call_arguments, PROPOSER_VOTE_THRESHOLD};
use types::{BallotSignature, Proposal, ProposalAction, ProposalStatus, SkipReason, VoteRecord};

// ============================================================
// Constants
// ============================================================

/// Minimum time between proposal creation and execution: 7 days
pub const SOAK_PERIOD: u64 = 604_800;

/// 25% quorum: cast weight * 4 must reach total contributions
pub const QUORUM_DIVISOR: u64 = 4;
pub const QUORUM_PERCENTAGE: u64 = 25;

/// Per-ballot vote weight bonus, in percent
pub const VOTE_BONUS_PERCENTAGE: u64 = 5;

/// Weighted turnout: the cast weight is at least a quarter of everything staked.
pub fn quorum_reached<M: ManagedTypeApi>(
    total_vote_weight: &BigUint<M>,
    total_contributions: &BigUint<M>,
) -> bool {
    let scaled = total_vote_weight * QUORUM_DIVISOR;
    &scaled >= total_contributions
}

/// Strict majority of the cast weight, not of the member count.
pub fn majority_reached<M: ManagedTypeApi>(
    pro_vote_weight: &BigUint<M>,
    total_vote_weight: &BigUint<M>,
) -> bool {
    let doubled = pro_vote_weight * 2u64;
    &doubled > total_vote_weight
}

// ============================================================
// Contract
// ============================================================

#[multiversx_sc::contract]
pub trait WeightedDao:
    membership::MembershipModule + ballot::BallotModule + proposals::ProposalsModule
{
    // ========================================================
    // Init / Upgrade
    // ========================================================

    #[init]
    fn init(
        &self,
        governor: ManagedAddress,
        chain_id: ManagedBuffer,
        whitelist: MultiValueEncoded<ManagedAddress>,
    ) {
        self.governor().set(&governor);
        self.chain_id().set(&chain_id);
        self.total_contributions().set(BigUint::zero());
        self.total_proposals().set(0u64);

        for address in whitelist {
            let mut contributor = self.contributor_or_empty(&address);
            contributor.whitelisted = true;
            self.contributors(&address).set(&contributor);
        }
    }

    #[upgrade]
    fn upgrade(&self) {}

    // ========================================================
    // ENDPOINT: voteBySignatures
    // Relayed batch of signed ballots. Entries with a bad
    // signature, a non-member signer or a repeated voter are
    // dropped and reported; the rest are counted.
    // Returns (accepted, skipped).
    // ========================================================

    #[endpoint(voteBySignatures)]
    fn vote_by_signatures(
        &self,
        proposal_id: u64,
        supports: ManagedVec<bool>,
        signatures: ManagedVec<BallotSignature<Self::Api>>,
    ) -> MultiValue2<u64, u64> {
        self.require_signature_voting_enabled();
        require!(
            supports.len() == signatures.len(),
            ERR_INVALID_PARAMETERS
        );
        let mut proposal = self.require_active_proposal(proposal_id);

        let support_digest = self.ballot_digest(proposal_id, true).to_byte_array();
        let against_digest = self.ballot_digest(proposal_id, false).to_byte_array();

        let mut accepted = 0u64;
        let mut skipped = 0u64;
        for index in 0..supports.len() {
            let support = supports.get(index);
            let ballot = signatures.get(index);
            let digest = if support {
                &support_digest
            } else {
                &against_digest
            };

            let outcome = match self.recover_ballot_signer(&ballot, digest) {
                Some(voter) => self
                    .tally_ballot(&mut proposal, &voter, support)
                    .map(|weight| (voter, weight)),
                None => Err(SkipReason::BadSignature),
            };

            match outcome {
                Ok((voter, weight)) => {
                    accepted += 1;
                    self.ballot_accepted_event(proposal_id, &voter, support, &weight);
                }
                Err(reason) => {
                    skipped += 1;
                    self.ballot_skipped_event(proposal_id, index as u64, reason);
                }
            }
        }

        self.proposals(proposal_id).set(&proposal);

        (accepted, skipped).into()
    }

    // ========================================================
    // ENDPOINT: castVote
    // Direct path: the caller is the voter. A single ballot,
    // so every precondition is a hard error.
    // ========================================================

    #[endpoint(castVote)]
    fn cast_vote(&self, proposal_id: u64, support: bool) {
        let caller = self.blockchain().get_caller();
        let mut proposal = self.require_active_proposal(proposal_id);

        let weight = match self.tally_ballot(&mut proposal, &caller, support) {
            Ok(weight) => weight,
            Err(SkipReason::AlreadyVoted) => sc_panic!(ERR_ALREADY_VOTED),
            Err(_) => sc_panic!(ERR_NOT_MEMBER),
        };

        self.proposals(proposal_id).set(&proposal);
        self.ballot_accepted_event(proposal_id, &caller, support, &weight);
    }

    // ========================================================
    // ENDPOINT: execute
    // Governor or proposer, after the soak period, with quorum
    // and majority met. All actions dispatch in this transaction;
    // a failing action reverts everything, status included.
    // ========================================================

    #[endpoint(execute)]
    fn execute(&self, proposal_id: u64) {
        let caller = self.blockchain().get_caller();
        let mut proposal = self.require_proposal(proposal_id);

        require!(
            caller == self.governor().get() || caller == proposal.proposer,
            ERR_PERMISSION
        );
        require!(
            proposal.status == ProposalStatus::Active,
            ERR_INVALID_PROPOSAL
        );
        self.require_soak_elapsed(&proposal);

        let total_contributions = self.total_contributions().get();
        require!(
            quorum_reached(&proposal.total_vote_weight, &total_contributions),
            ERR_QUORUM
        );
        require!(
            majority_reached(&proposal.pro_vote_weight, &proposal.total_vote_weight),
            ERR_PROPOSAL_REJECTED
        );

        proposal.status = ProposalStatus::Executed;
        self.proposals(proposal_id).set(&proposal);

        self.dispatch_actions(proposal_id);
        self.proposal_executed_event(proposal_id, &caller);
    }

    // ========================================================
    // ENDPOINT: defeatProposal
    // Anyone can close a proposal that is past its soak period
    // and would not pass. Frees the proposer's open slot.
    // ========================================================

    #[endpoint(defeatProposal)]
    fn defeat_proposal(&self, proposal_id: u64) {
        let mut proposal = self.require_active_proposal(proposal_id);
        self.require_soak_elapsed(&proposal);

        let total_contributions = self.total_contributions().get();
        let passes = quorum_reached(&proposal.total_vote_weight, &total_contributions)
            && majority_reached(&proposal.pro_vote_weight, &proposal.total_vote_weight);
        require!(!passes, ERR_PROPOSAL_PASSED);

        proposal.status = ProposalStatus::Defeated;
        self.proposals(proposal_id).set(&proposal);

        self.proposal_defeated_event(proposal_id);
    }

    // ========================================================
    // ENDPOINT: buyNft
    // Only reachable as an action of an executed proposal.
    // ========================================================

    #[endpoint(buyNft)]
    fn buy_nft(&self, marketplace: ManagedAddress, nft_contract: ManagedAddress, nft_id: u64) {
        let caller = self.blockchain().get_caller();
        let own_address = self.blockchain().get_sc_address();
        require!(caller == own_address, ERR_PERMISSION);

        let price: BigUint = self
            .tx()
            .to(&marketplace)
            .typed(nft_marketplace_proxy::NftMarketplaceProxy)
            .get_price(nft_contract.clone(), nft_id)
            .returns(ReturnsResult)
            .sync_call_readonly();

        let treasury = self
            .blockchain()
            .get_sc_balance(&EgldOrEsdtTokenIdentifier::egld(), 0);
        require!(treasury >= price, ERR_INSUFFICIENT_FUNDS);

        self.tx()
            .to(&marketplace)
            .typed(nft_marketplace_proxy::NftMarketplaceProxy)
            .buy(nft_contract.clone(), nft_id)
            .egld(&price)
            .sync_call();

        self.nft_purchased_event(&marketplace, &nft_contract, nft_id, &price);
    }

    // ========================================================
    // INTERNAL: ballot tally
    // The has-voted flag is checked and set in one step, so the
    // same voter appearing twice in a batch counts once.
    // Returns the weight the ballot was counted with.
    // ========================================================

    fn tally_ballot(
        &self,
        proposal: &mut Proposal<Self::Api>,
        voter: &ManagedAddress,
        support: bool,
    ) -> Result<BigUint<Self::Api>, SkipReason> {
        if !self.members().contains(voter) {
            return Err(SkipReason::NotMember);
        }

        let voted = self.has_voted(proposal.id, voter);
        if voted.get() {
            return Err(SkipReason::AlreadyVoted);
        }
        voted.set(true);

        let mut contributor = self.contributors(voter).get();
        let weight = contributor.vote_weight.clone();

        proposal.votes += 1;
        proposal.total_vote_weight += &weight;
        if support {
            proposal.pro_vote_weight += &weight;
        }

        contributor.vote_count += 1;
        contributor.vote_weight = grow_vote_weight(&weight);
        self.contributors(voter).set(&contributor);

        self.vote_records(proposal.id).push(&VoteRecord {
            voter: voter.clone(),
            support,
            weight: weight.clone(),
        });

        Ok(weight)
    }

    fn require_soak_elapsed(&self, proposal: &Proposal<Self::Api>) {
        let now = self.blockchain().get_block_timestamp();
        require!(
            now >= proposal.created_at + SOAK_PERIOD,
            ERR_SOAK_PERIOD
        );
    }

    // ========================================================
    // INTERNAL: action dispatch
    // ========================================================

    fn dispatch_actions(&self, proposal_id: u64) {
        let actions = self.proposal_actions(proposal_id);

        let mut required = BigUint::zero();
        for action in actions.iter() {
            required += &action.value;
        }
        let treasury = self
            .blockchain()
            .get_sc_balance(&EgldOrEsdtTokenIdentifier::egld(), 0);
        require!(treasury >= required, ERR_INSUFFICIENT_FUNDS);

        for action in actions.iter() {
            self.dispatch_action(action);
        }
    }

    fn dispatch_action(&self, action: ProposalAction<Self::Api>) {
        if action.endpoint.is_empty() {
            self.tx().to(&action.target).egld(&action.value).transfer();
            return;
        }

        let arguments = match decode_call_arguments(&action.payload) {
            Some(arguments) => arguments,
            None => sc_panic!(ERR_INVALID_PARAMETERS),
        };

        self.tx()
            .to(&action.target)
            .egld(&action.value)
            .raw_call(action.endpoint)
            .arguments_raw(ManagedArgBuffer::from(arguments))
            .sync_call();
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(hasVoted)]
    fn has_voted_on(&self, proposal_id: u64, voter: ManagedAddress) -> bool {
        self.has_voted(proposal_id, &voter).get()
    }

    #[view(getVoteRecords)]
    fn get_vote_records(&self, proposal_id: u64) -> MultiValueEncoded<VoteRecord<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for record in self.vote_records(proposal_id).iter() {
            result.push(record);
        }
        result
    }

    /// (minimum stake, soak period, quorum %, proposer vote threshold, vote bonus %)
    #[view(getDaoConfig)]
    fn get_dao_config(&self) -> MultiValue5<BigUint, u64, u64, u64, u64> {
        (
            BigUint::from(MINIMUM_STAKE),
            SOAK_PERIOD,
            QUORUM_PERCENTAGE,
            PROPOSER_VOTE_THRESHOLD,
            VOTE_BONUS_PERCENTAGE,
        )
            .into()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("ballotAccepted")]
    fn ballot_accepted_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] voter: &ManagedAddress,
        #[indexed] support: bool,
        weight: &BigUint,
    );

    #[event("ballotSkipped")]
    fn ballot_skipped_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] batch_index: u64,
        reason: SkipReason,
    );

    #[event("proposalExecuted")]
    fn proposal_executed_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] executor: &ManagedAddress,
    );

    #[event("proposalDefeated")]
    fn proposal_defeated_event(&self, #[indexed] proposal_id: u64);

    #[event("nftPurchased")]
    fn nft_purchased_event(
        &self,
        #[indexed] marketplace: &ManagedAddress,
        #[indexed] nft_contract: &ManagedAddress,
        #[indexed] nft_id: u64,
        price: &BigUint,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("hasVoted")]
    fn has_voted(&self, proposal_id: u64, voter: &ManagedAddress) -> SingleValueMapper<bool>;

    #[storage_mapper("voteRecords")]
    fn vote_records(&self, proposal_id: u64) -> VecMapper<VoteRecord<Self::Api>>;
}

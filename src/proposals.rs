multiversx_sc::imports!();

use crate::errors::{
    ERR_INVALID_PARAMETERS, ERR_INVALID_PROPOSAL, ERR_MEMBER_PROPOSAL_EXISTS,
    ERR_MISSING_FUNCTIONALITY, ERR_PERMISSION,
};
use crate::types::{Contributor, Proposal, ProposalAction, ProposalStatus};

/// Ballots a non-whitelisted address must have cast before it may propose
pub const PROPOSER_VOTE_THRESHOLD: u64 = 5;

#[multiversx_sc::module]
pub trait ProposalsModule: crate::membership::MembershipModule {
    // ========================================================
    // ENDPOINT: propose
    // Four parallel arrays, one entry per action.
    // ========================================================

    #[endpoint(propose)]
    fn propose(
        &self,
        targets: ManagedVec<ManagedAddress>,
        values: ManagedVec<BigUint>,
        payloads: ManagedVec<ManagedBuffer>,
        endpoints: ManagedVec<ManagedBuffer>,
        description: ManagedBuffer,
    ) -> u64 {
        let caller = self.blockchain().get_caller();

        let action_count = targets.len();
        require!(
            values.len() == action_count
                && payloads.len() == action_count
                && endpoints.len() == action_count,
            ERR_INVALID_PARAMETERS
        );
        require!(action_count > 0, ERR_MISSING_FUNCTIONALITY);
        for payload in payloads.iter() {
            require!(
                decode_call_arguments::<Self::Api>(&payload).is_some(),
                ERR_INVALID_PARAMETERS
            );
        }

        let mut proposer = self.contributor_or_empty(&caller);
        require!(
            proposer.whitelisted || proposer.vote_count >= PROPOSER_VOTE_THRESHOLD,
            ERR_PERMISSION
        );
        require!(
            !self.has_open_proposal(&proposer),
            ERR_MEMBER_PROPOSAL_EXISTS
        );

        let proposal_id = self.total_proposals().get() + 1u64;
        let timestamp = self.blockchain().get_block_timestamp();

        let proposal = Proposal {
            id: proposal_id,
            proposer: caller.clone(),
            description,
            status: ProposalStatus::Active,
            votes: 0u64,
            pro_vote_weight: BigUint::zero(),
            total_vote_weight: BigUint::zero(),
            created_at: timestamp,
        };
        self.proposals(proposal_id).set(&proposal);

        let mut actions = self.proposal_actions(proposal_id);
        for index in 0..action_count {
            actions.push(&ProposalAction {
                target: targets.get(index).clone_value(),
                value: values.get(index).clone_value(),
                endpoint: endpoints.get(index).clone_value(),
                payload: payloads.get(index).clone_value(),
            });
        }

        proposer.recent_proposal_id = proposal_id;
        self.contributors(&caller).set(&proposer);
        self.total_proposals().set(proposal_id);

        self.proposal_created_event(proposal_id, &caller, action_count as u64, timestamp);

        proposal_id
    }

    // ========================================================
    // ENDPOINT: cancelProposal
    // ========================================================

    #[endpoint(cancelProposal)]
    fn cancel_proposal(&self, proposal_id: u64) {
        self.require_governor();

        let mut proposal = self.require_active_proposal(proposal_id);
        proposal.status = ProposalStatus::Canceled;
        self.proposals(proposal_id).set(&proposal);

        self.proposal_cancelled_event(proposal_id, &self.blockchain().get_caller());
    }

    fn has_open_proposal(&self, proposer: &Contributor<Self::Api>) -> bool {
        let recent = proposer.recent_proposal_id;
        recent != 0
            && !self.proposals(recent).is_empty()
            && self.proposals(recent).get().status == ProposalStatus::Active
    }

    fn require_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        let mapper = self.proposals(proposal_id);
        require!(!mapper.is_empty(), ERR_INVALID_PROPOSAL);
        mapper.get()
    }

    fn require_active_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        let proposal = self.require_proposal(proposal_id);
        require!(
            proposal.status == ProposalStatus::Active,
            ERR_INVALID_PROPOSAL
        );
        proposal
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getProposal)]
    fn get_proposal(&self, proposal_id: u64) -> Proposal<Self::Api> {
        self.require_proposal(proposal_id)
    }

    #[view(getProposalActions)]
    fn get_proposal_actions(
        &self,
        proposal_id: u64,
    ) -> MultiValueEncoded<ProposalAction<Self::Api>> {
        let mut result = MultiValueEncoded::new();
        for action in self.proposal_actions(proposal_id).iter() {
            result.push(action);
        }
        result
    }

    /// Up to `count` proposals, ids ascending from `from` (ids start at 1).
    #[view(getProposals)]
    fn get_proposals(&self, from: u64, count: u64) -> MultiValueEncoded<Proposal<Self::Api>> {
        self.collect_proposals(from, count, false)
    }

    /// Like `getProposals`, but counts and returns only Active proposals.
    #[view(getActiveProposals)]
    fn get_active_proposals(
        &self,
        from: u64,
        count: u64,
    ) -> MultiValueEncoded<Proposal<Self::Api>> {
        self.collect_proposals(from, count, true)
    }

    fn collect_proposals(
        &self,
        from: u64,
        count: u64,
        active_only: bool,
    ) -> MultiValueEncoded<Proposal<Self::Api>> {
        let mut page = MultiValueEncoded::new();
        let last_id = self.total_proposals().get();

        let mut id = from.max(1);
        let mut taken = 0u64;
        while taken < count && id <= last_id {
            let proposal = self.proposals(id).get();
            if !active_only || proposal.status == ProposalStatus::Active {
                page.push(proposal);
                taken += 1;
            }
            id += 1;
        }
        page
    }

    #[view(getTotalProposals)]
    fn get_total_proposals(&self) -> u64 {
        self.total_proposals().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("proposalCreated")]
    fn proposal_created_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] proposer: &ManagedAddress,
        #[indexed] action_count: u64,
        timestamp: u64,
    );

    #[event("proposalCancelled")]
    fn proposal_cancelled_event(
        &self,
        #[indexed] proposal_id: u64,
        #[indexed] governor: &ManagedAddress,
    );

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("totalProposals")]
    fn total_proposals(&self) -> SingleValueMapper<u64>;

    #[storage_mapper("proposals")]
    fn proposals(&self, id: u64) -> SingleValueMapper<Proposal<Self::Api>>;

    #[storage_mapper("proposalActions")]
    fn proposal_actions(&self, proposal_id: u64) -> VecMapper<ProposalAction<Self::Api>>;
}

/// Splits a stored payload into raw call arguments. The payload is the
/// top-encoding of a list of buffers; an empty payload means no arguments.
pub fn decode_call_arguments<M: ManagedTypeApi>(
    payload: &ManagedBuffer<M>,
) -> Option<ManagedVec<M, ManagedBuffer<M>>> {
    ManagedVec::<M, ManagedBuffer<M>>::top_decode(payload.clone()).ok()
}

multiversx_sc::imports!();

use crate::errors::{ERR_INSUFFICIENT_FUNDS, ERR_MEMBER_EXISTS, ERR_NOT_MEMBER, ERR_PERMISSION};
use crate::types::Contributor;

/// 1 EGLD, the smallest stake accepted on join
pub const MINIMUM_STAKE: u64 = 1_000_000_000_000_000_000;

/// Each accepted ballot multiplies the voter's weight by 105/100
pub const VOTE_BONUS_NUMERATOR: u64 = 105;
pub const VOTE_BONUS_DENOMINATOR: u64 = 100;

/// Reputation growth applied after a ballot is counted. Integer division,
/// so the fractional part is dropped.
pub fn grow_vote_weight<M: ManagedTypeApi>(weight: &BigUint<M>) -> BigUint<M> {
    (weight * VOTE_BONUS_NUMERATOR) / VOTE_BONUS_DENOMINATOR
}

#[multiversx_sc::module]
pub trait MembershipModule {
    // ========================================================
    // ENDPOINT: becomeMember
    // ========================================================

    #[payable("EGLD")]
    #[endpoint(becomeMember)]
    fn become_member(&self) {
        let caller = self.blockchain().get_caller();
        let stake = self.call_value().egld_value().clone_value();

        require!(stake >= MINIMUM_STAKE, ERR_INSUFFICIENT_FUNDS);
        require!(!self.members().contains(&caller), ERR_MEMBER_EXISTS);

        // The record may already exist if the governor whitelisted this
        // address before it joined.
        let mut contributor = self.contributor_or_empty(&caller);
        contributor.contribution = stake.clone();
        contributor.vote_weight = stake.clone();
        self.contributors(&caller).set(&contributor);

        self.members().insert(caller.clone());
        self.total_contributions().update(|total| *total += &stake);

        self.member_joined_event(&caller, &stake);
    }

    // ========================================================
    // ENDPOINT: increaseStake
    // Raises the contribution only. Vote weight grows through
    // participation, never through capital added after joining.
    // ========================================================

    #[payable("EGLD")]
    #[endpoint(increaseStake)]
    fn increase_stake(&self) {
        let caller = self.blockchain().get_caller();
        let amount = self.call_value().egld_value().clone_value();

        require!(self.members().contains(&caller), ERR_NOT_MEMBER);

        self.contributors(&caller)
            .update(|contributor| contributor.contribution += &amount);
        self.total_contributions().update(|total| *total += &amount);

        self.stake_increased_event(&caller, &amount);
    }

    // ========================================================
    // ENDPOINT: whitelistAddress
    // ========================================================

    #[endpoint(whitelistAddress)]
    fn whitelist_address(&self, address: ManagedAddress) {
        self.require_governor();

        let mut contributor = self.contributor_or_empty(&address);
        contributor.whitelisted = true;
        self.contributors(&address).set(&contributor);

        self.address_whitelisted_event(&address);
    }

    fn require_governor(&self) {
        let caller = self.blockchain().get_caller();
        require!(caller == self.governor().get(), ERR_PERMISSION);
    }

    fn contributor_or_empty(&self, address: &ManagedAddress) -> Contributor<Self::Api> {
        let mapper = self.contributors(address);
        if mapper.is_empty() {
            Contributor::empty()
        } else {
            mapper.get()
        }
    }

    // ========================================================
    // VIEWS
    // ========================================================

    #[view(getContributor)]
    fn get_contributor(&self, address: ManagedAddress) -> Contributor<Self::Api> {
        self.contributor_or_empty(&address)
    }

    #[view(isMember)]
    fn is_member(&self, address: ManagedAddress) -> bool {
        self.members().contains(&address)
    }

    #[view(getTotalMembers)]
    fn get_total_members(&self) -> u64 {
        self.members().len() as u64
    }

    #[view(getTotalContributions)]
    fn get_total_contributions(&self) -> BigUint {
        self.total_contributions().get()
    }

    #[view(getGovernor)]
    fn get_governor(&self) -> ManagedAddress {
        self.governor().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("memberJoined")]
    fn member_joined_event(&self, #[indexed] member: &ManagedAddress, stake: &BigUint);

    #[event("stakeIncreased")]
    fn stake_increased_event(&self, #[indexed] member: &ManagedAddress, amount: &BigUint);

    #[event("addressWhitelisted")]
    fn address_whitelisted_event(&self, #[indexed] address: &ManagedAddress);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("governor")]
    fn governor(&self) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("contributors")]
    fn contributors(&self, address: &ManagedAddress) -> SingleValueMapper<Contributor<Self::Api>>;

    #[storage_mapper("members")]
    fn members(&self) -> UnorderedSetMapper<ManagedAddress>;

    #[storage_mapper("totalContributions")]
    fn total_contributions(&self) -> SingleValueMapper<BigUint>;
}

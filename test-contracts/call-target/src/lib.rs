#![no_std]

multiversx_sc::imports!();

/// Stand-in for an arbitrary contract a proposal calls into. Remembers the
/// last accepted call so tests can see what the DAO dispatched.
#[multiversx_sc::contract]
pub trait CallTarget {
    #[init]
    fn init(&self) {}

    #[payable("EGLD")]
    #[endpoint(recordCall)]
    fn record_call(&self, label: ManagedBuffer, amount: u64) {
        let paid = self.call_value().egld_value().clone_value();

        self.last_caller().set(self.blockchain().get_caller());
        self.last_label().set(label);
        self.last_amount().set(amount);
        self.total_received().update(|total| *total += &paid);
    }

    #[endpoint(rejectCall)]
    fn reject_call(&self) {
        sc_panic!("call rejected");
    }

    #[view(getLastCaller)]
    #[storage_mapper("lastCaller")]
    fn last_caller(&self) -> SingleValueMapper<ManagedAddress>;

    #[view(getLastLabel)]
    #[storage_mapper("lastLabel")]
    fn last_label(&self) -> SingleValueMapper<ManagedBuffer>;

    #[view(getLastAmount)]
    #[storage_mapper("lastAmount")]
    fn last_amount(&self) -> SingleValueMapper<u64>;

    #[view(getTotalReceived)]
    #[storage_mapper("totalReceived")]
    fn total_received(&self) -> SingleValueMapper<BigUint>;
}

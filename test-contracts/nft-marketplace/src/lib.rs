#![no_std]

multiversx_sc::imports!();

/// Fixed-price listings, keyed by (nft contract, nft id). Answers the
/// `getPrice` / `buy` calls the DAO makes through its marketplace proxy.
#[multiversx_sc::contract]
pub trait NftMarketplace {
    #[init]
    fn init(&self) {}

    #[endpoint(listNft)]
    fn list_nft(&self, nft_contract: ManagedAddress, nft_id: u64, price: BigUint) {
        self.prices(nft_contract, nft_id).set(price);
    }

    #[view(getPrice)]
    fn get_price(&self, nft_contract: ManagedAddress, nft_id: u64) -> BigUint {
        let price = self.prices(nft_contract, nft_id);
        require!(!price.is_empty(), "not listed");
        price.get()
    }

    #[payable("EGLD")]
    #[endpoint(buy)]
    fn buy(&self, nft_contract: ManagedAddress, nft_id: u64) {
        let price = self.get_price(nft_contract.clone(), nft_id);
        let payment = self.call_value().egld_value().clone_value();
        require!(payment == price, "wrong payment");

        self.owner(nft_contract.clone(), nft_id)
            .set(self.blockchain().get_caller());
        self.prices(nft_contract, nft_id).clear();
    }

    #[view(getOwner)]
    #[storage_mapper("owner")]
    fn owner(&self, nft_contract: ManagedAddress, nft_id: u64) -> SingleValueMapper<ManagedAddress>;

    #[storage_mapper("prices")]
    fn prices(&self, nft_contract: ManagedAddress, nft_id: u64) -> SingleValueMapper<BigUint>;
}

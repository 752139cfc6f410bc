multiversx_sc::imports!();

use ed25519_dalek::{Signature, VerifyingKey};

use crate::errors::ERR_SIGNATURE_VOTING_DISABLED;
use crate::types::BallotSignature;

pub const DOMAIN_NAME: &[u8] = b"WeightedDAO";
pub const DOMAIN_VERSION: &[u8] = b"1";

const DOMAIN_TYPE_TAG: &[u8] =
    b"Domain(string name,string version,bytes chainId,address verifyingContract)";
const BALLOT_TYPE_TAG: &[u8] = b"Ballot(uint64 proposalId,bool support)";
const DIGEST_PREFIX: &[u8] = &[0x19, 0x01];

const ED25519_SIGNATURE_LEN: usize = 64;

pub type BallotDigest = [u8; 32];

/// Typed, domain-separated ballot digests and their signature check.
#[multiversx_sc::module]
pub trait BallotModule: crate::membership::MembershipModule {
    // ========================================================
    // ENDPOINT: disableSignatureVoting
    // One-way switch. Direct ballots remain available.
    // ========================================================

    #[endpoint(disableSignatureVoting)]
    fn disable_signature_voting(&self) {
        self.require_governor();

        if !self.signature_voting_disabled().get() {
            self.signature_voting_disabled().set(true);
            self.signature_voting_disabled_event(&self.blockchain().get_caller());
        }
    }

    fn require_signature_voting_enabled(&self) {
        require!(
            !self.signature_voting_disabled().get(),
            ERR_SIGNATURE_VOTING_DISABLED
        );
    }

    // ========================================================
    // INTERNAL: digest construction
    //
    // digest = keccak(0x19 0x01 ‖ domainSeparator ‖ structHash)
    // ========================================================

    fn domain_separator(&self) -> ManagedByteArray<Self::Api, 32> {
        let mut encoded = ManagedBuffer::new();
        encoded.append(self.keccak_of(DOMAIN_TYPE_TAG).as_managed_buffer());
        encoded.append(self.keccak_of(DOMAIN_NAME).as_managed_buffer());
        encoded.append(self.keccak_of(DOMAIN_VERSION).as_managed_buffer());
        encoded.append(
            self.crypto()
                .keccak256(&self.chain_id().get())
                .as_managed_buffer(),
        );
        encoded.append(self.blockchain().get_sc_address().as_managed_buffer());

        self.crypto().keccak256(&encoded)
    }

    fn ballot_struct_hash(&self, proposal_id: u64, support: bool) -> ManagedByteArray<Self::Api, 32> {
        let mut encoded = ManagedBuffer::new();
        encoded.append(self.keccak_of(BALLOT_TYPE_TAG).as_managed_buffer());
        encoded.append_bytes(&proposal_id.to_be_bytes());
        encoded.append_bytes(&[support as u8]);

        self.crypto().keccak256(&encoded)
    }

    fn ballot_digest(&self, proposal_id: u64, support: bool) -> ManagedByteArray<Self::Api, 32> {
        let mut encoded = ManagedBuffer::new_from_bytes(DIGEST_PREFIX);
        encoded.append(self.domain_separator().as_managed_buffer());
        encoded.append(
            self.ballot_struct_hash(proposal_id, support)
                .as_managed_buffer(),
        );

        self.crypto().keccak256(&encoded)
    }

    fn keccak_of(&self, data: &[u8]) -> ManagedByteArray<Self::Api, 32> {
        self.crypto().keccak256(ManagedBuffer::new_from_bytes(data))
    }

    // ========================================================
    // INTERNAL: signer recovery
    // Returns None on any malformed or unverifiable input; never panics.
    // ========================================================

    fn recover_ballot_signer(
        &self,
        ballot: &BallotSignature<Self::Api>,
        digest: &BallotDigest,
    ) -> Option<ManagedAddress> {
        if ballot.signature.len() != ED25519_SIGNATURE_LEN {
            return None;
        }

        let mut signature_bytes = [0u8; ED25519_SIGNATURE_LEN];
        ballot.signature.load_slice(0, &mut signature_bytes).ok()?;

        let verifying_key = VerifyingKey::from_bytes(&ballot.signer.to_byte_array()).ok()?;
        let signature = Signature::from_bytes(&signature_bytes);
        verifying_key.verify_strict(digest, &signature).ok()?;

        Some(ballot.signer.clone())
    }

    // ========================================================
    // VIEWS
    // ========================================================

    /// The exact 32 bytes a member signs to vote on `proposal_id`.
    #[view(getBallotDigest)]
    fn get_ballot_digest(&self, proposal_id: u64, support: bool) -> ManagedByteArray<Self::Api, 32> {
        self.ballot_digest(proposal_id, support)
    }

    #[view(isSignatureVotingEnabled)]
    fn is_signature_voting_enabled(&self) -> bool {
        !self.signature_voting_disabled().get()
    }

    #[view(getChainId)]
    fn get_chain_id(&self) -> ManagedBuffer {
        self.chain_id().get()
    }

    // ========================================================
    // EVENTS
    // ========================================================

    #[event("signatureVotingDisabled")]
    fn signature_voting_disabled_event(&self, #[indexed] governor: &ManagedAddress);

    // ========================================================
    // STORAGE
    // ========================================================

    #[storage_mapper("chainId")]
    fn chain_id(&self) -> SingleValueMapper<ManagedBuffer>;

    #[storage_mapper("signatureVotingDisabled")]
    fn signature_voting_disabled(&self) -> SingleValueMapper<bool>;
}

pub const ERR_INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
pub const ERR_MEMBER_EXISTS: &str = "MEMBER_EXISTS";
pub const ERR_NOT_MEMBER: &str = "NOT_MEMBER";
pub const ERR_PERMISSION: &str = "PERMISSION_ERROR";
pub const ERR_INVALID_PARAMETERS: &str = "INVALID_PARAMETERS";
pub const ERR_MISSING_FUNCTIONALITY: &str = "MISSING_FUNCTIONALITY";
pub const ERR_MEMBER_PROPOSAL_EXISTS: &str = "MEMBER_PROPOSAL_EXISTS";
pub const ERR_INVALID_PROPOSAL: &str = "INVALID_PROPOSAL";
pub const ERR_QUORUM: &str = "QUORUM";
pub const ERR_PROPOSAL_REJECTED: &str = "PROPOSAL_REJECTED";
pub const ERR_PROPOSAL_PASSED: &str = "PROPOSAL_PASSED";
pub const ERR_SOAK_PERIOD: &str = "SOAK_PERIOD";
pub const ERR_ALREADY_VOTED: &str = "ALREADY_VOTED";
pub const ERR_SIGNATURE_VOTING_DISABLED: &str = "SIGNATURE_VOTING_DISABLED";

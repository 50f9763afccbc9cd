/*
 * Responsibility
 * - Token issue/verify (token_codec), credential hashing (password)
 * - TokenAuthority: the issue/validate contract (authority)
 * - TokenValidator: polymorphic delegation seam, local and remote (validator)
 */
pub mod authority;
pub mod password;
pub mod store;
pub mod token_codec;
pub mod validator;

pub use authority::TokenAuthority;
pub use store::{AccountRecord, AccountStore};
pub use token_codec::{Identity, TokenCodec};
pub use validator::{LocalValidator, RemoteValidator, TokenValidator, ValidationOutcome};

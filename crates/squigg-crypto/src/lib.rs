/// Squigg Crypto Library
///
/// Credential hashing keyed by the process-wide secret, plus the random
/// identifiers handed out to new users and squiggs.
pub mod hash;
pub mod ids;

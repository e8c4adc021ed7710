//! # Outbound Ports (Driven Ports / SPI)
//!
//! Dependencies this subsystem needs: the ledger lookups that resolve an
//! account or content object to the authorities that govern it.

use crate::domain::errors::AuthorityError;
use shared_types::Authority;

/// Ledger-side resolution of authorities.
///
/// Verification is pure given this port: it never mutates state and never
/// touches anything in the ledger beyond these five lookups.
pub trait AuthorityResolver {
    /// The owner authority of an account. Fails with
    /// [`AuthorityError::UnknownAccount`] if the account does not exist.
    fn owner_authority(&self, account: &str) -> Result<Authority, AuthorityError>;

    /// The active authority of an account.
    fn active_authority(&self, account: &str) -> Result<Authority, AuthorityError>;

    /// The basic authority of an account.
    fn basic_authority(&self, account: &str) -> Result<Authority, AuthorityError>;

    /// The master management authority of a content object. Fails with
    /// [`AuthorityError::UnknownContent`] if the content does not exist.
    fn master_authority(&self, url: &str) -> Result<Authority, AuthorityError>;

    /// The comp management authority of a content object.
    fn comp_authority(&self, url: &str) -> Result<Authority, AuthorityError>;
}

impl<R: AuthorityResolver + ?Sized> AuthorityResolver for &R {
    fn owner_authority(&self, account: &str) -> Result<Authority, AuthorityError> {
        (**self).owner_authority(account)
    }

    fn active_authority(&self, account: &str) -> Result<Authority, AuthorityError> {
        (**self).active_authority(account)
    }

    fn basic_authority(&self, account: &str) -> Result<Authority, AuthorityError> {
        (**self).basic_authority(account)
    }

    fn master_authority(&self, url: &str) -> Result<Authority, AuthorityError> {
        (**self).master_authority(url)
    }

    fn comp_authority(&self, url: &str) -> Result<Authority, AuthorityError> {
        (**self).comp_authority(url)
    }
}

//! Domain ports defining the edges of the hexagon.
//!
//! Driven ports (`*Repository`, [`CredentialHasher`]) describe what the
//! domain needs from storage and crypto adapters. Driving ports
//! ([`AccountCommand`], [`LinktreeCommand`], [`LinktreeQuery`]) are what the
//! HTTP adapter calls. Each driven port exposes a typed error enum so
//! adapters map their failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod account_command;
mod credential_hasher;
mod linktree_command;
mod linktree_repository;
mod user_repository;

#[cfg(test)]
pub use account_command::MockAccountCommand;
pub use account_command::{AccountCommand, LoggedIn, SignedUpAccount};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHasher};
#[cfg(test)]
pub use linktree_command::{MockLinktreeCommand, MockLinktreeQuery};
pub use linktree_command::{LinktreeCommand, LinktreeQuery, NewLinktree};
#[cfg(test)]
pub use linktree_repository::MockLinktreeRepository;
pub use linktree_repository::{LinktreePersistenceError, LinktreeRepository};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{NewUser, StoredCredentials, UserPersistenceError, UserRepository};

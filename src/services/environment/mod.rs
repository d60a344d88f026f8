/*!
 * Environment resolution
 *
 * Responsibility:
 * - Turn the caller's credentials (session bearer or share token) into an AccessContext
 * - Keep store access behind ShareLookup / UserLookup so checks stay testable
 */
mod lookup;
pub mod password;
mod path;
mod resolver;
mod types;

pub use lookup::{PgDirectory, ShareLookup, UserLookup};
pub use path::{PathError, ResourcePath};
pub use resolver::EnvironmentResolver;
pub use types::{AccessContext, AccessScope, Capability, CapabilitySet, Credentials, Share};

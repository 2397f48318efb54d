pub mod errors;
pub mod events;
pub mod hooks;
pub mod id;
pub mod store;

pub use errors::{ConfigError, StoreError, StyleKitError};
pub use events::{Event, EventBus};
pub use hooks::{
    AnonymousIdentity, CacheInvalidator, CountingInvalidator, FixedIdentity, IdentityResolver,
    NoopInvalidator,
};
pub use id::{new_revision_id, utc_timestamp};
pub use store::{JsonFileStore, MemoryStore, OptionStore};

pub type Result<T> = std::result::Result<T, StyleKitError>;

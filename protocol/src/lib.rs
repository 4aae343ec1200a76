//! Wire types shared between trigger sites, the resolution engine and the
//! navigation host.
//!
//! Everything here is plain data: the envelope a trigger sends, the ack it
//! gets back, the command handed to the host, and the parsed directory
//! record. Behavior lives in `airoute-core`.

pub mod directory;
pub mod message;
pub mod navigation;

pub use directory::DirectoryRecord;
pub use message::Ack;
pub use message::TriggerEnvelope;
pub use message::TriggerMessage;
pub use navigation::NavigationCommand;
pub use navigation::TabId;
pub use navigation::TabTarget;

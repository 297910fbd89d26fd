//! Fleet sessions and addressing
//!
//! Session records, the rig prefix registry, address resolution in both
//! directions, and the freshness gate used when planning nudges.

pub mod address;
pub mod freshness;
pub mod nudge;
pub mod registry;
pub mod session;

pub use address::{
    resolve_pattern, session_name_to_address, Address, AddressResolver, NameSelector,
    RigSelector,
};
pub use freshness::{is_fresh, FRESH_MAX_AGE};
pub use nudge::{NudgePlan, NudgeTarget, SuppressedTarget};
pub use registry::{default_registry, set_default_registry, PrefixRegistry, TOWN_PREFIX};
pub use session::{load_sessions, parse_sessions, AgentSession, AgentType};

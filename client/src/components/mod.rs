//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Components render app chrome and route guards. They receive the session
//! handles through `AppServices` props rather than context lookups.

pub mod nav_bar;
pub mod protected_route;

//! Roster and point tracking for a sports club: teams, players, training
//! sessions with attendance and bonus points, and the derived statistics the
//! desktop shell renders. State lives in one JSON document under the user's
//! data directory; every mutation is written through before it returns.

pub mod model;
pub mod persist;
pub mod stats;
pub mod store;

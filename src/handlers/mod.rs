// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth, plus ownership for post mutations)

pub mod protected;
pub mod public;

pub mod profile; // GET /api/auth/me

pub use profile::profile_get;

// handlers/mod.rs - Two security tiers
//
// Public (no credential) → Protected (verified caller, ownership-guarded entities)
pub mod protected; // Verified caller required
pub mod public; // No authentication required

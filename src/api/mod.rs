// ============================================================================
// Module : api
// ============================================================================
// Ce module contient le client Yahoo Finance et son cache de session :
// barres de prix, snapshot quoteSummary, composition de fonds, options.
// ============================================================================

pub mod cache;  // Cache mémoire des réponses (fichier cache.rs)
pub mod yahoo;  // Client API Yahoo Finance (fichier yahoo.rs)

// Re-export des types principaux
pub use cache::{CacheKey, RequestKind, SessionCache};
pub use yahoo::YahooClient;

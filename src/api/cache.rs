// ============================================================================
// Cache de session
// ============================================================================
// Mémorise les réponses JSON brutes de Yahoo Finance pour la durée de la
// session : changer d'onglet ou revenir sur une fenêtre déjà vue ne refait
// pas d'appel réseau. Le rechargement manuel ('r') vide le cache du symbole.
//
// CONCEPTS RUST :
// 1. HashMap : table de hachage clé → valeur de la bibliothèque standard
// 2. derive(Hash, Eq) : une struct utilisable comme clé de HashMap
// 3. Entry API implicite via get/insert : lecture puis écriture séparées
// ============================================================================

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

/// Famille de requête, partie de la clé de cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// quoteSummary fusionné (Summary, Statistics, Profile, ...)
    Snapshot,
    /// Série de bougies v8/chart
    Bars,
    /// Chaîne d'options d'une échéance (échéances incluses)
    OptionsChain,
    /// Modules de composition d'un fonds
    FundComposition,
}

/// Clé complète : même symbole + même endpoint + mêmes paramètres
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub symbol: String,
    pub kind: RequestKind,
    /// Paramètres discriminants ("1d/5m", "exp=1718928000", "" si aucun)
    pub params: String,
}

impl CacheKey {
    pub fn new(symbol: &str, kind: RequestKind, params: impl Into<String>) -> Self {
        Self {
            symbol: symbol.to_string(),
            kind,
            params: params.into(),
        }
    }
}

/// Cache mémoire sans expiration : la durée de vie est celle de la session
#[derive(Debug, Default)]
pub struct SessionCache {
    entries: HashMap<CacheKey, Value>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Réponse mémorisée pour cette clé, si déjà vue
    pub fn get(&self, key: &CacheKey) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: CacheKey, payload: Value) {
        self.entries.insert(key, payload);
    }

    /// Oublie toutes les réponses d'un symbole (rechargement manuel)
    pub fn clear_symbol(&mut self, symbol: &str) {
        let before = self.entries.len();
        self.entries.retain(|key, _| key.symbol != symbol);
        debug!(
            symbol = %symbol,
            evicted = before - self.entries.len(),
            "Cleared cached responses for symbol"
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_hit_requires_same_params() {
        let mut cache = SessionCache::new();
        let key_1d = CacheKey::new("AAPL", RequestKind::Bars, "1d/2m");
        cache.insert(key_1d.clone(), json!({"range": "1d"}));

        // Même symbole, même endpoint, paramètres différents : miss
        let key_5d = CacheKey::new("AAPL", RequestKind::Bars, "5d/15m");
        assert!(cache.get(&key_5d).is_none());
        assert_eq!(cache.get(&key_1d), Some(&json!({"range": "1d"})));
    }

    #[test]
    fn test_kind_discriminates() {
        let mut cache = SessionCache::new();
        cache.insert(CacheKey::new("VTI", RequestKind::Snapshot, ""), json!(1));
        assert!(cache
            .get(&CacheKey::new("VTI", RequestKind::FundComposition, ""))
            .is_none());
    }

    #[test]
    fn test_clear_symbol_keeps_others() {
        let mut cache = SessionCache::new();
        cache.insert(CacheKey::new("AAPL", RequestKind::Snapshot, ""), json!(1));
        cache.insert(CacheKey::new("AAPL", RequestKind::Bars, "1d/2m"), json!(2));
        cache.insert(CacheKey::new("MSFT", RequestKind::Snapshot, ""), json!(3));

        cache.clear_symbol("AAPL");
        assert_eq!(cache.len(), 1);
        assert!(cache
            .get(&CacheKey::new("MSFT", RequestKind::Snapshot, ""))
            .is_some());
    }
}

// ============================================================================
// Erreurs de l'adaptateur de données
// ============================================================================
// Taxonomie volontairement courte : chaque section du dashboard échoue
// indépendamment, une erreur n'est jamais fatale au process.
//
// CONCEPTS RUST :
// 1. thiserror : derive #[error(...)] pour impl Display + std::error::Error
// 2. #[from] : conversion automatique via l'opérateur ?
// ============================================================================

use thiserror::Error;

/// Erreurs renvoyées par l'adaptateur de données
///
/// - `NotFound` stoppe le chargement du symbole courant (affiché plein écran)
/// - les autres variantes restent locales à leur section (warning d'onglet)
///
/// L'absence d'un champ isolé dans un snapshot n'est PAS une erreur : les
/// getters renvoient `Option::None` et la couche d'aplatissement saute la
/// ligne silencieusement.
#[derive(Debug, Error)]
pub enum DataError {
    /// Symbole inconnu ou retiré de la cote
    #[error("symbole introuvable : {symbol}")]
    NotFound { symbol: String },

    /// Symbole valide mais aucune barre dans la fenêtre demandée
    #[error("aucune donnée dans la fenêtre demandée")]
    NoDataInWindow,

    /// Échec réseau / transport
    #[error("requête HTTP échouée")]
    Http(#[from] reqwest::Error),

    /// Réponse du provider malformée ou portant un objet d'erreur
    #[error("réponse provider invalide : {0}")]
    Provider(String),
}

impl DataError {
    /// true si l'erreur doit interrompre le chargement du symbole entier
    pub fn halts_symbol(&self) -> bool {
        matches!(self, DataError::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let err = DataError::NotFound {
            symbol: "ZZZZ".to_string(),
        };
        assert_eq!(err.to_string(), "symbole introuvable : ZZZZ");
        assert!(err.halts_symbol());
    }

    #[test]
    fn test_section_errors_do_not_halt() {
        assert!(!DataError::NoDataInWindow.halts_symbol());
        assert!(!DataError::Provider("oops".to_string()).halts_symbol());
    }
}

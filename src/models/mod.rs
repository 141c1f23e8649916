// ============================================================================
// Module : models
// ============================================================================
// Ce module contient toutes les structures de données de l'application
//
// CONCEPT RUST : Modules et visibilité
// - "pub mod" : déclare un sous-module publique (accessible depuis l'extérieur)
// - Sans "pub", le module serait privé au crate
// ============================================================================

pub mod aggregate;  // Ré-échantillonnage quotidien/hebdomadaire/mensuel (fichier aggregate.rs)
pub mod annotate;   // Synthèse de la fenêtre affichée (fichier annotate.rs)
pub mod attributes; // Aplatissement snapshot → lignes label/valeur (fichier attributes.rs)
pub mod bar;        // Bougies OHLCV et séries (fichier bar.rs)
pub mod error;      // Erreurs typées de la couche données (fichier error.rs)
pub mod holdings;   // Composition des fonds et ETF (fichier holdings.rs)
pub mod options;    // Chaînes d'options calls/puts (fichier options.rs)
pub mod snapshot;   // Snapshot quoteSummary fusionné (fichier snapshot.rs)
pub mod window;     // Fenêtres de graphique et leurs politiques (fichier window.rs)

// Re-export des structures principales pour simplifier les imports
// Au lieu de : use lazyquote::models::bar::BarSeries;
// On peut faire : use lazyquote::models::BarSeries;
pub use aggregate::{aggregate, AggregatedRow, AggregatedSeries, Frequency};
pub use annotate::{annotate, WindowAnnotation};
pub use attributes::{flatten, AttributeSpec, FieldFormat};
pub use bar::{Bar, BarSeries, Interval, RangePeriod};
pub use error::DataError;
pub use holdings::{FundComposition, TopHolding};
pub use options::{combine_chain, CombinedRow, OptionChain, OptionQuote};
pub use snapshot::{KeyExecutive, QuoteSnapshot};
pub use window::{available_windows, select_policy, Window, WindowPolicy, MIN_INTRADAY_BARS};

// ============================================================================
// Module : ui
// ============================================================================
// Gère toute l'interface utilisateur (Terminal User Interface)
// ============================================================================

pub mod candlestick; // Rendu des chandeliers japonais (Unicode text)
pub mod chart;       // Rendu de l'onglet graphique (ligne, aire, chandeliers)
pub mod dashboard;   // Rendu de l'interface principale à onglets
pub mod events;      // Gestion des événements clavier
pub mod table;       // Helpers partagés : tables label/valeur, placeholders

// Re-exports pour simplifier les imports
pub use dashboard::render;
pub use events::{Event, EventHandler};

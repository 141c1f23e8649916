// ============================================================================
// LazyQuote - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;       // Client Yahoo Finance
pub mod models;    // Structures de données
pub mod app;       // État de l'application
pub mod ui;        // Interface utilisateur

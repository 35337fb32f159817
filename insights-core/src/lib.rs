// insights-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contrats d'entrée des données (DatasetReader)
pub mod ports;

// 2. Domain (Cœur du métier)
// Profilage, qualité, rôles, templates, alertes.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB, fichiers de config, état JSON, Jinja
pub mod infrastructure;

// 4. Application (Use Cases)
// Analyse, alerting, scan de répertoire, nettoyage
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::{ErrorCategory, ErrorGuidance, InsightsError, RecoveryAction};

//! Étiqueteur exact de fonctions L
//! -------------------------------
//! Dérive une pré-étiquette canonique (et ses tableaux numériques dérivés)
//! à partir des invariants analytiques d'une fonction L : degré, conducteur,
//! caractère central, poids motivique, algébricité et paramètres gamma.
//!
//! Tout le calcul est EXACT (rationnels, sans flottants) : les littéraux
//! décimaux conservent leur texte source et se re-rendent octet pour octet.
//!
//! Frontière du noyau : "ligne décodée en entrée, ligne enrichie en sortie".
//! Aucun réseau, aucun fichier, aucune CLI ici ; les deux collaborateurs
//! externes (réduction du caractère central, conducteur analytique) sont
//! injectés par l'appelant.

pub mod noyau;

pub use noyau::caractere::{CacheCaracteres, ReducteurCaractere, ReducteurIdentite};
pub use noyau::erreurs::Erreur;
pub use noyau::ligne::{traite_ligne, ConducteurAnalytique, ConducteurBrut};

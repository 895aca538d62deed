//! Noyau exact d'étiquetage
//!
//! Organisation interne :
//! - erreurs.rs   : erreurs typées du pipeline
//! - litteral.rs  : littéraux réels/complexes exacts (texte source conservé)
//! - canon.rs     : canonicalisation spectrale (fusion, tri, facteur de bloc)
//! - etiquette.rs : assemblage de la pré-étiquette + premiers du conducteur
//! - caractere.rs : frontière du réducteur de caractère central + mémo
//! - champs.rs    : codec des enregistrements plats ('|')
//! - ligne.rs     : pipeline complet par enregistrement

pub mod canon;
pub mod caractere;
pub mod champs;
pub mod erreurs;
pub mod etiquette;
pub mod ligne;
pub mod litteral;

#[cfg(test)]
mod tests_etiquettes;

// API publique minimale
pub use ligne::traite_ligne;

// src/noyau/erreurs.rs
//
// Erreurs du pipeline d'étiquetage.
// - LitteralInvalide  : texte qui ne matche ni un réel ni un complexe valide
// - InvariantDegre    : degré ≠ |GR| + 2|GC| après normalisation (donnée corrompue)
// - TypeIncompatible  : un champ brut non convertible vers son type déclaré
// - LigneInvalide     : structure de ligne inexploitable (arité, crochets…)
//
// Tout se propage en synchrone via `?` : aucun retry, aucune sortie partielle
// pour un enregistrement en échec.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Erreur {
    #[error("littéral invalide: '{0}'")]
    LitteralInvalide(String),

    #[error("invariant de degré violé: degré={degre}, |GR|={gr}, |GC|={gc}")]
    InvariantDegre { degre: i64, gr: usize, gc: usize },

    #[error("champ '{champ}': valeur '{valeur}' non convertible en {attendu}")]
    TypeIncompatible {
        champ: &'static str,
        valeur: String,
        attendu: &'static str,
    },

    #[error("ligne invalide: {0}")]
    LigneInvalide(String),
}

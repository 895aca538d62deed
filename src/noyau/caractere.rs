// src/noyau/caractere.rs
//
// Frontière du réducteur de caractère central.
//
// La construction des groupes de Dirichlet vit hors du noyau : ici on ne
// consomme que le contrat "primitivise('modulus.number') -> 'modulus.number'",
// déterministe, avec un modulus de sortie divisant celui d'entrée.
//
// CacheCaracteres : mémo en lecture traversante, strictement additif (jamais
// invalidé), clé = étiquette complète. Un Mutex suffit : calcul-une-fois par
// clé même si l'appelant parallélise les enregistrements.

use std::collections::HashMap;
use std::sync::Mutex;

use super::erreurs::Erreur;

pub trait ReducteurCaractere {
    fn primitivise(&self, etiquette: &str) -> Result<String, Erreur>;
}

/// Réducteur identité : valable quand le caractère central est déjà primitif
/// (cas du caractère trivial "1.1"). Sert aussi de collaborateur de test.
pub struct ReducteurIdentite;

impl ReducteurCaractere for ReducteurIdentite {
    fn primitivise(&self, etiquette: &str) -> Result<String, Erreur> {
        Ok(etiquette.to_string())
    }
}

/// Mémo additif autour d'un réducteur quelconque.
pub struct CacheCaracteres<R> {
    interne: R,
    memo: Mutex<HashMap<String, String>>,
}

impl<R> CacheCaracteres<R> {
    pub fn new(interne: R) -> Self {
        Self {
            interne,
            memo: Mutex::new(HashMap::new()),
        }
    }
}

impl<R: ReducteurCaractere> ReducteurCaractere for CacheCaracteres<R> {
    fn primitivise(&self, etiquette: &str) -> Result<String, Erreur> {
        {
            let memo = self.memo.lock().expect("mutex cache caractères");
            if let Some(v) = memo.get(etiquette) {
                return Ok(v.clone());
            }
        }

        // calcul hors verrou : le réducteur réel peut être coûteux
        let reduit = self.interne.primitivise(etiquette)?;
        let mut memo = self.memo.lock().expect("mutex cache caractères");
        memo.entry(etiquette.to_string())
            .or_insert_with(|| reduit.clone());
        Ok(reduit)
    }
}

//! Noyau — pipeline par enregistrement
//!
//! decode -> primitivise (caractère central) -> canonise (spectre)
//!        -> construit_prelabel + mauvais premiers -> conducteur analytique
//!        -> encode
//!
//! Calcul pur et synchrone : un enregistrement entre, une ligne enrichie sort.
//! Les deux collaborateurs externes (réducteur de caractère, conducteur
//! analytique) sont injectés par l'appelant.

use num_bigint::BigInt;
use num_traits::ToPrimitive;

use super::canon::{canonise, FormeCanonique};
use super::caractere::ReducteurCaractere;
use super::champs::{decode_ligne, encode_ligne, EnregistrementEnrichi};
use super::erreurs::Erreur;
use super::etiquette::{construit_prelabel, mauvais_premiers};

/// Conducteur analytique : fonction numérique pure de (conducteur, paramètres
/// gamma canoniques, poids motivique). La formule exacte appartient au
/// collaborateur ; le pipeline se contente de stocker le résultat.
pub trait ConducteurAnalytique {
    fn calcule(&self, conducteur: &BigInt, forme: &FormeCanonique, poids_motivique: i64) -> f64;
}

/// Collaborateur de substitution : renvoie le conducteur en double.
/// Déterministe, à remplacer par la vraie formule côté catalogue.
pub struct ConducteurBrut;

impl ConducteurAnalytique for ConducteurBrut {
    fn calcule(&self, conducteur: &BigInt, _forme: &FormeCanonique, _poids: i64) -> f64 {
        conducteur.to_f64().unwrap_or(f64::INFINITY)
    }
}

/// Traite une ligne d'entrée : décode, normalise, étiquette, ré-encode.
/// Toute erreur rend l'enregistrement inétiquetable et se propage telle quelle.
pub fn traite_ligne(
    ligne: &str,
    reducteur: &dyn ReducteurCaractere,
    conducteur_analytique: &dyn ConducteurAnalytique,
) -> Result<String, Erreur> {
    let mut enr = decode_ligne(ligne)?;
    tracing::debug!(id = %enr.id, degre = enr.degre, "enregistrement décodé");

    // caractère central réduit AVANT la construction de l'étiquette
    enr.caractere_central = reducteur.primitivise(&enr.caractere_central)?;

    let forme = canonise(&enr.facteurs_gamma, enr.poids_motivique, enr.degre)?;

    let prelabel = construit_prelabel(
        enr.degre,
        &enr.conducteur,
        &enr.caractere_central,
        enr.algebrique,
        &forme,
    );
    tracing::debug!(id = %enr.id, prelabel = %prelabel, "pré-étiquette construite");

    let valeur_conducteur =
        conducteur_analytique.calcule(&enr.conducteur, &forme, enr.poids_motivique);
    let premiers = mauvais_premiers(&enr.conducteur);

    let enrichi = EnregistrementEnrichi {
        conducteur_analytique: valeur_conducteur,
        mu_reel: forme.mu_reel,
        mu_imag: forme.mu_imag,
        double_nu_reel: forme.double_nu_reel,
        double_nu_imag: forme.double_nu_imag,
        mauvais_premiers: premiers,
        prelabel,
        base: enr,
    };

    Ok(encode_ligne(&enrichi))
}

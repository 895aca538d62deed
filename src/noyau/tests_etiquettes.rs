//! Tests d'étiquetage (campagne) : scénarios de bout en bout + invariants.
//!
//! But : vérifier le pipeline complet ligne → ligne sur des cas littéraux.
//! - le préfixe de sortie (15 champs) reproduit l'entrée octet pour octet
//! - la pré-étiquette et les tableaux dérivés concordent (même règle d'arrondi)
//! - les erreurs (invariant de degré, littéral, type) se propagent telles quelles
//!
//! Notes (alignées avec l'état du noyau) :
//! - Caractères centraux déjà primitifs dans ces scénarios → ReducteurIdentite.
//! - Conducteur analytique : collaborateur de substitution (ConducteurBrut),
//!   seule la présence du champ est testée, pas une formule.

use super::caractere::{CacheCaracteres, ReducteurCaractere, ReducteurIdentite};
use super::erreurs::Erreur;
use super::ligne::{traite_ligne, ConducteurBrut};

fn sortie_ok(ligne: &str) -> String {
    traite_ligne(ligne, &ReducteurIdentite, &ConducteurBrut)
        .unwrap_or_else(|e| panic!("ligne={ligne:?} err={e}"))
}

fn prelabel_de(ligne: &str) -> String {
    sortie_ok(ligne).split('|').nth(15).unwrap().to_string()
}

fn erreur_de(ligne: &str) -> Erreur {
    traite_ligne(ligne, &ReducteurIdentite, &ConducteurBrut)
        .expect_err("la ligne aurait dû être rejetée")
}

/* ------------------------ Scénarios littéraux ------------------------ */

#[test]
fn scenario_conducteur_premier_algebrique() {
    // poids 1 : GR=[0] décalé en [0.5] ; pas de paire (0,1) donc pas de fusion ;
    // 0.5 s'arrondit à 0 (pair-au-milieu) ; queue algébrique "-0".
    let ligne = "1|o|t|11|1.1|t|1|h|1|0|t|0.5|[[0],[]]|7|0.5";
    assert_eq!(prelabel_de(ligne), "1-11-1.1-r0-0");
}

#[test]
fn scenario_ligne_complete() {
    let ligne = "1|o|t|11|1.1|t|1|h|1|0|t|0.5|[[0],[]]|7|0.5";
    let sortie = sortie_ok(ligne);
    // préfixe inchangé + prelabel|analytic|mu_real|mu_imag|2nu_real|2nu_imag|bad_primes
    assert_eq!(
        sortie,
        format!("{ligne}|1-11-1.1-r0-0|11|{{0}}|{{0}}|{{}}|{{}}|{{11}}")
    );
}

#[test]
fn scenario_conducteur_puissance_et_fusion() {
    // conducteur 8 = 2^3 → segment "2e3" ; poids 0 : la paire (0,1) de GR
    // fusionne en un zéro complexe de GC → segment gamma "c0".
    let ligne = "2|o|t|8|1.1|t|0|h|2|0|t|0.5|[[0,1],[]]|7|0.5";
    assert_eq!(prelabel_de(ligne), "2-2e3-1.1-c0-0");
}

#[test]
fn scenario_paire_conjuguee_non_algebrique() {
    // GC = {0.5±2i} : un seul jeton spectral "c2.00" pour la paire,
    // et ge=2 sur la partie réelle répétée → "c1e2".
    let ligne = "4|o|t|11|1.1|f|0|h|4|0|f|0.5|[[],[0.5+2*I,0.5-2*I]]|7|0.5";
    let sortie = sortie_ok(ligne);
    let champs: Vec<&str> = sortie.split('|').collect();
    assert_eq!(champs[15], "4-11-1.1-c1e2-c2.00");
    // tableaux sur les listes complètes (la réduction de bloc ne les touche pas)
    assert_eq!(champs[19], "{1,1}"); // double_nu_real : round(2*0.5) deux fois
    assert_eq!(champs[20], "{-4,4}"); // double_nu_imag : 2*(∓2), ordre trié
}

#[test]
fn scenario_degre_zero() {
    // aucun facteur gamma : segments gamma et queue réduits à leur squelette
    let ligne = "3|o|t|1|1.1|t|0|h|0|0|t|0.5|[[],[]]|7|0.5";
    assert_eq!(prelabel_de(ligne), "0-1-1.1--0");
}

/* ------------------------ Erreurs propagées ------------------------ */

#[test]
fn invariant_degre_rejete() {
    // degré 2 annoncé mais |GR|+2|GC| = 1 : donnée corrompue, jamais tronquée
    let ligne = "1|o|t|11|1.1|t|1|h|2|0|t|0.5|[[0],[]]|7|0.5";
    assert!(matches!(
        erreur_de(ligne),
        Erreur::InvariantDegre { degre: 2, gr: 1, gc: 0 }
    ));
}

#[test]
fn litteral_gamma_rejete() {
    let ligne = "1|o|t|11|1.1|t|1|h|1|0|t|0.5|[[zz],[]]|7|0.5";
    assert!(matches!(erreur_de(ligne), Erreur::LitteralInvalide(_)));
}

#[test]
fn champ_type_rejete() {
    let ligne = "1|o|t|onze|1.1|t|1|h|1|0|t|0.5|[[0],[]]|7|0.5";
    match erreur_de(ligne) {
        Erreur::TypeIncompatible { champ, valeur, .. } => {
            assert_eq!(champ, "conductor");
            assert_eq!(valeur, "onze");
        }
        autre => panic!("attendu TypeIncompatible, reçu {autre:?}"),
    }
}

/* ------------------------ Collaborateurs ------------------------ */

#[test]
fn pipeline_avec_cache_caracteres() {
    // le mémo est transparent pour le pipeline et stable entre lignes
    let cache = CacheCaracteres::new(ReducteurIdentite);
    let ligne = "1|o|t|11|1.1|t|1|h|1|0|t|0.5|[[0],[]]|7|0.5";
    let a = traite_ligne(ligne, &cache, &ConducteurBrut).unwrap();
    let b = traite_ligne(ligne, &cache, &ConducteurBrut).unwrap();
    assert_eq!(a, b);
}

#[test]
fn reduction_caractere_avant_etiquette() {
    struct Reduit;
    impl ReducteurCaractere for Reduit {
        fn primitivise(&self, _etiquette: &str) -> Result<String, Erreur> {
            Ok("3.1".to_string())
        }
    }
    // le caractère réduit apparaît dans l'étiquette ET dans le champ ré-encodé
    let ligne = "1|o|t|11|12.7|t|1|h|1|0|t|0.5|[[0],[]]|7|0.5";
    let sortie = traite_ligne(ligne, &Reduit, &ConducteurBrut).unwrap();
    let champs: Vec<&str> = sortie.split('|').collect();
    assert_eq!(champs[4], "3.1");
    assert_eq!(champs[15], "1-11-3.1-r0-0");
}

/* ------------------------ Déterminisme ------------------------ */

#[test]
fn etiquette_independante_de_l_ordre_d_entree() {
    let a = "4|o|t|11|1.1|f|0|h|4|0|f|0.5|[[],[0.5+2*I,0.5-2*I]]|7|0.5";
    let b = "4|o|t|11|1.1|f|0|h|4|0|f|0.5|[[],[0.5-2*I,0.5+2*I]]|7|0.5";
    assert_eq!(prelabel_de(a), prelabel_de(b));
}

#[test]
fn litteraux_preserves_dans_les_tableaux() {
    // la précision textuelle d'origine survit jusqu'aux tableaux de sortie
    let ligne = "5|o|t|13|1.1|f|0|h|2|0|f|0.5|[[0.5+1.25*I,0.5-1.25*I],[]]|7|0.5";
    let sortie = sortie_ok(ligne);
    let champs: Vec<&str> = sortie.split('|').collect();
    assert_eq!(champs[18], "{-1.25,+1.25}"); // mu_imag : littéraux d'origine, signe compris
    assert_eq!(champs[15], "2-13-1.1-r0e2-c1.25");
}

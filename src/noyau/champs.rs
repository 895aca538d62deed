// src/noyau/champs.rs
//
// Codec des enregistrements plats (champs séparés par '|').
//
// Entrée : 15 champs dans l'ordre fixe du format
//   id|origin|primitive|conductor|central_character|self_dual|motivic_weight|
//   Lhash|degree|order_of_vanishing|algebraic|z1|gamma_factors|trace_hash|root_angle
// Sortie : les 15 champs re-rendus à l'identique + les 7 champs dérivés
//   prelabel|analytic_conductor|mu_real|mu_imag|double_nu_real|double_nu_imag|bad_primes
//
// Le dispatch dynamique "nom de type -> comportement" de l'ancien format est
// remplacé par une structure typée fermée : un couple champ/type inconnu est
// irreprésentable, l'exhaustivité est vérifiée à la compilation.
//
// Conventions : booléens "t"/"f" ; tableaux "{v1,v2,...}" ; les littéraux
// numériques d'origine se rendent octet pour octet (LitteralReel).

use num_bigint::BigInt;

use super::canon::Gammas;
use super::erreurs::Erreur;
use super::litteral::{LitteralComplexe, LitteralReel};

pub const NB_CHAMPS_ENTREE: usize = 15;

/// Un enregistrement d'entrée décodé, types fidèles au schéma.
#[derive(Clone, Debug)]
pub struct Enregistrement {
    pub id: BigInt,
    pub origine: String,
    pub primitif: bool,
    pub conducteur: BigInt,
    pub caractere_central: String,
    pub auto_dual: bool,
    pub poids_motivique: i64,
    pub lhash: String,
    pub degre: i64,
    pub ordre_annulation: i64,
    pub algebrique: bool,
    pub z1: LitteralReel,
    pub facteurs_gamma: Gammas,
    pub hash_traces: BigInt,
    pub angle_racine: LitteralReel,
}

/// L'enregistrement enrichi des champs dérivés, consommé une fois à l'encodage.
#[derive(Clone, Debug)]
pub struct EnregistrementEnrichi {
    pub base: Enregistrement,
    pub prelabel: String,
    pub conducteur_analytique: f64,
    pub mu_reel: Vec<BigInt>,
    pub mu_imag: Vec<LitteralReel>,
    pub double_nu_reel: Vec<BigInt>,
    pub double_nu_imag: Vec<LitteralReel>,
    pub mauvais_premiers: Vec<BigInt>,
}

/* ------------------------ Lectures par type ------------------------ */

fn incompatible(champ: &'static str, valeur: &str, attendu: &'static str) -> Erreur {
    Erreur::TypeIncompatible {
        champ,
        valeur: valeur.to_string(),
        attendu,
    }
}

fn lit_booleen(champ: &'static str, brut: &str) -> Result<bool, Erreur> {
    match brut {
        "t" => Ok(true),
        "f" => Ok(false),
        _ => Err(incompatible(champ, brut, "boolean")),
    }
}

fn lit_entier(champ: &'static str, brut: &str) -> Result<BigInt, Erreur> {
    BigInt::parse_bytes(brut.as_bytes(), 10).ok_or_else(|| incompatible(champ, brut, "bigint"))
}

fn lit_petit(champ: &'static str, brut: &str) -> Result<i64, Erreur> {
    brut.parse::<i64>()
        .map_err(|_| incompatible(champ, brut, "smallint"))
}

fn lit_reel(champ: &'static str, brut: &str) -> Result<LitteralReel, Erreur> {
    LitteralReel::lit(brut).map_err(|_| incompatible(champ, brut, "numeric"))
}

/// Champ gamma "[[R...],[C...]]" : espaces ignorés, deux listes exactement,
/// chaque élément un littéral réel-ou-complexe. Une liste vide est permise.
fn lit_gammas(champ: &'static str, brut: &str) -> Result<Gammas, Erreur> {
    let compact: String = brut.chars().filter(|c| !c.is_whitespace()).collect();
    let coeur = compact
        .strip_prefix("[[")
        .and_then(|s| s.strip_suffix("]]"))
        .ok_or_else(|| incompatible(champ, brut, "jsonb [[R],[C]]"))?;

    let morceaux: Vec<&str> = coeur.split("],[").collect();
    if morceaux.len() != 2 {
        return Err(incompatible(champ, brut, "jsonb [[R],[C]]"));
    }

    let lit_liste = |texte: &str| -> Result<Vec<LitteralComplexe>, Erreur> {
        if texte.is_empty() {
            return Ok(Vec::new());
        }
        texte.split(',').map(LitteralComplexe::lit).collect()
    };

    Ok(Gammas {
        gr: lit_liste(morceaux[0])?,
        gc: lit_liste(morceaux[1])?,
    })
}

/* ------------------------ Écritures par type ------------------------ */

fn ecrit_booleen(v: bool) -> &'static str {
    if v {
        "t"
    } else {
        "f"
    }
}

fn ecrit_tableau<T, F: Fn(&T) -> String>(valeurs: &[T], rend: F) -> String {
    let elements: Vec<String> = valeurs.iter().map(|v| rend(v)).collect();
    format!("{{{}}}", elements.join(","))
}

fn ecrit_gammas(gammas: &Gammas) -> String {
    let rend = |liste: &[LitteralComplexe]| -> String {
        let elements: Vec<String> = liste.iter().map(|z| z.rendu()).collect();
        elements.join(",")
    };
    format!("[[{}],[{}]]", rend(&gammas.gr), rend(&gammas.gc))
}

/* ------------------------ Ligne complète ------------------------ */

pub fn decode_ligne(ligne: &str) -> Result<Enregistrement, Erreur> {
    let ligne = ligne.trim_end_matches(['\n', '\r']);
    let champs: Vec<&str> = ligne.split('|').collect();
    if champs.len() != NB_CHAMPS_ENTREE {
        return Err(Erreur::LigneInvalide(format!(
            "{} champs au lieu de {NB_CHAMPS_ENTREE}",
            champs.len()
        )));
    }

    Ok(Enregistrement {
        id: lit_entier("id", champs[0])?,
        origine: champs[1].to_string(),
        primitif: lit_booleen("primitive", champs[2])?,
        conducteur: lit_entier("conductor", champs[3])?,
        caractere_central: champs[4].to_string(),
        auto_dual: lit_booleen("self_dual", champs[5])?,
        poids_motivique: lit_petit("motivic_weight", champs[6])?,
        lhash: champs[7].to_string(),
        degre: lit_petit("degree", champs[8])?,
        ordre_annulation: lit_petit("order_of_vanishing", champs[9])?,
        algebrique: lit_booleen("algebraic", champs[10])?,
        z1: lit_reel("z1", champs[11])?,
        facteurs_gamma: lit_gammas("gamma_factors", champs[12])?,
        hash_traces: lit_entier("trace_hash", champs[13])?,
        angle_racine: lit_reel("root_angle", champs[14])?,
    })
}

pub fn encode_ligne(enr: &EnregistrementEnrichi) -> String {
    let b = &enr.base;
    let champs: Vec<String> = vec![
        b.id.to_string(),
        b.origine.clone(),
        ecrit_booleen(b.primitif).to_string(),
        b.conducteur.to_string(),
        b.caractere_central.clone(),
        ecrit_booleen(b.auto_dual).to_string(),
        b.poids_motivique.to_string(),
        b.lhash.clone(),
        b.degre.to_string(),
        b.ordre_annulation.to_string(),
        ecrit_booleen(b.algebrique).to_string(),
        b.z1.rendu().to_string(),
        ecrit_gammas(&b.facteurs_gamma),
        b.hash_traces.to_string(),
        b.angle_racine.rendu().to_string(),
        enr.prelabel.clone(),
        format!("{}", enr.conducteur_analytique),
        ecrit_tableau(&enr.mu_reel, |v| v.to_string()),
        ecrit_tableau(&enr.mu_imag, |v| v.rendu().to_string()),
        ecrit_tableau(&enr.double_nu_reel, |v| v.to_string()),
        ecrit_tableau(&enr.double_nu_imag, |v| v.rendu().to_string()),
        ecrit_tableau(&enr.mauvais_premiers, |v| v.to_string()),
    ];
    champs.join("|")
}

/* ------------------------ Tests ------------------------ */

#[cfg(test)]
mod tests {
    use super::*;

    const LIGNE: &str =
        "1|EC/Q/11/a|t|11|1.1|t|1|abc123|1|0|t|0.5|[[0],[]]|42|0.25";

    #[test]
    fn decode_types_fideles() {
        let enr = decode_ligne(LIGNE).unwrap();
        assert_eq!(enr.id, BigInt::from(1));
        assert_eq!(enr.origine, "EC/Q/11/a");
        assert!(enr.primitif && enr.auto_dual && enr.algebrique);
        assert_eq!(enr.conducteur, BigInt::from(11));
        assert_eq!(enr.caractere_central, "1.1");
        assert_eq!(enr.poids_motivique, 1);
        assert_eq!(enr.degre, 1);
        assert_eq!(enr.ordre_annulation, 0);
        assert_eq!(enr.z1.rendu(), "0.5");
        assert_eq!(enr.facteurs_gamma.gr.len(), 1);
        assert!(enr.facteurs_gamma.gc.is_empty());
        assert_eq!(enr.hash_traces, BigInt::from(42));
        assert_eq!(enr.angle_racine.rendu(), "0.25");
    }

    #[test]
    fn encode_prefixe_identique() {
        let enr = decode_ligne(LIGNE).unwrap();
        let enrichi = EnregistrementEnrichi {
            base: enr,
            prelabel: "1-11-1.1-r0-0".to_string(),
            conducteur_analytique: 11.0,
            mu_reel: vec![BigInt::from(0)],
            mu_imag: vec![LitteralReel::lit("0").unwrap()],
            double_nu_reel: vec![],
            double_nu_imag: vec![],
            mauvais_premiers: vec![BigInt::from(11)],
        };
        let sortie = encode_ligne(&enrichi);
        assert!(sortie.starts_with(LIGNE), "préfixe: {sortie}");
        assert!(sortie.ends_with("|1-11-1.1-r0-0|11|{0}|{0}|{}|{}|{11}"));
    }

    #[test]
    fn gammas_complexes_aller_retour() {
        let enr =
            decode_ligne("7|o|f|8|1.1|f|0|h|5|1|f|1.5|[[0.5],[0.25+2*I,0.25-2*I]]|9|0.125")
                .unwrap();
        assert_eq!(enr.facteurs_gamma.gr.len(), 1);
        assert_eq!(enr.facteurs_gamma.gc.len(), 2);
        assert_eq!(
            ecrit_gammas(&enr.facteurs_gamma),
            "[[0.5],[0.25+2*I,0.25-2*I]]"
        );
    }

    #[test]
    fn gammas_listes_vides() {
        let g = lit_gammas("gamma_factors", "[[],[]]").unwrap();
        assert!(g.gr.is_empty() && g.gc.is_empty());
        let g = lit_gammas("gamma_factors", "[[],[0]]").unwrap();
        assert!(g.gr.is_empty());
        assert_eq!(g.gc.len(), 1);
    }

    #[test]
    fn booleen_invalide() {
        let ligne = LIGNE.replacen("|t|", "|x|", 1);
        let e = decode_ligne(&ligne).unwrap_err();
        match e {
            Erreur::TypeIncompatible { champ, valeur, .. } => {
                assert_eq!(champ, "primitive");
                assert_eq!(valeur, "x");
            }
            autre => panic!("attendu TypeIncompatible, reçu {autre:?}"),
        }
    }

    #[test]
    fn arite_invalide() {
        assert!(matches!(
            decode_ligne("1|2|3").unwrap_err(),
            Erreur::LigneInvalide(_)
        ));
        assert!(matches!(
            decode_ligne(&format!("{LIGNE}|extra")).unwrap_err(),
            Erreur::LigneInvalide(_)
        ));
    }

    #[test]
    fn gammas_malformes() {
        for brut in ["[0]", "[[0]]", "[[0],[1],[2]]", "0,[1]"] {
            assert!(
                lit_gammas("gamma_factors", brut).is_err(),
                "devrait échouer: {brut:?}"
            );
        }
    }
}

// src/noyau/etiquette.rs
//
// Construction de la pré-étiquette :
//   début   : {degré}-{conducteur en puissance parfaite}-{caractère primitif}
//   gammas  : "-" + r{arrondi(re)}… + c{arrondi(2re)}… + "e{ge}" si ge > 1
//   fin     : "-0" si algébrique, sinon jetons spectraux avec appariement conjugué
//
// Les arrondis utilisent la même règle pair-au-milieu que les tableaux
// mu_real/double_nu_real (canon::arrondi_pair) : l'étiquette reste cohérente
// avec sa propre charge numérique.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Zero};

use super::canon::{arrondi_pair, FormeCanonique};
use super::litteral::LitteralComplexe;

/* ------------------------ Factorisation (essais) ------------------------ */

/// Factorisation par divisions d'essai, p = 2 puis impairs.
/// Suffisant pour nos conducteurs (entiers de taille modérée).
pub fn factorise(n: &BigInt) -> Vec<(BigInt, u32)> {
    let mut facteurs = Vec::new();
    let mut reste = n.clone();
    let mut p = BigInt::from(2);

    while &p * &p <= reste {
        let mut e = 0u32;
        while (&reste % &p).is_zero() {
            reste /= &p;
            e += 1;
        }
        if e > 0 {
            facteurs.push((p.clone(), e));
        }
        if p == BigInt::from(2) {
            p = BigInt::from(3);
        } else {
            p += 2;
        }
    }
    if reste > BigInt::one() {
        facteurs.push((reste, 1));
    }
    facteurs
}

/// Écrit n comme puissance parfaite maximale b^e (n = 1 donne (1, 1)).
pub fn puissance_parfaite(n: &BigInt) -> (BigInt, u32) {
    let facteurs = factorise(n);
    if facteurs.is_empty() {
        return (n.clone(), 1);
    }

    let e = facteurs
        .iter()
        .fold(0u32, |acc, (_, a)| num_integer::gcd(acc, *a));
    if e <= 1 {
        return (n.clone(), 1);
    }

    let b = facteurs
        .iter()
        .fold(BigInt::one(), |acc, (p, a)| acc * p.pow(a / e));
    (b, e)
}

/// Premiers de mauvaise réduction : diviseurs premiers du conducteur, croissants.
pub fn mauvais_premiers(conducteur: &BigInt) -> Vec<BigInt> {
    factorise(conducteur).into_iter().map(|(p, _)| p).collect()
}

/* ------------------------ Jetons spectraux ------------------------ */

/// Valeur à exactement deux décimales (échelle ×100, arrondi pair-au-milieu).
fn deux_decimales(x: &BigRational) -> String {
    let cent = BigRational::from_integer(BigInt::from(100));
    let k = arrondi_pair(&(x * &cent));
    let entier = &k / 100;
    let frac = &k % 100;
    format!("{entier}.{frac:02}")
}

/// Jeton spectral d'une partie imaginaire :
/// conjugué → "c", négatif → "m", sinon "p" ; suffixe "0" pour zéro exact,
/// sinon la valeur (rendue positive) à deux décimales.
pub fn jeton_spectral(x: &BigRational, conjugue: bool) -> String {
    let mut x = x.clone();
    let prefixe = if conjugue {
        assert!(x <= BigRational::zero(), "jeton conjugué porté par un imaginaire > 0");
        x = -x;
        "c"
    } else if x < BigRational::zero() {
        x = -x;
        "m"
    } else {
        "p"
    };

    if x.is_zero() {
        format!("{prefixe}0")
    } else {
        format!("{prefixe}{}", deux_decimales(&x))
    }
}

/* ------------------------ Suffixe spectral (appariement conjugué) ------------------------ */

/// Un jeton par élément des listes triées, les paires conjuguées adjacentes
/// fusionnées en un seul jeton "c…" porté par le membre d'imaginaire ≤ 0.
fn suffixe_spectral(forme: &FormeCanonique) -> String {
    let zero = BigRational::zero();
    let mut fin = String::from("-");

    for liste in [&forme.gr, &forme.gc] {
        for (i, elt) in liste.iter().enumerate() {
            let im = elt.imag().valeur();
            let mut conjugue = false;
            if *im <= zero && i + 1 < liste.len() && paire_conjuguee(elt, &liste[i + 1]) {
                conjugue = true;
            } else if *im >= zero && i > 0 && paire_conjuguee(elt, &liste[i - 1]) {
                // déjà représenté par son pair conjugué
                continue;
            }
            fin.push_str(&jeton_spectral(im, conjugue));
        }
    }
    fin
}

fn paire_conjuguee(a: &LitteralComplexe, b: &LitteralComplexe) -> bool {
    a.est_conjuguee_de(b)
}

/* ------------------------ Assemblage ------------------------ */

/// Assemble la pré-étiquette complète. Le caractère central doit déjà être
/// réduit à sa forme primitive.
pub fn construit_prelabel(
    degre: i64,
    conducteur: &BigInt,
    caractere_central: &str,
    algebrique: bool,
    forme: &FormeCanonique,
) -> String {
    let (b, e) = puissance_parfaite(conducteur);
    let segment_conducteur = if e == 1 {
        b.to_string()
    } else {
        format!("{b}e{e}")
    };

    let debut = format!("{degre}-{segment_conducteur}-{caractere_central}");

    let mut gammas = String::from("-");
    for r in &forme.gr_reels {
        gammas.push_str(&format!("r{}", arrondi_pair(r)));
    }
    let deux = BigRational::from_integer(BigInt::from(2));
    for r in &forme.gc_reels {
        gammas.push_str(&format!("c{}", arrondi_pair(&(r * &deux))));
    }
    if forme.facteur_bloc > 1 {
        gammas.push_str(&format!("e{}", forme.facteur_bloc));
    }

    let fin = if algebrique {
        "-0".to_string()
    } else {
        suffixe_spectral(forme)
    };

    debut + &gammas + &fin
}

/* ------------------------ Tests ------------------------ */

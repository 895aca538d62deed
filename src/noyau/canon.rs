// src/noyau/canon.rs
//
// Canonicalisation spectrale (déterministe) :
// - normalisation analytique : décalage exact de poids_motivique/2
// - fusion Γ_R → Γ_C : une paire (0,1) dans GR équivaut à un 0 dans GC
// - invariant de degré : degré == |GR| + 2|GC| (fatal sinon)
// - tri total par clef (re, |im|, im) : les paires conjuguées deviennent adjacentes
// - sorties imaginaires (mu_imag, double_nu_imag) AVANT la réduction de bloc
// - arrondi pair-au-milieu des parties réelles (mu_real, double_nu_real)
// - facteur de bloc ge = gcd des multiplicités des parties réelles distinctes
//
// L'ordre des étapes compte : chaque sortie alimente la suivante.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use num_bigint::BigInt;
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::erreurs::Erreur;
use super::litteral::{LitteralComplexe, LitteralReel};

/// Paramètres gamma bruts d'un enregistrement : GR (type réel) et GC (type complexe).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gammas {
    pub gr: Vec<LitteralComplexe>,
    pub gc: Vec<LitteralComplexe>,
}

/// Forme canonique d'une donnée spectrale, propriété d'un seul appel.
#[derive(Clone, Debug)]
pub struct FormeCanonique {
    /// GR trié, complet (non réduit) : sert au suffixe spectral de l'étiquette.
    pub gr: Vec<LitteralComplexe>,
    /// GC trié, complet (non réduit).
    pub gc: Vec<LitteralComplexe>,
    /// Parties réelles de GR réduites par le facteur de bloc, croissantes.
    pub gr_reels: Vec<BigRational>,
    /// Parties réelles de GC réduites par le facteur de bloc, croissantes.
    pub gc_reels: Vec<BigRational>,
    /// Facteur de répétition commun ; rendu dans l'étiquette seulement si > 1.
    pub facteur_bloc: usize,
    pub mu_reel: Vec<BigInt>,
    pub mu_imag: Vec<LitteralReel>,
    pub double_nu_reel: Vec<BigInt>,
    pub double_nu_imag: Vec<LitteralReel>,
}

/* ------------------------ Arrondi pair-au-milieu ------------------------ */

/// Arrondi à l'entier le plus proche, milieu exact vers le pair (0.5 → 0, 1.5 → 2).
/// Règle unique pour mu_real/double_nu_real ET les segments r{n}/c{n} de l'étiquette.
pub fn arrondi_pair(r: &BigRational) -> BigInt {
    let plancher = r.floor().to_integer();
    let frac = r - BigRational::from_integer(plancher.clone());
    let demi = BigRational::new(BigInt::one(), BigInt::from(2));

    match frac.cmp(&demi) {
        Ordering::Less => plancher,
        Ordering::Greater => plancher + 1,
        Ordering::Equal => {
            if plancher.is_even() {
                plancher
            } else {
                plancher + 1
            }
        }
    }
}

/* ------------------------ Clef de tri spectrale ------------------------ */

/// Ordre total (re, |im|, im) : reproductible quel que soit l'ordre d'entrée.
fn compare_spectral(a: &LitteralComplexe, b: &LitteralComplexe) -> Ordering {
    a.reel()
        .valeur()
        .cmp(b.reel().valeur())
        .then_with(|| a.imag().valeur().abs().cmp(&b.imag().valeur().abs()))
        .then_with(|| a.imag().valeur().cmp(b.imag().valeur()))
}

/* ------------------------ Fusion Γ_R → Γ_C ------------------------ */

fn est_reel_egal(z: &LitteralComplexe, attendu: &BigRational) -> bool {
    z.imag().est_nul() && z.reel().valeur() == attendu
}

/// Identité des facteurs gamma : Γ_R(s)·Γ_R(s+1) = Γ_C(s).
/// Consomme gloutonnement les paires (0,1) de GR par comptage de multiplicités,
/// et ajoute autant de zéros complexes à GC. Idempotent après une passe.
fn fusionne_r_vers_c(gr: &mut Vec<LitteralComplexe>, gc: &mut Vec<LitteralComplexe>) {
    let zero = BigRational::zero();
    let un = BigRational::one();

    let n0 = gr.iter().filter(|z| est_reel_egal(z, &zero)).count();
    let n1 = gr.iter().filter(|z| est_reel_egal(z, &un)).count();
    let paires = n0.min(n1);
    if paires == 0 {
        return;
    }

    let mut restant0 = paires;
    let mut restant1 = paires;
    gr.retain(|z| {
        if restant0 > 0 && est_reel_egal(z, &zero) {
            restant0 -= 1;
            false
        } else if restant1 > 0 && est_reel_egal(z, &un) {
            restant1 -= 1;
            false
        } else {
            true
        }
    });

    for _ in 0..paires {
        gc.push(LitteralComplexe::zero());
    }
}

/* ------------------------ Réduction de bloc (gcd des multiplicités) ------------------------ */

fn comptage_reels(liste: &[LitteralComplexe]) -> BTreeMap<BigRational, usize> {
    let mut comptes: BTreeMap<BigRational, usize> = BTreeMap::new();
    for z in liste {
        *comptes.entry(z.reel().valeur().clone()).or_insert(0) += 1;
    }
    comptes
}

fn gcd_multiplicites(acc: usize, comptes: &BTreeMap<BigRational, usize>) -> usize {
    comptes.values().fold(acc, |g, c| num_integer::gcd(g, *c))
}

fn reduit(comptes: &BTreeMap<BigRational, usize>, ge: usize) -> Vec<BigRational> {
    let mut v = Vec::new();
    for (k, c) in comptes {
        for _ in 0..(c / ge) {
            v.push(k.clone());
        }
    }
    v
}

/* ------------------------ Canonicalisation ------------------------ */

pub fn canonise(
    gammas: &Gammas,
    poids_motivique: i64,
    degre: i64,
) -> Result<FormeCanonique, Erreur> {
    // 1) Normalisation analytique : décalage exact de w/2.
    let decalage = BigRational::new(BigInt::from(poids_motivique), BigInt::from(2));
    let mut gr: Vec<LitteralComplexe> = gammas.gr.iter().map(|z| z.decale(&decalage)).collect();
    let mut gc: Vec<LitteralComplexe> = gammas.gc.iter().map(|z| z.decale(&decalage)).collect();

    // 2) Fusion Γ_R → Γ_C sur les valeurs normalisées.
    fusionne_r_vers_c(&mut gr, &mut gc);

    // 3) Invariant de degré : entrée corrompue si violé, on n'ampute jamais.
    if degre != (gr.len() + 2 * gc.len()) as i64 {
        return Err(Erreur::InvariantDegre {
            degre,
            gr: gr.len(),
            gc: gc.len(),
        });
    }

    // 4) Ordre canonique.
    gr.sort_by(compare_spectral);
    gc.sort_by(compare_spectral);

    // 5) Sorties imaginaires, sur les listes complètes (avant réduction de bloc).
    let deux = BigRational::from_integer(BigInt::from(2));
    let mu_imag: Vec<LitteralReel> = gr.iter().map(|z| z.imag().clone()).collect();
    let double_nu_imag: Vec<LitteralReel> = gc
        .iter()
        .map(|z| LitteralReel::depuis_rationnel(z.imag().valeur() * &deux))
        .collect();

    // 6) Arrondis des parties réelles.
    let mu_reel: Vec<BigInt> = gr.iter().map(|z| arrondi_pair(z.reel().valeur())).collect();
    let double_nu_reel: Vec<BigInt> = gc
        .iter()
        .map(|z| arrondi_pair(&(z.reel().valeur() * &deux)))
        .collect();

    // 7) Facteur de bloc : gcd des multiplicités des parties réelles distinctes.
    let comptes_gr = comptage_reels(&gr);
    let comptes_gc = comptage_reels(&gc);
    let ge = gcd_multiplicites(gcd_multiplicites(0, &comptes_gr), &comptes_gc);

    let facteur_bloc = ge.max(1);
    let gr_reels = reduit(&comptes_gr, facteur_bloc);
    let gc_reels = reduit(&comptes_gc, facteur_bloc);

    Ok(FormeCanonique {
        gr,
        gc,
        gr_reels,
        gc_reels,
        facteur_bloc,
        mu_reel,
        mu_imag,
        double_nu_reel,
        double_nu_imag,
    })
}

/* ------------------------ Tests ------------------------ */

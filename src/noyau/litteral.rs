// src/noyau/litteral.rs
//
// Littéraux exacts (sans flottants) :
// - LitteralReel     : (texte source, valeur rationnelle exacte, précision bits)
// - LitteralComplexe : deux LitteralReel + texte source global
//
// Invariant central : rendu() d'un littéral PARSÉ reproduit le texte source
// octet pour octet. Les valeurs DÉRIVÉES (décalage w/2, doublement) reçoivent
// un texte décimal exact fraîchement calculé, jamais le texte d'origine.
//
// L'égalité et l'ordre comparent la valeur rationnelle seulement.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::erreurs::Erreur;

/* ------------------------ Décimal exact (scalé -> texte) ------------------------ */

fn pow10(n: usize) -> BigInt {
    BigInt::from(10).pow(n as u32)
}

/// Convertit un entier “scalé” (×10^digits) en texte décimal exact.
fn decimal_depuis_scale(mut scale: BigInt, digits: usize) -> String {
    let neg = scale.is_negative();
    if neg {
        scale = -scale;
    }

    let echelle = pow10(digits);
    let partie_entiere = &scale / &echelle;
    let partie_frac = &scale % &echelle;

    if digits == 0 {
        return if neg {
            format!("-{partie_entiere}")
        } else {
            format!("{partie_entiere}")
        };
    }

    let mut frac = partie_frac.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }

    if neg {
        format!("-{partie_entiere}.{frac}")
    } else {
        format!("{partie_entiere}.{frac}")
    }
}

/// Texte décimal exact minimal d'un rationnel dont le dénominateur est 2^a·5^b.
/// Sinon, repli fraction "n/d" (jamais atteint pour nos dérivations w/2 et ×2).
fn texte_decimal_exact(v: &BigRational) -> String {
    if v.is_integer() {
        return v.to_integer().to_string();
    }

    let deux = BigInt::from(2);
    let cinq = BigInt::from(5);
    let mut d = v.denom().clone();
    let mut a: usize = 0;
    let mut b: usize = 0;

    while (&d % &deux).is_zero() {
        d /= &deux;
        a += 1;
    }
    while (&d % &cinq).is_zero() {
        d /= &cinq;
        b += 1;
    }

    if !d.is_one() {
        return format!("{}/{}", v.numer(), v.denom());
    }

    let digits = a.max(b);
    let scale = (v.numer() * pow10(digits)) / v.denom();
    decimal_depuis_scale(scale, digits)
}

/* ------------------------ Balayage des nombres ------------------------ */

/// Balaye un nombre signé à partir de `depart` : [+-]? chiffres ('.' chiffres?)?
/// puis exposant optionnel [eE][+-]?chiffres+. Renvoie la position de fin,
/// None si aucun chiffre (sans rien consommer).
fn balaye_nombre(chars: &[char], depart: usize) -> Option<usize> {
    let mut i = depart;

    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        i += 1;
    }

    let mut chiffres = 0usize;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
        chiffres += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
            chiffres += 1;
        }
    }
    if chiffres == 0 {
        return None;
    }

    // exposant : consommé seulement s'il est complet (sinon on laisse tel quel)
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        let mut j = i + 1;
        if j < chars.len() && (chars[j] == '+' || chars[j] == '-') {
            j += 1;
        }
        let mut exp_chiffres = 0usize;
        while j < chars.len() && chars[j].is_ascii_digit() {
            j += 1;
            exp_chiffres += 1;
        }
        if exp_chiffres > 0 {
            i = j;
        }
    }

    Some(i)
}

/// Valeur rationnelle exacte d'un texte de nombre déjà balayé.
fn rationnel_du_texte(texte: &str) -> Option<BigRational> {
    let chars: Vec<char> = texte.chars().collect();
    let mut i = 0usize;

    let mut negatif = false;
    if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
        negatif = chars[i] == '-';
        i += 1;
    }

    let mut mantisse = String::new();
    let mut frac_len = 0usize;
    let mut chiffres = 0usize;

    while i < chars.len() && chars[i].is_ascii_digit() {
        mantisse.push(chars[i]);
        i += 1;
        chiffres += 1;
    }
    if i < chars.len() && chars[i] == '.' {
        i += 1;
        while i < chars.len() && chars[i].is_ascii_digit() {
            mantisse.push(chars[i]);
            i += 1;
            chiffres += 1;
            frac_len += 1;
        }
    }
    if chiffres == 0 {
        return None;
    }

    let mut exposant: i64 = 0;
    if i < chars.len() && (chars[i] == 'e' || chars[i] == 'E') {
        i += 1;
        let mut exp_neg = false;
        if i < chars.len() && (chars[i] == '+' || chars[i] == '-') {
            exp_neg = chars[i] == '-';
            i += 1;
        }
        let mut exp_txt = String::new();
        while i < chars.len() && chars[i].is_ascii_digit() {
            exp_txt.push(chars[i]);
            i += 1;
        }
        if exp_txt.is_empty() {
            return None;
        }
        exposant = exp_txt.parse::<i64>().ok()?;
        if exp_neg {
            exposant = -exposant;
        }
    }
    if i != chars.len() {
        return None;
    }

    let mut numer = BigInt::parse_bytes(mantisse.as_bytes(), 10)?;
    if negatif {
        numer = -numer;
    }
    let mut denom = pow10(frac_len);

    if exposant >= 0 {
        numer *= pow10(exposant as usize);
    } else {
        denom *= pow10((-exposant) as usize);
    }

    Some(BigRational::new(numer, denom))
}

/// Précision binaire suggérée par le texte (≈ chiffres × log2(10)),
/// signe '-' ignoré, exposant tronqué.
fn precision_du_texte(texte: &str) -> u32 {
    let tronque = match texte.find(['e', 'E']) {
        Some(p) => &texte[..p],
        None => texte,
    };
    let l = tronque.chars().filter(|c| *c != '-').count();
    ((l * 3322 + 999) / 1000) as u32
}

pub const PRECISION_MIN: u32 = 53;

/* ------------------------ LitteralReel ------------------------ */

#[derive(Clone, Debug)]
pub struct LitteralReel {
    texte: String,
    valeur: BigRational,
    precision: u32,
}

impl LitteralReel {
    /// Parse un littéral réel (full-match). Le texte source est conservé tel quel.
    pub fn lit(texte: &str) -> Result<Self, Erreur> {
        let chars: Vec<char> = texte.chars().collect();
        match balaye_nombre(&chars, 0) {
            Some(fin) if fin == chars.len() && fin > 0 => {}
            _ => return Err(Erreur::LitteralInvalide(texte.to_string())),
        }
        let valeur = rationnel_du_texte(texte)
            .ok_or_else(|| Erreur::LitteralInvalide(texte.to_string()))?;
        Ok(Self {
            precision: precision_du_texte(texte).max(PRECISION_MIN),
            texte: texte.to_string(),
            valeur,
        })
    }

    /// Valeur dérivée : texte décimal exact fraîchement calculé.
    pub fn depuis_rationnel(valeur: BigRational) -> Self {
        let texte = texte_decimal_exact(&valeur);
        Self {
            precision: precision_du_texte(&texte).max(PRECISION_MIN),
            texte,
            valeur,
        }
    }

    pub fn zero() -> Self {
        Self {
            texte: "0".to_string(),
            valeur: BigRational::zero(),
            precision: PRECISION_MIN,
        }
    }

    pub fn rendu(&self) -> &str {
        &self.texte
    }

    pub fn valeur(&self) -> &BigRational {
        &self.valeur
    }

    pub fn precision(&self) -> u32 {
        self.precision
    }

    pub fn est_nul(&self) -> bool {
        self.valeur.is_zero()
    }
}

impl PartialEq for LitteralReel {
    fn eq(&self, autre: &Self) -> bool {
        self.valeur == autre.valeur
    }
}
impl Eq for LitteralReel {}

impl PartialOrd for LitteralReel {
    fn partial_cmp(&self, autre: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(autre))
    }
}
impl Ord for LitteralReel {
    fn cmp(&self, autre: &Self) -> std::cmp::Ordering {
        self.valeur.cmp(&autre.valeur)
    }
}

/* ------------------------ LitteralComplexe ------------------------ */

#[derive(Clone, Debug)]
pub struct LitteralComplexe {
    reel: LitteralReel,
    imag: LitteralReel,
    // texte source global (espaces retirés) pour les littéraux parsés ;
    // None pour les valeurs dérivées, rendues en "a+b*I"
    texte: Option<String>,
}

/// Consomme '*'? puis [iI] et exige la fin de chaîne.
fn marqueur_imaginaire(chars: &[char], mut j: usize) -> Option<usize> {
    if j < chars.len() && chars[j] == '*' {
        j += 1;
    }
    if j < chars.len() && (chars[j] == 'i' || chars[j] == 'I') {
        j += 1;
        if j == chars.len() {
            return Some(j);
        }
    }
    None
}

impl LitteralComplexe {
    /// Parse un littéral complexe "a", "b*i", "a+b*i", "i", "-i"…
    /// Les espaces internes sont ignorés (convention du format d'entrée).
    pub fn lit(texte: &str) -> Result<Self, Erreur> {
        let source: String = texte.chars().filter(|c| !c.is_whitespace()).collect();
        let chars: Vec<char> = source.chars().collect();
        if chars.is_empty() {
            return Err(Erreur::LitteralInvalide(texte.to_string()));
        }

        let invalide = || Erreur::LitteralInvalide(texte.to_string());

        let mut reel_txt: Option<String> = None;
        let mut imag_txt: Option<String> = None;

        if let Some(fin) = balaye_nombre(&chars, 0) {
            let nombre: String = chars[..fin].iter().collect();
            if marqueur_imaginaire(&chars, fin).is_some() {
                // nombre suivi de ('*')?i : coefficient imaginaire pur
                imag_txt = Some(nombre);
            } else {
                reel_txt = Some(nombre);
                if fin < chars.len() {
                    // derrière un réel, la partie imaginaire commence par son signe
                    if chars[fin] != '+' && chars[fin] != '-' {
                        return Err(invalide());
                    }
                    if let Some(fin2) = balaye_nombre(&chars, fin) {
                        if marqueur_imaginaire(&chars, fin2).is_none() {
                            return Err(invalide());
                        }
                        imag_txt = Some(chars[fin..fin2].iter().collect());
                    } else {
                        // signe nu : coefficient implicite ±1
                        if marqueur_imaginaire(&chars, fin + 1).is_none() {
                            return Err(invalide());
                        }
                        imag_txt = Some(if chars[fin] == '-' { "-1" } else { "1" }.to_string());
                    }
                }
            }
        } else {
            // pas de nombre en tête : au plus un signe, puis le marqueur i
            let (signe_neg, depart) = match chars[0] {
                '+' => (false, 1),
                '-' => (true, 1),
                _ => (false, 0),
            };
            // sans signe ni coefficient, le littéral doit commencer par i/I
            if depart == 0 && chars[0] != 'i' && chars[0] != 'I' {
                return Err(invalide());
            }
            if marqueur_imaginaire(&chars, depart).is_none() {
                return Err(invalide());
            }
            imag_txt = Some(if signe_neg { "-1" } else { "1" }.to_string());
        }

        let reel = match &reel_txt {
            Some(t) => LitteralReel::lit(t)?,
            None => LitteralReel::zero(),
        };
        let imag = match &imag_txt {
            Some(t) => LitteralReel::lit(t)?,
            None => LitteralReel::zero(),
        };

        Ok(Self {
            reel,
            imag,
            texte: Some(source),
        })
    }

    /// Valeur dérivée (texte composé au rendu).
    pub fn depuis_parties(reel: LitteralReel, imag: LitteralReel) -> Self {
        Self {
            reel,
            imag,
            texte: None,
        }
    }

    /// Zéro complexe de l'identité Γ_R(s)Γ_R(s+1) = Γ_C(s) : texte "0".
    pub fn zero() -> Self {
        Self {
            reel: LitteralReel::zero(),
            imag: LitteralReel::zero(),
            texte: Some("0".to_string()),
        }
    }

    pub fn reel(&self) -> &LitteralReel {
        &self.reel
    }

    pub fn imag(&self) -> &LitteralReel {
        &self.imag
    }

    pub fn precision(&self) -> u32 {
        self.reel.precision.max(self.imag.precision)
    }

    /// Décale la partie réelle d'un rationnel exact (normalisation analytique).
    /// La partie imaginaire garde son littéral d'origine.
    pub fn decale(&self, delta: &BigRational) -> Self {
        let somme = self.reel.valeur() + delta;
        Self {
            reel: LitteralReel::depuis_rationnel(somme),
            imag: self.imag.clone(),
            texte: None,
        }
    }

    pub fn conjuguee(&self) -> Self {
        Self {
            reel: self.reel.clone(),
            imag: LitteralReel::depuis_rationnel(-self.imag.valeur().clone()),
            texte: None,
        }
    }

    pub fn est_conjuguee_de(&self, autre: &Self) -> bool {
        self.reel.valeur() == autre.reel.valeur()
            && *self.imag.valeur() == -autre.imag.valeur().clone()
    }

    /// Rendu source-fidèle pour les littéraux parsés, "a+b*I" pour les dérivés.
    pub fn rendu(&self) -> String {
        if let Some(t) = &self.texte {
            return t.clone();
        }

        let mut s = String::new();
        if !self.reel.est_nul() {
            s.push_str(self.reel.rendu());
        }
        if !self.imag.est_nul() {
            let y = if !s.is_empty() {
                if self.imag.valeur().is_negative() {
                    s.push('-');
                    LitteralReel::depuis_rationnel(-self.imag.valeur().clone())
                } else {
                    s.push('+');
                    self.imag.clone()
                }
            } else {
                self.imag.clone()
            };
            s.push_str(y.rendu());
            s.push_str("*I");
        }
        if s.is_empty() {
            s.push_str(self.reel.rendu());
        }
        s
    }
}

impl PartialEq for LitteralComplexe {
    fn eq(&self, autre: &Self) -> bool {
        self.reel == autre.reel && self.imag == autre.imag
    }
}
impl Eq for LitteralComplexe {}

/* ------------------------ Tests ------------------------ */

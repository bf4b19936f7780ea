//! Keyword and type-name tables for the pseudocode
//!
//! This is the single source of truth shared by the translator and the
//! validator. Every lookup expects a folded word (see [`super::fold`]).

use std::fmt;

/// Reserved words of the pseudocode language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    // Structure
    Algorithme,
    Var,
    Const,
    Debut,
    Fin,

    // Control flow
    Si,
    Alors,
    Sinon,
    Finsi,
    Pour,
    De,
    Allant,
    Pas,
    Faire,
    Finpour,
    Tantque,
    Fintantque,
    Sortir,

    // I/O
    Lire,
    Ecrire,

    // Operators
    Et,
    Ou,
    Non,
    Mod,
    Div,
    Puissance,
    Racine,

    // Boolean literals
    Vrai,
    Faux,
}

impl Keyword {
    /// Try to parse a folded word as a keyword
    pub fn from_str(s: &str) -> Option<Keyword> {
        match s {
            "algorithme" => Some(Keyword::Algorithme),
            "var" => Some(Keyword::Var),
            "const" => Some(Keyword::Const),
            "debut" => Some(Keyword::Debut),
            "fin" => Some(Keyword::Fin),

            "si" => Some(Keyword::Si),
            "alors" => Some(Keyword::Alors),
            "sinon" => Some(Keyword::Sinon),
            "finsi" => Some(Keyword::Finsi),
            "pour" => Some(Keyword::Pour),
            "de" => Some(Keyword::De),
            "allant" => Some(Keyword::Allant),
            "pas" => Some(Keyword::Pas),
            "faire" => Some(Keyword::Faire),
            "finpour" => Some(Keyword::Finpour),
            "tantque" => Some(Keyword::Tantque),
            "fintantque" => Some(Keyword::Fintantque),
            "sortir" => Some(Keyword::Sortir),

            "lire" => Some(Keyword::Lire),
            "ecrire" => Some(Keyword::Ecrire),

            "et" => Some(Keyword::Et),
            "ou" => Some(Keyword::Ou),
            "non" => Some(Keyword::Non),
            "mod" => Some(Keyword::Mod),
            "div" => Some(Keyword::Div),
            "puissance" => Some(Keyword::Puissance),
            "racine" => Some(Keyword::Racine),

            "vrai" => Some(Keyword::Vrai),
            "faux" => Some(Keyword::Faux),

            _ => None,
        }
    }

    /// The canonical (folded) spelling of the keyword
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Algorithme => "algorithme",
            Keyword::Var => "var",
            Keyword::Const => "const",
            Keyword::Debut => "debut",
            Keyword::Fin => "fin",
            Keyword::Si => "si",
            Keyword::Alors => "alors",
            Keyword::Sinon => "sinon",
            Keyword::Finsi => "finsi",
            Keyword::Pour => "pour",
            Keyword::De => "de",
            Keyword::Allant => "allant",
            Keyword::Pas => "pas",
            Keyword::Faire => "faire",
            Keyword::Finpour => "finpour",
            Keyword::Tantque => "tantque",
            Keyword::Fintantque => "fintantque",
            Keyword::Sortir => "sortir",
            Keyword::Lire => "lire",
            Keyword::Ecrire => "ecrire",
            Keyword::Et => "et",
            Keyword::Ou => "ou",
            Keyword::Non => "non",
            Keyword::Mod => "mod",
            Keyword::Div => "div",
            Keyword::Puissance => "puissance",
            Keyword::Racine => "racine",
            Keyword::Vrai => "vrai",
            Keyword::Faux => "faux",
        }
    }

    /// Python spelling for keywords that translate to a single operator or literal
    pub fn python(self) -> Option<&'static str> {
        match self {
            Keyword::Et => Some("and"),
            Keyword::Ou => Some("or"),
            Keyword::Non => Some("not"),
            Keyword::Mod => Some("%"),
            Keyword::Div => Some("//"),
            Keyword::Puissance => Some("**"),
            Keyword::Vrai => Some("True"),
            Keyword::Faux => Some("False"),
            _ => None,
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Primitive types a variable can be declared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarType {
    Integer,
    Float,
    Str,
    Bool,
    Char,
}

/// Type synonyms, folded and with all whitespace removed
const TYPE_SYNONYMS: &[(&str, VarType)] = &[
    ("entier", VarType::Integer),
    ("reel", VarType::Float),
    ("chaine", VarType::Str),
    ("chainedecaractere", VarType::Str),
    ("chainedecaracteres", VarType::Str),
    ("caractere", VarType::Char),
    ("charactere", VarType::Char),
    ("char", VarType::Char),
    ("booleen", VarType::Bool),
    ("boolean", VarType::Bool),
];

impl VarType {
    /// Resolve a declared type name. Case, accents and inner spacing are
    /// ignored, so `Chaîne de caractères` and `chaine de caractere` agree.
    pub fn from_name(name: &str) -> Option<VarType> {
        let key: String = super::fold(name)
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();
        TYPE_SYNONYMS
            .iter()
            .find(|(synonym, _)| *synonym == key)
            .map(|(_, ty)| *ty)
    }

    /// Python type name, used in the generated declaration comments
    pub fn python_name(self) -> &'static str {
        match self {
            VarType::Integer => "int",
            VarType::Float => "float",
            VarType::Str => "str",
            VarType::Bool => "bool",
            VarType::Char => "char",
        }
    }

    /// Default value a variable of this type is initialized with
    pub fn default_value(self) -> &'static str {
        match self {
            VarType::Integer => "0",
            VarType::Float => "0.0",
            VarType::Str | VarType::Char => "\"\"",
            VarType::Bool => "False",
        }
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.python_name())
    }
}

/// Whether `word` may not be used as an identifier
pub fn is_reserved(word: &str) -> bool {
    let folded = super::fold(word);
    Keyword::from_str(&folded).is_some() || VarType::from_name(&folded).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_synonyms() {
        assert_eq!(VarType::from_name("Entier"), Some(VarType::Integer));
        assert_eq!(VarType::from_name("réel"), Some(VarType::Float));
        assert_eq!(VarType::from_name("REEL"), Some(VarType::Float));
        assert_eq!(VarType::from_name("Chaîne de caractères"), Some(VarType::Str));
        assert_eq!(VarType::from_name("chaine de caractere"), Some(VarType::Str));
        assert_eq!(VarType::from_name("caractère"), Some(VarType::Char));
        assert_eq!(VarType::from_name("char"), Some(VarType::Char));
        assert_eq!(VarType::from_name("Booléen"), Some(VarType::Bool));
        assert_eq!(VarType::from_name("boolean"), Some(VarType::Bool));
        assert_eq!(VarType::from_name("tableau"), None);
    }

    #[test]
    fn test_keywords_roundtrip() {
        for kw in [Keyword::Si, Keyword::Fintantque, Keyword::Ecrire, Keyword::Faux] {
            assert_eq!(Keyword::from_str(kw.as_str()), Some(kw));
        }
        assert_eq!(Keyword::from_str("somme"), None);
    }

    #[test]
    fn test_reserved_words() {
        assert!(is_reserved("Si"));
        assert!(is_reserved("ÉCRIRE"));
        assert!(is_reserved("entier"));
        assert!(is_reserved("vrai"));
        assert!(!is_reserved("somme"));
        assert!(!is_reserved("a"));
    }
}

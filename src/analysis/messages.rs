//! Localized validator messages
//!
//! Every diagnostic kind has a French and an Arabic template. Templates hold
//! at most one `{}` placeholder, filled with the offending name or type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::Diagnostic;

/// Language of user-facing messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    French,
    Arabic,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fr" | "french" | "francais" => Ok(Locale::French),
            "ar" | "arabic" | "arabe" => Ok(Locale::Arabic),
            other => Err(format!("unknown language '{}' (expected french or arabic)", other)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::French => write!(f, "french"),
            Locale::Arabic => write!(f, "arabic"),
        }
    }
}

/// Categories of validator findings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    // Header
    AlgoMissing,
    AlgoNameInvalid,
    AlgoNameStartsWithNumber,
    AlgoNameHasSpaces,
    AlgoNameSpecialChars,
    AlgoNameReserved,

    // Sections
    VarSectionMissing,
    DebutMissing,
    FinMissing,

    // Declarations
    VarNameInvalid,
    VarNameReserved,
    VarTypeInvalid,
    VarMissingSemicolon,
    VarFormatInvalid,
    ConstValueMissing,
    ConstMissingSemicolon,
    ConstFormatInvalid,
    DuplicateVar,
    DuplicateConst,
    VarConstNameConflict,
    ConstVarNameConflict,

    // Instructions
    AssignmentMissingSemicolon,
    ReadMissingSemicolon,
    WriteMissingSemicolon,
    ReadInvalidSpacing,
    WriteInvalidSpacing,
    SortirMissingSemicolon,
    SiMissingAlors,
    TantqueMissingFaire,
    PourMissingFaire,
    PourInvalidFormat,
    InvalidInstruction,
    UndeclaredVariable,

    // Balance
    SiMissingFinsi,
    PourMissingFinpour,
    TantqueMissingFintantque,
    UnmatchedCloser,
}

impl DiagnosticKind {
    /// Stable snake_case identifier
    pub fn code(self) -> &'static str {
        use DiagnosticKind::*;
        match self {
            AlgoMissing => "algo_missing",
            AlgoNameInvalid => "algo_name_invalid",
            AlgoNameStartsWithNumber => "algo_name_starts_with_number",
            AlgoNameHasSpaces => "algo_name_has_spaces",
            AlgoNameSpecialChars => "algo_name_special_chars",
            AlgoNameReserved => "algo_name_reserved",
            VarSectionMissing => "var_section_missing",
            DebutMissing => "debut_missing",
            FinMissing => "fin_missing",
            VarNameInvalid => "var_name_invalid",
            VarNameReserved => "var_name_reserved",
            VarTypeInvalid => "var_type_invalid",
            VarMissingSemicolon => "var_missing_semicolon",
            VarFormatInvalid => "var_format_invalid",
            ConstValueMissing => "const_value_missing",
            ConstMissingSemicolon => "const_missing_semicolon",
            ConstFormatInvalid => "const_format_invalid",
            DuplicateVar => "duplicate_var",
            DuplicateConst => "duplicate_const",
            VarConstNameConflict => "var_const_name_conflict",
            ConstVarNameConflict => "const_var_name_conflict",
            AssignmentMissingSemicolon => "assignment_missing_semicolon",
            ReadMissingSemicolon => "read_missing_semicolon",
            WriteMissingSemicolon => "write_missing_semicolon",
            ReadInvalidSpacing => "read_invalid_spacing",
            WriteInvalidSpacing => "write_invalid_spacing",
            SortirMissingSemicolon => "sortir_missing_semicolon",
            SiMissingAlors => "si_missing_alors",
            TantqueMissingFaire => "tantque_missing_faire",
            PourMissingFaire => "pour_missing_faire",
            PourInvalidFormat => "pour_invalid_format",
            InvalidInstruction => "invalid_instruction",
            UndeclaredVariable => "undeclared_variable",
            SiMissingFinsi => "si_missing_finsi",
            PourMissingFinpour => "pour_missing_finpour",
            TantqueMissingFintantque => "tantque_missing_fintantque",
            UnmatchedCloser => "unmatched_closer",
        }
    }

    /// Message template for a locale
    pub fn template(self, locale: Locale) -> &'static str {
        let (french, arabic) = self.templates();
        match locale {
            Locale::French => french,
            Locale::Arabic => arabic,
        }
    }

    /// Message with the placeholder (if any) replaced by `arg`
    pub fn message(self, locale: Locale, arg: Option<&str>) -> String {
        let template = self.template(locale);
        match arg {
            Some(arg) => template.replacen("{}", arg, 1),
            None => template.to_string(),
        }
    }

    fn templates(self) -> (&'static str, &'static str) {
        use DiagnosticKind::*;
        match self {
            AlgoMissing => (
                "L'en-tête de l'algorithme est manquant. L'algorithme doit commencer par 'algorithme nom_algo'.",
                "عليك بكتابة رأس الخورازمية بطريقة صحيحة Algorithme ثم اسم الخوارزمية.",
            ),
            AlgoNameInvalid => (
                "Le nom de l'algorithme est invalide. Il doit suivre les règles de nommage des variables.",
                "اسم الخوارزمية غير صالح. يجب أن يتبع قواعد تسمية المتغيرات.",
            ),
            AlgoNameStartsWithNumber => (
                "Le nom de l'algorithme ne peut pas commencer par un chiffre.",
                "لا يمكن أن يبدأ اسم الخوارزمية برقم.",
            ),
            AlgoNameHasSpaces => (
                "Le nom de l'algorithme ne peut pas contenir d'espaces.",
                "لا يمكن أن يحتوي اسم الخوارزمية على مسافات.",
            ),
            AlgoNameSpecialChars => (
                "Le nom de l'algorithme ne peut pas contenir de caractères spéciaux sauf '_'.",
                "لا يمكن أن يحتوي اسم الخوارزمية على أحرف خاصة باستثناء '_'.",
            ),
            AlgoNameReserved => (
                "Le nom de l'algorithme ne peut pas être un mot réservé.",
                "لا يمكن أن يكون اسم الخوارزمية كلمة محجوزة.",
            ),
            VarSectionMissing => (
                "La section 'var' est manquante ou mal positionnée.",
                "قسم التصريح عن المتغيرات 'var' مفقود, مكتوب بطريقة غير صحيحة أو في موضع غير صحيح.",
            ),
            DebutMissing => (
                "Le mot-clé 'debut' est manquant.",
                "الكلمة المفتاحية 'debut' مفقودة.",
            ),
            FinMissing => (
                "Le mot-clé 'fin' est manquant.",
                "الكلمة المفتاحية 'fin' مفقودة.",
            ),
            VarNameInvalid => (
                "Le nom de la variable '{}' est invalide. Il doit suivre les règles de nommage des variables.",
                "اسم المتغير '{}' خاطئ. يجب أن يتبع قواعد تسمية المتغيرات.",
            ),
            VarNameReserved => (
                "Le nom de la variable '{}' ne peut pas être un mot réservé.",
                "لا يمكن أن يكون اسم المتغير '{}' كلمة محجوزة.",
            ),
            VarTypeInvalid => (
                "Le type '{}' n'est pas valide. Types valides: Entier, Reel, Chaine, Caractere, Booleen.",
                "النوع '{}' خاطئ. الأنواع الصالحة: Entier, Reel, Chaine de caractere, Caractere, Booleen.",
            ),
            VarMissingSemicolon => (
                "Il manque un point-virgule (;) à la fin de la déclaration de variable.",
                "نقطة الفاصلة المنقوطة (;) مفقودة في نهاية إعلان المتغير.",
            ),
            VarFormatInvalid => (
                "Format de déclaration de variable invalide. Format valide: 'var_name: type;'",
                "تنسيق إعلان المتغير غير صالح. التنسيق الصالح: 'var_name: type;'",
            ),
            ConstValueMissing => (
                "La constante '{}' doit avoir une valeur assignée.",
                "يجب أن يكون للثابت '{}' قيمة معينة.",
            ),
            ConstMissingSemicolon => (
                "Il manque un point-virgule (;) à la fin de la déclaration de constante.",
                "نقطة الفاصلة المنقوطة (;) مفقودة في نهاية إعلان الثابت.",
            ),
            ConstFormatInvalid => (
                "Format de déclaration de constante invalide. Format valide: 'const_name=value;'",
                "تنسيق إعلان الثابت غير صالح. التنسيق الصالح: 'const_name=value;'",
            ),
            DuplicateVar => (
                "Variable '{}' déjà déclarée. Les noms des variables doivent être uniques.",
                "المتغير '{}' تم الإعلان عنه مسبقاً. أسماء المتغيرات يجب أن تكون فريدة.",
            ),
            DuplicateConst => (
                "Constante '{}' déjà déclarée. Les noms des constantes doivent être uniques.",
                "الثابت '{}' تم الإعلان عنه مسبقاً. أسماء الثوابت يجب أن تكون فريدة.",
            ),
            VarConstNameConflict => (
                "Le nom '{}' est déjà utilisé comme constante. Les noms des variables et constantes doivent être uniques.",
                "الاسم '{}' مستخدم بالفعل كثابت. أسماء المتغيرات والثوابت يجب أن تكون فريدة.",
            ),
            ConstVarNameConflict => (
                "Le nom '{}' est déjà utilisé comme variable. Les noms des variables et constantes doivent être uniques.",
                "الاسم '{}' مستخدم بالفعل كمتغير. أسماء المتغيرات والثوابت يجب أن تكون فريدة.",
            ),
            AssignmentMissingSemicolon => (
                "Il manque un point-virgule (;) à la fin de cette affectation.",
                "الفاصلة المنقوطة (;) مفقودة في نهاية عملية الإسناد.",
            ),
            ReadMissingSemicolon => (
                "Il manque un point-virgule (;) à la fin de l'instruction 'lire'.",
                "الفاصلة المنقوطة (;) مفقودة في نهاية تعليمة القراءة 'lire'.",
            ),
            WriteMissingSemicolon => (
                "Il manque un point-virgule (;) à la fin de l'instruction 'ecrire'.",
                "الفاصلة المنقوطة (;) مفقودة في نهاية تعليمة الكتابة 'ecrire'.",
            ),
            ReadInvalidSpacing => (
                "Il ne doit pas y avoir d'espace entre 'lire' et '('.",
                "يجب أن لا يكون هناك مسافة بين 'lire' و '('.",
            ),
            WriteInvalidSpacing => (
                "Il ne doit pas y avoir d'espace entre 'ecrire' et '('.",
                "يجب أن لا يكون هناك مسافة بين 'ecrire' و '('.",
            ),
            SortirMissingSemicolon => (
                "Il manque un point-virgule (;) à la fin de l'instruction 'sortir'.",
                "نقطة الفاصلة المنقوطة (;) مفقودة في نهاية تعليمة 'sortir'.",
            ),
            SiMissingAlors => (
                "L'instruction 'si' doit être suivie par 'alors'.",
                "تعليمة 'si' يجب أن تتبع بـ 'alors'.",
            ),
            TantqueMissingFaire => (
                "L'instruction 'tantque' doit être suivie par 'faire'.",
                "تعليمة 'tantque' يجب أن تتبع بـ 'faire'.",
            ),
            PourMissingFaire => (
                "L'instruction 'pour' doit se terminer par 'faire'.",
                "تعليمة 'pour' يجب أن تنتهي بـ 'faire'.",
            ),
            PourInvalidFormat => (
                "Format de boucle 'pour' invalide. Formats valides: 'pour var de val1 a val2 faire', 'pour var de val1 allant a val2 faire', 'pour var allant de val1 a val2 faire', 'pour var allant a val2 faire', ou avec l'option 'pas'.",
                "تنسيق حلقة 'pour' غير صالح. التنسيقات الصالحة: 'pour var de val1 a val2 faire', 'pour var de val1 allant a val2 faire', 'pour var allant de val1 a val2 faire', 'pour var allant a val2 faire' أو مع خيار 'pas'.",
            ),
            InvalidInstruction => (
                "Instruction non reconnue dans le bloc principal. Les instructions valides sont: lire, ecrire, affectation (<-), si...alors, pour...faire, tantque...faire, sortir ou commentaire.",
                "تعليمة غير معروفة في الكتلة الرئيسية. التعليمات الصالحة هي: lire, ecrire, affectation (<-), si...alors, pour...faire, tantque...faire, sortir أو تعليق.",
            ),
            UndeclaredVariable => (
                "La variable '{}' est utilisée mais n'a pas été déclarée.",
                "المتغير '{}' مستخدم ولكن لم يتم إعلانه.",
            ),
            SiMissingFinsi => (
                "L'instruction 'si' n'a pas de 'finsi' correspondant.",
                "تعليمة 'si' ليس لها 'finsi'.",
            ),
            PourMissingFinpour => (
                "L'instruction 'pour' n'a pas de 'finpour' correspondant.",
                "تعليمة 'pour' ليس لها 'finpour'.",
            ),
            TantqueMissingFintantque => (
                "L'instruction 'tantque' n'a pas de 'fintantque' correspondant.",
                "تعليمة 'tantque' ليس لها 'fintantque'.",
            ),
            UnmatchedCloser => (
                "Le mot-clé '{}' ne ferme aucun bloc ouvert.",
                "الكلمة المفتاحية '{}' لا تغلق أي كتلة مفتوحة.",
            ),
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The message shown when compilation is aborted: the first diagnostic in
/// full, plus the total count when there is more than one.
pub fn summary(diagnostics: &[Diagnostic], locale: Locale) -> Option<String> {
    let first = diagnostics.first()?;

    let mut text = match locale {
        Locale::French => format!(
            "Erreur de syntaxe à la ligne {}:\n\n\"{}\"\n\n{}",
            first.line, first.text, first.message
        ),
        Locale::Arabic => format!(
            "خطأ في بناء الجملة في السطر {}:\n\n\"{}\"\n\n{}",
            first.line, first.text, first.message
        ),
    };

    if diagnostics.len() > 1 {
        let more = match locale {
            Locale::French => format!(
                "\n\nIl y a {} erreurs au total. Corrigez celle-ci et recompilez.",
                diagnostics.len()
            ),
            Locale::Arabic => format!(
                "\n\nهناك {} أخطاء في المجموع. قم بتصحيح هذا الخطأ وأعد التجميع.",
                diagnostics.len()
            ),
        };
        text.push_str(&more);
    }

    Some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_filled() {
        let msg = DiagnosticKind::DuplicateVar.message(Locale::French, Some("x"));
        assert_eq!(
            msg,
            "Variable 'x' déjà déclarée. Les noms des variables doivent être uniques."
        );

        let msg = DiagnosticKind::UndeclaredVariable.message(Locale::Arabic, Some("y"));
        assert!(msg.contains("'y'"));
        assert!(!msg.contains("{}"));
    }

    #[test]
    fn test_code_matches_serialized_name() {
        for kind in [
            DiagnosticKind::ReadInvalidSpacing,
            DiagnosticKind::AlgoNameStartsWithNumber,
            DiagnosticKind::TantqueMissingFintantque,
            DiagnosticKind::VarConstNameConflict,
            DiagnosticKind::UnmatchedCloser,
        ] {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.code()));
        }
    }

    #[test]
    fn test_locale_parsing() {
        assert_eq!("fr".parse::<Locale>(), Ok(Locale::French));
        assert_eq!("Arabic".parse::<Locale>(), Ok(Locale::Arabic));
        assert!("klingon".parse::<Locale>().is_err());
    }

    #[test]
    fn test_summary() {
        assert_eq!(summary(&[], Locale::French), None);

        let first = Diagnostic::new(
            4,
            "si x > 0 alors",
            DiagnosticKind::SiMissingFinsi,
            Locale::French,
            None,
        );
        let second = Diagnostic::new(
            5,
            "lire (x);",
            DiagnosticKind::ReadInvalidSpacing,
            Locale::French,
            None,
        );

        let one = summary(std::slice::from_ref(&first), Locale::French).unwrap();
        assert!(one.starts_with("Erreur de syntaxe à la ligne 4:"));
        assert!(!one.contains("au total"));

        let two = summary(&[first, second], Locale::French).unwrap();
        assert!(two.ends_with("Il y a 2 erreurs au total. Corrigez celle-ci et recompilez."));
    }
}

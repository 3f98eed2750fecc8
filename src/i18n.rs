use leptos::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Fr,
    Ar,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Fr => "fr",
            Language::Ar => "ar",
        }
    }

    pub fn dir(self) -> &'static str {
        match self {
            Language::Fr => "ltr",
            Language::Ar => "rtl",
        }
    }
}

#[derive(Clone, Copy)]
pub struct LanguageContext {
    pub language: ReadSignal<Language>,
    pub set_language: WriteSignal<Language>,
}

impl LanguageContext {
    /// Reactive lookup of `key` in the current language.
    pub fn t(&self, key: &'static str) -> &'static str {
        translate(self.language.get(), key)
    }
}

pub fn use_language() -> LanguageContext {
    expect_context::<LanguageContext>()
}

/// Set `lang` and `dir` on `<html>` so the whole document flips for Arabic.
pub fn apply_language(language: Language) {
    if let Some(window) = web_sys::window() {
        if let Some(doc) = window.document() {
            if let Some(html) = doc.document_element() {
                let _ = html.set_attribute("lang", language.code());
                let _ = html.set_attribute("dir", language.dir());
            }
        }
    }
}

/// Label for `key`; unknown keys are shown as-is.
pub fn translate(language: Language, key: &'static str) -> &'static str {
    let entry = DICTIONARY.iter().find(|(k, _, _)| *k == key);
    match (entry, language) {
        (Some((_, fr, _)), Language::Fr) => *fr,
        (Some((_, _, ar)), Language::Ar) => *ar,
        (None, _) => key,
    }
}

// key, French, Arabic
const DICTIONARY: &[(&str, &str, &str)] = &[
    ("appTitle", "Fiches de préparation", "جذاذات التحضير"),
    ("navGenerator", "Générateur", "المولد"),
    ("navProfile", "Profil", "الملف الشخصي"),
    ("switchLanguage", "العربية", "Français"),
    ("generatorTitle", "Générer une fiche", "توليد جذاذة"),
    ("subject", "Matière", "المادة"),
    ("level", "Niveau", "المستوى"),
    ("period", "Période", "الفترة"),
    ("week", "Semaine", "الأسبوع"),
    ("session", "Séance", "الحصة"),
    ("choose", "-- Choisir --", "-- اختر --"),
    ("loadingLessons", "Chargement des leçons...", "جاري تحميل الدروس..."),
    ("loadError", "Impossible de charger les leçons.", "تعذر تحميل الدروس."),
    ("checkBackend", "Vérifiez que le serveur est démarré.", "تأكد من تشغيل الخادم."),
    ("noLessons", "Aucune leçon disponible.", "لا توجد دروس متاحة."),
    ("selectedLesson", "Leçon sélectionnée", "الدرس المختار"),
    ("noMatch", "Aucune leçon ne correspond à cette sélection.", "لا يوجد درس مطابق لهذا الاختيار."),
    ("ambiguous", "Plusieurs leçons correspondent à cette sélection.", "عدة دروس تطابق هذا الاختيار."),
    ("generate", "Générer", "توليد"),
    ("analyzing", "Analyse du contenu...", "جاري تحليل المحتوى..."),
    ("rendering", "Création du PDF...", "جاري إنشاء ملف PDF..."),
    ("generationFailed", "La génération a échoué", "فشل التوليد"),
    ("retry", "Réessayer", "إعادة المحاولة"),
    ("downloadPdf", "Télécharger le PDF", "تحميل PDF"),
    ("downloadMindmap", "Télécharger la carte mentale", "تحميل الخريطة الذهنية"),
    ("pdfMissing", "Le PDF n'a pas été généré.", "لم يتم إنشاء ملف PDF."),
    ("savedTo", "Enregistré :", "تم الحفظ في:"),
    ("lessonData", "Contenu de la fiche", "محتوى الجذاذة"),
    ("uploadTitle", "Importer une présentation", "استيراد عرض تقديمي"),
    ("uploadHint", "Générer directement depuis un fichier .pptx.", "التوليد مباشرة من ملف ‎.pptx."),
    ("upload", "Importer et générer", "استيراد وتوليد"),
    ("processing", "Traitement...", "جاري المعالجة..."),
    ("selectPptx", "Veuillez choisir un fichier PPTX.", "المرجو اختيار ملف PPTX."),
    ("profileTitle", "Profil de l'enseignant", "ملف الأستاذ"),
    ("frenchSection", "Informations en français", "المعلومات بالفرنسية"),
    ("arabicSection", "Informations en arabe", "المعلومات بالعربية"),
    ("sharedSection", "Informations communes", "معلومات مشتركة"),
    ("name", "Nom", "الاسم"),
    ("ppr", "PPR", "رقم التأجير"),
    ("schoolYear", "Année scolaire", "السنة الدراسية"),
    ("school", "Établissement", "المؤسسة"),
    ("teachingLevel", "Niveau", "المستوى"),
    ("save", "Enregistrer", "حفظ"),
    ("saving", "Enregistrement...", "جاري الحفظ..."),
    ("profileSaved", "Profil enregistré.", "تم حفظ الملف."),
    ("fillNameError", "Veuillez saisir un nom.", "المرجو إدخال الاسم."),
    ("failedSave", "Échec de l'enregistrement.", "فشل الحفظ."),
    ("errorSaving", "Erreur lors de l'enregistrement.", "حدث خطأ أثناء الحفظ."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_has_both_languages() {
        for (key, fr, ar) in DICTIONARY {
            assert!(!fr.is_empty(), "{} has no French label", key);
            assert!(!ar.is_empty(), "{} has no Arabic label", key);
        }
    }

    #[test]
    fn test_keys_are_unique() {
        for (i, (key, _, _)) in DICTIONARY.iter().enumerate() {
            assert!(
                DICTIONARY[i + 1..].iter().all(|(k, _, _)| k != key),
                "duplicate key {}",
                key
            );
        }
    }

    #[test]
    fn test_translate() {
        assert_eq!(translate(Language::Fr, "generate"), "Générer");
        assert_eq!(translate(Language::Ar, "generate"), "توليد");
        assert_eq!(translate(Language::Ar, "missingKey"), "missingKey");
    }
}

//! Bootstrap seeder: canonical bilingual school taxonomy.
//!
//! Populates an empty catalog in one pass: four levels, their years, the
//! fixed category set and per-year subject lists. A non-empty levels table
//! makes the whole pass a no-op, so running it at every startup is safe.
//!
//! Level, year and category inserts are structural and propagate errors.
//! Subject inserts are best-effort: a failed row is logged and skipped and
//! the batch continues.

use rusqlite::Connection;
use tracing::{debug, info, warn};

use crate::error::AppError;
use crate::store::catalog;

// ── Canonical data ────────────────────────────────────────────────────────────

/// (name, name_ar, color)
const LEVELS: &[(&str, &str, &str)] = &[
    ("Primaire", "التعليم الابتدائي", "#ef4444"),
    ("Moyen", "التعليم المتوسط", "#10b981"),
    ("Lycée", "التعليم الثانوي", "#f59e0b"),
    ("Université", "الجامعة", "#06b6d4"),
];

/// (name, name_ar)
const PRIMAIRE_YEARS: &[(&str, &str)] = &[
    ("Année 1 primaire", "السنة الأولى ابتدائي"),
    ("Année 2 primaire", "السنة الثانية ابتدائي"),
    ("Année 3 primaire", "السنة الثالثة ابتدائي"),
    ("Année 4 primaire", "السنة الرابعة ابتدائي"),
    ("Année 5 primaire", "السنة الخامسة ابتدائي"),
];

const MOYEN_YEARS: &[(&str, &str)] = &[
    ("Année 1 moyen", "السنة الأولى متوسط"),
    ("Année 2 moyen", "السنة الثانية متوسط"),
    ("Année 3 moyen", "السنة الثالثة متوسط"),
    ("Année 4 moyen", "السنة الرابعة متوسط"),
];

const LYCEE_YEARS: &[(&str, &str)] = &[
    ("Année 1 secondaire", "السنة الأولى ثانوي"),
    ("Année 2 secondaire", "السنة الثانية ثانوي"),
    ("Année 3 secondaire", "السنة الثالثة ثانوي"),
];

/// (name, name_ar)
const CATEGORIES: &[(&str, &str)] = &[
    ("Cours", "دروس"),
    ("Examens", "اختبارات"),
    ("Exercices", "تمارين"),
    ("Compositions", "فروض"),
    ("Résumés", "ملخصات"),
];

/// (name, name_ar, icon) — shared by all five primaire years.
const PRIMAIRE_SUBJECTS: &[(&str, &str, &str)] = &[
    ("Mathématiques", "الرياضيات", "📐"),
    ("Arabe", "اللغة العربية", "📖"),
    ("Français", "اللغة الفرنسية", "🇫🇷"),
    ("Anglais", "اللغة الإنجليزية", "🇬🇧"),
    ("Éducation Islamique", "التربية الإسلامية", "✨"),
    ("Sciences et Technologie", "التربية العلمية والتكنولوجية", "🔬"),
    ("Arts", "التربية الفنية", "🎨"),
    ("Éducation Civique", "التربية المدنية", "🏛️"),
    ("Musique", "التربية الموسيقية", "🎵"),
    ("Amazigh", "اللغة الأمازيغية", "ⵣ"),
    ("Activités", "أنشطة", "🖥️"),
    ("Écriture", "تعلم الكتابة", "✏️"),
    ("Fichiers divers", "ملفات متنوعة", "📁"),
    ("Chaînes YouTube", "قنوات يوتيوب", "▶️"),
    ("Conseils", "نصائح وتوجيهات", "💡"),
    ("Page principale", "الصفحة الرئيسية", "🏠"),
];

/// Shared by all four moyen years.
const MOYEN_SUBJECTS: &[(&str, &str, &str)] = &[
    ("Mathématiques", "الرياضيات", "📐"),
    ("Arabe", "اللغة العربية", "📖"),
    ("Français", "اللغة الفرنسية", "🇫🇷"),
    ("Anglais", "اللغة الإنجليزية", "🇬🇧"),
    ("Éducation Islamique", "التربية الإسلامية", "✨"),
    ("Histoire et Géographie", "التاريخ والجغرافيا", "🌍"),
    ("Sciences de la Nature et de la Vie", "علوم الطبيعة والحياة", "🔬"),
    ("Sciences Physiques", "العلوم الفيزيائية", "⚗️"),
    ("Éducation Civique", "التربية المدنية", "🏛️"),
    ("Arts", "التربية الفنية", "🎨"),
    ("Amazigh", "اللغة الأمازيغية", "ⵣ"),
    ("Informatique", "الإعلام الآلي", "💻"),
    ("Musique", "التربية الموسيقية", "🎵"),
    ("Chaînes YouTube", "قنوات يوتيوب", "▶️"),
    ("Calculateur de moyenne", "برنامج حساب المعدل", "🧮"),
    ("Page principale", "الصفحة الرئيسية", "🏠"),
    ("Conseils", "نصائح وتوجيهات", "💡"),
];

/// Each lycée year carries its own list; streams diverge after year 1.
const LYCEE1_SUBJECTS: &[(&str, &str, &str)] = &[
    ("Mathématiques", "الرياضيات", "📐"),
    ("Arabe", "اللغة العربية", "📖"),
    ("Français", "اللغة الفرنسية", "🇫🇷"),
    ("Anglais", "اللغة الإنجليزية", "🇬🇧"),
    ("Éducation Islamique", "التربية الإسلامية", "✨"),
    ("Histoire et Géographie", "التاريخ والجغرافيا", "🌍"),
    ("Sciences de la Nature et de la Vie", "علوم الطبيعة والحياة", "🔬"),
    ("Sciences Physiques", "العلوم الفيزيائية", "⚗️"),
    ("Technologie", "التكنولوجيا", "⚙️"),
    ("Informatique", "الإعلام الآلي", "💻"),
    ("Amazigh", "اللغة الأمازيغية", "ⵣ"),
    ("Arts", "التربية الفنية", "🎨"),
    ("Fichiers divers", "ملفات متنوعة", "📁"),
    ("Chaînes YouTube", "قنوات يوتيوب", "▶️"),
    ("Calculateur de moyenne", "برنامج حساب المعدل", "🧮"),
    ("Page principale", "الصفحة الرئيسية", "🏠"),
    ("Conseils", "نصائح وتوجيهات", "💡"),
];

const LYCEE2_SUBJECTS: &[(&str, &str, &str)] = &[
    ("Mathématiques", "الرياضيات", "📐"),
    ("Arabe", "اللغة العربية", "📖"),
    ("Français", "اللغة الفرنسية", "🇫🇷"),
    ("Anglais", "اللغة الإنجليزية", "🇬🇧"),
    ("Éducation Islamique", "التربية الإسلامية", "✨"),
    ("Histoire et Géographie", "التاريخ والجغرافيا", "🌍"),
    ("Sciences de la Nature et de la Vie", "علوم الطبيعة والحياة", "🔬"),
    ("Sciences Physiques", "العلوم الفيزيائية", "⚗️"),
    ("Gestion Comptable et Financière", "التسيير المحاسبي والمالي", "📊"),
    ("Économie et Management", "الإقتصاد والمناجمنت", "📈"),
    ("Droit", "القانون", "⚖️"),
    ("Génie Civil", "الهندسة المدنية", "🏗️"),
    ("Génie des Procédés", "هندسة الطرائق", "🔧"),
    ("Génie Mécanique", "الهندسة الميكانيكية", "⚙️"),
    ("Génie Électrique", "الهندسة الكهربائية", "⚡"),
    ("Espagnol", "اللغة الإسبانية", "🇪🇸"),
    ("Allemand", "اللغة الألمانية", "🇩🇪"),
    ("Amazigh", "اللغة الأمازيغية", "ⵣ"),
    ("Italien", "اللغة الإيطالية", "🇮🇹"),
    ("Philosophie", "الفلسفة", "🤔"),
    ("Arts", "التربية الفنية", "🎨"),
    ("Fichiers divers", "ملفات متنوعة", "📁"),
    ("Chaînes YouTube", "قنوات يوتيوب", "▶️"),
    ("Calculateur de moyenne", "برنامج حساب المعدل", "🧮"),
    ("Page principale", "الصفحة الرئيسية", "🏠"),
    ("Conseils", "نصائح وتوجيهات", "💡"),
];

const LYCEE3_SUBJECTS: &[(&str, &str, &str)] = &[
    ("Mathématiques", "الرياضيات", "📐"),
    ("Arabe", "اللغة العربية", "📖"),
    ("Français", "اللغة الفرنسية", "🇫🇷"),
    ("Anglais", "اللغة الإنجليزية", "🇬🇧"),
    ("Éducation Islamique", "التربية الإسلامية", "✨"),
    ("Histoire et Géographie", "التاريخ والجغرافيا", "🌍"),
    ("Sciences de la Nature et de la Vie", "علوم الطبيعة والحياة", "🔬"),
    ("Sciences Physiques", "العلوم الفيزيائية", "⚗️"),
    ("Philosophie", "الفلسفة", "🤔"),
    ("Gestion Comptable et Financière", "التسيير المحاسبي والمالي", "📊"),
    ("Économie et Management", "الإقتصاد والمناجمنت", "📈"),
    ("Droit", "القانون", "⚖️"),
    ("Génie Civil", "الهندسة المدنية", "🏗️"),
    ("Génie des Procédés", "هندسة الطرائق", "🔧"),
    ("Génie Mécanique", "الهندسة الميكانيكية", "⚙️"),
    ("Génie Électrique", "الهندسة الكهربائية", "⚡"),
    ("Espagnol", "اللغة الإسبانية", "🇪🇸"),
    ("Allemand", "اللغة الألمانية", "🇩🇪"),
    ("Amazigh", "اللغة الأمازيغية", "ⵣ"),
    ("Italien", "اللغة الإيطالية", "🇮🇹"),
    ("Portail Universitaire", "بوابة التعليم الجامعي", "🎓"),
    ("Guide du Baccalauréat", "مواضيع ودليل شهادة الباكالوريا", "📝"),
    ("Chaînes YouTube", "قنوات يوتيوب", "▶️"),
    ("Calculateur de moyenne", "برنامج حساب المعدل", "🧮"),
    ("Page principale", "الصفحة الرئيسية", "🏠"),
    ("Conseils", "نصائح وتوجيهات", "💡"),
];

// ── Seeding ───────────────────────────────────────────────────────────────────

/// Populate the canonical taxonomy if the levels table is empty.
/// Returns `Ok(true)` when data was inserted, `Ok(false)` on the no-op.
pub fn seed_if_empty(conn: &Connection) -> Result<bool, AppError> {
    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM levels", [], |row| row.get(0))
        .map_err(|e| AppError::Storage(format!("seed: count levels: {e}")))?;
    if count > 0 {
        debug!("catalog already populated, skipping seed");
        return Ok(false);
    }

    let mut level_ids = Vec::with_capacity(LEVELS.len());
    for &(name, name_ar, color) in LEVELS {
        level_ids.push(catalog::create_level(conn, name, name_ar, color)?.id);
    }

    let mut years = 0usize;
    let mut subjects = 0usize;

    for &(name, name_ar) in PRIMAIRE_YEARS {
        let year = catalog::create_year(conn, level_ids[0], name, name_ar)?;
        years += 1;
        subjects += insert_subjects(conn, year.id, PRIMAIRE_SUBJECTS);
    }

    for &(name, name_ar) in MOYEN_YEARS {
        let year = catalog::create_year(conn, level_ids[1], name, name_ar)?;
        years += 1;
        subjects += insert_subjects(conn, year.id, MOYEN_SUBJECTS);
    }

    let lycee_subjects: [&[(&str, &str, &str)]; 3] =
        [LYCEE1_SUBJECTS, LYCEE2_SUBJECTS, LYCEE3_SUBJECTS];
    for (&(name, name_ar), list) in LYCEE_YEARS.iter().zip(lycee_subjects) {
        let year = catalog::create_year(conn, level_ids[2], name, name_ar)?;
        years += 1;
        subjects += insert_subjects(conn, year.id, list);
    }

    for &(name, name_ar) in CATEGORIES {
        catalog::create_category(conn, name, name_ar)?;
    }

    info!(
        levels = LEVELS.len(),
        years,
        categories = CATEGORIES.len(),
        subjects,
        "seeded canonical catalog"
    );
    Ok(true)
}

/// Insert one subject list under a year. Returns the number of rows that
/// made it in; failures are logged and skipped.
fn insert_subjects(conn: &Connection, year_id: i64, list: &[(&str, &str, &str)]) -> usize {
    let mut inserted = 0;
    for &(name, name_ar, icon) in list {
        match catalog::create_subject(conn, year_id, name, name_ar, icon) {
            Ok(_) => inserted += 1,
            Err(e) => warn!(year_id, subject = name, error = %e, "skipping subject seed row"),
        }
    }
    inserted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::testutil::test_conn;

    fn table_count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn seeds_canonical_counts_on_empty_db() {
        let (_tmp, conn, _path) = test_conn();
        assert!(seed_if_empty(&conn).unwrap());

        assert_eq!(table_count(&conn, "levels"), 4);
        assert_eq!(table_count(&conn, "years"), 12);
        assert_eq!(table_count(&conn, "categories"), 5);
        // 5 × 16 primaire + 4 × 17 moyen + 17 + 26 + 26 lycée
        assert_eq!(table_count(&conn, "subjects"), 217);
    }

    #[test]
    fn second_seed_is_a_noop() {
        let (_tmp, conn, _path) = test_conn();
        assert!(seed_if_empty(&conn).unwrap());
        assert!(!seed_if_empty(&conn).unwrap());
        assert_eq!(table_count(&conn, "levels"), 4);
        assert_eq!(table_count(&conn, "subjects"), 217);
    }

    #[test]
    fn any_existing_level_suppresses_seeding() {
        let (_tmp, conn, _path) = test_conn();
        catalog::create_level(&conn, "Custom", "مخصص", "#000000").unwrap();
        assert!(!seed_if_empty(&conn).unwrap());
        assert_eq!(table_count(&conn, "levels"), 1);
        assert_eq!(table_count(&conn, "years"), 0);
    }

    #[test]
    fn seeded_hierarchy_is_linked() {
        let (_tmp, conn, _path) = test_conn();
        seed_if_empty(&conn).unwrap();

        let levels = catalog::list_levels(&conn).unwrap();
        assert_eq!(levels[0].name, "Primaire");
        assert_eq!(levels[0].color, "#ef4444");
        // Université carries no years.
        assert!(catalog::list_years(&conn, levels[3].id).unwrap().is_empty());

        let primaire_years = catalog::list_years(&conn, levels[0].id).unwrap();
        assert_eq!(primaire_years.len(), 5);
        assert_eq!(
            primaire_years[0].level_name.as_deref(),
            Some("التعليم الابتدائي")
        );

        let subjects = catalog::list_subjects(&conn, primaire_years[0].id).unwrap();
        assert_eq!(subjects.len(), 16);
        assert_eq!(subjects[0].name, "Mathématiques");
    }
}

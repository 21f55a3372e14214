//! User-facing strings shared by every host.
//!
//! The site is French; wording follows the pages the feed is embedded in.

pub const LOADING: &str = "Chargement...";
pub const NO_ARTICLES: &str = "Aucun article disponible.";
pub const LOAD_FAILED: &str = "Impossible de charger les articles.";
pub const RETRY: &str = "Réessayer";
pub const SUMMARY_UNAVAILABLE: &str = "Résumé non disponible.";
pub const READ_MORE: &str = "Lire la suite →";
pub const SHOW_LESS: &str = "Réduire";
pub const BACK_TO_LIST: &str = "← Retour au blog";
pub const PREVIOUS: &str = "Précédent";
pub const NEXT: &str = "Suivant";

/// "Page 2 sur 5"
pub fn page_info(current: usize, total: usize) -> String {
    format!("Page {} sur {}", current, total)
}

/// Not-found notice naming the requested identifier.
pub fn not_found(slug: &str) -> String {
    format!("Article « {} » introuvable.", slug)
}

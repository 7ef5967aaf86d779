use uuid::Uuid;

use crate::{db::ContentStore, error::AppResult, models::content::ContentKind};

/// Minúsculas, cada racha de caracteres no alfanuméricos pasa a ser un solo
/// guion, sin guiones al inicio ni al final. Puede devolver una cadena vacía.
pub fn generate_slug(input: &str) -> String {
    let mut slug = String::with_capacity(input.len());
    let mut prev_hyphen = false;

    for ch in input.to_lowercase().chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch);
            prev_hyphen = false;
        } else if !prev_hyphen {
            slug.push('-');
            prev_hyphen = true;
        }
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    while slug.starts_with('-') {
        slug.remove(0);
    }

    slug
}

/// Devuelve `candidate` si está libre (o si lo usa el propio registro
/// `current_id`); si no, prueba `candidate-1`, `candidate-2`, ... hasta dar con
/// uno libre. Una consulta al store por candidato.
pub async fn ensure_unique_slug(
    store: &dyn ContentStore,
    kind: ContentKind,
    candidate: &str,
    current_id: Option<Uuid>,
) -> AppResult<String> {
    let mut slug = candidate.to_string();
    let mut counter = 1u32;

    loop {
        match store.find_id_by_slug(kind, &slug).await? {
            None => break,
            Some(owner) if Some(owner) == current_id => break,
            Some(_) => {
                slug = format!("{}-{}", candidate, counter);
                counter += 1;
            }
        }
    }

    if slug != candidate {
        tracing::debug!(%kind, candidate, resolved = %slug, "Slug ocupado, se añadió sufijo");
    }

    Ok(slug)
}

/// Slug de un título nuevo; si el título no deja nada usable se genera uno
/// aleatorio.
pub fn slug_for_title(kind: ContentKind, title: &str) -> String {
    let slug = generate_slug(title);
    if slug.is_empty() {
        format!("{}-{}", kind, Uuid::new_v4().simple())
    } else {
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;

    fn is_clean(slug: &str) -> bool {
        slug.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
            && !slug.starts_with('-')
            && !slug.ends_with('-')
    }

    #[test]
    fn slugifies_titles() {
        assert_eq!(generate_slug("Hello, World!"), "hello-world");
        assert_eq!(generate_slug("  --Policy   Brief 2024--  "), "policy-brief-2024");
        assert_eq!(generate_slug("Año Económico"), "a-o-econ-mico");
        assert_eq!(generate_slug("!!!"), "");
        assert_eq!(generate_slug(""), "");
    }

    #[test]
    fn slugs_are_clean_and_idempotent() {
        let titles = [
            "Hello, World!",
            "Ünïcödé & Friends",
            "already-a-slug",
            "  spaces   everywhere ",
            "MiXeD_CaSe__and__Under_scores",
            "tabs\tand\nnewlines",
            "ＦＵＬＬ width",
            "K for Kelvin",
        ];
        for title in titles {
            let once = generate_slug(title);
            assert!(is_clean(&once), "{title:?} -> {once:?}");
            assert_eq!(generate_slug(&once), once);
        }
    }

    #[test]
    fn empty_titles_get_random_slug() {
        let slug = slug_for_title(ContentKind::Research, "???");
        assert!(slug.starts_with("research-"));
        assert!(is_clean(&slug));
    }

    #[tokio::test]
    async fn free_candidate_is_returned_as_is() {
        let store = MemoryStore::new();
        let slug = ensure_unique_slug(&store, ContentKind::Blog, "policy-brief", None)
            .await
            .unwrap();
        assert_eq!(slug, "policy-brief");
        assert_eq!(store.slug_queries(), 1);
    }

    #[tokio::test]
    async fn taken_candidate_gets_numeric_suffix() {
        let store = MemoryStore::new();
        store.seed(ContentKind::Blog, "Policy Brief", "policy-brief", "");

        let first = ensure_unique_slug(&store, ContentKind::Blog, "policy-brief", None)
            .await
            .unwrap();
        assert_eq!(first, "policy-brief-1");
        store.seed(ContentKind::Blog, "Policy Brief", &first, "");

        let second = ensure_unique_slug(&store, ContentKind::Blog, "policy-brief", None)
            .await
            .unwrap();
        assert_eq!(second, "policy-brief-2");
    }

    #[tokio::test]
    async fn record_keeps_its_own_slug() {
        let store = MemoryStore::new();
        let record = store.seed(ContentKind::Blog, "Policy Brief", "policy-brief", "");

        let slug = ensure_unique_slug(&store, ContentKind::Blog, "policy-brief", Some(record.id))
            .await
            .unwrap();
        assert_eq!(slug, "policy-brief");
    }

    #[tokio::test]
    async fn slugs_are_scoped_per_kind() {
        let store = MemoryStore::new();
        store.seed(ContentKind::Blog, "Policy Brief", "policy-brief", "");

        let slug = ensure_unique_slug(&store, ContentKind::Research, "policy-brief", None)
            .await
            .unwrap();
        assert_eq!(slug, "policy-brief");
    }
}

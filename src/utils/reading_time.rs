use once_cell::sync::Lazy;
use regex::Regex;

const WORDS_PER_MINUTE: usize = 200;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

/// Minutos de lectura estimados (200 palabras por minuto, redondeo hacia
/// arriba, mínimo 1).
pub fn calculate_reading_time(html: &str) -> i32 {
    let text = HTML_TAG.replace_all(html, " ");
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_hundred_words_take_two_minutes() {
        let html = format!("<p>{}</p>", "word ".repeat(400));
        assert_eq!(calculate_reading_time(&html), 2);
    }

    #[test]
    fn rounds_up_partial_minutes() {
        let html = format!("<p>{}</p>", "word ".repeat(201));
        assert_eq!(calculate_reading_time(&html), 2);
    }

    #[test]
    fn empty_content_is_one_minute() {
        assert_eq!(calculate_reading_time(""), 1);
        assert_eq!(calculate_reading_time("<p></p><img src=\"x.jpg\"/>"), 1);
    }

    #[test]
    fn tags_do_not_count_as_words() {
        let html = format!(
            "<div class=\"a b c d e\">{}</div>{}",
            "palabra ".repeat(200),
            "<span data-x=\"1 2 3\"></span>".repeat(50)
        );
        assert_eq!(calculate_reading_time(&html), 1);
    }

    #[test]
    fn adjacent_tags_split_words() {
        let html = "<b>uno</b><i>dos</i>".repeat(150);
        assert_eq!(calculate_reading_time(&html), 2);
    }
}

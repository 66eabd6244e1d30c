//! Numeric identifier extraction from site URLs.
//!
//! Book pages use `/livro/{book_id}-{slug}-ed{edition_id}.html` style links,
//! user and author pages use `/{kind}/{id}-{slug}`.

/// Book ID from a book page URL, e.g. `/livro/1-ed1.html` gives `1`.
pub fn book_id_from_url(url: &str) -> Option<u64> {
    let filename = url.rsplit('/').next()?;
    let first = filename.split('-').next()?;
    if !first.is_empty() && first.bytes().all(|b| b.is_ascii_digit()) {
        return first.parse().ok();
    }
    let last = filename.rsplit('-').next()?;
    last.split("ed").next()?.trim().parse().ok()
}

/// Edition ID from a book page URL, e.g. `/livro/1-ed10.html` gives `10`.
pub fn edition_id_from_url(url: &str) -> Option<u64> {
    url.rsplit("ed").next()?.replace(".html", "").trim().parse().ok()
}

/// User ID from a profile URL, e.g. `/usuario/5-maria` gives `5`.
pub fn user_id_from_url(url: &str) -> Option<u64> {
    url.rsplit('/').next()?.split('-').next()?.parse().ok()
}

/// Author ID from a profile URL, e.g. `/autor/50-some-name` gives `50`.
pub fn author_id_from_url(url: &str) -> Option<u64> {
    url.rsplit('/').next()?.split('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn book_id_leading_number() {
        assert_eq!(
            book_id_from_url("https://www.skoob.com.br/livro/1-ed1.html"),
            Some(1)
        );
        assert_eq!(
            book_id_from_url("https://www.skoob.com.br/livro/108958-o-hobbit-ed108958.html"),
            Some(108958)
        );
    }

    #[test]
    fn book_id_trailing_number() {
        assert_eq!(book_id_from_url("/livro/duna-5ed9.html"), Some(5));
    }

    #[test]
    fn edition_id_after_last_marker() {
        assert_eq!(edition_id_from_url("/livro/1-ed10.html"), Some(10));
        assert_eq!(
            edition_id_from_url("https://www.skoob.com.br/livro/108958-o-hobbit-ed123.html"),
            Some(123)
        );
    }

    #[test]
    fn user_and_author_ids() {
        assert_eq!(
            user_id_from_url("https://www.skoob.com.br/usuario/5-maria.silva"),
            Some(5)
        );
        assert_eq!(author_id_from_url("/autor/50-frank-herbert"), Some(50));
        assert_eq!(user_id_from_url("/usuario/not-a-number"), None);
    }
}

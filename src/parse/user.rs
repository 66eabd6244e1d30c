//! Extraction from user search pages, relation listings and shelf reviews.

use regex::Regex;
use scraper::Html;
use tracing::warn;

use crate::error::SkoobError;
use crate::model::{BookReview, UserSearch};
use crate::parse::book::{extract_review_date_and_text, extract_review_rating};
use crate::parse::dom::{attr_of, parse_selector, text_of};
use crate::parse::ids::{book_id_from_url, edition_id_from_url, user_id_from_url};

/// Parse every user block on a search page. User rows carry no class either;
/// they are recognized by their inline border style.
pub fn parse_user_search_results(
    doc: &Html,
    base_url: &str,
) -> Result<Vec<UserSearch>, SkoobError> {
    let row_sel = parse_selector(r#"div[style*="border: 1px solid #e4e4e4"]"#)?;
    let link_sel = parse_selector(r#"a[href^="/usuario/"]"#)?;
    let href_re = Regex::new(r"^/usuario/(\d+)-([\w\.\-]+)")
        .map_err(|e| SkoobError::parse(format!("user link pattern: {e}")))?;

    let mut results = Vec::new();
    for row in doc.select(&row_sel) {
        let Some(anchor) = row.select(&link_sel).next() else {
            continue;
        };
        let href = attr_of(anchor, "href");
        let Some(caps) = href_re.captures(&href) else {
            warn!(href, "skipping user row with unrecognized profile link");
            continue;
        };
        let Ok(id) = caps[1].parse::<u64>() else {
            continue;
        };
        results.push(UserSearch {
            id,
            username: caps[2].to_string(),
            name: text_of(anchor),
            url: format!("{base_url}{href}"),
        });
    }
    Ok(results)
}

/// Total result count from the `div.contador` header, 0 when absent.
pub fn extract_user_search_total(doc: &Html) -> Result<u32, SkoobError> {
    let counter_sel = parse_selector("div.contador")?;
    Ok(doc
        .select(&counter_sel)
        .next()
        .map(text_of)
        .and_then(|text| {
            text.split_once("encontrados")
                .and_then(|(count, _)| count.trim().parse().ok())
        })
        .unwrap_or(0))
}

/// Collect user IDs from a friends/following/followers listing.
pub fn parse_relation_ids(doc: &Html) -> Result<Vec<u64>, SkoobError> {
    let entry_sel = parse_selector("div.usuarios-mini-lista-txt")?;
    let link_sel = parse_selector("a")?;
    let mut ids = Vec::new();
    for entry in doc.select(&entry_sel) {
        let Some(anchor) = entry.select(&link_sel).next() else {
            continue;
        };
        match user_id_from_url(&attr_of(anchor, "href")) {
            Some(id) => ids.push(id),
            None => warn!("skipping relation entry with unparseable profile link"),
        }
    }
    Ok(ids)
}

/// Parse the reviews on a user's shelf page. Unlike book review pages, each
/// block links the reviewed edition rather than the reviewer.
pub fn parse_user_reviews(doc: &Html, user_id: u64) -> Result<Vec<BookReview>, SkoobError> {
    let candidate_sel = parse_selector(r#"div[id^="resenha"]"#)?;
    let id_re = Regex::new(r"^resenha(\d+)$")
        .map_err(|e| SkoobError::parse(format!("review id pattern: {e}")))?;
    let book_link_sel = parse_selector(r#"a[href$=".html"]"#)?;
    let book_href_re = Regex::new(r"\d+ed\d+\.html")
        .map_err(|e| SkoobError::parse(format!("book link pattern: {e}")))?;
    let comment_sel = parse_selector(r#"div[id^="resenhac"]"#)?;

    let mut reviews = Vec::new();
    for div in doc.select(&candidate_sel) {
        let div_id = attr_of(div, "id");
        let Some(caps) = id_re.captures(&div_id) else {
            continue;
        };
        let Ok(review_id) = caps[1].parse::<u64>() else {
            continue;
        };
        let Some(book_href) = div
            .select(&book_link_sel)
            .map(|a| attr_of(a, "href"))
            .find(|h| book_href_re.is_match(h))
        else {
            warn!(review_id, "skipping shelf review without a book link");
            continue;
        };
        let (Some(book_id), Some(edition_id)) =
            (book_id_from_url(&book_href), edition_id_from_url(&book_href))
        else {
            warn!(review_id, book_href, "skipping shelf review with unparseable book link");
            continue;
        };
        let rating = extract_review_rating(div)?;
        let (reviewed_at, review_text) = match div.select(&comment_sel).next() {
            Some(comment) => extract_review_date_and_text(comment)?,
            None => (None, String::new()),
        };
        reviews.push(BookReview {
            review_id,
            book_id,
            edition_id: Some(edition_id),
            user_id,
            rating,
            review_text,
            reviewed_at,
        });
    }
    Ok(reviews)
}

/// Whether the page links a further page through a "Próxima" anchor.
pub fn has_next_page_label(doc: &Html) -> Result<bool, SkoobError> {
    let anchor_sel = parse_selector("a")?;
    Ok(doc.select(&anchor_sel).any(|a| text_of(a) == "Próxima"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_user_search_rows() -> Result<(), SkoobError> {
        let html = r#"<body>
<div style="border: 1px solid #e4e4e4; padding:4px">
  <a href="/usuario/5-maria.silva">Maria Silva</a>
</div>
<div style="border: 1px solid #e4e4e4">
  <a href="/usuario/invalid">Broken</a>
</div>
<div class="contador">38 encontrados</div>
</body>"#;
        let doc = Html::parse_document(html);
        let results = parse_user_search_results(&doc, "https://www.skoob.com.br")?;
        assert_eq!(results.len(), 1);
        let user = &results[0];
        assert_eq!(user.id, 5);
        assert_eq!(user.username, "maria.silva");
        assert_eq!(user.name, "Maria Silva");
        assert_eq!(user.url, "https://www.skoob.com.br/usuario/5-maria.silva");
        assert_eq!(extract_user_search_total(&doc)?, 38);
        Ok(())
    }

    #[test]
    fn relation_ids_from_listing() -> Result<(), SkoobError> {
        let html = r#"<div class="usuarios-mini-lista-txt"><a href="/usuario/5-maria">Maria</a></div>
<div class="usuarios-mini-lista-txt"><a href="/usuario/91-jo">Jo</a></div>
<div class="usuarios-mini-lista-txt">no link</div>"#;
        let doc = Html::parse_document(html);
        assert_eq!(parse_relation_ids(&doc)?, vec![5, 91]);
        Ok(())
    }

    #[test]
    fn parses_shelf_reviews() -> Result<(), SkoobError> {
        let html = r#"<body>
<div id="resenha700">
  <a href="/livro/42-duna-42ed9000.html">Duna</a>
  <star-rating rate="5"></star-rating>
  <div id="resenhac700"><span>15/03/2021</span>Releitura obrigatória.</div>
</div>
<div id="resenha701"><p>no book link</p></div>
<a href="/estante/resenhas/5/mpage:2">Próxima</a>
</body>"#;
        let doc = Html::parse_document(html);
        let reviews = parse_user_reviews(&doc, 5)?;
        assert_eq!(reviews.len(), 1);
        let review = &reviews[0];
        assert_eq!(review.review_id, 700);
        assert_eq!(review.user_id, 5);
        assert_eq!(review.book_id, 42);
        assert_eq!(review.edition_id, Some(9000));
        assert_eq!(review.rating, 5.0);
        assert_eq!(review.review_text, "Releitura obrigatória.");
        assert_eq!(review.reviewed_at, NaiveDate::from_ymd_opt(2021, 3, 15));
        assert!(has_next_page_label(&doc)?);
        Ok(())
    }

    #[test]
    fn next_page_label_absent() -> Result<(), SkoobError> {
        let doc = Html::parse_document(r#"<a href="/x">Anterior</a>"#);
        assert!(!has_next_page_label(&doc)?);
        Ok(())
    }
}

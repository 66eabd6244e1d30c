//! Extraction from book search pages, review pages, reader listings and the
//! book API's raw JSON records.

use chrono::NaiveDate;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::SkoobError;
use crate::model::{BookReview, BookSearchResult};
use crate::parse::dom::{attr_of, parse_selector, sibling_texts, text_of};
use crate::parse::ids::{book_id_from_url, edition_id_from_url, user_id_from_url};

fn compile(pattern: &str) -> Result<Regex, SkoobError> {
    Regex::new(pattern).map_err(|e| SkoobError::parse(format!("invalid pattern {:?}: {}", pattern, e)))
}

/// Normalize a cover image URL. Protocol-relative URLs get an `https` scheme;
/// relative paths carry no usable host and collapse to an empty string.
pub fn normalize_image_url(src: &str) -> String {
    if let Some(rest) = src.strip_prefix("//") {
        return format!("https://{rest}");
    }
    if src.contains("://") {
        return src.to_string();
    }
    String::new()
}

/// Parse every result block on a book search page. Blocks missing the cover
/// link or usable IDs are skipped with a warning rather than failing the page.
pub fn parse_search_results(doc: &Html, base_url: &str) -> Result<Vec<BookSearchResult>, SkoobError> {
    let block_sel = parse_selector("div.box_lista_busca_vertical")?;
    let link_sel = parse_selector("a.capa-link-item")?;
    let img_sel = parse_selector("img")?;
    let detail_sel = parse_selector("div.detalhes-2-sub > div span")?;
    let rating_sel = parse_selector("div.star-mini strong")?;
    let isbn_re = compile(r"^\d{9,13}$|^B0[A-Z0-9]{8,}$")?;

    let mut results = Vec::new();
    for block in doc.select(&block_sel) {
        let Some(link) = block.select(&link_sel).next() else {
            warn!("skipping search result without a cover link");
            continue;
        };
        let title = attr_of(link, "title");
        let url = format!("{base_url}{}", attr_of(link, "href"));
        let (Some(book_id), Some(edition_id)) = (book_id_from_url(&url), edition_id_from_url(&url))
        else {
            warn!(url, "skipping search result with unparseable book or edition id");
            continue;
        };
        let cover_url = link
            .select(&img_sel)
            .next()
            .map(|img| normalize_image_url(&attr_of(img, "src")))
            .filter(|s| !s.is_empty());

        // The details row holds "<isbn> | <publisher>" style spans.
        let spans: Vec<String> = block
            .select(&detail_sel)
            .map(text_of)
            .filter(|t| !t.is_empty() && t != "|")
            .collect();
        let isbn = spans
            .first()
            .filter(|t| isbn_re.is_match(t))
            .cloned();
        let publisher = spans.get(1).cloned();

        let rating = block
            .select(&rating_sel)
            .next()
            .and_then(|s| text_of(s).replace(',', ".").parse::<f64>().ok());

        results.push(BookSearchResult {
            edition_id,
            book_id,
            title,
            publisher,
            isbn,
            url,
            cover_url,
            rating,
        });
    }
    Ok(results)
}

/// Total result count from the `div.contador` header, 0 when absent.
pub fn extract_total_results(doc: &Html) -> Result<u32, SkoobError> {
    let counter_sel = parse_selector("div.contador")?;
    let count_re = compile(r"(\d+)\s+encontrados")?;
    let total = doc
        .select(&counter_sel)
        .next()
        .and_then(|el| {
            let text = text_of(el);
            count_re
                .captures(&text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(0);
    Ok(total)
}

/// Collect user IDs from a readers listing page.
pub fn extract_user_ids(doc: &Html) -> Result<Vec<u64>, SkoobError> {
    let container_sel = parse_selector("div.livro-leitor-container")?;
    let link_sel = parse_selector("a")?;
    let mut ids = Vec::new();
    for container in doc.select(&container_sel) {
        let href = container
            .select(&link_sel)
            .next()
            .map(|a| attr_of(a, "href"))
            .unwrap_or_default();
        if href.is_empty() {
            warn!("skipping reader entry without a profile link");
            continue;
        }
        match user_id_from_url(&href) {
            Some(id) => ids.push(id),
            None => warn!(href, "could not extract user id from profile link"),
        }
    }
    Ok(ids)
}

/// Edition ID linked from the navigation menu of a reviews page.
pub fn extract_edition_id_from_reviews_page(doc: &Html) -> Result<Option<u64>, SkoobError> {
    let menu_link_sel = parse_selector("#pg-livro-menu-principal-container a")?;
    Ok(doc
        .select(&menu_link_sel)
        .next()
        .and_then(|a| edition_id_from_url(&attr_of(a, "href"))))
}

/// Parse every review block on a reviews page. Review containers have ids
/// like `resenha123`; the comment body sits in a nested `resenhac123` div.
pub fn parse_reviews(
    doc: &Html,
    book_id: u64,
    edition_id: Option<u64>,
) -> Result<Vec<BookReview>, SkoobError> {
    let candidate_sel = parse_selector(r#"div[id^="resenha"]"#)?;
    let id_re = compile(r"^resenha(\d+)$")?;
    let mut reviews = Vec::new();
    for div in doc.select(&candidate_sel) {
        let div_id = attr_of(div, "id");
        let Some(caps) = id_re.captures(&div_id) else {
            continue;
        };
        let Ok(review_id) = caps[1].parse::<u64>() else {
            continue;
        };
        match parse_review(div, review_id, book_id, edition_id)? {
            Some(review) => reviews.push(review),
            None => warn!(review_id, "skipping review without a reviewer link"),
        }
    }
    Ok(reviews)
}

fn parse_review(
    div: ElementRef<'_>,
    review_id: u64,
    book_id: u64,
    edition_id: Option<u64>,
) -> Result<Option<BookReview>, SkoobError> {
    let user_link_sel = parse_selector(r#"a[href*="/usuario/"]"#)?;
    let Some(user_id) = div
        .select(&user_link_sel)
        .next()
        .and_then(|a| user_id_from_url(&attr_of(a, "href")))
    else {
        return Ok(None);
    };
    let rating = extract_review_rating(div)?;
    let comment_sel = parse_selector(r#"div[id^="resenhac"]"#)?;
    let (reviewed_at, review_text) = match div.select(&comment_sel).next() {
        Some(comment) => extract_review_date_and_text(comment)?,
        None => (None, String::new()),
    };
    Ok(Some(BookReview {
        review_id,
        book_id,
        edition_id,
        user_id,
        rating,
        review_text,
        reviewed_at,
    }))
}

/// Star rating from the `<star-rating rate="...">` widget, 0 when absent.
pub(crate) fn extract_review_rating(div: ElementRef<'_>) -> Result<f64, SkoobError> {
    let star_sel = parse_selector("star-rating")?;
    Ok(div
        .select(&star_sel)
        .next()
        .and_then(|s| s.value().attr("rate"))
        .and_then(|r| r.parse().ok())
        .unwrap_or(0.0))
}

/// Date and body of a review comment. The first span holds a `dd/mm/yyyy`
/// date; the body is everything after it, text nodes included.
pub(crate) fn extract_review_date_and_text(
    comment: ElementRef<'_>,
) -> Result<(Option<NaiveDate>, String), SkoobError> {
    let span_sel = parse_selector("span")?;
    let span = comment.select(&span_sel).next();
    let reviewed_at = span
        .map(text_of)
        .and_then(|t| NaiveDate::parse_from_str(&t, "%d/%m/%Y").ok());
    let parts = match span {
        Some(span) => sibling_texts(span),
        None => Vec::new(),
    };
    let review_text = if parts.is_empty() {
        text_of(comment)
    } else {
        parts.join("\n")
    };
    Ok((reviewed_at, review_text.trim().to_string()))
}

/// Normalize a raw book record from the API into a shape the [`Book`] model
/// deserializes strictly: sentinel values become nulls, numeric strings
/// become numbers, relative links become absolute.
///
/// [`Book`]: crate::model::Book
pub fn clean_book_json(raw: Value, base_url: &str) -> Result<Value, SkoobError> {
    let Value::Object(mut map) = raw else {
        return Err(SkoobError::parse("book record is not a JSON object"));
    };

    let relative_url = map
        .get("url")
        .and_then(Value::as_str)
        .ok_or_else(|| SkoobError::parse("book record field 'url'"))?
        .to_string();
    map.insert("url".into(), Value::String(format!("{base_url}{relative_url}")));

    // "0" in either string or number form means no ISBN on record.
    let isbn = match map.get("isbn") {
        Some(Value::String(s)) if !s.is_empty() && s != "0" => Some(s.clone()),
        Some(Value::Number(n)) if n.as_u64() != Some(0) => Some(n.to_string()),
        _ => None,
    };
    map.insert("isbn".into(), opt_string(isbn));

    if let Some(author) = map.get("autor").and_then(Value::as_str) {
        if author.to_lowercase() == "não especificado" {
            map.insert("autor".into(), Value::Null);
        }
    }

    if matches!(map.get("serie"), Some(Value::String(s)) if s.is_empty()) {
        map.insert("serie".into(), Value::Null);
    }

    let volume = match map.get("volume") {
        Some(Value::String(s)) if !s.is_empty() && s != "0" => Some(s.clone()),
        Some(Value::Number(n)) if n.as_u64() != Some(0) => Some(n.to_string()),
        _ => None,
    };
    map.insert("volume".into(), opt_string(volume));

    for key in ["mes", "ano", "paginas"] {
        coerce_number(&mut map, key);
    }
    if matches!(map.get("mes"), Some(Value::Number(n)) if n.as_u64() == Some(0)) {
        map.insert("mes".into(), Value::Null);
    }

    let img_url = map.get("img_url").and_then(Value::as_str).unwrap_or("");
    let cover_url = normalize_image_url(img_url);
    map.insert("cover_url".into(), Value::String(cover_url));

    if matches!(map.get("generos"), Some(Value::Array(a)) if a.is_empty()) {
        map.insert("generos".into(), Value::Null);
    }

    Ok(Value::Object(map))
}

fn opt_string(value: Option<String>) -> Value {
    value.map(Value::String).unwrap_or(Value::Null)
}

/// Turn a numeric string field into a number; blank strings become null.
fn coerce_number(map: &mut Map<String, Value>, key: &str) {
    if let Some(Value::String(s)) = map.get(key) {
        let trimmed = s.trim();
        let replacement = if trimmed.is_empty() {
            Value::Null
        } else if let Ok(n) = trimmed.parse::<i64>() {
            Value::Number(n.into())
        } else {
            return;
        };
        map.insert(key.to_string(), replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SEARCH_PAGE: &str = r#"<html><body>
<div class="contador">ordenado por relevância | 247 encontrados</div>
<div class="box_lista_busca_vertical">
  <a class="capa-link-item" title="Duna" href="/livro/108958-duna-ed108958.html">
    <img src="//cache.skoob.com.br/img/108958.jpg">
  </a>
  <div class="detalhes-2-sub"><div>
    <span>9788576572008</span><span>|</span><span>Aleph</span>
  </div></div>
  <div class="star-mini"><strong>4,5</strong></div>
</div>
<div class="box_lista_busca_vertical">
  <a class="capa-link-item" title="Sem Detalhes" href="/livro/7-ed9.html"></a>
</div>
<div class="box_lista_busca_vertical"><p>no link here</p></div>
</body></html>"#;

    #[test]
    fn parses_search_results_and_skips_broken_blocks() -> Result<(), SkoobError> {
        let doc = Html::parse_document(SEARCH_PAGE);
        let results = parse_search_results(&doc, "https://www.skoob.com.br")?;
        assert_eq!(results.len(), 2);
        let duna = &results[0];
        assert_eq!(duna.title, "Duna");
        assert_eq!(duna.book_id, 108958);
        assert_eq!(duna.edition_id, 108958);
        assert_eq!(duna.isbn.as_deref(), Some("9788576572008"));
        assert_eq!(duna.publisher.as_deref(), Some("Aleph"));
        assert_eq!(duna.rating, Some(4.5));
        assert_eq!(
            duna.cover_url.as_deref(),
            Some("https://cache.skoob.com.br/img/108958.jpg")
        );
        let bare = &results[1];
        assert_eq!(bare.book_id, 7);
        assert_eq!(bare.edition_id, 9);
        assert!(bare.isbn.is_none());
        assert!(bare.cover_url.is_none());
        Ok(())
    }

    #[test]
    fn total_results_from_counter() -> Result<(), SkoobError> {
        let doc = Html::parse_document(SEARCH_PAGE);
        assert_eq!(extract_total_results(&doc)?, 247);
        let empty = Html::parse_document("<html><body></body></html>");
        assert_eq!(extract_total_results(&empty)?, 0);
        Ok(())
    }

    #[test]
    fn reader_ids_from_listing() -> Result<(), SkoobError> {
        let html = r#"<div class="livro-leitor-container"><a href="/usuario/5-maria"></a></div>
<div class="livro-leitor-container"><a href="/usuario/91-jo"></a></div>
<div class="livro-leitor-container"><a href="/usuario/broken"></a></div>"#;
        let doc = Html::parse_document(html);
        assert_eq!(extract_user_ids(&doc)?, vec![5, 91]);
        Ok(())
    }

    #[test]
    fn edition_id_from_reviews_menu() -> Result<(), SkoobError> {
        let html = r#"<div id="pg-livro-menu-principal-container">
<a href="/livro/108958-duna-ed4121.html">Duna</a></div>"#;
        let doc = Html::parse_document(html);
        assert_eq!(extract_edition_id_from_reviews_page(&doc)?, Some(4121));
        Ok(())
    }

    #[test]
    fn parses_review_blocks() -> Result<(), SkoobError> {
        let html = r#"<body>
<div id="resenha555">
  <a href="/usuario/12-ana">Ana</a>
  <star-rating rate="4.0"></star-rating>
  <div id="resenhac555"><span>01/02/2020</span>Uma resenha.<br><p>Gostei muito.</p></div>
</div>
<div id="resenha556"><star-rating rate="3"></star-rating></div>
</body>"#;
        let doc = Html::parse_document(html);
        let reviews = parse_reviews(&doc, 42, Some(9000))?;
        assert_eq!(reviews.len(), 1);
        let review = &reviews[0];
        assert_eq!(review.review_id, 555);
        assert_eq!(review.user_id, 12);
        assert_eq!(review.rating, 4.0);
        assert_eq!(review.review_text, "Uma resenha.\nGostei muito.");
        assert_eq!(
            review.reviewed_at,
            NaiveDate::from_ymd_opt(2020, 2, 1)
        );
        Ok(())
    }

    #[test]
    fn cleans_sentinel_fields_in_book_record() -> Result<(), SkoobError> {
        let raw = json!({
            "id": 9000,
            "livro_id": 42,
            "titulo": "Duna",
            "autor": "Não Especificado",
            "isbn": "0",
            "serie": "",
            "volume": 0,
            "mes": "",
            "ano": "2017",
            "url": "/livro/42-ed9000.html",
            "img_url": "//cache.skoob.com.br/img/42.jpg",
            "generos": []
        });
        let cleaned = clean_book_json(raw, "https://www.skoob.com.br")?;
        assert_eq!(
            cleaned["url"],
            json!("https://www.skoob.com.br/livro/42-ed9000.html")
        );
        assert_eq!(cleaned["isbn"], Value::Null);
        assert_eq!(cleaned["autor"], Value::Null);
        assert_eq!(cleaned["serie"], Value::Null);
        assert_eq!(cleaned["volume"], Value::Null);
        assert_eq!(cleaned["mes"], Value::Null);
        assert_eq!(cleaned["ano"], json!(2017));
        assert_eq!(
            cleaned["cover_url"],
            json!("https://cache.skoob.com.br/img/42.jpg")
        );
        assert_eq!(cleaned["generos"], Value::Null);
        Ok(())
    }

    #[test]
    fn keeps_real_values_in_book_record() -> Result<(), SkoobError> {
        let raw = json!({
            "isbn": 9788576572008u64,
            "volume": "2",
            "url": "/livro/1-ed1.html",
            "img_url": "https://cache.skoob.com.br/img/1.jpg"
        });
        let cleaned = clean_book_json(raw, "https://www.skoob.com.br")?;
        assert_eq!(cleaned["isbn"], json!("9788576572008"));
        assert_eq!(cleaned["volume"], json!("2"));
        assert_eq!(
            cleaned["cover_url"],
            json!("https://cache.skoob.com.br/img/1.jpg")
        );
        Ok(())
    }

    #[test]
    fn image_url_normalization() {
        assert_eq!(
            normalize_image_url("//cache.skoob.com.br/x.jpg"),
            "https://cache.skoob.com.br/x.jpg"
        );
        assert_eq!(
            normalize_image_url("https://cache.skoob.com.br/x.jpg"),
            "https://cache.skoob.com.br/x.jpg"
        );
        assert_eq!(normalize_image_url("img/x.jpg"), "");
        assert_eq!(normalize_image_url(""), "");
    }
}

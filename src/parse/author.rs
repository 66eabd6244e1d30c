//! Extraction from author search pages and author profile pages.

use std::collections::HashMap;

use regex::Regex;
use scraper::{ElementRef, Html};
use tracing::warn;

use crate::error::SkoobError;
use crate::model::{AuthorBook, AuthorProfile, AuthorSearchResult, AuthorStats, AuthorVideo, BookSearchResult};
use crate::parse::dom::{attr_of, element_after, element_after_where, next_sibling_text, parse_selector, text_of};
use crate::parse::ids::{author_id_from_url, book_id_from_url};

/// Parse every author block on a search page. Author results carry no stable
/// class name; they are recognized by their inline border/margin style.
pub fn parse_author_blocks(doc: &Html, base_url: &str) -> Result<Vec<AuthorSearchResult>, SkoobError> {
    let div_sel = parse_selector("div")?;
    let img_sel = parse_selector("img.img-rounded")?;
    let link_sel = parse_selector(r#"a[href*="/autor/"]"#)?;
    let nick_sel = parse_selector("i")?;
    let href_re = Regex::new(r"/autor/\d+-")
        .map_err(|e| SkoobError::parse(format!("author link pattern: {e}")))?;

    let mut results = Vec::new();
    for div in doc.select(&div_sel) {
        let style = attr_of(div, "style");
        if !(style.contains("border-bottom:#ccc") && style.contains("margin-bottom:10px")) {
            continue;
        }
        let Some(img) = div.select(&img_sel).next() else {
            continue;
        };
        let Some(link) = div
            .select(&link_sel)
            .find(|a| href_re.is_match(&attr_of(*a, "href")) && !text_of(*a).is_empty())
        else {
            continue;
        };
        let href = attr_of(link, "href");
        let Some(id) = author_id_from_url(&href) else {
            warn!(href, "skipping author block with unparseable id");
            continue;
        };
        results.push(AuthorSearchResult {
            id,
            name: text_of(link),
            url: format!("{base_url}{href}"),
            nickname: div.select(&nick_sel).next().map(text_of).unwrap_or_default(),
            img_url: attr_of(img, "src"),
        });
    }
    Ok(results)
}

/// Total result count from the `div.contador` header, 0 when absent.
pub fn extract_total_results(doc: &Html) -> Result<u32, SkoobError> {
    let counter_sel = parse_selector("div.contador")?;
    let digits_re =
        Regex::new(r"(\d+)").map_err(|e| SkoobError::parse(format!("counter pattern: {e}")))?;
    Ok(doc
        .select(&counter_sel)
        .next()
        .and_then(|el| {
            let text = text_of(el);
            digits_re
                .captures(&text)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok())
        })
        .unwrap_or(0))
}

/// Social links from the `#autor-icones` block, keyed by icon name.
pub(crate) fn extract_author_links(doc: &Html) -> Result<HashMap<String, String>, SkoobError> {
    let anchor_sel = parse_selector("#autor-icones a")?;
    let span_sel = parse_selector("span")?;
    let mut links = HashMap::new();
    for a in doc.select(&anchor_sel) {
        let href = attr_of(a, "href");
        if href.is_empty() {
            continue;
        }
        let Some(span) = a.select(&span_sel).next() else {
            continue;
        };
        let class = attr_of(span, "class");
        let key = class
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .trim_start_matches("icon-")
            .to_string();
        links.insert(key, href);
    }
    Ok(links)
}

/// Birth date and hometown from the `#box-generos` sidebar.
pub(crate) fn extract_author_info(
    doc: &Html,
) -> Result<(Option<String>, Option<String>), SkoobError> {
    let label_sel = parse_selector("#box-generos b")?;
    let mut birth_date = None;
    let mut location = None;
    for label in doc.select(&label_sel) {
        let text = text_of(label);
        if text.contains("Nascimento") {
            birth_date = next_sibling_text(label)
                .map(|t| t.trim_matches(|c| c == ' ' || c == '|').to_string())
                .filter(|t| !t.is_empty());
        } else if text.contains("Local") {
            location = next_sibling_text(label);
        }
    }
    Ok((birth_date, location))
}

/// Readership and rating statistics from the `#livro-perfil-status02` block
/// plus the page-wide star distribution bars.
pub(crate) fn extract_author_stats(doc: &Html) -> Result<AuthorStats, SkoobError> {
    let stats_sel = parse_selector("#livro-perfil-status02")?;
    let rating_sel = parse_selector("span.rating")?;
    let span_sel = parse_selector("span")?;
    let bar_sel = parse_selector("div.bar")?;
    let bar_label_sel = parse_selector("a")?;
    let bar_value_sel = parse_selector("b")?;
    let digits_re =
        Regex::new(r"(\d+)").map_err(|e| SkoobError::parse(format!("stats pattern: {e}")))?;

    let mut stats = AuthorStats::default();
    if let Some(stats_div) = doc.select(&stats_sel).next() {
        stats.average_rating = stats_div
            .select(&rating_sel)
            .next()
            .and_then(|s| text_of(s).replace(',', ".").parse().ok());

        stats.ratings = stats_div
            .select(&span_sel)
            .find(|s| text_of(*s).to_lowercase().contains("avalia"))
            .and_then(|s| {
                let text = text_of(s).replace('.', "");
                digits_re
                    .captures(&text)
                    .and_then(|c| c.get(1))
                    .and_then(|m| m.as_str().parse().ok())
            });

        for bar in stats_div.select(&bar_sel) {
            let label = bar
                .select(&bar_label_sel)
                .next()
                .map(text_of)
                .unwrap_or_default()
                .to_lowercase();
            let value = bar
                .select(&bar_value_sel)
                .next()
                .and_then(|b| text_of(b).replace('.', "").parse().ok());
            if label.contains("leitores") {
                stats.readers = value;
            } else if label.contains("seguidores") {
                stats.followers = value;
            }
        }
    }
    stats.star_ratings = extract_star_distribution(doc)?;
    Ok(stats)
}

/// Star label to percentage, read from the bars next to each star icon.
fn extract_star_distribution(doc: &Html) -> Result<HashMap<String, f64>, SkoobError> {
    let star_sel = parse_selector(r#"img[src*="estrela"]"#)?;
    let div_sel = parse_selector("div")?;
    let mut distribution = HashMap::new();
    for img in doc.select(&star_sel) {
        let alt = attr_of(img, "alt");
        if alt.is_empty() {
            continue;
        }
        let percent = element_after_where(doc, img, &div_sel, |d| text_of(d).contains('%'))
            .and_then(|d| text_of(d).replace('%', "").trim().parse().ok());
        if let Some(percent) = percent {
            distribution.insert(alt, percent);
        }
    }
    Ok(distribution)
}

/// Reader gender split from the male/female icons on the profile.
pub(crate) fn extract_gender_percentages(doc: &Html) -> Result<HashMap<String, f64>, SkoobError> {
    let span_sel = parse_selector("span")?;
    let mut gender = HashMap::new();
    for (key, icon_sel) in [("male", r#"i[class*="icon-male"]"#), ("female", r#"i[class*="icon-female"]"#)] {
        let sel = parse_selector(icon_sel)?;
        if let Some(icon) = doc.select(&sel).next() {
            let value = element_after(doc, icon, &span_sel)
                .and_then(|s| text_of(s).replace('%', "").trim().parse().ok());
            if let Some(value) = value {
                gender.insert(key.to_string(), value);
            }
        }
    }
    Ok(gender)
}

/// Thumbnails from the author's bibliography strip.
pub(crate) fn extract_author_books(doc: &Html, base_url: &str) -> Result<Vec<AuthorBook>, SkoobError> {
    let block_sel = parse_selector("div.clivro.livro-capa-mini")?;
    let anchor_sel = parse_selector("a")?;
    let img_sel = parse_selector("img")?;
    let mut books = Vec::new();
    for block in doc.select(&block_sel) {
        let Some(anchor) = block.select(&anchor_sel).next() else {
            continue;
        };
        books.push(AuthorBook {
            url: Some(format!("{base_url}{}", attr_of(anchor, "href"))),
            title: Some(attr_of(anchor, "title")).filter(|t| !t.is_empty()),
            img_url: block
                .select(&img_sel)
                .next()
                .map(|img| attr_of(img, "src"))
                .filter(|s| !s.is_empty()),
        });
    }
    Ok(books)
}

/// Videos referenced on the profile.
pub(crate) fn extract_author_videos(doc: &Html, base_url: &str) -> Result<Vec<AuthorVideo>, SkoobError> {
    let block_sel = parse_selector("div.livro-perfil-videos-cont")?;
    let anchor_sel = parse_selector("a")?;
    let img_sel = parse_selector("img")?;
    let mut videos = Vec::new();
    for block in doc.select(&block_sel) {
        let Some(anchor) = block.select(&anchor_sel).next() else {
            continue;
        };
        let img = anchor.select(&img_sel).next();
        let alt = img.map(|i| attr_of(i, "alt")).unwrap_or_default();
        videos.push(AuthorVideo {
            url: Some(format!("{base_url}{}", attr_of(anchor, "href"))),
            thumbnail_url: img.map(|i| attr_of(i, "src")).filter(|s| !s.is_empty()),
            title: if alt.is_empty() {
                Some(text_of(anchor)).filter(|t| !t.is_empty())
            } else {
                Some(alt)
            },
        });
    }
    Ok(videos)
}

type ProfileAudit = (
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
    Option<String>,
);

/// Created/edited/approved usernames and dates from the `#box-info-cad` box.
pub(crate) fn extract_author_metadata(doc: &Html) -> Result<ProfileAudit, SkoobError> {
    let box_sel = parse_selector("#box-info-cad div.box-info-cad-user")?;
    let date_sel = parse_selector("div.box-info-cad-date")?;
    let user_sel = parse_selector("a")?;
    let (mut created_at, mut created_by) = (None, None);
    let (mut edited_at, mut edited_by) = (None, None);
    let (mut approved_at, mut approved_by) = (None, None);
    for entry in doc.select(&box_sel) {
        let Some(date_div) = entry.select(&date_sel).next() else {
            continue;
        };
        let user_name = date_div.select(&user_sel).next().map(text_of);
        let text = text_of(date_div);
        if let Some(rest) = text.split("cadastrou em:").nth(1) {
            created_by = user_name;
            created_at = Some(rest.trim().to_string());
        } else if let Some(rest) = text.split("editou em:").nth(1) {
            edited_by = user_name;
            edited_at = Some(rest.trim().to_string());
        } else if let Some(rest) = text.split("aprovou em:").nth(1) {
            approved_by = user_name;
            approved_at = Some(rest.trim().to_string());
        }
    }
    Ok((created_at, created_by, edited_at, edited_by, approved_at, approved_by))
}

/// Assemble a full author profile from its page.
pub fn parse_author_profile(doc: &Html, base_url: &str) -> Result<AuthorProfile, SkoobError> {
    let name_sel = parse_selector("h1.given-name")?;
    let photo_sel = parse_selector("img.img-rounded")?;
    let description_sel = parse_selector("#livro-perfil-sinopse-txt")?;
    let tag_sel = parse_selector("div.genero-item")?;

    let (birth_date, location) = extract_author_info(doc)?;
    let (created_at, created_by, edited_at, edited_by, approved_at, approved_by) =
        extract_author_metadata(doc)?;

    Ok(AuthorProfile {
        name: doc.select(&name_sel).next().map(text_of).unwrap_or_default(),
        photo_url: doc
            .select(&photo_sel)
            .next()
            .map(|img| attr_of(img, "src"))
            .filter(|s| !s.is_empty()),
        links: extract_author_links(doc)?,
        description: doc
            .select(&description_sel)
            .next()
            .map(text_of)
            .unwrap_or_default(),
        tags: doc.select(&tag_sel).map(text_of).collect(),
        birth_date,
        location,
        gender_percentages: extract_gender_percentages(doc)?,
        books: extract_author_books(doc, base_url)?,
        videos: extract_author_videos(doc, base_url)?,
        stats: extract_author_stats(doc)?,
        created_at,
        created_by,
        edited_at,
        edited_by,
        approved_at,
        approved_by,
    })
}

/// Parse every thumbnail on an author's books listing page.
pub fn parse_author_books_listing(
    doc: &Html,
    base_url: &str,
) -> Result<Vec<BookSearchResult>, SkoobError> {
    let block_sel = parse_selector("div.clivro.livro-capa-mini")?;
    let mut books = Vec::new();
    for div in doc.select(&block_sel) {
        if let Some(book) = parse_author_book_div(div, base_url)? {
            books.push(book);
        }
    }
    Ok(books)
}

/// Parse one thumbnail block on the author's books listing into a search
/// result. The block's `id` attribute, when numeric, carries the edition ID.
fn parse_author_book_div(
    div: ElementRef<'_>,
    base_url: &str,
) -> Result<Option<BookSearchResult>, SkoobError> {
    let anchor_sel = parse_selector("a")?;
    let img_sel = parse_selector("img")?;
    let Some(anchor) = div.select(&anchor_sel).next() else {
        return Ok(None);
    };
    let href = attr_of(anchor, "href");
    let title_attr = attr_of(anchor, "title");
    let title = if title_attr.is_empty() {
        text_of(anchor)
    } else {
        title_attr
    };
    let from_url = book_id_from_url(&href);
    let edition_id = match attr_of(div, "id").parse::<u64>().ok().or(from_url) {
        Some(id) => id,
        None => return Ok(None),
    };
    Ok(Some(BookSearchResult {
        edition_id,
        book_id: from_url.unwrap_or(0),
        title,
        publisher: None,
        isbn: None,
        url: format!("{base_url}{href}"),
        cover_url: anchor
            .select(&img_sel)
            .next()
            .map(|img| attr_of(img, "src"))
            .filter(|s| !s.is_empty()),
        rating: None,
    }))
}

/// Total books by the author, from the active badge on the listing page.
pub fn extract_author_books_total(doc: &Html) -> Result<Option<u32>, SkoobError> {
    let badge_sel = parse_selector("span.badge.badge-ativa")?;
    Ok(doc
        .select(&badge_sel)
        .next()
        .and_then(|span| text_of(span).replace('.', "").parse().ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROFILE_PAGE: &str = r#"<html><body>
<h1 class="given-name">Frank Herbert</h1>
<img class="img-rounded" src="https://cache.skoob.com.br/autor/50.jpg">
<div id="autor-icones">
  <a href="https://facebook.com/fh"><span class="icon-facebook"></span></a>
  <a href="https://fh.example.com"><span class="icon-site"></span></a>
</div>
<div id="box-generos">
  <b>Nascimento:</b> 08/10/1920 | <b>Local:</b> Tacoma, EUA
</div>
<div id="livro-perfil-sinopse-txt">Escritor norte-americano.</div>
<div class="genero-item">Ficção científica</div>
<div class="genero-item">Fantasia</div>
<div id="livro-perfil-status02">
  <span class="rating">4,3</span>
  <span>12.345 avaliações</span>
  <div class="bar"><a>Leitores</a><b>9.876</b></div>
  <div class="bar"><a>Seguidores</a><b>321</b></div>
</div>
<img src="/img/estrela5.png" alt="5 estrelas"><div>62%</div>
<img src="/img/estrela4.png" alt="4 estrelas"><div>25%</div>
<i class="icon-male"></i><span>40%</span>
<i class="icon-female"></i><span>60%</span>
<div class="clivro livro-capa-mini">
  <a href="/livro/42-duna-ed9000.html" title="Duna"><img src="//cache.skoob.com.br/42.jpg"></a>
</div>
<div class="livro-perfil-videos-cont">
  <a href="/video/1"><img src="https://i.ytimg.com/1.jpg" alt="Entrevista"></a>
</div>
<div id="box-info-cad">
  <div class="box-info-cad-user">
    <div class="box-info-cad-date"><a>admin</a> cadastrou em: 01/01/2010</div>
  </div>
  <div class="box-info-cad-user">
    <div class="box-info-cad-date"><a>maria</a> editou em: 05/06/2018</div>
  </div>
</div>
</body></html>"#;

    #[test]
    fn parses_author_search_blocks() -> Result<(), SkoobError> {
        let html = r#"<body>
<div style="border-bottom:#ccc solid 1px; margin-bottom:10px;">
  <img class="img-rounded" src="/autor/50.jpg">
  <a href="/autor/50-frank-herbert"></a>
  <a href="/autor/50-frank-herbert">Frank Herbert</a>
  <i>F. Herbert</i>
</div>
<div style="margin-bottom:10px;">not an author row</div>
</body>"#;
        let doc = Html::parse_document(html);
        let results = parse_author_blocks(&doc, "https://www.skoob.com.br")?;
        assert_eq!(results.len(), 1);
        let author = &results[0];
        assert_eq!(author.id, 50);
        assert_eq!(author.name, "Frank Herbert");
        assert_eq!(author.nickname, "F. Herbert");
        assert_eq!(author.url, "https://www.skoob.com.br/autor/50-frank-herbert");
        Ok(())
    }

    #[test]
    fn counter_takes_first_number() -> Result<(), SkoobError> {
        let doc = Html::parse_document(r#"<div class="contador">87 autores</div>"#);
        assert_eq!(extract_total_results(&doc)?, 87);
        Ok(())
    }

    #[test]
    fn profile_basic_fields() -> Result<(), SkoobError> {
        let doc = Html::parse_document(PROFILE_PAGE);
        let profile = parse_author_profile(&doc, "https://www.skoob.com.br")?;
        assert_eq!(profile.name, "Frank Herbert");
        assert_eq!(profile.description, "Escritor norte-americano.");
        assert_eq!(profile.tags, vec!["Ficção científica", "Fantasia"]);
        assert_eq!(profile.birth_date.as_deref(), Some("08/10/1920"));
        assert_eq!(profile.location.as_deref(), Some("Tacoma, EUA"));
        assert_eq!(
            profile.links.get("facebook").map(String::as_str),
            Some("https://facebook.com/fh")
        );
        Ok(())
    }

    #[test]
    fn profile_stats_and_distribution() -> Result<(), SkoobError> {
        let doc = Html::parse_document(PROFILE_PAGE);
        let stats = extract_author_stats(&doc)?;
        assert_eq!(stats.average_rating, Some(4.3));
        assert_eq!(stats.ratings, Some(12345));
        assert_eq!(stats.readers, Some(9876));
        assert_eq!(stats.followers, Some(321));
        assert_eq!(stats.star_ratings.get("5 estrelas"), Some(&62.0));
        assert_eq!(stats.star_ratings.get("4 estrelas"), Some(&25.0));
        Ok(())
    }

    #[test]
    fn profile_gender_books_videos_metadata() -> Result<(), SkoobError> {
        let doc = Html::parse_document(PROFILE_PAGE);
        let profile = parse_author_profile(&doc, "https://www.skoob.com.br")?;
        assert_eq!(profile.gender_percentages.get("male"), Some(&40.0));
        assert_eq!(profile.gender_percentages.get("female"), Some(&60.0));
        assert_eq!(profile.books.len(), 1);
        assert_eq!(profile.books[0].title.as_deref(), Some("Duna"));
        assert_eq!(profile.videos.len(), 1);
        assert_eq!(profile.videos[0].title.as_deref(), Some("Entrevista"));
        assert_eq!(profile.created_by.as_deref(), Some("admin"));
        assert_eq!(profile.created_at.as_deref(), Some("01/01/2010"));
        assert_eq!(profile.edited_by.as_deref(), Some("maria"));
        assert!(profile.approved_at.is_none());
        Ok(())
    }

    #[test]
    fn author_book_div_prefers_numeric_id() -> Result<(), SkoobError> {
        let html = r#"<div class="clivro livro-capa-mini" id="9000">
<a href="/livro/42-duna-ed9000.html" title="Duna"><img src="/42.jpg"></a></div>"#;
        let doc = Html::parse_document(html);
        let div_sel = parse_selector("div.clivro")?;
        let div = doc.select(&div_sel).next().ok_or(SkoobError::parse("div"))?;
        let book = parse_author_book_div(div, "https://www.skoob.com.br")?
            .ok_or(SkoobError::parse("book"))?;
        assert_eq!(book.edition_id, 9000);
        assert_eq!(book.book_id, 42);
        assert_eq!(book.title, "Duna");
        Ok(())
    }

    #[test]
    fn books_total_from_badge() -> Result<(), SkoobError> {
        let doc = Html::parse_document(r#"<span class="badge badge-ativa">1.234</span>"#);
        assert_eq!(extract_author_books_total(&doc)?, Some(1234));
        Ok(())
    }
}

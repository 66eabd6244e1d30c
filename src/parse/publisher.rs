//! Extraction from publisher pages and their book/author listings.

use scraper::{ElementRef, Html};

use crate::error::SkoobError;
use crate::model::{Publisher, PublisherAuthor, PublisherItem, PublisherStats};
use crate::parse::dom::{attr_of, element_after, parse_selector, text_of};

/// Follower, rating and reader-gender statistics from `#vt_estatisticas`.
pub(crate) fn parse_publisher_stats(doc: &Html) -> Result<PublisherStats, SkoobError> {
    let stats_sel = parse_selector("#vt_estatisticas")?;
    let span_sel = parse_selector("span")?;
    let mut stats = PublisherStats::default();
    let Some(stats_div) = doc.select(&stats_sel).next() else {
        return Ok(stats);
    };

    if let Some(label) = stats_div
        .select(&span_sel)
        .find(|s| text_of(*s).contains("Seguidor"))
    {
        stats.followers = element_after(doc, label, &span_sel)
            .and_then(|s| text_of(s).replace('.', "").parse().ok());
    }

    // The rating span reads like "4,2 / 1.234".
    if let Some(label) = stats_div
        .select(&span_sel)
        .find(|s| text_of(*s).contains("Avalia"))
    {
        if let Some(info) = element_after(doc, label, &span_sel).map(text_of) {
            if let Some((rating_part, total_part)) = info.split_once('/') {
                stats.average_rating = rating_part.trim().replace(',', ".").parse().ok();
                stats.ratings = total_part.trim().replace('.', "").parse().ok();
            }
        }
    }

    let male_sel = parse_selector("i.icon-male")?;
    if let Some(icon) = stats_div.select(&male_sel).next() {
        stats.male_percentage =
            element_after(doc, icon, &span_sel).and_then(|s| text_of(s).replace('%', "").parse().ok());
    }
    let female_sel = parse_selector("i.icon-female")?;
    if let Some(icon) = stats_div.select(&female_sel).next() {
        stats.female_percentage =
            element_after(doc, icon, &span_sel).and_then(|s| text_of(s).replace('%', "").parse().ok());
    }
    Ok(stats)
}

/// Parse a book thumbnail block from a publisher page.
pub(crate) fn parse_publisher_item(
    div: ElementRef<'_>,
    base_url: &str,
) -> Result<Option<PublisherItem>, SkoobError> {
    let anchor_sel = parse_selector("a")?;
    let img_sel = parse_selector("img")?;
    let Some(anchor) = div.select(&anchor_sel).next() else {
        return Ok(None);
    };
    Ok(Some(PublisherItem {
        url: format!("{base_url}{}", attr_of(anchor, "href")),
        title: attr_of(anchor, "title"),
        img_url: anchor
            .select(&img_sel)
            .next()
            .map(|img| attr_of(img, "src"))
            .unwrap_or_default(),
    }))
}

/// Parse an author block from a publisher's authors listing.
pub(crate) fn parse_publisher_author(
    div: ElementRef<'_>,
    base_url: &str,
) -> Result<Option<PublisherAuthor>, SkoobError> {
    let anchor_sel = parse_selector("a")?;
    let name_sel = parse_selector("h3")?;
    let img_sel = parse_selector("img")?;
    let Some(anchor) = div.select(&anchor_sel).next() else {
        return Ok(None);
    };
    Ok(Some(PublisherAuthor {
        url: format!("{base_url}{}", attr_of(anchor, "href")),
        name: div.select(&name_sel).next().map(text_of).unwrap_or_default(),
        img_url: anchor
            .select(&img_sel)
            .next()
            .map(|img| attr_of(img, "src"))
            .unwrap_or_default(),
    }))
}

/// Assemble a publisher record from its profile page.
pub fn parse_publisher(
    doc: &Html,
    publisher_id: u64,
    base_url: &str,
) -> Result<Publisher, SkoobError> {
    let heading_sel = parse_selector("h2")?;
    let title_sel = parse_selector("title")?;
    let history_sel = parse_selector("#historico")?;
    let anchor_sel = parse_selector("a")?;
    let releases_sel = parse_selector("#livros_lancamentos div.livro-capa-mini")?;

    let name = doc
        .select(&heading_sel)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
        .or_else(|| doc.select(&title_sel).next().map(text_of))
        .unwrap_or_default();
    let description = doc
        .select(&history_sel)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty());
    let website = doc
        .select(&anchor_sel)
        .find(|a| text_of(*a) == "Site oficial")
        .map(|a| attr_of(a, "href"))
        .filter(|h| !h.is_empty());

    let mut last_releases = Vec::new();
    for div in doc.select(&releases_sel) {
        if let Some(item) = parse_publisher_item(div, base_url)? {
            last_releases.push(item);
        }
    }

    Ok(Publisher {
        id: publisher_id,
        name,
        description,
        website,
        stats: parse_publisher_stats(doc)?,
        last_releases,
    })
}

/// Parse every book block of a publisher's books listing.
pub fn parse_publisher_books(doc: &Html, base_url: &str) -> Result<Vec<PublisherItem>, SkoobError> {
    let block_sel = parse_selector("div.box_livro")?;
    let mut books = Vec::new();
    for div in doc.select(&block_sel) {
        if let Some(item) = parse_publisher_item(div, base_url)? {
            books.push(item);
        }
    }
    Ok(books)
}

/// Parse every author block of a publisher's authors listing.
pub fn parse_publisher_authors(
    doc: &Html,
    base_url: &str,
) -> Result<Vec<PublisherAuthor>, SkoobError> {
    let block_sel = parse_selector("div.box_autor")?;
    let mut authors = Vec::new();
    for div in doc.select(&block_sel) {
        if let Some(author) = parse_publisher_author(div, base_url)? {
            authors.push(author);
        }
    }
    Ok(authors)
}

// src/extract.rs
//! Document extraction: turn a fetched profile page into profile metadata,
//! unclassified candidate badge cards, and the modal dialogs they reference.
//!
//! The markup shape is undocumented but stable; every selector below mirrors
//! what the platform serves today. Missing optional nodes degrade to
//! defaults — only a page with none of the expected structure at all is an
//! error.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use thiserror::Error;

use crate::classify::DialogInfo;

pub const DEFAULT_NAME: &str = "Anonymous";
pub const DEFAULT_NA: &str = "N/A";

#[derive(Debug, Error, PartialEq)]
pub enum ExtractError {
    /// The document carries none of the profile-page structure (no name
    /// heading, no league block, no badge cards). Typically a login wall,
    /// an error page, or a wrong URL.
    #[error("document does not look like a public profile page")]
    NotAProfilePage,
}

/// One badge card as found in the document, before date resolution and
/// classification. Cards missing the title or the date element never get
/// this far.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCard {
    pub title: String,
    pub date_text: String,
    pub modal_id: Option<String>,
}

/// Extraction output: metadata with defaults applied, candidate cards, and
/// dialogs keyed by their element id.
#[derive(Debug, Clone)]
pub struct RawProfile {
    pub name: String,
    pub member_since: String,
    pub photo_url: Option<String>,
    pub league_name: String,
    pub league_points: u32,
    pub league_icon_url: Option<String>,
    pub cards: Vec<RawCard>,
    pub dialogs: HashMap<String, DialogInfo>,
    /// Card elements dropped for lacking a title or date element.
    pub malformed_cards: usize,
}

macro_rules! selector {
    ($name:ident, $css:literal) => {
        static $name: Lazy<Selector> =
            Lazy::new(|| Selector::parse($css).expect(concat!("selector ", $css)));
    };
}

selector!(SEL_NAME, "h1.ql-display-small");
selector!(SEL_MEMBER_SINCE, "p.ql-body-large.l-mbl");
selector!(SEL_AVATAR, "ql-avatar.profile-avatar");
selector!(SEL_LEAGUE, "div.profile-league");
selector!(SEL_LEAGUE_NAME, "h2.ql-headline-medium");
selector!(SEL_LEAGUE_POINTS, "strong");
selector!(SEL_LEAGUE_ICON, "img");
selector!(SEL_CARD, "div.profile-badge");
selector!(SEL_CARD_TITLE, "span.ql-title-medium");
selector!(SEL_CARD_DATE, "span.ql-body-medium");
selector!(SEL_CARD_MODAL, "ql-button[modal]");
selector!(SEL_DIALOG, "ql-dialog[id]");
selector!(SEL_DIALOG_ACTION, "ql-button[href]");

/// Parse a profile page. Returns `Err(NotAProfilePage)` only on structural
/// failure; an empty badge list is a valid result.
pub fn parse_profile_document(html: &str) -> Result<RawProfile, ExtractError> {
    let doc = Html::parse_document(html);

    let name_el = doc.select(&SEL_NAME).next();
    let league_el = doc.select(&SEL_LEAGUE).next();
    let mut card_iter = doc.select(&SEL_CARD).peekable();

    if name_el.is_none() && league_el.is_none() && card_iter.peek().is_none() {
        return Err(ExtractError::NotAProfilePage);
    }

    let name = name_el
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_NAME.to_string());
    let member_since = doc
        .select(&SEL_MEMBER_SINCE)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_NA.to_string());
    let photo_url = doc
        .select(&SEL_AVATAR)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);

    let (league_name, league_points, league_icon_url) = match league_el {
        Some(league) => extract_league(league),
        None => (DEFAULT_NA.to_string(), 0, None),
    };

    let mut malformed_cards = 0usize;
    let mut cards = Vec::new();
    for card in card_iter {
        match extract_card(card) {
            Some(c) => cards.push(c),
            None => malformed_cards += 1,
        }
    }

    let mut dialogs = HashMap::new();
    for dlg in doc.select(&SEL_DIALOG) {
        let Some(id) = dlg.value().attr("id") else {
            continue;
        };
        let action_href = dlg
            .select(&SEL_DIALOG_ACTION)
            .next()
            .and_then(|el| el.value().attr("href"))
            .map(|h| h.trim().to_string());
        let headline = dlg.value().attr("headline").map(str::to_string);
        dialogs.insert(
            id.to_string(),
            DialogInfo {
                headline,
                action_href,
            },
        );
    }

    Ok(RawProfile {
        name,
        member_since,
        photo_url,
        league_name,
        league_points,
        league_icon_url,
        cards,
        dialogs,
        malformed_cards,
    })
}

fn extract_league(league: ElementRef<'_>) -> (String, u32, Option<String>) {
    let name = league
        .select(&SEL_LEAGUE_NAME)
        .next()
        .map(element_text)
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| DEFAULT_NA.to_string());
    let points = league
        .select(&SEL_LEAGUE_POINTS)
        .next()
        .map(|el| parse_league_points(&element_text(el)))
        .unwrap_or(0);
    let icon = league
        .select(&SEL_LEAGUE_ICON)
        .next()
        .and_then(|el| el.value().attr("src"))
        .map(str::to_string);
    (name, points, icon)
}

/// Both the title and the date element are required for a card to proceed.
fn extract_card(card: ElementRef<'_>) -> Option<RawCard> {
    let title = card.select(&SEL_CARD_TITLE).next().map(element_text)?;
    let date_text = card
        .select(&SEL_CARD_DATE)
        .next()
        .map(|el| el.text().collect::<String>())?;
    let modal_id = card
        .select(&SEL_CARD_MODAL)
        .next()
        .and_then(|el| el.value().attr("modal"))
        .map(str::to_string);
    Some(RawCard {
        title,
        date_text,
        modal_id,
    })
}

/// Points render as e.g. "12,345 points"; anything non-numeric after
/// stripping decorations counts as zero.
fn parse_league_points(text: &str) -> u32 {
    let cleaned = text.replace(" points", "").replace(',', "");
    let cleaned = cleaned.trim();
    if cleaned.chars().all(|c| c.is_ascii_digit()) {
        cleaned.parse().unwrap_or(0)
    } else {
        0
    }
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

//! Event normalization: turns a submitted [`EventCandidate`] into its
//! canonical form or rejects it.
//!
//! Running the normalizer over its own output yields the same candidate.

use once_cell::sync::Lazy;
use regex::Regex;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

use super::models::{Event, EventCandidate};
use crate::validation::{required, ValidationError};

static TIME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,2}):?(\d{2})\s*([AaPp][Mm])?$").expect("time pattern is valid")
});

/// Normalize `candidate`. `previous` is the stored record when updating;
/// slug, date and time are only recomputed when title, date or time differ
/// from it.
pub fn normalize_event(
    candidate: EventCandidate,
    previous: Option<&Event>,
) -> Result<EventCandidate, ValidationError> {
    let title = required("title", &candidate.title)?;
    let description = required("description", &candidate.description)?;
    let overview = required("overview", &candidate.overview)?;
    let image = required("image", &candidate.image)?;
    let venue = required("venue", &candidate.venue)?;
    let location = required("location", &candidate.location)?;
    let date = required("date", &candidate.date)?;
    let time = required("time", &candidate.time)?;
    let mode = required("mode", &candidate.mode)?;
    let audience = required("audience", &candidate.audience)?;
    let organizer = required("organizer", &candidate.organizer)?;

    // A client-sent slug is never stored; only the record's own survives.
    let slug = match previous {
        Some(prev) if prev.title == title => prev.slug.clone(),
        _ => slugify(&title),
    };
    if slug.is_empty() {
        return Err(ValidationError::MissingField("slug"));
    }

    let date = match previous {
        Some(prev) if prev.date == date => date,
        _ => canonical_date(&date)?,
    };

    let time = match previous {
        Some(prev) if prev.time == time => time,
        _ => canonical_time(&time)?,
    };

    let agenda = string_list("agenda", candidate.agenda, false)?;
    let tags = string_list("tags", candidate.tags, true)?;

    Ok(EventCandidate {
        title,
        slug: Some(slug),
        description,
        overview,
        image,
        venue,
        location,
        date,
        time,
        mode,
        audience,
        agenda,
        organizer,
        tags,
    })
}

/// Lowercase, every run of non-alphanumeric characters collapsed to one
/// dash, no leading or trailing dashes.
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for ch in title.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug
}

/// Parse a calendar date and render it as `YYYY-MM-DD`.
///
/// Accepts plain ISO dates, `YYYY/MM/DD`, RFC 3339 timestamps (the UTC date
/// is kept) and ISO date-times without an offset.
pub fn canonical_date(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidDate(raw.to_string());

    let date = Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .or_else(|_| Date::parse(raw, format_description!("[year]/[month]/[day]")))
        .or_else(|_| {
            OffsetDateTime::parse(raw, &Rfc3339).map(|dt| dt.to_offset(UtcOffset::UTC).date())
        })
        .or_else(|_| {
            PrimitiveDateTime::parse(
                raw,
                format_description!("[year]-[month]-[day]T[hour]:[minute][optional [:[second]]]"),
            )
            .map(|dt| dt.date())
        })
        .map_err(|_| invalid())?;

    date.format(format_description!("[year]-[month]-[day]"))
        .map_err(|_| invalid())
}

/// Parse `H:MM`, `HH:MM` (colon optional) or a 12-hour time with an AM/PM
/// suffix and render it as zero-padded 24-hour `HH:MM`.
pub fn canonical_time(raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    let invalid = || ValidationError::InvalidTime(raw.to_string());

    let caps = TIME_PATTERN.captures(raw).ok_or_else(invalid)?;
    let mut hours: u32 = caps[1].parse().map_err(|_| invalid())?;
    let minutes: u32 = caps[2].parse().map_err(|_| invalid())?;

    if let Some(meridiem) = caps.get(3) {
        if !(1..=12).contains(&hours) {
            return Err(invalid());
        }
        let pm = meridiem.as_str().eq_ignore_ascii_case("pm");
        hours = match (hours, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, true) => h + 12,
            (h, false) => h,
        };
    }

    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }

    Ok(format!("{hours:02}:{minutes:02}"))
}

/// Trim every element; reject an empty list or any blank element. Tags are
/// set-like, so repeated tags collapse to their first occurrence.
fn string_list(
    field: &'static str,
    values: Vec<String>,
    dedup: bool,
) -> Result<Vec<String>, ValidationError> {
    if values.is_empty() {
        return Err(ValidationError::InvalidCollection(field));
    }

    let mut out: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::InvalidCollection(field));
        }
        if dedup && out.iter().any(|seen| seen == trimmed) {
            continue;
        }
        out.push(trimmed.to_string());
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    pub(crate) fn kubecon() -> EventCandidate {
        EventCandidate {
            title: "KubeCon + CloudNativeCon Europe 2026".to_string(),
            slug: None,
            description: "The flagship cloud native conference.".to_string(),
            overview: "Four days of talks, workshops and project meetings.".to_string(),
            image: "/images/event2.png".to_string(),
            venue: "Messe Wien".to_string(),
            location: "Vienna, Austria".to_string(),
            date: "2026-03-18".to_string(),
            time: "10:00 AM".to_string(),
            mode: "offline".to_string(),
            audience: "Platform engineers".to_string(),
            agenda: vec!["Keynotes".to_string(), " Project pavilion ".to_string()],
            organizer: "CNCF".to_string(),
            tags: vec!["cloud".to_string(), "kubernetes".to_string()],
        }
    }

    fn stored(candidate: &EventCandidate) -> Event {
        let now = OffsetDateTime::now_utc();
        Event {
            id: Uuid::now_v7(),
            title: candidate.title.clone(),
            slug: candidate.slug.clone().unwrap_or_default(),
            description: candidate.description.clone(),
            overview: candidate.overview.clone(),
            image: candidate.image.clone(),
            venue: candidate.venue.clone(),
            location: candidate.location.clone(),
            date: candidate.date.clone(),
            time: candidate.time.clone(),
            mode: candidate.mode.clone(),
            audience: candidate.audience.clone(),
            agenda: candidate.agenda.clone(),
            organizer: candidate.organizer.clone(),
            tags: candidate.tags.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn slug_is_derived_from_title() {
        let event = normalize_event(kubecon(), None).unwrap();
        assert_eq!(
            event.slug.as_deref(),
            Some("kubecon-cloudnativecon-europe-2026")
        );
    }

    #[test]
    fn slugify_collapses_and_strips_dashes() {
        assert_eq!(slugify("  --AWS re:Invent 2025!!  "), "aws-re-invent-2025");
        assert_eq!(slugify("Next.js Conf"), "next-js-conf");
        assert_eq!(slugify("Café Meetup"), "caf-meetup");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn title_without_slug_characters_is_rejected() {
        let candidate = EventCandidate {
            title: "???".to_string(),
            ..kubecon()
        };
        assert_eq!(
            normalize_event(candidate, None),
            Err(ValidationError::MissingField("slug"))
        );
    }

    #[test]
    fn client_slug_is_ignored_on_create() {
        let candidate = EventCandidate {
            slug: Some("kubecon-eu".to_string()),
            ..kubecon()
        };
        let event = normalize_event(candidate, None).unwrap();
        assert_eq!(
            event.slug.as_deref(),
            Some("kubecon-cloudnativecon-europe-2026")
        );
    }

    #[test]
    fn slug_is_kept_when_title_is_unchanged() {
        let mut previous = stored(&normalize_event(kubecon(), None).unwrap());
        previous.slug = "kubecon-cloudnativecon-eu-2026".to_string();

        let update = EventCandidate::from(&previous);
        let event = normalize_event(update, Some(&previous)).unwrap();
        assert_eq!(event.slug.as_deref(), Some("kubecon-cloudnativecon-eu-2026"));

        let retitled = EventCandidate {
            title: "KubeCon Europe 2026".to_string(),
            ..EventCandidate::from(&previous)
        };
        let event = normalize_event(retitled, Some(&previous)).unwrap();
        assert_eq!(event.slug.as_deref(), Some("kubecon-europe-2026"));
    }

    #[test]
    fn client_slug_is_ignored_on_update() {
        let previous = stored(&normalize_event(kubecon(), None).unwrap());
        for sent in [Some("Not A Slug!/..".to_string()), Some(String::new()), None] {
            let update = EventCandidate {
                slug: sent,
                ..EventCandidate::from(&previous)
            };
            let event = normalize_event(update, Some(&previous)).unwrap();
            assert_eq!(event.slug.as_deref(), Some(previous.slug.as_str()));
        }
    }

    #[test]
    fn missing_field_reports_first_offender() {
        let candidate = EventCandidate {
            overview: "   ".to_string(),
            venue: String::new(),
            ..kubecon()
        };
        assert_eq!(
            normalize_event(candidate, None),
            Err(ValidationError::MissingField("overview"))
        );
    }

    #[test]
    fn time_normalization() {
        assert_eq!(canonical_time("9:00 AM").unwrap(), "09:00");
        assert_eq!(canonical_time("23:59").unwrap(), "23:59");
        assert_eq!(canonical_time("12:15 am").unwrap(), "00:15");
        assert_eq!(canonical_time("12:30 PM").unwrap(), "12:30");
        assert_eq!(canonical_time("8:30pm").unwrap(), "20:30");
        assert_eq!(canonical_time("0930").unwrap(), "09:30");
        assert_eq!(
            canonical_time("24:00"),
            Err(ValidationError::InvalidTime("24:00".to_string()))
        );
        assert!(canonical_time("12:60").is_err());
        assert!(canonical_time("13:00 PM").is_err());
        assert!(canonical_time("noon").is_err());
    }

    #[test]
    fn date_normalization() {
        assert_eq!(canonical_date("2025-11-07").unwrap(), "2025-11-07");
        assert_eq!(canonical_date("2025/11/07").unwrap(), "2025-11-07");
        assert_eq!(
            canonical_date("2025-11-07T23:30:00-02:00").unwrap(),
            "2025-11-08"
        );
        assert_eq!(canonical_date("2025-11-07T09:00").unwrap(), "2025-11-07");
        assert_eq!(
            canonical_date("not-a-date"),
            Err(ValidationError::InvalidDate("not-a-date".to_string()))
        );
        assert!(canonical_date("2025-02-30").is_err());
    }

    #[test]
    fn collections_must_hold_non_empty_strings() {
        let no_tags = EventCandidate {
            tags: vec![],
            ..kubecon()
        };
        assert_eq!(
            normalize_event(no_tags, None),
            Err(ValidationError::InvalidCollection("tags"))
        );

        let blank_agenda_item = EventCandidate {
            agenda: vec!["Keynotes".to_string(), "  ".to_string()],
            ..kubecon()
        };
        assert_eq!(
            normalize_event(blank_agenda_item, None),
            Err(ValidationError::InvalidCollection("agenda"))
        );
    }

    #[test]
    fn strings_and_list_items_are_trimmed_and_tags_deduplicated() {
        let candidate = EventCandidate {
            venue: "  Messe Wien ".to_string(),
            tags: vec!["cloud".into(), " cloud ".into(), "kubernetes".into()],
            ..kubecon()
        };
        let event = normalize_event(candidate, None).unwrap();
        assert_eq!(event.venue, "Messe Wien");
        assert_eq!(event.agenda, vec!["Keynotes", "Project pavilion"]);
        assert_eq!(event.tags, vec!["cloud", "kubernetes"]);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_event(kubecon(), None).unwrap();
        let twice = normalize_event(once.clone(), None).unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.time, "10:00");

        let previous = stored(&once);
        let again = normalize_event(once.clone(), Some(&previous)).unwrap();
        assert_eq!(once, again);
    }
}

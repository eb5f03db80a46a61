//! Built-in sample catalogue used by `devevent-cli seed`.

use super::models::EventCandidate;
use super::store::{EventStore, EventStoreError};

struct Sample {
    title: &'static str,
    image: &'static str,
    venue: &'static str,
    location: &'static str,
    date: &'static str,
    time: &'static str,
    mode: &'static str,
    organizer: &'static str,
    tags: &'static [&'static str],
}

const SAMPLES: &[Sample] = &[
    Sample {
        title: "React Summit US 2025",
        image: "/images/event1.png",
        venue: "Pier 48",
        location: "San Francisco, CA, USA",
        date: "2025-11-07",
        time: "09:00 AM",
        mode: "hybrid",
        organizer: "GitNation",
        tags: &["react", "frontend", "javascript"],
    },
    Sample {
        title: "KubeCon + CloudNativeCon Europe 2026",
        image: "/images/event2.png",
        venue: "Messe Wien",
        location: "Vienna, Austria",
        date: "2026-03-18",
        time: "10:00 AM",
        mode: "offline",
        organizer: "CNCF",
        tags: &["cloud", "kubernetes", "devops"],
    },
    Sample {
        title: "AWS re:Invent 2025",
        image: "/images/event3.png",
        venue: "The Venetian",
        location: "Las Vegas, NV, USA",
        date: "2025-12-01",
        time: "08:30 AM",
        mode: "hybrid",
        organizer: "Amazon Web Services",
        tags: &["cloud", "aws"],
    },
    Sample {
        title: "Next.js Conf 2025",
        image: "/images/event4.png",
        venue: "The Ace Hotel Theatre",
        location: "Los Angeles, CA, USA (Hybrid)",
        date: "2025-11-12",
        time: "09:30 AM",
        mode: "hybrid",
        organizer: "Vercel",
        tags: &["nextjs", "react", "frontend"],
    },
    Sample {
        title: "Google Cloud Next 2026",
        image: "/images/event5.png",
        venue: "San Jose McEnery Convention Center",
        location: "San Jose, CA, USA",
        date: "2026-04-07",
        time: "09:00 AM",
        mode: "offline",
        organizer: "Google Cloud",
        tags: &["cloud", "ai"],
    },
    Sample {
        title: "ETHGlobal Hackathon: Paris 2026",
        image: "/images/event6.png",
        venue: "Station F",
        location: "Paris, France",
        date: "2026-07-10",
        time: "10:00 AM",
        mode: "offline",
        organizer: "ETHGlobal",
        tags: &["web3", "ethereum", "hackathon"],
    },
    Sample {
        title: "Open Source Summit North America 2026",
        image: "/images/event-full.png",
        venue: "Vancouver Convention Centre",
        location: "Vancouver, Canada",
        date: "2026-06-22",
        time: "09:00 AM",
        mode: "offline",
        organizer: "The Linux Foundation",
        tags: &["open-source", "linux", "cloud"],
    },
];

/// Sample events as submission payloads.
pub fn sample_events() -> Vec<EventCandidate> {
    SAMPLES
        .iter()
        .map(|sample| EventCandidate {
            title: sample.title.to_string(),
            slug: None,
            description: format!("{} brings the community together for talks and hands-on sessions.", sample.title),
            overview: format!("Join {} at {} for keynotes, deep dives and hallway conversations.", sample.organizer, sample.venue),
            image: sample.image.to_string(),
            venue: sample.venue.to_string(),
            location: sample.location.to_string(),
            date: sample.date.to_string(),
            time: sample.time.to_string(),
            mode: sample.mode.to_string(),
            audience: "Developers".to_string(),
            agenda: vec![
                "Registration and welcome".to_string(),
                "Keynote".to_string(),
                "Breakout sessions".to_string(),
                "Networking".to_string(),
            ],
            organizer: sample.organizer.to_string(),
            tags: sample.tags.iter().map(|tag| tag.to_string()).collect(),
        })
        .collect()
}

/// Insert every sample whose slug is not taken yet. Returns how many were
/// inserted.
pub async fn seed(store: &EventStore) -> Result<usize, EventStoreError> {
    let mut inserted = 0;
    for candidate in sample_events() {
        match store.create(candidate).await {
            Ok(_) => inserted += 1,
            Err(EventStoreError::DuplicateSlug(slug)) => {
                tracing::debug!(%slug, "sample event already present");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(inserted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::events::normalize::normalize_event;

    #[test]
    fn every_sample_normalizes() {
        for candidate in sample_events() {
            let title = candidate.title.clone();
            assert!(normalize_event(candidate, None).is_ok(), "{title} failed to normalize");
        }
    }

    #[test]
    fn sample_slugs_are_unique() {
        let mut slugs: Vec<_> = sample_events()
            .into_iter()
            .filter_map(|c| normalize_event(c, None).ok()?.slug)
            .collect();
        slugs.sort();
        slugs.dedup();
        assert_eq!(slugs.len(), SAMPLES.len());
    }
}

//! Image record utilities
//!
//! Pure helpers shared by the image and deployment services: enhancing raw
//! image records, ordering them by recency and formatting their age.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use gozer_api::Image;

use crate::models::image::{CreatedAt, EnhancedImage, EnhancedImageMetadata};

const GITHUB_SSH_PREFIX: &str = "git@github.com:";
const GITHUB_HTTPS_PREFIX: &str = "https://github.com/";
const GIT_SUFFIX: &str = ".git";

const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"];
const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y%m%d"];

/// Build the enhanced view of a raw image record
pub fn enhance_image(image: Image) -> EnhancedImage {
    let metadata = image.metadata;
    EnhancedImage {
        name: image.name,
        metadata: EnhancedImageMetadata {
            git_hub_base: github_base_url(&metadata.git_origin),
            created_at: parse_created_at(&metadata.created_at),
            git_commit: metadata.git_commit,
            git_tag: metadata.git_tag,
            git_annotation: metadata.git_annotation,
            git_origin: metadata.git_origin,
        },
    }
}

/// Turn a git remote into a browsable HTTPS URL
///
/// `git@github.com:org/repo.git` becomes `https://github.com/org/repo`.
/// Other remotes only lose a trailing `.git`.
pub fn github_base_url(origin: &str) -> String {
    let mut url = match origin.strip_prefix(GITHUB_SSH_PREFIX) {
        Some(path) => format!("{GITHUB_HTTPS_PREFIX}{path}"),
        None => origin.to_string(),
    };
    if let Some(len) = url.strip_suffix(GIT_SUFFIX).map(str::len) {
        url.truncate(len);
    }
    url
}

/// Parse a `created-at` value; never fails
///
/// Timestamps without an offset are taken as UTC.
pub fn parse_created_at(raw: &str) -> CreatedAt {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return CreatedAt::from(dt.with_timezone(&Utc));
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return CreatedAt::from(dt.and_utc());
        }
    }
    for format in DATE_FORMATS {
        if let Some(dt) = NaiveDate::parse_from_str(raw, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
        {
            return CreatedAt::from(dt.and_utc());
        }
    }

    CreatedAt::INVALID
}

/// Order images newest first
///
/// Stable ascending sort followed by a reversal, so images with equal
/// timestamps come out in reverse of their input order.
pub fn sort_images_by_created_at_desc(mut images: Vec<EnhancedImage>) -> Vec<EnhancedImage> {
    images.sort_by_key(EnhancedImage::created_at);
    images.reverse();
    images
}

/// Split `name:version` on the first colon
pub fn split_image_ref(image: &str) -> (&str, Option<&str>) {
    match image.split_once(':') {
        Some((name, version)) => (name, Some(version)),
        None => (image, None),
    }
}

/// `name:version` from the first two colon-separated parts of a reference
pub fn display_name(image: &str) -> String {
    image.split(':').take(2).collect::<Vec<_>>().join(":")
}

/// Human-relative age such as "3 days ago" or "in a minute"
pub fn human_age(created_at: CreatedAt, now: DateTime<Utc>) -> String {
    let Some(then) = created_at.datetime() else {
        return created_at.to_string();
    };

    let delta = (now - then).num_seconds();
    let phrase = relative_phrase(delta.unsigned_abs() as f64);
    if delta < 0 {
        format!("in {phrase}")
    } else {
        format!("{phrase} ago")
    }
}

fn relative_phrase(seconds: f64) -> String {
    let minutes = (seconds / 60.0).round();
    let hours = (seconds / 3600.0).round();
    let days = (seconds / 86400.0).round();
    let months = (seconds / 86400.0 / 30.436875).round();
    let years = (seconds / 86400.0 / 365.25).round();

    if seconds < 45.0 {
        "a few seconds".to_string()
    } else if minutes <= 1.0 {
        "a minute".to_string()
    } else if minutes < 45.0 {
        format!("{minutes} minutes")
    } else if hours <= 1.0 {
        "an hour".to_string()
    } else if hours < 22.0 {
        format!("{hours} hours")
    } else if days <= 1.0 {
        "a day".to_string()
    } else if days < 26.0 {
        format!("{days} days")
    } else if months <= 1.0 {
        "a month".to_string()
    } else if months < 11.0 {
        format!("{months} months")
    } else if years <= 1.0 {
        "a year".to_string()
    } else {
        format!("{years} years")
    }
}

//! LinkedIn data-export reader.
//!
//! Each export file maps to exactly one profile section, selected by
//! filename. A missing file silently omits its section; a missing column or
//! field within a row is an empty string, never an error.

use super::{Education, Experience, Profile};
use crate::error::ProfileError;
use chrono::{NaiveDate, NaiveDateTime};
use csv::StringRecord;
use std::path::Path;

const MAX_EXPERIENCE: usize = 5;
const MAX_EDUCATION: usize = 3;
const MAX_SKILLS: usize = 15;
const MAX_WRITING_SAMPLES: usize = 5;

/// Read a LinkedIn export directory into a [`Profile`].
pub fn extract(export_dir: &Path) -> Result<Profile, ProfileError> {
    if !export_dir.is_dir() {
        return Err(ProfileError::ExportMissing(
            export_dir.display().to_string(),
        ));
    }

    let mut profile = Profile::default();
    read_identity(export_dir, &mut profile)?;
    profile.experience = read_experience(export_dir)?;
    profile.education = read_education(export_dir)?;
    profile.skills = read_skills(export_dir)?;
    profile.writing_samples = read_writing_samples(export_dir)?;
    Ok(profile)
}

fn read_identity(dir: &Path, profile: &mut Profile) -> Result<(), ProfileError> {
    let Some(rows) = read_rows(dir, "Profile.csv")? else {
        return Ok(());
    };
    if let Some((headers, record)) = rows.first().map(|r| (&rows.headers, r)) {
        let first = field(headers, record, "First Name");
        let last = field(headers, record, "Last Name");
        profile.name = format!("{first} {last}").trim().to_string();
        profile.headline = field(headers, record, "Headline");
        profile.summary = field(headers, record, "Summary");
    }
    Ok(())
}

fn read_experience(dir: &Path) -> Result<Vec<Experience>, ProfileError> {
    let Some(rows) = read_rows(dir, "Positions.csv")? else {
        return Ok(Vec::new());
    };

    let mut positions: Vec<(Option<NaiveDate>, Experience)> = rows
        .records
        .iter()
        .map(|record| {
            let started = parse_month_year(&field(&rows.headers, record, "Started On"));
            let finished_raw = field(&rows.headers, record, "Finished On");
            let period = format_period(
                &field(&rows.headers, record, "Started On"),
                &finished_raw,
            );
            (
                started,
                Experience {
                    title: field(&rows.headers, record, "Title"),
                    company: field(&rows.headers, record, "Company Name"),
                    period,
                    summary: field(&rows.headers, record, "Description"),
                },
            )
        })
        .filter(|(_, exp)| !exp.title.is_empty() || !exp.company.is_empty())
        .collect();

    // Most recent first; undated entries sink to the end.
    positions.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(positions
        .into_iter()
        .take(MAX_EXPERIENCE)
        .map(|(_, exp)| exp)
        .collect())
}

fn read_education(dir: &Path) -> Result<Vec<Education>, ProfileError> {
    let Some(rows) = read_rows(dir, "Education.csv")? else {
        return Ok(Vec::new());
    };

    let mut schools: Vec<(Option<NaiveDate>, Education)> = rows
        .records
        .iter()
        .map(|record| {
            let started = parse_month_year(&field(&rows.headers, record, "Start Date"));
            let period = format_period(
                &field(&rows.headers, record, "Start Date"),
                &field(&rows.headers, record, "End Date"),
            );
            (
                started,
                Education {
                    school: field(&rows.headers, record, "School Name"),
                    degree: field(&rows.headers, record, "Degree Name"),
                    period,
                },
            )
        })
        .filter(|(_, edu)| !edu.school.is_empty())
        .collect();

    schools.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(schools
        .into_iter()
        .take(MAX_EDUCATION)
        .map(|(_, edu)| edu)
        .collect())
}

fn read_skills(dir: &Path) -> Result<Vec<String>, ProfileError> {
    let Some(rows) = read_rows(dir, "Skills.csv")? else {
        return Ok(Vec::new());
    };
    Ok(rows
        .records
        .iter()
        .map(|record| field(&rows.headers, record, "Name"))
        .filter(|name| !name.is_empty())
        .take(MAX_SKILLS)
        .collect())
}

fn read_writing_samples(dir: &Path) -> Result<Vec<String>, ProfileError> {
    let Some(rows) = read_rows(dir, "Shares.csv")? else {
        return Ok(Vec::new());
    };

    let mut shares: Vec<(NaiveDateTime, String)> = rows
        .records
        .iter()
        .filter_map(|record| {
            let commentary = field(&rows.headers, record, "ShareCommentary");
            if commentary.is_empty() {
                return None;
            }
            let date = parse_share_date(&field(&rows.headers, record, "Date"));
            Some((date, commentary))
        })
        .collect();

    // Newest first; unparseable dates sort as oldest.
    shares.sort_by(|a, b| b.0.cmp(&a.0));
    Ok(shares
        .into_iter()
        .take(MAX_WRITING_SAMPLES)
        .map(|(_, text)| text)
        .collect())
}

struct Rows {
    headers: StringRecord,
    records: Vec<StringRecord>,
}

impl Rows {
    fn first(&self) -> Option<&StringRecord> {
        self.records.first()
    }
}

/// Open one export file. `Ok(None)` when the file does not exist; rows that
/// fail to parse are skipped with a diagnostic rather than aborting the run.
fn read_rows(dir: &Path, file_name: &str) -> Result<Option<Rows>, ProfileError> {
    let path = dir.join(file_name);
    if !path.exists() {
        return Ok(None);
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(|e| ProfileError::Csv(format!("{file_name}: {e}")))?;
    let headers = reader
        .headers()
        .map_err(|e| ProfileError::Csv(format!("{file_name}: {e}")))?
        .clone();

    let mut records = Vec::new();
    for result in reader.records() {
        match result {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(file = file_name, error = %e, "skipping unreadable export row");
            }
        }
    }

    Ok(Some(Rows { headers, records }))
}

fn field(headers: &StringRecord, record: &StringRecord, name: &str) -> String {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .and_then(|i| record.get(i))
        .unwrap_or("")
        .trim()
        .to_string()
}

/// LinkedIn exports write position dates as `Jan 2020`; some locales emit
/// plain `2020` or ISO `2020-01-15`.
fn parse_month_year(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(&format!("1 {raw}"), "%d %b %Y")
        .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
        .or_else(|_| NaiveDate::parse_from_str(&format!("1 Jan {raw}"), "%d %b %Y"))
        .ok()
}

fn parse_share_date(raw: &str) -> NaiveDateTime {
    let raw = raw.trim();
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d").map(|d| d.and_time(chrono::NaiveTime::MIN))
        })
        .unwrap_or(NaiveDateTime::MIN)
}

fn format_period(start: &str, end: &str) -> String {
    match (start.trim(), end.trim()) {
        ("", "") => String::new(),
        (start, "") => format!("{start} - present"),
        ("", end) => format!("until {end}"),
        (start, end) => format!("{start} - {end}"),
    }
}

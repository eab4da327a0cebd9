//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that lexical order is chronological. Technology lists are compact JSON.
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use talentproof_core::{
  request::{ContactRequest, ContactStatus},
  talent::{Talent, TalentBrief, TalentListing},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

/// The current time at the precision the store keeps.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── ContactStatus ───────────────────────────────────────────────────────────

pub fn encode_status(s: ContactStatus) -> &'static str { s.as_str() }

pub fn decode_status(s: &str) -> Result<ContactStatus> {
  s.parse().map_err(|e| Error::CorruptRow(format!("{e}")))
}

// ─── Technologies ────────────────────────────────────────────────────────────

pub fn encode_technologies(techs: &[String]) -> Result<String> {
  Ok(serde_json::to_string(techs)?)
}

pub fn decode_technologies(s: &str) -> Result<Vec<String>> {
  Ok(serde_json::from_str(s)?)
}

/// Lowercase for the `*_folded` search columns and the search needle.
pub fn fold(s: &str) -> String { s.to_lowercase() }

/// Escape `%`, `_` and the escape character itself for a `LIKE ... ESCAPE
/// '\'` pattern, and wrap in `%` for an unanchored match.
pub fn like_contains(needle: &str) -> String {
  let mut out = String::with_capacity(needle.len() + 2);
  out.push('%');
  for c in needle.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out.push('%');
  out
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawContactRequest`], for a `contact_requests` row
/// aliased `r`.
pub const REQUEST_COLUMNS: &str = "r.request_id, r.talent_id, r.recruiter_name, \
   r.recruiter_email, r.recruiter_phone, r.company_name, r.message, r.status, \
   r.created_at, r.updated_at";

/// Column list matching [`RawTalent`], for a `talents` row aliased `t`.
/// Every column may be NULL under a LEFT JOIN.
pub const TALENT_COLUMNS: &str = "t.talent_id, t.display_name, t.photo, \
   t.technologies, t.score, t.availability, t.created_at";

/// Raw strings read directly from a `contact_requests` row.
pub struct RawContactRequest {
  pub request_id:      String,
  pub talent_id:       String,
  pub recruiter_name:  String,
  pub recruiter_email: String,
  pub recruiter_phone: String,
  pub company_name:    String,
  pub message:         String,
  pub status:          String,
  pub created_at:      String,
  pub updated_at:      String,
}

impl RawContactRequest {
  /// Read [`REQUEST_COLUMNS`] starting at column `at`.
  pub fn from_row(row: &rusqlite::Row<'_>, at: usize) -> rusqlite::Result<Self> {
    Ok(Self {
      request_id:      row.get(at)?,
      talent_id:       row.get(at + 1)?,
      recruiter_name:  row.get(at + 2)?,
      recruiter_email: row.get(at + 3)?,
      recruiter_phone: row.get(at + 4)?,
      company_name:    row.get(at + 5)?,
      message:         row.get(at + 6)?,
      status:          row.get(at + 7)?,
      created_at:      row.get(at + 8)?,
      updated_at:      row.get(at + 9)?,
    })
  }

  pub fn into_request(self) -> Result<ContactRequest> {
    Ok(ContactRequest {
      id:              decode_uuid(&self.request_id)?,
      talent_id:       decode_uuid(&self.talent_id)?,
      recruiter_name:  self.recruiter_name,
      recruiter_email: self.recruiter_email,
      recruiter_phone: self.recruiter_phone,
      company_name:    self.company_name,
      message:         self.message,
      status:          decode_status(&self.status)?,
      created_at:      decode_dt(&self.created_at)?,
      updated_at:      decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw strings read directly from a `talents` row.
pub struct RawTalent {
  pub talent_id:    String,
  pub display_name: String,
  pub photo:        Option<String>,
  pub technologies: String,
  pub score:        i64,
  pub availability: String,
  pub created_at:   String,
}

impl RawTalent {
  /// Read [`TALENT_COLUMNS`] starting at column `at`; `None` when the join
  /// found no talent.
  pub fn from_joined_row(
    row: &rusqlite::Row<'_>,
    at: usize,
  ) -> rusqlite::Result<Option<Self>> {
    let talent_id: Option<String> = row.get(at)?;
    let Some(talent_id) = talent_id else {
      return Ok(None);
    };
    Ok(Some(Self {
      talent_id,
      display_name: row.get(at + 1)?,
      photo:        row.get(at + 2)?,
      technologies: row.get(at + 3)?,
      score:        row.get(at + 4)?,
      availability: row.get(at + 5)?,
      created_at:   row.get(at + 6)?,
    }))
  }

  pub fn into_talent(self) -> Result<Talent> {
    Ok(Talent {
      id:           decode_uuid(&self.talent_id)?,
      display_name: self.display_name,
      photo:        self.photo,
      technologies: decode_technologies(&self.technologies)?,
      score:        u8::try_from(self.score)
        .map_err(|_| Error::CorruptRow(format!("talent score {}", self.score)))?,
      availability: self.availability,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// A contact-request row joined with its (possibly missing) talent.
pub struct RawJoined {
  pub request: RawContactRequest,
  pub talent:  Option<RawTalent>,
}

impl RawJoined {
  /// Read `REQUEST_COLUMNS, TALENT_COLUMNS` from the start of the row.
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      request: RawContactRequest::from_row(row, 0)?,
      talent:  RawTalent::from_joined_row(row, 10)?,
    })
  }

  pub fn decode(self) -> Result<(ContactRequest, Option<Talent>)> {
    let request = self.request.into_request()?;
    let talent = self.talent.map(RawTalent::into_talent).transpose()?;
    Ok((request, talent))
  }

  pub fn into_listing(self) -> Result<(ContactRequest, Option<TalentListing>)> {
    let (request, talent) = self.decode()?;
    Ok((request, talent.map(Into::into)))
  }

  pub fn into_brief(self) -> Result<(ContactRequest, Option<TalentBrief>)> {
    let (request, talent) = self.decode()?;
    Ok((request, talent.map(Into::into)))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn timestamps_are_fixed_width_and_roundtrip() {
    let a = now();
    let s = encode_dt(a);
    assert!(s.ends_with('Z'));
    assert_eq!(s.len(), "2024-01-01T00:00:00.000000Z".len());
    assert_eq!(decode_dt(&s).unwrap(), a);
  }

  #[test]
  fn like_pattern_escapes_wildcards() {
    assert_eq!(like_contains("50%_off\\"), "%50\\%\\_off\\\\%");
  }

  #[test]
  fn unknown_status_is_corrupt() {
    assert!(matches!(decode_status("archived"), Err(Error::CorruptRow(_))));
  }
}

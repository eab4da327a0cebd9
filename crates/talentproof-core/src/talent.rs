//! Talent: the candidate profile every contact request points at.
//!
//! Talent management lives outside the contact desk; this module only carries
//! what the desk needs: existence checks and the two projections embedded in
//! contact-request responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ValidationErrors;

/// Highest possible talent score.
pub const MAX_SCORE: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Talent {
  pub id:           Uuid,
  pub display_name: String,
  /// URL or path of the profile photo.
  pub photo:        Option<String>,
  pub technologies: Vec<String>,
  /// 0..=100
  pub score:        u8,
  /// Free text, e.g. "immédiate" or "sous 1 mois".
  pub availability: String,
  pub created_at:   DateTime<Utc>,
}

// ─── Projections ─────────────────────────────────────────────────────────────

/// The talent fields shown next to each row of the admin listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentListing {
  pub id:           Uuid,
  pub display_name: String,
  pub photo:        Option<String>,
  pub technologies: Vec<String>,
  pub score:        u8,
  pub availability: String,
}

/// The narrower projection returned with a single contact request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TalentBrief {
  pub id:           Uuid,
  pub display_name: String,
  pub technologies: Vec<String>,
}

impl From<Talent> for TalentListing {
  fn from(t: Talent) -> Self {
    Self {
      id:           t.id,
      display_name: t.display_name,
      photo:        t.photo,
      technologies: t.technologies,
      score:        t.score,
      availability: t.availability,
    }
  }
}

impl From<Talent> for TalentBrief {
  fn from(t: Talent) -> Self {
    Self {
      id:           t.id,
      display_name: t.display_name,
      technologies: t.technologies,
    }
  }
}

// ─── NewTalent ───────────────────────────────────────────────────────────────

/// Input to [`crate::store::ContactRequestStore::add_talent`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewTalent {
  pub display_name: String,
  pub photo:        Option<String>,
  pub technologies: Vec<String>,
  pub score:        u8,
  pub availability: String,
}

impl NewTalent {
  pub fn new(display_name: impl Into<String>) -> Self {
    Self { display_name: display_name.into(), ..Self::default() }
  }

  /// Trim every string, drop blank technologies and check the score range.
  pub fn normalized(self) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let display_name = self.display_name.trim().to_owned();
    if display_name.is_empty() {
      errors.add("displayName", "Le nom du talent est requis");
    }
    if self.score > MAX_SCORE {
      errors.add("score", format!("Le score doit être compris entre 0 et {MAX_SCORE}"));
    }

    let photo = self
      .photo
      .map(|p| p.trim().to_owned())
      .filter(|p| !p.is_empty());
    let technologies = self
      .technologies
      .into_iter()
      .map(|t| t.trim().to_owned())
      .filter(|t| !t.is_empty())
      .collect();

    errors.finish(Self {
      display_name,
      photo,
      technologies,
      score: self.score,
      availability: self.availability.trim().to_owned(),
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn normalized_cleans_fields() {
    let input = NewTalent {
      display_name: "  Inès Dupont ".into(),
      photo:        Some("   ".into()),
      technologies: vec![" Rust".into(), "".into(), "Go ".into()],
      score:        87,
      availability: " immédiate ".into(),
    };
    let t = input.normalized().unwrap();
    assert_eq!(t.display_name, "Inès Dupont");
    assert_eq!(t.photo, None);
    assert_eq!(t.technologies, ["Rust", "Go"]);
    assert_eq!(t.availability, "immédiate");
  }

  #[test]
  fn normalized_rejects_blank_name_and_high_score() {
    let mut input = NewTalent::new(" ");
    input.score = 101;
    let errors = input.normalized().unwrap_err();
    assert!(errors.contains("displayName"));
    assert!(errors.contains("score"));
  }
}

//! [`SqliteStore`], the SQLite implementation of [`ContactRequestStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, types::Value};
use uuid::Uuid;

use talentproof_core::{
  request::{
    ContactRequest, ContactRequestDetail, ContactRequestView, ContactStatus,
    NewContactRequest,
  },
  store::{ContactRequestPage, ContactRequestQuery, ContactRequestStore, StatusCounts},
  talent::{NewTalent, Talent},
};

use crate::{
  Result,
  encode::{
    REQUEST_COLUMNS, RawJoined, RawTalent, TALENT_COLUMNS, decode_status, encode_dt,
    encode_status, encode_technologies, encode_uuid, fold, like_contains, now,
  },
  schema::SCHEMA,
};

/// `SELECT` of a contact request joined with its talent, without a `WHERE`.
fn select_joined() -> String {
  format!(
    "SELECT {REQUEST_COLUMNS}, {TALENT_COLUMNS}
     FROM contact_requests r
     LEFT JOIN talents t ON t.talent_id = r.talent_id"
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A contact-request store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    tracing::debug!(path = %path.display(), "sqlite store ready");
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch one joined row by request id.
  async fn joined_by_id(&self, id: Uuid) -> Result<Option<RawJoined>> {
    let id_str = encode_uuid(id);
    let sql = format!("{} WHERE r.request_id = ?1", select_joined());

    let raw = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawJoined::from_row)
            .optional()?,
        )
      })
      .await?;
    Ok(raw)
  }
}

fn detail(raw: RawJoined) -> Result<ContactRequestDetail> {
  let (request, talent) = raw.into_brief()?;
  Ok(ContactRequestDetail { request, talent })
}

// ─── ContactRequestStore impl ────────────────────────────────────────────────

impl ContactRequestStore for SqliteStore {
  type Error = crate::Error;

  // ── Talents ───────────────────────────────────────────────────────────────

  async fn add_talent(&self, input: NewTalent) -> Result<Talent> {
    let talent = Talent {
      id:           Uuid::new_v4(),
      display_name: input.display_name,
      photo:        input.photo,
      technologies: input.technologies,
      score:        input.score,
      availability: input.availability,
      created_at:   now(),
    };

    let id_str    = encode_uuid(talent.id);
    let name      = talent.display_name.clone();
    let photo     = talent.photo.clone();
    let techs_str = encode_technologies(&talent.technologies)?;
    let score     = i64::from(talent.score);
    let avail     = talent.availability.clone();
    let at_str    = encode_dt(talent.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO talents (
             talent_id, display_name, photo, technologies, score, availability, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
          rusqlite::params![id_str, name, photo, techs_str, score, avail, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(talent)
  }

  async fn get_talent(&self, id: Uuid) -> Result<Option<Talent>> {
    let id_str = encode_uuid(id);
    let sql = format!("SELECT {TALENT_COLUMNS} FROM talents t WHERE t.talent_id = ?1");

    let raw: Option<RawTalent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], |row| {
              RawTalent::from_joined_row(row, 0)
            })
            .optional()?
            .flatten(),
        )
      })
      .await?;

    raw.map(RawTalent::into_talent).transpose()
  }

  // ── Contact requests ──────────────────────────────────────────────────────

  async fn insert_contact_request(
    &self,
    input: NewContactRequest,
  ) -> Result<ContactRequest> {
    let at = now();
    let request = ContactRequest {
      id:              Uuid::new_v4(),
      talent_id:       input.talent_id,
      recruiter_name:  input.recruiter_name,
      recruiter_email: input.recruiter_email,
      recruiter_phone: input.recruiter_phone,
      company_name:    input.company_name,
      message:         input.message,
      status:          ContactStatus::New,
      created_at:      at,
      updated_at:      at,
    };

    let id_str         = encode_uuid(request.id);
    let talent_str     = encode_uuid(request.talent_id);
    let name           = request.recruiter_name.clone();
    let email          = request.recruiter_email.clone();
    let phone          = request.recruiter_phone.clone();
    let company        = request.company_name.clone();
    let message        = request.message.clone();
    let status_str     = encode_status(request.status);
    let at_str         = encode_dt(at);
    let name_folded    = fold(&name);
    let company_folded = fold(&company);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO contact_requests (
             request_id, talent_id, recruiter_name, recruiter_email,
             recruiter_phone, company_name, message, status,
             created_at, updated_at, name_folded, company_folded
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?9, ?10, ?11)",
          rusqlite::params![
            id_str,
            talent_str,
            name,
            email,
            phone,
            company,
            message,
            status_str,
            at_str,
            name_folded,
            company_folded,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(request)
  }

  async fn get_contact_request(&self, id: Uuid) -> Result<Option<ContactRequestDetail>> {
    self.joined_by_id(id).await?.map(detail).transpose()
  }

  async fn list_contact_requests<'a>(
    &'a self,
    query: &'a ContactRequestQuery,
  ) -> Result<ContactRequestPage> {
    // Build WHERE clause and its positional arguments together.
    let mut conds: Vec<String> = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    if let Some(status) = query.filter.status.status() {
      args.push(Value::Text(encode_status(status).to_owned()));
      conds.push(format!("r.status = ?{}", args.len()));
    }
    if let Some(talent_id) = query.filter.talent_id {
      args.push(Value::Text(encode_uuid(talent_id)));
      conds.push(format!("r.talent_id = ?{}", args.len()));
    }
    if let Some(needle) = query.filter.search_term() {
      args.push(Value::Text(like_contains(&fold(needle))));
      let n = args.len();
      conds.push(format!(
        "(r.name_folded LIKE ?{n} ESCAPE '\\'
          OR r.recruiter_email LIKE ?{n} ESCAPE '\\'
          OR r.company_folded LIKE ?{n} ESCAPE '\\')"
      ));
    }

    let where_clause = if conds.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", conds.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM contact_requests r {where_clause}");
    let page_sql = format!(
      "{} {where_clause}
       ORDER BY r.created_at DESC, r.rowid DESC
       LIMIT ?{} OFFSET ?{}",
      select_joined(),
      args.len() + 1,
      args.len() + 2,
    );

    let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

    let (total, raws): (i64, Vec<RawJoined>) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &count_sql,
          rusqlite::params_from_iter(args.iter()),
          |row| row.get(0),
        )?;

        let mut page_args = args;
        page_args.push(Value::Integer(limit));
        page_args.push(Value::Integer(offset));

        let mut stmt = conn.prepare(&page_sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(page_args.iter()), RawJoined::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((total, rows))
      })
      .await?;

    let items = raws
      .into_iter()
      .map(|raw| {
        let (request, talent) = raw.into_listing()?;
        Ok(ContactRequestView { request, talent })
      })
      .collect::<Result<Vec<_>>>()?;

    Ok(ContactRequestPage {
      items,
      total_matching: u64::try_from(total).unwrap_or_default(),
    })
  }

  async fn status_counts(&self) -> Result<StatusCounts> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT status, COUNT(*) FROM contact_requests GROUP BY status")?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let pairs = rows
      .into_iter()
      .map(|(status, n)| Ok((decode_status(&status)?, u64::try_from(n).unwrap_or_default())))
      .collect::<Result<Vec<_>>>()?;

    Ok(StatusCounts::from_pairs(pairs))
  }

  async fn set_status(
    &self,
    id: Uuid,
    status: ContactStatus,
  ) -> Result<Option<ContactRequestDetail>> {
    let id_str     = encode_uuid(id);
    let status_str = encode_status(status);
    let at_str     = encode_dt(now());
    let select_sql = format!("{} WHERE r.request_id = ?1", select_joined());

    let raw: Option<RawJoined> = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "UPDATE contact_requests SET status = ?2, updated_at = ?3
           WHERE request_id = ?1",
          rusqlite::params![id_str, status_str, at_str],
        )?;
        if changed == 0 {
          return Ok(None);
        }
        Ok(
          conn
            .query_row(&select_sql, rusqlite::params![id_str], RawJoined::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(detail).transpose()
  }

  async fn delete_contact_request(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM contact_requests WHERE request_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}

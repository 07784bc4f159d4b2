use super::{
    SqliteRepository, decode_time, encode_time, lower_bound, storable_time, upper_bound,
};
use crate::domain::{NewRecording, Recording, RecordingId, Status};
use crate::infra::db::error::{RepositoryError, RepositoryResult};
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row};

const RECORDING_COLUMNS: &str =
    "id, projTag, startTime, endTime, name, billable, note, status";

impl SqliteRepository {
    /// Insert a recording, stamping it with the current time when it has no
    /// start time. Returns the recording carrying its store-assigned id.
    pub fn create_recording(&self, recording: NewRecording) -> RepositoryResult<Recording> {
        let start_time = storable_time(recording.start_time.unwrap_or_else(Utc::now))?;
        let end_time = recording.end_time.map(storable_time).transpose()?;

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO record (projTag, startTime, endTime, name, billable, note, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            rusqlite::params![
                recording.project_tag,
                encode_time(&start_time),
                end_time.as_ref().map(encode_time),
                recording.name,
                recording.billable,
                recording.note,
                recording.status.as_i64(),
            ],
        )
        .map_err(RepositoryError::from_insert)?;
        let id = conn.last_insert_rowid();
        log::debug!("Created recording {id} for project {}", recording.project_tag);

        Ok(NewRecording {
            end_time,
            ..recording
        }
        .into_recording(id, start_time))
    }

    pub fn all_recordings(&self) -> RepositoryResult<Vec<Recording>> {
        self.query_recordings("ORDER BY id", rusqlite::params![])
    }

    pub fn get_recording(&self, id: RecordingId) -> RepositoryResult<Recording> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {RECORDING_COLUMNS} FROM record WHERE id = ?1"),
            [id],
            Self::row_to_recording,
        )
        .optional()?
        .ok_or(RepositoryError::NotFound)
    }

    pub fn get_recordings_by_project_tag(&self, tag: &str) -> RepositoryResult<Vec<Recording>> {
        self.query_recordings("WHERE projTag = ?1 ORDER BY startTime, id", [tag])
    }

    /// Recordings that started at or after `start` and ended at or before
    /// `end`. Recordings that are still running have no end time and are
    /// therefore never part of a range. Stored times are whole seconds, so
    /// fractional bounds are narrowed to the enclosed whole seconds.
    pub fn get_recordings_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepositoryResult<Vec<Recording>> {
        self.query_recordings(
            "WHERE startTime >= ?1 AND endTime IS NOT NULL AND endTime <= ?2 ORDER BY startTime, id",
            [
                encode_time(&lower_bound(start)),
                encode_time(&upper_bound(end)),
            ],
        )
    }

    /// The most recently started recording that has not been stopped yet.
    pub fn latest_open_recording(&self) -> RepositoryResult<Option<Recording>> {
        let conn = self.lock()?;
        conn.query_row(
            &format!(
                "SELECT {RECORDING_COLUMNS} FROM record WHERE endTime IS NULL ORDER BY startTime DESC, id DESC LIMIT 1"
            ),
            [],
            Self::row_to_recording,
        )
        .optional()
        .map_err(Into::into)
    }

    pub fn count_recordings_for_project(&self, tag: &str) -> RepositoryResult<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(
            "SELECT COUNT(*) FROM record WHERE projTag = ?1",
            [tag],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Overwrite every field of the recording with `id`.
    pub fn update_recording(
        &self,
        id: RecordingId,
        updated: &Recording,
    ) -> RepositoryResult<Recording> {
        if id == 0 {
            return Err(RepositoryError::InvalidArgument(
                "invalid recording id".to_string(),
            ));
        }

        let start_time = storable_time(updated.start_time)?;
        let end_time = updated.end_time.map(storable_time).transpose()?;

        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE record SET projTag = ?1, name = ?2, startTime = ?3, endTime = ?4, note = ?5, billable = ?6, status = ?7 WHERE id = ?8",
            rusqlite::params![
                updated.project_tag,
                updated.name,
                encode_time(&start_time),
                end_time.as_ref().map(encode_time),
                updated.note,
                updated.billable,
                updated.status.as_i64(),
                id
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::UpdateFailed);
        }
        log::debug!("Updated recording {id}");

        Ok(Recording {
            id,
            start_time,
            end_time,
            ..updated.clone()
        })
    }

    pub fn delete_recording(&self, id: RecordingId) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM record WHERE id = ?1", [id])?;
        if affected == 0 {
            return Err(RepositoryError::DeleteFailed);
        }
        log::debug!("Deleted recording {id}");
        Ok(())
    }

    fn query_recordings<P: rusqlite::Params>(
        &self,
        filter: &str,
        params: P,
    ) -> RepositoryResult<Vec<Recording>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {RECORDING_COLUMNS} FROM record {filter}"
        ))?;
        let rows = stmt.query_map(params, Self::row_to_recording)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    fn row_to_recording(row: &Row) -> rusqlite::Result<Recording> {
        let start_raw: String = row.get(2)?;
        let end_raw: Option<String> = row.get(3)?;
        let billable: Option<bool> = row.get(5)?;
        let note: Option<String> = row.get(6)?;

        Ok(Recording {
            id: row.get(0)?,
            project_tag: row.get(1)?,
            start_time: decode_time(2, &start_raw)?,
            end_time: end_raw.as_deref().map(|raw| decode_time(3, raw)).transpose()?,
            name: row.get(4)?,
            billable: billable.unwrap_or(false),
            note: note.unwrap_or_default(),
            status: Status::from_i64(row.get(7)?),
        })
    }
}

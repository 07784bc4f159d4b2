use super::SqliteRepository;
use crate::domain::{Project, Status};
use crate::infra::db::error::{RepositoryError, RepositoryResult};
use rusqlite::{OptionalExtension, Row};

const PROJECT_COLUMNS: &str = "tag, name, type, status";

impl SqliteRepository {
    /// Insert a new project. New projects always start active, whatever
    /// status the caller supplied; the returned value is what was stored.
    pub fn create_project(&self, project: &Project) -> RepositoryResult<Project> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO project (tag, name, type, status) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                project.tag,
                project.name,
                project.project_type,
                Status::Active.as_i64(),
            ],
        )
        .map_err(RepositoryError::from_insert)?;
        log::debug!("Created project {}", project.tag);

        Ok(Project {
            status: Status::Active,
            ..project.clone()
        })
    }

    pub fn all_projects(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project ORDER BY rowid"
        ))?;
        let rows = stmt.query_map([], Self::row_to_project)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn all_active_projects(&self) -> RepositoryResult<Vec<Project>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project WHERE status = ?1 ORDER BY rowid"
        ))?;
        let rows = stmt.query_map([Status::Active.as_i64()], Self::row_to_project)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    pub fn get_project_by_tag(&self, tag: &str) -> RepositoryResult<Project> {
        let conn = self.lock()?;
        conn.query_row(
            &format!("SELECT {PROJECT_COLUMNS} FROM project WHERE tag = ?1"),
            [tag],
            Self::row_to_project,
        )
        .optional()?
        .ok_or(RepositoryError::NotFound)
    }

    /// Overwrite name, type and status of the project with `tag`.
    pub fn update_project(&self, tag: &str, updated: &Project) -> RepositoryResult<Project> {
        if tag.is_empty() {
            return Err(RepositoryError::InvalidArgument(
                "invalid project tag".to_string(),
            ));
        }

        let conn = self.lock()?;
        let affected = conn.execute(
            "UPDATE project SET name = ?1, type = ?2, status = ?3 WHERE tag = ?4",
            rusqlite::params![
                updated.name,
                updated.project_type,
                updated.status.as_i64(),
                tag
            ],
        )?;
        if affected == 0 {
            return Err(RepositoryError::UpdateFailed);
        }
        log::debug!("Updated project {tag}");

        Ok(Project {
            tag: tag.to_string(),
            ..updated.clone()
        })
    }

    /// Delete the project with `tag`. Its recordings are kept and continue
    /// to carry the tag.
    pub fn delete_project(&self, tag: &str) -> RepositoryResult<()> {
        let conn = self.lock()?;
        let affected = conn.execute("DELETE FROM project WHERE tag = ?1", [tag])?;
        if affected == 0 {
            return Err(RepositoryError::DeleteFailed);
        }
        log::debug!("Deleted project {tag}");
        Ok(())
    }

    fn row_to_project(row: &Row) -> rusqlite::Result<Project> {
        Ok(Project {
            tag: row.get(0)?,
            name: row.get(1)?,
            project_type: row.get(2)?,
            status: Status::from_i64(row.get(3)?),
        })
    }
}

use crate::application::repositories::{ModelRepository, UserRepository, WorkspaceRepository};
use crate::domain::base::{DomainError, Entity, Owned};
use crate::domain::entities::{ModelDetails, ModelEntry, User, Workspace, DEFAULT_MODEL_STATUS};
use crate::domain::value_objects::{Email, ModelId, SearchScope, UserId, WorkspaceId};
use crate::domain::DomainResult;
use chrono::{Local, NaiveDate};
use rusqlite::{params, Connection, OptionalExtension, Params, Result as SqliteResult, Row};

const MODEL_COLUMNS: &str = "id, name, developer, model_type, status, date_interacted, tags, \
                             notes, source_links, parameters, license, version, user_id, workspace_id";

const WORKSPACE_COLUMNS: &str = "id, name, description, user_id, is_default, created_at";

fn db_error(e: rusqlite::Error) -> DomainError {
    DomainError::InvalidOperation(format!("Database error: {}", e))
}

fn encode_list(values: &[String]) -> DomainResult<String> {
    serde_json::to_string(values)
        .map_err(|e| DomainError::InvalidValue(format!("Cannot encode list: {}", e)))
}

/// NULL, blank and JSON `null` all decode to an empty list
fn decode_list(raw: Option<String>, column: &str) -> DomainResult<Vec<String>> {
    match raw {
        None => Ok(Vec::new()),
        Some(text) if text.trim().is_empty() => Ok(Vec::new()),
        Some(text) => serde_json::from_str::<Option<Vec<String>>>(&text)
            .map(Option::unwrap_or_default)
            .map_err(|e| {
                DomainError::InvalidValue(format!("Malformed {} column '{}': {}", column, text, e))
            }),
    }
}

/// Raw `model_entry` row, converted into a domain entity after the query finishes
struct ModelRow {
    id: i64,
    name: String,
    developer: Option<String>,
    model_type: Option<String>,
    status: Option<String>,
    date_interacted: Option<NaiveDate>,
    tags: Option<String>,
    notes: Option<String>,
    source_links: Option<String>,
    parameters: Option<i64>,
    license: Option<String>,
    version: Option<String>,
    user_id: i64,
    workspace_id: Option<i64>,
}

impl ModelRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(ModelRow {
            id: row.get(0)?,
            name: row.get(1)?,
            developer: row.get(2)?,
            model_type: row.get(3)?,
            status: row.get(4)?,
            date_interacted: row.get(5)?,
            tags: row.get(6)?,
            notes: row.get(7)?,
            source_links: row.get(8)?,
            parameters: row.get(9)?,
            license: row.get(10)?,
            version: row.get(11)?,
            user_id: row.get(12)?,
            workspace_id: row.get(13)?,
        })
    }

    fn into_entry(self) -> DomainResult<ModelEntry> {
        let details = ModelDetails {
            name: self.name,
            developer: self.developer,
            model_type: self.model_type,
            status: self
                .status
                .unwrap_or_else(|| DEFAULT_MODEL_STATUS.to_string()),
            date_interacted: self.date_interacted,
            tags: decode_list(self.tags, "tags")?,
            notes: self.notes,
            source_links: decode_list(self.source_links, "source_links")?,
            parameters: self.parameters,
            license: self.license,
            version: self.version,
        };

        ModelEntry::new(
            ModelId::new(self.id)?,
            UserId::new(self.user_id)?,
            self.workspace_id.map(WorkspaceId::new).transpose()?,
            details,
        )
    }
}

struct WorkspaceRow {
    id: i64,
    name: String,
    description: Option<String>,
    user_id: i64,
    is_default: bool,
    created_at: NaiveDate,
}

impl WorkspaceRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(WorkspaceRow {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            user_id: row.get(3)?,
            is_default: row.get(4)?,
            created_at: row.get(5)?,
        })
    }

    fn into_workspace(self) -> DomainResult<Workspace> {
        Workspace::new(
            WorkspaceId::new(self.id)?,
            UserId::new(self.user_id)?,
            self.name,
            self.description,
            self.is_default,
            self.created_at,
        )
    }
}

struct UserRow {
    id: i64,
    username: String,
    email: String,
    is_active: bool,
    created_at: NaiveDate,
}

impl UserRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(UserRow {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            is_active: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn into_user(self) -> DomainResult<User> {
        User::new(
            UserId::new(self.id)?,
            self.username,
            Email::new(self.email)?,
            self.is_active,
            self.created_at,
        )
    }
}

/// SQLite-backed store for users, workspaces and model records
pub struct SqliteRepository {
    conn: Connection,
}

impl SqliteRepository {
    /// Wrap an existing connection whose schema is already initialized
    pub fn new(conn: Connection) -> Self {
        SqliteRepository { conn }
    }

    /// Create a new in-memory SQLite repository (useful for testing)
    pub fn new_in_memory() -> SqliteResult<Self> {
        let conn = Connection::open_in_memory()?;
        super::schema::initialize_database(&conn)?;
        Ok(SqliteRepository { conn })
    }

    /// Create a new file-based SQLite repository
    pub fn new_with_path(path: impl AsRef<std::path::Path>) -> SqliteResult<Self> {
        let conn = Connection::open(path)?;
        super::schema::initialize_database(&conn)?;
        Ok(SqliteRepository { conn })
    }

    fn query_models<P: Params>(&self, sql: &str, params: P) -> DomainResult<Vec<ModelEntry>> {
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let rows = stmt
            .query_map(params, ModelRow::from_row)
            .map_err(db_error)?
            .collect::<SqliteResult<Vec<_>>>()
            .map_err(db_error)?;

        rows.into_iter().map(ModelRow::into_entry).collect()
    }

    fn query_workspaces<P: Params>(&self, sql: &str, params: P) -> DomainResult<Vec<Workspace>> {
        let mut stmt = self.conn.prepare(sql).map_err(db_error)?;
        let rows = stmt
            .query_map(params, WorkspaceRow::from_row)
            .map_err(db_error)?
            .collect::<SqliteResult<Vec<_>>>()
            .map_err(db_error)?;

        rows.into_iter().map(WorkspaceRow::into_workspace).collect()
    }

    fn query_user<P: Params>(&self, sql: &str, params: P) -> DomainResult<Option<User>> {
        self.conn
            .query_row(sql, params, UserRow::from_row)
            .optional()
            .map_err(db_error)?
            .map(UserRow::into_user)
            .transpose()
    }
}

impl ModelRepository for SqliteRepository {
    fn insert(
        &mut self,
        owner: &UserId,
        workspace: Option<&WorkspaceId>,
        details: ModelDetails,
    ) -> DomainResult<ModelEntry> {
        details.validate()?;

        self.conn
            .execute(
                "INSERT INTO model_entry (name, developer, model_type, status, date_interacted, tags,
                     notes, source_links, parameters, license, version, user_id, workspace_id)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
                params![
                    details.name,
                    details.developer,
                    details.model_type,
                    details.status,
                    details.date_interacted,
                    encode_list(&details.tags)?,
                    details.notes,
                    encode_list(&details.source_links)?,
                    details.parameters,
                    details.license,
                    details.version,
                    owner.value(),
                    workspace.map(|w| w.value()),
                ],
            )
            .map_err(db_error)?;

        let id = ModelId::new(self.conn.last_insert_rowid())?;
        ModelEntry::new(id, *owner, workspace.copied(), details)
    }

    fn save(&mut self, model: &ModelEntry) -> DomainResult<()> {
        let details = model.details();
        let rows_affected = self
            .conn
            .execute(
                "UPDATE model_entry
                 SET name = ?1, developer = ?2, model_type = ?3, status = ?4, date_interacted = ?5,
                     tags = ?6, notes = ?7, source_links = ?8, parameters = ?9, license = ?10,
                     version = ?11, workspace_id = ?12
                 WHERE id = ?13 AND user_id = ?14",
                params![
                    details.name,
                    details.developer,
                    details.model_type,
                    details.status,
                    details.date_interacted,
                    encode_list(&details.tags)?,
                    details.notes,
                    encode_list(&details.source_links)?,
                    details.parameters,
                    details.license,
                    details.version,
                    model.workspace_id().map(|w| w.value()),
                    model.id().value(),
                    model.owner().value(),
                ],
            )
            .map_err(db_error)?;

        if rows_affected == 0 {
            return Err(DomainError::NotFound(format!("model {}", model.id())));
        }
        Ok(())
    }

    fn find_by_id(&self, id: &ModelId, owner: &UserId) -> DomainResult<Option<ModelEntry>> {
        let sql = format!(
            "SELECT {} FROM model_entry WHERE id = ?1 AND user_id = ?2",
            MODEL_COLUMNS
        );
        Ok(self
            .query_models(&sql, params![id.value(), owner.value()])?
            .into_iter()
            .next())
    }

    fn find_all(&self, scope: &SearchScope) -> DomainResult<Vec<ModelEntry>> {
        let owner = scope.owner_id().value();
        match scope.workspace_id() {
            Some(workspace) => {
                let sql = format!(
                    "SELECT {} FROM model_entry WHERE user_id = ?1 AND workspace_id = ?2 ORDER BY id",
                    MODEL_COLUMNS
                );
                self.query_models(&sql, params![owner, workspace.value()])
            }
            None => {
                let sql = format!(
                    "SELECT {} FROM model_entry WHERE user_id = ?1 ORDER BY id",
                    MODEL_COLUMNS
                );
                self.query_models(&sql, params![owner])
            }
        }
    }

    fn delete(&mut self, id: &ModelId, owner: &UserId) -> DomainResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM model_entry WHERE id = ?1 AND user_id = ?2",
                params![id.value(), owner.value()],
            )
            .map_err(db_error)?;

        Ok(rows_affected > 0)
    }
}

impl WorkspaceRepository for SqliteRepository {
    fn insert_workspace(
        &mut self,
        owner: &UserId,
        name: &str,
        description: Option<&str>,
        is_default: bool,
    ) -> DomainResult<Workspace> {
        let created_at = Local::now().date_naive();
        // Validate before touching the database
        let pending = Workspace::new(
            WorkspaceId::new(1)?,
            *owner,
            name,
            description.map(str::to_string),
            is_default,
            created_at,
        )?;

        self.conn
            .execute(
                "INSERT INTO workspaces (name, description, user_id, is_default, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![name, description, owner.value(), is_default, created_at],
            )
            .map_err(db_error)?;

        Workspace::new(
            WorkspaceId::new(self.conn.last_insert_rowid())?,
            *owner,
            pending.name(),
            pending.description().map(str::to_string),
            is_default,
            created_at,
        )
    }

    fn save_workspace(&mut self, workspace: &Workspace) -> DomainResult<()> {
        let rows_affected = self
            .conn
            .execute(
                "UPDATE workspaces SET name = ?1, description = ?2 WHERE id = ?3 AND user_id = ?4",
                params![
                    workspace.name(),
                    workspace.description(),
                    workspace.id().value(),
                    workspace.owner().value(),
                ],
            )
            .map_err(db_error)?;

        if rows_affected == 0 {
            return Err(DomainError::NotFound(format!("workspace {}", workspace.id())));
        }
        Ok(())
    }

    fn find_workspace(&self, id: &WorkspaceId, owner: &UserId) -> DomainResult<Option<Workspace>> {
        let sql = format!(
            "SELECT {} FROM workspaces WHERE id = ?1 AND user_id = ?2",
            WORKSPACE_COLUMNS
        );
        Ok(self
            .query_workspaces(&sql, params![id.value(), owner.value()])?
            .into_iter()
            .next())
    }

    fn find_workspaces(&self, owner: &UserId) -> DomainResult<Vec<Workspace>> {
        let sql = format!(
            "SELECT {} FROM workspaces WHERE user_id = ?1 ORDER BY id",
            WORKSPACE_COLUMNS
        );
        self.query_workspaces(&sql, params![owner.value()])
    }

    fn find_default_workspace(&self, owner: &UserId) -> DomainResult<Option<Workspace>> {
        let sql = format!(
            "SELECT {} FROM workspaces WHERE user_id = ?1 AND is_default = 1 ORDER BY id LIMIT 1",
            WORKSPACE_COLUMNS
        );
        Ok(self
            .query_workspaces(&sql, params![owner.value()])?
            .into_iter()
            .next())
    }

    fn delete_workspace(&mut self, id: &WorkspaceId, owner: &UserId) -> DomainResult<bool> {
        let rows_affected = self
            .conn
            .execute(
                "DELETE FROM workspaces WHERE id = ?1 AND user_id = ?2",
                params![id.value(), owner.value()],
            )
            .map_err(db_error)?;

        Ok(rows_affected > 0)
    }
}

impl UserRepository for SqliteRepository {
    fn insert_user(&mut self, username: &str, email: &Email) -> DomainResult<User> {
        if self.find_user_by_email(email)?.is_some() {
            return Err(DomainError::BusinessRuleViolation(format!(
                "Email already registered: {}",
                email
            )));
        }

        let created_at = Local::now().date_naive();
        self.conn
            .execute(
                "INSERT INTO users (username, email, is_active, created_at) VALUES (?1, ?2, 1, ?3)",
                params![username, email.as_str(), created_at],
            )
            .map_err(db_error)?;

        User::new(
            UserId::new(self.conn.last_insert_rowid())?,
            username,
            email.clone(),
            true,
            created_at,
        )
    }

    fn find_user(&self, id: &UserId) -> DomainResult<Option<User>> {
        self.query_user(
            "SELECT id, username, email, is_active, created_at FROM users WHERE id = ?1",
            params![id.value()],
        )
    }

    fn find_user_by_email(&self, email: &Email) -> DomainResult<Option<User>> {
        self.query_user(
            "SELECT id, username, email, is_active, created_at FROM users WHERE email = ?1",
            params![email.as_str()],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo_with_user() -> (SqliteRepository, UserId) {
        let mut repo = SqliteRepository::new_in_memory().unwrap();
        let user = repo
            .insert_user("ada", &Email::new("ada@example.com").unwrap())
            .unwrap();
        let id = *user.id();
        (repo, id)
    }

    fn detailed(name: &str) -> ModelDetails {
        let mut details = ModelDetails::new(name);
        details.developer = Some("Meta".to_string());
        details.model_type = Some("LLM".to_string());
        details.tags = vec!["chat".to_string(), "open-weights".to_string()];
        details.source_links = vec!["https://llama.meta.com".to_string()];
        details.parameters = Some(8_000_000_000);
        details.date_interacted = NaiveDate::from_ymd_opt(2024, 4, 18);
        details
    }

    #[test]
    fn test_insert_and_find_by_id() {
        let (mut repo, owner) = repo_with_user();

        let model = repo.insert(&owner, None, detailed("Llama 3")).unwrap();
        let loaded = repo.find_by_id(model.id(), &owner).unwrap().unwrap();

        assert_eq!(loaded, model);
        assert_eq!(loaded.details().parameters, Some(8_000_000_000));
        assert_eq!(loaded.tags(), model.tags());
    }

    #[test]
    fn test_insert_rejects_empty_name() {
        let (mut repo, owner) = repo_with_user();

        assert!(repo.insert(&owner, None, ModelDetails::new("")).is_err());
        assert!(repo.find_all(&SearchScope::owner(owner)).unwrap().is_empty());
    }

    #[test]
    fn test_find_by_id_is_owner_scoped() {
        let (mut repo, owner) = repo_with_user();
        let other = *repo
            .insert_user("grace", &Email::new("grace@example.com").unwrap())
            .unwrap()
            .id();

        let model = repo.insert(&owner, None, detailed("Llama 3")).unwrap();

        assert!(repo.find_by_id(model.id(), &other).unwrap().is_none());
        assert!(!repo.delete(model.id(), &other).unwrap());
    }

    #[test]
    fn test_find_all_in_id_order_and_scope() {
        let (mut repo, owner) = repo_with_user();
        let workspace = repo
            .insert_workspace(&owner, "Vision", None, false)
            .unwrap();

        repo.insert(&owner, None, ModelDetails::new("First")).unwrap();
        repo.insert(&owner, Some(workspace.id()), ModelDetails::new("Second"))
            .unwrap();
        repo.insert(&owner, None, ModelDetails::new("Third")).unwrap();

        let all = repo.find_all(&SearchScope::owner(owner)).unwrap();
        let names: Vec<&str> = all.iter().map(|m| m.name()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);

        let scoped = repo
            .find_all(&SearchScope::workspace(owner, *workspace.id()))
            .unwrap();
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].name(), "Second");
    }

    #[test]
    fn test_save_updates_record() {
        let (mut repo, owner) = repo_with_user();
        let mut model = repo.insert(&owner, None, detailed("Llama 3")).unwrap();

        let mut details = model.details().clone();
        details.version = Some("3.1".to_string());
        model.replace_details(details).unwrap();
        model.set_tags(vec!["updated".to_string()]);
        repo.save(&model).unwrap();

        let loaded = repo.find_by_id(model.id(), &owner).unwrap().unwrap();
        assert_eq!(loaded.details().version.as_deref(), Some("3.1"));
        assert_eq!(loaded.tags(), &["updated".to_string()]);
    }

    #[test]
    fn test_save_missing_record_is_not_found() {
        let (mut repo, owner) = repo_with_user();
        let ghost = ModelEntry::new(
            ModelId::new(999).unwrap(),
            owner,
            None,
            ModelDetails::new("Ghost"),
        )
        .unwrap();

        assert!(matches!(repo.save(&ghost), Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_delete() {
        let (mut repo, owner) = repo_with_user();
        let model = repo.insert(&owner, None, ModelDetails::new("BERT")).unwrap();

        assert!(repo.delete(model.id(), &owner).unwrap());
        assert!(repo.find_by_id(model.id(), &owner).unwrap().is_none());
        assert!(!repo.delete(model.id(), &owner).unwrap());
    }

    #[test]
    fn test_null_collections_load_as_empty() {
        let (repo, owner) = repo_with_user();
        repo.conn
            .execute(
                "INSERT INTO model_entry (name, status, tags, source_links, user_id)
                 VALUES ('Legacy', NULL, NULL, 'null', ?1)",
                params![owner.value()],
            )
            .unwrap();

        let models = repo.find_all(&SearchScope::owner(owner)).unwrap();

        assert_eq!(models.len(), 1);
        assert!(models[0].tags().is_empty());
        assert!(models[0].details().source_links.is_empty());
        assert_eq!(models[0].details().status, DEFAULT_MODEL_STATUS);
    }

    #[test]
    fn test_malformed_row_is_an_error() {
        let (repo, owner) = repo_with_user();
        repo.conn
            .execute(
                "INSERT INTO model_entry (name, tags, user_id) VALUES ('', '[]', ?1)",
                params![owner.value()],
            )
            .unwrap();

        assert!(repo.find_all(&SearchScope::owner(owner)).is_err());
    }

    #[test]
    fn test_malformed_tags_is_an_error() {
        let (repo, owner) = repo_with_user();
        repo.conn
            .execute(
                "INSERT INTO model_entry (name, tags, user_id) VALUES ('Broken', 'not json', ?1)",
                params![owner.value()],
            )
            .unwrap();

        assert!(matches!(
            repo.find_all(&SearchScope::owner(owner)),
            Err(DomainError::InvalidValue(_))
        ));
    }

    #[test]
    fn test_workspace_lifecycle() {
        let (mut repo, owner) = repo_with_user();

        let default = repo
            .insert_workspace(&owner, "Default Workspace", Some("Your default workspace"), true)
            .unwrap();
        let mut research = repo
            .insert_workspace(&owner, "Research", None, false)
            .unwrap();

        assert_eq!(
            repo.find_default_workspace(&owner).unwrap().as_ref().map(|w| *w.id()),
            Some(*default.id())
        );
        assert_eq!(repo.find_workspaces(&owner).unwrap().len(), 2);

        research.rename("Papers").unwrap();
        repo.save_workspace(&research).unwrap();
        let loaded = repo.find_workspace(research.id(), &owner).unwrap().unwrap();
        assert_eq!(loaded.name(), "Papers");
        assert!(!loaded.is_default());
    }

    #[test]
    fn test_deleting_workspace_keeps_models() {
        let (mut repo, owner) = repo_with_user();
        let workspace = repo
            .insert_workspace(&owner, "Scratch", None, false)
            .unwrap();
        let model = repo
            .insert(&owner, Some(workspace.id()), ModelDetails::new("Draft"))
            .unwrap();

        assert!(repo.delete_workspace(workspace.id(), &owner).unwrap());

        let loaded = repo.find_by_id(model.id(), &owner).unwrap().unwrap();
        assert!(loaded.workspace_id().is_none());
    }

    #[test]
    fn test_users() {
        let (mut repo, owner) = repo_with_user();

        let user = repo.find_user(&owner).unwrap().unwrap();
        assert_eq!(user.username(), "ada");
        assert!(user.is_active());

        let duplicate = repo.insert_user("ada2", &Email::new("ada@example.com").unwrap());
        assert!(matches!(duplicate, Err(DomainError::BusinessRuleViolation(_))));

        let missing = repo
            .find_user_by_email(&Email::new("nobody@example.com").unwrap())
            .unwrap();
        assert!(missing.is_none());
    }
}

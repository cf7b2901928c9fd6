//! Task and user storage on redb.
//!
//! One file, three tables. Rows are serde_json-encoded, keyed by UUID bytes.
//! The store knows nothing about filtering by completion status; the list
//! view does that client-side.

use crate::models::{Task, User};
use chrono::Utc;
use redb::{Database, ReadableTable, TableDefinition};
use std::sync::Arc;
use uuid::Uuid;

const USERS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("users");
const TASKS_TABLE: TableDefinition<&[u8], &[u8]> = TableDefinition::new("tasks");
const USERNAME_INDEX: TableDefinition<&str, &[u8]> = TableDefinition::new("username_index");

/// Thin handle to the redb file. Cloneable (Arc inside).
#[derive(Clone)]
pub struct Db {
    db: Arc<Database>,
}

impl Db {
    /// Open (or create) the store at the given path.
    /// Creates tables if they don't exist.
    pub fn open(path: &str) -> Result<Self, StoreError> {
        let db = Database::create(path)?;

        // Ensure tables exist
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(USERS_TABLE)?;
            let _ = txn.open_table(TASKS_TABLE)?;
            let _ = txn.open_table(USERNAME_INDEX)?;
        }
        txn.commit()?;

        Ok(Db { db: Arc::new(db) })
    }

    // ── User operations ────────────────────────────────────────

    pub fn create_user(&self, user: &User) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut users = txn.open_table(USERS_TABLE)?;
            let mut username_index = txn.open_table(USERNAME_INDEX)?;

            let bytes = serde_json::to_vec(user).map_err(|e| StoreError::Encode(e.to_string()))?;
            let id_bytes = user.id.as_bytes();

            users.insert(id_bytes.as_slice(), bytes.as_slice())?;
            username_index.insert(user.username.as_str(), id_bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let txn = self.db.begin_read()?;
        let users = txn.open_table(USERS_TABLE)?;

        match users.get(id.as_bytes().as_slice())? {
            Some(data) => {
                let user: User = serde_json::from_slice(data.value())
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(user))
            }
            None => Ok(None),
        }
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let txn = self.db.begin_read()?;
        let username_index = txn.open_table(USERNAME_INDEX)?;

        match username_index.get(username)? {
            Some(id_data) => {
                let users = txn.open_table(USERS_TABLE)?;
                match users.get(id_data.value())? {
                    Some(user_data) => {
                        let user: User = serde_json::from_slice(user_data.value())
                            .map_err(|e| StoreError::Decode(e.to_string()))?;
                        Ok(Some(user))
                    }
                    None => Ok(None),
                }
            }
            None => Ok(None),
        }
    }

    // ── Task operations ────────────────────────────────────────

    pub fn create_task(&self, task: &Task) -> Result<(), StoreError> {
        self.put_task(task)
    }

    pub fn update_task(&self, task: &Task) -> Result<(), StoreError> {
        self.put_task(task)
    }

    fn put_task(&self, task: &Task) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            let mut tasks = txn.open_table(TASKS_TABLE)?;
            let bytes = serde_json::to_vec(task).map_err(|e| StoreError::Encode(e.to_string()))?;
            tasks.insert(task.id.as_bytes().as_slice(), bytes.as_slice())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub fn get_task(&self, id: Uuid) -> Result<Option<Task>, StoreError> {
        let txn = self.db.begin_read()?;
        let tasks = txn.open_table(TASKS_TABLE)?;

        match tasks.get(id.as_bytes().as_slice())? {
            Some(data) => {
                let task: Task = serde_json::from_slice(data.value())
                    .map_err(|e| StoreError::Decode(e.to_string()))?;
                Ok(Some(task))
            }
            None => Ok(None),
        }
    }

    /// All tasks belonging to one owner, in creation order. This is the
    /// "server order" the list view renders. Clients never re-sort it.
    pub fn list_tasks(&self, owner: Uuid) -> Result<Vec<Task>, StoreError> {
        let txn = self.db.begin_read()?;
        let tasks_table = txn.open_table(TASKS_TABLE)?;

        let mut tasks = Vec::new();
        for entry in tasks_table.iter()? {
            let (_, value) = entry?;
            let task: Task = serde_json::from_slice(value.value())
                .map_err(|e| StoreError::Decode(e.to_string()))?;
            if task.owner == owner {
                tasks.push(task);
            }
        }

        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(tasks)
    }

    /// Returns true if the task existed and was removed.
    pub fn delete_task(&self, id: Uuid) -> Result<bool, StoreError> {
        let txn = self.db.begin_write()?;
        let deleted;
        {
            let mut tasks = txn.open_table(TASKS_TABLE)?;
            deleted = tasks.remove(id.as_bytes().as_slice())?.is_some();
        }
        txn.commit()?;
        Ok(deleted)
    }

    /// Seed a default admin user if no user exists yet. Returns true if created.
    pub fn ensure_default_user(&self) -> Result<bool, StoreError> {
        if self.get_user_by_username("admin")?.is_some() {
            return Ok(false);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: "admin".to_string(),
            password_hash: crate::auth::hash_password("admin"),
            created_at: Utc::now(),
        };

        self.create_user(&user)?;
        Ok(true)
    }
}

// ── Errors ─────────────────────────────────────────────────────

#[derive(Debug)]
pub enum StoreError {
    Redb(String),
    Decode(String),
    Encode(String),
}

// redb 2.x has many error types. Blanket them all into StoreError::Redb.
macro_rules! from_redb {
    ($($t:ty),*) => {
        $(impl From<$t> for StoreError {
            fn from(e: $t) -> Self { StoreError::Redb(e.to_string()) }
        })*
    };
}

from_redb!(
    redb::Error,
    redb::DatabaseError,
    redb::TableError,
    redb::TransactionError,
    redb::StorageError,
    redb::CommitError
);

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::Redb(e) => write!(f, "redb: {e}"),
            StoreError::Decode(e) => write!(f, "decode: {e}"),
            StoreError::Encode(e) => write!(f, "encode: {e}"),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use std::fs;

    /// Create a temp store that auto-cleans.
    fn temp_db(name: &str) -> (Db, String) {
        let path = format!("/tmp/taskdeck_test_{name}_{}.redb", std::process::id());
        let _ = fs::remove_file(&path); // clean up any leftover
        let db = Db::open(&path).unwrap();
        (db, path)
    }

    fn cleanup(path: &str) {
        let _ = fs::remove_file(path);
    }

    fn task(owner: Uuid, description: &str, age_secs: i64) -> Task {
        let at = Utc::now() - Duration::seconds(age_secs);
        Task {
            id: Uuid::new_v4(),
            owner,
            description: description.to_string(),
            completed: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn create_and_get_task() {
        let (db, path) = temp_db("create_get");

        let owner = Uuid::new_v4();
        let t = task(owner, "buy milk", 0);
        db.create_task(&t).unwrap();

        let loaded = db.get_task(t.id).unwrap().unwrap();
        assert_eq!(loaded.id, t.id);
        assert_eq!(loaded.owner, owner);
        assert_eq!(loaded.description, "buy milk");
        assert!(!loaded.completed);

        cleanup(&path);
    }

    #[test]
    fn get_unknown_task_is_none() {
        let (db, path) = temp_db("get_unknown");
        assert!(db.get_task(Uuid::new_v4()).unwrap().is_none());
        cleanup(&path);
    }

    #[test]
    fn list_tasks_scoped_to_owner() {
        let (db, path) = temp_db("scoped");

        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();
        db.create_task(&task(alice, "hers", 2)).unwrap();
        db.create_task(&task(bob, "his", 1)).unwrap();
        db.create_task(&task(alice, "also hers", 0)).unwrap();

        let hers = db.list_tasks(alice).unwrap();
        assert_eq!(hers.len(), 2);
        assert!(hers.iter().all(|t| t.owner == alice));

        let his = db.list_tasks(bob).unwrap();
        assert_eq!(his.len(), 1);
        assert_eq!(his[0].description, "his");

        cleanup(&path);
    }

    #[test]
    fn list_tasks_in_creation_order() {
        let (db, path) = temp_db("order");

        let owner = Uuid::new_v4();
        // Inserted out of order on purpose. List must come back oldest first.
        db.create_task(&task(owner, "second", 10)).unwrap();
        db.create_task(&task(owner, "third", 5)).unwrap();
        db.create_task(&task(owner, "first", 20)).unwrap();

        let listed = db.list_tasks(owner).unwrap();
        let descriptions: Vec<&str> = listed.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["first", "second", "third"]);

        cleanup(&path);
    }

    #[test]
    fn update_task_overwrites_row() {
        let (db, path) = temp_db("update");

        let owner = Uuid::new_v4();
        let mut t = task(owner, "draft", 0);
        db.create_task(&t).unwrap();

        t.description = "final".to_string();
        t.completed = true;
        t.updated_at = Utc::now();
        db.update_task(&t).unwrap();

        let loaded = db.get_task(t.id).unwrap().unwrap();
        assert_eq!(loaded.description, "final");
        assert!(loaded.completed);
        assert_eq!(db.list_tasks(owner).unwrap().len(), 1);

        cleanup(&path);
    }

    #[test]
    fn delete_task_reports_whether_it_existed() {
        let (db, path) = temp_db("delete");

        let t = task(Uuid::new_v4(), "doomed", 0);
        db.create_task(&t).unwrap();

        assert!(db.delete_task(t.id).unwrap());
        assert!(db.get_task(t.id).unwrap().is_none());
        assert!(!db.delete_task(t.id).unwrap()); // already gone
        assert!(!db.delete_task(Uuid::new_v4()).unwrap()); // never existed

        cleanup(&path);
    }

    #[test]
    fn username_index_finds_user() {
        let (db, path) = temp_db("username");

        let user = User {
            id: Uuid::new_v4(),
            username: "frida".to_string(),
            password_hash: "x".to_string(),
            created_at: Utc::now(),
        };
        db.create_user(&user).unwrap();

        let found = db.get_user_by_username("frida").unwrap().unwrap();
        assert_eq!(found.id, user.id);
        assert!(db.get_user_by_username("nobody").unwrap().is_none());

        cleanup(&path);
    }

    #[test]
    fn seed_default_user_once() {
        let (db, path) = temp_db("seed");

        assert!(db.ensure_default_user().unwrap());
        assert!(!db.ensure_default_user().unwrap()); // second boot is a no-op

        let admin = db.get_user_by_username("admin").unwrap().unwrap();
        assert!(crate::auth::verify_password("admin", &admin.password_hash));

        cleanup(&path);
    }
}

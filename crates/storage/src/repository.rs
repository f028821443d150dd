//! Repository Implementation

use crate::model::{DataPoint, NewDataPoint, User};
use crate::StorageError;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info};

/// Auto-incrementing table of records
struct Table<T> {
    rows: Vec<T>,
    next_id: i64,
}

impl<T> Table<T> {
    fn new() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }

    fn allocate_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// In-memory repository for data points and users
///
/// Records are append-only. Ids start at 1 and increase monotonically per table.
pub struct Repository {
    data_points: Mutex<Table<DataPoint>>,
    users: Mutex<Table<User>>,
}

fn lock<T>(mutex: &Mutex<T>) -> Result<MutexGuard<'_, T>, StorageError> {
    mutex
        .lock()
        .map_err(|e| StorageError::Lock(e.to_string()))
}

impl Repository {
    /// Create a new in-memory repository
    pub fn new() -> Self {
        info!("Creating in-memory repository");
        Self {
            data_points: Mutex::new(Table::new()),
            users: Mutex::new(Table::new()),
        }
    }

    /// Snapshot of every data point in insertion order
    pub fn list_data_points(&self) -> Result<Vec<DataPoint>, StorageError> {
        let table = lock(&self.data_points)?;
        Ok(table.rows.clone())
    }

    /// Persist a data point and return it with its assigned id
    pub fn create_data_point(&self, fields: NewDataPoint) -> Result<DataPoint, StorageError> {
        let mut table = lock(&self.data_points)?;
        let id = table.allocate_id();
        let point = fields.with_id(id);
        table.rows.push(point.clone());
        debug!("Inserted data point with ID {}", id);
        Ok(point)
    }

    /// Persist a batch of data points under a single lock
    pub fn create_data_points(
        &self,
        batch: Vec<NewDataPoint>,
    ) -> Result<Vec<DataPoint>, StorageError> {
        let mut table = lock(&self.data_points)?;
        let mut created = Vec::with_capacity(batch.len());
        for fields in batch {
            let id = table.allocate_id();
            let point = fields.with_id(id);
            table.rows.push(point.clone());
            created.push(point);
        }
        debug!("Inserted {} data points", created.len());
        Ok(created)
    }

    /// Look up a user by id
    pub fn get_user(&self, id: i64) -> Result<Option<User>, StorageError> {
        let table = lock(&self.users)?;
        Ok(table.rows.iter().find(|u| u.id == id).cloned())
    }

    /// Look up a user by exact username
    pub fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let table = lock(&self.users)?;
        Ok(table.rows.iter().find(|u| u.username == username).cloned())
    }

    /// Create a user; usernames must be unique
    pub fn create_user(&self, username: &str, password_hash: String) -> Result<User, StorageError> {
        let mut table = lock(&self.users)?;
        if table.rows.iter().any(|u| u.username == username) {
            return Err(StorageError::Conflict(format!(
                "username '{}' already exists",
                username
            )));
        }

        let user = User {
            id: table.allocate_id(),
            username: username.to_string(),
            password_hash,
        };
        table.rows.push(user.clone());
        info!("Created user {} ({})", user.id, user.username);
        Ok(user)
    }

    /// Get total data point count
    pub fn data_point_count(&self) -> Result<usize, StorageError> {
        Ok(lock(&self.data_points)?.rows.len())
    }

    /// Get total user count
    pub fn user_count(&self) -> Result<usize, StorageError> {
        Ok(lock(&self.users)?.rows.len())
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}

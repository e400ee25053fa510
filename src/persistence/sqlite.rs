use super::{BoardStore, PersistenceResult};
use crate::{BoardMetadata, ReschedulePolicy, Task, TaskBoard};
use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

pub struct SqliteBoardStore {
    connection: Mutex<Connection>,
}

impl SqliteBoardStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            PRAGMA foreign_keys = ON;
            CREATE TABLE IF NOT EXISTS board_metadata (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                metadata_json TEXT NOT NULL,
                policy_json TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY,
                task_json TEXT NOT NULL
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }

    fn save_metadata(
        &self,
        tx: &rusqlite::Transaction,
        metadata: &BoardMetadata,
        policy: &ReschedulePolicy,
    ) -> PersistenceResult<()> {
        let metadata_json = serde_json::to_string(metadata)?;
        let policy_json = serde_json::to_string(policy)?;
        tx.execute("DELETE FROM board_metadata", [])?;
        tx.execute(
            "INSERT INTO board_metadata (id, metadata_json, policy_json) VALUES (1, ?1, ?2)",
            params![metadata_json, policy_json],
        )?;
        Ok(())
    }

    fn save_tasks(&self, tx: &rusqlite::Transaction, board: &TaskBoard) -> PersistenceResult<()> {
        tx.execute("DELETE FROM tasks", [])?;
        let df = board.dataframe();
        let mut stmt = tx.prepare("INSERT INTO tasks (id, task_json) VALUES (?1, ?2)")?;
        for row_idx in 0..df.height() {
            let task = Task::from_dataframe_row(df, row_idx)?;
            let json = serde_json::to_string(&task)?;
            stmt.execute(params![task.id, json])?;
        }
        Ok(())
    }
}

impl BoardStore for SqliteBoardStore {
    fn save_board(&self, board: &TaskBoard) -> PersistenceResult<()> {
        super::validate_board(board)?;
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        self.save_metadata(&tx, board.metadata(), board.policy())?;
        self.save_tasks(&tx, board)?;
        tx.commit()?;
        Ok(())
    }

    fn load_board(&self) -> PersistenceResult<Option<TaskBoard>> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");

        let mut stmt =
            conn.prepare("SELECT metadata_json, policy_json FROM board_metadata WHERE id = 1")?;
        let row_opt: Option<(String, String)> = stmt
            .query_row([], |row| Ok((row.get(0)?, row.get(1)?)))
            .optional()?;

        let Some((metadata_json, policy_json)) = row_opt else {
            return Ok(None);
        };

        let metadata: BoardMetadata = serde_json::from_str(&metadata_json)?;
        let policy: ReschedulePolicy = serde_json::from_str(&policy_json)?;

        let mut stmt = conn.prepare("SELECT task_json FROM tasks ORDER BY id ASC")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut tasks = Vec::new();
        for json in rows {
            let json = json?;
            let task: Task = serde_json::from_str(&json)?;
            tasks.push(task);
        }

        super::validate_tasks(&tasks)?;

        let board = TaskBoard::from_tasks(metadata, policy, tasks)?;
        Ok(Some(board))
    }
}

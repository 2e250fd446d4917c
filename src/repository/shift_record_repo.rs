// ==========================================
// 生产日报 OEE - 班次记录仓储
// ==========================================
// 红线: Repository 不含业务逻辑
// 职责: shift_record 表的写入与按日期降序读取
// 说明: 停机记录以 JSON 数组整体存于 downtime_json 列,随记录一起读写
// ==========================================

use crate::db::{ensure_schema, open_sqlite_connection};
use crate::domain::shift::{DateRangeFilter, DowntimeEntry, ShiftRecord};
use crate::repository::error::{RepositoryError, RepositoryResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Result as SqliteResult, Row};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

const SELECT_COLUMNS: &str = r#"
    SELECT
        record_id, record_date, operator_code, operator_name,
        machine, process, start_time, end_time,
        cart_loads, total_pieces, good_pieces, downtime_json
    FROM shift_record
"#;

const INSERT_SQL: &str = r#"
    INSERT INTO shift_record (
        record_id, record_date, operator_code, operator_name,
        machine, process, start_time, end_time,
        cart_loads, total_pieces, good_pieces, downtime_json
    ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
"#;

// ==========================================
// ShiftRecordRow - 数据库原始行
// ==========================================
struct ShiftRecordRow {
    record_id: String,
    record_date: String,
    operator_code: String,
    operator_name: String,
    machine: Option<String>,
    process: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    cart_loads: Option<i64>,
    total_pieces: Option<i64>,
    good_pieces: Option<i64>,
    downtime_json: String,
}

impl ShiftRecordRow {
    fn from_row(row: &Row<'_>) -> SqliteResult<Self> {
        Ok(Self {
            record_id: row.get(0)?,
            record_date: row.get(1)?,
            operator_code: row.get(2)?,
            operator_name: row.get(3)?,
            machine: row.get(4)?,
            process: row.get(5)?,
            start_time: row.get(6)?,
            end_time: row.get(7)?,
            cart_loads: row.get(8)?,
            total_pieces: row.get(9)?,
            good_pieces: row.get(10)?,
            downtime_json: row.get(11)?,
        })
    }

    fn into_record(self) -> RepositoryResult<ShiftRecord> {
        let date = NaiveDate::parse_from_str(&self.record_date, DATE_FORMAT).map_err(|e| {
            RepositoryError::FieldValueError {
                field: "record_date".to_string(),
                message: format!("{} ({}): {}", self.record_date, self.record_id, e),
            }
        })?;
        let downtime_entries: Vec<DowntimeEntry> = serde_json::from_str(&self.downtime_json)?;

        Ok(ShiftRecord {
            record_id: Some(self.record_id),
            date,
            operator_code: self.operator_code,
            operator_name: self.operator_name,
            machine: self.machine,
            process: self.process,
            start_time: self.start_time,
            end_time: self.end_time,
            cart_loads: self.cart_loads,
            total_pieces: self.total_pieces,
            good_pieces: self.good_pieces,
            downtime_entries,
        })
    }
}

// ==========================================
// ShiftRecordRepository - 班次记录仓储
// ==========================================
pub struct ShiftRecordRepository {
    conn: Arc<Mutex<Connection>>,
}

impl ShiftRecordRepository {
    /// 创建新的仓储实例（自动建表）
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    /// 从已有连接创建仓储实例
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        let repo = Self { conn };
        {
            let conn = repo.get_conn()?;
            ensure_schema(&conn)?;
        }
        Ok(repo)
    }

    fn get_conn(&self) -> RepositoryResult<std::sync::MutexGuard<Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    /// 写入单条班次记录
    ///
    /// # 返回
    /// - Ok(String): 记录ID（记录未带ID时生成 UUID）
    pub fn insert(&self, record: &ShiftRecord) -> RepositoryResult<String> {
        let conn = self.get_conn()?;
        let record_id = insert_record(&conn, record)?;
        debug!(record_id = %record_id, date = %record.date, "班次记录已写入");
        Ok(record_id)
    }

    /// 批量写入（单事务,任一失败全部回滚）
    ///
    /// 用于回放离线缓存的记录
    pub fn insert_batch(&self, records: &[ShiftRecord]) -> RepositoryResult<usize> {
        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        for record in records {
            insert_record(&tx, record)?;
        }

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(count = records.len(), "批量写入班次记录完成");
        Ok(records.len())
    }

    /// 查询全部记录（日期降序,同日按写入顺序降序）
    pub fn list_all(&self) -> RepositoryResult<Vec<ShiftRecord>> {
        self.list_by_date_range(&DateRangeFilter::all())
    }

    /// 按日期范围查询（闭区间,缺省边界不限）
    pub fn list_by_date_range(&self, filter: &DateRangeFilter) -> RepositoryResult<Vec<ShiftRecord>> {
        let conn = self.get_conn()?;
        let start = filter.start.map(|d| d.format(DATE_FORMAT).to_string());
        let end = filter.end.map(|d| d.format(DATE_FORMAT).to_string());

        let sql = format!(
            r#"{}
            WHERE (?1 IS NULL OR record_date >= ?1)
              AND (?2 IS NULL OR record_date <= ?2)
            ORDER BY record_date DESC, rowid DESC
            "#,
            SELECT_COLUMNS
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(params![start, end], ShiftRecordRow::from_row)?
            .collect::<SqliteResult<Vec<ShiftRecordRow>>>()?;

        rows.into_iter().map(ShiftRecordRow::into_record).collect()
    }

    /// 按ID查询
    pub fn find_by_id(&self, record_id: &str) -> RepositoryResult<Option<ShiftRecord>> {
        let conn = self.get_conn()?;
        let sql = format!("{} WHERE record_id = ?1", SELECT_COLUMNS);

        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt
            .query_map(params![record_id], ShiftRecordRow::from_row)?
            .collect::<SqliteResult<Vec<ShiftRecordRow>>>()?;

        rows.pop().map(ShiftRecordRow::into_record).transpose()
    }

    /// 记录总数
    pub fn count(&self) -> RepositoryResult<i64> {
        let conn = self.get_conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM shift_record", [], |row| row.get(0))?;
        Ok(count)
    }
}

/// 写入一条记录（连接或事务均可）
fn insert_record(conn: &Connection, record: &ShiftRecord) -> RepositoryResult<String> {
    let record_id = record
        .record_id
        .clone()
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    let downtime_json = serde_json::to_string(&record.downtime_entries)?;

    conn.execute(
        INSERT_SQL,
        params![
            record_id,
            record.date.format(DATE_FORMAT).to_string(),
            record.operator_code,
            record.operator_name,
            record.machine,
            record.process,
            record.start_time,
            record.end_time,
            record.cart_loads,
            record.total_pieces,
            record.good_pieces,
            downtime_json,
        ],
    )?;

    Ok(record_id)
}

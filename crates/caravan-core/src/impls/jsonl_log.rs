//! JsonlMissionLog - ファイルに追記する mission log
//!
//! 1 行 1 エントリの JSON Lines 形式:
//!
//! ```text
//! {"id":"01J...","mover_id":"01J...","action":"loading","timestamp":"2024-01-01T12:00:00Z"}
//! ```
//!
//! ファイル I/O は blocking なので `spawn_blocking` で実行します。
//!
//! 改行で終わっていない末尾行は書き込み途中のものとして扱います。読み取りでは無視し、
//! 次の追記の前に切り詰めます。追記が失敗した場合はファイルを追記前の長さに戻します。

use std::fs;
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::warn;

use crate::domain::{LogEntryId, LogFilter, MissionLogEntry, NewLogEntry, StoreError};
use crate::ports::{IdGenerator, MissionLog, UlidGenerator};

pub struct JsonlMissionLog {
    path: Arc<PathBuf>,
    /// Serializes appends so lines never interleave.
    write_lock: Arc<Mutex<()>>,
    ids: Arc<dyn IdGenerator>,
}

impl JsonlMissionLog {
    /// Opens (or creates) the log at `path`. Parent directories are created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Self::open_with_id_generator(path, UlidGenerator::shared())
    }

    pub fn open_with_id_generator(
        path: impl Into<PathBuf>,
        ids: Arc<dyn IdGenerator>,
    ) -> Result<Self, StoreError> {
        let path = path.into();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path: Arc::new(path),
            write_lock: Arc::new(Mutex::new(())),
            ids,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn append_line(path: &Path, entry: &MissionLogEntry) -> Result<(), StoreError> {
    let mut line = serde_json::to_string(entry)?;
    line.push('\n');
    let mut file = fs::OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;
    let start = trim_partial_tail(&mut file)?;

    let written = {
        let mut writer = BufWriter::with_capacity(line.len(), &file);
        writer.write_all(line.as_bytes()).and_then(|()| writer.flush())
    };
    if let Err(e) = written {
        if let Err(undo) = file.set_len(start) {
            warn!(path = %path.display(), error = %undo, "failed to truncate after a failed append");
        }
        return Err(e.into());
    }
    Ok(())
}

/// Cuts an unterminated last line. Returns the resulting file length.
fn trim_partial_tail(file: &mut fs::File) -> io::Result<u64> {
    let len = file.metadata()?.len();
    if len == 0 {
        return Ok(0);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    if last[0] == b'\n' {
        return Ok(len);
    }

    let mut contents = Vec::new();
    file.seek(SeekFrom::Start(0))?;
    file.read_to_end(&mut contents)?;
    let keep = contents
        .iter()
        .rposition(|b| *b == b'\n')
        .map_or(0, |i| i as u64 + 1);
    warn!(dropped_bytes = len - keep, "truncating unterminated mission log line");
    file.set_len(keep)?;
    Ok(keep)
}

fn read_entries(path: &Path) -> Result<Vec<MissionLogEntry>, StoreError> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };
    let mut entries = Vec::new();
    for line in contents.split_inclusive('\n') {
        let Some(line) = line.strip_suffix('\n') else {
            // 書き込み途中の末尾行
            continue;
        };
        if !line.trim().is_empty() {
            entries.push(serde_json::from_str(line)?);
        }
    }
    Ok(entries)
}

fn join_error(e: tokio::task::JoinError) -> StoreError {
    StoreError::Unavailable(format!("mission log worker failed: {e}"))
}

#[async_trait]
impl MissionLog for JsonlMissionLog {
    async fn append(&self, entry: NewLogEntry) -> Result<MissionLogEntry, StoreError> {
        let entry = entry.into_entry(self.ids.generate_log_entry_id());
        let path = Arc::clone(&self.path);
        let lock = Arc::clone(&self.write_lock);
        let written = entry.clone();

        tokio::task::spawn_blocking(move || {
            let _guard = lock
                .lock()
                .map_err(|_| StoreError::Unavailable("mission log lock poisoned".into()))?;
            append_line(&path, &written)
        })
        .await
        .map_err(join_error)??;

        Ok(entry)
    }

    async fn get(&self, id: LogEntryId) -> Result<Option<MissionLogEntry>, StoreError> {
        let entries = self.list(&LogFilter::default()).await?;
        Ok(entries.into_iter().find(|e| e.id == id))
    }

    async fn list(&self, filter: &LogFilter) -> Result<Vec<MissionLogEntry>, StoreError> {
        let path = Arc::clone(&self.path);
        let entries = tokio::task::spawn_blocking(move || read_entries(&path))
            .await
            .map_err(join_error)??;
        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MissionAction, MoverId};
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;
    use ulid::Ulid;

    fn entry(mover_id: MoverId, action: MissionAction) -> NewLogEntry {
        NewLogEntry {
            mover_id,
            action,
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn appended_entries_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("logs").join("missions.jsonl");
        let mover = MoverId::from_ulid(Ulid::new());

        let log = JsonlMissionLog::open(&path).unwrap();
        let first = log.append(entry(mover, MissionAction::Resting)).await.unwrap();
        log.append(entry(mover, MissionAction::Loading)).await.unwrap();
        drop(log);

        let reopened = JsonlMissionLog::open(&path).unwrap();
        let entries = reopened.list(&LogFilter::for_mover(mover)).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], first);
        assert_eq!(entries[1].action, MissionAction::Loading);
        assert_eq!(reopened.get(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn one_line_per_entry() {
        let dir = TempDir::new().unwrap();
        let log = JsonlMissionLog::open(dir.path().join("missions.jsonl")).unwrap();
        let mover = MoverId::from_ulid(Ulid::new());

        log.append(entry(mover, MissionAction::Resting)).await.unwrap();
        log.append(entry(mover, MissionAction::Loading)).await.unwrap();

        let raw = fs::read_to_string(log.path()).unwrap();
        assert_eq!(raw.lines().count(), 2);
        assert!(raw.lines().nth(1).unwrap().contains("\"action\":\"loading\""));
    }

    #[tokio::test]
    async fn unterminated_tail_is_ignored_then_replaced() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missions.jsonl");
        let mover = MoverId::from_ulid(Ulid::new());

        let log = JsonlMissionLog::open(&path).unwrap();
        log.append(entry(mover, MissionAction::Resting)).await.unwrap();
        let mut file = fs::OpenOptions::new().append(true).open(&path).unwrap();
        file.write_all(b"{\"id\":\"01J").unwrap();
        drop(file);

        assert_eq!(log.list(&LogFilter::default()).await.unwrap().len(), 1);

        log.append(entry(mover, MissionAction::Loading)).await.unwrap();
        let actions: Vec<MissionAction> = log
            .list(&LogFilter::for_mover(mover))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect();
        assert_eq!(actions, vec![MissionAction::Resting, MissionAction::Loading]);

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.ends_with('\n'));
        assert_eq!(raw.lines().count(), 2);
    }

    #[tokio::test]
    async fn corrupt_line_is_a_storage_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missions.jsonl");
        fs::write(&path, "not json\n").unwrap();

        let log = JsonlMissionLog::open(&path).unwrap();
        let err = log.list(&LogFilter::default()).await.unwrap_err();

        assert!(matches!(err, StoreError::Json(_)));
    }
}

//! 覆盖数据存储 - 业务能力层
//!
//! 只负责读写本地持久化的覆盖数据，不含业务逻辑。
//! 读取永不报错：缺失、空串、无法解析、非对象结构都视为空数据。

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use serde_json::Value;
use tracing::{debug, error, warn};

use crate::error::StorageError;
use crate::models::OverridePayload;

/// 覆盖数据在存储中的固定键
pub const OVERRIDE_STORAGE_KEY: &str = "wild_drafter.customChampions";

/// 客户端键值存储
pub trait KeyValueStore: Send + Sync {
    /// 读取原始内容，不存在返回 None
    fn get(&self, key: &str) -> Option<String>;

    /// 整体覆盖写入
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// 基于文件的键值存储，每个键一个文件
///
/// 写入时先写临时文件并 fsync，再 rename 覆盖目标文件
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn write_atomic(path: &Path, value: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp_path = path.with_extension("json.tmp");
        {
            let mut file = File::create(&tmp_path)?;
            file.write_all(value.as_bytes())?;
            file.sync_all()?;
        }
        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
        Ok(())
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!("读取 {} 失败: {}", path.display(), e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let path = self.path_for(key);
        Self::write_atomic(&path, value).map_err(|source| StorageError::WriteFailed {
            path: path.display().to_string(),
            source,
        })
    }
}

/// 内存键值存储，可设置字节配额
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: Mutex<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            quota: Some(quota),
        }
    }

    /// 直接写入原始内容（不检查配额）
    pub fn insert_raw(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if let Some(quota) = self.quota {
            if value.len() > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: value.len(),
                    quota,
                });
            }
        }
        self.insert_raw(key, value);
        Ok(())
    }
}

/// 覆盖数据存储
///
/// 内存中始终保留最近一次 `save` 的数据，即使持久化失败也不会丢失
pub struct OverrideStore {
    backend: Box<dyn KeyValueStore>,
    current: RwLock<OverridePayload>,
    /// 最近一次保存未能写入持久化存储
    unpersisted: AtomicBool,
}

impl OverrideStore {
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self {
            backend: Box::new(backend),
            current: RwLock::new(OverridePayload::new()),
            unpersisted: AtomicBool::new(false),
        }
    }

    /// 读取持久化的覆盖数据并刷新内存副本
    ///
    /// 上次保存失败时，内存副本比磁盘新，直接返回内存副本
    pub fn load(&self) -> OverridePayload {
        if self.has_unpersisted_changes() {
            warn!("⚠️ 存在未持久化的覆盖数据，沿用内存副本");
            return self.current();
        }
        let payload = match self.backend.get(OVERRIDE_STORAGE_KEY) {
            Some(raw) => parse_payload(&raw),
            None => {
                debug!("没有本地覆盖数据");
                OverridePayload::new()
            }
        };
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = payload.clone();
        payload
    }

    /// 整体覆盖保存
    ///
    /// 先更新内存副本，再写入持久化存储；写入失败时返回错误，内存副本保留
    pub fn save(&self, payload: &OverridePayload) -> Result<(), StorageError> {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = payload.clone();

        self.unpersisted.store(true, Ordering::SeqCst);

        let blob = serde_json::to_string(payload)?;
        self.backend
            .set(OVERRIDE_STORAGE_KEY, &blob)
            .inspect_err(|e| error!("❌ 覆盖数据保存失败: {}", e))?;

        self.unpersisted.store(false, Ordering::SeqCst);
        debug!("覆盖数据已保存: {} 个英雄", payload.len());
        Ok(())
    }

    pub fn has_unpersisted_changes(&self) -> bool {
        self.unpersisted.load(Ordering::SeqCst)
    }

    /// 当前内存中的覆盖数据快照
    pub fn current(&self) -> OverridePayload {
        self.current.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

fn parse_payload(raw: &str) -> OverridePayload {
    if raw.trim().is_empty() {
        return OverridePayload::new();
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value @ Value::Object(_)) => {
            serde_json::from_value(value).unwrap_or_else(|e| {
                warn!("⚠️ 覆盖数据结构异常，按空数据处理: {}", e);
                OverridePayload::new()
            })
        }
        Ok(_) => {
            warn!("⚠️ 覆盖数据不是对象，按空数据处理");
            OverridePayload::new()
        }
        Err(e) => {
            warn!("⚠️ 覆盖数据无法解析，按空数据处理: {}", e);
            OverridePayload::new()
        }
    }
}

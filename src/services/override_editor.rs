//! 覆盖数据编辑
//!
//! 在工作副本上增删英雄，显式保存时整体写回 `OverrideStore`。
//! 校验失败时不修改任何状态。

use tracing::{info, warn};

use crate::clients::{ProposalReceipt, ScoringApi};
use crate::error::{AppResult, StorageError, ValidationError};
use crate::models::{ChampionAttributes, OverridePayload, ATTRIBUTE_KEYS};
use crate::services::icon_resolver::IconResolver;
use crate::services::override_store::OverrideStore;

/// 新增英雄时的图标选择
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconChoice {
    /// 使用默认占位图标
    Placeholder,
    /// 使用指定地址，空白时按 `Auto` 处理
    Url(String),
    /// 按英雄名推导
    Auto,
}

pub struct OverrideEditor {
    champions: OverridePayload,
    icons: IconResolver,
    unsaved: bool,
}

impl OverrideEditor {
    /// 有本地数据时编辑本地数据，否则从官方数据开始
    pub fn open(store: &OverrideStore, official: &OverridePayload, icons: IconResolver) -> Self {
        let local = store.current();
        let champions = if local.is_empty() {
            official.clone()
        } else {
            local
        };
        Self {
            champions,
            icons,
            unsaved: false,
        }
    }

    /// 同 `open`，本地没有数据时向服务端拉取官方数据
    pub async fn open_from_service(
        api: &dyn ScoringApi,
        store: &OverrideStore,
        icons: IconResolver,
    ) -> AppResult<Self> {
        if !store.current().is_empty() {
            return Ok(Self::open(store, &OverridePayload::new(), icons));
        }
        let official = api
            .fetch_champions()
            .await
            .inspect_err(|e| warn!("⚠️ 官方英雄数据拉取失败: {}", e))?;
        info!("✓ 官方英雄数据: {} 个", official.len());
        Ok(Self::open(store, &official, icons))
    }

    pub fn champions(&self) -> &OverridePayload {
        &self.champions
    }

    /// 按名称排序
    pub fn champion_names(&self) -> Vec<&str> {
        self.champions.names().collect()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn add_champion(
        &mut self,
        name: &str,
        flags: &[(&str, bool)],
        icon: IconChoice,
    ) -> Result<(), ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyChampionName);
        }
        if self.champions.contains(name) {
            return Err(ValidationError::DuplicateChampion {
                name: name.to_string(),
            });
        }

        // 所有可识别的标记都写上，未勾选的为 false
        let mut attributes = ChampionAttributes::new();
        for key in ATTRIBUTE_KEYS {
            attributes.set_flag(key, false);
        }
        for (key, value) in flags {
            attributes.set_flag(*key, *value);
        }
        attributes.icon = Some(match icon {
            IconChoice::Placeholder => self.icons.default_icon().to_string(),
            IconChoice::Url(url) if !url.trim().is_empty() => url.trim().to_string(),
            IconChoice::Url(_) | IconChoice::Auto => self.icons.resolve(name, ""),
        });

        self.champions.insert(name, attributes);
        self.unsaved = true;
        Ok(())
    }

    pub fn remove_champion(&mut self, name: &str) -> bool {
        let removed = self.champions.remove(name).is_some();
        if removed {
            self.unsaved = true;
        }
        removed
    }

    /// 丢弃本地修改，恢复官方数据
    pub fn restore_defaults(&mut self, official: &OverridePayload) {
        self.champions = official.clone();
        self.unsaved = true;
    }

    /// 从服务端拉取官方数据并恢复；拉取失败时工作副本不变
    pub async fn restore_from_service(&mut self, api: &dyn ScoringApi) -> AppResult<()> {
        let official = api.fetch_champions().await?;
        self.restore_defaults(&official);
        Ok(())
    }

    /// 写回存储；失败时保留未保存标记
    pub fn save(&mut self, store: &OverrideStore) -> Result<(), StorageError> {
        store.save(&self.champions)?;
        self.unsaved = false;
        info!("✓ 本地英雄数据已保存: {} 个", self.champions.len());
        Ok(())
    }

    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.champions)
    }

    /// 把工作副本作为提案提交给服务端审核
    pub async fn propose(&self, api: &dyn ScoringApi) -> AppResult<ProposalReceipt> {
        let receipt = api
            .submit_proposal(&self.champions)
            .await
            .inspect_err(|e| warn!("⚠️ 提案提交失败: {}", e))?;
        info!("📨 提案已提交: {:?}", receipt.proposal);
        Ok(receipt)
    }
}

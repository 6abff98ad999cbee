// ==========================================
// 仓储作业管理系统 - 物料解析器
// ==========================================
// 兜底顺序: 映射表整码 -> 映射表前缀码 -> 目录提取码 -> 目录原始码 -> 无
// 红线1: 首个命中即返回，不跨策略合并
// 红线2: 远端查询失败只降级为“该步未命中”，绝不向调用方抛出
// ==========================================

use crate::domain::material::{MaterialMapping, MaterialRecord};
use crate::domain::types::ResolutionSource;
use crate::engine::catalog::MaterialCatalog;
use crate::engine::code_extractor::extract_material_code;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, warn};

// ==========================================
// MappingLookup Trait - 条码映射点查
// ==========================================
// 用途: 解析器对映射存储的唯一依赖（键等值点查，至多一行）
// 实现者: MaterialMappingRepository（生产）、测试桩
#[async_trait]
pub trait MappingLookup: Send + Sync {
    /// 按条码等值查询映射行
    async fn find_by_barcode(&self, barcode: &str) -> RepositoryResult<Option<MaterialMapping>>;
}

// ==========================================
// MaterialResolver - 物料解析器
// ==========================================
/// 物料解析器
///
/// 职责: 将原始条码解析为尽可能具体的 MaterialRecord
/// 纯读路径: 不写映射表（人工补录由 API 层单独落库）
pub struct MaterialResolver {
    mapping_store: Arc<dyn MappingLookup>,
    catalog: Arc<MaterialCatalog>,
    remote_timeout: Duration,
}

impl MaterialResolver {
    /// 创建解析器
    ///
    /// # 参数
    /// - mapping_store: 条码映射存储（远端协作方）
    /// - catalog: 静态物料目录
    /// - remote_timeout: 单次远端查询的超时上限（超时视同未命中）
    pub fn new(
        mapping_store: Arc<dyn MappingLookup>,
        catalog: Arc<MaterialCatalog>,
        remote_timeout: Duration,
    ) -> Self {
        Self {
            mapping_store,
            catalog,
            remote_timeout,
        }
    }

    /// 解析条码
    ///
    /// # 返回
    /// - Some(MaterialRecord): 某一兜底层级命中
    /// - None: 全部未命中（合法结果，由上层引导人工补录）
    pub async fn resolve(&self, raw_barcode: &str) -> Option<MaterialRecord> {
        let trimmed = raw_barcode.trim();
        if trimmed.is_empty() {
            return None;
        }

        // 1) 映射表整码精确命中
        if let Some(mapping) = self.remote_lookup(trimmed, "整码").await {
            debug!(barcode = trimmed, "物料解析: 映射表整码命中");
            return Some(mapping.into_record(ResolutionSource::RemoteExact));
        }

        let extracted = extract_material_code(trimmed);
        let real_extraction = extracted != trimmed;

        // 2) 映射表前缀码命中（仅在发生了真实提取时尝试）
        if real_extraction {
            if let Some(mapping) = self.remote_lookup(&extracted, "前缀码").await {
                debug!(barcode = trimmed, code = %extracted, "物料解析: 映射表前缀码命中");
                return Some(mapping.into_record(ResolutionSource::RemotePrefix));
            }
        }

        // 3) 静态目录按提取码命中
        if let Some(entry) = self.catalog.lookup(&extracted) {
            debug!(barcode = trimmed, code = %extracted, "物料解析: 目录提取码命中");
            return Some(MaterialRecord {
                barcode: trimmed.to_string(),
                material_code: extracted.clone(),
                material_description: entry.model.clone(),
                category: entry.category.clone(),
                source: ResolutionSource::CatalogExtracted,
            });
        }

        // 4) 静态目录按原始条码命中
        if let Some(entry) = self.catalog.lookup(trimmed) {
            debug!(barcode = trimmed, "物料解析: 目录原始码命中");
            return Some(MaterialRecord {
                barcode: trimmed.to_string(),
                material_code: trimmed.to_string(),
                material_description: entry.model.clone(),
                category: entry.category.clone(),
                source: ResolutionSource::CatalogRaw,
            });
        }

        // 5) 无命中
        debug!(barcode = trimmed, "物料解析: 全部兜底未命中");
        None
    }

    /// 带超时的远端点查；任何错误/超时降级为未命中
    async fn remote_lookup(&self, key: &str, step: &str) -> Option<MaterialMapping> {
        match timeout(self.remote_timeout, self.mapping_store.find_by_barcode(key)).await {
            Ok(Ok(found)) => found,
            Ok(Err(e)) => {
                warn!(key, step, error = %e, "映射表查询失败，降级为未命中");
                None
            }
            Err(_) => {
                warn!(
                    key,
                    step,
                    timeout_ms = self.remote_timeout.as_millis() as u64,
                    "映射表查询超时，降级为未命中"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::error::RepositoryError;
    use chrono::Utc;
    use std::collections::HashMap;

    /// 测试桩: 内存映射表，可切换为“查询即失败”
    struct StubMappingStore {
        rows: HashMap<String, MaterialMapping>,
        fail: bool,
    }

    impl StubMappingStore {
        fn empty() -> Self {
            Self {
                rows: HashMap::new(),
                fail: false,
            }
        }

        fn failing() -> Self {
            Self {
                rows: HashMap::new(),
                fail: true,
            }
        }

        fn with(mut self, barcode: &str, code: &str, description: &str) -> Self {
            let now = Utc::now();
            self.rows.insert(
                barcode.to_string(),
                MaterialMapping {
                    barcode: barcode.to_string(),
                    material_code: code.to_string(),
                    material_description: description.to_string(),
                    category: String::new(),
                    created_at: now,
                    updated_at: now,
                },
            );
            self
        }
    }

    #[async_trait]
    impl MappingLookup for StubMappingStore {
        async fn find_by_barcode(
            &self,
            barcode: &str,
        ) -> RepositoryResult<Option<MaterialMapping>> {
            if self.fail {
                return Err(RepositoryError::DatabaseConnectionError(
                    "连接被拒绝".to_string(),
                ));
            }
            Ok(self.rows.get(barcode).cloned())
        }
    }

    fn resolver(store: StubMappingStore, catalog: MaterialCatalog) -> MaterialResolver {
        MaterialResolver::new(
            Arc::new(store),
            Arc::new(catalog),
            Duration::from_millis(200),
        )
    }

    #[tokio::test]
    async fn test_整码命中优先于目录() {
        // 映射表与目录同时可命中时，整码命中必须胜出
        let store = StubMappingStore::empty().with("ABC12345-9001", "MAPPED", "映射表描述");
        let mut catalog = MaterialCatalog::new();
        catalog.insert("ABC12345", "目录描述", "包装容器");

        let record = resolver(store, catalog)
            .resolve("ABC12345-9001")
            .await
            .expect("应命中");

        assert_eq!(record.source, ResolutionSource::RemoteExact);
        assert_eq!(record.material_code, "MAPPED");
        assert_eq!(record.material_description, "映射表描述");
    }

    #[tokio::test]
    async fn test_前缀码命中() {
        // 整码无行，提取码 ABC12345 有行
        let store = StubMappingStore::empty().with("ABC12345", "ABC12345", "前缀映射描述");

        let record = resolver(store, MaterialCatalog::new())
            .resolve("ABC12345-9001")
            .await
            .expect("应命中");

        assert_eq!(record.source, ResolutionSource::RemotePrefix);
        assert_eq!(record.barcode, "ABC12345");
    }

    #[tokio::test]
    async fn test_未发生提取时不查前缀码() {
        // "ab12" 走恒等兜底，前缀步被跳过；目录原始码兜底命中
        let store = StubMappingStore::empty();
        let mut catalog = MaterialCatalog::new();
        catalog.insert("ab12", "散件筐", "容器");

        let record = resolver(store, catalog)
            .resolve("ab12")
            .await
            .expect("应命中");

        // 提取码与原始码相同，目录在第 3 步即命中
        assert_eq!(record.source, ResolutionSource::CatalogExtracted);
        assert_eq!(record.material_code, "ab12");
        assert_eq!(record.material_description, "散件筐");
    }

    #[tokio::test]
    async fn test_目录提取码命中() {
        let mut catalog = MaterialCatalog::new();
        catalog.insert("ABC12345", "托盘箱", "包装容器");

        let record = resolver(StubMappingStore::empty(), catalog)
            .resolve("ABC12345-9001")
            .await
            .expect("应命中");

        assert_eq!(record.source, ResolutionSource::CatalogExtracted);
        assert_eq!(record.barcode, "ABC12345-9001");
        assert_eq!(record.material_code, "ABC12345");
        assert_eq!(record.material_description, "托盘箱");
        assert_eq!(record.category, "包装容器");
    }

    #[tokio::test]
    async fn test_全部未命中返回None() {
        let record = resolver(StubMappingStore::empty(), MaterialCatalog::new())
            .resolve("UNKNOWN-000")
            .await;
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_空白输入返回None() {
        let record = resolver(StubMappingStore::empty(), MaterialCatalog::new())
            .resolve("   ")
            .await;
        assert!(record.is_none());
    }

    #[tokio::test]
    async fn test_远端失败降级为目录兜底() {
        // 两次远端查询全部报错，仍应拿到目录结果
        let mut catalog = MaterialCatalog::new();
        catalog.insert("ABC12345", "托盘箱", "包装容器");

        let record = resolver(StubMappingStore::failing(), catalog)
            .resolve("ABC12345-9001")
            .await
            .expect("远端失败不应阻断目录兜底");

        assert_eq!(record.source, ResolutionSource::CatalogExtracted);
    }

    #[tokio::test]
    async fn test_远端失败且目录无命中返回None() {
        let record = resolver(StubMappingStore::failing(), MaterialCatalog::new())
            .resolve("ABC12345-9001")
            .await;
        assert!(record.is_none());
    }
}

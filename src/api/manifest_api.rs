// ==========================================
// 仓储作业管理系统 - 行程单 API
// ==========================================
// 职责: 行程单生命周期管理与单据行编辑
// ==========================================

use std::sync::Arc;
use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::manifest::TripManifest;
use crate::domain::types::ManifestStatus;
use crate::repository::manifest_repo::TripManifestRepository;

// ==========================================
// ManifestApi - 行程单 API
// ==========================================

/// 行程单API
///
/// 职责：
/// 1. 行程单创建/查询/列表
/// 2. 单据行增删（编号不变式由领域方法维护）
/// 3. 提交流转
pub struct ManifestApi {
    manifest_repo: Arc<TripManifestRepository>,
}

impl ManifestApi {
    /// 创建新的ManifestApi实例
    pub fn new(manifest_repo: Arc<TripManifestRepository>) -> Self {
        Self { manifest_repo }
    }

    /// 创建草稿行程单
    pub fn create_manifest(
        &self,
        driver_name: &str,
        plate_number: &str,
        destination: &str,
    ) -> ApiResult<TripManifest> {
        if driver_name.trim().is_empty() {
            return Err(ApiError::InvalidInput("司机姓名不能为空".to_string()));
        }
        if plate_number.trim().is_empty() {
            return Err(ApiError::InvalidInput("车牌号不能为空".to_string()));
        }

        let manifest = TripManifest::new_draft(driver_name, plate_number, destination);
        self.manifest_repo.save(&manifest)?;
        info!(manifest_id = %manifest.manifest_id, "创建行程单草稿");
        Ok(manifest)
    }

    /// 按 ID 查询完整行程单
    pub fn get_manifest(&self, manifest_id: &str) -> ApiResult<TripManifest> {
        self.load(manifest_id)
    }

    /// 列表查询（带分页）
    pub fn list_manifests(&self, limit: i32, offset: i32) -> ApiResult<Vec<TripManifest>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput("limit 必须为正数".to_string()));
        }
        let manifests = self.manifest_repo.list_all(limit, offset.max(0))?;
        Ok(manifests)
    }

    /// 追加单据行
    pub fn add_document(
        &self,
        manifest_id: &str,
        document_no: &str,
        description: &str,
    ) -> ApiResult<TripManifest> {
        if document_no.trim().is_empty() {
            return Err(ApiError::InvalidInput("单据号不能为空".to_string()));
        }

        let manifest = self.load(manifest_id)?;
        self.ensure_draft(&manifest)?;

        let next = manifest.with_document(document_no, description);
        self.manifest_repo.save(&next)?;
        Ok(next)
    }

    /// 删除单据行（删除后整体重排序号）
    pub fn remove_document(&self, manifest_id: &str, index: usize) -> ApiResult<TripManifest> {
        let manifest = self.load(manifest_id)?;
        self.ensure_draft(&manifest)?;

        let next = manifest.without_document(index).ok_or_else(|| {
            ApiError::InvalidInput(format!(
                "单据行下标越界: index={}, len={}",
                index,
                manifest.items.len()
            ))
        })?;
        self.manifest_repo.save(&next)?;
        Ok(next)
    }

    /// 提交行程单（DRAFT -> SUBMITTED）
    ///
    /// # 守卫
    /// 至少一条单据行
    pub fn submit_manifest(&self, manifest_id: &str) -> ApiResult<TripManifest> {
        let mut manifest = self.load(manifest_id)?;
        self.ensure_draft(&manifest)?;

        if manifest.items.is_empty() {
            return Err(ApiError::StepNotReady {
                reason: "行程单没有任何单据行".to_string(),
            });
        }

        manifest.status = ManifestStatus::Submitted;
        manifest.updated_at = chrono::Utc::now();
        self.manifest_repo.save(&manifest)?;
        info!(manifest_id = %manifest.manifest_id, "行程单已提交");
        Ok(manifest)
    }

    fn load(&self, manifest_id: &str) -> ApiResult<TripManifest> {
        self.manifest_repo
            .find_by_id(manifest_id)?
            .ok_or_else(|| ApiError::NotFound(format!("行程单(id={})不存在", manifest_id)))
    }

    fn ensure_draft(&self, manifest: &TripManifest) -> ApiResult<()> {
        if manifest.status != ManifestStatus::Draft {
            return Err(ApiError::InvalidStateTransition {
                from: manifest.status.to_string(),
                to: ManifestStatus::Draft.to_string(),
            });
        }
        Ok(())
    }
}

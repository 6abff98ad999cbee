// ==========================================
// 仓储作业管理系统 - 物料 API
// ==========================================
// 职责: 条码解析、映射人工补录与维护
// 红线: 解析路径只读；补录是独立的写操作
// ==========================================

use std::sync::Arc;
use tracing::{debug, info};

use crate::api::error::{ApiError, ApiResult};
use crate::domain::material::{MaterialMapping, MaterialRecord};
use crate::engine::resolver::MaterialResolver;
use crate::repository::mapping_repo::MaterialMappingRepository;
use chrono::Utc;

// ==========================================
// MaterialApi - 物料 API
// ==========================================

/// 物料API
///
/// 职责：
/// 1. 条码解析（兜底链，见引擎层）
/// 2. 未解析条码的人工补录落库
/// 3. 映射维护页查询
pub struct MaterialApi {
    mapping_repo: Arc<MaterialMappingRepository>,
    resolver: Arc<MaterialResolver>,
}

impl MaterialApi {
    /// 创建新的MaterialApi实例
    ///
    /// # 参数
    /// - mapping_repo: 条码映射仓储
    /// - resolver: 物料解析器
    pub fn new(
        mapping_repo: Arc<MaterialMappingRepository>,
        resolver: Arc<MaterialResolver>,
    ) -> Self {
        Self {
            mapping_repo,
            resolver,
        }
    }

    /// 解析条码
    ///
    /// # 返回
    /// - Ok(Some(MaterialRecord)): 某一兜底层级命中
    /// - Ok(None): 全部未命中（合法结果，前端引导人工补录）
    /// - Err(ApiError::InvalidInput): 条码为空白
    ///
    /// # 说明
    /// 远端映射表故障只会降低解析质量（回落静态目录），不会以错误形式上抛
    pub async fn resolve_barcode(&self, raw_barcode: &str) -> ApiResult<Option<MaterialRecord>> {
        if raw_barcode.trim().is_empty() {
            return Err(ApiError::InvalidInput("条码不能为空".to_string()));
        }

        let record = self.resolver.resolve(raw_barcode).await;
        debug!(
            barcode = raw_barcode.trim(),
            resolved = record.is_some(),
            "条码解析完成"
        );
        Ok(record)
    }

    /// 人工补录一条条码映射（解析未命中后，用户补充描述）
    ///
    /// # 参数
    /// - barcode: 原始扫描条码（原样保存）
    /// - material_code: 物料码
    /// - material_description: 物料描述（必填）
    /// - category: 分类（可为空）
    pub fn save_mapping(
        &self,
        barcode: &str,
        material_code: &str,
        material_description: &str,
        category: &str,
    ) -> ApiResult<MaterialMapping> {
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(ApiError::InvalidInput("条码不能为空".to_string()));
        }
        if material_description.trim().is_empty() {
            return Err(ApiError::InvalidInput("物料描述不能为空".to_string()));
        }

        let code = if material_code.trim().is_empty() {
            // 物料码缺省时按提取规则派生
            crate::engine::code_extractor::extract_material_code(barcode)
        } else {
            material_code.trim().to_string()
        };

        let now = Utc::now();
        let mapping = MaterialMapping {
            barcode: barcode.to_string(),
            material_code: code,
            material_description: material_description.trim().to_string(),
            category: category.trim().to_string(),
            created_at: now,
            updated_at: now,
        };

        self.mapping_repo.upsert_mapping(&mapping)?;
        info!(barcode = %mapping.barcode, code = %mapping.material_code, "人工补录条码映射");
        Ok(mapping)
    }

    /// 映射维护页列表查询
    ///
    /// # 参数
    /// - limit: 返回记录数上限
    /// - offset: 偏移量（分页）
    pub fn list_mappings(&self, limit: i32, offset: i32) -> ApiResult<Vec<MaterialMapping>> {
        if limit <= 0 {
            return Err(ApiError::InvalidInput("limit 必须为正数".to_string()));
        }
        let mappings = self.mapping_repo.list_mappings(limit, offset.max(0))?;
        Ok(mappings)
    }
}

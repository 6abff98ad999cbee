// ==========================================
// 仓储作业管理系统 - 物料码提取器
// ==========================================
// 规则: 条码开头连续 8-12 位大写字母/数字为候选物料码
// 红线: 全函数，任何输入都不失败
// ==========================================

/// 物料码最小长度
pub const MIN_CODE_LEN: usize = 8;

/// 物料码最大长度（超出部分不计入候选码）
pub const MAX_CODE_LEN: usize = 12;

/// 从条码提取候选物料码
///
/// # 规则
/// - 取开头连续的大写 ASCII 字母/数字（贪婪，至多 12 位）
/// - 连续段长度 >= 8 时作为候选码返回
/// - 否则原样返回去除首尾空白后的条码（恒等兜底）
///
/// # 说明
/// 短于 8 位的条码永远不会命中模式，直接走恒等兜底
pub fn extract_material_code(raw_barcode: &str) -> String {
    let trimmed = raw_barcode.trim();

    let run_len = trimmed
        .chars()
        .take_while(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .count();

    if run_len >= MIN_CODE_LEN {
        trimmed.chars().take(run_len.min(MAX_CODE_LEN)).collect()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_前缀提取_8位() {
        assert_eq!(extract_material_code("ABC12345-9001"), "ABC12345");
    }

    #[test]
    fn test_前缀提取_贪婪至12位() {
        // 连续段 14 位，候选码截断到 12 位
        assert_eq!(extract_material_code("ABCDEFGH123456"), "ABCDEFGH1234");
    }

    #[test]
    fn test_恒等兜底_短条码() {
        assert_eq!(extract_material_code("ab12"), "ab12");
        assert_eq!(extract_material_code("AB12"), "AB12");
    }

    #[test]
    fn test_恒等兜底_小写开头() {
        // 小写字母不计入连续段
        assert_eq!(extract_material_code("abc12345-9001"), "abc12345-9001");
    }

    #[test]
    fn test_首尾空白被去除() {
        assert_eq!(extract_material_code("  ABC12345-9001  "), "ABC12345");
        assert_eq!(extract_material_code("  ab12  "), "ab12");
    }

    #[test]
    fn test_全函数_任意输入非空输出() {
        for input in ["X", "-", "条码", "ABC12345", "  A1  "] {
            let code = extract_material_code(input);
            assert!(!code.is_empty(), "输入 {:?} 产生了空输出", input);
        }
    }

    #[test]
    fn test_整串即候选码() {
        // 连续段覆盖全串且在 8-12 位内，候选码与原串相同
        assert_eq!(extract_material_code("ABC12345"), "ABC12345");
    }
}

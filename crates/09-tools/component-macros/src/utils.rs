//! 宏工具函数

use proc_macro2::Span;
use syn::{meta::ParseNestedMeta, Error, LitStr, Result};
use uuid::Uuid;

/// 标识属性参数：`uuid = "..."`, `name = "..."`, `description = "..."`
#[derive(Debug, Default)]
pub struct IdentityArgs {
    pub uuid: Option<(u128, Span)>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl IdentityArgs {
    /// 解析单个参数，供 `parse_nested_meta` 调用
    pub fn parse_meta(&mut self, meta: ParseNestedMeta<'_>) -> Result<()> {
        if meta.path.is_ident("uuid") {
            let lit: LitStr = meta.value()?.parse()?;
            self.uuid = Some((parse_uuid(&lit)?, lit.span()));
        } else if meta.path.is_ident("name") {
            let lit: LitStr = meta.value()?.parse()?;
            self.name = Some(lit.value());
        } else if meta.path.is_ident("description") {
            let lit: LitStr = meta.value()?.parse()?;
            self.description = Some(lit.value());
        } else {
            return Err(meta.error("不支持的参数，可用参数: uuid, name, description"));
        }
        Ok(())
    }

    /// 必需的 uuid
    pub fn require_uuid(&self, span: Span) -> Result<u128> {
        self.uuid
            .map(|(value, _)| value)
            .ok_or_else(|| Error::new(span, "缺少 uuid 参数"))
    }
}

/// 把字符串字面量解析为 128 位整数
pub fn parse_uuid(lit: &LitStr) -> Result<u128> {
    let value = Uuid::parse_str(lit.value().trim())
        .map_err(|e| Error::new(lit.span(), format!("无效的 uuid: {}", e)))?;
    if value.is_nil() {
        return Err(Error::new(lit.span(), "uuid 不能为全零"));
    }
    Ok(value.as_u128())
}

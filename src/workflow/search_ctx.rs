//! 搜索上下文
//!
//! 封装"在哪个地区搜索哪个词"这一信息，贯穿发现和调研两个阶段

use std::fmt::Display;

/// 表示"不限地区"的国家选项
const UNSPECIFIED_COUNTRY: &str = "Other";

/// 搜索上下文
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCtx {
    /// 搜索词
    pub term: String,

    /// 国家，`None` 表示不限
    country: Option<String>,

    /// 国家内的地区，只在指定国家时生效
    region: Option<String>,
}

impl SearchCtx {
    /// 创建新的搜索上下文
    ///
    /// 空字符串和 `"Other"` 都视为未指定国家
    pub fn new(term: impl Into<String>, country: Option<&str>, region: Option<&str>) -> Self {
        let country = country
            .map(str::trim)
            .filter(|c| !c.is_empty() && *c != UNSPECIFIED_COUNTRY)
            .map(str::to_string);
        let region = region
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        Self {
            term: term.into(),
            country,
            region,
        }
    }

    /// 换一个搜索词，地区不变
    pub fn with_term(&self, term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..self.clone()
        }
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    /// 生效的地区（未指定国家时忽略地区）
    pub fn region(&self) -> Option<&str> {
        self.country.as_ref().and(self.region.as_deref())
    }

    /// 拼接到 prompt 里的地区描述
    ///
    /// 例如 `lead = "based in"` 时得到 `" based in Germany, specifically in the Bavaria region"`，
    /// 未指定国家时为空字符串
    pub fn location_phrase(&self, lead: &str) -> String {
        match (self.country(), self.region()) {
            (Some(country), Some(region)) => {
                format!(" {} {}, specifically in the {} region", lead, country, region)
            }
            (Some(country), None) => format!(" {} {}", lead, country),
            _ => String::new(),
        }
    }
}

impl Display for SearchCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.country(), self.region()) {
            (Some(country), Some(region)) => {
                write!(f, "[搜索词 {} 地区 {}/{}]", self.term, country, region)
            }
            (Some(country), None) => write!(f, "[搜索词 {} 地区 {}]", self.term, country),
            _ => write!(f, "[搜索词 {}]", self.term),
        }
    }
}

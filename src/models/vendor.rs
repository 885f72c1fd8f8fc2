use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// 搜索词的一种解读
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interpretation {
    pub interpretation: String,
    #[serde(default)]
    pub description: String,
}

impl Interpretation {
    /// 无法解析时使用的默认解读
    pub fn fallback(term: &str) -> Self {
        Self {
            interpretation: term.to_string(),
            description: format!("Vendors related to {}", term),
        }
    }
}

/// 已发现的供应商
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredEntity {
    pub name: String,
    pub category: String,
}

impl DiscoveredEntity {
    pub fn new(name: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
        }
    }
}

/// 归一化后的业务类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedCategory {
    Manufacturer,
    DistributorSupplier,
    Retailer,
    Other(String),
}

impl NormalizedCategory {
    /// 按关键字归类（不区分大小写），都不匹配时原样保留
    pub fn from_category(category: &str) -> Self {
        let lower = category.to_lowercase();
        if lower.contains("manufacturer") {
            NormalizedCategory::Manufacturer
        } else if lower.contains("distributor") || lower.contains("supplier") {
            NormalizedCategory::DistributorSupplier
        } else if lower.contains("retailer") || lower.contains("seller") {
            NormalizedCategory::Retailer
        } else {
            NormalizedCategory::Other(category.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            NormalizedCategory::Manufacturer => "Manufacturer",
            NormalizedCategory::DistributorSupplier => "Distributor/Supplier",
            NormalizedCategory::Retailer => "Retailer",
            NormalizedCategory::Other(raw) => raw,
        }
    }
}

impl fmt::Display for NormalizedCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NormalizedCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// 调研完成的供应商记录
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    pub name: String,
    pub description: String,
    pub website: String,
    pub contact: String,
    pub specializations: Vec<String>,
    /// 透传上游的值，不做截断
    pub relevance_score: i64,
    pub category: String,
    pub normalized_category: NormalizedCategory,
}

impl EnrichedRecord {
    /// 由调研响应构建记录
    ///
    /// 名称始终使用发现阶段的名称；响应缺少 business_type 时沿用输入类别
    pub fn from_payload(name: &str, category: &str, payload: ResearchPayload) -> Self {
        let category = payload
            .business_type
            .filter(|b| !b.trim().is_empty())
            .unwrap_or_else(|| category.to_string());

        Self {
            name: name.to_string(),
            description: payload.description,
            website: payload.website,
            contact: payload.contact,
            specializations: payload.specializations,
            relevance_score: payload.relevance_score,
            normalized_category: NormalizedCategory::from_category(&category),
            category,
        }
    }

    /// 调研失败时的兜底记录
    pub fn fallback(name: &str, category: &str, term: &str) -> Self {
        Self {
            name: name.to_string(),
            description: format!("A {} specializing in {}.", category, term),
            website: guess_website(name),
            contact: "contact@example.com".to_string(),
            specializations: vec![term.to_string()],
            relevance_score: 5,
            category: category.to_string(),
            normalized_category: NormalizedCategory::from_category(category),
        }
    }
}

/// 根据名称猜测官网：小写、去空格
pub fn guess_website(name: &str) -> String {
    format!("https://www.{}.com", name.to_lowercase().replace(' ', ""))
}

/// 调研接口返回的 JSON 对象
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResearchPayload {
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub website: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub specializations: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_score")]
    pub relevance_score: i64,
    #[serde(default)]
    pub business_type: Option<String>,
}

// 查不到的字段常以 null 返回，按缺省值处理
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

// 评分可能是整数、小数或数字字符串
fn deserialize_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;

    struct ScoreVisitor;

    impl<'de> Visitor<'de> for ScoreVisitor {
        type Value = i64;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer, float or numeric string score")
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value)
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            i64::try_from(value).map_err(|_| E::custom("score out of range"))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.trunc() as i64)
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            let trimmed = value.trim();
            trimmed
                .parse::<i64>()
                .or_else(|_| trimmed.parse::<f64>().map(|f| f.trunc() as i64))
                .map_err(|_| E::custom(format!("invalid score: {}", value)))
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(0)
        }
    }

    deserializer.deserialize_any(ScoreVisitor)
}

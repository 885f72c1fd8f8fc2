//! 类别配比与发现批次

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// 类别配比
///
/// 类别名 → 权重，保持插入顺序（批次规划按此顺序输出）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryMix {
    entries: Vec<(String, u32)>,
}

impl CategoryMix {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加或更新一个类别的权重
    pub fn with(mut self, category: impl Into<String>, weight: u32) -> Self {
        self.set(category, weight);
        self
    }

    pub fn set(&mut self, category: impl Into<String>, weight: u32) {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some(entry) => entry.1 = weight,
            None => self.entries.push((category, weight)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.entries.iter().map(|(name, weight)| (name.as_str(), *weight))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn total_weight(&self) -> u64 {
        self.entries.iter().map(|(_, w)| u64::from(*w)).sum()
    }

    /// 权重最大的类别，并列时取最先出现的
    pub fn largest(&self) -> Option<&str> {
        let mut best: Option<(&str, u32)> = None;
        for (name, weight) in self.iter() {
            match best {
                Some((_, w)) if weight <= w => {}
                _ => best = Some((name, weight)),
            }
        }
        best.map(|(name, _)| name)
    }

    /// 权重大于 0 的第一个类别
    pub fn first_active(&self) -> Option<&str> {
        self.iter().find(|(_, w)| *w > 0).map(|(name, _)| name)
    }

    /// 归一化为百分比
    ///
    /// 每项四舍五入到整数，累计不超过 100，最后一项补齐到 100。权重全为 0 时原样返回。
    pub fn normalized(&self) -> CategoryMix {
        let total = self.total_weight();
        if total == 0 || self.entries.is_empty() {
            return self.clone();
        }

        let last = self.entries.len() - 1;
        let mut assigned: i64 = 0;
        let mut entries = Vec::with_capacity(self.entries.len());

        for (idx, (name, weight)) in self.entries.iter().enumerate() {
            let pct = if idx == last {
                (100 - assigned).max(0)
            } else {
                let pct = (f64::from(*weight) / total as f64 * 100.0).round() as i64;
                let pct = pct.min(100 - assigned);
                assigned += pct;
                pct
            };
            entries.push((name.clone(), pct as u32));
        }

        CategoryMix { entries }
    }
}

impl FromStr for CategoryMix {
    type Err = ConfigError;

    /// 解析 `manufacturer:40,distributor:30,retailer:30`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ConfigError::InvalidMix {
            value: s.to_string(),
        };

        let mut mix = CategoryMix::new();
        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let (name, weight) = part.split_once(':').ok_or_else(invalid)?;
            let name = name.trim();
            if name.is_empty() {
                return Err(invalid());
            }
            let weight: u32 = weight.trim().parse().map_err(|_| invalid())?;
            mix.set(name, weight);
        }

        if mix.is_empty() {
            return Err(invalid());
        }
        Ok(mix)
    }
}

impl fmt::Display for CategoryMix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .iter()
            .map(|(name, weight)| format!("{}:{}", name, weight))
            .collect();
        write!(f, "{}", parts.join(","))
    }
}

impl Serialize for CategoryMix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for CategoryMix {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// 一个发现批次：某个类别要找多少个供应商
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub category: String,
    pub count: usize,
}

impl WorkItem {
    pub fn new(category: impl Into<String>, count: usize) -> Self {
        Self {
            category: category.into(),
            count,
        }
    }
}

impl fmt::Display for WorkItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} x{}", self.category, self.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_mix_in_order() {
        let mix: CategoryMix = "manufacturer:40, distributor:30,retailer:30".parse().unwrap();
        let names: Vec<&str> = mix.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["manufacturer", "distributor", "retailer"]);
        assert_eq!(mix.total_weight(), 100);
        assert_eq!(mix.to_string(), "manufacturer:40,distributor:30,retailer:30");
    }

    #[test]
    fn rejects_malformed_mix() {
        assert!("manufacturer".parse::<CategoryMix>().is_err());
        assert!("manufacturer:abc".parse::<CategoryMix>().is_err());
        assert!(":10".parse::<CategoryMix>().is_err());
        assert!("".parse::<CategoryMix>().is_err());
    }

    #[test]
    fn largest_prefers_first_on_tie() {
        let mix = CategoryMix::new()
            .with("distributor", 30)
            .with("retailer", 30)
            .with("manufacturer", 20);
        assert_eq!(mix.largest(), Some("distributor"));
        assert_eq!(CategoryMix::new().largest(), None);
    }

    #[test]
    fn normalized_sums_to_one_hundred() {
        let mix = CategoryMix::new()
            .with("manufacturer", 1)
            .with("distributor", 1)
            .with("retailer", 1);
        let normalized = mix.normalized();
        let weights: Vec<u32> = normalized.iter().map(|(_, w)| w).collect();
        assert_eq!(weights, vec![33, 33, 34]);
        assert_eq!(normalized.total_weight(), 100);

        let mix = CategoryMix::new().with("a", 50).with("b", 150);
        assert_eq!(mix.normalized().to_string(), "a:25,b:75");
    }

    #[test]
    fn normalized_many_equal_weights_still_sum_to_one_hundred() {
        let mut mix = CategoryMix::new();
        for i in 0..40 {
            mix.set(format!("c{}", i), 1);
        }
        let normalized = mix.normalized();
        assert_eq!(normalized.len(), 40);
        assert_eq!(normalized.total_weight(), 100);
    }

    #[test]
    fn normalized_keeps_zero_mix() {
        let mix = CategoryMix::new().with("a", 0).with("b", 0);
        assert_eq!(mix.normalized(), mix);
    }

    #[test]
    fn first_active_skips_zero_weights() {
        let mix = CategoryMix::new().with("a", 0).with("b", 10);
        assert_eq!(mix.first_active(), Some("b"));
    }
}

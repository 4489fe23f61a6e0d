//! 期間模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 期間（月份時間桶）
///
/// 標籤格式為 `YYYY-MM`；期間全序排列，庫存平衡約束把 t-1 期
/// 串接到 t 期。
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Period {
    /// 月份標籤，例如 "2025-01"
    pub label: String,
}

impl Period {
    /// 創建新的期間
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// 該期間的第一天
    pub fn first_day(&self) -> Result<NaiveDate> {
        NaiveDate::parse_from_str(&format!("{}-01", self.label), "%Y-%m-%d")
            .map_err(|_| PlanError::Schema(format!("無效的月份標籤: {}", self.label)))
    }

    /// 驗證一組月份標籤：非空、可解析、嚴格遞增
    pub fn validate_labels(labels: &[String]) -> Result<Vec<Period>> {
        let trimmed: Vec<Period> = labels
            .iter()
            .map(|l| Period::new(l.trim()))
            .filter(|p| !p.label.is_empty())
            .collect();

        if trimmed.is_empty() {
            return Err(PlanError::Schema("請至少選擇一個月份".to_string()));
        }

        let mut prev: Option<NaiveDate> = None;
        for period in &trimmed {
            let day = period.first_day()?;
            if let Some(p) = prev {
                if day <= p {
                    return Err(PlanError::Schema(format!(
                        "月份必須嚴格遞增: {} 不在 {} 之後",
                        period.label, p
                    )));
                }
            }
            prev = Some(day);
        }

        Ok(trimmed)
    }
}

use serde::{Deserialize, Serialize};

/// Working hours assumed for a resource when none are given.
pub const DEFAULT_MONTHLY_HOURS: f64 = 160.0;

/// An employee record as the backend stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub total_points: i64,
    /// Annual salary.
    #[serde(default)]
    pub salary: Option<f64>,
    /// Overhead on top of salary, in percent.
    #[serde(default)]
    pub overhead: Option<f64>,
    #[serde(default)]
    pub monthly_hours: Option<f64>,
    #[serde(default)]
    pub effective_hourly_cost: Option<f64>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

impl User {
    /// Salary plus overhead for one month, if a salary is known.
    pub fn monthly_cost(&self) -> Option<f64> {
        let salary = self.salary?;
        let overhead = self.overhead.unwrap_or(0.0);
        Some(salary / 12.0 * (1.0 + overhead / 100.0))
    }

    /// The backend's figure if it sent one, otherwise derived from the monthly cost.
    pub fn hourly_cost(&self) -> Option<f64> {
        if let Some(cost) = self.effective_hourly_cost {
            return Some(cost);
        }

        let hours = self.monthly_hours.filter(|h| *h > 0.0)?;
        Some(self.monthly_cost()? / hours)
    }

    pub fn role_label(&self) -> &str {
        self.role.as_deref().filter(|r| !r.is_empty()).unwrap_or("-")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub department: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overhead: Option<f64>,
    pub monthly_hours: f64,
}

/// Partial update; only the fields that are set are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overhead: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_hours: Option<f64>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostSummary {
    pub total_users: usize,
    pub total_monthly_cost: f64,
    pub avg_hourly_cost: f64,
    pub total_annual_cost: f64,
}

impl CostSummary {
    pub fn from_users(users: &[User]) -> Self {
        let total_monthly_cost: f64 = users.iter().filter_map(User::monthly_cost).sum();

        let hourly: Vec<f64> = users.iter().filter_map(User::hourly_cost).collect();
        let avg_hourly_cost = if hourly.is_empty() {
            0.0
        } else {
            let mean = hourly.iter().sum::<f64>() / hourly.len() as f64;
            (mean * 100.0).round() / 100.0
        };

        Self {
            total_users: users.len(),
            total_monthly_cost,
            avg_hourly_cost,
            total_annual_cost: total_monthly_cost * 12.0,
        }
    }
}

/// Users together with their cost totals, as shown on the resources page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostOverview {
    pub users: Vec<User>,
    pub summary: CostSummary,
}

/// `/users/cost-summary` response; older backends omit the summary.
#[derive(Debug, Clone, Deserialize)]
pub struct CostOverviewResponse {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub summary: Option<CostSummary>,
}

impl From<CostOverviewResponse> for CostOverview {
    fn from(response: CostOverviewResponse) -> Self {
        let summary = response
            .summary
            .unwrap_or_else(|| CostSummary::from_users(&response.users));

        Self {
            users: response.users,
            summary,
        }
    }
}
